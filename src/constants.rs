//! Application constants for the GPCP 1DD processor
//!
//! Grid geometry, header layout markers, file naming conventions and
//! catalog defaults shared by the decoder and the batch processor.

// =============================================================================
// Grid Geometry
// =============================================================================

/// Number of longitude columns in the one-degree grid
pub const NUM_LON: usize = 360;

/// Number of latitude rows in the one-degree grid
pub const NUM_LAT: usize = 180;

/// Cells in a single daily grid record
pub const CELLS_PER_DAY: usize = NUM_LAT * NUM_LON;

/// Size in bytes of one 32-bit float value
pub const VALUE_SIZE: usize = 4;

/// Size in bytes of one daily grid record
pub const RECORD_SIZE: usize = CELLS_PER_DAY * VALUE_SIZE;

/// Length of the leading ASCII header block (one record row wide)
pub const HEADER_LEN: usize = NUM_LON * VALUE_SIZE;

// =============================================================================
// Header Layout
// =============================================================================

/// Marker preceding the `1-nn` day range in the header
pub const DAYS_MARKER: &[u8] = b"days=";

/// Offset from the start of `days=` to the two-digit day count (`days=1-nn`)
pub const DAY_COUNT_OFFSET: usize = 7;

/// Width of the positional day count field
pub const DAY_COUNT_WIDTH: usize = 2;

/// Largest number of days a monthly file may hold
pub const MAX_DAYS: u8 = 31;

/// Vendor token written by the big-endian machines that produced older files
pub const BIG_ENDIAN_MARKER: &[u8] = b"Silicon";

// =============================================================================
// File Naming
// =============================================================================

/// Glob pattern selecting one input file per encoded year-month
pub const INPUT_FILE_PATTERN: &str = "gpcp_1dd_v1.2_p1d.*";

/// Suffix appended to the input file name for the monthly mean array
pub const MONTHLY_MEAN_SUFFIX: &str = "_monthlyAverage.npy";

/// Default input directory
pub const DEFAULT_INPUT_DIR: &str = "data";

/// Output directory created under the input directory when none is given
pub const DEFAULT_OUTPUT_SUBDIR: &str = "numpy_arrays";

// =============================================================================
// Catalog Table
// =============================================================================

/// File name of the summary table written next to the arrays
pub const CATALOG_FILE_NAME: &str = "table_files.csv";

/// Catalog column holding the output array file name
pub const CATALOG_FILE_COLUMN: &str = "file";

/// Default catalog columns, in output order
pub const CATALOG_COLUMNS: &[&str] = &["year", "month", "file", "missing_value", "unit"];

// =============================================================================
// NumPy Output
// =============================================================================

/// Magic string opening every `.npy` file
pub const NPY_MAGIC: &[u8] = b"\x93NUMPY";

/// Format version written (1.0)
pub const NPY_VERSION: [u8; 2] = [1, 0];

/// Little-endian 32-bit float descriptor
pub const NPY_DTYPE_F32: &str = "<f4";

/// Alignment of magic + version + header length + header dictionary
pub const NPY_HEADER_ALIGN: usize = 16;
