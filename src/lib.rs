//! GPCP 1DD Processor Library
//!
//! Decodes GPCP One-Degree-Daily precipitation files (one file per month, an
//! ASCII header block followed by raw 32-bit float grids) and reduces each
//! month to a single mean grid.
//!
//! The decoding core:
//! - [`header`] reads the header block and its `key=value` metadata
//! - [`byte_order`] decides whether the payload needs byte swapping
//! - [`decoder`] turns the payload into a `(days, 180, 360)` grid
//! - [`reducer`] averages the grid over days
//!
//! [`processor`] drives a batch run over a directory, writing `.npy` arrays
//! and a CSV catalog of header fields.

pub mod byte_order;
pub mod cli;
pub mod config;
pub mod constants;
pub mod decoder;
pub mod error;
pub mod header;
pub mod models;
pub mod processor;
pub mod reducer;

pub use byte_order::{ByteOrder, Endianness, resolve_byte_order};
pub use config::ProcessorConfig;
pub use decoder::{decode_file, decode_grid, decode_grid_only};
pub use error::{GpcpError, Result};
pub use header::{Header, extract_day_count, parse_metadata, read_header, read_header_file};
pub use models::{DayCount, DecodedFile, FileOutcome, Grid, Metadata, MonthlyMean, ProcessingStats};
pub use reducer::monthly_mean;
