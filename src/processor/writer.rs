//! Output writing module for GPCP 1DD datasets
//!
//! Writes monthly means as NumPy `.npy` arrays and the per-run catalog
//! table as CSV.

use crate::constants::{
    CATALOG_FILE_COLUMN, MONTHLY_MEAN_SUFFIX, NPY_DTYPE_F32, NPY_HEADER_ALIGN, NPY_MAGIC,
    NPY_VERSION, VALUE_SIZE,
};
use crate::error::{GpcpError, Result};
use crate::models::{FileOutcome, MonthlyMean};

use byteorder::LittleEndian;
use polars::prelude::{Column, CsvWriter, DataFrame, SerWriter};
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;
use tracing::debug;

/// Name of the monthly mean array for an input file
pub fn monthly_mean_file_name(source: &Path) -> Result<String> {
    let name = source
        .file_name()
        .ok_or_else(|| GpcpError::output(source, "input path has no file name"))?;
    Ok(format!("{}{}", name.to_string_lossy(), MONTHLY_MEAN_SUFFIX))
}

/// Write a monthly mean as a `(180, 360)` little-endian float32 `.npy` file
pub fn write_monthly_mean(path: &Path, mean: &MonthlyMean) -> Result<()> {
    let file = File::create(path).map_err(|e| GpcpError::io(path, e))?;
    let mut writer = BufWriter::new(file);

    let (rows, cols) = mean.shape();
    writer
        .write_all(&npy_header(&[rows, cols]))
        .map_err(|e| GpcpError::io(path, e))?;

    let values = mean.array().as_standard_layout();
    let values = values
        .as_slice()
        .ok_or_else(|| GpcpError::output(path, "monthly mean is not contiguous"))?;
    let mut data = vec![0u8; values.len() * VALUE_SIZE];
    <LittleEndian as byteorder::ByteOrder>::write_f32_into(values, &mut data);
    writer
        .write_all(&data)
        .map_err(|e| GpcpError::io(path, e))?;
    writer.flush().map_err(|e| GpcpError::io(path, e))?;

    debug!("Wrote monthly mean to {}", path.display());
    Ok(())
}

/// Build a version 1.0 `.npy` preamble for a C-ordered float32 array
fn npy_header(shape: &[usize]) -> Vec<u8> {
    let dims: Vec<String> = shape.iter().map(|d| d.to_string()).collect();
    let shape_str = if dims.len() == 1 {
        format!("({},)", dims[0])
    } else {
        format!("({})", dims.join(", "))
    };
    let dict = format!(
        "{{'descr': '{}', 'fortran_order': False, 'shape': {}, }}",
        NPY_DTYPE_F32, shape_str
    );

    // magic + version + u16 length + dict + newline, padded with spaces
    let preamble = NPY_MAGIC.len() + NPY_VERSION.len() + 2;
    let unpadded = preamble + dict.len() + 1;
    let pad = (NPY_HEADER_ALIGN - unpadded % NPY_HEADER_ALIGN) % NPY_HEADER_ALIGN;
    let header_len = (dict.len() + pad + 1) as u16;

    let mut out = Vec::with_capacity(unpadded + pad);
    out.extend_from_slice(NPY_MAGIC);
    out.extend_from_slice(&NPY_VERSION);
    out.extend_from_slice(&header_len.to_le_bytes());
    out.extend_from_slice(dict.as_bytes());
    out.extend(std::iter::repeat_n(b' ', pad));
    out.push(b'\n');
    out
}

/// Write the catalog table, one row per outcome, returning the row count
///
/// The `file` column holds the output array name; every other column is
/// looked up in the file's header metadata and left empty when absent.
pub fn write_catalog(path: &Path, outcomes: &[FileOutcome], columns: &[String]) -> Result<usize> {
    let table: Vec<Column> = columns
        .iter()
        .map(|name| {
            let values: Vec<Option<String>> = outcomes
                .iter()
                .map(|outcome| catalog_value(outcome, name))
                .collect();
            Column::new(name.as_str().into(), values)
        })
        .collect();

    let mut df = DataFrame::new(table)?;

    let mut file = File::create(path).map_err(|e| GpcpError::io(path, e))?;
    CsvWriter::new(&mut file)
        .include_header(true)
        .finish(&mut df)?;

    debug!("Wrote catalog with {} rows to {}", df.height(), path.display());
    Ok(df.height())
}

fn catalog_value(outcome: &FileOutcome, column: &str) -> Option<String> {
    if column == CATALOG_FILE_COLUMN {
        Some(outcome.output_file.clone())
    } else {
        outcome.metadata.get(column).map(str::to_string)
    }
}
