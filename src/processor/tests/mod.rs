//! Integration tests for the processor module
//!
//! Tests the complete batch pipeline against synthetic 1DD directories.


use crate::constants::{CELLS_PER_DAY, HEADER_LEN};
use std::fs;
use std::path::{Path, PathBuf};

/// Header of a little-endian file for the given month
pub fn header_text(year: u32, month: u32, days: u32) -> String {
    format!(
        "1DD_file=gpcp_1dd_v1.2_p1d.{year}{month:02} version=1.2 year={year} month={month:02} \
         days=1-{days:02} size=(360,180,{days}) missing_value=-99999. unit=mm/day \
         technique=Merged Precipitation Estimates"
    )
}

/// Write a synthetic 1DD file where every cell of day `d` holds `day_value(d)`
pub fn write_1dd_file(
    dir: &Path,
    name: &str,
    header: &str,
    days: usize,
    big_endian: bool,
    day_value: impl Fn(usize) -> f32,
) -> PathBuf {
    let mut bytes = header.as_bytes().to_vec();
    bytes.resize(HEADER_LEN, b' ');

    for day in 0..days {
        let value = day_value(day);
        let encoded = if big_endian {
            value.to_be_bytes()
        } else {
            value.to_le_bytes()
        };
        for _ in 0..CELLS_PER_DAY {
            bytes.extend_from_slice(&encoded);
        }
    }

    let path = dir.join(name);
    fs::write(&path, bytes).unwrap();
    path
}

/// Read the float payload of a `.npy` file written by the processor
pub fn read_npy_values(path: &Path) -> Vec<f32> {
    let bytes = fs::read(path).unwrap();
    assert!(bytes.starts_with(b"\x93NUMPY"));
    let header_len = u16::from_le_bytes([bytes[8], bytes[9]]) as usize;
    bytes[10 + header_len..]
        .chunks_exact(4)
        .map(|c| f32::from_le_bytes([c[0], c[1], c[2], c[3]]))
        .collect()
}
