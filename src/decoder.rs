//! Grid decoding for 1DD files.
//!
//! The payload after the header is a flat run of 32-bit floats. The last
//! `days * 180 * 360` of them form the grid; anything before is ignored.

use crate::byte_order::{ByteOrder, Endianness, resolve_byte_order};
use crate::constants::{CELLS_PER_DAY, NUM_LAT, NUM_LON, RECORD_SIZE, VALUE_SIZE};
use crate::error::{GpcpError, Result};
use crate::header::{extract_day_count, read_header};
use crate::models::{DayCount, DecodedFile, Grid};
use byteorder::{BigEndian, LittleEndian};
use std::fs::File;
use std::io::Read;
use std::path::Path;
use tracing::debug;

/// Decode one file into its header, metadata and daily grid
pub fn decode_file(path: &Path) -> Result<DecodedFile> {
    let mut file = File::open(path).map_err(|e| GpcpError::io(path, e))?;

    let header = read_header(&mut file, path)?;
    let days = extract_day_count(header.as_bytes(), path)?;
    let order = resolve_byte_order(header.as_bytes(), Endianness::host());
    debug!(
        "{}: {} days, payload read {:?} ({})",
        path.display(),
        days.get(),
        order,
        order.effective(Endianness::host())
    );

    let grid = decode_grid(&mut file, path, days, order)?;
    let metadata = header.metadata();

    Ok(DecodedFile {
        path: path.to_path_buf(),
        header,
        metadata,
        grid,
    })
}

/// Decode one file, keeping only the grid
pub fn decode_grid_only(path: &Path) -> Result<Grid> {
    decode_file(path).map(|decoded| decoded.grid)
}

/// Read the rest of `reader` as the payload and decode it
pub fn decode_grid<R: Read>(
    reader: &mut R,
    path: &Path,
    days: DayCount,
    order: ByteOrder,
) -> Result<Grid> {
    let mut payload = Vec::new();
    reader
        .read_to_end(&mut payload)
        .map_err(|e| GpcpError::io(path, e))?;
    decode_payload(&payload, path, days, order)
}

/// Decode the grid from payload bytes that follow the header
pub fn decode_payload(
    payload: &[u8],
    path: &Path,
    days: DayCount,
    order: ByteOrder,
) -> Result<Grid> {
    if payload.len() % RECORD_SIZE != 0 {
        return Err(GpcpError::format(
            path,
            format!(
                "payload of {} bytes is not a multiple of the {}x{} grid cell count",
                payload.len(),
                NUM_LAT,
                NUM_LON
            ),
        ));
    }

    let total = payload.len() / VALUE_SIZE;
    let required = days.value_count();
    if total < required {
        return Err(GpcpError::format(
            path,
            format!(
                "payload holds {} values but {} days need {}",
                total,
                days.get(),
                required
            ),
        ));
    }

    let offset = (total - required) * VALUE_SIZE;
    if offset > 0 {
        debug!(
            "{}: skipping {} leading records",
            path.display(),
            (total - required) / CELLS_PER_DAY
        );
    }

    let values = read_floats(&payload[offset..], order.effective(Endianness::host()));
    Grid::from_values(days.get(), values)
}

fn read_floats(bytes: &[u8], endianness: Endianness) -> Vec<f32> {
    let mut values = vec![0f32; bytes.len() / VALUE_SIZE];
    match endianness {
        Endianness::Big => <BigEndian as byteorder::ByteOrder>::read_f32_into(bytes, &mut values),
        Endianness::Little => {
            <LittleEndian as byteorder::ByteOrder>::read_f32_into(bytes, &mut values)
        }
    }
    values
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::constants::HEADER_LEN;
    use std::io::{Cursor, Write};
    use tempfile::NamedTempFile;

    fn encode(values: &[f32], endianness: Endianness) -> Vec<u8> {
        values
            .iter()
            .flat_map(|v| match endianness {
                Endianness::Big => v.to_be_bytes(),
                Endianness::Little => v.to_le_bytes(),
            })
            .collect()
    }

    fn write_file(header: &str, payload: &[u8]) -> NamedTempFile {
        let mut block = header.as_bytes().to_vec();
        block.resize(HEADER_LEN, b' ');
        let mut temp_file = NamedTempFile::new().unwrap();
        temp_file.write_all(&block).unwrap();
        temp_file.write_all(payload).unwrap();
        temp_file
    }

    fn ramp(days: usize) -> Vec<f32> {
        (0..days * CELLS_PER_DAY).map(|i| (i % 9973) as f32 * 0.25).collect()
    }

    #[test]
    fn test_decode_payload_shape() {
        let days = DayCount::new(3).unwrap();
        let values = ramp(3);
        let payload = encode(&values, Endianness::host());

        let grid = decode_payload(&payload, Path::new("mem"), days, ByteOrder::Native).unwrap();
        assert_eq!(grid.shape(), (3, NUM_LAT, NUM_LON));
        assert_eq!(grid.len(), 3 * NUM_LAT * NUM_LON);
        assert_eq!(grid.array().as_slice(), Some(values.as_slice()));
    }

    #[test]
    fn test_decode_payload_swapped() {
        let days = DayCount::new(1).unwrap();
        let values = ramp(1);
        let payload = encode(&values, Endianness::host().opposite());

        let grid = decode_payload(&payload, Path::new("mem"), days, ByteOrder::Swapped).unwrap();
        assert_eq!(grid.array().as_slice(), Some(values.as_slice()));
    }

    #[test]
    fn test_decode_payload_takes_tail() {
        let days = DayCount::new(1).unwrap();
        let mut values = vec![-1.0f32; CELLS_PER_DAY];
        values.extend(vec![7.5f32; CELLS_PER_DAY]);
        let payload = encode(&values, Endianness::host());

        let grid = decode_payload(&payload, Path::new("mem"), days, ByteOrder::Native).unwrap();
        assert_eq!(grid.days(), 1);
        assert!(grid.array().iter().all(|&v| v == 7.5));
    }

    #[test]
    fn test_decode_payload_too_short() {
        let days = DayCount::new(2).unwrap();
        let payload = encode(&ramp(1), Endianness::host());

        let result = decode_payload(&payload, Path::new("mem"), days, ByteOrder::Native);
        assert!(matches!(result, Err(GpcpError::Format { .. })));
    }

    #[test]
    fn test_decode_payload_not_whole_records() {
        let days = DayCount::new(1).unwrap();
        let mut payload = encode(&ramp(1), Endianness::host());
        payload.extend_from_slice(&[0u8; 8]);

        let result = decode_payload(&payload, Path::new("mem"), days, ByteOrder::Native);
        match result {
            Err(GpcpError::Format { reason, .. }) => assert!(reason.contains("multiple")),
            other => panic!("Expected Format error, got {:?}", other),
        }
    }

    #[test]
    fn test_decode_payload_empty() {
        let days = DayCount::new(1).unwrap();
        let result = decode_payload(&[], Path::new("mem"), days, ByteOrder::Native);
        assert!(matches!(result, Err(GpcpError::Format { .. })));
    }

    #[test]
    fn test_decode_grid_reads_remaining_bytes() {
        let days = DayCount::new(1).unwrap();
        let values = ramp(1);
        let mut cursor = Cursor::new(encode(&values, Endianness::host()));

        let grid = decode_grid(&mut cursor, Path::new("mem"), days, ByteOrder::Native).unwrap();
        assert_eq!(grid.array().as_slice(), Some(values.as_slice()));
    }

    #[test]
    fn test_decode_file_big_endian_round_trip() {
        let values = ramp(2);
        let temp_file = write_file(
            "year=1997 month=02 days=1-02 technique=Silicon Graphics",
            &encode(&values, Endianness::Big),
        );

        let decoded = decode_file(temp_file.path()).unwrap();
        assert_eq!(decoded.grid.shape(), (2, NUM_LAT, NUM_LON));
        assert_eq!(decoded.grid.array().as_slice(), Some(values.as_slice()));
        assert_eq!(decoded.metadata.get("year"), Some("1997"));
        assert_eq!(decoded.path, temp_file.path());
    }

    #[test]
    fn test_decode_file_little_endian() {
        let values = ramp(1);
        let temp_file = write_file("year=2008 days=1-01", &encode(&values, Endianness::Little));

        let grid = decode_grid_only(temp_file.path()).unwrap();
        assert_eq!(grid.array().as_slice(), Some(values.as_slice()));
    }

    #[test]
    fn test_decode_file_missing_days_marker() {
        let temp_file = write_file("year=2008", &encode(&ramp(1), Endianness::Little));
        let result = decode_file(temp_file.path());
        assert!(matches!(result, Err(GpcpError::Format { .. })));
    }
}
