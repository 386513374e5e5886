//! Byte order resolution for the float payload.
//!
//! Files written on Silicon Graphics workstations are big-endian and say so
//! in their header; everything else is little-endian.

use crate::constants::BIG_ENDIAN_MARKER;
use std::fmt;

/// Byte order of a machine or a file
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Endianness {
    Big,
    Little,
}

impl Endianness {
    /// Byte order of the machine running this code
    pub const fn host() -> Self {
        if cfg!(target_endian = "big") {
            Endianness::Big
        } else {
            Endianness::Little
        }
    }

    pub const fn opposite(self) -> Self {
        match self {
            Endianness::Big => Endianness::Little,
            Endianness::Little => Endianness::Big,
        }
    }
}

impl fmt::Display for Endianness {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Endianness::Big => write!(f, "big-endian"),
            Endianness::Little => write!(f, "little-endian"),
        }
    }
}

/// How payload bytes relate to the host byte order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ByteOrder {
    /// Bytes are read as-is
    Native,
    /// Bytes must be flipped within each value
    Swapped,
}

impl ByteOrder {
    /// Endianness to read the payload with on a host of order `host`
    pub const fn effective(self, host: Endianness) -> Endianness {
        match self {
            ByteOrder::Native => host,
            ByteOrder::Swapped => host.opposite(),
        }
    }
}

/// On-disk byte order declared by a header
pub fn file_endianness(header: &[u8]) -> Endianness {
    if header
        .windows(BIG_ENDIAN_MARKER.len())
        .any(|w| w == BIG_ENDIAN_MARKER)
    {
        Endianness::Big
    } else {
        Endianness::Little
    }
}

/// Decide whether the payload of a file must be byte-swapped on `host`
///
/// Only a big-endian file read on a little-endian host is swapped; every
/// other combination uses the bytes as-is.
pub fn resolve_byte_order(header: &[u8], host: Endianness) -> ByteOrder {
    match (host, file_endianness(header)) {
        (Endianness::Little, Endianness::Big) => ByteOrder::Swapped,
        _ => ByteOrder::Native,
    }
}
