//! Government-style document identifiers.

use std::fmt;
use std::ops::RangeInclusive;

use serde::{Deserialize, Serialize};

use crate::error::RecordError;

/// (serial, number) pair identifying a passport, license, STS or PTS.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct DocumentPair {
    pub serial: u16,
    pub number: u32,
}

impl DocumentPair {
    pub const SERIAL_RANGE: RangeInclusive<u16> = 1000..=9999;
    pub const NUMBER_RANGE: RangeInclusive<u32> = 100_000..=999_999;

    /// Total number of distinct pairs.
    pub const KEYSPACE: u64 = 9000 * 900_000;

    pub fn new(serial: u16, number: u32) -> Result<Self, RecordError> {
        if !Self::SERIAL_RANGE.contains(&serial) || !Self::NUMBER_RANGE.contains(&number) {
            return Err(RecordError::InvalidDocument { serial, number });
        }
        Ok(Self { serial, number })
    }

    /// Rebuilds a pair from two nullable columns; both must be present.
    pub fn from_columns(serial: Option<u16>, number: Option<u32>) -> Option<Self> {
        Some(Self {
            serial: serial?,
            number: number?,
        })
    }
}

impl fmt::Display for DocumentPair {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.serial, self.number)
    }
}
