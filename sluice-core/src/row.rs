//! Single-row parsing: one CSV record or JSON element into one `Output`.

use std::fmt;

use serde::Deserialize;
use thiserror::Error;

use crate::address::{decode_address, AddressValidationError};
use crate::amount::{parse_coins_to_droplets, AmountParseError};
use crate::error::SluiceError;
use crate::output::RowIssue;
use crate::types::Output;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum HoursParseError {
    #[error("hours is empty")]
    Empty,
    #[error("hours must be a base-10 unsigned integer")]
    InvalidDigits,
    #[error("hours is too large")]
    Overflow,
}

/// Parse an hours value as a base-10 `u64`. Signs are rejected.
pub fn parse_hours(input: &str) -> Result<u64, HoursParseError> {
    let s = input.trim();
    if s.is_empty() {
        return Err(HoursParseError::Empty);
    }
    if !s.bytes().all(|b| b.is_ascii_digit()) {
        return Err(HoursParseError::InvalidDigits);
    }
    s.parse::<u64>().map_err(|_| HoursParseError::Overflow)
}

/// One CSV record: `address,coins,hours`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CsvRow {
    pub address: String,
    pub coins: String,
    pub hours: String,
}

/// One element of a JSON batch.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct JsonRow {
    pub addr: String,
    pub coins: String,
    pub hours: u64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HoursField<'a> {
    Text(&'a str),
    Decoded(u64),
}

/// Borrowed view over any row shape the parser understands.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RowSource<'a> {
    pub address: &'a str,
    pub coins: &'a str,
    pub hours: HoursField<'a>,
}

impl<'a> From<&'a CsvRow> for RowSource<'a> {
    fn from(row: &'a CsvRow) -> Self {
        Self {
            address: &row.address,
            coins: &row.coins,
            hours: HoursField::Text(&row.hours),
        }
    }
}

impl<'a> From<&'a JsonRow> for RowSource<'a> {
    fn from(row: &'a JsonRow) -> Self {
        Self {
            address: &row.addr,
            coins: &row.coins,
            hours: HoursField::Decoded(row.hours),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RowField {
    Address,
    Coins,
    Hours,
}

impl RowField {
    pub fn as_str(&self) -> &'static str {
        match self {
            RowField::Address => "address",
            RowField::Coins => "coins",
            RowField::Hours => "hours",
        }
    }
}

impl fmt::Display for RowField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The first sub-field of a row that failed validation.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum RowError {
    #[error("invalid address {value:?}: {source}")]
    Address {
        value: String,
        source: AddressValidationError,
    },
    #[error("invalid coins {value:?}: {source}")]
    Coins {
        value: String,
        source: AmountParseError,
    },
    #[error("invalid hours {value:?}: {source}")]
    Hours {
        value: String,
        source: HoursParseError,
    },
}

impl RowError {
    pub fn field(&self) -> RowField {
        match self {
            RowError::Address { .. } => RowField::Address,
            RowError::Coins { .. } => RowField::Coins,
            RowError::Hours { .. } => RowField::Hours,
        }
    }

    pub fn value(&self) -> &str {
        match self {
            RowError::Address { value, .. }
            | RowError::Coins { value, .. }
            | RowError::Hours { value, .. } => value,
        }
    }

    fn cause(&self) -> String {
        match self {
            RowError::Address { source, .. } => source.to_string(),
            RowError::Coins { source, .. } => source.to_string(),
            RowError::Hours { source, .. } => source.to_string(),
        }
    }

    /// Attach a 0-based row index for batch aggregation.
    pub fn at(&self, row: usize) -> RowIssue {
        RowIssue {
            row,
            field: self.field().to_string(),
            value: self.value().to_string(),
            message: self.cause(),
        }
    }
}

impl From<RowError> for SluiceError {
    fn from(err: RowError) -> Self {
        match err {
            RowError::Address { value, source } => SluiceError::InvalidAddress {
                address: value,
                source,
            },
            RowError::Coins { value, source } => SluiceError::InvalidAmount { value, source },
            RowError::Hours { value, source } => SluiceError::InvalidHours { value, source },
        }
    }
}

/// Validate one row. Checks run address, coins, hours; the first failure wins.
pub fn parse_row<'a>(row: impl Into<RowSource<'a>>) -> Result<Output, RowError> {
    let row = row.into();
    let address_text = row.address.trim();

    let address = decode_address(address_text).map_err(|source| RowError::Address {
        value: address_text.to_string(),
        source,
    })?;

    let coins = parse_coins_to_droplets(row.coins).map_err(|source| RowError::Coins {
        value: row.coins.to_string(),
        source,
    })?;

    let hours = match row.hours {
        HoursField::Decoded(hours) => hours,
        HoursField::Text(text) => parse_hours(text).map_err(|source| RowError::Hours {
            value: text.to_string(),
            source,
        })?,
    };

    Ok(Output {
        address,
        coins,
        hours,
    })
}
