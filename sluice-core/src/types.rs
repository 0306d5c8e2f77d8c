//! Data types shared between CLI and core.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::address::Address;

/// A single payment line item, coins in droplets.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Output {
    pub address: Address,
    pub coins: u64,
    pub hours: u64,
}

/// The assembled request handed to the coordinator.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransactionRequest {
    pub from_address: Address,
    pub ux_outs: Vec<String>,
    pub outs: Vec<Output>,
}

impl TransactionRequest {
    /// Sum of all output coins, `None` on overflow.
    pub fn total_coins(&self) -> Option<u64> {
        self.outs
            .iter()
            .try_fold(0_u64, |acc, out| acc.checked_add(out.coins))
    }

    /// Sum of all output hours, `None` on overflow.
    pub fn total_hours(&self) -> Option<u64> {
        self.outs
            .iter()
            .try_fold(0_u64, |acc, out| acc.checked_add(out.hours))
    }
}

/// Raw, unvalidated description of the outputs a caller wants.
///
/// `json` and `csv` select the batch modes; `args` holds the positional
/// `[address] [coins] [hours]` tokens used when neither batch mode is set.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RawInputSpec {
    pub json: Option<String>,
    pub csv: Option<PathBuf>,
    pub args: Vec<String>,
}

/// Which input mode a `RawInputSpec` resolves to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputMode {
    Single,
    Json,
    Csv,
}

impl InputMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            InputMode::Single => "single",
            InputMode::Json => "json",
            InputMode::Csv => "csv",
        }
    }
}
