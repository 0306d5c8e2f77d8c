//! Core library for sluice: output parsing, validation, and request assembly.

pub mod address;
pub mod amount;
pub mod batch;
pub mod csv_parser;
pub mod error;
pub mod json_parser;
pub mod output;
pub mod request;
pub mod row;
pub mod types;

pub use address::{decode_address, Address, AddressValidationError};
pub use amount::{
    format_droplets_as_coins, parse_coins_to_droplets, AmountParseError, DROPLETS_PER_COIN,
};
pub use batch::{fold_rows, resolve_outputs, select_mode, RowFold};
pub use error::{Result, SluiceError};
pub use output::{AgentError, OutputMode, RowIssue};
pub use request::{build_request, prepare_request, split_unspents, validate_sender};
pub use row::{parse_row, CsvRow, JsonRow, RowError, RowField};
pub use types::{InputMode, Output, RawInputSpec, TransactionRequest};
