use crate::error::{Result, SluiceError};
use crate::row::JsonRow;

/// Decode an inline JSON batch into typed rows. The document is decoded as a
/// whole; any syntax or schema error rejects it entirely.
pub fn parse_json_rows(input: &str) -> Result<Vec<JsonRow>> {
    serde_json::from_str::<Vec<JsonRow>>(input).map_err(|err| {
        SluiceError::MalformedBatchInput {
            reason: format!("invalid -m JSON: {err}"),
        }
    })
}
