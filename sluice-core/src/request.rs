//! Transaction request assembly.

use crate::address::{decode_address, Address};
use crate::batch::resolve_outputs;
use crate::error::{Result, SluiceError};
use crate::types::{Output, RawInputSpec, TransactionRequest};

/// Validate the sender address. Empty input is reported separately from
/// malformed input.
pub fn validate_sender(sender: &str) -> Result<Address> {
    let trimmed = sender.trim();
    if trimmed.is_empty() {
        return Err(SluiceError::MissingSender);
    }
    decode_address(trimmed).map_err(|source| SluiceError::InvalidAddress {
        address: trimmed.to_string(),
        source,
    })
}

/// Split a comma-separated unspent list. Tokens are passed through verbatim;
/// only an entirely blank list becomes empty.
pub fn split_unspents(unspents: &str) -> Vec<String> {
    if unspents.trim().is_empty() {
        return Vec::new();
    }
    unspents.split(',').map(ToOwned::to_owned).collect()
}

/// Combine sender, unspents and validated outputs. Performs no I/O.
pub fn build_request(
    sender: &str,
    unspents: &str,
    outputs: Vec<Output>,
) -> Result<TransactionRequest> {
    let from_address = validate_sender(sender)?;
    Ok(TransactionRequest {
        from_address,
        ux_outs: split_unspents(unspents),
        outs: outputs,
    })
}

/// Full pipeline: sender check, output resolution, assembly. The sender is
/// checked before any batch input is read.
pub fn prepare_request(
    sender: &str,
    unspents: &str,
    spec: &RawInputSpec,
) -> Result<TransactionRequest> {
    validate_sender(sender)?;
    let outputs = resolve_outputs(spec)?;
    let request = build_request(sender, unspents, outputs)?;
    tracing::debug!(
        outputs = request.outs.len(),
        unspents = request.ux_outs.len(),
        "transaction request prepared"
    );
    Ok(request)
}

#[cfg(test)]
mod tests {
    use std::path::PathBuf;

    use super::*;

    const SENDER: &str = "2iVtHS5ye99Km5PonsB42No3pQRGEURmxyc";
    const RECIPIENT: &str = "2GgFvqoyk9RjwVzj8tqfcXVXB4orBwoc9qv";

    #[test]
    fn empty_sender_is_missing() {
        assert!(matches!(
            build_request("  ", "a,b", vec![]),
            Err(SluiceError::MissingSender)
        ));
    }

    #[test]
    fn malformed_sender_is_invalid_address() {
        assert!(matches!(
            build_request("2iVtHS5ye99Km5PonsB42No3pQRGEURmxyd", "", vec![]),
            Err(SluiceError::InvalidAddress { .. })
        ));
    }

    #[test]
    fn unspents_are_split_and_passed_through() {
        let request = build_request(SENDER, "abc,def,not-validated", vec![]).unwrap();
        assert_eq!(request.from_address.as_str(), SENDER);
        assert_eq!(request.ux_outs, vec!["abc", "def", "not-validated"]);
    }

    #[test]
    fn unspent_tokens_keep_whitespace_and_blanks() {
        assert_eq!(split_unspents(" a ,,b"), vec![" a ", "", "b"]);
        assert_eq!(split_unspents("a,"), vec!["a", ""]);
    }

    #[test]
    fn blank_unspent_list_is_empty() {
        assert!(split_unspents("").is_empty());
        assert!(split_unspents("   ").is_empty());
    }

    #[test]
    fn sender_is_checked_before_batch_input() {
        let spec = RawInputSpec {
            json: Some("[]".to_string()),
            csv: Some(PathBuf::from("/nope.csv")),
            args: vec![],
        };
        assert!(matches!(
            prepare_request("", "", &spec),
            Err(SluiceError::MissingSender)
        ));
    }

    #[test]
    fn prepares_single_output_request() {
        let spec = RawInputSpec {
            args: vec![RECIPIENT.to_string(), "10.2".to_string(), "1".to_string()],
            ..RawInputSpec::default()
        };
        let request = prepare_request(SENDER, "u1,u2", &spec).unwrap();
        assert_eq!(request.outs.len(), 1);
        assert_eq!(request.outs[0].coins, 10_200_000);
        assert_eq!(request.ux_outs, vec!["u1", "u2"]);
    }
}
