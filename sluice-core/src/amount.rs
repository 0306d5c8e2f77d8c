//! Coin decimal parsing into droplets with strict integer arithmetic.

use thiserror::Error;

/// Number of fractional digits a coin amount may carry.
pub const DROPLET_DECIMALS: usize = 6;
/// Droplet conversion constant: 1 coin = 1,000,000 droplets.
pub const DROPLETS_PER_COIN: u64 = 1_000_000;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum AmountParseError {
    #[error("amount is empty")]
    Empty,
    #[error("amount contains a sign; negative/positive signs are not allowed")]
    SignNotAllowed,
    #[error("amount contains invalid characters")]
    InvalidCharacters,
    #[error("amount has more than one decimal point")]
    MultipleDecimalPoints,
    #[error("amount has no digits")]
    NoDigits,
    #[error("amount has more than 6 decimal places")]
    TooManyDecimals,
    #[error("amount is too large")]
    Overflow,
}

fn parse_u64_digits(s: &str) -> Result<u64, AmountParseError> {
    if s.is_empty() {
        return Ok(0);
    }
    s.parse::<u64>().map_err(|_| AmountParseError::Overflow)
}

/// Parse a decimal coin string into droplets with no floating-point math.
pub fn parse_coins_to_droplets(input: &str) -> Result<u64, AmountParseError> {
    let s = input.trim();
    if s.is_empty() {
        return Err(AmountParseError::Empty);
    }

    if s.starts_with('-') || s.starts_with('+') {
        return Err(AmountParseError::SignNotAllowed);
    }

    if !s.chars().all(|c| c.is_ascii_digit() || c == '.') {
        return Err(AmountParseError::InvalidCharacters);
    }

    if s.chars().filter(|c| *c == '.').count() > 1 {
        return Err(AmountParseError::MultipleDecimalPoints);
    }

    let (whole_str, frac_str) = s.split_once('.').unwrap_or((s, ""));

    if whole_str.is_empty() && frac_str.is_empty() {
        return Err(AmountParseError::NoDigits);
    }
    if frac_str.len() > DROPLET_DECIMALS {
        return Err(AmountParseError::TooManyDecimals);
    }

    let whole = parse_u64_digits(whole_str)?;
    let whole_droplets = whole
        .checked_mul(DROPLETS_PER_COIN)
        .ok_or(AmountParseError::Overflow)?;

    let frac_droplets = if frac_str.is_empty() {
        0
    } else {
        let padded = format!("{frac_str:0<width$}", width = DROPLET_DECIMALS);
        parse_u64_digits(&padded)?
    };

    whole_droplets
        .checked_add(frac_droplets)
        .ok_or(AmountParseError::Overflow)
}

/// Format a droplet amount as a coin string without trailing zeros.
pub fn format_droplets_as_coins(droplets: u64) -> String {
    let whole = droplets / DROPLETS_PER_COIN;
    let frac = droplets % DROPLETS_PER_COIN;
    if frac == 0 {
        return whole.to_string();
    }

    let frac_str = format!("{frac:0width$}", width = DROPLET_DECIMALS);
    format!("{whole}.{}", frac_str.trim_end_matches('0'))
}
