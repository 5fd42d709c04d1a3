//! Conversions between human readable decimal amounts (`"1.5"`) and the integer base units
//! stored on chain. `decimals` is the number of fractional digits of the unit, e.g. `7` for
//! Stellar assets.

use soroban_sdk::{Env, String};

use crate::error::ContractError;

pub const MAX_UNIT_DECIMALS: u32 = 18;

// sign + 39 digits of u128::MAX + separator + leading zeros of the fraction
const FORMAT_BUFFER_LEN: usize = 64;

/// Parses `value` into base units. Rejects malformed input and more fractional digits than
/// `decimals` allows.
pub fn parse_units(value: &str, decimals: u32) -> Result<i128, ContractError> {
    if decimals > MAX_UNIT_DECIMALS {
        return Err(ContractError::InvalidInputs);
    }

    let (negative, digits) = match value.strip_prefix('-') {
        Some(rest) => (true, rest),
        None => (false, value),
    };
    let (whole, fraction) = digits.split_once('.').unwrap_or((digits, ""));

    if whole.is_empty() && fraction.is_empty() {
        return Err(ContractError::InvalidInputs);
    }
    if fraction.len() > decimals as usize {
        return Err(ContractError::InvalidInputs);
    }

    let mut amount: i128 = 0;
    for byte in whole.bytes().chain(fraction.bytes()) {
        if !byte.is_ascii_digit() {
            return Err(ContractError::InvalidInputs);
        }
        amount = amount
            .checked_mul(10)
            .and_then(|amount| amount.checked_add((byte - b'0') as i128))
            .ok_or(ContractError::ArithmeticOverflow)?;
    }
    for _ in fraction.len()..decimals as usize {
        amount = amount
            .checked_mul(10)
            .ok_or(ContractError::ArithmeticOverflow)?;
    }

    Ok(if negative { -amount } else { amount })
}

/// Renders base units as a decimal string. Trailing fractional zeros are dropped but one
/// fractional digit is always kept, `10_000_000` with 7 decimals reads `"1.0"`.
pub fn format_units(env: &Env, amount: i128, decimals: u32) -> Result<String, ContractError> {
    if decimals > MAX_UNIT_DECIMALS {
        return Err(ContractError::InvalidInputs);
    }

    let mut buffer = [0u8; FORMAT_BUFFER_LEN];
    let mut start = FORMAT_BUFFER_LEN;
    let mut separator = None;
    let mut value = amount.unsigned_abs();
    let mut written = 0u32;

    loop {
        start -= 1;
        buffer[start] = b'0' + (value % 10) as u8;
        value /= 10;
        written += 1;

        if written == decimals {
            start -= 1;
            buffer[start] = b'.';
            separator = Some(start);
        }
        if value == 0 && written > decimals {
            break;
        }
    }

    if amount < 0 {
        start -= 1;
        buffer[start] = b'-';
    }

    let mut end = FORMAT_BUFFER_LEN;
    if let Some(separator) = separator {
        while end > separator + 2 && buffer[end - 1] == b'0' {
            end -= 1;
        }
    }

    let formatted =
        core::str::from_utf8(&buffer[start..end]).map_err(|_| ContractError::InvalidInputs)?;

    Ok(String::from_str(env, formatted))
}
