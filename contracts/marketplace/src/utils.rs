use soroban_sdk::{log, token, Address, Env, String};

use crate::{
    error::ContractError,
    storage::{
        get_balance_of, update_balance_of, Config, Listing, BPS_DENOMINATOR, DEFAULT_INDEX,
        DEFAULT_LIMIT, MAX_LIMIT,
    },
};

/// Price owed for `amount` credits of `listing`, split into `(seller_share, platform_fee)`.
pub fn calculate_payment(
    env: &Env,
    listing: &Listing,
    amount: u64,
    platform_fee_bps: u32,
) -> Result<(i128, i128), ContractError> {
    let total = listing
        .price_per_credit
        .checked_mul(amount as i128)
        .ok_or_else(|| {
            log!(env, "Marketplace: Calculate payment: Total price overflow");
            ContractError::ArithmeticOverflow
        })?;

    let fee = total
        .checked_mul(platform_fee_bps as i128)
        .ok_or(ContractError::ArithmeticOverflow)?
        / BPS_DENOMINATOR;

    Ok((total - fee, fee))
}

pub fn distribute_funds(
    env: &Env,
    config: &Config,
    buyer: &Address,
    seller: &Address,
    seller_share: i128,
    fee: i128,
) {
    let token = token::Client::new(env, &config.payment_token);

    if seller_share > 0 {
        token.transfer(buyer, seller, &seller_share);
    }
    if fee > 0 {
        token.transfer(buyer, &config.fee_recipient, &fee);
    }
}

/// Moves `amount` credits of token `id` between two holders, the escrow included.
pub fn move_credits(
    env: &Env,
    from: &Address,
    to: &Address,
    id: u64,
    amount: u64,
) -> Result<(), ContractError> {
    let from_balance = get_balance_of(env, from, id);

    if from_balance < amount {
        log!(
            env,
            "Marketplace: Move credits: Insufficient Balance",
            "Available balance: ",
            from_balance,
            "Amount to send: ",
            amount
        );
        return Err(ContractError::InsufficientBalance);
    }

    let rcpt_balance = get_balance_of(env, to, id)
        .checked_add(amount)
        .ok_or(ContractError::ArithmeticOverflow)?;

    // first we reduce `from` balance
    update_balance_of(env, from, id, from_balance - amount);

    // next we increase `to` balance
    update_balance_of(env, to, id, rcpt_balance);

    Ok(())
}

pub fn validate_input_params(env: &Env, values_to_check: &[&u64]) -> Result<(), ContractError> {
    if values_to_check.iter().any(|value| **value < 1) {
        log!(env, "Marketplace: Validate input: Invalid inputs used");
        return Err(ContractError::InvalidInputs);
    }

    Ok(())
}

pub fn validate_non_empty(env: &Env, value: &String) -> Result<(), ContractError> {
    if value.len() == 0 {
        log!(env, "Marketplace: Validate input: Empty string not allowed");
        return Err(ContractError::InvalidInputs);
    }

    Ok(())
}

/// Resolves pagination arguments into an inclusive `(first, last)` id range, bounded by
/// `current_id`. Returns `None` when the range is empty.
pub fn page_bounds(
    start_index: Option<u64>,
    limit: Option<u32>,
    current_id: u64,
) -> Option<(u64, u64)> {
    let first = start_index.unwrap_or(DEFAULT_INDEX).max(DEFAULT_INDEX);
    let limit = limit.unwrap_or(DEFAULT_LIMIT).min(MAX_LIMIT) as u64;

    if limit == 0 || first > current_id {
        return None;
    }

    let last = first.saturating_add(limit - 1).min(current_id);

    Some((first, last))
}

#[cfg(test)]
mod tests {
    use super::page_bounds;

    #[test]
    fn page_bounds_defaults_to_first_page() {
        assert_eq!(page_bounds(None, None, 25), Some((1, 10)));
    }

    #[test]
    fn page_bounds_is_clamped_by_current_id() {
        assert_eq!(page_bounds(Some(8), Some(5), 10), Some((8, 10)));
    }

    #[test]
    fn page_bounds_clamps_limit_and_start() {
        assert_eq!(page_bounds(Some(0), Some(500), 100), Some((1, 50)));
    }

    #[test]
    fn page_bounds_empty_when_out_of_range() {
        assert_eq!(page_bounds(Some(11), None, 10), None);
        assert_eq!(page_bounds(None, Some(0), 10), None);
        assert_eq!(page_bounds(None, None, 0), None);
    }
}
