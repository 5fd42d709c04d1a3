use soroban_sdk::{log, Address, Env};

use crate::{
    error::ContractError,
    storage_types::{AllowanceDataKey, AllowanceValue, DataKey},
};

pub fn read_allowance(env: &Env, from: &Address, spender: &Address) -> AllowanceValue {
    let key = DataKey::Allowance(AllowanceDataKey {
        from: from.clone(),
        spender: spender.clone(),
    });

    match env.storage().temporary().get::<_, AllowanceValue>(&key) {
        Some(allowance) if allowance.expiration_ledger >= env.ledger().sequence() => allowance,
        Some(allowance) => AllowanceValue {
            amount: 0,
            expiration_ledger: allowance.expiration_ledger,
        },
        None => AllowanceValue {
            amount: 0,
            expiration_ledger: 0,
        },
    }
}

pub fn write_allowance(
    env: &Env,
    from: &Address,
    spender: &Address,
    amount: i128,
    expiration_ledger: u32,
) -> Result<(), ContractError> {
    if amount > 0 && expiration_ledger < env.ledger().sequence() {
        log!(
            env,
            "CarbonX Token: Write allowance: Expiration ledger in the past: ",
            expiration_ledger
        );
        return Err(ContractError::InvalidExpirationLedger);
    }

    let key = DataKey::Allowance(AllowanceDataKey {
        from: from.clone(),
        spender: spender.clone(),
    });
    env.storage().temporary().set(
        &key,
        &AllowanceValue {
            amount,
            expiration_ledger,
        },
    );

    if amount > 0 {
        let live_for = expiration_ledger - env.ledger().sequence();
        env.storage().temporary().extend_ttl(&key, live_for, live_for);
    }

    Ok(())
}

pub fn spend_allowance(
    env: &Env,
    from: &Address,
    spender: &Address,
    amount: i128,
) -> Result<(), ContractError> {
    let allowance = read_allowance(env, from, spender);
    if allowance.amount < amount {
        log!(
            env,
            "CarbonX Token: Spend allowance: Insufficient allowance",
            "Allowed: ",
            allowance.amount,
            "Requested: ",
            amount
        );
        return Err(ContractError::InsufficientAllowance);
    }

    if amount > 0 {
        write_allowance(
            env,
            from,
            spender,
            allowance.amount - amount,
            allowance.expiration_ledger,
        )?;
    }

    Ok(())
}
