use soroban_sdk::{log, Address, Env};

use crate::{
    error::ContractError,
    storage_types::{DataKey, BALANCE_BUMP_AMOUNT, BALANCE_LIFETIME_THRESHOLD},
};

pub fn read_balance(env: &Env, addr: &Address) -> i128 {
    let key = DataKey::Balance(addr.clone());
    if let Some(balance) = env.storage().persistent().get::<_, i128>(&key) {
        env.storage()
            .persistent()
            .extend_ttl(&key, BALANCE_LIFETIME_THRESHOLD, BALANCE_BUMP_AMOUNT);
        balance
    } else {
        0
    }
}

fn write_balance(env: &Env, addr: &Address, amount: i128) {
    let key = DataKey::Balance(addr.clone());
    env.storage().persistent().set(&key, &amount);
    env.storage()
        .persistent()
        .extend_ttl(&key, BALANCE_LIFETIME_THRESHOLD, BALANCE_BUMP_AMOUNT);
}

pub fn receive_balance(env: &Env, addr: &Address, amount: i128) -> Result<(), ContractError> {
    let balance = read_balance(env, addr)
        .checked_add(amount)
        .ok_or(ContractError::ArithmeticOverflow)?;
    write_balance(env, addr, balance);

    Ok(())
}

pub fn spend_balance(env: &Env, addr: &Address, amount: i128) -> Result<(), ContractError> {
    let balance = read_balance(env, addr);
    if balance < amount {
        log!(
            env,
            "CarbonX Token: Spend balance: Insufficient Balance",
            "Available balance: ",
            balance,
            "Amount to spend: ",
            amount
        );
        return Err(ContractError::InsufficientBalance);
    }
    write_balance(env, addr, balance - amount);

    Ok(())
}

pub fn read_total_supply(env: &Env) -> i128 {
    env.storage()
        .instance()
        .get(&DataKey::TotalSupply)
        .unwrap_or(0)
}

pub fn change_total_supply(env: &Env, delta: i128) -> Result<(), ContractError> {
    let supply = read_total_supply(env)
        .checked_add(delta)
        .ok_or(ContractError::ArithmeticOverflow)?;
    env.storage().instance().set(&DataKey::TotalSupply, &supply);

    Ok(())
}
