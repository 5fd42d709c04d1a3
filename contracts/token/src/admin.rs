use soroban_sdk::{log, Address, Env};

use crate::{error::ContractError, storage_types::DataKey};

pub fn has_administrator(env: &Env) -> bool {
    env.storage().instance().has(&DataKey::Admin)
}

pub fn read_administrator(env: &Env) -> Result<Address, ContractError> {
    env.storage()
        .instance()
        .get(&DataKey::Admin)
        .ok_or_else(|| {
            log!(env, "CarbonX Token: Read administrator: Not initialized");
            ContractError::NotInitialized
        })
}

pub fn write_administrator(env: &Env, id: &Address) {
    env.storage().instance().set(&DataKey::Admin, id);
}
