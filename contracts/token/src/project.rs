use soroban_sdk::{log, Env};

use crate::{
    error::ContractError,
    storage_types::{DataKey, TokenProject, BALANCE_BUMP_AMOUNT, BALANCE_LIFETIME_THRESHOLD},
};

pub fn read_project_count(env: &Env) -> u32 {
    env.storage()
        .instance()
        .get(&DataKey::ProjectCount)
        .unwrap_or(0)
}

// Project ids start from 0 and follow registration order.
pub fn generate_project_id(env: &Env) -> u32 {
    let id = read_project_count(env);
    env.storage().instance().set(&DataKey::ProjectCount, &(id + 1));

    id
}

pub fn read_project(env: &Env, id: u32) -> Result<TokenProject, ContractError> {
    let key = DataKey::Project(id);
    let project = env
        .storage()
        .persistent()
        .get(&key)
        .ok_or_else(|| {
            log!(env, "CarbonX Token: Read project: No project with id ", id);
            ContractError::ProjectNotFound
        })?;
    env.storage()
        .persistent()
        .extend_ttl(&key, BALANCE_LIFETIME_THRESHOLD, BALANCE_BUMP_AMOUNT);

    Ok(project)
}

pub fn write_project(env: &Env, project: &TokenProject) {
    let key = DataKey::Project(project.id);
    env.storage().persistent().set(&key, project);
    env.storage()
        .persistent()
        .extend_ttl(&key, BALANCE_LIFETIME_THRESHOLD, BALANCE_BUMP_AMOUNT);
}

/// Books `amount` against the project's verified tonnes.
pub fn issue_from_project(env: &Env, id: u32, amount: i128) -> Result<(), ContractError> {
    let mut project = read_project(env, id)?;

    let issued = project
        .issued
        .checked_add(amount)
        .ok_or(ContractError::ArithmeticOverflow)?;
    if issued > project.total_tonnes {
        log!(
            env,
            "CarbonX Token: Issue from project: Exceeds verified tonnes",
            "Issued: ",
            project.issued,
            "Requested: ",
            amount
        );
        return Err(ContractError::ExceedsProjectTonnes);
    }

    project.issued = issued;
    write_project(env, &project);

    Ok(())
}
