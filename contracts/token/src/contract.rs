use soroban_sdk::{contract, contractimpl, contractmeta, log, Address, Env, String};
use soroban_token_sdk::{metadata::TokenMetadata, TokenUtils};

use crate::{
    admin::{has_administrator, read_administrator, write_administrator},
    allowance::{read_allowance, spend_allowance, write_allowance},
    balance::{
        change_total_supply, read_balance, read_total_supply, receive_balance, spend_balance,
    },
    error::ContractError,
    metadata::{read_decimal, read_name, read_symbol, write_metadata},
    project::{
        generate_project_id, issue_from_project, read_project, read_project_count, write_project,
    },
    storage_types::{TokenProject, INSTANCE_BUMP_AMOUNT, INSTANCE_LIFETIME_THRESHOLD},
};

// Metadata that is added on to the WASM custom section
contractmeta!(
    key = "Description",
    val = "CarbonX Token (CXB): fungible carbon token backed by verified projects"
);

const MAX_DECIMALS: u32 = 18;

fn check_nonnegative_amount(env: &Env, amount: i128) -> Result<(), ContractError> {
    if amount < 0 {
        log!(env, "CarbonX Token: Negative amount is not allowed: ", amount);
        return Err(ContractError::NegativeAmount);
    }

    Ok(())
}

fn bump_instance(env: &Env) {
    env.storage()
        .instance()
        .extend_ttl(INSTANCE_LIFETIME_THRESHOLD, INSTANCE_BUMP_AMOUNT);
}

#[contract]
pub struct CarbonToken;

#[contractimpl]
impl CarbonToken {
    #[allow(dead_code)]
    pub fn initialize(
        env: Env,
        admin: Address,
        decimal: u32,
        name: String,
        symbol: String,
    ) -> Result<(), ContractError> {
        if has_administrator(&env) {
            log!(&env, "CarbonX Token: Initialize: Already initialized");
            return Err(ContractError::AlreadyInitialized);
        }
        if decimal > MAX_DECIMALS {
            log!(&env, "CarbonX Token: Initialize: Decimal too large: ", decimal);
            return Err(ContractError::InvalidDecimals);
        }

        write_administrator(&env, &admin);
        write_metadata(
            &env,
            TokenMetadata {
                decimal,
                name,
                symbol,
            },
        );
        bump_instance(&env);

        env.events().publish(("initialize", "admin: "), admin);

        Ok(())
    }

    // ---------- Projects ----------

    // Registers a project whose verified tonnes can later back newly minted tokens
    #[allow(dead_code)]
    pub fn add_project(
        env: Env,
        name: String,
        methodology: String,
        location: String,
        total_tonnes: i128,
    ) -> Result<u32, ContractError> {
        let admin = read_administrator(&env)?;
        admin.require_auth();

        if total_tonnes <= 0 || name.len() == 0 {
            log!(&env, "CarbonX Token: Add project: Invalid inputs used");
            return Err(ContractError::InvalidInputs);
        }

        let id = generate_project_id(&env);
        write_project(
            &env,
            &TokenProject {
                id,
                name: name.clone(),
                methodology,
                location,
                total_tonnes,
                issued: 0,
                created_at: env.ledger().timestamp(),
            },
        );
        bump_instance(&env);

        env.events().publish(("add project", "project id: "), id);
        env.events().publish(("add project", "name: "), name);

        Ok(id)
    }

    #[allow(dead_code)]
    pub fn get_project(env: Env, project_id: u32) -> Result<TokenProject, ContractError> {
        read_project(&env, project_id)
    }

    #[allow(dead_code)]
    pub fn project_count(env: Env) -> u32 {
        read_project_count(&env)
    }

    #[allow(dead_code)]
    pub fn mint_from_project(
        env: Env,
        to: Address,
        amount: i128,
        project_id: u32,
    ) -> Result<(), ContractError> {
        let admin = read_administrator(&env)?;
        admin.require_auth();

        if amount <= 0 {
            log!(&env, "CarbonX Token: Mint from project: Amount must be positive");
            return Err(ContractError::InvalidInputs);
        }

        issue_from_project(&env, project_id, amount)?;
        receive_balance(&env, &to, amount)?;
        change_total_supply(&env, amount)?;
        bump_instance(&env);

        TokenUtils::new(&env).events().mint(admin, to, amount);
        env.events()
            .publish(("mint from project", "project id: "), project_id);

        Ok(())
    }

    #[allow(dead_code)]
    pub fn set_admin(env: Env, new_admin: Address) -> Result<(), ContractError> {
        let admin = read_administrator(&env)?;
        admin.require_auth();

        write_administrator(&env, &new_admin);
        bump_instance(&env);

        TokenUtils::new(&env).events().set_admin(admin, new_admin);

        Ok(())
    }

    // ---------- Token interface ----------

    #[allow(dead_code)]
    pub fn allowance(env: Env, from: Address, spender: Address) -> i128 {
        read_allowance(&env, &from, &spender).amount
    }

    #[allow(dead_code)]
    pub fn approve(
        env: Env,
        from: Address,
        spender: Address,
        amount: i128,
        expiration_ledger: u32,
    ) -> Result<(), ContractError> {
        from.require_auth();
        check_nonnegative_amount(&env, amount)?;

        write_allowance(&env, &from, &spender, amount, expiration_ledger)?;
        bump_instance(&env);

        TokenUtils::new(&env)
            .events()
            .approve(from, spender, amount, expiration_ledger);

        Ok(())
    }

    #[allow(dead_code)]
    pub fn balance(env: Env, id: Address) -> i128 {
        read_balance(&env, &id)
    }

    #[allow(dead_code)]
    pub fn total_supply(env: Env) -> i128 {
        read_total_supply(&env)
    }

    #[allow(dead_code)]
    pub fn transfer(env: Env, from: Address, to: Address, amount: i128) -> Result<(), ContractError> {
        from.require_auth();
        check_nonnegative_amount(&env, amount)?;

        spend_balance(&env, &from, amount)?;
        receive_balance(&env, &to, amount)?;
        bump_instance(&env);

        TokenUtils::new(&env).events().transfer(from, to, amount);

        Ok(())
    }

    #[allow(dead_code)]
    pub fn transfer_from(
        env: Env,
        spender: Address,
        from: Address,
        to: Address,
        amount: i128,
    ) -> Result<(), ContractError> {
        spender.require_auth();
        check_nonnegative_amount(&env, amount)?;

        spend_allowance(&env, &from, &spender, amount)?;
        spend_balance(&env, &from, amount)?;
        receive_balance(&env, &to, amount)?;
        bump_instance(&env);

        TokenUtils::new(&env).events().transfer(from, to, amount);

        Ok(())
    }

    #[allow(dead_code)]
    pub fn burn(env: Env, from: Address, amount: i128) -> Result<(), ContractError> {
        from.require_auth();
        check_nonnegative_amount(&env, amount)?;

        spend_balance(&env, &from, amount)?;
        change_total_supply(&env, -amount)?;
        bump_instance(&env);

        TokenUtils::new(&env).events().burn(from, amount);

        Ok(())
    }

    #[allow(dead_code)]
    pub fn burn_from(
        env: Env,
        spender: Address,
        from: Address,
        amount: i128,
    ) -> Result<(), ContractError> {
        spender.require_auth();
        check_nonnegative_amount(&env, amount)?;

        spend_allowance(&env, &from, &spender, amount)?;
        spend_balance(&env, &from, amount)?;
        change_total_supply(&env, -amount)?;
        bump_instance(&env);

        TokenUtils::new(&env).events().burn(from, amount);

        Ok(())
    }

    #[allow(dead_code)]
    pub fn decimals(env: Env) -> u32 {
        read_decimal(&env)
    }

    #[allow(dead_code)]
    pub fn name(env: Env) -> String {
        read_name(&env)
    }

    #[allow(dead_code)]
    pub fn symbol(env: Env) -> String {
        read_symbol(&env)
    }
}
