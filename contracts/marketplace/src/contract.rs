use soroban_sdk::{
    contract, contractimpl, contractmeta, log, vec, Address, BytesN, Env, String, Vec,
};

use crate::{
    error::ContractError,
    storage::{
        add_retired_totals, bump_instance, generate_listing_id, generate_retirement_id,
        generate_token_id, get_balance_of, get_config, get_current_listing_id,
        get_current_token_id, get_listing, get_listing_ids_by_seller, get_project,
        get_retired_by_account, get_retired_for_project, get_retirement,
        get_retirement_ids_by_account, is_initialized, is_issuer, save_config, save_listing,
        save_listing_by_seller, save_project, save_retirement, set_initialized, set_issuer,
        update_balance_of, Config, Listing, ListingStatus, Project, ProjectInfo, Retirement,
        MAX_PLATFORM_FEE_BPS,
    },
    utils::{
        calculate_payment, distribute_funds, move_credits, page_bounds, validate_input_params,
        validate_non_empty,
    },
};

// Metadata that is added on to the WASM custom section
contractmeta!(
    key = "Description",
    val = "CarbonX carbon credit marketplace: mint, trade and retire credits"
);

#[contract]
pub struct CarbonMarketplace;

#[contractimpl]
impl CarbonMarketplace {
    #[allow(dead_code)]
    pub fn initialize(
        env: Env,
        admin: Address,
        payment_token: Address,
        fee_recipient: Address,
        platform_fee_bps: u32,
    ) -> Result<(), ContractError> {
        admin.require_auth();

        if is_initialized(&env) {
            log!(&env, "Marketplace: Initialize: Already initialized");
            return Err(ContractError::AlreadyInitialized);
        }

        if platform_fee_bps > MAX_PLATFORM_FEE_BPS {
            log!(
                &env,
                "Marketplace: Initialize: Platform fee too high: ",
                platform_fee_bps
            );
            return Err(ContractError::InvalidFee);
        }

        save_config(
            &env,
            &Config {
                admin: admin.clone(),
                payment_token,
                fee_recipient,
                platform_fee_bps,
            },
        );
        set_initialized(&env);

        env.events().publish(("initialize", "admin: "), admin);
        env.events()
            .publish(("initialize", "platform fee bps: "), platform_fee_bps);

        Ok(())
    }

    // ---------- Issuers ----------

    #[allow(dead_code)]
    pub fn authorize_issuer(env: Env, issuer: Address) -> Result<(), ContractError> {
        let config = get_config(&env)?;
        config.admin.require_auth();

        set_issuer(&env, &issuer, true);

        env.events()
            .publish(("authorize issuer", "issuer: "), issuer);

        Ok(())
    }

    #[allow(dead_code)]
    pub fn revoke_issuer(env: Env, issuer: Address) -> Result<(), ContractError> {
        let config = get_config(&env)?;
        config.admin.require_auth();

        if !is_issuer(&env, &issuer) {
            log!(&env, "Marketplace: Revoke issuer: Not an issuer: ", issuer);
            return Err(ContractError::IssuerNotAuthorized);
        }

        set_issuer(&env, &issuer, false);

        env.events().publish(("revoke issuer", "issuer: "), issuer);

        Ok(())
    }

    #[allow(dead_code)]
    pub fn is_authorized_issuer(env: Env, issuer: Address) -> bool {
        is_issuer(&env, &issuer)
    }

    // ---------- Projects ----------

    // Registers a new project and returns its token id. Ids start from 1.
    #[allow(dead_code)]
    pub fn create_project(
        env: Env,
        issuer: Address,
        info: ProjectInfo,
    ) -> Result<u64, ContractError> {
        issuer.require_auth();
        get_config(&env)?;

        if !is_issuer(&env, &issuer) {
            log!(
                &env,
                "Marketplace: Create project: Issuer not authorized: ",
                issuer
            );
            return Err(ContractError::IssuerNotAuthorized);
        }

        validate_input_params(&env, &[&info.co2_tonnes])?;
        validate_non_empty(&env, &info.name)?;

        if info.price_per_tonne <= 0 {
            log!(
                &env,
                "Marketplace: Create project: Price per tonne must be positive"
            );
            return Err(ContractError::InvalidInputs);
        }

        let now = env.ledger().timestamp();
        if info.expiry_date != 0 && info.expiry_date <= now {
            log!(
                &env,
                "Marketplace: Create project: Expiry date in the past: ",
                info.expiry_date
            );
            return Err(ContractError::InvalidInputs);
        }

        let token_id = generate_token_id(&env);

        let project = Project {
            token_id,
            name: info.name.clone(),
            methodology: info.methodology,
            co2_tonnes: info.co2_tonnes,
            price_per_tonne: info.price_per_tonne,
            expiry_date: info.expiry_date,
            location: info.location,
            project_type: info.project_type,
            verra_id: info.verra_id,
            metadata_uri: info.metadata_uri,
            issuer: issuer.clone(),
            is_active: true,
            is_toucan_verified: info.is_toucan_verified,
            minted: 0,
            created_at: now,
        };
        save_project(&env, &project);

        env.events()
            .publish(("create project", "token id: "), token_id);
        env.events().publish(("create project", "issuer: "), issuer);
        env.events().publish(("create project", "name: "), info.name);
        env.events()
            .publish(("create project", "co2 tonnes: "), info.co2_tonnes);

        Ok(token_id)
    }

    // Project issuer or admin can pause and resume a project.
    #[allow(dead_code)]
    pub fn set_project_active(
        env: Env,
        sender: Address,
        token_id: u64,
        active: bool,
    ) -> Result<(), ContractError> {
        sender.require_auth();

        let config = get_config(&env)?;
        let mut project = get_project(&env, token_id)?;

        if sender != project.issuer && sender != config.admin {
            log!(
                &env,
                "Marketplace: Set project active: Unauthorized. Sender: ",
                sender
            );
            return Err(ContractError::Unauthorized);
        }

        project.is_active = active;
        save_project(&env, &project);

        env.events()
            .publish(("set project active", "token id: "), token_id);
        env.events()
            .publish(("set project active", "active: "), active);

        Ok(())
    }

    // Mints `amount` credits of project `token_id` to `to`
    #[allow(dead_code)]
    pub fn mint_credits(
        env: Env,
        issuer: Address,
        token_id: u64,
        amount: u64,
        to: Address,
    ) -> Result<(), ContractError> {
        issuer.require_auth();
        validate_input_params(&env, &[&amount])?;

        if to == env.current_contract_address() {
            log!(
                &env,
                "Marketplace: Mint credits: Cannot mint to the marketplace itself"
            );
            return Err(ContractError::InvalidInputs);
        }

        let mut project = get_project(&env, token_id)?;

        if project.issuer != issuer {
            log!(
                &env,
                "Marketplace: Mint credits: Only the project issuer can mint. Sender: ",
                issuer
            );
            return Err(ContractError::Unauthorized);
        }

        if !project.is_active {
            log!(&env, "Marketplace: Mint credits: Project not active");
            return Err(ContractError::ProjectNotActive);
        }

        if project.is_expired(env.ledger().timestamp()) {
            log!(
                &env,
                "Marketplace: Mint credits: Project expired at ",
                project.expiry_date
            );
            return Err(ContractError::ProjectExpired);
        }

        let minted = project
            .minted
            .checked_add(amount)
            .ok_or(ContractError::ArithmeticOverflow)?;
        if minted > project.co2_tonnes {
            log!(
                &env,
                "Marketplace: Mint credits: Exceeds verified tonnes",
                "Already minted: ",
                project.minted,
                "Requested: ",
                amount
            );
            return Err(ContractError::ExceedsProjectSupply);
        }

        let new_balance = get_balance_of(&env, &to, token_id)
            .checked_add(amount)
            .ok_or(ContractError::ArithmeticOverflow)?;
        update_balance_of(&env, &to, token_id, new_balance);

        project.minted = minted;
        save_project(&env, &project);

        env.events().publish(("mint credits", "token id: "), token_id);
        env.events().publish(("mint credits", "to: "), to);
        env.events().publish(("mint credits", "amount: "), amount);

        Ok(())
    }

    // ---------- Balances ----------

    // Returns the balance of the `account` for the token `id`
    #[allow(dead_code)]
    pub fn balance_of(env: Env, account: Address, id: u64) -> u64 {
        get_balance_of(&env, &account, id)
    }

    // Returns the balance of multiple `accounts` for multiple `ids`
    #[allow(dead_code)]
    pub fn balance_of_batch(
        env: Env,
        accounts: Vec<Address>,
        ids: Vec<u64>,
    ) -> Result<Vec<u64>, ContractError> {
        if accounts.len() != ids.len() {
            log!(
                &env,
                "Marketplace: Balance of batch: length missmatch: ",
                "accounts length: ",
                accounts.len(),
                "ids length: ",
                ids.len()
            );
            return Err(ContractError::AccountsIdsLengthMismatch);
        }

        let mut batch_balances: Vec<u64> = vec![&env];

        for idx in 0..accounts.len() {
            let account = accounts
                .get(idx)
                .ok_or(ContractError::InvalidAccountIndex)?;
            let id = ids.get(idx).ok_or(ContractError::InvalidIdIndex)?;

            batch_balances.push_back(get_balance_of(&env, &account, id));
        }

        Ok(batch_balances)
    }

    // Transfers `amount` credits of token type `id` from `from` to `to`
    #[allow(dead_code)]
    pub fn transfer(
        env: Env,
        from: Address,
        to: Address,
        id: u64,
        amount: u64,
    ) -> Result<(), ContractError> {
        from.require_auth();
        validate_input_params(&env, &[&amount])?;

        if from == to {
            log!(&env, "Marketplace: Transfer: Sender and recipient are equal");
            return Err(ContractError::CannotTransferToSelf);
        }

        if to == env.current_contract_address() {
            log!(
                &env,
                "Marketplace: Transfer: Credits can only enter escrow through a listing"
            );
            return Err(ContractError::InvalidInputs);
        }

        move_credits(&env, &from, &to, id, amount)?;

        env.events().publish(("transfer", "from: "), from);
        env.events().publish(("transfer", "to: "), to);
        env.events().publish(("transfer", "id: "), id);
        env.events().publish(("transfer", "amount: "), amount);

        Ok(())
    }

    // ---------- Listings ----------

    // Escrows `amount` credits and offers them at a fixed price for `duration` seconds.
    #[allow(dead_code)]
    pub fn list_credits(
        env: Env,
        seller: Address,
        token_id: u64,
        amount: u64,
        price_per_credit: i128,
        duration: u64,
    ) -> Result<u64, ContractError> {
        seller.require_auth();
        get_config(&env)?;

        validate_input_params(&env, &[&amount, &duration])?;
        if price_per_credit <= 0 {
            log!(
                &env,
                "Marketplace: List credits: Price per credit must be positive"
            );
            return Err(ContractError::InvalidInputs);
        }

        let project = get_project(&env, token_id)?;
        if !project.is_active {
            log!(&env, "Marketplace: List credits: Project not active");
            return Err(ContractError::ProjectNotActive);
        }

        move_credits(
            &env,
            &seller,
            &env.current_contract_address(),
            token_id,
            amount,
        )?;

        let listed_at = env.ledger().timestamp();
        let listing_id = generate_listing_id(&env);

        let listing = Listing {
            listing_id,
            token_id,
            amount,
            price_per_credit,
            seller: seller.clone(),
            status: ListingStatus::Active,
            listed_at,
            expires_at: listed_at.saturating_add(duration),
        };

        save_listing(&env, &listing);
        save_listing_by_seller(&env, &seller, listing_id);

        env.events()
            .publish(("list credits", "listing id: "), listing_id);
        env.events().publish(("list credits", "seller: "), seller);
        env.events().publish(("list credits", "token id: "), token_id);
        env.events().publish(("list credits", "amount: "), amount);
        env.events()
            .publish(("list credits", "price per credit: "), price_per_credit);

        Ok(listing_id)
    }

    // Buys `amount` credits out of an active listing, partial fills are allowed
    #[allow(dead_code)]
    pub fn buy_credits(
        env: Env,
        buyer: Address,
        listing_id: u64,
        amount: u64,
    ) -> Result<(), ContractError> {
        buyer.require_auth();
        validate_input_params(&env, &[&amount])?;

        let config = get_config(&env)?;
        let mut listing = get_listing(&env, listing_id)?;

        if listing.status != ListingStatus::Active {
            log!(
                &env,
                "Marketplace: Buy credits: Trying to buy from an inactive listing."
            );
            return Err(ContractError::ListingNotActive);
        }

        if listing.is_expired(env.ledger().timestamp()) {
            log!(
                &env,
                "Marketplace: Buy credits: Listing expired at ",
                listing.expires_at
            );
            return Err(ContractError::ListingExpired);
        }

        if listing.seller == buyer {
            log!(&env, "Marketplace: Buy credits: Seller cannot buy own listing");
            return Err(ContractError::SellerCannotBuy);
        }

        if amount > listing.amount {
            log!(
                &env,
                "Marketplace: Buy credits: Amount exceeds listing",
                "Available: ",
                listing.amount,
                "Requested: ",
                amount
            );
            return Err(ContractError::AmountExceedsListing);
        }

        let (seller_share, fee) =
            calculate_payment(&env, &listing, amount, config.platform_fee_bps)?;

        distribute_funds(&env, &config, &buyer, &listing.seller, seller_share, fee);

        move_credits(
            &env,
            &env.current_contract_address(),
            &buyer,
            listing.token_id,
            amount,
        )?;

        listing.amount -= amount;
        if listing.amount == 0 {
            listing.status = ListingStatus::Sold;
        }
        save_listing(&env, &listing);

        env.events()
            .publish(("buy credits", "listing id: "), listing_id);
        env.events().publish(("buy credits", "buyer: "), buyer);
        env.events().publish(("buy credits", "amount: "), amount);
        env.events()
            .publish(("buy credits", "total price: "), seller_share + fee);

        Ok(())
    }

    // Seller withdraws a listing and takes back whatever is left in escrow
    #[allow(dead_code)]
    pub fn cancel_listing(env: Env, seller: Address, listing_id: u64) -> Result<(), ContractError> {
        seller.require_auth();

        let mut listing = get_listing(&env, listing_id)?;

        if listing.seller != seller {
            log!(
                &env,
                "Marketplace: Cancel listing: Unauthorized. Sender: ",
                seller
            );
            return Err(ContractError::Unauthorized);
        }

        if listing.status != ListingStatus::Active {
            log!(
                &env,
                "Marketplace: Cancel listing: Cannot cancel an inactive listing."
            );
            return Err(ContractError::ListingNotActive);
        }

        move_credits(
            &env,
            &env.current_contract_address(),
            &seller,
            listing.token_id,
            listing.amount,
        )?;

        listing.status = ListingStatus::Cancelled;
        save_listing(&env, &listing);

        env.events()
            .publish(("cancel listing", "listing id: "), listing_id);
        env.events()
            .publish(("cancel listing", "returned amount: "), listing.amount);

        Ok(())
    }

    // ---------- Retirement ----------

    // Permanently burns credits on behalf of `account` and records why.
    #[allow(dead_code)]
    pub fn retire_credits(
        env: Env,
        account: Address,
        token_id: u64,
        amount: u64,
        reason: String,
    ) -> Result<u64, ContractError> {
        account.require_auth();
        validate_input_params(&env, &[&amount])?;
        validate_non_empty(&env, &reason)?;

        get_project(&env, token_id)?;

        let current_balance = get_balance_of(&env, &account, token_id);
        if current_balance < amount {
            log!(
                &env,
                "Marketplace: Retire credits: Insufficient Balance",
                "Available balance: ",
                current_balance,
                "Amount to retire: ",
                amount
            );
            return Err(ContractError::InsufficientBalance);
        }

        update_balance_of(&env, &account, token_id, current_balance - amount);
        add_retired_totals(&env, &account, token_id, amount)?;

        let id = generate_retirement_id(&env);
        save_retirement(
            &env,
            &Retirement {
                id,
                account: account.clone(),
                token_id,
                amount,
                reason: reason.clone(),
                retired_at: env.ledger().timestamp(),
            },
        );

        env.events().publish(("retire credits", "retirement id: "), id);
        env.events().publish(("retire credits", "account: "), account);
        env.events().publish(("retire credits", "token id: "), token_id);
        env.events().publish(("retire credits", "amount: "), amount);
        env.events().publish(("retire credits", "reason: "), reason);

        Ok(id)
    }

    #[allow(dead_code)]
    pub fn get_retirement_history(env: Env, account: Address) -> Vec<Retirement> {
        let mut history = vec![&env];

        for id in get_retirement_ids_by_account(&env, &account).iter() {
            if let Some(retirement) = get_retirement(&env, id) {
                history.push_back(retirement);
            }
        }

        history
    }

    #[allow(dead_code)]
    pub fn get_total_retired_by_user(env: Env, account: Address) -> u64 {
        get_retired_by_account(&env, &account)
    }

    #[allow(dead_code)]
    pub fn get_total_retired_for_project(env: Env, token_id: u64) -> u64 {
        get_retired_for_project(&env, token_id)
    }

    // ---------- Queries ----------

    #[allow(dead_code)]
    pub fn get_project(env: Env, token_id: u64) -> Result<Project, ContractError> {
        get_project(&env, token_id)
    }

    #[allow(dead_code)]
    pub fn query_projects(
        env: Env,
        start_index: Option<u64>,
        limit: Option<u32>,
    ) -> Result<Vec<Project>, ContractError> {
        let mut projects = vec![&env];

        if let Some((first, last)) = page_bounds(start_index, limit, get_current_token_id(&env)) {
            for id in first..=last {
                projects.push_back(get_project(&env, id)?);
            }
        }

        Ok(projects)
    }

    #[allow(dead_code)]
    pub fn is_toucan_credit(env: Env, token_id: u64) -> Result<bool, ContractError> {
        Ok(get_project(&env, token_id)?.is_toucan_verified)
    }

    #[allow(dead_code)]
    pub fn get_current_token_id(env: Env) -> u64 {
        get_current_token_id(&env)
    }

    #[allow(dead_code)]
    pub fn get_listing(env: Env, listing_id: u64) -> Result<Listing, ContractError> {
        get_listing(&env, listing_id)
    }

    // Listings that can still be bought within the id window `start_index..start_index + limit`.
    // A page may hold fewer than `limit` entries, callers keep paging up to the current id.
    #[allow(dead_code)]
    pub fn query_active_listings(
        env: Env,
        start_index: Option<u64>,
        limit: Option<u32>,
    ) -> Result<Vec<Listing>, ContractError> {
        let mut active = vec![&env];
        let now = env.ledger().timestamp();

        if let Some((first, last)) = page_bounds(start_index, limit, get_current_listing_id(&env))
        {
            for id in first..=last {
                let listing = get_listing(&env, id)?;
                if listing.is_open(now) {
                    active.push_back(listing);
                }
            }
        }

        Ok(active)
    }

    // Every listing the seller ever created, paged by position in the seller's own history.
    #[allow(dead_code)]
    pub fn query_listings_by_seller(
        env: Env,
        seller: Address,
        start_index: Option<u64>,
        limit: Option<u32>,
    ) -> Result<Vec<Listing>, ContractError> {
        let mut listings = vec![&env];
        let listing_ids = get_listing_ids_by_seller(&env, &seller);

        if let Some((first, last)) = page_bounds(start_index, limit, listing_ids.len() as u64) {
            for position in first..=last {
                if let Some(id) = listing_ids.get((position - 1) as u32) {
                    listings.push_back(get_listing(&env, id)?);
                }
            }
        }

        Ok(listings)
    }

    #[allow(dead_code)]
    pub fn get_current_listing_id(env: Env) -> u64 {
        get_current_listing_id(&env)
    }

    // ---------- Admin ----------

    #[allow(dead_code)]
    pub fn update_platform_fee(env: Env, platform_fee_bps: u32) -> Result<(), ContractError> {
        let mut config = get_config(&env)?;
        config.admin.require_auth();

        if platform_fee_bps > MAX_PLATFORM_FEE_BPS {
            log!(
                &env,
                "Marketplace: Update platform fee: Fee too high: ",
                platform_fee_bps
            );
            return Err(ContractError::InvalidFee);
        }

        config.platform_fee_bps = platform_fee_bps;
        save_config(&env, &config);

        env.events()
            .publish(("update platform fee", "bps: "), platform_fee_bps);

        Ok(())
    }

    #[allow(dead_code)]
    pub fn update_fee_recipient(env: Env, fee_recipient: Address) -> Result<(), ContractError> {
        let mut config = get_config(&env)?;
        config.admin.require_auth();

        config.fee_recipient = fee_recipient.clone();
        save_config(&env, &config);

        env.events()
            .publish(("update fee recipient", "recipient: "), fee_recipient);

        Ok(())
    }

    #[allow(dead_code)]
    pub fn update_admin(env: Env, new_admin: Address) -> Result<Address, ContractError> {
        let mut config = get_config(&env)?;
        config.admin.require_auth();

        config.admin = new_admin.clone();
        save_config(&env, &config);

        env.events()
            .publish(("update admin", "new admin: "), new_admin.clone());

        Ok(new_admin)
    }

    #[allow(dead_code)]
    pub fn upgrade(env: Env, new_wasm_hash: BytesN<32>) -> Result<(), ContractError> {
        let config = get_config(&env)?;
        config.admin.require_auth();

        env.deployer().update_current_contract_wasm(new_wasm_hash);
        bump_instance(&env);

        Ok(())
    }

    pub fn show_config(env: Env) -> Result<Config, ContractError> {
        get_config(&env)
    }
}
