use core::fmt::Debug;

use soroban_sdk::{
    contracttype, log, vec, Address, Env, IntoVal, Map, String, TryFromVal, Val, Vec,
};

use crate::{
    error::ContractError,
    ttl::{BALANCE_BUMP_AMOUNT, BALANCE_LIFETIME_THRESHOLD, BUMP_AMOUNT, LIFETIME_THRESHOLD},
};

type TokenId = u64;
type Balance = u64;

// consts for Pagination
// since we start counting from 1, default would be 1 as well
pub const DEFAULT_INDEX: u64 = 1;
pub const DEFAULT_LIMIT: u32 = 10;
pub const MAX_LIMIT: u32 = 50;

pub const BPS_DENOMINATOR: i128 = 10_000;
// 10%
pub const MAX_PLATFORM_FEE_BPS: u32 = 1_000;

#[contracttype]
#[derive(Clone)]
pub enum DataKey {
    IsInitialized,
    Config,
    TokenId,
    ListingId,
    RetirementId,
    Issuer(Address),
    Project(u64),
    Listing(u64),
    Balance(Address),
    SellerListings(Address),
    Retirement(u64),
    AccountRetirements(Address),
    RetiredByAccount(Address),
    RetiredForProject(u64),
}

#[derive(Clone, Debug, PartialEq)]
#[contracttype]
pub struct Config {
    pub admin: Address,
    /// Token every purchase is settled in
    pub payment_token: Address,
    pub fee_recipient: Address,
    pub platform_fee_bps: u32,
}

/// Issuer supplied description of a reduction project.
///
/// * `price_per_tonne` - reference price, denominated in the payment token's base units
/// * `expiry_date` - unix timestamp after which no more credits can be minted, `0` for none
/// * `verra_id` - registry identifier, e.g. `VCS-1396`
#[derive(Clone, Debug, PartialEq)]
#[contracttype]
pub struct ProjectInfo {
    pub name: String,
    pub methodology: String,
    pub co2_tonnes: u64,
    pub price_per_tonne: i128,
    pub expiry_date: u64,
    pub location: String,
    pub project_type: String,
    pub verra_id: String,
    pub metadata_uri: String,
    pub is_toucan_verified: bool,
}

#[derive(Clone, Debug, PartialEq)]
#[contracttype]
pub struct Project {
    pub token_id: u64,
    pub name: String,
    pub methodology: String,
    pub co2_tonnes: u64,
    pub price_per_tonne: i128,
    pub expiry_date: u64,
    pub location: String,
    pub project_type: String,
    pub verra_id: String,
    pub metadata_uri: String,
    pub issuer: Address,
    pub is_active: bool,
    pub is_toucan_verified: bool,
    pub minted: u64,
    pub created_at: u64,
}

impl Project {
    pub fn is_expired(&self, now: u64) -> bool {
        self.expiry_date != 0 && now >= self.expiry_date
    }
}

#[derive(Clone, PartialEq, Debug)]
#[contracttype]
pub enum ListingStatus {
    Active,
    Sold,
    Cancelled,
}

#[derive(Clone, Debug, PartialEq)]
#[contracttype]
pub struct Listing {
    pub listing_id: u64,
    pub token_id: u64,
    /// Credits still held in escrow for this listing
    pub amount: u64,
    pub price_per_credit: i128,
    pub seller: Address,
    pub status: ListingStatus,
    pub listed_at: u64,
    pub expires_at: u64,
}

impl Listing {
    pub fn is_expired(&self, now: u64) -> bool {
        now >= self.expires_at
    }

    pub fn is_open(&self, now: u64) -> bool {
        self.status == ListingStatus::Active && !self.is_expired(now)
    }
}

#[derive(Clone, Debug, PartialEq)]
#[contracttype]
pub struct Retirement {
    pub id: u64,
    pub account: Address,
    pub token_id: u64,
    pub amount: u64,
    pub reason: String,
    pub retired_at: u64,
}

fn read_persistent<V>(env: &Env, key: &DataKey) -> Option<V>
where
    V: TryFromVal<Env, Val>,
    V::Error: Debug,
{
    let value = env.storage().persistent().get(key);
    if value.is_some() {
        env.storage()
            .persistent()
            .extend_ttl(key, LIFETIME_THRESHOLD, BUMP_AMOUNT);
    }

    value
}

fn write_persistent<V>(env: &Env, key: &DataKey, value: &V)
where
    V: IntoVal<Env, Val>,
{
    env.storage().persistent().set(key, value);
    env.storage()
        .persistent()
        .extend_ttl(key, LIFETIME_THRESHOLD, BUMP_AMOUNT);
}

pub fn bump_instance(env: &Env) {
    env.storage()
        .instance()
        .extend_ttl(LIFETIME_THRESHOLD, BUMP_AMOUNT);
}

pub fn is_initialized(env: &Env) -> bool {
    env.storage()
        .persistent()
        .get(&DataKey::IsInitialized)
        .unwrap_or(false)
}

pub fn set_initialized(env: &Env) {
    write_persistent(env, &DataKey::IsInitialized, &true);
}

pub fn save_config(env: &Env, config: &Config) {
    env.storage().instance().set(&DataKey::Config, config);
    bump_instance(env);
}

pub fn get_config(env: &Env) -> Result<Config, ContractError> {
    let config = env
        .storage()
        .instance()
        .get(&DataKey::Config)
        .ok_or_else(|| {
            log!(env, "Marketplace: Get config: Contract not initialized");
            ContractError::NotInitialized
        })?;
    bump_instance(env);

    Ok(config)
}

fn next_id(env: &Env, key: &DataKey) -> u64 {
    let id = env
        .storage()
        .instance()
        .get::<_, u64>(key)
        .unwrap_or_default()
        + 1u64;
    env.storage().instance().set(key, &id);
    bump_instance(env);

    id
}

pub fn generate_token_id(env: &Env) -> u64 {
    next_id(env, &DataKey::TokenId)
}

pub fn generate_listing_id(env: &Env) -> u64 {
    next_id(env, &DataKey::ListingId)
}

pub fn generate_retirement_id(env: &Env) -> u64 {
    next_id(env, &DataKey::RetirementId)
}

pub fn get_current_token_id(env: &Env) -> u64 {
    env.storage()
        .instance()
        .get(&DataKey::TokenId)
        .unwrap_or_default()
}

pub fn get_current_listing_id(env: &Env) -> u64 {
    env.storage()
        .instance()
        .get(&DataKey::ListingId)
        .unwrap_or_default()
}

pub fn set_issuer(env: &Env, issuer: &Address, authorized: bool) {
    let key = DataKey::Issuer(issuer.clone());
    if authorized {
        write_persistent(env, &key, &true);
    } else {
        env.storage().persistent().remove(&key);
    }
}

pub fn is_issuer(env: &Env, issuer: &Address) -> bool {
    read_persistent(env, &DataKey::Issuer(issuer.clone())).unwrap_or(false)
}

pub fn save_project(env: &Env, project: &Project) {
    write_persistent(env, &DataKey::Project(project.token_id), project);
}

pub fn get_project(env: &Env, token_id: u64) -> Result<Project, ContractError> {
    read_persistent(env, &DataKey::Project(token_id)).ok_or_else(|| {
        log!(env, "Marketplace: Get project: No project with id ", token_id);
        ContractError::ProjectNotFound
    })
}

pub fn save_listing(env: &Env, listing: &Listing) {
    write_persistent(env, &DataKey::Listing(listing.listing_id), listing);
}

pub fn get_listing(env: &Env, listing_id: u64) -> Result<Listing, ContractError> {
    read_persistent(env, &DataKey::Listing(listing_id)).ok_or_else(|| {
        log!(env, "Marketplace: Get listing: No listing with id ", listing_id);
        ContractError::ListingNotFound
    })
}

pub fn save_listing_by_seller(env: &Env, seller: &Address, listing_id: u64) {
    let key = DataKey::SellerListings(seller.clone());
    let mut listing_ids: Vec<u64> = read_persistent(env, &key).unwrap_or(vec![env]);
    listing_ids.push_back(listing_id);

    write_persistent(env, &key, &listing_ids);
}

pub fn get_listing_ids_by_seller(env: &Env, seller: &Address) -> Vec<u64> {
    read_persistent(env, &DataKey::SellerListings(seller.clone())).unwrap_or(vec![env])
}

pub fn get_balance_of(env: &Env, owner: &Address, id: u64) -> u64 {
    let key = DataKey::Balance(owner.clone());
    let Some(balance_map) = env
        .storage()
        .persistent()
        .get::<_, Map<TokenId, Balance>>(&key)
    else {
        return 0;
    };

    env.storage()
        .persistent()
        .extend_ttl(&key, BALANCE_LIFETIME_THRESHOLD, BALANCE_BUMP_AMOUNT);

    balance_map.get(id).unwrap_or(0u64)
}

pub fn update_balance_of(env: &Env, owner: &Address, id: u64, new_amount: u64) {
    let key = DataKey::Balance(owner.clone());
    let mut balance_map: Map<TokenId, Balance> = env
        .storage()
        .persistent()
        .get(&key)
        .unwrap_or(Map::new(env));

    if new_amount == 0 {
        balance_map.remove(id);
    } else {
        balance_map.set(id, new_amount);
    }

    env.storage().persistent().set(&key, &balance_map);
    env.storage()
        .persistent()
        .extend_ttl(&key, BALANCE_LIFETIME_THRESHOLD, BALANCE_BUMP_AMOUNT);
}

pub fn save_retirement(env: &Env, retirement: &Retirement) {
    write_persistent(env, &DataKey::Retirement(retirement.id), retirement);

    let key = DataKey::AccountRetirements(retirement.account.clone());
    let mut ids: Vec<u64> = read_persistent(env, &key).unwrap_or(vec![env]);
    ids.push_back(retirement.id);
    write_persistent(env, &key, &ids);
}

pub fn get_retirement(env: &Env, id: u64) -> Option<Retirement> {
    read_persistent(env, &DataKey::Retirement(id))
}

pub fn get_retirement_ids_by_account(env: &Env, account: &Address) -> Vec<u64> {
    read_persistent(env, &DataKey::AccountRetirements(account.clone())).unwrap_or(vec![env])
}

pub fn get_retired_by_account(env: &Env, account: &Address) -> u64 {
    read_persistent(env, &DataKey::RetiredByAccount(account.clone())).unwrap_or(0)
}

pub fn get_retired_for_project(env: &Env, token_id: u64) -> u64 {
    read_persistent(env, &DataKey::RetiredForProject(token_id)).unwrap_or(0)
}

pub fn add_retired_totals(
    env: &Env,
    account: &Address,
    token_id: u64,
    amount: u64,
) -> Result<(), ContractError> {
    let by_account = get_retired_by_account(env, account)
        .checked_add(amount)
        .ok_or(ContractError::ArithmeticOverflow)?;
    let for_project = get_retired_for_project(env, token_id)
        .checked_add(amount)
        .ok_or(ContractError::ArithmeticOverflow)?;

    write_persistent(env, &DataKey::RetiredByAccount(account.clone()), &by_account);
    write_persistent(env, &DataKey::RetiredForProject(token_id), &for_project);

    Ok(())
}
