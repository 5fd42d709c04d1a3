#![no_std]

mod contract;
mod error;
pub mod reader;
mod storage;
pub mod units;
mod utils;

pub mod ttl {
    pub const DAY_IN_LEDGERS: u32 = 17280;

    pub const BUMP_AMOUNT: u32 = 7 * DAY_IN_LEDGERS;
    pub const LIFETIME_THRESHOLD: u32 = BUMP_AMOUNT - DAY_IN_LEDGERS;

    pub const BALANCE_BUMP_AMOUNT: u32 = 30 * DAY_IN_LEDGERS;
    pub const BALANCE_LIFETIME_THRESHOLD: u32 = BALANCE_BUMP_AMOUNT - DAY_IN_LEDGERS;
}

pub use contract::{CarbonMarketplace, CarbonMarketplaceClient};
pub use error::ContractError;
pub use storage::{Config, Listing, ListingStatus, Project, ProjectInfo, Retirement};
