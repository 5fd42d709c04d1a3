#![no_std]

mod admin;
mod allowance;
mod balance;
mod contract;
mod error;
mod metadata;
mod project;
mod storage_types;

pub use contract::{CarbonToken, CarbonTokenClient};
pub use error::ContractError;
pub use storage_types::TokenProject;
