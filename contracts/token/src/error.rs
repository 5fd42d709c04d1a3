use soroban_sdk::contracterror;

#[contracterror]
#[derive(Copy, Clone, Debug, Eq, PartialEq, PartialOrd, Ord)]
#[repr(u32)]
pub enum ContractError {
    AlreadyInitialized = 1,
    NotInitialized = 2,
    InvalidDecimals = 3,
    NegativeAmount = 4,
    InvalidInputs = 5,
    InsufficientBalance = 6,
    InsufficientAllowance = 7,
    InvalidExpirationLedger = 8,
    ProjectNotFound = 9,
    ExceedsProjectTonnes = 10,
    ArithmeticOverflow = 11,
}
