use soroban_sdk::contracterror;

#[contracterror]
#[derive(Copy, Clone, Debug, Eq, PartialEq, PartialOrd, Ord)]
#[repr(u32)]
pub enum ContractError {
    AlreadyInitialized = 1,
    NotInitialized = 2,
    Unauthorized = 3,
    IssuerNotAuthorized = 4,
    InvalidInputs = 5,
    InvalidFee = 6,
    ProjectNotFound = 7,
    ProjectNotActive = 8,
    ProjectExpired = 9,
    ExceedsProjectSupply = 10,
    InsufficientBalance = 11,
    ListingNotFound = 12,
    ListingNotActive = 13,
    ListingExpired = 14,
    AmountExceedsListing = 15,
    SellerCannotBuy = 16,
    AccountsIdsLengthMismatch = 17,
    InvalidAccountIndex = 18,
    InvalidIdIndex = 19,
    ArithmeticOverflow = 20,
    CannotTransferToSelf = 21,
}
