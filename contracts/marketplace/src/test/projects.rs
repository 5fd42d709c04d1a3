use soroban_sdk::{
    testutils::{Address as _, Ledger},
    vec, Address, Env, String,
};
use test_case::test_case;

use crate::{
    contract::{CarbonMarketplace, CarbonMarketplaceClient},
    error::ContractError,
    test::setup::{
        create_minted_project, deploy_token_contract, initialize_marketplace, project_info, DAY,
        YEAR,
    },
};

#[test]
fn proper_initialization() {
    let env = Env::default();
    env.mock_all_auths();

    let marketplace = initialize_marketplace(&env, Some(100));

    let config = marketplace.client.show_config();
    assert_eq!(config.admin, marketplace.admin);
    assert_eq!(config.payment_token, marketplace.token.address);
    assert_eq!(config.fee_recipient, marketplace.fee_recipient);
    assert_eq!(config.platform_fee_bps, 100);

    assert_eq!(marketplace.client.get_current_token_id(), 0);
    assert_eq!(marketplace.client.get_current_listing_id(), 0);
}

#[test]
fn initialization_should_fail_when_done_twice() {
    let env = Env::default();
    env.mock_all_auths();

    let marketplace = initialize_marketplace(&env, None);

    assert_eq!(
        marketplace.client.try_initialize(
            &marketplace.admin,
            &marketplace.token.address,
            &marketplace.fee_recipient,
            &0
        ),
        Err(Ok(ContractError::AlreadyInitialized))
    );
}

#[test]
fn initialization_should_fail_with_fee_above_max() {
    let env = Env::default();
    env.mock_all_auths();

    let admin = Address::generate(&env);
    let (token, _) = deploy_token_contract(&env, &admin);
    let client =
        CarbonMarketplaceClient::new(&env, &env.register_contract(None, CarbonMarketplace {}));

    assert_eq!(
        client.try_initialize(&admin, &token.address, &admin, &1_001),
        Err(Ok(ContractError::InvalidFee))
    );
}

#[test]
fn calls_before_initialization_fail() {
    let env = Env::default();
    env.mock_all_auths();

    let client =
        CarbonMarketplaceClient::new(&env, &env.register_contract(None, CarbonMarketplace {}));

    assert_eq!(
        client.try_authorize_issuer(&Address::generate(&env)),
        Err(Ok(ContractError::NotInitialized))
    );
}

#[test]
fn issuer_authorization_and_revocation() {
    let env = Env::default();
    env.mock_all_auths();

    let marketplace = initialize_marketplace(&env, None);
    let newcomer = Address::generate(&env);

    assert!(marketplace.client.is_authorized_issuer(&marketplace.issuer));
    assert!(!marketplace.client.is_authorized_issuer(&newcomer));

    marketplace.client.authorize_issuer(&newcomer);
    assert!(marketplace.client.is_authorized_issuer(&newcomer));

    marketplace.client.revoke_issuer(&newcomer);
    assert!(!marketplace.client.is_authorized_issuer(&newcomer));

    assert_eq!(
        marketplace.client.try_revoke_issuer(&newcomer),
        Err(Ok(ContractError::IssuerNotAuthorized))
    );
}

#[test]
fn create_project_assigns_sequential_ids() {
    let env = Env::default();
    env.mock_all_auths();

    let marketplace = initialize_marketplace(&env, None);

    let mut toucan = project_info(&env, 1_800_000, YEAR);
    toucan.name = String::from_str(&env, "Amazon Rainforest Conservation - Acre");
    toucan.verra_id = String::from_str(&env, "VCS-1396");
    toucan.is_toucan_verified = true;

    let first = marketplace
        .client
        .create_project(&marketplace.issuer, &toucan);
    let second = marketplace
        .client
        .create_project(&marketplace.issuer, &project_info(&env, 1_500_000, 0));

    assert_eq!(first, 1);
    assert_eq!(second, 2);
    assert_eq!(marketplace.client.get_current_token_id(), 2);

    let project = marketplace.client.get_project(&1);
    assert_eq!(project.token_id, 1);
    assert_eq!(project.issuer, marketplace.issuer);
    assert_eq!(project.co2_tonnes, 1_800_000);
    assert_eq!(project.minted, 0);
    assert!(project.is_active);

    assert!(marketplace.client.is_toucan_credit(&1));
    assert!(!marketplace.client.is_toucan_credit(&2));
}

#[test]
fn create_project_fails_for_unauthorized_issuer() {
    let env = Env::default();
    env.mock_all_auths();

    let marketplace = initialize_marketplace(&env, None);
    let stranger = Address::generate(&env);

    assert_eq!(
        marketplace
            .client
            .try_create_project(&stranger, &project_info(&env, 100, 0)),
        Err(Ok(ContractError::IssuerNotAuthorized))
    );

    marketplace.client.revoke_issuer(&marketplace.issuer);
    assert_eq!(
        marketplace
            .client
            .try_create_project(&marketplace.issuer, &project_info(&env, 100, 0)),
        Err(Ok(ContractError::IssuerNotAuthorized))
    );
}

#[test_case(0, 150_000, 0 ; "zero tonnes")]
#[test_case(100, 0, 0 ; "zero price")]
#[test_case(100, -5, 0 ; "negative price")]
#[test_case(100, 150_000, 500 ; "expiry in the past")]
fn create_project_rejects_invalid_inputs(co2_tonnes: u64, price: i128, expiry_date: u64) {
    let env = Env::default();
    env.mock_all_auths();
    env.ledger().with_mut(|li| li.timestamp = 1_000);

    let marketplace = initialize_marketplace(&env, None);

    let mut info = project_info(&env, co2_tonnes, expiry_date);
    info.price_per_tonne = price;

    assert_eq!(
        marketplace
            .client
            .try_create_project(&marketplace.issuer, &info),
        Err(Ok(ContractError::InvalidInputs))
    );
}

#[test]
fn create_project_rejects_empty_name() {
    let env = Env::default();
    env.mock_all_auths();

    let marketplace = initialize_marketplace(&env, None);

    let mut info = project_info(&env, 100, 0);
    info.name = String::from_str(&env, "");

    assert_eq!(
        marketplace
            .client
            .try_create_project(&marketplace.issuer, &info),
        Err(Ok(ContractError::InvalidInputs))
    );
}

#[test]
fn mint_and_check_balance() {
    let env = Env::default();
    env.mock_all_auths();

    let marketplace = initialize_marketplace(&env, None);
    let user = Address::generate(&env);

    let token_id = create_minted_project(&env, &marketplace, &user, 1_000);
    marketplace
        .client
        .mint_credits(&marketplace.issuer, &token_id, &500, &user);

    assert_eq!(marketplace.client.balance_of(&user, &token_id), 1_500);
    assert_eq!(marketplace.client.get_project(&token_id).minted, 1_500);
}

#[test]
fn mint_cannot_exceed_verified_tonnes() {
    let env = Env::default();
    env.mock_all_auths();

    let marketplace = initialize_marketplace(&env, None);
    let user = Address::generate(&env);

    let token_id = marketplace
        .client
        .create_project(&marketplace.issuer, &project_info(&env, 100, 0));

    marketplace
        .client
        .mint_credits(&marketplace.issuer, &token_id, &60, &user);

    assert_eq!(
        marketplace
            .client
            .try_mint_credits(&marketplace.issuer, &token_id, &41, &user),
        Err(Ok(ContractError::ExceedsProjectSupply))
    );

    marketplace
        .client
        .mint_credits(&marketplace.issuer, &token_id, &40, &user);
    assert_eq!(marketplace.client.balance_of(&user, &token_id), 100);
}

#[test]
fn only_project_issuer_can_mint() {
    let env = Env::default();
    env.mock_all_auths();

    let marketplace = initialize_marketplace(&env, None);
    let other_issuer = Address::generate(&env);
    marketplace.client.authorize_issuer(&other_issuer);

    let token_id = marketplace
        .client
        .create_project(&marketplace.issuer, &project_info(&env, 100, 0));

    assert_eq!(
        marketplace
            .client
            .try_mint_credits(&other_issuer, &token_id, &10, &other_issuer),
        Err(Ok(ContractError::Unauthorized))
    );
}

#[test]
fn mint_fails_for_missing_inactive_or_expired_projects() {
    let env = Env::default();
    env.mock_all_auths();

    let marketplace = initialize_marketplace(&env, None);
    let user = Address::generate(&env);

    assert_eq!(
        marketplace
            .client
            .try_mint_credits(&marketplace.issuer, &7, &10, &user),
        Err(Ok(ContractError::ProjectNotFound))
    );

    let token_id = marketplace
        .client
        .create_project(&marketplace.issuer, &project_info(&env, 100, DAY));

    marketplace
        .client
        .set_project_active(&marketplace.issuer, &token_id, &false);
    assert_eq!(
        marketplace
            .client
            .try_mint_credits(&marketplace.issuer, &token_id, &10, &user),
        Err(Ok(ContractError::ProjectNotActive))
    );

    marketplace
        .client
        .set_project_active(&marketplace.admin, &token_id, &true);
    env.ledger().with_mut(|li| li.timestamp = DAY);
    assert_eq!(
        marketplace
            .client
            .try_mint_credits(&marketplace.issuer, &token_id, &10, &user),
        Err(Ok(ContractError::ProjectExpired))
    );
}

#[test]
fn set_project_active_requires_issuer_or_admin() {
    let env = Env::default();
    env.mock_all_auths();

    let marketplace = initialize_marketplace(&env, None);
    let token_id = marketplace
        .client
        .create_project(&marketplace.issuer, &project_info(&env, 100, 0));

    assert_eq!(
        marketplace
            .client
            .try_set_project_active(&Address::generate(&env), &token_id, &false),
        Err(Ok(ContractError::Unauthorized))
    );
    assert!(marketplace.client.get_project(&token_id).is_active);
}

#[test]
fn query_projects_paginates() {
    let env = Env::default();
    env.mock_all_auths();

    let marketplace = initialize_marketplace(&env, None);

    for _ in 0..12 {
        marketplace
            .client
            .create_project(&marketplace.issuer, &project_info(&env, 100, 0));
    }

    let first_page = marketplace.client.query_projects(&None, &None);
    assert_eq!(first_page.len(), 10);
    assert_eq!(first_page.get(0).unwrap().token_id, 1);
    assert_eq!(first_page.get(9).unwrap().token_id, 10);

    let second_page = marketplace.client.query_projects(&Some(11), &Some(10));
    assert_eq!(second_page.len(), 2);
    assert_eq!(second_page.get(1).unwrap().token_id, 12);

    assert_eq!(
        marketplace.client.query_projects(&Some(13), &None),
        vec![&env]
    );
}

#[test]
fn transfer_moves_credits() {
    let env = Env::default();
    env.mock_all_auths();

    let marketplace = initialize_marketplace(&env, None);
    let user_a = Address::generate(&env);
    let user_b = Address::generate(&env);

    let token_id = create_minted_project(&env, &marketplace, &user_a, 10);

    marketplace.client.transfer(&user_a, &user_b, &token_id, &4);

    assert_eq!(
        marketplace.client.balance_of_batch(
            &vec![&env, user_a.clone(), user_b.clone()],
            &vec![&env, token_id, token_id]
        ),
        vec![&env, 6, 4]
    );

    assert_eq!(
        marketplace
            .client
            .try_transfer(&user_a, &user_b, &token_id, &7),
        Err(Ok(ContractError::InsufficientBalance))
    );
    assert_eq!(
        marketplace
            .client
            .try_transfer(&user_a, &user_a, &token_id, &1),
        Err(Ok(ContractError::CannotTransferToSelf))
    );
}

#[test]
fn credits_cannot_be_sent_to_the_marketplace_directly() {
    let env = Env::default();
    env.mock_all_auths();

    let marketplace = initialize_marketplace(&env, None);
    let user = Address::generate(&env);
    let escrow = marketplace.client.address.clone();

    let token_id = create_minted_project(&env, &marketplace, &user, 10);

    assert_eq!(
        marketplace
            .client
            .try_mint_credits(&marketplace.issuer, &token_id, &5, &escrow),
        Err(Ok(ContractError::InvalidInputs))
    );
    assert_eq!(
        marketplace
            .client
            .try_transfer(&user, &escrow, &token_id, &5),
        Err(Ok(ContractError::InvalidInputs))
    );

    assert_eq!(marketplace.client.balance_of(&escrow, &token_id), 0);
    assert_eq!(marketplace.client.balance_of(&user, &token_id), 10);
    assert_eq!(marketplace.client.get_project(&token_id).minted, 10);
}

#[test]
fn balance_of_batch_length_mismatch() {
    let env = Env::default();
    env.mock_all_auths();

    let marketplace = initialize_marketplace(&env, None);

    assert_eq!(
        marketplace
            .client
            .try_balance_of_batch(&vec![&env, Address::generate(&env)], &vec![&env, 1, 2]),
        Err(Ok(ContractError::AccountsIdsLengthMismatch))
    );
}
