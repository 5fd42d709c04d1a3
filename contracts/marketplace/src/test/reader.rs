use soroban_sdk::{testutils::Address as _, vec, Address, Env};

use crate::{
    reader::{all_active_listings, all_projects},
    test::setup::{create_minted_project, initialize_marketplace, project_info, WEEKLY},
};

#[test]
fn all_projects_walks_every_page() {
    let env = Env::default();
    env.mock_all_auths();

    let marketplace = initialize_marketplace(&env, None);
    assert_eq!(all_projects(&marketplace.client), vec![&env]);

    for tonnes in 1..=55u64 {
        marketplace
            .client
            .create_project(&marketplace.issuer, &project_info(&env, tonnes, 0));
    }

    let projects = all_projects(&marketplace.client);
    assert_eq!(projects.len(), 55);
    for (idx, project) in projects.iter().enumerate() {
        assert_eq!(project.token_id, idx as u64 + 1);
        assert_eq!(project.co2_tonnes, idx as u64 + 1);
    }
}

#[test]
fn all_active_listings_skips_closed_listings_across_pages() {
    let env = Env::default();
    env.mock_all_auths();

    let marketplace = initialize_marketplace(&env, None);
    let seller = Address::generate(&env);
    let token_id = create_minted_project(&env, &marketplace, &seller, 200);

    let mut open = vec![&env];
    for idx in 0..120u64 {
        let listing_id = marketplace
            .client
            .list_credits(&seller, &token_id, &1, &10, &WEEKLY);
        if idx % 40 == 0 {
            open.push_back(listing_id);
        } else {
            marketplace.client.cancel_listing(&seller, &listing_id);
        }
    }

    let active = all_active_listings(&marketplace.client);
    assert_eq!(active.len(), 3);
    for (listing, expected_id) in active.iter().zip(open.iter()) {
        assert_eq!(listing.listing_id, expected_id);
    }
}
