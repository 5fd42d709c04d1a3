//! Helpers on top of the generated client that walk the paginated queries until every id
//! has been visited.

use soroban_sdk::{vec, Vec};

use crate::{
    contract::CarbonMarketplaceClient,
    storage::{Listing, Project, DEFAULT_INDEX, MAX_LIMIT},
};

/// Every registered project, in id order.
pub fn all_projects(client: &CarbonMarketplaceClient) -> Vec<Project> {
    let mut projects = vec![&client.env];
    let current_id = client.get_current_token_id();

    let mut start = DEFAULT_INDEX;
    while start <= current_id {
        projects.append(&client.query_projects(&Some(start), &Some(MAX_LIMIT)));
        start += MAX_LIMIT as u64;
    }

    projects
}

/// Every listing that can currently be bought, in id order.
pub fn all_active_listings(client: &CarbonMarketplaceClient) -> Vec<Listing> {
    let mut listings = vec![&client.env];
    let current_id = client.get_current_listing_id();

    let mut start = DEFAULT_INDEX;
    while start <= current_id {
        listings.append(&client.query_active_listings(&Some(start), &Some(MAX_LIMIT)));
        start += MAX_LIMIT as u64;
    }

    listings
}
