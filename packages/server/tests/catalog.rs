//! Catalog read-path tests: store rows go in via a mocked connection, and the
//! post-processing pipeline (search retention, age annotation,
//! completed-transaction exclusion) is observed on the way out.

use std::sync::Arc;

use axum::extract::{Query, State};
use chrono::{Duration, Utc};
use sea_orm::{DatabaseBackend, DatabaseConnection, MockDatabase};

use tradepost_common::ListingType;
use tradepost_common::storage::memory::MemoryBlobStore;

use tradepost_server::config::{
    AppConfig, CorsConfig, DatabaseConfig, ServerConfig, StorageBackend, StorageConfig,
};
use tradepost_server::entity::{listing, listing_category};
use tradepost_server::error::AppError;
use tradepost_server::handlers::catalog::get_listings;
use tradepost_server::models::catalog::CatalogQuery;
use tradepost_server::state::AppState;

fn test_config() -> AppConfig {
    AppConfig {
        server: ServerConfig {
            host: "127.0.0.1".into(),
            port: 0,
            cors: CorsConfig {
                allow_origins: vec![],
                max_age: 3600,
            },
        },
        database: DatabaseConfig {
            url: "postgres://unused".into(),
        },
        storage: StorageConfig {
            backend: StorageBackend::Memory,
            root_dir: "./media".into(),
            public_base_url: "http://localhost:8000/media".into(),
            max_upload_bytes: 10 * 1024 * 1024,
        },
    }
}

fn state_with(db: DatabaseConnection) -> AppState {
    AppState {
        db,
        blob_store: Arc::new(MemoryBlobStore::default()),
        config: test_config(),
    }
}

fn row(id: &str, title: &str, description: Option<&str>, trans_comp: bool) -> listing::Model {
    listing::Model {
        id: id.to_string(),
        title: title.to_string(),
        description: description.map(String::from),
        price: 50.0,
        image_url: None,
        user_id: "userid".into(),
        display_name: "test user".into(),
        email: "test_email@gmail.com".into(),
        kind: ListingType::Request,
        trans_comp,
        urgent: false,
        availability_dates: None,
        timestamp: Utc::now() - Duration::hours(2),
    }
}

/// Mock returning `rows` for the listing query and `categories` for the
/// follow-up membership query.
fn db_with(rows: Vec<listing::Model>, categories: Vec<listing_category::Model>) -> DatabaseConnection {
    let mock = MockDatabase::new(DatabaseBackend::Postgres).append_query_results([rows]);
    // The membership query only runs when the listing query returned rows.
    mock.append_query_results([categories]).into_connection()
}

fn plain_query() -> CatalogQuery {
    CatalogQuery {
        search: Some(String::new()),
        sort: Some("uploadDateAsc".into()),
        listing_types: Some("buy,rent,request".into()),
        min_price: Some(0.0),
        max_price: Some(0.0),
        categories: Some("None".into()),
    }
}

#[tokio::test]
async fn empty_store_yields_an_empty_list_not_an_error() {
    let state = state_with(db_with(vec![], vec![]));
    let result = get_listings(State(state), Query(plain_query())).await.unwrap();
    assert!(result.0.listings.is_empty());
}

#[tokio::test]
async fn completed_transactions_are_excluded() {
    let state = state_with(db_with(
        vec![
            row("id1", "microwave", None, true),
            row("id2", "toaster", None, false),
        ],
        vec![],
    ));

    let result = get_listings(State(state), Query(plain_query())).await.unwrap();
    assert_eq!(result.0.listings.len(), 1);
    assert_eq!(result.0.listings[0].listing.id, "id2");
}

#[tokio::test]
async fn search_retains_title_substring_matches_case_insensitively() {
    let state = state_with(db_with(
        vec![
            row("id1", "microwave", None, false),
            row("id2", "toaster", None, false),
        ],
        vec![],
    ));

    let mut query = plain_query();
    query.search = Some("WAVE".into());
    let result = get_listings(State(state), Query(query)).await.unwrap();
    assert_eq!(result.0.listings.len(), 1);
    assert_eq!(result.0.listings[0].listing.title, "microwave");
}

#[tokio::test]
async fn search_also_matches_descriptions() {
    let state = state_with(db_with(
        vec![
            row("id1", "oven", Some("great for reheating food"), false),
            row("id2", "lamp", Some("warm light"), false),
        ],
        vec![],
    ));

    let mut query = plain_query();
    query.search = Some("heat".into());
    let result = get_listings(State(state), Query(query)).await.unwrap();
    assert_eq!(result.0.listings.len(), 1);
    assert_eq!(result.0.listings[0].listing.id, "id1");
}

#[tokio::test]
async fn listings_carry_a_compact_age_string() {
    let state = state_with(db_with(vec![row("id1", "microwave", None, false)], vec![]));

    let result = get_listings(State(state), Query(plain_query())).await.unwrap();
    assert_eq!(result.0.listings[0].time_since_listing, "2h");
}

#[tokio::test]
async fn categories_are_attached_to_their_listing() {
    let state = state_with(db_with(
        vec![row("id1", "microwave", None, false)],
        vec![listing_category::Model {
            listing_id: "id1".into(),
            category: "Electronics".into(),
        }],
    ));

    let result = get_listings(State(state), Query(plain_query())).await.unwrap();
    assert_eq!(result.0.listings[0].listing.categories, vec!["Electronics"]);
}

#[tokio::test]
async fn invalid_price_range_fails_before_any_store_query() {
    let state = state_with(MockDatabase::new(DatabaseBackend::Postgres).into_connection());

    let query = CatalogQuery {
        min_price: Some(100.0),
        max_price: Some(50.0),
        ..Default::default()
    };
    let err = get_listings(State(state), Query(query)).await.unwrap_err();
    assert!(matches!(err, AppError::InvalidArgument(_)));
}

#[tokio::test]
async fn unknown_listing_type_is_rejected() {
    let state = state_with(MockDatabase::new(DatabaseBackend::Postgres).into_connection());

    let query = CatalogQuery {
        listing_types: Some("buy,auction".into()),
        ..Default::default()
    };
    let err = get_listings(State(state), Query(query)).await.unwrap_err();
    assert!(matches!(err, AppError::InvalidArgument(_)));
}
