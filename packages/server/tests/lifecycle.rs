//! Lifecycle tests against a mocked document store and an in-memory blob
//! store, covering the ownership gates, the delete cascade, and the
//! completion toggle end to end.

use std::sync::Arc;

use chrono::Utc;
use sea_orm::{DatabaseBackend, DatabaseConnection, MockDatabase, MockExecResult};

use tradepost_common::ListingType;
use tradepost_common::storage::BlobStore;
use tradepost_common::storage::memory::MemoryBlobStore;

use tradepost_server::config::{
    AppConfig, CorsConfig, DatabaseConfig, ServerConfig, StorageBackend, StorageConfig,
};
use tradepost_server::entity::listing;
use tradepost_server::error::AppError;
use tradepost_server::lifecycle;
use tradepost_server::models::listing::{CreateListingRequest, ListingKindFields};
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

fn state_with(db: DatabaseConnection, blob_store: Arc<MemoryBlobStore>) -> AppState {
    AppState {
        db,
        blob_store,
        config: test_config(),
    }
}

fn empty_mock() -> DatabaseConnection {
    MockDatabase::new(DatabaseBackend::Postgres).into_connection()
}

fn exec_ok() -> MockExecResult {
    MockExecResult {
        last_insert_id: 0,
        rows_affected: 1,
    }
}

fn stored_listing(id: &str, owner: &str, image_url: Option<&str>) -> listing::Model {
    listing::Model {
        id: id.to_string(),
        title: "Vintage Camera".into(),
        description: Some("A fully functional vintage camera.".into()),
        price: 120.0,
        image_url: image_url.map(String::from),
        user_id: owner.to_string(),
        display_name: "testuser".into(),
        email: "testemail@gmail.com".into(),
        kind: ListingType::Buy,
        trans_comp: false,
        urgent: false,
        availability_dates: None,
        timestamp: Utc::now(),
    }
}

fn create_request(user_id: &str, title: &str, price: f64) -> CreateListingRequest {
    CreateListingRequest {
        title: title.into(),
        description: Some("Test description".into()),
        price,
        image_url: None,
        display_name: "testuser".into(),
        email: "testemail@gmail.com".into(),
        user_id: user_id.into(),
        categories: vec!["Electronics".into()],
        kind: ListingKindFields::Request { urgent: false },
    }
}

mod create {
    use super::*;

    #[tokio::test]
    async fn rejects_empty_title() {
        let state = state_with(empty_mock(), Arc::new(MemoryBlobStore::default()));
        let err = lifecycle::create_listing(&state, create_request("testuserid", "", 25.0))
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Validation(_)));
    }

    #[tokio::test]
    async fn rejects_negative_price() {
        let state = state_with(empty_mock(), Arc::new(MemoryBlobStore::default()));
        let err = lifecycle::create_listing(&state, create_request("testuserid", "Test Title", -25.0))
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Validation(_)));
    }

    #[tokio::test]
    async fn rejects_unauthenticated_creator() {
        let state = state_with(empty_mock(), Arc::new(MemoryBlobStore::default()));
        let err = lifecycle::create_listing(&state, create_request("", "Test Title", 25.0))
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Validation(_)));
    }

    #[tokio::test]
    async fn persists_row_and_categories_and_returns_generated_id() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_exec_results([exec_ok(), exec_ok()])
            .into_connection();
        let state = state_with(db, Arc::new(MemoryBlobStore::default()));

        let id = lifecycle::create_listing(&state, create_request("testuserid", "Test Title", 25.0))
            .await
            .unwrap();
        assert!(!id.is_empty());
        assert!(uuid::Uuid::parse_str(&id).is_ok());
    }
}

mod ownership {
    use super::*;

    #[tokio::test]
    async fn mark_by_non_owner_is_permission_denied() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([vec![stored_listing("id1", "owner", None)]])
            .into_connection();
        let state = state_with(db, Arc::new(MemoryBlobStore::default()));

        let err = lifecycle::mark_transaction_complete(&state, "id1", "somebody-else")
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::PermissionDenied(_)));
    }

    #[tokio::test]
    async fn mark_of_missing_listing_is_not_found() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([Vec::<listing::Model>::new()])
            .into_connection();
        let state = state_with(db, Arc::new(MemoryBlobStore::default()));

        let err = lifecycle::mark_transaction_complete(&state, "nonexistentid", "owner")
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::NotFound(_)));
    }

    #[tokio::test]
    async fn mark_toggles_and_reports_the_new_state() {
        let before = stored_listing("id1", "owner", None);
        let mut after = before.clone();
        after.trans_comp = true;

        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([vec![before]])
            .append_query_results([vec![after]])
            .into_connection();
        let state = state_with(db, Arc::new(MemoryBlobStore::default()));

        let trans_comp = lifecycle::mark_transaction_complete(&state, "id1", "owner")
            .await
            .unwrap();
        assert!(trans_comp);
    }

    #[tokio::test]
    async fn validate_ownership_denies_without_leaking_details() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([vec![stored_listing("id1", "owner", None)]])
            .into_connection();
        let state = state_with(db, Arc::new(MemoryBlobStore::default()));

        let result = lifecycle::validate_ownership(&state, "id1", "somebody-else")
            .await
            .unwrap();
        assert!(!result.is_owner);
        assert!(result.listing.is_none());
    }
}

mod delete {
    use super::*;
    use tradepost_server::entity::listing_category;

    #[tokio::test]
    async fn removes_the_stored_image_before_the_row() {
        let blob_store = Arc::new(MemoryBlobStore::default());
        let url = blob_store
            .put("images/owner/abc_photo.jpg", b"jpeg", "image/jpeg")
            .await
            .unwrap();

        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([vec![stored_listing("id1", "owner", Some(&url))]])
            .append_exec_results([exec_ok(), exec_ok()])
            .into_connection();
        let state = state_with(db, blob_store.clone());

        lifecycle::delete_listing(&state, "id1", "owner")
            .await
            .unwrap();
        assert!(blob_store.is_empty());
    }

    #[tokio::test]
    async fn tolerates_an_already_missing_image() {
        let blob_store = Arc::new(MemoryBlobStore::default());
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([vec![stored_listing(
                "id1",
                "owner",
                Some("http://localhost:8000/media/images/owner/gone.jpg"),
            )]])
            .append_exec_results([exec_ok(), exec_ok()])
            .into_connection();
        let state = state_with(db, blob_store);

        lifecycle::delete_listing(&state, "id1", "owner")
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn delete_by_non_owner_keeps_everything() {
        let blob_store = Arc::new(MemoryBlobStore::default());
        blob_store
            .put("images/owner/abc.jpg", b"jpeg", "image/jpeg")
            .await
            .unwrap();

        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([vec![stored_listing("id1", "owner", None)]])
            .into_connection();
        let state = state_with(db, blob_store.clone());

        let err = lifecycle::delete_listing(&state, "id1", "intruder")
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::PermissionDenied(_)));
        assert_eq!(blob_store.len(), 1);
    }

    #[tokio::test]
    async fn validate_ownership_returns_redacted_projection_to_owner() {
        let category_rows = vec![listing_category::Model {
            listing_id: "id1".into(),
            category: "Electronics".into(),
        }];

        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([vec![stored_listing("id1", "owner", None)]])
            .append_query_results([category_rows])
            .into_connection();
        let state = state_with(db, Arc::new(MemoryBlobStore::default()));

        let result = lifecycle::validate_ownership(&state, "id1", "owner")
            .await
            .unwrap();
        assert!(result.is_owner);
        let details = result.listing.unwrap();
        assert_eq!(details.title, "Vintage Camera");
        assert_eq!(details.categories, vec!["Electronics"]);
    }
}

mod details {
    use super::*;
    use axum::extract::{Path, State};
    use tradepost_server::entity::listing_category;
    use tradepost_server::handlers::sell_list::get_listing_details;

    #[tokio::test]
    async fn round_trips_the_stored_fields() {
        let stored = stored_listing("id1", "owner", None);
        let categories = vec![listing_category::Model {
            listing_id: "id1".into(),
            category: "Electronics".into(),
        }];

        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([vec![stored.clone()]])
            .append_query_results([categories])
            .into_connection();
        let state = state_with(db, Arc::new(MemoryBlobStore::default()));

        let response = get_listing_details(State(state), Path("id1".to_string()))
            .await
            .unwrap();
        let details = &response.0.listing_details;

        assert_eq!(details.id, stored.id);
        assert_eq!(details.title, stored.title);
        assert_eq!(details.description, stored.description);
        assert_eq!(details.price, stored.price);
        assert_eq!(details.user_id, stored.user_id);
        assert_eq!(details.display_name, stored.display_name);
        assert_eq!(details.email, stored.email);
        assert_eq!(details.categories, vec!["Electronics"]);
        assert!(!details.trans_comp);
    }

    #[tokio::test]
    async fn missing_listing_is_not_found() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([Vec::<listing::Model>::new()])
            .into_connection();
        let state = state_with(db, Arc::new(MemoryBlobStore::default()));

        let err = get_listing_details(State(state), Path("nonexistentid".to_string()))
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::NotFound(_)));
    }
}

mod images {
    use super::*;
    use image::{ImageFormat, Rgb, RgbImage};
    use std::io::Cursor;

    fn png_bytes(width: u32, height: u32) -> Vec<u8> {
        let img = RgbImage::from_pixel(width, height, Rgb([200, 40, 20]));
        let mut buf = Cursor::new(Vec::new());
        img.write_to(&mut buf, ImageFormat::Png).unwrap();
        buf.into_inner()
    }

    #[tokio::test]
    async fn upload_normalizes_and_issues_a_public_url() {
        let blob_store = Arc::new(MemoryBlobStore::default());
        let state = state_with(empty_mock(), blob_store.clone());

        let url =
            lifecycle::store_listing_image(&state, "testuserid", "photo.png", png_bytes(2400, 1200))
                .await
                .unwrap();

        assert!(url.starts_with("http://localhost:8000/media/images/testuserid/"));
        assert!(url.ends_with("_photo.png"));
        assert_eq!(blob_store.len(), 1);

        // Round-trip through the store: normalized output is a bounded JPEG.
        let path = url.strip_prefix("http://localhost:8000/media/").unwrap();
        let blob = blob_store.get(path).await.unwrap();
        assert_eq!(blob.content_type, "image/jpeg");
        let decoded = image::load_from_memory(&blob.data).unwrap();
        assert_eq!((decoded.width(), decoded.height()), (1080, 540));
    }

    #[tokio::test]
    async fn upload_requires_an_identity() {
        let state = state_with(empty_mock(), Arc::new(MemoryBlobStore::default()));
        let err = lifecycle::store_listing_image(&state, "", "photo.png", png_bytes(10, 10))
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Validation(_)));
    }

    #[tokio::test]
    async fn delete_image_removes_the_blob() {
        let blob_store = Arc::new(MemoryBlobStore::default());
        blob_store
            .put("images/u1/abc_photo.jpg", b"jpeg", "image/jpeg")
            .await
            .unwrap();
        let state = state_with(empty_mock(), blob_store.clone());

        lifecycle::delete_listing_image(&state, "u1", "abc_photo.jpg")
            .await
            .unwrap();
        assert!(blob_store.is_empty());
    }
}
