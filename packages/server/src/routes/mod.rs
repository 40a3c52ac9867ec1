use axum::{
    Router,
    routing::{delete, get, post, put},
};

use crate::config::AppConfig;
use crate::handlers;
use crate::state::AppState;

pub fn api_routes(config: &AppConfig) -> Router<AppState> {
    Router::new()
        .route("/helloworld", get(handlers::helloworld))
        .nest("/catalog", catalog_routes())
        .nest("/insearchof", insearchof_routes(config))
        .nest("/sell-list", sell_list_routes(config))
        .nest("/profile", profile_routes())
}

fn catalog_routes() -> Router<AppState> {
    Router::new()
        .route("/listings", get(handlers::catalog::get_listings))
        .route("/purchase", get(handlers::catalog::purchase_contact))
}

fn insearchof_routes(config: &AppConfig) -> Router<AppState> {
    let crud = Router::new()
        .route("/upload", post(handlers::insearchof::upload_request))
        .route("/update/{request_id}", put(handlers::insearchof::update_request))
        .route("/delete/{request_id}", delete(handlers::insearchof::delete_request))
        .route(
            "/mark/{request_id}",
            put(handlers::insearchof::mark_transaction_complete),
        )
        .route(
            "/validate/{request_id}",
            get(handlers::insearchof::validate_ownership),
        );

    let upload = Router::new()
        .route(
            "/upload-image/{user_id}",
            post(handlers::insearchof::upload_image),
        )
        .layer(handlers::sell_list::image_upload_body_limit(
            config.storage.max_upload_bytes,
        ));

    crud.merge(upload)
}

fn sell_list_routes(config: &AppConfig) -> Router<AppState> {
    let crud = Router::new()
        .route("/upload", post(handlers::sell_list::upload_listing))
        .route("/update/{listing_id}", put(handlers::sell_list::update_listing))
        .route("/delete/{listing_id}", delete(handlers::sell_list::delete_listing))
        .route(
            "/mark/{listing_id}",
            put(handlers::sell_list::mark_transaction_complete),
        )
        .route(
            "/delete-image/{filename}/{user_id}",
            delete(handlers::sell_list::delete_image),
        )
        .route(
            "/listing-details/{listing_id}",
            get(handlers::sell_list::get_listing_details),
        )
        .route(
            "/user-listings/{user_id}",
            get(handlers::sell_list::get_user_listings),
        );

    let upload = Router::new()
        .route(
            "/upload-image/{user_id}",
            post(handlers::sell_list::upload_image),
        )
        .layer(handlers::sell_list::image_upload_body_limit(
            config.storage.max_upload_bytes,
        ));

    crud.merge(upload)
}

fn profile_routes() -> Router<AppState> {
    Router::new()
        .route("/contact-info", post(handlers::profile::upload_contact_info))
        .route(
            "/contact-info/{user_id}",
            get(handlers::profile::get_contact_info),
        )
        .route("/items/{user_id}", get(handlers::profile::get_list_of_items))
        .route(
            "/transaction-history/{user_id}",
            get(handlers::profile::get_transaction_history),
        )
}
