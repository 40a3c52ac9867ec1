pub mod config;
pub mod database;
pub mod entity;
pub mod error;
pub mod extractors;
pub mod handlers;
pub mod images;
pub mod lifecycle;
pub mod models;
pub mod routes;
pub mod state;
pub mod store;
pub mod utils;

use std::time::Duration;

use axum::http::HeaderValue;
use tower_http::cors::{AllowOrigin, Any, CorsLayer};
use utoipa::OpenApi;
use utoipa_scalar::{Scalar, Servable as ScalarServable};
use utoipa_swagger_ui::SwaggerUi;

use crate::config::CorsConfig;
use crate::state::AppState;

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Tradepost Marketplace API",
        version = "1.0.0",
        description = "Campus marketplace backend: catalog search, listing lifecycle, and \
            user contact profiles"
    ),
    paths(
        handlers::helloworld,
        handlers::catalog::get_listings,
        handlers::catalog::purchase_contact,
        handlers::insearchof::upload_request,
        handlers::insearchof::update_request,
        handlers::insearchof::delete_request,
        handlers::insearchof::mark_transaction_complete,
        handlers::insearchof::validate_ownership,
        handlers::insearchof::upload_image,
        handlers::sell_list::upload_listing,
        handlers::sell_list::update_listing,
        handlers::sell_list::delete_listing,
        handlers::sell_list::mark_transaction_complete,
        handlers::sell_list::upload_image,
        handlers::sell_list::delete_image,
        handlers::sell_list::get_listing_details,
        handlers::sell_list::get_user_listings,
        handlers::profile::upload_contact_info,
        handlers::profile::get_contact_info,
        handlers::profile::get_list_of_items,
        handlers::profile::get_transaction_history,
    ),
    tags(
        (name = "Catalog", description = "Filtered catalog reads and purchase handoff"),
        (name = "Sell List", description = "Sale and rental listing lifecycle"),
        (name = "In Search Of", description = "Request-type listing lifecycle"),
        (name = "Profile", description = "User contact info and listing history"),
        (name = "Health", description = "Service health"),
    ),
)]
struct ApiDoc;

fn cors_layer(config: &CorsConfig) -> CorsLayer {
    let mut layer = CorsLayer::new()
        .allow_methods(Any)
        .allow_headers(Any)
        .max_age(Duration::from_secs(config.max_age));

    if config.allow_origins.is_empty() {
        layer = layer.allow_origin(Any);
    } else {
        let origins: Vec<HeaderValue> = config
            .allow_origins
            .iter()
            .filter_map(|origin| origin.parse().ok())
            .collect();
        layer = layer.allow_origin(AllowOrigin::list(origins));
    }

    layer
}

/// Build the application router.
pub fn build_router(state: AppState) -> axum::Router {
    let cors = cors_layer(&state.config.server.cors);

    axum::Router::new()
        .nest("/api", routes::api_routes(&state.config))
        .route(
            "/media/{*path}",
            axum::routing::get(handlers::media::serve_media),
        )
        .layer(cors)
        .with_state(state)
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .merge(Scalar::with_url("/scalar", ApiDoc::openapi()))
}
