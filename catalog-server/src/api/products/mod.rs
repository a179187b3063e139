//! Product API 模块

mod handler;

use axum::{Router, routing::get};

use crate::core::ServerState;

pub fn router() -> Router<ServerState> {
    Router::new().nest("/api/products", product_routes())
}

fn product_routes() -> Router<ServerState> {
    Router::new()
        .route("/", get(handler::list).post(handler::create))
        .route(
            "/{id}",
            get(handler::get_by_id)
                .put(handler::update)
                .delete(handler::delete),
        )
        .route("/{id}/images", get(handler::list_images))
        .route("/{id}/options", get(handler::list_options))
        .route(
            "/{id}/variants",
            get(handler::list_variants).post(handler::create_variant),
        )
        .route("/slug/{slug}", get(handler::get_by_slug))
}

pub use handler::ProductResponse;
