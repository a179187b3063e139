//! Variant API 模块

mod handler;

use axum::{
    Router,
    routing::{delete, get},
};

use crate::core::ServerState;

pub fn router() -> Router<ServerState> {
    Router::new().nest("/api/variants", variant_routes())
}

fn variant_routes() -> Router<ServerState> {
    Router::new()
        .route("/", delete(handler::delete_batch))
        .route(
            "/{id}",
            get(handler::get_by_id)
                .put(handler::update)
                .delete(handler::delete),
        )
        .route("/{id}/images", get(handler::list_images))
}
