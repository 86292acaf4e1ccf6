//! REST surface for the engine: health, submit order, cancel order.
//!
//! Used by the binary and by integration tests. Create with [`create_router`].
//! Handlers go through [`Engine::run_locked`], the same per-order-id locking
//! path the connection workers use, and return the events the command
//! produced. Uses Extension for state so the router is `Router<()>` and works
//! with `into_make_service()`.

use axum::{
    extract::Extension,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use std::sync::Arc;

use crate::engine::Engine;
use crate::io::Event;
use crate::types::{Command, OrderId, Side};

/// Shared app state: the one engine of this process.
#[derive(Clone)]
pub struct AppState {
    pub(crate) engine: Arc<Engine>,
}

/// Builds the REST router around an existing engine.
pub fn create_router(engine: Arc<Engine>) -> Router<()> {
    Router::new()
        .route("/health", get(health))
        .route("/orders", post(submit_order))
        .route("/orders/cancel", post(cancel_order))
        .layer(Extension(AppState { engine }))
}

async fn health() -> impl IntoResponse {
    (StatusCode::OK, "ok")
}

#[derive(serde::Serialize)]
struct EventsOut {
    events: Vec<Event>,
}

#[derive(serde::Deserialize)]
struct NewOrderRequest {
    order_id: u64,
    instrument: String,
    price: i64,
    quantity: u64,
    side: Side,
}

async fn submit_order(
    Extension(state): Extension<AppState>,
    Json(body): Json<NewOrderRequest>,
) -> Response {
    let events = state.engine.run_locked(Command::New {
        order_id: OrderId(body.order_id),
        instrument: body.instrument,
        price: body.price,
        quantity: body.quantity,
        side: body.side,
    });
    (StatusCode::OK, Json(EventsOut { events })).into_response()
}

#[derive(serde::Deserialize)]
struct CancelRequest {
    order_id: u64,
}

async fn cancel_order(
    Extension(state): Extension<AppState>,
    Json(body): Json<CancelRequest>,
) -> Response {
    let events = state.engine.run_locked(Command::Cancel {
        order_id: OrderId(body.order_id),
    });
    (StatusCode::OK, Json(EventsOut { events })).into_response()
}
