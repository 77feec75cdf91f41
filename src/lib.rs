//! Backend for the DoNation charitable-giving site.
//!
//! # Surface
//!
//! - `GET /campaigns?filter=` — campaign cards, single-select category filter
//! - `POST /campaigns/{id}/donations` — validate, run the simulated gateway,
//!   bump the raised total
//! - `POST /signup` — whole-form validation, simulated account creation,
//!   clears the saved draft on success
//! - `GET/PUT/DELETE /signup/draft` — form auto-save
//!
//! # State
//!
//! The campaign catalog is a fixed in-memory seed list; the only thing that
//! ever changes is each campaign's raised total, under a single `RwLock`.
//! Redis holds exactly one durable key: the signup draft, overwritten
//! wholesale on every input event.
//!
//! # Simulated backends
//!
//! Payments and signups are stand-ins: a fixed delay, then an outcome.
//! Unlike the usual demo shape, the gateway can decline (amounts above the
//! configured ceiling), and donation completions are tagged with a session
//! generation so a dialog closed mid-flight drops the late completion
//! instead of mutating state afterwards.

use std::time::Duration;

use axum::{
    Router,
    http::{Method, header::CONTENT_TYPE},
    routing::{get, post},
};

use signal::{
    ctrl_c,
    unix::{SignalKind, signal},
};
use tokio::{net::TcpListener, signal};
use tower_http::cors::CorsLayer;
use tracing::info;
use tracing_subscriber::{EnvFilter, fmt};

pub mod catalog;
pub mod config;
pub mod donation;
pub mod draft;
pub mod error;
pub mod notify;
pub mod routes;
pub mod signup;
pub mod state;

use routes::{
    campaigns_handler, donate_handler, draft_delete_handler, draft_get_handler, draft_put_handler,
    signup_handler,
};
use state::State;

pub async fn start_server() {
    fmt().with_env_filter(EnvFilter::from_default_env()).init();

    info!("Initializing state...");
    let state = State::new().await;

    info!("Starting server...");

    let cors = CorsLayer::new()
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers([CONTENT_TYPE])
        .max_age(Duration::from_secs(60 * 60));

    let app = Router::new()
        .route("/campaigns", get(campaigns_handler))
        .route("/campaigns/{id}/donations", post(donate_handler))
        .route("/signup", post(signup_handler))
        .route(
            "/signup/draft",
            get(draft_get_handler)
                .put(draft_put_handler)
                .delete(draft_delete_handler),
        )
        .layer(cors)
        .with_state(state.clone());

    let address = format!("0.0.0.0:{}", state.config.port);
    info!("Binding to {address}");

    let listener = TcpListener::bind(&address).await.unwrap();
    info!("Server running on {address}");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .unwrap();

    println!("Server shutting down...");
}

async fn shutdown_signal() {
    let ctrl_c = async {
        ctrl_c().await.expect("Failed to install Ctrl+C handler");

        info!("Received Ctrl+C, shutting down");
    };

    #[cfg(unix)]
    let terminate = async {
        signal(SignalKind::terminate())
            .expect("Failed to install signal handler")
            .recv()
            .await;

        info!("Received terminate signal, shutting down");
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}
