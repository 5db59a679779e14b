use crate::backend::{BackendClient, BackendError, MovieSource};
use crate::config::Config;
use crate::dedupe::{dedupe_movies, sort_by_title};
use crate::models::{CanonicalMovie, MovieRecord};
use anyhow::Result;
use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    routing::get,
    Json, Router,
};
use chrono::Utc;
use serde::Deserialize;
use serde_json::{json, Value};
use std::sync::Arc;
use tower_http::trace::TraceLayer;
use tracing::{error, info, warn};

#[derive(Clone)]
pub struct AppState {
    pub source: Arc<dyn MovieSource>,
    pub chain_priority: Arc<Vec<String>>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortOrder {
    Title,
    Source,
}

impl SortOrder {
    fn parse(raw: Option<&str>) -> Option<Self> {
        match raw.map(|s| s.trim().to_ascii_lowercase()).as_deref() {
            None | Some("") | Some("title") => Some(Self::Title),
            Some("none") | Some("source") => Some(Self::Source),
            _ => None,
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct ListQuery {
    sort: Option<String>,
}

type JsonReply = (StatusCode, Json<Value>);

pub async fn run_server(config: Config) -> Result<()> {
    let backend = BackendClient::new(config.backend_url.clone());
    info!("Using backend at {}", backend.base_url());
    info!("Poster chain priority: {}", config.chain_priority.join(" > "));

    let state = AppState {
        source: Arc::new(backend),
        chain_priority: Arc::new(config.chain_priority.clone()),
    };

    let app = build_router(state).layer(TraceLayer::new_for_http());

    info!("Listening on {}", config.bind_addr);
    let listener = tokio::net::TcpListener::bind(config.bind_addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    Ok(())
}

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/movies", get(list_movies))
        .route("/movies/:id", get(movie_detail))
        .route("/chains/:chain/movies", get(list_chain_movies))
        .route("/offers", get(list_offers))
        .route("/offers/:id", get(offer_detail))
        .with_state(state)
}

async fn health() -> &'static str {
    "OK"
}

async fn list_movies(State(state): State<AppState>, Query(query): Query<ListQuery>) -> JsonReply {
    let Some(order) = SortOrder::parse(query.sort.as_deref()) else {
        return bad_sort(query.sort.as_deref());
    };
    match state.source.fetch_movies().await {
        Ok(raw) => canonical_reply(&state, raw, order),
        Err(e) => backend_failure("movies", e),
    }
}

async fn list_chain_movies(
    State(state): State<AppState>,
    Path(chain): Path<String>,
    Query(query): Query<ListQuery>,
) -> JsonReply {
    let Some(order) = SortOrder::parse(query.sort.as_deref()) else {
        return bad_sort(query.sort.as_deref());
    };
    match state.source.fetch_chain_movies(&chain).await {
        Ok(raw) => canonical_reply(&state, raw, order),
        Err(e) => backend_failure(&format!("movies for chain {chain}"), e),
    }
}

async fn movie_detail(State(state): State<AppState>, Path(id): Path<String>) -> JsonReply {
    match state.source.fetch_movie(&id).await {
        Ok(movie) => {
            let time_slots = movie.time_slots();
            let has_showtimes = movie.has_showtimes();
            (
                StatusCode::OK,
                Json(json!({
                    "movie": movie,
                    "has_showtimes": has_showtimes,
                    "time_slots": time_slots,
                })),
            )
        }
        Err(e) => backend_failure(&format!("movie {id}"), e),
    }
}

async fn list_offers(State(state): State<AppState>) -> JsonReply {
    match state.source.fetch_offers().await {
        Ok(offers) => {
            info!("Loaded {} offers", offers.offers.len());
            (StatusCode::OK, Json(json!(offers)))
        }
        Err(e) => backend_failure("offers", e),
    }
}

async fn offer_detail(State(state): State<AppState>, Path(id): Path<String>) -> JsonReply {
    match state.source.fetch_offer(&id).await {
        Ok(offer) => (StatusCode::OK, Json(json!(offer))),
        Err(e) => backend_failure(&format!("offer {id}"), e),
    }
}

fn canonical_reply(state: &AppState, raw: Vec<MovieRecord>, order: SortOrder) -> JsonReply {
    let raw_count = raw.len();
    let mut movies: Vec<CanonicalMovie> = dedupe_movies(raw, state.chain_priority.as_slice());
    if order == SortOrder::Title {
        sort_by_title(&mut movies);
    }
    info!(
        "Displaying {} movies (from {} listings)",
        movies.len(),
        raw_count
    );
    (
        StatusCode::OK,
        Json(json!({
            "count": movies.len(),
            "fetched_at": Utc::now().to_rfc3339(),
            "movies": movies,
        })),
    )
}

fn bad_sort(raw: Option<&str>) -> JsonReply {
    warn!("Rejecting request: unsupported sort {:?}", raw);
    (
        StatusCode::BAD_REQUEST,
        Json(json!({"status": "error", "message": "sort must be 'title' or 'none'"})),
    )
}

fn backend_failure(what: &str, err: anyhow::Error) -> JsonReply {
    if BackendError::is_not_found(&err) {
        warn!("Backend has no {}", what);
        return (
            StatusCode::NOT_FOUND,
            Json(json!({"status": "error", "message": format!("No {what} found")})),
        );
    }
    error!("Failed to fetch {}: {:?}", what, err);
    (
        StatusCode::BAD_GATEWAY,
        Json(json!({"status": "error", "message": format!("Failed to fetch {what}: {err}")})),
    )
}

async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        use tokio::signal::unix::{signal, SignalKind};
        let mut term = signal(SignalKind::terminate()).expect("failed to install SIGTERM handler");
        term.recv().await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            info!("Shutdown signal received (Ctrl+C)");
        }
        _ = terminate => {
            info!("Shutdown signal received (SIGTERM)");
        }
    }
}
