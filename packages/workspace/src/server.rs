//! HTTP API for the editor surface
//!
//! | Method | Path                         | Purpose                         |
//! |--------|------------------------------|---------------------------------|
//! | GET    | `/api/palette`               | Block types the palette offers  |
//! | GET    | `/api/pages/:slug/layout`    | Session state (opens on demand) |
//! | POST   | `/api/pages/:slug/mutations` | Apply a `LayoutMutation`        |
//! | POST   | `/api/pages/:slug/flush`     | Save now                        |
//! | GET    | `/api/pages/:slug/events`    | SSE stream of store events      |
//! | GET    | `/landing/:slug`             | Rendered page from storage      |

use crate::error::{WorkspaceError, WorkspaceResult};
use crate::save_coordinator::SaveOutcome;
use crate::session::MutationResult;
use crate::state::WorkspaceState;
use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{
        sse::{Event, KeepAlive, Sse},
        Html, IntoResponse, Response,
    },
    routing::{get, post},
    Json, Router,
};
use blockpage_editor::{LayoutMutation, StoreState};
use blockpage_layout::ComponentType;
use blockpage_persistence::{Tier, TierAttempt};
use futures::stream::{self, Stream};
use serde::Serialize;
use std::convert::Infallible;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::broadcast::error::RecvError;
use tower_http::cors::CorsLayer;

#[derive(Clone)]
pub struct WorkspaceServer {
    state: Arc<WorkspaceState>,
}

impl WorkspaceServer {
    pub fn new(state: WorkspaceState) -> Self {
        Self {
            state: Arc::new(state),
        }
    }

    pub fn state(&self) -> &Arc<WorkspaceState> {
        &self.state
    }

    pub fn router(&self) -> Router {
        Router::new()
            .route("/api/palette", get(palette_handler))
            .route("/api/pages/:slug/layout", get(layout_handler))
            .route("/api/pages/:slug/mutations", post(mutation_handler))
            .route("/api/pages/:slug/flush", post(flush_handler))
            .route("/api/pages/:slug/events", get(events_handler))
            .route("/landing/:slug", get(landing_handler))
            .with_state(self.state.clone())
            .layer(CorsLayer::permissive())
    }

    /// Serve until Ctrl-C, then flush every open session
    pub async fn serve(self, addr: SocketAddr) -> WorkspaceResult<()> {
        let listener = tokio::net::TcpListener::bind(addr).await?;
        tracing::info!("Blockpage editor API listening on http://{}", addr);

        axum::serve(listener, self.router())
            .with_graceful_shutdown(shutdown_signal())
            .await?;

        for (slug, outcome) in self.state.close_all().await {
            tracing::info!("Closed {}: {:?}", slug, outcome);
        }
        Ok(())
    }
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {}", e);
        return;
    }
    tracing::info!("Shutting down");
}

#[derive(Debug, Serialize)]
struct ErrorResponse {
    success: bool,
    error: String,
}

impl IntoResponse for WorkspaceError {
    fn into_response(self) -> Response {
        let status = match &self {
            WorkspaceError::Mutation(_) => StatusCode::UNPROCESSABLE_ENTITY,
            WorkspaceError::PageNotFound(_) => StatusCode::NOT_FOUND,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        };

        if status.is_server_error() {
            tracing::error!("Request failed: {}", self);
        }

        (
            status,
            Json(ErrorResponse {
                success: false,
                error: self.to_string(),
            }),
        )
            .into_response()
    }
}

#[derive(Debug, Serialize)]
struct PaletteEntry {
    #[serde(rename = "type")]
    kind: ComponentType,
    name: String,
    description: String,
}

async fn palette_handler() -> Json<Vec<PaletteEntry>> {
    let entries = ComponentType::PALETTE
        .iter()
        .map(|kind| PaletteEntry {
            kind: kind.clone(),
            name: kind.display_name().to_string(),
            description: kind.description().to_string(),
        })
        .collect();
    Json(entries)
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct LayoutResponse {
    page_key: String,
    hydrated_from: Tier,
    attempts: Vec<TierAttempt>,
    state: StoreState,
}

async fn layout_handler(
    State(state): State<Arc<WorkspaceState>>,
    Path(slug): Path<String>,
) -> WorkspaceResult<Json<LayoutResponse>> {
    let session = state.session(&slug).await?;

    Ok(Json(LayoutResponse {
        page_key: session.page_key().to_string(),
        hydrated_from: session.hydrated_from(),
        attempts: session.attempts().to_vec(),
        state: session.state()?,
    }))
}

#[derive(Debug, Serialize)]
struct MutationResponse {
    success: bool,
    #[serde(flatten)]
    result: MutationResult,
}

async fn mutation_handler(
    State(state): State<Arc<WorkspaceState>>,
    Path(slug): Path<String>,
    Json(mutation): Json<LayoutMutation>,
) -> WorkspaceResult<Json<MutationResponse>> {
    tracing::info!("Received {} mutation for {}", mutation.name(), slug);

    let session = state.session(&slug).await?;
    let result = session.apply(mutation)?;

    Ok(Json(MutationResponse {
        success: true,
        result,
    }))
}

#[derive(Debug, Serialize)]
struct FlushResponse {
    #[serde(flatten)]
    outcome: SaveOutcome,
    state: StoreState,
}

async fn flush_handler(
    State(state): State<Arc<WorkspaceState>>,
    Path(slug): Path<String>,
) -> WorkspaceResult<Json<FlushResponse>> {
    let session = state.session(&slug).await?;
    let outcome = session.flush().await?;

    Ok(Json(FlushResponse {
        outcome,
        state: session.state()?,
    }))
}

/// SSE endpoint forwarding every store event for the page
async fn events_handler(
    State(state): State<Arc<WorkspaceState>>,
    Path(slug): Path<String>,
) -> WorkspaceResult<Sse<impl Stream<Item = Result<Event, Infallible>>>> {
    let session = state.session(&slug).await?;
    let receiver = session.subscribe()?;

    tracing::info!("Starting event stream for {}", slug);

    let events = stream::unfold(receiver, |mut rx| async move {
        loop {
            match rx.recv().await {
                Ok(event) => {
                    let json = serde_json::to_string(&event).unwrap_or_default();
                    let sse_event = Event::default().event("change").data(json);
                    return Some((Ok(sse_event), rx));
                }
                Err(RecvError::Lagged(n)) => {
                    tracing::warn!("[SSE] Subscriber lagged by {} events", n);
                }
                Err(RecvError::Closed) => return None,
            }
        }
    });

    Ok(Sse::new(events).keep_alive(
        KeepAlive::new()
            .interval(Duration::from_secs(15))
            .text("ping"),
    ))
}

async fn landing_handler(
    State(state): State<Arc<WorkspaceState>>,
    Path(slug): Path<String>,
) -> Response {
    match state.render_landing(&slug).await {
        Ok(output) => Html(output.html).into_response(),
        Err(WorkspaceError::PageNotFound(_)) => (
            StatusCode::NOT_FOUND,
            Html("<!DOCTYPE html><html><head><title>Page Not Found</title></head><body><h1>Page Not Found</h1></body></html>".to_string()),
        )
            .into_response(),
        Err(e) => e.into_response(),
    }
}
