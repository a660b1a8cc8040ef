//! Axum route handlers for the configurator API.
//!
//! Layout and pricing are CPU-bound (the breakdown alone re-prices the sofa several
//! times), so those computations run inside `tokio::task::spawn_blocking`.

use axum::{extract::rejection::JsonRejection, extract::State, Json};
use tracing::debug;

use crate::errors::{AppError, QuoteError};
use crate::layout::LayoutReport;
use crate::pricing::{compute_breakdown, PriceBreakdown};
use crate::quote::catalog::Catalog;
use crate::quote::{assemble_quote, Quote, QuoteRequest};
use crate::state::AppState;

type RequestBody = Result<Json<QuoteRequest>, JsonRejection>;

/// Unreadable bodies get the same JSON error envelope as every other rejection.
fn read_body(payload: RequestBody) -> Result<QuoteRequest, AppError> {
    payload
        .map(|Json(request)| request)
        .map_err(|rejection| AppError::Validation(rejection.body_text()))
}

/// Runs a core computation off the async executor.
async fn run_blocking<T, F>(what: &'static str, job: F) -> Result<T, AppError>
where
    F: FnOnce() -> Result<T, QuoteError> + Send + 'static,
    T: Send + 'static,
{
    tokio::task::spawn_blocking(job)
        .await
        .map_err(|e| AppError::Internal(anyhow::anyhow!("spawn_blocking failed in {what}: {e}")))?
        .map_err(AppError::from)
}

/// GET /api/v1/catalog
pub async fn handle_catalog(State(state): State<AppState>) -> Json<Catalog> {
    Json(Catalog::build(&state.layout))
}

/// POST /api/v1/layout
///
/// Layout only, for the diagram preview. Pricing options are not required.
pub async fn handle_layout(
    State(state): State<AppState>,
    payload: RequestBody,
) -> Result<Json<LayoutReport>, AppError> {
    let request = read_body(payload)?;
    let layout_request = request.layout_request()?;
    let layout = state.layout.clone();
    let report = run_blocking("layout", move || layout.compute(&layout_request)).await?;
    debug!("Layout computed for {}", report.topology);
    Ok(Json(report))
}

/// POST /api/v1/quote
pub async fn handle_quote(
    State(state): State<AppState>,
    payload: RequestBody,
) -> Result<Json<Quote>, AppError> {
    let request = read_body(payload)?;
    let (layout, pricing) = (state.layout.clone(), state.pricing.clone());
    let quote = run_blocking("quote", move || assemble_quote(&layout, &pricing, &request)).await?;
    Ok(Json(quote))
}

/// POST /api/v1/quote/breakdown
///
/// Per-option summary. Each row comes from an independent pricing probe.
pub async fn handle_breakdown(
    State(state): State<AppState>,
    payload: RequestBody,
) -> Result<Json<PriceBreakdown>, AppError> {
    let request = read_body(payload)?;
    let layout_request = request.layout_request()?;
    let options = request.pricing_options()?;
    let (layout, pricing) = (state.layout.clone(), state.pricing.clone());
    let breakdown = run_blocking("breakdown", move || {
        compute_breakdown(&layout, &pricing, &layout_request, &options)
    })
    .await?;
    Ok(Json(breakdown))
}
