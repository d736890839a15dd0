//! JSON API route handlers.
//!
//! All endpoints return JSON. State is shared via `Arc<ApiState>`; handler
//! errors map to status codes through `ApiError` so a storage outage, a
//! missing record and a bad hedge configuration are distinguishable to the
//! caller.

use std::sync::Arc;

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post, put};
use axum::{Json, Router};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::adapters::api::RemoteFreebetStore;
use crate::adapters::metrics::{HealthState, MetricsRegistry};
use crate::adapters::persistence::{LocalFreebetStore, StatsLog};
use crate::domain::extraction::{
    ExtractionCalculator, ExtractionError, ExtractionInput,
};
use crate::domain::freebet::{Freebet, FreebetDraft};
use crate::domain::stats::MonthlyStats;
use crate::ports::repository::StorageTier;
use crate::usecases::{FreebetLedger, StatsReporter};

/// Concrete ledger wiring used by the service binary.
pub type Ledger = FreebetLedger<RemoteFreebetStore, LocalFreebetStore>;
/// Concrete stats wiring used by the service binary.
pub type Reporter = StatsReporter<RemoteFreebetStore, LocalFreebetStore, StatsLog>;

/// Shared state accessible by all route handlers.
pub struct ApiState {
    pub ledger: Arc<Ledger>,
    pub stats: Arc<Reporter>,
    pub calculator: ExtractionCalculator,
    /// Commission applied when a quote request omits one.
    pub default_commission_percent: f64,
    pub metrics: Arc<MetricsRegistry>,
    pub health: Arc<HealthState>,
}

/// Build the API router over the shared state.
pub fn build_router(state: Arc<ApiState>) -> Router {
    Router::new()
        .route("/api/extraction/quote", post(quote))
        .route("/api/freebets", get(list_freebets).post(create_freebet))
        .route(
            "/api/freebets/:id",
            put(update_freebet).delete(delete_freebet),
        )
        .route("/api/freebets/:id/extract", post(record_extraction))
        .route("/api/stats/monthly", get(monthly_stats))
        .route("/api/stats/history", get(stats_history))
        .route("/live", get(liveness))
        .route("/ready", get(readiness))
        .with_state(state)
}

// ---------------------------------------------------------------------------
// Error mapping
// ---------------------------------------------------------------------------

/// API failure modes, each with a stable error code and status.
#[derive(Debug)]
pub enum ApiError {
    /// Malformed request payload.
    BadRequest(String),
    /// Calculator rejected the inputs.
    Extraction(ExtractionError),
    /// No record with the requested ID.
    NotFound,
    /// Both storage tiers failed.
    Storage(anyhow::Error),
}

#[derive(Debug, Serialize)]
struct ErrorBody {
    error: &'static str,
    message: String,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, error, message) = match self {
            Self::BadRequest(msg) => (StatusCode::BAD_REQUEST, "bad_request", msg),
            Self::Extraction(e) => {
                let code = match e {
                    ExtractionError::InvalidInput { .. } => "invalid_input",
                    ExtractionError::InvalidHedgeConfiguration { .. } => "invalid_hedge",
                };
                (StatusCode::UNPROCESSABLE_ENTITY, code, e.to_string())
            }
            Self::NotFound => (
                StatusCode::NOT_FOUND,
                "not_found",
                "No freebet with that ID".to_string(),
            ),
            Self::Storage(e) => (
                StatusCode::BAD_GATEWAY,
                "storage_unavailable",
                format!("{e:#}"),
            ),
        };
        (status, Json(ErrorBody { error, message })).into_response()
    }
}

impl From<anyhow::Error> for ApiError {
    fn from(e: anyhow::Error) -> Self {
        Self::Storage(e)
    }
}

// ---------------------------------------------------------------------------
// Request / response types
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize)]
pub struct QuoteRequest {
    pub stake: f64,
    pub back_odds: f64,
    pub lay_odds: f64,
    /// Falls back to the configured default when omitted.
    pub commission_percent: Option<f64>,
}

#[derive(Debug, Serialize)]
pub struct QuoteResponse {
    pub lay_stake: f64,
    pub liability: f64,
    pub profit: f64,
    pub extraction_percent: f64,
    /// Commission actually used for the computation.
    pub commission_percent: f64,
}

#[derive(Debug, Serialize)]
pub struct LedgerResponse {
    pub freebets: Vec<Freebet>,
    pub tier: StorageTier,
}

#[derive(Debug, Serialize)]
pub struct FreebetResponse {
    pub freebet: Freebet,
    pub tier: StorageTier,
}

#[derive(Debug, Deserialize)]
pub struct UpdateFreebetRequest {
    pub bookmaker: String,
    pub face_value: f64,
    pub min_odds: f64,
    pub status: String,
    pub recorded_at: DateTime<Utc>,
    pub expires_at: Option<DateTime<Utc>>,
    pub used: bool,
    pub extracted: bool,
    pub extracted_value: Option<f64>,
}

#[derive(Debug, Deserialize)]
pub struct ExtractRequest {
    /// What the hedge actually paid out, usually seeded from a quote.
    pub realized_profit: f64,
}

#[derive(Debug, Serialize)]
pub struct DeleteResponse {
    pub deleted: bool,
    pub tier: StorageTier,
}

#[derive(Debug, Serialize)]
pub struct StatsResponse {
    pub months: Vec<MonthlyStats>,
}

// ---------------------------------------------------------------------------
// Route handlers
// ---------------------------------------------------------------------------

async fn quote(
    State(state): State<Arc<ApiState>>,
    Json(request): Json<QuoteRequest>,
) -> Result<Json<QuoteResponse>, ApiError> {
    state.metrics.http_requests.with_label_values(&["quote"]).inc();

    let commission_percent = request
        .commission_percent
        .unwrap_or(state.default_commission_percent);
    let input = ExtractionInput {
        stake: request.stake,
        back_odds: request.back_odds,
        lay_odds: request.lay_odds,
        commission_percent,
    };

    let quote = state
        .calculator
        .quote(&input)
        .map_err(ApiError::Extraction)?;
    state.metrics.quotes_served.inc();

    Ok(Json(QuoteResponse {
        lay_stake: quote.lay_stake,
        liability: quote.liability,
        profit: quote.profit,
        extraction_percent: quote.extraction_percent,
        commission_percent,
    }))
}

async fn list_freebets(
    State(state): State<Arc<ApiState>>,
) -> Result<Json<LedgerResponse>, ApiError> {
    state.metrics.http_requests.with_label_values(&["list"]).inc();

    let listed = state.ledger.list().await?;
    Ok(Json(LedgerResponse {
        freebets: listed.value,
        tier: listed.tier,
    }))
}

async fn create_freebet(
    State(state): State<Arc<ApiState>>,
    Json(draft): Json<FreebetDraft>,
) -> Result<(StatusCode, Json<FreebetResponse>), ApiError> {
    state.metrics.http_requests.with_label_values(&["create"]).inc();
    validate_draft(&draft)?;

    let stored = state.ledger.add(draft).await?;
    state.metrics.freebets_recorded.inc();

    Ok((
        StatusCode::CREATED,
        Json(FreebetResponse {
            freebet: stored.value,
            tier: stored.tier,
        }),
    ))
}

async fn update_freebet(
    State(state): State<Arc<ApiState>>,
    Path(id): Path<Uuid>,
    Json(request): Json<UpdateFreebetRequest>,
) -> Result<Json<FreebetResponse>, ApiError> {
    state.metrics.http_requests.with_label_values(&["update"]).inc();

    let freebet = Freebet {
        id,
        bookmaker: request.bookmaker,
        face_value: request.face_value,
        min_odds: request.min_odds,
        status: request.status,
        recorded_at: request.recorded_at,
        expires_at: request.expires_at,
        used: request.used,
        extracted: request.extracted,
        extracted_value: request.extracted_value,
    };

    match state.ledger.update(freebet).await? {
        Some(stored) => Ok(Json(FreebetResponse {
            freebet: stored.value,
            tier: stored.tier,
        })),
        None => Err(ApiError::NotFound),
    }
}

async fn delete_freebet(
    State(state): State<Arc<ApiState>>,
    Path(id): Path<Uuid>,
) -> Result<Json<DeleteResponse>, ApiError> {
    state.metrics.http_requests.with_label_values(&["delete"]).inc();

    let outcome = state.ledger.delete(id).await?;
    if !outcome.value {
        return Err(ApiError::NotFound);
    }
    Ok(Json(DeleteResponse {
        deleted: true,
        tier: outcome.tier,
    }))
}

async fn record_extraction(
    State(state): State<Arc<ApiState>>,
    Path(id): Path<Uuid>,
    Json(request): Json<ExtractRequest>,
) -> Result<Json<FreebetResponse>, ApiError> {
    state
        .metrics
        .http_requests
        .with_label_values(&["extract"])
        .inc();

    if !request.realized_profit.is_finite() {
        return Err(ApiError::BadRequest(
            "realized_profit must be a finite amount".to_string(),
        ));
    }

    match state
        .ledger
        .record_extraction(id, request.realized_profit)
        .await?
    {
        Some(stored) => {
            if stored.value.face_value > 0.0 {
                state
                    .metrics
                    .extraction_percent
                    .observe(request.realized_profit / stored.value.face_value * 100.0);
            }
            Ok(Json(FreebetResponse {
                freebet: stored.value,
                tier: stored.tier,
            }))
        }
        None => Err(ApiError::NotFound),
    }
}

/// Real-time monthly stats. Also refreshes the persistent archive, so
/// viewing the stats page keeps history current.
async fn monthly_stats(
    State(state): State<Arc<ApiState>>,
) -> Result<Json<StatsResponse>, ApiError> {
    state.metrics.http_requests.with_label_values(&["stats"]).inc();

    let months = state.stats.archive_current().await?;
    Ok(Json(StatsResponse { months }))
}

async fn stats_history(
    State(state): State<Arc<ApiState>>,
) -> Result<Json<StatsResponse>, ApiError> {
    state
        .metrics
        .http_requests
        .with_label_values(&["history"])
        .inc();

    let months = state.stats.history().await?;
    Ok(Json(StatsResponse { months }))
}

async fn liveness() -> impl IntoResponse {
    StatusCode::OK
}

async fn readiness(State(state): State<Arc<ApiState>>) -> impl IntoResponse {
    if state.health.is_ready() {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    }
}

fn validate_draft(draft: &FreebetDraft) -> Result<(), ApiError> {
    if draft.bookmaker.trim().is_empty() {
        return Err(ApiError::BadRequest("bookmaker must not be empty".into()));
    }
    if !(draft.face_value > 0.0) || !draft.face_value.is_finite() {
        return Err(ApiError::BadRequest(format!(
            "face_value must be positive, got {}",
            draft.face_value
        )));
    }
    if !(draft.min_odds >= 1.0) || !draft.min_odds.is_finite() {
        return Err(ApiError::BadRequest(format!(
            "min_odds must be at least 1, got {}",
            draft.min_odds
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_draft_accepts_sane_input() {
        let draft = FreebetDraft {
            bookmaker: "betfair".to_string(),
            face_value: 50.0,
            min_odds: 1.5,
            status: "credited".to_string(),
            expires_at: None,
        };
        assert!(validate_draft(&draft).is_ok());
    }

    #[test]
    fn test_validate_draft_rejects_bad_fields() {
        let base = FreebetDraft {
            bookmaker: "betfair".to_string(),
            face_value: 50.0,
            min_odds: 1.5,
            status: String::new(),
            expires_at: None,
        };

        let mut blank = base.clone();
        blank.bookmaker = "  ".to_string();
        assert!(validate_draft(&blank).is_err());

        let mut worthless = base.clone();
        worthless.face_value = 0.0;
        assert!(validate_draft(&worthless).is_err());

        let mut odds = base;
        odds.min_odds = 0.9;
        assert!(validate_draft(&odds).is_err());
    }
}
