//! HTTP API for EcoPlay
//!
//! Endpoints:
//! - GET  /health - Health check
//! - POST /game/public-goods/submit - Settle and record a Public Goods round
//! - POST /game/trust-game/submit - Settle and record a Trust round
//! - GET  /game/history/{game_type} - Raw per-user round records
//! - POST /match/trust-game - Draw and record an opponent match
//! - GET  /match/trust-game/personalities - Personality table
//! - GET  /match/history - Per-user match records
//! - POST /message/generate - Advisory message, persisted
//! - GET  /message/history - Per-user messages, time-ordered
//! - POST /message/feedback - Helpful flag for a message
//! - GET  /report/public-goods - Summary + sorted rounds
//! - GET  /report/trust-game - Summary + sorted rounds, optional role filter
//! - GET  /report/games - Raw records per game type
//! - GET  /report/all - Combined report
//! - POST /consent/submit, GET /consent/check/{record_number},
//!   GET /consent/list, PUT /consent/update/{id}, DELETE /consent/delete/{id}

use axum::{
    extract::{Path, Query, State},
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Json, Response},
    routing::{delete, get, post, put},
    Router,
};
use chrono::Utc;
use rand::Rng;
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use serde_json::{json, Value};
use std::str::FromStr;
use std::sync::Arc;
use tower_http::cors::{AllowOrigin, Any, CorsLayer};

use crate::core::{advisor, auth, public_goods, report, trust};
use crate::core::auth::{AuthUser, TokenVerifier};
use crate::core::store::{
    DocumentStore, COLLECTION_BASIC_INFO, COLLECTION_FEEDBACK, COLLECTION_MATCHES,
    COLLECTION_MESSAGES, COLLECTION_PUBLIC_GOODS, COLLECTION_TRUST_GAME,
};
use crate::types::{
    ApiError, ConsentRecord, ConsentRequest, ConsentStatus, FeedbackRecord, GameType, MatchRecord,
    MatchRequest, MatchResult, MessageRecord, MessageRequest, MessageResponse, PublicGoodsOutcome,
    PublicGoodsRecord, PublicGoodsRequest, TrustOutcome, TrustRecord, TrustRequest, TrustRole,
    OPPONENT_PERSONALITIES,
};

/// Shared request-handler dependencies, injected once at startup
pub struct AppState {
    pub store: Arc<dyn DocumentStore>,
    pub verifier: Arc<dyn TokenVerifier>,
    /// Substitute the fixed development identity when no token is sent
    pub allow_dev_user: bool,
}

impl AppState {
    pub fn new(
        store: Arc<dyn DocumentStore>,
        verifier: Arc<dyn TokenVerifier>,
        allow_dev_user: bool,
    ) -> Self {
        Self {
            store,
            verifier,
            allow_dev_user,
        }
    }
}

type ApiResult<T> = std::result::Result<T, ApiError>;

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = match &self {
            ApiError::InvalidToken(_) => StatusCode::UNAUTHORIZED,
            ApiError::MalformedInput(_) => StatusCode::UNPROCESSABLE_ENTITY,
            ApiError::UnsupportedGameType(_) | ApiError::UnsupportedRole(_) => {
                StatusCode::BAD_REQUEST
            }
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::PermissionDenied(_) => StatusCode::FORBIDDEN,
            ApiError::StorageUnavailable(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };

        if status == StatusCode::INTERNAL_SERVER_ERROR {
            tracing::error!(error = %self, "request failed");
        } else {
            tracing::warn!(error = %self, status = %status, "request rejected");
        }

        let body = Json(json!({"success": false, "error": self.to_string()}));
        (status, body).into_response()
    }
}

/// Resolve the authenticated identity from the Authorization header
fn authenticate(state: &AppState, headers: &HeaderMap) -> ApiResult<AuthUser> {
    let header = headers
        .get("authorization")
        .and_then(|v| v.to_str().ok());

    match header {
        Some(value) => {
            let token = auth::bearer_token(value)?;
            state.verifier.verify(token)
        }
        None if state.allow_dev_user => Ok(AuthUser::dev_user()),
        None => Err(ApiError::InvalidToken(
            "missing or invalid token".to_string(),
        )),
    }
}

/// Store a serializable record, mapping serialization faults to storage errors
fn store_record<T: Serialize>(
    store: &dyn DocumentStore,
    collection: &str,
    record: &T,
) -> ApiResult<String> {
    let doc = serde_json::to_value(record)
        .map_err(|e| ApiError::StorageUnavailable(e.to_string()))?;
    store.add(collection, doc)
}

/// Load all of one user's records from a collection, typed
fn load_records<T: DeserializeOwned>(
    store: &dyn DocumentStore,
    collection: &str,
    user_id: &str,
) -> ApiResult<Vec<T>> {
    let docs = store.query(collection, &[("user_id", json!(user_id))])?;
    docs.into_iter()
        .map(|doc| {
            serde_json::from_value(doc.data)
                .map_err(|e| ApiError::StorageUnavailable(format!("corrupt record: {}", e)))
        })
        .collect()
}

// =============================================================================
// ROUTER
// =============================================================================

/// Create the API router with injected dependencies
pub fn create_router(state: AppState) -> Router {
    let state = Arc::new(state);

    Router::new()
        .route("/health", get(health))
        .route("/game/public-goods/submit", post(submit_public_goods))
        .route("/game/trust-game/submit", post(submit_trust_game))
        .route("/game/history/:game_type", get(game_history))
        .route("/match/trust-game", post(match_trust_game))
        .route("/match/trust-game/personalities", get(list_personalities))
        .route("/match/history", get(match_history))
        .route("/message/generate", post(generate_message))
        .route("/message/history", get(message_history))
        .route("/message/feedback", post(message_feedback))
        .route("/report/public-goods", get(report_public_goods))
        .route("/report/trust-game", get(report_trust_game))
        .route("/report/games", get(report_games))
        .route("/report/all", get(report_all))
        .route("/consent/submit", post(consent_submit))
        .route("/consent/check/:record_number", get(consent_check))
        .route("/consent/list", get(consent_list))
        .route("/consent/update/:document_id", put(consent_update))
        .route("/consent/delete/:document_id", delete(consent_delete))
        .with_state(state)
}

// =============================================================================
// SYSTEM
// =============================================================================

#[derive(Debug, Serialize)]
struct HealthResponse {
    status: String,
    version: String,
}

async fn health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
        version: crate::VERSION.to_string(),
    })
}

// =============================================================================
// GAME
// =============================================================================

#[derive(Debug, Serialize)]
struct PublicGoodsResponse {
    success: bool,
    #[serde(flatten)]
    outcome: PublicGoodsOutcome,
}

async fn submit_public_goods(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Json(request): Json<PublicGoodsRequest>,
) -> ApiResult<Json<PublicGoodsResponse>> {
    let user = authenticate(&state, &headers)?;
    let outcome = public_goods::settle(&request, &mut rand::thread_rng())?;

    let record = PublicGoodsRecord {
        user_id: auth::participant_id(&user),
        user_email: user.email,
        round: request.round,
        donation: outcome.user_donation,
        other_donations: outcome.other_donations.clone(),
        total_donated: outcome.total_donated,
        common_pot: outcome.common_pot,
        share_per_player: outcome.share_per_player,
        payoff: outcome.payoff,
        new_balance: outcome.new_balance,
        timestamp: Utc::now(),
    };
    store_record(state.store.as_ref(), COLLECTION_PUBLIC_GOODS, &record)?;

    tracing::info!(
        user_id = %record.user_id,
        round = request.round,
        payoff = outcome.payoff,
        "public goods round settled"
    );

    Ok(Json(PublicGoodsResponse {
        success: true,
        outcome,
    }))
}

#[derive(Debug, Serialize)]
struct TrustResponse {
    success: bool,
    #[serde(flatten)]
    outcome: TrustOutcome,
}

async fn submit_trust_game(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Json(request): Json<TrustRequest>,
) -> ApiResult<Json<TrustResponse>> {
    let user = authenticate(&state, &headers)?;
    let outcome = trust::settle(&request, &mut rand::thread_rng())?;

    let record = TrustRecord {
        user_id: auth::participant_id(&user),
        user_email: user.email,
        round: request.round,
        settlement: outcome.settlement.clone(),
        payoff: outcome.payoff,
        new_balance: outcome.new_balance,
        timestamp: Utc::now(),
    };
    store_record(state.store.as_ref(), COLLECTION_TRUST_GAME, &record)?;

    tracing::info!(
        user_id = %record.user_id,
        round = request.round,
        role = %outcome.settlement.role(),
        payoff = outcome.payoff,
        "trust round settled"
    );

    Ok(Json(TrustResponse {
        success: true,
        outcome,
    }))
}

async fn game_history(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Path(game_type): Path<String>,
) -> ApiResult<Json<Value>> {
    let user = authenticate(&state, &headers)?;
    let game_type = GameType::from_str(&game_type)?;

    let docs = state.store.query(
        game_type.collection(),
        &[("user_id", json!(auth::participant_id(&user)))],
    )?;
    let history: Vec<Value> = docs.into_iter().map(|doc| doc.data).collect();

    Ok(Json(json!({"history": history})))
}

// =============================================================================
// MATCH
// =============================================================================

async fn match_trust_game(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Json(request): Json<MatchRequest>,
) -> ApiResult<Json<MatchResult>> {
    let user = authenticate(&state, &headers)?;
    if request.game_type != "trust-game" {
        return Err(ApiError::UnsupportedGameType(request.game_type));
    }

    let personality =
        &OPPONENT_PERSONALITIES[rand::thread_rng().gen_range(0..OPPONENT_PERSONALITIES.len())];

    let record = MatchRecord {
        user_id: auth::participant_id(&user),
        user_email: user.email,
        game_type: request.game_type,
        matched_personality: personality.name.to_string(),
        personality_description: personality.description.to_string(),
        return_rate_range: personality.return_rate_range,
        timestamp: Utc::now(),
    };
    let match_id = store_record(state.store.as_ref(), COLLECTION_MATCHES, &record)?;

    Ok(Json(MatchResult {
        user_id: record.user_id,
        matched_personality: record.matched_personality,
        match_id,
        timestamp: record.timestamp.to_rfc3339(),
        description: record.personality_description,
    }))
}

async fn list_personalities() -> Json<Value> {
    Json(json!({"personalities": OPPONENT_PERSONALITIES}))
}

async fn match_history(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
) -> ApiResult<Json<Value>> {
    let user = authenticate(&state, &headers)?;
    let docs = state.store.query(
        COLLECTION_MATCHES,
        &[("user_id", json!(auth::participant_id(&user)))],
    )?;
    let history: Vec<Value> = docs.into_iter().map(|doc| doc.data).collect();

    Ok(Json(json!({"match_history": history})))
}

// =============================================================================
// MESSAGE
// =============================================================================

async fn generate_message(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Json(request): Json<MessageRequest>,
) -> ApiResult<Json<MessageResponse>> {
    let user = authenticate(&state, &headers)?;
    let game_type = GameType::from_str(&request.game_type)?;

    let content = advisor::select_message(
        game_type,
        request.round,
        request.performance_data.as_ref(),
        &mut rand::thread_rng(),
    )?;

    let record = MessageRecord {
        user_id: auth::participant_id(&user),
        user_email: user.email,
        game_type: request.game_type,
        round: request.round,
        content: content.clone(),
        role: "assistant".to_string(),
        timestamp: Utc::now(),
    };
    store_record(state.store.as_ref(), COLLECTION_MESSAGES, &record)?;

    Ok(Json(MessageResponse {
        content,
        role: "assistant".to_string(),
        timestamp: record.timestamp.to_rfc3339(),
    }))
}

#[derive(Debug, Deserialize)]
struct MessageHistoryQuery {
    game_type: Option<String>,
}

async fn message_history(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Query(query): Query<MessageHistoryQuery>,
) -> ApiResult<Json<Value>> {
    let user = authenticate(&state, &headers)?;

    let mut filters = vec![("user_id", json!(auth::participant_id(&user)))];
    if let Some(ref game_type) = query.game_type {
        filters.push(("game_type", json!(game_type)));
    }

    let docs = state.store.query(COLLECTION_MESSAGES, &filters)?;
    let mut messages: Vec<Value> = docs.into_iter().map(|doc| doc.data).collect();
    // RFC 3339 timestamps order lexicographically
    messages.sort_by(|a, b| {
        a["timestamp"]
            .as_str()
            .unwrap_or("")
            .cmp(b["timestamp"].as_str().unwrap_or(""))
    });

    Ok(Json(json!({"messages": messages})))
}

#[derive(Debug, Deserialize)]
struct FeedbackRequest {
    message_id: String,
    helpful: bool,
}

async fn message_feedback(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Json(request): Json<FeedbackRequest>,
) -> ApiResult<Json<Value>> {
    let user = authenticate(&state, &headers)?;

    let record = FeedbackRecord {
        user_id: auth::participant_id(&user),
        message_id: request.message_id,
        helpful: request.helpful,
        timestamp: Utc::now(),
    };
    store_record(state.store.as_ref(), COLLECTION_FEEDBACK, &record)?;

    Ok(Json(json!({"success": true, "message": "feedback saved"})))
}

// =============================================================================
// REPORT
// =============================================================================

async fn report_public_goods(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
) -> ApiResult<Json<crate::types::PublicGoodsReport>> {
    let user = authenticate(&state, &headers)?;
    let records: Vec<PublicGoodsRecord> = load_records(
        state.store.as_ref(),
        COLLECTION_PUBLIC_GOODS,
        &auth::participant_id(&user),
    )?;
    Ok(Json(report::aggregate_public_goods(records)))
}

#[derive(Debug, Deserialize)]
struct TrustReportQuery {
    role: Option<String>,
}

async fn report_trust_game(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Query(query): Query<TrustReportQuery>,
) -> ApiResult<Json<crate::types::TrustReport>> {
    let user = authenticate(&state, &headers)?;
    let role = query
        .role
        .as_deref()
        .map(TrustRole::from_str)
        .transpose()?;

    let records: Vec<TrustRecord> = load_records(
        state.store.as_ref(),
        COLLECTION_TRUST_GAME,
        &auth::participant_id(&user),
    )?;
    Ok(Json(report::aggregate_trust(records, role)))
}

#[derive(Debug, Deserialize)]
struct GamesReportQuery {
    game_type: Option<String>,
}

async fn report_games(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Query(query): Query<GamesReportQuery>,
) -> ApiResult<Json<Value>> {
    let user = authenticate(&state, &headers)?;
    let user_id = auth::participant_id(&user);
    let filters = [("user_id", json!(user_id))];

    match query.game_type {
        Some(ref name) => {
            let game_type = GameType::from_str(name)?;
            let docs = state.store.query(game_type.collection(), &filters)?;
            let games: Vec<Value> = docs.into_iter().map(|doc| doc.data).collect();
            Ok(Json(json!({"game_type": name, "games": games})))
        }
        None => {
            let pg: Vec<Value> = state
                .store
                .query(COLLECTION_PUBLIC_GOODS, &filters)?
                .into_iter()
                .map(|doc| doc.data)
                .collect();
            let tg: Vec<Value> = state
                .store
                .query(COLLECTION_TRUST_GAME, &filters)?
                .into_iter()
                .map(|doc| doc.data)
                .collect();
            Ok(Json(json!({"games": {"public_goods": pg, "trust_game": tg}})))
        }
    }
}

async fn report_all(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
) -> ApiResult<Json<crate::types::OverallReport>> {
    let user = authenticate(&state, &headers)?;
    let user_id = auth::participant_id(&user);

    let pg_records: Vec<PublicGoodsRecord> =
        load_records(state.store.as_ref(), COLLECTION_PUBLIC_GOODS, &user_id)?;
    let tg_records: Vec<TrustRecord> =
        load_records(state.store.as_ref(), COLLECTION_TRUST_GAME, &user_id)?;

    let public_goods = report::aggregate_public_goods(pg_records);
    let trust_game = report::aggregate_trust(tg_records, None);
    Ok(Json(report::aggregate_overall(public_goods, trust_game)))
}

// =============================================================================
// CONSENT
// =============================================================================

async fn consent_submit(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Json(request): Json<ConsentRequest>,
) -> ApiResult<Json<Value>> {
    let user = authenticate(&state, &headers)?;
    let now = Utc::now();

    let record = ConsentRecord {
        user_id: request.medical_record_number.clone(),
        user_email: format!("{}{}", request.medical_record_number, crate::EMAIL_DOMAIN),
        consent_given: request.consent_given,
        consent_details: request.consent_details,
        auth_uid: user.uid,
        consent_timestamp: now,
        created_at: now,
        updated_at: None,
    };
    let document_id = store_record(state.store.as_ref(), COLLECTION_BASIC_INFO, &record)?;

    tracing::info!(user_id = %record.user_id, document_id = %document_id, "consent submitted");

    Ok(Json(json!({
        "success": true,
        "document_id": document_id,
        "message": "consent submitted"
    })))
}

async fn consent_check(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Path(record_number): Path<String>,
) -> ApiResult<Json<ConsentStatus>> {
    authenticate(&state, &headers)?;

    let mut docs = state
        .store
        .query(COLLECTION_BASIC_INFO, &[("user_id", json!(record_number))])?;

    if docs.is_empty() {
        return Ok(Json(ConsentStatus {
            exists: false,
            consent_given: None,
            consent_details: None,
            consent_timestamp: None,
            document_id: None,
            message: "no consent on file".to_string(),
        }));
    }

    // Latest document wins
    docs.sort_by(|a, b| {
        b.data["created_at"]
            .as_str()
            .unwrap_or("")
            .cmp(a.data["created_at"].as_str().unwrap_or(""))
    });
    let latest = &docs[0];
    let record: ConsentRecord = serde_json::from_value(latest.data.clone())
        .map_err(|e| ApiError::StorageUnavailable(format!("corrupt record: {}", e)))?;

    Ok(Json(ConsentStatus {
        exists: true,
        consent_given: Some(record.consent_given),
        consent_details: Some(record.consent_details),
        consent_timestamp: Some(record.consent_timestamp.to_rfc3339()),
        document_id: Some(latest.id.clone()),
        message: "consent on file".to_string(),
    }))
}

async fn consent_list(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
) -> ApiResult<Json<Value>> {
    let user = authenticate(&state, &headers)?;

    let docs = state
        .store
        .query(COLLECTION_BASIC_INFO, &[("auth_uid", json!(user.uid))])?;
    let mut consents: Vec<Value> = docs
        .into_iter()
        .map(|doc| {
            let mut data = doc.data;
            data["document_id"] = json!(doc.id);
            data
        })
        .collect();
    // Newest first
    consents.sort_by(|a, b| {
        b["created_at"]
            .as_str()
            .unwrap_or("")
            .cmp(a["created_at"].as_str().unwrap_or(""))
    });

    let total = consents.len();
    Ok(Json(json!({"consents": consents, "total": total})))
}

/// Load a consent document and check that the authenticated identity owns it
fn owned_consent(
    state: &AppState,
    user: &AuthUser,
    document_id: &str,
) -> ApiResult<ConsentRecord> {
    let doc = state
        .store
        .get(COLLECTION_BASIC_INFO, document_id)?
        .ok_or_else(|| ApiError::NotFound(format!("consent document {}", document_id)))?;
    let record: ConsentRecord = serde_json::from_value(doc.data)
        .map_err(|e| ApiError::StorageUnavailable(format!("corrupt record: {}", e)))?;

    if record.auth_uid != user.uid {
        return Err(ApiError::PermissionDenied(
            "consent document belongs to another identity".to_string(),
        ));
    }
    Ok(record)
}

async fn consent_update(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Path(document_id): Path<String>,
    Json(request): Json<ConsentRequest>,
) -> ApiResult<Json<Value>> {
    let user = authenticate(&state, &headers)?;
    owned_consent(&state, &user, &document_id)?;

    let patch = json!({
        "consent_given": request.consent_given,
        "consent_details": request.consent_details,
        "updated_at": Utc::now(),
    });
    state.store.update(COLLECTION_BASIC_INFO, &document_id, patch)?;

    Ok(Json(json!({
        "success": true,
        "document_id": document_id,
        "message": "consent updated"
    })))
}

async fn consent_delete(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Path(document_id): Path<String>,
) -> ApiResult<Json<Value>> {
    let user = authenticate(&state, &headers)?;
    owned_consent(&state, &user, &document_id)?;

    state.store.delete(COLLECTION_BASIC_INFO, &document_id)?;

    Ok(Json(json!({
        "success": true,
        "document_id": document_id,
        "message": "consent deleted"
    })))
}

// =============================================================================
// SERVER
// =============================================================================

/// Run the API server
pub async fn run_server(
    addr: &str,
    state: AppState,
    cors_origins: &[String],
) -> Result<(), Box<dyn std::error::Error>> {
    let cors = if cors_origins.is_empty() {
        CorsLayer::new()
            .allow_origin(Any)
            .allow_methods(Any)
            .allow_headers(Any)
    } else {
        let origins: Vec<_> = cors_origins
            .iter()
            .map(|o| o.parse())
            .collect::<Result<_, _>>()?;
        CorsLayer::new()
            .allow_origin(AllowOrigin::list(origins))
            .allow_methods(Any)
            .allow_headers(Any)
    };

    let router = create_router(state).layer(cors);
    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!(%addr, version = crate::VERSION, "EcoPlay API running");
    axum::serve(listener, router).await?;
    Ok(())
}
