use crate::state::AppState;
use axum::{
    extract::{Path, State},
    http::{Method, StatusCode},
    response::Json,
    routing::{get, post},
    Router,
};
use serde::Deserialize;
use serde_json::{json, Value};
use strat_core::{
    BoostLevel, Circuit, Comparison, Optimization, PlannerError, RaceFuel, StintFuel, Strategy,
    StrategyCheck, StrategyConstraints, TyreWearResult,
};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

/// Stint-count ceiling for generate/optimize requests; candidate enumeration
/// is linear in it.
const MAX_REQUEST_STINTS: u32 = 10;

pub type ApiError = (StatusCode, Json<Value>);
pub type ApiResult<T> = Result<Json<T>, ApiError>;

fn api_error(err: &PlannerError) -> ApiError {
    let status = match err {
        PlannerError::UnknownCircuit(_) => StatusCode::NOT_FOUND,
        PlannerError::InvalidInput { .. } => StatusCode::UNPROCESSABLE_ENTITY,
    };
    (status, Json(json!({ "error": err.to_string() })))
}

#[cfg(test)]
pub fn make_router(state: AppState) -> anyhow::Result<Router> {
    make_router_with_cors(state, "http://localhost:5173")
}

pub fn make_router_with_cors(state: AppState, cors_origin: &str) -> anyhow::Result<Router> {
    let origin = cors_origin
        .parse::<axum::http::HeaderValue>()
        .map_err(|err| anyhow::anyhow!("invalid CORS origin '{cors_origin}': {err}"))?;
    let cors = CorsLayer::new()
        .allow_origin(origin)
        .allow_methods([Method::GET, Method::POST])
        .allow_headers(Any);

    Ok(Router::new()
        .route("/api/v1/meta", get(meta_handler))
        .route("/api/v1/circuits", get(circuits_handler))
        .route("/api/v1/circuits/:code", get(circuit_handler))
        .route("/api/v1/tyre-wear", post(tyre_wear_handler))
        .route("/api/v1/race-fuel", post(race_fuel_handler))
        .route("/api/v1/stint-fuel", post(stint_fuel_handler))
        .route("/api/v1/lap-fuel", post(lap_fuel_handler))
        .route("/api/v1/generate", post(generate_handler))
        .route("/api/v1/optimize", post(optimize_handler))
        .route("/api/v1/check", post(check_handler))
        .route("/api/v1/analyze", post(analyze_handler))
        .route("/api/v1/compare", post(compare_handler))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state))
}

// ---------------------------------------------------------------------------
// Request bodies
// ---------------------------------------------------------------------------

#[derive(Deserialize)]
pub struct TyreWearRequest {
    circuit: String,
    /// Free-form; unrecognized names wear like medium.
    compound: String,
    laps: u32,
    tyre_points: f64,
}

#[derive(Deserialize)]
pub struct FuelRequest {
    circuit: String,
    fuel_points: f64,
}

#[derive(Deserialize)]
pub struct StintFuelRequest {
    circuit: String,
    fuel_points: f64,
    laps: u32,
    #[serde(default)]
    boost: BoostLevel,
}

#[derive(Deserialize)]
pub struct PlanRequest {
    circuit: String,
    /// Defaults to the circuit's race distance.
    laps: Option<u32>,
    tyre_points: f64,
    fuel_points: f64,
    #[serde(default)]
    constraints: StrategyConstraints,
}

impl PlanRequest {
    fn race_laps(&self, state: &AppState) -> Result<u32, ApiError> {
        if self.constraints.max_stints > MAX_REQUEST_STINTS {
            return Err(api_error(&PlannerError::InvalidInput {
                field: "max_stints",
                reason: format!("at most {MAX_REQUEST_STINTS} per request"),
            }));
        }
        match self.laps {
            Some(laps) => Ok(laps),
            None => state
                .content
                .circuit(&self.circuit)
                .map(|c| c.laps)
                .map_err(|err| api_error(&err)),
        }
    }
}

#[derive(Deserialize)]
pub struct CheckRequest {
    strategy: Strategy,
}

#[derive(Deserialize)]
pub struct AnalyzeRequest {
    strategy: Strategy,
    /// Defaults to the strategy's own circuit.
    circuit: Option<String>,
}

#[derive(Deserialize)]
pub struct CompareRequest {
    circuit: String,
    strategies: Vec<Strategy>,
}

// ---------------------------------------------------------------------------
// Catalog
// ---------------------------------------------------------------------------

pub async fn meta_handler(State(app_state): State<AppState>) -> Json<Value> {
    let content = &app_state.content;
    Json(json!({
        "content_version": content.content_version,
        "circuits": content.circuits.len(),
        "max_strategy_stints": content.constants.max_strategy_stints,
    }))
}

pub async fn circuits_handler(State(app_state): State<AppState>) -> Json<Vec<Circuit>> {
    Json(app_state.content.iter_circuits().cloned().collect())
}

pub async fn circuit_handler(
    State(app_state): State<AppState>,
    Path(code): Path<String>,
) -> ApiResult<Circuit> {
    app_state
        .content
        .circuit(&code)
        .map(|c| Json(c.clone()))
        .map_err(|err| api_error(&err))
}

// ---------------------------------------------------------------------------
// Tyre and fuel models
// ---------------------------------------------------------------------------

pub async fn tyre_wear_handler(
    State(app_state): State<AppState>,
    Json(req): Json<TyreWearRequest>,
) -> ApiResult<TyreWearResult> {
    strat_core::compute_tyre_wear_by_name(
        &app_state.content,
        &req.circuit,
        &req.compound,
        req.laps,
        req.tyre_points,
    )
    .map(|result| Json(result.rounded()))
    .map_err(|err| api_error(&err))
}

pub async fn race_fuel_handler(
    State(app_state): State<AppState>,
    Json(req): Json<FuelRequest>,
) -> ApiResult<RaceFuel> {
    strat_core::compute_race_fuel(&app_state.content, &req.circuit, req.fuel_points)
        .map(|result| Json(result.rounded()))
        .map_err(|err| api_error(&err))
}

pub async fn stint_fuel_handler(
    State(app_state): State<AppState>,
    Json(req): Json<StintFuelRequest>,
) -> ApiResult<StintFuel> {
    strat_core::compute_stint_fuel(
        &app_state.content,
        &req.circuit,
        req.fuel_points,
        req.laps,
        req.boost,
    )
    .map(|result| Json(result.rounded()))
    .map_err(|err| api_error(&err))
}

pub async fn lap_fuel_handler(
    State(app_state): State<AppState>,
    Json(req): Json<FuelRequest>,
) -> ApiResult<Value> {
    let fuel = strat_core::compute_lap_fuel(&app_state.content, &req.circuit, req.fuel_points)
        .map_err(|err| api_error(&err))?;
    Ok(Json(json!({
        "circuit": req.circuit,
        "fuel_points": req.fuel_points,
        "fuel_per_lap": strat_core::present::round_to(fuel, 3),
    })))
}

// ---------------------------------------------------------------------------
// Strategies
// ---------------------------------------------------------------------------

pub async fn generate_handler(
    State(app_state): State<AppState>,
    Json(req): Json<PlanRequest>,
) -> ApiResult<Vec<Strategy>> {
    let laps = req.race_laps(&app_state)?;
    let candidates = strat_core::generate_strategies(
        &app_state.content,
        &req.circuit,
        laps,
        req.tyre_points,
        req.fuel_points,
        &req.constraints,
    )
    .collect();
    Ok(Json(candidates))
}

pub async fn optimize_handler(
    State(app_state): State<AppState>,
    Json(req): Json<PlanRequest>,
) -> ApiResult<Optimization> {
    let laps = req.race_laps(&app_state)?;
    strat_core::optimize_strategy(
        &app_state.content,
        &req.circuit,
        laps,
        req.tyre_points,
        req.fuel_points,
        &req.constraints,
    )
    .map(Json)
    .map_err(|err| api_error(&err))
}

pub async fn check_handler(
    State(app_state): State<AppState>,
    Json(req): Json<CheckRequest>,
) -> ApiResult<StrategyCheck> {
    req.strategy
        .check(&app_state.content)
        .map(Json)
        .map_err(|err| api_error(&err))
}

pub async fn analyze_handler(
    State(app_state): State<AppState>,
    Json(req): Json<AnalyzeRequest>,
) -> ApiResult<Value> {
    let circuit = req.circuit.as_deref().unwrap_or(&req.strategy.circuit.0);
    let analysis = strat_core::analyze_strategy(&app_state.content, &req.strategy, circuit)
        .map_err(|err| api_error(&err))?;
    let pros_cons = strat_core::pros_and_cons(&analysis);
    Ok(Json(json!({
        "description": req.strategy.description(),
        "analysis": analysis,
        "pros_cons": pros_cons,
    })))
}

pub async fn compare_handler(
    State(app_state): State<AppState>,
    Json(req): Json<CompareRequest>,
) -> ApiResult<Comparison> {
    strat_core::compare_strategies(&app_state.content, &req.strategies, &req.circuit)
        .map(Json)
        .map_err(|err| api_error(&err))
}
