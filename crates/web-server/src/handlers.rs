use crate::models::{
    ExposureDiffParams, ExposureDiffResponse, ExposureParams, ExposureResponse,
    RangeReturnsResponse, ReturnsParams, ReturnsResponse, WindowReturnsResponse,
};
use crate::{AppState, error::AppError};
use analytics::{ExposureColumns, IndexFilter, SeriesColumns};
use axum::{
    Json,
    extract::{Query, State, rejection::QueryRejection},
};
use core_types::{NaStrategy, parse_date};
use serde_json::{Value, json};
use std::sync::Arc;

/// # GET /health
pub async fn health() -> Json<Value> {
    Json(json!({ "status": "ok" }))
}

/// # GET /returns
/// Cumulative returns and alpha, either over `start_date..=end_date` or, when `as_of` is
/// given, over each trailing window ending at `as_of`.
pub async fn get_returns(
    State(state): State<Arc<AppState>>,
    query: Result<Query<Vec<(String, String)>>, QueryRejection>,
) -> Result<Json<ReturnsResponse>, AppError> {
    let Query(pairs) = query.map_err(|e| AppError::BadRequest(e.body_text()))?;
    let params = ReturnsParams::from_pairs(pairs)?;

    let response = match params.as_of.clone() {
        Some(as_of) => ReturnsResponse::Windows(windowed_returns(&state, params, &as_of).await?),
        None => ReturnsResponse::Range(range_returns(&state, params).await?),
    };
    Ok(Json(response))
}

async fn range_returns(
    state: &AppState,
    params: ReturnsParams,
) -> Result<RangeReturnsResponse, AppError> {
    let start_date = params.start_date.ok_or_else(|| missing("start_date"))?;
    let end_date = params.end_date.ok_or_else(|| missing("end_date"))?;
    let start = parse_date(&start_date)?;
    let end = parse_date(&end_date)?;

    let dataset = state.cache.get().await?;
    let columns = &state.settings.returns;
    let result = analytics::compute_range(
        &dataset.returns,
        SeriesColumns {
            date: &columns.date_col,
            fund: &columns.fund_col,
            benchmark: &columns.benchmark_col,
        },
        start,
        end,
    )?;

    tracing::info!(%start, %end, fund = %result.fund_geom, alpha = %result.alpha, "Range returns computed.");

    Ok(RangeReturnsResponse {
        start_date,
        end_date,
        fund_geom: result.fund_geom,
        benchmark_geom: result.benchmark_geom,
        alpha: result.alpha,
    })
}

async fn windowed_returns(
    state: &AppState,
    params: ReturnsParams,
    as_of: &str,
) -> Result<WindowReturnsResponse, AppError> {
    let as_of = parse_date(as_of)?;
    let strategy = na_strategy(state, params.na_strategy.as_deref())?;
    let defaults = &state.settings.returns;
    let windows = if params.windows.is_empty() {
        defaults.default_windows.clone()
    } else {
        params.windows
    };

    let dataset = state.cache.get().await?;
    let results = analytics::compute_windows(
        &dataset.returns,
        SeriesColumns {
            date: params.date_col.as_deref().unwrap_or(&defaults.date_col),
            fund: params.fund_col.as_deref().unwrap_or(&defaults.fund_col),
            benchmark: params.bench_col.as_deref().unwrap_or(&defaults.benchmark_col),
        },
        as_of,
        &windows,
        strategy,
    )?;

    tracing::info!(%as_of, ?windows, %strategy, "Windowed returns computed.");
    Ok(WindowReturnsResponse { results })
}

/// # GET /exposure-diff
/// Per-group summed weights at two dates, optionally restricted to one index.
pub async fn get_exposure_diff(
    State(state): State<Arc<AppState>>,
    query: Result<Query<ExposureDiffParams>, QueryRejection>,
) -> Result<Json<ExposureDiffResponse>, AppError> {
    let Query(params) = query.map_err(|e| AppError::BadRequest(e.body_text()))?;
    let columns = &state.settings.constituents;
    let group_by = params.group_by.unwrap_or_else(|| columns.region_col.clone());
    let start = parse_date(&params.start_date)?;
    let end = parse_date(&params.end_date)?;
    let strategy = na_strategy(&state, params.na_strategy.as_deref())?;

    let dataset = state.cache.get().await?;
    if !dataset.constituents.has_column(&group_by) {
        return Err(AppError::BadRequest(format!(
            "Group-by column '{}' not found",
            group_by
        )));
    }

    let index = params
        .index
        .as_deref()
        .filter(|value| !value.trim().is_empty())
        .map(|value| IndexFilter {
            column: &columns.index_col,
            value,
        });

    let results = analytics::difference(
        &dataset.constituents,
        ExposureColumns {
            date: &columns.date_col,
            weight: &columns.weight_col,
            group: &group_by,
        },
        start,
        end,
        index,
        strategy,
    )?;

    tracing::info!(%start, %end, %group_by, groups = results.len(), "Exposure difference computed.");

    Ok(Json(ExposureDiffResponse {
        group_by,
        start_date: params.start_date,
        end_date: params.end_date,
        index: params.index,
        results,
    }))
}

/// # GET /exposure
/// The left/right form of the exposure difference, with overridable column names.
pub async fn get_exposure(
    State(state): State<Arc<AppState>>,
    query: Result<Query<ExposureParams>, QueryRejection>,
) -> Result<Json<ExposureResponse>, AppError> {
    let Query(params) = query.map_err(|e| AppError::BadRequest(e.body_text()))?;
    let defaults = &state.settings.constituents;
    let left = parse_date(&params.left_date)?;
    let right = parse_date(&params.right_date)?;
    let strategy = na_strategy(&state, params.na_strategy.as_deref())?;

    let dataset = state.cache.get().await?;
    let results = analytics::difference(
        &dataset.constituents,
        ExposureColumns {
            date: params.date_col.as_deref().unwrap_or(&defaults.date_col),
            weight: params.weight_col.as_deref().unwrap_or(&defaults.weight_col),
            group: params.group_by.as_deref().unwrap_or(&defaults.region_col),
        },
        left,
        right,
        None,
        strategy,
    )?;

    tracing::info!(%left, %right, %strategy, groups = results.len(), "Exposure computed.");

    Ok(Json(ExposureResponse {
        results: results.into_iter().map(Into::into).collect(),
    }))
}

fn na_strategy(state: &AppState, requested: Option<&str>) -> Result<NaStrategy, AppError> {
    match requested {
        Some(value) => Ok(value.parse()?),
        None => Ok(state.settings.data.default_na_strategy),
    }
}

fn missing(name: &str) -> AppError {
    AppError::BadRequest(format!("Missing query parameter '{}'", name))
}
