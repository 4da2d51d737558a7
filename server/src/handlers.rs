use axum::Json;
use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, State};
use chrono::{DateTime, Utc};
use serde::Serialize;
use serde_json::{Map, Value, json};
use tracing::{debug, info, warn};
use vpncheck_core::{RangeCounts, RefreshError};

use crate::AppState;
use crate::error::ApiError;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct HealthResponse {
    status: &'static str,
    initialized: bool,
    last_updated: Option<DateTime<Utc>>,
    range_count: RangeCounts,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct CheckResponse {
    ip: String,
    #[serde(rename = "isVPN")]
    is_vpn: bool,
    checked_at: DateTime<Utc>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct RefreshResponse {
    success: bool,
    last_updated: Option<DateTime<Utc>>,
    range_count: RangeCounts,
    warnings: Vec<String>,
}

#[derive(Debug, Serialize)]
pub(crate) struct OverridesResponse {
    overrides: Vec<String>,
}

#[derive(Debug, Serialize)]
pub(crate) struct OverrideChange {
    entry: String,
    changed: bool,
    overrides: Vec<String>,
}

pub(crate) async fn index() -> Json<Value> {
    Json(json!({
        "name": "VPN Detector API",
        "description": "API to check if an IP is associated with a VPN network",
        "endpoints": {
            "health": "GET /health - Check API health",
            "check": "GET /check/{ip} - Check if an IP is a VPN",
            "refresh": "POST /refresh - Refresh the VPN list",
            "overrides": "GET /overrides, PUT|DELETE /overrides/{ip} - Manage manual overrides",
            "ping": "POST /ping - Report server statistics",
            "stats": "GET /stats - Latest statistics per server",
        }
    }))
}

pub(crate) async fn health(State(state): State<AppState>) -> Json<HealthResponse> {
    let status = state.registry.status();
    Json(HealthResponse {
        status: "ok",
        initialized: status.initialized,
        last_updated: status.last_updated,
        range_count: status.range_counts,
    })
}

pub(crate) async fn check(
    State(state): State<AppState>,
    Path(ip): Path<String>,
) -> Result<Json<CheckResponse>, ApiError> {
    let is_vpn = state.registry.lookup(&ip)?;
    debug!(%ip, is_vpn, "checked address");

    Ok(Json(CheckResponse {
        ip,
        is_vpn,
        checked_at: Utc::now(),
    }))
}

pub(crate) async fn refresh(
    State(state): State<AppState>,
) -> Result<Json<RefreshResponse>, ApiError> {
    let warnings = match state.registry.refresh().await {
        Ok(summary) => {
            info!(
                ipv4 = summary.ipv4_count,
                ipv6 = summary.ipv6_count,
                "Manual refresh complete"
            );
            Vec::new()
        }
        Err(e @ RefreshError::Partial { .. }) => {
            warn!("Manual refresh: {e}");
            e.failures().iter().map(ToString::to_string).collect()
        }
        Err(e) => return Err(e.into()),
    };

    let status = state.registry.status();
    Ok(Json(RefreshResponse {
        success: true,
        last_updated: status.last_updated,
        range_count: status.range_counts,
        warnings,
    }))
}

pub(crate) async fn list_overrides(State(state): State<AppState>) -> Json<OverridesResponse> {
    Json(OverridesResponse {
        overrides: state.registry.list_overrides(),
    })
}

pub(crate) async fn add_override(
    State(state): State<AppState>,
    Path(entry): Path<String>,
) -> Result<Json<OverrideChange>, ApiError> {
    let changed = state.registry.add_override(&entry)?;
    Ok(Json(OverrideChange {
        entry,
        changed,
        overrides: state.registry.list_overrides(),
    }))
}

pub(crate) async fn remove_override(
    State(state): State<AppState>,
    Path(entry): Path<String>,
) -> Json<OverrideChange> {
    let changed = state.registry.remove_override(&entry);
    Json(OverrideChange {
        entry,
        changed,
        overrides: state.registry.list_overrides(),
    })
}

/// Stores the reported metrics as the latest ping for `serverId`.
///
/// A missing `timestamp` is filled with the current time in epoch milliseconds.
pub(crate) async fn ping(
    State(state): State<AppState>,
    payload: Result<Json<Map<String, Value>>, JsonRejection>,
) -> Result<Json<Value>, ApiError> {
    let Json(mut metrics) = payload.map_err(|e| {
        debug!("Rejected ping body: {e}");
        ApiError::BadRequest("Invalid JSON".to_string())
    })?;

    let server_id = metrics
        .remove("serverId")
        .filter(is_truthy)
        .ok_or_else(|| ApiError::BadRequest("serverId is required".to_string()))?;
    let key = match &server_id {
        Value::String(id) => id.clone(),
        other => other.to_string(),
    };

    let timestamp = metrics
        .remove("timestamp")
        .filter(is_truthy)
        .unwrap_or_else(|| json!(Utc::now().timestamp_millis()));

    let mut ping = Map::with_capacity(metrics.len() + 2);
    ping.insert("serverId".to_string(), server_id);
    ping.insert("timestamp".to_string(), timestamp);
    ping.extend(metrics);

    debug!(server = %key, "ping received");
    state.stats.record(key, Value::Object(ping));

    Ok(Json(json!({ "status": "ok" })))
}

pub(crate) async fn stats(State(state): State<AppState>) -> Json<Value> {
    Json(json!(state.stats.snapshot()))
}

/// Loose truthiness: `null`, `false`, `0` and `""` count as absent.
fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|n| n != 0.0),
        Value::String(s) => !s.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}

// ╔════════════════════════════════════════════╗
// ║ ████████╗███████╗███████╗████████╗███████╗ ║
// ║ ╚══██╔══╝██╔════╝██╔════╝╚══██╔══╝██╔════╝ ║
// ║    ██║   █████╗  ███████╗   ██║   ███████╗ ║
// ║    ██║   ██╔══╝  ╚════██║   ██║   ╚════██║ ║
// ║    ██║   ███████╗███████║   ██║   ███████║ ║
// ║    ╚═╝   ╚══════╝╚══════╝   ╚═╝   ╚══════╝ ║
// ╚════════════════════════════════════════════╝
