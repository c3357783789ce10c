use axum::{
    extract::{Path, Query, State},
    http::{HeaderMap, StatusCode},
    response::IntoResponse,
    Json,
};
use serde::Deserialize;
use serde_json::json;
use tokio::sync::oneshot;

use crate::models::hives::HiveMemberDetailRequest;
use crate::services::{hives::HiveRequest, ServiceError};

/// Account id of the caller, set by the authenticating gateway.
const ACCOUNT_ID_HEADER: &str = "x-account-id";

#[derive(Debug, Default, Deserialize)]
pub(super) struct HiveDetailQuery {
    #[serde(default)]
    is_testing: bool,
}

fn error_status(error: &ServiceError) -> (StatusCode, &'static str) {
    match error {
        ServiceError::NotFound(_) => (StatusCode::NOT_FOUND, "not_found"),
        ServiceError::NotAuthorized(_) => (StatusCode::FORBIDDEN, "not_authorized"),
        ServiceError::Repository(_, _) => (StatusCode::BAD_GATEWAY, "dependency_error"),
        ServiceError::Configuration(_) => {
            (StatusCode::INTERNAL_SERVER_ERROR, "configuration_error")
        }
        ServiceError::Cancelled(_) => (StatusCode::GATEWAY_TIMEOUT, "cancelled"),
        ServiceError::Communication(_, _) => {
            (StatusCode::INTERNAL_SERVER_ERROR, "internal_error")
        }
    }
}

fn error_response(error: ServiceError) -> (StatusCode, Json<serde_json::Value>) {
    let (status, kind) = error_status(&error);

    (
        status,
        Json(json!({
            "error": kind,
            "details": error.to_string()
        })),
    )
}

fn current_user_id(headers: &HeaderMap) -> Option<i64> {
    headers
        .get(ACCOUNT_ID_HEADER)?
        .to_str()
        .ok()?
        .trim()
        .parse()
        .ok()
}

pub(super) async fn get_hive_member_detail(
    State(state): State<super::AppState>,
    Path(hive_id): Path<i64>,
    Query(query): Query<HiveDetailQuery>,
    headers: HeaderMap,
) -> impl IntoResponse {
    let Some(current_user_id) = current_user_id(&headers) else {
        return (
            StatusCode::BAD_REQUEST,
            Json(json!({
                "error": "bad_request",
                "details": format!("Missing or invalid {} header.", ACCOUNT_ID_HEADER)
            })),
        );
    };

    let (hive_tx, hive_rx) = oneshot::channel();
    let hive_result = state
        .hive_channel
        .send(HiveRequest::GetHiveMemberDetail {
            request: HiveMemberDetailRequest {
                hive_id,
                current_user_id,
                is_testing: query.is_testing,
            },
            response: hive_tx,
        })
        .await;
    if let Err(e) = hive_result {
        return error_response(ServiceError::Communication(
            "Http => Hive".to_string(),
            e.to_string(),
        ));
    }

    match hive_rx.await {
        Ok(Ok(detail)) => (StatusCode::OK, Json(json!(detail))),
        Ok(Err(service_error)) => error_response(service_error),
        // the service only drops the sender when the resolution was abandoned
        Err(e) => error_response(ServiceError::Cancelled(e.to_string())),
    }
}
