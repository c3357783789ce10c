use axum::{routing::get, Router};
use tokio::sync::mpsc;
use tower_http::trace::TraceLayer;

use super::hives::HiveRequest;

mod hives;

#[derive(Clone)]
struct AppState {
    hive_channel: mpsc::Sender<HiveRequest>,
}

fn router(hive_channel: mpsc::Sender<HiveRequest>) -> Router {
    let app_state = AppState { hive_channel };

    Router::new()
        .route("/hives/{hive_id}", get(hives::get_hive_member_detail))
        .route("/health", get(|| async { "OK" }))
        .with_state(app_state)
        .layer(TraceLayer::new_for_http())
}

pub async fn start_http_server(
    listen: &str,
    hive_channel: mpsc::Sender<HiveRequest>,
) -> Result<(), anyhow::Error> {
    let app = router(hive_channel);

    let listener = tokio::net::TcpListener::bind(listen).await?;
    log::info!("Listening on {}", listener.local_addr()?);

    axum::serve(listener, app).await?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{
        body::{to_bytes, Body},
        http::{Request, StatusCode},
    };
    use serde_json::Value;
    use tower::ServiceExt;

    use crate::models::hives::HiveMemberDetail;
    use crate::services::ServiceError;

    /// Answers every request with the given outcome and hands back what it received.
    fn spawn_hive_service(
        outcome: fn(i64) -> Result<HiveMemberDetail, ServiceError>,
    ) -> (mpsc::Sender<HiveRequest>, mpsc::Receiver<(i64, i64, bool)>) {
        let (hive_tx, mut hive_rx) = mpsc::channel::<HiveRequest>(8);
        let (seen_tx, seen_rx) = mpsc::channel(8);

        tokio::spawn(async move {
            while let Some(HiveRequest::GetHiveMemberDetail { request, response }) =
                hive_rx.recv().await
            {
                let _ = seen_tx
                    .send((request.hive_id, request.current_user_id, request.is_testing))
                    .await;
                let _ = response.send(outcome(request.hive_id));
            }
        });

        (hive_tx, seen_rx)
    }

    async fn call(app: Router, uri: &str, account_id: Option<&str>) -> (StatusCode, Value) {
        let mut request = Request::builder().uri(uri);
        if let Some(account_id) = account_id {
            request = request.header("x-account-id", account_id);
        }

        let response = app
            .oneshot(request.body(Body::empty()).unwrap())
            .await
            .unwrap();
        let status = response.status();
        let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();

        (status, serde_json::from_slice(&body).unwrap_or(Value::Null))
    }

    #[tokio::test]
    async fn test_health() {
        let (hive_tx, _) = spawn_hive_service(|_| Ok(HiveMemberDetail::default()));
        let response = router(hive_tx)
            .oneshot(Request::builder().uri("/health").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn test_detail_is_served() {
        let (hive_tx, mut seen_rx) = spawn_hive_service(|hive_id| {
            Ok(HiveMemberDetail {
                hive_id,
                account_id: 3,
                account_wallet_public_key: "0x742d...f44e".to_string(),
                beacon_points: 20,
                tier: 1,
                tier_name: "New Bee".to_string(),
                ..Default::default()
            })
        });

        let (status, body) = call(router(hive_tx), "/hives/1?is_testing=true", Some("2")).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["hive_id"], 1);
        assert_eq!(body["account_wallet_public_key"], "0x742d...f44e");
        assert_eq!(body["beacon_points"], 20);
        assert_eq!(body["tier_name"], "New Bee");
        assert_eq!(body["last_purchase_at"], Value::Null);
        assert_eq!(seen_rx.recv().await, Some((1, 2, true)));
    }

    #[tokio::test]
    async fn test_testing_flag_defaults_to_false() {
        let (hive_tx, mut seen_rx) = spawn_hive_service(|_| Ok(HiveMemberDetail::default()));

        let (status, _) = call(router(hive_tx), "/hives/7", Some("3")).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(seen_rx.recv().await, Some((7, 3, false)));
    }

    #[tokio::test]
    async fn test_errors_map_to_status() {
        let cases: [(fn(i64) -> Result<HiveMemberDetail, ServiceError>, StatusCode, &str); 4] = [
            (
                |_| Err(ServiceError::NotFound("Hive 1 not found.".to_string())),
                StatusCode::NOT_FOUND,
                "not_found",
            ),
            (
                |_| Err(ServiceError::NotAuthorized("no".to_string())),
                StatusCode::FORBIDDEN,
                "not_authorized",
            ),
            (
                |_| Err(ServiceError::Repository("Accounts".to_string(), "down".to_string())),
                StatusCode::BAD_GATEWAY,
                "dependency_error",
            ),
            (
                |_| Err(ServiceError::Cancelled("slow".to_string())),
                StatusCode::GATEWAY_TIMEOUT,
                "cancelled",
            ),
        ];

        for (outcome, expected_status, expected_kind) in cases {
            let (hive_tx, _seen_rx) = spawn_hive_service(outcome);
            let (status, body) = call(router(hive_tx), "/hives/1", Some("2")).await;

            assert_eq!(status, expected_status);
            assert_eq!(body["error"], expected_kind);
        }
    }

    #[tokio::test]
    async fn test_missing_requester_is_rejected() {
        let (hive_tx, mut seen_rx) = spawn_hive_service(|_| Ok(HiveMemberDetail::default()));

        let (status, body) = call(router(hive_tx.clone()), "/hives/1", None).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"], "bad_request");

        let (status, _) = call(router(hive_tx), "/hives/1", Some("abc")).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);

        assert!(seen_rx.try_recv().is_err());
    }
}
