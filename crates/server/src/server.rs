use axum::{
    Json, Router,
    routing::{get, post},
};
use std::sync::Arc;

use crate::{accounts, transactions, transfers};
use api_types::health::Health;
use engine::Engine;

#[derive(Clone)]
pub struct ServerState {
    pub engine: Arc<Engine>,
}

async fn health() -> Json<Health> {
    Json(Health {
        status: "ok".to_string(),
    })
}

pub(crate) fn router(state: ServerState) -> Router {
    Router::new()
        .route("/health", get(health))
        .route(
            "/api/v1/transfers",
            post(transfers::create).get(transfers::list),
        )
        .route("/api/v1/transfers/{id}", get(transfers::get))
        .route("/api/v1/accounts", get(accounts::list))
        .route("/api/v1/accounts/{id}", get(accounts::get_detail))
        .route(
            "/api/v1/accounts/{id}/transactions",
            get(transactions::list_for_account),
        )
        .route("/api/v1/transactions/{id}", get(transactions::get))
        .with_state(state)
}

pub async fn run(engine: Engine) {
    let listener = match tokio::net::TcpListener::bind("127.0.0.1:8000").await {
        Ok(listener) => listener,
        Err(err) => {
            tracing::error!("failed to bind server listener: {err}");
            return;
        }
    };
    if let Err(err) = run_with_listener(engine, listener).await {
        tracing::error!("server failed: {err}");
    }
}

pub async fn run_with_listener(
    engine: Engine,
    listener: tokio::net::TcpListener,
) -> Result<(), std::io::Error> {
    let addr = listener.local_addr()?;
    tracing::info!("Server listening on {}", addr);

    let state = ServerState {
        engine: Arc::new(engine),
    };

    axum::serve(listener, router(state)).await
}

pub fn spawn_with_listener(
    engine: Engine,
    listener: tokio::net::TcpListener,
) -> Result<std::net::SocketAddr, std::io::Error> {
    let addr = listener.local_addr()?;

    tokio::spawn(async move {
        if let Err(err) = run_with_listener(engine, listener).await {
            tracing::error!("server failed: {err}");
        }
    });

    Ok(addr)
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http::{Request, StatusCode, header};
    use http_body_util::BodyExt;
    use tower::util::ServiceExt;

    use engine::AccountType;
    use migration::MigratorTrait;

    async fn test_router() -> (Router, engine::Account, engine::Account) {
        let db = sea_orm::Database::connect("sqlite::memory:").await.unwrap();
        migration::Migrator::up(&db, None).await.unwrap();
        let engine = Engine::builder().database(db).build();

        let source = engine
            .new_account("110-123-456789", "Alice", AccountType::Checking, 100_000)
            .await
            .unwrap();
        let destination = engine
            .new_account("110-987-654321", "Bob", AccountType::Savings, 0)
            .await
            .unwrap();

        let state = ServerState {
            engine: Arc::new(engine),
        };
        (router(state), source, destination)
    }

    fn post_json(uri: &str, payload: &serde_json::Value) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri(uri)
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(payload.to_string()))
            .unwrap()
    }

    fn get(uri: &str) -> Request<Body> {
        Request::builder().uri(uri).body(Body::empty()).unwrap()
    }

    async fn body_json(response: axum::response::Response) -> serde_json::Value {
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn health_returns_ok() {
        let (router, _, _) = test_router().await;
        let response = router.oneshot(get("/health")).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let body = body_json(response).await;
        assert_eq!(body["status"], "ok");
    }

    #[tokio::test]
    async fn transfer_create_then_fetch_and_list() {
        let (router, source, destination) = test_router().await;

        let payload = serde_json::json!({
            "from_account_id": source.id,
            "to_account_number": destination.account_number,
            "amount_minor": 25_000,
            "description": "rent",
        });
        let response = router
            .clone()
            .oneshot(post_json("/api/v1/transfers", &payload))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::CREATED);
        let body = body_json(response).await;
        assert_eq!(body["status"], "COMPLETED");
        assert_eq!(body["transfer_type"], "INTERNAL");
        assert_eq!(body["amount_minor"], 25_000);
        let reference = body["reference_number"].as_str().unwrap();
        assert!(reference.starts_with("TXF"));
        let id = body["id"].as_str().unwrap().to_string();

        let response = router
            .clone()
            .oneshot(get(&format!("/api/v1/transfers/{id}")))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let body = body_json(response).await;
        assert_eq!(body["reference_number"], reference);

        let response = router
            .oneshot(get(&format!(
                "/api/v1/transfers?account_id={}&status=COMPLETED",
                source.id
            )))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let body = body_json(response).await;
        assert_eq!(body.as_array().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn insufficient_balance_maps_to_400() {
        let (router, source, destination) = test_router().await;

        let payload = serde_json::json!({
            "from_account_id": source.id,
            "to_account_number": destination.account_number,
            "amount_minor": 500_000,
        });
        let response = router
            .oneshot(post_json("/api/v1/transfers", &payload))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let body = body_json(response).await;
        assert!(
            body["error"]
                .as_str()
                .unwrap()
                .contains("insufficient balance")
        );
    }

    #[tokio::test]
    async fn external_transfer_maps_to_501() {
        let (router, source, destination) = test_router().await;

        let payload = serde_json::json!({
            "from_account_id": source.id,
            "to_account_number": destination.account_number,
            "to_bank_code": "088",
            "amount_minor": 1_000,
        });
        let response = router
            .oneshot(post_json("/api/v1/transfers", &payload))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::NOT_IMPLEMENTED);
    }

    #[tokio::test]
    async fn unknown_transfer_maps_to_404() {
        let (router, _, _) = test_router().await;
        let response = router
            .oneshot(get(&format!(
                "/api/v1/transfers/{}",
                uuid::Uuid::new_v4()
            )))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn account_detail_masks_number_and_carries_summary() {
        let (router, source, _) = test_router().await;
        let response = router
            .oneshot(get(&format!("/api/v1/accounts/{}", source.id)))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let body = body_json(response).await;
        assert_eq!(body["masked_account_number"], "****-****-6789");
        assert_eq!(body["balance_minor"], 100_000);
        assert_eq!(body["summary"]["transaction_count"], 0);
    }

    #[tokio::test]
    async fn ledger_history_pages_with_total_count() {
        let (router, source, destination) = test_router().await;

        for amount in [1_000, 2_000] {
            let payload = serde_json::json!({
                "from_account_id": source.id,
                "to_account_number": destination.account_number,
                "amount_minor": amount,
            });
            let response = router
                .clone()
                .oneshot(post_json("/api/v1/transfers", &payload))
                .await
                .unwrap();
            assert_eq!(response.status(), StatusCode::CREATED);
        }

        let response = router
            .oneshot(get(&format!(
                "/api/v1/accounts/{}/transactions?kind=withdrawal&limit=1",
                source.id
            )))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let body = body_json(response).await;
        assert_eq!(body["total_count"], 2);
        assert_eq!(body["transactions"].as_array().unwrap().len(), 1);
        assert_eq!(body["transactions"][0]["kind"], "withdrawal");
    }
}
