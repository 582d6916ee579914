use std::time::Duration;

use axum::{
    body::{to_bytes, Body},
    http::{header, Method, Request, StatusCode},
    Router,
};
use chrono::Utc;
use serde_json::{json, Value};
use tempfile::{tempdir, TempDir};
use tower::ServiceExt;
use worthline_server::{api::app_router, build_state, config::Config};

async fn build_test_router(seed_demo: bool) -> (Router, TempDir) {
    let tmp = tempdir().unwrap();
    let config = Config {
        listen_addr: "127.0.0.1:0".parse().unwrap(),
        db_path: tmp.path().join("test.db").to_string_lossy().to_string(),
        cors_allow: vec!["*".to_string()],
        request_timeout: Duration::from_secs(5),
        finnhub_api_key: None,
        seed_demo,
    };
    let state = build_state(&config).await.unwrap();
    (app_router(state, &config), tmp)
}

async fn send(app: &Router, method: Method, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
    let builder = Request::builder().method(method).uri(uri);
    let request = match body {
        Some(body) => builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };
    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let value = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, value)
}

fn number(value: &Value) -> f64 {
    value.as_f64().unwrap()
}

#[tokio::test]
async fn valuations_and_transactions_feed_snapshots() {
    let (app, _tmp) = build_test_router(false).await;

    let (status, house) = send(
        &app,
        Method::POST,
        "/api/v1/valuations",
        Some(json!({"kind": "asset", "name": "House", "value": 400000, "date": "2023-01-15"})),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(house["month"], "2023-01-01");

    let (status, _) = send(
        &app,
        Method::POST,
        "/api/v1/valuations",
        Some(json!({"kind": "liability", "name": "Mortgage", "value": 320000, "date": "01/20/2023"})),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);

    let (status, transaction) = send(
        &app,
        Method::POST,
        "/api/v1/transactions",
        Some(json!({"date": "2023-02-03", "amount": 500, "description": "Bonus"})),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(transaction["category"], "Uncategorized");

    let (status, snapshots) = send(&app, Method::POST, "/api/v1/net-worth/recompute", None).await;
    assert_eq!(status, StatusCode::OK);
    let snapshots = snapshots.as_array().unwrap().clone();
    let current_month = Utc::now().format("%Y-%m-01").to_string();
    assert_eq!(snapshots[0]["date"], "2023-01-01");
    assert_eq!(number(&snapshots[0]["netWorth"]), 80000.0);
    assert_eq!(number(&snapshots[1]["assets"]), 400500.0);
    assert_eq!(snapshots.last().unwrap()["date"], current_month.as_str());

    let (status, three) = send(&app, Method::GET, "/api/v1/net-worth/snapshots?range=3m", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(three.as_array().unwrap().len(), 3);

    let (_, fallback) = send(&app, Method::GET, "/api/v1/net-worth/snapshots?range=bogus", None).await;
    assert_eq!(fallback.as_array().unwrap().len(), 12);

    let (_, summary) = send(&app, Method::GET, "/api/v1/net-worth/summary", None).await;
    assert_eq!(number(&summary["netWorth"]), 80500.0);
    assert_eq!(summary["asOf"], current_month.as_str());

    let (_, recent) = send(&app, Method::GET, "/api/v1/net-worth/recent?limit=2", None).await;
    let recent = recent.as_array().unwrap();
    assert_eq!(recent.len(), 2);
    assert_eq!(recent[0]["label"], "income");
}

#[tokio::test]
async fn demo_seed_populates_store_once() {
    let (app, _tmp) = build_test_router(true).await;

    let (_, valuations) = send(&app, Method::GET, "/api/v1/valuations", None).await;
    assert_eq!(valuations.as_array().unwrap().len(), 8);

    let (status, seeded) = send(&app, Method::POST, "/api/v1/valuations/seed-demo", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(seeded["inserted"], 0);

    let (_, summary) = send(&app, Method::GET, "/api/v1/net-worth/summary", None).await;
    // 440000 + 21000 + 12000 - 280000
    assert_eq!(number(&summary["netWorth"]), 193000.0);
}

#[tokio::test]
async fn csv_import_reports_row_errors() {
    let (app, _tmp) = build_test_router(false).await;
    let content = "Date,Amount,Memo,Category\n\
                   2024-01-05,\"$1,200.00\",Salary,Income\n\
                   not-a-date,10,Broken,Misc\n\
                   01/09/24,-45.10,Groceries,Food\n";

    let (status, preview) = send(
        &app,
        Method::POST,
        "/api/v1/transactions/import/preview",
        Some(json!({"content": content})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(preview["headers"], json!(["Date", "Amount", "Memo", "Category"]));
    assert_eq!(preview["totalRows"], 3);

    let (status, summary) = send(
        &app,
        Method::POST,
        "/api/v1/transactions/import",
        Some(json!({
            "content": content,
            "mapping": {"date": "Date", "amount": "Amount", "description": "Memo", "category": "Category"}
        })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(summary["imported"], 2);
    assert_eq!(summary["errors"], 1);

    let (_, food) = send(&app, Method::GET, "/api/v1/transactions?category=Food", None).await;
    let food = food.as_array().unwrap();
    assert_eq!(food.len(), 1);
    assert_eq!(number(&food[0]["amount"]), -45.1);

    let (_, categories) = send(&app, Method::GET, "/api/v1/categories", None).await;
    let names: Vec<&str> = categories
        .as_array()
        .unwrap()
        .iter()
        .map(|c| c["name"].as_str().unwrap())
        .collect();
    assert_eq!(names, vec!["Food", "Income"]);
}

#[tokio::test]
async fn errors_map_to_status_codes() {
    let (app, _tmp) = build_test_router(false).await;

    let (status, body) = send(&app, Method::DELETE, "/api/v1/valuations/missing", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["code"], 404);

    let (status, _) = send(&app, Method::GET, "/api/v1/market-data/quote?symbol=AAPL", None).await;
    assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);

    let (status, _) = send(
        &app,
        Method::POST,
        "/api/v1/positions",
        Some(json!({"symbol": "VTI", "shares": 0, "avgCost": 200})),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, position) = send(
        &app,
        Method::POST,
        "/api/v1/positions",
        Some(json!({"symbol": "vti", "shares": 4, "avgCost": 250})),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(position["symbol"], "VTI");

    // Without a provider positions are valued at average cost.
    let (status, values) = send(&app, Method::GET, "/api/v1/positions/values", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(number(&values[0]["marketValue"]), 1000.0);
}
