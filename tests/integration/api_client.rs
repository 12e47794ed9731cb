//! API client tests against an in-process stub backend

use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post, put},
    Json, Router,
};
use chrono::NaiveDate;
use serde_json::{json, Value};
use tokio::net::TcpListener;

use gatehouse_kiosk::{
    api::{ApiClient, KioskApi, KioskApiExt},
    config::{AppConfig, LoggingConfig},
    error::RequestError,
    logging,
    models::{NewVisitor, UpdateEmployee, VisitorPurpose},
    services::suggestions::SupplierSearch,
    AppError, Kiosk, Navigate,
};

/// Requests seen by the stub, as `METHOD path`
type Seen = Arc<Mutex<Vec<String>>>;

#[derive(Clone, Default)]
struct Backend {
    seen: Seen,
    created: Arc<Mutex<Vec<Value>>>,
}

impl Backend {
    fn record(&self, line: String) {
        self.seen.lock().unwrap().push(line);
    }
}

fn today() -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 10, 14).unwrap()
}

fn visitor_row(id: i64, name: &str, needs: &str, vehicle: &str, checkout: Option<&str>) -> Value {
    json!({
        "visitor_id": id,
        "visitor_date": "2024-10-14",
        "visitor_name": name,
        "visitor_from": "PT Maju",
        "visitor_host": "Warehouse",
        "visitor_needs": needs,
        "visitor_amount": 1,
        "visitor_vehicle": vehicle,
        "department": null,
        "visitor_checkin": "2024-10-14 07:58:00",
        "visitor_checkout": checkout,
        "plan_delivery_time": "08:00",
    })
}

async fn visitors(State(backend): State<Backend>) -> Json<Value> {
    backend.record("GET /visitor".to_string());
    Json(json!({
        "data": [
            visitor_row(1, "Joko", "Delivery", "B 1 AA", None),
            visitor_row(2, "Sari", "Meeting", "", None),
            visitor_row(3, "Tono", "Meeting", "", Some("2024-10-14 09:00:00")),
        ]
    }))
}

async fn deliveries(State(backend): State<Backend>) -> Json<Value> {
    backend.record("GET /delivery".to_string());
    Json(json!({
        "data": [
            { "no_dn": "DN-1", "driver_name": "Joko", "plat_number": "B 1 AA",
              "plan_delivery_time": " 08:00 ", "supplier_code": "AKMP", "supplier_name": "PT Akmp" },
            { "no_dn": 2, "driver_name": "Rudi", "plat_number": null,
              "plan_delivery_time": "07:30", "supplier_code": "", "supplier_name": "CV Rudi" },
        ]
    }))
}

async fn create(State(backend): State<Backend>, Json(body): Json<Value>) -> Json<Value> {
    backend.record("POST /create".to_string());
    backend.created.lock().unwrap().push(body);
    Json(json!({ "data": { "visitor_id": 42 } }))
}

async fn checkout(State(backend): State<Backend>, Path(id): Path<String>) -> impl IntoResponse {
    backend.record(format!("PUT /checkout/{}", id));
    if id == "locked" {
        return (StatusCode::CONFLICT, "already checked out").into_response();
    }
    Json(json!({ "message": "ok" })).into_response()
}

async fn print_data(State(backend): State<Backend>, Path(id): Path<String>) -> impl IntoResponse {
    backend.record(format!("GET /print-data/{}", id));
    if id == "missing" {
        return (StatusCode::INTERNAL_SERVER_ERROR, "boom").into_response();
    }
    let id: i64 = id.parse().unwrap_or(0);
    Json(json!({ "data": visitor_row(id, "Joko", "Delivery", "B 1 AA", None) })).into_response()
}

async fn employees(State(backend): State<Backend>) -> impl IntoResponse {
    backend.record("GET /employee".to_string());
    (StatusCode::INTERNAL_SERVER_ERROR, "database down")
}

async fn employee_write(
    State(backend): State<Backend>,
    method: axum::http::Method,
    uri: axum::http::Uri,
) -> Json<Value> {
    backend.record(format!("{} {}", method, uri.path().trim_start_matches("/api")));
    Json(json!({ "message": "ok" }))
}

async fn employee_for_edit(State(backend): State<Backend>, Path(nik): Path<String>) -> Json<Value> {
    backend.record(format!("GET /edit/{}", nik));
    Json(json!({
        "data": { "name": "Budi", "nik": nik, "email": null, "department": "IT", "phone_number": null }
    }))
}

async fn visitor_log(State(backend): State<Backend>) -> Json<Value> {
    backend.record("GET /index".to_string());
    Json(json!({
        "data": [
            visitor_row(3, "Tono", "Meeting", "", Some("2024-10-14 09:00:00")),
            visitor_row(1, "Joko", "Delivery", "B 1 AA", None),
        ]
    }))
}

fn supplier_row(code: &str) -> Value {
    json!({ "value": code, "label": format!("{} PT", code), "code": code,
            "name": format!("{} PT", code), "address": null, "phone": "021" })
}

async fn suppliers(State(backend): State<Backend>) -> Json<Value> {
    backend.record("GET /supplier/".to_string());
    Json(json!({ "data": [supplier_row("AKMP"), supplier_row("AKRA")] }))
}

async fn supplier(State(backend): State<Backend>, Path(code): Path<String>) -> impl IntoResponse {
    backend.record(format!("GET /supplier/{}", code));
    if code == "GONE" {
        return (StatusCode::NOT_FOUND, "no such supplier").into_response();
    }
    Json(json!({ "data": supplier_row(&code) })).into_response()
}

async fn supplier_search(
    State(backend): State<Backend>,
    Query(params): Query<HashMap<String, String>>,
) -> Json<Value> {
    let term = params.get("q").cloned().unwrap_or_default();
    let limit = params.get("limit").cloned().unwrap_or_default();
    backend.record(format!("GET /supplier/search q={} limit={}", term, limit));

    // the shorter term answers last
    if term == "AB" {
        tokio::time::sleep(Duration::from_millis(200)).await;
    }
    Json(json!({
        "data": [
            { "value": format!("{}-1", term), "label": format!("{} One", term),
              "code": format!("{}-1", term), "name": null, "address": null, "phone": null }
        ]
    }))
}

async fn spawn_backend() -> (String, Backend) {
    let backend = Backend::default();
    let app = Router::new()
        .route("/api/visitor", get(visitors))
        .route("/api/delivery", get(deliveries))
        .route("/api/create", post(create))
        .route("/api/checkout/:id", put(checkout))
        .route("/api/print-data/:id", get(print_data))
        .route("/api/employee", get(employees))
        .route("/api/createemployee", post(employee_write))
        .route("/api/edit/:nik", get(employee_for_edit))
        .route("/api/update/:nik", put(employee_write))
        .route("/api/delete/:nik", axum::routing::delete(employee_write))
        .route("/api/index", get(visitor_log))
        .route("/api/supplier/", get(suppliers))
        .route("/api/supplier/:code", get(supplier))
        .route("/api/supplier/search", get(supplier_search))
        .with_state(backend.clone());

    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    (format!("http://{}/api", addr), backend)
}

fn config_for(base_url: &str) -> AppConfig {
    let mut config = AppConfig::default();
    config.api.base_url = base_url.to_string();
    config.api.timeout_secs = Some(5);
    config.api.supplier_search_debounce_ms = 0;
    config
}

#[tokio::test]
async fn test_visitor_list_unwraps_envelope() {
    let (url, backend) = spawn_backend().await;
    let api = ApiClient::new(&config_for(&url).api).unwrap();

    let visitors = api.fetch_visitors().await.unwrap();
    assert_eq!(visitors.len(), 3);
    assert_eq!(visitors[0].visitor_id, "1");
    assert_eq!(visitors[0].visitor_needs, VisitorPurpose::Delivery);
    assert_eq!(visitors[1].department, None);
    assert_eq!(backend.seen.lock().unwrap().as_slice(), ["GET /visitor"]);
}

#[tokio::test]
async fn test_submit_returns_visitor_id() {
    let (url, backend) = spawn_backend().await;
    let api = ApiClient::new(&config_for(&url).api).unwrap();

    let visitor = NewVisitor {
        visitor_date: today(),
        visitor_name: "Andi".to_string(),
        visitor_from: "PT Maju".to_string(),
        visitor_host: "Budi".to_string(),
        visitor_needs: VisitorPurpose::Meeting,
        visitor_amount: 2,
        visitor_vehicle: "B 1234 XY".to_string(),
        department: "IT".to_string(),
        plan_delivery_time: None,
    };
    let id = api.submit_visitor(&visitor).await.unwrap();
    assert_eq!(id, "42");

    let created = backend.created.lock().unwrap();
    assert_eq!(created[0]["visitor_date"], "2024-10-14");
    assert_eq!(created[0]["visitor_needs"], "Meeting");
    assert!(created[0].get("plan_delivery_time").is_none());
}

#[tokio::test]
async fn test_read_failure_is_empty_but_write_failure_propagates() {
    let (url, _backend) = spawn_backend().await;
    let api = ApiClient::new(&config_for(&url).api).unwrap();

    assert!(api.list_employees().await.is_empty());
    let err = api.fetch_employees().await.unwrap_err();
    assert_eq!(err.status(), Some(reqwest::StatusCode::INTERNAL_SERVER_ERROR));

    let err = api.checkout_visitor("locked").await.unwrap_err();
    assert!(matches!(AppError::from(err), AppError::Conflict(_)));
}

#[tokio::test]
async fn test_employee_maintenance_paths() {
    let (url, backend) = spawn_backend().await;
    let api = ApiClient::new(&config_for(&url).api).unwrap();

    let employee = api.fetch_employee("E 01").await.unwrap();
    assert_eq!(employee.nik, "E 01");
    assert_eq!(employee.email, "");

    let mut update = UpdateEmployee::from(&employee);
    update.phone_number = "0812".to_string();
    api.create_employee(&employee).await.unwrap();
    api.update_employee("E 01", &update).await.unwrap();
    api.delete_employee("E 01").await.unwrap();

    assert_eq!(
        backend.seen.lock().unwrap().as_slice(),
        [
            "GET /edit/E 01",
            "POST /createemployee",
            "PUT /update/E%2001",
            "DELETE /delete/E%2001",
        ]
    );
}

#[tokio::test]
async fn test_visitor_log_and_supplier_reads() {
    let (url, backend) = spawn_backend().await;
    let api = ApiClient::new(&config_for(&url).api).unwrap();

    let log = api.list_all_visitors().await;
    let ids: Vec<&str> = log.iter().map(|v| v.visitor_id.as_str()).collect();
    assert_eq!(ids, vec!["3", "1"]);

    let suppliers = api.list_suppliers().await;
    assert_eq!(suppliers.len(), 2);
    assert_eq!(suppliers[1].code, "AKRA");
    assert_eq!(suppliers[1].address, "");

    let supplier = api.supplier_by_code("AKMP").await.unwrap();
    assert_eq!(supplier.name, "AKMP PT");
    assert!(api.supplier_by_code("GONE").await.is_none());

    assert_eq!(
        backend.seen.lock().unwrap().as_slice(),
        [
            "GET /index",
            "GET /supplier/",
            "GET /supplier/AKMP",
            "GET /supplier/GONE",
        ]
    );
}

#[tokio::test]
async fn test_failed_reads_come_back_empty() {
    let (url, backend) = spawn_backend().await;
    // every path under this prefix is unrouted and answers 404
    let api = ApiClient::new(&config_for(&format!("{}/missing", url)).api).unwrap();

    assert!(api.list_all_visitors().await.is_empty());
    assert!(api.list_suppliers().await.is_empty());
    assert!(api.list_visitors().await.is_empty());
    assert!(api.list_deliveries().await.is_empty());
    assert!(api.supplier_by_code("AKMP").await.is_none());
    assert!(backend.seen.lock().unwrap().is_empty());

    let err = api.fetch_suppliers().await.unwrap_err();
    assert_eq!(err.status(), Some(reqwest::StatusCode::NOT_FOUND));
}

#[tokio::test]
async fn test_print_data_failure_is_reported() {
    let (url, _backend) = spawn_backend().await;
    let api = ApiClient::new(&config_for(&url).api).unwrap();

    let err = api.fetch_print_data("missing").await.unwrap_err();
    assert!(matches!(err, RequestError::Status { .. }));
    let visitor = api.fetch_print_data("7").await.unwrap();
    assert_eq!(visitor.visitor_id, "7");
}

#[tokio::test]
async fn test_supplier_search_sends_term_and_limit() {
    let (url, backend) = spawn_backend().await;
    let api = ApiClient::new(&config_for(&url).api).unwrap();

    let suppliers = api.search_suppliers("AKM", 20).await;
    assert_eq!(suppliers[0].code, "AKM-1");
    assert_eq!(suppliers[0].name, "");

    assert!(api.search_suppliers("A", 20).await.is_empty());
    assert_eq!(
        backend.seen.lock().unwrap().as_slice(),
        ["GET /supplier/search q=AKM limit=20"]
    );
}

#[tokio::test]
async fn test_latest_supplier_search_wins() {
    let (url, backend) = spawn_backend().await;
    let api = Arc::new(ApiClient::new(&config_for(&url).api).unwrap());
    let mut search = SupplierSearch::with_settings(20, Duration::ZERO);

    let (tx, mut rx) = tokio::sync::mpsc::unbounded_channel();
    for term in ["AB", "ABC"] {
        let ticket = search.input(term).unwrap();
        let api = Arc::clone(&api);
        let tx = tx.clone();
        tokio::spawn(async move {
            let _ = tx.send(ticket.run(api.as_ref()).await);
        });

        // keep typing only once the request is on the wire
        let sent = format!("GET /supplier/search q={} limit=20", term);
        while !backend.seen.lock().unwrap().contains(&sent) {
            tokio::time::sleep(Duration::from_millis(5)).await;
        }
    }
    drop(tx);

    // applied in completion order: "ABC" first, then the slow "AB"
    let mut applied = Vec::new();
    while let Some(response) = rx.recv().await {
        let term = response.term.clone();
        applied.push((term, search.apply(response)));
    }

    assert_eq!(
        applied,
        vec![("ABC".to_string(), true), ("AB".to_string(), false)]
    );
    assert!(!search.is_searching());
    assert_eq!(search.suggestions().len(), 1);
    assert_eq!(search.suggestions()[0].value, "ABC-1");
}

#[tokio::test]
async fn test_delivery_check_in_flow() {
    let (url, backend) = spawn_backend().await;
    let kiosk = Kiosk::new(config_for(&url)).unwrap();

    let mut deliveries = kiosk.delivery_check_in(today()).await;
    assert!(deliveries.error().is_none());
    let pending: Vec<&str> = deliveries.entries().iter().map(|e| e.no_dn.as_str()).collect();
    assert_eq!(pending, vec!["2"]);

    let navigate = deliveries
        .check_in(kiosk.api.as_ref(), "2", today())
        .await
        .unwrap();
    assert_eq!(
        navigate,
        Some(Navigate::Receipt {
            visitor_id: "42".to_string()
        })
    );

    let created = backend.created.lock().unwrap();
    assert_eq!(created[0]["visitor_name"], "Rudi");
    assert_eq!(created[0]["visitor_from"], "CV Rudi");
    assert_eq!(created[0]["visitor_host"], "Warehouse");
    assert_eq!(created[0]["visitor_needs"], "Delivery");
    assert_eq!(created[0]["plan_delivery_time"], "07:30");
}

#[tokio::test]
async fn test_check_out_flow() {
    let (url, backend) = spawn_backend().await;
    let kiosk = Kiosk::new(config_for(&url)).unwrap();

    let mut table = kiosk.check_out_table(today()).await;
    assert_eq!(table.filtered().len(), 2);
    assert!(!table.shows_filter());

    assert!(table.select("2"));
    let navigate = table.confirm(kiosk.api.as_ref(), today()).await.unwrap();
    assert_eq!(
        navigate,
        Some(Navigate::Home {
            after: Duration::from_millis(500)
        })
    );
    assert!(backend
        .seen
        .lock()
        .unwrap()
        .contains(&"PUT /checkout/2".to_string()));
}

#[tokio::test]
async fn test_invalid_base_url_is_rejected() {
    let result = Kiosk::new(config_for("not a url"));
    assert!(matches!(result, Err(AppError::Request(RequestError::InvalidUrl(_)))));
}

#[test]
fn test_logging_init_once() {
    let config = LoggingConfig {
        level: "debug".to_string(),
        format: "json".to_string(),
    };
    assert!(logging::init(&config));
    assert!(!logging::init(&config));
}
