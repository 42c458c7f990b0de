//! Shared test utilities for integration tests.
//!
//! This module provides a `TestServer` that runs an in-memory mock of the
//! remote payments service on a loopback port, so the real HTTP client can
//! be exercised end-to-end. Methods are intentionally broad to support
//! various test scenarios across different test files.

#![allow(dead_code)]

use std::net::SocketAddr;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::routing::get;
use axum::{Json, Router};
use chrono::NaiveDate;
use serde::Deserialize;
use serde_json::{json, Value};
use tokio::net::TcpListener;

use outlay::models::{Category, NewCategory, NewPayment, Payment};
use outlay::services::api_client::ApiClient;

#[derive(Default)]
struct ServiceState {
    payments: Vec<Payment>,
    categories: Vec<Category>,
    next_payment_id: i64,
    next_category_id: i64,
    fail_searches: bool,
    search_delay_ms: u64,
}

#[derive(Clone, Default)]
struct SharedState(Arc<Mutex<ServiceState>>);

impl SharedState {
    /// Honor the configured artificial latency for search endpoints.
    async fn pause(&self) {
        let delay = self.0.lock().unwrap().search_delay_ms;
        if delay > 0 {
            tokio::time::sleep(Duration::from_millis(delay)).await;
        }
    }
}

/// A mock payments service bound to an ephemeral loopback port.
pub struct TestServer {
    addr: SocketAddr,
    state: SharedState,
}

impl TestServer {
    pub async fn start() -> Self {
        let state = SharedState::default();
        let app = routes(state.clone());

        let listener = TcpListener::bind("127.0.0.1:0")
            .await
            .expect("Failed to bind loopback port");
        let addr = listener.local_addr().expect("Failed to read local addr");

        tokio::spawn(async move {
            axum::serve(listener, app).await.expect("Mock server error");
        });

        Self { addr, state }
    }

    /// A client connected to this mock service.
    pub fn client(&self) -> ApiClient {
        ApiClient::with_base_url(&format!("http://{}", self.addr))
            .expect("Failed to create API client")
    }

    /// Make both search endpoints return 500 until reset.
    pub fn fail_searches(&self, fail: bool) {
        self.state.0.lock().unwrap().fail_searches = fail;
    }

    /// Delay search responses by the given number of milliseconds.
    pub fn set_search_delay(&self, millis: u64) {
        self.state.0.lock().unwrap().search_delay_ms = millis;
    }

    /// Insert a category directly into the backing store.
    pub fn seed_category(&self, name: &str, color: Option<&str>) -> i64 {
        let mut inner = self.state.0.lock().unwrap();
        inner.next_category_id += 1;
        let id = inner.next_category_id;
        inner.categories.push(Category {
            id,
            name: name.to_string(),
            description: None,
            color: color.map(str::to_string),
        });
        id
    }

    /// Insert a payment directly into the backing store.
    pub fn seed_payment(&self, name: &str, date: &str, value: f64, category_id: i64) -> i64 {
        let mut inner = self.state.0.lock().unwrap();
        inner.next_payment_id += 1;
        let id = inner.next_payment_id;
        inner.payments.push(Payment {
            id,
            name: name.to_string(),
            date: NaiveDate::parse_from_str(date, "%Y-%m-%d").expect("Invalid seed date"),
            value,
            is_recurring: false,
            category_id,
        });
        id
    }

    pub fn payment_count(&self) -> usize {
        self.state.0.lock().unwrap().payments.len()
    }
}

fn routes(state: SharedState) -> Router {
    Router::new()
        .route("/payments/", get(list_payments).post(create_payment))
        .route(
            "/payments/:id",
            get(get_payment).put(update_payment).delete(delete_payment),
        )
        .route("/categories/", get(list_categories).post(create_category))
        .route(
            "/categories/:id",
            get(get_category).put(update_category).delete(delete_category),
        )
        .route("/search/payments/", get(search_payments))
        .route(
            "/search/payments-by-category/",
            get(search_payments_by_category),
        )
        .with_state(state)
}

type ApiError = (StatusCode, Json<Value>);

fn detail(status: StatusCode, message: &str) -> ApiError {
    (status, Json(json!({ "detail": message })))
}

#[derive(Deserialize)]
struct Pagination {
    #[serde(default)]
    skip: usize,
    #[serde(default = "default_limit")]
    limit: usize,
}

fn default_limit() -> usize {
    200
}

#[derive(Deserialize)]
struct SearchParams {
    name: Option<String>,
}

#[derive(Deserialize)]
struct ScopedSearchParams {
    name: Option<String>,
    payment: Option<String>,
}

fn starts_with_ci(haystack: &str, prefix: &str) -> bool {
    haystack.to_lowercase().starts_with(&prefix.to_lowercase())
}

// Payment endpoints

async fn list_payments(
    State(state): State<SharedState>,
    Query(page): Query<Pagination>,
) -> Json<Vec<Payment>> {
    let inner = state.0.lock().unwrap();
    let payments = inner
        .payments
        .iter()
        .skip(page.skip)
        .take(page.limit)
        .cloned()
        .collect();
    Json(payments)
}

async fn get_payment(
    State(state): State<SharedState>,
    Path(id): Path<i64>,
) -> Result<Json<Payment>, ApiError> {
    let inner = state.0.lock().unwrap();
    inner
        .payments
        .iter()
        .find(|p| p.id == id)
        .cloned()
        .map(Json)
        .ok_or_else(|| detail(StatusCode::NOT_FOUND, "Payment not found"))
}

async fn create_payment(
    State(state): State<SharedState>,
    Json(new): Json<NewPayment>,
) -> Result<(StatusCode, Json<Payment>), ApiError> {
    let mut inner = state.0.lock().unwrap();
    if !inner.categories.iter().any(|c| c.id == new.category_id) {
        return Err(detail(
            StatusCode::BAD_REQUEST,
            "category not found or does not exist",
        ));
    }
    inner.next_payment_id += 1;
    let payment = Payment {
        id: inner.next_payment_id,
        name: new.name,
        date: new.date,
        value: new.value,
        is_recurring: new.is_recurring,
        category_id: new.category_id,
    };
    inner.payments.push(payment.clone());
    Ok((StatusCode::CREATED, Json(payment)))
}

async fn update_payment(
    State(state): State<SharedState>,
    Path(id): Path<i64>,
    Json(new): Json<NewPayment>,
) -> Result<Json<Payment>, ApiError> {
    let mut inner = state.0.lock().unwrap();
    if !inner.categories.iter().any(|c| c.id == new.category_id) {
        return Err(detail(
            StatusCode::BAD_REQUEST,
            "category not found or does not exist",
        ));
    }
    let payment = inner
        .payments
        .iter_mut()
        .find(|p| p.id == id)
        .ok_or_else(|| detail(StatusCode::NOT_FOUND, "payment not found"))?;
    payment.name = new.name;
    payment.date = new.date;
    payment.value = new.value;
    payment.is_recurring = new.is_recurring;
    payment.category_id = new.category_id;
    Ok(Json(payment.clone()))
}

async fn delete_payment(
    State(state): State<SharedState>,
    Path(id): Path<i64>,
) -> Result<StatusCode, ApiError> {
    let mut inner = state.0.lock().unwrap();
    let before = inner.payments.len();
    inner.payments.retain(|p| p.id != id);
    if inner.payments.len() == before {
        return Err(detail(
            StatusCode::NOT_FOUND,
            "Payment not found or does not exist",
        ));
    }
    Ok(StatusCode::NO_CONTENT)
}

// Category endpoints

async fn list_categories(
    State(state): State<SharedState>,
    Query(page): Query<Pagination>,
) -> Json<Vec<Category>> {
    let inner = state.0.lock().unwrap();
    let mut categories: Vec<Category> = inner.categories.to_vec();
    categories.sort_by(|a, b| a.name.cmp(&b.name));
    Json(
        categories
            .into_iter()
            .skip(page.skip)
            .take(page.limit)
            .collect(),
    )
}

async fn get_category(
    State(state): State<SharedState>,
    Path(id): Path<i64>,
) -> Result<Json<Category>, ApiError> {
    let inner = state.0.lock().unwrap();
    inner
        .categories
        .iter()
        .find(|c| c.id == id)
        .cloned()
        .map(Json)
        .ok_or_else(|| detail(StatusCode::NOT_FOUND, "Category not found"))
}

async fn create_category(
    State(state): State<SharedState>,
    Json(new): Json<NewCategory>,
) -> (StatusCode, Json<Category>) {
    let mut inner = state.0.lock().unwrap();
    inner.next_category_id += 1;
    let category = Category {
        id: inner.next_category_id,
        name: new.name,
        description: new.description,
        color: Some(new.color),
    };
    inner.categories.push(category.clone());
    (StatusCode::CREATED, Json(category))
}

async fn update_category(
    State(state): State<SharedState>,
    Path(id): Path<i64>,
    Json(new): Json<NewCategory>,
) -> Result<Json<Category>, ApiError> {
    let mut inner = state.0.lock().unwrap();
    let category = inner
        .categories
        .iter_mut()
        .find(|c| c.id == id)
        .ok_or_else(|| detail(StatusCode::NOT_FOUND, "Category not found"))?;
    category.name = new.name;
    category.description = new.description;
    category.color = Some(new.color);
    Ok(Json(category.clone()))
}

async fn delete_category(
    State(state): State<SharedState>,
    Path(id): Path<i64>,
) -> Result<StatusCode, ApiError> {
    let mut inner = state.0.lock().unwrap();
    let before = inner.categories.len();
    inner.categories.retain(|c| c.id != id);
    if inner.categories.len() == before {
        return Err(detail(StatusCode::NOT_FOUND, "Category not found"));
    }
    // The service cascades payment deletion with the category.
    inner.payments.retain(|p| p.category_id != id);
    Ok(StatusCode::NO_CONTENT)
}

// Search endpoints

async fn search_payments(
    State(state): State<SharedState>,
    Query(params): Query<SearchParams>,
) -> Result<Json<Vec<Payment>>, ApiError> {
    state.pause().await;
    let inner = state.0.lock().unwrap();
    if inner.fail_searches {
        return Err(detail(
            StatusCode::INTERNAL_SERVER_ERROR,
            "Error: injected failure",
        ));
    }

    let mut payments: Vec<Payment> = match params.name.as_deref() {
        Some(term) if !term.is_empty() => inner
            .payments
            .iter()
            .filter(|p| starts_with_ci(&p.name, term))
            .cloned()
            .collect(),
        _ => inner.payments.to_vec(),
    };
    payments.sort_by(|a, b| a.name.cmp(&b.name));
    Ok(Json(payments))
}

async fn search_payments_by_category(
    State(state): State<SharedState>,
    Query(params): Query<ScopedSearchParams>,
) -> Result<Json<Vec<Payment>>, ApiError> {
    state.pause().await;
    let inner = state.0.lock().unwrap();
    if inner.fail_searches {
        return Err(detail(
            StatusCode::INTERNAL_SERVER_ERROR,
            "Error: injected failure",
        ));
    }

    let mut payments: Vec<Payment> = match params.name.as_deref() {
        Some(name) if !name.is_empty() => {
            let category_ids: Vec<i64> = inner
                .categories
                .iter()
                .filter(|c| starts_with_ci(&c.name, name))
                .map(|c| c.id)
                .collect();
            if category_ids.is_empty() {
                return Err(detail(StatusCode::NOT_FOUND, "Category not found"));
            }
            inner
                .payments
                .iter()
                .filter(|p| category_ids.contains(&p.category_id))
                .cloned()
                .collect()
        }
        _ => inner.payments.to_vec(),
    };

    if let Some(term) = params.payment.as_deref() {
        if !term.is_empty() {
            payments.retain(|p| starts_with_ci(&p.name, term));
        }
    }

    payments.sort_by(|a, b| a.name.cmp(&b.name));
    Ok(Json(payments))
}
