use std::time::Duration;

use reqwest::{Client, Response};
use serde::de::DeserializeOwned;
use tracing::debug;

use crate::config::Config;
use crate::error::{AppError, AppResult};
use crate::models::{Category, NewCategory, NewPayment, Payment};

const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Client for the remote payments service.
///
/// Cheap to clone; the underlying connection pool is shared.
#[derive(Debug, Clone)]
pub struct ApiClient {
    http: Client,
    base_url: String,
}

impl ApiClient {
    pub fn new(config: &Config) -> AppResult<Self> {
        Self::build(&config.api_url, config.timeout_secs)
    }

    /// Connect to a service at the given base URL with default settings.
    pub fn with_base_url(base_url: &str) -> AppResult<Self> {
        Self::build(base_url, DEFAULT_TIMEOUT_SECS)
    }

    fn build(base_url: &str, timeout_secs: u64) -> AppResult<Self> {
        let http = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .build()
            .map_err(|e| AppError::Internal(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self {
            http,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// Map a non-success status to an error carrying the service's `detail`
    /// message; pass success responses through.
    async fn check_status(response: Response) -> AppResult<Response> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }
        let body = response.text().await.unwrap_or_default();
        Err(AppError::from_response(status.as_u16(), &body))
    }

    async fn read_json<T: DeserializeOwned>(response: Response) -> AppResult<T> {
        let response = Self::check_status(response).await?;
        Ok(response.json().await?)
    }

    // Payments

    pub async fn list_payments(&self, skip: i64, limit: i64) -> AppResult<Vec<Payment>> {
        debug!(skip, limit, "Listing payments");
        let url = format!("{}?skip={}&limit={}", self.url("/payments/"), skip, limit);
        Self::read_json(self.http.get(&url).send().await?).await
    }

    pub async fn get_payment(&self, id: i64) -> AppResult<Payment> {
        Self::read_json(
            self.http
                .get(self.url(&format!("/payments/{}", id)))
                .send()
                .await?,
        )
        .await
    }

    pub async fn create_payment(&self, payment: &NewPayment) -> AppResult<Payment> {
        debug!(name = %payment.name, "Creating payment");
        Self::read_json(
            self.http
                .post(self.url("/payments/"))
                .json(payment)
                .send()
                .await?,
        )
        .await
    }

    pub async fn update_payment(&self, id: i64, payment: &NewPayment) -> AppResult<Payment> {
        debug!(payment_id = id, "Updating payment");
        Self::read_json(
            self.http
                .put(self.url(&format!("/payments/{}", id)))
                .json(payment)
                .send()
                .await?,
        )
        .await
    }

    pub async fn delete_payment(&self, id: i64) -> AppResult<()> {
        debug!(payment_id = id, "Deleting payment");
        let response = self
            .http
            .delete(self.url(&format!("/payments/{}", id)))
            .send()
            .await?;
        Self::check_status(response).await?;
        Ok(())
    }

    // Categories

    pub async fn list_categories(&self, skip: i64, limit: i64) -> AppResult<Vec<Category>> {
        debug!(skip, limit, "Listing categories");
        let url = format!("{}?skip={}&limit={}", self.url("/categories/"), skip, limit);
        Self::read_json(self.http.get(&url).send().await?).await
    }

    pub async fn get_category(&self, id: i64) -> AppResult<Category> {
        Self::read_json(
            self.http
                .get(self.url(&format!("/categories/{}", id)))
                .send()
                .await?,
        )
        .await
    }

    pub async fn create_category(&self, category: &NewCategory) -> AppResult<Category> {
        debug!(name = %category.name, "Creating category");
        Self::read_json(
            self.http
                .post(self.url("/categories/"))
                .json(category)
                .send()
                .await?,
        )
        .await
    }

    pub async fn update_category(&self, id: i64, category: &NewCategory) -> AppResult<Category> {
        debug!(category_id = id, "Updating category");
        Self::read_json(
            self.http
                .put(self.url(&format!("/categories/{}", id)))
                .json(category)
                .send()
                .await?,
        )
        .await
    }

    pub async fn delete_category(&self, id: i64) -> AppResult<()> {
        debug!(category_id = id, "Deleting category");
        let response = self
            .http
            .delete(self.url(&format!("/categories/{}", id)))
            .send()
            .await?;
        Self::check_status(response).await?;
        Ok(())
    }

    // Search

    /// Text search across all payments. An empty term returns the full,
    /// unfiltered collection.
    pub async fn search_payments(&self, term: &str) -> AppResult<Vec<Payment>> {
        debug!(term, "Searching payments");
        let mut url = self.url("/search/payments/");
        if !term.is_empty() {
            url.push_str(&format!("?name={}", urlencoding::encode(term)));
        }
        Self::read_json(self.http.get(&url).send().await?).await
    }

    /// Text search restricted to payments whose category matches
    /// `category_name`. The category filter is applied by the service in the
    /// same query as the term filter, never as a second round-trip.
    pub async fn search_payments_by_category(
        &self,
        category_name: &str,
        term: &str,
    ) -> AppResult<Vec<Payment>> {
        debug!(category_name, term, "Searching payments by category");
        let mut url = format!(
            "{}?name={}",
            self.url("/search/payments-by-category/"),
            urlencoding::encode(category_name)
        );
        if !term.is_empty() {
            url.push_str(&format!("&payment={}", urlencoding::encode(term)));
        }
        Self::read_json(self.http.get(&url).send().await?).await
    }
}
