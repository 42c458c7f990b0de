use tracing::{debug, info};

use crate::config::Config;
use crate::error::AppResult;
use crate::models::{Category, NewCategory, NewPayment, Payment};
use crate::services::analytics::{self, CategoryIndex, SpendingSummary};
use crate::services::api_client::ApiClient;
use crate::sort_utils::{sort_payments, SortCriterion};

/// Owns the fetched collections and the derived views over them.
///
/// Collections are immutable snapshots: every derived structure (category
/// index, spending summary, sorted listing) is recomputed from the current
/// snapshot rather than mutated in place. Mutations go through the service
/// and, on success, refetch the affected collections.
pub struct Workspace {
    client: ApiClient,
    page_size: i64,
    payments: Vec<Payment>,
    categories: Vec<Category>,
}

impl Workspace {
    pub fn new(config: &Config) -> AppResult<Self> {
        Ok(Self::with_client(ApiClient::new(config)?, config.page_size))
    }

    pub fn with_client(client: ApiClient, page_size: i64) -> Self {
        Self {
            client,
            page_size,
            payments: Vec::new(),
            categories: Vec::new(),
        }
    }

    pub fn client(&self) -> &ApiClient {
        &self.client
    }

    pub fn payments(&self) -> &[Payment] {
        &self.payments
    }

    pub fn categories(&self) -> &[Category] {
        &self.categories
    }

    /// Fetch both collections.
    pub async fn load(&mut self) -> AppResult<()> {
        self.refresh_categories().await?;
        self.refresh_payments().await
    }

    pub async fn refresh_payments(&mut self) -> AppResult<()> {
        self.payments = self.client.list_payments(0, self.page_size).await?;
        debug!(count = self.payments.len(), "Refreshed payments");
        Ok(())
    }

    pub async fn refresh_categories(&mut self) -> AppResult<()> {
        self.categories = self.client.list_categories(0, self.page_size).await?;
        debug!(count = self.categories.len(), "Refreshed categories");
        Ok(())
    }

    // Derived views

    pub fn category_index(&self) -> CategoryIndex {
        analytics::build_category_index(&self.categories)
    }

    pub fn spending_summary(&self) -> SpendingSummary {
        analytics::spending_by_category(&self.payments, &self.category_index())
    }

    /// Sorted copy of the working payment list.
    pub fn listing(&self, criterion: SortCriterion) -> Vec<Payment> {
        sort_payments(&self.payments, criterion)
    }

    /// Replace the working payment list with a search result.
    pub fn apply_search_results(&mut self, payments: Vec<Payment>) {
        self.payments = payments;
    }

    // Mutations. Each refetches the collections it affects; category
    // mutations refetch payments too since deletes cascade.

    pub async fn create_payment(&mut self, payment: &NewPayment) -> AppResult<Payment> {
        let created = self.client.create_payment(payment).await?;
        info!(payment_id = created.id, "Created payment");
        self.refresh_payments().await?;
        Ok(created)
    }

    pub async fn update_payment(&mut self, id: i64, payment: &NewPayment) -> AppResult<Payment> {
        let updated = self.client.update_payment(id, payment).await?;
        info!(payment_id = id, "Updated payment");
        self.refresh_payments().await?;
        Ok(updated)
    }

    pub async fn delete_payment(&mut self, id: i64) -> AppResult<()> {
        self.client.delete_payment(id).await?;
        info!(payment_id = id, "Deleted payment");
        self.refresh_payments().await
    }

    pub async fn create_category(&mut self, category: &NewCategory) -> AppResult<Category> {
        let created = self.client.create_category(category).await?;
        info!(category_id = created.id, "Created category");
        self.refresh_categories().await?;
        Ok(created)
    }

    pub async fn update_category(&mut self, id: i64, category: &NewCategory) -> AppResult<Category> {
        let updated = self.client.update_category(id, category).await?;
        info!(category_id = id, "Updated category");
        self.refresh_categories().await?;
        Ok(updated)
    }

    pub async fn delete_category(&mut self, id: i64) -> AppResult<()> {
        self.client.delete_category(id).await?;
        info!(category_id = id, "Deleted category");
        self.refresh_categories().await?;
        self.refresh_payments().await
    }
}
