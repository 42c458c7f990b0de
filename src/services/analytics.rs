use std::collections::HashMap;

use crate::models::category::DEFAULT_COLOR;
use crate::models::{Category, Payment};
use crate::text_utils::capitalize;

/// Display name used when a payment references a category that no longer
/// exists. A dangling reference must never fail the summary view.
pub const UNKNOWN_CATEGORY: &str = "Unknown";

/// Display metadata for one category, keyed by the string form of its id.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CategoryInfo {
    pub name: String,
    pub color: String,
}

/// Lookup table from category id (stringified) to display metadata.
///
/// Ids are normalized to strings so lookups stay robust when callers hold
/// them as numbers upstream. Built fresh per render cycle, never mutated.
pub type CategoryIndex = HashMap<String, CategoryInfo>;

pub fn build_category_index(categories: &[Category]) -> CategoryIndex {
    categories
        .iter()
        .map(|c| {
            (
                c.id.to_string(),
                CategoryInfo {
                    name: c.name.clone(),
                    color: c.color_or_default().to_string(),
                },
            )
        })
        .collect()
}

#[derive(Debug, Clone)]
pub struct CategoryBreakdown {
    pub category_id: String,
    pub total: f64,
    pub name: String,
    pub color: String,
    pub percentage: f64,
}

#[derive(Debug, Clone, Default)]
pub struct SpendingSummary {
    /// Per-category buckets with a positive total, sorted by total descending.
    pub buckets: Vec<CategoryBreakdown>,
    /// Sum of all bucket totals.
    pub grand_total: f64,
}

impl SpendingSummary {
    /// Share of the grand total, in percent. Exactly zero when there is no
    /// spending at all, never NaN or infinity.
    pub fn percent_of(&self, total: f64) -> f64 {
        if self.grand_total > 0.0 {
            (total / self.grand_total) * 100.0
        } else {
            0.0
        }
    }
}

/// Aggregate payments into per-category totals for the summary chart.
///
/// Non-finite values contribute zero, buckets that do not end up strictly
/// positive are dropped, and a category miss resolves to the
/// "Unknown"/neutral-gray fallback instead of an error.
pub fn spending_by_category(payments: &[Payment], index: &CategoryIndex) -> SpendingSummary {
    let mut totals: HashMap<String, f64> = HashMap::new();

    for payment in payments {
        let value = if payment.value.is_finite() {
            payment.value
        } else {
            0.0
        };
        *totals.entry(payment.category_id.to_string()).or_insert(0.0) += value;
    }

    let mut buckets: Vec<CategoryBreakdown> = totals
        .into_iter()
        .filter(|(_, total)| *total > 0.0)
        .map(|(category_id, total)| {
            let info = index.get(&category_id);
            CategoryBreakdown {
                category_id,
                total,
                name: info
                    .map(|i| capitalize(&i.name))
                    .unwrap_or_else(|| UNKNOWN_CATEGORY.into()),
                color: info
                    .map(|i| i.color.clone())
                    .unwrap_or_else(|| DEFAULT_COLOR.into()),
                percentage: 0.0,
            }
        })
        .collect();

    buckets.sort_by(|a, b| b.total.total_cmp(&a.total));

    let grand_total: f64 = buckets.iter().map(|b| b.total).sum();
    for bucket in &mut buckets {
        bucket.percentage = if grand_total > 0.0 {
            (bucket.total / grand_total) * 100.0
        } else {
            0.0
        };
    }

    SpendingSummary {
        buckets,
        grand_total,
    }
}
