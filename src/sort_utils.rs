use std::cmp::Ordering;

use crate::models::Payment;

/// Ordering criteria for the transaction listing.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub enum SortCriterion {
    #[default]
    Alphabetical,
    Lowest,
    Highest,
}

impl SortCriterion {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Alphabetical => "alphabetical",
            Self::Lowest => "lowest",
            Self::Highest => "highest",
        }
    }

    /// Parse a criterion from a query string parameter. Unknown input falls
    /// back to alphabetical rather than erroring.
    pub fn from_str(s: &str) -> Self {
        match s.to_lowercase().as_str() {
            "lowest" => Self::Lowest,
            "highest" => Self::Highest,
            _ => Self::Alphabetical,
        }
    }
}

/// Return a sorted copy of the listing. The caller's collection is never
/// mutated. Equal keys may appear in any order.
pub fn sort_payments(payments: &[Payment], criterion: SortCriterion) -> Vec<Payment> {
    let mut sorted = payments.to_vec();
    match criterion {
        SortCriterion::Alphabetical => sorted.sort_by(|a, b| compare_names(&a.name, &b.name)),
        SortCriterion::Lowest => sorted.sort_by(|a, b| a.value.total_cmp(&b.value)),
        SortCriterion::Highest => sorted.sort_by(|a, b| b.value.total_cmp(&a.value)),
    }
    sorted
}

/// Case-insensitive lexicographic comparison, with the raw form breaking
/// ties so "Bus" and "bus" still order deterministically.
fn compare_names(a: &str, b: &str) -> Ordering {
    a.to_lowercase()
        .cmp(&b.to_lowercase())
        .then_with(|| a.cmp(b))
}
