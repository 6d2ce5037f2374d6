//! Request, filter and aggregate shapes consumed and produced by the engine.
//!
//! Raw requests (`NewExpense`, `ExpenseUpdate`) carry client input as-is.
//! The engine validates them into `ExpenseDraft` / `ExpenseChanges` before
//! anything reaches the repository.

use std::collections::BTreeMap;

use chrono::NaiveDate;

use crate::{
    Money, ResultEngine,
    util::{
        CATEGORY_MAX_CHARS, DESCRIPTION_MAX_CHARS, normalize_required_text, parse_date,
        positive_amount,
    },
};

/// Default page size when the caller does not ask for one.
pub const DEFAULT_LIMIT: u64 = 50;
/// Upper bound on a single page; larger requests are clamped, not rejected.
pub const MAX_LIMIT: u64 = 100;

/// Input for creating an expense. `date` is a `YYYY-MM-DD` string.
#[derive(Clone, Debug, PartialEq)]
pub struct NewExpense {
    pub description: String,
    pub amount: f64,
    pub category: String,
    pub date: String,
}

/// Partial update. `None` leaves the stored column untouched.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ExpenseUpdate {
    pub description: Option<String>,
    pub amount: Option<f64>,
    pub category: Option<String>,
    pub date: Option<String>,
}

/// A validated expense ready to be inserted.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ExpenseDraft {
    pub description: String,
    pub amount: Money,
    pub category: String,
    pub date: NaiveDate,
}

/// Validated column assignments for a partial update.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ExpenseChanges {
    pub description: Option<String>,
    pub amount: Option<Money>,
    pub category: Option<String>,
    pub date: Option<NaiveDate>,
}

/// Filters for listing expenses.
///
/// Date bounds are inclusive. `limit` and `offset` are the raw values asked
/// for by the client; see [`Page::from_filter`] for how they are normalised.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ExpenseFilter {
    pub category: Option<String>,
    pub date_from: Option<NaiveDate>,
    pub date_to: Option<NaiveDate>,
    pub limit: Option<i64>,
    pub offset: Option<i64>,
}

/// Normalised pagination bounds.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Page {
    pub limit: u64,
    pub offset: u64,
}

/// Aggregate view over every stored expense.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ExpenseStats {
    pub total_amount: Money,
    pub expense_count: i64,
    pub average_amount: f64,
    /// Categories without expenses are absent, not zero.
    pub by_category: BTreeMap<String, Money>,
}

impl NewExpense {
    pub(crate) fn validate(&self) -> ResultEngine<ExpenseDraft> {
        let date = parse_date(&self.date, "date")?;
        Ok(ExpenseDraft {
            description: normalize_required_text(
                &self.description,
                "description",
                DESCRIPTION_MAX_CHARS,
            )?,
            amount: positive_amount(self.amount)?,
            category: normalize_required_text(&self.category, "category", CATEGORY_MAX_CHARS)?,
            date,
        })
    }
}

impl ExpenseUpdate {
    pub(crate) fn validate(&self) -> ResultEngine<ExpenseChanges> {
        Ok(ExpenseChanges {
            description: self
                .description
                .as_deref()
                .map(|d| normalize_required_text(d, "description", DESCRIPTION_MAX_CHARS))
                .transpose()?,
            amount: self.amount.map(positive_amount).transpose()?,
            category: self
                .category
                .as_deref()
                .map(|c| normalize_required_text(c, "category", CATEGORY_MAX_CHARS))
                .transpose()?,
            date: self
                .date
                .as_deref()
                .map(|d| parse_date(d, "date"))
                .transpose()?,
        })
    }
}

impl ExpenseChanges {
    /// Returns `true` when no column would be assigned.
    pub fn is_empty(&self) -> bool {
        self.description.is_none()
            && self.amount.is_none()
            && self.category.is_none()
            && self.date.is_none()
    }
}

impl Page {
    /// Apply the pagination policy to a filter.
    ///
    /// Anti-abuse policy: a missing or non-positive limit becomes
    /// [`DEFAULT_LIMIT`], anything above [`MAX_LIMIT`] is clamped to it. A
    /// missing or negative offset becomes 0.
    pub fn from_filter(filter: &ExpenseFilter) -> Self {
        let limit = match filter.limit {
            Some(limit) if limit > 0 => (limit as u64).min(MAX_LIMIT),
            _ => DEFAULT_LIMIT,
        };
        let offset = filter.offset.filter(|o| *o > 0).unwrap_or(0) as u64;
        Self { limit, offset }
    }
}

impl ExpenseStats {
    /// Build the aggregate from a total, a count and per-category sums.
    ///
    /// The average is 0 for an empty store.
    pub fn new(total: Money, count: i64, by_category: BTreeMap<String, Money>) -> Self {
        let average_amount = if count > 0 {
            total.to_major() / count as f64
        } else {
            0.0
        };
        Self {
            total_amount: total,
            expense_count: count,
            average_amount,
            by_category,
        }
    }
}
