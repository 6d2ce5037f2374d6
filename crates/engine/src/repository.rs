//! Storage capability set the engine depends on.
//!
//! `Engine` only talks to storage through [`ExpenseRepository`], so the SQL
//! adapter can be swapped for an in-memory double in tests.

use std::future::Future;

use crate::{
    Expense, ExpenseChanges, ExpenseDraft, ExpenseFilter, ExpenseStats, Page, ResultEngine,
};

pub trait ExpenseRepository: Send + Sync {
    /// Insert a validated expense. Storage assigns `id` and `created_at`.
    fn create(&self, draft: ExpenseDraft) -> impl Future<Output = ResultEngine<Expense>> + Send;

    /// Single-row lookup. A missing row is `Ok(None)`, not an error.
    fn get_by_id(&self, id: i64) -> impl Future<Output = ResultEngine<Option<Expense>>> + Send;

    /// Rows matching every supplied predicate, newest date first, ties by id
    /// descending.
    fn get_all(
        &self,
        filter: &ExpenseFilter,
        page: Page,
    ) -> impl Future<Output = ResultEngine<Vec<Expense>>> + Send;

    /// Assign only the present columns and return the updated row.
    ///
    /// Empty `changes` re-fetch the current row. A missing row is `Ok(None)`.
    fn update(
        &self,
        id: i64,
        changes: ExpenseChanges,
    ) -> impl Future<Output = ResultEngine<Option<Expense>>> + Send;

    /// Hard delete. Fails with `NotFound` when no row was affected.
    fn delete(&self, id: i64) -> impl Future<Output = ResultEngine<()>> + Send;

    fn stats(&self) -> impl Future<Output = ResultEngine<ExpenseStats>> + Send;

    /// Distinct category labels, alphabetically ordered.
    fn categories(&self) -> impl Future<Output = ResultEngine<Vec<String>>> + Send;
}
