use crate::{
    EngineError, Expense, ExpenseFilter, ExpenseStats, ExpenseUpdate, NewExpense, Page,
    ResultEngine, repository::ExpenseRepository,
};

use super::Engine;

impl<R: ExpenseRepository> Engine<R> {
    /// Create an expense.
    ///
    /// The request is fully validated before storage is touched; the returned
    /// expense carries the storage-assigned id and creation timestamp.
    pub async fn new_expense(&self, request: NewExpense) -> ResultEngine<Expense> {
        let draft = request.validate()?;
        let expense = self.repository.create(draft).await?;
        tracing::debug!(id = expense.id, amount = %expense.amount, "expense created");
        Ok(expense)
    }

    /// Fetch one expense, `NotFound` when the id does not exist.
    pub async fn expense(&self, id: i64) -> ResultEngine<Expense> {
        self.repository
            .get_by_id(id)
            .await?
            .ok_or(EngineError::NotFound(id))
    }

    /// List expenses matching `filter`, newest first.
    ///
    /// The page size follows [`Page::from_filter`]; an empty result is an
    /// empty vector.
    pub async fn expenses(&self, filter: &ExpenseFilter) -> ResultEngine<Vec<Expense>> {
        let page = Page::from_filter(filter);
        self.repository.get_all(filter, page).await
    }

    /// Apply a partial update.
    ///
    /// Existence is checked first so a missing id reports `NotFound` with a
    /// clear message. The check and the write are separate statements: a
    /// concurrent delete in between also ends up as `NotFound`.
    pub async fn update_expense(&self, id: i64, request: ExpenseUpdate) -> ResultEngine<Expense> {
        let changes = request.validate()?;
        self.expense(id).await?;

        let updated = self
            .repository
            .update(id, changes)
            .await?
            .ok_or(EngineError::NotFound(id))?;
        tracing::debug!(id, "expense updated");
        Ok(updated)
    }

    /// Hard-delete an expense. The repository reports `NotFound` itself.
    pub async fn delete_expense(&self, id: i64) -> ResultEngine<()> {
        self.repository.delete(id).await?;
        tracing::debug!(id, "expense deleted");
        Ok(())
    }

    pub async fn statistics(&self) -> ResultEngine<ExpenseStats> {
        self.repository.stats().await
    }

    pub async fn categories(&self) -> ResultEngine<Vec<String>> {
        self.repository.categories().await
    }
}

#[cfg(test)]
mod tests {
    use std::{
        collections::BTreeMap,
        sync::{
            Mutex,
            atomic::{AtomicUsize, Ordering},
        },
    };

    use chrono::Utc;
    use sea_orm::DbErr;

    use super::*;
    use crate::{ExpenseChanges, ExpenseDraft, Money};

    /// In-memory repository double. Ids are handed out sequentially.
    #[derive(Default)]
    struct MemoryRepository {
        rows: Mutex<BTreeMap<i64, Expense>>,
        creates: AtomicUsize,
        updates: AtomicUsize,
        fail: bool,
    }

    impl MemoryRepository {
        fn failing() -> Self {
            Self {
                fail: true,
                ..Default::default()
            }
        }

        fn check(&self) -> ResultEngine<()> {
            if self.fail {
                return Err(DbErr::Custom("connection refused".to_string()).into());
            }
            Ok(())
        }
    }

    impl ExpenseRepository for MemoryRepository {
        async fn create(&self, draft: ExpenseDraft) -> ResultEngine<Expense> {
            self.check()?;
            self.creates.fetch_add(1, Ordering::SeqCst);
            let mut rows = self.rows.lock().unwrap();
            let id = rows.keys().next_back().copied().unwrap_or(0) + 1;
            let expense = Expense {
                id,
                description: draft.description,
                amount: draft.amount,
                category: draft.category,
                date: draft.date,
                created_at: Utc::now(),
            };
            rows.insert(id, expense.clone());
            Ok(expense)
        }

        async fn get_by_id(&self, id: i64) -> ResultEngine<Option<Expense>> {
            self.check()?;
            Ok(self.rows.lock().unwrap().get(&id).cloned())
        }

        async fn get_all(&self, filter: &ExpenseFilter, page: Page) -> ResultEngine<Vec<Expense>> {
            self.check()?;
            let rows = self.rows.lock().unwrap();
            Ok(rows
                .values()
                .rev()
                .filter(|e| filter.category.as_ref().is_none_or(|c| &e.category == c))
                .skip(page.offset as usize)
                .take(page.limit as usize)
                .cloned()
                .collect())
        }

        async fn update(&self, id: i64, changes: ExpenseChanges) -> ResultEngine<Option<Expense>> {
            self.check()?;
            self.updates.fetch_add(1, Ordering::SeqCst);
            let mut rows = self.rows.lock().unwrap();
            let Some(expense) = rows.get_mut(&id) else {
                return Ok(None);
            };
            if let Some(description) = changes.description {
                expense.description = description;
            }
            if let Some(amount) = changes.amount {
                expense.amount = amount;
            }
            if let Some(category) = changes.category {
                expense.category = category;
            }
            if let Some(date) = changes.date {
                expense.date = date;
            }
            Ok(Some(expense.clone()))
        }

        async fn delete(&self, id: i64) -> ResultEngine<()> {
            self.check()?;
            self.rows
                .lock()
                .unwrap()
                .remove(&id)
                .map(|_| ())
                .ok_or(EngineError::NotFound(id))
        }

        async fn stats(&self) -> ResultEngine<ExpenseStats> {
            self.check()?;
            let rows = self.rows.lock().unwrap();
            let mut by_category: BTreeMap<String, Money> = BTreeMap::new();
            for expense in rows.values() {
                let sum = by_category.entry(expense.category.clone()).or_default();
                *sum = Money::new(sum.cents() + expense.amount.cents());
            }
            let total = Money::new(rows.values().map(|e| e.amount.cents()).sum());
            Ok(ExpenseStats::new(total, rows.len() as i64, by_category))
        }

        async fn categories(&self) -> ResultEngine<Vec<String>> {
            self.check()?;
            let rows = self.rows.lock().unwrap();
            let mut categories: Vec<String> = rows.values().map(|e| e.category.clone()).collect();
            categories.sort();
            categories.dedup();
            Ok(categories)
        }
    }

    fn request(description: &str, amount: f64, category: &str) -> NewExpense {
        NewExpense {
            description: description.to_string(),
            amount,
            category: category.to_string(),
            date: "2024-01-15".to_string(),
        }
    }

    fn engine() -> Engine<MemoryRepository> {
        Engine::with_repository(MemoryRepository::default())
    }

    #[tokio::test]
    async fn new_expense_returns_populated_expense() {
        let engine = engine();
        let expense = engine
            .new_expense(request("Coffee", 350.0, "Food"))
            .await
            .unwrap();

        assert_eq!(expense.id, 1);
        assert_eq!(expense.description, "Coffee");
        assert_eq!(expense.amount, Money::new(35_000));
        assert_eq!(expense.date.to_string(), "2024-01-15");
    }

    #[tokio::test]
    async fn invalid_date_fails_without_persisting() {
        let engine = engine();
        let mut req = request("Coffee", 3.5, "Food");
        req.date = "not-a-date".to_string();

        let err = engine.new_expense(req).await.unwrap_err();
        assert!(matches!(err, EngineError::InvalidInput(_)));
        assert_eq!(engine.repository().creates.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn non_positive_amount_is_invalid_input() {
        let engine = engine();
        let err = engine
            .new_expense(request("Refund?", -5.0, "Food"))
            .await
            .unwrap_err();
        assert!(matches!(err, EngineError::InvalidInput(_)));
    }

    #[tokio::test]
    async fn missing_expense_is_not_found_with_id() {
        let engine = engine();
        let err = engine.expense(999).await.unwrap_err();
        assert_eq!(err, EngineError::NotFound(999));
        assert!(err.to_string().contains("999"));
    }

    #[tokio::test]
    async fn storage_failure_is_not_reported_as_not_found() {
        let engine = Engine::with_repository(MemoryRepository::failing());
        let err = engine.expense(1).await.unwrap_err();
        assert!(matches!(err, EngineError::Database(_)));
    }

    #[tokio::test]
    async fn listing_filters_by_category() {
        let engine = engine();
        engine.new_expense(request("Lunch", 10.0, "Food")).await.unwrap();
        engine.new_expense(request("Dinner", 20.0, "Food")).await.unwrap();
        engine.new_expense(request("Bus", 2.0, "Transport")).await.unwrap();

        let filter = ExpenseFilter {
            category: Some("Food".to_string()),
            ..Default::default()
        };
        let expenses = engine.expenses(&filter).await.unwrap();
        assert_eq!(expenses.len(), 2);
        assert!(expenses.iter().all(|e| e.category == "Food"));
    }

    #[tokio::test]
    async fn listing_applies_default_and_max_limit() {
        let engine = engine();
        for i in 0..120 {
            engine
                .new_expense(request(&format!("item {i}"), 1.0, "Misc"))
                .await
                .unwrap();
        }

        let default = engine.expenses(&ExpenseFilter::default()).await.unwrap();
        assert_eq!(default.len(), 50);

        let clamped = ExpenseFilter {
            limit: Some(500),
            ..Default::default()
        };
        assert_eq!(engine.expenses(&clamped).await.unwrap().len(), 100);

        let negative = ExpenseFilter {
            limit: Some(-1),
            ..Default::default()
        };
        assert_eq!(engine.expenses(&negative).await.unwrap().len(), 50);
    }

    #[tokio::test]
    async fn empty_listing_is_empty_vec() {
        let engine = engine();
        let expenses = engine.expenses(&ExpenseFilter::default()).await.unwrap();
        assert!(expenses.is_empty());
    }

    #[tokio::test]
    async fn partial_update_leaves_other_fields() {
        let engine = engine();
        let created = engine
            .new_expense(request("Coffee", 3.5, "Food"))
            .await
            .unwrap();

        let update = ExpenseUpdate {
            description: Some("Flat white".to_string()),
            ..Default::default()
        };
        let updated = engine.update_expense(created.id, update).await.unwrap();
        assert_eq!(updated.description, "Flat white");

        let fetched = engine.expense(created.id).await.unwrap();
        assert_eq!(fetched.description, "Flat white");
        assert_eq!(fetched.amount, created.amount);
        assert_eq!(fetched.category, created.category);
        assert_eq!(fetched.date, created.date);
    }

    #[tokio::test]
    async fn update_of_missing_expense_skips_write() {
        let engine = engine();
        let update = ExpenseUpdate {
            amount: Some(12.0),
            ..Default::default()
        };
        let err = engine.update_expense(7, update).await.unwrap_err();
        assert_eq!(err, EngineError::NotFound(7));
        assert_eq!(engine.repository().updates.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn delete_twice_reports_not_found() {
        let engine = engine();
        let created = engine
            .new_expense(request("Coffee", 3.5, "Food"))
            .await
            .unwrap();

        engine.delete_expense(created.id).await.unwrap();
        assert_eq!(
            engine.delete_expense(created.id).await.unwrap_err(),
            EngineError::NotFound(created.id)
        );
        assert_eq!(
            engine.expense(created.id).await.unwrap_err(),
            EngineError::NotFound(created.id)
        );
    }

    #[tokio::test]
    async fn statistics_aggregate_amounts() {
        let engine = engine();
        engine.new_expense(request("a", 100.0, "Food")).await.unwrap();
        engine.new_expense(request("b", 200.0, "Food")).await.unwrap();
        engine.new_expense(request("c", 300.0, "Transport")).await.unwrap();

        let stats = engine.statistics().await.unwrap();
        assert_eq!(stats.total_amount, Money::new(60_000));
        assert_eq!(stats.expense_count, 3);
        assert_eq!(stats.average_amount, 200.0);
        assert_eq!(stats.by_category["Food"], Money::new(30_000));
    }
}
