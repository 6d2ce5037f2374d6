//! sea-orm backed [`ExpenseRepository`].
//!
//! Every predicate is bound as a query parameter; nothing from the request is
//! spliced into SQL text.
//!
//! Amounts are written as `NUMERIC(10, 2)` decimals and read back already
//! scaled to integer cents (`CAST(ROUND(amount * 100) AS BIGINT)`), so no
//! backend ever has to decode a decimal column.

use std::collections::BTreeMap;

use chrono::{SubsecRound, Utc};
use sea_orm::{
    ActiveValue, QueryFilter, QueryOrder, QuerySelect, Select,
    prelude::*,
    sea_query::{Alias, Expr, Func, SimpleExpr},
};

use crate::{
    EngineError, Expense, ExpenseChanges, ExpenseDraft, ExpenseFilter, ExpenseStats, Money, Page,
    ResultEngine,
    expenses::{self, ExpenseRow},
    repository::ExpenseRepository,
};

/// Relational storage for expenses over a pooled `DatabaseConnection`.
#[derive(Clone, Debug)]
pub struct SqlStore {
    database: DatabaseConnection,
}

impl SqlStore {
    pub fn new(database: DatabaseConnection) -> Self {
        Self { database }
    }

    pub fn database(&self) -> &DatabaseConnection {
        &self.database
    }
}

/// `CAST(ROUND(<amount> * 100) AS BIGINT)`: a decimal amount as integer cents.
fn cents(amount: Expr) -> SimpleExpr {
    Func::cast_as(
        Func::cust(Alias::new("ROUND")).arg(amount.mul(100)),
        Alias::new("BIGINT"),
    )
    .into()
}

/// Sum of `amount` in cents, 0 for an empty set.
fn total_cents() -> SimpleExpr {
    cents(Expr::expr(Func::coalesce([
        expenses::Column::Amount.sum(),
        Expr::val(0).into(),
    ])))
}

/// Every expense column, with `amount` replaced by `amount_cents`.
fn select_rows() -> Select<expenses::Entity> {
    expenses::Entity::find()
        .select_only()
        .columns([
            expenses::Column::Id,
            expenses::Column::Description,
            expenses::Column::Category,
            expenses::Column::Date,
            expenses::Column::CreatedAt,
        ])
        .column_as(
            cents(Expr::col((expenses::Entity, expenses::Column::Amount))),
            "amount_cents",
        )
}

fn apply_changes(changes: ExpenseChanges) -> expenses::ActiveModel {
    let mut active = <expenses::ActiveModel as Default>::default();
    if let Some(description) = changes.description {
        active.description = ActiveValue::Set(description);
    }
    if let Some(amount) = changes.amount {
        active.amount = ActiveValue::Set(amount.to_decimal());
    }
    if let Some(category) = changes.category {
        active.category = ActiveValue::Set(category);
    }
    if let Some(date) = changes.date {
        active.date = ActiveValue::Set(date);
    }
    active
}

impl ExpenseRepository for SqlStore {
    async fn create(&self, draft: ExpenseDraft) -> ResultEngine<Expense> {
        let active = expenses::ActiveModel {
            id: ActiveValue::NotSet,
            description: ActiveValue::Set(draft.description),
            amount: ActiveValue::Set(draft.amount.to_decimal()),
            category: ActiveValue::Set(draft.category),
            date: ActiveValue::Set(draft.date),
            // Postgres keeps microseconds; truncate so the returned value
            // matches what a later read sees.
            created_at: ActiveValue::Set(Utc::now().trunc_subsecs(6)),
        };
        let inserted = expenses::Entity::insert(active)
            .exec(&self.database)
            .await?;
        let id = inserted.last_insert_id;

        self.get_by_id(id).await?.ok_or_else(|| {
            DbErr::RecordNotFound(format!("expense id={id} missing after insert")).into()
        })
    }

    async fn get_by_id(&self, id: i64) -> ResultEngine<Option<Expense>> {
        let row = select_rows()
            .filter(expenses::Column::Id.eq(id))
            .into_model::<ExpenseRow>()
            .one(&self.database)
            .await?;
        Ok(row.map(Expense::from))
    }

    async fn get_all(&self, filter: &ExpenseFilter, page: Page) -> ResultEngine<Vec<Expense>> {
        let mut query = select_rows();

        if let Some(category) = &filter.category {
            query = query.filter(expenses::Column::Category.eq(category.as_str()));
        }
        if let Some(from) = filter.date_from {
            query = query.filter(expenses::Column::Date.gte(from));
        }
        if let Some(to) = filter.date_to {
            query = query.filter(expenses::Column::Date.lte(to));
        }

        query = query
            .order_by_desc(expenses::Column::Date)
            .order_by_desc(expenses::Column::Id);

        if page.limit > 0 {
            query = query.limit(page.limit);
        }
        if page.offset > 0 {
            query = query.offset(page.offset);
        }

        let rows = query
            .into_model::<ExpenseRow>()
            .all(&self.database)
            .await?;
        Ok(rows.into_iter().map(Expense::from).collect())
    }

    async fn update(&self, id: i64, changes: ExpenseChanges) -> ResultEngine<Option<Expense>> {
        if changes.is_empty() {
            return self.get_by_id(id).await;
        }

        let result = expenses::Entity::update_many()
            .set(apply_changes(changes))
            .filter(expenses::Column::Id.eq(id))
            .exec(&self.database)
            .await?;
        if result.rows_affected == 0 {
            return Ok(None);
        }
        self.get_by_id(id).await
    }

    async fn delete(&self, id: i64) -> ResultEngine<()> {
        let result = expenses::Entity::delete_by_id(id)
            .exec(&self.database)
            .await?;
        if result.rows_affected == 0 {
            return Err(EngineError::NotFound(id));
        }
        Ok(())
    }

    async fn stats(&self) -> ResultEngine<ExpenseStats> {
        let (total, count): (i64, i64) = expenses::Entity::find()
            .select_only()
            .column_as(total_cents(), "total_cents")
            .column_as(expenses::Column::Id.count(), "expense_count")
            .into_tuple()
            .one(&self.database)
            .await?
            .unwrap_or((0, 0));

        let rows: Vec<(String, i64)> = expenses::Entity::find()
            .select_only()
            .column(expenses::Column::Category)
            .column_as(total_cents(), "total_cents")
            .group_by(expenses::Column::Category)
            .into_tuple()
            .all(&self.database)
            .await?;

        let by_category: BTreeMap<String, Money> = rows
            .into_iter()
            .map(|(category, cents)| (category, Money::new(cents)))
            .collect();

        Ok(ExpenseStats::new(Money::new(total), count, by_category))
    }

    async fn categories(&self) -> ResultEngine<Vec<String>> {
        let categories: Vec<String> = expenses::Entity::find()
            .select_only()
            .column(expenses::Column::Category)
            .distinct()
            .order_by_asc(expenses::Column::Category)
            .into_tuple()
            .all(&self.database)
            .await?;
        Ok(categories)
    }
}
