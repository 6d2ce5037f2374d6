//! Expense primitives.
//!
//! An `Expense` is a single recorded spending event. The identifier and the
//! creation timestamp are assigned by the storage layer, never by the caller.

use chrono::{DateTime, NaiveDate, Utc};
use sea_orm::{FromQueryResult, entity::prelude::*};

use crate::Money;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Expense {
    pub id: i64,
    pub description: String,
    pub amount: Money,
    pub category: String,
    pub date: NaiveDate,
    pub created_at: DateTime<Utc>,
}

/// `expenses` relation. `amount` is `NUMERIC(10, 2)`, always positive.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "expenses")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub description: String,
    #[sea_orm(column_type = "Decimal(Some((10, 2)))")]
    pub amount: Decimal,
    pub category: String,
    pub date: Date,
    pub created_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

/// Row shape read back from `expenses`, with the amount already scaled to
/// cents by the query.
#[derive(Debug, FromQueryResult)]
pub(crate) struct ExpenseRow {
    pub id: i64,
    pub description: String,
    pub amount_cents: i64,
    pub category: String,
    pub date: Date,
    pub created_at: DateTimeUtc,
}

impl From<ExpenseRow> for Expense {
    fn from(row: ExpenseRow) -> Self {
        Self {
            id: row.id,
            description: row.description,
            amount: Money::new(row.amount_cents),
            category: row.category,
            date: row.date,
            created_at: row.created_at,
        }
    }
}
