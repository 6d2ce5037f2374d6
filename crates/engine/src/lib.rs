//! Expense tracking engine.
//!
//! [`Engine`] is the service layer: it validates requests, applies the
//! listing policy and turns "no such row" into [`EngineError::NotFound`].
//! Storage sits behind the [`ExpenseRepository`] capability set;
//! [`SqlStore`] is the sea-orm implementation used in production.

pub use error::EngineError;
pub use expenses::Expense;
pub use money::Money;
pub use ops::{Engine, EngineBuilder};
pub use repository::ExpenseRepository;
pub use requests::{
    DEFAULT_LIMIT, ExpenseChanges, ExpenseDraft, ExpenseFilter, ExpenseStats, ExpenseUpdate,
    MAX_LIMIT, NewExpense, Page,
};
pub use sql_store::SqlStore;
pub use util::{DATE_FORMAT, parse_date};

mod error;
mod expenses;
mod money;
mod ops;
mod repository;
mod requests;
mod sql_store;
mod util;

type ResultEngine<T> = Result<T, EngineError>;
