use sea_orm::DatabaseConnection;

use crate::{ResultEngine, SqlStore, repository::ExpenseRepository};

mod expenses;

/// Expense service: validates requests and orchestrates the repository.
///
/// Holds no mutable state; share it behind an `Arc`.
#[derive(Debug)]
pub struct Engine<R = SqlStore> {
    repository: R,
}

impl Engine {
    /// Return a builder for `Engine`. Help to build the struct.
    pub fn builder() -> EngineBuilder {
        EngineBuilder::default()
    }
}

impl<R: ExpenseRepository> Engine<R> {
    /// Build an engine over any storage implementation.
    pub fn with_repository(repository: R) -> Self {
        Self { repository }
    }

    pub fn repository(&self) -> &R {
        &self.repository
    }
}

/// The builder for `Engine`
#[derive(Default)]
pub struct EngineBuilder {
    database: DatabaseConnection,
}

impl EngineBuilder {
    /// Pass the required database
    pub fn database(mut self, db: DatabaseConnection) -> EngineBuilder {
        self.database = db;
        self
    }

    /// Construct `Engine`, checking the database answers first.
    pub async fn build(self) -> ResultEngine<Engine> {
        self.database.ping().await?;
        Ok(Engine {
            repository: SqlStore::new(self.database),
        })
    }
}
