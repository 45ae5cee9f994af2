//! Persistence plumbing shared by the workflows: repository errors, the transaction scope,
//! and an in-memory store implementing every repository contract.

pub mod memory;
pub mod transaction;

pub use memory::InMemoryStore;
pub use transaction::{transactional, Transaction, TransactionManager};

/// Error enumeration for repository failures.
#[derive(Debug, thiserror::Error)]
pub enum RepositoryError {
    #[error("record already exists")]
    Conflict,
    #[error("record not found")]
    NotFound,
    #[error("this thread already has a transaction open")]
    TransactionActive,
    #[error("no transaction is open")]
    NoTransaction,
    #[error("repository unavailable: {0}")]
    Unavailable(String),
}
