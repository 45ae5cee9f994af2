use tracing::warn;

use super::RepositoryError;

/// Unit-of-work boundary offered by a store.
pub trait TransactionManager: Send + Sync {
    fn begin(&self) -> Result<(), RepositoryError>;
    fn commit(&self) -> Result<(), RepositoryError>;
    fn rollback(&self) -> Result<(), RepositoryError>;
}

/// Open transaction. Dropping it without [`Transaction::commit`] rolls back.
#[must_use = "dropping a transaction rolls it back"]
pub struct Transaction<'a, T: TransactionManager + ?Sized> {
    manager: &'a T,
    finished: bool,
}

impl<'a, T: TransactionManager + ?Sized> Transaction<'a, T> {
    pub fn begin(manager: &'a T) -> Result<Self, RepositoryError> {
        manager.begin()?;
        Ok(Self {
            manager,
            finished: false,
        })
    }

    pub fn commit(mut self) -> Result<(), RepositoryError> {
        self.finished = true;
        self.manager.commit()
    }

    pub fn rollback(mut self) -> Result<(), RepositoryError> {
        self.finished = true;
        self.manager.rollback()
    }
}

impl<T: TransactionManager + ?Sized> Drop for Transaction<'_, T> {
    fn drop(&mut self) {
        if self.finished {
            return;
        }
        if let Err(err) = self.manager.rollback() {
            warn!(error = %err, "rollback failed");
        } else {
            warn!("transaction rolled back");
        }
    }
}

/// Run `work` inside a transaction: commit on `Ok`, roll back on `Err` or unwinding.
pub fn transactional<T, R, E, F>(manager: &T, work: F) -> Result<R, E>
where
    T: TransactionManager + ?Sized,
    E: From<RepositoryError>,
    F: FnOnce() -> Result<R, E>,
{
    let transaction = Transaction::begin(manager)?;
    let value = work()?;
    transaction.commit()?;
    Ok(value)
}
