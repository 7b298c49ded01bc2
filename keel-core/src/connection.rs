use crate::{Context, Driver, Executor, KeelError, Query, Result, writer::SqlWriter};
use std::{
    borrow::Cow,
    future::Future,
    sync::atomic::{AtomicU64, Ordering},
    time::Duration,
};

static TRANSACTION_ID: AtomicU64 = AtomicU64::new(1);

/// Options handed to the driver when a transaction begins.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TransactionOptions {
    pub timeout: Duration,
}

/// Token of a transaction started with [`Connection::begin`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransactionStatus {
    id: u64,
    options: TransactionOptions,
    completed: bool,
}

impl TransactionStatus {
    pub fn new(options: TransactionOptions) -> Self {
        Self {
            id: TRANSACTION_ID.fetch_add(1, Ordering::Relaxed),
            options,
            completed: false,
        }
    }
    pub fn id(&self) -> u64 {
        self.id
    }
    pub fn options(&self) -> &TransactionOptions {
        &self.options
    }
    /// Committed or rolled back.
    pub fn is_completed(&self) -> bool {
        self.completed
    }
    pub fn complete(&mut self) {
        self.completed = true;
    }
}

/// A live session with the backend.
///
/// Transaction control defaults to `BEGIN`/`COMMIT`/`ROLLBACK` statements printed by the
/// driver's [`SqlWriter`]; drivers with a native transaction API override these methods.
pub trait Connection: Executor {
    /// Open a connection to the given URL.
    fn connect(url: Cow<'static, str>) -> impl Future<Output = Result<Self>>;

    fn begin(
        &mut self,
        options: TransactionOptions,
    ) -> impl Future<Output = Result<TransactionStatus>> + Send {
        async move {
            let mut sql = String::new();
            self.driver()
                .sql_writer()
                .write_transaction_begin(&mut sql);
            self.execute(Query::Raw(sql))
                .await
                .with_context(|| KeelError::execution("BEGIN"))?;
            let status = TransactionStatus::new(options);
            log::debug!(
                "Transaction {} started on {}",
                status.id(),
                <Self::Driver as Driver>::NAME
            );
            Ok(status)
        }
    }

    /// Commit the transaction. Committing a completed transaction is an error, a failed
    /// commit leaves the transaction open so that it can be rolled back.
    fn commit(
        &mut self,
        status: &mut TransactionStatus,
    ) -> impl Future<Output = Result<()>> + Send {
        async move {
            if status.is_completed() {
                return Err(KeelError::validation(format!(
                    "Transaction {} is already completed",
                    status.id()
                )));
            }
            let mut sql = String::new();
            self.driver()
                .sql_writer()
                .write_transaction_commit(&mut sql);
            self.execute(Query::Raw(sql))
                .await
                .with_context(|| KeelError::execution("COMMIT"))?;
            status.complete();
            Ok(())
        }
    }

    /// Roll the transaction back, a completed transaction is left untouched.
    fn rollback(
        &mut self,
        status: &mut TransactionStatus,
    ) -> impl Future<Output = Result<()>> + Send {
        async move {
            if status.is_completed() {
                log::debug!("Transaction {} already completed, rollback skipped", status.id());
                return Ok(());
            }
            let mut sql = String::new();
            self.driver()
                .sql_writer()
                .write_transaction_rollback(&mut sql);
            let result = self.execute(Query::Raw(sql)).await;
            status.complete();
            result
                .map(|_| ())
                .with_context(|| KeelError::execution("ROLLBACK"))
        }
    }
}
