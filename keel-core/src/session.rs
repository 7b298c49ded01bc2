use crate::{
    Arguments, Config, Connection, Context, Dao, Driver, Error, KeelError, Page,
    PredicateSet, QueryType, Record, Registry, Result, RowLabeled, Shape, Statement,
    TransactionOptions, TransactionStatus, Value, Window, stream::TryStreamExt, truncate_long,
    writer::SqlWriter,
};
use std::sync::Arc;

/// Entry point of the access layer: one connection, the shared [`Registry`] and the
/// transaction currently open on the connection.
///
/// Every operation awaits a single call of the execution primitive at a time.
pub struct Session<C: Connection> {
    connection: C,
    registry: Arc<Registry>,
    config: Config,
    transaction: Option<TransactionStatus>,
}

impl<C: Connection> Session<C> {
    pub fn new(connection: C, registry: Arc<Registry>) -> Self {
        Self::with_config(connection, registry, Config::default())
    }

    pub fn with_config(connection: C, registry: Arc<Registry>, config: Config) -> Self {
        Self {
            connection,
            registry,
            config,
            transaction: None,
        }
    }

    pub fn registry(&self) -> &Arc<Registry> {
        &self.registry
    }
    pub fn config(&self) -> &Config {
        &self.config
    }
    pub fn connection(&self) -> &C {
        &self.connection
    }
    pub fn connection_mut(&mut self) -> &mut C {
        &mut self.connection
    }
    pub fn into_connection(self) -> C {
        self.connection
    }
    /// Dialect printer of the connected driver.
    pub fn writer(&self) -> <C::Driver as Driver>::SqlWriter {
        self.connection.driver().sql_writer()
    }

    /// Data access object of the record `R`.
    pub fn dao<R: Record>(&mut self) -> Result<Dao<'_, R, C>> {
        let descriptor = self.registry.describe::<R>()?;
        Ok(Dao::new(self, descriptor))
    }

    /// Empty predicate set over `R`, aliased as configured.
    pub fn criteria<R: Record>(&self) -> Result<PredicateSet> {
        PredicateSet::for_type::<R>(&self.registry, self.config.root_alias.to_string())
    }

    /// Create a statement of `query_type` from `text` and bind the arguments to it.
    pub fn statement(
        &self,
        query_type: &QueryType,
        text: &str,
        arguments: impl Into<Arguments>,
    ) -> Result<Statement> {
        let writer = self.writer();
        let mut statement = query_type
            .create(&self.registry, writer.as_dyn(), text)
            .inspect_err(|e| log::error!("{:#}", e))?;
        statement.bind(arguments, self.config.strict_parameters)?;
        Ok(statement)
    }

    /// Portable statement materializing the record it selects.
    pub fn portable(&self, text: &str, arguments: impl Into<Arguments>) -> Result<Statement> {
        self.statement(&QueryType::portable(), text, arguments)
    }

    /// Native statement with rows shaped as `S`.
    pub fn native<S: Shape>(&self, sql: &str, arguments: impl Into<Arguments>) -> Result<Statement> {
        self.statement(
            &QueryType::native().with_result_shape::<S>(S::is_record()),
            sql,
            arguments,
        )
    }

    /// Registered statement with rows shaped as `S`.
    pub fn named<S: Shape>(&self, key: &str, arguments: impl Into<Arguments>) -> Result<Statement> {
        self.statement(
            &QueryType::named().with_result_shape::<S>(S::is_record()),
            key,
            arguments,
        )
    }

    /// Rows as returned by the driver.
    async fn fetch_raw(&mut self, statement: &Statement) -> Result<Vec<RowLabeled>> {
        let sql = statement.sql();
        let query = statement
            .prepare(&mut self.connection)
            .await
            .with_context(|| KeelError::execution(sql))?;
        log::debug!("Fetching `{}`", query);
        self.connection
            .fetch(query)
            .try_collect()
            .await
            .with_context(|| KeelError::execution(sql))
            .inspect_err(|e| log::error!("{:#}", e))
    }

    /// Rows after the transform of the statement.
    pub async fn fetch(&mut self, statement: &Statement) -> Result<Vec<RowLabeled>> {
        self.fetch_raw(statement)
            .await?
            .into_iter()
            .map(|row| statement.transform_row(row))
            .collect()
    }

    pub async fn list<S: Shape>(&mut self, statement: &Statement) -> Result<Vec<S>> {
        self.fetch(statement)
            .await?
            .iter()
            .map(S::from_row)
            .collect::<Result<_>>()
            .with_context(|| format!("While materializing `{}`", S::shape_name()))
    }

    /// At most one item, more rows are an execution error.
    pub async fn unique<S: Shape>(&mut self, statement: &Statement) -> Result<Option<S>> {
        let mut items = self.list::<S>(statement).await?;
        if items.len() > 1 {
            let error = Error::msg(format!(
                "The statement returned {} rows instead of at most 1",
                items.len()
            ))
            .context(KeelError::execution(statement.sql()));
            log::error!("{:#}", error);
            return Err(error);
        }
        Ok(items.pop())
    }

    /// First column of the first row as a count, 0 when it is missing or not numeric.
    pub async fn count(&mut self, statement: &Statement) -> Result<u64> {
        let rows = self.fetch_raw(statement).await?;
        let value = rows.first().and_then(|row| row.values().first());
        Ok(match value.and_then(Value::as_count) {
            Some(count) => count,
            None => {
                log::debug!(
                    "`{}` returned {:?} instead of a count",
                    truncate_long!(statement.sql()),
                    value
                );
                0
            }
        })
    }

    /// Run a modifying statement, returning the number of affected rows.
    pub async fn execute(&mut self, statement: &Statement) -> Result<u64> {
        let sql = statement.sql();
        let query = statement
            .prepare(&mut self.connection)
            .await
            .with_context(|| KeelError::execution(sql))?;
        log::debug!("Executing `{}`", query);
        let result = self
            .connection
            .execute(query)
            .await
            .with_context(|| KeelError::execution(sql))
            .inspect_err(|e| log::error!("{:#}", e))?;
        Ok(result.rows_affected)
    }

    /// Page `page` (from 1) of `size` items of the statement created from `text`.
    pub async fn paginate<S: Shape>(
        &mut self,
        query_type: &QueryType,
        text: &str,
        arguments: impl Into<Arguments>,
        page: u32,
        size: u32,
    ) -> Result<Page<S>> {
        let statement = self.statement(query_type, text, arguments)?;
        let count = statement.count_statement()?;
        self.paginate_with(statement, &count, page, size).await
    }

    /// Page of `statement` whose total is given by `count`. The statement does not run
    /// when the count is 0.
    pub async fn paginate_with<S: Shape>(
        &mut self,
        mut statement: Statement,
        count: &Statement,
        page: u32,
        size: u32,
    ) -> Result<Page<S>> {
        if size == 0 {
            return Err(KeelError::validation("The page size must be positive"));
        }
        let page = page.max(1);
        let total = self.count(count).await?;
        if total == 0 {
            return Ok(Page::empty(page));
        }
        statement.set_window(Window::page(page, size));
        let items = self.list(&statement).await?;
        Ok(Page::new(page, total, items))
    }

    /// Every item of the statement as a single page.
    pub async fn page_all<S: Shape>(
        &mut self,
        query_type: &QueryType,
        text: &str,
        arguments: impl Into<Arguments>,
    ) -> Result<Page<S>> {
        let statement = self.statement(query_type, text, arguments)?;
        let total = self.count(&statement.count_statement()?).await?;
        if total == 0 {
            return Ok(Page::empty(1));
        }
        let items = self.list(&statement).await?;
        Ok(Page::new(1, total, items))
    }

    /// Most recent transaction.
    pub fn transaction(&self) -> Option<&TransactionStatus> {
        self.transaction.as_ref()
    }

    /// Begin a transaction, the previous one must be completed.
    pub async fn begin_transaction(&mut self) -> Result<&TransactionStatus> {
        if let Some(current) = &self.transaction {
            if !current.is_completed() {
                return Err(KeelError::validation(format!(
                    "Transaction {} is still in progress",
                    current.id()
                )));
            }
        }
        let options = TransactionOptions {
            timeout: self.config.transaction_timeout,
        };
        let status = self
            .connection
            .begin(options)
            .await
            .inspect_err(|e| log::error!("{:#}", e))?;
        Ok(self.transaction.insert(status))
    }

    /// Commit the most recent transaction.
    pub async fn commit(&mut self) -> Result<()> {
        let Some(status) = self.transaction.as_mut() else {
            return Err(KeelError::validation("There is no transaction to commit"));
        };
        self.connection
            .commit(status)
            .await
            .inspect_err(|e| log::error!("{:#}", e))
    }

    /// Roll back the most recent transaction, nothing happens when it is already completed.
    pub async fn rollback(&mut self) -> Result<()> {
        let Some(status) = self.transaction.as_mut() else {
            log::debug!("There is no transaction to roll back");
            return Ok(());
        };
        self.connection.rollback(status).await
    }

    /// Run `work` in a new transaction: committed when it succeeds, rolled back when it or
    /// the commit fails. The error of `work` is returned as it is.
    pub async fn run_in_transaction<T, F>(&mut self, work: F) -> Result<T>
    where
        F: AsyncFnOnce(&mut Self) -> Result<T>,
    {
        self.begin_transaction().await?;
        let error = match work(&mut *self).await {
            Ok(value) => match self.commit().await {
                Ok(()) => return Ok(value),
                Err(e) => e,
            },
            Err(e) => {
                log::error!("Rolling back the transaction: {:#}", e);
                e
            }
        };
        if let Err(rollback) = self.rollback().await {
            log::error!("Rollback failed: {:#}", rollback);
        }
        Err(error)
    }
}
