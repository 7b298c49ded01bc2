use crate::{
    Arguments, AsValue, Connection, Dialect, KeelError, Page, Params, PredicateSet, Record,
    RecordDescriptor, Restriction, Result, RowTransform, Session, Statement, Value,
    writer::SqlWriter,
};
use std::{marker::PhantomData, sync::Arc};

/// Generic data access of the record `R`, borrowed from a [`Session`].
///
/// Writes are single row statements: batch operations run them one after the other and
/// return the total number of affected rows.
pub struct Dao<'s, R: Record, C: Connection> {
    session: &'s mut Session<C>,
    descriptor: Arc<RecordDescriptor>,
    _record: PhantomData<R>,
}

impl<'s, R: Record, C: Connection> Dao<'s, R, C> {
    pub fn new(session: &'s mut Session<C>, descriptor: Arc<RecordDescriptor>) -> Self {
        Self {
            session,
            descriptor,
            _record: PhantomData,
        }
    }

    pub fn descriptor(&self) -> &Arc<RecordDescriptor> {
        &self.descriptor
    }

    pub fn session(&mut self) -> &mut Session<C> {
        self.session
    }

    /// Empty predicate set over `R`.
    pub fn criteria(&self) -> PredicateSet {
        PredicateSet::new(
            self.descriptor.clone(),
            self.session.config().root_alias.to_string(),
        )
    }

    fn native(&self, sql: String, transform: RowTransform) -> Statement {
        Statement::new(Dialect::Native, sql.clone(), sql, transform)
    }

    /// Record whose primary key is `id`, `None` for a null key without querying.
    pub async fn get(&mut self, id: impl AsValue) -> Result<Option<R>> {
        let id = id.as_value();
        if id.is_null() {
            return Ok(None);
        }
        let mut sql = String::with_capacity(128);
        self.session
            .writer()
            .write_select_by_key(&mut sql, &self.descriptor);
        let mut statement = self.native(sql, RowTransform::Entity);
        statement.bind(Arguments::Positional(vec![id]), false)?;
        self.session.unique(&statement).await
    }

    /// Records whose primary key is among `ids`, the store is not queried without ids.
    pub async fn get_many<I>(&mut self, ids: I) -> Result<Vec<R>>
    where
        I: IntoIterator,
        I::Item: AsValue,
    {
        let ids = ids
            .into_iter()
            .map(AsValue::as_value)
            .filter(|v| !v.is_null())
            .collect::<Vec<_>>();
        if ids.is_empty() {
            return Ok(Vec::new());
        }
        let mut criteria = self.criteria();
        criteria.in_values(self.descriptor.primary_key().name, ids)?;
        self.list_by(&criteria).await
    }

    pub async fn get_all(&mut self) -> Result<Vec<R>> {
        let mut sql = String::with_capacity(64);
        self.session
            .writer()
            .write_select_all(&mut sql, &self.descriptor);
        let statement = self.native(sql, RowTransform::Entity);
        self.session.list(&statement).await
    }

    /// Insert `record` or update the row with its primary key.
    pub async fn save(&mut self, record: &R) -> Result<u64> {
        let row = self
            .descriptor
            .fields()
            .iter()
            .filter_map(|f| record.field_value(f.name).map(|v| (f.name, v)))
            .collect::<Vec<_>>();
        let mut sql = String::with_capacity(128 + row.len() * 32);
        self.session
            .writer()
            .write_insert(&mut sql, &self.descriptor, &row, true);
        let statement = self.native(sql, RowTransform::Map);
        self.session.execute(&statement).await
    }

    /// Same as [`Dao::save`].
    pub async fn merge(&mut self, record: &R) -> Result<u64> {
        self.save(record).await
    }

    /// Same as [`Dao::save`].
    pub async fn update(&mut self, record: &R) -> Result<u64> {
        self.save(record).await
    }

    pub async fn save_all<'a, I>(&mut self, records: I) -> Result<u64>
    where
        I: IntoIterator<Item = &'a R>,
        R: 'a,
    {
        let mut total = 0;
        for record in records {
            total += self.save(record).await?;
        }
        Ok(total)
    }

    pub async fn update_all<'a, I>(&mut self, records: I) -> Result<u64>
    where
        I: IntoIterator<Item = &'a R>,
        R: 'a,
    {
        self.save_all(records).await
    }

    pub async fn delete(&mut self, record: &R) -> Result<u64> {
        self.delete_by_id(record.primary_key_value()).await
    }

    pub async fn delete_by_id(&mut self, id: impl AsValue) -> Result<u64> {
        let id = id.as_value();
        if id.is_null() {
            return Err(KeelError::validation(format!(
                "Cannot delete a `{}` without primary key",
                self.descriptor.entity_name()
            )));
        }
        let mut sql = String::with_capacity(128);
        self.session
            .writer()
            .write_delete_by_key(&mut sql, &self.descriptor);
        let mut statement = self.native(sql, RowTransform::Map);
        statement.bind(Arguments::Positional(vec![id.clone()]), false)?;
        let affected = self.session.execute(&statement).await?;
        if affected == 0 {
            log::info!(
                "No `{}` with primary key {} was deleted",
                self.descriptor.entity_name(),
                id
            );
        }
        Ok(affected)
    }

    pub async fn delete_all<I>(&mut self, ids: I) -> Result<u64>
    where
        I: IntoIterator,
        I::Item: AsValue,
    {
        let mut total = 0;
        for id in ids {
            total += self.delete_by_id(id).await?;
        }
        Ok(total)
    }

    pub async fn delete_all_records<'a, I>(&mut self, records: I) -> Result<u64>
    where
        I: IntoIterator<Item = &'a R>,
        R: 'a,
    {
        let mut total = 0;
        for record in records {
            total += self.delete(record).await?;
        }
        Ok(total)
    }

    pub async fn list_by(&mut self, criteria: &PredicateSet) -> Result<Vec<R>> {
        let statement = criteria
            .new_statement()?
            .select_statement(self.session.writer().as_dyn());
        self.session.list(&statement).await
    }

    pub async fn count_by(&mut self, criteria: &PredicateSet) -> Result<u64> {
        let statement = criteria
            .new_statement()?
            .count_statement(self.session.writer().as_dyn());
        self.session.count(&statement).await
    }

    pub async fn paginate_by(
        &mut self,
        criteria: &PredicateSet,
        page: u32,
        size: u32,
    ) -> Result<Page<R>> {
        let query = criteria.new_statement()?;
        let writer = self.session.writer();
        let count = query.count_statement(writer.as_dyn());
        let statement = query.select_statement(writer.as_dyn());
        self.session
            .paginate_with(statement, &count, page, size)
            .await
    }

    pub async fn unique_by(&mut self, criteria: &PredicateSet) -> Result<Option<R>> {
        let statement = criteria
            .new_statement()?
            .select_statement(self.session.writer().as_dyn());
        self.session.unique(&statement).await
    }

    /// Predicate set comparing `field` to `value`. A null value looks for null (or non
    /// null) fields and makes the other restrictions match nothing.
    fn property_criteria(
        &self,
        field: &str,
        value: Value,
        restriction: Restriction,
    ) -> Result<Option<PredicateSet>> {
        let mut criteria = self.criteria();
        if value.is_null() {
            match restriction {
                Restriction::Eq => criteria.is_null(field)?,
                Restriction::NotEq => criteria.is_not_null(field)?,
                _ => return Ok(None),
            };
            return Ok(Some(criteria));
        }
        match restriction {
            Restriction::Eq => criteria.equals(field, value)?,
            Restriction::NotEq => criteria.not_equals(field, value)?,
            Restriction::Like => criteria.like(field, value)?,
            Restriction::Gt => criteria.greater_than(field, value)?,
            Restriction::Ge => criteria.greater_or_equal(field, value)?,
            Restriction::Lt => criteria.less_than(field, value)?,
            Restriction::Le => criteria.less_or_equal(field, value)?,
        };
        Ok(Some(criteria))
    }

    pub async fn find_by_property(
        &mut self,
        field: &str,
        value: impl AsValue,
        restriction: Restriction,
    ) -> Result<Vec<R>> {
        match self.property_criteria(field, value.as_value(), restriction)? {
            Some(criteria) => self.list_by(&criteria).await,
            None => Ok(Vec::new()),
        }
    }

    pub async fn find_unique_by_property(
        &mut self,
        field: &str,
        value: impl AsValue,
        restriction: Restriction,
    ) -> Result<Option<R>> {
        match self.property_criteria(field, value.as_value(), restriction)? {
            Some(criteria) => self.unique_by(&criteria).await,
            None => Ok(None),
        }
    }

    /// `UPDATE ... SET field = :field` over the rows selected by `criteria`.
    ///
    /// The filter is rendered without alias prefixes, so linked sets are not supported.
    /// Null field values are bound too.
    pub async fn update_by(&mut self, fields: &Params, criteria: &PredicateSet) -> Result<u64> {
        if fields.is_empty() {
            return Err(KeelError::validation(format!(
                "No field of `{}` to update",
                self.descriptor.entity_name()
            )));
        }
        if criteria.has_links() {
            return Err(KeelError::unsupported(format!(
                "An update of `{}` cannot filter through linked records",
                self.descriptor.entity_name()
            )));
        }
        let columns = fields
            .names()
            .map(|name| -> Result<&'static str> { Ok(self.descriptor.require_field(name)?.name) })
            .collect::<Result<Vec<_>>>()?;
        let query = criteria.new_statement()?;
        let mut sql = String::with_capacity(128);
        self.session
            .writer()
            .write_update(&mut sql, &self.descriptor, &columns, &query.filter);
        let mut statement = self.native(sql, RowTransform::Map);
        for (name, value) in fields.iter() {
            statement.bind_name(name, value.clone());
        }
        self.session.execute(&statement).await
    }

    /// `UPDATE ... SET a = ? WHERE b = ? AND c = ?`, nothing runs without conditions.
    pub async fn update_where(&mut self, fields: &Params, conditions: &Params) -> Result<u64> {
        if conditions.is_empty() {
            log::debug!(
                "Update of `{}` without conditions skipped",
                self.descriptor.entity_name()
            );
            return Ok(0);
        }
        if fields.is_empty() {
            return Err(KeelError::validation(format!(
                "No field of `{}` to update",
                self.descriptor.entity_name()
            )));
        }
        let validate = |params: &Params| {
            params
                .names()
                .map(|name| -> Result<&'static str> { Ok(self.descriptor.require_field(name)?.name) })
                .collect::<Result<Vec<_>>>()
        };
        let columns = validate(fields)?;
        let filter = validate(conditions)?;
        let mut sql = String::with_capacity(128);
        self.session.writer().write_update_positional(
            &mut sql,
            &self.descriptor,
            &columns,
            &filter,
        );
        let mut statement = self.native(sql, RowTransform::Map);
        let values = fields
            .iter()
            .chain(conditions.iter())
            .map(|(.., v)| v.clone())
            .collect::<Vec<_>>();
        statement.bind(Arguments::Positional(values), false)?;
        self.session.execute(&statement).await
    }
}
