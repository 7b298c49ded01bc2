use crate::{
    Arguments, ColumnMapping, Dialect, Driver, Executor, KeelError, Query, Result, RowLabeled,
    Value, count_statement, declared_parameters, starts_with_keyword, writer::SqlWriter,
};

/// A value bound to a statement placeholder.
#[derive(Debug, Clone, PartialEq)]
pub enum Binding {
    /// Ordinal placeholder, from 0.
    Index(u64, Value),
    /// `:name` placeholder.
    Name(String, Value),
}

/// Rows fetched by a statement: `limit` rows skipping the first `offset`.
#[derive(Default, Debug, Clone, Copy, PartialEq, Eq)]
pub struct Window {
    pub offset: u64,
    pub limit: u32,
}

impl Window {
    /// Window of the 1-based `page` holding `size` rows.
    pub fn page(page: u32, size: u32) -> Self {
        Self {
            offset: crate::start_of_page(page, size),
            limit: size,
        }
    }
}

/// How the rows of a statement reach their result shape.
#[derive(Debug, Clone, PartialEq)]
pub enum RowTransform {
    /// Rows are materialized into the record type as they are.
    Entity,
    /// Every projected column becomes a key.
    Map,
    /// Only the mapped columns survive, converted by their extraction strategy.
    Columns(ColumnMapping),
}

/// One executable statement with its bindings.
///
/// Created by [`QueryType::create`](crate::QueryType::create) or from a predicate set, and
/// owned by the call that executes it.
#[derive(Debug, Clone)]
pub struct Statement {
    dialect: Dialect,
    source: String,
    sql: String,
    transform: RowTransform,
    parameters: Vec<String>,
    bindings: Vec<Binding>,
    window: Option<Window>,
}

impl Statement {
    /// `source` is the text as supplied, `sql` the text sent to the driver.
    pub fn new(
        dialect: Dialect,
        source: impl Into<String>,
        sql: String,
        transform: RowTransform,
    ) -> Self {
        Self {
            dialect,
            source: source.into(),
            parameters: declared_parameters(&sql),
            sql,
            transform,
            bindings: Vec::new(),
            window: None,
        }
    }

    pub fn dialect(&self) -> Dialect {
        self.dialect
    }
    pub fn source(&self) -> &str {
        &self.source
    }
    pub fn sql(&self) -> &str {
        &self.sql
    }
    pub fn transform(&self) -> &RowTransform {
        &self.transform
    }
    /// Names of the `:name` placeholders.
    pub fn parameters(&self) -> &[String] {
        &self.parameters
    }
    pub fn bindings(&self) -> &[Binding] {
        &self.bindings
    }
    pub fn window(&self) -> Option<Window> {
        self.window
    }

    /// Bind the arguments.
    ///
    /// Positional values continue after the ones already bound. Named values are bound only
    /// to declared placeholders and `NULL` values are skipped, with `strict` any name the
    /// statement does not declare is rejected.
    pub fn bind(&mut self, arguments: impl Into<Arguments>, strict: bool) -> Result<&mut Self> {
        match arguments.into() {
            Arguments::None => {}
            Arguments::Positional(values) => {
                let start = self
                    .bindings
                    .iter()
                    .filter(|v| matches!(v, Binding::Index(..)))
                    .count() as u64;
                self.bindings.extend(
                    values
                        .into_iter()
                        .enumerate()
                        .map(|(i, v)| Binding::Index(start + i as u64, v)),
                );
            }
            Arguments::Named(params) => {
                if strict {
                    let undeclared = params
                        .names()
                        .filter(|n| !self.parameters.iter().any(|p| p == n))
                        .collect::<Vec<_>>();
                    if !undeclared.is_empty() {
                        return Err(KeelError::validation(format!(
                            "The statement does not declare the parameters {}",
                            undeclared
                                .iter()
                                .map(|v| format!("`{v}`"))
                                .collect::<Vec<_>>()
                                .join(", ")
                        )));
                    }
                }
                for (name, value) in params {
                    if value.is_null() || !self.parameters.iter().any(|p| *p == name) {
                        continue;
                    }
                    self.bind_name(name.into_owned(), value);
                }
            }
        }
        Ok(self)
    }

    /// Bind `value` to the `:name` placeholder, `NULL` included.
    pub fn bind_name(&mut self, name: impl Into<String>, value: Value) -> &mut Self {
        let name = name.into();
        self.bindings
            .retain(|v| !matches!(v, Binding::Name(n, ..) if *n == name));
        self.bindings.push(Binding::Name(name, value));
        self
    }

    /// Whether the statement selects rows. Native statements cannot tell.
    pub fn is_select(&self) -> Result<bool> {
        match self.dialect {
            Dialect::Native | Dialect::Named => Err(KeelError::unsupported(
                "Cannot tell whether a native statement is a selection query",
            )),
            Dialect::Portable => {
                Ok(starts_with_keyword(&self.sql, "SELECT") || starts_with_keyword(&self.sql, "FROM"))
            }
        }
    }

    pub fn set_window(&mut self, window: Window) -> &mut Self {
        self.window = Some(window);
        self
    }

    /// Statement counting the rows this one selects, with the same bindings.
    pub fn count_statement(&self) -> Result<Statement> {
        let sql = count_statement(&self.sql)?;
        let mut result = Statement::new(self.dialect, self.source.clone(), sql, RowTransform::Map);
        result.bindings = self
            .bindings
            .iter()
            .filter(|v| match v {
                Binding::Name(name, ..) => result.parameters.contains(name),
                Binding::Index(..) => true,
            })
            .cloned()
            .collect();
        Ok(result)
    }

    /// Text sent to the driver, the fetch window appended.
    pub fn executable_sql(&self, writer: &dyn SqlWriter) -> String {
        let Some(window) = &self.window else {
            return self.sql.clone();
        };
        let mut out = self
            .sql
            .trim_end()
            .trim_end_matches(';')
            .trim_end()
            .to_owned();
        writer.write_window(&mut out, window);
        out.push(';');
        out
    }

    /// Raw query when nothing is bound, otherwise a prepared one carrying the bindings.
    pub async fn prepare<E: Executor>(&self, executor: &mut E) -> Result<Query<E::Driver>> {
        let writer = executor.driver().sql_writer();
        let sql = self.executable_sql(writer.as_dyn());
        if self.bindings.is_empty() {
            return Ok(Query::Raw(sql));
        }
        let mut query = executor.prepare(sql).await?;
        for binding in &self.bindings {
            match binding {
                Binding::Index(index, value) => query.bind_index(value.clone(), *index)?,
                Binding::Name(name, value) => query.bind_name(name, value.clone())?,
            };
        }
        Ok(query)
    }

    /// Apply the row transform of the statement.
    pub fn transform_row(&self, row: RowLabeled) -> Result<RowLabeled> {
        match &self.transform {
            RowTransform::Columns(mapping) => mapping.apply(row),
            RowTransform::Entity | RowTransform::Map => Ok(row),
        }
    }
}
