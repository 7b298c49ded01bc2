use crate::{
    ColumnMapping, KeelError, Registry, Result, RowTransform, Shape, Statement, truncate_long,
    writer::{Context, SqlWriter},
};
use std::fmt::{self, Debug, Formatter};

/// Language a statement text is written in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Dialect {
    /// Object query form, naming records by entity name and translated to SQL.
    Portable,
    /// SQL of the connected backend, sent as it is.
    Native,
    /// Key of a statement registered in the [`Registry`].
    Named,
}

/// Result shape requested for the rows of a statement.
#[derive(Default, Clone, Copy)]
pub enum ResultShape {
    #[default]
    Unset,
    /// Generic key-value rows.
    Map,
    /// The record type itself.
    Entity,
    /// A projection type, fields bound through a column mapping.
    Projection {
        name: &'static str,
        mapping: fn(&str) -> ColumnMapping,
    },
}

impl ResultShape {
    pub fn of<S: Shape>(entity: bool) -> Self {
        if S::is_dynamic() {
            ResultShape::Map
        } else if entity {
            ResultShape::Entity
        } else {
            ResultShape::Projection {
                name: S::shape_name(),
                mapping: ColumnMapping::for_statement::<S>,
            }
        }
    }
}

impl Debug for ResultShape {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            ResultShape::Unset => f.write_str("Unset"),
            ResultShape::Map => f.write_str("Map"),
            ResultShape::Entity => f.write_str("Entity"),
            ResultShape::Projection { name, .. } => write!(f, "Projection({name})"),
        }
    }
}

/// Producer of executable statements for one dialect and result shape.
///
/// ```rust,ignore
/// let statement = QueryType::native()
///     .with_result_shape::<OrderSummary>(false)
///     .create(&registry, writer.as_dyn(), "SELECT id, total FROM orders")?;
/// ```
#[derive(Debug, Clone, Copy)]
pub struct QueryType {
    dialect: Dialect,
    shape: ResultShape,
}

impl QueryType {
    pub const fn new(dialect: Dialect) -> Self {
        Self {
            dialect,
            shape: ResultShape::Unset,
        }
    }
    pub const fn portable() -> Self {
        Self::new(Dialect::Portable)
    }
    pub const fn native() -> Self {
        Self::new(Dialect::Native)
    }
    pub const fn named() -> Self {
        Self::new(Dialect::Named)
    }

    pub fn dialect(&self) -> Dialect {
        self.dialect
    }
    pub fn shape(&self) -> ResultShape {
        self.shape
    }

    /// Request rows shaped as `S`, `entity` tells that `S` is the record type of the query.
    #[must_use]
    pub fn with_result_shape<S: Shape>(mut self, entity: bool) -> Self {
        self.shape = ResultShape::of::<S>(entity);
        self
    }

    pub fn create(
        &self,
        registry: &Registry,
        writer: &dyn SqlWriter,
        text: &str,
    ) -> Result<Statement> {
        let text = text.trim();
        if text.is_empty() {
            return Err(KeelError::validation("The statement text is empty"));
        }
        match self.dialect {
            Dialect::Portable => portable_statement(registry, writer, text),
            Dialect::Native => Ok(self.native_statement(text)),
            Dialect::Named => {
                let Some(named) = registry.statement(text) else {
                    return Err(KeelError::validation(format!(
                        "No statement is registered as `{text}`"
                    )));
                };
                match named.dialect {
                    Dialect::Native => Ok(self.native_statement(&named.text)),
                    Dialect::Portable => portable_statement(registry, writer, &named.text),
                    Dialect::Named => Err(KeelError::validation(format!(
                        "Statement `{text}` refers to another named statement"
                    ))),
                }
            }
        }
    }

    fn native_statement(&self, sql: &str) -> Statement {
        let transform = match self.shape {
            ResultShape::Unset | ResultShape::Map => RowTransform::Map,
            ResultShape::Entity => RowTransform::Entity,
            ResultShape::Projection { mapping, .. } => RowTransform::Columns(mapping(sql)),
        };
        Statement::new(Dialect::Native, sql, sql.to_owned(), transform)
    }
}

fn portable_statement(registry: &Registry, writer: &dyn SqlWriter, text: &str) -> Result<Statement> {
    let sql = translate_portable(registry, writer, text)?;
    log::trace!("Portable `{}` translated to `{}`", truncate_long!(text), truncate_long!(sql));
    Ok(Statement::new(
        Dialect::Portable,
        text,
        sql,
        RowTransform::Entity,
    ))
}

/// Words that end the source declaration of a leading `FROM`.
const CLAUSE_KEYWORDS: &[&str] = &[
    "WHERE", "ORDER", "GROUP", "HAVING", "JOIN", "INNER", "LEFT", "RIGHT", "OUTER", "CROSS",
    "ON", "LIMIT", "OFFSET", "UNION",
];

/// Identifier spans outside quotes, placeholders excluded.
fn identifiers(text: &str) -> Vec<(usize, usize)> {
    let bytes = text.as_bytes();
    let mut result = Vec::new();
    let mut quote = None;
    let mut i = 0;
    while i < bytes.len() {
        let b = bytes[i];
        if let Some(q) = quote {
            if b == q {
                quote = None;
            }
            i += 1;
            continue;
        }
        if b == b'\'' || b == b'"' {
            quote = Some(b);
            i += 1;
        } else if b.is_ascii_alphabetic() || b == b'_' {
            let start = i;
            while i < bytes.len() && (bytes[i].is_ascii_alphanumeric() || bytes[i] == b'_') {
                i += 1;
            }
            if start == 0 || bytes[start - 1] != b':' {
                result.push((start, i));
            }
        } else if b.is_ascii_digit() {
            while i < bytes.len() && (bytes[i].is_ascii_alphanumeric() || bytes[i] == b'_') {
                i += 1;
            }
        } else {
            i += 1;
        }
    }
    result
}

/// Replace the registered entity names with their table, completing a leading `FROM`
/// with the select list of the declared alias.
fn translate_portable(registry: &Registry, writer: &dyn SqlWriter, text: &str) -> Result<String> {
    let spans = identifiers(text);
    let word = |i: usize| spans.get(i).map(|(s, e)| &text[*s..*e]);
    let adjacent = |i: usize| {
        spans
            .get(i)
            .zip(spans.get(i + 1))
            .is_some_and(|(a, b)| text[a.1..b.0].trim().is_empty())
    };
    let mut out = String::with_capacity(text.len() + 32);
    if word(0).is_some_and(|v| v.eq_ignore_ascii_case("FROM")) {
        let entity = word(1).unwrap_or_default();
        if registry.find_entity(entity).is_none() {
            return Err(KeelError::schema(format!(
                "Unknown entity `{entity}` in `{}`",
                truncate_long!(text)
            )));
        }
        let mut alias = None;
        if adjacent(1) {
            alias = match word(2) {
                Some(v) if v.eq_ignore_ascii_case("AS") && adjacent(2) => word(3),
                v => v,
            }
            .filter(|v| !CLAUSE_KEYWORDS.iter().any(|k| v.eq_ignore_ascii_case(k)));
        }
        match alias {
            Some(alias) => {
                out.push_str("SELECT ");
                out.push_str(alias);
                out.push_str(".* ");
            }
            None => out.push_str("SELECT * "),
        }
    }
    let mut position = 0;
    for (start, end) in spans.iter().copied() {
        if text[..start].trim_end().ends_with('.') {
            continue;
        }
        let Some(descriptor) = registry.find_entity(&text[start..end]) else {
            continue;
        };
        out.push_str(&text[position..start]);
        writer.write_table_ref(&mut Context::default(), &mut out, descriptor.table());
        position = end;
    }
    out.push_str(&text[position..]);
    Ok(out)
}
