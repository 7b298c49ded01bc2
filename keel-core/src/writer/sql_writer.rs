use crate::{
    BinaryOp, BinaryOpType, ColumnRef, CriteriaQuery, Expression, JoinClause, Junction, Operand,
    Order, Ordered, RecordDescriptor, Subquery, TableRef, Value, Window, possibly_parenthesized,
    separated_by,
    writer::{Context, Fragment},
};
use std::fmt::Write;
use time::{Date, OffsetDateTime, PrimitiveDateTime, Time};

macro_rules! write_integer {
    ($out:ident, $value:expr) => {{
        let mut buffer = itoa::Buffer::new();
        $out.push_str(buffer.format($value));
    }};
}
macro_rules! write_float {
    ($this:ident, $context:ident,$out:ident, $value:expr) => {{
        if $value.is_infinite() {
            $this.write_value_infinity($context, $out, $value.is_sign_negative());
        } else if $value.is_nan() {
            $this.write_value_nan($context, $out);
        } else {
            let mut buffer = ryu::Buffer::new();
            $out.push_str(buffer.format($value));
        }
    }};
}

/// What the select list of a criteria statement produces.
#[derive(Default, Debug, Clone, Copy, PartialEq, Eq)]
pub enum Projection {
    /// Every column of the root source, or its declared projection.
    #[default]
    All,
    /// `COUNT(*)`, or the number of groups when grouped. Ordering is dropped.
    Count,
}

/// Dialect printer converting semantic constructs into concrete SQL strings.
pub trait SqlWriter: Send + Sync {
    fn as_dyn(&self) -> &dyn SqlWriter;

    /// Whether the current fragment context allows alias declaration.
    fn alias_declaration(&self, context: &mut Context) -> bool {
        matches!(context.fragment, Fragment::SqlSelectFrom | Fragment::SqlJoin)
    }

    /// Escape occurrences of `search` char with `replace` while copying into buffer.
    fn write_escaped(
        &self,
        _context: &mut Context,
        out: &mut String,
        value: &str,
        search: char,
        replace: &str,
    ) {
        let mut position = 0;
        for (i, c) in value.char_indices() {
            if c == search {
                out.push_str(&value[position..i]);
                out.push_str(replace);
                position = i + c.len_utf8();
            }
        }
        out.push_str(&value[position..]);
    }

    /// Quote identifiers ("name") doubling inner quotes.
    fn write_identifier_quoted(&self, context: &mut Context, out: &mut String, value: &str) {
        out.push('"');
        self.write_escaped(context, out, value, '"', "\"\"");
        out.push('"');
    }

    /// Render a table reference with optional alias.
    fn write_table_ref(&self, context: &mut Context, out: &mut String, value: &TableRef) {
        if self.alias_declaration(context) || value.alias.is_empty() {
            if !value.schema.is_empty() {
                self.write_identifier_quoted(context, out, &value.schema);
                out.push('.');
            }
            self.write_identifier_quoted(context, out, &value.name);
        }
        if !value.alias.is_empty() {
            if self.alias_declaration(context) {
                out.push(' ');
            }
            out.push_str(&value.alias);
        }
    }

    /// Render a column reference, prefixed by its source alias when columns are qualified.
    fn write_column_ref(&self, context: &mut Context, out: &mut String, value: &ColumnRef) {
        if context.qualify_columns && !value.table.is_empty() {
            out.push_str(&value.table);
            out.push('.');
        }
        self.write_identifier_quoted(context, out, &value.name);
    }

    /// Render a concrete value (including proper quoting / escaping).
    fn write_value(&self, context: &mut Context, out: &mut String, value: &Value) {
        match value {
            v if v.is_null() => self.write_value_none(context, out),
            Value::Boolean(Some(v)) => self.write_value_bool(context, out, *v),
            Value::Int8(Some(v)) => write_integer!(out, *v),
            Value::Int16(Some(v)) => write_integer!(out, *v),
            Value::Int32(Some(v)) => write_integer!(out, *v),
            Value::Int64(Some(v)) => write_integer!(out, *v),
            Value::UInt8(Some(v)) => write_integer!(out, *v),
            Value::UInt16(Some(v)) => write_integer!(out, *v),
            Value::UInt32(Some(v)) => write_integer!(out, *v),
            Value::UInt64(Some(v)) => write_integer!(out, *v),
            Value::Float32(Some(v)) => write_float!(self, context, out, *v),
            Value::Float64(Some(v)) => write_float!(self, context, out, *v),
            Value::Decimal(Some(v)) => drop(write!(out, "{}", v)),
            Value::Varchar(Some(v)) | Value::Unknown(Some(v)) => {
                self.write_value_string(context, out, v)
            }
            Value::Blob(Some(v)) => self.write_value_blob(context, out, v.as_ref()),
            Value::Date(Some(v)) => self.write_value_date(context, out, v, false),
            Value::Time(Some(v)) => self.write_value_time(context, out, v, false),
            Value::Timestamp(Some(v)) => self.write_value_timestamp(context, out, v),
            Value::TimestampWithTimezone(Some(v)) => {
                self.write_value_timestamptz(context, out, v)
            }
            Value::Uuid(Some(v)) => drop(write!(out, "'{}'", v)),
            Value::List(Some(v), ..) => self.write_value_list(context, out, v),
            _ => {
                log::error!("Cannot write {:?}", value);
            }
        };
    }

    /// Render NULL literal.
    fn write_value_none(&self, _context: &mut Context, out: &mut String) {
        out.push_str("NULL");
    }

    /// Render boolean literal.
    fn write_value_bool(&self, _context: &mut Context, out: &mut String, value: bool) {
        out.push_str(["false", "true"][value as usize]);
    }

    /// Render +/- INF via CAST for dialect portability.
    fn write_value_infinity(&self, context: &mut Context, out: &mut String, negative: bool) {
        out.push_str("CAST(");
        self.write_value_string(context, out, if negative { "-inf" } else { "inf" });
        out.push_str(" AS DOUBLE)");
    }

    /// Render NaN via CAST for dialect portability.
    fn write_value_nan(&self, context: &mut Context, out: &mut String) {
        out.push_str("CAST(");
        self.write_value_string(context, out, "NaN");
        out.push_str(" AS DOUBLE)");
    }

    /// Render and escape a string literal using single quotes.
    fn write_value_string(&self, context: &mut Context, out: &mut String, value: &str) {
        out.push('\'');
        self.write_escaped(context, out, value, '\'', "''");
        out.push('\'');
    }

    /// Render a blob literal using hex escapes.
    fn write_value_blob(&self, _context: &mut Context, out: &mut String, value: &[u8]) {
        out.push('\'');
        for b in value {
            let _ = write!(out, "\\x{:02X}", b);
        }
        out.push('\'');
    }

    /// Render a DATE literal (optionally as part of TIMESTAMP composition).
    fn write_value_date(
        &self,
        _context: &mut Context,
        out: &mut String,
        value: &Date,
        timestamp: bool,
    ) {
        let b = if timestamp { "" } else { "'" };
        let _ = write!(
            out,
            "{b}{:04}-{:02}-{:02}{b}",
            value.year(),
            value.month() as u8,
            value.day()
        );
    }

    /// Render a TIME literal (optionally as part of TIMESTAMP composition).
    fn write_value_time(
        &self,
        _context: &mut Context,
        out: &mut String,
        value: &Time,
        timestamp: bool,
    ) {
        let b = if timestamp { "" } else { "'" };
        let _ = write!(
            out,
            "{b}{:02}:{:02}:{:02}",
            value.hour(),
            value.minute(),
            value.second(),
        );
        let mut subsecond = value.nanosecond();
        if subsecond != 0 {
            let mut width = 9;
            while subsecond % 10 == 0 {
                subsecond /= 10;
                width -= 1;
            }
            let _ = write!(out, ".{:0width$}", subsecond);
        }
        out.push_str(b);
    }

    /// Render a TIMESTAMP literal.
    fn write_value_timestamp(
        &self,
        context: &mut Context,
        out: &mut String,
        value: &PrimitiveDateTime,
    ) {
        out.push('\'');
        self.write_value_date(context, out, &value.date(), true);
        out.push(' ');
        self.write_value_time(context, out, &value.time(), true);
        out.push('\'');
    }

    /// Render a TIMESTAMPTZ literal, normalized to UTC.
    fn write_value_timestamptz(
        &self,
        context: &mut Context,
        out: &mut String,
        value: &OffsetDateTime,
    ) {
        let date_time = value.to_utc();
        self.write_value_timestamp(
            context,
            out,
            &PrimitiveDateTime::new(date_time.date(), date_time.time()),
        );
    }

    /// Render list literal.
    fn write_value_list(&self, context: &mut Context, out: &mut String, value: &[Value]) {
        out.push('[');
        separated_by(
            out,
            value,
            |out, v| {
                self.write_value(context, out, v);
            },
            ", ",
        );
        out.push(']');
    }

    /// Precedence table for binary operators.
    fn expression_binary_op_precedence(&self, value: &BinaryOpType) -> i32 {
        match value {
            BinaryOpType::Or => 100,
            BinaryOpType::And => 200,
            BinaryOpType::Equal => 300,
            BinaryOpType::NotEqual => 300,
            BinaryOpType::Less => 300,
            BinaryOpType::Greater => 300,
            BinaryOpType::LessEqual => 300,
            BinaryOpType::GreaterEqual => 300,
            BinaryOpType::Is => 400,
            BinaryOpType::IsNot => 400,
            BinaryOpType::Like => 400,
            BinaryOpType::NotLike => 400,
            BinaryOpType::In => 400,
            BinaryOpType::NotIn => 400,
        }
    }

    /// Render an operand (literal, placeholder or value list).
    fn write_expression_operand(&self, context: &mut Context, out: &mut String, value: &Operand) {
        match value {
            Operand::Null => out.push_str("NULL"),
            Operand::Asterisk => out.push('*'),
            Operand::QuestionMark => self.write_expression_operand_question_mark(context, out),
            Operand::Parameter(name) => {
                self.write_expression_operand_parameter(context, out, name)
            }
            Operand::Variable(v) => self.write_value(context, out, v),
            Operand::List(values) => {
                out.push('(');
                separated_by(
                    out,
                    values,
                    |out, v| {
                        self.write_value(context, out, v);
                    },
                    ", ",
                );
                out.push(')');
            }
        };
    }

    /// Render parameter placeholder (dialect may override).
    fn write_expression_operand_question_mark(&self, _context: &mut Context, out: &mut String) {
        out.push('?');
    }

    /// Render a named parameter placeholder.
    fn write_expression_operand_parameter(
        &self,
        _context: &mut Context,
        out: &mut String,
        name: &str,
    ) {
        out.push(':');
        out.push_str(name);
    }

    /// Render binary operator expression handling precedence / parenthesis.
    fn write_expression_binary_op(
        &self,
        context: &mut Context,
        out: &mut String,
        value: &BinaryOp<&dyn Expression, &dyn Expression>,
    ) {
        let infix = match value.op {
            BinaryOpType::Is => " IS ",
            BinaryOpType::IsNot => " IS NOT ",
            BinaryOpType::Like => " LIKE ",
            BinaryOpType::NotLike => " NOT LIKE ",
            BinaryOpType::In => " IN ",
            BinaryOpType::NotIn => " NOT IN ",
            BinaryOpType::Equal => " = ",
            BinaryOpType::NotEqual => " != ",
            BinaryOpType::Less => " < ",
            BinaryOpType::LessEqual => " <= ",
            BinaryOpType::Greater => " > ",
            BinaryOpType::GreaterEqual => " >= ",
            BinaryOpType::And => " AND ",
            BinaryOpType::Or => " OR ",
        };
        let precedence = self.expression_binary_op_precedence(&value.op);
        possibly_parenthesized!(
            out,
            value.lhs.precedence(self.as_dyn()) < precedence,
            value.lhs.write_query(self.as_dyn(), context, out)
        );
        out.push_str(infix);
        possibly_parenthesized!(
            out,
            value.rhs.precedence(self.as_dyn()) <= precedence,
            value.rhs.write_query(self.as_dyn(), context, out)
        );
    }

    /// Render terms joined by `AND`/`OR`, parenthesizing the ones binding weaker.
    fn write_expression_junction(&self, context: &mut Context, out: &mut String, value: &Junction) {
        self.write_expression_terms(context, out, value.op, &value.terms);
    }

    fn write_expression_terms(
        &self,
        context: &mut Context,
        out: &mut String,
        op: BinaryOpType,
        terms: &[Box<dyn Expression>],
    ) {
        let precedence = self.expression_binary_op_precedence(&op);
        let separator = if op == BinaryOpType::Or {
            " OR "
        } else {
            " AND "
        };
        separated_by(
            out,
            terms,
            |out, term| {
                possibly_parenthesized!(
                    out,
                    terms.len() > 1 && term.precedence(self.as_dyn()) <= precedence,
                    term.write_query(self.as_dyn(), context, out)
                );
            },
            separator,
        );
    }

    fn write_expression_between(
        &self,
        context: &mut Context,
        out: &mut String,
        expression: &dyn Expression,
        low: &Value,
        high: &Value,
    ) {
        possibly_parenthesized!(
            out,
            expression.precedence(self.as_dyn())
                <= self.expression_binary_op_precedence(&BinaryOpType::Equal),
            expression.write_query(self.as_dyn(), context, out)
        );
        out.push_str(" BETWEEN ");
        self.write_value(context, out, low);
        out.push_str(" AND ");
        self.write_value(context, out, high);
    }

    /// Render `column IN (SELECT ...)`, the nested statement always qualifies its columns.
    fn write_expression_subquery(&self, context: &mut Context, out: &mut String, value: &Subquery) {
        self.write_column_ref(context, out, &value.column);
        out.push_str(" IN (");
        let mut context = Context::new(Fragment::SqlSubquery, true);
        self.write_criteria_query(&mut context, out, &value.query, Projection::All, " ");
        out.push(')');
    }

    /// Render ordered expression inside ORDER BY.
    fn write_expression_ordered(
        &self,
        context: &mut Context,
        out: &mut String,
        value: &Ordered<&dyn Expression>,
    ) {
        value.expression.write_query(self.as_dyn(), context, out);
        if context.fragment == Fragment::SqlSelectOrderBy {
            let _ = write!(
                out,
                " {}",
                match value.order {
                    Order::ASC => "ASC",
                    Order::DESC => "DESC",
                }
            );
        }
    }

    /// Render an inner JOIN clause.
    fn write_join(&self, context: &mut Context, out: &mut String, join: &JoinClause) {
        let mut context = context.switch_fragment(Fragment::SqlJoin);
        context.qualify_columns = true;
        out.push_str("INNER JOIN ");
        self.write_table_ref(&mut context, out, &join.table);
        out.push_str(" ON ");
        self.write_expression_binary_op(
            &mut context,
            out,
            &BinaryOp {
                op: BinaryOpType::Equal,
                lhs: &join.on.0,
                rhs: &join.on.1,
            },
        );
    }

    /// Emit BEGIN statement.
    fn write_transaction_begin(&self, out: &mut String) {
        out.push_str("BEGIN;");
    }

    /// Emit COMMIT statement.
    fn write_transaction_commit(&self, out: &mut String) {
        out.push_str("COMMIT;");
    }

    /// Emit ROLLBACK statement.
    fn write_transaction_rollback(&self, out: &mut String) {
        out.push_str("ROLLBACK;");
    }

    /// Emit the statement synthesized by a predicate set.
    fn write_criteria_select(&self, out: &mut String, query: &CriteriaQuery, projection: Projection) {
        out.reserve(128 + query.filter.len() * 48);
        if !out.is_empty() {
            out.push('\n');
        }
        let mut context = Context::new(Fragment::SqlSelect, !query.table.alias.is_empty());
        self.write_criteria_query(&mut context, out, query, projection, "\n");
        out.push(';');
    }

    /// Clauses of a criteria statement separated by `separator`, without the terminator.
    fn write_criteria_query(
        &self,
        context: &mut Context,
        out: &mut String,
        query: &CriteriaQuery,
        projection: Projection,
        separator: &str,
    ) {
        let nested = context.fragment == Fragment::SqlSubquery;
        out.push_str("SELECT ");
        match (projection, &query.projection) {
            // Grouped rows are counted as the number of groups
            (Projection::Count, ..) => match &query.group_by {
                Some(group_by) => {
                    out.push_str("COUNT(DISTINCT ");
                    self.write_column_ref(context, out, group_by);
                    out.push(')');
                }
                None => out.push_str("COUNT(*)"),
            },
            (Projection::All, Some(column)) => self.write_column_ref(context, out, column),
            (Projection::All, None) if query.table.alias.is_empty() => out.push('*'),
            (Projection::All, None) => {
                out.push_str(&query.table.alias);
                out.push_str(".*");
            }
        }
        out.push_str(separator);
        out.push_str("FROM ");
        self.write_table_ref(
            &mut context.switch_fragment(Fragment::SqlSelectFrom),
            out,
            &query.table,
        );
        for join in &query.joins {
            out.push_str(separator);
            self.write_join(context, out, join);
        }
        if !query.filter.is_empty() {
            out.push_str(separator);
            out.push_str("WHERE ");
            self.write_expression_terms(
                &mut context.switch_fragment(Fragment::SqlSelectWhere),
                out,
                BinaryOpType::And,
                &query.filter,
            );
        }
        if let (Projection::All, Some(group_by)) = (projection, &query.group_by) {
            out.push_str(separator);
            out.push_str("GROUP BY ");
            self.write_column_ref(
                &mut context.switch_fragment(Fragment::SqlSelectGroupBy),
                out,
                group_by,
            );
        }
        if projection == Projection::All && !nested && !query.order.is_empty() {
            out.push_str(separator);
            out.push_str("ORDER BY ");
            let mut context = context.switch_fragment(Fragment::SqlSelectOrderBy);
            separated_by(
                out,
                &query.order,
                |out, v| {
                    v.write_query(self.as_dyn(), &mut context, out);
                },
                ", ",
            );
        }
    }

    /// Append the `LIMIT`/`OFFSET` clause of a fetch window.
    fn write_window(&self, out: &mut String, window: &Window) {
        out.push_str("\nLIMIT ");
        write_integer!(out, window.limit);
        out.push_str(" OFFSET ");
        write_integer!(out, window.offset);
    }

    /// Emit a SELECT of every row of the record table.
    fn write_select_all(&self, out: &mut String, descriptor: &RecordDescriptor) {
        if !out.is_empty() {
            out.push('\n');
        }
        out.push_str("SELECT *\nFROM ");
        let mut context = Context::new(Fragment::SqlSelectFrom, false);
        self.write_table_ref(&mut context, out, descriptor.table());
        out.push(';');
    }

    /// Emit a SELECT of the row whose primary key is bound to the single placeholder.
    fn write_select_by_key(&self, out: &mut String, descriptor: &RecordDescriptor) {
        if !out.is_empty() {
            out.push('\n');
        }
        out.push_str("SELECT *\nFROM ");
        let mut context = Context::new(Fragment::SqlSelectFrom, false);
        self.write_table_ref(&mut context, out, descriptor.table());
        out.push_str("\nWHERE ");
        self.write_key_condition(
            &mut context.switch_fragment(Fragment::SqlSelectWhere),
            out,
            descriptor,
        );
        out.push(';');
    }

    /// `"pk" = ?`
    fn write_key_condition(
        &self,
        context: &mut Context,
        out: &mut String,
        descriptor: &RecordDescriptor,
    ) {
        self.write_expression_binary_op(
            context,
            out,
            &BinaryOp {
                op: BinaryOpType::Equal,
                lhs: &ColumnRef::new("", descriptor.primary_key().name),
                rhs: &Operand::QuestionMark,
            },
        );
    }

    /// Emit INSERT of one row, optionally with ON CONFLICT on the primary key.
    fn write_insert(
        &self,
        out: &mut String,
        descriptor: &RecordDescriptor,
        row: &[(&str, Value)],
        update: bool,
    ) {
        if row.is_empty() {
            return;
        }
        out.reserve(128 + row.len() * 48);
        if !out.is_empty() {
            out.push('\n');
        }
        out.push_str("INSERT INTO ");
        let mut context = Context::new(Fragment::SqlInsertInto, false);
        self.write_table_ref(&mut context, out, descriptor.table());
        out.push_str(" (");
        separated_by(
            out,
            row,
            |out, (name, ..)| {
                self.write_identifier_quoted(&mut context, out, name);
            },
            ", ",
        );
        out.push_str(") VALUES\n(");
        let mut values_context = context.switch_fragment(Fragment::SqlInsertIntoValues);
        separated_by(
            out,
            row,
            |out, (.., value)| {
                self.write_value(&mut values_context, out, value);
            },
            ", ",
        );
        out.push(')');
        if update {
            self.write_insert_update_fragment(
                &mut context.switch_fragment(Fragment::SqlInsertIntoOnConflict),
                out,
                descriptor,
                &row.iter().map(|(name, ..)| *name).collect::<Vec<_>>(),
            );
        }
        out.push(';');
    }

    /// Emit ON CONFLICT fragment for upsert.
    fn write_insert_update_fragment(
        &self,
        context: &mut Context,
        out: &mut String,
        descriptor: &RecordDescriptor,
        columns: &[&str],
    ) {
        let key = descriptor.primary_key().name;
        out.push_str("\nON CONFLICT (");
        self.write_identifier_quoted(context, out, key);
        out.push(')');
        let mut columns = columns.iter().filter(|c| **c != key).peekable();
        if columns.peek().is_none() {
            out.push_str(" DO NOTHING");
            return;
        }
        out.push_str(" DO UPDATE SET\n");
        separated_by(
            out,
            columns,
            |out, v| {
                self.write_identifier_quoted(context, out, v);
                out.push_str(" = EXCLUDED.");
                self.write_identifier_quoted(context, out, v);
            },
            ",\n",
        );
    }

    /// Emit DELETE of the row whose primary key is bound to the single placeholder.
    fn write_delete_by_key(&self, out: &mut String, descriptor: &RecordDescriptor) {
        if !out.is_empty() {
            out.push('\n');
        }
        out.push_str("DELETE FROM ");
        let mut context = Context::new(Fragment::SqlDeleteFrom, false);
        self.write_table_ref(&mut context, out, descriptor.table());
        out.push_str("\nWHERE ");
        self.write_key_condition(
            &mut context.switch_fragment(Fragment::SqlDeleteFromWhere),
            out,
            descriptor,
        );
        out.push(';');
    }

    /// Emit `UPDATE ... SET "c" = :c` filtered by conditions rendered without alias prefixes.
    fn write_update(
        &self,
        out: &mut String,
        descriptor: &RecordDescriptor,
        columns: &[&str],
        filter: &[Box<dyn Expression>],
    ) {
        out.reserve(64 + columns.len() * 32 + filter.len() * 48);
        if !out.is_empty() {
            out.push('\n');
        }
        out.push_str("UPDATE ");
        let mut context = Context::new(Fragment::SqlUpdate, false);
        self.write_table_ref(&mut context, out, descriptor.table());
        out.push_str("\nSET ");
        let mut set_context = context.switch_fragment(Fragment::SqlUpdateSet);
        separated_by(
            out,
            columns,
            |out, column| {
                self.write_identifier_quoted(&mut set_context, out, column);
                out.push_str(" = ");
                self.write_expression_operand_parameter(&mut set_context, out, column);
            },
            ", ",
        );
        if !filter.is_empty() {
            out.push_str("\nWHERE ");
            self.write_expression_terms(
                &mut context.switch_fragment(Fragment::SqlUpdateWhere),
                out,
                BinaryOpType::And,
                filter,
            );
        }
        out.push(';');
    }

    /// Emit `UPDATE ... SET "c" = ? WHERE "k" = ? AND ...` with positional placeholders only.
    fn write_update_positional(
        &self,
        out: &mut String,
        descriptor: &RecordDescriptor,
        columns: &[&str],
        conditions: &[&str],
    ) {
        if !out.is_empty() {
            out.push('\n');
        }
        out.push_str("UPDATE ");
        let mut context = Context::new(Fragment::SqlUpdate, false);
        self.write_table_ref(&mut context, out, descriptor.table());
        out.push_str("\nSET ");
        let mut set_context = context.switch_fragment(Fragment::SqlUpdateSet);
        separated_by(
            out,
            columns,
            |out, column| {
                self.write_identifier_quoted(&mut set_context, out, column);
                out.push_str(" = ");
                self.write_expression_operand_question_mark(&mut set_context, out);
            },
            ", ",
        );
        if !conditions.is_empty() {
            out.push_str("\nWHERE ");
            let mut where_context = context.switch_fragment(Fragment::SqlUpdateWhere);
            separated_by(
                out,
                conditions,
                |out, column| {
                    self.write_identifier_quoted(&mut where_context, out, column);
                    out.push_str(" = ");
                    self.write_expression_operand_question_mark(&mut where_context, out);
                },
                " AND ",
            );
        }
        out.push(';');
    }
}

/// Fallback generic SQL writer (closest to PostgreSQL conventions).
#[derive(Default, Debug, Clone, Copy)]
pub struct GenericSqlWriter;
impl GenericSqlWriter {
    /// Construct a new generic writer.
    pub fn new() -> Self {
        Self {}
    }
}
impl SqlWriter for GenericSqlWriter {
    fn as_dyn(&self) -> &dyn SqlWriter {
        self
    }
}
