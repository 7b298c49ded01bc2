use crate::{
    AsValue, Between, BinaryOp, BinaryOpType, ColumnRef, Dialect, Expression, Junction,
    KeelError, Operand, Order, Ordered, Record, RecordDescriptor, Registry, Result, RowTransform,
    Statement, Subquery, TableRef, Value,
    writer::{Projection, SqlWriter},
};
use std::sync::Arc;

/// Comparison used by the property lookups of the DAO.
#[derive(Default, Debug, Clone, Copy, PartialEq, Eq)]
pub enum Restriction {
    #[default]
    Eq,
    NotEq,
    Like,
    Gt,
    Ge,
    Lt,
    Le,
}

/// A filter on the fields of one record source, independent of the alias it ends up under.
#[derive(Debug, Clone, PartialEq)]
pub enum Condition {
    Compare(&'static str, BinaryOpType, Value),
    IsNull(&'static str),
    IsNotNull(&'static str),
    In(&'static str, Vec<Value>),
    NotIn(&'static str, Vec<Value>),
    Between(&'static str, Value, Value),
    /// Disjunction.
    Any(Vec<Condition>),
    /// Conjunction.
    All(Vec<Condition>),
}

impl Condition {
    /// Expression of the condition with every column qualified by `alias`.
    pub fn scoped(&self, alias: &str) -> Box<dyn Expression> {
        let column = |name: &'static str| ColumnRef::new(alias.to_owned(), name);
        match self {
            Condition::Compare(field, op, value) => Box::new(BinaryOp {
                op: *op,
                lhs: column(*field),
                rhs: Operand::Variable(value.clone()),
            }),
            Condition::IsNull(field) => Box::new(BinaryOp {
                op: BinaryOpType::Is,
                lhs: column(*field),
                rhs: Operand::Null,
            }),
            Condition::IsNotNull(field) => Box::new(BinaryOp {
                op: BinaryOpType::IsNot,
                lhs: column(*field),
                rhs: Operand::Null,
            }),
            Condition::In(field, values) => Box::new(BinaryOp {
                op: BinaryOpType::In,
                lhs: column(*field),
                rhs: Operand::List(values.clone()),
            }),
            Condition::NotIn(field, values) => Box::new(BinaryOp {
                op: BinaryOpType::NotIn,
                lhs: column(*field),
                rhs: Operand::List(values.clone()),
            }),
            Condition::Between(field, low, high) => Box::new(Between {
                expression: column(*field),
                low: low.clone(),
                high: high.clone(),
            }),
            Condition::Any(terms) => Box::new(Junction::any(
                terms.iter().map(|v| v.scoped(alias)).collect(),
            )),
            Condition::All(terms) => Box::new(Junction::all(
                terms.iter().map(|v| v.scoped(alias)).collect(),
            )),
        }
    }

    /// The condition without empty junctions, `None` when nothing is left.
    fn pruned(self) -> Option<Condition> {
        let junction = |terms: Vec<Condition>, make: fn(Vec<Condition>) -> Condition| {
            let terms = terms
                .into_iter()
                .filter_map(Condition::pruned)
                .collect::<Vec<_>>();
            (!terms.is_empty()).then(|| make(terms))
        };
        match self {
            Condition::Any(terms) => junction(terms, Condition::Any),
            Condition::All(terms) => junction(terms, Condition::All),
            v => Some(v),
        }
    }

    fn fields(&self, out: &mut Vec<&'static str>) {
        match self {
            Condition::Compare(field, ..)
            | Condition::IsNull(field)
            | Condition::IsNotNull(field)
            | Condition::In(field, ..)
            | Condition::NotIn(field, ..)
            | Condition::Between(field, ..) => out.push(*field),
            Condition::Any(terms) | Condition::All(terms) => {
                terms.iter().for_each(|v| v.fields(out))
            }
        }
    }
}

/// Inner join of a linked predicate set.
#[derive(Debug, Clone, PartialEq)]
pub struct JoinClause {
    pub table: TableRef,
    /// Foreign column of the parent and primary key of the joined table.
    pub on: (ColumnRef, ColumnRef),
}

/// Statement synthesized from a [`PredicateSet`], rendered by [`SqlWriter::write_criteria_select`].
#[derive(Default, Debug)]
pub struct CriteriaQuery {
    pub table: TableRef,
    pub joins: Vec<JoinClause>,
    /// Conjunction of filters.
    pub filter: Vec<Box<dyn Expression>>,
    pub group_by: Option<ColumnRef>,
    pub order: Vec<Ordered<ColumnRef>>,
    pub projection: Option<ColumnRef>,
}

impl CriteriaQuery {
    pub fn to_sql(&self, writer: &dyn SqlWriter, projection: Projection) -> String {
        let mut out = String::new();
        writer.write_criteria_select(&mut out, self, projection);
        out
    }

    /// Executable statement materializing the root record.
    pub fn select_statement(&self, writer: &dyn SqlWriter) -> Statement {
        let sql = self.to_sql(writer, Projection::All);
        Statement::new(Dialect::Portable, sql.clone(), sql, RowTransform::Entity)
    }

    /// Statement counting the matching rows.
    pub fn count_statement(&self, writer: &dyn SqlWriter) -> Statement {
        let sql = self.to_sql(writer, Projection::Count);
        Statement::new(Dialect::Portable, sql.clone(), sql, RowTransform::Map)
    }
}

/// Runtime built criteria against one record source.
///
/// Every filter method ignores a `NULL` or empty string value, then validates the field
/// name against the record descriptor.
///
/// ```rust,ignore
/// let mut orders = session.criteria::<Order>()?;
/// orders
///     .equals("status", status)?
///     .like("reference", search)?
///     .add_order("created", "desc")?;
/// let statement = orders.new_statement()?;
/// ```
#[derive(Debug, Clone)]
pub struct PredicateSet {
    descriptor: Arc<RecordDescriptor>,
    alias: String,
    conditions: Vec<Condition>,
    or_groups: Vec<Vec<Condition>>,
    order: Vec<(&'static str, Order)>,
    group_by: Option<&'static str>,
    links: Vec<(&'static str, PredicateSet)>,
    sub_queries: Vec<(&'static str, PredicateSet)>,
    projection: Option<&'static str>,
}

impl PredicateSet {
    pub fn new(descriptor: Arc<RecordDescriptor>, alias: impl Into<String>) -> Self {
        Self {
            descriptor,
            alias: alias.into(),
            conditions: Vec::new(),
            or_groups: Vec::new(),
            order: Vec::new(),
            group_by: None,
            links: Vec::new(),
            sub_queries: Vec::new(),
            projection: None,
        }
    }

    /// Predicate set over `R`, its descriptor taken from the registry.
    pub fn for_type<R: Record>(registry: &Registry, alias: impl Into<String>) -> Result<Self> {
        Ok(Self::new(registry.describe::<R>()?, alias))
    }

    pub fn descriptor(&self) -> &Arc<RecordDescriptor> {
        &self.descriptor
    }
    pub fn alias(&self) -> &str {
        &self.alias
    }
    /// Top level conjunctive conditions.
    pub fn conditions(&self) -> &[Condition] {
        &self.conditions
    }
    pub fn or_groups(&self) -> &[Vec<Condition>] {
        &self.or_groups
    }
    pub fn has_links(&self) -> bool {
        !self.links.is_empty()
    }
    /// No filter at any level.
    pub fn is_empty(&self) -> bool {
        self.conditions.is_empty()
            && self.or_groups.is_empty()
            && self.sub_queries.is_empty()
            && self.links.iter().all(|(.., v)| v.is_empty())
    }

    fn field(&self, name: &str) -> Result<&'static str> {
        Ok(self.descriptor.require_field(name)?.name)
    }

    fn compare(&mut self, field: &str, op: BinaryOpType, value: impl AsValue) -> Result<&mut Self> {
        let value = value.as_value();
        if value.is_blank() {
            return Ok(self);
        }
        let field = self.field(field)?;
        self.conditions.push(Condition::Compare(field, op, value));
        Ok(self)
    }

    pub fn equals(&mut self, field: &str, value: impl AsValue) -> Result<&mut Self> {
        self.compare(field, BinaryOpType::Equal, value)
    }

    pub fn not_equals(&mut self, field: &str, value: impl AsValue) -> Result<&mut Self> {
        self.compare(field, BinaryOpType::NotEqual, value)
    }

    pub fn greater_than(&mut self, field: &str, value: impl AsValue) -> Result<&mut Self> {
        self.compare(field, BinaryOpType::Greater, value)
    }

    pub fn greater_or_equal(&mut self, field: &str, value: impl AsValue) -> Result<&mut Self> {
        self.compare(field, BinaryOpType::GreaterEqual, value)
    }

    pub fn less_than(&mut self, field: &str, value: impl AsValue) -> Result<&mut Self> {
        self.compare(field, BinaryOpType::Less, value)
    }

    pub fn less_or_equal(&mut self, field: &str, value: impl AsValue) -> Result<&mut Self> {
        self.compare(field, BinaryOpType::LessEqual, value)
    }

    /// `LIKE %value%`, the value is taken as a pattern when it already holds a `%`.
    pub fn like(&mut self, field: &str, value: impl AsValue) -> Result<&mut Self> {
        let value = value.as_value();
        if value.is_blank() {
            return Ok(self);
        }
        let field = self.field(field)?;
        self.conditions.push(Condition::Compare(
            field,
            BinaryOpType::Like,
            like_pattern(&value),
        ));
        Ok(self)
    }

    /// Any of `fields` is `LIKE %value%`.
    pub fn or_like(&mut self, fields: &[&str], value: impl AsValue) -> Result<&mut Self> {
        let value = value.as_value();
        if value.is_blank() || fields.is_empty() {
            return Ok(self);
        }
        let pattern = like_pattern(&value);
        let terms = fields
            .iter()
            .map(|f| -> Result<Condition> {
                Ok(Condition::Compare(
                    self.field(f)?,
                    BinaryOpType::Like,
                    pattern.clone(),
                ))
            })
            .collect::<Result<_>>()?;
        self.conditions.push(Condition::Any(terms));
        Ok(self)
    }

    /// Any of `fields` equals `value`.
    pub fn or(&mut self, fields: &[&str], value: impl AsValue) -> Result<&mut Self> {
        let value = value.as_value();
        if value.is_blank() || fields.is_empty() {
            return Ok(self);
        }
        let terms = fields
            .iter()
            .map(|f| -> Result<Condition> {
                Ok(Condition::Compare(
                    self.field(f)?,
                    BinaryOpType::Equal,
                    value.clone(),
                ))
            })
            .collect::<Result<_>>()?;
        self.conditions.push(Condition::Any(terms));
        Ok(self)
    }

    pub fn is_null(&mut self, field: &str) -> Result<&mut Self> {
        let field = self.field(field)?;
        self.conditions.push(Condition::IsNull(field));
        Ok(self)
    }

    pub fn is_not_null(&mut self, field: &str) -> Result<&mut Self> {
        let field = self.field(field)?;
        self.conditions.push(Condition::IsNotNull(field));
        Ok(self)
    }

    /// `IN` over the non null values, nothing is added when none is left.
    pub fn in_values<I>(&mut self, field: &str, values: I) -> Result<&mut Self>
    where
        I: IntoIterator,
        I::Item: AsValue,
    {
        let Some(values) = collect_values(values) else {
            return Ok(self);
        };
        let field = self.field(field)?;
        self.conditions.push(Condition::In(field, values));
        Ok(self)
    }

    /// `NOT IN` over the non null values, nothing is added when none is left.
    pub fn not_in<I>(&mut self, field: &str, values: I) -> Result<&mut Self>
    where
        I: IntoIterator,
        I::Item: AsValue,
    {
        let Some(values) = collect_values(values) else {
            return Ok(self);
        };
        let field = self.field(field)?;
        self.conditions.push(Condition::NotIn(field, values));
        Ok(self)
    }

    /// `BETWEEN low AND high`, skipped unless both bounds are present.
    pub fn between(
        &mut self,
        field: &str,
        low: impl AsValue,
        high: impl AsValue,
    ) -> Result<&mut Self> {
        let (low, high) = (low.as_value(), high.as_value());
        if low.is_blank() || high.is_blank() {
            return Ok(self);
        }
        let field = self.field(field)?;
        self.conditions.push(Condition::Between(field, low, high));
        Ok(self)
    }

    /// Add a prebuilt condition, its fields are validated. Empty junctions are dropped, a
    /// condition made only of them adds nothing.
    pub fn add_condition(&mut self, condition: Condition) -> Result<&mut Self> {
        let mut fields = Vec::new();
        condition.fields(&mut fields);
        for field in fields {
            self.field(field)?;
        }
        match condition.pruned() {
            Some(condition) => self.conditions.push(condition),
            None => log::debug!(
                "Empty condition on `{}` skipped",
                self.descriptor.entity_name()
            ),
        }
        Ok(self)
    }

    /// Add the conditions of `group` as one alternative: groups are OR-ed together and the
    /// disjunction joins the other conditions.
    pub fn add_or_group(&mut self, group: PredicateSet) -> Result<&mut Self> {
        if group.descriptor.type_id() != self.descriptor.type_id() {
            return Err(KeelError::validation(format!(
                "An alternative of `{}` cannot filter `{}`",
                self.descriptor.entity_name(),
                group.descriptor.entity_name()
            )));
        }
        if !group.conditions.is_empty() {
            self.or_groups.push(group.conditions);
        }
        Ok(self)
    }

    /// Append an ordering, a direction other than `asc` or `desc` is ignored.
    pub fn add_order(&mut self, field: &str, direction: &str) -> Result<&mut Self> {
        let field = self.field(field)?;
        match Order::parse(direction) {
            Some(order) => self.order.push((field, order)),
            None => log::debug!("Ignored ordering `{field}` by unknown direction `{direction}`"),
        }
        Ok(self)
    }

    /// Replace every ordering, a direction other than `asc` or `desc` is ignored.
    pub fn set_order(&mut self, field: &str, direction: &str) -> Result<&mut Self> {
        let field = self.field(field)?;
        if let Some(order) = Order::parse(direction) {
            self.order.clear();
            self.order.push((field, order));
        } else {
            log::debug!("Ignored ordering `{field}` by unknown direction `{direction}`");
        }
        Ok(self)
    }

    pub fn order_by(&mut self, field: &str, order: Order) -> Result<&mut Self> {
        let field = self.field(field)?;
        self.order.push((field, order));
        Ok(self)
    }

    pub fn set_group_by(&mut self, field: &str) -> Result<&mut Self> {
        self.group_by = Some(self.field(field)?);
        Ok(self)
    }

    /// Single column selected when the set is used as a sub query.
    pub fn set_projection(&mut self, field: &str) -> Result<&mut Self> {
        self.projection = Some(self.field(field)?);
        Ok(self)
    }

    /// Inner join `sub` through `property`, a field of this record holding the primary key
    /// of the linked one. The linked set is aliased `property`.
    pub fn add_link_query(&mut self, property: &str, sub: PredicateSet) -> Result<&mut Self> {
        let property = self.field(property)?;
        if self.links.iter().any(|(p, ..)| *p == property) {
            return Err(KeelError::validation(format!(
                "`{}` is already linked through `{property}`",
                self.descriptor.entity_name()
            )));
        }
        self.links.push((property, sub));
        Ok(self)
    }

    /// `field IN (SELECT projection ...)`, `sub` must declare its projection.
    pub fn add_sub_query(&mut self, field: &str, sub: PredicateSet) -> Result<&mut Self> {
        if sub.projection.is_none() {
            return Err(KeelError::validation(format!(
                "The sub query of `{}` on `{field}` does not declare a projection",
                self.descriptor.entity_name(),
            )));
        }
        let field = self.field(field)?;
        self.sub_queries.push((field, sub));
        Ok(self)
    }

    /// Sub query on the field named like the projection of `sub`.
    pub fn add_projected_sub_query(&mut self, sub: PredicateSet) -> Result<&mut Self> {
        let Some(projection) = sub.projection else {
            return Err(KeelError::validation(format!(
                "The sub query of `{}` does not declare a projection",
                self.descriptor.entity_name(),
            )));
        };
        self.add_sub_query(projection, sub)
    }

    /// Statement of the set: conditions, alternatives, sub queries and then every linked
    /// set scoped to its alias, followed by grouping and ordering.
    pub fn new_statement(&self) -> Result<CriteriaQuery> {
        let mut query = CriteriaQuery {
            table: self
                .descriptor
                .table()
                .clone()
                .with_alias(self.alias.clone()),
            projection: self
                .projection
                .map(|v| ColumnRef::new(self.alias.clone(), v)),
            group_by: self.group_by.map(|v| ColumnRef::new(self.alias.clone(), v)),
            ..Default::default()
        };
        let mut aliases = vec![self.alias.clone()];
        self.apply(&self.alias, &mut query, &mut aliases)?;
        Ok(query)
    }

    fn apply(&self, alias: &str, query: &mut CriteriaQuery, aliases: &mut Vec<String>) -> Result<()> {
        query
            .filter
            .extend(self.conditions.iter().map(|v| v.scoped(alias)));
        if !self.or_groups.is_empty() {
            query.filter.push(Box::new(Junction::any(
                self.or_groups
                    .iter()
                    .map(|group| {
                        Box::new(Junction::all(group.iter().map(|v| v.scoped(alias)).collect()))
                            as Box<dyn Expression>
                    })
                    .collect(),
            )));
        }
        for (field, sub) in &self.sub_queries {
            let sub_alias = format!("{alias}_{field}");
            let mut sub = sub.clone();
            sub.alias = sub_alias;
            query.filter.push(Box::new(Subquery {
                column: ColumnRef::new(alias.to_owned(), *field),
                query: Box::new(sub.new_statement()?),
            }));
        }
        query.order.extend(self.order.iter().map(|(field, order)| Ordered {
            order: *order,
            expression: ColumnRef::new(alias.to_owned(), *field),
        }));
        for (property, sub) in &self.links {
            if aliases.iter().any(|v| v == property) {
                return Err(KeelError::validation(format!(
                    "Alias `{property}` is declared twice in the statement of `{}`",
                    self.descriptor.entity_name()
                )));
            }
            aliases.push(property.to_string());
            query.joins.push(JoinClause {
                table: sub
                    .descriptor
                    .table()
                    .clone()
                    .with_alias(property.to_string()),
                on: (
                    ColumnRef::new(alias.to_owned(), *property),
                    ColumnRef::new(property.to_string(), sub.descriptor.primary_key().name),
                ),
            });
            sub.apply(property, query, aliases)?;
        }
        Ok(())
    }
}

fn like_pattern(value: &Value) -> Value {
    let text = match value {
        Value::Varchar(Some(v)) | Value::Unknown(Some(v)) => v.clone(),
        v => v.to_string(),
    };
    if text.contains('%') {
        Value::Varchar(Some(text))
    } else {
        Value::Varchar(Some(format!("%{text}%")))
    }
}

fn collect_values<I>(values: I) -> Option<Vec<Value>>
where
    I: IntoIterator,
    I::Item: AsValue,
{
    let values = values
        .into_iter()
        .map(AsValue::as_value)
        .filter(|v| !v.is_null())
        .collect::<Vec<_>>();
    (!values.is_empty()).then_some(values)
}
