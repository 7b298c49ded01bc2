use crate::{KeelError, Result, RowLabeled, RowMap, TableRef, Value};
use std::any::{TypeId, type_name};

/// Static description of one field of a [`Shape`].
#[derive(Debug)]
pub struct FieldDef {
    /// Field name, also the column it is read from.
    pub name: &'static str,
    /// Typed `NULL` prototype, it selects the extraction strategy of the field.
    pub value: Value,
    pub nullable: bool,
    pub primary_key: bool,
}

/// A type that rows can be materialized into.
///
/// Implemented by `#[derive(Shape)]` for projection types and by `#[derive(Record)]`
/// for persistent records. Fields missing from a row take their `Default` value.
pub trait Shape: Sized {
    /// Name the type is known by in portable statements.
    fn shape_name() -> &'static str;
    /// Fields declared by the type itself.
    fn fields() -> &'static [FieldDef];
    /// Fields declared by the aggregated parent (one level).
    fn parent_fields() -> &'static [FieldDef] {
        &[]
    }
    /// Whether the type is a persistent [`Record`].
    fn is_record() -> bool {
        false
    }
    /// Whether the type accepts any column (the key-value shape).
    fn is_dynamic() -> bool {
        false
    }
    fn from_row(row: &RowLabeled) -> Result<Self>;
    /// Current value of the field called `name`, parent fields included.
    fn field_value(&self, name: &str) -> Option<Value>;
}

/// A [`Shape`] persisted in a table.
pub trait Record: Shape + Send + Sync + 'static {
    fn table_name() -> &'static str;
    fn schema_name() -> &'static str {
        ""
    }
    /// Value of the primary key field, `Value::Null` when there is none.
    fn primary_key_value(&self) -> Value {
        Self::fields()
            .iter()
            .chain(Self::parent_fields())
            .find(|f| f.primary_key)
            .and_then(|f| self.field_value(f.name))
            .unwrap_or_default()
    }
}

impl Shape for RowMap {
    fn shape_name() -> &'static str {
        "RowMap"
    }
    fn fields() -> &'static [FieldDef] {
        &[]
    }
    fn is_dynamic() -> bool {
        true
    }
    fn from_row(row: &RowLabeled) -> Result<Self> {
        Ok(row
            .iter()
            .map(|(k, v)| (k.to_owned(), v.clone()))
            .collect())
    }
    fn field_value(&self, name: &str) -> Option<Value> {
        self.get(name).cloned()
    }
}

/// Validated metadata of a record type, produced once per type by the [`Registry`](crate::Registry).
#[derive(Debug)]
pub struct RecordDescriptor {
    type_id: TypeId,
    type_name: &'static str,
    entity_name: &'static str,
    table: TableRef,
    fields: Box<[&'static FieldDef]>,
    primary_key: usize,
}

impl RecordDescriptor {
    pub fn of<R: Record>() -> Result<Self> {
        Self::new(
            TypeId::of::<R>(),
            type_name::<R>(),
            R::shape_name(),
            TableRef::new(R::table_name()).with_schema(R::schema_name()),
            R::fields().iter().chain(R::parent_fields()).collect(),
        )
    }

    pub fn new(
        type_id: TypeId,
        type_name: &'static str,
        entity_name: &'static str,
        table: TableRef,
        fields: Vec<&'static FieldDef>,
    ) -> Result<Self> {
        if table.name.trim().is_empty() {
            return Err(KeelError::schema(format!(
                "The table of `{type_name}` cannot be determined"
            )));
        }
        let mut unique: Vec<&'static FieldDef> = Vec::with_capacity(fields.len());
        for field in fields {
            if unique.iter().all(|f| f.name != field.name) {
                unique.push(field);
            }
        }
        let keys = unique
            .iter()
            .enumerate()
            .filter(|(_, f)| f.primary_key)
            .map(|(i, _)| i)
            .collect::<Vec<_>>();
        let primary_key = match keys.as_slice() {
            [key] => *key,
            [] => {
                return Err(KeelError::schema(format!(
                    "`{type_name}` does not declare a primary key field"
                )));
            }
            _ => {
                return Err(KeelError::schema(format!(
                    "`{type_name}` declares {} primary key fields ({}), exactly one is required",
                    keys.len(),
                    keys.iter()
                        .map(|i| unique[*i].name)
                        .collect::<Vec<_>>()
                        .join(", ")
                )));
            }
        };
        Ok(Self {
            type_id,
            type_name,
            entity_name,
            table,
            fields: unique.into_boxed_slice(),
            primary_key,
        })
    }

    pub fn type_id(&self) -> TypeId {
        self.type_id
    }
    /// Fully qualified Rust type name.
    pub fn type_name(&self) -> &'static str {
        self.type_name
    }
    /// Name used in portable statements.
    pub fn entity_name(&self) -> &'static str {
        self.entity_name
    }
    pub fn table(&self) -> &TableRef {
        &self.table
    }
    /// Own fields followed by the parent fields.
    pub fn fields(&self) -> &[&'static FieldDef] {
        &self.fields
    }
    pub fn primary_key(&self) -> &'static FieldDef {
        self.fields[self.primary_key]
    }
    pub fn field(&self, name: &str) -> Option<&'static FieldDef> {
        self.fields.iter().find(|f| f.name == name).copied()
    }
    /// Like [`RecordDescriptor::field`] but an unknown name is a schema error.
    pub fn require_field(&self, name: &str) -> Result<&'static FieldDef> {
        self.field(name).ok_or_else(|| {
            KeelError::schema(format!(
                "`{}` has no field named `{name}`",
                self.entity_name
            ))
        })
    }
}
