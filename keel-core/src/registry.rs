use crate::{Dialect, KeelError, Record, RecordDescriptor, Result};
use std::{
    any::TypeId,
    collections::HashMap,
    sync::{Arc, PoisonError, RwLock},
};

/// A statement stored under a key and later created through the named dialect.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NamedStatement {
    pub dialect: Dialect,
    pub text: String,
}

/// Record descriptors and named statements shared by the sessions of an application.
///
/// Descriptors are computed on first use and kept until [`Registry::clear`].
#[derive(Debug, Default)]
pub struct Registry {
    records: RwLock<HashMap<TypeId, Arc<RecordDescriptor>>>,
    statements: RwLock<HashMap<String, NamedStatement>>,
}

impl Registry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Descriptor of `R`, computed and cached on the first call.
    pub fn describe<R: Record>(&self) -> Result<Arc<RecordDescriptor>> {
        let id = TypeId::of::<R>();
        if let Some(descriptor) = self
            .records
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(&id)
        {
            return Ok(descriptor.clone());
        }
        let descriptor = Arc::new(RecordDescriptor::of::<R>().inspect_err(|e| {
            log::error!("{:#}", e);
        })?);
        let mut records = self
            .records
            .write()
            .unwrap_or_else(PoisonError::into_inner);
        Ok(records.entry(id).or_insert(descriptor).clone())
    }

    /// Describe `R` ahead of time so portable statements can name it.
    pub fn register<R: Record>(&self) -> Result<&Self> {
        self.describe::<R>()?;
        Ok(self)
    }

    /// Descriptor of the registered record known as `entity_name` in portable statements.
    pub fn find_entity(&self, entity_name: &str) -> Option<Arc<RecordDescriptor>> {
        self.records
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .values()
            .find(|d| d.entity_name() == entity_name)
            .cloned()
    }

    pub fn register_statement(
        &self,
        key: impl Into<String>,
        dialect: Dialect,
        text: impl Into<String>,
    ) -> Result<&Self> {
        let key = key.into();
        let text = text.into();
        if key.trim().is_empty() || text.trim().is_empty() {
            return Err(KeelError::validation(
                "A named statement requires a key and a statement text",
            ));
        }
        if dialect == Dialect::Named {
            return Err(KeelError::validation(format!(
                "Named statement `{key}` must be portable or native"
            )));
        }
        self.statements
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(key, NamedStatement { dialect, text });
        Ok(self)
    }

    pub fn statement(&self, key: &str) -> Option<NamedStatement> {
        self.statements
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(key)
            .cloned()
    }

    /// Forget every descriptor and named statement.
    pub fn clear(&self) {
        self.records
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .clear();
        self.statements
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .clear();
    }
}
