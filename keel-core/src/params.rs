use crate::{AsValue, RowMap, Shape, Value};
use std::borrow::Cow;

/// Named arguments in insertion order.
///
/// ```rust,ignore
/// let params = Params::new().with("status", "open").with("limit", 10);
/// ```
#[derive(Default, Debug, Clone, PartialEq)]
pub struct Params {
    entries: Vec<(Cow<'static, str>, Value)>,
}

impl Params {
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with(mut self, name: impl Into<Cow<'static, str>>, value: impl AsValue) -> Self {
        self.insert(name, value);
        self
    }

    /// Set `name`, returning the value it replaced.
    pub fn insert(
        &mut self,
        name: impl Into<Cow<'static, str>>,
        value: impl AsValue,
    ) -> Option<Value> {
        let name = name.into();
        let value = value.as_value();
        match self.entries.iter_mut().find(|(k, ..)| *k == name) {
            Some((.., current)) => Some(std::mem::replace(current, value)),
            None => {
                self.entries.push((name, value));
                None
            }
        }
    }

    pub fn get(&self, name: &str) -> Option<&Value> {
        self.entries
            .iter()
            .find(|(k, ..)| k == name)
            .map(|(.., v)| v)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    pub fn remove(&mut self, name: &str) -> Option<Value> {
        let position = self.entries.iter().position(|(k, ..)| k == name)?;
        Some(self.entries.remove(position).1)
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(k, ..)| k.as_ref())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.entries.iter().map(|(k, v)| (k.as_ref(), v))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Every field of `value` (parent fields included) under its field name.
    pub fn from_shape<S: Shape>(value: &S) -> Self {
        let mut result = Self::new();
        for field in S::fields().iter().chain(S::parent_fields()) {
            if let Some(v) = value.field_value(field.name) {
                result.insert(field.name, v);
            }
        }
        result
    }
}

impl IntoIterator for Params {
    type Item = (Cow<'static, str>, Value);
    type IntoIter = std::vec::IntoIter<Self::Item>;
    fn into_iter(self) -> Self::IntoIter {
        self.entries.into_iter()
    }
}

impl<K: Into<Cow<'static, str>>, V: AsValue> FromIterator<(K, V)> for Params {
    fn from_iter<T: IntoIterator<Item = (K, V)>>(iter: T) -> Self {
        let mut result = Self::new();
        for (k, v) in iter {
            result.insert(k, v);
        }
        result
    }
}

impl From<RowMap> for Params {
    fn from(value: RowMap) -> Self {
        value.into_iter().collect()
    }
}

/// Arguments bound to a statement.
#[derive(Default, Debug, Clone, PartialEq)]
pub enum Arguments {
    #[default]
    None,
    /// Bound by ordinal, starting from 0.
    Positional(Vec<Value>),
    /// Bound by placeholder name, only to the names the statement declares.
    Named(Params),
}

impl Arguments {
    pub fn is_empty(&self) -> bool {
        match self {
            Arguments::None => true,
            Arguments::Positional(v) => v.is_empty(),
            Arguments::Named(v) => v.is_empty(),
        }
    }
}

impl From<()> for Arguments {
    fn from(_: ()) -> Self {
        Arguments::None
    }
}

impl From<Params> for Arguments {
    fn from(value: Params) -> Self {
        Arguments::Named(value)
    }
}

impl From<Vec<Value>> for Arguments {
    fn from(value: Vec<Value>) -> Self {
        Arguments::Positional(value)
    }
}

impl<const N: usize> From<[Value; N]> for Arguments {
    fn from(value: [Value; N]) -> Self {
        Arguments::Positional(value.into())
    }
}

/// Positional [`Arguments`]: `args![42, "open"]`.
#[macro_export]
macro_rules! args {
    ($($value:expr),* $(,)?) => {
        $crate::Arguments::Positional(vec![$($crate::AsValue::as_value($value)),*])
    };
}

/// Named [`Params`]: `params! { "status" => "open", "limit" => 10 }`.
#[macro_export]
macro_rules! params {
    ($($name:expr => $value:expr),* $(,)?) => {{
        #[allow(unused_mut)]
        let mut params = $crate::Params::new();
        $(params.insert($name, $value);)*
        params
    }};
}
