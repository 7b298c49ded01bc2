use std::{borrow::Cow, time::Duration};

/// Session level configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// Timeout handed to the driver when a transaction begins.
    pub transaction_timeout: Duration,
    /// Reject named arguments that the statement does not declare.
    pub strict_parameters: bool,
    /// Alias of the root record source in predicate built statements.
    pub root_alias: Cow<'static, str>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            transaction_timeout: Duration::from_secs(30),
            strict_parameters: false,
            root_alias: Cow::Borrowed("t0"),
        }
    }
}

impl Config {
    #[must_use]
    pub const fn transaction_timeout(mut self, timeout: Duration) -> Self {
        self.transaction_timeout = timeout;
        self
    }

    #[must_use]
    pub const fn strict_parameters(mut self, strict: bool) -> Self {
        self.strict_parameters = strict;
        self
    }

    #[must_use]
    pub fn root_alias(mut self, alias: impl Into<Cow<'static, str>>) -> Self {
        self.root_alias = alias.into();
        self
    }
}
