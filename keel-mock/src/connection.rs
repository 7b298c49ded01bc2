use crate::{MockDriver, MockPrepared};
use keel_core::{
    Binding, Connection, Error, Executor, Query, QueryResult, Result,
    stream::{self, Stream},
};
use std::{
    borrow::Cow,
    collections::VecDeque,
    sync::{Arc, Mutex, PoisonError},
};

/// A statement received by [`MockConnection`].
#[derive(Debug, Clone, PartialEq)]
pub struct Call {
    pub sql: String,
    pub bindings: Vec<Binding>,
    pub prepared: bool,
}

impl Call {
    /// Values bound by position, ordered by index.
    pub fn positional(&self) -> Vec<&keel_core::Value> {
        let mut values = self
            .bindings
            .iter()
            .filter_map(|v| match v {
                Binding::Index(i, v) => Some((*i, v)),
                Binding::Name(..) => None,
            })
            .collect::<Vec<_>>();
        values.sort_by_key(|(i, ..)| *i);
        values.into_iter().map(|(.., v)| v).collect()
    }

    /// Value bound to `:name`.
    pub fn named(&self, name: &str) -> Option<&keel_core::Value> {
        self.bindings.iter().find_map(|v| match v {
            Binding::Name(n, v) if n == name => Some(v),
            _ => None,
        })
    }
}

/// Shared list of the statements a connection received, in order.
#[derive(Debug, Clone, Default)]
pub struct CallLog(Arc<Mutex<Vec<Call>>>);

impl CallLog {
    fn push(&self, call: Call) {
        self.0
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(call);
    }
    pub fn calls(&self) -> Vec<Call> {
        self.0.lock().unwrap_or_else(PoisonError::into_inner).clone()
    }
    /// SQL text of every call.
    pub fn statements(&self) -> Vec<String> {
        self.calls().into_iter().map(|v| v.sql).collect()
    }
    pub fn len(&self) -> usize {
        self.0.lock().unwrap_or_else(PoisonError::into_inner).len()
    }
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
    pub fn clear(&self) {
        self.0.lock().unwrap_or_else(PoisonError::into_inner).clear();
    }
}

pub type Handler = Box<dyn FnMut(&Call) -> Result<Vec<QueryResult>> + Send>;

/// Connection that records every statement and answers with scripted results.
///
/// Queued responses are consumed first, in order. When the queue is empty the handler
/// answers, and without a handler the statement produces nothing.
pub struct MockConnection {
    driver: MockDriver,
    log: CallLog,
    responses: VecDeque<Result<Vec<QueryResult>>>,
    handler: Option<Handler>,
}

impl Default for MockConnection {
    fn default() -> Self {
        Self::new()
    }
}

impl MockConnection {
    pub fn new() -> Self {
        Self {
            driver: MockDriver::new(),
            log: CallLog::default(),
            responses: VecDeque::new(),
            handler: None,
        }
    }

    pub fn with_handler<F>(handler: F) -> Self
    where
        F: FnMut(&Call) -> Result<Vec<QueryResult>> + Send + 'static,
    {
        Self {
            handler: Some(Box::new(handler)),
            ..Self::new()
        }
    }

    /// Handle on the calls received, it stays valid after the connection is moved.
    pub fn log(&self) -> CallLog {
        self.log.clone()
    }

    /// Queue the result of the next statement.
    pub fn respond(&mut self, results: Vec<QueryResult>) -> &mut Self {
        self.responses.push_back(Ok(results));
        self
    }

    /// Make the next statement fail with `message`.
    pub fn fail(&mut self, message: impl Into<String>) -> &mut Self {
        self.responses.push_back(Err(Error::msg(message.into())));
        self
    }

    fn answer(&mut self, call: &Call) -> Result<Vec<QueryResult>> {
        if let Some(response) = self.responses.pop_front() {
            return response;
        }
        match self.handler.as_mut() {
            Some(handler) => handler(call),
            None => Ok(Vec::new()),
        }
    }
}

impl Executor for MockConnection {
    type Driver = MockDriver;

    fn driver(&self) -> &Self::Driver {
        &self.driver
    }

    async fn prepare(&mut self, query: String) -> Result<Query<Self::Driver>> {
        Ok(Query::Prepared(MockPrepared::new(query)))
    }

    fn run(
        &mut self,
        query: Query<Self::Driver>,
    ) -> impl Stream<Item = Result<QueryResult>> + Send {
        let call = match query {
            Query::Raw(sql) => Call {
                sql,
                bindings: Vec::new(),
                prepared: false,
            },
            Query::Prepared(prepared) => Call {
                sql: prepared.sql,
                bindings: prepared.bindings,
                prepared: true,
            },
        };
        log::trace!("Mock received `{}`", call.sql);
        let results = self.answer(&call);
        self.log.push(call);
        let results: Vec<Result<QueryResult>> = match results {
            Ok(results) => results.into_iter().map(Ok).collect(),
            Err(e) => vec![Err(e)],
        };
        stream::iter(results)
    }
}

impl Connection for MockConnection {
    async fn connect(url: Cow<'static, str>) -> Result<Self> {
        if !url.starts_with("mock://") {
            return Err(Error::msg(format!(
                "Mock connection URL must start with `mock://`, found `{}`",
                url
            )));
        }
        Ok(Self::new())
    }
}
