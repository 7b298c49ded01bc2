#[cfg(test)]
mod tests {
    use keel_core::{
        Binding, Connection, Driver, Executor, Prepared, Query, QueryResult, Value,
        stream::TryStreamExt,
    };
    use keel_mock::{MockConnection, MockDriver, affected, rows, scalar};

    fn init_logs() {
        let _ = env_logger::builder().is_test(true).try_init();
    }

    #[tokio::test]
    async fn connect_requires_mock_url() {
        init_logs();
        let driver = MockDriver::new();
        assert!(driver.connect("mock://".into()).await.is_ok());
        assert!(driver.connect("postgres://localhost".into()).await.is_err());
    }

    #[tokio::test]
    async fn queued_responses_then_handler() {
        init_logs();
        let mut connection = MockConnection::with_handler(|call| {
            Ok(if call.sql.starts_with("SELECT") {
                scalar("n", 7_i64)
            } else {
                affected(1)
            })
        });
        connection.respond(rows(&["a", "b"], [vec![Value::Int32(Some(1)), "x".into()]]));
        let log = connection.log();

        let first: Vec<_> = connection
            .fetch(Query::Raw("SELECT a, b FROM t;".into()))
            .try_collect()
            .await
            .unwrap();
        assert_eq!(first.len(), 1);
        assert_eq!(first[0].get_column("b"), Some(&Value::Varchar(Some("x".into()))));

        let second: Vec<_> = connection
            .fetch(Query::Raw("SELECT n FROM t;".into()))
            .try_collect()
            .await
            .unwrap();
        assert_eq!(second[0].values(), &[Value::Int64(Some(7))]);

        let result = connection
            .execute(Query::Raw("DELETE FROM t;".into()))
            .await
            .unwrap();
        assert_eq!(result.rows_affected, 1);
        assert_eq!(
            log.statements(),
            ["SELECT a, b FROM t;", "SELECT n FROM t;", "DELETE FROM t;"]
        );
    }

    #[tokio::test]
    async fn failure_reaches_the_caller() {
        init_logs();
        let mut connection = MockConnection::new();
        connection.fail("disk full");
        let result = connection.execute(Query::Raw("DELETE FROM t;".into())).await;
        assert!(format!("{:#}", result.unwrap_err()).contains("disk full"));
        assert_eq!(connection.log().len(), 1);
        let result: Vec<QueryResult> = connection
            .run(Query::Raw("SELECT 1;".into()))
            .try_collect()
            .await
            .unwrap();
        assert!(result.is_empty());
    }

    #[tokio::test]
    async fn prepared_bindings_are_recorded() {
        init_logs();
        let mut connection = MockConnection::new();
        let mut query = connection
            .prepare("UPDATE t SET a = ? WHERE b = :b;".into())
            .await
            .unwrap();
        query.bind(1_i32).unwrap().bind_name("b", "x").unwrap();
        let Query::Prepared(prepared) = &query else {
            panic!("Expected a prepared query");
        };
        assert_eq!(prepared.bindings().len(), 2);
        connection.execute(query).await.unwrap();
        let calls = connection.log().calls();
        assert!(calls[0].prepared);
        assert_eq!(calls[0].positional(), [&Value::Int32(Some(1))]);
        assert_eq!(calls[0].named("b"), Some(&Value::Varchar(Some("x".into()))));
        assert!(matches!(calls[0].bindings[0], Binding::Index(0, ..)));
    }

    #[tokio::test]
    async fn transaction_statements() {
        init_logs();
        let mut connection = MockConnection::new();
        let mut status = connection
            .begin(keel_core::TransactionOptions {
                timeout: std::time::Duration::from_secs(5),
            })
            .await
            .unwrap();
        connection.commit(&mut status).await.unwrap();
        assert!(status.is_completed());
        assert!(connection.commit(&mut status).await.is_err());
        connection.rollback(&mut status).await.unwrap();
        assert_eq!(connection.log().statements(), ["BEGIN;", "COMMIT;"]);
        assert_eq!(<MockDriver as Driver>::NAME, "mock");
    }

    #[test]
    fn clear_prepared_bindings() {
        let mut prepared = prepare_blocking("SELECT ?;");
        prepared.bind(1_i64).unwrap().bind(2_i64).unwrap();
        assert_eq!(prepared.bindings().len(), 2);
        prepared.clear_bindings().unwrap();
        assert!(prepared.bindings().is_empty());
        prepared.bind(3_i64).unwrap();
        assert_eq!(
            prepared.bindings(),
            &[Binding::Index(0, Value::Int64(Some(3)))]
        );
        assert_eq!(prepared.to_string(), "SELECT ?;");
    }

    fn prepare_blocking(sql: &str) -> keel_mock::MockPrepared {
        let runtime = tokio::runtime::Builder::new_current_thread().build().unwrap();
        let mut connection = MockConnection::new();
        match runtime.block_on(connection.prepare(sql.into())).unwrap() {
            Query::Prepared(prepared) => prepared,
            Query::Raw(..) => panic!("Expected a prepared query"),
        }
    }
}
