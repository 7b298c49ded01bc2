mod common;

#[cfg(test)]
mod tests {
    use crate::common::{ORDER_COLUMNS, Order, init_logs, order_row, session};
    use keel::{
        Dialect, KeelError, QueryType, RowMap, RowTransform, Session, Shape, Value, error_kind,
        params,
    };
    use keel_mock::{MockConnection, affected, rows, scalar};
    use rust_decimal::Decimal;

    #[derive(Debug, Shape)]
    struct Totals {
        customer: String,
        total: Option<Decimal>,
    }

    #[tokio::test]
    async fn portable_statements() {
        init_logs();
        let mut connection = MockConnection::new();
        connection.respond(rows(&ORDER_COLUMNS, [order_row(1, "ann", "open")]));
        let log = connection.log();
        let mut session = session(connection);

        let statement = session
            .portable(
                "FROM Order o WHERE o.status = :status",
                params! { "status" => "open", "unused" => 1 },
            )
            .unwrap();
        assert_eq!(statement.dialect(), Dialect::Portable);
        assert_eq!(
            statement.sql(),
            "SELECT o.* FROM \"orders\" o WHERE o.status = :status"
        );
        assert!(statement.is_select().unwrap());
        let orders = session.list::<Order>(&statement).await.unwrap();
        assert_eq!(orders[0].customer, "ann");
        assert_eq!(
            log.calls()[0].named("status"),
            Some(&Value::Varchar(Some("open".into())))
        );

        let statement = session
            .portable("SELECT c.name FROM Customer c WHERE c.id = :id", ())
            .unwrap();
        assert_eq!(
            statement.sql(),
            "SELECT c.name FROM \"crm\".\"customers\" c WHERE c.id = :id"
        );
        let statement = session.portable("FROM Order WHERE status = 'Order'", ()).unwrap();
        assert_eq!(
            statement.sql(),
            "SELECT * FROM \"orders\" WHERE status = 'Order'"
        );

        let error = session.portable("FROM Invoice i", ()).unwrap_err();
        assert!(matches!(error_kind(&error), Some(KeelError::Schema(..))));
        let error = session.portable("  ", ()).unwrap_err();
        assert!(matches!(error_kind(&error), Some(KeelError::Validation(..))));
    }

    #[tokio::test]
    async fn native_projection() {
        init_logs();
        let mut connection = MockConnection::new();
        connection.respond(rows(
            &["customer", "total", "extra"],
            [
                vec!["ann".into(), Value::Float64(Some(12.5)), Value::Int32(Some(1))],
                vec!["bob".into(), Value::Null, Value::Int32(Some(1))],
            ],
        ));
        let mut session = session(connection);
        let statement = session
            .native::<Totals>(
                "SELECT customer, SUM(amount) AS total, 1 AS extra FROM orders GROUP BY customer",
                (),
            )
            .unwrap();
        let RowTransform::Columns(mapping) = statement.transform() else {
            panic!("Projections are mapped by column");
        };
        assert_eq!(mapping.names().collect::<Vec<_>>(), ["customer", "total"]);
        let error = statement.is_select().unwrap_err();
        assert!(matches!(
            error_kind(&error),
            Some(KeelError::UnsupportedQuery(..))
        ));

        let fetched = session.fetch(&statement).await.unwrap();
        assert_eq!(fetched[0].names(), ["customer", "total"]);
        assert_eq!(fetched[0].values()[1], Value::Decimal(Some(Decimal::new(125, 1))));
        assert_eq!(fetched[1].values()[1], Value::Decimal(None));

        let mut connection = MockConnection::new();
        connection.respond(rows(
            &["customer", "total"],
            [vec!["ann".into(), Value::Float64(Some(3.0))]],
        ));
        let mut session = crate::common::session(connection);
        let totals = session.list::<Totals>(&statement).await.unwrap();
        assert_eq!(totals[0].customer, "ann");
        assert_eq!(totals[0].total, Some(Decimal::new(3, 0)));
    }

    #[tokio::test]
    async fn native_entities_and_maps() {
        init_logs();
        let mut connection = MockConnection::new();
        connection
            .respond(rows(&ORDER_COLUMNS, [order_row(2, "bob", "held")]))
            .respond(rows(&["n", "label"], [vec![Value::Int64(Some(4)), "x".into()]]));
        let mut session = session(connection);
        let statement = session
            .native::<Order>("SELECT * FROM orders WHERE id = ?", vec![Value::Int64(Some(2))])
            .unwrap();
        assert_eq!(*statement.transform(), RowTransform::Entity);
        let order = session.unique::<Order>(&statement).await.unwrap();
        assert_eq!(order.map(|v| v.status), Some("held".to_string()));

        let statement = session.native::<RowMap>("SELECT n, label FROM t", ()).unwrap();
        let maps = session.list::<RowMap>(&statement).await.unwrap();
        assert_eq!(maps[0].get("n"), Some(&Value::Int64(Some(4))));
    }

    #[tokio::test]
    async fn named_statements() {
        init_logs();
        let mut connection = MockConnection::new();
        connection.respond(rows(&ORDER_COLUMNS, [order_row(3, "cy", "open")]));
        let log = connection.log();
        let mut session = session(connection);
        session
            .registry()
            .register_statement(
                "open_orders",
                Dialect::Native,
                "SELECT * FROM orders WHERE status = :status",
            )
            .unwrap()
            .register_statement("all_orders", Dialect::Portable, "FROM Order o ORDER BY o.id")
            .unwrap();

        let statement = session
            .named::<Order>("open_orders", params! { "status" => "open" })
            .unwrap();
        assert_eq!(statement.dialect(), Dialect::Native);
        let orders = session.list::<Order>(&statement).await.unwrap();
        assert_eq!(orders[0].id, 3);
        assert_eq!(log.statements(), ["SELECT * FROM orders WHERE status = :status"]);

        let statement = session.named::<Order>("all_orders", ()).unwrap();
        assert_eq!(statement.dialect(), Dialect::Portable);
        assert_eq!(statement.sql(), "SELECT o.* FROM \"orders\" o ORDER BY o.id");

        let error = session.named::<Order>("missing", ()).unwrap_err();
        assert!(matches!(error_kind(&error), Some(KeelError::Validation(..))));
    }

    #[tokio::test]
    async fn strict_parameters() {
        init_logs();
        let registry = std::sync::Arc::new(keel::Registry::new());
        let session = Session::with_config(
            MockConnection::new(),
            registry,
            keel::Config::default().strict_parameters(true),
        );
        let error = session
            .statement(
                &QueryType::native(),
                "SELECT * FROM orders WHERE id = :id",
                params! { "id" => 1, "status" => "open" },
            )
            .unwrap_err();
        assert!(matches!(error_kind(&error), Some(KeelError::Validation(..))));
    }

    #[tokio::test]
    async fn paginate_native() {
        init_logs();
        let connection = MockConnection::with_handler(|call| {
            Ok(if call.sql.starts_with("SELECT COUNT(*)") {
                scalar("count", Value::Decimal(Some(Decimal::new(12, 0))))
            } else {
                rows(&["id"], (1..=2).map(|i: i64| vec![Value::Int64(Some(i))]))
            })
        });
        let log = connection.log();
        let mut session = session(connection);
        let page = session
            .paginate::<RowMap>(
                &QueryType::native(),
                "SELECT id FROM orders WHERE status = :status ORDER BY id",
                params! { "status" => "open" },
                0,
                10,
            )
            .await
            .unwrap();
        assert_eq!(page.page(), 1);
        assert_eq!(page.total(), 12);
        assert_eq!(page.size(), 2);
        assert_eq!(
            log.statements(),
            [
                "SELECT COUNT(*) FROM orders WHERE status = :status;",
                "SELECT id FROM orders WHERE status = :status ORDER BY id\nLIMIT 10 OFFSET 0;",
            ]
        );
        let calls = log.calls();
        assert_eq!(calls[0].named("status"), calls[1].named("status"));

        let error = session
            .paginate::<RowMap>(&QueryType::native(), "SELECT id FROM orders", (), 1, 0)
            .await
            .unwrap_err();
        assert!(matches!(error_kind(&error), Some(KeelError::Validation(..))));

        let page = session
            .page_all::<RowMap>(&QueryType::native(), "SELECT id FROM orders", ())
            .await
            .unwrap();
        assert_eq!((page.page(), page.total(), page.size()), (1, 12, 2));
    }

    #[tokio::test]
    async fn count_without_number() {
        init_logs();
        let mut connection = MockConnection::new();
        connection.respond(scalar("count", "many")).respond(Vec::new());
        let mut session = session(connection);
        let statement = session.native::<RowMap>("SELECT COUNT(*) FROM orders", ()).unwrap();
        assert_eq!(session.count(&statement).await.unwrap(), 0);
        assert_eq!(session.count(&statement).await.unwrap(), 0);
    }

    #[tokio::test]
    async fn transaction_committed() {
        init_logs();
        let mut connection = MockConnection::new();
        connection.respond(Vec::new()).respond(affected(1));
        let log = connection.log();
        let mut session = session(connection);
        let deleted = session
            .run_in_transaction(async |session: &mut Session<MockConnection>| {
                session.dao::<Order>()?.delete_by_id(1_i64).await
            })
            .await
            .unwrap();
        assert_eq!(deleted, 1);
        assert_eq!(
            log.statements(),
            ["BEGIN;", "DELETE FROM \"orders\"\nWHERE \"id\" = ?;", "COMMIT;"]
        );
        assert!(session.transaction().is_some_and(|v| v.is_completed()));
    }

    #[tokio::test]
    async fn transaction_rolled_back() {
        init_logs();
        let mut connection = MockConnection::new();
        connection.respond(Vec::new()).fail("constraint violated");
        let log = connection.log();
        let mut session = session(connection);
        let error = session
            .run_in_transaction(async |session: &mut Session<MockConnection>| {
                session.dao::<Order>()?.delete_by_id(1_i64).await
            })
            .await
            .unwrap_err();
        assert!(format!("{:#}", error).contains("constraint violated"));
        assert_eq!(
            log.statements(),
            ["BEGIN;", "DELETE FROM \"orders\"\nWHERE \"id\" = ?;", "ROLLBACK;"]
        );
    }

    #[tokio::test]
    async fn transaction_failed_commit() {
        init_logs();
        let mut connection = MockConnection::new();
        connection
            .respond(Vec::new())
            .respond(affected(1))
            .fail("serialization failure");
        let log = connection.log();
        let mut session = session(connection);
        let error = session
            .run_in_transaction(async |session: &mut Session<MockConnection>| {
                session.dao::<Order>()?.delete_by_id(1_i64).await
            })
            .await
            .unwrap_err();
        assert!(format!("{:#}", error).contains("serialization failure"));
        assert!(matches!(
            error_kind(&error),
            Some(KeelError::Execution { .. })
        ));
        assert_eq!(
            log.statements(),
            [
                "BEGIN;",
                "DELETE FROM \"orders\"\nWHERE \"id\" = ?;",
                "COMMIT;",
                "ROLLBACK;"
            ]
        );
        assert!(session.transaction().is_some_and(|v| v.is_completed()));
        session.rollback().await.unwrap();
        assert_eq!(log.len(), 4);
    }

    #[tokio::test]
    async fn commit_failure_keeps_transaction_open() {
        init_logs();
        let mut connection = MockConnection::new();
        connection.respond(Vec::new()).fail("connection lost");
        let log = connection.log();
        let mut session = session(connection);
        session.begin_transaction().await.unwrap();
        assert!(session.commit().await.is_err());
        assert!(session.transaction().is_some_and(|v| !v.is_completed()));
        session.rollback().await.unwrap();
        assert_eq!(log.statements(), ["BEGIN;", "COMMIT;", "ROLLBACK;"]);
    }

    #[tokio::test]
    async fn transaction_state() {
        init_logs();
        let connection = MockConnection::new();
        let log = connection.log();
        let mut session = session(connection);
        let error = session.commit().await.unwrap_err();
        assert!(matches!(error_kind(&error), Some(KeelError::Validation(..))));
        session.rollback().await.unwrap();
        assert!(log.is_empty());

        session.begin_transaction().await.unwrap();
        let error = session.begin_transaction().await.unwrap_err();
        assert!(matches!(error_kind(&error), Some(KeelError::Validation(..))));
        session.rollback().await.unwrap();
        session.rollback().await.unwrap();
        assert!(session.commit().await.is_err());
        assert_eq!(log.statements(), ["BEGIN;", "ROLLBACK;"]);
        session.begin_transaction().await.unwrap();
        session.commit().await.unwrap();
        assert_eq!(log.len(), 4);
    }
}
