#[cfg(test)]
mod tests {
    use indoc::indoc;
    use keel_core::{
        BinaryOpType, Condition, Dialect, FieldDef, GenericSqlWriter, KeelError, PredicateSet,
        Projection,
        RecordDescriptor, RowTransform, SqlWriter, Statement, TableRef, Value, Window,
        error_kind,
    };
    use rust_decimal::Decimal;
    use std::{any::TypeId, sync::Arc};
    use time::macros::datetime;

    const WRITER: GenericSqlWriter = GenericSqlWriter;

    static ORDER_FIELDS: [FieldDef; 5] = [
        FieldDef {
            name: "id",
            value: Value::Int64(None),
            nullable: false,
            primary_key: true,
        },
        FieldDef {
            name: "customer",
            value: Value::Varchar(None),
            nullable: false,
            primary_key: false,
        },
        FieldDef {
            name: "amount",
            value: Value::Decimal(None),
            nullable: true,
            primary_key: false,
        },
        FieldDef {
            name: "status",
            value: Value::Varchar(None),
            nullable: false,
            primary_key: false,
        },
        FieldDef {
            name: "customer_id",
            value: Value::Int64(None),
            nullable: true,
            primary_key: false,
        },
    ];

    static CUSTOMER_FIELDS: [FieldDef; 3] = [
        FieldDef {
            name: "id",
            value: Value::Int64(None),
            nullable: false,
            primary_key: true,
        },
        FieldDef {
            name: "name",
            value: Value::Varchar(None),
            nullable: false,
            primary_key: false,
        },
        FieldDef {
            name: "country",
            value: Value::Varchar(None),
            nullable: true,
            primary_key: false,
        },
    ];

    struct OrderMarker;
    struct CustomerMarker;

    fn orders() -> Arc<RecordDescriptor> {
        Arc::new(
            RecordDescriptor::new(
                TypeId::of::<OrderMarker>(),
                "Order",
                "Order",
                TableRef::new("orders"),
                ORDER_FIELDS.iter().collect(),
            )
            .unwrap(),
        )
    }

    fn customers() -> Arc<RecordDescriptor> {
        Arc::new(
            RecordDescriptor::new(
                TypeId::of::<CustomerMarker>(),
                "Customer",
                "Customer",
                TableRef::new("customers").with_schema("crm"),
                CUSTOMER_FIELDS.iter().collect(),
            )
            .unwrap(),
        )
    }

    #[test]
    fn descriptor_requires_one_key() {
        let error = RecordDescriptor::new(
            TypeId::of::<CustomerMarker>(),
            "Customer",
            "Customer",
            TableRef::new("customers"),
            CUSTOMER_FIELDS[1..].iter().collect(),
        )
        .unwrap_err();
        assert!(matches!(error_kind(&error), Some(KeelError::Schema(..))));
        let deduplicated = RecordDescriptor::new(
            TypeId::of::<CustomerMarker>(),
            "Customer",
            "Customer",
            TableRef::new("customers"),
            vec![&ORDER_FIELDS[0], &CUSTOMER_FIELDS[1], &ORDER_FIELDS[0]],
        )
        .unwrap();
        assert_eq!(deduplicated.fields().len(), 2);
        assert_eq!(deduplicated.primary_key().name, "id");
        let error = RecordDescriptor::new(
            TypeId::of::<CustomerMarker>(),
            "Customer",
            "Customer",
            TableRef::new(""),
            CUSTOMER_FIELDS.iter().collect(),
        )
        .unwrap_err();
        assert!(matches!(error_kind(&error), Some(KeelError::Schema(..))));
    }

    #[test]
    fn values() {
        let mut out = String::new();
        let mut context = Default::default();
        WRITER.write_value(&mut context, &mut out, &"it's".into());
        out.push(' ');
        WRITER.write_value(&mut context, &mut out, &Value::Boolean(Some(true)));
        out.push(' ');
        WRITER.write_value(&mut context, &mut out, &Value::Int32(None));
        out.push(' ');
        WRITER.write_value(&mut context, &mut out, &Value::Float64(Some(f64::INFINITY)));
        out.push(' ');
        WRITER.write_value(
            &mut context,
            &mut out,
            &Value::Blob(Some([0xCA, 0xFE].into())),
        );
        out.push(' ');
        WRITER.write_value(
            &mut context,
            &mut out,
            &Value::Timestamp(Some(datetime!(2024-02-29 13:05:09.25))),
        );
        out.push(' ');
        WRITER.write_value(
            &mut context,
            &mut out,
            &Value::TimestampWithTimezone(Some(datetime!(2024-02-29 13:05:09 +02:00))),
        );
        assert_eq!(
            out,
            "'it''s' true NULL CAST('inf' AS DOUBLE) '\\xCA\\xFE' '2024-02-29 13:05:09.25' '2024-02-29 11:05:09'"
        );
    }

    #[test]
    fn record_statements() {
        let orders = orders();
        let mut out = String::new();
        WRITER.write_select_all(&mut out, &customers());
        assert_eq!(out, "SELECT *\nFROM \"crm\".\"customers\";");

        let mut out = String::new();
        WRITER.write_select_by_key(&mut out, &orders);
        assert_eq!(
            out,
            indoc! {r#"
                SELECT *
                FROM "orders"
                WHERE "id" = ?;
            "#}
            .trim()
        );

        let mut out = String::new();
        WRITER.write_delete_by_key(&mut out, &orders);
        assert_eq!(out, "DELETE FROM \"orders\"\nWHERE \"id\" = ?;");

        let mut out = String::new();
        WRITER.write_insert(
            &mut out,
            &orders,
            &[
                ("id", Value::Int64(Some(1))),
                ("customer", "ann".into()),
                ("amount", Value::Decimal(None)),
            ],
            true,
        );
        assert_eq!(
            out,
            indoc! {r#"
                INSERT INTO "orders" ("id", "customer", "amount") VALUES
                (1, 'ann', NULL)
                ON CONFLICT ("id") DO UPDATE SET
                "customer" = EXCLUDED."customer",
                "amount" = EXCLUDED."amount";
            "#}
            .trim()
        );

        let mut out = String::new();
        WRITER.write_insert(&mut out, &orders, &[("id", Value::Int64(Some(1)))], true);
        assert_eq!(
            out,
            "INSERT INTO \"orders\" (\"id\") VALUES\n(1)\nON CONFLICT (\"id\") DO NOTHING;"
        );

        let mut out = String::new();
        WRITER.write_update_positional(&mut out, &orders, &["status", "amount"], &["customer", "id"]);
        assert_eq!(
            out,
            indoc! {r#"
                UPDATE "orders"
                SET "status" = ?, "amount" = ?
                WHERE "customer" = ? AND "id" = ?;
            "#}
            .trim()
        );
    }

    #[test]
    fn update_filter_is_not_qualified() {
        let orders = orders();
        let mut criteria = PredicateSet::new(orders.clone(), "t0");
        criteria.equals("customer", "ann").unwrap().is_null("amount").unwrap();
        let query = criteria.new_statement().unwrap();
        let mut out = String::new();
        WRITER.write_update(&mut out, &orders, &["status"], &query.filter);
        assert_eq!(
            out,
            indoc! {r#"
                UPDATE "orders"
                SET "status" = :status
                WHERE "customer" = 'ann' AND "amount" IS NULL;
            "#}
            .trim()
        );
    }

    #[test]
    fn criteria_select_and_count() {
        let mut criteria = PredicateSet::new(orders(), "t0");
        criteria
            .equals("status", "open")
            .unwrap()
            .equals("status", "")
            .unwrap()
            .like("customer", "ann")
            .unwrap()
            .greater_than("amount", Decimal::new(100, 0))
            .unwrap()
            .add_order("id", "desc")
            .unwrap()
            .add_order("customer", "sideways")
            .unwrap();
        let query = criteria.new_statement().unwrap();
        assert_eq!(
            query.to_sql(&WRITER, Projection::All),
            indoc! {r#"
                SELECT t0.*
                FROM "orders" t0
                WHERE t0."status" = 'open' AND t0."customer" LIKE '%ann%' AND t0."amount" > 100
                ORDER BY t0."id" DESC;
            "#}
            .trim()
        );
        assert_eq!(
            query.to_sql(&WRITER, Projection::Count),
            indoc! {r#"
                SELECT COUNT(*)
                FROM "orders" t0
                WHERE t0."status" = 'open' AND t0."customer" LIKE '%ann%' AND t0."amount" > 100;
            "#}
            .trim()
        );
    }

    #[test]
    fn blank_values_add_nothing() {
        let mut criteria = PredicateSet::new(orders(), "t0");
        criteria
            .equals("status", Value::Varchar(None))
            .unwrap()
            .like("customer", "")
            .unwrap()
            .between("amount", Decimal::ONE, Value::Decimal(None))
            .unwrap()
            .in_values("id", Vec::<i64>::new())
            .unwrap()
            .not_in("id", [None::<i64>, None])
            .unwrap()
            .or(&["customer", "status"], "")
            .unwrap();
        assert!(criteria.is_empty());
        assert_eq!(
            criteria.new_statement().unwrap().to_sql(&WRITER, Projection::All),
            "SELECT t0.*\nFROM \"orders\" t0;"
        );
    }

    #[test]
    fn unknown_field() {
        let mut criteria = PredicateSet::new(orders(), "t0");
        let error = criteria.equals("colour", "red").unwrap_err();
        assert!(matches!(error_kind(&error), Some(KeelError::Schema(..))));
        assert!(criteria.add_order("colour", "asc").is_err());
    }

    #[test]
    fn sets_and_ranges() {
        let mut criteria = PredicateSet::new(orders(), "t0");
        criteria
            .in_values("id", [1_i64, 2, 3])
            .unwrap()
            .not_in("status", ["void", "held"])
            .unwrap()
            .between("id", 1_i64, 5_i64)
            .unwrap()
            .or_like(&["customer", "status"], "an%")
            .unwrap();
        assert_eq!(
            criteria.new_statement().unwrap().to_sql(&WRITER, Projection::All),
            indoc! {r#"
                SELECT t0.*
                FROM "orders" t0
                WHERE t0."id" IN (1, 2, 3) AND t0."status" NOT IN ('void', 'held') AND t0."id" BETWEEN 1 AND 5 AND (t0."customer" LIKE 'an%' OR t0."status" LIKE 'an%');
            "#}
            .trim()
        );
    }

    #[test]
    fn alternatives() {
        let orders = orders();
        let mut criteria = PredicateSet::new(orders.clone(), "t0");
        criteria.is_not_null("customer").unwrap();
        let mut open = PredicateSet::new(orders.clone(), "t0");
        open.equals("status", "open").unwrap();
        let mut held = PredicateSet::new(orders.clone(), "t0");
        held.equals("status", "held")
            .unwrap()
            .less_than("amount", 10)
            .unwrap();
        criteria.add_or_group(open).unwrap().add_or_group(held).unwrap();
        assert_eq!(
            criteria.new_statement().unwrap().to_sql(&WRITER, Projection::All),
            indoc! {r#"
                SELECT t0.*
                FROM "orders" t0
                WHERE t0."customer" IS NOT NULL AND (t0."status" = 'open' OR t0."status" = 'held' AND t0."amount" < 10);
            "#}
            .trim()
        );
        let other = PredicateSet::new(customers(), "t0");
        let error = criteria.add_or_group(other).unwrap_err();
        assert!(matches!(error_kind(&error), Some(KeelError::Validation(..))));
    }

    #[test]
    fn empty_junctions() {
        let mut criteria = PredicateSet::new(orders(), "t0");
        criteria
            .add_condition(Condition::Any(vec![]))
            .unwrap()
            .add_condition(Condition::All(vec![Condition::Any(vec![])]))
            .unwrap();
        assert!(criteria.conditions().is_empty());
        assert_eq!(
            criteria.new_statement().unwrap().to_sql(&WRITER, Projection::All),
            "SELECT t0.*\nFROM \"orders\" t0;"
        );
        criteria
            .add_condition(Condition::Any(vec![
                Condition::All(vec![]),
                Condition::Compare("status", BinaryOpType::Equal, "open".into()),
            ]))
            .unwrap();
        assert_eq!(
            criteria.conditions(),
            [Condition::Any(vec![Condition::Compare(
                "status",
                BinaryOpType::Equal,
                "open".into()
            )])]
        );
        let error = criteria
            .add_condition(Condition::All(vec![Condition::IsNull("colour")]))
            .unwrap_err();
        assert!(matches!(error_kind(&error), Some(KeelError::Schema(..))));
    }

    #[test]
    fn links_and_sub_queries() {
        let mut customer = PredicateSet::new(customers(), "c");
        customer.equals("country", "IT").unwrap();
        let mut criteria = PredicateSet::new(orders(), "t0");
        criteria
            .equals("status", "open")
            .unwrap()
            .add_link_query("customer_id", customer.clone())
            .unwrap();
        assert_eq!(
            criteria.new_statement().unwrap().to_sql(&WRITER, Projection::All),
            indoc! {r#"
                SELECT t0.*
                FROM "orders" t0
                INNER JOIN "crm"."customers" customer_id ON t0."customer_id" = customer_id."id"
                WHERE t0."status" = 'open' AND customer_id."country" = 'IT';
            "#}
            .trim()
        );
        let error = criteria
            .add_link_query("customer_id", customer.clone())
            .unwrap_err();
        assert!(matches!(error_kind(&error), Some(KeelError::Validation(..))));

        let mut criteria = PredicateSet::new(orders(), "t0");
        let error = criteria
            .add_sub_query("customer_id", customer.clone())
            .unwrap_err();
        assert!(matches!(error_kind(&error), Some(KeelError::Validation(..))));
        customer.set_projection("id").unwrap();
        criteria.add_sub_query("customer_id", customer).unwrap();
        assert_eq!(
            criteria.new_statement().unwrap().to_sql(&WRITER, Projection::All),
            indoc! {r#"
                SELECT t0.*
                FROM "orders" t0
                WHERE t0."customer_id" IN (SELECT t0_customer_id."id" FROM "crm"."customers" t0_customer_id WHERE t0_customer_id."country" = 'IT');
            "#}
            .trim()
        );
    }

    #[test]
    fn group_by_and_window() {
        let mut criteria = PredicateSet::new(orders(), "t0");
        criteria
            .set_group_by("customer")
            .unwrap()
            .set_projection("customer")
            .unwrap()
            .set_order("id", "ASC")
            .unwrap();
        assert_eq!(
            criteria.new_statement().unwrap().to_sql(&WRITER, Projection::Count),
            indoc! {r#"
                SELECT COUNT(DISTINCT t0."customer")
                FROM "orders" t0;
            "#}
            .trim()
        );
        let mut statement = criteria.new_statement().unwrap().select_statement(&WRITER);
        assert_eq!(statement.dialect(), Dialect::Portable);
        assert_eq!(*statement.transform(), RowTransform::Entity);
        statement.set_window(Window::page(3, 20));
        assert_eq!(
            statement.executable_sql(&WRITER),
            indoc! {r#"
                SELECT t0."customer"
                FROM "orders" t0
                GROUP BY t0."customer"
                ORDER BY t0."id" ASC
                LIMIT 20 OFFSET 40;
            "#}
            .trim()
        );
    }

    #[test]
    fn native_window() {
        let mut statement = Statement::new(
            Dialect::Native,
            "SELECT * FROM orders;",
            "SELECT * FROM orders;".into(),
            RowTransform::Map,
        );
        assert_eq!(statement.executable_sql(&WRITER), "SELECT * FROM orders;");
        statement.set_window(Window { offset: 0, limit: 5 });
        assert_eq!(
            statement.executable_sql(&WRITER),
            "SELECT * FROM orders\nLIMIT 5 OFFSET 0;"
        );
    }
}
