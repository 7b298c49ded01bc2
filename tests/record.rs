mod common;

#[cfg(test)]
mod tests {
    use crate::common::{Audit, Customer, ORDER_COLUMNS, Order, init_logs, order_row};
    use keel::{
        Dialect, KeelError, Record, RecordDescriptor, Registry, RowLabeled, RowMap, Shape, Value,
        error_kind,
    };
    use rust_decimal::Decimal;

    #[derive(Default, Record)]
    struct LineItem {
        #[keel(primary_key)]
        id: i32,
        #[keel(name = "qty")]
        quantity: u16,
    }

    #[derive(Default, Record)]
    #[keel(name = "Ledger")]
    struct TwoKeys {
        #[keel(primary_key)]
        a: i32,
        #[keel(primary_key)]
        b: i32,
    }

    #[derive(Default, Record)]
    struct NoKey {
        value: String,
    }

    fn labeled(labels: &[&str], values: Vec<Value>) -> RowLabeled {
        labels
            .iter()
            .map(|v| v.to_string())
            .zip(values)
            .collect()
    }

    #[test]
    fn derived_metadata() {
        init_logs();
        assert_eq!(Order::shape_name(), "Order");
        assert_eq!(Order::table_name(), "orders");
        assert_eq!(Order::schema_name(), "");
        assert!(Order::is_record());
        assert!(!Audit::is_record());
        assert_eq!(
            Order::fields().iter().map(|f| f.name).collect::<Vec<_>>(),
            ORDER_COLUMNS
        );
        assert_eq!(
            Order::parent_fields().iter().map(|f| f.name).collect::<Vec<_>>(),
            ["created_by", "version"]
        );
        let amount = &Order::fields()[2];
        assert!(amount.nullable);
        assert_eq!(amount.value, Value::Decimal(None));
        assert!(Order::fields()[0].primary_key);
        assert_eq!(Customer::schema_name(), "crm");
        assert_eq!(LineItem::table_name(), "line_item");
        assert_eq!(LineItem::fields()[1].name, "qty");
        assert_eq!(TwoKeys::shape_name(), "Ledger");
    }

    #[test]
    fn materialize_rows() {
        init_logs();
        let mut values = order_row(3, "ann", "open");
        values.push(Value::Varchar(Some("ops".into())));
        let mut labels = ORDER_COLUMNS.to_vec();
        labels.push("created_by");
        let order = Order::from_row(&labeled(&labels, values)).unwrap();
        assert_eq!(
            order,
            Order {
                id: 3,
                customer: "ann".into(),
                amount: Some(Decimal::new(300, 1)),
                status: "open".into(),
                customer_id: None,
                audit: Audit {
                    created_by: Some("ops".into()),
                    version: 0,
                },
            }
        );
        assert_eq!(order.primary_key_value(), Value::Int64(Some(3)));
        assert_eq!(
            order.field_value("created_by"),
            Some(Value::Varchar(Some("ops".into())))
        );
        assert_eq!(order.field_value("customer_id"), Some(Value::Int64(None)));
        assert_eq!(order.field_value("colour"), None);

        let partial = Order::from_row(&labeled(&["id"], vec![Value::Int32(Some(9))])).unwrap();
        assert_eq!(partial.id, 9);
        assert_eq!(partial.customer, "");

        let error = Order::from_row(&labeled(
            &["id"],
            vec![Value::Varchar(Some("nine".into()))],
        ))
        .unwrap_err();
        assert!(format!("{:#}", error).contains("While decoding column `id` of `Order`"));

        let item = LineItem::from_row(&labeled(&["qty"], vec![Value::Int64(Some(4))])).unwrap();
        assert_eq!(item.quantity, 4);
        assert_eq!(item.field_value("qty"), Some(Value::UInt16(Some(4))));
    }

    #[test]
    fn key_value_shape() {
        let row = labeled(&["b", "a"], vec![Value::Int32(Some(1)), Value::Null]);
        let map = RowMap::from_row(&row).unwrap();
        assert_eq!(map.keys().collect::<Vec<_>>(), ["a", "b"]);
        assert!(RowMap::is_dynamic());
        assert_eq!(map.field_value("b"), Some(Value::Int32(Some(1))));
    }

    #[test]
    fn descriptors() {
        init_logs();
        let descriptor = RecordDescriptor::of::<Order>().unwrap();
        assert_eq!(descriptor.fields().len(), 7);
        assert_eq!(descriptor.primary_key().name, "id");
        assert_eq!(descriptor.entity_name(), "Order");
        assert_eq!(descriptor.table().name, "orders");
        assert!(descriptor.field("version").is_some());
        let error = descriptor.require_field("colour").unwrap_err();
        assert!(matches!(error_kind(&error), Some(KeelError::Schema(..))));

        let registry = Registry::new();
        let error = registry.describe::<TwoKeys>().unwrap_err();
        assert!(matches!(error_kind(&error), Some(KeelError::Schema(..))));
        assert!(format!("{:#}", error).contains("a, b"));
        let error = registry.describe::<NoKey>().unwrap_err();
        assert!(matches!(error_kind(&error), Some(KeelError::Schema(..))));
    }

    #[test]
    fn registry() {
        init_logs();
        let registry = Registry::new();
        assert!(registry.find_entity("Order").is_none());
        registry.register::<Order>().unwrap();
        let first = registry.describe::<Order>().unwrap();
        let second = registry.describe::<Order>().unwrap();
        assert!(std::sync::Arc::ptr_eq(&first, &second));
        assert_eq!(
            registry.find_entity("Order").map(|d| d.table().name.clone()),
            Some("orders".into())
        );

        registry
            .register_statement("by_status", Dialect::Native, "SELECT * FROM orders WHERE status = :status")
            .unwrap();
        assert_eq!(
            registry.statement("by_status").map(|v| v.dialect),
            Some(Dialect::Native)
        );
        let error = registry
            .register_statement("nested", Dialect::Named, "by_status")
            .unwrap_err();
        assert!(matches!(error_kind(&error), Some(KeelError::Validation(..))));
        assert!(registry.register_statement(" ", Dialect::Native, "SELECT 1").is_err());
        assert!(registry.register_statement("empty", Dialect::Native, "").is_err());

        registry.clear();
        assert!(registry.find_entity("Order").is_none());
        assert!(registry.statement("by_status").is_none());
    }
}
