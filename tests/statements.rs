use std::sync::Arc;

use myrs::drivers::{ConnEvent, MemoryDriver, MemoryResponse};
use myrs::{
    ConnectOptions, ConnectSettings, CursorShape, DatabaseDriver, MyRsClient, MyRsError,
    RowPayload, Value,
};

fn test_settings() -> ConnectSettings {
    ConnectSettings::new("app", "secret", "localhost", "appdb")
}

#[tokio::test]
async fn test_create_executes_insert() {
    let memory_driver = Arc::new(MemoryDriver::new());
    let driver: Arc<dyn DatabaseDriver> = Arc::clone(&memory_driver) as Arc<dyn DatabaseDriver>;
    let mut client = MyRsClient::with_driver(test_settings(), driver);

    client
        .from_table("users")
        .set_field("name", "Alice")
        .set_field("age", 30)
        .create()
        .await
        .unwrap();

    // Verify the statement that reached the driver
    memory_driver.assert_last_statement(
        "INSERT INTO `users` (`name`, `age`) VALUES (%s, %s)",
        Some(&[Value::from("Alice"), Value::from(30)]),
    );
    memory_driver.assert_statement_count(1);

    // The client keeps the same record for introspection
    let (sql, params) = client.get_last_query_info();
    assert_eq!(sql, "INSERT INTO `users` (`name`, `age`) VALUES (%s, %s)");
    assert_eq!(params, Some(&[Value::from("Alice"), Value::from(30)][..]));
}

#[tokio::test]
async fn test_find_records_fetches_rows() {
    let memory_driver = Arc::new(
        MemoryDriver::new().with_response(
            MemoryResponse::new()
                .columns(&["id", "name"])
                .row(vec![Value::from(1), Value::from("Alice")])
                .row(vec![Value::from(2), Value::from("Bob")])
                .build(),
        ),
    );
    let driver: Arc<dyn DatabaseDriver> = Arc::clone(&memory_driver) as Arc<dyn DatabaseDriver>;
    let mut client = MyRsClient::with_driver(test_settings(), driver);

    let result = client
        .from_table("users")
        .where_gte("age", 18)
        .find_records()
        .await
        .unwrap();

    memory_driver.assert_last_statement(
        "SELECT * FROM `users` WHERE `age` >= %s",
        Some(&[Value::from(18)]),
    );

    assert_eq!(result.columns, vec!["id".to_string(), "name".to_string()]);
    assert_eq!(result.len(), 2);
    assert_eq!(result.rows[0][1], Value::from("Alice"));
    assert_eq!(result.rows[1][1], Value::from("Bob"));
}

#[tokio::test]
async fn test_find_records_mapped_keys_rows_by_column() {
    let memory_driver = Arc::new(
        MemoryDriver::new().with_response(
            MemoryResponse::new()
                .columns(&["id", "name"])
                .row(vec![Value::from(7), Value::from("Greta")])
                .build(),
        ),
    );
    let driver: Arc<dyn DatabaseDriver> = Arc::clone(&memory_driver) as Arc<dyn DatabaseDriver>;
    let mut client = MyRsClient::with_driver(test_settings(), driver);

    let records = client
        .from_table("users")
        .where_eq("id", 7)
        .find_records_mapped()
        .await
        .unwrap();

    // The mapped shape is requested from the driver, not faked afterwards.
    assert_eq!(
        memory_driver.last_statement().unwrap().shape,
        CursorShape::Mapped
    );

    assert_eq!(records.len(), 1);
    assert_eq!(records[0].get("name").unwrap(), &Value::from("Greta"));
    assert!(matches!(
        records[0].get("missing").unwrap_err(),
        MyRsError::ColumnNotFound(_)
    ));
}

#[tokio::test]
async fn test_count_returns_scalar() {
    let memory_driver = Arc::new(
        MemoryDriver::new().with_response(
            MemoryResponse::new()
                .columns(&["COUNT(*)"])
                .row(vec![Value::from(3)])
                .build(),
        ),
    );
    let driver: Arc<dyn DatabaseDriver> = Arc::clone(&memory_driver) as Arc<dyn DatabaseDriver>;
    let mut client = MyRsClient::with_driver(test_settings(), driver);

    let count = client
        .from_table("users")
        .where_eq("status", "active")
        .count()
        .await
        .unwrap();

    memory_driver.assert_last_statement(
        "SELECT COUNT(*) FROM `users` WHERE `status` = %s",
        Some(&[Value::from("active")]),
    );
    assert_eq!(count, 3);
}

#[tokio::test]
async fn test_count_parses_text_scalar() {
    let memory_driver = Arc::new(
        MemoryDriver::new().with_response(
            MemoryResponse::new()
                .columns(&["COUNT(*)"])
                .row(vec![Value::from("42")])
                .build(),
        ),
    );
    let driver: Arc<dyn DatabaseDriver> = Arc::clone(&memory_driver) as Arc<dyn DatabaseDriver>;
    let mut client = MyRsClient::with_driver(test_settings(), driver);

    let count = client.from_table("users").count().await.unwrap();
    assert_eq!(count, 42);
}

#[tokio::test]
async fn test_count_rejects_non_numeric_scalar() {
    let memory_driver = Arc::new(
        MemoryDriver::new().with_response(
            MemoryResponse::new()
                .columns(&["COUNT(*)"])
                .row(vec![Value::from("not a number")])
                .build(),
        ),
    );
    let driver: Arc<dyn DatabaseDriver> = Arc::clone(&memory_driver) as Arc<dyn DatabaseDriver>;
    let mut client = MyRsClient::with_driver(test_settings(), driver);

    let err = client.from_table("users").count().await.unwrap_err();
    assert!(matches!(err, MyRsError::Decode { .. }));
}

#[tokio::test]
async fn test_validation_failure_never_reaches_the_driver() {
    let memory_driver = Arc::new(MemoryDriver::new());
    let driver: Arc<dyn DatabaseDriver> = Arc::clone(&memory_driver) as Arc<dyn DatabaseDriver>;
    let mut client = MyRsClient::with_driver(test_settings(), driver);

    let err = client
        .from_table("users")
        .set_field("status", "banned")
        .update()
        .await
        .unwrap_err();

    assert!(matches!(err, MyRsError::Validation(_)));
    memory_driver.assert_statement_count(0);
    assert!(memory_driver.events().is_empty());
}

#[tokio::test]
async fn test_create_with_empty_batch_fails_before_the_driver() {
    let memory_driver = Arc::new(MemoryDriver::new());
    let driver: Arc<dyn DatabaseDriver> = Arc::clone(&memory_driver) as Arc<dyn DatabaseDriver>;
    let mut client = MyRsClient::with_driver(test_settings(), driver);

    let err = client
        .from_table("users")
        .set_field("name", "Alice")
        .add_rows(Vec::<RowPayload>::new())
        .create()
        .await
        .unwrap_err();

    assert!(matches!(err, MyRsError::Validation(_)));
    memory_driver.assert_statement_count(0);
}

#[tokio::test]
async fn test_each_statement_gets_its_own_connection() {
    let memory_driver = Arc::new(MemoryDriver::new());
    let driver: Arc<dyn DatabaseDriver> = Arc::clone(&memory_driver) as Arc<dyn DatabaseDriver>;
    let mut client = MyRsClient::with_driver(test_settings(), driver);

    client
        .from_table("users")
        .set_field("name", "Alice")
        .create()
        .await
        .unwrap();
    client
        .from_table("users")
        .set_field("name", "Bob")
        .create()
        .await
        .unwrap();

    let statements = memory_driver.statements();
    assert_eq!(statements[0].conn, 1);
    assert_eq!(statements[1].conn, 2);

    assert_eq!(
        memory_driver.events(),
        vec![
            ConnEvent::Connect {
                conn: 1,
                autocommit: true
            },
            ConnEvent::Close { conn: 1 },
            ConnEvent::Connect {
                conn: 2,
                autocommit: true
            },
            ConnEvent::Close { conn: 2 },
        ]
    );
}

#[tokio::test]
async fn test_raw_execute_fetches_select() {
    let memory_driver = Arc::new(
        MemoryDriver::new().with_response(
            MemoryResponse::new()
                .columns(&["total"])
                .row(vec![Value::from(99)])
                .build(),
        ),
    );
    let driver: Arc<dyn DatabaseDriver> = Arc::clone(&memory_driver) as Arc<dyn DatabaseDriver>;
    let mut client = MyRsClient::with_driver(test_settings(), driver);

    let rows = client
        .raw_execute(
            "SELECT SUM(total) AS total FROM orders WHERE region = %s",
            Some(&[Value::from("eu")]),
        )
        .await
        .unwrap()
        .expect("SELECT should fetch rows");

    assert_eq!(rows.rows[0][0], Value::from(99));
    memory_driver.assert_last_statement(
        "SELECT SUM(total) AS total FROM orders WHERE region = %s",
        Some(&[Value::from("eu")]),
    );
}

#[tokio::test]
async fn test_raw_execute_dml_returns_none() {
    let memory_driver = Arc::new(MemoryDriver::new());
    let driver: Arc<dyn DatabaseDriver> = Arc::clone(&memory_driver) as Arc<dyn DatabaseDriver>;
    let mut client = MyRsClient::with_driver(test_settings(), driver);

    let rows = client
        .raw_execute("TRUNCATE TABLE sessions", None)
        .await
        .unwrap();

    assert!(rows.is_none());
    memory_driver.assert_last_statement("TRUNCATE TABLE sessions", None);
}

#[tokio::test]
async fn test_statement_without_values_records_no_params() {
    let memory_driver = Arc::new(MemoryDriver::new());
    let driver: Arc<dyn DatabaseDriver> = Arc::clone(&memory_driver) as Arc<dyn DatabaseDriver>;
    let mut client = MyRsClient::with_driver(test_settings(), driver);

    client.from_table("users").find_records().await.unwrap();

    memory_driver.assert_last_statement("SELECT * FROM `users`", None);
    assert_eq!(client.get_last_query(), "SELECT * FROM `users`");
    assert!(client.get_last_parameters().is_none());
}

#[tokio::test]
async fn test_execute_error_still_closes_the_connection() {
    let memory_driver = Arc::new(MemoryDriver::new());
    let driver: Arc<dyn DatabaseDriver> = Arc::clone(&memory_driver) as Arc<dyn DatabaseDriver>;
    let mut client = MyRsClient::with_driver(test_settings(), driver);

    memory_driver.fail_next_execute("duplicate key");
    let err = client
        .from_table("users")
        .set_field("name", "Alice")
        .create()
        .await
        .unwrap_err();

    assert!(matches!(err, MyRsError::QueryFailed(_)));
    assert_eq!(
        memory_driver.events(),
        vec![
            ConnEvent::Connect {
                conn: 1,
                autocommit: true
            },
            ConnEvent::Close { conn: 1 },
        ]
    );

    // The failed statement is still recorded for introspection.
    assert_eq!(
        client.get_last_query(),
        "INSERT INTO `users` (`name`) VALUES (%s)"
    );
}

#[tokio::test]
async fn test_connect_error_surfaces() {
    let memory_driver = Arc::new(MemoryDriver::new());
    let driver: Arc<dyn DatabaseDriver> = Arc::clone(&memory_driver) as Arc<dyn DatabaseDriver>;
    let mut client = MyRsClient::with_driver(test_settings(), driver);

    memory_driver.fail_next_connect("host unreachable");
    let err = client.from_table("users").find_records().await.unwrap_err();

    assert!(matches!(err, MyRsError::ConnectionFailed(_)));
    memory_driver.assert_statement_count(0);

    // Recorded before the dial, so the statement that never ran is visible.
    assert_eq!(client.get_last_query(), "SELECT * FROM `users`");
}

#[tokio::test]
async fn test_consumed_builder_leaves_no_residue() {
    let memory_driver = Arc::new(MemoryDriver::new());
    let driver: Arc<dyn DatabaseDriver> = Arc::clone(&memory_driver) as Arc<dyn DatabaseDriver>;
    let mut client = MyRsClient::with_driver(test_settings(), driver);

    client
        .from_table("users")
        .where_eq("id", 1)
        .order_by_desc(["id"])
        .limit(1)
        .find_records()
        .await
        .unwrap();

    // The next statement starts from scratch; nothing carries over.
    client.from_table("sessions").find_records().await.unwrap();

    memory_driver.assert_last_statement("SELECT * FROM `sessions`", None);
}

#[tokio::test]
async fn test_client_resolves_driver_from_registry() {
    use myrs::DriverRegistry;

    let memory_driver = Arc::new(MemoryDriver::new());
    let mut registry = DriverRegistry::new();
    registry.register(Arc::clone(&memory_driver) as Arc<dyn DatabaseDriver>);

    let mut client =
        MyRsClient::new(test_settings().with_driver("memory"), &registry).unwrap();
    client.from_table("users").find_records().await.unwrap();
    memory_driver.assert_statement_count(1);

    let err = MyRsClient::new(test_settings().with_driver("mysqlclient"), &registry).unwrap_err();
    assert!(matches!(err, MyRsError::DriverUnavailable(_)));
}

// The engine carries autocommit on the connect options and never toggles
// a live connection; hosts dialing the driver directly can.
#[tokio::test]
async fn test_raw_connection_toggles_autocommit() {
    let memory_driver = Arc::new(MemoryDriver::new());
    let options = ConnectOptions {
        user: "app".into(),
        passwd: "secret".into(),
        host: "localhost".into(),
        db: "appdb".into(),
        charset: "utf8mb4".into(),
        autocommit: false,
    };

    let mut conn = memory_driver.connect(&options).await.unwrap();
    conn.set_autocommit(true).await.unwrap();
    conn.close().await.unwrap();

    assert_eq!(
        memory_driver.events(),
        vec![
            ConnEvent::Connect {
                conn: 1,
                autocommit: false
            },
            ConnEvent::Autocommit {
                conn: 1,
                autocommit: true
            },
            ConnEvent::Close { conn: 1 },
        ]
    );
}
