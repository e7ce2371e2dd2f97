mod support;

use std::sync::Arc;

use sqlany_udbc::error::DbError;
use sqlany_udbc::udbc::connection::Connection;
use sqlany_udbc::udbc::value::Value;
use sqlany_udbc::udbc_sqlanywhere::api::DataValue;
use sqlany_udbc::udbc_sqlanywhere::connection::SqlAnywhereConnection;
use support::mock_api::{MockApi, MockResult};

async fn connect(api: &MockApi) -> SqlAnywhereConnection<MockApi> {
    SqlAnywhereConnection::connect(Arc::new(api.clone()), "DBN=demo", false)
        .await
        .expect("connect")
}

#[tokio::test]
async fn test_without_name_uses_session_identity() {
    let api = MockApi::new();
    api.state().insert_id = 42;
    let conn = connect(&api).await;

    assert_eq!(conn.last_insert_id(None).await.unwrap(), Value::I64(42));
    assert!(api.state().prepared.is_empty());
}

#[tokio::test]
async fn test_with_name_reads_sequence() {
    let api = MockApi::new().with_result(
        "SELECT order_seq.CURRVAL",
        MockResult::rows(&["order_seq.CURRVAL"], vec![vec![DataValue::Val64(7)]]),
    );
    api.state().insert_id = 42;
    let conn = connect(&api).await;

    assert_eq!(
        conn.last_insert_id(Some("order_seq")).await.unwrap(),
        Value::I64(7)
    );
    let s = api.state();
    assert_eq!(s.prepared, vec!["SELECT order_seq.CURRVAL".to_string()]);
    assert_eq!(s.executed.len(), 1);
}

#[tokio::test]
async fn test_sequence_without_value() {
    let api = MockApi::new();
    let conn = connect(&api).await;

    let err = conn.last_insert_id(Some("dba.empty_seq")).await.unwrap_err();
    assert!(matches!(err, DbError::Query(_)));
    assert_eq!(api.state().prepared, vec!["SELECT dba.empty_seq.CURRVAL".to_string()]);
}

#[tokio::test]
async fn test_rejects_non_identifier_names() {
    let api = MockApi::new();
    let conn = connect(&api).await;

    let err = conn
        .last_insert_id(Some("seq FROM dummy; DROP TABLE t"))
        .await
        .unwrap_err();
    assert!(matches!(err, DbError::Query(_)));
    assert!(api.state().prepared.is_empty());
}
