use crate::error::DriverError;
use crate::udbc_sqlanywhere::api::SqlAnywhereApi;

const NO_MESSAGE: &str =
    "SQL Anywhere error occurred but no error message was retrieved from driver.";

/// 读取原生库当前的错误状态
///
/// Statement errors take precedence over session errors, which take
/// precedence over the library's global error state.
pub fn from_api<A: SqlAnywhereApi>(
    api: &A,
    conn: Option<&A::Connection>,
    stmt: Option<&A::Statement>,
) -> DriverError {
    let sqlstate = api.sqlstate(conn);

    let mut code = 0;
    let mut message = String::new();

    if let Some(stmt) = stmt {
        code = api.stmt_error_code(stmt);
        message = api.stmt_error_message(stmt);
    }

    if code == 0 && message.is_empty() {
        if let Some(conn) = conn {
            code = api.error_code(Some(conn));
            message = api.error_message(Some(conn));
        }
    }

    if code == 0 && message.is_empty() {
        code = api.error_code(None);
        message = api.error_message(None);
    }

    if message.is_empty() {
        message = NO_MESSAGE.to_string();
    }

    DriverError {
        code,
        sqlstate,
        message,
    }
}
