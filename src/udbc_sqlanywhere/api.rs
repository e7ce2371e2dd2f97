//! The subset of the SQL Anywhere native client library the adapter calls.
//!
//! Every function is synchronous and blocking, mirroring the C API: calls
//! report success as `bool` (or `Option` for calls that allocate a handle)
//! and leave the details in the library's error state, which is read back
//! through [`SqlAnywhereApi::error_code`] and friends.

/// Typed value as exchanged with the native library.
#[derive(Debug, Clone, PartialEq)]
pub enum DataValue {
    Null,
    Binary(Vec<u8>),
    String(String),
    Double(f64),
    Val64(i64),
    UVal64(u64),
    Val32(i32),
    UVal32(u32),
    Val16(i16),
    UVal16(u16),
    Val8(i8),
    UVal8(u8),
}

/// Per-session options pushed to the library.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionOption {
    /// Surface errors as host warnings in addition to the error state.
    VerboseErrors(bool),
    AutoCommit(bool),
    /// Exact, non-approximated row counts.
    RowCounts(bool),
}

impl SessionOption {
    pub fn name(&self) -> &'static str {
        match self {
            SessionOption::VerboseErrors(_) => "verbose_errors",
            SessionOption::AutoCommit(_) => "auto_commit",
            SessionOption::RowCounts(_) => "row_counts",
        }
    }

    pub fn enabled(&self) -> bool {
        match *self {
            SessionOption::VerboseErrors(on)
            | SessionOption::AutoCommit(on)
            | SessionOption::RowCounts(on) => on,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransactionMode {
    AutoCommit,
    Manual,
}

impl TransactionMode {
    pub fn option(self) -> SessionOption {
        SessionOption::AutoCommit(self == TransactionMode::AutoCommit)
    }
}

/// Native client binding.
///
/// `Connection` and `Statement` are the library's resource handles. The
/// adapter owns them and hands them back for release through
/// [`disconnect`](SqlAnywhereApi::disconnect) and
/// [`free_stmt`](SqlAnywhereApi::free_stmt).
pub trait SqlAnywhereApi: Send + Sync + 'static {
    type Connection: Send + 'static;
    type Statement: Send + 'static;

    fn connect(&self, dsn: &str) -> Option<Self::Connection>;
    fn pconnect(&self, dsn: &str) -> Option<Self::Connection>;
    fn disconnect(&self, conn: &mut Self::Connection);

    fn set_option(&self, conn: &mut Self::Connection, option: SessionOption) -> bool;
    fn commit(&self, conn: &mut Self::Connection) -> bool;
    fn rollback(&self, conn: &mut Self::Connection) -> bool;

    /// Last error code, for the session or (with `None`) the library globally.
    fn error_code(&self, conn: Option<&Self::Connection>) -> i32;
    fn error_message(&self, conn: Option<&Self::Connection>) -> String;
    fn sqlstate(&self, conn: Option<&Self::Connection>) -> String;

    fn escape_string(&self, conn: &Self::Connection, input: &str) -> String;
    fn insert_id(&self, conn: &Self::Connection) -> u64;

    fn prepare(&self, conn: &mut Self::Connection, sql: &str) -> Option<Self::Statement>;
    /// `index` is zero-based.
    fn bind_param(&self, stmt: &mut Self::Statement, index: u32, value: &DataValue) -> bool;
    fn execute(&self, conn: &mut Self::Connection, stmt: &mut Self::Statement) -> bool;
    fn affected_rows(&self, stmt: &Self::Statement) -> i64;
    fn num_cols(&self, stmt: &Self::Statement) -> u32;
    fn column_name(&self, stmt: &Self::Statement, index: u32) -> Option<String>;
    fn fetch_next(&self, stmt: &mut Self::Statement) -> bool;
    fn get_column(&self, stmt: &Self::Statement, index: u32) -> Option<DataValue>;
    fn stmt_error_code(&self, stmt: &Self::Statement) -> i32;
    fn stmt_error_message(&self, stmt: &Self::Statement) -> String;
    fn free_stmt(&self, stmt: Self::Statement);
}
