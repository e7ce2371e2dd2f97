use std::collections::{HashMap, HashSet};
use std::sync::{Arc, Mutex, MutexGuard};

use sqlany_udbc::udbc_sqlanywhere::api::{DataValue, SessionOption, SqlAnywhereApi};

#[derive(Debug, Clone, Default)]
pub struct MockResult {
    pub columns: Vec<String>,
    pub rows: Vec<Vec<DataValue>>,
    pub affected: i64,
}

impl MockResult {
    pub fn affected(affected: i64) -> Self {
        Self {
            affected,
            ..Default::default()
        }
    }

    pub fn rows(columns: &[&str], rows: Vec<Vec<DataValue>>) -> Self {
        Self {
            columns: columns.iter().map(|c| c.to_string()).collect(),
            affected: rows.len() as i64,
            rows,
        }
    }
}

/// code, message, sqlstate
pub type ErrorState = (i32, String, String);

#[derive(Default)]
pub struct MockState {
    pub dsns: Vec<String>,
    pub connects: usize,
    pub pconnects: usize,
    pub disconnects: usize,
    pub options: HashMap<&'static str, bool>,
    pub option_calls: Vec<SessionOption>,
    pub fail_option: Option<SessionOption>,
    pub fail_commit: bool,
    /// Fail without recording any error state.
    pub silent_errors: bool,
    pub fail_rollback: bool,
    pub commits: usize,
    pub rollbacks: usize,
    pub session_error: ErrorState,
    pub global_error: ErrorState,
    pub insert_id: u64,
    pub prepared: Vec<String>,
    pub executed: Vec<(String, Vec<DataValue>)>,
    pub results: HashMap<String, MockResult>,
    pub fail_prepare: HashSet<String>,
    pub fail_execute: HashSet<String>,
    pub freed_stmts: usize,
    /// Release calls in the order the library saw them.
    pub events: Vec<&'static str>,
}

/// In-process stand-in for the native client library.
#[derive(Clone, Default)]
pub struct MockApi {
    state: Arc<Mutex<MockState>>,
}

impl MockApi {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> MutexGuard<'_, MockState> {
        self.state.lock().unwrap()
    }

    pub fn with_result(self, sql: &str, result: MockResult) -> Self {
        self.state().results.insert(sql.to_string(), result);
        self
    }

    pub fn auto_commit(&self) -> Option<bool> {
        self.state().options.get("auto_commit").copied()
    }
}

pub struct MockConn;

pub struct MockStmt {
    sql: String,
    params: Vec<DataValue>,
    result: MockResult,
    next: usize,
    current: Option<usize>,
    error: (i32, String),
}

impl MockApi {
    fn open(&self, dsn: &str, persistent: bool) -> Option<MockConn> {
        let mut s = self.state();
        s.dsns.push(dsn.to_string());
        if dsn.is_empty() || dsn.contains("INVALID") {
            s.global_error = (
                -100,
                "Database server not found".to_string(),
                "08001".to_string(),
            );
            return None;
        }
        if persistent {
            s.pconnects += 1;
        } else {
            s.connects += 1;
        }
        Some(MockConn)
    }
}

impl SqlAnywhereApi for MockApi {
    type Connection = MockConn;
    type Statement = MockStmt;

    fn connect(&self, dsn: &str) -> Option<MockConn> {
        self.open(dsn, false)
    }

    fn pconnect(&self, dsn: &str) -> Option<MockConn> {
        self.open(dsn, true)
    }

    fn disconnect(&self, _conn: &mut MockConn) {
        let mut s = self.state();
        s.disconnects += 1;
        s.events.push("disconnect");
    }

    fn set_option(&self, _conn: &mut MockConn, option: SessionOption) -> bool {
        let mut s = self.state();
        s.option_calls.push(option);
        if s.fail_option == Some(option) {
            s.session_error = (
                -200,
                format!("Cannot set option {}", option.name()),
                "HY000".to_string(),
            );
            return false;
        }
        s.options.insert(option.name(), option.enabled());
        true
    }

    fn commit(&self, _conn: &mut MockConn) -> bool {
        let mut s = self.state();
        if s.fail_commit {
            if !s.silent_errors {
                s.session_error = (-300, "Commit failed".to_string(), "40000".to_string());
            }
            return false;
        }
        s.commits += 1;
        true
    }

    fn rollback(&self, _conn: &mut MockConn) -> bool {
        let mut s = self.state();
        if s.fail_rollback {
            s.session_error = (-301, "Rollback failed".to_string(), "40000".to_string());
            return false;
        }
        s.rollbacks += 1;
        true
    }

    fn error_code(&self, conn: Option<&MockConn>) -> i32 {
        let s = self.state();
        match conn {
            Some(_) => s.session_error.0,
            None => s.global_error.0,
        }
    }

    fn error_message(&self, conn: Option<&MockConn>) -> String {
        let s = self.state();
        match conn {
            Some(_) => s.session_error.1.clone(),
            None => s.global_error.1.clone(),
        }
    }

    fn sqlstate(&self, conn: Option<&MockConn>) -> String {
        let s = self.state();
        match conn {
            Some(_) => s.session_error.2.clone(),
            None => s.global_error.2.clone(),
        }
    }

    fn escape_string(&self, _conn: &MockConn, input: &str) -> String {
        input.replace('\\', "\\\\").replace('\'', "''")
    }

    fn insert_id(&self, _conn: &MockConn) -> u64 {
        self.state().insert_id
    }

    fn prepare(&self, _conn: &mut MockConn, sql: &str) -> Option<MockStmt> {
        let mut s = self.state();
        if s.fail_prepare.contains(sql) {
            s.session_error = (
                -131,
                format!("Syntax error near '{}'", sql),
                "42000".to_string(),
            );
            return None;
        }
        s.prepared.push(sql.to_string());
        let result = s.results.get(sql).cloned().unwrap_or_default();
        Some(MockStmt {
            sql: sql.to_string(),
            params: Vec::new(),
            result,
            next: 0,
            current: None,
            error: (0, String::new()),
        })
    }

    fn bind_param(&self, stmt: &mut MockStmt, index: u32, value: &DataValue) -> bool {
        let index = index as usize;
        if stmt.params.len() <= index {
            stmt.params.resize(index + 1, DataValue::Null);
        }
        stmt.params[index] = value.clone();
        true
    }

    fn execute(&self, _conn: &mut MockConn, stmt: &mut MockStmt) -> bool {
        let mut s = self.state();
        if s.fail_execute.contains(&stmt.sql) {
            stmt.error = (-193, "Primary key for table 't' is not unique".to_string());
            return false;
        }
        s.executed.push((stmt.sql.clone(), stmt.params.clone()));
        stmt.next = 0;
        stmt.current = None;
        true
    }

    fn affected_rows(&self, stmt: &MockStmt) -> i64 {
        stmt.result.affected
    }

    fn num_cols(&self, stmt: &MockStmt) -> u32 {
        stmt.result.columns.len() as u32
    }

    fn column_name(&self, stmt: &MockStmt, index: u32) -> Option<String> {
        stmt.result.columns.get(index as usize).cloned()
    }

    fn fetch_next(&self, stmt: &mut MockStmt) -> bool {
        if stmt.next < stmt.result.rows.len() {
            stmt.current = Some(stmt.next);
            stmt.next += 1;
            true
        } else {
            stmt.current = None;
            false
        }
    }

    fn get_column(&self, stmt: &MockStmt, index: u32) -> Option<DataValue> {
        let row = stmt.result.rows.get(stmt.current?)?;
        row.get(index as usize).cloned()
    }

    fn stmt_error_code(&self, stmt: &MockStmt) -> i32 {
        stmt.error.0
    }

    fn stmt_error_message(&self, stmt: &MockStmt) -> String {
        stmt.error.1.clone()
    }

    fn free_stmt(&self, _stmt: MockStmt) {
        let mut s = self.state();
        s.freed_stmts += 1;
        s.events.push("free_stmt");
    }
}
