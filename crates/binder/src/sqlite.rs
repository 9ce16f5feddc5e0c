//! [`QueryConnection`] for SQLite through `rusqlite`.
//!
//! SQLite understands `@name` parameters natively, so placeholders are bound
//! by name. The command timeout is enforced with a progress handler that
//! interrupts the statement once the deadline has passed.

use crate::connection::QueryConnection;
use crate::error::QueryError;
use crate::value::BoundValue;
use log::debug;
use reportdef_types::{CellValue, ColumnType, DataColumn, DataTable};
use rusqlite::types::{Value, ValueRef};
use rusqlite::{Connection, ErrorCode};
use rust_decimal::Decimal;
use rust_decimal::prelude::ToPrimitive;
use std::time::{Duration, Instant};

/// Number of VM instructions between deadline checks.
const PROGRESS_INTERVAL: i32 = 1000;

/// Each call installs its own progress handler for the deadline and removes
/// it afterwards, replacing any handler the caller had set on the connection.
impl QueryConnection for Connection {
    fn query(
        &self,
        sql: &str,
        params: &[(String, BoundValue)],
        timeout: Duration,
    ) -> Result<DataTable, QueryError> {
        let deadline = Instant::now() + timeout;
        self.progress_handler(PROGRESS_INTERVAL, Some(move || Instant::now() >= deadline));
        let result = run_query(self, sql, params);
        self.progress_handler(0, None::<fn() -> bool>);

        result.map_err(|e| match e.sqlite_error_code() {
            Some(ErrorCode::OperationInterrupted) => QueryError::Timeout(timeout),
            _ => QueryError::Sqlite(e),
        })
    }
}

fn run_query(
    conn: &Connection,
    sql: &str,
    params: &[(String, BoundValue)],
) -> Result<DataTable, rusqlite::Error> {
    let mut stmt = conn.prepare(sql)?;

    for (name, value) in params {
        match stmt.parameter_index(&format!("@{name}"))? {
            Some(index) => stmt.raw_bind_parameter(index, to_sql_value(value))?,
            None => debug!("Placeholder '@{}' is not a statement parameter; skipped", name),
        }
    }

    let mut table = DataTable::new("");
    table.columns = stmt
        .columns()
        .iter()
        .map(|c| {
            let column_type = c.decl_type().map_or(ColumnType::Unknown, ColumnType::from_declared);
            DataColumn::new(c.name(), column_type)
        })
        .collect();
    let column_count = table.column_count();

    let mut rows = stmt.raw_query();
    while let Some(row) = rows.next()? {
        let cells = (0..column_count)
            .map(|i| row.get_ref(i).map(cell_value))
            .collect::<Result<Vec<_>, _>>()?;
        table.push_row(cells);
    }

    infer_unknown_column_types(&mut table);
    Ok(table)
}

/// Expression columns carry no declared type; use the first non-null value.
fn infer_unknown_column_types(table: &mut DataTable) {
    for (i, column) in table.columns.iter_mut().enumerate() {
        if column.column_type == ColumnType::Unknown
            && let Some(value) = table.rows.iter().map(|r| &r[i]).find(|v| !v.is_null())
        {
            column.column_type = ColumnType::of_value(value);
        }
    }
}

fn to_sql_value(value: &BoundValue) -> Value {
    match value {
        BoundValue::Null => Value::Null,
        BoundValue::Text(s) | BoundValue::Date(s) => Value::Text(s.clone()),
        BoundValue::BigInt(i) => Value::Integer(*i),
        BoundValue::Decimal(d) => decimal_value(d),
        BoundValue::DateTime(dt) => Value::Text(dt.format("%Y-%m-%d %H:%M:%S%.f").to_string()),
        BoundValue::Time(t) => Value::Text(t.format("%H:%M:%S%.f").to_string()),
        BoundValue::Bit(b) => Value::Integer(i64::from(*b)),
    }
}

/// Integral decimals bind as integers and the rest as reals, so they compare
/// numerically against computed expressions that carry no column affinity.
fn decimal_value(d: &Decimal) -> Value {
    let integral = if d.is_integer() { d.to_i64() } else { None };
    match (integral, d.to_f64()) {
        (Some(i), _) => Value::Integer(i),
        (None, Some(r)) => Value::Real(r),
        (None, None) => Value::Text(d.to_string()),
    }
}

fn cell_value(value: ValueRef<'_>) -> CellValue {
    match value {
        ValueRef::Null => CellValue::Null,
        ValueRef::Integer(i) => CellValue::Integer(i),
        ValueRef::Real(r) => CellValue::Real(r),
        ValueRef::Text(bytes) => CellValue::Text(String::from_utf8_lossy(bytes).into_owned()),
        ValueRef::Blob(bytes) => CellValue::Blob(bytes.to_vec()),
    }
}
