use crate::error::QueryError;
use crate::value::BoundValue;
use reportdef_types::DataTable;
use std::time::Duration;

/// A read-only relational connection the binder can run dataset queries on.
///
/// The connection is borrowed for the duration of a binding pass; its
/// lifecycle belongs to the caller.
pub trait QueryConnection {
    /// Runs `sql` with the given named parameters and materializes every row.
    ///
    /// Parameter names carry no `@` prefix. Implementations must give up with
    /// [`QueryError::Timeout`] once `timeout` has elapsed. The returned
    /// table's name is overwritten by the caller.
    fn query(
        &self,
        sql: &str,
        params: &[(String, BoundValue)],
        timeout: Duration,
    ) -> Result<DataTable, QueryError>;
}
