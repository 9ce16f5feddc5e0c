use reportdef_binder::DEFAULT_COMMAND_TIMEOUT;
use reportdef_parser::DEFAULT_NAMESPACE;
use std::time::Duration;

/// Settings resolved by [`crate::ReportLoader`] and kept by the loaded report.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReportOptions {
    /// Upper bound for every dataset query.
    pub command_timeout: Duration,
    /// Namespace assumed when a document does not declare a report-definition one.
    pub default_namespace: String,
}

impl Default for ReportOptions {
    fn default() -> Self {
        Self {
            command_timeout: DEFAULT_COMMAND_TIMEOUT,
            default_namespace: DEFAULT_NAMESPACE.to_string(),
        }
    }
}
