use crate::coercion::coerce;
use crate::connection::QueryConnection;
use crate::error::{BindError, CoercionError};
use crate::placeholder::scan_placeholders;
use crate::value::BoundValue;
use log::{debug, info};
use reportdef_types::{Dataset, Parameter};
use std::time::Duration;

/// Command timeout used when none is configured.
pub const DEFAULT_COMMAND_TIMEOUT: Duration = Duration::from_secs(30);

/// Resolves every placeholder of `command_text` against the declared
/// parameters. Placeholders without a matching parameter bind as `NULL`.
pub fn bind_parameters(
    command_text: &str,
    parameters: &[Parameter],
) -> Result<Vec<(String, BoundValue)>, CoercionError> {
    scan_placeholders(command_text)
        .into_iter()
        .map(|name| {
            let value = match parameters.iter().find(|p| p.name == name) {
                Some(parameter) => coerce(parameter)?,
                None => BoundValue::Null,
            };
            Ok((name, value))
        })
        .collect()
}

/// Runs the query of every report data source that has command text and
/// stores the result on the dataset. Lookup datasets are left alone.
///
/// Returns the number of datasets bound. The first failure aborts the pass.
pub fn bind_report_data<C: QueryConnection + ?Sized>(
    datasets: &mut [Dataset],
    parameters: &[Parameter],
    conn: &C,
    timeout: Duration,
) -> Result<usize, BindError> {
    let mut bound = 0;
    for dataset in datasets
        .iter_mut()
        .filter(|d| d.is_report_data_source && d.has_command_text())
    {
        let params = bind_parameters(&dataset.command_text, parameters).map_err(|source| {
            BindError::Coercion { dataset: dataset.name.clone(), source }
        })?;
        for (name, value) in &params {
            debug!("Dataset '{}': @{} = {}", dataset.name, name, value);
        }
        run_into(dataset, &params, conn, timeout)?;
        bound += 1;
    }
    info!("Bound {} report data source(s)", bound);
    Ok(bound)
}

/// Fills the named lookup datasets that have no data yet.
///
/// This runs before any parameter value exists, so every placeholder in a
/// lookup query binds as `NULL`. Returns the number of datasets queried.
pub fn bind_lookup_data<C: QueryConnection + ?Sized>(
    datasets: &mut [Dataset],
    names: &[String],
    conn: &C,
    timeout: Duration,
) -> Result<usize, BindError> {
    let mut bound = 0;
    for dataset in datasets.iter_mut().filter(|d| {
        names.contains(&d.name) && d.data.is_none() && d.has_command_text()
    }) {
        let params: Vec<(String, BoundValue)> = scan_placeholders(&dataset.command_text)
            .into_iter()
            .map(|name| (name, BoundValue::Null))
            .collect();
        run_into(dataset, &params, conn, timeout)?;
        bound += 1;
    }
    if bound > 0 {
        info!("Bound {} lookup dataset(s)", bound);
    }
    Ok(bound)
}

fn run_into<C: QueryConnection + ?Sized>(
    dataset: &mut Dataset,
    params: &[(String, BoundValue)],
    conn: &C,
    timeout: Duration,
) -> Result<(), BindError> {
    let mut table = conn
        .query(&dataset.command_text, params, timeout)
        .map_err(|source| BindError::Query { dataset: dataset.name.clone(), source })?;
    table.name = dataset.name.clone();
    debug!("Dataset '{}' materialized {} row(s)", dataset.name, table.row_count());
    dataset.data = Some(table);
    Ok(())
}
