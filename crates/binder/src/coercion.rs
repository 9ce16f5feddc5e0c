//! Conversion of parameter text values into typed query values.

use crate::error::CoercionError;
use crate::value::BoundValue;
use chrono::{DateTime, Local, NaiveDate, NaiveDateTime, NaiveTime};
use reportdef_types::{DataType, Parameter};
use rust_decimal::Decimal;
use std::str::FromStr;

const DATE_TIME_FORMATS: &[&str] = &[
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M",
    "%Y-%m-%dT%H:%M",
    "%m/%d/%Y %H:%M:%S",
    "%m/%d/%Y %H:%M",
];

const DATE_FORMATS: &[&str] = &["%Y-%m-%d", "%m/%d/%Y", "%Y/%m/%d"];

const TIME_FORMATS: &[&str] = &["%H:%M:%S%.f", "%H:%M"];

/// Converts a parameter's current value(s) into a value bindable to a query
/// placeholder, according to its declared data type.
///
/// A nullable parameter without values binds as `NULL` without coercion.
/// Multi-value text parameters bind as `,v1,v2,v3,` so queries can test
/// membership with `LIKE '%,' + col + ',%'`-style patterns. Other types use
/// the first value only.
pub fn coerce(parameter: &Parameter) -> Result<BoundValue, CoercionError> {
    if parameter.has_no_values() {
        return if parameter.nullable {
            Ok(BoundValue::Null)
        } else {
            Err(CoercionError::MissingValue(parameter.name.clone()))
        };
    }
    let values = parameter.values.as_deref().unwrap_or_default();
    let first = values[0].as_str();

    match parameter.data_type {
        DataType::String if parameter.multi_value => {
            Ok(BoundValue::Text(format!(",{},", values.join(","))))
        }
        DataType::String => Ok(BoundValue::Text(first.to_string())),
        DataType::Integer => first
            .trim()
            .parse::<i64>()
            .map(BoundValue::BigInt)
            .map_err(|_| format_error(parameter, first)),
        DataType::Float => Decimal::from_str(first.trim())
            .map(BoundValue::Decimal)
            .map_err(|_| format_error(parameter, first)),
        DataType::DateTime => {
            let value = parse_date_time(first).ok_or_else(|| format_error(parameter, first))?;
            Ok(date_time_for_name(&parameter.name, value))
        }
        DataType::Boolean => parse_bool(first)
            .map(|b| BoundValue::Bit(u8::from(b)))
            .ok_or_else(|| format_error(parameter, first)),
    }
}

/// The parameter name's suffix selects how much of the value is bound.
fn date_time_for_name(name: &str, value: NaiveDateTime) -> BoundValue {
    if name.ends_with("DateTime") {
        BoundValue::DateTime(value)
    } else if name.ends_with("Date") {
        BoundValue::Date(value.format("%Y-%m-%d").to_string())
    } else if name.ends_with("Time") {
        BoundValue::Time(value.time())
    } else {
        BoundValue::DateTime(value)
    }
}

/// Parses the date-time layouts accepted for `DateTime` parameters. A bare
/// date means midnight; a bare time means that time today.
pub fn parse_date_time(text: &str) -> Option<NaiveDateTime> {
    let text = text.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(text) {
        return Some(dt.naive_local());
    }
    if let Some(dt) = DATE_TIME_FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(text, fmt).ok())
    {
        return Some(dt);
    }
    if let Some(date) = DATE_FORMATS.iter().find_map(|fmt| NaiveDate::parse_from_str(text, fmt).ok())
    {
        return Some(date.and_time(NaiveTime::MIN));
    }
    TIME_FORMATS
        .iter()
        .find_map(|fmt| NaiveTime::parse_from_str(text, fmt).ok())
        .map(|time| Local::now().date_naive().and_time(time))
}

fn parse_bool(text: &str) -> Option<bool> {
    let text = text.trim();
    if text.eq_ignore_ascii_case("true") {
        Some(true)
    } else if text.eq_ignore_ascii_case("false") {
        Some(false)
    } else {
        None
    }
}

fn format_error(parameter: &Parameter, value: &str) -> CoercionError {
    CoercionError::Format {
        parameter: parameter.name.clone(),
        data_type: parameter.data_type,
        value: value.to_string(),
    }
}
