//! `datetime` and `duration` conversion.

use binrw::Endian;
use chrono::{DateTime, Utc};

use crate::convert::raw;
use crate::interface::error::MatObjError;
use crate::interface::fileio::LoadOptions;
use crate::interface::types::datetime_array::DatetimeArray;
use crate::interface::types::duration_array::{DurationArray, DurationUnit};
use crate::interface::types::object_array::ObjectArray;
use crate::interface::variable::MatVariable;

/// UTC offset in milliseconds for a stored timezone string.
///
/// Only `UTC` and fixed-offset forms (`+HH:MM`, `-HH:MM`, `+HHMM`) are honored; there is no
/// timezone database, so named zones warn and fall back to UTC.
fn tz_offset_millis(tz: &str) -> i64 {
    let tz = tz.trim();
    if tz.is_empty() || tz.eq_ignore_ascii_case("utc") || tz == "Z" {
        return 0;
    }

    let (sign, rest) = match tz.as_bytes()[0] {
        b'+' => (1i64, &tz[1..]),
        b'-' => (-1i64, &tz[1..]),
        _ => {
            log::warn!("Could not get timezone offset for {}. Defaulting to UTC.", tz);
            return 0;
        }
    };

    let digits: String = rest.chars().filter(|c| *c != ':').collect();
    let parsed = match digits.len() {
        4 => digits[..2]
            .parse::<i64>()
            .ok()
            .zip(digits[2..].parse::<i64>().ok()),
        2 => digits.parse::<i64>().ok().map(|h| (h, 0)),
        _ => None,
    };

    match parsed {
        Some((hours, minutes)) if hours < 24 && minutes < 60 => {
            sign * (hours * 60 + minutes) * 60_000
        }
        _ => {
            log::warn!("Could not get timezone offset for {}. Defaulting to UTC.", tz);
            0
        }
    }
}

/// Convert a `datetime` object: complex `data` carries milliseconds since epoch in the real
/// part and residual microseconds in the imaginary part.
pub fn to_datetime(
    object: ObjectArray,
    _endian: Endian,
    _opts: &LoadOptions,
) -> Result<MatVariable, MatObjError> {
    let Some(props) = object.prop(0).cloned() else {
        return raw(object);
    };

    let Some(MatVariable::NumericArray(data)) = props.get("data") else {
        log::warn!("datetime object without data property; returning raw properties");
        return raw(object);
    };

    if data.is_empty() {
        return Ok(MatVariable::DatetimeArray(DatetimeArray::empty()));
    }

    let Some(millis) = data.real_to_vec::<f64>() else {
        log::warn!("datetime data property is not double data; returning raw properties");
        return raw(object);
    };
    let micros_extra = data
        .comp_to_vec::<f64>()
        .unwrap_or_else(|| vec![0.0; millis.len()]);

    let tz = props.get("tz").and_then(|v| v.to_string_value());
    let offset_millis = tz.as_deref().map(tz_offset_millis).unwrap_or(0);

    let mut value = Vec::with_capacity(millis.len());
    for (ms, us) in millis.iter().zip(micros_extra.iter()) {
        let total_micros = (*ms as i64 + offset_millis) * 1_000 + *us as i64;
        let instant = DateTime::<Utc>::from_timestamp_micros(total_micros).ok_or_else(|| {
            MatObjError::DecodeFailure(format!("datetime value {} out of range", ms))
        })?;
        value.push(instant);
    }

    Ok(MatVariable::DatetimeArray(DatetimeArray {
        dim: data.dim.clone(),
        value,
        tz: tz.filter(|t| !t.is_empty()),
    }))
}

/// Convert a `duration` object: `millis` rescaled to the unit named by `fmt`.
pub fn to_duration(
    object: ObjectArray,
    _endian: Endian,
    _opts: &LoadOptions,
) -> Result<MatVariable, MatObjError> {
    let Some(props) = object.prop(0).cloned() else {
        return raw(object);
    };

    let Some(MatVariable::NumericArray(millis)) = props.get("millis") else {
        log::warn!("duration object without millis property; returning raw properties");
        return raw(object);
    };

    if millis.is_empty() {
        return Ok(MatVariable::DurationArray(DurationArray::empty()));
    }

    let Some(values) = millis.real_to_vec::<f64>() else {
        log::warn!("duration millis property is not double data; returning raw properties");
        return raw(object);
    };

    let unit = props
        .get("fmt")
        .and_then(|v| v.to_string_value())
        .map(|fmt| DurationUnit::from_fmt(&fmt))
        .unwrap_or_default();

    let scale = unit.millis();
    Ok(MatVariable::DurationArray(DurationArray {
        dim: millis.dim.clone(),
        value: values.into_iter().map(|v| v / scale).collect(),
        unit,
    }))
}
