//! `table` and `timetable` conversion.

use binrw::Endian;

use crate::convert::raw;
use crate::interface::error::MatObjError;
use crate::interface::fileio::LoadOptions;
use crate::interface::helper::{as_scalar_struct, as_scalar_usize};
use crate::interface::types::object_array::ObjectArray;
use crate::interface::types::structure::Structure;
use crate::interface::types::table::{Table, TableAttributes};
use crate::interface::variable::MatVariable;

/// Read a cell array of character vectors (or strings) into a string list. Empty cells
/// contribute empty strings.
fn cell_to_strings(value: &MatVariable) -> Option<Vec<String>> {
    let MatVariable::CellArray(cells) = value else {
        return None;
    };
    Some(
        cells
            .value
            .iter()
            .map(|cell| cell.to_string_value().unwrap_or_default())
            .collect(),
    )
}

/// Side attributes from the `props` property. Per-variable lists are attached only when
/// their length matches the variable count.
fn table_attributes(props: &Structure, nvars: usize) -> Option<TableAttributes> {
    let tab_props = as_scalar_struct(props.get("props")?)?;

    let list = |name: &str| -> Vec<String> {
        tab_props
            .get(name)
            .and_then(cell_to_strings)
            .filter(|v| v.len() == nvars)
            .unwrap_or_default()
    };

    Some(TableAttributes {
        description: tab_props
            .get("Description")
            .and_then(|v| v.to_string_value())
            .unwrap_or_default(),
        variable_descriptions: list("VariableDescriptions"),
        variable_units: list("VariableUnits"),
        variable_continuity: list("VariableContinuity"),
        dimension_names: tab_props
            .get("DimensionNames")
            .and_then(cell_to_strings)
            .unwrap_or_default(),
        user_data: tab_props.get("UserData").cloned().map(Box::new),
    })
}

/// Convert a `table` object: per-column `data` keyed by `varnames`, with row names applied
/// when their count matches `nrows`.
pub fn to_table(
    object: ObjectArray,
    _endian: Endian,
    _opts: &LoadOptions,
) -> Result<MatVariable, MatObjError> {
    let Some(props) = object.prop(0).cloned() else {
        return raw(object);
    };

    let (Some(data), Some(nrows), Some(nvars), Some(varnames)) = (
        props.get("data"),
        props.get("nrows").and_then(as_scalar_usize),
        props.get("nvars").and_then(as_scalar_usize),
        props.get("varnames").and_then(cell_to_strings),
    ) else {
        log::warn!("table object with incomplete properties; returning raw properties");
        return raw(object);
    };

    let MatVariable::CellArray(data) = data else {
        log::warn!("table data property is not a cell array; returning raw properties");
        return raw(object);
    };
    if varnames.len() < nvars || data.value.len() < nvars {
        log::warn!("table with fewer columns than nvars; returning raw properties");
        return raw(object);
    }

    let columns: Vec<MatVariable> = data.value[..nvars].to_vec();
    let variable_names: Vec<String> = varnames[..nvars].to_vec();

    let row_names = props
        .get("rownames")
        .and_then(cell_to_strings)
        .filter(|names| names.len() == nrows)
        .unwrap_or_default();

    let attributes = table_attributes(&props, nvars);

    Ok(MatVariable::Table(Table {
        variable_names,
        columns,
        nrows,
        row_names,
        attributes,
        row_times: None,
        time_dimension: None,
    }))
}

/// Convert a `timetable` object from its `any` payload. Support is partial: any missing
/// member falls back to the raw object.
pub fn to_timetable(
    object: ObjectArray,
    _endian: Endian,
    _opts: &LoadOptions,
) -> Result<MatVariable, MatObjError> {
    let Some(props) = object.prop(0).cloned() else {
        return raw(object);
    };

    let Some(any) = props.get("any").and_then(as_scalar_struct) else {
        log::warn!("timetable object without any payload; returning raw properties");
        return raw(object);
    };

    let (Some(data), Some(nrows), Some(nvars), Some(var_names), Some(row_times)) = (
        any.get("data"),
        any.get("numRows").and_then(as_scalar_usize),
        any.get("numVars").and_then(as_scalar_usize),
        any.get("varNames").and_then(cell_to_strings),
        any.get("rowTimes"),
    ) else {
        log::warn!("timetable object with incomplete payload; returning raw properties");
        return raw(object);
    };

    let MatVariable::CellArray(data) = data else {
        log::warn!("timetable data member is not a cell array; returning raw properties");
        return raw(object);
    };
    if var_names.len() < nvars || data.value.len() < nvars {
        log::warn!("timetable with fewer columns than numVars; returning raw properties");
        return raw(object);
    }

    let time_dimension = any
        .get("dimNames")
        .and_then(cell_to_strings)
        .and_then(|names| names.into_iter().next());

    Ok(MatVariable::Table(Table {
        variable_names: var_names[..nvars].to_vec(),
        columns: data.value[..nvars].to_vec(),
        nrows,
        row_names: Vec::new(),
        attributes: None,
        row_times: Some(Box::new(row_times.clone())),
        time_dimension,
    }))
}
