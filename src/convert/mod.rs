//! Post-processors turning the generic property maps of well-known MATLAB classes into typed
//! values.
//!
//! The registry maps class names to converter functions. Conversion only runs when the load
//! was requested with `raw_data == false`; unknown classes and converters that find their
//! expected properties missing fall back to the raw [`crate::ObjectArray`].

pub mod containers;
pub mod strings;
pub mod tables;
pub mod times;

use binrw::Endian;

use crate::interface::error::MatObjError;
use crate::interface::fileio::LoadOptions;
use crate::interface::types::object_array::ObjectArray;
use crate::interface::variable::MatVariable;

/// Converter signature: consumes the raw object array and produces the typed value.
pub type Converter = fn(ObjectArray, Endian, &LoadOptions) -> Result<MatVariable, MatObjError>;

/// Look up the converter registered for a class name.
pub fn converter_for(class_name: &str) -> Option<Converter> {
    match class_name {
        "datetime" => Some(times::to_datetime),
        "duration" => Some(times::to_duration),
        "string" => Some(strings::to_string_array),
        "table" => Some(tables::to_table),
        "timetable" => Some(tables::to_timetable),
        "containers.Map" => Some(containers::to_map),
        "categorical" | "dictionary" | "calendarDuration" => Some(containers::passthrough),
        _ => None,
    }
}

/// Run the registered converter over a resolved object, or return it unchanged.
pub fn convert_to_object(
    object: ObjectArray,
    endian: Endian,
    opts: &LoadOptions,
) -> Result<MatVariable, MatObjError> {
    match converter_for(&object.class_name) {
        Some(converter) => converter(object, endian, opts),
        None => Ok(MatVariable::Object(object)),
    }
}

/// Fallback shared by the converters: keep the raw object.
pub(crate) fn raw(object: ObjectArray) -> Result<MatVariable, MatObjError> {
    Ok(MatVariable::Object(object))
}
