//! `containers.Map` conversion and the tagged pass-through classes.

use binrw::Endian;
use indexmap::IndexMap;

use crate::convert::raw;
use crate::interface::error::MatObjError;
use crate::interface::fileio::LoadOptions;
use crate::interface::helper::{as_scalar_struct, key_to_string};
use crate::interface::types::map::MatMap;
use crate::interface::types::object_array::ObjectArray;
use crate::interface::variable::MatVariable;

/// Convert a `containers.Map` object from its `serialization` payload: parallel `keys` and
/// `values` cell arrays.
pub fn to_map(
    object: ObjectArray,
    _endian: Endian,
    _opts: &LoadOptions,
) -> Result<MatVariable, MatObjError> {
    let Some(props) = object.prop(0).cloned() else {
        return raw(object);
    };

    let Some(serialization) = props.get("serialization").and_then(as_scalar_struct) else {
        log::warn!("containers.Map object without serialization; returning raw properties");
        return raw(object);
    };

    let (Some(MatVariable::CellArray(keys)), Some(MatVariable::CellArray(values))) =
        (serialization.get("keys"), serialization.get("values"))
    else {
        log::warn!("containers.Map serialization without keys/values; returning raw properties");
        return raw(object);
    };

    if keys.value.len() != values.value.len() {
        return Err(MatObjError::Malformed(format!(
            "containers.Map with {} keys for {} values",
            keys.value.len(),
            values.value.len()
        )));
    }

    let mut entries = IndexMap::new();
    for (key, value) in keys.value.iter().zip(values.value.iter()) {
        let Some(key) = key_to_string(key) else {
            log::warn!("containers.Map key is not stringifiable; returning raw properties");
            return raw(object);
        };
        entries.insert(key, value.clone());
    }

    Ok(MatVariable::Map(MatMap::new(entries)))
}

/// Keep the raw object for classes that only carry their class tag through conversion
/// (`categorical`, `dictionary`, `calendarDuration`).
pub fn passthrough(
    object: ObjectArray,
    _endian: Endian,
    _opts: &LoadOptions,
) -> Result<MatVariable, MatObjError> {
    Ok(MatVariable::Object(object))
}
