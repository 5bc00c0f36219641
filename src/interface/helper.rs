//!
//! Module containing helper functions
//!

use crate::interface::types::structure::Structure;
use crate::interface::variable::MatVariable;

///
/// Return if string `name` is a valid MATLAB variable name.
///
pub fn is_valid_variable_name(name: &str) -> bool {
    if name.is_empty() {
        return false;
    }

    static MATLABKEYWORDS: [&str; 20] = [
        "break",
        "case",
        "catch",
        "classdef",
        "continue",
        "else",
        "elseif",
        "end",
        "for",
        "function",
        "global",
        "if",
        "otherwise",
        "parfor",
        "persistent",
        "return",
        "spmd",
        "switch",
        "try",
        "while",
    ];

    if MATLABKEYWORDS.contains(&name) {
        return false;
    }

    // Variable name must start with a letter, then followed by letters, numbers or underscores.
    let ok_first = name.chars().next().unwrap().is_ascii_alphabetic();
    let ok_symbols = name.chars().all(|c| c.is_ascii_alphanumeric() || c == '_');
    let ok_len = name.len() <= 63;

    ok_first && ok_symbols && ok_len
}

///
/// View a value as a scalar structure. Scalar structures arrive either directly or as a
/// 1x1 structure array.
///
pub fn as_scalar_struct(value: &MatVariable) -> Option<&Structure> {
    match value {
        MatVariable::Structure(s) => Some(s),
        MatVariable::StructureArray(sa) if sa.value.len() == 1 => match &sa.value[0] {
            MatVariable::Structure(s) => Some(s),
            _ => None,
        },
        _ => None,
    }
}

///
/// Read a scalar numeric value as `usize`, whatever its stored type.
///
pub fn as_scalar_usize(value: &MatVariable) -> Option<usize> {
    match value {
        MatVariable::NumericArray(n) if n.value.len() == 1 => {
            let v = n.value.get_as_f64(0)?;
            if v < 0.0 {
                return None;
            }
            Some(v as usize)
        }
        _ => None,
    }
}

///
/// Read a scalar numeric value as `u32`, whatever its stored type.
///
pub fn as_scalar_u32(value: &MatVariable) -> Option<u32> {
    Some(as_scalar_usize(value)? as u32)
}

///
/// Stringify a key item of a `containers.Map`: character keys verbatim, numeric keys
/// through their decimal form.
///
pub fn key_to_string(value: &MatVariable) -> Option<String> {
    if let Some(text) = value.to_string_value() {
        return Some(text);
    }
    match value {
        MatVariable::NumericArray(n) if n.value.len() == 1 => {
            let v = n.value.get_as_f64(0)?;
            if v == v.trunc() {
                Some(format!("{}", v as i64))
            } else {
                Some(format!("{}", v))
            }
        }
        _ => None,
    }
}
