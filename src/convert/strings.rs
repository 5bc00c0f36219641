//! `string` conversion.
//!
//! A MATLAB `string` array is packed into the `any` property as `u64` words:
//! `[version, ndims, dims.., char_counts..]` followed by UTF-16 code units in the byte order
//! of the file, two code units per word half.

use binrw::Endian;

use crate::convert::raw;
use crate::interface::error::MatObjError;
use crate::interface::fileio::LoadOptions;
use crate::interface::types::object_array::ObjectArray;
use crate::interface::types::string_array::StringArray;
use crate::interface::variable::MatVariable;

pub fn to_string_array(
    object: ObjectArray,
    endian: Endian,
    _opts: &LoadOptions,
) -> Result<MatVariable, MatObjError> {
    let Some(props) = object.prop(0).cloned() else {
        return raw(object);
    };

    let Some(MatVariable::NumericArray(any)) = props.get("any") else {
        log::warn!("string object without any property; returning raw properties");
        return raw(object);
    };

    if any.is_empty() {
        return Ok(MatVariable::StringArray(StringArray::empty()));
    }

    let Some(words) = any.real_to_vec::<u64>() else {
        log::warn!("string payload is not u64 data; returning raw properties");
        return raw(object);
    };

    decode_string_payload(&words, endian).map(MatVariable::StringArray)
}

fn decode_string_payload(words: &[u64], endian: Endian) -> Result<StringArray, MatObjError> {
    if words.len() < 2 {
        return Err(MatObjError::Malformed(
            "String payload shorter than its header".to_string(),
        ));
    }

    let version = words[0];
    if version != 1 {
        log::warn!("String saved from a different MAT-file version. This may work unexpectedly");
    }

    let ndims = words[1] as usize;
    if words.len() < 2 + ndims {
        return Err(MatObjError::Malformed(
            "String payload truncated inside its dimensions".to_string(),
        ));
    }
    let dims: Vec<usize> = words[2..2 + ndims].iter().map(|&d| d as usize).collect();
    let num_strings: usize = dims.iter().product();

    if words.len() < 2 + ndims + num_strings {
        return Err(MatObjError::Malformed(
            "String payload truncated inside its length table".to_string(),
        ));
    }
    let char_counts: Vec<usize> = words[2 + ndims..2 + ndims + num_strings]
        .iter()
        .map(|&c| c as usize)
        .collect();

    let byte_data: Vec<u8> = words[2 + ndims + num_strings..]
        .iter()
        .flat_map(|w| match endian {
            Endian::Little => w.to_le_bytes(),
            Endian::Big => w.to_be_bytes(),
        })
        .collect();

    let mut value = Vec::with_capacity(num_strings);
    let mut pos = 0usize;
    for char_count in char_counts {
        let byte_len = char_count * 2;
        if pos + byte_len > byte_data.len() {
            return Err(MatObjError::Malformed(
                "String payload truncated inside its character data".to_string(),
            ));
        }
        let units: Vec<u16> = byte_data[pos..pos + byte_len]
            .chunks_exact(2)
            .map(|pair| match endian {
                Endian::Little => u16::from_le_bytes([pair[0], pair[1]]),
                Endian::Big => u16::from_be_bytes([pair[0], pair[1]]),
            })
            .collect();
        let string = String::from_utf16(&units).map_err(|err| {
            MatObjError::DecodeFailure(format!("Invalid UTF-16 string data: {}", err))
        })?;
        value.push(string);
        pos += byte_len;
    }

    Ok(StringArray { dim: dims, value })
}

/// Pack strings into the `u64` word layout; the test-side inverse of
/// [`decode_string_payload`].
#[cfg(test)]
pub(crate) fn encode_string_payload(dims: &[usize], strings: &[String], endian: Endian) -> Vec<u64> {
    let mut words = vec![1u64, dims.len() as u64];
    words.extend(dims.iter().map(|&d| d as u64));

    let units: Vec<Vec<u16>> = strings.iter().map(|s| s.encode_utf16().collect()).collect();
    words.extend(units.iter().map(|u| u.len() as u64));

    let mut bytes: Vec<u8> = Vec::new();
    for u in &units {
        for unit in u {
            match endian {
                Endian::Little => bytes.extend(unit.to_le_bytes()),
                Endian::Big => bytes.extend(unit.to_be_bytes()),
            }
        }
    }
    while bytes.len() % 8 != 0 {
        bytes.push(0);
    }
    words.extend(bytes.chunks_exact(8).map(|chunk| match endian {
        Endian::Little => u64::from_le_bytes(chunk.try_into().unwrap()),
        Endian::Big => u64::from_be_bytes(chunk.try_into().unwrap()),
    }));

    words
}
