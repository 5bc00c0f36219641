//! Object materialisation: property extraction, default merging, handle attachment and the
//! enumeration path.

use std::cell::RefCell;
use std::collections::HashSet;

use crate::convert;
use crate::interface::error::MatObjError;
use crate::interface::helper::{as_scalar_struct, as_scalar_u32};
use crate::interface::types::matlab_types::MatlabType;
use crate::interface::types::numeric_array::NumericArray;
use crate::interface::types::object_array::{EnumerationInstance, ObjectArray};
use crate::interface::types::structure::Structure;
use crate::interface::variable::MatVariable;
use crate::parser::subsystem::Subsystem;
use crate::parser::subsystem::filewrapper::PropertyRegion;
use crate::parser::subsystem::walker::parse_object_reference;

/// Marks a batch of object ids as being resolved for the lifetime of the guard.
struct InFlightGuard<'a> {
    set: &'a RefCell<HashSet<u32>>,
    ids: Vec<u32>,
}

impl<'a> InFlightGuard<'a> {
    fn new(set: &'a RefCell<HashSet<u32>>, ids: &[u32]) -> Self {
        set.borrow_mut().extend(ids.iter().copied());
        Self {
            set,
            ids: ids.to_vec(),
        }
    }
}

impl Drop for InFlightGuard<'_> {
    fn drop(&mut self) {
        let mut set = self.set.borrow_mut();
        for id in &self.ids {
            set.remove(id);
        }
    }
}

impl Subsystem {
    /// Resolve a validated u32 reference sentinel.
    pub(crate) fn read_normal_mcos(&self, arr: &NumericArray) -> Result<MatVariable, MatObjError> {
        let (dims, object_ids, class_id) = parse_object_reference(arr).ok_or_else(|| {
            MatObjError::Malformed("Inconsistent object reference sentinel".to_string())
        })?;
        self.read_object_arrays(&object_ids, class_id, dims)
    }

    /// Materialise an object array: per-instance properties overlaid on class defaults,
    /// tagged with the class name, shaped column-major to `dims`.
    pub(crate) fn read_object_arrays(
        &self,
        object_ids: &[u32],
        class_id: u32,
        dims: Vec<usize>,
    ) -> Result<MatVariable, MatObjError> {
        let class_name = self.wrapper.class_name(class_id)?;

        if dims.iter().product::<usize>() != object_ids.len() {
            return Err(MatObjError::Malformed(format!(
                "Object array of {} ids does not fill dims {:?}",
                object_ids.len(),
                dims
            )));
        }

        // Defaults may reference the class itself; break such cycles with a placeholder.
        if object_ids
            .iter()
            .any(|id| self.in_flight.borrow().contains(id))
        {
            log::warn!(
                "Cyclic object reference into class {}; breaking the cycle",
                class_name
            );
            let props = vec![Structure::empty(); object_ids.len()];
            return Ok(MatVariable::Object(ObjectArray::new(
                class_name, dims, props,
            )?));
        }
        let _guard = InFlightGuard::new(&self.in_flight, object_ids);

        let mut props_list = Vec::with_capacity(object_ids.len());
        for &object_id in object_ids {
            let desc = self.wrapper.object_descriptor(object_id)?;
            props_list.push(self.extract_properties(
                desc.type1_id,
                desc.type2_id,
                desc.dep_id,
            )?);
        }

        if let Some(defaults) = self.default_properties(class_id) {
            let defaults = self.resolve_references(defaults)?;
            if let Some(defaults) = as_scalar_struct(&defaults) {
                for (name, default_val) in defaults.iter() {
                    for props in props_list.iter_mut() {
                        if !props.contains(name) {
                            props.insert(name, default_val.clone());
                        }
                    }
                }
            }
        }

        let object = ObjectArray::new(class_name, dims, props_list)?;
        if self.opts.raw_data {
            Ok(MatVariable::Object(object))
        } else {
            convert::convert_to_object(object, self.wrapper.endian(), &self.opts)
        }
    }

    /// Read the property block of one object instance and overlay its handle attachments.
    pub(crate) fn extract_properties(
        &self,
        type1_id: u32,
        type2_id: u32,
        dep_id: u32,
    ) -> Result<Structure, MatObjError> {
        let (block_id, region) = match (type1_id, type2_id) {
            (0, t2) if t2 != 0 => (t2, PropertyRegion::Type2),
            (t1, 0) if t1 != 0 => (t1, PropertyRegion::Type1),
            _ => {
                return Err(MatObjError::Malformed(
                    "Could not determine object type".to_string(),
                ));
            }
        };

        let mut props = Structure::empty();
        for entry in self.wrapper.property_entries(block_id, region)? {
            let name = self.wrapper.name(entry.name_idx)?.to_string();
            let value = match entry.kind {
                1 => {
                    let content = self
                        .prop_values
                        .get(entry.value as usize)
                        .cloned()
                        .ok_or_else(|| {
                            MatObjError::Malformed(format!(
                                "Property value index {} out of range ({} values)",
                                entry.value,
                                self.prop_values.len()
                            ))
                        })?;
                    self.resolve_references(content)?
                }
                2 => MatVariable::NumericArray(NumericArray::new(
                    vec![1, 1],
                    MatlabType::from(vec![entry.value != 0]),
                    None,
                )?),
                kind => return Err(MatObjError::UnknownFieldKind(kind)),
            };
            props.insert(&name, value);
        }

        if let Some(handles) = self.extract_handles(dep_id)? {
            for (i, handle) in handles.into_iter().enumerate() {
                props.insert(&format!("_Handle_{}", i + 1), handle);
            }
        }

        Ok(props)
    }

    /// Resolve the handle instances attached under a dependency id, each as a 1x1 object.
    pub(crate) fn extract_handles(
        &self,
        dep_id: u32,
    ) -> Result<Option<Vec<MatVariable>>, MatObjError> {
        let type2_ids = self.wrapper.handle_entries(dep_id)?;
        if type2_ids.is_empty() {
            return Ok(None);
        }

        let mut handles = Vec::with_capacity(type2_ids.len());
        for type2_id in type2_ids {
            let (class_id, object_id) = self.wrapper.find_handle_object(type2_id)?;
            handles.push(self.read_object_arrays(&[object_id], class_id, vec![1, 1])?);
        }
        Ok(Some(handles))
    }

    /// Resolve the enumeration-instance metadata form.
    pub(crate) fn read_mcos_enumeration(
        &self,
        metadata: &Structure,
    ) -> Result<MatVariable, MatObjError> {
        let class_idx = metadata
            .get("ClassName")
            .and_then(as_scalar_u32)
            .ok_or_else(|| {
                MatObjError::Malformed("Enumeration instance without ClassName".to_string())
            })?;
        let builtin_idx = metadata
            .get("BuiltinClassName")
            .and_then(as_scalar_u32)
            .unwrap_or(0);

        let class_name = self.wrapper.class_name(class_idx)?;
        let builtin_class_name = if builtin_idx != 0 {
            Some(self.wrapper.class_name(builtin_idx)?)
        } else {
            None
        };

        let Some(MatVariable::NumericArray(name_idx)) = metadata.get("ValueNames") else {
            return Err(MatObjError::Malformed(
                "Enumeration instance without ValueNames".to_string(),
            ));
        };
        let Some(MatVariable::NumericArray(value_idx)) = metadata.get("ValueIndices") else {
            return Err(MatObjError::Malformed(
                "Enumeration instance without ValueIndices".to_string(),
            ));
        };

        let name_ids = name_idx.real_to_vec::<u32>().ok_or_else(|| {
            MatObjError::Malformed("Enumeration ValueNames is not u32 data".to_string())
        })?;
        let indices = value_idx.real_to_vec::<u32>().ok_or_else(|| {
            MatObjError::Malformed("Enumeration ValueIndices is not u32 data".to_string())
        })?;
        if name_ids.len() != indices.len() {
            return Err(MatObjError::Malformed(format!(
                "Enumeration has {} value names for {} indices",
                name_ids.len(),
                indices.len()
            )));
        }

        let value_names = name_ids
            .iter()
            .map(|&idx| self.wrapper.name(idx).map(str::to_string))
            .collect::<Result<Vec<String>, MatObjError>>()?;

        let mut values = Vec::new();
        if let Some(MatVariable::CellArray(cells)) = metadata.get("Values") {
            if !cells.value.is_empty() {
                for &index in &indices {
                    let cell = cells.value.get(index as usize).ok_or_else(|| {
                        MatObjError::Malformed(format!(
                            "Enumeration value index {} out of range ({} values)",
                            index,
                            cells.value.len()
                        ))
                    })?;
                    let resolved = self.read_mcos_object(cell)?;
                    values.push(match resolved {
                        // A scalar object contributes its property map
                        MatVariable::Object(mut obj) if obj.is_scalar() => {
                            MatVariable::Structure(obj.props.remove(0))
                        }
                        other => other,
                    });
                }
            }
        }

        Ok(MatVariable::Enumeration(EnumerationInstance {
            class_name,
            builtin_class_name,
            dim: value_idx.dim.clone(),
            value_names,
            values,
        }))
    }
}
