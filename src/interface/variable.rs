//! Module defining enum [`MatVariable`], which describes different MAT-file variable types.

use paste::paste;
use std::fmt::Display;
use std::ops;

use crate::interface::index::Index;
use crate::interface::types::cell_array::CellArray;
use crate::interface::types::datetime_array::DatetimeArray;
use crate::interface::types::duration_array::DurationArray;
use crate::interface::types::map::MatMap;
use crate::interface::types::matlab_types::{MatlabType, MatlabTypeMarker};
use crate::interface::types::numeric_array::NumericArray;
use crate::interface::types::object_array::{EnumerationInstance, ObjectArray, OpaqueVariable};
use crate::interface::types::sparse_array::SparseArray;
use crate::interface::types::string_array::StringArray;
use crate::interface::types::structure::Structure;
use crate::interface::types::structure_array::StructureArray;
use crate::interface::types::table::Table;

/// MAT-file variable wrapper
///
/// The primitive variants (numeric, sparse, cell, structure) mirror what a MAT v5 / v7.3
/// reader produces. The remaining variants are the MCOS side: [`MatVariable::Opaque`] is the
/// unresolved placeholder, [`MatVariable::Object`] and [`MatVariable::Enumeration`] are resolved
/// class instances, and the typed variants are the outputs of the well-known class converters.
#[derive(Debug, Clone, PartialEq)]
pub enum MatVariable {
    ///
    /// Full (dense) numeric arrays of arbitrary dimensions. Can contain the numeric types
    /// (`i8`, `i16`, `i32`, `i64`, `u8`, `u16`, `u32`, `u64`, `f32`, `f64`), the character
    /// type (`char`) and logicals.
    ///
    /// # Conversion
    ///
    /// `NumericArray` data can be explicitly converted with the `to_*`/`to_vec_*` methods,
    /// e.g. [`MatVariable::to_f64`] for the first value as scalar and
    /// [`MatVariable::to_vec_f64`] for a clone of the data. Conversion only succeeds when the
    /// method matches the stored type.
    ///
    NumericArray(NumericArray),
    ///
    /// Sparse arrays of dimension 2 in compressed-sparse-column form.
    ///
    SparseArray(SparseArray),
    ///
    /// Key-value structures in arrays of arbitrary dimensions.
    ///
    StructureArray(StructureArray),
    ///
    /// Contains mixed MatVariable kinds in arrays of arbitrary dimensions.
    ///
    CellArray(CellArray),
    ///
    /// Support type describing scalar structure. Used in [`MatVariable::StructureArray`].
    ///
    Structure(Structure),
    // ------------------------
    ///
    /// Unresolved opaque placeholder carrying `(_TypeSystem, _Metadata)` as produced by the
    /// primitive reader for class instances.
    ///
    Opaque(OpaqueVariable),
    ///
    /// Resolved MCOS class instance array: a class name plus one property map per element.
    ///
    Object(ObjectArray),
    ///
    /// Resolved MCOS enumeration instance.
    ///
    Enumeration(EnumerationInstance),
    ///
    /// Converted `datetime` values.
    ///
    DatetimeArray(DatetimeArray),
    ///
    /// Converted `duration` values.
    ///
    DurationArray(DurationArray),
    ///
    /// Converted `string` values.
    ///
    StringArray(StringArray),
    ///
    /// Converted `table` / `timetable` values.
    ///
    Table(Table),
    ///
    /// Converted `containers.Map` values.
    ///
    Map(MatMap),
    // ------------------------
    ///
    /// Null type used as return type for non-existing index
    ///
    Null,
    ///
    /// Support type used for description of unsupported types.
    ///
    Unsupported,
}

impl MatVariable {
    /// Get array dimensions.
    pub fn dim(&self) -> Vec<usize> {
        match self {
            MatVariable::NumericArray(val) => val.dim.clone(),
            MatVariable::CellArray(val) => val.dim.clone(),
            MatVariable::Structure(_) => vec![1, 1],
            MatVariable::StructureArray(val) => val.dim.clone(),
            MatVariable::SparseArray(val) => val.dim.clone(),
            MatVariable::Object(val) => val.dim.clone(),
            MatVariable::Enumeration(val) => val.dim.clone(),
            MatVariable::DatetimeArray(val) => val.dim.clone(),
            MatVariable::DurationArray(val) => val.dim.clone(),
            MatVariable::StringArray(val) => val.dim.clone(),
            _ => vec![0, 0],
        }
    }

    /// If [`MatVariable`] is of type [`MatVariable::NumericArray`] or
    /// [`MatVariable::SparseArray`], return numeric type. Otherwise [`None`].
    pub fn numeric_type(&self) -> Option<&MatlabType> {
        match self {
            MatVariable::NumericArray(val) => Some(val.numeric_type()),
            MatVariable::SparseArray(val) => Some(val.numeric_type()),
            _ => None,
        }
    }

    /// If [`MatVariable`] is of type [`MatVariable::Structure`] or
    /// [`MatVariable::StructureArray`], return field names. Otherwise [`None`].
    pub fn fieldnames(&self) -> Option<Vec<String>> {
        match self {
            MatVariable::Structure(val) => Some(val.fieldnames()),
            MatVariable::StructureArray(val) => Some(val.fieldnames()),
            _ => None,
        }
    }

    /// If [`MatVariable`] is of type [`MatVariable::NumericArray`] or
    /// [`MatVariable::SparseArray`], return if variable is complex. Otherwise [`None`].
    pub fn is_complex(&self) -> Option<bool> {
        match self {
            MatVariable::NumericArray(val) => Some(val.is_complex()),
            MatVariable::SparseArray(val) => Some(val.is_complex()),
            _ => None,
        }
    }

    /// Class name of resolved or unresolved class instances. Converted values report their
    /// MATLAB class. Otherwise [`None`].
    pub fn class_name(&self) -> Option<&str> {
        match self {
            MatVariable::Opaque(val) => Some(&val.class_name),
            MatVariable::Object(val) => Some(&val.class_name),
            MatVariable::Enumeration(val) => Some(&val.class_name),
            MatVariable::DatetimeArray(_) => Some("datetime"),
            MatVariable::DurationArray(_) => Some("duration"),
            MatVariable::StringArray(_) => Some("string"),
            MatVariable::Table(val) => Some(if val.is_timetable() { "timetable" } else { "table" }),
            MatVariable::Map(_) => Some("containers.Map"),
            _ => None,
        }
    }

    /// Whether the variable holds no elements at all.
    pub fn is_empty_value(&self) -> bool {
        match self {
            MatVariable::NumericArray(val) => val.is_empty(),
            MatVariable::CellArray(val) => val.is_empty(),
            MatVariable::Structure(val) => val.is_empty(),
            MatVariable::StructureArray(val) => val.is_empty(),
            MatVariable::StringArray(val) => val.is_empty(),
            MatVariable::Null => true,
            _ => false,
        }
    }

    /// Read character content (char arrays and scalar strings) as a `String`.
    pub fn to_string_value(&self) -> Option<String> {
        match self {
            MatVariable::NumericArray(val) => val.chars_to_string(),
            MatVariable::StringArray(val) => val.value.first().cloned(),
            _ => None,
        }
    }
}

macro_rules! impl_MatVariable_to {
    ($($ret: ty),*) => {
        paste! {
            $(
            //
            // to_<$ret>
            //
            #[doc = concat!("If [`MatVariable`] is of type [`MatVariable::NumericArray`], returns copied `", stringify!($ret),"`. Otherwise, returns [`None`].")]
            pub fn [<to_ $ret>](&self) -> Option<$ret> {
                match self {
                    MatVariable::NumericArray(val) if val.is_scalar() => val.real_to_scalar(),
                    _ => None,
                }
            }
            )*
        }
    };
}

macro_rules! impl_MatVariable_comp_to {
    ($($ret: ty),*) => {
        paste! {
            $(
            //
            // comp_to_<$ret>
            //
            #[doc = concat!("If [`MatVariable`] is of type [`MatVariable::NumericArray`], returns copied `", stringify!($ret),"`. Otherwise, returns [`None`].")]
            pub fn [<comp_to_ $ret>](&self) -> Option<$ret> {
                match self {
                    MatVariable::NumericArray(val) if val.is_scalar() => val.comp_to_scalar(),
                    _ => None,
                }
            }
            )*
        }
    };
}

macro_rules! impl_MatVariable_to_vec {
    ($($ret: ty),*) => {
        paste! {
            $(
            //
            // to_vec_<$ret>
            //
            #[doc = concat!("If [`MatVariable`] is of type [`MatVariable::NumericArray`], returns cloned `Vec<", stringify!($ret),">`. Otherwise, returns [`None`].")]
            pub fn [<to_vec_ $ret>](&self) -> Option<Vec<$ret>> {
                match self {
                    MatVariable::NumericArray(val) => val.real_to_vec::<$ret>(),
                    _ => None,
                }
            }
            )*
        }
    };
}

macro_rules! impl_MatVariable_comp_to_vec {
    ($($ret: ty),*) => {
        paste! {
            $(
            //
            // comp_to_vec_<$ret>
            //
            #[doc = concat!("If [`MatVariable`] is of type [`MatVariable::NumericArray`], returns complex part as cloned `Vec<", stringify!($ret),">`. Otherwise, returns [`None`].")]
            pub fn [<comp_to_vec_ $ret>](&self) -> Option<Vec<$ret>> {
                match self {
                    MatVariable::NumericArray(val) => val.comp_to_vec::<$ret>(),
                    _ => None,
                }
            }
            )*
        }
    };
}

impl MatVariable {
    impl_MatVariable_to!(u8, i8, u16, i16, u32, i32, u64, i64, f32, f64, char, bool);
    impl_MatVariable_comp_to!(u8, i8, u16, i16, u32, i32, u64, i64, f32, f64, char, bool);
    impl_MatVariable_to_vec!(u8, i8, u16, i16, u32, i32, u64, i64, f32, f64, char, bool);
    impl_MatVariable_comp_to_vec!(u8, i8, u16, i16, u32, i32, u64, i64, f32, f64, char, bool);
}

// ============================================================================
// Index
// ============================================================================

pub trait OwnedIndex<Idx> {
    type Output;
    fn elem(&self, index: Idx) -> Self::Output;
}

static NULL: MatVariable = MatVariable::Null;

impl<T> OwnedIndex<T> for MatVariable
where
    T: Index,
{
    type Output = MatVariable;

    fn elem(&self, index: T) -> Self::Output {
        index.index_into_clone(self).unwrap_or(NULL.clone())
    }
}

impl<T> ops::Index<T> for MatVariable
where
    T: Index,
{
    type Output = MatVariable;

    fn index(&self, index: T) -> &Self::Output {
        index.index_into_ref(self).unwrap_or(&NULL)
    }
}

// ============================================================================
// From
// ============================================================================

/// Create a `MatVariable` from `&str`.
impl From<&str> for MatVariable {
    fn from(value: &str) -> Self {
        MatVariable::NumericArray(NumericArray::from(value))
    }
}

/// Create a `MatVariable` from `Vec<T>`.
impl<T> From<Vec<T>> for MatVariable
where
    T: MatlabTypeMarker,
{
    fn from(value: Vec<T>) -> Self {
        MatVariable::NumericArray(
            NumericArray::new(vec![1, value.len()], MatlabType::from(value), None)
                .expect("Could not create NumericArray."),
        )
    }
}

/// Create a `MatVariable` from a scalar.
impl<T> From<T> for MatVariable
where
    T: MatlabTypeMarker,
{
    fn from(value: T) -> Self {
        MatVariable::NumericArray(
            NumericArray::new(vec![1, 1], MatlabType::from(vec![value]), None)
                .expect("Could not create NumericArray."),
        )
    }
}

/// Create a `MatVariable` from a complex scalar.
impl<T> From<(T, T)> for MatVariable
where
    T: MatlabTypeMarker,
{
    fn from(value: (T, T)) -> Self {
        MatVariable::NumericArray(
            NumericArray::new(
                vec![1, 1],
                MatlabType::from(vec![value.0]),
                Some(MatlabType::from(vec![value.1])),
            )
            .expect("Could not create NumericArray."),
        )
    }
}

// ============================================================================
// Other trait implementations
// ============================================================================

impl Display for MatVariable {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            MatVariable::NumericArray(v) => write!(f, "{}", v),
            MatVariable::SparseArray(v) => write!(f, "sparse {:?}", v.dim),
            MatVariable::CellArray(v) => write!(f, "cell {:?}", v.dim),
            MatVariable::Structure(v) => write!(f, "struct with fields {:?}", v.fieldnames()),
            MatVariable::StructureArray(v) => write!(f, "struct array {:?}", v.dim),
            MatVariable::Opaque(v) => write!(f, "opaque {} ({})", v.class_name, v.type_system),
            MatVariable::Object(v) => write!(f, "{} {:?}", v.class_name, v.dim),
            MatVariable::Enumeration(v) => write!(f, "enumeration {}", v.class_name),
            MatVariable::DatetimeArray(v) => write!(f, "datetime {:?}", v.dim),
            MatVariable::DurationArray(v) => write!(f, "duration {:?}", v.dim),
            MatVariable::StringArray(v) => write!(f, "string {:?}", v.dim),
            MatVariable::Table(v) => write!(f, "table {}x{}", v.nrows, v.nvars()),
            MatVariable::Map(v) => write!(f, "containers.Map with {} entries", v.len()),
            MatVariable::Null => write!(f, "null"),
            MatVariable::Unsupported => write!(f, "unsupported"),
        }
    }
}
