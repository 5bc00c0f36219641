//! matobj is a pure Rust library for decoding the MCOS object subsystem of MATLAB MAT-files.
//!
//! # Highlights
//!
//! - Resolution of user-defined class instances, object arrays and handle objects stored in
//!   the opaque `__function_workspace__` subsystem.
//! - Enumeration instance decoding.
//! - Typed conversion of well-known classes (`datetime`, `duration`, `string`, `table`,
//!   `timetable`, `containers.Map`) with a raw-property escape hatch.
//! - Works with either byte order and FileWrapper versions 2 through 4.
//!
//! # Introduction
//!
//! MATLAB stores instances of user-defined classes and of most built-in class types
//! (`datetime`, `string`, `table`, ...) in an undocumented region of the MAT-file, the MCOS
//! subsystem. A MAT v5 / v7.3 reader sees those variables only as opaque placeholders. This
//! library decodes the subsystem: it indexes the FileWrapper metadata blob, materialises
//! object arrays with their class defaults merged in, resolves references nested anywhere in
//! cell and struct values, and optionally converts well-known classes into friendly typed
//! values.
//!
//! The primitive layers stay external: implement [`PrimitiveReader`] over your MAT v5 / v7.3
//! reader of choice and hand its output to [`load_matfile_objects`]. The parser currently
//! handles the following opaque data:
//!
//! - [x] MCOS object arrays (user-defined classes, defaults, handle classes)
//! - [x] MCOS enumeration instances
//! - [x] well-known class conversion (`datetime`, `duration`, `string`, `table`,
//!   `timetable`, `containers.Map`)
//! - [ ] Java/COM objects (not supported, skipped with a warning)
//! - [ ] function handles and graphics objects (not supported)
//!
//! # Decoded value model
//!
//! The enum [`MatVariable`] is the Rust type representing a decoded MATLAB variable. Besides
//! the primitive kinds (numeric, sparse, cell, structure) it carries the object-system kinds:
//!
//! ```rust
//! # use matobj::*;
//! enum Variable {
//!     NumericArray(NumericArray),
//!     CellArray(CellArray),
//!     Structure(Structure),
//!     // the object system additions:
//!     Opaque(OpaqueVariable),
//!     Object(ObjectArray),
//!     Enumeration(EnumerationInstance),
//!     StringArray(StringArray),
//!     // ...
//! }
//! ```
//!
//! A resolved object is an [`ObjectArray`]: the class name plus one property map per element,
//! stored column-major. With default options the well-known classes are converted further;
//! with [`LoadOptions::raw_data`] set, every class stays an `ObjectArray`.
//!
//! # Reading object variables
//!
//! ```no_run
//! use matobj::{LoadOptions, MatVariable, load_matfile_objects};
//! # struct MyReader;
//! # impl matobj::PrimitiveReader for MyReader {
//! #     fn read_matfile(&mut self, _: &str, _: &LoadOptions)
//! #         -> Result<(matobj::MatFile, Option<Vec<u8>>), matobj::MatObjError> { unimplemented!() }
//! #     fn read_workspace(&mut self, _: &[u8], _: binrw::Endian, _: &LoadOptions)
//! #         -> Result<MatVariable, matobj::MatObjError> { unimplemented!() }
//! # }
//! # fn main() -> Result<(), matobj::MatObjError> {
//!
//! let mut reader = MyReader; // any MAT v5 / v7.3 primitive reader
//! let matfile = load_matfile_objects("objects.mat", &mut reader, &LoadOptions::default())?;
//!
//! if let MatVariable::Object(obj) = &matfile["obj1"] {
//!     println!("{} of size {:?}", obj.class_name, obj.dim);
//!     for (name, value) in obj.prop(0).unwrap().iter() {
//!         println!("  {}: {}", name, value);
//!     }
//! }
//! # Ok(())
//! # }
//! ```
//!

#[doc(hidden)]
pub mod convert;
#[doc(hidden)]
pub mod interface;
#[doc(hidden)]
pub mod parser;

#[doc(inline)]
pub use interface::{
    error::MatObjError,
    fileio::{
        LoadOptions, PrimitiveReader, load_matfile_objects, resolve_opaque_variables,
        subsystem_byte_order,
    },
    matfile::MatFile,
    types::matlab_types::MatlabType,
    variable::MatVariable,
};

#[doc(hidden)]
pub use interface::variable::OwnedIndex;

#[doc(hidden)]
pub use interface::types::{
    cell_array::CellArray,
    datetime_array::DatetimeArray,
    duration_array::{DurationArray, DurationUnit},
    map::MatMap,
    numeric_array::NumericArray,
    object_array::{EnumerationInstance, ObjectArray, OpaqueVariable},
    sparse_array::SparseArray,
    string_array::StringArray,
    structure::Structure,
    structure_array::StructureArray,
    table::{Table, TableAttributes},
};

#[doc(hidden)]
pub use interface::types::structure::check_same_fields;

#[doc(inline)]
pub use parser::subsystem::Subsystem;
