//! MCOS subsystem parser implementation.
//!
//! The FileWrapper layout is undocumented; the region structure implemented here follows the
//! reverse-engineered behavior of MATLAB R2008b and later savefiles.

pub mod subsystem;
