use core::fmt;

/// Error types
#[derive(Debug)]
pub enum MatObjError {
    IoError(std::io::Error),
    BinrwError(binrw::Error),
    UnsupportedVersion(String),
    Malformed(String),
    UnknownFieldKind(u32),
    LookupFailure(String),
    DecodeFailure(String),
    AccessError(String),
    TypeConstruction(String),
}

impl fmt::Display for MatObjError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MatObjError::IoError(e) => write!(f, "IO error {}", e),
            MatObjError::BinrwError(e) => write!(f, "binrw error {}", e),
            MatObjError::UnsupportedVersion(msg) => write!(f, "Unsupported version: {}", msg),
            MatObjError::Malformed(msg) => write!(f, "Malformed subsystem data: {}", msg),
            MatObjError::UnknownFieldKind(kind) => write!(f, "Unknown property field kind {}", kind),
            MatObjError::LookupFailure(msg) => write!(f, "Lookup failure: {}", msg),
            MatObjError::DecodeFailure(msg) => write!(f, "Decode failure: {}", msg),
            MatObjError::AccessError(msg) => write!(f, "{}", msg),
            MatObjError::TypeConstruction(msg) => write!(f, "Type construction error {}", msg),
        }
    }
}

impl std::error::Error for MatObjError {}

impl From<binrw::Error> for MatObjError {
    fn from(value: binrw::Error) -> Self {
        MatObjError::BinrwError(value)
    }
}

impl From<std::io::Error> for MatObjError {
    fn from(value: std::io::Error) -> Self {
        MatObjError::IoError(value)
    }
}
