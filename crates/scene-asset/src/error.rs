use std::{
    error::Error,
    fmt::{self, Display, Formatter},
    io,
};

use gltf::accessor::{DataType, Dimensions};

use crate::loader::gltf::scheme::SchemeError;

/// Failures that abort an import.
///
/// Channel-level inconsistencies (attribute streams of the wrong length,
/// unsupported camera kinds and the like) are not errors; the importer
/// warns through the `log` facade and continues without the offending
/// data.
#[derive(Debug)]
pub enum ImportError {
    Gltf(gltf::Error),
    Io(io::Error),
    InvalidScheme(SchemeError),
    UnsupportedVersion(String),
    ResourceNotFound(String),
    MissingBinaryChunk,
    MissingBuffer(usize),
    AccessorBounds {
        accessor: usize,
        end: usize,
        length: usize,
    },
    AccessorStride {
        accessor: usize,
        stride: usize,
        element_size: usize,
    },
    AccessorDataType {
        expected: DataType,
        actual: DataType,
    },
    AccessorDimensions {
        expected: Dimensions,
        actual: Dimensions,
    },
    IndexDataType(DataType),
}

impl Display for ImportError {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            ImportError::Gltf(error) => Display::fmt(error, f),
            ImportError::Io(error) => Display::fmt(error, f),
            ImportError::InvalidScheme(error) => Display::fmt(error, f),
            ImportError::UnsupportedVersion(version) => {
                write!(f, "Unsupported asset version {}", version)
            }
            ImportError::ResourceNotFound(uri) => write!(f, "Resource {} not found", uri),
            ImportError::MissingBinaryChunk => {
                write!(f, "Buffer refers to a binary chunk the file does not have")
            }
            ImportError::MissingBuffer(index) => write!(f, "Buffer #{} has no data", index),
            ImportError::AccessorBounds {
                accessor,
                end,
                length,
            } => write!(
                f,
                "Accessor #{} reads up to byte {} of a {} byte buffer",
                accessor, end, length
            ),
            ImportError::AccessorStride {
                accessor,
                stride,
                element_size,
            } => write!(
                f,
                "Accessor #{} has stride {} smaller than its {} byte elements",
                accessor, stride, element_size
            ),
            ImportError::AccessorDataType { expected, actual } => {
                write!(
                    f,
                    "Bad accessor data type: expected {:?}, but got {:?}",
                    expected, actual
                )
            }
            ImportError::AccessorDimensions { expected, actual } => {
                write!(
                    f,
                    "Bad accessor dimensions: expected {:?}, but got {:?}",
                    expected, actual
                )
            }
            ImportError::IndexDataType(actual) => {
                write!(f, "Data type {:?} is not valid index storage", actual)
            }
        }
    }
}

impl From<gltf::Error> for ImportError {
    fn from(value: gltf::Error) -> Self {
        Self::Gltf(value)
    }
}

impl From<io::Error> for ImportError {
    fn from(value: io::Error) -> Self {
        Self::Io(value)
    }
}

impl From<SchemeError> for ImportError {
    fn from(value: SchemeError) -> Self {
        Self::InvalidScheme(value)
    }
}

impl Error for ImportError {}
