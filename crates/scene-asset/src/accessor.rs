//! Typed extraction of accessor data from raw buffers.
//!
//! Accessors describe strided, typed views over binary buffers. The
//! functions here copy accessor elements into freshly allocated
//! contiguous arrays owned by the caller; nothing retains pointers into
//! the source buffers, so the extracted data can be moved straight into
//! output entities.

use gltf::{
    accessor::{DataType, Dimensions},
    Accessor,
};

use crate::error::ImportError;

pub(crate) fn component_size(data_type: DataType) -> usize {
    match data_type {
        DataType::I8 | DataType::U8 => 1,
        DataType::I16 | DataType::U16 => 2,
        DataType::U32 | DataType::F32 => 4,
    }
}

pub(crate) fn component_count(dimensions: Dimensions) -> usize {
    match dimensions {
        Dimensions::Scalar => 1,
        Dimensions::Vec2 => 2,
        Dimensions::Vec3 => 3,
        Dimensions::Vec4 => 4,
        Dimensions::Mat2 => 4,
        Dimensions::Mat3 => 9,
        Dimensions::Mat4 => 16,
    }
}

/// Rejects accessors whose component type or dimensions disagree with
/// what the caller is about to decode.
pub fn check(
    accessor: &Accessor,
    data_type: DataType,
    dimensions: Dimensions,
) -> Result<(), ImportError> {
    let actual_data_type = accessor.data_type();
    if actual_data_type != data_type {
        return Err(ImportError::AccessorDataType {
            expected: data_type,
            actual: actual_data_type,
        });
    }

    let actual_dimensions = accessor.dimensions();
    if actual_dimensions != dimensions {
        return Err(ImportError::AccessorDimensions {
            expected: dimensions,
            actual: actual_dimensions,
        });
    }

    Ok(())
}

/// Copies the accessor's elements into one contiguous byte vector,
/// dropping any inter-element padding the buffer view interleaves.
fn extract_bytes(buffers: &[Vec<u8>], accessor: &Accessor) -> Result<Vec<u8>, ImportError> {
    let element_size =
        component_size(accessor.data_type()) * component_count(accessor.dimensions());
    let count = accessor.count();

    // Accessors without a buffer view read as zeroes.
    let Some(view) = accessor.view() else {
        return Ok(vec![0; count * element_size]);
    };

    let buffer = buffers
        .get(view.buffer().index())
        .ok_or(ImportError::MissingBuffer(view.buffer().index()))?;
    let offset = view.offset() + accessor.offset();
    let stride = view.stride().unwrap_or(element_size);
    if stride < element_size {
        return Err(ImportError::AccessorStride {
            accessor: accessor.index(),
            stride,
            element_size,
        });
    }
    if count == 0 {
        return Ok(Vec::new());
    }

    let end = offset + (count - 1) * stride + element_size;
    if end > buffer.len() {
        return Err(ImportError::AccessorBounds {
            accessor: accessor.index(),
            end,
            length: buffer.len(),
        });
    }

    if stride == element_size {
        // Tightly packed, one block copy.
        return Ok(buffer[offset..end].to_vec());
    }

    let mut data = Vec::with_capacity(count * element_size);
    for i in 0..count {
        let start = offset + i * stride;
        data.extend_from_slice(&buffer[start..start + element_size]);
    }
    Ok(data)
}

/// Extracts an `F32` accessor as a flat component stream: an accessor of
/// `count` VEC3 elements yields `3 * count` floats.
pub fn extract_f32(buffers: &[Vec<u8>], accessor: &Accessor) -> Result<Vec<f32>, ImportError> {
    if accessor.data_type() != DataType::F32 {
        return Err(ImportError::AccessorDataType {
            expected: DataType::F32,
            actual: accessor.data_type(),
        });
    }
    let data = extract_bytes(buffers, accessor)?;
    Ok(data
        .chunks_exact(4)
        .map(|chunk| f32::from_le_bytes(chunk.try_into().unwrap()))
        .collect())
}

pub fn extract_u8(buffers: &[Vec<u8>], accessor: &Accessor) -> Result<Vec<u8>, ImportError> {
    if accessor.data_type() != DataType::U8 {
        return Err(ImportError::AccessorDataType {
            expected: DataType::U8,
            actual: accessor.data_type(),
        });
    }
    extract_bytes(buffers, accessor)
}

pub fn extract_u16(buffers: &[Vec<u8>], accessor: &Accessor) -> Result<Vec<u16>, ImportError> {
    if accessor.data_type() != DataType::U16 {
        return Err(ImportError::AccessorDataType {
            expected: DataType::U16,
            actual: accessor.data_type(),
        });
    }
    let data = extract_bytes(buffers, accessor)?;
    Ok(data
        .chunks_exact(2)
        .map(|chunk| u16::from_le_bytes(chunk.try_into().unwrap()))
        .collect())
}

pub fn extract_u32(buffers: &[Vec<u8>], accessor: &Accessor) -> Result<Vec<u32>, ImportError> {
    if accessor.data_type() != DataType::U32 {
        return Err(ImportError::AccessorDataType {
            expected: DataType::U32,
            actual: accessor.data_type(),
        });
    }
    let data = extract_bytes(buffers, accessor)?;
    Ok(data
        .chunks_exact(4)
        .map(|chunk| u32::from_le_bytes(chunk.try_into().unwrap()))
        .collect())
}

/// Extracts a component stream as `f32`, mapping normalized integer
/// storage onto the unit range (signed types clamp at `-1.0`).
pub fn extract_normalized(
    buffers: &[Vec<u8>],
    accessor: &Accessor,
) -> Result<Vec<f32>, ImportError> {
    match accessor.data_type() {
        DataType::F32 => extract_f32(buffers, accessor),
        DataType::U8 => Ok(extract_u8(buffers, accessor)?
            .into_iter()
            .map(|value| value as f32 / u8::MAX as f32)
            .collect()),
        DataType::U16 => Ok(extract_u16(buffers, accessor)?
            .into_iter()
            .map(|value| value as f32 / u16::MAX as f32)
            .collect()),
        DataType::U32 => Ok(extract_u32(buffers, accessor)?
            .into_iter()
            .map(|value| value as f32 / u32::MAX as f32)
            .collect()),
        DataType::I8 => Ok(extract_bytes(buffers, accessor)?
            .into_iter()
            .map(|value| (value as i8 as f32 / i8::MAX as f32).max(-1.0))
            .collect()),
        DataType::I16 => Ok(extract_bytes(buffers, accessor)?
            .chunks_exact(2)
            .map(|chunk| {
                let value = i16::from_le_bytes(chunk.try_into().unwrap());
                (value as f32 / i16::MAX as f32).max(-1.0)
            })
            .collect()),
    }
}

/// Reads an index accessor as `u32` regardless of the stored component
/// width. Signed and float component types are not valid index storage
/// and are rejected.
#[derive(Debug)]
pub enum IndexReader {
    U8(Vec<u8>),
    U16(Vec<u16>),
    U32(Vec<u32>),
}

impl IndexReader {
    pub fn new(buffers: &[Vec<u8>], accessor: &Accessor) -> Result<Self, ImportError> {
        if accessor.dimensions() != Dimensions::Scalar {
            return Err(ImportError::AccessorDimensions {
                expected: Dimensions::Scalar,
                actual: accessor.dimensions(),
            });
        }
        match accessor.data_type() {
            DataType::U8 => Ok(Self::U8(extract_u8(buffers, accessor)?)),
            DataType::U16 => Ok(Self::U16(extract_u16(buffers, accessor)?)),
            DataType::U32 => Ok(Self::U32(extract_u32(buffers, accessor)?)),
            other => Err(ImportError::IndexDataType(other)),
        }
    }

    pub fn len(&self) -> usize {
        match self {
            Self::U8(data) => data.len(),
            Self::U16(data) => data.len(),
            Self::U32(data) => data.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn get(&self, index: usize) -> u32 {
        match self {
            Self::U8(data) => data[index] as u32,
            Self::U16(data) => data[index] as u32,
            Self::U32(data) => data[index],
        }
    }
}
