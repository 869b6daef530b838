use std::{fs, io, path::Path};

use glam::Mat4;

pub mod gltf;

/// Byte access for files an asset refers to (external buffers and
/// images). Implementations decide how paths resolve; the importer only
/// ever asks for whole files.
pub trait IoSystem {
    fn read(&mut self, path: &Path) -> io::Result<Vec<u8>>;
}

/// Reads referenced files straight from the file system.
#[derive(Debug, Default)]
pub struct FileSystem;

impl IoSystem for FileSystem {
    fn read(&mut self, path: &Path) -> io::Result<Vec<u8>> {
        fs::read(path)
    }
}

#[inline]
pub(crate) fn chunk_vec3<T: Copy>(data: &[T]) -> Vec<[T; 3]> {
    data.chunks_exact(3)
        .map(|item| item.try_into().unwrap())
        .collect()
}

#[inline]
pub(crate) fn chunk_vec4<T: Copy>(data: &[T]) -> Vec<[T; 4]> {
    data.chunks_exact(4)
        .map(|item| item.try_into().unwrap())
        .collect()
}

#[inline]
pub(crate) fn chunk_mat4(data: &[f32]) -> Vec<Mat4> {
    data.chunks_exact(16)
        .map(|item| {
            let array = item.try_into().unwrap();
            Mat4::from_cols_array(&array)
        })
        .collect()
}

#[inline]
pub(crate) fn pad_color_vec3_to_vec4(color: [f32; 3]) -> [f32; 4] {
    [color[0], color[1], color[2], 1.0]
}
