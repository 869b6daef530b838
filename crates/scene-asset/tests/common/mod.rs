//! Helpers for assembling tiny glTF payloads in memory.
#![allow(dead_code)]

use scene_asset::{loader::gltf::read_slice, scene::Scene};

pub fn f32_bytes(values: &[f32]) -> Vec<u8> {
    values.iter().flat_map(|value| value.to_le_bytes()).collect()
}

pub fn u16_bytes(values: &[u16]) -> Vec<u8> {
    values.iter().flat_map(|value| value.to_le_bytes()).collect()
}

/// Wraps a JSON document and a binary chunk into a GLB container.
pub fn glb(json: &str, bin: &[u8]) -> Vec<u8> {
    let mut json = json.as_bytes().to_vec();
    while json.len() % 4 != 0 {
        json.push(b' ');
    }
    let mut bin = bin.to_vec();
    while bin.len() % 4 != 0 {
        bin.push(0);
    }

    let mut length = 12 + 8 + json.len();
    if !bin.is_empty() {
        length += 8 + bin.len();
    }

    let mut data = Vec::with_capacity(length);
    data.extend_from_slice(b"glTF");
    data.extend_from_slice(&2u32.to_le_bytes());
    data.extend_from_slice(&(length as u32).to_le_bytes());
    data.extend_from_slice(&(json.len() as u32).to_le_bytes());
    data.extend_from_slice(b"JSON");
    data.extend_from_slice(&json);
    if !bin.is_empty() {
        data.extend_from_slice(&(bin.len() as u32).to_le_bytes());
        data.extend_from_slice(b"BIN\0");
        data.extend_from_slice(&bin);
    }
    data
}

pub fn import_glb(json: &str, bin: &[u8]) -> Scene {
    read_slice(&glb(json, bin)).expect("import failed")
}

pub fn import_json(json: &str) -> Scene {
    read_slice(json.as_bytes()).expect("import failed")
}
