mod common;
use common::{f32_bytes, import_glb};

#[test]
fn texcoords_flip_v_to_a_bottom_left_origin() {
    let mut bin = f32_bytes(&[0.0, 0.0, 0.0, 1.0, 0.0, 0.0, 0.0, 1.0, 0.0]);
    bin.extend(f32_bytes(&[0.0, 0.0, 1.0, 0.25, 0.5, 1.0]));

    let json = r#"{
        "asset": {"version": "2.0"},
        "scene": 0,
        "scenes": [{"nodes": [0]}],
        "nodes": [{"mesh": 0}],
        "meshes": [{"primitives": [{"attributes": {"POSITION": 0, "TEXCOORD_0": 1}}]}],
        "accessors": [
            {"bufferView": 0, "componentType": 5126, "count": 3, "type": "VEC3"},
            {"bufferView": 1, "componentType": 5126, "count": 3, "type": "VEC2"}
        ],
        "bufferViews": [
            {"buffer": 0, "byteLength": 36},
            {"buffer": 0, "byteOffset": 36, "byteLength": 24}
        ],
        "buffers": [{"byteLength": 60}]
    }"#;
    let scene = import_glb(json, &bin);

    let mesh = &scene.meshes[0];
    assert_eq!(mesh.tex_coords.len(), 1);
    let channel = &mesh.tex_coords[0];
    assert_eq!(channel.components, 2);
    assert_eq!(channel.coords[0], [0.0, 1.0, 0.0]);
    assert_eq!(channel.coords[1], [1.0, 0.75, 0.0]);
    assert_eq!(channel.coords[2], [0.5, 0.0, 0.0]);
}

#[test]
fn bitangents_synthesize_from_normal_and_tangent() {
    let mut bin = f32_bytes(&[0.0, 0.0, 0.0, 1.0, 0.0, 0.0, 0.0, 1.0, 0.0]);
    bin.extend(f32_bytes(&[0.0, 0.0, 1.0, 0.0, 0.0, 1.0, 0.0, 0.0, 1.0]));
    bin.extend(f32_bytes(&[
        1.0, 0.0, 0.0, 1.0, //
        1.0, 0.0, 0.0, 1.0, //
        1.0, 0.0, 0.0, -1.0,
    ]));

    let json = r#"{
        "asset": {"version": "2.0"},
        "scene": 0,
        "scenes": [{"nodes": [0]}],
        "nodes": [{"mesh": 0}],
        "meshes": [{"primitives": [{"attributes": {
            "POSITION": 0, "NORMAL": 1, "TANGENT": 2
        }}]}],
        "accessors": [
            {"bufferView": 0, "componentType": 5126, "count": 3, "type": "VEC3"},
            {"bufferView": 1, "componentType": 5126, "count": 3, "type": "VEC3"},
            {"bufferView": 2, "componentType": 5126, "count": 3, "type": "VEC4"}
        ],
        "bufferViews": [
            {"buffer": 0, "byteLength": 36},
            {"buffer": 0, "byteOffset": 36, "byteLength": 36},
            {"buffer": 0, "byteOffset": 72, "byteLength": 48}
        ],
        "buffers": [{"byteLength": 120}]
    }"#;
    let scene = import_glb(json, &bin);

    let mesh = &scene.meshes[0];
    assert_eq!(mesh.normals, vec![[0.0, 0.0, 1.0]; 3]);
    assert_eq!(mesh.tangents, vec![[1.0, 0.0, 0.0]; 3]);
    // bitangent = (normal x tangent.xyz) * tangent.w
    assert_eq!(mesh.bitangents[0], [0.0, 1.0, 0.0]);
    assert_eq!(mesh.bitangents[1], [0.0, 1.0, 0.0]);
    assert_eq!(mesh.bitangents[2], [0.0, -1.0, 0.0]);
}

#[test]
fn morph_targets_apply_deltas_over_a_base_copy() {
    let mut bin = f32_bytes(&[0.0, 0.0, 0.0, 1.0, 0.0, 0.0, 0.0, 1.0, 0.0]);
    bin.extend(f32_bytes(&[0.0, 0.0, 1.0, 0.0, 0.0, 1.0, 0.0, 0.0, 1.0]));
    bin.extend(f32_bytes(&[
        1.0, 0.0, 0.0, 1.0, //
        1.0, 0.0, 0.0, 1.0, //
        1.0, 0.0, 0.0, 1.0,
    ]));
    // position deltas
    bin.extend(f32_bytes(&[0.0, 0.5, 0.0, 0.0, 0.5, 0.0, 0.0, 0.5, 0.0]));
    // normal deltas
    bin.extend(f32_bytes(&[0.0; 9]));
    // tangent deltas rotate the tangent onto +Y
    bin.extend(f32_bytes(&[-1.0, 1.0, 0.0, -1.0, 1.0, 0.0, -1.0, 1.0, 0.0]));

    let json = r#"{
        "asset": {"version": "2.0"},
        "scene": 0,
        "scenes": [{"nodes": [0]}],
        "nodes": [{"mesh": 0}],
        "meshes": [{
            "primitives": [{
                "attributes": {"POSITION": 0, "NORMAL": 1, "TANGENT": 2},
                "targets": [{"POSITION": 3, "NORMAL": 4, "TANGENT": 5}]
            }],
            "weights": [0.5]
        }],
        "accessors": [
            {"bufferView": 0, "componentType": 5126, "count": 3, "type": "VEC3"},
            {"bufferView": 1, "componentType": 5126, "count": 3, "type": "VEC3"},
            {"bufferView": 2, "componentType": 5126, "count": 3, "type": "VEC4"},
            {"bufferView": 3, "componentType": 5126, "count": 3, "type": "VEC3"},
            {"bufferView": 4, "componentType": 5126, "count": 3, "type": "VEC3"},
            {"bufferView": 5, "componentType": 5126, "count": 3, "type": "VEC3"}
        ],
        "bufferViews": [
            {"buffer": 0, "byteLength": 36},
            {"buffer": 0, "byteOffset": 36, "byteLength": 36},
            {"buffer": 0, "byteOffset": 72, "byteLength": 48},
            {"buffer": 0, "byteOffset": 120, "byteLength": 36},
            {"buffer": 0, "byteOffset": 156, "byteLength": 36},
            {"buffer": 0, "byteOffset": 192, "byteLength": 36}
        ],
        "buffers": [{"byteLength": 228}]
    }"#;
    let scene = import_glb(json, &bin);

    let mesh = &scene.meshes[0];
    assert_eq!(mesh.morph_targets.len(), 1);
    let target = &mesh.morph_targets[0];
    assert_eq!(target.weight, 0.5);

    // Deltas add onto the base copy.
    assert_eq!(target.positions[0], [0.0, 0.5, 0.0]);
    assert_eq!(target.positions[1], [1.0, 0.5, 0.0]);
    assert_eq!(target.normals, vec![[0.0, 0.0, 1.0]; 3]);

    // The tangent moved onto +Y, so the bitangent re-synthesizes to -X.
    assert_eq!(target.tangents[0], [0.0, 1.0, 0.0]);
    assert_eq!(target.bitangents[0], [-1.0, 0.0, 0.0]);

    // The base mesh is untouched.
    assert_eq!(mesh.positions[0], [0.0, 0.0, 0.0]);
    assert_eq!(mesh.bitangents[0], [0.0, 1.0, 0.0]);
}

#[test]
fn mismatched_color_streams_are_skipped() {
    let _ = env_logger::builder().is_test(true).try_init();

    let mut bin = f32_bytes(&[0.0, 0.0, 0.0, 1.0, 0.0, 0.0, 0.0, 1.0, 0.0]);
    // Two colors for three vertices.
    bin.extend(f32_bytes(&[1.0, 0.0, 0.0, 1.0, 0.0, 1.0, 0.0, 1.0]));

    let json = r#"{
        "asset": {"version": "2.0"},
        "scene": 0,
        "scenes": [{"nodes": [0]}],
        "nodes": [{"mesh": 0}],
        "meshes": [{"primitives": [{"attributes": {"POSITION": 0, "COLOR_0": 1}}]}],
        "accessors": [
            {"bufferView": 0, "componentType": 5126, "count": 3, "type": "VEC3"},
            {"bufferView": 1, "componentType": 5126, "count": 2, "type": "VEC4"}
        ],
        "bufferViews": [
            {"buffer": 0, "byteLength": 36},
            {"buffer": 0, "byteOffset": 36, "byteLength": 32}
        ],
        "buffers": [{"byteLength": 68}]
    }"#;
    let scene = import_glb(json, &bin);

    // The bad channel is dropped, the mesh itself survives.
    let mesh = &scene.meshes[0];
    assert!(mesh.colors.is_empty());
    assert_eq!(mesh.vertex_count(), 3);
    assert_eq!(mesh.faces.len(), 1);
}

#[test]
fn tangents_without_normals_are_ignored() {
    let mut bin = f32_bytes(&[0.0, 0.0, 0.0, 1.0, 0.0, 0.0, 0.0, 1.0, 0.0]);
    bin.extend(f32_bytes(&[
        1.0, 0.0, 0.0, 1.0, //
        1.0, 0.0, 0.0, 1.0, //
        1.0, 0.0, 0.0, 1.0,
    ]));

    let json = r#"{
        "asset": {"version": "2.0"},
        "scene": 0,
        "scenes": [{"nodes": [0]}],
        "nodes": [{"mesh": 0}],
        "meshes": [{"primitives": [{"attributes": {"POSITION": 0, "TANGENT": 1}}]}],
        "accessors": [
            {"bufferView": 0, "componentType": 5126, "count": 3, "type": "VEC3"},
            {"bufferView": 1, "componentType": 5126, "count": 3, "type": "VEC4"}
        ],
        "bufferViews": [
            {"buffer": 0, "byteLength": 36},
            {"buffer": 0, "byteOffset": 36, "byteLength": 48}
        ],
        "buffers": [{"byteLength": 84}]
    }"#;
    let scene = import_glb(json, &bin);

    let mesh = &scene.meshes[0];
    assert!(mesh.normals.is_empty());
    assert!(mesh.tangents.is_empty());
    assert!(mesh.bitangents.is_empty());
}
