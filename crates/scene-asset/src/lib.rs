//! Normalized scene-graph assets for a 3D asset pipeline.
//!
//! This library defines a flat, renderer-agnostic scene representation:
//! materials, meshes with explicit face lists, embedded textures, cameras,
//! a node hierarchy with local transforms, skinning data and keyframe
//! animations. The `loader` module builds such scenes from glTF 2.0
//! assets, both the `.gltf` text form and the `.glb` binary container.
//!
pub mod accessor;
pub mod animation;
pub mod camera;
pub mod error;
/// Scene loaders and the I/O collaborator they read through.
pub mod loader;
pub mod material;
pub mod mesh;
pub mod node;
pub mod scene;
pub mod texture;
