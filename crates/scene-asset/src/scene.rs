use crate::{
    animation::Animation, camera::Camera, material::Material, mesh::Mesh, node::Node,
    texture::Texture,
};

/// A fully imported scene. The scene owns every output entity; inputs
/// are referenced nowhere.
///
/// Cross references are dense indices: meshes name their material,
/// nodes name their meshes (and each other), animation channels name
/// nodes by name. The last material is always the default material for
/// primitives that had none.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Scene {
    pub materials: Vec<Material>,
    pub meshes: Vec<Mesh>,
    pub textures: Vec<Texture>,
    pub cameras: Vec<Camera>,
    /// Node arena; `root` indexes into it.
    pub nodes: Vec<Node>,
    pub root: Option<usize>,
    pub animations: Vec<Animation>,
    /// Set when the import produced no meshes at all.
    pub incomplete: bool,
}

impl Scene {
    pub fn root_node(&self) -> Option<&Node> {
        self.root.map(|index| &self.nodes[index])
    }
}
