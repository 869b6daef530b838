use glam::Mat4;

/// Vertex color sets beyond this are dropped.
pub const MAX_COLOR_SETS: usize = 8;
/// Texture coordinate sets beyond this are dropped.
pub const MAX_TEXCOORD_SETS: usize = 8;

/// The face arity a mesh was assembled with.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PrimitiveKind {
    Point,
    Line,
    Triangle,
}

/// One face. Every face of a mesh has the arity of the mesh's
/// [`PrimitiveKind`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Face {
    Point(u32),
    Line([u32; 2]),
    Triangle([u32; 3]),
}

impl Face {
    pub fn indices(&self) -> &[u32] {
        match self {
            Face::Point(index) => std::slice::from_ref(index),
            Face::Line(indices) => indices,
            Face::Triangle(indices) => indices,
        }
    }
}

/// One texture coordinate channel. Coordinates are stored with three
/// components; `components` records how many (2 or 3) the source
/// actually provided. The v coordinate is already flipped to a
/// bottom-left origin.
#[derive(Debug, Clone, PartialEq)]
pub struct TexCoordChannel {
    pub coords: Vec<[f32; 3]>,
    pub components: u32,
}

/// One vertex a bone influences, and by how much.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct VertexWeight {
    pub vertex_id: u32,
    pub weight: f32,
}

/// A skeleton bone bound to a mesh. `weights` always holds at least one
/// entry; bones that influence nothing carry a single zero weight.
#[derive(Debug, Clone, PartialEq)]
pub struct Bone {
    pub name: String,
    pub offset_matrix: Mat4,
    pub weights: Vec<VertexWeight>,
}

/// A morph target: a full copy of the base vertex data with the
/// target's deltas already applied, plus its static blend weight.
#[derive(Debug, Clone, PartialEq)]
pub struct MorphTarget {
    pub positions: Vec<[f32; 3]>,
    pub normals: Vec<[f32; 3]>,
    pub tangents: Vec<[f32; 3]>,
    pub bitangents: Vec<[f32; 3]>,
    pub weight: f32,
}

/// One output mesh: a single draw call's worth of geometry.
///
/// Empty attribute vectors mean the attribute is absent; present
/// vectors match `positions` in length. `material` always resolves,
/// falling back to the scene's trailing default material.
#[derive(Debug, Clone, PartialEq)]
pub struct Mesh {
    pub name: String,
    pub kind: PrimitiveKind,
    pub positions: Vec<[f32; 3]>,
    pub normals: Vec<[f32; 3]>,
    pub tangents: Vec<[f32; 3]>,
    pub bitangents: Vec<[f32; 3]>,
    pub colors: Vec<Vec<[f32; 4]>>,
    pub tex_coords: Vec<TexCoordChannel>,
    pub faces: Vec<Face>,
    pub material: usize,
    pub morph_targets: Vec<MorphTarget>,
    pub bones: Vec<Bone>,
}

impl Mesh {
    pub fn vertex_count(&self) -> usize {
        self.positions.len()
    }
}
