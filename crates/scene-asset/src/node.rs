use glam::{Mat4, Quat, Vec3};

/// A translation–rotation–scale transform. Components a node omits stay
/// at their identity values.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DecomposedTransform {
    pub translation: Vec3,
    pub rotation: Quat,
    pub scale: Vec3,
}

impl Default for DecomposedTransform {
    fn default() -> Self {
        Self {
            translation: Vec3::ZERO,
            rotation: Quat::IDENTITY,
            scale: Vec3::ONE,
        }
    }
}

/// A node's local transform, kept in whichever form the asset stored.
/// Matrix and decomposed forms are mutually exclusive by construction.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum NodeTransform {
    Matrix(Mat4),
    Decomposed(DecomposedTransform),
}

impl Default for NodeTransform {
    fn default() -> Self {
        Self::Decomposed(DecomposedTransform::default())
    }
}

impl From<DecomposedTransform> for Mat4 {
    fn from(value: DecomposedTransform) -> Self {
        Mat4::from_translation(value.translation)
            * Mat4::from_quat(value.rotation)
            * Mat4::from_scale(value.scale)
    }
}

impl From<NodeTransform> for Mat4 {
    fn from(value: NodeTransform) -> Self {
        match value {
            NodeTransform::Matrix(matrix) => matrix,
            NodeTransform::Decomposed(decomposed) => decomposed.into(),
        }
    }
}

/// One node of the output hierarchy, stored in the scene's node arena.
///
/// `children` owns the subtree (as arena indices); `parent` is the
/// non-owning back edge, populated when the child is built. `meshes`
/// holds output-mesh slots, `camera` wiring happens by name on the
/// camera itself.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Node {
    pub name: String,
    pub transform: NodeTransform,
    pub parent: Option<usize>,
    pub children: Vec<usize>,
    pub meshes: Vec<usize>,
}

impl Node {
    /// The local transform as a matrix, composing decomposed forms as
    /// `T * R * S`.
    pub fn matrix(&self) -> Mat4 {
        self.transform.into()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decomposed_composes_translation_rotation_scale() {
        let transform = DecomposedTransform {
            translation: Vec3::new(1.0, 2.0, 3.0),
            rotation: Quat::from_rotation_z(std::f32::consts::FRAC_PI_2),
            scale: Vec3::splat(2.0),
        };
        let matrix = Mat4::from(transform);
        // A point on +X scales to 2, rotates onto +Y, then translates.
        let point = matrix.transform_point3(Vec3::X);
        assert!((point - Vec3::new(1.0, 4.0, 3.0)).length() < 1e-5);
    }

    #[test]
    fn default_transform_is_identity() {
        assert_eq!(Mat4::from(NodeTransform::default()), Mat4::IDENTITY);
    }
}
