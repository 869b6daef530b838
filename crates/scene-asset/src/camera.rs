use std::f32::consts::FRAC_PI_4;

/// An output camera.
///
/// Cameras look down `-Z` in their own space; orientation and position
/// come from the node that binds the camera, which also donates its
/// name. Only perspective projections are materialized; a camera slot
/// whose source was orthographic keeps these defaults.
#[derive(Debug, Clone, PartialEq)]
pub struct Camera {
    pub name: String,
    pub look_at: [f32; 3],
    pub aspect_ratio: f32,
    pub horizontal_fov: f32,
    pub near_clip: f32,
    pub far_clip: f32,
}

impl Default for Camera {
    fn default() -> Self {
        Self {
            name: String::new(),
            look_at: [0.0, 0.0, 1.0],
            aspect_ratio: 0.0,
            horizontal_fov: FRAC_PI_4,
            near_clip: 0.1,
            far_clip: 1000.0,
        }
    }
}
