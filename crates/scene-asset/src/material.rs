/// How texture coordinates outside `[0, 1]` resolve.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum WrapMode {
    #[default]
    Wrap,
    Clamp,
    Mirror,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MagFilter {
    Nearest,
    Linear,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MinFilter {
    Nearest,
    Linear,
    NearestMipmapNearest,
    LinearMipmapNearest,
    NearestMipmapLinear,
    LinearMipmapLinear,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AlphaMode {
    #[default]
    Opaque,
    Mask,
    Blend,
}

/// The sampler bound to a texture reference. Filters are only present
/// when the asset sets them explicitly.
#[derive(Debug, Clone, PartialEq)]
pub struct SamplerBinding {
    pub name: Option<String>,
    pub index: usize,
    pub wrap_u: WrapMode,
    pub wrap_v: WrapMode,
    pub mag_filter: Option<MagFilter>,
    pub min_filter: Option<MinFilter>,
}

/// A material's reference to a texture.
///
/// `uri` is `*<slot>` for textures embedded in the scene (pointing at
/// [`crate::scene::Scene::textures`]) and the raw source URI for
/// external images, which the importer does not fetch. `scale` is the
/// normal-map scale and `strength` the occlusion strength; both stay
/// `None` on references that do not carry them.
#[derive(Debug, Clone, PartialEq)]
pub struct TextureRef {
    pub uri: String,
    pub tex_coord: u32,
    pub sampler: Option<SamplerBinding>,
    pub scale: Option<f32>,
    pub strength: Option<f32>,
}

/// A flat output material.
///
/// PBR inputs are kept twice where legacy consumers expect something
/// else: the base color lands in both `diffuse_color` and
/// `base_color_factor`, and roughness (or specular-glossiness
/// glossiness) is additionally projected onto the Phong-style
/// `shininess`. Consumers read whichever parameterization they
/// understand.
#[derive(Debug, Clone, PartialEq)]
pub struct Material {
    pub name: Option<String>,
    pub diffuse_color: [f32; 4],
    pub base_color_factor: [f32; 4],
    pub diffuse_texture: Option<TextureRef>,
    pub base_color_texture: Option<TextureRef>,
    pub metallic_roughness_texture: Option<TextureRef>,
    pub metallic_factor: f32,
    pub roughness_factor: f32,
    pub shininess: f32,
    pub normal_texture: Option<TextureRef>,
    pub lightmap_texture: Option<TextureRef>,
    pub emissive_texture: Option<TextureRef>,
    pub emissive_color: [f32; 4],
    pub two_sided: bool,
    pub alpha_mode: AlphaMode,
    pub alpha_cutoff: f32,
    /// `KHR_materials_pbrSpecularGlossiness` was present.
    pub specular_glossiness: bool,
    pub specular_color: Option<[f32; 4]>,
    pub glossiness_factor: Option<f32>,
    pub specular_glossiness_texture: Option<TextureRef>,
    /// `KHR_materials_unlit` was present.
    pub unlit: bool,
}

impl Default for Material {
    fn default() -> Self {
        Self {
            name: None,
            diffuse_color: [1.0, 1.0, 1.0, 1.0],
            base_color_factor: [1.0, 1.0, 1.0, 1.0],
            diffuse_texture: None,
            base_color_texture: None,
            metallic_roughness_texture: None,
            metallic_factor: 1.0,
            roughness_factor: 1.0,
            // (1 - roughness)^2 * 1000 with the default roughness of 1
            shininess: 0.0,
            normal_texture: None,
            lightmap_texture: None,
            emissive_texture: None,
            emissive_color: [0.0, 0.0, 0.0, 1.0],
            two_sided: false,
            alpha_mode: AlphaMode::Opaque,
            alpha_cutoff: 0.5,
            specular_glossiness: false,
            specular_color: None,
            glossiness_factor: None,
            specular_glossiness_texture: None,
            unlit: false,
        }
    }
}
