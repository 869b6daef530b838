//! glTF 2.0 importer.
//!
//! Builds a [`Scene`] from a glTF asset, either the `.gltf` text form
//! with sibling binary files or the single-file `.glb` container. The
//! import runs six phases in a fixed order (textures, materials,
//! meshes, cameras, nodes, animations), and later phases refer to
//! earlier output only by index, so each phase can assume everything
//! before it is complete.

use std::{
    collections::BTreeMap,
    io,
    path::Path,
};

use glam::{Mat4, Quat, Vec3};
use gltf::{
    accessor::{DataType, Dimensions},
    animation::Property,
    camera::Projection,
    mesh::Mode,
    scene::Transform,
    texture::{MagFilter as GltfMagFilter, MinFilter as GltfMinFilter, WrappingMode},
    Accessor, Document, Gltf, Primitive, Semantic, Skin,
};
use log::warn;

use crate::{
    accessor::{self, IndexReader},
    animation::{Animation, NodeChannel, QuatKey, VectorKey},
    camera::Camera,
    error::ImportError,
    loader::{chunk_mat4, chunk_vec3, chunk_vec4, pad_color_vec3_to_vec4, IoSystem},
    material::{
        AlphaMode, MagFilter, Material, MinFilter, SamplerBinding, TextureRef, WrapMode,
    },
    mesh::{
        Bone, Face, Mesh, MorphTarget, PrimitiveKind, TexCoordChannel, VertexWeight,
        MAX_COLOR_SETS, MAX_TEXCOORD_SETS,
    },
    node::{DecomposedTransform, Node, NodeTransform},
    scene::Scene,
    texture::Texture,
};

use scheme::Scheme;

pub mod scheme;

const MILLISECONDS_FROM_SECONDS: f64 = 1000.0;

/// Returns true when `path` names an asset this importer understands: a
/// `.gltf` or `.glb` file whose header parses and whose asset version
/// begins with `2`.
pub fn can_read<P: AsRef<Path>, I: IoSystem>(path: P, io: &mut I) -> bool {
    let path = path.as_ref();
    let extension = path
        .extension()
        .and_then(|extension| extension.to_str())
        .map(str::to_ascii_lowercase);
    if !matches!(extension.as_deref(), Some("gltf") | Some("glb")) {
        return false;
    }
    let Ok(bytes) = io.read(path) else {
        return false;
    };
    match Gltf::from_slice(&bytes) {
        Ok(gltf) => gltf.document.into_json().asset.version.starts_with('2'),
        Err(_) => false,
    }
}

/// Imports the asset at `path`. External buffers and images resolve
/// through `io`, relative to the asset's directory.
pub fn read<P: AsRef<Path>, I: IoSystem>(path: P, io: &mut I) -> Result<Scene, ImportError> {
    let path = path.as_ref();
    let bytes = io.read(path)?;
    import(&bytes, path.parent(), io)
}

/// Imports an in-memory `.gltf` or `.glb` payload. There is no file
/// system in this mode; references to external files fail with
/// [`ImportError::ResourceNotFound`].
pub fn read_slice(bytes: &[u8]) -> Result<Scene, ImportError> {
    import(bytes, None, &mut NullIo)
}

struct NullIo;

impl IoSystem for NullIo {
    fn read(&mut self, path: &Path) -> io::Result<Vec<u8>> {
        Err(io::Error::new(
            io::ErrorKind::NotFound,
            format!("no I/O system to read {}", path.display()),
        ))
    }
}

fn import<I: IoSystem>(
    bytes: &[u8],
    base: Option<&Path>,
    io: &mut I,
) -> Result<Scene, ImportError> {
    let gltf = Gltf::from_slice(bytes)?;
    let blob = gltf.blob;

    let json = gltf.document.into_json();
    if !json.asset.version.starts_with('2') {
        return Err(ImportError::UnsupportedVersion(json.asset.version));
    }
    let document = Document::from_json(json)?;

    let buffers = load_buffers(&document, blob, base, io)?;
    GltfImporter::new(&document, &buffers).import()
}

fn load_buffers<I: IoSystem>(
    document: &Document,
    mut blob: Option<Vec<u8>>,
    base: Option<&Path>,
    io: &mut I,
) -> Result<Vec<Vec<u8>>, ImportError> {
    let mut buffers = Vec::new();
    for buffer in document.buffers() {
        let mut data = match buffer.source() {
            gltf::buffer::Source::Bin => blob.take().ok_or(ImportError::MissingBinaryChunk)?,
            gltf::buffer::Source::Uri(uri) => Scheme::parse(uri)?.read(base, io)?,
        };
        // Pad to four bytes so accessors at the tail stay in bounds.
        while data.len() % 4 != 0 {
            data.push(0);
        }
        buffers.push(data);
    }
    Ok(buffers)
}

struct GltfImporter<'a> {
    document: &'a Document,
    buffers: &'a [Vec<u8>],
    textures: Vec<Texture>,
    /// Image index to output texture slot, `None` for external images.
    embedded: Vec<Option<usize>>,
    materials: Vec<Material>,
    meshes: Vec<Mesh>,
    /// `mesh_offsets[m]` is the first output-mesh slot of input mesh
    /// `m`, with a trailing sentinel holding the total.
    mesh_offsets: Vec<usize>,
    cameras: Vec<Camera>,
    nodes: Vec<Node>,
    root: Option<usize>,
    animations: Vec<Animation>,
}

impl<'a> GltfImporter<'a> {
    fn new(document: &'a Document, buffers: &'a [Vec<u8>]) -> Self {
        Self {
            document,
            buffers,
            textures: Vec::new(),
            embedded: Vec::new(),
            materials: Vec::new(),
            meshes: Vec::new(),
            mesh_offsets: Vec::new(),
            cameras: Vec::new(),
            nodes: Vec::new(),
            root: None,
            animations: Vec::new(),
        }
    }

    fn import(mut self) -> Result<Scene, ImportError> {
        self.import_textures();
        self.import_materials();
        self.import_meshes()?;
        self.import_cameras();
        self.import_nodes()?;
        self.import_animations()?;

        let incomplete = self.meshes.is_empty();
        Ok(Scene {
            materials: self.materials,
            meshes: self.meshes,
            textures: self.textures,
            cameras: self.cameras,
            nodes: self.nodes,
            root: self.root,
            animations: self.animations,
            incomplete,
        })
    }

    /// Moves every embedded image payload into an output texture slot.
    /// External images stay behind as URIs on the materials that use
    /// them; they are not fetched.
    fn import_textures(&mut self) {
        let document = self.document;
        self.embedded = vec![None; document.images().count()];
        for image in document.images() {
            let payload = match image.source() {
                gltf::image::Source::View { view, mime_type } => {
                    let Some(buffer) = self.buffers.get(view.buffer().index()) else {
                        warn!(
                            "Image #{} refers to missing buffer #{}",
                            image.index(),
                            view.buffer().index()
                        );
                        continue;
                    };
                    let start = view.offset();
                    let end = start + view.length();
                    if end > buffer.len() {
                        warn!("Image #{} is out of bounds of its buffer", image.index());
                        continue;
                    }
                    Some((buffer[start..end].to_vec(), Some(mime_type)))
                }
                gltf::image::Source::Uri { uri, mime_type } => match Scheme::parse(uri) {
                    Ok(Scheme::Data(data_mime, data)) => Some((data, mime_type.or(data_mime))),
                    Ok(_) => None,
                    Err(error) => {
                        warn!("Image #{}: {}", image.index(), error);
                        None
                    }
                },
            };
            if let Some((data, mime_type)) = payload {
                self.embedded[image.index()] = Some(self.textures.len());
                self.textures.push(Texture::new(data, mime_type));
            }
        }
    }

    fn import_materials(&mut self) {
        let document = self.document;
        for material in document.materials() {
            let converted = self.convert_material(&material);
            self.materials.push(converted);
        }
        // Trailing default material for primitives without one.
        self.materials.push(Material::default());
    }

    fn convert_material(&self, material: &gltf::Material) -> Material {
        let pbr = material.pbr_metallic_roughness();

        let roughness_as_shininess = {
            let inverse = 1.0 - pbr.roughness_factor();
            inverse * inverse * 1000.0
        };

        let mut converted = Material {
            name: material.name().map(str::to_string),
            diffuse_color: pbr.base_color_factor(),
            base_color_factor: pbr.base_color_factor(),
            diffuse_texture: pbr
                .base_color_texture()
                .map(|info| self.texture_ref(info.texture(), info.tex_coord())),
            base_color_texture: pbr
                .base_color_texture()
                .map(|info| self.texture_ref(info.texture(), info.tex_coord())),
            metallic_roughness_texture: pbr
                .metallic_roughness_texture()
                .map(|info| self.texture_ref(info.texture(), info.tex_coord())),
            metallic_factor: pbr.metallic_factor(),
            roughness_factor: pbr.roughness_factor(),
            shininess: roughness_as_shininess,
            normal_texture: material.normal_texture().map(|info| {
                let mut reference = self.texture_ref(info.texture(), info.tex_coord());
                reference.scale = Some(info.scale());
                reference
            }),
            lightmap_texture: material.occlusion_texture().map(|info| {
                let mut reference = self.texture_ref(info.texture(), info.tex_coord());
                reference.strength = Some(info.strength());
                reference
            }),
            emissive_texture: material
                .emissive_texture()
                .map(|info| self.texture_ref(info.texture(), info.tex_coord())),
            emissive_color: pad_color_vec3_to_vec4(material.emissive_factor()),
            two_sided: material.double_sided(),
            alpha_mode: match material.alpha_mode() {
                gltf::material::AlphaMode::Opaque => AlphaMode::Opaque,
                gltf::material::AlphaMode::Mask => AlphaMode::Mask,
                gltf::material::AlphaMode::Blend => AlphaMode::Blend,
            },
            alpha_cutoff: material.alpha_cutoff().unwrap_or(0.5),
            specular_glossiness: false,
            specular_color: None,
            glossiness_factor: None,
            specular_glossiness_texture: None,
            unlit: material.unlit(),
        };

        if let Some(specular_glossiness) = material.pbr_specular_glossiness() {
            converted.specular_glossiness = true;
            converted.diffuse_color = specular_glossiness.diffuse_factor();
            converted.specular_color = Some(pad_color_vec3_to_vec4(
                specular_glossiness.specular_factor(),
            ));
            converted.shininess = specular_glossiness.glossiness_factor() * 1000.0;
            converted.glossiness_factor = Some(specular_glossiness.glossiness_factor());
            if let Some(info) = specular_glossiness.diffuse_texture() {
                converted.diffuse_texture =
                    Some(self.texture_ref(info.texture(), info.tex_coord()));
            }
            converted.specular_glossiness_texture = specular_glossiness
                .specular_glossiness_texture()
                .map(|info| self.texture_ref(info.texture(), info.tex_coord()));
        }

        converted
    }

    fn texture_ref(&self, texture: gltf::Texture, tex_coord: u32) -> TextureRef {
        let image = texture.source();
        let uri = match self.embedded.get(image.index()).copied().flatten() {
            Some(slot) => format!("*{}", slot),
            None => match image.source() {
                gltf::image::Source::Uri { uri, .. } => uri.to_string(),
                gltf::image::Source::View { .. } => String::new(),
            },
        };

        let sampler = texture.sampler();
        let sampler = sampler.index().map(|index| SamplerBinding {
            name: sampler.name().map(str::to_string),
            index,
            wrap_u: wrap_mode(sampler.wrap_s()),
            wrap_v: wrap_mode(sampler.wrap_t()),
            mag_filter: sampler.mag_filter().map(|filter| match filter {
                GltfMagFilter::Nearest => MagFilter::Nearest,
                GltfMagFilter::Linear => MagFilter::Linear,
            }),
            min_filter: sampler.min_filter().map(|filter| match filter {
                GltfMinFilter::Nearest => MinFilter::Nearest,
                GltfMinFilter::Linear => MinFilter::Linear,
                GltfMinFilter::NearestMipmapNearest => MinFilter::NearestMipmapNearest,
                GltfMinFilter::LinearMipmapNearest => MinFilter::LinearMipmapNearest,
                GltfMinFilter::NearestMipmapLinear => MinFilter::NearestMipmapLinear,
                GltfMinFilter::LinearMipmapLinear => MinFilter::LinearMipmapLinear,
            }),
        });

        TextureRef {
            uri,
            tex_coord,
            sampler,
            scale: None,
            strength: None,
        }
    }

    fn import_meshes(&mut self) -> Result<(), ImportError> {
        let document = self.document;
        // The default material trails the imported ones.
        let default_material = self.materials.len() - 1;

        let mut offset = 0;
        for mesh in document.meshes() {
            self.mesh_offsets.push(offset);
            let primitives: Vec<Primitive> = mesh.primitives().collect();
            offset += primitives.len();
            for (index, primitive) in primitives.iter().enumerate() {
                let converted = self.convert_primitive(
                    &mesh,
                    primitive,
                    index,
                    primitives.len(),
                    default_material,
                )?;
                self.meshes.push(converted);
            }
        }
        self.mesh_offsets.push(offset);
        Ok(())
    }

    fn convert_primitive(
        &self,
        mesh: &gltf::Mesh,
        primitive: &Primitive,
        primitive_index: usize,
        primitive_count: usize,
        default_material: usize,
    ) -> Result<Mesh, ImportError> {
        let buffers = self.buffers;

        let base_name = match mesh.name() {
            Some(name) if !name.is_empty() => name.to_string(),
            _ => format!("mesh_{}", mesh.index()),
        };
        let name = if primitive_count > 1 {
            format!("{}-{}", base_name, primitive_index)
        } else {
            base_name
        };

        let kind = match primitive.mode() {
            Mode::Points => PrimitiveKind::Point,
            Mode::Lines | Mode::LineLoop | Mode::LineStrip => PrimitiveKind::Line,
            Mode::Triangles | Mode::TriangleStrip | Mode::TriangleFan => PrimitiveKind::Triangle,
        };

        let positions = match primitive.get(&Semantic::Positions) {
            Some(accessor) => {
                accessor::check(&accessor, DataType::F32, Dimensions::Vec3)?;
                chunk_vec3(&accessor::extract_f32(buffers, &accessor)?)
            }
            None => Vec::new(),
        };
        let vertex_count = positions.len();

        let normals = match primitive.get(&Semantic::Normals) {
            Some(accessor) => {
                accessor::check(&accessor, DataType::F32, Dimensions::Vec3)?;
                chunk_vec3(&accessor::extract_f32(buffers, &accessor)?)
            }
            None => Vec::new(),
        };

        // Tangents only make sense alongside normals; the bitangent is
        // derived from both.
        let mut tangent4: Vec<[f32; 4]> = Vec::new();
        let mut tangents = Vec::new();
        let mut bitangents = Vec::new();
        if !normals.is_empty() {
            if let Some(accessor) = primitive.get(&Semantic::Tangents) {
                accessor::check(&accessor, DataType::F32, Dimensions::Vec4)?;
                tangent4 = chunk_vec4(&accessor::extract_f32(buffers, &accessor)?);
                for (normal, tangent) in normals.iter().zip(&tangent4) {
                    tangents.push([tangent[0], tangent[1], tangent[2]]);
                    bitangents.push(bitangent(*normal, *tangent));
                }
            }
        }

        let mut colors = Vec::new();
        for set in 0..MAX_COLOR_SETS as u32 {
            let Some(accessor) = primitive.get(&Semantic::Colors(set)) else {
                break;
            };
            if accessor.count() != vertex_count {
                warn!(
                    "Color stream size in mesh \"{}\" does not match the vertex count",
                    name
                );
                continue;
            }
            let data = accessor::extract_normalized(buffers, &accessor)?;
            let channel = match accessor.dimensions() {
                Dimensions::Vec3 => chunk_vec3(&data)
                    .into_iter()
                    .map(pad_color_vec3_to_vec4)
                    .collect(),
                Dimensions::Vec4 => chunk_vec4(&data),
                other => {
                    warn!(
                        "Color stream in mesh \"{}\" has unsupported dimensions {:?}",
                        name, other
                    );
                    continue;
                }
            };
            colors.push(channel);
        }

        let mut tex_coords = Vec::new();
        for set in 0..MAX_TEXCOORD_SETS as u32 {
            let Some(accessor) = primitive.get(&Semantic::TexCoords(set)) else {
                break;
            };
            if accessor.count() != vertex_count {
                warn!(
                    "Texcoord stream size in mesh \"{}\" does not match the vertex count",
                    name
                );
                continue;
            }
            let components = match accessor.dimensions() {
                Dimensions::Vec2 => 2,
                Dimensions::Vec3 => 3,
                other => {
                    warn!(
                        "Texcoord stream in mesh \"{}\" has unsupported dimensions {:?}",
                        name, other
                    );
                    continue;
                }
            };
            let data = accessor::extract_normalized(buffers, &accessor)?;
            // Flip v: glTF puts the origin top-left, the output bottom-left.
            let coords = if components == 2 {
                data.chunks_exact(2)
                    .map(|uv| [uv[0], 1.0 - uv[1], 0.0])
                    .collect()
            } else {
                data.chunks_exact(3)
                    .map(|uvw| [uvw[0], 1.0 - uvw[1], uvw[2]])
                    .collect()
            };
            tex_coords.push(TexCoordChannel { coords, components });
        }

        let static_weights = mesh.weights().unwrap_or(&[]);
        let mut morph_targets = Vec::new();
        for (target_index, target) in primitive.morph_targets().enumerate() {
            let mut animated = MorphTarget {
                positions: positions.clone(),
                normals: normals.clone(),
                tangents: tangents.clone(),
                bitangents: bitangents.clone(),
                weight: static_weights.get(target_index).copied().unwrap_or(0.0),
            };

            if let Some(accessor) = target.positions() {
                accessor::check(&accessor, DataType::F32, Dimensions::Vec3)?;
                let deltas = chunk_vec3(&accessor::extract_f32(buffers, &accessor)?);
                for (value, delta) in animated.positions.iter_mut().zip(&deltas) {
                    add3(value, delta);
                }
            }
            if let Some(accessor) = target.normals() {
                accessor::check(&accessor, DataType::F32, Dimensions::Vec3)?;
                let deltas = chunk_vec3(&accessor::extract_f32(buffers, &accessor)?);
                for (value, delta) in animated.normals.iter_mut().zip(&deltas) {
                    add3(value, delta);
                }
            }
            if let Some(accessor) = target.tangents() {
                if tangent4.is_empty() {
                    warn!(
                        "Morph target tangents without base tangents in mesh \"{}\"",
                        name
                    );
                } else {
                    accessor::check(&accessor, DataType::F32, Dimensions::Vec3)?;
                    let deltas = chunk_vec3(&accessor::extract_f32(buffers, &accessor)?);
                    let mut shifted = tangent4.clone();
                    for vertex in 0..deltas.len().min(animated.tangents.len()) {
                        let delta = deltas[vertex];
                        shifted[vertex][0] += delta[0];
                        shifted[vertex][1] += delta[1];
                        shifted[vertex][2] += delta[2];
                        let tangent = shifted[vertex];
                        animated.tangents[vertex] = [tangent[0], tangent[1], tangent[2]];
                        animated.bitangents[vertex] =
                            bitangent(animated.normals[vertex], tangent);
                    }
                }
            }

            morph_targets.push(animated);
        }

        let faces = match primitive.indices() {
            Some(accessor) => {
                let indices = IndexReader::new(buffers, &accessor)?;
                build_faces(primitive.mode(), indices.len(), |i| indices.get(i))
            }
            None => build_faces(primitive.mode(), vertex_count, |i| i as u32),
        };
        debug_assert!(
            faces
                .iter()
                .flat_map(|face| face.indices())
                .all(|&index| (index as usize) < vertex_count),
            "face index out of range in mesh \"{}\"",
            name
        );

        let material = primitive
            .material()
            .index()
            .unwrap_or(default_material);

        Ok(Mesh {
            name,
            kind,
            positions,
            normals,
            tangents,
            bitangents,
            colors,
            tex_coords,
            faces,
            material,
            morph_targets,
            bones: Vec::new(),
        })
    }

    fn import_cameras(&mut self) {
        let document = self.document;
        for camera in document.cameras() {
            let mut converted = Camera::default();
            if let Projection::Perspective(perspective) = camera.projection() {
                // Cameras point down -Z; the rest of the orientation
                // comes from the node transform.
                converted.look_at = [0.0, 0.0, -1.0];
                converted.aspect_ratio = perspective.aspect_ratio().unwrap_or(0.0);
                converted.horizontal_fov = perspective.yfov() * converted.aspect_ratio;
                converted.near_clip = perspective.znear();
                converted.far_clip = perspective.zfar().unwrap_or(f32::INFINITY);
            }
            self.cameras.push(converted);
        }
    }

    fn import_nodes(&mut self) -> Result<(), ImportError> {
        let document = self.document;
        let Some(scene) = document.default_scene() else {
            return Ok(());
        };

        let roots: Vec<gltf::Node> = scene.nodes().collect();
        match roots.len() {
            0 => {}
            1 => {
                let root = self.import_node(&roots[0], None)?;
                self.root = Some(root);
            }
            _ => {
                // More than one root: hang them under a synthetic one.
                let root = self.nodes.len();
                self.nodes.push(Node {
                    name: String::from("ROOT"),
                    ..Node::default()
                });
                for gltf_node in &roots {
                    let child = self.import_node(gltf_node, Some(root))?;
                    self.nodes[root].children.push(child);
                }
                self.root = Some(root);
            }
        }
        Ok(())
    }

    fn import_node(
        &mut self,
        node: &gltf::Node,
        parent: Option<usize>,
    ) -> Result<usize, ImportError> {
        let index = self.nodes.len();
        self.nodes.push(Node {
            name: node_name(node),
            transform: convert_transform(node.transform()),
            parent,
            ..Node::default()
        });

        let mut children = Vec::new();
        for child in node.children() {
            children.push(self.import_node(&child, Some(index))?);
        }
        self.nodes[index].children = children;

        if let Some(mesh) = node.mesh() {
            let mesh_index = mesh.index();
            let slots: Vec<usize> =
                (self.mesh_offsets[mesh_index]..self.mesh_offsets[mesh_index + 1]).collect();
            if let Some(skin) = node.skin() {
                self.bind_skin(&mesh, &skin, &slots)?;
            }
            self.nodes[index].meshes = slots;
        }

        if let Some(camera) = node.camera() {
            // Cameras take the name of the node that binds them.
            if let Some(converted) = self.cameras.get_mut(camera.index()) {
                converted.name = self.nodes[index].name.clone();
            }
        }

        Ok(index)
    }

    /// Attaches one bone per skin joint to every output mesh of a
    /// skinned node, transposing the per-vertex influence streams into
    /// per-bone vertex-weight lists.
    fn bind_skin(
        &mut self,
        mesh: &gltf::Mesh,
        skin: &Skin,
        slots: &[usize],
    ) -> Result<(), ImportError> {
        let buffers = self.buffers;
        let joints: Vec<gltf::Node> = skin.joints().collect();
        if joints.is_empty() {
            return Ok(());
        }

        let inverse_bind = match skin.inverse_bind_matrices() {
            Some(accessor) => {
                accessor::check(&accessor, DataType::F32, Dimensions::Mat4)?;
                chunk_mat4(&accessor::extract_f32(buffers, &accessor)?)
            }
            None => Vec::new(),
        };

        for (primitive_index, primitive) in mesh.primitives().enumerate() {
            let Some(&slot) = slots.get(primitive_index) else {
                break;
            };
            let mut weighting = self.vertex_weight_mapping(&primitive, joints.len())?;
            let bones = joints
                .iter()
                .enumerate()
                .map(|(joint_index, joint)| {
                    let weights = std::mem::take(&mut weighting[joint_index]);
                    Bone {
                        name: match joint.name() {
                            Some(name) if !name.is_empty() => name.to_string(),
                            _ => format!("bone_{}", joint_index),
                        },
                        offset_matrix: inverse_bind
                            .get(joint_index)
                            .copied()
                            .unwrap_or_else(|| convert_transform(joint.transform()).into()),
                        // The output format wants at least one weight
                        // per bone.
                        weights: if weights.is_empty() {
                            vec![VertexWeight {
                                vertex_id: 0,
                                weight: 0.0,
                            }]
                        } else {
                            weights
                        },
                    }
                })
                .collect();
            self.meshes[slot].bones = bones;
        }
        Ok(())
    }

    /// Inverts JOINTS_0/WEIGHTS_0 (four influences per vertex) into
    /// one vertex-weight list per bone. Zero weights and out-of-range
    /// joints are dropped.
    fn vertex_weight_mapping(
        &self,
        primitive: &Primitive,
        bone_count: usize,
    ) -> Result<Vec<Vec<VertexWeight>>, ImportError> {
        let buffers = self.buffers;
        let mut mapping = vec![Vec::new(); bone_count];

        let (Some(joints_accessor), Some(weights_accessor)) = (
            primitive.get(&Semantic::Joints(0)),
            primitive.get(&Semantic::Weights(0)),
        ) else {
            return Ok(mapping);
        };
        if joints_accessor.count() != weights_accessor.count() {
            warn!(
                "Joint and weight streams disagree ({} joints, {} weights)",
                joints_accessor.count(),
                weights_accessor.count()
            );
            return Ok(mapping);
        }
        if joints_accessor.dimensions() != Dimensions::Vec4
            || weights_accessor.dimensions() != Dimensions::Vec4
        {
            warn!("Joint and weight streams must hold four influences per vertex");
            return Ok(mapping);
        }

        let weights = chunk_vec4(&accessor::extract_normalized(buffers, &weights_accessor)?);
        let joints: Vec<[u16; 4]> = match joints_accessor.data_type() {
            DataType::U8 => chunk_vec4(&accessor::extract_u8(buffers, &joints_accessor)?)
                .into_iter()
                .map(|joint| joint.map(u16::from))
                .collect(),
            DataType::U16 => chunk_vec4(&accessor::extract_u16(buffers, &joints_accessor)?),
            other => {
                warn!("Unsupported joint component type {:?}", other);
                return Ok(mapping);
            }
        };

        for (vertex, (joint, weight)) in joints.iter().zip(&weights).enumerate() {
            for influence in 0..4 {
                let bone = joint[influence] as usize;
                let weight = weight[influence];
                if weight > 0.0 && bone < bone_count {
                    let list = &mut mapping[bone];
                    if list.is_empty() {
                        list.reserve(8);
                    }
                    list.push(VertexWeight {
                        vertex_id: vertex as u32,
                        weight,
                    });
                }
            }
        }
        Ok(mapping)
    }

    fn import_animations(&mut self) -> Result<(), ImportError> {
        let document = self.document;
        if document.default_scene().is_none() {
            return Ok(());
        }

        for animation in document.animations() {
            // Group the channels by target node, keeping at most one
            // sampler per transform path.
            let mut samplers: BTreeMap<usize, NodeSamplers> = BTreeMap::new();
            for channel in animation.channels() {
                let target = channel.target();
                // Morph weight animation is not materialized.
                if matches!(target.property(), Property::MorphTargetWeights) {
                    continue;
                }
                let grouped = samplers.entry(target.node().index()).or_default();
                match target.property() {
                    Property::Translation => grouped.translation = Some(channel.sampler()),
                    Property::Rotation => grouped.rotation = Some(channel.sampler()),
                    Property::Scale => grouped.scale = Some(channel.sampler()),
                    Property::MorphTargetWeights => {}
                }
            }

            let mut channels = Vec::with_capacity(samplers.len());
            for (node_index, grouped) in samplers {
                let Some(node) = document.nodes().nth(node_index) else {
                    continue;
                };
                channels.push(self.node_channel(&node, grouped)?);
            }

            // The latest key anywhere in the animation is its duration.
            let mut duration: f64 = 0.0;
            for channel in &channels {
                for time in channel
                    .position_keys
                    .last()
                    .map(|key| key.time)
                    .into_iter()
                    .chain(channel.rotation_keys.last().map(|key| key.time))
                    .chain(channel.scaling_keys.last().map(|key| key.time))
                {
                    duration = duration.max(time);
                }
            }

            self.animations.push(Animation {
                name: animation.name().map(str::to_string),
                channels,
                duration,
                ticks_per_second: 0.0,
            });
        }
        Ok(())
    }

    fn node_channel(
        &self,
        node: &gltf::Node,
        samplers: NodeSamplers,
    ) -> Result<NodeChannel, ImportError> {
        let buffers = self.buffers;
        let mut channel = NodeChannel {
            node_name: node_name(node),
            position_keys: Vec::new(),
            rotation_keys: Vec::new(),
            scaling_keys: Vec::new(),
        };

        let decomposed = match node.transform() {
            Transform::Decomposed {
                translation,
                rotation,
                scale,
            } => Some((translation, rotation, scale)),
            Transform::Matrix { .. } => None,
        };

        if let Some(sampler) = samplers.translation {
            let times = self.key_times(&sampler.input())?;
            let output = sampler.output();
            accessor::check(&output, DataType::F32, Dimensions::Vec3)?;
            let values = chunk_vec3(&accessor::extract_f32(buffers, &output)?);
            channel.position_keys = times
                .iter()
                .zip(values)
                .map(|(&time, value)| VectorKey { time, value })
                .collect();
        } else if let Some((translation, _, _)) = decomposed {
            if translation != [0.0; 3] {
                channel.position_keys.push(VectorKey {
                    time: 0.0,
                    value: translation,
                });
            }
        }

        if let Some(sampler) = samplers.rotation {
            let times = self.key_times(&sampler.input())?;
            let output = sampler.output();
            if output.dimensions() != Dimensions::Vec4 {
                return Err(ImportError::AccessorDimensions {
                    expected: Dimensions::Vec4,
                    actual: output.dimensions(),
                });
            }
            // Rotations stay in glTF's (x, y, z, w) component order.
            let values = chunk_vec4(&accessor::extract_normalized(buffers, &output)?);
            channel.rotation_keys = times
                .iter()
                .zip(values)
                .map(|(&time, value)| QuatKey { time, value })
                .collect();
        } else if let Some((_, rotation, _)) = decomposed {
            if rotation != [0.0, 0.0, 0.0, 1.0] {
                channel.rotation_keys.push(QuatKey {
                    time: 0.0,
                    value: rotation,
                });
            }
        }

        if let Some(sampler) = samplers.scale {
            let times = self.key_times(&sampler.input())?;
            let output = sampler.output();
            accessor::check(&output, DataType::F32, Dimensions::Vec3)?;
            let values = chunk_vec3(&accessor::extract_f32(buffers, &output)?);
            channel.scaling_keys = times
                .iter()
                .zip(values)
                .map(|(&time, value)| VectorKey { time, value })
                .collect();
        } else if let Some((_, _, scale)) = decomposed {
            if scale != [1.0; 3] {
                channel.scaling_keys.push(VectorKey {
                    time: 0.0,
                    value: scale,
                });
            }
        }

        Ok(channel)
    }

    /// Keyframe input times, seconds in the asset, milliseconds out.
    fn key_times(&self, input: &Accessor) -> Result<Vec<f64>, ImportError> {
        accessor::check(input, DataType::F32, Dimensions::Scalar)?;
        Ok(accessor::extract_f32(self.buffers, input)?
            .into_iter()
            .map(|time| time as f64 * MILLISECONDS_FROM_SECONDS)
            .collect())
    }
}

#[derive(Default)]
struct NodeSamplers<'a> {
    translation: Option<gltf::animation::Sampler<'a>>,
    rotation: Option<gltf::animation::Sampler<'a>>,
    scale: Option<gltf::animation::Sampler<'a>>,
}

fn node_name(node: &gltf::Node) -> String {
    match node.name() {
        Some(name) if !name.is_empty() => name.to_string(),
        _ => format!("node_{}", node.index()),
    }
}

fn convert_transform(transform: Transform) -> NodeTransform {
    match transform {
        Transform::Matrix { matrix } => NodeTransform::Matrix(Mat4::from_cols_array_2d(&matrix)),
        Transform::Decomposed {
            translation,
            rotation,
            scale,
        } => NodeTransform::Decomposed(DecomposedTransform {
            translation: Vec3::from_array(translation),
            rotation: Quat::from_array(rotation),
            scale: Vec3::from_array(scale),
        }),
    }
}

fn wrap_mode(mode: WrappingMode) -> WrapMode {
    match mode {
        WrappingMode::MirroredRepeat => WrapMode::Mirror,
        WrappingMode::ClampToEdge => WrapMode::Clamp,
        WrappingMode::Repeat => WrapMode::Wrap,
    }
}

fn add3(value: &mut [f32; 3], delta: &[f32; 3]) {
    value[0] += delta[0];
    value[1] += delta[1];
    value[2] += delta[2];
}

fn bitangent(normal: [f32; 3], tangent: [f32; 4]) -> [f32; 3] {
    let normal = Vec3::from_array(normal);
    let tangent_xyz = Vec3::new(tangent[0], tangent[1], tangent[2]);
    (normal.cross(tangent_xyz) * tangent[3]).to_array()
}

/// Assembles faces for a topology from `count` indices, read through
/// `index` (either an index accessor or the implicit vertex order).
fn build_faces(mode: Mode, count: usize, index: impl Fn(usize) -> u32) -> Vec<Face> {
    match mode {
        Mode::Points => (0..count).map(|i| Face::Point(index(i))).collect(),
        Mode::Lines => (0..count / 2)
            .map(|i| Face::Line([index(2 * i), index(2 * i + 1)]))
            .collect(),
        Mode::LineStrip | Mode::LineLoop => {
            if count < 2 {
                return Vec::new();
            }
            let mut faces: Vec<Face> = (0..count - 1)
                .map(|i| Face::Line([index(i), index(i + 1)]))
                .collect();
            if mode == Mode::LineLoop {
                // Close the loop.
                faces.push(Face::Line([index(count - 1), index(0)]));
            }
            faces
        }
        Mode::Triangles => (0..count / 3)
            .map(|i| Face::Triangle([index(3 * i), index(3 * i + 1), index(3 * i + 2)]))
            .collect(),
        Mode::TriangleStrip => {
            if count < 3 {
                return Vec::new();
            }
            (0..count - 2)
                .map(|i| {
                    // Alternate the winding so every triangle keeps the
                    // same orientation.
                    if (i + 1) % 2 == 0 {
                        Face::Triangle([index(i + 1), index(i), index(i + 2)])
                    } else {
                        Face::Triangle([index(i), index(i + 1), index(i + 2)])
                    }
                })
                .collect()
        }
        Mode::TriangleFan => {
            if count < 3 {
                return Vec::new();
            }
            (0..count - 2)
                .map(|i| Face::Triangle([index(0), index(i + 1), index(i + 2)]))
                .collect()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn identity(i: usize) -> u32 {
        i as u32
    }

    #[test]
    fn triangle_strip_alternates_winding() {
        let faces = build_faces(Mode::TriangleStrip, 5, identity);
        assert_eq!(
            faces,
            [
                Face::Triangle([0, 1, 2]),
                Face::Triangle([2, 1, 3]),
                Face::Triangle([2, 3, 4]),
            ]
        );
    }

    #[test]
    fn triangle_fan_pivots_on_first_index() {
        let faces = build_faces(Mode::TriangleFan, 5, identity);
        assert_eq!(
            faces,
            [
                Face::Triangle([0, 1, 2]),
                Face::Triangle([0, 2, 3]),
                Face::Triangle([0, 3, 4]),
            ]
        );
    }

    #[test]
    fn line_loop_adds_closing_edge() {
        let faces = build_faces(Mode::LineLoop, 3, identity);
        assert_eq!(
            faces,
            [Face::Line([0, 1]), Face::Line([1, 2]), Face::Line([2, 0])]
        );
    }

    #[test]
    fn line_strip_leaves_loop_open() {
        let faces = build_faces(Mode::LineStrip, 3, identity);
        assert_eq!(faces, [Face::Line([0, 1]), Face::Line([1, 2])]);
    }

    #[test]
    fn degenerate_counts_produce_no_faces() {
        assert!(build_faces(Mode::TriangleStrip, 2, identity).is_empty());
        assert!(build_faces(Mode::TriangleFan, 1, identity).is_empty());
        assert!(build_faces(Mode::LineStrip, 1, identity).is_empty());
    }

    #[test]
    fn bitangent_follows_handedness() {
        let bitangent = bitangent([0.0, 0.0, 1.0], [1.0, 0.0, 0.0, -1.0]);
        assert_eq!(bitangent, [0.0, -1.0, 0.0]);
    }
}
