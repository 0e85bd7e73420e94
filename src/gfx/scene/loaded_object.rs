// src/gfx/scene/loaded_object.rs
//! OBJ models loaded into GPU meshes.

use std::collections::HashMap;
use std::path::Path;

use super::vertex::ObjVertex;
use super::world_pose::WorldPose;
use crate::error::{IrrecoverableError, Result};
use crate::gfx::context::Gfx;
use crate::gfx::device::Primitive;
use crate::gfx::resources::{BoundProgram, Mesh, Texture};

/// Sampler the diffuse map is bound to.
pub const DIFFUSE_SAMPLER: &str = "theTexture";
/// Texture unit of the diffuse map.
pub const DIFFUSE_UNIT: u32 = 0;

/// One drawable part of a model.
pub struct Shape {
    pub mesh: Mesh,
    /// Index into [`LoadedObject::materials`]
    pub material_id: Option<usize>,
}

/// A model read from an OBJ file, one [`Shape`] per object/material group.
pub struct LoadedObject {
    pub shapes: Vec<Shape>,
    pub materials: Vec<tobj::Material>,
    pub pose: WorldPose,
    textures: HashMap<String, Texture>,
}

impl LoadedObject {
    /// Loads the OBJ at `path`, its MTL library and the diffuse textures the
    /// materials reference.
    ///
    /// Faces are triangulated. A missing or broken MTL file, or a texture that
    /// fails to load, is logged and the model loads without it.
    ///
    /// # Arguments
    /// * `gfx` - Graphics context the meshes and textures are created on
    /// * `path` - OBJ file; MTL and texture paths resolve next to it
    ///
    /// # Errors
    /// [`IrrecoverableError::ModelNotFound`] when `path` does not exist,
    /// [`IrrecoverableError::ModelLoad`] when the OBJ cannot be parsed.
    pub fn load(gfx: &Gfx, path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        if !path.exists() {
            return Err(IrrecoverableError::ModelNotFound(path.to_path_buf()));
        }
        let parent_dir = path.parent().unwrap_or_else(|| Path::new(""));

        let (models, materials) = tobj::load_obj(
            path,
            &tobj::LoadOptions {
                triangulate: true,
                single_index: false,
                ..Default::default()
            },
        )
        .map_err(|source| IrrecoverableError::ModelLoad {
            path: path.to_path_buf(),
            source,
        })?;

        let materials = materials.unwrap_or_else(|err| {
            log::warn!("Warning while loading .obj {}: {err}", path.display());
            Vec::new()
        });

        let textures = load_diffuse_textures(gfx, parent_dir, &materials);

        let mut shapes = Vec::with_capacity(models.len());
        for model in &models {
            let (vertices, indices) = dedup_vertices(shape_vertices(&model.mesh));
            let mesh = Mesh::with_indexed_vertices(gfx, &vertices, ObjVertex::layout(), &indices)?;
            shapes.push(Shape {
                mesh,
                material_id: model.mesh.material_id,
            });
        }

        log::info!(
            "Loaded {} ({} shapes, {} materials, {} textures)",
            path.display(),
            shapes.len(),
            materials.len(),
            textures.len()
        );

        Ok(Self {
            shapes,
            materials,
            pose: WorldPose::default(),
            textures,
        })
    }

    /// Points the texture samplers at their units. Call once per program.
    pub fn set_init_uniforms(&self, program: &mut BoundProgram<'_>) {
        Texture::set_init_uniform(program, DIFFUSE_SAMPLER, DIFFUSE_UNIT as i32);
    }

    /// Sets `model` from the pose, then draws every shape with its
    /// material's diffuse texture bound.
    pub fn draw(&self, program: &mut BoundProgram<'_>) {
        program.set_uniform("model", self.pose.compute_transform());

        for shape in &self.shapes {
            if let Some(texture) = shape.material_id.and_then(|id| self.diffuse_texture(id)) {
                texture.bind(program, DIFFUSE_UNIT);
            }
            shape.mesh.draw(program, Primitive::Triangles);
        }
    }

    /// Loaded texture by the file name used in the MTL file.
    pub fn texture(&self, name: &str) -> Option<&Texture> {
        self.textures.get(name)
    }

    pub fn texture_count(&self) -> usize {
        self.textures.len()
    }

    fn diffuse_texture(&self, material_id: usize) -> Option<&Texture> {
        let name = self.materials.get(material_id)?.diffuse_texture.as_ref()?;
        self.textures.get(name)
    }
}

fn load_diffuse_textures(
    gfx: &Gfx,
    parent_dir: &Path,
    materials: &[tobj::Material],
) -> HashMap<String, Texture> {
    let mut textures = HashMap::new();
    for name in materials.iter().filter_map(|m| m.diffuse_texture.as_ref()) {
        if name.is_empty() || textures.contains_key(name) {
            continue;
        }
        match Texture::from_file(gfx, parent_dir.join(name)) {
            Ok(texture) => {
                textures.insert(name.clone(), texture);
            }
            Err(err) => log::warn!("Failed to load texture: {name} ({err})"),
        }
    }
    textures
}

fn read3(data: &[f32], index: u32) -> Option<[f32; 3]> {
    let start = index as usize * 3;
    data.get(start..start + 3).map(|v| [v[0], v[1], v[2]])
}

fn read2(data: &[f32], index: u32) -> Option<[f32; 2]> {
    let start = index as usize * 2;
    data.get(start..start + 2).map(|v| [v[0], v[1]])
}

/// One vertex per face corner. Missing normals or texture coordinates are
/// zero; V is flipped so the image origin matches GL's.
fn shape_vertices(mesh: &tobj::Mesh) -> impl Iterator<Item = ObjVertex> + '_ {
    mesh.indices.iter().enumerate().map(move |(corner, &position)| {
        let normal = mesh
            .normal_indices
            .get(corner)
            .and_then(|&n| read3(&mesh.normals, n));
        let tex_coord = mesh
            .texcoord_indices
            .get(corner)
            .and_then(|&t| read2(&mesh.texcoords, t))
            .map(|[u, v]| [u, 1.0 - v]);

        ObjVertex {
            position: read3(&mesh.positions, position).unwrap_or_default(),
            normal: normal.unwrap_or_default(),
            tex_coord: tex_coord.unwrap_or_default(),
        }
    })
}

/// Collapses identical vertices.
///
/// Returns the unique vertices in first-seen order and one index per input
/// vertex. Vertices are identical when every component compares equal, so
/// `0.0` and `-0.0` collapse together.
pub fn dedup_vertices(vertices: impl IntoIterator<Item = ObjVertex>) -> (Vec<ObjVertex>, Vec<u32>) {
    let mut unique = Vec::new();
    let mut indices = Vec::new();
    let mut seen: HashMap<[u32; 8], u32> = HashMap::new();

    for vertex in vertices {
        let index = *seen.entry(vertex.bit_key()).or_insert_with(|| {
            unique.push(vertex);
            (unique.len() - 1) as u32
        });
        indices.push(index);
    }
    (unique, indices)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gfx::device::recording::{Call, Kind, TestRig, UniformWrite};
    use crate::gfx::resources::ShaderProgram;
    use image::{ImageFormat, Rgb, RgbImage};
    use std::path::PathBuf;

    const OBJ: &str = "mtllib scene.mtl
o quad
v 0 0 0
v 1 0 0
v 1 1 0
v 0 1 0
vt 0 0
vt 1 0
vt 1 1
vt 0 1
vn 0 0 1
usemtl textured
f 1/1/1 2/2/1 3/3/1 4/4/1
o tri
usemtl broken
f 1/1/1 2/2/1 3/3/1
";

    const MTL: &str = "newmtl textured
map_Kd diffuse.png

newmtl broken
map_Kd missing.png

newmtl shared
map_Kd diffuse.png
";

    struct Fixture {
        dir: PathBuf,
    }

    impl Fixture {
        fn new(name: &str) -> Self {
            let dir = std::env::temp_dir()
                .join(format!("sandbox3d-obj-{}-{name}", std::process::id()));
            std::fs::create_dir_all(&dir).unwrap();
            std::fs::write(dir.join("scene.obj"), OBJ).unwrap();
            std::fs::write(dir.join("scene.mtl"), MTL).unwrap();
            RgbImage::from_pixel(2, 2, Rgb([200, 10, 10]))
                .save_with_format(dir.join("diffuse.png"), ImageFormat::Png)
                .unwrap();
            Self { dir }
        }

        fn obj(&self) -> PathBuf {
            self.dir.join("scene.obj")
        }
    }

    impl Drop for Fixture {
        fn drop(&mut self) {
            let _ = std::fs::remove_dir_all(&self.dir);
        }
    }

    fn vertex(x: f32) -> ObjVertex {
        ObjVertex {
            position: [x, 0.0, 0.0],
            ..Default::default()
        }
    }

    #[test]
    fn test_dedup_vertices() {
        let (unique, indices) =
            dedup_vertices([vertex(0.0), vertex(1.0), vertex(0.0), vertex(2.0), vertex(1.0)]);
        assert_eq!(unique, vec![vertex(0.0), vertex(1.0), vertex(2.0)]);
        assert_eq!(indices, vec![0, 1, 0, 2, 1]);
    }

    #[test]
    fn test_dedup_merges_signed_zero() {
        let (unique, indices) = dedup_vertices([vertex(0.0), vertex(-0.0), vertex(1.0)]);
        assert_eq!(unique.len(), 2);
        assert!(unique[0].position[0].is_sign_positive());
        assert_eq!(indices, vec![0, 0, 1]);
    }

    #[test]
    fn test_missing_model() {
        let rig = TestRig::new();
        let result = LoadedObject::load(&rig.gfx, "does/not/exist.obj");
        assert!(matches!(
            result,
            Err(IrrecoverableError::ModelNotFound(path)) if path == Path::new("does/not/exist.obj")
        ));
    }

    #[test]
    fn test_unreadable_model() {
        let rig = TestRig::new();
        let fixture = Fixture::new("unreadable");
        // A directory exists but cannot be read as a file.
        assert!(matches!(
            LoadedObject::load(&rig.gfx, &fixture.dir),
            Err(IrrecoverableError::ModelLoad { .. })
        ));
    }

    #[test]
    fn test_load_builds_deduplicated_shapes() {
        let rig = TestRig::new();
        let fixture = Fixture::new("shapes");
        let object = LoadedObject::load(&rig.gfx, fixture.obj()).unwrap();

        assert_eq!(object.shapes.len(), 2);
        let quad = &object.shapes[0];
        assert!(quad.mesh.is_indexed());
        assert_eq!(quad.mesh.draw_count(), 6);
        assert_eq!(object.shapes[1].mesh.draw_count(), 3);

        // 4 unique quad corners, 8 floats each
        assert!(rig.device.calls().contains(&Call::BufferData {
            target: crate::gfx::device::BufferTarget::Array,
            len: 4 * std::mem::size_of::<ObjVertex>(),
            usage: crate::gfx::device::BufferUsage::StaticDraw,
        }));

        let material = &object.materials[quad.material_id.unwrap()];
        assert_eq!(material.name, "textured");
    }

    #[test]
    fn test_textures_loaded_once_and_failures_skipped() {
        let rig = TestRig::new();
        let fixture = Fixture::new("textures");
        let object = LoadedObject::load(&rig.gfx, fixture.obj()).unwrap();

        assert_eq!(object.texture_count(), 1);
        assert_eq!(rig.device.live_count(Kind::Texture), 1);
        assert!(object.texture("diffuse.png").is_some());
        assert!(object.texture("missing.png").is_none());
    }

    #[test]
    fn test_draw_binds_diffuse_and_sets_model() {
        let rig = TestRig::new();
        let fixture = Fixture::new("draw");
        let mut object = LoadedObject::load(&rig.gfx, fixture.obj()).unwrap();
        object.pose.translate(cgmath::Vector3::new(1.0, 2.0, 3.0));

        let program = ShaderProgram::from_sources(
            &rig.gfx,
            "uniform mat4 model;\nvoid main() {}",
            None,
            "uniform sampler2D theTexture;\nvoid main() {}",
        )
        .unwrap();
        let diffuse = object.texture("diffuse.png").unwrap().id();
        rig.device.clear_calls();

        let mut bound = program.bind().unwrap();
        object.set_init_uniforms(&mut bound);
        object.draw(&mut bound);
        drop(bound);

        let calls = rig.device.calls();
        let sampler = program.uniforms()["theTexture"].location;
        assert!(calls.contains(&Call::Uniform(sampler, UniformWrite::Int(0))));

        let model = program.uniforms()["model"].location;
        let translation = calls.iter().find_map(|call| match call {
            Call::Uniform(location, UniformWrite::Mat4(m)) if *location == model => {
                Some([m[12], m[13], m[14]])
            }
            _ => None,
        });
        assert_eq!(translation, Some([1.0, 2.0, 3.0]));

        let draws: Vec<usize> = calls
            .iter()
            .enumerate()
            .filter(|(_, call)| matches!(call, Call::DrawElements(..)))
            .map(|(i, _)| i)
            .collect();
        assert_eq!(draws.len(), 2);
        let binds: Vec<usize> = calls
            .iter()
            .enumerate()
            .filter(|(_, call)| **call == Call::BindTexture(diffuse))
            .map(|(i, _)| i)
            .collect();
        // Only the textured shape binds, and before its draw.
        assert_eq!(binds.len(), 1);
        assert!(binds[0] < draws[0]);
    }
}
