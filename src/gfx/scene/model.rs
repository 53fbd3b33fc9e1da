//! OBJ models loaded through `tobj`.
//!
//! A [`Model`] is built on the CPU side first; buffers and textures are only
//! created by [`Model::init_gpu_resources`], so loading can be exercised
//! without a device.

use std::path::{Path, PathBuf};

use cgmath::{InnerSpace, Vector3};
use wgpu::util::DeviceExt;

use super::vertex::Vertex3D;
use crate::{
    error::ModelError,
    gfx::resources::{
        geometry_resource::DIFFUSE_GROUP, texture_resource, TextureResource, UploadContext,
    },
};

struct MeshGpuResources {
    vertex_buffer: wgpu::Buffer,
    index_buffer: wgpu::Buffer,
    texture_bind_group: wgpu::BindGroup,
}

pub struct Mesh {
    pub name: String,
    pub vertices: Vec<Vertex3D>,
    pub indices: Vec<u32>,
    /// Diffuse map, already resolved against the model's directory.
    pub diffuse_texture: Option<PathBuf>,
    gpu_resources: Option<MeshGpuResources>,
}

impl Mesh {
    fn from_tobj(model: &tobj::Model, diffuse_texture: Option<PathBuf>) -> Self {
        let mesh = &model.mesh;
        let vertex_count = mesh.positions.len() / 3;

        let computed;
        let normals = if mesh.normals.len() == mesh.positions.len() {
            &mesh.normals
        } else {
            log::debug!("Mesh {} has no normals, computing them", model.name);
            computed = calculate_face_normals(&mesh.positions, &mesh.indices);
            &computed
        };

        let vertices = (0..vertex_count)
            .map(|i| Vertex3D {
                position: [
                    mesh.positions[i * 3],
                    mesh.positions[i * 3 + 1],
                    mesh.positions[i * 3 + 2],
                ],
                normal: [normals[i * 3], normals[i * 3 + 1], normals[i * 3 + 2]],
                tex_coords: if mesh.texcoords.len() >= (i + 1) * 2 {
                    [mesh.texcoords[i * 2], mesh.texcoords[i * 2 + 1]]
                } else {
                    [0.0, 0.0]
                },
            })
            .collect();

        Self {
            name: model.name.clone(),
            vertices,
            indices: mesh.indices.clone(),
            diffuse_texture,
            gpu_resources: None,
        }
    }

    pub fn index_count(&self) -> u32 {
        self.indices.len() as u32
    }

    fn init_gpu_resources(&mut self, ctx: &UploadContext<'_>) {
        let texture = match &self.diffuse_texture {
            Some(path) => {
                texture_resource::load_texture_2d_or_fallback(ctx.device, ctx.queue, path)
            }
            None => TextureResource::white(ctx.device, ctx.queue),
        };

        let vertex_buffer = ctx
            .device
            .create_buffer_init(&wgpu::util::BufferInitDescriptor {
                label: Some(&format!("{} Vertex Buffer", self.name)),
                contents: bytemuck::cast_slice(&self.vertices),
                usage: wgpu::BufferUsages::VERTEX,
            });
        let index_buffer = ctx
            .device
            .create_buffer_init(&wgpu::util::BufferInitDescriptor {
                label: Some(&format!("{} Index Buffer", self.name)),
                contents: bytemuck::cast_slice(&self.indices),
                usage: wgpu::BufferUsages::INDEX,
            });
        let texture_bind_group =
            ctx.bindings
                .diffuse_group(ctx.device, &texture, &format!("{} Texture", self.name));

        self.gpu_resources = Some(MeshGpuResources {
            vertex_buffer,
            index_buffer,
            texture_bind_group,
        });
    }
}

/// Multi-mesh model from an OBJ file.
pub struct Model {
    pub path: PathBuf,
    pub meshes: Vec<Mesh>,
}

impl Model {
    pub fn load(path: &Path) -> Result<Self, ModelError> {
        let (models, materials) = tobj::load_obj(
            path,
            &tobj::LoadOptions {
                triangulate: true,
                single_index: true,
                ..Default::default()
            },
        )
        .map_err(|source| ModelError {
            path: path.to_path_buf(),
            source,
        })?;

        let materials = materials.unwrap_or_else(|err| {
            log::warn!("No materials for {}: {}", path.display(), err);
            Vec::new()
        });
        let directory = path.parent().unwrap_or_else(|| Path::new(""));

        let meshes: Vec<Mesh> = models
            .iter()
            .map(|model| {
                let diffuse = model
                    .mesh
                    .material_id
                    .and_then(|id| materials.get(id))
                    .and_then(|material| material.diffuse_texture.as_deref())
                    .filter(|texture| !texture.is_empty())
                    .map(|texture| directory.join(texture));
                Mesh::from_tobj(model, diffuse)
            })
            .collect();

        log::info!(
            "Loaded model {} ({} meshes, {} triangles)",
            path.display(),
            meshes.len(),
            meshes.iter().map(|m| m.indices.len() / 3).sum::<usize>()
        );

        Ok(Self {
            path: path.to_path_buf(),
            meshes,
        })
    }

    /// Loads the model, logging and returning `None` when it cannot be read.
    pub fn load_or_log(path: &Path) -> Option<Self> {
        match Self::load(path) {
            Ok(model) => Some(model),
            Err(err) => {
                log::warn!("{}", err);
                None
            }
        }
    }

    pub fn init_gpu_resources(&mut self, ctx: &UploadContext<'_>) {
        for mesh in &mut self.meshes {
            mesh.init_gpu_resources(ctx);
        }
    }
}

pub trait DrawModel {
    fn draw_mesh(&mut self, mesh: &Mesh);
    fn draw_model(&mut self, model: &Model);
}

impl DrawModel for wgpu::RenderPass<'_> {
    fn draw_mesh(&mut self, mesh: &Mesh) {
        // not uploaded yet
        let Some(gpu) = &mesh.gpu_resources else {
            return;
        };
        self.set_bind_group(DIFFUSE_GROUP, &gpu.texture_bind_group, &[]);
        self.set_vertex_buffer(0, gpu.vertex_buffer.slice(..));
        self.set_index_buffer(gpu.index_buffer.slice(..), wgpu::IndexFormat::Uint32);
        self.draw_indexed(0..mesh.index_count(), 0, 0..1);
    }

    fn draw_model(&mut self, model: &Model) {
        for mesh in &model.meshes {
            self.draw_mesh(mesh);
        }
    }
}

/// Smooth per-vertex normals: the average of the adjacent face normals.
pub fn calculate_face_normals(positions: &[f32], indices: &[u32]) -> Vec<f32> {
    let vertex_count = positions.len() / 3;
    let position = |i: usize| {
        Vector3::new(positions[i * 3], positions[i * 3 + 1], positions[i * 3 + 2])
    };
    let mut sums = vec![Vector3::new(0.0f32, 0.0, 0.0); vertex_count];

    for triangle in indices.chunks_exact(3) {
        let [i0, i1, i2] = [
            triangle[0] as usize,
            triangle[1] as usize,
            triangle[2] as usize,
        ];
        if i0.max(i1).max(i2) >= vertex_count {
            continue;
        }
        let face_normal = (position(i1) - position(i0)).cross(position(i2) - position(i0));
        for index in [i0, i1, i2] {
            sums[index] += face_normal;
        }
    }

    sums.into_iter()
        .flat_map(|sum| {
            let normal = if sum.magnitude2() > 0.0 {
                sum.normalize()
            } else {
                sum
            };
            [normal.x, normal.y, normal.z]
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn computed_normals_face_out_of_a_ccw_triangle() {
        let positions = [0.0, 0.0, 0.0, 1.0, 0.0, 0.0, 0.0, 1.0, 0.0];
        let normals = calculate_face_normals(&positions, &[0, 1, 2]);
        assert_eq!(normals, vec![0.0, 0.0, 1.0, 0.0, 0.0, 1.0, 0.0, 0.0, 1.0]);
    }

    #[test]
    fn unused_vertices_keep_a_zero_normal() {
        let positions = [0.0, 0.0, 0.0, 1.0, 0.0, 0.0, 0.0, 1.0, 0.0, 5.0, 5.0, 5.0];
        let normals = calculate_face_normals(&positions, &[0, 1, 2]);
        assert_eq!(&normals[9..], &[0.0, 0.0, 0.0]);
    }

    #[test]
    fn missing_model_reports_path() {
        let err = Model::load(Path::new("nowhere/ball.obj")).err().unwrap();
        assert!(err.to_string().contains("nowhere/ball.obj"));
        assert!(Model::load_or_log(Path::new("nowhere/ball.obj")).is_none());
    }

    #[test]
    fn loads_obj_and_resolves_texture_next_to_it() {
        let dir = std::env::temp_dir().join(format!("kickabout-model-{}", std::process::id()));
        std::fs::create_dir_all(&dir).unwrap();
        std::fs::write(
            dir.join("quad.mtl"),
            "newmtl skin\nmap_Kd skin.png\n",
        )
        .unwrap();
        std::fs::write(
            dir.join("quad.obj"),
            "mtllib quad.mtl\no quad\nv 0 0 0\nv 1 0 0\nv 1 1 0\nv 0 1 0\n\
             vt 0 0\nvt 1 0\nvt 1 1\nvt 0 1\nusemtl skin\nf 1/1 2/2 3/3 4/4\n",
        )
        .unwrap();

        let model = Model::load(&dir.join("quad.obj")).unwrap();

        assert_eq!(model.meshes.len(), 1);
        let mesh = &model.meshes[0];
        assert_eq!(mesh.indices.len(), 6);
        assert_eq!(mesh.diffuse_texture, Some(dir.join("skin.png")));
        assert!(mesh
            .vertices
            .iter()
            .all(|v| (v.normal[2] - 1.0).abs() < 1e-6));
    }
}
