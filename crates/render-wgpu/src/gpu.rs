use bytemuck::{Pod, Zeroable};
use glam::{Mat4, Vec3};
use roomview_scene::{MeshData, NodeId, SceneGraph};
use wgpu::util::DeviceExt;

use crate::camera::OrbitCamera;
use crate::lighting::SceneLighting;
use crate::shaders;

#[repr(C)]
#[derive(Copy, Clone, Pod, Zeroable)]
struct Uniforms {
    view_proj: [[f32; 4]; 4],
    camera_pos: [f32; 4],
    fog_color: [f32; 4],
    fog_range: [f32; 4],
    sky_color: [f32; 4],
    ground_color: [f32; 4],
    sun_direction: [f32; 4],
    sun_color: [f32; 4],
    point_position: [f32; 4],
    point_color: [f32; 4],
}

impl Uniforms {
    fn new(view_proj: Mat4, eye: Vec3, lighting: &SceneLighting) -> Self {
        let rgba = |v: Vec3, a: f32| [v.x, v.y, v.z, a];
        Self {
            view_proj: view_proj.to_cols_array_2d(),
            camera_pos: rgba(eye, 1.0),
            fog_color: rgba(lighting.background, lighting.exposure),
            fog_range: [lighting.fog_near, lighting.fog_far, 0.0, 0.0],
            sky_color: rgba(lighting.sky_color, lighting.hemisphere_intensity),
            ground_color: rgba(lighting.ground_color, 1.0),
            sun_direction: rgba(lighting.sun_direction(), 0.0),
            sun_color: rgba(lighting.sun_color, lighting.sun_intensity),
            point_position: rgba(lighting.point_position, lighting.point_range),
            point_color: rgba(lighting.point_color, lighting.point_intensity),
        }
    }
}

#[repr(C)]
#[derive(Copy, Clone, Pod, Zeroable)]
struct Vertex {
    position: [f32; 3],
    normal: [f32; 3],
}

#[repr(C)]
#[derive(Copy, Clone, Pod, Zeroable)]
struct InstanceData {
    model_0: [f32; 4],
    model_1: [f32; 4],
    model_2: [f32; 4],
    model_3: [f32; 4],
    color: [f32; 4],
}

fn mesh_vertices(mesh: &MeshData) -> Vec<Vertex> {
    mesh.positions
        .iter()
        .enumerate()
        .map(|(i, p)| Vertex {
            position: p.to_array(),
            normal: mesh.normals.get(i).copied().unwrap_or(Vec3::Y).to_array(),
        })
        .collect()
}

/// GPU buffers for one mesh node. Geometry is uploaded once; only the
/// node's world matrix changes per frame.
struct GpuMesh {
    node: NodeId,
    vertex_buffer: wgpu::Buffer,
    index_buffer: wgpu::Buffer,
    index_count: u32,
    color: [f32; 4],
    double_sided: bool,
}

/// wgpu renderer for the scene graph's mesh nodes.
pub struct SceneRenderer {
    pipeline: wgpu::RenderPipeline,
    double_sided_pipeline: wgpu::RenderPipeline,
    uniform_buffer: wgpu::Buffer,
    uniform_bind_group: wgpu::BindGroup,
    instance_buffer: wgpu::Buffer,
    max_instances: u32,
    meshes: Vec<GpuMesh>,
    depth_texture: wgpu::TextureView,
    pub lighting: SceneLighting,
}

impl SceneRenderer {
    pub fn new(
        device: &wgpu::Device,
        surface_format: wgpu::TextureFormat,
        width: u32,
        height: u32,
    ) -> Self {
        let lighting = SceneLighting::default();
        let uniform_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("uniform_buffer"),
            contents: bytemuck::bytes_of(&Uniforms::new(Mat4::IDENTITY, Vec3::ZERO, &lighting)),
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
        });

        let bind_group_layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("uniform_bind_group_layout"),
            entries: &[wgpu::BindGroupLayoutEntry {
                binding: 0,
                visibility: wgpu::ShaderStages::VERTEX_FRAGMENT,
                ty: wgpu::BindingType::Buffer {
                    ty: wgpu::BufferBindingType::Uniform,
                    has_dynamic_offset: false,
                    min_binding_size: None,
                },
                count: None,
            }],
        });

        let uniform_bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("uniform_bind_group"),
            layout: &bind_group_layout,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: uniform_buffer.as_entire_binding(),
            }],
        });

        let pipeline_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("pipeline_layout"),
            bind_group_layouts: &[&bind_group_layout],
            push_constant_ranges: &[],
        });

        let shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("scene_shader"),
            source: wgpu::ShaderSource::Wgsl(shaders::SCENE_SHADER.into()),
        });

        let pipeline = Self::create_pipeline(
            device,
            &pipeline_layout,
            &shader,
            surface_format,
            Some(wgpu::Face::Back),
            "mesh_pipeline",
        );
        let double_sided_pipeline = Self::create_pipeline(
            device,
            &pipeline_layout,
            &shader,
            surface_format,
            None,
            "double_sided_pipeline",
        );

        let max_instances = 4_096u32;
        let instance_buffer = device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("instance_buffer"),
            size: (max_instances as u64) * std::mem::size_of::<InstanceData>() as u64,
            usage: wgpu::BufferUsages::VERTEX | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });

        let depth_texture = Self::create_depth_texture(device, width, height);

        Self {
            pipeline,
            double_sided_pipeline,
            uniform_buffer,
            uniform_bind_group,
            instance_buffer,
            max_instances,
            meshes: Vec::new(),
            depth_texture,
            lighting,
        }
    }

    fn create_pipeline(
        device: &wgpu::Device,
        layout: &wgpu::PipelineLayout,
        shader: &wgpu::ShaderModule,
        surface_format: wgpu::TextureFormat,
        cull_mode: Option<wgpu::Face>,
        label: &str,
    ) -> wgpu::RenderPipeline {
        device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
            label: Some(label),
            layout: Some(layout),
            vertex: wgpu::VertexState {
                module: shader,
                entry_point: Some("vs_main"),
                compilation_options: Default::default(),
                buffers: &[
                    wgpu::VertexBufferLayout {
                        array_stride: std::mem::size_of::<Vertex>() as u64,
                        step_mode: wgpu::VertexStepMode::Vertex,
                        attributes: &wgpu::vertex_attr_array![
                            0 => Float32x3,
                            1 => Float32x3,
                        ],
                    },
                    wgpu::VertexBufferLayout {
                        array_stride: std::mem::size_of::<InstanceData>() as u64,
                        step_mode: wgpu::VertexStepMode::Instance,
                        attributes: &wgpu::vertex_attr_array![
                            2 => Float32x4,
                            3 => Float32x4,
                            4 => Float32x4,
                            5 => Float32x4,
                            6 => Float32x4,
                        ],
                    },
                ],
            },
            fragment: Some(wgpu::FragmentState {
                module: shader,
                entry_point: Some("fs_main"),
                compilation_options: Default::default(),
                targets: &[Some(wgpu::ColorTargetState {
                    format: surface_format,
                    blend: Some(wgpu::BlendState::REPLACE),
                    write_mask: wgpu::ColorWrites::ALL,
                })],
            }),
            primitive: wgpu::PrimitiveState {
                topology: wgpu::PrimitiveTopology::TriangleList,
                cull_mode,
                ..Default::default()
            },
            depth_stencil: Some(wgpu::DepthStencilState {
                format: wgpu::TextureFormat::Depth32Float,
                depth_write_enabled: true,
                depth_compare: wgpu::CompareFunction::Less,
                stencil: Default::default(),
                bias: Default::default(),
            }),
            multisample: Default::default(),
            multiview: None,
            cache: None,
        })
    }

    /// Upload geometry for every mesh node in the scene, replacing any
    /// previous upload. Call once after a model is bound.
    pub fn upload_scene(&mut self, device: &wgpu::Device, scene: &SceneGraph) {
        self.meshes.clear();
        for id in scene.mesh_nodes() {
            let Some(mesh) = scene.get(id).and_then(|n| n.mesh.as_ref()) else {
                continue;
            };
            if mesh.indices.is_empty() {
                continue;
            }
            let vertices = mesh_vertices(mesh);
            let vertex_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
                label: Some("mesh_vertex_buffer"),
                contents: bytemuck::cast_slice(&vertices),
                usage: wgpu::BufferUsages::VERTEX,
            });
            let index_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
                label: Some("mesh_index_buffer"),
                contents: bytemuck::cast_slice(&mesh.indices),
                usage: wgpu::BufferUsages::INDEX,
            });
            self.meshes.push(GpuMesh {
                node: id,
                vertex_buffer,
                index_buffer,
                index_count: mesh.indices.len() as u32,
                // glTF base color factors are already linear.
                color: mesh.base_color,
                double_sided: mesh.double_sided,
            });
        }
        if self.meshes.len() > self.max_instances as usize {
            tracing::warn!(
                meshes = self.meshes.len(),
                max = self.max_instances,
                "scene exceeds instance capacity, extra meshes are skipped"
            );
        }
        tracing::debug!(meshes = self.meshes.len(), "scene uploaded");
    }

    pub fn resize(&mut self, device: &wgpu::Device, width: u32, height: u32) {
        self.depth_texture = Self::create_depth_texture(device, width, height);
    }

    /// Record one frame into `encoder`: clear to the background color and
    /// draw every uploaded mesh at its node's current world transform.
    pub fn render(
        &self,
        queue: &wgpu::Queue,
        encoder: &mut wgpu::CommandEncoder,
        view: &wgpu::TextureView,
        camera: &OrbitCamera,
        scene: &SceneGraph,
    ) {
        queue.write_buffer(
            &self.uniform_buffer,
            0,
            bytemuck::bytes_of(&Uniforms::new(
                camera.view_projection(),
                camera.position(),
                &self.lighting,
            )),
        );

        let drawn = self.meshes.len().min(self.max_instances as usize);
        let instances: Vec<InstanceData> = self.meshes[..drawn]
            .iter()
            .map(|mesh| {
                let cols = scene.world_matrix(mesh.node).to_cols_array_2d();
                InstanceData {
                    model_0: cols[0],
                    model_1: cols[1],
                    model_2: cols[2],
                    model_3: cols[3],
                    color: mesh.color,
                }
            })
            .collect();

        if !instances.is_empty() {
            queue.write_buffer(&self.instance_buffer, 0, bytemuck::cast_slice(&instances));
        }

        let mut pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
            label: Some("scene_pass"),
            color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                view,
                resolve_target: None,
                ops: wgpu::Operations {
                    load: wgpu::LoadOp::Clear(self.lighting.clear_color()),
                    store: wgpu::StoreOp::Store,
                },
            })],
            depth_stencil_attachment: Some(wgpu::RenderPassDepthStencilAttachment {
                view: &self.depth_texture,
                depth_ops: Some(wgpu::Operations {
                    load: wgpu::LoadOp::Clear(1.0),
                    store: wgpu::StoreOp::Store,
                }),
                stencil_ops: None,
            }),
            ..Default::default()
        });

        pass.set_bind_group(0, &self.uniform_bind_group, &[]);
        pass.set_vertex_buffer(1, self.instance_buffer.slice(..));
        for (i, mesh) in self.meshes[..drawn].iter().enumerate() {
            let pipeline = if mesh.double_sided {
                &self.double_sided_pipeline
            } else {
                &self.pipeline
            };
            let instance = i as u32;
            pass.set_pipeline(pipeline);
            pass.set_vertex_buffer(0, mesh.vertex_buffer.slice(..));
            pass.set_index_buffer(mesh.index_buffer.slice(..), wgpu::IndexFormat::Uint32);
            pass.draw_indexed(0..mesh.index_count, 0, instance..instance + 1);
        }
    }

    fn create_depth_texture(device: &wgpu::Device, width: u32, height: u32) -> wgpu::TextureView {
        let texture = device.create_texture(&wgpu::TextureDescriptor {
            label: Some("depth_texture"),
            size: wgpu::Extent3d {
                width: width.max(1),
                height: height.max(1),
                depth_or_array_layers: 1,
            },
            mip_level_count: 1,
            sample_count: 1,
            dimension: wgpu::TextureDimension::D2,
            format: wgpu::TextureFormat::Depth32Float,
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            view_formats: &[],
        });
        texture.create_view(&Default::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn uniform_layout_is_vec4_aligned() {
        assert_eq!(std::mem::size_of::<Uniforms>() % 16, 0);
        assert_eq!(std::mem::size_of::<Uniforms>(), 64 + 9 * 16);
    }

    #[test]
    fn missing_normals_default_up() {
        let mesh = MeshData {
            positions: vec![Vec3::ZERO, Vec3::X, Vec3::Y],
            normals: vec![Vec3::Z],
            indices: vec![0, 1, 2],
            ..MeshData::default()
        };
        let vertices = mesh_vertices(&mesh);
        assert_eq!(vertices.len(), 3);
        assert_eq!(vertices[0].normal, [0.0, 0.0, 1.0]);
        assert_eq!(vertices[2].normal, [0.0, 1.0, 0.0]);
    }

    #[test]
    fn uniforms_carry_lighting() {
        let lighting = SceneLighting::default();
        let u = Uniforms::new(Mat4::IDENTITY, Vec3::new(3.0, 2.0, 3.0), &lighting);
        assert_eq!(u.fog_color[3], 1.2);
        assert_eq!(u.fog_range[0], 5.0);
        assert_eq!(u.point_position, [0.0, 2.0, 0.0, 10.0]);
        assert_eq!(u.sky_color[3], 0.6);
    }
}
