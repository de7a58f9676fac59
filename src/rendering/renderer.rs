use std::{collections::HashMap, sync::Arc};

use anyhow::Context;
use bytemuck::Zeroable;
use wgpu::{util::DeviceExt, CommandEncoderDescriptor};
use winit::{dpi::PhysicalSize, window::Window};

use crate::{
    camera::PerspectiveCamera,
    config::RenderConfig,
    frame_loop::SceneDrawer,
    geometry::GeometryId,
    light::SpotLight,
    rendering::{
        passes::{
            line_pass::LinePass, mesh_pass::MeshPass, shadow_pass::ShadowPass, DrawList,
            SceneTargets,
        },
        render_common::RenderCommon,
        render_object::{
            MeshPipelineKey, RenderGeometry, RenderLines, RenderObject, RenderObjectKind,
        },
        texture::{DepthTexture, MultisampleTarget, ShadowMap},
        uniforms::{
            shadow_casting_light, LightsUniform, ObjectUniform, UniformBuffer, ViewUniform,
        },
        util::bind_group_builder::BindGroupBuilder,
    },
    scene_graph::{Object3D, ObjectId, ObjectKind, Scene},
};

pub struct Renderer {
    pub window: Arc<Window>,

    surface: wgpu::Surface<'static>,
    device: wgpu::Device,
    queue: wgpu::Queue,

    common: RenderCommon,
    depth_texture: DepthTexture,
    msaa_target: Option<MultisampleTarget>,
    shadow_map: ShadowMap,

    view_uniform: UniformBuffer<ViewUniform>,
    shadow_view_uniform: UniformBuffer<ViewUniform>,
    lights_buffer: wgpu::Buffer,
    lights_bind_group: wgpu::BindGroup,

    geometries: HashMap<GeometryId, RenderGeometry>,
    objects: HashMap<ObjectId, RenderObject>,

    shadow_pass: ShadowPass,
    mesh_pass: MeshPass,
    line_pass: LinePass,
}

impl Renderer {
    pub async fn new(window: Arc<Window>, config: &RenderConfig) -> anyhow::Result<Renderer> {
        let size = window.inner_size();

        let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor::default());
        let surface = instance
            .create_surface(window.clone())
            .context("Failed to create surface")?;

        let adapter = instance
            .request_adapter(&wgpu::RequestAdapterOptions {
                power_preference: wgpu::PowerPreference::HighPerformance,
                compatible_surface: Some(&surface),
                force_fallback_adapter: false,
            })
            .await
            .context("No compatible GPU adapter")?;

        let info = adapter.get_info();
        log::info!("Using adapter {} ({:?})", info.name, info.backend);

        let wireframe_supported = adapter
            .features()
            .contains(wgpu::Features::POLYGON_MODE_LINE);
        let required_features = if wireframe_supported {
            wgpu::Features::POLYGON_MODE_LINE
        } else {
            wgpu::Features::empty()
        };

        let (device, queue) = adapter
            .request_device(&wgpu::DeviceDescriptor {
                required_features,
                required_limits: wgpu::Limits::default(),
                label: None,
                memory_hints: Default::default(),
                trace: wgpu::Trace::Off,
            })
            .await
            .context("Failed to create device")?;

        let common = RenderCommon::new(&device, &adapter, &surface, size, config)?;
        let size = common.size();

        let depth_texture = DepthTexture::new(&device, size, common.sample_count, "Depth Texture");
        let msaa_target = (common.sample_count > 1).then(|| {
            MultisampleTarget::new(&device, size, common.format(), common.sample_count)
        });
        // Resized to the light's configured resolution on first draw.
        let shadow_map = ShadowMap::new(&device, PhysicalSize::new(1, 1));

        let view_uniform =
            UniformBuffer::new(&device, &common.view_layout, "Camera view", ViewUniform::zeroed());
        let shadow_view_uniform =
            UniformBuffer::new(&device, &common.view_layout, "Shadow view", ViewUniform::zeroed());

        let lights_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("Lights uniform buffer"),
            contents: bytemuck::cast_slice(&[LightsUniform::zeroed()]),
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
        });
        let lights_bind_group =
            create_lights_bind_group(&device, &common, &lights_buffer, &shadow_map);

        let shadow_pass = ShadowPass::create(&device, &common)?;
        let mesh_pass = MeshPass::create(&device, &common, wireframe_supported)?;
        let line_pass = LinePass::create(&device, &common)?;

        Ok(Self {
            window,
            surface,
            device,
            queue,
            common,
            depth_texture,
            msaa_target,
            shadow_map,
            view_uniform,
            shadow_view_uniform,
            lights_buffer,
            lights_bind_group,
            geometries: HashMap::new(),
            objects: HashMap::new(),
            shadow_pass,
            mesh_pass,
            line_pass,
        })
    }

    pub fn size(&self) -> PhysicalSize<u32> {
        self.common.size()
    }

    /// Re-applies the setup-time configuration after the surface was lost.
    /// The target size never changes.
    pub fn reconfigure(&self) {
        log::debug!("Reconfiguring surface");
        self.surface
            .configure(&self.device, &self.common.surface_config);
    }

    /// Uploads GPU resources for drawable objects seen for the first time.
    fn sync_scene(&mut self, scene: &Scene) {
        for (id, object) in scene.objects.iter() {
            if self.objects.contains_key(&id) {
                continue;
            }

            let Some(render_object) = self.create_render_object(scene, object) else {
                continue;
            };

            log::debug!("Uploaded {} to the GPU", object.name);
            self.objects.insert(id, render_object);
        }
    }

    fn create_render_object(&mut self, scene: &Scene, object: &Object3D) -> Option<RenderObject> {
        match &object.kind {
            ObjectKind::Mesh { geometry, material } => {
                if !self.geometries.contains_key(geometry) {
                    let Some(source) = scene.get_geometry(*geometry) else {
                        log::warn!("{} references a missing geometry", object.name);
                        return None;
                    };
                    self.geometries
                        .insert(*geometry, RenderGeometry::from_geometry(&self.device, source));
                }

                let uniform = UniformBuffer::new(
                    &self.device,
                    &self.common.object_layout,
                    &object.name,
                    ObjectUniform::for_mesh(&object.transform, material, object.receive_shadow),
                );

                Some(RenderObject {
                    uniform,
                    kind: RenderObjectKind::Mesh {
                        geometry: *geometry,
                        pipeline: MeshPipelineKey {
                            side: material.side,
                            wireframe: material.wireframe,
                        },
                        cast_shadow: object.cast_shadow,
                    },
                })
            }
            ObjectKind::LineSegments { edges, material } => {
                let uniform = UniformBuffer::new(
                    &self.device,
                    &self.common.object_layout,
                    &object.name,
                    ObjectUniform::for_lines(&object.transform, material),
                );

                Some(RenderObject {
                    uniform,
                    kind: RenderObjectKind::Lines(RenderLines::from_edges(
                        &self.device,
                        &object.name,
                        edges,
                    )),
                })
            }
            ObjectKind::AmbientLight(_) | ObjectKind::SpotLight(_) => None,
        }
    }

    fn ensure_shadow_map(&mut self, light: &SpotLight) {
        let size = PhysicalSize::new(light.shadow.map_width, light.shadow.map_height);
        if self.shadow_map.size() == size {
            return;
        }

        log::debug!("Allocating {}x{} shadow map", size.width, size.height);
        self.shadow_map = ShadowMap::new(&self.device, size);
        self.lights_bind_group = create_lights_bind_group(
            &self.device,
            &self.common,
            &self.lights_buffer,
            &self.shadow_map,
        );
    }

    fn update_uniforms(&mut self, scene: &Scene, camera: &PerspectiveCamera) -> LightsUniform {
        let lights = LightsUniform::from_scene(scene);

        if let Some(placed) = shadow_casting_light(scene) {
            self.ensure_shadow_map(placed.light);
            self.shadow_view_uniform
                .write(&self.queue, ViewUniform::from_spot_light(&placed));
        }

        self.queue
            .write_buffer(&self.lights_buffer, 0, bytemuck::cast_slice(&[lights]));
        self.view_uniform
            .write(&self.queue, ViewUniform::from_camera(camera, self.size()));

        for (id, object) in scene.objects.iter() {
            let Some(render_object) = self.objects.get(&id) else {
                continue;
            };

            let uniform = match &object.kind {
                ObjectKind::Mesh { material, .. } => {
                    ObjectUniform::for_mesh(&object.transform, material, object.receive_shadow)
                }
                ObjectKind::LineSegments { material, .. } => {
                    ObjectUniform::for_lines(&object.transform, material)
                }
                _ => continue,
            };

            render_object.uniform.write(&self.queue, uniform);
        }

        lights
    }

    pub fn render(
        &mut self,
        scene: &Scene,
        camera: &PerspectiveCamera,
    ) -> Result<(), wgpu::SurfaceError> {
        self.sync_scene(scene);
        let lights = self.update_uniforms(scene, camera);

        let output = self.surface.get_current_texture()?;
        let view = output
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());

        let mut encoder = self
            .device
            .create_command_encoder(&CommandEncoderDescriptor {
                label: Some("Render Encoder"),
            });

        let objects: Vec<&RenderObject> = scene
            .objects
            .iter()
            .filter_map(|(id, _)| self.objects.get(&id))
            .collect();

        if lights.shadows_enabled() {
            self.shadow_pass.render(
                &mut encoder,
                self.shadow_map.view(),
                &DrawList {
                    view_bind_group: &self.shadow_view_uniform.bind_group,
                    objects: &objects,
                    geometries: &self.geometries,
                },
            );
        }

        let targets = match &self.msaa_target {
            Some(msaa_target) => SceneTargets {
                color: msaa_target.view(),
                resolve: Some(&view),
                depth: self.depth_texture.view(),
            },
            None => SceneTargets {
                color: &view,
                resolve: None,
                depth: self.depth_texture.view(),
            },
        };

        let draws = DrawList {
            view_bind_group: &self.view_uniform.bind_group,
            objects: &objects,
            geometries: &self.geometries,
        };

        self.mesh_pass.render(
            &mut encoder,
            &targets,
            self.common.clear_color,
            &self.lights_bind_group,
            &draws,
        );
        self.line_pass.render(&mut encoder, &targets, &draws);

        self.queue.submit([encoder.finish()]);
        output.present();

        Ok(())
    }
}

impl SceneDrawer for Renderer {
    type Error = wgpu::SurfaceError;

    fn draw(&mut self, scene: &Scene, camera: &PerspectiveCamera) -> Result<(), Self::Error> {
        self.render(scene, camera)
    }
}

fn create_lights_bind_group(
    device: &wgpu::Device,
    common: &RenderCommon,
    lights_buffer: &wgpu::Buffer,
    shadow_map: &ShadowMap,
) -> wgpu::BindGroup {
    BindGroupBuilder::new("Lights")
        .uniform(0, lights_buffer)
        .depth_texture(1, shadow_map.view())
        .comparison_sampler(2, shadow_map.sampler())
        .build_for_layout(device, &common.lights_layout)
}
