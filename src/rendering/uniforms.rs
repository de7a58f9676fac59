use std::marker::PhantomData;

use bytemuck::{Pod, Zeroable};
use glam::{Mat4, Vec3, Vec4};
use wgpu::util::DeviceExt;
use winit::dpi::PhysicalSize;

use crate::{
    camera::PerspectiveCamera,
    light::SpotLight,
    material::{LineBasicMaterial, PhongMaterial},
    rendering::util::bind_group_builder::BindGroupBuilder,
    scene_graph::{ObjectKind, Scene, Transform},
};

/// Matches `View` in the WGSL shaders.
#[repr(C)]
#[derive(Debug, Copy, Clone, Pod, Zeroable)]
pub struct ViewUniform {
    pub view_proj: Mat4,
    pub eye: Vec4,
    /// Target width and height in pixels.
    pub viewport: Vec4,
}

impl ViewUniform {
    pub fn from_camera(camera: &PerspectiveCamera, size: PhysicalSize<u32>) -> Self {
        Self {
            view_proj: camera.view_projection_matrix(),
            eye: camera.position.extend(1.0),
            viewport: Vec4::new(size.width as f32, size.height as f32, 0.0, 0.0),
        }
    }

    pub fn from_spot_light(light: &PlacedSpotLight<'_>) -> Self {
        Self {
            view_proj: light.light.shadow_view_projection(light.position),
            eye: light.position.extend(1.0),
            viewport: Vec4::new(
                light.light.shadow.map_width as f32,
                light.light.shadow.map_height as f32,
                0.0,
                0.0,
            ),
        }
    }
}

/// Matches `Object` in the WGSL shaders.
#[repr(C)]
#[derive(Debug, Copy, Clone, Pod, Zeroable)]
pub struct ObjectUniform {
    pub model: Mat4,
    pub normal_matrix: Mat4,
    pub color: Vec4,
    /// RGB specular colour, W shininess.
    pub specular: Vec4,
    /// X receives shadows, Y line width in pixels.
    pub params: Vec4,
}

impl ObjectUniform {
    pub fn for_mesh(transform: &Transform, material: &PhongMaterial, receive_shadow: bool) -> Self {
        Self {
            model: *transform.get_world_matrix(),
            normal_matrix: Mat4::from_mat3(*transform.get_normal_matrix()),
            color: material.color.linear().extend(1.0),
            specular: material.specular.linear().extend(material.shininess),
            params: Vec4::new(if receive_shadow { 1.0 } else { 0.0 }, 0.0, 0.0, 0.0),
        }
    }

    pub fn for_lines(transform: &Transform, material: &LineBasicMaterial) -> Self {
        Self {
            model: *transform.get_world_matrix(),
            normal_matrix: Mat4::IDENTITY,
            color: material.color.linear().extend(1.0),
            specular: Vec4::ZERO,
            params: Vec4::new(0.0, material.line_width, 0.0, 0.0),
        }
    }
}

/// Matches `Lights` in the WGSL shaders. Holds the summed ambient term and
/// at most one spot light.
#[repr(C)]
#[derive(Debug, Copy, Clone, Pod, Zeroable)]
pub struct LightsUniform {
    pub ambient: Vec4,
    /// W is 1 when a spot light is present.
    pub spot_position: Vec4,
    pub spot_direction: Vec4,
    pub spot_color: Vec4,
    /// Cone cos, penumbra cos, distance, decay.
    pub spot_cone: Vec4,
    pub shadow_view_proj: Mat4,
    /// Bias, enabled, texel width, texel height.
    pub shadow_params: Vec4,
}

impl LightsUniform {
    pub fn from_scene(scene: &Scene) -> Self {
        let mut uniform = Self::zeroed();
        let mut ambient = Vec3::ZERO;
        let mut spot_seen = false;

        for (_, object) in scene.objects.iter() {
            match &object.kind {
                ObjectKind::AmbientLight(light) => {
                    ambient += light.color.linear() * light.intensity;
                }
                ObjectKind::SpotLight(light) if !spot_seen => {
                    spot_seen = true;
                    let position = world_position(&object.transform);
                    uniform.spot_position = position.extend(1.0);
                    uniform.spot_direction = light.direction(position).extend(0.0);
                    uniform.spot_color = (light.color.linear() * light.intensity).extend(1.0);
                    uniform.spot_cone = Vec4::new(
                        light.cone_cos(),
                        light.penumbra_cos(),
                        light.distance,
                        light.decay,
                    );

                    if light.cast_shadow {
                        uniform.shadow_view_proj = light.shadow_view_projection(position);
                        uniform.shadow_params = Vec4::new(
                            light.shadow.bias,
                            1.0,
                            1.0 / light.shadow.map_width.max(1) as f32,
                            1.0 / light.shadow.map_height.max(1) as f32,
                        );
                    }
                }
                ObjectKind::SpotLight(_) => {
                    log::warn!("Only the first spot light is rendered, ignoring {}", object.name);
                }
                _ => {}
            }
        }

        uniform.ambient = ambient.extend(1.0);
        uniform
    }

    pub fn shadows_enabled(&self) -> bool {
        self.shadow_params.y > 0.0
    }
}

fn world_position(transform: &Transform) -> Vec3 {
    transform.get_world_matrix().w_axis.truncate()
}

/// A spot light together with the world position of the object carrying it.
pub struct PlacedSpotLight<'a> {
    pub light: &'a SpotLight,
    pub position: Vec3,
}

/// The spot light that drives the shadow map, if any.
pub fn shadow_casting_light(scene: &Scene) -> Option<PlacedSpotLight<'_>> {
    scene
        .objects
        .iter()
        .find_map(|(_, object)| match &object.kind {
            ObjectKind::SpotLight(light) => Some(PlacedSpotLight {
                light,
                position: world_position(&object.transform),
            }),
            _ => None,
        })
        .filter(|placed| placed.light.cast_shadow)
}

/// A uniform buffer together with a bind group exposing it at binding 0.
pub struct UniformBuffer<T> {
    buffer: wgpu::Buffer,
    pub bind_group: wgpu::BindGroup,
    _marker: PhantomData<T>,
}

impl<T: Pod> UniformBuffer<T> {
    pub fn new(
        device: &wgpu::Device,
        layout: &wgpu::BindGroupLayout,
        label: &str,
        initial: T,
    ) -> Self {
        let buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some(label),
            contents: bytemuck::cast_slice(&[initial]),
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
        });

        let bind_group = BindGroupBuilder::new(label)
            .uniform(0, &buffer)
            .build_for_layout(device, layout);

        Self {
            buffer,
            bind_group,
            _marker: PhantomData,
        }
    }

    pub fn write(&self, queue: &wgpu::Queue, value: T) {
        queue.write_buffer(&self.buffer, 0, bytemuck::cast_slice(&[value]));
    }
}
