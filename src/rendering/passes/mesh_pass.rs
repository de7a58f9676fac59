use std::collections::HashMap;

use wgpu::{DepthBiasState, PipelineCompilationOptions, RenderPassDescriptor, StencilState};

use crate::{
    material::Side,
    rendering::{
        passes::{DrawList, SceneTargets},
        render_common::RenderCommon,
        render_object::{MeshPipelineKey, RenderObjectKind, MESH_VBL, MODEL_PRIMITIVE_STATE},
        shader::{self, MESH_SHADER},
        texture::DepthTexture,
    },
};

/// Lit Phong meshes. Clears the scene targets, so it runs first.
pub struct MeshPass {
    pipelines: HashMap<MeshPipelineKey, wgpu::RenderPipeline>,
}

impl MeshPass {
    pub fn create(
        device: &wgpu::Device,
        common: &RenderCommon,
        wireframe_supported: bool,
    ) -> anyhow::Result<Self> {
        let layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("Mesh pipeline layout"),
            bind_group_layouts: &[
                &common.view_layout,
                &common.lights_layout,
                &common.object_layout,
            ],
            push_constant_ranges: &[],
        });

        let mut pipelines = HashMap::new();
        let wireframe_modes: &[bool] = if wireframe_supported {
            &[false, true]
        } else {
            &[false]
        };

        for side in [Side::Front, Side::Back, Side::Double] {
            for &wireframe in wireframe_modes {
                let key = MeshPipelineKey { side, wireframe };
                let pipeline = Self::create_pipeline(device, common, &layout, key)?;
                pipelines.insert(key, pipeline);
            }
        }

        Ok(Self { pipelines })
    }

    fn create_pipeline(
        device: &wgpu::Device,
        common: &RenderCommon,
        layout: &wgpu::PipelineLayout,
        key: MeshPipelineKey,
    ) -> anyhow::Result<wgpu::RenderPipeline> {
        let cull_mode = match key.side {
            Side::Front => Some(wgpu::Face::Back),
            Side::Back => Some(wgpu::Face::Front),
            Side::Double => None,
        };
        let polygon_mode = if key.wireframe {
            wgpu::PolygonMode::Line
        } else {
            wgpu::PolygonMode::Fill
        };

        shader::create_pipeline(device, &MESH_SHADER, |module| {
            device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
                label: Some(&format!("Mesh pipeline ({key:?})")),
                layout: Some(layout),
                vertex: wgpu::VertexState {
                    module,
                    entry_point: Some("vs_main"),
                    buffers: &[MESH_VBL],
                    compilation_options: PipelineCompilationOptions::default(),
                },
                fragment: Some(wgpu::FragmentState {
                    module,
                    entry_point: Some("fs_main"),
                    targets: &[Some(wgpu::ColorTargetState {
                        format: common.format(),
                        blend: Some(wgpu::BlendState::REPLACE),
                        write_mask: wgpu::ColorWrites::ALL,
                    })],
                    compilation_options: PipelineCompilationOptions::default(),
                }),
                primitive: wgpu::PrimitiveState {
                    cull_mode,
                    polygon_mode,
                    ..MODEL_PRIMITIVE_STATE
                },
                depth_stencil: Some(wgpu::DepthStencilState {
                    format: DepthTexture::DEPTH_FORMAT,
                    depth_write_enabled: true,
                    depth_compare: wgpu::CompareFunction::Less,
                    stencil: StencilState::default(),
                    bias: DepthBiasState::default(),
                }),
                multisample: common.multisample(),
                multiview: None,
                cache: None,
            })
        })
    }

    /// Wireframe materials fall back to filled rendering when the adapter
    /// lacks line polygon mode.
    fn pipeline(&self, key: MeshPipelineKey) -> Option<&wgpu::RenderPipeline> {
        self.pipelines.get(&key).or_else(|| {
            self.pipelines.get(&MeshPipelineKey {
                wireframe: false,
                ..key
            })
        })
    }

    pub fn render(
        &self,
        encoder: &mut wgpu::CommandEncoder,
        targets: &SceneTargets,
        clear_color: wgpu::Color,
        lights_bind_group: &wgpu::BindGroup,
        draws: &DrawList,
    ) {
        let mut render_pass = encoder.begin_render_pass(&RenderPassDescriptor {
            label: Some("Mesh Pass"),
            color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                view: targets.color,
                resolve_target: None,
                ops: wgpu::Operations {
                    load: wgpu::LoadOp::Clear(clear_color),
                    store: wgpu::StoreOp::Store,
                },
            })],
            depth_stencil_attachment: Some(wgpu::RenderPassDepthStencilAttachment {
                view: targets.depth,
                depth_ops: Some(wgpu::Operations {
                    load: wgpu::LoadOp::Clear(1.0),
                    store: wgpu::StoreOp::Store,
                }),
                stencil_ops: None,
            }),
            occlusion_query_set: None,
            timestamp_writes: None,
        });

        render_pass.set_bind_group(0, draws.view_bind_group, &[]);
        render_pass.set_bind_group(1, lights_bind_group, &[]);

        for object in draws.objects {
            let RenderObjectKind::Mesh {
                geometry, pipeline, ..
            } = &object.kind
            else {
                continue;
            };
            let (Some(geometry), Some(pipeline)) =
                (draws.geometries.get(geometry), self.pipeline(*pipeline))
            else {
                continue;
            };

            render_pass.set_pipeline(pipeline);
            render_pass.set_bind_group(2, &object.uniform.bind_group, &[]);
            render_pass.set_vertex_buffer(0, geometry.vertex_buffer.slice(..));
            render_pass.draw(0..geometry.num_vertices, 0..1);
        }
    }
}
