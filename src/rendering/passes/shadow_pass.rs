use wgpu::{DepthBiasState, PipelineCompilationOptions, RenderPassDescriptor, StencilState};

use crate::rendering::{
    passes::DrawList,
    render_common::RenderCommon,
    render_object::{RenderObjectKind, MESH_VBL, MODEL_PRIMITIVE_STATE},
    shader::{self, SHADOW_SHADER},
    texture::DepthTexture,
};

/// Renders shadow casters into the spot light's depth map.
pub struct ShadowPass {
    pipeline: wgpu::RenderPipeline,
}

impl ShadowPass {
    pub fn create(device: &wgpu::Device, common: &RenderCommon) -> anyhow::Result<Self> {
        let layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("Shadow pipeline layout"),
            bind_group_layouts: &[&common.view_layout, &common.object_layout],
            push_constant_ranges: &[],
        });

        let pipeline = shader::create_pipeline(device, &SHADOW_SHADER, |module| {
            device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
                label: Some("Shadow pipeline"),
                layout: Some(&layout),
                vertex: wgpu::VertexState {
                    module,
                    entry_point: Some("vs_main"),
                    buffers: &[MESH_VBL],
                    compilation_options: PipelineCompilationOptions::default(),
                },
                fragment: None,
                primitive: wgpu::PrimitiveState {
                    cull_mode: None,
                    ..MODEL_PRIMITIVE_STATE
                },
                depth_stencil: Some(wgpu::DepthStencilState {
                    format: DepthTexture::DEPTH_FORMAT,
                    depth_write_enabled: true,
                    depth_compare: wgpu::CompareFunction::LessEqual,
                    stencil: StencilState::default(),
                    bias: DepthBiasState::default(),
                }),
                multisample: wgpu::MultisampleState::default(),
                multiview: None,
                cache: None,
            })
        })?;

        Ok(Self { pipeline })
    }

    pub fn render(
        &self,
        encoder: &mut wgpu::CommandEncoder,
        shadow_map: &wgpu::TextureView,
        draws: &DrawList,
    ) {
        let mut render_pass = encoder.begin_render_pass(&RenderPassDescriptor {
            label: Some("Shadow Pass"),
            color_attachments: &[],
            depth_stencil_attachment: Some(wgpu::RenderPassDepthStencilAttachment {
                view: shadow_map,
                depth_ops: Some(wgpu::Operations {
                    load: wgpu::LoadOp::Clear(1.0),
                    store: wgpu::StoreOp::Store,
                }),
                stencil_ops: None,
            }),
            occlusion_query_set: None,
            timestamp_writes: None,
        });

        render_pass.set_pipeline(&self.pipeline);
        render_pass.set_bind_group(0, draws.view_bind_group, &[]);

        for object in draws.objects {
            let RenderObjectKind::Mesh {
                geometry,
                cast_shadow: true,
                ..
            } = &object.kind
            else {
                continue;
            };
            let Some(geometry) = draws.geometries.get(geometry) else {
                continue;
            };

            render_pass.set_bind_group(1, &object.uniform.bind_group, &[]);
            render_pass.set_vertex_buffer(0, geometry.vertex_buffer.slice(..));
            render_pass.draw(0..geometry.num_vertices, 0..1);
        }
    }
}
