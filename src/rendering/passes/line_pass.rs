use wgpu::{DepthBiasState, PipelineCompilationOptions, RenderPassDescriptor, StencilState};

use crate::rendering::{
    passes::{DrawList, SceneTargets},
    render_common::RenderCommon,
    render_object::{RenderObjectKind, LINE_QUAD_VERTICES, LINE_SEGMENT_VBL, MODEL_PRIMITIVE_STATE},
    shader::{self, LINE_SHADER},
    texture::DepthTexture,
};

/// Screen-space thick lines. Runs after the mesh pass and resolves the
/// multisampled target into the surface.
pub struct LinePass {
    pipeline: wgpu::RenderPipeline,
}

impl LinePass {
    pub fn create(device: &wgpu::Device, common: &RenderCommon) -> anyhow::Result<Self> {
        let layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("Line pipeline layout"),
            bind_group_layouts: &[&common.view_layout, &common.object_layout],
            push_constant_ranges: &[],
        });

        let pipeline = shader::create_pipeline(device, &LINE_SHADER, |module| {
            device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
                label: Some("Line pipeline"),
                layout: Some(&layout),
                vertex: wgpu::VertexState {
                    module,
                    entry_point: Some("vs_main"),
                    buffers: &[LINE_SEGMENT_VBL],
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
                multisample: common.multisample(),
                multiview: None,
                cache: None,
            })
        })?;

        Ok(Self { pipeline })
    }

    pub fn render(
        &self,
        encoder: &mut wgpu::CommandEncoder,
        targets: &SceneTargets,
        draws: &DrawList,
    ) {
        let mut render_pass = encoder.begin_render_pass(&RenderPassDescriptor {
            label: Some("Line Pass"),
            color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                view: targets.color,
                resolve_target: targets.resolve,
                ops: wgpu::Operations {
                    load: wgpu::LoadOp::Load,
                    store: wgpu::StoreOp::Store,
                },
            })],
            depth_stencil_attachment: Some(wgpu::RenderPassDepthStencilAttachment {
                view: targets.depth,
                depth_ops: Some(wgpu::Operations {
                    load: wgpu::LoadOp::Load,
                    store: wgpu::StoreOp::Discard,
                }),
                stencil_ops: None,
            }),
            occlusion_query_set: None,
            timestamp_writes: None,
        });

        render_pass.set_pipeline(&self.pipeline);
        render_pass.set_bind_group(0, draws.view_bind_group, &[]);

        for object in draws.objects {
            let RenderObjectKind::Lines(lines) = &object.kind else {
                continue;
            };

            render_pass.set_bind_group(1, &object.uniform.bind_group, &[]);
            render_pass.set_vertex_buffer(0, lines.segment_buffer.slice(..));
            render_pass.draw(0..LINE_QUAD_VERTICES, 0..lines.num_segments);
        }
    }
}
