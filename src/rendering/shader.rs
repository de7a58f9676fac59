use anyhow::Context;
use pollster::block_on;
use wgpu::{PollType, ShaderSource};

const COMMON_SOURCE: &str = include_str!("shaders/common.wgsl");

#[derive(Debug, Clone)]
pub(crate) struct ShaderDefinition {
    pub name: &'static str,
    pub source: &'static str,
}

pub(crate) const MESH_SHADER: ShaderDefinition = ShaderDefinition {
    name: "Mesh shader",
    source: include_str!("shaders/mesh.wgsl"),
};

pub(crate) const SHADOW_SHADER: ShaderDefinition = ShaderDefinition {
    name: "Shadow shader",
    source: include_str!("shaders/shadow.wgsl"),
};

pub(crate) const LINE_SHADER: ShaderDefinition = ShaderDefinition {
    name: "Line shader",
    source: include_str!("shaders/line.wgsl"),
};

impl ShaderDefinition {
    pub fn full_source(&self) -> String {
        format!("{COMMON_SOURCE}\n{}", self.source)
    }
}

/// Compiles a shader and builds a pipeline from it, turning validation
/// errors into a proper error instead of a panic inside wgpu.
pub(crate) fn create_pipeline<F>(
    device: &wgpu::Device,
    shader_def: &ShaderDefinition,
    build: F,
) -> anyhow::Result<wgpu::RenderPipeline>
where
    F: FnOnce(&wgpu::ShaderModule) -> wgpu::RenderPipeline,
{
    device.push_error_scope(wgpu::ErrorFilter::Validation);

    let shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
        label: Some(shader_def.name),
        source: ShaderSource::Wgsl(shader_def.full_source().into()),
    });
    let pipeline = build(&shader);

    device
        .poll(PollType::Wait)
        .context("Failed to poll device after shader compilation.")?;

    if let Some(error) = block_on(device.pop_error_scope()) {
        return Err(anyhow::anyhow!(
            "Shader compilation failed for {}: {}",
            shader_def.name,
            error
        ));
    }

    log::debug!("Compiled {}", shader_def.name);

    Ok(pipeline)
}
