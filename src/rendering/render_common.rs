use winit::dpi::PhysicalSize;

use crate::{config::RenderConfig, rendering::util::bind_group_builder::uniform_layout};

/// Surface configuration and bind group layouts shared by every pass.
pub struct RenderCommon {
    pub surface_config: wgpu::SurfaceConfiguration,
    pub sample_count: u32,
    pub clear_color: wgpu::Color,
    pub view_layout: wgpu::BindGroupLayout,
    pub object_layout: wgpu::BindGroupLayout,
    pub lights_layout: wgpu::BindGroupLayout,
}

impl RenderCommon {
    pub fn new(
        device: &wgpu::Device,
        adapter: &wgpu::Adapter,
        surface: &wgpu::Surface,
        size: PhysicalSize<u32>,
        config: &RenderConfig,
    ) -> anyhow::Result<Self> {
        let surface_caps = surface.get_capabilities(adapter);
        let surface_format = surface_caps
            .formats
            .iter()
            .find(|f| f.is_srgb())
            .copied()
            .or_else(|| surface_caps.formats.first().copied())
            .ok_or_else(|| anyhow::anyhow!("Surface is not compatible with the adapter"))?;

        let alpha_mode = choose_alpha_mode(&surface_caps.alpha_modes, config.transparent_background);
        if config.transparent_background
            && !matches!(
                alpha_mode,
                wgpu::CompositeAlphaMode::PreMultiplied | wgpu::CompositeAlphaMode::PostMultiplied
            )
        {
            log::warn!("Transparent background requested but the surface only offers {alpha_mode:?}");
        }

        let present_mode = surface_caps
            .present_modes
            .first()
            .copied()
            .unwrap_or(wgpu::PresentMode::Fifo);

        let surface_config = wgpu::SurfaceConfiguration {
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            format: surface_format,
            width: size.width.max(1),
            height: size.height.max(1),
            present_mode,
            alpha_mode,
            view_formats: vec![],
            desired_maximum_frame_latency: 2,
        };

        surface.configure(device, &surface_config);

        let sample_count = supported_sample_count(adapter, surface_format, config.sample_count());

        log::info!(
            "Surface {}x{} {:?}, alpha {:?}, {}x MSAA",
            surface_config.width,
            surface_config.height,
            surface_format,
            alpha_mode,
            sample_count
        );

        let clear_color = if config.transparent_background {
            wgpu::Color::TRANSPARENT
        } else {
            wgpu::Color::BLACK
        };

        let view_layout = uniform_layout(device, "View", wgpu::ShaderStages::VERTEX_FRAGMENT);
        let object_layout = uniform_layout(device, "Object", wgpu::ShaderStages::VERTEX_FRAGMENT);
        let lights_layout = lights_layout(device);

        Ok(Self {
            surface_config,
            sample_count,
            clear_color,
            view_layout,
            object_layout,
            lights_layout,
        })
    }

    pub fn format(&self) -> wgpu::TextureFormat {
        self.surface_config.format
    }

    pub fn size(&self) -> PhysicalSize<u32> {
        PhysicalSize::new(self.surface_config.width, self.surface_config.height)
    }

    pub fn multisample(&self) -> wgpu::MultisampleState {
        wgpu::MultisampleState {
            count: self.sample_count,
            ..Default::default()
        }
    }
}

fn choose_alpha_mode(
    available: &[wgpu::CompositeAlphaMode],
    transparent: bool,
) -> wgpu::CompositeAlphaMode {
    let preferred: &[wgpu::CompositeAlphaMode] = if transparent {
        &[
            wgpu::CompositeAlphaMode::PreMultiplied,
            wgpu::CompositeAlphaMode::PostMultiplied,
        ]
    } else {
        &[wgpu::CompositeAlphaMode::Opaque]
    };

    preferred
        .iter()
        .find(|mode| available.contains(*mode))
        .or_else(|| available.first())
        .copied()
        .unwrap_or(wgpu::CompositeAlphaMode::Auto)
}

fn supported_sample_count(
    adapter: &wgpu::Adapter,
    format: wgpu::TextureFormat,
    requested: u32,
) -> u32 {
    if requested <= 1 {
        return 1;
    }

    let flags = adapter.get_texture_format_features(format).flags;
    if flags.sample_count_supported(requested) {
        requested
    } else {
        log::warn!("{requested}x MSAA not supported for {format:?}, rendering without it");
        1
    }
}

fn lights_layout(device: &wgpu::Device) -> wgpu::BindGroupLayout {
    device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
        label: Some("Lights bind group layout"),
        entries: &[
            wgpu::BindGroupLayoutEntry {
                binding: 0,
                visibility: wgpu::ShaderStages::VERTEX_FRAGMENT,
                ty: wgpu::BindingType::Buffer {
                    ty: wgpu::BufferBindingType::Uniform,
                    has_dynamic_offset: false,
                    min_binding_size: None,
                },
                count: None,
            },
            wgpu::BindGroupLayoutEntry {
                binding: 1,
                visibility: wgpu::ShaderStages::FRAGMENT,
                ty: wgpu::BindingType::Texture {
                    sample_type: wgpu::TextureSampleType::Depth,
                    view_dimension: wgpu::TextureViewDimension::D2,
                    multisampled: false,
                },
                count: None,
            },
            wgpu::BindGroupLayoutEntry {
                binding: 2,
                visibility: wgpu::ShaderStages::FRAGMENT,
                ty: wgpu::BindingType::Sampler(wgpu::SamplerBindingType::Comparison),
                count: None,
            },
        ],
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use wgpu::CompositeAlphaMode;

    #[test]
    fn transparent_prefers_premultiplied() {
        let available = [
            CompositeAlphaMode::Opaque,
            CompositeAlphaMode::PostMultiplied,
            CompositeAlphaMode::PreMultiplied,
        ];
        assert_eq!(
            choose_alpha_mode(&available, true),
            CompositeAlphaMode::PreMultiplied
        );
    }

    #[test]
    fn transparent_falls_back_to_first_mode() {
        let available = [CompositeAlphaMode::Opaque];
        assert_eq!(choose_alpha_mode(&available, true), CompositeAlphaMode::Opaque);
    }

    #[test]
    fn opaque_when_transparency_is_off() {
        let available = [CompositeAlphaMode::PreMultiplied, CompositeAlphaMode::Opaque];
        assert_eq!(choose_alpha_mode(&available, false), CompositeAlphaMode::Opaque);
    }

    #[test]
    fn empty_caps_use_auto() {
        assert_eq!(choose_alpha_mode(&[], true), CompositeAlphaMode::Auto);
    }
}
