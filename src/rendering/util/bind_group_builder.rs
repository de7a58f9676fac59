/// Collects bind group entries for a layout created elsewhere.
pub struct BindGroupBuilder<'a> {
    label: &'a str,
    entries: Vec<wgpu::BindGroupEntry<'a>>,
}

impl<'a> BindGroupBuilder<'a> {
    pub fn new(label: &'a str) -> Self {
        Self {
            label,
            entries: Vec::new(),
        }
    }

    fn push(mut self, binding: u32, resource: wgpu::BindingResource<'a>) -> Self {
        self.entries.push(wgpu::BindGroupEntry { binding, resource });
        self
    }

    pub fn uniform(self, binding: u32, buffer: &'a wgpu::Buffer) -> Self {
        self.push(binding, buffer.as_entire_binding())
    }

    pub fn depth_texture(self, binding: u32, view: &'a wgpu::TextureView) -> Self {
        self.push(binding, wgpu::BindingResource::TextureView(view))
    }

    pub fn comparison_sampler(self, binding: u32, sampler: &'a wgpu::Sampler) -> Self {
        self.push(binding, wgpu::BindingResource::Sampler(sampler))
    }

    pub fn build_for_layout(
        self,
        device: &wgpu::Device,
        layout: &wgpu::BindGroupLayout,
    ) -> wgpu::BindGroup {
        device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some(&format!("{} bind group", self.label)),
            layout,
            entries: &self.entries,
        })
    }
}

/// Layout for a bind group holding a single uniform buffer at binding 0.
pub fn uniform_layout(
    device: &wgpu::Device,
    label: &str,
    visibility: wgpu::ShaderStages,
) -> wgpu::BindGroupLayout {
    device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
        label: Some(&format!("{label} bind group layout")),
        entries: &[wgpu::BindGroupLayoutEntry {
            binding: 0,
            visibility,
            ty: wgpu::BindingType::Buffer {
                ty: wgpu::BufferBindingType::Uniform,
                has_dynamic_offset: false,
                min_binding_size: None,
            },
            count: None,
        }],
    })
}
