use std::collections::HashMap;

use crate::{
    geometry::GeometryId,
    rendering::render_object::{RenderGeometry, RenderObject},
};

pub mod line_pass;
pub mod mesh_pass;
pub mod shadow_pass;

/// Colour and depth attachments of the main scene passes. `resolve` is the
/// surface view when `color` is a multisampled target.
pub struct SceneTargets<'a> {
    pub color: &'a wgpu::TextureView,
    pub resolve: Option<&'a wgpu::TextureView>,
    pub depth: &'a wgpu::TextureView,
}

/// Everything a pass needs to issue draws for one frame.
pub struct DrawList<'a> {
    pub view_bind_group: &'a wgpu::BindGroup,
    pub objects: &'a [&'a RenderObject],
    pub geometries: &'a HashMap<GeometryId, RenderGeometry>,
}
