use std::mem::offset_of;

use bytemuck::{Pod, Zeroable};
use glam::Vec3;
use wgpu::util::DeviceExt;

use crate::{
    geometry::{EdgesGeometry, Geometry, GeometryId},
    material::Side,
    rendering::uniforms::{ObjectUniform, UniformBuffer},
};

#[repr(C)]
#[derive(Copy, Clone, Debug, Pod, Zeroable)]
pub struct MeshVertex {
    position: Vec3,
    normal: Vec3,
}

pub const MESH_VBL: wgpu::VertexBufferLayout<'static> = wgpu::VertexBufferLayout {
    array_stride: std::mem::size_of::<MeshVertex>() as wgpu::BufferAddress,
    step_mode: wgpu::VertexStepMode::Vertex,
    attributes: &[
        wgpu::VertexAttribute {
            offset: offset_of!(MeshVertex, position) as wgpu::BufferAddress,
            shader_location: 0,
            format: wgpu::VertexFormat::Float32x3,
        },
        wgpu::VertexAttribute {
            offset: offset_of!(MeshVertex, normal) as wgpu::BufferAddress,
            shader_location: 1,
            format: wgpu::VertexFormat::Float32x3,
        },
    ],
};

/// One line segment, drawn as an instance of a six-vertex quad.
#[repr(C)]
#[derive(Copy, Clone, Debug, Pod, Zeroable)]
pub struct LineSegment {
    start: Vec3,
    end: Vec3,
}

pub const LINE_SEGMENT_VBL: wgpu::VertexBufferLayout<'static> = wgpu::VertexBufferLayout {
    array_stride: std::mem::size_of::<LineSegment>() as wgpu::BufferAddress,
    step_mode: wgpu::VertexStepMode::Instance,
    attributes: &[
        wgpu::VertexAttribute {
            offset: offset_of!(LineSegment, start) as wgpu::BufferAddress,
            shader_location: 0,
            format: wgpu::VertexFormat::Float32x3,
        },
        wgpu::VertexAttribute {
            offset: offset_of!(LineSegment, end) as wgpu::BufferAddress,
            shader_location: 1,
            format: wgpu::VertexFormat::Float32x3,
        },
    ],
};

pub const LINE_QUAD_VERTICES: u32 = 6;

pub struct RenderGeometry {
    pub vertex_buffer: wgpu::Buffer,
    pub num_vertices: u32,
}

impl RenderGeometry {
    pub fn from_geometry(device: &wgpu::Device, geometry: &Geometry) -> Self {
        let vertices: Vec<MeshVertex> = geometry
            .positions
            .iter()
            .zip(&geometry.normals)
            .map(|(&position, &normal)| MeshVertex { position, normal })
            .collect();

        let vertex_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some(&format!("Vertex buffer ({})", geometry.name)),
            contents: bytemuck::cast_slice(&vertices),
            usage: wgpu::BufferUsages::VERTEX,
        });

        Self {
            vertex_buffer,
            num_vertices: vertices.len() as u32,
        }
    }
}

pub struct RenderLines {
    pub segment_buffer: wgpu::Buffer,
    pub num_segments: u32,
}

impl RenderLines {
    pub fn from_edges(device: &wgpu::Device, name: &str, edges: &EdgesGeometry) -> Self {
        let segments: Vec<LineSegment> = edges
            .segments
            .iter()
            .map(|&[start, end]| LineSegment { start, end })
            .collect();

        let segment_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some(&format!("Line segment buffer ({name})")),
            contents: bytemuck::cast_slice(&segments),
            usage: wgpu::BufferUsages::VERTEX,
        });

        Self {
            segment_buffer,
            num_segments: segments.len() as u32,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct MeshPipelineKey {
    pub side: Side,
    pub wireframe: bool,
}

pub enum RenderObjectKind {
    Mesh {
        geometry: GeometryId,
        pipeline: MeshPipelineKey,
        cast_shadow: bool,
    },
    Lines(RenderLines),
}

/// GPU-side counterpart of a drawable scene object.
pub struct RenderObject {
    pub uniform: UniformBuffer<ObjectUniform>,
    pub kind: RenderObjectKind,
}

pub const MODEL_PRIMITIVE_STATE: wgpu::PrimitiveState = wgpu::PrimitiveState {
    topology: wgpu::PrimitiveTopology::TriangleList,
    strip_index_format: None,
    front_face: wgpu::FrontFace::Ccw,
    cull_mode: Some(wgpu::Face::Back),
    polygon_mode: wgpu::PolygonMode::Fill,
    unclipped_depth: false,
    conservative: false,
};
