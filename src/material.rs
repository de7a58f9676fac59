use crate::color::Color;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Side {
    Front,
    Back,
    Double,
}

#[derive(Debug, Clone)]
pub struct PhongMaterial {
    pub color: Color,
    pub specular: Color,
    pub shininess: f32,
    pub wireframe: bool,
    pub side: Side,
}

impl PhongMaterial {
    pub fn new(color: Color) -> Self {
        Self {
            color,
            ..Default::default()
        }
    }

    pub fn with_side(mut self, side: Side) -> Self {
        self.side = side;
        self
    }

    pub fn with_wireframe(mut self, wireframe: bool) -> Self {
        self.wireframe = wireframe;
        self
    }
}

impl Default for PhongMaterial {
    fn default() -> Self {
        Self {
            color: Color::WHITE,
            specular: Color::from_hex(0x111111),
            shininess: 30.0,
            wireframe: false,
            side: Side::Front,
        }
    }
}

#[derive(Debug, Clone)]
pub struct LineBasicMaterial {
    pub color: Color,
    /// Screen-space width in physical pixels.
    pub line_width: f32,
}

impl LineBasicMaterial {
    pub fn new(color: Color, line_width: f32) -> Self {
        Self { color, line_width }
    }
}
