pub mod passes;
pub mod render_common;
pub mod render_object;
pub mod renderer;
pub mod shader;
pub mod texture;
pub mod uniforms;
pub mod util;
