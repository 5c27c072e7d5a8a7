//! GPU-facing frame layout shared by every render backend.

use crate::palette::Rgb;

/// One node or pulse sprite.
#[repr(C)]
#[derive(Copy, Clone, Debug, Default, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct SpriteInstance {
    /// xyz in scene space, w = radius in scene units.
    pub pos_size: [f32; 4],
    /// rgb + alpha (alpha carries glow).
    pub color: [f32; 4],
}

/// One end of a link segment; links are drawn as a line list.
#[repr(C)]
#[derive(Copy, Clone, Debug, Default, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct LineVertex {
    pub pos: [f32; 4],
    pub color: [f32; 4],
}

#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct FrameUniforms {
    pub view_proj: [[f32; 4]; 4],
    pub resolution: [f32; 2],
    pub time: f32,
    pub aspect: f32,
}

impl Default for FrameUniforms {
    fn default() -> Self {
        Self {
            view_proj: glam::Mat4::IDENTITY.to_cols_array_2d(),
            resolution: [1.0, 1.0],
            time: 0.0,
            aspect: 1.0,
        }
    }
}

/// Everything a backend needs to draw one frame. Borrowed from the scene's
/// reusable buffers; valid for the duration of the draw call only.
#[derive(Clone, Copy, Debug)]
pub struct FrameData<'a> {
    pub uniforms: FrameUniforms,
    pub clear: Rgb,
    pub links: &'a [LineVertex],
    pub nodes: &'a [SpriteInstance],
    pub pulses: &'a [SpriteInstance],
}

/// Sizes fixed at attach time; backends allocate exactly this much.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct AllocationRequest {
    pub node_capacity: usize,
    pub link_vertex_capacity: usize,
    pub pulse_capacity: usize,
    pub disc_segments: u32,
    pub physical_size: (u32, u32),
}
