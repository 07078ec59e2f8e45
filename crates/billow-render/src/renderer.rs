//! Renderer trait and HeadlessRenderer.
//!
//! The renderer is called once per frame with the sampled vertex buffer.
//! The headless renderer discards frames; it backs the CLI and tests.

use billow_mesh::Lattice;
use billow_types::BillowResult;

/// One frame of sampled vertices.
#[derive(Debug, Clone, Copy)]
pub struct RenderFrame<'a> {
    /// Frame this buffer belongs to.
    pub frame: u64,
    /// Interleaved positions, `3 · particle_count` long.
    pub vertices: &'a [f32],
}

impl<'a> RenderFrame<'a> {
    pub fn new(frame: u64, vertices: &'a [f32]) -> Self {
        Self { frame, vertices }
    }

    pub fn vertex_count(&self) -> usize {
        self.vertices.len() / 3
    }
}

/// Trait for presenting sampled cloth frames.
///
/// # Implementations
/// - [`HeadlessRenderer`] — counts frames, draws nothing
/// - [`JsonFrameExporter`](crate::JsonFrameExporter) — records frames to JSON
pub trait Renderer: Send {
    /// Initialize the renderer with the lattice the frames come from.
    fn init(&mut self, lattice: &Lattice) -> BillowResult<()>;

    /// Submit a frame for rendering.
    fn submit_frame(&mut self, frame: &RenderFrame<'_>) -> BillowResult<()>;

    /// Finalize rendering (flush buffers, close files).
    fn finalize(&mut self) -> BillowResult<()>;

    /// Returns the renderer name.
    fn name(&self) -> &str;

    /// Returns the number of frames submitted.
    fn frame_count(&self) -> u32;
}

/// Headless renderer: discards all frames.
#[derive(Debug, Default)]
pub struct HeadlessRenderer {
    frames: u32,
    vertex_count: usize,
}

impl HeadlessRenderer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Vertex count of the last submitted frame.
    pub fn last_vertex_count(&self) -> usize {
        self.vertex_count
    }
}

impl Renderer for HeadlessRenderer {
    fn init(&mut self, _lattice: &Lattice) -> BillowResult<()> {
        Ok(())
    }

    fn submit_frame(&mut self, frame: &RenderFrame<'_>) -> BillowResult<()> {
        self.frames += 1;
        self.vertex_count = frame.vertex_count();
        Ok(())
    }

    fn finalize(&mut self) -> BillowResult<()> {
        Ok(())
    }

    fn name(&self) -> &str {
        "headless"
    }

    fn frame_count(&self) -> u32 {
        self.frames
    }
}
