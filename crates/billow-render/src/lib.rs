//! # billow-render
//!
//! The boundary between the physics core and whatever draws it.
//!
//! [`SurfaceSampler`] flattens resolved particle positions into a vertex
//! buffer once per frame. A [`Renderer`] consumes that buffer; the
//! [`HeadlessRenderer`] counts frames and the [`JsonFrameExporter`]
//! records them, with a matching triangle index buffer, to a JSON file.

pub mod json_exporter;
pub mod renderer;
pub mod sampler;

pub use json_exporter::JsonFrameExporter;
pub use renderer::{HeadlessRenderer, RenderFrame, Renderer};
pub use sampler::SurfaceSampler;
