//! JSON frame exporter.
//!
//! Captures the sampled vertex buffer each frame and writes the whole
//! animation, with a triangle index buffer for the lattice, on
//! `finalize()`.

use std::path::{Path, PathBuf};

use serde::Serialize;

use billow_mesh::generators::lattice_triangles;
use billow_mesh::Lattice;
use billow_types::{BillowError, BillowResult};

use crate::renderer::{RenderFrame, Renderer};

#[derive(Serialize)]
struct FrameData {
    frame: u64,
    positions: Vec<f32>, // Interleaved [x0,y0,z0, x1,y1,z1, ...]
}

#[derive(Serialize)]
struct AnimationData<'a> {
    vertex_count: usize,
    triangle_count: usize,
    indices: &'a [u32],
    frames: &'a [FrameData],
}

/// Records frames to a JSON file for offline inspection.
///
/// ```text
/// let mut exporter = JsonFrameExporter::new("frames.json");
/// exporter.init(&lattice)?;
/// // ... submit_frame() once per frame ...
/// exporter.finalize()?; // Writes the file
/// ```
pub struct JsonFrameExporter {
    output_path: PathBuf,
    indices: Vec<u32>,
    vertex_count: usize,
    /// Frames awaiting the next `finalize`.
    frames: Vec<FrameData>,
    /// Frames accepted since creation, including exported ones.
    submitted: u32,
}

impl JsonFrameExporter {
    /// Creates an exporter that will write to `output_path`.
    pub fn new(output_path: impl AsRef<Path>) -> Self {
        Self {
            output_path: output_path.as_ref().to_path_buf(),
            indices: Vec::new(),
            vertex_count: 0,
            frames: Vec::new(),
            submitted: 0,
        }
    }

    pub fn output_path(&self) -> &Path {
        &self.output_path
    }
}

impl Renderer for JsonFrameExporter {
    fn init(&mut self, lattice: &Lattice) -> BillowResult<()> {
        self.vertex_count = lattice.particle_count();
        self.indices = lattice_triangles(lattice);
        Ok(())
    }

    fn submit_frame(&mut self, frame: &RenderFrame<'_>) -> BillowResult<()> {
        if frame.vertex_count() != self.vertex_count {
            return Err(BillowError::InvalidLattice(format!(
                "frame has {} vertices, exporter expects {}",
                frame.vertex_count(),
                self.vertex_count
            )));
        }
        self.frames.push(FrameData {
            frame: frame.frame,
            positions: frame.vertices.to_vec(),
        });
        self.submitted += 1;
        Ok(())
    }

    fn finalize(&mut self) -> BillowResult<()> {
        let data = AnimationData {
            vertex_count: self.vertex_count,
            triangle_count: self.indices.len() / 3,
            indices: &self.indices,
            frames: &self.frames,
        };
        let json = serde_json::to_string(&data)
            .map_err(|e| BillowError::Serialization(format!("JSON serialization failed: {e}")))?;
        std::fs::write(&self.output_path, json)?;
        tracing::info!(
            path = %self.output_path.display(),
            frames = self.frames.len(),
            "frames exported"
        );
        self.frames.clear();
        Ok(())
    }

    fn name(&self) -> &str {
        "json_exporter"
    }

    fn frame_count(&self) -> u32 {
        self.submitted
    }
}
