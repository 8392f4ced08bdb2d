//! Orbit and resonance rings, tessellated with lyon after the caller has
//! projected them to pixels.

use bytemuck::{Pod, Zeroable};
use glam::Vec2;
use lyon::math::point;
use lyon::path::Path;
use lyon::tessellation::{
    BuffersBuilder, FillOptions, FillRule, FillTessellator, FillVertex, FillVertexConstructor,
    StrokeOptions, StrokeTessellator, StrokeVertex, StrokeVertexConstructor, VertexBuffers,
};

/// Screen-space vertex with straight RGBA.
#[repr(C)]
#[derive(Debug, Clone, Copy, Default, Pod, Zeroable)]
pub struct VectorVertex {
    pub x: f32,
    pub y: f32,
    pub r: f32,
    pub g: f32,
    pub b: f32,
    pub a: f32,
}

impl VectorVertex {
    pub const FLOATS: usize = 6;

    fn at(x: f32, y: f32, rgba: [f32; 4]) -> Self {
        Self { x, y, r: rgba[0], g: rgba[1], b: rgba[2], a: rgba[3] }
    }
}

/// Flat color applied to every vertex lyon emits.
struct Paint([f32; 4]);

impl FillVertexConstructor<VectorVertex> for Paint {
    fn new_vertex(&mut self, vertex: FillVertex) -> VectorVertex {
        let p = vertex.position();
        VectorVertex::at(p.x, p.y, self.0)
    }
}

impl StrokeVertexConstructor<VectorVertex> for Paint {
    fn new_vertex(&mut self, vertex: StrokeVertex) -> VectorVertex {
        let p = vertex.position();
        VectorVertex::at(p.x, p.y, self.0)
    }
}

/// One sub-path per ring. Callers guarantee every ring is non-empty.
fn path_of(rings: &[&[Vec2]], closed: bool) -> Path {
    let mut builder = Path::builder();
    for ring in rings {
        let mut pts = ring.iter().map(|p| point(p.x, p.y));
        if let Some(first) = pts.next() {
            builder.begin(first);
            pts.for_each(|p| {
                builder.line_to(p);
            });
            builder.end(closed);
        }
    }
    builder.build()
}

const TOLERANCE: f32 = 0.5;

/// Screen-space shapes for the current frame, flattened to a triangle list
/// of [`VectorVertex`]. Shapes that would overflow the budget are skipped whole.
pub struct VectorState {
    fill_tess: FillTessellator,
    stroke_tess: StrokeTessellator,
    scratch: VertexBuffers<VectorVertex, u32>,
    buffer: Vec<f32>,
    max_vertices: usize,
}

impl VectorState {
    pub fn with_capacity(max_vertices: usize) -> Self {
        Self {
            fill_tess: FillTessellator::new(),
            stroke_tess: StrokeTessellator::new(),
            scratch: VertexBuffers::new(),
            buffer: Vec::with_capacity(max_vertices * VectorVertex::FLOATS),
            max_vertices,
        }
    }

    pub fn clear(&mut self) {
        self.buffer.clear();
    }

    pub fn vertex_count(&self) -> usize {
        self.buffer.len() / VectorVertex::FLOATS
    }

    pub fn buffer_ptr(&self) -> *const f32 {
        self.buffer.as_ptr()
    }

    /// Move the scratch mesh into the output buffer, de-indexed.
    fn commit<E: std::fmt::Debug>(&mut self, outcome: Result<(), E>) {
        let wanted = self.scratch.indices.len();
        match outcome {
            Err(e) => log::warn!("vector tessellation failed: {:?}", e),
            Ok(()) if self.vertex_count() + wanted > self.max_vertices => {
                log::warn!("vector buffer full, skipping a {}-vertex shape", wanted);
            }
            Ok(()) => {
                let VertexBuffers { vertices, indices } = &self.scratch;
                self.buffer.extend(
                    indices
                        .iter()
                        .flat_map(|&i| bytemuck::cast::<VectorVertex, [f32; VectorVertex::FLOATS]>(vertices[i as usize])),
                );
            }
        }
        self.scratch.vertices.clear();
        self.scratch.indices.clear();
    }

    fn fill(&mut self, path: &Path, rule: FillRule, rgba: [f32; 4]) {
        let options = FillOptions::tolerance(TOLERANCE).with_fill_rule(rule);
        let outcome = self
            .fill_tess
            .tessellate_path(path, &options, &mut BuffersBuilder::new(&mut self.scratch, Paint(rgba)));
        self.commit(outcome);
    }

    fn stroke(&mut self, path: &Path, width: f32, rgba: [f32; 4]) {
        let options = StrokeOptions::tolerance(TOLERANCE).with_line_width(width);
        let outcome = self
            .stroke_tess
            .tessellate_path(path, &options, &mut BuffersBuilder::new(&mut self.scratch, Paint(rgba)));
        self.commit(outcome);
    }

    /// Solid band between two closed outlines. A degenerate `inner`
    /// fills the whole `outer` disc.
    pub fn fill_annulus(&mut self, outer: &[Vec2], inner: &[Vec2], rgba: [f32; 4]) {
        if outer.len() < 3 {
            return;
        }
        let path = if inner.len() < 3 {
            path_of(&[outer], true)
        } else {
            path_of(&[outer, inner], true)
        };
        self.fill(&path, FillRule::EvenOdd, rgba);
    }

    pub fn stroke_polyline(&mut self, points: &[Vec2], width: f32, rgba: [f32; 4]) {
        if points.len() >= 2 {
            self.stroke(&path_of(&[points], false), width, rgba);
        }
    }

    pub fn stroke_polygon(&mut self, points: &[Vec2], width: f32, rgba: [f32; 4]) {
        if points.len() >= 3 {
            self.stroke(&path_of(&[points], true), width, rgba);
        }
    }
}
