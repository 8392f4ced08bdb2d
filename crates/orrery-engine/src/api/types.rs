use bytemuck::{Pod, Zeroable};

/// Handle of a scene entity. Allocated by [`EngineContext::next_id`](crate::EngineContext::next_id)
/// and never reused within one context.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct EntityId(pub u32);

/// Outbound notification for the UI, copied verbatim into the event section
/// of the shared buffer. The meaning of `a`, `b`, `c` depends on `kind`.
#[repr(C)]
#[derive(Debug, Clone, Copy, Default, PartialEq, Pod, Zeroable)]
pub struct GameEvent {
    pub kind: f32,
    pub a: f32,
    pub b: f32,
    pub c: f32,
}

impl GameEvent {
    /// Width of one event record in the shared buffer.
    pub const FLOATS: usize = 4;

    pub const fn new(kind: f32, a: f32, b: f32, c: f32) -> Self {
        Self { kind, a, b, c }
    }
}
