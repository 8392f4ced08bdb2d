/// Raw host input, already in canvas pixel coordinates.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum InputEvent {
    PointerDown { x: f32, y: f32 },
    PointerUp { x: f32, y: f32 },
    PointerMove { x: f32, y: f32 },
    /// Positive `delta` zooms in.
    Wheel { delta: f32 },
    KeyDown { key_code: u32 },
    KeyUp { key_code: u32 },
    /// UI command. The game assigns meaning to `kind` and its three arguments.
    Custom { kind: u32, a: f32, b: f32, c: f32 },
}

/// Events collected between two frames.
#[derive(Debug, Default)]
pub struct InputQueue {
    pending: Vec<InputEvent>,
}

impl InputQueue {
    pub fn new() -> Self {
        Self { pending: Vec::with_capacity(32) }
    }

    pub fn push(&mut self, event: InputEvent) {
        self.pending.push(event);
    }

    /// Hand over everything queued so far, leaving the queue empty.
    pub fn drain(&mut self) -> Vec<InputEvent> {
        std::mem::take(&mut self.pending)
    }

    pub fn clear(&mut self) {
        self.pending.clear();
    }

    pub fn iter(&self) -> impl Iterator<Item = &InputEvent> {
        self.pending.iter()
    }

    /// Only the UI commands, in arrival order, as `(kind, a, b, c)`.
    pub fn customs(&self) -> impl Iterator<Item = (u32, f32, f32, f32)> + '_ {
        self.pending.iter().filter_map(|e| match *e {
            InputEvent::Custom { kind, a, b, c } => Some((kind, a, b, c)),
            _ => None,
        })
    }

    pub fn len(&self) -> usize {
        self.pending.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }
}
