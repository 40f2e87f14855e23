use crate::{input::PointerDelta, types::MouseHandler};

/// Accumulates relative mouse motion and wheel movement between frames
#[derive(Debug, Default)]
pub struct Mouse {
    pending: PointerDelta,
}

impl MouseHandler for Mouse {
    fn motion(&mut self, dx: f32, dy: f32) {
        self.pending.dx += dx;
        self.pending.dy += dy;
    }

    fn scroll(&mut self, dy: f32) {
        self.pending.scroll += dy;
    }
}

impl Mouse {
    /// Returns everything accumulated so far and starts again from zero
    pub fn take(&mut self) -> PointerDelta {
        std::mem::take(&mut self.pending)
    }
}
