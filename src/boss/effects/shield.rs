//! Shield invulnerability window.

use crate::boss::visuals::VisualHandle;

#[derive(Debug, Clone, Default)]
pub struct ShieldState {
    pub active: bool,
    pub activated_at_ms: f64,
    pub duration_ms: f64,
    pub bubble: Option<VisualHandle>,
    /// Damage swallowed while the shield was up, for the encounter summary
    pub absorbed: f32,
}

impl ShieldState {
    pub fn raise(&mut self, now_ms: f64, duration_ms: f64, bubble: VisualHandle) {
        self.active = true;
        self.activated_at_ms = now_ms;
        self.duration_ms = duration_ms;
        self.bubble = Some(bubble);
    }

    pub fn has_lapsed(&self, now_ms: f64) -> bool {
        self.active && now_ms - self.activated_at_ms >= self.duration_ms
    }

    /// Drop the shield. Returns the bubble visual to despawn, if any.
    pub fn lower(&mut self) -> Option<VisualHandle> {
        self.active = false;
        self.bubble.take()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lapses_after_duration() {
        let mut shield = ShieldState::default();
        shield.raise(1000.0, 3000.0, VisualHandle(9));
        assert!(!shield.has_lapsed(3999.0));
        assert!(shield.has_lapsed(4000.0));
        assert_eq!(shield.lower(), Some(VisualHandle(9)));
        assert!(!shield.has_lapsed(10_000.0));
    }
}
