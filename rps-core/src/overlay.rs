/// Visibility of the leaderboard overlay shown over the arena.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct OverlayState {
    visible: bool,
}

impl OverlayState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Flip visibility and return the new value.
    pub fn toggle(&mut self) -> bool {
        self.visible = !self.visible;
        self.visible
    }

    pub fn close(&mut self) {
        self.visible = false;
    }

    pub fn is_visible(&self) -> bool {
        self.visible
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_toggle_and_close() {
        let mut overlay = OverlayState::new();
        assert!(!overlay.is_visible());

        assert!(overlay.toggle());
        assert!(!overlay.toggle());

        overlay.toggle();
        overlay.close();
        overlay.close();
        assert!(!overlay.is_visible());
    }
}
