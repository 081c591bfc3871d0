/// The computer-screen overlay. Visibility is its only state.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Overlay {
    visible: bool,
}

impl Overlay {
    pub fn open(&mut self) {
        self.visible = true;
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
    fn open_close() {
        let mut overlay = Overlay::default();
        assert!(!overlay.is_visible());
        overlay.open();
        overlay.open();
        assert!(overlay.is_visible());
        overlay.close();
        assert!(!overlay.is_visible());
    }
}
