/// A direction key the character controller responds to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MoveKey {
    /// `w`: walk along the facing direction.
    Forward,
    /// `a`: turn counter-clockwise about the vertical axis.
    TurnLeft,
    /// `s`: walk against the facing direction.
    Backward,
    /// `d`: turn clockwise about the vertical axis.
    TurnRight,
}

impl MoveKey {
    /// Map a typed character to a movement key, ignoring case.
    pub fn from_char(c: char) -> Option<Self> {
        match c.to_ascii_lowercase() {
            'w' => Some(Self::Forward),
            'a' => Some(Self::TurnLeft),
            's' => Some(Self::Backward),
            'd' => Some(Self::TurnRight),
            _ => None,
        }
    }

    /// Map the text of a key event. Only single-character keys can match.
    pub fn from_key_text(text: &str) -> Option<Self> {
        let mut chars = text.chars();
        match (chars.next(), chars.next()) {
            (Some(c), None) => Self::from_char(c),
            _ => None,
        }
    }
}

/// Held/released flags for the four movement keys.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MoveKeys {
    pub forward: bool,
    pub turn_left: bool,
    pub backward: bool,
    pub turn_right: bool,
}

impl MoveKeys {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set(&mut self, key: MoveKey, held: bool) {
        let flag = match key {
            MoveKey::Forward => &mut self.forward,
            MoveKey::TurnLeft => &mut self.turn_left,
            MoveKey::Backward => &mut self.backward,
            MoveKey::TurnRight => &mut self.turn_right,
        };
        if *flag != held {
            tracing::trace!(?key, held, "move key changed");
        }
        *flag = held;
    }

    /// Apply a key event by its text. Returns false for keys that are not tracked.
    pub fn handle_key_text(&mut self, text: &str, pressed: bool) -> bool {
        match MoveKey::from_key_text(text) {
            Some(key) => {
                self.set(key, pressed);
                true
            }
            None => false,
        }
    }

    /// Walking (forward or backward) drives the limb animation.
    pub fn is_moving(&self) -> bool {
        self.forward || self.backward
    }

    pub fn release_all(&mut self) {
        *self = Self::default();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn wasd_maps_case_insensitively() {
        assert_eq!(MoveKey::from_char('w'), Some(MoveKey::Forward));
        assert_eq!(MoveKey::from_char('A'), Some(MoveKey::TurnLeft));
        assert_eq!(MoveKey::from_char('s'), Some(MoveKey::Backward));
        assert_eq!(MoveKey::from_char('D'), Some(MoveKey::TurnRight));
        assert_eq!(MoveKey::from_char('q'), None);
    }

    #[test]
    fn multi_char_key_text_is_ignored() {
        assert_eq!(MoveKey::from_key_text("W"), Some(MoveKey::Forward));
        assert_eq!(MoveKey::from_key_text("Shift"), None);
        assert_eq!(MoveKey::from_key_text(""), None);
    }

    #[test]
    fn press_and_release() {
        let mut keys = MoveKeys::new();
        keys.set(MoveKey::Forward, true);
        assert!(keys.forward);
        assert!(keys.is_moving());
        keys.set(MoveKey::Forward, false);
        assert!(!keys.is_moving());
    }

    #[test]
    fn turning_alone_is_not_moving() {
        let mut keys = MoveKeys::new();
        keys.set(MoveKey::TurnLeft, true);
        keys.set(MoveKey::TurnRight, true);
        assert!(!keys.is_moving());
    }

    #[test]
    fn unknown_keys_leave_state_untouched() {
        let mut keys = MoveKeys::new();
        assert!(!keys.handle_key_text("x", true));
        assert!(!keys.handle_key_text("Enter", true));
        assert_eq!(keys, MoveKeys::default());
        assert!(keys.handle_key_text("S", true));
        assert!(keys.backward);
    }

    #[test]
    fn release_all_clears_flags() {
        let mut keys = MoveKeys::new();
        keys.set(MoveKey::Forward, true);
        keys.set(MoveKey::TurnRight, true);
        keys.release_all();
        assert_eq!(keys, MoveKeys::default());
    }
}
