//! Left/right Ctrl and Alt latches.
//!
//! The host's state mask says "Alt is down" but not which Alt.  The latches
//! remember which physical modifier keys have been pressed and not yet
//! released, so the key translator can tell AltGr from left Alt.
//!
//! Latches only move when the tracked key itself is pressed or released.  If
//! a release is swallowed (for example by a focus change), the latch stays
//! set until [`ModifierLatches::reset`] runs.

use tracing::trace;

use crate::keymap::scancode::{SCAN_LEFT_ALT, SCAN_LEFT_CTRL, SCAN_RIGHT_ALT, SCAN_RIGHT_CTRL};

/// Per-session press state of the four distinguishable modifiers.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct ModifierLatches {
    pub left_ctrl: bool,
    pub right_ctrl: bool,
    pub left_alt: bool,
    pub right_alt: bool,
}

impl ModifierLatches {
    /// Updates the latch matching `scan`; other codes leave latches untouched.
    pub fn observe(&mut self, scan: i64, is_press: bool) {
        let latch = match scan {
            SCAN_LEFT_CTRL => &mut self.left_ctrl,
            SCAN_RIGHT_CTRL => &mut self.right_ctrl,
            SCAN_LEFT_ALT => &mut self.left_alt,
            SCAN_RIGHT_ALT => &mut self.right_alt,
            _ => return,
        };
        *latch = is_press;
        trace!(scan, is_press, "modifier latch updated");
    }

    /// Releases every latch.
    pub fn reset(&mut self) {
        *self = Self::default();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_press_and_release_of_right_alt() {
        let mut latches = ModifierLatches::default();

        latches.observe(SCAN_RIGHT_ALT, true);
        assert!(latches.right_alt);
        assert!(!latches.left_alt);

        latches.observe(SCAN_RIGHT_ALT, false);
        assert!(!latches.right_alt);
    }

    #[test]
    fn test_each_tracked_code_sets_its_own_latch() {
        let mut latches = ModifierLatches::default();

        latches.observe(SCAN_LEFT_CTRL, true);
        latches.observe(SCAN_RIGHT_CTRL, true);
        latches.observe(SCAN_LEFT_ALT, true);

        assert_eq!(
            latches,
            ModifierLatches {
                left_ctrl: true,
                right_ctrl: true,
                left_alt: true,
                right_alt: false,
            }
        );
    }

    #[test]
    fn test_untracked_codes_leave_latches_untouched() {
        let mut latches = ModifierLatches::default();
        latches.observe(SCAN_LEFT_ALT, true);

        // Left Shift, the A key and an out-of-range code
        for scan in [42, 30, -8, 300] {
            latches.observe(scan, false);
        }

        assert!(latches.left_alt);
    }

    #[test]
    fn test_reset_clears_all_latches() {
        let mut latches = ModifierLatches {
            left_ctrl: true,
            right_ctrl: true,
            left_alt: true,
            right_alt: true,
        };

        latches.reset();

        assert_eq!(latches, ModifierLatches::default());
    }
}
