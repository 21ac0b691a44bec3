//! Abstract control signals driving a run.

use serde::{Deserialize, Serialize};

/// Input signal consumed by the control-signal handler.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ControlSignal {
    /// Persist the current grid.
    Save,
    /// Pause at the next generation boundary, or resume if paused.
    TogglePause,
    /// Stop at the next generation boundary.
    Stop,
}

impl ControlSignal {
    /// Keyboard mapping: `s` saves, `p` toggles pause, `q` quits.
    pub fn from_key(key: char) -> Option<Self> {
        match key {
            's' => Some(ControlSignal::Save),
            'p' => Some(ControlSignal::TogglePause),
            'q' => Some(ControlSignal::Stop),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_key_mapping() {
        assert_eq!(ControlSignal::from_key('s'), Some(ControlSignal::Save));
        assert_eq!(ControlSignal::from_key('p'), Some(ControlSignal::TogglePause));
        assert_eq!(ControlSignal::from_key('q'), Some(ControlSignal::Stop));
        assert_eq!(ControlSignal::from_key('x'), None);
        assert_eq!(ControlSignal::from_key('S'), None);
    }
}
