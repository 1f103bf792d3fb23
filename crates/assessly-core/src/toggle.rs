use serde::{Deserialize, Serialize};

pub const READ_MORE: &str = "Read more";
pub const READ_LESS: &str = "Read less";

/// Expansion state of a single description cell. Rows start collapsed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ToggleState {
    #[default]
    Collapsed,
    Expanded,
}

impl ToggleState {
    pub fn flip(self) -> Self {
        match self {
            ToggleState::Collapsed => ToggleState::Expanded,
            ToggleState::Expanded => ToggleState::Collapsed,
        }
    }

    pub fn is_expanded(self) -> bool {
        self == ToggleState::Expanded
    }

    /// Label for the control that flips this state.
    pub fn label(self) -> &'static str {
        match self {
            ToggleState::Collapsed => READ_MORE,
            ToggleState::Expanded => READ_LESS,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn starts_collapsed_with_read_more() {
        let state = ToggleState::default();
        assert!(!state.is_expanded());
        assert_eq!(state.label(), "Read more");
    }

    #[test]
    fn flip_round_trips() {
        let expanded = ToggleState::Collapsed.flip();
        assert_eq!(expanded, ToggleState::Expanded);
        assert_eq!(expanded.label(), "Read less");
        assert_eq!(expanded.flip(), ToggleState::Collapsed);
    }
}
