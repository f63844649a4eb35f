use std::collections::HashMap;

/// Per-lane collapse flags for one render.
///
/// A fresh `CollapseState` is created for every rendered dataset and thrown
/// away on the next one; nothing is persisted across renders.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CollapseState {
    collapsed: HashMap<String, bool>,
}

impl CollapseState {
    /// All lanes of a render start expanded.
    pub fn for_lanes<'a>(lanes: impl IntoIterator<Item = &'a str>) -> Self {
        Self {
            collapsed: lanes.into_iter().map(|l| (l.to_string(), false)).collect(),
        }
    }

    pub fn is_collapsed(&self, lane: &str) -> bool {
        self.collapsed.get(lane).copied().unwrap_or(false)
    }

    /// Flip a lane's flag and return the new value.
    pub fn toggle(&mut self, lane: &str) -> bool {
        let flag = self.collapsed.entry(lane.to_string()).or_insert(false);
        *flag = !*flag;
        *flag
    }

    pub fn collapsed_count(&self) -> usize {
        self.collapsed.values().filter(|c| **c).count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lanes_start_expanded() {
        let state = CollapseState::for_lanes(["Leader", "Video"]);
        assert!(!state.is_collapsed("Leader"));
        assert!(!state.is_collapsed("Video"));
        assert_eq!(state.collapsed_count(), 0);
    }

    #[test]
    fn toggling_twice_restores() {
        let mut state = CollapseState::for_lanes(["Leader"]);
        assert!(state.toggle("Leader"));
        assert!(state.is_collapsed("Leader"));
        assert!(!state.toggle("Leader"));
        assert!(!state.is_collapsed("Leader"));
    }

    #[test]
    fn toggle_is_per_lane() {
        let mut state = CollapseState::for_lanes(["Leader", "Video"]);
        state.toggle("Video");
        assert!(!state.is_collapsed("Leader"));
        assert!(state.is_collapsed("Video"));
        assert_eq!(state.collapsed_count(), 1);
    }
}
