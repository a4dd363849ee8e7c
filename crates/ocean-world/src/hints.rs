//! Same-tick flocking messages between herring.

use ocean_core::{AgentId, Location};
use std::collections::HashMap;

/// Destinations announced by herring to their neighbors during a tick.
///
/// A herring that has chosen where to go leaves that target for every herring
/// next to it; a neighbor that acts later in the same tick steers towards it.
/// Later announcements overwrite earlier ones. Cleared when the tick ends.
#[derive(Debug, Clone, Default)]
pub struct LeaderHints {
    targets: HashMap<AgentId, Location>,
}

impl LeaderHints {
    pub fn new() -> Self {
        Self::default()
    }

    /// Tell `follower` that a neighbor is heading for `target`
    pub fn lead(&mut self, follower: AgentId, target: Location) {
        self.targets.insert(follower, target);
    }

    pub fn leader_for(&self, follower: AgentId) -> Option<Location> {
        self.targets.get(&follower).copied()
    }

    pub fn clear(&mut self) {
        self.targets.clear();
    }

    pub fn len(&self) -> usize {
        self.targets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.targets.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_latest_hint_wins() {
        let mut hints = LeaderHints::new();
        assert_eq!(hints.leader_for(AgentId(1)), None);

        hints.lead(AgentId(1), Location::new(2, 2));
        hints.lead(AgentId(1), Location::new(3, 3));
        hints.lead(AgentId(2), Location::new(0, 1));

        assert_eq!(hints.leader_for(AgentId(1)), Some(Location::new(3, 3)));
        assert_eq!(hints.len(), 2);

        hints.clear();
        assert!(hints.is_empty());
    }
}
