use crate::event::EntityId;

/// Consecutive kill credits on one side going to the same player.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct FragStreak {
    last: Option<EntityId>,
    count: u32,
}

impl FragStreak {
    pub fn credit(&mut self, killer: EntityId) {
        if self.last == Some(killer) {
            self.count = self.count.saturating_add(1);
        } else {
            self.last = Some(killer);
            self.count = 1;
        }
    }

    pub fn count(&self) -> u32 {
        self.count
    }

    /// The player who wiped the whole opposing roster alone, if any.
    pub fn ace(&self) -> Option<EntityId> {
        if self.count == crate::ROSTER_SIZE {
            self.last
        } else {
            None
        }
    }
}
