use crate::event::Side;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Slot {
    First,
    Second,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BoundTeam {
    pub id: i32,
    pub name: String,
}

/// Keeps the two competing teams in stable slots while they trade sides.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct Teams {
    first: Option<BoundTeam>,
    second: Option<BoundTeam>,
}

impl Teams {
    pub fn new() -> Self {
        Self::default()
    }

    /// Binds `id` to the next free slot the first time a non-empty clan name is
    /// seen for it.
    pub fn observe(&mut self, id: i32, clan_name: &str) -> Option<Slot> {
        if clan_name.is_empty() {
            return None;
        }

        let known = [&self.first, &self.second]
            .into_iter()
            .flatten()
            .any(|team| team.id == id || team.name == clan_name);
        if known {
            return None;
        }

        let team = BoundTeam {
            id,
            name: clan_name.to_owned(),
        };
        if self.first.is_none() {
            tracing::debug!(id, name = clan_name, "Bound first team");
            self.first = Some(team);
            Some(Slot::First)
        } else if self.second.is_none() {
            tracing::debug!(id, name = clan_name, "Bound second team");
            self.second = Some(team);
            Some(Slot::Second)
        } else {
            None
        }
    }

    pub fn observe_sides<S>(&mut self, state: &S)
    where
        S: crate::GameState + ?Sized,
    {
        for side in [Side::CT, Side::T] {
            let team = state.team(side);
            self.observe(team.id, &team.clan_name);
        }
    }

    /// Halftime: whichever slot was attacking is now defending and vice versa.
    pub fn swap_sides(&mut self) {
        for team in [&mut self.first, &mut self.second].into_iter().flatten() {
            team.id = match team.id {
                Side::T_ID => Side::CT_ID,
                Side::CT_ID => Side::T_ID,
                other => other,
            };
        }
    }

    pub fn resolve(&self, id: i32) -> Option<(Slot, &str)> {
        match (&self.first, &self.second) {
            (Some(team), _) if team.id == id => Some((Slot::First, team.name.as_str())),
            (_, Some(team)) if team.id == id => Some((Slot::Second, team.name.as_str())),
            _ => None,
        }
    }

    pub fn slot(&self, slot: Slot) -> Option<&BoundTeam> {
        match slot {
            Slot::First => self.first.as_ref(),
            Slot::Second => self.second.as_ref(),
        }
    }

    pub fn clear(&mut self) {
        self.first = None;
        self.second = None;
    }
}
