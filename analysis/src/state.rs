use crate::event::{EntityId, Side};

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TeamState {
    pub id: i32,
    pub score: u32,
    pub clan_name: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlayerState {
    pub name: String,
    pub side: Option<Side>,
    pub alive: bool,
}

/// Read-only view of the decoder's live game state at the current point of
/// the replay.
pub trait GameState {
    fn tick(&self) -> u32;

    fn is_warmup(&self) -> bool;

    fn is_match_started(&self) -> bool;

    fn total_rounds_played(&self) -> u32;

    fn team(&self, side: Side) -> &TeamState;

    fn alive_count(&self, side: Side) -> usize;

    fn player_name(&self, entity: EntityId) -> Option<&str>;
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Snapshot {
    pub tick: u32,
    pub warmup: bool,
    pub match_started: bool,
    pub total_rounds_played: u32,
    pub t: TeamState,
    pub ct: TeamState,
    pub players: std::collections::BTreeMap<EntityId, PlayerState>,
}

impl Default for Snapshot {
    fn default() -> Self {
        Self {
            tick: 0,
            warmup: false,
            match_started: false,
            total_rounds_played: 0,
            t: TeamState {
                id: Side::T_ID,
                ..Default::default()
            },
            ct: TeamState {
                id: Side::CT_ID,
                ..Default::default()
            },
            players: std::collections::BTreeMap::new(),
        }
    }
}

impl Snapshot {
    pub fn team_mut(&mut self, side: Side) -> &mut TeamState {
        match side {
            Side::T => &mut self.t,
            Side::CT => &mut self.ct,
        }
    }

    pub fn player_mut(&mut self, entity: EntityId) -> &mut PlayerState {
        self.players.entry(entity).or_insert_with(|| PlayerState {
            name: String::new(),
            side: None,
            alive: false,
        })
    }
}

impl GameState for Snapshot {
    fn tick(&self) -> u32 {
        self.tick
    }

    fn is_warmup(&self) -> bool {
        self.warmup
    }

    fn is_match_started(&self) -> bool {
        self.match_started
    }

    fn total_rounds_played(&self) -> u32 {
        self.total_rounds_played
    }

    fn team(&self, side: Side) -> &TeamState {
        match side {
            Side::T => &self.t,
            Side::CT => &self.ct,
        }
    }

    fn alive_count(&self, side: Side) -> usize {
        self.players
            .values()
            .filter(|p| p.side == Some(side) && p.alive)
            .count()
    }

    fn player_name(&self, entity: EntityId) -> Option<&str> {
        self.players.get(&entity).map(|p| p.name.as_str())
    }
}
