use crate::event::Side;
use crate::streak::FragStreak;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    /// No round open.
    Idle,
    /// Round start seen, freeze time still running.
    Live,
    /// Freeze time over, kills are being counted.
    Counting,
    /// A round end was seen but not yet ratified.
    ProvisionallyEnded,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EndReason {
    TeamKill,
    BombDefused,
    BombExploded,
    Expired,
}

impl EndReason {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::TeamKill => "team_kill",
            Self::BombDefused => "bomb_defused",
            Self::BombExploded => "bomb_exploded",
            Self::Expired => "expired",
        }
    }
}

/// Per-side bookkeeping of one round.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct SideTally {
    /// Kills credited to this side.
    pub kills: u32,
    pub streak: FragStreak,
    pub previous_score: u32,
    pub previous_name: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoundAccumulator {
    pub phase: Phase,
    pub start_tick: u32,
    pub unfreeze_tick: Option<u32>,
    pub end_tick: Option<u32>,
    pub bomb_planted: Option<u32>,
    pub bomb_defused: Option<u32>,
    pub bomb_exploded: Option<u32>,
    pub t: SideTally,
    pub ct: SideTally,
    /// Rounds played according to the game state when freeze time ended.
    pub previous_round: u32,
    end_reason: Option<EndReason>,
    /// Kill tallies wait for the next frame to be recomputed from the state.
    pub pending_reconcile: bool,
    pub mismatch_corrected: bool,
}

impl RoundAccumulator {
    pub fn idle() -> Self {
        Self {
            phase: Phase::Idle,
            start_tick: 0,
            unfreeze_tick: None,
            end_tick: None,
            bomb_planted: None,
            bomb_defused: None,
            bomb_exploded: None,
            t: SideTally::default(),
            ct: SideTally::default(),
            previous_round: 0,
            end_reason: None,
            pending_reconcile: false,
            mismatch_corrected: false,
        }
    }

    pub fn open(start_tick: u32) -> Self {
        Self {
            phase: Phase::Live,
            start_tick,
            ..Self::idle()
        }
    }

    /// Live, counting, or provisionally ended.
    pub fn is_open(&self) -> bool {
        !matches!(self.phase, Phase::Idle)
    }

    pub fn is_counting(&self) -> bool {
        matches!(self.phase, Phase::Live | Phase::Counting)
    }

    pub fn end_reason(&self) -> Option<EndReason> {
        self.end_reason
    }

    /// First write wins. Returns whether `reason` was stored.
    pub fn set_end_reason(&mut self, reason: EndReason) -> bool {
        if self.end_reason.is_some() {
            return false;
        }
        self.end_reason = Some(reason);
        true
    }

    pub fn clear_end_reason(&mut self) {
        self.end_reason = None;
    }

    pub fn tally(&self, side: Side) -> &SideTally {
        match side {
            Side::T => &self.t,
            Side::CT => &self.ct,
        }
    }

    pub fn tally_mut(&mut self, side: Side) -> &mut SideTally {
        match side {
            Side::T => &mut self.t,
            Side::CT => &mut self.ct,
        }
    }
}

/// A finalized round as it appears in [`crate::Game::rounds`].
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Round {
    pub round_number: u32,
    pub start_tick: u32,
    pub unfreeze_tick: u32,
    pub end_tick: u32,
    pub official_end_tick: u32,

    pub bomb_planted: bool,
    pub bomb_planted_at: u32,
    pub bomb_defused: bool,
    pub bomb_defused_at: u32,
    pub bomb_exploded: bool,
    pub bomb_exploded_at: u32,

    pub ace: bool,
    pub ace_by: String,

    pub ct: String,
    pub ct_score: u32,
    pub previous_ct_score: u32,
    pub ct_kills: u32,
    pub ct_players_remaining: u32,

    pub t: String,
    pub t_score: u32,
    pub previous_t_score: u32,
    pub t_kills: u32,
    pub t_players_remaining: u32,

    /// Seconds from round start to round end.
    pub duration: u32,
    /// Seconds from the end of freeze time to round end.
    pub cut_duration: u32,
    pub winner: String,
    pub end_reason: Option<EndReason>,
    pub was_mismatch_kills: bool,
}
