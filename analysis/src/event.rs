#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub enum Side {
    T,
    CT,
}

impl Side {
    pub const T_ID: i32 = 2;
    pub const CT_ID: i32 = 3;

    pub fn from_team_number(number: i32) -> Option<Self> {
        match number {
            Self::T_ID => Some(Self::T),
            Self::CT_ID => Some(Self::CT),
            _ => None,
        }
    }

    pub fn opponent(&self) -> Self {
        match self {
            Self::T => Self::CT,
            Self::CT => Self::T,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct EntityId(pub i32);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Killer {
    pub entity: EntityId,
    pub side: Side,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub enum RoundEndReason {
    StillInProgress,
    TargetBombed,
    VipEscaped,
    VipKilled,
    TerroristsEscaped,
    CtStoppedEscape,
    TerroristsStopped,
    BombDefused,
    CtWin,
    TerroristsWin,
    Draw,
    HostagesRescued,
    TargetSaved,
    HostagesNotRescued,
    TerroristsNotEscaped,
    VipNotEscaped,
    GameStart,
    TerroristsSurrender,
    CtSurrender,
    TerroristsPlanted,
    CtReachedHostage,
}

// https://github.com/markus-wa/demoinfocs-golang/blob/205b0bb25e9f3e96e1d306d154199b4a6292940e/pkg/demoinfocs/events/events.go#L53
pub static ROUND_END_REASON: phf::Map<i32, RoundEndReason> = phf::phf_map! {
    0_i32 => RoundEndReason::StillInProgress,
    1_i32 => RoundEndReason::TargetBombed,
    2_i32 => RoundEndReason::VipEscaped,
    3_i32 => RoundEndReason::VipKilled,
    4_i32 => RoundEndReason::TerroristsEscaped,
    5_i32 => RoundEndReason::CtStoppedEscape,
    6_i32 => RoundEndReason::TerroristsStopped,
    7_i32 => RoundEndReason::BombDefused,
    8_i32 => RoundEndReason::CtWin,
    9_i32 => RoundEndReason::TerroristsWin,
    10_i32 => RoundEndReason::Draw,
    11_i32 => RoundEndReason::HostagesRescued,
    12_i32 => RoundEndReason::TargetSaved,
    13_i32 => RoundEndReason::HostagesNotRescued,
    14_i32 => RoundEndReason::TerroristsNotEscaped,
    15_i32 => RoundEndReason::VipNotEscaped,
    16_i32 => RoundEndReason::GameStart,
    17_i32 => RoundEndReason::TerroristsSurrender,
    18_i32 => RoundEndReason::CtSurrender,
    19_i32 => RoundEndReason::TerroristsPlanted,
    20_i32 => RoundEndReason::CtReachedHostage,
};

impl RoundEndReason {
    pub fn from_code(code: i32) -> Option<Self> {
        ROUND_END_REASON.get(&code).copied()
    }

    /// The side this reason declares as the round winner, `None` for draws and
    /// non-round reasons.
    pub fn winner(&self) -> Option<Side> {
        match self {
            Self::TargetBombed
            | Self::VipKilled
            | Self::TerroristsEscaped
            | Self::TerroristsWin
            | Self::CtSurrender
            | Self::TerroristsPlanted => Some(Side::T),
            Self::VipEscaped
            | Self::CtStoppedEscape
            | Self::TerroristsStopped
            | Self::BombDefused
            | Self::CtWin
            | Self::HostagesRescued
            | Self::TargetSaved
            | Self::HostagesNotRescued
            | Self::TerroristsNotEscaped
            | Self::VipNotEscaped
            | Self::TerroristsSurrender
            | Self::CtReachedHostage => Some(Side::CT),
            Self::StillInProgress | Self::Draw | Self::GameStart => None,
        }
    }

    pub fn is_bomb(&self) -> bool {
        matches!(self, Self::TargetBombed | Self::BombDefused)
    }
}

/// A single notification from the decoder. The engine consumes these in
/// stream order through [`crate::RoundTracker::apply`].
#[derive(Debug, Clone, PartialEq)]
pub enum Event {
    MatchStart,
    MatchStartedChanged { started: bool },
    WarmupChanged { warmup: bool },
    WinPanelMatch,
    RoundStart,
    FreezeTimeEnded,
    RoundEnd {
        winner: Option<Side>,
        reason: RoundEndReason,
    },
    RoundOfficiallyEnded,
    /// Older event taxonomies ratify a round through the score update instead
    /// of an official end.
    ScoreUpdated,
    SideSwap,
    Kill {
        victim: Side,
        killer: Option<Killer>,
    },
    BombPlanted,
    BombDefused,
    BombExploded,
    FrameDone,
}
