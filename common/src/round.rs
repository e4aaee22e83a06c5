#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct RoundExport {
    pub round_number: u32,
    pub start_tick: u32,
    pub unfreeze_tick: u32,
    pub official_end_tick: u32,
    pub end_tick: u32,
    pub bomb_exploded: bool,
    pub bomb_exploded_at: u32,
    pub bomb_defused: bool,
    pub bomb_defused_at: u32,
    pub bomb_planted: bool,
    pub bomb_planted_at: u32,
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

    pub duration: u32,
    pub cut_duration: u32,
    pub winner: String,
    /// `team_kill`, `bomb_defused`, `bomb_exploded`, `expired`, or empty when
    /// the round never reported one.
    pub end_reason: String,
    pub was_mismatch_kills: bool,
}
