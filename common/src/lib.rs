pub mod round;
pub use round::RoundExport;

/// The per-match file written next to each demo.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct GameExport {
    pub id: String,
    pub version: String,
    pub team_1: String,
    pub team_2: String,
    pub map_name: String,
    pub rounds_number: usize,
    pub tick_rate: f64,
    pub tick_time: f64,
    pub max_ticks: u32,
    pub max_time: f64,
    pub match_start_tick: u32,
    pub match_end_tick: u32,
    pub team_1_result: u32,
    pub team_2_result: u32,
    pub winner: String,
    pub rounds: Vec<RoundExport>,
}
