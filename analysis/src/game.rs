use crate::event::Side;
use crate::round::Round;
use crate::state::GameState;
use crate::teams::{Slot, Teams};

pub static VERSION: &str = "1.1";

/// The parts of the demo header the engine needs.
#[derive(Debug, Clone, PartialEq)]
pub struct DemoHeader {
    pub map_name: String,
    pub playback_ticks: u32,
    /// Seconds.
    pub playback_time: f64,
    pub signon_length: u32,
}

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum HeaderError {
    #[error("demo seems to be broken: empty signon for map {map:?}")]
    Broken { map: String },
}

#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Game {
    pub id: String,
    pub version: String,
    pub map_name: String,
    pub tick_rate: f64,
    pub tick_time: f64,
    pub max_ticks: u32,
    pub max_time: f64,
    pub match_start_tick: u32,
    pub match_end_tick: u32,
    pub team_1: String,
    pub team_2: String,
    pub team_1_result: u32,
    pub team_2_result: u32,
    pub winner: String,
    pub rounds: Vec<Round>,
}

impl Game {
    pub fn from_header(header: &DemoHeader) -> Result<Self, HeaderError> {
        if header.signon_length == 0 {
            return Err(HeaderError::Broken {
                map: header.map_name.clone(),
            });
        }

        let tick_rate = if header.playback_time > 0.0 {
            f64::from(header.playback_ticks) / header.playback_time
        } else {
            0.0
        };
        let tick_time = if tick_rate > 0.0 { 1.0 / tick_rate } else { 0.0 };

        Ok(Self {
            id: format!(
                "{}_{}{}",
                header.map_name, header.signon_length, header.playback_ticks
            ),
            version: VERSION.to_owned(),
            map_name: header.map_name.clone(),
            tick_rate,
            tick_time,
            max_ticks: header.playback_ticks,
            max_time: header.playback_time.max(0.0),
            match_start_tick: 0,
            match_end_tick: 0,
            team_1: String::new(),
            team_2: String::new(),
            team_1_result: 0,
            team_2_result: 0,
            winner: String::new(),
            rounds: Vec::new(),
        })
    }

    pub fn rounds_number(&self) -> usize {
        self.rounds.len()
    }

    /// Refreshes the team names, results and overall winner from the slots.
    pub fn update_teams<S>(&mut self, teams: &Teams, state: &S)
    where
        S: GameState + ?Sized,
    {
        let score_of = |slot: Slot| {
            let team = teams.slot(slot)?;
            [Side::T, Side::CT]
                .into_iter()
                .map(|side| state.team(side))
                .find(|t| t.id == team.id)
                .map(|t| t.score)
        };

        if let Some(team) = teams.slot(Slot::First) {
            self.team_1 = team.name.clone();
        }
        if let Some(team) = teams.slot(Slot::Second) {
            self.team_2 = team.name.clone();
        }
        if let Some(score) = score_of(Slot::First) {
            self.team_1_result = score;
        }
        if let Some(score) = score_of(Slot::Second) {
            self.team_2_result = score;
        }

        self.winner = match self.team_1_result.cmp(&self.team_2_result) {
            std::cmp::Ordering::Greater => self.team_1.clone(),
            std::cmp::Ordering::Less => self.team_2.clone(),
            std::cmp::Ordering::Equal => String::new(),
        };
    }

    pub(crate) fn reset(&mut self) {
        self.rounds.clear();
        self.team_1.clear();
        self.team_2.clear();
        self.team_1_result = 0;
        self.team_2_result = 0;
        self.winner.clear();
    }
}
