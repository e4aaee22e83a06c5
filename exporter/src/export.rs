use std::path::Path;

use crate::ProcessError;

pub fn to_export(game: analysis::Game) -> common::GameExport {
    let rounds_number = game.rounds_number();

    common::GameExport {
        id: game.id,
        version: game.version,
        team_1: game.team_1,
        team_2: game.team_2,
        map_name: game.map_name,
        rounds_number,
        tick_rate: game.tick_rate,
        tick_time: game.tick_time,
        max_ticks: game.max_ticks,
        max_time: game.max_time,
        match_start_tick: game.match_start_tick,
        match_end_tick: game.match_end_tick,
        team_1_result: game.team_1_result,
        team_2_result: game.team_2_result,
        winner: game.winner,
        rounds: game.rounds.into_iter().map(round).collect(),
    }
}

fn round(round: analysis::Round) -> common::RoundExport {
    common::RoundExport {
        round_number: round.round_number,
        start_tick: round.start_tick,
        unfreeze_tick: round.unfreeze_tick,
        official_end_tick: round.official_end_tick,
        end_tick: round.end_tick,
        bomb_exploded: round.bomb_exploded,
        bomb_exploded_at: round.bomb_exploded_at,
        bomb_defused: round.bomb_defused,
        bomb_defused_at: round.bomb_defused_at,
        bomb_planted: round.bomb_planted,
        bomb_planted_at: round.bomb_planted_at,
        ace: round.ace,
        ace_by: round.ace_by,
        ct: round.ct,
        ct_score: round.ct_score,
        previous_ct_score: round.previous_ct_score,
        ct_kills: round.ct_kills,
        ct_players_remaining: round.ct_players_remaining,
        t: round.t,
        t_score: round.t_score,
        previous_t_score: round.previous_t_score,
        t_kills: round.t_kills,
        t_players_remaining: round.t_players_remaining,
        duration: round.duration,
        cut_duration: round.cut_duration,
        winner: round.winner,
        end_reason: round
            .end_reason
            .map(|r| r.as_str().to_owned())
            .unwrap_or_default(),
        was_mismatch_kills: round.was_mismatch_kills,
    }
}

pub fn write(path: &Path, export: &common::GameExport) -> Result<(), ProcessError> {
    let content = serde_json::to_vec_pretty(export)?;

    std::fs::write(path, content).map_err(|source| ProcessError::Write {
        path: path.to_path_buf(),
        source,
    })
}
