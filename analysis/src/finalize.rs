use crate::event::Side;
use crate::round::{Round, RoundAccumulator};
use crate::state::GameState;
use crate::teams::Teams;
use crate::ROSTER_SIZE;

/// Seconds covered by `ticks`, rounded to the nearest whole second.
fn seconds(ticks: u32, tick_time: f64) -> u32 {
    (f64::from(ticks) * tick_time).round() as u32
}

fn side_name<'s>(teams: &'s Teams, round: &'s RoundAccumulator, state_id: i32, side: Side) -> &'s str {
    match teams.resolve(state_id) {
        Some((_, name)) => name,
        None => round.tally(side).previous_name.as_str(),
    }
}

/// Turns the accumulator into the immutable round record, using the game state
/// at the moment of ratification for scores and names.
pub fn finalize<S>(
    round: RoundAccumulator,
    round_number: u32,
    official_end_tick: u32,
    state: &S,
    teams: &Teams,
    tick_time: f64,
) -> Round
where
    S: GameState + ?Sized,
{
    let tick = state.tick();

    let t_name = side_name(teams, &round, state.team(Side::T).id, Side::T).to_owned();
    let ct_name = side_name(teams, &round, state.team(Side::CT).id, Side::CT).to_owned();

    let t_score = state.team(Side::T).score;
    let ct_score = state.team(Side::CT).score;

    let mut winner = String::new();
    if t_score > round.t.previous_score {
        winner = t_name.clone();
    }
    if ct_score > round.ct.previous_score {
        winner = ct_name.clone();
    }

    let start_tick = round.start_tick;
    let unfreeze_tick = round.unfreeze_tick.unwrap_or(start_tick).max(start_tick);
    let end_tick = round.end_tick.unwrap_or(tick).max(unfreeze_tick);
    let official_end_tick = official_end_tick.max(end_tick);

    let ace_by = [Side::T, Side::CT]
        .into_iter()
        .filter_map(|side| round.tally(side).streak.ace())
        .next();
    let ace_by = ace_by.map(|entity| {
        state
            .player_name(entity)
            .map(|name| name.to_owned())
            .unwrap_or_default()
    });

    Round {
        round_number,
        start_tick,
        unfreeze_tick,
        end_tick,
        official_end_tick,

        bomb_planted: round.bomb_planted.is_some(),
        bomb_planted_at: round.bomb_planted.unwrap_or(0),
        bomb_defused: round.bomb_defused.is_some(),
        bomb_defused_at: round.bomb_defused.unwrap_or(0),
        bomb_exploded: round.bomb_exploded.is_some(),
        bomb_exploded_at: round.bomb_exploded.unwrap_or(0),

        ace: ace_by.is_some(),
        ace_by: ace_by.unwrap_or_default(),

        ct: ct_name,
        ct_score,
        previous_ct_score: round.ct.previous_score,
        ct_kills: round.ct.kills.min(ROSTER_SIZE),
        ct_players_remaining: ROSTER_SIZE.saturating_sub(round.t.kills),

        t: t_name,
        t_score,
        previous_t_score: round.t.previous_score,
        t_kills: round.t.kills.min(ROSTER_SIZE),
        t_players_remaining: ROSTER_SIZE.saturating_sub(round.ct.kills),

        duration: seconds(end_tick - start_tick, tick_time),
        cut_duration: seconds(end_tick - unfreeze_tick, tick_time),
        winner,
        end_reason: round.end_reason(),
        was_mismatch_kills: round.mismatch_corrected,
    }
}
