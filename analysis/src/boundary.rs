//! Decides whether a round ratification (official end or score update) belongs
//! to the round being accumulated or is noise from warmup, restarts, or a
//! corrupted segment of the stream.

use crate::event::Side;
use crate::round::RoundAccumulator;
use crate::state::GameState;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Rejection {
    NotPlaying,
    MatchNotStarted,
    Warmup,
    SameTickAsStart,
    TooShort,
    Scoreless,
    OutOfSequence {
        round_number: u32,
        previous_round: u32,
        finalized: usize,
    },
}

#[derive(Debug, Clone, Copy)]
pub struct BoundaryContext {
    pub win_screen: bool,
    pub tick_rate: f64,
    pub finalized: usize,
}

/// Returns the implied round number when the ratification at the current tick
/// should close `round`.
pub fn check_ratification<S>(
    round: &RoundAccumulator,
    state: &S,
    ctx: BoundaryContext,
) -> Result<u32, Rejection>
where
    S: GameState + ?Sized,
{
    let tick = state.tick();

    if !round.is_open() {
        return Err(Rejection::NotPlaying);
    }
    if !state.is_match_started() && !ctx.win_screen {
        return Err(Rejection::MatchNotStarted);
    }
    if state.is_warmup() {
        return Err(Rejection::Warmup);
    }
    if round.start_tick == tick {
        return Err(Rejection::SameTickAsStart);
    }

    // A round must have lasted at least a second.
    let offset = i64::from(tick) - ctx.tick_rate as i64;
    if i64::from(round.start_tick) > offset {
        return Err(Rejection::TooShort);
    }

    check_score(round, state, ctx.finalized)
}

/// The score part of the ratification checks, shared with the end-of-stream
/// close out.
pub fn check_score<S>(round: &RoundAccumulator, state: &S, finalized: usize) -> Result<u32, Rejection>
where
    S: GameState + ?Sized,
{
    let t_score = state.team(Side::T).score;
    let ct_score = state.team(Side::CT).score;
    if t_score == 0 && ct_score == 0 {
        return Err(Rejection::Scoreless);
    }

    let round_number = t_score + ct_score;
    if round_number < round.previous_round || round_number as usize > finalized + 1 {
        return Err(Rejection::OutOfSequence {
            round_number,
            previous_round: round.previous_round,
            finalized,
        });
    }

    Ok(round_number)
}
