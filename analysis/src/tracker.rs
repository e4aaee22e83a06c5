use crate::boundary::{self, BoundaryContext};
use crate::event::{Event, Killer, RoundEndReason, Side};
use crate::game::Game;
use crate::round::{EndReason, Phase, RoundAccumulator};
use crate::state::GameState;
use crate::teams::Teams;
use crate::ROSTER_SIZE;

/// Rebuilds the rounds of one match from its event stream.
///
/// Every notification goes through [`RoundTracker::apply`] together with the
/// game state as it was when the notification was emitted. Signals that do not
/// fit the current round lifecycle are dropped silently.
#[derive(Debug)]
pub struct RoundTracker {
    game: Game,
    round: RoundAccumulator,
    teams: Teams,
    win_screen: bool,
    last_end_tick: Option<u32>,
    /// Start of a round announced while the previous one still awaited its
    /// ratification.
    next_start: Option<u32>,
}

impl RoundTracker {
    pub fn new(game: Game) -> Self {
        Self {
            game,
            round: RoundAccumulator::open(0),
            teams: Teams::new(),
            win_screen: false,
            last_end_tick: None,
            next_start: None,
        }
    }

    pub fn game(&self) -> &Game {
        &self.game
    }

    pub fn round(&self) -> &RoundAccumulator {
        &self.round
    }

    pub fn teams(&self) -> &Teams {
        &self.teams
    }

    pub fn apply<S>(&mut self, event: &Event, state: &S)
    where
        S: GameState + ?Sized,
    {
        match event {
            Event::MatchStart => {
                self.game.match_start_tick = state.tick();
            }
            Event::MatchStartedChanged { started } => {
                if *started && self.game.match_start_tick == 0 {
                    self.game.match_start_tick = state.tick();
                    self.game.match_end_tick = 0;
                }
                if !*started {
                    self.game.match_end_tick = state.tick();
                }
            }
            Event::WarmupChanged { warmup } => self.warmup_changed(*warmup),
            Event::WinPanelMatch => {
                self.win_screen = true;
            }
            Event::RoundStart => self.round_start(state),
            Event::FreezeTimeEnded => self.freeze_time_ended(state),
            Event::RoundEnd { winner, reason } => self.round_end(*winner, *reason, state),
            Event::RoundOfficiallyEnded | Event::ScoreUpdated => self.ratify(state),
            Event::SideSwap => {
                tracing::debug!(tick = state.tick(), "Teams switched sides");
                self.teams.swap_sides();
            }
            Event::Kill { victim, killer } => self.kill(*victim, *killer, state),
            Event::BombPlanted => {
                if self.bomb_tracked(state) {
                    self.round.bomb_exploded = None;
                    self.round.bomb_defused = None;
                    self.round.bomb_planted = Some(state.tick());
                }
            }
            Event::BombDefused => {
                if self.bomb_tracked(state) {
                    self.round.set_end_reason(EndReason::BombDefused);
                    self.round.bomb_defused = Some(state.tick());
                }
            }
            Event::BombExploded => {
                if self.bomb_tracked(state) {
                    self.round.set_end_reason(EndReason::BombExploded);
                    self.round.bomb_exploded = Some(state.tick());
                }
            }
            Event::FrameDone => {
                if self.round.pending_reconcile {
                    reconcile(&mut self.round, state);
                }
            }
        };
    }

    /// Ends the stream, closing out a round whose ratification never arrived.
    pub fn finish<S>(mut self, state: &S) -> Game
    where
        S: GameState + ?Sized,
    {
        if self.round.is_open() && !state.is_warmup() {
            let official_end = self.official_end_tick(state.tick());
            self.settle(official_end, state);
        }

        self.teams.observe_sides(state);
        self.game.update_teams(&self.teams, state);

        self.game
    }

    /// Closes the open round without a ratification, as long as the score
    /// says it is the next round of the match. Otherwise it is dropped.
    fn settle<S>(&mut self, official_end: u32, state: &S)
    where
        S: GameState + ?Sized,
    {
        if self.round.pending_reconcile {
            reconcile(&mut self.round, state);
        }

        let finalized = self.game.rounds.len();
        match boundary::check_score(&self.round, state, finalized) {
            Ok(round_number) if round_number as usize == finalized + 1 => {
                self.close(round_number, official_end, state);
            }
            Ok(round_number) => {
                tracing::debug!(round_number, finalized, "Dropping unratified round");
            }
            Err(reason) => {
                tracing::debug!(?reason, "Dropping unratified round");
            }
        };
    }

    fn warmup_changed(&mut self, warmup: bool) {
        if !warmup || self.win_screen {
            return;
        }

        tracing::debug!(
            rounds = self.game.rounds.len(),
            "Warmup entered, discarding rounds"
        );
        self.game.reset();
        self.teams.clear();
        self.round = RoundAccumulator::idle();
        self.last_end_tick = None;
        self.next_start = None;
    }

    fn round_start<S>(&mut self, state: &S)
    where
        S: GameState + ?Sized,
    {
        let tick = state.tick();
        if state.is_warmup() || !state.is_match_started() || self.last_end_tick == Some(tick) {
            tracing::trace!(tick, "Ignoring round start");
            return;
        }

        if self.round.phase == Phase::ProvisionallyEnded {
            tracing::trace!(tick, "Round start deferred until the ended round is ratified");
            self.next_start = Some(tick);
            return;
        }

        if self.round.is_open() {
            tracing::debug!(
                tick,
                previous_start = self.round.start_tick,
                "Round restarted before it was closed"
            );
        }

        tracing::debug!(tick, "Round started");
        self.next_start = None;
        self.round = RoundAccumulator::open(tick);
    }

    fn freeze_time_ended<S>(&mut self, state: &S)
    where
        S: GameState + ?Sized,
    {
        let tick = state.tick();
        if state.is_warmup() || !state.is_match_started() || self.last_end_tick == Some(tick) {
            tracing::trace!(tick, "Ignoring freeze time end");
            return;
        }

        match self.round.phase {
            Phase::Idle => {
                self.round = RoundAccumulator::open(tick);
            }
            Phase::Live | Phase::Counting => {
                if matches!(self.round.unfreeze_tick, Some(unfreeze) if unfreeze > self.round.start_tick) {
                    tracing::trace!(tick, "Freeze time already ended for this round");
                    return;
                }
                // No round start was seen for this round.
                if self.round.start_tick == 0 {
                    self.round.start_tick = tick;
                }
            }
            Phase::ProvisionallyEnded => {
                let next_start = match self.next_start.take() {
                    Some(next_start) => next_start,
                    None => {
                        tracing::trace!(tick, "Ignoring freeze time end of an ended round");
                        return;
                    }
                };

                tracing::debug!(tick, "Next round underway without a ratification");
                self.settle(next_start, state);
                self.round = RoundAccumulator::open(next_start);
            }
        };

        self.round.phase = Phase::Counting;
        self.round.unfreeze_tick = Some(tick);
        self.round.previous_round = state.total_rounds_played();
        for side in [Side::T, Side::CT] {
            let team = state.team(side);
            let tally = self.round.tally_mut(side);
            tally.previous_score = team.score;
            tally.previous_name = team.clan_name.clone();
            tally.kills = 0;
            tally.streak = Default::default();
        }
        self.round.clear_end_reason();

        self.teams.observe_sides(state);
    }

    fn kill<S>(&mut self, victim: Side, killer: Option<Killer>, state: &S)
    where
        S: GameState + ?Sized,
    {
        if state.tick() == 0
            || !self.round.is_counting()
            || !state.is_match_started()
            || state.is_warmup()
        {
            return;
        }

        let killer = match killer {
            Some(k) if k.side != victim => k,
            _ => return,
        };

        let bomb_planted = self.round.bomb_planted.is_some();
        let tally = self.round.tally_mut(killer.side);
        tally.kills += 1;
        tally.streak.credit(killer.entity);

        // With the bomb down, wiping the attackers does not end the round.
        let wiped = tally.kills == ROSTER_SIZE && !(killer.side == Side::CT && bomb_planted);
        if wiped {
            self.round.set_end_reason(EndReason::TeamKill);
        }
    }

    fn round_end<S>(&mut self, winner: Option<Side>, reason: RoundEndReason, state: &S)
    where
        S: GameState + ?Sized,
    {
        let tick = state.tick();
        if !self.round.is_counting() {
            tracing::trace!(tick, ?reason, "Ignoring round end");
            return;
        }
        self.last_end_tick = Some(tick);

        let winner = match winner {
            Some(w) => w,
            None => {
                tracing::debug!(tick, ?reason, "Round ended without a winner, discarding");
                self.round = RoundAccumulator::idle();
                return;
            }
        };

        self.round.phase = Phase::ProvisionallyEnded;
        self.round.end_tick = Some(tick);

        if self.round.tally(winner).kills < ROSTER_SIZE && !reason.is_bomb() {
            tracing::trace!(
                tick,
                ?winner,
                kills = self.round.tally(winner).kills,
                "Kill count behind round end, reconciling on next frame"
            );
            self.round.pending_reconcile = true;
        }

        let end_reason = match reason {
            RoundEndReason::TargetBombed => EndReason::BombExploded,
            RoundEndReason::BombDefused => EndReason::BombDefused,
            _ => EndReason::Expired,
        };
        self.round.set_end_reason(end_reason);
    }

    fn ratify<S>(&mut self, state: &S)
    where
        S: GameState + ?Sized,
    {
        let ctx = BoundaryContext {
            win_screen: self.win_screen,
            tick_rate: self.game.tick_rate,
            finalized: self.game.rounds.len(),
        };

        let round_number = match boundary::check_ratification(&self.round, state, ctx) {
            Ok(n) => n,
            Err(reason) => {
                tracing::trace!(tick = state.tick(), ?reason, "Ignoring round ratification");
                return;
            }
        };

        let official_end = self.official_end_tick(state.tick());
        self.close(round_number, official_end, state);
    }

    fn official_end_tick(&self, tick: u32) -> u32 {
        if !self.win_screen {
            tick
        } else if self.game.match_end_tick > 0 {
            self.game.match_end_tick
        } else {
            self.game.max_ticks
        }
    }

    fn close<S>(&mut self, round_number: u32, official_end: u32, state: &S)
    where
        S: GameState + ?Sized,
    {
        let mut round = std::mem::replace(&mut self.round, RoundAccumulator::idle());
        if round.pending_reconcile {
            reconcile(&mut round, state);
        }

        self.teams.observe_sides(state);
        self.game.update_teams(&self.teams, state);

        let record = crate::finalize::finalize(
            round,
            round_number,
            official_end,
            state,
            &self.teams,
            self.game.tick_time,
        );

        tracing::debug!(
            round = record.round_number,
            winner = %record.winner,
            reason = ?record.end_reason,
            "Round finalized"
        );

        self.last_end_tick = Some(record.end_tick);
        self.game.rounds.push(record);

        if let Some(next_start) = self.next_start.take() {
            tracing::debug!(tick = next_start, "Round started");
            self.round = RoundAccumulator::open(next_start);
        }
    }

    fn bomb_tracked<S>(&self, state: &S) -> bool
    where
        S: GameState + ?Sized,
    {
        self.round.is_open() && state.is_match_started()
    }
}

/// Replaces the event-derived kill tallies with the ones implied by who is
/// still alive.
fn reconcile<S>(round: &mut RoundAccumulator, state: &S)
where
    S: GameState + ?Sized,
{
    for side in [Side::T, Side::CT] {
        let alive = state.alive_count(side.opponent()) as u32;
        round.tally_mut(side).kills = ROSTER_SIZE.saturating_sub(alive);
    }

    tracing::trace!(t = round.t.kills, ct = round.ct.kills, "Reconciled kill counts");

    round.pending_reconcile = false;
    round.mismatch_corrected = true;
}
