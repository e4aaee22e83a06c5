//! Turns decoded demo data back into the tracker's notification stream.
//!
//! The decoder delivers entity deltas and game events separately. Entity
//! deltas update the [`Snapshot`] right away, while the lifecycle events
//! derived from them (round start and end, freeze time, warmup, match state,
//! side switch) are held back until every game event of the same tick went
//! out. A tick therefore always reads: game events, derived events,
//! [`Event::FrameDone`].

use std::collections::HashMap;

use analysis::{EntityId, Event, Killer, RoundEndReason, RoundTracker, Side, Snapshot};

/// Receives the replayed notifications.
pub trait Sink {
    fn accept(&mut self, event: &Event, state: &Snapshot);
}

impl Sink for RoundTracker {
    fn accept(&mut self, event: &Event, state: &Snapshot) {
        self.apply(event, state);
    }
}

/// Changed properties of the game rules entity.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RulesDelta {
    pub warmup: Option<bool>,
    pub match_started: Option<bool>,
    pub total_rounds_played: Option<u32>,
    pub win_reason: Option<i32>,
    pub round_start_count: Option<u32>,
    pub freeze_period: Option<bool>,
    pub round_end_count: Option<u32>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Delta {
    Rules(RulesDelta),
    Team {
        entity: i32,
        side: Option<Side>,
        score: Option<u32>,
        clan_name: Option<String>,
    },
    Player {
        user: i32,
        side: Option<Side>,
        alive: Option<bool>,
    },
}

/// Game events, with players still identified by their user id.
#[derive(Debug, Clone, PartialEq)]
pub enum Notice {
    /// Forwarded as is.
    Event(Event),
    Spawn { user: i32 },
    Death { victim: i32, attacker: Option<i32> },
}

/// What the decoder knows about a player up front.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RosterEntry {
    pub name: String,
    pub side: Option<Side>,
}

#[derive(Debug, Default)]
struct RulesCache {
    round_start_count: Option<u32>,
    round_end_count: Option<u32>,
    freeze_period: bool,
    win_reason: i32,
}

#[derive(Debug)]
pub struct Replayer {
    state: Snapshot,
    roster: HashMap<i32, RosterEntry>,
    team_entities: HashMap<i32, Side>,
    rules: RulesCache,
    /// Last complete (T, CT) clan pairing, used to notice halftime.
    clans: Option<(String, String)>,
    deferred: Vec<Event>,
    in_frame: bool,
}

impl Replayer {
    pub fn new(roster: HashMap<i32, RosterEntry>) -> Self {
        Self {
            state: Snapshot::default(),
            roster,
            team_entities: HashMap::new(),
            rules: RulesCache::default(),
            clans: None,
            deferred: Vec::new(),
            in_frame: false,
        }
    }

    pub fn state(&self) -> &Snapshot {
        &self.state
    }

    /// Moves to `tick`, closing the previous one.
    pub fn tick<K>(&mut self, tick: u32, sink: &mut K)
    where
        K: Sink + ?Sized,
    {
        if self.in_frame {
            if tick == self.state.tick {
                return;
            }

            self.flush(sink);
            sink.accept(&Event::FrameDone, &self.state);
        }
        self.in_frame = true;
        self.state.tick = tick;
    }

    /// Closes the last tick of the stream.
    pub fn finish<K>(&mut self, sink: &mut K)
    where
        K: Sink + ?Sized,
    {
        self.flush(sink);
        sink.accept(&Event::FrameDone, &self.state);
    }

    pub fn notice<K>(&mut self, notice: Notice, sink: &mut K)
    where
        K: Sink + ?Sized,
    {
        match notice {
            Notice::Event(event) => sink.accept(&event, &self.state),
            Notice::Spawn { user } => {
                let side = self.side_of(user);
                let player = self.player_mut(user);
                player.alive = true;
                if side.is_some() {
                    player.side = side;
                }
            }
            Notice::Death { victim, attacker } => {
                let victim_side = match self.side_of(victim) {
                    Some(s) => s,
                    None => return,
                };
                self.player_mut(victim).alive = false;

                let killer = attacker
                    .filter(|attacker| *attacker != victim)
                    .and_then(|attacker| {
                        self.side_of(attacker).map(|side| Killer {
                            entity: EntityId(attacker),
                            side,
                        })
                    });

                sink.accept(
                    &Event::Kill {
                        victim: victim_side,
                        killer,
                    },
                    &self.state,
                );
            }
        };
    }

    /// Applies the entity changes of the current tick.
    pub fn entities<I>(&mut self, deltas: I)
    where
        I: IntoIterator<Item = Delta>,
    {
        for delta in deltas {
            match delta {
                Delta::Rules(rules) => self.apply_rules(rules),
                Delta::Team {
                    entity,
                    side,
                    score,
                    clan_name,
                } => {
                    if let Some(side) = side {
                        self.team_entities.insert(entity, side);
                    }
                    let side = match self.team_entities.get(&entity) {
                        Some(side) => *side,
                        None => continue,
                    };

                    let team = self.state.team_mut(side);
                    if let Some(score) = score {
                        team.score = score;
                    }
                    if let Some(name) = clan_name {
                        team.clan_name = name;
                    }
                }
                Delta::Player { user, side, alive } => {
                    let side = side.or_else(|| self.side_of(user));
                    let player = self.player_mut(user);
                    player.side = side;
                    if let Some(alive) = alive {
                        player.alive = alive;
                    }
                }
            };
        }

        self.detect_side_swap();
    }

    fn apply_rules(&mut self, rules: RulesDelta) {
        if let Some(warmup) = rules.warmup {
            if warmup != self.state.warmup {
                self.state.warmup = warmup;
                self.deferred.push(Event::WarmupChanged { warmup });
            }
        }

        if let Some(started) = rules.match_started {
            if started != self.state.match_started {
                self.state.match_started = started;
                self.deferred.push(Event::MatchStartedChanged { started });
            }
        }

        if let Some(total) = rules.total_rounds_played {
            self.state.total_rounds_played = total;
        }

        if let Some(reason) = rules.win_reason {
            self.rules.win_reason = reason;
        }

        if let Some(count) = rules.round_start_count {
            let previous = self.rules.round_start_count.replace(count);
            if previous.map(|p| count > p).unwrap_or(false) {
                self.deferred.push(Event::RoundStart);
            }
        }

        if let Some(frozen) = rules.freeze_period {
            if self.rules.freeze_period && !frozen {
                self.deferred.push(Event::FreezeTimeEnded);
            }
            self.rules.freeze_period = frozen;
        }

        if let Some(count) = rules.round_end_count {
            let previous = self.rules.round_end_count.replace(count);
            if previous.map(|p| count > p).unwrap_or(false) {
                let reason = RoundEndReason::from_code(self.rules.win_reason)
                    .unwrap_or(RoundEndReason::StillInProgress);
                if reason == RoundEndReason::TargetBombed {
                    self.deferred.push(Event::BombExploded);
                }
                self.deferred.push(Event::RoundEnd {
                    winner: reason.winner(),
                    reason,
                });
            }
        }
    }

    fn detect_side_swap(&mut self) {
        let t = &self.state.t.clan_name;
        let ct = &self.state.ct.clan_name;
        if t.is_empty() || ct.is_empty() || t == ct {
            return;
        }

        if let Some((previous_t, previous_ct)) = self.clans.as_ref() {
            if previous_t == ct && previous_ct == t {
                self.deferred.push(Event::SideSwap);
            }
        }
        self.clans = Some((t.clone(), ct.clone()));
    }

    fn flush<K>(&mut self, sink: &mut K)
    where
        K: Sink + ?Sized,
    {
        for event in std::mem::take(&mut self.deferred) {
            tracing::trace!(tick = self.state.tick, ?event, "Derived event");
            sink.accept(&event, &self.state);
        }
    }

    fn side_of(&self, user: i32) -> Option<Side> {
        self.state
            .players
            .get(&EntityId(user))
            .and_then(|p| p.side)
            .or_else(|| self.roster.get(&user).and_then(|r| r.side))
    }

    fn player_mut(&mut self, user: i32) -> &mut analysis::PlayerState {
        let name = self.roster.get(&user).map(|r| r.name.clone());
        let player = self.state.player_mut(EntityId(user));
        if player.name.is_empty() {
            if let Some(name) = name {
                player.name = name;
            }
        }
        player
    }
}
