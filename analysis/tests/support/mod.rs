#![allow(dead_code)]

use analysis::{
    DemoHeader, EntityId, Event, Game, Killer, PlayerState, RoundEndReason, RoundTracker, Side,
    Snapshot,
};

pub const ALPHA: &str = "Alpha";
pub const BRAVO: &str = "Bravo";

pub const FREEZE: u32 = 640;
pub const ROUND_LEN: u32 = 2000;
pub const OFFICIAL_DELAY: u32 = 448;
pub const ROUND_SPACING: u32 = 3000;

pub fn header() -> DemoHeader {
    DemoHeader {
        map_name: "de_nuke".to_owned(),
        playback_ticks: 128_000,
        playback_time: 2000.0,
        signon_length: 1,
    }
}

pub fn round_start(n: u32) -> u32 {
    1000 + n * ROUND_SPACING
}

pub fn side_entities(side: Side) -> std::ops::RangeInclusive<i32> {
    match side {
        Side::T => 1..=5,
        Side::CT => 6..=10,
    }
}

/// Scripted replay of a match against a hand-maintained snapshot.
pub struct Replay {
    pub state: Snapshot,
    pub tracker: RoundTracker,
}

impl Replay {
    pub fn new() -> Self {
        let game = Game::from_header(&header()).unwrap();

        let mut state = Snapshot::default();
        for side in [Side::T, Side::CT] {
            for (i, entity) in side_entities(side).enumerate() {
                let prefix = match side {
                    Side::T => "t",
                    Side::CT => "ct",
                };
                state.players.insert(
                    EntityId(entity),
                    PlayerState {
                        name: format!("{}{}", prefix, i + 1),
                        side: Some(side),
                        alive: true,
                    },
                );
            }
        }
        state.ct.clan_name = ALPHA.to_owned();
        state.t.clan_name = BRAVO.to_owned();

        Self {
            state,
            tracker: RoundTracker::new(game),
        }
    }

    pub fn at(&mut self, tick: u32) -> &mut Self {
        self.state.tick = tick;
        self
    }

    pub fn emit(&mut self, event: Event) -> &mut Self {
        self.tracker.apply(&event, &self.state);
        self
    }

    pub fn start_match(&mut self, tick: u32) -> &mut Self {
        self.at(tick);
        self.state.warmup = false;
        self.emit(Event::WarmupChanged { warmup: false });
        self.state.match_started = true;
        self.emit(Event::MatchStartedChanged { started: true });
        self.emit(Event::MatchStart)
    }

    pub fn kill(&mut self, killer: i32, victim: i32) -> &mut Self {
        let killer_side = self.state.players[&EntityId(killer)].side.unwrap();
        let victim_state = self.state.player_mut(EntityId(victim));
        victim_state.alive = false;
        let victim_side = victim_state.side.unwrap();

        self.emit(Event::Kill {
            victim: victim_side,
            killer: Some(Killer {
                entity: EntityId(killer),
                side: killer_side,
            }),
        })
    }

    pub fn respawn(&mut self) -> &mut Self {
        for player in self.state.players.values_mut() {
            player.alive = true;
        }
        self
    }

    pub fn begin_round(&mut self, start: u32) -> &mut Self {
        self.respawn();
        self.at(start).emit(Event::RoundStart);
        self.at(start + FREEZE).emit(Event::FreezeTimeEnded)
    }

    /// Every player of `side` takes one of the opponents, so nobody gets an ace.
    pub fn wipe(&mut self, side: Side, from_tick: u32) -> &mut Self {
        let killers: Vec<i32> = side_entities(side).collect();
        let victims: Vec<i32> = side_entities(side.opponent()).collect();
        for (i, (killer, victim)) in killers.into_iter().zip(victims).enumerate() {
            self.at(from_tick + i as u32 * 20).kill(killer, victim);
        }
        self
    }

    pub fn score(&mut self, winner: Side) -> &mut Self {
        self.state.team_mut(winner).score += 1;
        self.state.total_rounds_played += 1;
        self
    }

    pub fn end_round(&mut self, tick: u32, winner: Side, reason: RoundEndReason) -> &mut Self {
        self.at(tick).score(winner);
        self.emit(Event::RoundEnd {
            winner: Some(winner),
            reason,
        });
        self.emit(Event::FrameDone)
    }

    pub fn ratify(&mut self, tick: u32) -> &mut Self {
        self.at(tick).emit(Event::RoundOfficiallyEnded)
    }

    pub fn play_round(&mut self, start: u32, winner: Side) -> &mut Self {
        let reason = match winner {
            Side::T => RoundEndReason::TerroristsWin,
            Side::CT => RoundEndReason::CtWin,
        };

        self.begin_round(start);
        self.wipe(winner, start + FREEZE + 300);
        self.end_round(start + ROUND_LEN, winner, reason);
        self.ratify(start + ROUND_LEN + OFFICIAL_DELAY)
    }

    pub fn finish(self) -> Game {
        let Replay { state, tracker } = self;
        tracker.finish(&state)
    }
}
