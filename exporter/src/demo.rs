//! Replays a CS2 demo through the round tracker.
//!
//! csdemo output is translated into [`crate::replay`] deltas and notices here;
//! the merge of both streams lives in [`crate::replay::Replayer`].

use std::collections::HashMap;

use analysis::{DemoHeader, Event, Game, RoundTracker, Side};

use crate::replay::{Delta, Notice, Replayer, RosterEntry, RulesDelta};
use crate::ProcessError;

/// CS2 servers always simulate at 64 ticks per second.
pub const TICK_RATE: f64 = 64.0;

const RULES: &str = "CCSGameRulesProxy.CCSGameRules.";

pub fn analyse(buf: &[u8]) -> Result<Game, ProcessError> {
    let tmp = csdemo::Container::parse(buf).map_err(|e| ProcessError::Decode(format!("{:?}", e)))?;
    let output = csdemo::parser::parse(
        csdemo::FrameIterator::parse(tmp.inner),
        csdemo::parser::EntityFilter::all(),
    )
    .map_err(|e| ProcessError::Decode(format!("{:?}", e)))?;

    let last_tick = output
        .events
        .iter()
        .filter_map(|event| match event {
            csdemo::DemoEvent::Tick(tick) => Some(tick.tick()),
            _ => None,
        })
        .max()
        .unwrap_or(0);

    let header = DemoHeader {
        map_name: output.header.map_name().to_owned(),
        playback_ticks: last_tick,
        playback_time: f64::from(last_tick) / TICK_RATE,
        signon_length: output.entity_states.ticks.len() as u32,
    };
    let game = Game::from_header(&header)?;

    let pawn_ids: HashMap<i32, csdemo::UserId> = output
        .events
        .iter()
        .filter_map(|event| match event {
            csdemo::DemoEvent::GameEvent(ge) => match ge.as_ref() {
                csdemo::game_event::GameEvent::PlayerSpawn(pspawn) => match (&pspawn.userid_pawn, pspawn.userid) {
                    (Some(csdemo::RawValue::I32(v)), Some(userid)) => Some((*v, userid)),
                    _ => None,
                },
                _ => None,
            },
            _ => None,
        })
        .collect();

    let roster = output
        .player_info
        .iter()
        .map(|(user, player)| {
            (
                user.0,
                RosterEntry {
                    name: player.name.clone(),
                    side: Side::from_team_number(player.team),
                },
            )
        })
        .collect();

    let mut entities = EntityDecoder::new(pawn_ids);
    let mut replayer = Replayer::new(roster);
    let mut tracker = RoundTracker::new(game);

    let mut entity_ticks = output.entity_states.ticks.iter().peekable();
    for event in output.events.iter() {
        match event {
            csdemo::DemoEvent::Tick(tick) => {
                let tick = tick.tick();
                replayer.tick(tick, &mut tracker);

                while let Some(tick_state) = entity_ticks.next_if(|t| t.tick <= tick) {
                    replayer.entities(entities.decode(tick_state));
                }
            }
            csdemo::DemoEvent::GameEvent(ge) => {
                if let Some(notice) = notice(ge.as_ref()) {
                    replayer.notice(notice, &mut tracker);
                }
            }
            _ => {}
        };
    }

    for tick_state in entity_ticks {
        replayer.entities(entities.decode(tick_state));
    }
    replayer.finish(&mut tracker);

    Ok(tracker.finish(replayer.state()))
}

fn notice(event: &csdemo::game_event::GameEvent) -> Option<Notice> {
    let event = match event {
        csdemo::game_event::GameEvent::RoundAnnounceMatchStart(_) => Event::MatchStart,
        csdemo::game_event::GameEvent::WinPanelMatch(_) => Event::WinPanelMatch,
        csdemo::game_event::GameEvent::RoundOfficiallyEnded(_) => Event::RoundOfficiallyEnded,
        csdemo::game_event::GameEvent::BombPlanted(_) => Event::BombPlanted,
        csdemo::game_event::GameEvent::BombDefused(_) => Event::BombDefused,
        csdemo::game_event::GameEvent::PlayerSpawn(pspawn) => {
            return pspawn.userid.map(|user| Notice::Spawn { user: user.0 });
        }
        csdemo::game_event::GameEvent::PlayerDeath(death) => {
            return death.userid.map(|victim| Notice::Death {
                victim: victim.0,
                attacker: death.attacker.map(|a| a.0),
            });
        }
        _ => return None,
    };

    Some(Notice::Event(event))
}

/// Maps entity states onto deltas, following player pawns back to their user.
struct EntityDecoder {
    pawn_ids: HashMap<i32, csdemo::UserId>,
    entity_to_user: HashMap<i32, csdemo::UserId>,
}

impl EntityDecoder {
    fn new(pawn_ids: HashMap<i32, csdemo::UserId>) -> Self {
        Self {
            pawn_ids,
            entity_to_user: HashMap::new(),
        }
    }

    fn decode(&mut self, tick_state: &csdemo::parser::EntityTickStates) -> Vec<Delta> {
        let mut deltas = Vec::new();

        for state in tick_state.states.iter() {
            if state.class == "CCSGameRulesProxy" {
                let prop = |name: &str| state.get_prop(&format!("{}{}", RULES, name));

                deltas.push(Delta::Rules(RulesDelta {
                    warmup: prop("m_bWarmupPeriod").and_then(|p| flag(&p.value)),
                    match_started: prop("m_bHasMatchStarted").and_then(|p| flag(&p.value)),
                    total_rounds_played: prop("m_totalRoundsPlayed")
                        .and_then(|p| number(&p.value))
                        .map(|n| n.max(0) as u32),
                    win_reason: prop("m_eRoundWinReason").and_then(|p| p.value.as_i32()),
                    round_start_count: prop("m_nRoundStartCount").and_then(|p| p.value.as_u32()),
                    freeze_period: prop("m_bFreezePeriod").and_then(|p| flag(&p.value)),
                    round_end_count: prop("m_nRoundEndCount").and_then(|p| p.value.as_u32()),
                }));
            } else if state.class == "CCSTeam" {
                let score = csdemo::structured::ccsteam::CCSTeam::try_from(state)
                    .ok()
                    .and_then(|team| team.score())
                    .map(|score| score as u32);

                deltas.push(Delta::Team {
                    entity: state.id,
                    side: state
                        .get_prop("CCSTeam.m_iTeamNum")
                        .and_then(|p| number(&p.value))
                        .and_then(|n| Side::from_team_number(n as i32)),
                    score,
                    clan_name: state
                        .get_prop("CCSTeam.m_szClanTeamname")
                        .and_then(|p| text(&p.value)),
                });
            } else if state.class == "CCSPlayerPawn" {
                let user = match self.entity_to_user.get(&state.id) {
                    Some(user) => *user,
                    None => {
                        let user = state
                            .get_prop("CCSPlayerPawn.m_nEntityId")
                            .and_then(|p| number(&p.value))
                            .and_then(|pawn_id| self.pawn_ids.get(&(pawn_id as i32)).copied());
                        match user {
                            Some(user) => {
                                self.entity_to_user.insert(state.id, user);
                                user
                            }
                            None => continue,
                        }
                    }
                };

                deltas.push(Delta::Player {
                    user: user.0,
                    side: state
                        .get_prop("CCSPlayerPawn.m_iTeamNum")
                        .and_then(|p| number(&p.value))
                        .and_then(|n| Side::from_team_number(n as i32)),
                    // 0 means alive
                    alive: state
                        .get_prop("CCSPlayerPawn.m_lifeState")
                        .and_then(|p| number(&p.value))
                        .map(|lifestate| lifestate == 0),
                });
            }
        }

        deltas
    }
}

fn flag(value: &csdemo::parser::Variant) -> Option<bool> {
    match value {
        csdemo::parser::Variant::Bool(b) => Some(*b),
        other => number(other).map(|v| v != 0),
    }
}

fn number(value: &csdemo::parser::Variant) -> Option<i64> {
    value
        .as_u32()
        .map(i64::from)
        .or_else(|| value.as_i32().map(i64::from))
}

fn text(value: &csdemo::parser::Variant) -> Option<String> {
    match value {
        csdemo::parser::Variant::String(s) => Some(s.to_string()),
        _ => None,
    }
}
