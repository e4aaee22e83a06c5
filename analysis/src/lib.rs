pub mod boundary;
pub mod event;
pub mod finalize;
pub mod game;
pub mod round;
pub mod state;
pub mod streak;
pub mod teams;

mod tracker;
pub use tracker::RoundTracker;

pub use event::{EntityId, Event, Killer, RoundEndReason, Side};
pub use game::{DemoHeader, Game, HeaderError};
pub use round::{EndReason, Round};
pub use state::{GameState, PlayerState, Snapshot, TeamState};

/// Players per team in a competitive match.
pub const ROSTER_SIZE: u32 = 5;
