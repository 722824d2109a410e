pub mod adapters;
pub mod app;
pub mod config;
pub mod domain;
pub mod utils;

#[cfg(feature = "cli")]
pub use config::CliArgs;
pub use config::TournamentConfig;

pub use app::RosterService;
pub use domain::{
    GroupId, GroupIdentity, GroupRepository, GroupRoster, NewParticipant, ParticipantId,
    ParticipantRecord, Rank, RosterRepository, TournamentId,
};
pub use utils::error::{Result, RosterError};
