// Domain layer: value objects, the roster aggregate and its ports. No I/O here.

pub mod group;
pub mod ids;
pub mod participant;
pub mod ports;
pub mod rank;
pub mod roster;

pub use group::{GroupIdentity, MAX_GROUPS, MAX_PARTICIPANTS};
pub use ids::{GroupId, ParticipantId, TournamentId};
pub use participant::{NewParticipant, ParticipantRecord, BYE_NAME};
pub use ports::{GroupRepository, RosterRepository};
pub use rank::Rank;
pub use roster::GroupRoster;
