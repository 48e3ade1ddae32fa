pub mod account;
pub mod matches;
pub mod routing;

pub use account::{Account, AccountDto, RiotIdStatus, validate_riot_id};
pub use matches::{MatchId, MatchInfo, MatchMetadata, MatchRecord, MatchSummary, Participant};
pub use routing::{PlatformRoute, RegionalRoute};
