pub mod content;
pub mod genre;
pub mod language;
pub mod media;
pub mod status;
pub mod user;
pub mod watch_history;

pub use content::{CastMember, ContentDetails, ContentSnapshot, ContentSummary, Episode, FilmDetails, Genre, SeasonDetails, SeasonSummary, SeriesDetails, Trailer};
pub use genre::genre_name;
pub use language::Language;
pub use media::{ContentId, KindEvidence, MediaKind, PersonId};
pub use status::WatchStatus;
pub use user::{Role, User};
pub use watch_history::{WatchHistoryItem, WatchedEpisodes};
