pub mod accounts;
pub mod error;
pub mod history;
pub mod kind_cache;
pub mod kind_resolver;
pub mod reconcile;
pub mod search;
pub mod session;
pub mod stats;
pub mod sync;
pub mod user_store;

#[cfg(test)]
pub(crate) mod testing;

pub use accounts::{IdentityProvider, LocalAccounts, ProfileUpdate, Registration, ADMIN_USER_ID, MIN_PASSWORD_LEN};
pub use error::{AccountError, StoreError, TrackError};
pub use history::WatchHistoryStore;
pub use kind_cache::KindCache;
pub use kind_resolver::{KindResolver, SharedProvider};
pub use search::{DebouncedSearch, SearchUpdate};
pub use session::{Committed, Session};
pub use stats::{profile_stats, GenreCount, ProfileStats};
pub use sync::{SyncGateway, SyncOutcome, SyncPayload, SyncTicket};
pub use user_store::{JsonUserStore, SharedStore, UserStore};
