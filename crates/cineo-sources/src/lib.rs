pub mod error;
pub mod tmdb;
pub mod traits;

pub use error::SourceError;
pub use tmdb::{image_url, ImageSize, TmdbClient};
pub use traits::MetadataProvider;
