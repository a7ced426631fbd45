pub(crate) mod api;
pub mod client;

pub use client::TmdbClient;

/// Shown when a title has no poster
const PLACEHOLDER_IMAGE: &str =
    "https://images.unsplash.com/photo-1485846234645-a62644f84728?q=80&w=500&auto=format&fit=crop";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImageSize {
    W500,
    Original,
}

impl ImageSize {
    fn as_str(self) -> &'static str {
        match self {
            Self::W500 => "w500",
            Self::Original => "original",
        }
    }
}

/// Full URL for a poster/still path, or a placeholder when the path is missing
pub fn image_url(image_base: &str, path: Option<&str>, size: ImageSize) -> String {
    match path.filter(|p| !p.is_empty()) {
        Some(path) => format!("{}/{}{}", image_base.trim_end_matches('/'), size.as_str(), path),
        None => PLACEHOLDER_IMAGE.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_image_url() {
        assert_eq!(
            image_url("https://image.tmdb.org/t/p/", Some("/abc.jpg"), ImageSize::W500),
            "https://image.tmdb.org/t/p/w500/abc.jpg"
        );
        assert_eq!(image_url("https://image.tmdb.org/t/p", Some(""), ImageSize::Original), PLACEHOLDER_IMAGE);
        assert_eq!(image_url("https://image.tmdb.org/t/p", None, ImageSize::W500), PLACEHOLDER_IMAGE);
    }
}
