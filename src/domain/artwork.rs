use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::app::{ArtifyError, Result};

/// Byte length of a backend artwork identifier (24 hex characters).
const ID_BYTES: usize = 12;

/// A validated artwork identifier.
///
/// The backend identifies artworks by a fixed-length hexadecimal token.
/// Anything else is rejected before it can reach the network, so interaction
/// endpoints are never called with an identifier known to fail.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ArtworkId(String);

impl ArtworkId {
    pub fn parse(raw: &str) -> Result<Self> {
        match hex::decode(raw) {
            Ok(bytes) if bytes.len() == ID_BYTES => Ok(Self(raw.to_lowercase())),
            _ => Err(ArtifyError::InvalidArtworkId(raw.to_string())),
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for ArtworkId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for ArtworkId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// A cached projection of a backend artwork.
///
/// The backend is the source of truth; every fetch produces an independent
/// copy, never a shared mutable reference.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Artwork {
    #[serde(alias = "_id")]
    pub id: String,
    pub title: String,
    #[serde(default, alias = "image")]
    pub image_url: Option<String>,
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default)]
    pub medium: Option<String>,
    #[serde(default)]
    pub dimensions: Option<String>,
    #[serde(default)]
    pub price: Option<f64>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default, alias = "artistName")]
    pub user_name: Option<String>,
    #[serde(default)]
    pub user_email: Option<String>,
    #[serde(default)]
    pub likes_count: u64,
    #[serde(default)]
    pub visibility: Option<String>,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
}

impl Artwork {
    /// Identifier usable for like/favorite requests.
    ///
    /// `None` when the id does not match the backend's identifier shape;
    /// callers suppress the affected controls instead of issuing a request
    /// that is known to fail.
    pub fn interactive_id(&self) -> Option<ArtworkId> {
        ArtworkId::parse(&self.id).ok()
    }

    pub fn display_artist(&self) -> &str {
        self.user_name.as_deref().unwrap_or("Unknown artist")
    }
}

/// Query parameters for the public artwork listing.
#[derive(Debug, Clone, Default)]
pub struct ArtworkFilter {
    pub category: Option<String>,
    pub search: Option<String>,
    pub artist: Option<String>,
}

impl ArtworkFilter {
    pub fn is_empty(&self) -> bool {
        self.category.is_none() && self.search.is_none() && self.artist.is_none()
    }

    pub fn query_pairs(&self) -> Vec<(&'static str, &str)> {
        let mut pairs = Vec::new();
        if let Some(category) = &self.category {
            pairs.push(("category", category.as_str()));
        }
        if let Some(search) = &self.search {
            pairs.push(("search", search.as_str()));
        }
        if let Some(artist) = &self.artist {
            pairs.push(("artist", artist.as_str()));
        }
        pairs
    }
}
