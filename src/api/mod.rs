pub mod http;

use async_trait::async_trait;
use serde::Deserialize;

use crate::app::Result;
use crate::domain::{Artwork, ArtworkFilter, ArtworkId, ServerToggle};

/// What the like toggle endpoint reports back. Deployments differ on field
/// names and on which fields they include, so everything is optional and
/// aliased; omitted fields leave the optimistic value in place.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LikeToggle {
    #[serde(default, alias = "isLiked")]
    pub liked: Option<bool>,
    #[serde(default, alias = "count")]
    pub likes_count: Option<u64>,
}

impl From<LikeToggle> for ServerToggle {
    fn from(value: LikeToggle) -> Self {
        ServerToggle {
            liked: value.liked,
            likes_count: value.likes_count,
            favorited: None,
        }
    }
}

/// What the favorite toggle endpoint reports back.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct FavoriteToggle {
    #[serde(default, alias = "isFavorited")]
    pub favorited: Option<bool>,
}

impl From<FavoriteToggle> for ServerToggle {
    fn from(value: FavoriteToggle) -> Self {
        ServerToggle {
            liked: None,
            likes_count: None,
            favorited: value.favorited,
        }
    }
}

/// Boundary contract with the ARTIFY backend.
///
/// The synchronizer and the command surfaces depend on this trait, not on
/// reqwest, so tests drive them with an in-memory implementation.
#[async_trait]
pub trait ArtworkApi: Send + Sync {
    /// `PATCH /artworks/{id}/like`
    async fn toggle_like(&self, id: &ArtworkId) -> Result<LikeToggle>;

    /// `POST /favorites/toggle` with body `{ artworkId }`
    async fn toggle_favorite(&self, id: &ArtworkId) -> Result<FavoriteToggle>;

    /// `GET /artworks/{id}/is-liked/{userKey}`; absence (404) means `false`.
    async fn like_status(&self, id: &ArtworkId, user_key: &str) -> Result<bool>;

    /// `GET /favorites/check/{userKey}/{id}`; absence (404) means `false`.
    async fn favorite_status(&self, user_key: &str, id: &ArtworkId) -> Result<bool>;

    /// `GET /artworks/{id}`
    async fn artwork(&self, id: &ArtworkId) -> Result<Artwork>;

    /// `GET /artworks/featured`
    async fn featured(&self) -> Result<Vec<Artwork>>;

    /// `GET /artworks/public` with optional category/search/artist filters.
    async fn public(&self, filter: &ArtworkFilter) -> Result<Vec<Artwork>>;

    /// `GET /artworks/user/{userKey}`
    async fn by_user(&self, user_key: &str) -> Result<Vec<Artwork>>;

    /// `GET /artworks/categories`
    async fn categories(&self) -> Result<Vec<String>>;

    /// `GET /favorites/{userKey}`
    async fn favorites(&self, user_key: &str) -> Result<Vec<Artwork>>;

    /// `GET /favorites/{userKey}/ids`
    async fn favorite_ids(&self, user_key: &str) -> Result<Vec<String>>;

    /// `GET /favorites/{userKey}/count`
    async fn favorites_count(&self, user_key: &str) -> Result<u64>;

    /// `POST /favorites` with body `{ userKey, artworkId }`
    async fn add_favorite(&self, user_key: &str, id: &ArtworkId) -> Result<()>;

    /// `DELETE /favorites` with body `{ userKey, artworkId }`
    async fn remove_favorite(&self, user_key: &str, id: &ArtworkId) -> Result<()>;

    /// `DELETE /favorites/{userKey}/clear`
    async fn clear_favorites(&self, user_key: &str) -> Result<()>;
}
