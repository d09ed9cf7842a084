use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, Method, RequestBuilder, StatusCode};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::json;
use url::Url;

use crate::api::{ArtworkApi, FavoriteToggle, LikeToggle};
use crate::app::{ArtifyError, Result};
use crate::auth::Session;
use crate::config::ApiConfig;
use crate::domain::{Artwork, ArtworkFilter, ArtworkId};

/// reqwest-backed implementation of [`ArtworkApi`].
///
/// Attaches the session's bearer token to every request when a session
/// exists; without one the request goes out bare and the server's rejection
/// surfaces as `Unauthenticated`.
pub struct HttpApi {
    client: Client,
    base: Url,
    token: Option<String>,
}

impl HttpApi {
    pub fn new(config: &ApiConfig, session: Option<&Session>) -> Result<Self> {
        let base = Url::parse(&config.base_url)?;
        if base.cannot_be_a_base() {
            return Err(ArtifyError::Config(format!(
                "api.base_url is not a usable base URL: {}",
                config.base_url
            )));
        }

        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .gzip(true)
            .brotli(true)
            .user_agent(concat!("artify/", env!("CARGO_PKG_VERSION")))
            .build()
            .expect("Failed to build HTTP client");

        Ok(Self {
            client,
            base,
            token: session.map(|s| s.token.clone()),
        })
    }

    /// Build an endpoint URL from path segments, percent-encoding each one.
    /// User keys are email addresses and must survive the trip.
    fn endpoint(&self, segments: &[&str]) -> Url {
        let mut url = self.base.clone();
        url.path_segments_mut()
            .expect("base URL validated at construction")
            .pop_if_empty()
            .extend(segments);
        url
    }

    fn request(&self, method: Method, url: Url) -> RequestBuilder {
        let mut req = self.client.request(method, url);
        if let Some(token) = &self.token {
            req = req.bearer_auth(token);
        }
        req
    }

    /// Send the request and surface auth and non-2xx responses as errors,
    /// carrying the server-provided message when there is one.
    async fn check(&self, req: RequestBuilder) -> Result<reqwest::Response> {
        let response = req.send().await?;
        let status = response.status();

        if status == StatusCode::UNAUTHORIZED || status == StatusCode::FORBIDDEN {
            return Err(ArtifyError::Unauthenticated);
        }
        if !status.is_success() {
            let message = response
                .json::<ServerMessage>()
                .await
                .ok()
                .and_then(|m| m.message)
                .unwrap_or_else(|| {
                    status
                        .canonical_reason()
                        .unwrap_or("request failed")
                        .to_string()
                });
            return Err(ArtifyError::Api {
                status: status.as_u16(),
                message,
            });
        }

        Ok(response)
    }

    async fn execute<T: DeserializeOwned>(&self, req: RequestBuilder) -> Result<T> {
        Ok(self.check(req).await?.json::<T>().await?)
    }

    /// Fire-and-check variant for endpoints whose response body we ignore.
    async fn execute_unit(&self, req: RequestBuilder) -> Result<()> {
        self.check(req).await.map(|_| ())
    }
}

/// Maps a status-check result so that "never interacted" (a 404-class
/// response) reads as `false` instead of an error.
fn absence_is_false(result: Result<bool>) -> Result<bool> {
    match result {
        Err(e) if e.is_not_found() => Ok(false),
        other => other,
    }
}

#[async_trait]
impl ArtworkApi for HttpApi {
    async fn toggle_like(&self, id: &ArtworkId) -> Result<LikeToggle> {
        let url = self.endpoint(&["artworks", id.as_str(), "like"]);
        self.execute(self.request(Method::PATCH, url)).await
    }

    async fn toggle_favorite(&self, id: &ArtworkId) -> Result<FavoriteToggle> {
        let url = self.endpoint(&["favorites", "toggle"]);
        let req = self
            .request(Method::POST, url)
            .json(&json!({ "artworkId": id.as_str() }));
        self.execute(req).await
    }

    async fn like_status(&self, id: &ArtworkId, user_key: &str) -> Result<bool> {
        let url = self.endpoint(&["artworks", id.as_str(), "is-liked", user_key]);
        let result = self
            .execute::<LikeStatus>(self.request(Method::GET, url))
            .await
            .map(|s| s.liked);
        absence_is_false(result)
    }

    async fn favorite_status(&self, user_key: &str, id: &ArtworkId) -> Result<bool> {
        let url = self.endpoint(&["favorites", "check", user_key, id.as_str()]);
        let result = self
            .execute::<FavoriteStatus>(self.request(Method::GET, url))
            .await
            .map(|s| s.favorited());
        absence_is_false(result)
    }

    async fn artwork(&self, id: &ArtworkId) -> Result<Artwork> {
        let url = self.endpoint(&["artworks", id.as_str()]);
        let envelope: ObjectEnvelope<Artwork> = self.execute(self.request(Method::GET, url)).await?;
        Ok(envelope.into_inner())
    }

    async fn featured(&self) -> Result<Vec<Artwork>> {
        let url = self.endpoint(&["artworks", "featured"]);
        let envelope: ListEnvelope<Artwork> = self.execute(self.request(Method::GET, url)).await?;
        Ok(envelope.into_inner())
    }

    async fn public(&self, filter: &ArtworkFilter) -> Result<Vec<Artwork>> {
        let mut url = self.endpoint(&["artworks", "public"]);
        if !filter.is_empty() {
            url.query_pairs_mut().extend_pairs(filter.query_pairs());
        }
        let envelope: ListEnvelope<Artwork> = self.execute(self.request(Method::GET, url)).await?;
        Ok(envelope.into_inner())
    }

    async fn by_user(&self, user_key: &str) -> Result<Vec<Artwork>> {
        let url = self.endpoint(&["artworks", "user", user_key]);
        let envelope: ListEnvelope<Artwork> = self.execute(self.request(Method::GET, url)).await?;
        Ok(envelope.into_inner())
    }

    async fn categories(&self) -> Result<Vec<String>> {
        let url = self.endpoint(&["artworks", "categories"]);
        let envelope: ListEnvelope<String> = self.execute(self.request(Method::GET, url)).await?;
        Ok(envelope.into_inner())
    }

    async fn favorites(&self, user_key: &str) -> Result<Vec<Artwork>> {
        let url = self.endpoint(&["favorites", user_key]);
        let envelope: ListEnvelope<Artwork> = self.execute(self.request(Method::GET, url)).await?;
        Ok(envelope.into_inner())
    }

    async fn favorite_ids(&self, user_key: &str) -> Result<Vec<String>> {
        let url = self.endpoint(&["favorites", user_key, "ids"]);
        let envelope: ListEnvelope<String> = self.execute(self.request(Method::GET, url)).await?;
        Ok(envelope.into_inner())
    }

    async fn favorites_count(&self, user_key: &str) -> Result<u64> {
        let url = self.endpoint(&["favorites", user_key, "count"]);
        let envelope: CountEnvelope = self.execute(self.request(Method::GET, url)).await?;
        Ok(envelope.into_inner())
    }

    async fn add_favorite(&self, user_key: &str, id: &ArtworkId) -> Result<()> {
        let url = self.endpoint(&["favorites"]);
        let req = self
            .request(Method::POST, url)
            .json(&json!({ "userKey": user_key, "artworkId": id.as_str() }));
        self.execute_unit(req).await
    }

    async fn remove_favorite(&self, user_key: &str, id: &ArtworkId) -> Result<()> {
        let url = self.endpoint(&["favorites"]);
        let req = self
            .request(Method::DELETE, url)
            .json(&json!({ "userKey": user_key, "artworkId": id.as_str() }));
        self.execute_unit(req).await
    }

    async fn clear_favorites(&self, user_key: &str) -> Result<()> {
        let url = self.endpoint(&["favorites", user_key, "clear"]);
        self.execute_unit(self.request(Method::DELETE, url)).await
    }
}

#[derive(Debug, Deserialize)]
struct ServerMessage {
    #[serde(default, alias = "error")]
    message: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
struct LikeStatus {
    #[serde(default, alias = "isLiked")]
    liked: bool,
}

/// The favorite check endpoint wraps its payload in `{ data: { ... } }` on
/// some deployments and returns it flat on others.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum FavoriteStatus {
    Wrapped { data: FavoriteFlag },
    Flat(FavoriteFlag),
}

impl FavoriteStatus {
    fn favorited(&self) -> bool {
        match self {
            FavoriteStatus::Wrapped { data } => data.favorited,
            FavoriteStatus::Flat(flag) => flag.favorited,
        }
    }
}

#[derive(Debug, Default, Deserialize)]
struct FavoriteFlag {
    #[serde(default, alias = "isFavorited")]
    favorited: bool,
}

/// List responses arrive either bare or wrapped in `{ data: [...] }`.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum ListEnvelope<T> {
    Wrapped { data: Vec<T> },
    Bare(Vec<T>),
}

impl<T> ListEnvelope<T> {
    fn into_inner(self) -> Vec<T> {
        match self {
            ListEnvelope::Wrapped { data } => data,
            ListEnvelope::Bare(items) => items,
        }
    }
}

/// Single-object responses arrive as `{ artwork }`, `{ data }`, or bare.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum ObjectEnvelope<T> {
    Artwork { artwork: T },
    Data { data: T },
    Bare(T),
}

impl<T> ObjectEnvelope<T> {
    fn into_inner(self) -> T {
        match self {
            ObjectEnvelope::Artwork { artwork } => artwork,
            ObjectEnvelope::Data { data } => data,
            ObjectEnvelope::Bare(inner) => inner,
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum CountEnvelope {
    Wrapped {
        count: u64,
    },
    Data {
        data: u64,
    },
    Bare(u64),
}

impl CountEnvelope {
    fn into_inner(self) -> u64 {
        match self {
            CountEnvelope::Wrapped { count } => count,
            CountEnvelope::Data { data } => data,
            CountEnvelope::Bare(count) => count,
        }
    }
}
