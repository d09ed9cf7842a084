use serde::{Deserialize, Serialize};

/// The two boolean interactions a user can toggle on an artwork.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum InteractionKind {
    Like,
    Favorite,
}

impl std::fmt::Display for InteractionKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            InteractionKind::Like => f.write_str("like"),
            InteractionKind::Favorite => f.write_str("favorite"),
        }
    }
}

/// Cached interaction state for one artwork, as seen by the current user.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct InteractionState {
    pub liked: bool,
    pub likes_count: u64,
    pub favorited: bool,
}

/// The authoritative values a toggle endpoint reported back.
///
/// Fields the server omitted stay `None`; [`reconcile`] retains the
/// optimistic value for those instead of discarding it.
#[derive(Debug, Clone, Default)]
pub struct ServerToggle {
    pub liked: Option<bool>,
    pub likes_count: Option<u64>,
    pub favorited: Option<bool>,
}

/// Local state transition applied before the network round trip.
///
/// A like inverts `liked` and moves the visible counter by one. Favorites
/// have no visible counter, so toggling one applies no optimistic change;
/// the flip lands with the server response.
pub fn apply_optimistic(state: &InteractionState, kind: InteractionKind) -> InteractionState {
    match kind {
        InteractionKind::Like => {
            let likes_count = if state.liked {
                state.likes_count.saturating_sub(1)
            } else {
                state.likes_count + 1
            };
            InteractionState {
                liked: !state.liked,
                likes_count,
                favorited: state.favorited,
            }
        }
        InteractionKind::Favorite => state.clone(),
    }
}

/// Overwrite local state with what the server confirmed. Server values win;
/// omitted fields keep the current (optimistic) value.
pub fn reconcile(state: &InteractionState, server: &ServerToggle) -> InteractionState {
    InteractionState {
        liked: server.liked.unwrap_or(state.liked),
        likes_count: server.likes_count.unwrap_or(state.likes_count),
        favorited: server.favorited.unwrap_or(state.favorited),
    }
}
