pub mod artwork;
pub mod interaction;

pub use artwork::{Artwork, ArtworkFilter, ArtworkId};
pub use interaction::{
    apply_optimistic, reconcile, InteractionKind, InteractionState, ServerToggle,
};
