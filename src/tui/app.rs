use std::collections::{HashMap, HashSet};

use crate::domain::{Artwork, ArtworkId, InteractionState};
use crate::store::InteractionStore;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActivePane {
    Gallery,
    Detail,
}

impl ActivePane {
    pub fn next(self) -> Self {
        match self {
            ActivePane::Gallery => ActivePane::Detail,
            ActivePane::Detail => ActivePane::Gallery,
        }
    }

    pub fn prev(self) -> Self {
        self.next()
    }
}

pub struct TuiApp {
    pub active_pane: ActivePane,
    pub artworks: Vec<Artwork>,
    pub states: HashMap<ArtworkId, InteractionState>,
    pub seeded: HashSet<ArtworkId>,
    pub index: usize,
    pub detail_scroll: u16,
    pub should_quit: bool,
    pub status_message: Option<String>,
    pub is_refreshing: bool,
    pub signed_in: bool,
}

impl TuiApp {
    pub fn new(signed_in: bool) -> Self {
        Self {
            active_pane: ActivePane::Gallery,
            artworks: Vec::new(),
            states: HashMap::new(),
            seeded: HashSet::new(),
            index: 0,
            detail_scroll: 0,
            should_quit: false,
            status_message: None,
            is_refreshing: false,
            signed_in,
        }
    }

    pub fn selected_artwork(&self) -> Option<&Artwork> {
        self.artworks.get(self.index)
    }

    pub fn state_for(&self, artwork: &Artwork) -> InteractionState {
        artwork
            .interactive_id()
            .and_then(|id| self.states.get(&id).cloned())
            .unwrap_or(InteractionState {
                liked: false,
                likes_count: artwork.likes_count,
                favorited: false,
            })
    }

    /// Copy the store's view of every listed artwork into the render state.
    pub fn refresh_states(&mut self, store: &InteractionStore) {
        for artwork in &self.artworks {
            if let Some(id) = artwork.interactive_id() {
                if let Some(state) = store.get(&id) {
                    self.states.insert(id, state);
                }
            }
        }
    }

    pub fn move_up(&mut self) {
        match self.active_pane {
            ActivePane::Gallery => {
                if self.index > 0 {
                    self.index -= 1;
                    self.detail_scroll = 0;
                }
            }
            ActivePane::Detail => {
                self.detail_scroll = self.detail_scroll.saturating_sub(1);
            }
        }
    }

    pub fn move_down(&mut self) {
        match self.active_pane {
            ActivePane::Gallery => {
                if !self.artworks.is_empty() && self.index < self.artworks.len() - 1 {
                    self.index += 1;
                    self.detail_scroll = 0;
                }
            }
            ActivePane::Detail => {
                self.detail_scroll = self.detail_scroll.saturating_add(1);
            }
        }
    }

    pub fn set_status(&mut self, message: String) {
        self.status_message = Some(message);
    }
}
