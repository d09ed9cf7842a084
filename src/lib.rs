//! # Artify
//!
//! A terminal-first client for the ARTIFY gallery: browse artworks, then
//! like and favorite them with optimistic local updates reconciled against
//! the backend.
//!
//! ## Architecture
//!
//! ```text
//! View (CLI/TUI) → Synchronizer → ArtworkApi → backend
//!                       ↓
//!               InteractionStore → re-render
//! ```
//!
//! - [`api`]: the REST boundary — an async trait plus its reqwest client
//! - [`sync`]: the optimistic interaction synchronizer (toggle protocol)
//! - [`store`]: per-process interaction state cache with liveness-guarded
//!   writes
//! - [`tui`]: ratatui gallery browser
//!
//! ## Quick Start
//!
//! ```bash
//! # Store a session
//! artify login --user ada@example.com --token <bearer-token>
//!
//! # Browse
//! artify explore --category "Oil"
//!
//! # Toggle a like
//! artify like 65f1c2d3e4a5b6c7d8e9f0a1
//!
//! # Launch the TUI
//! artify tui
//! ```

/// Application context and error handling.
///
/// [`AppContext`](app::AppContext) wires together the API client, session,
/// interaction store, and synchronizer.
pub mod app;

/// The REST API boundary.
///
/// - [`ArtworkApi`](api::ArtworkApi): async trait the rest of the crate
///   depends on
/// - [`HttpApi`](api::http::HttpApi): reqwest-based implementation with
///   bearer attachment and envelope-tolerant decoding
pub mod api;

/// Session storage: user key + bearer token, written by `artify login`.
pub mod auth;

/// Command-line interface using clap.
pub mod cli;

/// Configuration management.
///
/// Loads from `~/.config/artify/config.toml`: API base URL and timeout.
pub mod config;

/// Core domain models.
///
/// - [`Artwork`](domain::Artwork): cached backend projection
/// - [`ArtworkId`](domain::ArtworkId): validated 24-hex identifier
/// - [`InteractionState`](domain::InteractionState) and the pure
///   optimistic/reconcile transition functions
pub mod domain;

/// Transient user notifications (the toast equivalent).
pub mod notify;

/// Interaction state cache keyed by artwork.
pub mod store;

/// The optimistic interaction synchronizer.
///
/// [`Synchronizer`](sync::Synchronizer) applies like toggles locally before
/// the network round trip, reconciles with the server's authoritative
/// values, and rolls back on failure. Duplicate in-flight toggles for the
/// same (artwork, kind) pair are dropped, never queued.
pub mod sync;

/// Terminal user interface.
///
/// Gallery and detail panes plus a status bar. Keybindings: j/k navigate,
/// Tab cycles panes, l toggles like, f toggles favorite, o opens the image,
/// R refreshes, q quits.
pub mod tui;
