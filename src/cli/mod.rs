pub mod commands;

use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(name = "artify")]
#[command(about = "A terminal client for the ARTIFY gallery", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Store a session (user key + bearer token) for authenticated commands
    Login {
        /// User key (email) the backend identifies you by
        #[arg(short, long)]
        user: String,

        /// Bearer token obtained from the identity provider
        #[arg(short, long)]
        token: String,
    },
    /// Remove the stored session
    Logout,
    /// Show the featured artworks
    Featured,
    /// Browse public artworks
    Explore {
        /// Filter by category
        #[arg(long)]
        category: Option<String>,

        /// Full-text search over title/description
        #[arg(long)]
        search: Option<String>,

        /// Filter by artist (user key)
        #[arg(long)]
        artist: Option<String>,
    },
    /// Show your own uploaded artworks
    Mine,
    /// Show one artwork, including your like/favorite status
    Show {
        /// Artwork identifier (24 hex characters)
        id: String,
    },
    /// Toggle your like on an artwork
    Like {
        /// Artwork identifier (24 hex characters)
        id: String,
    },
    /// Toggle an artwork in your favorites
    Favorite {
        /// Artwork identifier (24 hex characters)
        id: String,
    },
    /// List or manage your favorited artworks
    Favorites {
        /// Print identifiers only
        #[arg(long)]
        ids: bool,

        /// Print the count only
        #[arg(long)]
        count: bool,

        /// Add an artwork to your favorites
        #[arg(long, value_name = "ID")]
        add: Option<String>,

        /// Remove an artwork from your favorites
        #[arg(long, value_name = "ID")]
        remove: Option<String>,

        /// Remove all favorites
        #[arg(long)]
        clear: bool,
    },
    /// List the known artwork categories
    Categories,
    /// Launch the TUI gallery browser
    Tui,
}
