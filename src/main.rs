use std::sync::Arc;

use clap::Parser;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use artify::app::AppContext;
use artify::cli::{commands, Cli, Commands};
use artify::domain::{ArtworkFilter, InteractionKind};
use artify::notify::{ChannelNotifier, LogNotifier};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(fmt::layer())
        .with(EnvFilter::from_default_env())
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Login { user, token } => {
            commands::login(&user, &token)?;
        }
        Commands::Logout => {
            commands::logout()?;
        }
        Commands::Featured => {
            let ctx = AppContext::new(Arc::new(LogNotifier))?;
            commands::featured(&ctx).await?;
        }
        Commands::Explore {
            category,
            search,
            artist,
        } => {
            let ctx = AppContext::new(Arc::new(LogNotifier))?;
            let filter = ArtworkFilter {
                category,
                search,
                artist,
            };
            commands::explore(&ctx, &filter).await?;
        }
        Commands::Mine => {
            let ctx = AppContext::new(Arc::new(LogNotifier))?;
            commands::mine(&ctx).await?;
        }
        Commands::Show { id } => {
            let ctx = AppContext::new(Arc::new(LogNotifier))?;
            commands::show(&ctx, &id).await?;
        }
        Commands::Like { id } => {
            let ctx = AppContext::new(Arc::new(LogNotifier))?;
            commands::toggle(&ctx, &id, InteractionKind::Like).await?;
        }
        Commands::Favorite { id } => {
            let ctx = AppContext::new(Arc::new(LogNotifier))?;
            commands::toggle(&ctx, &id, InteractionKind::Favorite).await?;
        }
        Commands::Favorites {
            ids,
            count,
            add,
            remove,
            clear,
        } => {
            let ctx = AppContext::new(Arc::new(LogNotifier))?;
            let args = commands::FavoritesArgs {
                ids,
                count,
                add,
                remove,
                clear,
            };
            commands::favorites(&ctx, args).await?;
        }
        Commands::Categories => {
            let ctx = AppContext::new(Arc::new(LogNotifier))?;
            commands::categories(&ctx).await?;
        }
        Commands::Tui => {
            let (notifier, notices) = ChannelNotifier::new();
            let ctx = AppContext::new(Arc::new(notifier))?;
            artify::tui::run(Arc::new(ctx), notices).await?;
        }
    }

    Ok(())
}
