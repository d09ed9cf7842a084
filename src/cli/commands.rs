use crate::app::{AppContext, ArtifyError, Result};
use crate::auth::Session;
use crate::domain::{Artwork, ArtworkFilter, ArtworkId, InteractionKind};
use crate::sync::ToggleOutcome;

pub fn login(user: &str, token: &str) -> Result<()> {
    let session = Session {
        user_key: user.to_string(),
        token: token.to_string(),
    };
    session.save()?;
    println!("Signed in as {}", user);
    Ok(())
}

pub fn logout() -> Result<()> {
    Session::clear()?;
    println!("Signed out");
    Ok(())
}

pub async fn featured(ctx: &AppContext) -> Result<()> {
    let artworks = ctx.api.featured().await?;
    print_artworks(&artworks);
    Ok(())
}

pub async fn explore(ctx: &AppContext, filter: &ArtworkFilter) -> Result<()> {
    let artworks = ctx.api.public(filter).await?;
    print_artworks(&artworks);
    Ok(())
}

pub async fn mine(ctx: &AppContext) -> Result<()> {
    let Some(user_key) = ctx.user_key() else {
        println!("Not signed in. Run `artify login` first.");
        return Ok(());
    };

    let artworks = ctx.api.by_user(user_key).await?;
    if artworks.is_empty() {
        println!("You have not uploaded any artworks yet");
        return Ok(());
    }
    print_artworks(&artworks);
    Ok(())
}

pub async fn show(ctx: &AppContext, raw_id: &str) -> Result<()> {
    let id = ArtworkId::parse(raw_id)?;
    let artwork = ctx.api.artwork(&id).await?;
    ctx.store.prime(&artwork);

    println!("{}", artwork.title);
    println!("  By {}", artwork.display_artist());
    if let Some(category) = &artwork.category {
        println!("  Category: {}", category);
    }
    if let Some(medium) = &artwork.medium {
        println!("  Medium: {}", medium);
    }
    if let Some(dimensions) = &artwork.dimensions {
        println!("  Size: {}", dimensions);
    }
    if let Some(price) = artwork.price {
        println!("  Price: ${}", price);
    }
    if let Some(description) = &artwork.description {
        println!("\n{}\n", description);
    }
    if let Some(created_at) = artwork.created_at {
        println!("  Posted on {}", created_at.format("%Y-%m-%d"));
    }

    if ctx.sync.is_authenticated() {
        let state = ctx.sync.seed(&id).await?;
        let liked = if state.liked { "liked" } else { "not liked" };
        let favorited = if state.favorited {
            "favorited"
        } else {
            "not favorited"
        };
        println!(
            "  {} likes ({} by you, {})",
            state.likes_count, liked, favorited
        );
    } else {
        println!("  {} likes", artwork.likes_count);
    }

    Ok(())
}

pub async fn toggle(ctx: &AppContext, raw_id: &str, kind: InteractionKind) -> Result<()> {
    let id = ArtworkId::parse(raw_id)?;

    // Seed first so the toggle starts from the server's view of our state,
    // not from an empty cache.
    if ctx.sync.is_authenticated() {
        let artwork = ctx.api.artwork(&id).await?;
        ctx.store.prime(&artwork);
        ctx.sync.seed(&id).await?;
    }

    match ctx.sync.toggle(&id, kind).await {
        Ok(ToggleOutcome::Applied(state)) => {
            match kind {
                InteractionKind::Like => {
                    let verb = if state.liked { "Liked" } else { "Unliked" };
                    println!("{} ({} likes)", verb, state.likes_count);
                }
                InteractionKind::Favorite => {
                    if state.favorited {
                        println!("Added to favorites");
                    } else {
                        println!("Removed from favorites");
                    }
                }
            }
            Ok(())
        }
        Ok(ToggleOutcome::Dropped) => Ok(()),
        Err(ArtifyError::Unauthenticated) => {
            println!("Not signed in. Run `artify login` first.");
            Ok(())
        }
        Err(e) => Err(e),
    }
}

pub struct FavoritesArgs {
    pub ids: bool,
    pub count: bool,
    pub add: Option<String>,
    pub remove: Option<String>,
    pub clear: bool,
}

pub async fn favorites(ctx: &AppContext, args: FavoritesArgs) -> Result<()> {
    let Some(user_key) = ctx.user_key() else {
        println!("Not signed in. Run `artify login` first.");
        return Ok(());
    };
    let FavoritesArgs {
        ids,
        count,
        add,
        remove,
        clear,
    } = args;

    if let Some(raw_id) = add {
        let id = ArtworkId::parse(&raw_id)?;
        ctx.api.add_favorite(user_key, &id).await?;
        println!("Added {} to favorites", id);
        return Ok(());
    }

    if let Some(raw_id) = remove {
        let id = ArtworkId::parse(&raw_id)?;
        ctx.api.remove_favorite(user_key, &id).await?;
        println!("Removed {} from favorites", id);
        return Ok(());
    }

    if clear {
        ctx.api.clear_favorites(user_key).await?;
        println!("Cleared all favorites");
        return Ok(());
    }

    if count {
        let total = ctx.api.favorites_count(user_key).await?;
        println!("{}", total);
        return Ok(());
    }

    if ids {
        for id in ctx.api.favorite_ids(user_key).await? {
            println!("{}", id);
        }
        return Ok(());
    }

    let artworks = ctx.api.favorites(user_key).await?;
    if artworks.is_empty() {
        println!("No favorites yet");
        return Ok(());
    }
    print_artworks(&artworks);
    Ok(())
}

pub async fn categories(ctx: &AppContext) -> Result<()> {
    let categories = ctx.api.categories().await?;
    if categories.is_empty() {
        println!("No categories");
        return Ok(());
    }
    for category in categories {
        println!("{}", category);
    }
    Ok(())
}

fn print_artworks(artworks: &[Artwork]) {
    if artworks.is_empty() {
        println!("No artworks");
        return;
    }

    for artwork in artworks {
        let category = artwork.category.as_deref().unwrap_or("-");
        println!(
            "{}  {} by {} [{}] ({} likes)",
            artwork.id,
            artwork.title,
            artwork.display_artist(),
            category,
            artwork.likes_count
        );
    }
}
