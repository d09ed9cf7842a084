pub mod app;
pub mod event;
pub mod layout;

use std::io::{self, Stdout};
use std::sync::Arc;
use std::time::Duration;

use crossterm::{
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};
use tokio::sync::mpsc;

use crate::app::{AppContext, Result};
use crate::domain::{ArtworkFilter, InteractionKind};
use crate::notify::Notice;

use self::app::TuiApp;
use self::event::{Action, AppEvent, EventHandler};

type Tui = Terminal<CrosstermBackend<Stdout>>;

pub async fn run(ctx: Arc<AppContext>, notices: mpsc::UnboundedReceiver<Notice>) -> Result<()> {
    let mut terminal = setup_terminal()?;
    let result = run_app(&mut terminal, ctx, notices).await;
    restore_terminal(&mut terminal)?;
    result
}

fn setup_terminal() -> Result<Tui> {
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let terminal = Terminal::new(backend)?;
    Ok(terminal)
}

fn restore_terminal(terminal: &mut Tui) -> Result<()> {
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;
    Ok(())
}

async fn run_app(
    terminal: &mut Tui,
    ctx: Arc<AppContext>,
    mut notices: mpsc::UnboundedReceiver<Notice>,
) -> Result<()> {
    let mut tui_app = TuiApp::new(ctx.sync.is_authenticated());
    let event_handler = EventHandler::new(Duration::from_millis(100));

    load_gallery(&mut tui_app, &ctx).await?;
    seed_selected(&mut tui_app, &ctx).await;

    loop {
        // Notices from the synchronizer become status-bar messages.
        while let Ok(notice) = notices.try_recv() {
            tui_app.set_status(notice.message);
        }

        // Toggles resolve in the background; every frame re-reads the store
        // so optimistic writes and reconciliations show up as they land.
        tui_app.refresh_states(&ctx.store);

        terminal.draw(|frame| layout::render(frame, &tui_app))?;

        match event_handler.next()? {
            AppEvent::Key(key) => {
                let action = Action::from(key);
                match action {
                    Action::Quit => {
                        tui_app.should_quit = true;
                    }
                    Action::MoveUp => {
                        tui_app.move_up();
                        seed_selected(&mut tui_app, &ctx).await;
                    }
                    Action::MoveDown => {
                        tui_app.move_down();
                        seed_selected(&mut tui_app, &ctx).await;
                    }
                    Action::NextPane => {
                        tui_app.active_pane = tui_app.active_pane.next();
                    }
                    Action::PrevPane => {
                        tui_app.active_pane = tui_app.active_pane.prev();
                    }
                    Action::ToggleLike => {
                        toggle_selected(&mut tui_app, &ctx, InteractionKind::Like);
                    }
                    Action::ToggleFavorite => {
                        toggle_selected(&mut tui_app, &ctx, InteractionKind::Favorite);
                    }
                    Action::OpenImage => {
                        if let Some(artwork) = tui_app.selected_artwork() {
                            if let Some(image_url) = artwork.image_url.clone() {
                                if let Err(e) = open::that(&image_url) {
                                    tui_app.set_status(format!("Failed to open browser: {}", e));
                                }
                            }
                        }
                    }
                    Action::Refresh => {
                        tui_app.is_refreshing = true;
                        terminal.draw(|frame| layout::render(frame, &tui_app))?;

                        load_gallery(&mut tui_app, &ctx).await?;
                        tui_app.seeded.clear();
                        seed_selected(&mut tui_app, &ctx).await;

                        tui_app.is_refreshing = false;
                        tui_app.set_status(format!("Loaded {} artworks", tui_app.artworks.len()));
                    }
                    Action::None => {}
                }
            }
            AppEvent::Tick => {}
        }

        if tui_app.should_quit {
            break;
        }
    }

    Ok(())
}

async fn load_gallery(tui_app: &mut TuiApp, ctx: &AppContext) -> Result<()> {
    let mut artworks = ctx.api.public(&ArtworkFilter::default()).await?;
    if artworks.is_empty() {
        artworks = ctx.api.featured().await?;
    }

    for artwork in &artworks {
        ctx.store.prime(artwork);
    }

    tui_app.artworks = artworks;
    if tui_app.index >= tui_app.artworks.len() && !tui_app.artworks.is_empty() {
        tui_app.index = tui_app.artworks.len() - 1;
    }
    tui_app.refresh_states(&ctx.store);
    Ok(())
}

/// Seed the like/favorite status of the selected artwork once per artwork,
/// when a signed-in user first lands on it. A failed seed is not marked
/// done, so landing on the artwork again retries it.
async fn seed_selected(tui_app: &mut TuiApp, ctx: &AppContext) {
    if !ctx.sync.is_authenticated() {
        return;
    }
    let Some(id) = tui_app.selected_artwork().and_then(|a| a.interactive_id()) else {
        return;
    };
    if tui_app.seeded.contains(&id) {
        return;
    }

    match ctx.sync.seed(&id).await {
        Ok(_) => {
            tui_app.seeded.insert(id);
        }
        Err(e) => {
            tui_app.set_status(format!("Could not load interaction status: {}", e));
        }
    }
}

/// Start a toggle for the selected artwork without blocking the event loop.
/// The optimistic write is picked up on the next frame; the outcome arrives
/// as a notice, and failures roll back inside the synchronizer.
fn toggle_selected(tui_app: &mut TuiApp, ctx: &Arc<AppContext>, kind: InteractionKind) {
    if !ctx.sync.is_authenticated() {
        tui_app.set_status("Run `artify login` to like/favorite artworks".to_string());
        return;
    }
    let Some(artwork) = tui_app.selected_artwork() else {
        return;
    };
    let Some(id) = artwork.interactive_id() else {
        tui_app.set_status("Interactions unavailable for this artwork".to_string());
        return;
    };

    let ctx = ctx.clone();
    tokio::spawn(async move {
        let _ = ctx.sync.toggle(&id, kind).await;
    });
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::Ordering;

    use super::*;
    use crate::api::testing::{Gate, StubApi};
    use crate::auth::Session;
    use crate::domain::Artwork;
    use crate::notify::testing::RecordingNotifier;
    use crate::notify::{ChannelNotifier, Notifier, NoticeLevel};

    const ID: &str = "65f1c2d3e4a5b6c7d8e9f0a1";

    fn sample_artwork() -> Artwork {
        serde_json::from_str(&format!(
            r#"{{"_id": "{ID}", "title": "Sunrise", "likesCount": 5}}"#
        ))
        .unwrap()
    }

    fn context(api: Arc<StubApi>, notifier: Arc<dyn Notifier>) -> Arc<AppContext> {
        let session = Session {
            user_key: "ada@example.com".into(),
            token: "token-1".into(),
        };
        Arc::new(AppContext::from_parts(api, Some(session), notifier))
    }

    fn gallery(ctx: &AppContext) -> TuiApp {
        let artwork = sample_artwork();
        ctx.store.prime(&artwork);
        let mut tui_app = TuiApp::new(true);
        tui_app.artworks = vec![artwork];
        tui_app
    }

    #[tokio::test]
    async fn test_seed_runs_once_per_artwork() {
        let api = Arc::new(StubApi::default());
        let ctx = context(api.clone(), Arc::new(RecordingNotifier::default()));
        let mut tui_app = gallery(&ctx);

        seed_selected(&mut tui_app, &ctx).await;
        seed_selected(&mut tui_app, &ctx).await;

        // One like check and one favorite check, total.
        assert_eq!(api.calls().len(), 2);
    }

    #[tokio::test]
    async fn test_seed_retries_after_a_failure() {
        let api = Arc::new(StubApi::default());
        api.statuses_fail.store(true, Ordering::SeqCst);
        let ctx = context(api.clone(), Arc::new(RecordingNotifier::default()));
        let mut tui_app = gallery(&ctx);

        seed_selected(&mut tui_app, &ctx).await;
        assert!(tui_app.seeded.is_empty());
        assert!(tui_app.status_message.is_some());

        // Backend recovers; landing on the artwork again seeds it.
        api.statuses_fail.store(false, Ordering::SeqCst);
        seed_selected(&mut tui_app, &ctx).await;
        assert_eq!(tui_app.seeded.len(), 1);
    }

    #[tokio::test]
    async fn test_toggle_does_not_block_the_event_loop() {
        let gate = Gate::new();
        let mut api = StubApi::default();
        api.gate = Some(gate.clone());
        let api = Arc::new(api);
        let (notifier, mut notices) = ChannelNotifier::new();
        let ctx = context(api.clone(), Arc::new(notifier));
        let mut tui_app = gallery(&ctx);

        toggle_selected(&mut tui_app, &ctx, InteractionKind::Like);

        // The handler has returned with the request still open; the next
        // frame already renders the optimistic state.
        gate.entered.notified().await;
        tui_app.refresh_states(&ctx.store);
        let artwork = tui_app.artworks[0].clone();
        let state = tui_app.state_for(&artwork);
        assert!(state.liked);
        assert_eq!(state.likes_count, 6);

        gate.open();
        let notice = notices.recv().await.unwrap();
        assert_eq!(notice.level, NoticeLevel::Success);
        tui_app.refresh_states(&ctx.store);
        assert!(tui_app.state_for(&artwork).liked);
    }

    #[tokio::test]
    async fn test_toggle_while_signed_out_hints_at_login() {
        let api = Arc::new(StubApi::default());
        let ctx = Arc::new(AppContext::from_parts(
            api.clone(),
            None,
            Arc::new(RecordingNotifier::default()),
        ));
        let mut tui_app = gallery(&ctx);

        toggle_selected(&mut tui_app, &ctx, InteractionKind::Like);

        assert!(tui_app
            .status_message
            .as_deref()
            .unwrap()
            .contains("artify login"));
        assert!(api.calls().is_empty());
    }
}
