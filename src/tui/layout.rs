use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span, Text},
    widgets::{Block, Borders, List, ListItem, Paragraph, Wrap},
    Frame,
};

use crate::tui::app::{ActivePane, TuiApp};

pub fn render(frame: &mut Frame, app: &TuiApp) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage(45), // Gallery pane
            Constraint::Min(10),        // Detail pane
            Constraint::Length(1),      // Status bar
        ])
        .split(frame.area());

    render_gallery_pane(frame, app, chunks[0]);
    render_detail_pane(frame, app, chunks[1]);
    render_status_bar(frame, app, chunks[2]);
}

fn render_gallery_pane(frame: &mut Frame, app: &TuiApp, area: Rect) {
    let is_active = app.active_pane == ActivePane::Gallery;
    let border_style = if is_active {
        Style::default().fg(Color::Cyan)
    } else {
        Style::default().fg(Color::DarkGray)
    };

    let items: Vec<ListItem> = app
        .artworks
        .iter()
        .enumerate()
        .map(|(i, artwork)| {
            let state = app.state_for(artwork);
            let like_marker = if state.liked { "♥" } else { " " };
            let favorite_marker = if state.favorited { "★" } else { " " };

            let category = artwork.category.as_deref().unwrap_or("-");
            let content = format!(
                "{}{} {:>4}  {} by {} [{}]",
                like_marker,
                favorite_marker,
                state.likes_count,
                artwork.title,
                artwork.display_artist(),
                category
            );

            let style = if i == app.index && is_active {
                Style::default()
                    .bg(Color::Cyan)
                    .fg(Color::Black)
                    .add_modifier(Modifier::BOLD)
            } else if i == app.index {
                Style::default().bg(Color::DarkGray)
            } else {
                Style::default()
            };

            ListItem::new(content).style(style)
        })
        .collect();

    let title = format!(" Gallery ({}) ", app.artworks.len());
    let block = Block::default()
        .title(title)
        .borders(Borders::ALL)
        .border_style(border_style);

    let list = List::new(items).block(block);
    frame.render_widget(list, area);
}

fn render_detail_pane(frame: &mut Frame, app: &TuiApp, area: Rect) {
    let is_active = app.active_pane == ActivePane::Detail;
    let border_style = if is_active {
        Style::default().fg(Color::Cyan)
    } else {
        Style::default().fg(Color::DarkGray)
    };

    let (title, content) = if let Some(artwork) = app.selected_artwork() {
        let state = app.state_for(artwork);
        let mut lines = Vec::new();

        lines.push(Line::from(Span::styled(
            artwork.title.clone(),
            Style::default().add_modifier(Modifier::BOLD),
        )));
        lines.push(Line::from(""));

        lines.push(Line::from(Span::styled(
            format!("By: {}", artwork.display_artist()),
            Style::default().fg(Color::Yellow),
        )));
        if let Some(category) = &artwork.category {
            lines.push(Line::from(Span::styled(
                format!("Category: {}", category),
                Style::default().fg(Color::Yellow),
            )));
        }
        if let Some(medium) = &artwork.medium {
            lines.push(Line::from(format!("Medium: {}", medium)));
        }
        if let Some(dimensions) = &artwork.dimensions {
            lines.push(Line::from(format!("Size: {}", dimensions)));
        }
        if let Some(price) = artwork.price {
            lines.push(Line::from(format!("Price: ${}", price)));
        }
        if let Some(image_url) = &artwork.image_url {
            lines.push(Line::from(Span::styled(
                format!("Image: {}", image_url),
                Style::default().fg(Color::Blue),
            )));
        }

        lines.push(Line::from(""));
        let liked = if state.liked { "♥ liked" } else { "♡" };
        let favorited = if state.favorited { "★ favorited" } else { "☆" };
        lines.push(Line::from(Span::styled(
            format!("{} likes  {}  {}", state.likes_count, liked, favorited),
            Style::default().fg(Color::Red),
        )));

        if artwork.interactive_id().is_none() {
            lines.push(Line::from(Span::styled(
                "(interactions unavailable for this artwork)",
                Style::default().fg(Color::DarkGray),
            )));
        }

        if let Some(description) = &artwork.description {
            lines.push(Line::from(""));
            lines.push(Line::from("─".repeat(area.width.saturating_sub(2) as usize)));
            lines.push(Line::from(""));
            for line in description.lines() {
                lines.push(Line::from(line.to_string()));
            }
        }

        (format!(" {} ", artwork.title), Text::from(lines))
    } else {
        (" Detail ".to_string(), Text::from("No artwork selected"))
    };

    let block = Block::default()
        .title(title)
        .borders(Borders::ALL)
        .border_style(border_style);

    let paragraph = Paragraph::new(content)
        .block(block)
        .wrap(Wrap { trim: false })
        .scroll((app.detail_scroll, 0));

    frame.render_widget(paragraph, area);
}

fn render_status_bar(frame: &mut Frame, app: &TuiApp, area: Rect) {
    let status = if app.is_refreshing {
        "Refreshing gallery...".to_string()
    } else if let Some(ref msg) = app.status_message {
        msg.clone()
    } else if !app.signed_in {
        "Browsing as guest — run `artify login` to like/favorite  |  j/k:Navigate  o:Open  R:Refresh  q:Quit".to_string()
    } else {
        "j/k:Navigate  Tab:Pane  l:Like  f:Favorite  o:Open  R:Refresh  q:Quit".to_string()
    };

    let paragraph =
        Paragraph::new(status).style(Style::default().fg(Color::White).bg(Color::DarkGray));

    frame.render_widget(paragraph, area);
}
