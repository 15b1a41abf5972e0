//! TUI rendering logic for the browser.

use std::time::Instant;

use movieo_api::tmdb::{MediaItem, MediaKind};
use movieo_feed::{DetailView, FeedView, FetchState};
use ratatui::Frame;
use ratatui::layout::{Constraint, Direction, Layout, Margin, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Clear, List, ListItem, Paragraph, Row, Table, Tabs, Wrap};

use super::state::{BrowserState, DetailPane, InputMode, ResultList, Tab};

/// Titles listed per home page rail.
const RAIL_LENGTH: usize = 10;

/// Cast members shown in the detail overlay.
const DETAIL_CAST: usize = 5;

/// Draws the browser UI. Returns the number of visible list rows.
#[allow(clippy::indexing_slicing)]
pub fn draw(frame: &mut Frame, state: &mut BrowserState) -> u16 {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // tabs
            Constraint::Min(5),    // main content
            Constraint::Length(3), // footer
        ])
        .split(frame.area());

    draw_tabs(frame, chunks[0], state);

    let list_rows = match state.tab {
        Tab::Home => {
            draw_home(frame, chunks[1], state);
            0
        }
        Tab::Explore | Tab::Search => draw_list_tab(frame, chunks[1], state),
    };

    if let Some(detail) = &state.detail {
        draw_detail(frame, chunks[1], detail, &state.image_base);
    }

    draw_footer(frame, chunks[2], state);

    list_rows
}

/// Draws the tab bar.
fn draw_tabs(frame: &mut Frame, area: Rect, state: &BrowserState) {
    let tabs = Tabs::new(Tab::ALL.map(Tab::title))
        .select(state.tab.index())
        .block(Block::default().borders(Borders::ALL).title(" movieo "))
        .highlight_style(
            Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
        );
    frame.render_widget(tabs, area);
}

/// Year and rating of an item, e.g. `2022  ★ 7.7`.
fn subtitle(item: &MediaItem) -> String {
    format!(
        "{}  ★ {:.1}",
        item.year().unwrap_or("----"),
        item.vote_average
    )
}

/// Draws the trending banner and the chart rails.
#[allow(clippy::indexing_slicing)]
fn draw_home(frame: &mut Frame, area: Rect, state: &BrowserState) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(9), Constraint::Min(3)])
        .split(area);

    draw_banner(frame, chunks[0], state);

    let rail_areas = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Ratio(1, 4); 4])
        .split(chunks[1]);

    let Some(home) = &state.rails else {
        let loading = Paragraph::new("Loading…").block(Block::default().borders(Borders::ALL));
        frame.render_widget(loading, chunks[1]);
        return;
    };

    for (rail, rail_area) in home.rails().iter().zip(rail_areas.iter()) {
        let block = Block::default()
            .borders(Borders::ALL)
            .title(format!(" {} ", rail.heading()));
        if let Some(err) = &rail.error {
            let message = Paragraph::new(err.user_message())
                .style(Style::default().fg(Color::Red))
                .wrap(Wrap { trim: true })
                .block(block);
            frame.render_widget(message, *rail_area);
            continue;
        }
        let items: Vec<ListItem> = rail
            .items
            .iter()
            .take(RAIL_LENGTH)
            .map(|item| ListItem::new(item.display_title().to_owned()))
            .collect();
        frame.render_widget(List::new(items).block(block), *rail_area);
    }
}

/// Draws the current banner slide.
fn draw_banner(frame: &mut Frame, area: Rect, state: &BrowserState) {
    let carousel = state.banner.carousel();
    let playback = if state.banner.is_paused() {
        String::from("paused")
    } else {
        state
            .banner
            .remaining(Instant::now())
            .map_or_else(String::new, |left| format!("next in {}s", left.as_secs()))
    };
    let title = format!(
        " Trending {}/{}  {playback} ",
        carousel.index().saturating_add(1).min(carousel.len()),
        carousel.len()
    );
    let block = Block::default()
        .borders(Borders::ALL)
        .title(title)
        .border_style(Style::default().fg(Color::Cyan));

    let Some(item) = state.banner.current() else {
        let message = state
            .home_error
            .clone()
            .unwrap_or_else(|| String::from("No trending titles"));
        let paragraph = Paragraph::new(message)
            .style(Style::default().fg(Color::Red))
            .wrap(Wrap { trim: true })
            .block(block);
        frame.render_widget(paragraph, area);
        return;
    };

    let mut lines = vec![
        Line::from(Span::styled(
            item.display_title().to_owned(),
            Style::default().add_modifier(Modifier::BOLD),
        )),
        Line::from(subtitle(item)),
        Line::from(item.overview.clone().unwrap_or_default()),
    ];
    if let Some(path) = &item.backdrop_path {
        lines.push(Line::from(Span::styled(
            format!("{}{path}", state.image_base),
            Style::default().fg(Color::DarkGray),
        )));
    }
    let paragraph = Paragraph::new(lines)
        .wrap(Wrap { trim: true })
        .block(block);
    frame.render_widget(paragraph, area);
}

/// Draws the explore or search tab. Returns the number of visible rows.
#[allow(clippy::indexing_slicing)]
fn draw_list_tab(frame: &mut Frame, area: Rect, state: &mut BrowserState) -> u16 {
    if state.tab == Tab::Explore {
        let title = match state.explore_kind {
            MediaKind::Tv => " Explore: TV Shows ",
            MediaKind::Movie | MediaKind::Person => " Explore: Movies ",
        };
        return draw_result_list(frame, area, &mut state.explore, title);
    }

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(3), Constraint::Min(5)])
        .split(area);

    let input_style = if state.input_mode == InputMode::Search {
        Style::default().fg(Color::Yellow)
    } else {
        Style::default()
    };
    let input_title = if state.is_search_pending() {
        " Search: / (typing…) "
    } else {
        " Search: / "
    };
    let input = Paragraph::new(state.query.clone())
        .style(input_style)
        .block(Block::default().borders(Borders::ALL).title(input_title));
    frame.render_widget(input, chunks[0]);

    draw_result_list(frame, chunks[1], &mut state.search, " Results ")
}

/// Status line under a result table.
fn list_status(list: &ResultList) -> Option<Line<'static>> {
    let controller = &list.controller;
    match controller.state() {
        FetchState::Idle => None,
        FetchState::Loading => Some(Line::from(Span::styled(
            "Loading…",
            Style::default().fg(Color::Yellow),
        ))),
        FetchState::Errored => {
            let message = controller.error_message().unwrap_or_default();
            let hint = if controller.error().is_some_and(|e| e.is_retryable()) {
                "  (r: retry)"
            } else {
                ""
            };
            Some(Line::from(Span::styled(
                format!("{message}{hint}"),
                Style::default().fg(Color::Red),
            )))
        }
        FetchState::Loaded if controller.is_empty_result() => Some(Line::from("No results found")),
        FetchState::Loaded if !controller.has_more() => Some(Line::from(Span::styled(
            "End of results",
            Style::default().fg(Color::DarkGray),
        ))),
        FetchState::Loaded => None,
    }
}

/// Draws a result table with its status line. Returns the number of
/// visible rows.
#[allow(clippy::indexing_slicing)]
fn draw_result_list(frame: &mut Frame, area: Rect, list: &mut ResultList, title: &str) -> u16 {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(4), Constraint::Length(1)])
        .split(area);

    let header = Row::new(vec!["Title", "Kind", "Year", "Rating"])
        .style(
            Style::default()
                .fg(Color::Yellow)
                .add_modifier(Modifier::BOLD),
        )
        .bottom_margin(1);

    let rows: Vec<Row> = list
        .controller
        .items()
        .iter()
        .map(|item| {
            Row::new(vec![
                item.display_title().to_owned(),
                item.media_type
                    .map_or_else(|| String::from("--"), |kind| kind.to_string()),
                item.year().unwrap_or("--").to_owned(),
                format!("{:.1}", item.vote_average),
            ])
        })
        .collect();

    let widths = [
        Constraint::Min(20),
        Constraint::Length(7),
        Constraint::Length(6),
        Constraint::Length(7),
    ];

    let page_info = list.controller.total_pages().map_or_else(String::new, |total| {
        format!("page {}/{total} ", list.controller.page())
    });

    let table = Table::new(rows, widths)
        .header(header)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(title.to_owned())
                .title_bottom(page_info),
        )
        .row_highlight_style(
            Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
        );

    frame.render_stateful_widget(table, chunks[0], &mut list.table_state);

    if let Some(status) = list_status(list) {
        frame.render_widget(Paragraph::new(status), chunks[1]);
    }

    // borders (2) + header with margin (2)
    chunks[0].height.saturating_sub(4)
}

/// Detail overlay lines for a loaded view.
fn detail_lines(view: &DetailView, image_base: &str) -> Vec<Line<'static>> {
    let details = view.details();
    let label = Style::default().fg(Color::Yellow);
    let field = |name: &'static str, value: String| {
        Line::from(vec![Span::styled(format!("{name:<10}"), label), Span::raw(value)])
    };

    let mut lines = vec![Line::from(Span::styled(
        view.title().to_owned(),
        Style::default().add_modifier(Modifier::BOLD),
    ))];
    if let Some(tagline) = details.tagline.as_deref().filter(|t| !t.is_empty()) {
        lines.push(Line::from(Span::styled(
            format!("\"{tagline}\""),
            Style::default().add_modifier(Modifier::ITALIC),
        )));
    }
    lines.push(Line::from(""));
    lines.push(field("Released", view.release_date()));
    if let Some((hours, minutes)) = view.runtime() {
        lines.push(field("Runtime", format!("{hours}h {minutes}m")));
    }
    let genres: Vec<&str> = details.genres.iter().map(|g| g.name.as_str()).collect();
    lines.push(field("Genres", genres.join(", ")));
    lines.push(field(
        "Rating",
        format!("★ {:.1} ({} votes)", details.vote_average, details.vote_count),
    ));
    lines.push(field("Director", view.director()));
    lines.push(field("Writers", view.writers()));
    let cast: Vec<String> = view
        .top_cast(DETAIL_CAST)
        .iter()
        .map(|member| match member.character.as_deref() {
            Some(character) if !character.is_empty() => format!("{} ({character})", member.name),
            _ => member.name.clone(),
        })
        .collect();
    lines.push(field("Cast", cast.join(", ")));
    lines.push(field(
        "Trailer",
        view.trailer_url().unwrap_or_else(|| String::from("-")),
    ));
    if let Some(path) = &details.poster_path {
        lines.push(field("Poster", format!("{image_base}{path}")));
    }
    lines.push(Line::from(""));
    lines.push(Line::from(details.overview.clone().unwrap_or_default()));

    for (heading, items) in [
        ("Similar", view.similar()),
        ("Recommended", view.recommendations()),
    ] {
        if items.is_empty() {
            continue;
        }
        let titles: Vec<&str> = items
            .iter()
            .take(RAIL_LENGTH)
            .map(MediaItem::display_title)
            .collect();
        lines.push(Line::from(""));
        lines.push(field(heading, titles.join(", ")));
    }
    lines
}

/// Draws the detail overlay on top of `area`.
fn draw_detail(frame: &mut Frame, area: Rect, detail: &DetailPane, image_base: &str) {
    let overlay = area.inner(Margin {
        horizontal: area.width / 10,
        vertical: area.height / 10,
    });

    let (title, lines) = match detail {
        DetailPane::Loading(media) => (
            format!(" {} ", media.path()),
            vec![Line::from("Loading…")],
        ),
        DetailPane::Ready(view) => (
            format!(" {} ", view.media().path()),
            detail_lines(view, image_base),
        ),
        DetailPane::Failed { media, message } => (
            format!(" {} ", media.path()),
            vec![Line::from(Span::styled(
                format!("{message}  (r: retry)"),
                Style::default().fg(Color::Red),
            ))],
        ),
    };

    let paragraph = Paragraph::new(lines).wrap(Wrap { trim: false }).block(
        Block::default()
            .borders(Borders::ALL)
            .title(title)
            .border_style(Style::default().fg(Color::Cyan)),
    );
    frame.render_widget(Clear, overlay);
    frame.render_widget(paragraph, overlay);
}

/// Draws the footer with key help and the status message.
fn draw_footer(frame: &mut Frame, area: Rect, state: &BrowserState) {
    let help = match (state.input_mode, state.tab) {
        (InputMode::Search, _) => "Type to search  Enter: search now  Esc: done",
        _ if state.detail.is_some() => "o: trailer  r: retry  Esc: close  q: quit",
        (InputMode::Normal, Tab::Home) => {
            "←/→: slide  Space: pause  Enter: details  Tab: next tab  q: quit"
        }
        (InputMode::Normal, Tab::Explore) => {
            "↑/↓: move  m: movies/tv  Enter: details  r: retry  Tab: next tab  q: quit"
        }
        (InputMode::Normal, Tab::Search) => {
            "/: edit query  ↑/↓: move  Enter: details  r: retry  Tab: next tab  q: quit"
        }
    };

    let mut spans = vec![Span::raw(help)];
    if let Some(status) = &state.status {
        spans.push(Span::raw("  "));
        spans.push(Span::styled(
            status.clone(),
            Style::default().fg(Color::Yellow),
        ));
    }

    let footer = Paragraph::new(Line::from(spans)).block(Block::default().borders(Borders::ALL));
    frame.render_widget(footer, area);
}
