//! Interactive catalog browser.
//!
//! Uses `ratatui` + `crossterm` for rendering. Network requests run as
//! spawned tasks and report back over a channel, so the UI never blocks
//! on the catalog API.

/// Browser state types.
pub mod state;
mod ui;

use std::io;
use std::sync::Arc;
use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use crossterm::event::{self, Event, KeyCode, KeyEventKind, KeyModifiers};
use crossterm::terminal::{
    EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode,
};
use movieo_api::tmdb::{
    CatalogClient, Feed, FetchError, FetchResult, LocalCatalogApi, MediaItem, MediaRef, Page,
};
use movieo_feed::{CatalogStore, DetailView, HomeRails, PageRequest};
use ratatui::Terminal;
use ratatui::backend::CrosstermBackend;
use tokio::sync::mpsc::{UnboundedReceiver, UnboundedSender, unbounded_channel};

use self::state::{BrowserState, Effect, InputMode, ListTarget, Tab};
use crate::config::BrowseConfig;

/// Pause between frames; spawned requests make progress meanwhile.
const FRAME_INTERVAL: Duration = Duration::from_millis(50);

/// Result of a spawned request.
enum Message {
    Page {
        target: ListTarget,
        request: PageRequest<Feed>,
        result: FetchResult<Page<MediaItem>>,
    },
    Rails(FetchResult<HomeRails>),
    Details(MediaRef, FetchResult<DetailView>),
}

/// Carries out [`Effect`]s.
///
/// Without a client every request fails at once with
/// [`FetchError::MissingCredential`].
struct Dispatcher {
    client: Option<Arc<CatalogClient>>,
    tx: UnboundedSender<Message>,
}

/// Hands a response to the event loop.
fn deliver(tx: &UnboundedSender<Message>, message: Message) {
    if tx.send(message).is_err() {
        tracing::debug!("browser closed, dropping response");
    }
}

impl Dispatcher {
    fn send(&self, message: Message) {
        deliver(&self.tx, message);
    }

    fn run(&self, effect: Effect) {
        match effect {
            Effect::FetchPage(target, request) => self.fetch_page(target, request),
            Effect::LoadDetails(media) => self.load_details(media),
            Effect::OpenUrl(url) => {
                if let Err(err) = open::that(&url) {
                    tracing::warn!(url, error = %err, "failed to open browser");
                }
            }
        }
    }

    fn run_all(&self, effects: impl IntoIterator<Item = Effect>) {
        for effect in effects {
            self.run(effect);
        }
    }

    fn fetch_page(&self, target: ListTarget, request: PageRequest<Feed>) {
        let Some(client) = self.client.clone() else {
            self.send(Message::Page {
                target,
                request,
                result: Err(FetchError::MissingCredential),
            });
            return;
        };
        let tx = self.tx.clone();
        tokio::spawn(async move {
            let result = client.fetch_page(request.key(), request.page()).await;
            deliver(
                &tx,
                Message::Page {
                    target,
                    request,
                    result,
                },
            );
        });
    }

    fn load_details(&self, media: MediaRef) {
        let Some(client) = self.client.clone() else {
            self.send(Message::Details(media, Err(FetchError::MissingCredential)));
            return;
        };
        let tx = self.tx.clone();
        tokio::spawn(async move {
            let result = DetailView::load(client.as_ref(), media).await;
            deliver(&tx, Message::Details(media, result));
        });
    }

    fn load_rails(&self) {
        let Some(client) = self.client.clone() else {
            self.send(Message::Rails(Err(FetchError::MissingCredential)));
            return;
        };
        let tx = self.tx.clone();
        tokio::spawn(async move {
            let rails = HomeRails::load(client.as_ref()).await;
            deliver(&tx, Message::Rails(Ok(rails)));
        });
    }
}

/// Runs the browser TUI.
///
/// The shared catalog data (image base URL, trending banner) is loaded
/// before the terminal is taken over.
///
/// # Errors
///
/// Returns an error if terminal setup or event handling fails.
#[allow(clippy::module_name_repetitions)]
pub async fn run_browser(client: Option<CatalogClient>, config: &BrowseConfig) -> Result<()> {
    let store = CatalogStore::new();
    let mut bootstrap_error = None;
    if let Some(client) = &client
        && let Err(err) = store.bootstrap(client).await
    {
        tracing::warn!(error = %err, "failed to load trending titles");
        bootstrap_error = Some(err.user_message());
    }
    if client.is_none() {
        bootstrap_error = Some(FetchError::MissingCredential.user_message());
    }

    let mut state = BrowserState::new(
        config,
        store.banners().to_vec(),
        String::from(store.image_base()),
        Instant::now(),
    );
    state.home_error = bootstrap_error;

    let (tx, mut rx) = unbounded_channel();
    let dispatcher = Dispatcher {
        client: client.map(Arc::new),
        tx,
    };
    dispatcher.load_rails();

    enable_raw_mode().context("failed to enable raw mode")?;
    let mut stdout = io::stdout();
    crossterm::execute!(stdout, EnterAlternateScreen)
        .context("failed to enter alternate screen")?;

    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend).context("failed to create terminal")?;

    let result = run_event_loop(&mut terminal, &mut state, &dispatcher, &mut rx).await;
    state.shutdown();

    // Cleanup (always attempt even if event loop failed)
    disable_raw_mode().context("failed to disable raw mode")?;
    crossterm::execute!(io::stdout(), LeaveAlternateScreen)
        .context("failed to leave alternate screen")?;

    result
}

/// Main event loop.
async fn run_event_loop(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    state: &mut BrowserState,
    dispatcher: &Dispatcher,
    rx: &mut UnboundedReceiver<Message>,
) -> Result<()> {
    let mut list_rows: u16 = 0;

    loop {
        terminal
            .draw(|frame| {
                list_rows = ui::draw(frame, state);
            })
            .context("failed to draw TUI")?;

        let page_size = usize::from(list_rows);

        while let Ok(message) = rx.try_recv() {
            apply_message(state, message);
        }
        dispatcher.run_all(state.tick(Instant::now(), page_size));

        while event::poll(Duration::ZERO).context("failed to poll events")? {
            if let Event::Key(key) = event::read().context("failed to read event")?
                && key.kind == KeyEventKind::Press
            {
                let exit = match state.input_mode {
                    InputMode::Search => handle_search_input(state, key.code, dispatcher),
                    InputMode::Normal => {
                        handle_normal_input(state, key.code, key.modifiers, page_size, dispatcher)
                    }
                };
                if exit {
                    return Ok(());
                }
            }
        }

        tokio::time::sleep(FRAME_INTERVAL).await;
    }
}

fn apply_message(state: &mut BrowserState, message: Message) {
    match message {
        Message::Page {
            target,
            request,
            result,
        } => state.apply_page(target, &request, result),
        Message::Rails(result) => state.apply_rails(result),
        Message::Details(media, result) => state.apply_details(media, result),
    }
}

/// Handles key input in search mode. Returns `true` to exit.
fn handle_search_input(state: &mut BrowserState, key: KeyCode, dispatcher: &Dispatcher) -> bool {
    let now = Instant::now();
    match key {
        KeyCode::Esc => state.input_mode = InputMode::Normal,
        KeyCode::Enter => dispatcher.run_all(state.submit_search()),
        KeyCode::Backspace => state.search_pop(now),
        KeyCode::Char(c) => state.search_push(c, now),
        _ => {}
    }
    false
}

/// Handles key input in normal mode. Returns `true` to exit.
fn handle_normal_input(
    state: &mut BrowserState,
    key: KeyCode,
    modifiers: KeyModifiers,
    page_size: usize,
    dispatcher: &Dispatcher,
) -> bool {
    let now = Instant::now();
    let effect = match key {
        KeyCode::Char('q') => return true,
        KeyCode::Char('c') if modifiers.contains(KeyModifiers::CONTROL) => return true,
        KeyCode::Esc => {
            state.close_detail();
            None
        }
        KeyCode::Tab => state.next_tab(),
        KeyCode::BackTab => state.previous_tab(),
        KeyCode::Char('1') => state.select_tab(Tab::Home),
        KeyCode::Char('2') => state.select_tab(Tab::Explore),
        KeyCode::Char('3') => state.select_tab(Tab::Search),
        KeyCode::Char('/') => {
            let effect = state.select_tab(Tab::Search);
            state.close_detail();
            state.input_mode = InputMode::Search;
            effect
        }
        KeyCode::Left | KeyCode::Char('h') if state.tab == Tab::Home => {
            state.banner.previous(now);
            None
        }
        KeyCode::Right | KeyCode::Char('l') if state.tab == Tab::Home => {
            state.banner.next(now);
            None
        }
        KeyCode::Char(' ') if state.tab == Tab::Home => {
            state.banner.toggle_pause(now);
            None
        }
        KeyCode::Char('m') if state.tab == Tab::Explore => state.toggle_explore_kind(),
        KeyCode::Up | KeyCode::Char('k') => {
            state.move_up();
            None
        }
        KeyCode::Down | KeyCode::Char('j') => {
            state.move_down();
            None
        }
        KeyCode::PageUp => {
            state.page_up(page_size);
            None
        }
        KeyCode::PageDown => {
            state.page_down(page_size);
            None
        }
        KeyCode::Enter => state.open_selected(),
        KeyCode::Char('o') => state.open_trailer(),
        KeyCode::Char('r') => state.retry(),
        _ => None,
    };
    dispatcher.run_all(effect);
    false
}
