//! Browser TUI state management.
//!
//! State changes never perform I/O. Operations that need the network
//! return an [`Effect`] for the event loop to carry out.

use std::time::Instant;

use movieo_api::tmdb::{Feed, FetchResult, MediaItem, MediaKind, MediaRef, Page};
use movieo_feed::{
    BannerCarousel, Debouncer, DetailView, ErrorPolicy, FeedView, FetchController, FetchState,
    HomeRails, Outcome, PageRequest, ProximityTrigger, Recovery, Trigger,
};
use ratatui::widgets::TableState;

use crate::config::BrowseConfig;

/// Top-level tabs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tab {
    /// Trending banner and chart rails.
    Home,
    /// Popular movies or series, loaded page by page.
    Explore,
    /// Multi search.
    Search,
}

impl Tab {
    /// Tabs in display order.
    pub const ALL: [Self; 3] = [Self::Home, Self::Explore, Self::Search];

    /// Tab label.
    pub const fn title(self) -> &'static str {
        match self {
            Self::Home => "Home",
            Self::Explore => "Explore",
            Self::Search => "Search",
        }
    }

    /// Position in [`Self::ALL`].
    pub const fn index(self) -> usize {
        match self {
            Self::Home => 0,
            Self::Explore => 1,
            Self::Search => 2,
        }
    }

    const fn next(self) -> Self {
        match self {
            Self::Home => Self::Explore,
            Self::Explore => Self::Search,
            Self::Search => Self::Home,
        }
    }

    const fn previous(self) -> Self {
        match self {
            Self::Home => Self::Search,
            Self::Explore => Self::Home,
            Self::Search => Self::Explore,
        }
    }
}

/// Input mode for the browser.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputMode {
    /// Normal navigation mode.
    Normal,
    /// Search text input mode.
    Search,
}

/// Paginated list a page response belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ListTarget {
    /// Explore tab list.
    Explore,
    /// Search tab list.
    Search,
}

/// Work the event loop performs on behalf of the state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    /// Fetch one page for a list.
    FetchPage(ListTarget, PageRequest<Feed>),
    /// Load the detail view of a title.
    LoadDetails(MediaRef),
    /// Open a URL in the system browser.
    OpenUrl(String),
}

/// Detail overlay contents.
#[derive(Debug)]
pub enum DetailPane {
    /// Waiting for the detail requests.
    Loading(MediaRef),
    /// Loaded detail view.
    Ready(Box<DetailView>),
    /// The details request failed.
    Failed {
        /// Title that failed to load.
        media: MediaRef,
        /// User-facing message.
        message: String,
    },
}

/// A paginated list with its table cursor.
#[derive(Debug)]
pub struct ResultList {
    /// Fetch controller owning the items.
    pub controller: FetchController<Feed, MediaItem>,
    /// Table state (handles selection and scroll).
    pub table_state: TableState,
}

impl ResultList {
    fn new(policy: ErrorPolicy) -> Self {
        Self {
            controller: FetchController::new(policy),
            table_state: TableState::default(),
        }
    }

    /// Item under the cursor.
    pub fn selected(&self) -> Option<&MediaItem> {
        self.controller
            .items()
            .get(self.table_state.selected()?)
    }

    fn move_up(&mut self) {
        if let Some(current) = self.table_state.selected() {
            self.table_state.select(Some(current.saturating_sub(1)));
        }
    }

    fn move_down(&mut self) {
        let max = self.controller.items().len().saturating_sub(1);
        if let Some(current) = self.table_state.selected() {
            self.table_state
                .select(Some(current.saturating_add(1).min(max)));
        }
    }

    fn page_up(&mut self, page_size: usize) {
        if let Some(current) = self.table_state.selected() {
            self.table_state
                .select(Some(current.saturating_sub(page_size)));
        }
    }

    fn page_down(&mut self, page_size: usize) {
        let max = self.controller.items().len().saturating_sub(1);
        if let Some(current) = self.table_state.selected() {
            self.table_state
                .select(Some(current.saturating_add(page_size).min(max)));
        }
    }

    /// Starts a new query and drops the cursor.
    fn set_query(&mut self, feed: Feed) -> Option<PageRequest<Feed>> {
        let request = self.controller.set_query_key(feed);
        if self.controller.items().is_empty() {
            self.table_state = TableState::default();
        }
        request
    }

    fn complete(
        &mut self,
        request: &PageRequest<Feed>,
        result: FetchResult<Page<MediaItem>>,
    ) -> Outcome {
        let outcome = self.controller.complete(request, result);
        if self.table_state.selected().is_none() && !self.controller.items().is_empty() {
            self.table_state.select(Some(0));
        }
        outcome
    }

    /// Rows between the bottom of the viewport and the end of the list.
    fn distance_to_end(&self, viewport_rows: usize) -> usize {
        ProximityTrigger::distance(
            self.table_state.offset(),
            viewport_rows,
            self.controller.items().len(),
        )
    }
}

/// State for the browser TUI.
#[allow(clippy::module_name_repetitions)]
#[derive(Debug)]
pub struct BrowserState {
    /// Active tab.
    pub tab: Tab,
    /// Current input mode.
    pub input_mode: InputMode,
    /// Trending banner.
    pub banner: BannerCarousel<MediaItem>,
    /// Image base URL.
    pub image_base: String,
    /// Chart rails (`None` while loading).
    pub rails: Option<HomeRails>,
    /// Failure message of the home page.
    pub home_error: Option<String>,
    /// Explore list.
    pub explore: ResultList,
    /// Media kind listed on the explore tab.
    pub explore_kind: MediaKind,
    /// Search list.
    pub search: ResultList,
    /// Search input text.
    pub query: String,
    /// Detail overlay.
    pub detail: Option<DetailPane>,
    /// One-line status message.
    pub status: Option<String>,
    debouncer: Debouncer<String>,
    proximity: ProximityTrigger,
}

impl BrowserState {
    /// Creates the state and starts banner autoplay.
    pub fn new(
        config: &BrowseConfig,
        banners: Vec<MediaItem>,
        image_base: String,
        now: Instant,
    ) -> Self {
        let mut banner = BannerCarousel::new(banners, config.autoplay_interval());
        banner.start(now);

        Self {
            tab: Tab::Home,
            input_mode: InputMode::Normal,
            banner,
            image_base,
            rails: None,
            home_error: None,
            explore: ResultList::new(ErrorPolicy::NavigateAway),
            explore_kind: MediaKind::Movie,
            search: ResultList::new(ErrorPolicy::Stay),
            query: String::new(),
            detail: None,
            status: None,
            debouncer: Debouncer::new(config.debounce()),
            proximity: ProximityTrigger::new(config.scroll_margin),
        }
    }

    /// Switches tabs.
    ///
    /// The explore list is loaded on first visit and reloaded on a visit
    /// after a failed fetch sent the browser back home.
    pub fn select_tab(&mut self, tab: Tab) -> Option<Effect> {
        self.tab = tab;
        self.status = None;
        if tab != Tab::Explore {
            return None;
        }
        let request = if self.explore.controller.key().is_none() {
            self.explore.set_query(Feed::Discover(self.explore_kind))?
        } else if self.explore.controller.state() == FetchState::Errored {
            self.explore.controller.retry()?
        } else {
            return None;
        };
        Some(Effect::FetchPage(ListTarget::Explore, request))
    }

    /// Moves to the next tab.
    pub fn next_tab(&mut self) -> Option<Effect> {
        self.select_tab(self.tab.next())
    }

    /// Moves to the previous tab.
    pub fn previous_tab(&mut self) -> Option<Effect> {
        self.select_tab(self.tab.previous())
    }

    /// Flips the explore list between movies and series.
    pub fn toggle_explore_kind(&mut self) -> Option<Effect> {
        self.explore_kind = match self.explore_kind {
            MediaKind::Movie => MediaKind::Tv,
            MediaKind::Tv | MediaKind::Person => MediaKind::Movie,
        };
        let request = self.explore.set_query(Feed::Discover(self.explore_kind))?;
        Some(Effect::FetchPage(ListTarget::Explore, request))
    }

    /// Appends a character to the search input.
    pub fn search_push(&mut self, ch: char, now: Instant) {
        self.query.push(ch);
        self.debouncer.push(self.query.clone(), now);
    }

    /// Removes the last character of the search input.
    pub fn search_pop(&mut self, now: Instant) {
        self.query.pop();
        self.debouncer.push(self.query.clone(), now);
    }

    /// Runs the search for the current input without waiting.
    pub fn submit_search(&mut self) -> Option<Effect> {
        self.debouncer.cancel();
        self.input_mode = InputMode::Normal;
        self.start_search(self.query.clone())
    }

    fn start_search(&mut self, query: String) -> Option<Effect> {
        let request = self.search.set_query(Feed::search(query))?;
        Some(Effect::FetchPage(ListTarget::Search, request))
    }

    /// Advances timers and checks the scroll position.
    ///
    /// `viewport_rows` is the number of list rows visible on screen.
    pub fn tick(&mut self, now: Instant, viewport_rows: usize) -> Vec<Effect> {
        let mut effects = Vec::new();

        if self.tab == Tab::Home {
            self.banner.tick(now);
        }

        if let Some(query) = self.debouncer.poll(now)
            && let Some(effect) = self.start_search(query)
        {
            effects.push(effect);
        }

        let visible = match self.tab {
            _ if self.detail.is_some() => None,
            Tab::Home => None,
            Tab::Explore => Some((ListTarget::Explore, &mut self.explore)),
            Tab::Search => Some((ListTarget::Search, &mut self.search)),
        };
        if let Some((target, list)) = visible {
            let distance = list.distance_to_end(viewport_rows);
            if let Some(Some(request)) = self.proximity.observe(distance, &mut list.controller) {
                effects.push(Effect::FetchPage(target, request));
            }
        }

        effects
    }

    /// Feeds a page response into its list.
    pub fn apply_page(
        &mut self,
        target: ListTarget,
        request: &PageRequest<Feed>,
        result: FetchResult<Page<MediaItem>>,
    ) {
        let list = self.list_mut(target);
        let outcome = list.complete(request, result);
        let message = list.controller.error_message();

        match outcome {
            Outcome::Failed {
                recovery: Recovery::NavigateAway,
            } => {
                self.tab = Tab::Home;
                self.status = message;
            }
            Outcome::Failed {
                recovery: Recovery::Retry | Recovery::Unrecoverable,
            }
            | Outcome::Merged { .. }
            | Outcome::Empty
            | Outcome::Discarded => {}
        }
    }

    /// Stores the home page rails.
    pub fn apply_rails(&mut self, result: FetchResult<HomeRails>) {
        match result {
            Ok(rails) => self.rails = Some(rails),
            Err(err) => {
                self.rails = Some(HomeRails::default());
                self.home_error = Some(err.user_message());
            }
        }
    }

    /// Opens the detail overlay for the highlighted title.
    pub fn open_selected(&mut self) -> Option<Effect> {
        let item = match self.tab {
            Tab::Home => self.banner.current(),
            Tab::Explore => self.explore.selected(),
            Tab::Search => self.search.selected(),
        }?;

        let Some(media) = item.media_ref() else {
            self.status = Some(format!("{} has no detail page", item.display_title()));
            return None;
        };
        self.detail = Some(DetailPane::Loading(media));
        Some(Effect::LoadDetails(media))
    }

    /// Stores a detail view result if it is still the one awaited.
    pub fn apply_details(&mut self, media: MediaRef, result: FetchResult<DetailView>) {
        if !matches!(self.detail, Some(DetailPane::Loading(awaited)) if awaited == media) {
            tracing::debug!(media = %media.path(), "detail response no longer awaited");
            return;
        }
        self.detail = Some(match result {
            Ok(view) => DetailPane::Ready(Box::new(view)),
            Err(err) => DetailPane::Failed {
                media,
                message: err.user_message(),
            },
        });
    }

    /// Closes the detail overlay.
    pub fn close_detail(&mut self) {
        self.detail = None;
    }

    /// Opens the trailer of the loaded detail view.
    pub fn open_trailer(&mut self) -> Option<Effect> {
        let Some(DetailPane::Ready(view)) = &self.detail else {
            return None;
        };
        let url = view.trailer_url();
        if url.is_none() {
            self.status = Some(String::from("No trailer available"));
        }
        url.map(Effect::OpenUrl)
    }

    /// Retries the failed page of the active list, or the failed detail view.
    pub fn retry(&mut self) -> Option<Effect> {
        if let Some(DetailPane::Failed { media, .. }) = self.detail {
            self.detail = Some(DetailPane::Loading(media));
            return Some(Effect::LoadDetails(media));
        }
        let (target, list) = self.active_list_mut()?;
        let request = list.controller.retry()?;
        Some(Effect::FetchPage(target, request))
    }

    /// Moves the cursor of the active list up.
    pub fn move_up(&mut self) {
        if let Some((_, list)) = self.active_list_mut() {
            list.move_up();
        }
    }

    /// Moves the cursor of the active list down.
    pub fn move_down(&mut self) {
        if let Some((_, list)) = self.active_list_mut() {
            list.move_down();
        }
    }

    /// Moves the cursor of the active list up by `page_size`.
    pub fn page_up(&mut self, page_size: usize) {
        if let Some((_, list)) = self.active_list_mut() {
            list.page_up(page_size);
        }
    }

    /// Moves the cursor of the active list down by `page_size`.
    pub fn page_down(&mut self, page_size: usize) {
        if let Some((_, list)) = self.active_list_mut() {
            list.page_down(page_size);
        }
    }

    /// Stops every timer and trigger.
    pub fn shutdown(&mut self) {
        self.banner.stop();
        self.debouncer.cancel();
        self.proximity.stop();
    }

    /// Returns `true` while a search is waiting for the input to settle.
    pub const fn is_search_pending(&self) -> bool {
        self.debouncer.is_pending()
    }

    const fn active_list_mut(&mut self) -> Option<(ListTarget, &mut ResultList)> {
        match self.tab {
            Tab::Home => None,
            Tab::Explore => Some((ListTarget::Explore, &mut self.explore)),
            Tab::Search => Some((ListTarget::Search, &mut self.search)),
        }
    }

    const fn list_mut(&mut self, target: ListTarget) -> &mut ResultList {
        match target {
            ListTarget::Explore => &mut self.explore,
            ListTarget::Search => &mut self.search,
        }
    }
}
