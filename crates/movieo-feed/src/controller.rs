//! Paginated fetch controller.
//!
//! The controller is a state machine without I/O. Starting a fetch hands
//! out a [`PageRequest`] ticket; whoever executes it (inline through
//! [`FetchController::run`] or on a spawned task) feeds the result back
//! through [`FetchController::complete`]. Results for a ticket that is no
//! longer in flight are discarded, which keeps responses for a previous
//! query out of the current result set.
//!
//! ```text
//! Idle --set_query_key--> Loading --ok--> Loaded --advance_page--> Loading
//!                            |
//!                            +--err--> Errored --retry--> Loading
//! ```

use std::fmt;

use movieo_api::tmdb::{
    Feed, FetchError, FetchResult, LocalCatalogApi, MAX_PAGE, MediaItem, Page,
};
use tracing::instrument;

use crate::accumulator::{Accumulator, Keyed};
use crate::trigger::Advance;

/// Identifies what is being fetched. Changing it resets pagination.
pub trait FeedKey: Clone + PartialEq + fmt::Debug {
    /// Returns `true` for keys that cannot produce a request.
    fn is_blank(&self) -> bool;
}

impl FeedKey for String {
    fn is_blank(&self) -> bool {
        self.trim().is_empty()
    }
}

impl FeedKey for Feed {
    fn is_blank(&self) -> bool {
        Feed::is_blank(self)
    }
}

/// Fetch state exposed to renderers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FetchState {
    /// No query, or a query whose first fetch has not started.
    #[default]
    Idle,
    /// A page request is in flight.
    Loading,
    /// The last request succeeded.
    Loaded,
    /// The last request failed; [`FetchController::retry`] re-issues it.
    Errored,
}

/// What to do when a fetch fails.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ErrorPolicy {
    /// Stay on the list and offer a retry.
    #[default]
    Stay,
    /// Leave the list (explore pages go back home).
    NavigateAway,
}

/// Recovery action returned with a failed fetch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Recovery {
    /// Offer [`FetchController::retry`].
    Retry,
    /// Navigate away from the list.
    NavigateAway,
    /// Nothing the user can do from here (missing credential).
    Unrecoverable,
}

/// Result of feeding a response back into the controller.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    /// Items were merged; `added` excludes duplicates.
    Merged {
        /// Number of new items.
        added: usize,
    },
    /// The page was served but held no items.
    Empty,
    /// The request failed; the result set is unchanged.
    Failed {
        /// What the surface should do next.
        recovery: Recovery,
    },
    /// The ticket was stale and the response was dropped.
    Discarded,
}

/// Ticket for one page request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageRequest<K> {
    generation: u64,
    key: K,
    page: u32,
}

impl<K> PageRequest<K> {
    /// Query key to fetch.
    #[must_use]
    pub const fn key(&self) -> &K {
        &self.key
    }

    /// Page number to fetch (1-based).
    #[must_use]
    pub const fn page(&self) -> u32 {
        self.page
    }

    /// Query generation the ticket was issued for.
    #[must_use]
    pub const fn generation(&self) -> u64 {
        self.generation
    }
}

/// Read-only surface of a paginated result list.
pub trait FeedView {
    /// Item type.
    type Item;

    /// Accumulated items in first-seen order.
    fn items(&self) -> &[Self::Item];

    /// Current fetch state.
    fn state(&self) -> FetchState;

    /// User-facing message of the last failure.
    fn error_message(&self) -> Option<String>;

    /// Returns `true` when a query returned no items at all.
    fn is_empty_result(&self) -> bool;

    /// Returns `true` if more pages can be requested.
    fn has_more(&self) -> bool;
}

/// Paginated fetch controller for one query key at a time.
#[derive(Debug)]
pub struct FetchController<K, T: Keyed> {
    key: Option<K>,
    page: u32,
    total_pages: Option<u32>,
    state: FetchState,
    error: Option<FetchError>,
    items: Accumulator<T>,
    generation: u64,
    in_flight: Option<PageRequest<K>>,
    policy: ErrorPolicy,
}

impl<K: FeedKey, T: Keyed> Default for FetchController<K, T> {
    fn default() -> Self {
        Self::new(ErrorPolicy::Stay)
    }
}

impl<K: FeedKey, T: Keyed> FetchController<K, T> {
    /// Creates an idle controller.
    #[must_use]
    pub fn new(policy: ErrorPolicy) -> Self {
        Self {
            key: None,
            page: 1,
            total_pages: None,
            state: FetchState::Idle,
            error: None,
            items: Accumulator::new(),
            generation: 0,
            in_flight: None,
            policy,
        }
    }

    /// Switches to `key` and starts fetching its first page.
    ///
    /// Setting the current key again does nothing. A blank key clears the
    /// results and leaves the controller idle.
    pub fn set_query_key(&mut self, key: K) -> Option<PageRequest<K>> {
        if self.key.as_ref() == Some(&key) {
            return None;
        }

        self.reset();
        if key.is_blank() {
            tracing::debug!("blank query, staying idle");
            return None;
        }

        tracing::debug!(key = ?key, "query changed");
        self.key = Some(key);
        self.begin(1)
    }

    /// Requests the next page.
    ///
    /// No-op while loading, after a failure (use [`Self::retry`]), without
    /// a key, or once the last page has been fetched.
    pub fn advance_page(&mut self) -> Option<PageRequest<K>> {
        if !self.can_request_next() {
            return None;
        }
        let next = self.page.checked_add(1)?;
        self.page = next;
        self.begin(next)
    }

    /// Re-issues the failed request for the current page.
    ///
    /// No-op unless errored, and for failures a retry cannot fix.
    pub fn retry(&mut self) -> Option<PageRequest<K>> {
        if self.state != FetchState::Errored {
            return None;
        }
        if self.error.as_ref().is_some_and(|e| !e.is_retryable()) {
            tracing::debug!("error is not retryable");
            return None;
        }
        self.error = None;
        self.begin(self.page)
    }

    /// Feeds the result of `request` back into the controller.
    pub fn complete(
        &mut self,
        request: &PageRequest<K>,
        result: FetchResult<Page<T>>,
    ) -> Outcome {
        if self.in_flight.as_ref() != Some(request) {
            tracing::debug!(
                generation = request.generation,
                page = request.page,
                current_generation = self.generation,
                "stale response discarded"
            );
            return Outcome::Discarded;
        }
        self.in_flight = None;

        match result {
            Ok(page) => {
                let total_pages = page.bounded_total_pages();
                let fetched = page.results.len();
                let added = self.items.extend(page.results);
                self.total_pages = Some(total_pages);
                self.state = FetchState::Loaded;

                tracing::debug!(
                    page = request.page,
                    fetched,
                    added,
                    total_pages,
                    total = self.items.len(),
                    "page merged"
                );
                if fetched == 0 {
                    Outcome::Empty
                } else {
                    Outcome::Merged { added }
                }
            }
            Err(err) => {
                let recovery = match self.policy {
                    ErrorPolicy::NavigateAway => Recovery::NavigateAway,
                    ErrorPolicy::Stay if err.is_retryable() => Recovery::Retry,
                    ErrorPolicy::Stay => Recovery::Unrecoverable,
                };
                tracing::warn!(page = request.page, error = %err, ?recovery, "page fetch failed");
                self.error = Some(err);
                self.state = FetchState::Errored;
                Outcome::Failed { recovery }
            }
        }
    }

    /// Current query key.
    #[must_use]
    pub const fn key(&self) -> Option<&K> {
        self.key.as_ref()
    }

    /// Most recently requested page.
    #[must_use]
    pub const fn page(&self) -> u32 {
        self.page
    }

    /// Total pages reported for the current key, once known.
    #[must_use]
    pub const fn total_pages(&self) -> Option<u32> {
        self.total_pages
    }

    /// Last failure, while errored.
    #[must_use]
    pub const fn error(&self) -> Option<&FetchError> {
        self.error.as_ref()
    }

    /// Returns `true` while a request is in flight.
    #[must_use]
    pub fn is_loading(&self) -> bool {
        self.state == FetchState::Loading
    }

    /// Failure handling policy.
    #[must_use]
    pub const fn policy(&self) -> ErrorPolicy {
        self.policy
    }

    /// Request currently in flight.
    #[must_use]
    pub const fn in_flight(&self) -> Option<&PageRequest<K>> {
        self.in_flight.as_ref()
    }

    fn reset(&mut self) {
        self.generation = self.generation.wrapping_add(1);
        self.key = None;
        self.page = 1;
        self.total_pages = None;
        self.state = FetchState::Idle;
        self.error = None;
        self.in_flight = None;
        self.items.clear();
    }

    fn begin(&mut self, page: u32) -> Option<PageRequest<K>> {
        let key = self.key.clone()?;
        let request = PageRequest {
            generation: self.generation,
            key,
            page,
        };
        tracing::debug!(page, generation = self.generation, "page requested");
        self.state = FetchState::Loading;
        self.in_flight = Some(request.clone());
        Some(request)
    }

    fn last_page(&self) -> u32 {
        self.total_pages.unwrap_or(MAX_PAGE).min(MAX_PAGE)
    }

    fn can_request_next(&self) -> bool {
        self.key.is_some()
            && self.in_flight.is_none()
            && matches!(self.state, FetchState::Loaded)
            && self.page < self.last_page()
    }
}

impl FetchController<Feed, MediaItem> {
    /// Executes `request` against `api` and feeds the result back.
    #[allow(clippy::future_not_send)]
    #[instrument(skip_all, fields(feed = %request.key(), page = request.page()))]
    pub async fn run(
        &mut self,
        api: &impl LocalCatalogApi,
        request: PageRequest<Feed>,
    ) -> Outcome {
        let result = api.fetch_page(request.key(), request.page()).await;
        self.complete(&request, result)
    }
}

impl<K: FeedKey, T: Keyed> FeedView for FetchController<K, T> {
    type Item = T;

    fn items(&self) -> &[T] {
        self.items.items()
    }

    fn state(&self) -> FetchState {
        self.state
    }

    fn error_message(&self) -> Option<String> {
        self.error.as_ref().map(FetchError::user_message)
    }

    fn is_empty_result(&self) -> bool {
        self.state == FetchState::Loaded && self.items.is_empty()
    }

    fn has_more(&self) -> bool {
        self.key.is_some() && self.page < self.last_page()
    }
}

/// Pagination only moves forward: `retreat` and `jump` do nothing.
impl<K: FeedKey, T: Keyed> Advance for FetchController<K, T> {
    type Effect = Option<PageRequest<K>>;

    fn advance(&mut self) -> Self::Effect {
        self.advance_page()
    }

    fn retreat(&mut self) -> Self::Effect {
        None
    }

    fn jump(&mut self, _index: usize) -> Self::Effect {
        None
    }

    fn can_advance(&self) -> bool {
        self.can_request_next()
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    #![allow(clippy::indexing_slicing)]

    use movieo_api::tmdb::MediaKind;

    use super::*;
    use crate::testing::{MockCatalogApi, ids, movie, page_of};
    use crate::trigger::ProximityTrigger;

    type Controller = FetchController<Feed, MediaItem>;

    fn timeout() -> FetchError {
        FetchError::NetworkFailure(String::from("timeout"))
    }

    #[test]
    fn test_set_query_key_issues_first_page() {
        // Arrange
        let mut ctl = Controller::default();

        // Act
        let request = ctl.set_query_key(Feed::search("batman")).unwrap();

        // Assert
        assert_eq!(request.page(), 1);
        assert_eq!(request.key(), &Feed::search("batman"));
        assert_eq!(ctl.state(), FetchState::Loading);
        assert!(ctl.is_loading());
    }

    #[test]
    fn test_blank_key_stays_idle() {
        // Arrange
        let mut ctl = Controller::default();
        let request = ctl.set_query_key(Feed::search("dune")).unwrap();
        ctl.complete(&request, Ok(page_of(1, vec![movie(1)], 2)));

        // Act
        let blank = ctl.set_query_key(Feed::search("   "));

        // Assert
        assert!(blank.is_none());
        assert_eq!(ctl.state(), FetchState::Idle);
        assert!(ctl.items().is_empty());
        assert!(ctl.key().is_none());
        assert!(ctl.advance_page().is_none());
    }

    #[test]
    fn test_same_key_is_not_refetched() {
        // Arrange
        let mut ctl = Controller::default();
        let request = ctl.set_query_key(Feed::Trending).unwrap();
        ctl.complete(&request, Ok(page_of(1, vec![movie(1)], 5)));

        // Act
        let again = ctl.set_query_key(Feed::Trending);

        // Assert
        assert!(again.is_none());
        assert_eq!(ids(ctl.items()), vec![1]);
    }

    #[test]
    fn test_batman_pages_are_merged() {
        // Arrange
        let mut ctl = Controller::default();
        let first = ctl.set_query_key(Feed::search("batman")).unwrap();

        // Act
        let outcome1 = ctl.complete(&first, Ok(page_of(1, vec![movie(1), movie(2)], 3)));
        let state1 = ctl.state();
        let ids1 = ids(ctl.items());
        let second = ctl.advance_page().unwrap();
        let outcome2 = ctl.complete(&second, Ok(page_of(2, vec![movie(2), movie(3)], 3)));

        // Assert
        assert_eq!(outcome1, Outcome::Merged { added: 2 });
        assert_eq!(state1, FetchState::Loaded);
        assert_eq!(ids1, vec![1, 2]);
        assert_eq!(second.page(), 2);
        assert_eq!(outcome2, Outcome::Merged { added: 1 });
        assert_eq!(ids(ctl.items()), vec![1, 2, 3]);
        assert_eq!(ctl.total_pages(), Some(3));
        assert!(ctl.has_more());
    }

    #[test]
    fn test_failed_page_keeps_items_and_retry_reissues_same_page() {
        // Arrange
        let mut ctl = Controller::default();
        let first = ctl.set_query_key(Feed::search("batman")).unwrap();
        ctl.complete(&first, Ok(page_of(1, vec![movie(1), movie(2)], 3)));
        let second = ctl.advance_page().unwrap();

        // Act
        let outcome = ctl.complete(&second, Err(timeout()));
        let errored_state = ctl.state();
        let advance_while_errored = ctl.advance_page();
        let retried = ctl.retry().unwrap();

        // Assert
        assert_eq!(
            outcome,
            Outcome::Failed {
                recovery: Recovery::Retry
            }
        );
        assert_eq!(errored_state, FetchState::Errored);
        assert!(advance_while_errored.is_none());
        assert_eq!(ids(ctl.items()), vec![1, 2]);
        assert_eq!(retried.page(), 2);
        assert_eq!(ctl.page(), 2);
        assert_eq!(ctl.state(), FetchState::Loading);
        assert!(ctl.error().is_none());
    }

    #[test]
    fn test_error_message_is_user_facing() {
        // Arrange
        let mut ctl = Controller::default();
        let first = ctl.set_query_key(Feed::Trending).unwrap();

        // Act
        ctl.complete(&first, Err(timeout()));

        // Assert
        let message = ctl.error_message().unwrap();
        assert!(message.starts_with("Unable to fetch data"));
        assert!(!ctl.is_empty_result());
    }

    #[test]
    fn test_missing_credential_is_not_retried() {
        // Arrange
        let mut ctl = Controller::default();
        let first = ctl.set_query_key(Feed::Trending).unwrap();

        // Act
        let outcome = ctl.complete(&first, Err(FetchError::MissingCredential));
        let retried = ctl.retry();

        // Assert
        assert_eq!(
            outcome,
            Outcome::Failed {
                recovery: Recovery::Unrecoverable
            }
        );
        assert!(retried.is_none());
        assert_eq!(ctl.state(), FetchState::Errored);
    }

    #[test]
    fn test_navigate_away_policy() {
        // Arrange
        let mut ctl = Controller::new(ErrorPolicy::NavigateAway);
        let first = ctl.set_query_key(Feed::Discover(MediaKind::Movie)).unwrap();

        // Act
        let outcome = ctl.complete(
            &first,
            Err(FetchError::UpstreamError {
                status: 500,
                message: String::from("oops"),
            }),
        );

        // Assert
        assert_eq!(
            outcome,
            Outcome::Failed {
                recovery: Recovery::NavigateAway
            }
        );
        assert_eq!(ctl.policy(), ErrorPolicy::NavigateAway);
    }

    #[test]
    fn test_retry_is_noop_unless_errored() {
        // Arrange
        let mut ctl = Controller::default();
        let first = ctl.set_query_key(Feed::Trending).unwrap();

        // Act
        let while_loading = ctl.retry();
        ctl.complete(&first, Ok(page_of(1, vec![movie(1)], 2)));
        let while_loaded = ctl.retry();

        // Assert
        assert!(while_loading.is_none());
        assert!(while_loaded.is_none());
    }

    #[test]
    fn test_advance_is_coalesced_while_loading() {
        // Arrange
        let mut ctl = Controller::default();
        ctl.set_query_key(Feed::Trending).unwrap();

        // Act
        let advanced = ctl.advance_page();

        // Assert
        assert!(advanced.is_none());
        assert_eq!(ctl.page(), 1);
    }

    #[test]
    fn test_advance_on_last_page_is_noop() {
        // Arrange
        let mut ctl = Controller::default();
        let first = ctl.set_query_key(Feed::search("batman")).unwrap();
        ctl.complete(&first, Ok(page_of(1, vec![movie(1)], 2)));
        let second = ctl.advance_page().unwrap();
        ctl.complete(&second, Ok(page_of(2, vec![movie(2)], 2)));

        // Act
        let third = ctl.advance_page();

        // Assert
        assert!(third.is_none());
        assert_eq!(ctl.page(), 2);
        assert!(!ctl.has_more());
        assert!(!ctl.can_advance());
    }

    #[test]
    fn test_zero_total_pages_counts_as_one() {
        // Arrange
        let mut ctl = Controller::default();
        let first = ctl.set_query_key(Feed::search("zzzz")).unwrap();

        // Act
        let outcome = ctl.complete(&first, Ok(page_of(1, Vec::new(), 0)));

        // Assert
        assert_eq!(outcome, Outcome::Empty);
        assert_eq!(ctl.total_pages(), Some(1));
        assert!(ctl.is_empty_result());
        assert!(ctl.advance_page().is_none());
        assert!(ctl.error_message().is_none());
    }

    #[test]
    fn test_stale_response_is_discarded() {
        // Arrange
        let mut ctl = Controller::default();
        let old = ctl.set_query_key(Feed::search("bat")).unwrap();
        let new = ctl.set_query_key(Feed::search("batman")).unwrap();

        // Act
        let stale = ctl.complete(&old, Ok(page_of(1, vec![movie(99)], 3)));
        let fresh = ctl.complete(&new, Ok(page_of(1, vec![movie(1)], 3)));

        // Assert
        assert_eq!(stale, Outcome::Discarded);
        assert_eq!(fresh, Outcome::Merged { added: 1 });
        assert_eq!(ids(ctl.items()), vec![1]);
    }

    #[test]
    fn test_returning_to_previous_key_ignores_its_old_ticket() {
        // Arrange
        let mut ctl = Controller::default();
        let first = ctl.set_query_key(Feed::search("dune")).unwrap();
        ctl.set_query_key(Feed::search("alien")).unwrap();
        let again = ctl.set_query_key(Feed::search("dune")).unwrap();

        // Act
        let outcome = ctl.complete(&first, Ok(page_of(1, vec![movie(7)], 1)));

        // Assert
        assert_eq!(outcome, Outcome::Discarded);
        assert_ne!(first.generation(), again.generation());
        assert!(ctl.items().is_empty());
        assert!(ctl.is_loading());
    }

    #[test]
    fn test_key_change_resets_pagination() {
        // Arrange
        let mut ctl = Controller::default();
        let first = ctl.set_query_key(Feed::search("batman")).unwrap();
        ctl.complete(&first, Ok(page_of(1, vec![movie(1)], 3)));
        let second = ctl.advance_page().unwrap();
        ctl.complete(&second, Ok(page_of(2, vec![movie(2)], 3)));

        // Act
        let request = ctl.set_query_key(Feed::search("superman")).unwrap();

        // Assert
        assert_eq!(request.page(), 1);
        assert_eq!(ctl.page(), 1);
        assert!(ctl.items().is_empty());
        assert!(ctl.total_pages().is_none());
    }

    #[test]
    fn test_only_items_fetched_after_last_key_change_remain() {
        // Arrange
        let mut ctl = Controller::default();
        let keys = ["a", "ab", "abc"];
        let mut tickets = Vec::new();
        for key in keys {
            tickets.push(ctl.set_query_key(Feed::search(key)).unwrap());
        }

        // Act
        for (offset, ticket) in tickets.iter().enumerate().rev() {
            let id = u64::try_from(offset).unwrap();
            ctl.complete(ticket, Ok(page_of(1, vec![movie(id)], 1)));
        }

        // Assert
        assert_eq!(ids(ctl.items()), vec![2]);
    }

    #[test]
    fn test_string_keys() {
        // Arrange
        let mut ctl: FetchController<String, MediaItem> = FetchController::default();

        // Act
        let blank = ctl.set_query_key(String::from(" "));
        let request = ctl.set_query_key(String::from("movie/popular"));

        // Assert
        assert!(blank.is_none());
        assert_eq!(request.unwrap().key(), "movie/popular");
    }

    #[test]
    fn test_proximity_trigger_drives_controller() {
        // Arrange
        let mut ctl = Controller::default();
        let trigger = ProximityTrigger::new(5);
        let first = ctl.set_query_key(Feed::Trending).unwrap();

        // Act
        let while_loading = trigger.observe(0, &mut ctl);
        ctl.complete(&first, Ok(page_of(1, vec![movie(1), movie(2)], 4)));
        let far = trigger.observe(10, &mut ctl);
        let near = trigger.observe(3, &mut ctl);

        // Assert
        assert!(while_loading.is_none());
        assert!(far.is_none());
        assert_eq!(near.flatten().unwrap().page(), 2);
    }

    #[tokio::test]
    async fn test_run_against_catalog() {
        // Arrange
        let feed = Feed::search("batman");
        let api = MockCatalogApi::new()
            .with_page(&feed, 1, Ok(page_of(1, vec![movie(1), movie(2)], 3)))
            .with_page(&feed, 2, Ok(page_of(2, vec![movie(2), movie(3)], 3)))
            .with_page(&feed, 3, Err(timeout()));
        let mut ctl = Controller::default();

        // Act
        let first = ctl.set_query_key(feed.clone()).unwrap();
        ctl.run(&api, first).await;
        let second = ctl.advance_page().unwrap();
        ctl.run(&api, second).await;
        let third = ctl.advance_page().unwrap();
        let outcome = ctl.run(&api, third).await;

        // Assert
        assert_eq!(api.calls(), 3);
        assert_eq!(ids(ctl.items()), vec![1, 2, 3]);
        assert_eq!(
            outcome,
            Outcome::Failed {
                recovery: Recovery::Retry
            }
        );
        assert_eq!(ctl.page(), 3);
    }

    #[tokio::test]
    async fn test_retry_after_failure_succeeds() {
        // Arrange
        let feed = Feed::Trending;
        let api = MockCatalogApi::new().with_page(&feed, 1, Err(timeout()));
        let mut ctl = Controller::default();
        let first = ctl.set_query_key(feed.clone()).unwrap();
        ctl.run(&api, first).await;

        // Act
        api.set_page(&feed, 1, Ok(page_of(1, vec![movie(4)], 1)));
        let retried = ctl.retry().unwrap();
        let outcome = ctl.run(&api, retried).await;

        // Assert
        assert_eq!(outcome, Outcome::Merged { added: 1 });
        assert_eq!(ctl.state(), FetchState::Loaded);
        assert_eq!(ids(ctl.items()), vec![4]);
        assert_eq!(api.calls(), 2);
    }
}
