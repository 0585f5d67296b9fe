use media_list_enrichment::{EnrichmentClient, EnrichmentError};
use media_list_models::{MediaDetails, MediaItem, UserRating, WatchStatus};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing::{debug, error, info, warn};
use uuid::Uuid;

use crate::error::CollectionError;
use crate::notice::Notice;
use crate::store::ItemStore;
use crate::view::{derive_view, DerivedView};

#[cfg(test)]
mod tests;

const FETCH_FAILED_MESSAGE: &str = "Could not fetch details. Please check the title and try again.";
const BUSY_MESSAGE: &str = "Another title is still being looked up.";

/// Result of an add request
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AddOutcome {
    Added(MediaItem),
    /// A title already in the collection, matched case-insensitively
    Duplicate { title: String },
    /// Enrichment failed; nothing changed
    Failed,
    /// Another add is still in flight
    Busy,
    EmptyQuery,
}

#[derive(Default)]
struct CollectionState {
    items: Vec<MediaItem>,
    tab: WatchStatus,
    filter: String,
    pending_delete: Option<String>,
    notice: Option<Notice>,
    busy: bool,
}

impl CollectionState {
    fn find(&self, id: &str) -> Option<&MediaItem> {
        self.items.iter().find(|item| item.id == id)
    }

    fn find_mut(&mut self, id: &str) -> Option<&mut MediaItem> {
        self.items.iter_mut().find(|item| item.id == id)
    }

    fn existing_title(&self, title: &str) -> Option<String> {
        self.items
            .iter()
            .find(|item| item.has_title(title))
            .map(|item| item.title.clone())
    }

    fn fresh_id(&self) -> String {
        loop {
            let id = Uuid::new_v4().to_string();
            if self.find(&id).is_none() {
                return id;
            }
        }
    }
}

struct Session {
    state: Mutex<CollectionState>,
    store: Box<dyn ItemStore>,
    enricher: Arc<dyn EnrichmentClient>,
    revision: watch::Sender<u64>,
}

/// Owns the media collection for one session.
///
/// Every mutation is written through to the item store before the call
/// returns. The state lock is never held across the enrichment call, so
/// status, rating and delete operations stay available while an add is in
/// flight. Clones share the same session.
#[derive(Clone)]
pub struct CollectionManager {
    session: Arc<Session>,
}

impl CollectionManager {
    pub fn new(store: impl ItemStore + 'static, enricher: Arc<dyn EnrichmentClient>) -> Self {
        let items = store.load();
        info!("Collection opened with {} item(s)", items.len());

        let (revision, _) = watch::channel(0);
        Self {
            session: Arc::new(Session {
                state: Mutex::new(CollectionState {
                    items,
                    ..CollectionState::default()
                }),
                store: Box::new(store),
                enricher,
                revision,
            }),
        }
    }

    /// Look up `query` and prepend the result to the collection.
    pub async fn add_item(&self, query: &str) -> AddOutcome {
        let query = query.trim();
        if let Err(outcome) = self.session.begin_add(query) {
            return outcome;
        }

        // Releases the busy flag if this future is dropped mid-lookup
        let guard = BusyGuard::new(&self.session);
        let result = self.session.enricher.fetch_details(query).await;
        guard.disarm();
        self.session.finish_add(query, result)
    }

    /// Run an add on the runtime without keeping the session alive.
    ///
    /// If every handle to the manager is dropped before the lookup finishes,
    /// the result is discarded and the task yields `None`. Must be called
    /// from within a tokio runtime.
    pub fn spawn_add(&self, query: &str) -> JoinHandle<Option<AddOutcome>> {
        let query = query.trim().to_string();
        if let Err(outcome) = self.session.begin_add(&query) {
            return tokio::spawn(async move { Some(outcome) });
        }

        let session = Arc::downgrade(&self.session);
        let enricher = Arc::clone(&self.session.enricher);
        tokio::spawn(async move {
            let result = enricher.fetch_details(&query).await;
            match session.upgrade() {
                Some(session) => Some(session.finish_add(&query, result)),
                None => {
                    debug!("Session closed before lookup of {:?} finished, discarding result", query);
                    None
                }
            }
        })
    }

    /// Returns false when `id` is unknown
    pub fn set_status(&self, id: &str, status: WatchStatus) -> bool {
        let mut state = self.session.lock();
        let Some(item) = state.find_mut(id) else {
            debug!("set_status: unknown id {}", id);
            return false;
        };
        item.status = status;
        state.notice = Some(Notice::success(format!("Moved to: {}", status)));

        self.session.persist(&state);
        drop(state);
        self.session.notify();
        true
    }

    /// Returns Ok(false) when `id` is unknown
    pub fn set_rating(&self, id: &str, rating: u8) -> Result<bool, CollectionError> {
        let rating = UserRating::new(rating).ok_or(CollectionError::InvalidRating(rating))?;

        let mut state = self.session.lock();
        let Some(item) = state.find_mut(id) else {
            debug!("set_rating: unknown id {}", id);
            return Ok(false);
        };
        item.user_rating = Some(rating);

        self.session.persist(&state);
        drop(state);
        self.session.notify();
        Ok(true)
    }

    /// Stage `id` for removal. Nothing is removed until `confirm_delete`.
    pub fn request_delete(&self, id: &str) -> bool {
        let mut state = self.session.lock();
        if state.find(id).is_none() {
            debug!("request_delete: unknown id {}", id);
            return false;
        }
        state.pending_delete = Some(id.to_string());
        drop(state);
        self.session.notify();
        true
    }

    /// Remove the staged item, if any
    pub fn confirm_delete(&self) -> Option<MediaItem> {
        let mut state = self.session.lock();
        let id = state.pending_delete.take()?;

        let removed = match state.items.iter().position(|item| item.id == id) {
            Some(index) => {
                let item = state.items.remove(index);
                state.notice = Some(Notice::success(format!("Removed: {}", item.title)));
                self.session.persist(&state);
                Some(item)
            }
            None => {
                debug!("Pending delete {} no longer in collection", id);
                None
            }
        };

        drop(state);
        self.session.notify();
        removed
    }

    pub fn cancel_delete(&self) {
        let mut state = self.session.lock();
        if state.pending_delete.take().is_some() {
            drop(state);
            self.session.notify();
        }
    }

    /// The item awaiting delete confirmation
    pub fn pending_delete(&self) -> Option<MediaItem> {
        let state = self.session.lock();
        let id = state.pending_delete.as_deref()?;
        state.find(id).cloned()
    }

    pub fn set_tab(&self, tab: WatchStatus) {
        self.session.lock().tab = tab;
        self.session.notify();
    }

    pub fn set_filter(&self, filter: &str) {
        self.session.lock().filter = filter.trim().to_string();
        self.session.notify();
    }

    pub fn tab(&self) -> WatchStatus {
        self.session.lock().tab
    }

    pub fn filter(&self) -> String {
        self.session.lock().filter.clone()
    }

    /// View for the current tab and filter
    pub fn current_view(&self) -> DerivedView {
        let state = self.session.lock();
        derive_view(&state.items, state.tab, &state.filter)
    }

    pub fn derived_view(&self, tab: WatchStatus, filter: &str) -> DerivedView {
        derive_view(&self.session.lock().items, tab, filter)
    }

    /// Snapshot of the whole collection, newest first
    pub fn items(&self) -> Vec<MediaItem> {
        self.session.lock().items.clone()
    }

    pub fn get(&self, id: &str) -> Option<MediaItem> {
        self.session.lock().find(id).cloned()
    }

    pub fn len(&self) -> usize {
        self.session.lock().items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn is_busy(&self) -> bool {
        self.session.lock().busy
    }

    pub fn notice(&self) -> Option<Notice> {
        self.session.lock().notice.clone()
    }

    pub fn take_notice(&self) -> Option<Notice> {
        self.session.lock().notice.take()
    }

    /// Revision counter bumped after every state change
    pub fn subscribe(&self) -> watch::Receiver<u64> {
        self.session.revision.subscribe()
    }
}

struct BusyGuard<'a> {
    session: &'a Session,
    armed: bool,
}

impl<'a> BusyGuard<'a> {
    fn new(session: &'a Session) -> Self {
        Self { session, armed: true }
    }

    fn disarm(mut self) {
        self.armed = false;
    }
}

impl Drop for BusyGuard<'_> {
    fn drop(&mut self) {
        if !self.armed {
            return;
        }
        debug!("Add abandoned before the lookup finished, clearing busy flag");
        self.session.lock().busy = false;
        self.session.notify();
    }
}

impl Session {
    fn lock(&self) -> MutexGuard<'_, CollectionState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn notify(&self) {
        self.revision.send_modify(|revision| *revision += 1);
    }

    fn persist(&self, state: &CollectionState) {
        if let Err(e) = self.store.save(&state.items) {
            error!("Failed to persist collection ({} items): {}", state.items.len(), e);
        }
    }

    /// Validate an add request and mark the session busy
    fn begin_add(&self, query: &str) -> Result<(), AddOutcome> {
        if query.is_empty() {
            return Err(AddOutcome::EmptyQuery);
        }

        let mut state = self.lock();
        let rejected = if state.busy {
            debug!("Add of {:?} rejected: another lookup is in flight", query);
            state.notice = Some(Notice::info(BUSY_MESSAGE));
            Some(AddOutcome::Busy)
        } else if let Some(title) = state.existing_title(query) {
            debug!("Add of {:?} rejected: already tracked as {:?}", query, title);
            state.notice = Some(Notice::info(format!("\"{}\" is already in your list.", title)));
            Some(AddOutcome::Duplicate { title })
        } else {
            state.busy = true;
            None
        };
        drop(state);

        self.notify();
        rejected.map_or(Ok(()), Err)
    }

    fn finish_add(&self, query: &str, result: Result<MediaDetails, EnrichmentError>) -> AddOutcome {
        let mut state = self.lock();
        state.busy = false;

        let outcome = match result {
            Err(e) => {
                match &e {
                    EnrichmentError::MissingCredential => {
                        warn!("Cannot look up {:?}: {}", query, e)
                    }
                    _ => error!(
                        "Failed to fetch details for {:?} from {}: {}",
                        query,
                        self.enricher.service_name(),
                        e
                    ),
                }
                state.notice = Some(Notice::error(FETCH_FAILED_MESSAGE));
                AddOutcome::Failed
            }
            Ok(details) => match state.existing_title(&details.title) {
                Some(title) => {
                    debug!("{:?} resolved to {:?}, which is already tracked", query, title);
                    state.notice = Some(Notice::info(format!("\"{}\" is already in your list.", title)));
                    AddOutcome::Duplicate { title }
                }
                None => {
                    let item = MediaItem::from_details(state.fresh_id(), details);
                    info!("Added {:?} ({}) as {}", item.title, item.year, item.id);

                    state.items.insert(0, item.clone());
                    state.filter.clear();
                    state.notice = Some(Notice::success(format!("Added: {}", item.title)));
                    self.persist(&state);
                    AddOutcome::Added(item)
                }
            },
        };
        drop(state);

        self.notify();
        outcome
    }
}
