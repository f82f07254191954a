pub mod cache;
pub mod debounce;
pub mod picker;

pub use cache::DirectoryCache;
pub use debounce::Debouncer;
pub use picker::{PickerPanel, PickerState};

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use tokio::task::JoinHandle;

use crate::client::types::{GroupSummary, PageRequest, RoleSummary, UserSummary};
use crate::client::{AdminApi, ClientError};
use crate::config::{DirectoryConfig, CONFIG};
use crate::filter::filter_prefix;
use crate::types::PrincipalKind;

/// Per-kind outcome of the initial bulk load: entry count on success, `None`
/// for a kind whose request failed and whose cache was emptied.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LoadReport {
    pub users: Option<usize>,
    pub groups: Option<usize>,
    pub roles: Option<usize>,
}

impl LoadReport {
    pub fn all_loaded(&self) -> bool {
        self.users.is_some() && self.groups.is_some() && self.roles.is_some()
    }
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

/// The searchable principal directory backing the grant pickers.
///
/// Owns the deduplicated cache and per-kind picker state along with the
/// debounce machinery for remote searches. The cache only grows for the
/// lifetime of the session: bulk loads seed it and debounced search merges
/// append to it; entries are never pruned. Merges run on spawned tasks,
/// which is the one reason cache and pickers sit behind mutexes.
pub struct PrincipalDirectory {
    api: Arc<dyn AdminApi>,
    cache: Arc<Mutex<DirectoryCache>>,
    pickers: Arc<Mutex<PickerPanel>>,
    debouncer: Debouncer<PrincipalKind>,
    config: DirectoryConfig,
}

impl PrincipalDirectory {
    pub fn new(api: Arc<dyn AdminApi>) -> Self {
        Self::with_config(api, CONFIG.directory.clone())
    }

    pub fn with_config(api: Arc<dyn AdminApi>, config: DirectoryConfig) -> Self {
        let debouncer = Debouncer::new(Duration::from_millis(config.search_debounce_ms));
        Self {
            api,
            cache: Arc::new(Mutex::new(DirectoryCache::new())),
            pickers: Arc::new(Mutex::new(PickerPanel::new())),
            debouncer,
            config,
        }
    }

    /// Fetch the first page of each principal kind concurrently. A kind whose
    /// request fails ends up with an empty collection; the other kinds keep
    /// their results.
    pub async fn load_initial(&self) -> LoadReport {
        let request = PageRequest::first(self.config.initial_load_size);
        let (users, groups, roles) = tokio::join!(
            self.api.list_users(&request),
            self.api.list_groups(&request),
            self.api.list_roles(&request),
        );

        let mut cache = lock(&self.cache);
        let report = LoadReport {
            users: match users {
                Ok(entries) => Some(cache.replace_users(entries)),
                Err(err) => {
                    tracing::warn!(error = %err, "user directory load failed; collection emptied");
                    cache.clear(PrincipalKind::User);
                    None
                }
            },
            groups: match groups {
                Ok(entries) => Some(cache.replace_groups(entries)),
                Err(err) => {
                    tracing::warn!(error = %err, "group directory load failed; collection emptied");
                    cache.clear(PrincipalKind::Group);
                    None
                }
            },
            roles: match roles {
                Ok(entries) => Some(cache.replace_roles(entries)),
                Err(err) => {
                    tracing::warn!(error = %err, "role directory load failed; collection emptied");
                    cache.clear(PrincipalKind::Role);
                    None
                }
            },
        };
        drop(cache);

        if self.config.debug_logging {
            tracing::debug!(?report, "initial directory load finished");
        }
        report
    }

    /// Schedule the debounced remote search for a kind.
    ///
    /// Returns `None` without scheduling when the trimmed query is shorter
    /// than the configured minimum; dropping under that gate also withdraws
    /// any search still pending for the kind. The returned handle resolves to
    /// whether this particular schedule survived the debounce window.
    pub fn search(&self, kind: PrincipalKind, query: &str) -> Option<JoinHandle<bool>> {
        let trimmed = query.trim();
        if trimmed.chars().count() < self.config.min_search_length {
            self.debouncer.cancel(&kind);
            return None;
        }

        let query = trimmed.to_string();
        let api = Arc::clone(&self.api);
        let cache = Arc::clone(&self.cache);
        let pickers = Arc::clone(&self.pickers);
        let request = PageRequest::search(self.config.search_page_size, query.clone());
        let debug_logging = self.config.debug_logging;

        Some(self.debouncer.schedule(kind, move || async move {
            lock(&pickers).begin_search(kind);
            let merged = match kind {
                PrincipalKind::User => match api.list_users(&request).await {
                    Ok(entries) => Ok(lock(&cache).merge_users(entries)),
                    Err(err) => Err(err),
                },
                PrincipalKind::Group => match api.list_groups(&request).await {
                    Ok(entries) => Ok(lock(&cache).merge_groups(entries)),
                    Err(err) => Err(err),
                },
                PrincipalKind::Role => match api.list_roles(&request).await {
                    Ok(entries) => Ok(lock(&cache).merge_roles(entries)),
                    Err(err) => Err(err),
                },
            };
            match merged {
                Ok(added) => {
                    if debug_logging {
                        tracing::debug!(kind = %kind, query = %query, added, "directory search merged");
                    }
                }
                Err(err) => {
                    tracing::warn!(kind = %kind, query = %query, error = %err, "directory search failed; cache unchanged");
                }
            }
            lock(&pickers).finish_search(kind);
        }))
    }

    /// Record typed input for a kind's picker, scheduling the remote search
    /// when the query passes the length gate.
    pub fn input(&self, kind: PrincipalKind, text: &str) -> Option<JoinHandle<bool>> {
        lock(&self.pickers).set_query(kind, text);
        self.search(kind, text)
    }

    /// Immediate search and merge, skipping the debounce. The CLI's one-shot
    /// path; interactive input goes through [`PrincipalDirectory::input`].
    pub async fn search_now(&self, kind: PrincipalKind, query: &str) -> Result<usize, ClientError> {
        let request = PageRequest::search(self.config.search_page_size, query.trim());
        match kind {
            PrincipalKind::User => {
                let entries = self.api.list_users(&request).await?;
                Ok(lock(&self.cache).merge_users(entries))
            }
            PrincipalKind::Group => {
                let entries = self.api.list_groups(&request).await?;
                Ok(lock(&self.cache).merge_groups(entries))
            }
            PrincipalKind::Role => {
                let entries = self.api.list_roles(&request).await?;
                Ok(lock(&self.cache).merge_roles(entries))
            }
        }
    }

    pub fn filter_users(&self, query: &str) -> Vec<UserSummary> {
        let cache = lock(&self.cache);
        filter_prefix(cache.users(), query).into_iter().cloned().collect()
    }

    pub fn filter_groups(&self, query: &str) -> Vec<GroupSummary> {
        let cache = lock(&self.cache);
        filter_prefix(cache.groups(), query).into_iter().cloned().collect()
    }

    pub fn filter_roles(&self, query: &str) -> Vec<RoleSummary> {
        let cache = lock(&self.cache);
        filter_prefix(cache.roles(), query).into_iter().cloned().collect()
    }

    pub fn users(&self) -> Vec<UserSummary> {
        lock(&self.cache).users().to_vec()
    }

    pub fn groups(&self) -> Vec<GroupSummary> {
        lock(&self.cache).groups().to_vec()
    }

    pub fn roles(&self) -> Vec<RoleSummary> {
        lock(&self.cache).roles().to_vec()
    }

    pub fn cached_count(&self, kind: PrincipalKind) -> usize {
        lock(&self.cache).len(kind)
    }

    pub fn focus(&self, kind: PrincipalKind) {
        lock(&self.pickers).focus(kind);
    }

    /// A principal was picked from this kind's dropdown: the input clears
    /// and the dropdown closes; any pending search for it is withdrawn.
    pub fn select(&self, kind: PrincipalKind) {
        self.debouncer.cancel(&kind);
        lock(&self.pickers).select(kind);
    }

    /// Outside interaction: close whichever dropdown is open. Input text and
    /// pending searches stay; only visibility changes.
    pub fn dismiss_all(&self) {
        lock(&self.pickers).dismiss_all();
    }

    pub fn picker_state(&self, kind: PrincipalKind) -> PickerState {
        lock(&self.pickers).state(kind)
    }

    pub fn picker_query(&self, kind: PrincipalKind) -> String {
        lock(&self.pickers).query(kind).to_string()
    }

    pub fn open_picker(&self) -> Option<PrincipalKind> {
        lock(&self.pickers).open_kind()
    }

    /// Back to the pristine picker state, withdrawing all pending searches.
    /// The cache is left alone; it lives for the session.
    pub fn reset_pickers(&self) {
        self.debouncer.cancel_all();
        lock(&self.pickers).reset();
    }
}
