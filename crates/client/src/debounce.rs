//! Debounced calls for search-as-you-type.

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use pickleball_core::groups::normalize_search_query;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

use crate::api::MemberSearch;
use crate::models::{GroupMember, Id};

/// Quiet interval used by [`GroupSearch`].
pub const SEARCH_DEBOUNCE: Duration = Duration::from_millis(300);

/// Runs only the most recent of a burst of calls.
///
/// Each [`call`](Self::call) cancels whatever is pending, including a call
/// that already started, and schedules the new one after the quiet
/// interval. At most one call runs per debouncer.
pub struct Debouncer {
    delay: Duration,
    pending: Option<(CancellationToken, JoinHandle<()>)>,
}

impl Debouncer {
    pub fn new(delay: Duration) -> Self {
        Self {
            delay,
            pending: None,
        }
    }

    /// Schedule `task` to run after the quiet interval, replacing any
    /// pending call.
    pub fn call<F>(&mut self, task: F)
    where
        F: Future<Output = ()> + Send + 'static,
    {
        self.cancel();

        let token = CancellationToken::new();
        let cancelled = token.clone();
        let delay = self.delay;
        let handle = tokio::spawn(async move {
            tokio::select! {
                () = cancelled.cancelled() => {}
                () = tokio::time::sleep(delay) => task.await,
            }
        });
        self.pending = Some((token, handle));
    }

    /// Drop the pending call, if any.
    pub fn cancel(&mut self) {
        if let Some((token, handle)) = self.pending.take() {
            token.cancel();
            handle.abort();
        }
    }

    /// Whether a scheduled call has not finished yet.
    pub fn is_pending(&self) -> bool {
        self.pending
            .as_ref()
            .is_some_and(|(_, handle)| !handle.is_finished())
    }
}

impl Drop for Debouncer {
    fn drop(&mut self) {
        self.cancel();
    }
}

/// Search-as-you-type over a group's members.
///
/// Results are published on a [`watch`] channel; a blank query clears them
/// immediately without a request.
pub struct GroupSearch<S> {
    api: Arc<S>,
    group_id: Id,
    debouncer: Debouncer,
    results: watch::Sender<Vec<GroupMember>>,
}

impl<S> GroupSearch<S>
where
    S: MemberSearch + Send + Sync + 'static,
{
    pub fn new(api: Arc<S>, group_id: Id) -> Self {
        Self::with_delay(api, group_id, SEARCH_DEBOUNCE)
    }

    pub fn with_delay(api: Arc<S>, group_id: Id, delay: Duration) -> Self {
        let (results, _) = watch::channel(Vec::new());
        Self {
            api,
            group_id,
            debouncer: Debouncer::new(delay),
            results,
        }
    }

    /// Receiver that sees every published result set.
    pub fn subscribe(&self) -> watch::Receiver<Vec<GroupMember>> {
        self.results.subscribe()
    }

    /// Feed the current contents of the search box.
    pub fn input(&mut self, query: &str) {
        let Some(query) = normalize_search_query(Some(query)) else {
            self.debouncer.cancel();
            self.results.send_replace(Vec::new());
            return;
        };

        let api = Arc::clone(&self.api);
        let group_id = self.group_id;
        let results = self.results.clone();
        self.debouncer.call(async move {
            match api.search_members(group_id, &query).await {
                Ok(members) => {
                    results.send_replace(members);
                }
                Err(err) => {
                    tracing::warn!(group_id, error = %err, "Member search failed");
                }
            }
        });
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Mutex;

    use super::*;
    use crate::error::ClientError;

    #[tokio::test(start_paused = true)]
    async fn only_the_last_call_runs() {
        let runs = Arc::new(AtomicUsize::new(0));
        let last = Arc::new(Mutex::new(0));
        let mut debouncer = Debouncer::new(Duration::from_millis(100));

        for i in 1..=3 {
            let runs = Arc::clone(&runs);
            let last = Arc::clone(&last);
            debouncer.call(async move {
                runs.fetch_add(1, Ordering::SeqCst);
                *last.lock().unwrap() = i;
            });
            tokio::time::sleep(Duration::from_millis(50)).await;
        }
        assert!(debouncer.is_pending());

        tokio::time::sleep(Duration::from_millis(200)).await;

        assert_eq!(runs.load(Ordering::SeqCst), 1);
        assert_eq!(*last.lock().unwrap(), 3);
        assert!(!debouncer.is_pending());
    }

    #[tokio::test(start_paused = true)]
    async fn cancel_drops_the_pending_call() {
        let runs = Arc::new(AtomicUsize::new(0));
        let mut debouncer = Debouncer::new(Duration::from_millis(100));

        let counter = Arc::clone(&runs);
        debouncer.call(async move {
            counter.fetch_add(1, Ordering::SeqCst);
        });
        debouncer.cancel();
        tokio::time::sleep(Duration::from_millis(200)).await;

        assert_eq!(runs.load(Ordering::SeqCst), 0);
    }

    struct FakeSearch {
        calls: Mutex<Vec<String>>,
    }

    impl MemberSearch for FakeSearch {
        async fn search_members(
            &self,
            _group_id: Id,
            query: &str,
        ) -> Result<Vec<GroupMember>, ClientError> {
            self.calls.lock().unwrap().push(query.to_string());
            Ok(vec![GroupMember {
                id: 1,
                email: "alex@test.com".into(),
                name: Some(query.to_string()),
                photo_url: None,
                is_guest: false,
            }])
        }
    }

    #[tokio::test(start_paused = true)]
    async fn group_search_sends_one_request_per_burst() {
        let api = Arc::new(FakeSearch {
            calls: Mutex::new(Vec::new()),
        });
        let mut search = GroupSearch::new(Arc::clone(&api), 5);
        let rx = search.subscribe();

        for prefix in ["a", "al", "ale"] {
            search.input(prefix);
            tokio::time::sleep(Duration::from_millis(50)).await;
        }
        tokio::time::sleep(SEARCH_DEBOUNCE * 2).await;

        assert_eq!(*api.calls.lock().unwrap(), ["ale"]);
        assert_eq!(rx.borrow()[0].name.as_deref(), Some("ale"));

        search.input("   ");
        assert!(rx.borrow().is_empty());
    }
}
