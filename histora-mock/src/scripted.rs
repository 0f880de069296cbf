use std::collections::{HashMap, VecDeque};
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::Mutex;

use histora_core::{Granularity, HistoraError, HistoryProvider, Page, PageRequest, QuoteCurrency};

/// How one scripted call should behave.
#[derive(Debug, Clone)]
pub enum MockBehavior<T> {
    /// Return the provided value immediately.
    Return(T),
    /// Fail immediately with the provided error.
    Fail(HistoraError),
    /// Hang indefinitely (simulate a stalled request).
    Hang,
}

#[derive(Default)]
struct InternalState {
    queues: HashMap<String, VecDeque<MockBehavior<Page>>>,
    requests: Vec<PageRequest>,
}

/// Handle used by tests to queue responses and inspect the request log.
#[derive(Clone)]
pub struct ScriptController {
    state: Arc<Mutex<InternalState>>,
}

impl ScriptController {
    /// Queue one behavior for the next unanswered call for `symbol`.
    pub async fn push(&self, symbol: &str, behavior: MockBehavior<Page>) {
        let mut guard = self.state.lock().await;
        guard
            .queues
            .entry(symbol.to_string())
            .or_default()
            .push_back(behavior);
    }

    /// Queue successful pages for `symbol`, answered in order.
    pub async fn push_pages(&self, symbol: &str, pages: impl IntoIterator<Item = Page>) {
        let mut guard = self.state.lock().await;
        let queue = guard.queues.entry(symbol.to_string()).or_default();
        queue.extend(pages.into_iter().map(MockBehavior::Return));
    }

    /// Every request received so far, in arrival order.
    pub async fn requests(&self) -> Vec<PageRequest> {
        self.state.lock().await.requests.clone()
    }

    /// Requests received for one symbol, in arrival order.
    pub async fn requests_for(&self, symbol: &str) -> Vec<PageRequest> {
        let guard = self.state.lock().await;
        guard
            .requests
            .iter()
            .filter(|r| r.symbol == symbol)
            .cloned()
            .collect()
    }

    /// Number of queued behaviors not yet consumed for `symbol`.
    pub async fn remaining(&self, symbol: &str) -> usize {
        let guard = self.state.lock().await;
        guard.queues.get(symbol).map_or(0, VecDeque::len)
    }

    /// Clear all queued behaviors and the request log.
    pub async fn clear(&self) {
        let mut guard = self.state.lock().await;
        guard.queues.clear();
        guard.requests.clear();
    }
}

/// A connector that answers from per-symbol queues filled by a [`ScriptController`].
///
/// A call for a symbol whose queue is empty fails with a `Provider` error.
pub struct ScriptedConnector {
    name: &'static str,
    granularity: Granularity,
    quote: QuoteCurrency,
    page_cap: u32,
    state: Arc<Mutex<InternalState>>,
}

impl ScriptedConnector {
    /// Create a scripted connector and its controller.
    #[must_use]
    pub fn new_with_controller(
        name: &'static str,
        granularity: Granularity,
        quote: QuoteCurrency,
        page_cap: u32,
    ) -> (Arc<dyn HistoryProvider>, ScriptController) {
        let state = Arc::new(Mutex::new(InternalState::default()));
        let controller = ScriptController {
            state: Arc::clone(&state),
        };
        let me = Arc::new(Self {
            name,
            granularity,
            quote,
            page_cap,
            state,
        });
        (me as Arc<dyn HistoryProvider>, controller)
    }
}

#[async_trait]
impl HistoryProvider for ScriptedConnector {
    fn name(&self) -> &'static str {
        self.name
    }

    fn vendor(&self) -> &'static str {
        "ScriptedMock"
    }

    fn granularity(&self) -> Granularity {
        self.granularity
    }

    fn quote(&self) -> QuoteCurrency {
        self.quote
    }

    fn page_cap(&self) -> u32 {
        self.page_cap
    }

    async fn fetch_page(&self, req: PageRequest) -> Result<Page, HistoraError> {
        // Take the behavior without holding the lock across the await below
        let behavior = {
            let mut guard = self.state.lock().await;
            guard.requests.push(req.clone());
            guard
                .queues
                .get_mut(&req.symbol)
                .and_then(VecDeque::pop_front)
        };

        match behavior {
            Some(MockBehavior::Return(page)) => Ok(page),
            Some(MockBehavior::Fail(e)) => Err(e),
            Some(MockBehavior::Hang) => {
                std::future::pending::<()>().await;
                unreachable!()
            }
            None => Err(HistoraError::provider(
                self.name,
                req.symbol,
                "no scripted response",
            )),
        }
    }
}
