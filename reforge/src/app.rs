//! Top-level application state: the live enhanced text and the history list.
//!
//! [`App`] owns both explicitly (no ambient globals) and is passed to the
//! streaming and recording routines. Overlapping runs are not guarded
//! against: a second submission races the first on the live text and on the
//! store, last writer wins.

use crate::client::{EnhanceClient, FragmentStream, TransportError};
use chrono::Utc;
use history::{HistoryEntry, HistoryStore, StoreError};
use instruct::EnhancementRequest;
use tokio::sync::watch;
use tracing::warn;

pub struct App {
    client: EnhanceClient,
    store: Box<dyn HistoryStore>,
    history: Vec<HistoryEntry>,
    live: watch::Sender<String>,
}

impl App {
    /// Load prior history from `store`; an unavailable store degrades to an
    /// empty list rather than failing startup.
    pub fn new(client: EnhanceClient, store: Box<dyn HistoryStore>) -> Self {
        let history = store.load().unwrap_or_else(|e| {
            warn!("history store unavailable, starting empty: {e}");
            Vec::new()
        });
        let (live, _) = watch::channel(String::new());
        Self {
            client,
            store,
            history,
            live,
        }
    }

    /// Observe the current enhanced text as it accumulates.
    pub fn live_text(&self) -> watch::Receiver<String> {
        self.live.subscribe()
    }

    /// Recorded rewrites, most-recent-first.
    pub fn history(&self) -> &[HistoryEntry] {
        &self.history
    }

    /// Run one enhancement to completion and record it.
    pub async fn enhance(
        &mut self,
        request: &EnhancementRequest,
    ) -> Result<HistoryEntry, TransportError> {
        self.enhance_with(request, |_| {}).await
    }

    /// Like [`App::enhance`], invoking `on_fragment` for each arriving piece.
    pub async fn enhance_with(
        &mut self,
        request: &EnhancementRequest,
        on_fragment: impl FnMut(&str),
    ) -> Result<HistoryEntry, TransportError> {
        let stream = self.client.open(request).await?;
        self.consume_stream(request, stream, on_fragment).await
    }

    /// Drive an already-open fragment stream to completion.
    ///
    /// The live text grows monotonically by concatenation while the stream
    /// runs. Only natural completion produces a history entry; on error the
    /// partial live text is left as-is (documented policy: no rollback) and
    /// history is untouched.
    pub async fn consume_stream(
        &mut self,
        request: &EnhancementRequest,
        mut stream: FragmentStream,
        mut on_fragment: impl FnMut(&str),
    ) -> Result<HistoryEntry, TransportError> {
        self.live.send_replace(String::new());
        let mut accumulated = String::new();
        while let Some(fragment) = stream.next_fragment().await? {
            accumulated.push_str(&fragment);
            self.live.send_replace(accumulated.clone());
            on_fragment(&fragment);
        }

        let entry = HistoryEntry {
            raw_prompt: request.raw_prompt.clone(),
            enhanced_text: accumulated,
            created_at: Utc::now(),
        };
        self.history.insert(0, entry.clone());
        // The whole list is rewritten, so a re-run of the same completed
        // stream is idempotent. A failed write loses nothing in memory.
        if let Err(e) = self.store.save(&self.history) {
            warn!("failed to persist history: {e}");
        }
        Ok(entry)
    }

    /// Empty the in-memory list and the persistent store together.
    pub fn clear_history(&mut self) -> Result<(), StoreError> {
        self.history.clear();
        self.store.save(&self.history)
    }
}
