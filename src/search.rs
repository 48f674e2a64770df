//! Debounced location search
//!
//! Free-text queries are funneled through a channel and debounced for a
//! fixed delay before the geocoding lookup is issued. A newer query
//! supersedes the pending one and restarts the delay; an empty query clears
//! results immediately without querying the provider.

use std::time::Duration;
use tokio::sync::mpsc;

use crate::data::{OpenWeatherClient, SearchResult};

/// Messages sent from the search task to the dashboard
#[derive(Debug, Clone)]
pub enum SearchMessage {
    /// Search completed for a query
    Results {
        /// The query the results belong to
        query: String,
        /// Matching places
        results: Vec<SearchResult>,
    },
    /// The geocoding lookup failed; retry by typing again
    SearchError(String),
    /// An empty query cleared the result list
    Cleared,
}

/// Configuration for the search debounce
#[derive(Debug, Clone)]
pub struct SearchConfig {
    /// How long a query must sit unchanged before the lookup fires
    pub debounce: Duration,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            debounce: Duration::from_millis(500),
        }
    }
}

/// Handle for submitting queries to the background search task
pub struct SearchHandle {
    /// Channel for receiving search messages
    pub receiver: mpsc::Receiver<SearchMessage>,
    /// Channel for submitting queries
    query_tx: mpsc::Sender<String>,
    /// Flag to signal shutdown
    shutdown_tx: mpsc::Sender<()>,
}

impl SearchHandle {
    /// Spawns the background search task
    ///
    /// # Arguments
    /// * `client` - Provider client used for geocoding lookups
    /// * `config` - Debounce configuration
    ///
    /// # Returns
    /// A SearchHandle that receives results via the `receiver` channel
    pub fn spawn(client: OpenWeatherClient, config: SearchConfig) -> Self {
        let (msg_tx, msg_rx) = mpsc::channel(32);
        let (query_tx, mut query_rx) = mpsc::channel::<String>(32);
        let (shutdown_tx, mut shutdown_rx) = mpsc::channel::<()>(1);

        tokio::spawn(async move {
            // The query currently waiting out its debounce delay
            let mut pending: Option<String> = None;

            loop {
                if let Some(query) = pending.take() {
                    tokio::select! {
                        newer = query_rx.recv() => {
                            match newer {
                                Some(newer) => {
                                    pending = accept_query(newer, &msg_tx).await;
                                }
                                None => break,
                            }
                        }
                        _ = tokio::time::sleep(config.debounce) => {
                            match client.search_locations(&query).await {
                                Ok(results) => {
                                    let _ = msg_tx
                                        .send(SearchMessage::Results { query, results })
                                        .await;
                                }
                                Err(e) => {
                                    let _ = msg_tx
                                        .send(SearchMessage::SearchError(e.to_string()))
                                        .await;
                                }
                            }
                        }
                        _ = shutdown_rx.recv() => break,
                    }
                } else {
                    tokio::select! {
                        newer = query_rx.recv() => {
                            match newer {
                                Some(newer) => {
                                    pending = accept_query(newer, &msg_tx).await;
                                }
                                None => break,
                            }
                        }
                        _ = shutdown_rx.recv() => break,
                    }
                }
            }
        });

        Self {
            receiver: msg_rx,
            query_tx,
            shutdown_tx,
        }
    }

    /// Submits a query, superseding any pending one
    pub async fn submit(&self, query: impl Into<String>) {
        let _ = self.query_tx.send(query.into()).await;
    }

    /// Shuts down the background search task
    pub async fn shutdown(self) {
        let _ = self.shutdown_tx.send(()).await;
    }
}

/// Decides what to do with a newly submitted query
///
/// Empty queries clear results immediately and leave nothing pending;
/// non-empty queries become the new pending query.
async fn accept_query(query: String, msg_tx: &mpsc::Sender<SearchMessage>) -> Option<String> {
    if query.trim().is_empty() {
        let _ = msg_tx.send(SearchMessage::Cleared).await;
        None
    } else {
        Some(query)
    }
}

/// Checks for pending search messages without blocking
///
/// # Arguments
/// * `handle` - The SearchHandle to check
///
/// # Returns
/// * `Some(SearchMessage)` if a message was available
/// * `None` if no messages are pending
pub fn try_recv(handle: &mut SearchHandle) -> Option<SearchMessage> {
    handle.receiver.try_recv().ok()
}
