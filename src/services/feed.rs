use serde::Serialize;
use std::sync::{mpsc, Arc, Mutex, MutexGuard};
use std::thread::JoinHandle;
use tracing::{error, info};

use crate::error::FeedError;
use crate::i18n::{translate, Language};
use crate::models::Invoice;
use crate::services::normalizer::Normalizer;
use crate::store::{SnapshotEvent, StoreError};

/// What the view layer renders: the invoices of the latest snapshot and the
/// last store error, if any.
#[derive(Debug, Clone, Default, Serialize)]
pub struct FeedState {
    pub invoices: Vec<Invoice>,
    pub error: Option<String>,
    pub revision: u64,
}

/// Holds the normalized result of the live invoice query. Every snapshot
/// replaces the previous one wholesale.
#[derive(Debug, Clone)]
pub struct InvoiceFeed {
    state: Arc<Mutex<FeedState>>,
    language: Language,
}

impl InvoiceFeed {
    pub fn new(language: Language) -> Self {
        InvoiceFeed {
            state: Arc::new(Mutex::new(FeedState::default())),
            language,
        }
    }

    /// Applies events on a background thread until every sender is dropped.
    pub fn listen(&self, rx: mpsc::Receiver<SnapshotEvent>) -> JoinHandle<()> {
        let feed = self.clone();
        std::thread::spawn(move || {
            for event in rx {
                if let Err(err) = feed.apply(event) {
                    error!("Invoice feed stopped: {}", err);
                    return;
                }
            }
            info!("Invoice feed unsubscribed");
        })
    }

    pub fn apply(&self, event: SnapshotEvent) -> Result<(), FeedError> {
        match event {
            SnapshotEvent::Records(records) => {
                let invoices = Normalizer::new().normalize(&records);
                let mut state = self.lock()?;
                state.invoices = invoices;
                state.error = None;
                state.revision += 1;
            }
            SnapshotEvent::Failed(err) => {
                error!("Error fetching invoices from the live query: {}", err);
                let message = self.message_for(&err);
                let mut state = self.lock()?;
                state.error = Some(message);
                state.revision += 1;
            }
        }
        Ok(())
    }

    pub fn current(&self) -> Result<FeedState, FeedError> {
        Ok(self.lock()?.clone())
    }

    /// Drops everything held for the view, as on component teardown.
    pub fn teardown(&self) -> Result<(), FeedError> {
        *self.lock()? = FeedState::default();
        Ok(())
    }

    fn message_for(&self, err: &StoreError) -> String {
        translate(self.language, err.message_key()).to_string()
    }

    fn lock(&self) -> Result<MutexGuard<'_, FeedState>, FeedError> {
        self.state.lock().map_err(|_| FeedError::LockPoisoned)
    }
}
