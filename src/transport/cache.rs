//! Lazily populated cache of per-destination senders.
//!
//! Guarantees at most one [`DestinationSender`] per distinct DSN even under
//! concurrent first use: construction happens while the map lock is held,
//! so racing callers observe the same instance. Senders are never evicted
//! during normal operation; `close_all` empties the cache but leaves it
//! usable for fresh sends.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;

use crate::error::PatchbayError;
use crate::server::HttpClient;
use crate::transport::sender::DestinationSender;

pub struct SenderCache {
    client: HttpClient,
    senders: Mutex<HashMap<String, Arc<DestinationSender>>>,
}

impl SenderCache {
    #[must_use]
    pub fn new(client: HttpClient) -> Self {
        Self {
            client,
            senders: Mutex::new(HashMap::new()),
        }
    }

    /// Atomic get-or-create. Sender construction is pure parsing, so doing
    /// it under the lock is cheap and gives the at-most-one guarantee; a
    /// malformed DSN fails here, before any send is attempted.
    pub fn get_or_create(&self, dsn: &str) -> Result<Arc<DestinationSender>, PatchbayError> {
        let mut senders = self.senders.lock().unwrap_or_else(PoisonError::into_inner);

        if let Some(sender) = senders.get(dsn) {
            return Ok(Arc::clone(sender));
        }

        let sender = Arc::new(DestinationSender::new(dsn, self.client.clone())?);
        senders.insert(dsn.to_string(), Arc::clone(&sender));
        tracing::debug!(destination = %sender.masked_dsn(), "created sender");
        Ok(sender)
    }

    /// Forward a flush request to every cached sender.
    pub fn flush_all(&self, timeout: Duration) {
        for sender in self.snapshot() {
            sender.flush(timeout);
        }
    }

    /// Close every cached sender and empty the cache. Subsequent
    /// `get_or_create` calls will create fresh senders.
    pub fn close_all(&self) {
        let drained: Vec<Arc<DestinationSender>> = {
            let mut senders = self.senders.lock().unwrap_or_else(PoisonError::into_inner);
            senders.drain().map(|(_, sender)| sender).collect()
        };
        for sender in drained {
            sender.close();
        }
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.senders
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn snapshot(&self) -> Vec<Arc<DestinationSender>> {
        self.senders
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .values()
            .map(Arc::clone)
            .collect()
    }
}
