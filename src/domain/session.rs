//! Completion handle and ownership slot for one impression-tracking attempt.

use tokio::sync::watch;

/// Completion handle for one impression-tracking attempt.
///
/// Clones share the same settlement, so any number of readers can await one
/// attempt. The session never reports an error: a tracking attempt always
/// completes, possibly with no visible effect.
#[derive(Debug, Clone)]
pub struct TrackingSession {
    settled: watch::Receiver<bool>,
}

impl TrackingSession {
    /// Creates a fresh session together with its settler.
    pub fn new() -> (SessionSettler, TrackingSession) {
        let (tx, rx) = watch::channel(false);
        (SessionSettler { tx }, TrackingSession { settled: rx })
    }

    /// Creates a session that is already settled.
    pub fn settled_now() -> TrackingSession {
        let (settler, session) = Self::new();
        settler.settle();
        session
    }

    /// Waits until the tracking attempt has settled.
    pub async fn settled(&self) {
        let mut settled = self.settled.clone();
        // A closed channel means the settler is gone, which implies the
        // attempt is over; either way the caller may proceed.
        let _ = settled.wait_for(|done| *done).await;
    }

    /// Whether the attempt has already settled, without waiting.
    pub fn is_settled(&self) -> bool {
        *self.settled.borrow()
    }
}

/// Settles a [`TrackingSession`]. Idempotent.
///
/// Dropping the settler also settles the session, so a failed coordinator
/// task cannot leave callers waiting forever.
#[derive(Debug)]
pub struct SessionSettler {
    tx: watch::Sender<bool>,
}

impl SessionSettler {
    /// Marks the session as settled.
    pub fn settle(&self) {
        let _ = self.tx.send(true);
    }
}

impl Drop for SessionSettler {
    fn drop(&mut self) {
        let _ = self.tx.send(true);
    }
}

/// Owner of the current tracking session for one page lifecycle.
///
/// The embedder holds the slot;
/// [`ImpressionService::start`](crate::application::services::ImpressionService::start)
/// installs a fresh session into it synchronously before any asynchronous
/// branch runs, so readers can never observe a started-but-unset slot.
/// At most one session is active per slot.
#[derive(Debug, Default)]
pub struct SessionSlot {
    current: Option<TrackingSession>,
}

impl SessionSlot {
    pub fn new() -> Self {
        Self::default()
    }

    /// Installs the session for the current tracking attempt.
    pub fn install(&mut self, session: TrackingSession) {
        self.current = Some(session);
    }

    /// Installs an already-settled session for environments where impression
    /// tracking is not applicable.
    pub fn disable(&mut self) {
        self.current = Some(TrackingSession::settled_now());
    }

    /// Returns the current session.
    ///
    /// # Panics
    ///
    /// Panics if no session was ever installed. Requesting the session before
    /// tracking was started (or disabled) is a caller-ordering bug, not a
    /// runtime condition.
    pub fn current(&self) -> TrackingSession {
        self.current
            .clone()
            .expect("impression-tracking session requested before start")
    }

    /// Clears the slot. Test entry point.
    pub fn reset(&mut self) {
        self.current = None;
    }
}
