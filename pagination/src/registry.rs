//! Registry of running pagination sessions, keyed by rendered-surface id.

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard};

use qbot_core::{NavEvent, RenderSink, SurfaceId};
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::{debug, info};

use crate::input::ChannelInput;
use crate::session::PaginationSession;

const EVENT_BUFFER: usize = 32;

struct Entry {
    generation: u64,
    sender: mpsc::Sender<NavEvent>,
}

/// Routes navigation events to sessions. Each session owns its state on its own task; the
/// registry only holds senders, and its lock is never held across an await.
#[derive(Clone, Default)]
pub struct SessionRegistry {
    sessions: Arc<Mutex<HashMap<SurfaceId, Entry>>>,
    generations: Arc<AtomicU64>,
}

impl SessionRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, HashMap<SurfaceId, Entry>> {
        self.sessions.lock().unwrap_or_else(|e| e.into_inner())
    }

    /// Registers `session` under its surface and drives it on a background task until it times out.
    /// A session already attached to the same surface stops receiving input.
    pub fn open<T, S>(&self, session: PaginationSession<T>, sink: Arc<S>) -> JoinHandle<()>
    where
        T: Clone + Send + Sync + 'static,
        S: RenderSink<T> + 'static,
    {
        let surface_id = session.surface_id();
        let generation = self.generations.fetch_add(1, Ordering::Relaxed);
        let (sender, rx) = mpsc::channel(EVENT_BUFFER);

        self.lock().insert(surface_id, Entry { generation, sender });
        info!(surface_id = surface_id, "Pagination session registered");

        let registry = self.clone();
        tokio::spawn(async move {
            let mut session = session;
            let mut input = ChannelInput::new(rx);
            session.run(&mut input, sink.as_ref()).await;
            input.close();
            registry.remove(surface_id, generation);
        })
    }

    /// Forwards an event to the session on `surface_id`. Returns false when no session is attached.
    pub async fn dispatch(&self, surface_id: SurfaceId, event: NavEvent) -> bool {
        let sender = self.lock().get(&surface_id).map(|entry| entry.sender.clone());
        match sender {
            // Closed: the session has ended and is about to be removed.
            Some(sender) if sender.is_closed() => false,
            Some(sender) => sender.send(event).await.is_ok(),
            None => {
                debug!(surface_id = surface_id, "No session for navigation event");
                false
            }
        }
    }

    pub fn is_active(&self, surface_id: SurfaceId) -> bool {
        self.lock().contains_key(&surface_id)
    }

    pub fn active_count(&self) -> usize {
        self.lock().len()
    }

    fn remove(&self, surface_id: SurfaceId, generation: u64) {
        let mut sessions = self.lock();
        if sessions
            .get(&surface_id)
            .is_some_and(|entry| entry.generation == generation)
        {
            sessions.remove(&surface_id);
            debug!(surface_id = surface_id, "Pagination session removed");
        }
    }
}
