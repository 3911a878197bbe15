//! Pagination session state machine and its driver loop.

use std::time::Duration;

use qbot_core::{ControlInputSource, NavEvent, NavKind, Page, RenderSink, SurfaceId, UserId};
use tokio::time::Instant;
use tracing::{debug, info, instrument, warn};

/// Quotes shown per page.
pub const PAGE_SIZE: usize = 5;

/// How long a session waits for the next accepted input.
pub const DEFAULT_PAGE_TIMEOUT: Duration = Duration::from_secs(60);

/// Pause after a failed input read before waiting again.
const INPUT_RETRY_DELAY: Duration = Duration::from_millis(250);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    Active,
    Closed,
}

/// What a single input did to the session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Transition {
    /// Moved to the contained page index; the page is re-rendered.
    Moved(usize),
    /// Requester input at the first/last page: deadline reset, nothing rendered.
    Boundary,
    /// Input from someone else, or an input read that failed. Deadline untouched.
    Ignored,
    Closed,
}

/// Splits `items` into consecutive chunks of `page_size`, keeping order.
pub fn paginate<T>(items: Vec<T>, page_size: usize) -> Vec<Vec<T>> {
    let page_size = page_size.max(1);
    let mut pages = Vec::with_capacity(items.len().div_ceil(page_size));
    let mut current = Vec::with_capacity(page_size);
    for item in items {
        current.push(item);
        if current.len() == page_size {
            pages.push(std::mem::replace(&mut current, Vec::with_capacity(page_size)));
        }
    }
    if !current.is_empty() {
        pages.push(current);
    }
    pages
}

/// Navigable view over an ordered result set, attached to one rendered surface.
#[derive(Debug)]
pub struct PaginationSession<T> {
    surface_id: SurfaceId,
    requester_id: UserId,
    pages: Vec<Vec<T>>,
    current_page: usize,
    timeout: Duration,
    deadline: Instant,
    state: SessionState,
}

impl<T> PaginationSession<T>
where
    T: Clone + Send + Sync,
{
    /// Starts a session with the default timeout. `None` when the items fit on one page.
    pub fn start(items: Vec<T>, requester_id: UserId, surface_id: SurfaceId) -> Option<Self> {
        Self::start_with_timeout(items, requester_id, surface_id, DEFAULT_PAGE_TIMEOUT)
    }

    pub fn start_with_timeout(
        items: Vec<T>,
        requester_id: UserId,
        surface_id: SurfaceId,
        timeout: Duration,
    ) -> Option<Self> {
        let pages = paginate(items, PAGE_SIZE);
        if pages.len() <= 1 {
            return None;
        }

        Some(Self {
            surface_id,
            requester_id,
            pages,
            current_page: 0,
            timeout,
            deadline: Instant::now() + timeout,
            state: SessionState::Active,
        })
    }

    pub fn surface_id(&self) -> SurfaceId {
        self.surface_id
    }

    pub fn requester_id(&self) -> UserId {
        self.requester_id
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    pub fn deadline(&self) -> Instant {
        self.deadline
    }

    pub fn current_index(&self) -> usize {
        self.current_page
    }

    pub fn total_pages(&self) -> usize {
        self.pages.len()
    }

    /// The page currently displayed.
    pub fn current_page(&self) -> Page<T> {
        Page {
            index: self.current_page,
            total_pages: self.pages.len(),
            items: self
                .pages
                .get(self.current_page)
                .cloned()
                .unwrap_or_default(),
        }
    }

    /// Applies one navigation input that arrived at `now`.
    pub fn apply(&mut self, event: NavEvent, now: Instant) -> Transition {
        if self.state == SessionState::Closed {
            return Transition::Closed;
        }
        if event.actor_id != self.requester_id {
            return Transition::Ignored;
        }

        self.deadline = now + self.timeout;
        let last = self.pages.len().saturating_sub(1);

        match event.kind {
            NavKind::Next if self.current_page < last => {
                self.current_page += 1;
                Transition::Moved(self.current_page)
            }
            NavKind::Prev if self.current_page > 0 => {
                self.current_page -= 1;
                Transition::Moved(self.current_page)
            }
            _ => Transition::Boundary,
        }
    }

    fn close(&mut self) {
        self.state = SessionState::Closed;
        self.pages = Vec::new();
        info!(surface_id = self.surface_id, "Pagination session closed");
    }

    /// Waits for one input (or the deadline) and applies it, re-rendering on page moves.
    pub async fn tick<I, S>(&mut self, input: &mut I, sink: &S) -> Transition
    where
        I: ControlInputSource + ?Sized,
        S: RenderSink<T> + ?Sized,
    {
        if self.state == SessionState::Closed {
            return Transition::Closed;
        }

        let now = Instant::now();
        if now >= self.deadline {
            self.close();
            return Transition::Closed;
        }
        let remaining = self.deadline - now;

        match input.next_event(remaining).await {
            Ok(None) => {
                self.close();
                Transition::Closed
            }
            Ok(Some(event)) => {
                let transition = self.apply(event, Instant::now());
                debug!(
                    surface_id = self.surface_id,
                    actor_id = event.actor_id,
                    transition = ?transition,
                    "Navigation input"
                );
                if let Transition::Moved(_) = transition {
                    self.render(sink).await;
                }
                transition
            }
            Err(e) => {
                warn!(surface_id = self.surface_id, error = %e, "Navigation input failed");
                tokio::time::sleep(INPUT_RETRY_DELAY.min(remaining)).await;
                Transition::Ignored
            }
        }
    }

    /// Shows the first page, then processes input until the session times out.
    #[instrument(skip(self, input, sink), fields(surface_id = self.surface_id, requester_id = self.requester_id))]
    pub async fn run<I, S>(&mut self, input: &mut I, sink: &S)
    where
        I: ControlInputSource + ?Sized,
        S: RenderSink<T> + ?Sized,
    {
        info!(total_pages = self.pages.len(), "Pagination session started");
        self.render(sink).await;

        while self.tick(input, sink).await != Transition::Closed {}
    }

    async fn render<S>(&self, sink: &S)
    where
        S: RenderSink<T> + ?Sized,
    {
        if let Err(e) = sink.show(self.surface_id, &self.current_page()).await {
            warn!(surface_id = self.surface_id, error = %e, "Failed to render page");
        }
    }
}
