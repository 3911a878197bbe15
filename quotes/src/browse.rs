//! Presenting a result set: nothing, one page, or an interactive session.

use std::sync::Arc;

use pagination::{PaginationSession, SessionRegistry, PAGE_SIZE};
use qbot_core::{Page, RenderSink, SurfaceId, UserId};
use tokio::task::JoinHandle;
use tracing::debug;

use crate::error::QuoteError;

/// How a result set was shown.
#[derive(Debug)]
pub enum Presentation {
    /// Nothing to show; the caller reports an empty result.
    Empty,
    /// Everything fit on one page and was rendered directly.
    SinglePage,
    /// A session was opened; the handle completes once it times out.
    Paginated(JoinHandle<()>),
}

/// Renders `items` on `surface_id`. More than [`PAGE_SIZE`] items opens a session that only
/// `requester_id` can navigate.
pub async fn present<T, S>(
    registry: &SessionRegistry,
    sink: Arc<S>,
    surface_id: SurfaceId,
    requester_id: UserId,
    items: Vec<T>,
) -> Result<Presentation, QuoteError>
where
    T: Clone + Send + Sync + 'static,
    S: RenderSink<T> + 'static,
{
    if items.is_empty() {
        return Ok(Presentation::Empty);
    }

    if items.len() <= PAGE_SIZE {
        let page = Page {
            index: 0,
            total_pages: 1,
            items,
        };
        sink.show(surface_id, &page).await?;
        return Ok(Presentation::SinglePage);
    }

    match PaginationSession::start(items, requester_id, surface_id) {
        Some(session) => {
            debug!(
                surface_id = surface_id,
                pages = session.total_pages(),
                "Opening pagination session"
            );
            Ok(Presentation::Paginated(registry.open(session, sink)))
        }
        None => Ok(Presentation::Empty),
    }
}
