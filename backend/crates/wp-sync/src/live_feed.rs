use wp_core::Envelope;

use std::fmt;
use std::pin::Pin;
use std::task::{Context, Poll};

use futures::Stream;

/// One item of live delivery
#[derive(Debug, Clone)]
pub enum LiveEvent {
    Envelope(Envelope),
    /// The receiver fell behind and `missed` envelopes were dropped
    Lagged(u64),
}

/// Attachment to a tenant's live delivery.
///
/// Dropping the feed releases the attachment.
pub struct LiveFeed {
    inner: Pin<Box<dyn Stream<Item = LiveEvent> + Send>>,
}

impl LiveFeed {
    pub fn new<S>(stream: S) -> Self
    where
        S: Stream<Item = LiveEvent> + Send + 'static,
    {
        Self {
            inner: Box::pin(stream),
        }
    }
}

impl Stream for LiveFeed {
    type Item = LiveEvent;

    fn poll_next(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        self.inner.as_mut().poll_next(cx)
    }
}

impl fmt::Debug for LiveFeed {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LiveFeed").finish_non_exhaustive()
    }
}
