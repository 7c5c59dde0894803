use crate::ClientResult;

use wp_core::{Cursor, Envelope};

use std::pin::Pin;
use std::sync::Arc;
use std::task::{Context, Poll};

use async_trait::async_trait;
use futures::Stream;

/// Envelopes as a client sees them; ends when the transport disconnects
pub type ClientStream = Pin<Box<dyn Stream<Item = ClientResult<Envelope>> + Send>>;

/// An open change stream.
///
/// `start` is the cursor the server began after. When the stream was opened
/// without a cursor it is the tenant's head at open time, so storing it keeps
/// a reconnect from skipping anything published in the meantime.
pub struct OpenedFeed {
    pub start: Option<Cursor>,
    pub envelopes: ClientStream,
}

impl OpenedFeed {
    pub fn new(start: Option<Cursor>, envelopes: ClientStream) -> Self {
        Self { start, envelopes }
    }
}

impl Stream for OpenedFeed {
    type Item = ClientResult<Envelope>;

    fn poll_next(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        self.envelopes.as_mut().poll_next(cx)
    }
}

/// Opens the tenant's change stream from a given high-water mark
#[async_trait]
pub trait StreamSource: Send + Sync {
    async fn open(&self, since: Option<Cursor>) -> ClientResult<OpenedFeed>;
}

#[async_trait]
impl<T: StreamSource + ?Sized> StreamSource for Arc<T> {
    async fn open(&self, since: Option<Cursor>) -> ClientResult<OpenedFeed> {
        (**self).open(since).await
    }
}
