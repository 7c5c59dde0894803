use wp_client::{ClientError, ClientResult, OpenedFeed, StreamSource};
use wp_core::{Cursor, Envelope};

use std::collections::VecDeque;
use std::sync::Mutex;

use async_trait::async_trait;
use futures::{StreamExt, stream};

/// What one `open` call produces
pub enum Session {
    /// Stream these items, then disconnect
    Items(Vec<ClientResult<Envelope>>),
    /// Stream these items, then stay open without further data
    ItemsThenIdle(Vec<ClientResult<Envelope>>),
    /// Report this starting cursor, then disconnect without any items
    StartThenDrop(Cursor),
    /// Fail the open itself
    Fail(ClientError),
}

/// Stream source that replays a fixed script and records every open
#[derive(Default)]
pub struct ScriptedSource {
    script: Mutex<VecDeque<Session>>,
    opened_with: Mutex<Vec<Option<Cursor>>>,
}

impl ScriptedSource {
    pub fn new(script: Vec<Session>) -> Self {
        Self {
            script: Mutex::new(script.into()),
            opened_with: Mutex::new(Vec::new()),
        }
    }

    pub fn opened_with(&self) -> Vec<Option<Cursor>> {
        self.opened_with.lock().unwrap().clone()
    }
}

#[async_trait]
impl StreamSource for ScriptedSource {
    async fn open(&self, since: Option<Cursor>) -> ClientResult<OpenedFeed> {
        self.opened_with.lock().unwrap().push(since);
        let next = self.script.lock().unwrap().pop_front();

        match next {
            Some(Session::Items(items)) => Ok(OpenedFeed::new(since, Box::pin(stream::iter(items)))),
            Some(Session::ItemsThenIdle(items)) => Ok(OpenedFeed::new(
                since,
                Box::pin(stream::iter(items).chain(stream::pending())),
            )),
            Some(Session::StartThenDrop(start)) => {
                Ok(OpenedFeed::new(Some(start), Box::pin(stream::empty())))
            }
            Some(Session::Fail(e)) => Err(e),
            None => Ok(OpenedFeed::new(since, Box::pin(stream::pending()))),
        }
    }
}
