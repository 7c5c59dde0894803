use crate::{ClientError, ClientResult, OpenedFeed, SseFrame, SseParser, StreamSource};

use wp_core::{ActorId, Cursor, Envelope, TenantId};

use std::collections::VecDeque;
use std::panic::Location;
use std::pin::Pin;
use std::time::Duration;

use async_trait::async_trait;
use bytes::Bytes;
use error_location::ErrorLocation;
use futures::{Stream, StreamExt, stream};
use reqwest::header::{ACCEPT, AUTHORIZATION};
use reqwest::{Client as ReqwestClient, StatusCode, Url};
use serde_json::Value;

const CONNECT_TIMEOUT: Duration = Duration::from_secs(10);

/// First frame of a stream; its `id` is the cursor the server starts after
const READY_EVENT: &str = "ready";

/// Stream source over the server's `GET /sync/stream` SSE endpoint
pub struct SseSource {
    base_url: String,
    bearer_token: Option<String>,
    identity: Option<(TenantId, ActorId)>,
    client: ReqwestClient,
}

impl SseSource {
    /// # Arguments
    /// * `base_url` - Server URL (e.g., "http://127.0.0.1:8080")
    pub fn new(base_url: &str) -> ClientResult<Self> {
        let client = ReqwestClient::builder()
            .connect_timeout(CONNECT_TIMEOUT)
            .build()?;

        Ok(Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            bearer_token: None,
            identity: None,
            client,
        })
    }

    /// Authenticate with a JWT
    pub fn with_bearer_token(mut self, token: impl Into<String>) -> Self {
        self.bearer_token = Some(token.into());
        self
    }

    /// Identify via headers, for servers running with auth disabled
    pub fn with_identity(mut self, tenant_id: TenantId, actor_id: ActorId) -> Self {
        self.identity = Some((tenant_id, actor_id));
        self
    }

    fn stream_url(&self, since: Option<Cursor>) -> ClientResult<Url> {
        let mut url = Url::parse(&format!("{}/sync/stream", self.base_url))
            .map_err(|e| ClientError::api_error("INVALID_URL".to_string(), e.to_string()))?;
        if let Some(since) = since {
            url.query_pairs_mut()
                .append_pair("since", &since.to_string());
        }
        Ok(url)
    }
}

#[async_trait]
impl StreamSource for SseSource {
    async fn open(&self, since: Option<Cursor>) -> ClientResult<OpenedFeed> {
        let mut request = self
            .client
            .get(self.stream_url(since)?)
            .header(ACCEPT, "text/event-stream");

        if let Some(ref token) = self.bearer_token {
            request = request.header(AUTHORIZATION, format!("Bearer {}", token));
        }
        if let Some((ref tenant_id, ref actor_id)) = self.identity {
            request = request
                .header("X-Tenant-Id", tenant_id.as_str())
                .header("X-Actor-Id", actor_id.as_str());
        }

        let response = request.send().await?;
        let status = response.status();

        if !status.is_success() {
            let body: Value = response.json().await.unwrap_or(Value::Null);
            return Err(error_from_body(status, &body, since));
        }

        let mut state = FrameState {
            bytes: Box::pin(response.bytes_stream()),
            parser: SseParser::new(),
            frames: VecDeque::new(),
            finished: false,
        };
        let start = state.read_start().await?.or(since);
        log::debug!(
            "Opened SSE stream at {} (since {:?}, starting after {:?})",
            self.base_url,
            since,
            start
        );

        let envelopes = stream::unfold(state, |mut state| async move {
            state.next_item().await.map(|item| (item, state))
        });
        Ok(OpenedFeed::new(start, Box::pin(envelopes)))
    }
}

fn error_from_body(status: StatusCode, body: &Value, since: Option<Cursor>) -> ClientError {
    let error = body.get("error");
    let code = error
        .and_then(|e| e.get("code"))
        .and_then(|v| v.as_str())
        .map(String::from)
        .unwrap_or_else(|| match status {
            StatusCode::GONE => "STALE_CURSOR".to_string(),
            StatusCode::FORBIDDEN => "TENANT_MISMATCH".to_string(),
            s if s.is_server_error() => "INTERNAL_ERROR".to_string(),
            _ => "UNKNOWN".to_string(),
        });
    let message = error
        .and_then(|e| e.get("message"))
        .and_then(|v| v.as_str())
        .unwrap_or("Unknown error")
        .to_string();

    match ClientError::api_error(code, message) {
        ClientError::StaleCursor { location, .. } => ClientError::StaleCursor {
            cursor: since,
            location,
        },
        other => other,
    }
}

struct FrameState {
    bytes: Pin<Box<dyn Stream<Item = reqwest::Result<Bytes>> + Send>>,
    parser: SseParser,
    frames: VecDeque<SseFrame>,
    finished: bool,
}

impl FrameState {
    /// Consume a leading `ready` frame and return its cursor.
    ///
    /// Any other first frame is left queued for `next_item`.
    async fn read_start(&mut self) -> ClientResult<Option<Cursor>> {
        loop {
            if let Some(frame) = self.frames.front() {
                if frame.event_name() != READY_EVENT {
                    return Ok(None);
                }
                let cursor = frame
                    .id
                    .as_deref()
                    .map(str::parse::<Cursor>)
                    .transpose()
                    .map_err(|e| ClientError::api_error("INVALID_CURSOR".to_string(), e.to_string()))?;
                self.frames.pop_front();
                return Ok(cursor);
            }

            match self.bytes.next().await {
                Some(Ok(chunk)) => self.frames.extend(self.parser.push(&chunk)),
                Some(Err(e)) => return Err(e.into()),
                None => {
                    self.finished = true;
                    return Ok(None);
                }
            }
        }
    }

    async fn next_item(&mut self) -> Option<ClientResult<Envelope>> {
        loop {
            if self.finished {
                return None;
            }

            if let Some(frame) = self.frames.pop_front() {
                match frame_to_item(frame) {
                    Some(Ok(envelope)) => return Some(Ok(envelope)),
                    Some(Err(e)) => {
                        self.finished = true;
                        return Some(Err(e));
                    }
                    None => continue,
                }
            }

            match self.bytes.next().await {
                Some(Ok(chunk)) => self.frames.extend(self.parser.push(&chunk)),
                Some(Err(e)) => {
                    self.finished = true;
                    return Some(Err(e.into()));
                }
                None => {
                    log::debug!("SSE stream closed by server");
                    return None;
                }
            }
        }
    }
}

/// `None` for frames that carry no envelope (unknown events)
fn frame_to_item(frame: SseFrame) -> Option<ClientResult<Envelope>> {
    match frame.event_name() {
        "envelope" | "message" => Some(serde_json::from_str(&frame.data).map_err(Into::into)),
        "stale" => {
            let body: Value = serde_json::from_str(&frame.data).unwrap_or(Value::Null);
            let cursor = body
                .get("cursor")
                .and_then(|v| v.as_i64())
                .map(Cursor::from_millis);
            Some(Err(ClientError::StaleCursor {
                cursor,
                location: ErrorLocation::from(Location::caller()),
            }))
        }
        "error" => {
            let body: Value = serde_json::from_str(&frame.data).unwrap_or(Value::Null);
            let code = body
                .get("code")
                .and_then(|v| v.as_str())
                .unwrap_or("UNKNOWN")
                .to_string();
            let message = body
                .get("message")
                .and_then(|v| v.as_str())
                .unwrap_or("Unknown error")
                .to_string();
            Some(Err(ClientError::api_error(code, message)))
        }
        other => {
            log::debug!("Ignoring SSE event {}", other);
            None
        }
    }
}
