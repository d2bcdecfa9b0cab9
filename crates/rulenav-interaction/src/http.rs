//! Live HTTP implementation of the answering collaborator.
//!
//! Speaks the backend's `/api/chat` request/response contract and the
//! `/api/chat/stream` line-delimited event stream.

use crate::backend::{ChatBackend, ChatReply, ChatStreamEvent, ChatTurn};
use crate::config::BackendConfig;
use crate::wire::{ApiErrorBody, ChatRequestBody, ChatResponseBody, StreamPayload, into_citations};
use async_trait::async_trait;
use futures::StreamExt;
use reqwest::{Client, StatusCode};
use rulenav_core::error::{NavigatorError, Result};
use tokio::sync::mpsc::UnboundedSender;
use tokio_util::sync::CancellationToken;

/// Chat backend that talks to the live HTTP collaborator.
#[derive(Clone)]
pub struct HttpChatBackend {
    client: Client,
    config: BackendConfig,
}

impl HttpChatBackend {
    pub fn new(config: BackendConfig) -> Self {
        Self {
            client: Client::new(),
            config,
        }
    }

    fn request_body(turn: &ChatTurn) -> ChatRequestBody {
        ChatRequestBody {
            message: turn.content.clone(),
            session_id: turn.session_id.clone(),
            include_citations: true,
        }
    }
}

#[async_trait]
impl ChatBackend for HttpChatBackend {
    async fn send_message(&self, turn: ChatTurn) -> Result<ChatReply> {
        let response = self
            .client
            .post(self.config.url("/api/chat"))
            .json(&Self::request_body(&turn))
            .send()
            .await
            .map_err(|err| NavigatorError::unreachable(format!("chat request failed: {err}")))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(map_http_error(status, body));
        }

        let parsed: ChatResponseBody = response
            .json()
            .await
            .map_err(|err| NavigatorError::json(format!("failed to parse chat response: {err}")))?;

        Ok(ChatReply {
            message: parsed.message,
            citations: into_citations(parsed.citations),
            session_id: parsed.session_id,
        })
    }

    async fn stream_message(
        &self,
        turn: ChatTurn,
        events: UnboundedSender<ChatStreamEvent>,
        cancel: CancellationToken,
    ) -> Result<()> {
        let request = self
            .client
            .post(self.config.url("/api/chat/stream"))
            .json(&Self::request_body(&turn));

        let response = tokio::select! {
            _ = cancel.cancelled() => return Ok(()),
            response = request.send() => response
                .map_err(|err| NavigatorError::unreachable(format!("chat stream request failed: {err}")))?,
        };

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(map_http_error(status, body));
        }

        let mut stream = response.bytes_stream();
        let mut parser = EventParser::default();
        let mut buffer = String::new();

        loop {
            let chunk = tokio::select! {
                _ = cancel.cancelled() => return Ok(()),
                chunk = stream.next() => chunk,
            };

            match chunk {
                None => break,
                Some(Err(err)) => {
                    return Err(NavigatorError::stream(format!(
                        "chat stream interrupted: {err}"
                    )));
                }
                Some(Ok(bytes)) => {
                    // Chunk boundaries do not respect lines; buffer and split.
                    buffer.push_str(&String::from_utf8_lossy(&bytes));
                    while let Some(newline) = buffer.find('\n') {
                        let line: String = buffer.drain(..=newline).collect();
                        if let Some(event) = parser.push_line(line.trim_end_matches(['\n', '\r']))?
                        {
                            let terminal = matches!(
                                event,
                                ChatStreamEvent::Done { .. } | ChatStreamEvent::Error(_)
                            );
                            if events.send(event).is_err() {
                                // Consumer hung up; nothing left to deliver.
                                return Ok(());
                            }
                            if terminal {
                                return Ok(());
                            }
                        }
                    }
                }
            }
        }

        Err(NavigatorError::stream(
            "chat stream ended without a done event",
        ))
    }
}

/// Incremental parser over `event:`/`data:` lines.
///
/// The server emits `event: <name>` followed by `data: <json>`; payload keys
/// are unambiguous enough that the event name only disambiguates the
/// terminal `done` case.
#[derive(Default)]
struct EventParser {
    event_name: Option<String>,
}

impl EventParser {
    fn push_line(&mut self, line: &str) -> Result<Option<ChatStreamEvent>> {
        if line.is_empty() {
            // Blank line terminates an event block.
            return Ok(None);
        }
        if let Some(name) = line.strip_prefix("event: ") {
            self.event_name = Some(name.trim().to_string());
            return Ok(None);
        }
        let Some(data) = line.strip_prefix("data: ") else {
            // Comments and unknown fields are ignored per the SSE contract.
            return Ok(None);
        };

        let payload: StreamPayload = serde_json::from_str(data)
            .map_err(|err| NavigatorError::stream(format!("malformed stream event: {err}")))?;
        let event_name = self.event_name.take();

        if let Some(error) = payload.error {
            return Ok(Some(ChatStreamEvent::Error(error)));
        }
        if let Some(citations) = payload.citations {
            return Ok(Some(ChatStreamEvent::Citations(into_citations(citations))));
        }
        if let Some(text) = payload.text {
            return Ok(Some(ChatStreamEvent::Content(text)));
        }
        if let Some(session_id) = payload.session_id {
            // The done event carries the session id alone.
            if event_name.as_deref() != Some("error") {
                return Ok(Some(ChatStreamEvent::Done { session_id }));
            }
        }
        Ok(None)
    }
}

fn map_http_error(status: StatusCode, body: String) -> NavigatorError {
    let message = serde_json::from_str::<ApiErrorBody>(&body)
        .map(|wrapper| wrapper.detail)
        .unwrap_or_else(|_| {
            if body.is_empty() {
                status.to_string()
            } else {
                body
            }
        });
    NavigatorError::backend(status.as_u16(), message)
}
