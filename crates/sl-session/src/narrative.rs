//! Request/response boundary to the narrative generator.
//!
//! The session never waits on narration. A [`NarrativeClient`] spawns each
//! request on a Tokio runtime under a timeout and hands back a
//! [`PendingNarrative`]; the session polls it between player inputs and
//! folds the answer into the message log when it arrives.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use sl_core::EventKind;
use tokio::runtime::Handle;
use tokio::sync::oneshot;
use tokio::sync::oneshot::error::TryRecvError;
use tokio::task::JoinHandle;

use crate::error::{NarrativeError, NarrativeResult};

/// Default time a request may run.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// What the session asks the narrator for.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NarrativeRequest {
    /// What to narrate.
    pub prompt: String,
    /// Situation lines: location, time, who is present and how they behave.
    pub context: Vec<String>,
    /// Ask for event seeds instead of prose.
    pub want_events: bool,
}

impl NarrativeRequest {
    /// A prose request.
    pub fn new(prompt: impl Into<String>) -> Self {
        Self {
            prompt: prompt.into(),
            context: Vec::new(),
            want_events: false,
        }
    }

    /// Attach situation lines.
    pub fn with_context(mut self, context: Vec<String>) -> Self {
        self.context = context;
        self
    }

    /// Ask for event seeds.
    pub fn wanting_events(mut self) -> Self {
        self.want_events = true;
        self
    }
}

/// A suggested future event.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EventSeed {
    /// Event name.
    pub name: String,
    /// Event kind.
    pub kind: EventKind,
    /// What happens.
    pub description: String,
}

/// The narrator's answer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum NarrativeResponse {
    /// Narration to show the players.
    Text(String),
    /// Suggested events.
    EventSeeds(Vec<EventSeed>),
}

/// Anything that can narrate.
#[async_trait]
pub trait NarrativeService: Send + Sync {
    /// Produce narration or event seeds for `request`.
    async fn generate(&self, request: NarrativeRequest) -> NarrativeResult<NarrativeResponse>;

    /// Name for logs.
    fn name(&self) -> &str;
}

/// Runs narrative requests in the background.
#[derive(Clone)]
pub struct NarrativeClient {
    service: Arc<dyn NarrativeService>,
    handle: Handle,
    timeout: Duration,
}

impl NarrativeClient {
    /// A client spawning onto the runtime behind `handle`.
    pub fn new(service: Arc<dyn NarrativeService>, handle: Handle) -> Self {
        Self {
            service,
            handle,
            timeout: DEFAULT_TIMEOUT,
        }
    }

    /// Set the per-request timeout.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// The per-request timeout.
    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Name of the underlying service.
    pub fn service_name(&self) -> &str {
        self.service.name()
    }

    /// Start `request` in the background.
    pub fn request(&self, request: NarrativeRequest) -> PendingNarrative {
        let (tx, rx) = oneshot::channel();
        let service = Arc::clone(&self.service);
        let limit = self.timeout;

        let task = self.handle.spawn(async move {
            let result = match tokio::time::timeout(limit, service.generate(request)).await {
                Ok(result) => result,
                Err(_) => Err(NarrativeError::Timeout(limit)),
            };
            // The receiver is gone if the request was dropped; nothing to do.
            let _ = tx.send(result);
        });

        PendingNarrative { rx, task }
    }
}

impl std::fmt::Debug for NarrativeClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("NarrativeClient")
            .field("service", &self.service.name())
            .field("timeout", &self.timeout)
            .finish()
    }
}

/// A request in flight.
#[derive(Debug)]
pub struct PendingNarrative {
    rx: oneshot::Receiver<NarrativeResult<NarrativeResponse>>,
    task: JoinHandle<()>,
}

impl PendingNarrative {
    /// The result if it has arrived. Never blocks.
    pub fn try_take(&mut self) -> Option<NarrativeResult<NarrativeResponse>> {
        match self.rx.try_recv() {
            Ok(result) => Some(result),
            Err(TryRecvError::Empty) => None,
            Err(TryRecvError::Closed) => Some(Err(NarrativeError::Cancelled)),
        }
    }

    /// Wait for the result.
    pub async fn wait(self) -> NarrativeResult<NarrativeResponse> {
        self.rx.await.unwrap_or(Err(NarrativeError::Cancelled))
    }

    /// Abort the request.
    pub fn cancel(self) {
        self.task.abort();
    }
}

/// State of the session's narrative request after a poll.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NarrativePoll {
    /// Nothing was requested.
    Idle,
    /// Still waiting.
    Pending,
    /// The answer arrived and was logged.
    Delivered(NarrativeResponse),
    /// The request failed; a system message says why.
    Failed(NarrativeError),
}

/// Offline narrator producing deterministic text from the request.
#[derive(Debug, Clone, Default)]
pub struct TemplateNarrator {
    delay: Option<Duration>,
}

impl TemplateNarrator {
    /// A narrator that answers immediately.
    pub fn new() -> Self {
        Self::default()
    }

    /// Wait `delay` before answering.
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }
}

#[async_trait]
impl NarrativeService for TemplateNarrator {
    async fn generate(&self, request: NarrativeRequest) -> NarrativeResult<NarrativeResponse> {
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }

        if request.want_events {
            return Ok(NarrativeResponse::EventSeeds(vec![EventSeed {
                name: "Rumours on the Road".to_string(),
                kind: EventKind::Story,
                description: format!("Word spreads about {}.", request.prompt),
            }]));
        }

        let mut text = request.prompt.trim().to_string();
        if text.is_empty() {
            text = "The scene holds its breath.".to_string();
        }
        if !request.context.is_empty() {
            text.push_str(" (");
            text.push_str(&request.context.join("; "));
            text.push(')');
        }
        Ok(NarrativeResponse::Text(text))
    }

    fn name(&self) -> &str {
        "template"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Failing;

    #[async_trait]
    impl NarrativeService for Failing {
        async fn generate(&self, _request: NarrativeRequest) -> NarrativeResult<NarrativeResponse> {
            Err(NarrativeError::Service("provider offline".to_string()))
        }

        fn name(&self) -> &str {
            "failing"
        }
    }

    #[tokio::test]
    async fn template_text_includes_context() {
        let request = NarrativeRequest::new("The wolf circles.")
            .with_context(vec!["Old Mill".to_string(), "night".to_string()]);
        let response = TemplateNarrator::new().generate(request).await.unwrap();
        assert_eq!(
            response,
            NarrativeResponse::Text("The wolf circles. (Old Mill; night)".to_string())
        );
    }

    #[tokio::test]
    async fn template_event_seeds() {
        let request = NarrativeRequest::new("the missing miller").wanting_events();
        let response = TemplateNarrator::new().generate(request).await.unwrap();
        match response {
            NarrativeResponse::EventSeeds(seeds) => {
                assert_eq!(seeds.len(), 1);
                assert!(seeds[0].description.contains("the missing miller"));
            }
            other => panic!("expected seeds, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn client_times_out() {
        let client = NarrativeClient::new(
            Arc::new(TemplateNarrator::new().with_delay(Duration::from_secs(5))),
            Handle::current(),
        )
        .with_timeout(Duration::from_millis(20));
        let pending = client.request(NarrativeRequest::new("slow"));
        assert_eq!(
            pending.wait().await,
            Err(NarrativeError::Timeout(Duration::from_millis(20)))
        );
    }

    #[tokio::test]
    async fn client_passes_service_errors() {
        let client = NarrativeClient::new(Arc::new(Failing), Handle::current());
        let pending = client.request(NarrativeRequest::new("anything"));
        assert!(matches!(pending.wait().await, Err(NarrativeError::Service(_))));
    }

    #[tokio::test]
    async fn try_take_before_and_after() {
        let client = NarrativeClient::new(
            Arc::new(TemplateNarrator::new().with_delay(Duration::from_millis(50))),
            Handle::current(),
        );
        let mut pending = client.request(NarrativeRequest::new("soon"));
        assert!(pending.try_take().is_none());
        tokio::time::sleep(Duration::from_millis(200)).await;
        assert_eq!(
            pending.try_take(),
            Some(Ok(NarrativeResponse::Text("soon".to_string())))
        );
    }

    #[tokio::test]
    async fn cancel_aborts() {
        let client = NarrativeClient::new(
            Arc::new(TemplateNarrator::new().with_delay(Duration::from_secs(5))),
            Handle::current(),
        );
        let pending = client.request(NarrativeRequest::new("never"));
        pending.cancel();
    }
}
