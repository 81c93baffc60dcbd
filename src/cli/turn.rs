//! Running query turns against the agent.

use std::io::Write;
use std::time::Instant;

use tokio_util::sync::CancellationToken;
use tracing::{debug, info};

use crate::agent::{QueryRequest, TurnMonitor, TurnOutcome};
use crate::cli_output::{format_duration, render_event, render_outcome, render_raw};
use crate::config::ClientConfig;
use crate::error::StreamResult;
use crate::session::{stream_events, SessionRequest};
use crate::traits::HttpClient;

/// A sequence of turns sharing one agent session.
///
/// The session id reported by each turn's `done` event is sent with the
/// next query.
pub struct Conversation<C> {
    client: C,
    config: ClientConfig,
    endpoint: String,
    session_id: Option<String>,
    raw: bool,
}

impl<C: HttpClient + Clone> Conversation<C> {
    pub fn new(client: C, config: ClientConfig, endpoint: impl Into<String>) -> Self {
        Self {
            client,
            config,
            endpoint: endpoint.into(),
            session_id: None,
            raw: false,
        }
    }

    /// Start from an existing session.
    pub fn with_session(mut self, session_id: Option<String>) -> Self {
        self.session_id = session_id;
        self
    }

    /// Print decoded events as JSON lines instead of rendered text.
    pub fn with_raw(mut self, raw: bool) -> Self {
        self.raw = raw;
        self
    }

    pub fn session_id(&self) -> Option<&str> {
        self.session_id.as_deref()
    }

    /// Stream one query, writing progress to `out`.
    ///
    /// Errors only when the request cannot be built; transport and backend
    /// failures come back as [`TurnOutcome::Failed`] or
    /// [`TurnOutcome::ConnectionLost`].
    pub async fn ask<W: Write>(
        &mut self,
        query: &str,
        cancel: CancellationToken,
        out: &mut W,
    ) -> StreamResult<TurnOutcome> {
        let body = QueryRequest::new(query).with_session(self.session_id.clone());
        let request = SessionRequest::new(self.endpoint.as_str())
            .with_json(&body)?
            .with_cancel(cancel);

        let started = Instant::now();
        let raw = self.raw;
        let mut monitor = TurnMonitor::new();

        let result = stream_events(self.client.clone(), self.config.clone(), request, |event| {
            let interpreted = monitor.observe(&event);
            let written = match (raw, interpreted) {
                (true, _) => render_raw(out, &event),
                (false, Some(interpreted)) => render_event(out, &interpreted),
                (false, None) => Ok(()),
            };
            if let Err(e) = written {
                debug!(error = %e, "failed to write event");
            }
        })
        .await;

        let outcome = monitor.finish(result);
        let elapsed = started.elapsed();

        if let Some(session_id) = outcome.session_id() {
            self.session_id = Some(session_id.to_string());
        }
        if !raw {
            if let Err(e) = render_outcome(out, &outcome, elapsed) {
                debug!(error = %e, "failed to write turn outcome");
            }
        }
        if let Err(e) = out.flush() {
            debug!(error = %e, "failed to flush turn output");
        }

        info!(
            elapsed = %format_duration(elapsed),
            outcome = ?outcome,
            "turn finished"
        );
        Ok(outcome)
    }
}
