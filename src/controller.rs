//! Request lifecycle.
//!
//! Validates a submission, guards against overlapping requests, drives the
//! busy indicator and routes the outcome either to the dispatcher or to a
//! single error section.

use std::sync::Arc;
use std::time::{Duration, Instant};

use tracing::{debug, info, warn};

use crate::error::{QueryLensError, Result};
use crate::payload::{QueryRequest, ResponsePayload};
use crate::render::{error_section, RenderState, ResponseDispatcher};
use crate::service::QueryService;

/// Message shown when either input is blank.
pub const VALIDATION_MESSAGE: &str = "Please fill in both the Database URL and the Prompt.";

/// The two user inputs, as typed.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SubmissionInput {
    pub database_url: String,
    pub prompt: String,
}

impl SubmissionInput {
    pub fn new(database_url: impl Into<String>, prompt: impl Into<String>) -> Self {
        Self {
            database_url: database_url.into(),
            prompt: prompt.into(),
        }
    }

    /// Trims both fields and builds the wire request.
    ///
    /// Fails if either field is empty after trimming.
    pub fn validate(&self) -> Result<QueryRequest> {
        let database_url = self.database_url.trim();
        let prompt = self.prompt.trim();

        if database_url.is_empty() || prompt.is_empty() {
            return Err(QueryLensError::validation(VALIDATION_MESSAGE));
        }

        Ok(QueryRequest {
            database_url: database_url.to_string(),
            prompt: prompt.to_string(),
        })
    }
}

/// Busy state shown while a request is outstanding.
#[derive(Debug, Clone, Default)]
pub struct BusyIndicator {
    since: Option<Instant>,
    activations: u64,
    deactivations: u64,
}

impl BusyIndicator {
    pub fn activate(&mut self) {
        self.since = Some(Instant::now());
        self.activations += 1;
    }

    pub fn deactivate(&mut self) {
        if self.since.take().is_some() {
            self.deactivations += 1;
        }
    }

    pub fn is_active(&self) -> bool {
        self.since.is_some()
    }

    /// How long the indicator has been active, if it is.
    pub fn elapsed(&self) -> Option<Duration> {
        self.since.map(|s| s.elapsed())
    }

    /// Total activations so far.
    pub fn activations(&self) -> u64 {
        self.activations
    }

    /// Total deactivations so far.
    pub fn deactivations(&self) -> u64 {
        self.deactivations
    }
}

/// Handle for one accepted submission.
///
/// Only the ticket of the latest accepted submission can complete it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Ticket {
    generation: u64,
}

impl Ticket {
    pub fn generation(&self) -> u64 {
        self.generation
    }
}

/// Drives submissions from validation through to a rendered display.
pub struct RequestLifecycleController {
    service: Arc<dyn QueryService>,
    dispatcher: ResponseDispatcher,
    display: RenderState,
    busy: BusyIndicator,
    generation: u64,
    outstanding: Option<Ticket>,
}

impl RequestLifecycleController {
    /// Creates a controller over the given service and dispatcher.
    pub fn new(service: Arc<dyn QueryService>, dispatcher: ResponseDispatcher) -> Self {
        Self {
            service,
            dispatcher,
            display: RenderState::new(),
            busy: BusyIndicator::default(),
            generation: 0,
            outstanding: None,
        }
    }

    /// Submits and awaits one request, leaving the outcome on display.
    ///
    /// Validation and busy rejections are returned as errors. Request
    /// failures are not: they become the error section.
    pub async fn submit(&mut self, input: &SubmissionInput) -> Result<()> {
        let (ticket, request) = self.begin(input)?;
        let outcome = self.service.query(&request).await;
        self.complete(ticket, outcome);
        Ok(())
    }

    /// Accepts a submission and returns the request to issue.
    ///
    /// Clears the display and activates the busy indicator. Nothing changes
    /// when the input is invalid or another request is outstanding.
    pub fn begin(&mut self, input: &SubmissionInput) -> Result<(Ticket, QueryRequest)> {
        let request = input.validate()?;

        if self.outstanding.is_some() {
            return Err(QueryLensError::Busy);
        }

        self.generation += 1;
        let ticket = Ticket {
            generation: self.generation,
        };
        self.outstanding = Some(ticket);
        self.display = RenderState::new();
        self.busy.activate();

        debug!(generation = ticket.generation, "Submission accepted");
        Ok((ticket, request))
    }

    /// Applies the outcome of the request issued for `ticket`.
    ///
    /// Returns false if the ticket is stale and the outcome was discarded.
    pub fn complete(&mut self, ticket: Ticket, outcome: Result<ResponsePayload>) -> bool {
        if self.outstanding != Some(ticket) {
            warn!(
                generation = ticket.generation,
                current = self.generation,
                "Discarding stale response"
            );
            return false;
        }

        self.outstanding = None;
        self.busy.deactivate();

        self.display = match outcome {
            Ok(payload) => {
                let state = self.dispatcher.render(&payload);
                info!(sections = state.len(), "Response rendered");
                state
            }
            Err(QueryLensError::Service {
                status,
                message,
                failed_query,
            }) => {
                warn!(status, "Request failed: {}", message);
                RenderState::from_sections(vec![error_section(message, failed_query)])
            }
            Err(e) => {
                warn!("{}: {}", e.category(), e);
                RenderState::from_sections(vec![error_section(e.to_string(), None)])
            }
        };
        true
    }

    /// Empties the display. Refused while a request is outstanding.
    pub fn clear(&mut self) -> Result<()> {
        if self.outstanding.is_some() {
            return Err(QueryLensError::Busy);
        }
        self.display = RenderState::new();
        Ok(())
    }

    /// The sections currently on display.
    pub fn display(&self) -> &RenderState {
        &self.display
    }

    pub fn busy(&self) -> &BusyIndicator {
        &self.busy
    }

    pub fn is_busy(&self) -> bool {
        self.busy.is_active()
    }

    /// A handle to the service, for issuing a request off the UI task.
    pub fn service(&self) -> Arc<dyn QueryService> {
        Arc::clone(&self.service)
    }
}
