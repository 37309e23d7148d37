//! Reducer-like state transitions for the conversion window.
//!
//! `AppController` owns the only mutable display state. Submissions go out as
//! [`BackendCommand::Convert`] tagged with a fresh [`SubmissionToken`]; results
//! come back as [`UiEvent::ConversionCompleted`] in whatever order the network
//! delivers them, and only the one carrying the latest token is applied.

use client_core::ConversionResult;
use crossbeam_channel::{Receiver, Sender, TryRecvError};
use shared::domain::SubmissionToken;
use tracing::{debug, error, info};

use crate::backend_bridge::commands::BackendCommand;
use crate::controller::events::{UiError, UiErrorContext, UiEvent};
use crate::controller::orchestration::dispatch_backend_command;

const STATUS_READY: &str = "Ready";
const STATUS_CONVERTING: &str = "Converting…";
const BACKEND_STOPPED: &str = "error: backend worker stopped before the conversion completed";

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DisplayState {
    pub output_text: String,
}

pub struct AppController {
    cmd_tx: Sender<BackendCommand>,
    ui_rx: Receiver<UiEvent>,
    next_token: SubmissionToken,
    latest: Option<SubmissionToken>,
    pending: bool,
    stale_discards: u64,
    display: DisplayState,
    status: String,
}

impl AppController {
    pub fn new(cmd_tx: Sender<BackendCommand>, ui_rx: Receiver<UiEvent>) -> Self {
        Self {
            cmd_tx,
            ui_rx,
            next_token: SubmissionToken::FIRST,
            latest: None,
            pending: false,
            stale_discards: 0,
            display: DisplayState::default(),
            status: STATUS_READY.to_string(),
        }
    }

    /// Records `input` as the newest submission and queues its conversion.
    pub fn on_submit(&mut self, input: impl Into<String>) -> SubmissionToken {
        let text = input.into();
        let token = self.next_token;
        self.next_token = token.next();
        self.latest = Some(token);
        self.pending = true;
        self.status = STATUS_CONVERTING.to_string();
        info!(token = token.0, input_len = text.len(), "submitted conversion");

        if let Err(reason) =
            dispatch_backend_command(&self.cmd_tx, BackendCommand::Convert { token, text })
        {
            self.fail_latest(token, reason);
        }
        token
    }

    /// Drains every event the backend has posted since the last frame.
    pub fn process_ui_events(&mut self) {
        loop {
            match self.ui_rx.try_recv() {
                Ok(event) => self.handle_event(event),
                Err(TryRecvError::Empty) => break,
                Err(TryRecvError::Disconnected) => {
                    if let (true, Some(token)) = (self.pending, self.latest) {
                        error!(token = token.0, "backend event channel closed mid-conversion");
                        self.fail_latest(token, BACKEND_STOPPED.to_string());
                    }
                    break;
                }
            }
        }
    }

    pub fn handle_event(&mut self, event: UiEvent) {
        match event {
            UiEvent::Info(message) => {
                self.status = message;
            }
            UiEvent::Error(err) => {
                error!(context = ?err.context(), category = ?err.category(), "{}", err.message());
                self.status = err.status_line();
            }
            UiEvent::ConversionCompleted { token, result } => {
                self.reconcile(token, result);
            }
        }
    }

    /// Applies `result` only if `token` is still the latest submission.
    fn reconcile(&mut self, token: SubmissionToken, result: ConversionResult) {
        if self.latest != Some(token) {
            debug!(
                token = token.0,
                latest = ?self.latest.map(|t| t.0),
                "discarding stale conversion result"
            );
            self.stale_discards += 1;
            return;
        }

        self.pending = false;
        self.status = if result.is_success() {
            STATUS_READY.to_string()
        } else {
            "Conversion failed".to_string()
        };
        info!(token = token.0, success = result.is_success(), "applied conversion result");
        self.display.output_text = result.into_display_text();
    }

    /// Failure raised on the UI side rather than by the conversion client.
    fn fail_latest(&mut self, token: SubmissionToken, reason: String) {
        let status = UiError::from_message(UiErrorContext::Convert, reason.as_str()).status_line();
        self.reconcile(token, ConversionResult::Failure { reason });
        self.status = status;
    }

    pub fn output_text(&self) -> &str {
        &self.display.output_text
    }

    pub fn pending(&self) -> bool {
        self.pending
    }

    pub fn status(&self) -> &str {
        &self.status
    }

    /// Number of completions dropped because a newer submission existed.
    pub fn stale_discards(&self) -> u64 {
        self.stale_discards
    }

    pub fn latest_token(&self) -> Option<SubmissionToken> {
        self.latest
    }

    pub fn shutdown(&self) {
        let _ = dispatch_backend_command(&self.cmd_tx, BackendCommand::Shutdown);
    }
}

#[cfg(test)]
#[path = "tests/reducer_tests.rs"]
mod tests;
