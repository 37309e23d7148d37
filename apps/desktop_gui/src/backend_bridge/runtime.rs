//! Runtime bridge between UI command queue and backend event intake.

use std::{sync::Arc, thread};

use client_core::{ConversionClient, HttpConversionClient, Settings, UnavailableConversionClient};
use crossbeam_channel::{Receiver, Sender};

use crate::backend_bridge::commands::BackendCommand;
use crate::controller::events::{UiError, UiErrorContext, UiEvent};

/// Builds the HTTP client from `settings` and starts the worker thread.
///
/// A bad server URL does not stop the worker: it runs with a client that
/// fails every conversion with the configuration error, and the UI is told once.
pub fn launch(
    settings: &Settings,
    cmd_rx: Receiver<BackendCommand>,
    ui_tx: Sender<UiEvent>,
) -> thread::JoinHandle<()> {
    match HttpConversionClient::from_settings(settings) {
        Ok(client) => {
            tracing::info!(endpoint = %client.endpoint(), "conversion client ready");
            launch_with_client(Arc::new(client), cmd_rx, ui_tx)
        }
        Err(err) => {
            tracing::error!("failed to build conversion client: {err}");
            let startup_error = UiError::from_message(UiErrorContext::BackendStartup, err.to_string());
            spawn_worker(
                Arc::new(UnavailableConversionClient::from(err)),
                Some(startup_error),
                cmd_rx,
                ui_tx,
            )
        }
    }
}

pub fn launch_with_client(
    client: Arc<dyn ConversionClient>,
    cmd_rx: Receiver<BackendCommand>,
    ui_tx: Sender<UiEvent>,
) -> thread::JoinHandle<()> {
    spawn_worker(client, None, cmd_rx, ui_tx)
}

fn spawn_worker(
    client: Arc<dyn ConversionClient>,
    startup_error: Option<UiError>,
    cmd_rx: Receiver<BackendCommand>,
    ui_tx: Sender<UiEvent>,
) -> thread::JoinHandle<()> {
    thread::spawn(move || {
        let _ = ui_tx.try_send(UiEvent::Info("Backend worker starting...".to_string()));
        let runtime = match tokio::runtime::Builder::new_multi_thread()
            .enable_all()
            .build()
        {
            Ok(runtime) => runtime,
            Err(err) => {
                let _ = ui_tx.try_send(UiEvent::Error(UiError::from_message(
                    UiErrorContext::BackendStartup,
                    format!("backend worker startup failure: failed to build runtime: {err}"),
                )));
                tracing::error!("failed to build backend runtime: {err}");
                return;
            }
        };

        match startup_error {
            Some(err) => {
                let _ = ui_tx.try_send(UiEvent::Error(err));
            }
            None => {
                let _ = ui_tx.try_send(UiEvent::Info("Backend worker ready".to_string()));
            }
        }

        while let Ok(cmd) = cmd_rx.recv() {
            match cmd {
                BackendCommand::Convert { token, text } => {
                    tracing::debug!(token = token.0, "backend: convert");
                    let client = Arc::clone(&client);
                    let ui_tx = ui_tx.clone();
                    runtime.spawn(async move {
                        let result = client.convert(&text).await;
                        tracing::debug!(
                            token = token.0,
                            success = result.is_success(),
                            "backend: convert finished"
                        );
                        // The event queue is bounded; a full queue parks a blocking-pool
                        // thread instead of an async worker.
                        let delivered = tokio::task::spawn_blocking(move || {
                            ui_tx
                                .send(UiEvent::ConversionCompleted { token, result })
                                .is_ok()
                        })
                        .await
                        .unwrap_or(false);
                        if !delivered {
                            tracing::debug!(token = token.0, "ui gone; dropping conversion result");
                        }
                    });
                }
                BackendCommand::Shutdown => {
                    tracing::info!("backend: shutdown requested");
                    break;
                }
            }
        }

        runtime.shutdown_background();
    })
}

#[cfg(test)]
#[path = "tests/runtime_tests.rs"]
mod tests;
