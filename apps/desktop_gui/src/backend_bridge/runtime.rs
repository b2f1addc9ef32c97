//! Runtime bridge between UI command queue and backend event intake.

use std::{sync::Arc, thread};

use client_core::{CountryClient, LookupController};
use crossbeam_channel::{Receiver, Sender};

use crate::backend_bridge::commands::BackendCommand;
use crate::controller::events::{UiError, UiErrorContext, UiEvent};
use crate::media::decode_preview_image;

/// Starts the backend worker thread. Each command runs as its own task so a
/// slow lookup never blocks a newer one.
pub fn launch(
    cmd_rx: Receiver<BackendCommand>,
    ui_tx: Sender<UiEvent>,
    controller: Arc<LookupController<CountryClient>>,
) {
    thread::spawn(move || {
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

        let _ = ui_tx.try_send(UiEvent::Info("Ready".to_string()));
        while let Ok(cmd) = cmd_rx.recv() {
            let controller = Arc::clone(&controller);
            let ui_tx = ui_tx.clone();
            runtime.spawn(async move {
                for event in handle_command(&controller, cmd).await {
                    if let Err(err) = ui_tx.try_send(event) {
                        tracing::warn!("dropping backend event: {err}");
                    }
                }
            });
        }
        tracing::info!("backend command channel closed; worker exiting");
    });
}

pub(crate) async fn handle_command(
    controller: &LookupController<CountryClient>,
    cmd: BackendCommand,
) -> Vec<UiEvent> {
    match cmd {
        BackendCommand::Lookup { ticket, query } => {
            let completed = controller.lookup_with_ticket(ticket, &query).await;
            vec![UiEvent::LookupCompleted(completed)]
        }
        BackendCommand::FetchFlag { ticket, url } => {
            if !controller.is_current(ticket) {
                tracing::debug!(ticket = ticket.value(), "skipping flag for stale lookup");
                return Vec::new();
            }
            let bytes = match controller.lookup_service().fetch_flag_image(&url).await {
                Ok(bytes) => bytes,
                Err(err) => {
                    tracing::warn!(ticket = ticket.value(), url = %url, "flag download failed: {err:#}");
                    return vec![UiEvent::FlagFailed {
                        ticket,
                        reason: format!("{err:#}"),
                    }];
                }
            };
            match decode_preview_image(&bytes) {
                Ok(image) => vec![UiEvent::FlagLoaded { ticket, image }],
                Err(reason) => {
                    tracing::warn!(ticket = ticket.value(), url = %url, "{reason}");
                    vec![UiEvent::FlagFailed { ticket, reason }]
                }
            }
        }
    }
}
