//! Command orchestration helpers from UI actions to backend command queue.

use crossbeam_channel::{Sender, TrySendError};

use crate::backend_bridge::commands::BackendCommand;
use crate::controller::events::{UiError, UiErrorContext};

pub fn dispatch_backend_command(
    cmd_tx: &Sender<BackendCommand>,
    cmd: BackendCommand,
) -> Result<(), UiError> {
    let cmd_name = cmd.name();

    let message = match cmd_tx.try_send(cmd) {
        Ok(()) => {
            tracing::debug!(command = cmd_name, "queued ui->backend command");
            return Ok(());
        }
        Err(TrySendError::Full(_)) => "UI command queue is full; please retry",
        Err(TrySendError::Disconnected(_)) => {
            "Backend command processor disconnected (possible startup/runtime failure); restart the app"
        }
    };
    tracing::warn!(command = cmd_name, "{message}");
    Err(UiError::from_message(UiErrorContext::CommandQueue, message))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::controller::events::UiErrorCategory;
    use client_core::LookupSequencer;
    use crossbeam_channel::bounded;

    fn lookup(sequencer: &LookupSequencer, query: &str) -> BackendCommand {
        BackendCommand::Lookup {
            ticket: sequencer.issue(),
            query: query.to_string(),
        }
    }

    #[test]
    fn queues_command() {
        let sequencer = LookupSequencer::default();
        let (tx, rx) = bounded(1);

        assert!(dispatch_backend_command(&tx, lookup(&sequencer, "France")).is_ok());
        assert!(matches!(
            rx.try_recv(),
            Ok(BackendCommand::Lookup { query, .. }) if query == "France"
        ));
    }

    #[test]
    fn full_or_closed_queue_is_a_command_queue_error() {
        let sequencer = LookupSequencer::default();
        let (tx, rx) = bounded(1);

        assert!(dispatch_backend_command(&tx, lookup(&sequencer, "France")).is_ok());
        let err = dispatch_backend_command(&tx, lookup(&sequencer, "Spain")).expect_err("full");
        assert!(err.message().contains("queue is full"));
        assert_eq!(err.context(), UiErrorContext::CommandQueue);
        assert_eq!(err.category(), UiErrorCategory::Transport);

        drop(rx);
        let err = dispatch_backend_command(&tx, lookup(&sequencer, "Italy")).expect_err("closed");
        assert!(err.message().contains("disconnected"));
    }
}
