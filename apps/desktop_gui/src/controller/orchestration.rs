//! Command orchestration helpers from UI actions to backend command queue.

use crossbeam_channel::{Sender, TrySendError};

use crate::backend_bridge::commands::BackendCommand;

/// Queues `cmd` for the backend worker. On failure the command is handed back
/// so the caller can unwind whatever it already applied for it.
pub fn dispatch_backend_command(
    cmd_tx: &Sender<BackendCommand>,
    cmd: BackendCommand,
    status: &mut String,
) -> Result<(), BackendCommand> {
    let cmd_name = cmd.name();
    match cmd_tx.try_send(cmd) {
        Ok(()) => {
            tracing::debug!(command = cmd_name, "queued ui->backend command");
            Ok(())
        }
        Err(TrySendError::Full(cmd)) => {
            *status = "Too many requests queued; please retry".to_string();
            tracing::warn!(command = cmd_name, "backend command queue is full");
            Err(cmd)
        }
        Err(TrySendError::Disconnected(cmd)) => {
            *status = "Background worker stopped; restart the app".to_string();
            tracing::error!(command = cmd_name, "backend command processor disconnected");
            Err(cmd)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossbeam_channel::bounded;
    use std::path::PathBuf;

    fn load(name: &str) -> BackendCommand {
        BackendCommand::LoadUpload {
            path: PathBuf::from(name),
        }
    }

    #[test]
    fn queues_commands_while_there_is_room() {
        let (tx, rx) = bounded(1);
        let mut status = String::new();
        assert!(dispatch_backend_command(&tx, load("a.png"), &mut status).is_ok());
        assert!(status.is_empty());
        assert!(matches!(
            rx.try_recv(),
            Ok(BackendCommand::LoadUpload { path }) if path == PathBuf::from("a.png")
        ));
    }

    #[test]
    fn full_queue_hands_the_command_back() {
        let (tx, _rx) = bounded(1);
        let mut status = String::new();
        assert!(dispatch_backend_command(&tx, load("a.png"), &mut status).is_ok());

        let returned = dispatch_backend_command(&tx, load("b.png"), &mut status);
        assert!(matches!(
            returned,
            Err(BackendCommand::LoadUpload { path }) if path == PathBuf::from("b.png")
        ));
        assert!(status.contains("retry"));
    }

    #[test]
    fn disconnected_worker_is_reported() {
        let (tx, rx) = bounded(1);
        drop(rx);
        let mut status = String::new();
        assert!(dispatch_backend_command(&tx, load("a.png"), &mut status).is_err());
        assert!(status.contains("worker stopped"));
    }
}
