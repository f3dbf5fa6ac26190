//! Long-running roles: HTTP producer, pipeline consumer, or both.

use photobooth_core::config::QueueBackend;
use photobooth_core::{Config, Photobooth};

use crate::server::{self, AppState};

/// Which roles this process plays.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Role {
    Serve,
    Consume,
    All,
}

impl Role {
    fn serves(self) -> bool {
        matches!(self, Role::Serve | Role::All)
    }

    fn consumes(self) -> bool {
        matches!(self, Role::Consume | Role::All)
    }
}

/// Connect backends and run the selected roles until Ctrl-C.
pub async fn execute(config: Config, role: Role) -> anyhow::Result<()> {
    if role != Role::All && config.queue.backend == QueueBackend::Memory {
        tracing::warn!(
            "In-process queue cannot be shared between processes; use `photobooth run` or the redis backend"
        );
    }
    let booth = Photobooth::connect(config).await?;

    let worker = if role.consumes() {
        let supervisor = booth.supervisor();
        tracing::info!(
            "Starting pipeline worker on queue '{}'",
            booth.config().queue.name
        );
        Some(tokio::spawn(async move { supervisor.run().await }))
    } else {
        None
    };

    if role.serves() {
        let addr = booth.config().server.bind_addr();
        tracing::info!(
            "Starting photobooth API ({} mode)",
            booth.config().server.mode
        );
        server::start_server(&addr, AppState::new(&booth), shutdown_signal()).await?;
    } else {
        shutdown_signal().await;
    }

    if let Some(worker) = worker {
        worker.abort();
    }
    tracing::info!("Shut down");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for Ctrl-C: {}", e);
        std::future::pending::<()>().await;
    }
    tracing::info!("Ctrl-C received, stopping");
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_role_selection() {
        assert!(Role::Serve.serves() && !Role::Serve.consumes());
        assert!(Role::Consume.consumes() && !Role::Consume.serves());
        assert!(Role::All.serves() && Role::All.consumes());
    }
}
