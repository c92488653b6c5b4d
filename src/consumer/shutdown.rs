//! Cooperative shutdown for the consumer loop.

use tokio::sync::watch;

/// Creates a connected trigger and signal.
#[must_use]
pub fn shutdown_channel() -> (ShutdownTrigger, ShutdownSignal) {
    let (sender, receiver) = watch::channel(false);
    (
        ShutdownTrigger { sender },
        ShutdownSignal {
            receiver: Some(receiver),
        },
    )
}

/// Requests shutdown.
#[derive(Debug)]
pub struct ShutdownTrigger {
    sender: watch::Sender<bool>,
}

impl ShutdownTrigger {
    /// Asks every connected signal to stop.
    pub fn trigger(&self) {
        self.sender.send_replace(true);
    }
}

/// Observes shutdown requests.
#[derive(Debug, Clone)]
pub struct ShutdownSignal {
    receiver: Option<watch::Receiver<bool>>,
}

impl ShutdownSignal {
    /// Returns a signal that never fires.
    #[must_use]
    pub const fn never() -> Self {
        Self { receiver: None }
    }

    /// Returns `true` once shutdown has been requested.
    #[must_use]
    pub fn is_triggered(&self) -> bool {
        self.receiver
            .as_ref()
            .is_some_and(|receiver| *receiver.borrow())
    }

    /// Resolves once shutdown is requested.
    ///
    /// Pends forever when the trigger is dropped without firing.
    pub async fn triggered(&mut self) {
        let Some(receiver) = self.receiver.as_mut() else {
            return std::future::pending().await;
        };
        if receiver.wait_for(|stop| *stop).await.is_err() {
            std::future::pending::<()>().await;
        }
    }
}
