//! Actor capability and task spawning

use super::mailbox::Mailbox;
use async_trait::async_trait;
use tokio::task::JoinHandle;

/// A free-standing unit of control that owns its state and talks to the rest
/// of the system only through mailboxes.
///
/// `run` alternates between receiving one message, processing it and sending
/// zero or more messages. It returns once its mailbox is closed.
#[async_trait]
pub trait Actor: Send + 'static {
    type Message: Send + 'static;

    /// Name used in logs
    const NAME: &'static str;

    async fn run(self, mailbox: Mailbox<Self::Message>);
}

/// Spawn an actor on its own task, consuming the mailbox it will drain.
pub fn spawn<A: Actor>(actor: A, mailbox: Mailbox<A::Message>) -> JoinHandle<()> {
    tokio::spawn(async move {
        tracing::info!("{} task started", A::NAME);
        actor.run(mailbox).await;
        tracing::info!("{} task stopped", A::NAME);
    })
}
