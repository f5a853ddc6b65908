//! Bounded per-actor mailboxes
//!
//! Sending never blocks: a full mailbox drops the message and reports
//! [`CoreError::MailboxFull`] to the sender. Receiving is the only place an
//! actor suspends. Messages to one mailbox are delivered in send order.

use crate::error::{CoreError, Result};
use tokio::sync::mpsc::{self, error::TrySendError};
use tokio::time::Instant;

/// Messages that carry a tag, so a blocking request can check it got the
/// response it asked for.
pub trait Tagged {
    fn tag(&self) -> &'static str;
}

/// Create a mailbox for the actor `name` with room for `capacity` messages.
pub fn mailbox<M>(name: &'static str, capacity: usize) -> Result<(Address<M>, Mailbox<M>)> {
    if capacity == 0 {
        return Err(CoreError::invalid_argument(format!(
            "mailbox capacity for {} must be at least 1",
            name
        )));
    }
    let (tx, rx) = mpsc::channel(capacity);
    Ok((Address { name, tx }, Mailbox { name, rx }))
}

/// Sending side of a mailbox. Cheap to clone.
#[derive(Debug)]
pub struct Address<M> {
    name: &'static str,
    tx: mpsc::Sender<M>,
}

impl<M> Clone for Address<M> {
    fn clone(&self) -> Self {
        Self {
            name: self.name,
            tx: self.tx.clone(),
        }
    }
}

impl<M> Address<M> {
    /// Name of the receiving actor
    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Post a message without blocking.
    ///
    /// Waking the receiver is part of the send, so this is also safe to call
    /// from the interrupt side of the foot switch.
    pub fn send(&self, message: M) -> Result<()> {
        self.tx.try_send(message).map_err(|e| match e {
            TrySendError::Full(_) => CoreError::MailboxFull { actor: self.name },
            TrySendError::Closed(_) => CoreError::MailboxClosed { actor: self.name },
        })
    }

    pub fn is_closed(&self) -> bool {
        self.tx.is_closed()
    }
}

impl<M: Tagged> Address<M> {
    /// Blocking request/response over a private reply mailbox.
    ///
    /// `make` builds the request from the reply address. Waits without a
    /// timeout; a response with a tag other than `expected` is an error.
    pub async fn request<F>(&self, make: F, expected: &'static str) -> Result<M>
    where
        F: FnOnce(Address<M>) -> M,
    {
        let (reply_to, mut replies) = mailbox("reply", 1)?;
        self.send(make(reply_to))?;
        replies.receive_expected(expected).await
    }
}

/// Outcome of a receive with a deadline
#[derive(Debug)]
pub enum Received<M> {
    Message(M),
    TimedOut,
    Closed,
}

/// Receiving side of a mailbox, owned by exactly one actor.
#[derive(Debug)]
pub struct Mailbox<M> {
    name: &'static str,
    rx: mpsc::Receiver<M>,
}

impl<M> Mailbox<M> {
    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Wait for the next message. `None` once every address is dropped.
    pub async fn receive(&mut self) -> Option<M> {
        self.rx.recv().await
    }

    /// Wait for the next message until `deadline`
    pub async fn receive_until(&mut self, deadline: Instant) -> Received<M> {
        match tokio::time::timeout_at(deadline, self.rx.recv()).await {
            Ok(Some(message)) => Received::Message(message),
            Ok(None) => Received::Closed,
            Err(_) => Received::TimedOut,
        }
    }

    /// Take a message if one is already queued
    pub fn try_receive(&mut self) -> Option<M> {
        self.rx.try_recv().ok()
    }
}

impl<M: Tagged> Mailbox<M> {
    /// Block for the next message and require it to carry `expected`.
    pub async fn receive_expected(&mut self, expected: &'static str) -> Result<M> {
        match self.rx.recv().await {
            Some(message) if message.tag() == expected => Ok(message),
            Some(message) => {
                tracing::error!(
                    "{} expected {} but received {}",
                    self.name,
                    expected,
                    message.tag()
                );
                Err(CoreError::UnexpectedMessage {
                    expected,
                    received: message.tag(),
                })
            }
            None => Err(CoreError::MailboxClosed { actor: self.name }),
        }
    }
}
