//! Persistence adapter
//!
//! Serves the configuration and preset request/response messages from a
//! [`KeyValueStore`].

pub mod nvs;
pub mod store;

pub use nvs::{NvsStorage, PresetRecord};
pub use store::{FileStore, KeyValueStore, MemoryStore, StoredValue};

use async_trait::async_trait;
use footlight_core::message::reply;
use footlight_core::runtime::{Actor, Mailbox, Tagged};
use footlight_core::Message;

/// Mailbox capacity of the persistence actor
pub const PERSISTENCE_QUEUE_CAPACITY: usize = 10;

pub struct PersistenceActor<S: KeyValueStore> {
    storage: NvsStorage<S>,
}

impl<S: KeyValueStore> PersistenceActor<S> {
    pub fn new(store: S) -> Self {
        Self {
            storage: NvsStorage::new(store),
        }
    }

    pub fn handle(&mut self, message: Message) {
        match message {
            Message::RequestConfiguration { reply_to } => {
                let result = self.storage.load_config().map_err(|e| e.into_core());
                reply(Some(&reply_to), Message::ConfigurationResponse(result));
            }
            Message::SetConfiguration { config, reply_to } => {
                let result = self
                    .storage
                    .store_config(&config)
                    .map_err(|e| e.into_core());
                if let Err(e) = &result {
                    tracing::error!("Failed to store configuration: {}", e);
                }
                reply(reply_to.as_ref(), Message::SetConfigurationResponse(result));
            }
            Message::RequestPresets { reply_to } => {
                let result = self.storage.load_presets().map_err(|e| e.into_core());
                reply(Some(&reply_to), Message::PresetsResponse(result));
            }
            Message::SetPresets { presets, reply_to } => {
                let result = self
                    .storage
                    .store_presets(&presets)
                    .map_err(|e| e.into_core());
                if let Err(e) = &result {
                    tracing::error!("Failed to store presets: {}", e);
                }
                reply(reply_to.as_ref(), Message::SetPresetsResponse(result));
            }
            other => tracing::warn!("Persistence ignoring unexpected {}", other.tag()),
        }
    }
}

#[async_trait]
impl<S: KeyValueStore> Actor for PersistenceActor<S> {
    type Message = Message;
    const NAME: &'static str = "persistence";

    async fn run(mut self, mut mailbox: Mailbox<Message>) {
        while let Some(message) = mailbox.receive().await {
            self.handle(message);
        }
    }
}
