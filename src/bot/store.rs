use std::{
    collections::{BTreeSet, HashMap},
    sync::{Mutex, MutexGuard},
};

use teloxide::types::ChatId;

use super::currency::{is_valid, DEFAULT_BASE};

/* Session Store
 * The store keeps all persistent per-chat state: subscriptions, base currencies, rate selections.
 * Every operation is keyed by a single chat, and is atomic for that chat only.
 * The processor talks to the store only through this trait, so it can be swapped
 * between Redis in production and memory in tests.
 */

#[derive(thiserror::Error, Debug, PartialEq, Clone)]
pub enum CrudError {
    #[error("Chat is already subscribed")]
    AlreadySubscribed,
    #[error("Chat is not subscribed")]
    NotSubscribed,
    #[error("Base currency {0} is not recognized")]
    InvalidBase(String),
    #[error("Store unavailable: {0}")]
    StoreUnavailable(String),
}

pub trait SessionStore: Send + Sync {
    fn is_subscribed(&self, chat_id: ChatId) -> Result<bool, CrudError>;

    // Adds the chat to the registered set, and resets its base currency to default.
    fn subscribe(&self, chat_id: ChatId) -> Result<(), CrudError>;

    fn unsubscribe(&self, chat_id: ChatId) -> Result<(), CrudError>;

    fn list_subscribed(&self) -> Result<Vec<ChatId>, CrudError>;

    // Defaults to DEFAULT_BASE if the chat never had one set.
    fn get_base_currency(&self, chat_id: ChatId) -> Result<String, CrudError>;

    fn set_base_currency(&self, chat_id: ChatId, base: &str) -> Result<(), CrudError>;

    fn get_rate_selection(&self, chat_id: ChatId) -> Result<BTreeSet<String>, CrudError>;

    // Replaces the whole selection. An empty set clears it.
    fn replace_rate_selection(
        &self,
        chat_id: ChatId,
        rates: &BTreeSet<String>,
    ) -> Result<(), CrudError>;

    // Removing a code that is not selected is a no-op.
    fn remove_rate(&self, chat_id: ChatId, rate: &str) -> Result<(), CrudError>;

    fn clear_rates(&self, chat_id: ChatId) -> Result<(), CrudError>;
}

/* In-memory store.
 * Mirrors the Redis layout: a registered set, a base per chat, a rate set per chat.
 */
#[derive(Debug, Default)]
struct MemoryState {
    registered: BTreeSet<ChatId>,
    bases: HashMap<ChatId, String>,
    rates: HashMap<ChatId, BTreeSet<String>>,
}

#[derive(Debug, Default)]
pub struct InMemStore {
    state: Mutex<MemoryState>,
}

impl InMemStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> Result<MutexGuard<'_, MemoryState>, CrudError> {
        self.state
            .lock()
            .map_err(|err| CrudError::StoreUnavailable(err.to_string()))
    }
}

impl SessionStore for InMemStore {
    fn is_subscribed(&self, chat_id: ChatId) -> Result<bool, CrudError> {
        Ok(self.lock()?.registered.contains(&chat_id))
    }

    fn subscribe(&self, chat_id: ChatId) -> Result<(), CrudError> {
        let mut state = self.lock()?;
        if !state.registered.insert(chat_id) {
            return Err(CrudError::AlreadySubscribed);
        }
        state.bases.insert(chat_id, DEFAULT_BASE.to_string());
        Ok(())
    }

    fn unsubscribe(&self, chat_id: ChatId) -> Result<(), CrudError> {
        if self.lock()?.registered.remove(&chat_id) {
            Ok(())
        } else {
            Err(CrudError::NotSubscribed)
        }
    }

    fn list_subscribed(&self) -> Result<Vec<ChatId>, CrudError> {
        Ok(self.lock()?.registered.iter().copied().collect())
    }

    fn get_base_currency(&self, chat_id: ChatId) -> Result<String, CrudError> {
        let state = self.lock()?;
        match state.bases.get(&chat_id) {
            Some(base) => Ok(base.clone()),
            None => Ok(DEFAULT_BASE.to_string()),
        }
    }

    fn set_base_currency(&self, chat_id: ChatId, base: &str) -> Result<(), CrudError> {
        if !is_valid(base) {
            return Err(CrudError::InvalidBase(base.to_string()));
        }
        self.lock()?.bases.insert(chat_id, base.to_string());
        Ok(())
    }

    fn get_rate_selection(&self, chat_id: ChatId) -> Result<BTreeSet<String>, CrudError> {
        Ok(self
            .lock()?
            .rates
            .get(&chat_id)
            .cloned()
            .unwrap_or_default())
    }

    fn replace_rate_selection(
        &self,
        chat_id: ChatId,
        rates: &BTreeSet<String>,
    ) -> Result<(), CrudError> {
        let mut state = self.lock()?;
        if rates.is_empty() {
            state.rates.remove(&chat_id);
        } else {
            state.rates.insert(chat_id, rates.clone());
        }
        Ok(())
    }

    fn remove_rate(&self, chat_id: ChatId, rate: &str) -> Result<(), CrudError> {
        if let Some(rates) = self.lock()?.rates.get_mut(&chat_id) {
            rates.remove(rate);
        }
        Ok(())
    }

    fn clear_rates(&self, chat_id: ChatId) -> Result<(), CrudError> {
        self.lock()?.rates.remove(&chat_id);
        Ok(())
    }
}
