use std::collections::BTreeSet;

use redis::{Client, Connection, RedisError};
use teloxide::types::ChatId;

use super::{
    connect::{connect, ping},
    rate::{delete_all_rates, delete_rate, get_rates, set_rates},
    user::{add_user, delete_user, get_user_base, get_user_exists, get_users, set_user_base},
};
use crate::bot::{
    currency::{is_valid, DEFAULT_BASE},
    store::{CrudError, SessionStore},
};

/* Redis Manager
 * Manager implements the session store on top of Redis.
 * No other module should call any of the database operations directly,
 * only through the manager.
 */

// Implement the From trait to convert from RedisError to CrudError
impl From<RedisError> for CrudError {
    fn from(redis_error: RedisError) -> CrudError {
        CrudError::StoreUnavailable(redis_error.to_string())
    }
}

pub struct RedisStore {
    client: Client,
}

impl RedisStore {
    // Does not connect yet, only validates the URL.
    pub fn open(redis_url: &str) -> Result<Self, CrudError> {
        let client = Client::open(redis_url)?;
        Ok(Self { client })
    }

    fn connection(&self) -> Result<Connection, CrudError> {
        Ok(connect(&self.client)?)
    }

    // Checks that Redis is reachable and answering.
    pub fn test_connection(&self) -> Result<bool, CrudError> {
        let mut con = self.connection()?;
        Ok(ping(&mut con)?)
    }
}

impl SessionStore for RedisStore {
    fn is_subscribed(&self, chat_id: ChatId) -> Result<bool, CrudError> {
        let mut con = self.connection()?;
        Ok(get_user_exists(&mut con, chat_id.0)?)
    }

    /* Subscribes a chat.
     * Membership is decided by the set insertion itself, so two racing subscribes cannot both succeed.
     */
    fn subscribe(&self, chat_id: ChatId) -> Result<(), CrudError> {
        let mut con = self.connection()?;

        if !add_user(&mut con, chat_id.0)? {
            return Err(CrudError::AlreadySubscribed);
        }
        set_user_base(&mut con, chat_id.0, DEFAULT_BASE)?;
        Ok(())
    }

    fn unsubscribe(&self, chat_id: ChatId) -> Result<(), CrudError> {
        let mut con = self.connection()?;

        if delete_user(&mut con, chat_id.0)? {
            Ok(())
        } else {
            Err(CrudError::NotSubscribed)
        }
    }

    fn list_subscribed(&self) -> Result<Vec<ChatId>, CrudError> {
        let mut con = self.connection()?;

        let mut chats = Vec::new();
        for member in get_users(&mut con)? {
            match member.parse::<i64>() {
                Ok(id) => chats.push(ChatId(id)),
                Err(_) => log::warn!("Redis Manager - Skipping unparsable chat id {}", member),
            }
        }
        Ok(chats)
    }

    fn get_base_currency(&self, chat_id: ChatId) -> Result<String, CrudError> {
        let mut con = self.connection()?;

        match get_user_base(&mut con, chat_id.0)? {
            Some(base) => Ok(base),
            None => Ok(DEFAULT_BASE.to_string()),
        }
    }

    fn set_base_currency(&self, chat_id: ChatId, base: &str) -> Result<(), CrudError> {
        if !is_valid(base) {
            return Err(CrudError::InvalidBase(base.to_string()));
        }

        let mut con = self.connection()?;
        set_user_base(&mut con, chat_id.0, base)?;
        Ok(())
    }

    fn get_rate_selection(&self, chat_id: ChatId) -> Result<BTreeSet<String>, CrudError> {
        let mut con = self.connection()?;
        Ok(get_rates(&mut con, chat_id.0)?)
    }

    fn replace_rate_selection(
        &self,
        chat_id: ChatId,
        rates: &BTreeSet<String>,
    ) -> Result<(), CrudError> {
        let mut con = self.connection()?;
        Ok(set_rates(&mut con, chat_id.0, rates)?)
    }

    fn remove_rate(&self, chat_id: ChatId, rate: &str) -> Result<(), CrudError> {
        let mut con = self.connection()?;
        Ok(delete_rate(&mut con, chat_id.0, rate)?)
    }

    fn clear_rates(&self, chat_id: ChatId) -> Result<(), CrudError> {
        let mut con = self.connection()?;
        Ok(delete_all_rates(&mut con, chat_id.0)?)
    }
}
