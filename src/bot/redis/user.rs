use redis::{Commands, Connection, RedisResult};

/* User CRUD Operations
 * A user is a chat subscribed to daily notifications.
 * Registered chats live in a single set, settings live in a hash per chat.
 */

const USERS_KEY: &str = "users";
const USER_KEY: &str = "user";
const BASE_FIELD: &str = "base";

// Adds a chat to the registered set.
// Returns false if it was already a member.
pub fn add_user(con: &mut Connection, chat_id: i64) -> RedisResult<bool> {
    let added: i64 = con.sadd(USERS_KEY, chat_id)?;
    Ok(added > 0)
}

// Checks if a chat is registered
pub fn get_user_exists(con: &mut Connection, chat_id: i64) -> RedisResult<bool> {
    con.sismember(USERS_KEY, chat_id)
}

// Removes a chat from the registered set.
// Returns false if it was not a member.
pub fn delete_user(con: &mut Connection, chat_id: i64) -> RedisResult<bool> {
    let removed: i64 = con.srem(USERS_KEY, chat_id)?;
    Ok(removed > 0)
}

// Gets all registered chats, as stored
pub fn get_users(con: &mut Connection) -> RedisResult<Vec<String>> {
    con.smembers(USERS_KEY)
}

// Sets the base currency of a chat
pub fn set_user_base(con: &mut Connection, chat_id: i64, base: &str) -> RedisResult<()> {
    con.hset(format!("{USER_KEY}:{chat_id}"), BASE_FIELD, base)
}

// Gets the base currency of a chat, if set
pub fn get_user_base(con: &mut Connection, chat_id: i64) -> RedisResult<Option<String>> {
    con.hget(format!("{USER_KEY}:{chat_id}"), BASE_FIELD)
}

// Deletes all settings of a chat
// Only needed to clean up after tests
#[cfg(test)]
pub fn delete_user_settings(con: &mut Connection, chat_id: i64) -> RedisResult<()> {
    con.del(format!("{USER_KEY}:{chat_id}"))
}
