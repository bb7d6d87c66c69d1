use std::collections::BTreeSet;

use redis::{Commands, Connection, RedisResult};

/* Rate CRUD Operations
 * The rates of a chat are the currency codes it wants reported, kept as a Redis set.
 */

const RATES_KEY: &str = "rates";

// Gets all rates of a chat
pub fn get_rates(con: &mut Connection, chat_id: i64) -> RedisResult<BTreeSet<String>> {
    let rates: Vec<String> = con.smembers(format!("{RATES_KEY}:{chat_id}"))?;
    Ok(rates.into_iter().collect())
}

// Replaces all rates of a chat in a single transaction.
pub fn set_rates(con: &mut Connection, chat_id: i64, rates: &BTreeSet<String>) -> RedisResult<()> {
    let key = format!("{RATES_KEY}:{chat_id}");
    let mut pipe = redis::pipe();
    pipe.atomic().del(&key).ignore();
    if !rates.is_empty() {
        let members: Vec<&str> = rates.iter().map(String::as_str).collect();
        pipe.sadd(&key, members).ignore();
    }
    pipe.query(con)
}

// Deletes a single rate from a chat
pub fn delete_rate(con: &mut Connection, chat_id: i64, rate: &str) -> RedisResult<()> {
    con.srem(format!("{RATES_KEY}:{chat_id}"), rate)
}

// Deletes all rates from a chat
pub fn delete_all_rates(con: &mut Connection, chat_id: i64) -> RedisResult<()> {
    con.del(format!("{RATES_KEY}:{chat_id}"))
}
