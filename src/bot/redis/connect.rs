use std::time::Duration;

use redis::{Client, Connection, RedisResult};

const CONNECTION_TIMEOUT: Duration = Duration::from_secs(5);

// Opens a connection, bounded by a timeout on connect, reads, and writes.
pub fn connect(client: &Client) -> RedisResult<Connection> {
    let con = client.get_connection_with_timeout(CONNECTION_TIMEOUT)?;
    con.set_read_timeout(Some(CONNECTION_TIMEOUT))?;
    con.set_write_timeout(Some(CONNECTION_TIMEOUT))?;
    Ok(con)
}

// Tests connection to Redis
pub fn ping(con: &mut Connection) -> RedisResult<bool> {
    let reply: String = redis::cmd("PING").query(con)?;
    Ok(reply == "PONG")
}

#[cfg(test)]
pub const TEST_REDIS_URL: &str = "redis://127.0.0.1/";

#[cfg(test)]
pub fn test_connection() -> Connection {
    let client = Client::open(TEST_REDIS_URL).expect("Failed to connect to Redis");
    connect(&client).expect("Failed to get Redis connection")
}
