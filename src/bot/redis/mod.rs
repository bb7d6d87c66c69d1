// Exported structs and types
pub use self::manager::RedisStore;

// Submodules
mod connect;
mod manager;
mod rate;
mod user;
