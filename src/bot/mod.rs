// bot/mod.rs

// Exported functions
pub use self::broadcaster::{broadcast, next_run, run_broadcaster};
pub use self::dispatcher::run_dispatcher;
pub use self::report::{compose_report, format_report};

// Exported structs and types
pub use self::api::{ApiError, Rates, RatesApi};
pub use self::config::{Config, ConfigError};
pub use self::dialogue::{DialogueEngine, DialogueState, DialogueStorage};
pub use self::dispatcher::{BotError, HandlerResult};
pub use self::handler::{Keyboard, Reply};
pub use self::processor::{ProcessError, Processor, Response};
pub use self::redis::RedisStore;
pub use self::store::{CrudError, InMemStore, SessionStore};

// Declare submodules
mod api;
mod broadcaster;
mod config;
pub mod currency;
mod dialogue;
mod dispatcher;
mod handler;
mod processor;
mod redis;
mod report;
mod store;
