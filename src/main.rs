use std::sync::Arc;

use teloxide::{requests::Requester, Bot};

use fixr::bot::{
    run_broadcaster, run_dispatcher, Config, DialogueStorage, Processor, RatesApi, RedisStore,
    SessionStore,
};

#[tokio::main]
pub async fn main() {
    dotenv::dotenv().ok();
    pretty_env_logger::init();
    log::info!("Starting Fixr bot...");

    let config = match Config::from_env() {
        Ok(config) => config,
        Err(err) => {
            log::error!("Invalid configuration: {}", err.to_string());
            return;
        }
    };

    let redis_store = match RedisStore::open(&config.redis_url) {
        Ok(store) => store,
        Err(err) => {
            log::error!("Failed to open Redis at {}: {}", config.redis_url, err.to_string());
            return;
        }
    };
    match redis_store.test_connection() {
        Ok(true) => log::info!("Connected to Redis at {}", config.redis_url),
        Ok(false) | Err(_) => {
            log::error!("Redis at {} is not answering", config.redis_url);
            return;
        }
    }
    let store: Arc<dyn SessionStore> = Arc::new(redis_store);

    let api = match RatesApi::new(&config.rates_api_url) {
        Ok(api) => Arc::new(api),
        Err(err) => {
            log::error!("Failed to build the rates API client: {}", err.to_string());
            return;
        }
    };

    let bot = Bot::from_env();
    let me = match bot.get_me().await {
        Ok(me) => me,
        Err(err) => {
            log::error!("Failed to reach Telegram: {}", err.to_string());
            return;
        }
    };
    let processor = Arc::new(Processor::new(
        store.clone(),
        DialogueStorage::new(),
        me.username(),
    ));

    tokio::spawn(run_broadcaster(
        bot.clone(),
        store,
        api.clone(),
        config.broadcast_time,
        config.broadcast_time_zone,
    ));

    log::info!("Fixr bot started successfully!");

    run_dispatcher(bot, processor, api).await;
}
