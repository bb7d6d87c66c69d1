use std::{fmt::Display, future::Future, sync::Arc};

use chrono::{DateTime, Duration, LocalResult, NaiveDateTime, NaiveTime, Offset, TimeZone, Utc};
use chrono_tz::Tz;
use teloxide::{types::ChatId, Bot};

use super::{
    api::RatesApi,
    dispatcher::send_report,
    store::{CrudError, SessionStore},
};

/* Broadcaster sends the daily rates report to every subscribed chat.
 * It runs alongside the dispatcher, and reads each chat's state only when its report is due.
 */

/* Delivers something to every subscribed chat.
 * A chat that fails is logged and skipped, the rest still get theirs.
 * Returns the number of chats delivered to.
 */
pub async fn broadcast<F, Fut, E>(store: &dyn SessionStore, mut deliver: F) -> Result<usize, CrudError>
where
    F: FnMut(ChatId) -> Fut,
    Fut: Future<Output = Result<(), E>>,
    E: Display,
{
    let chats = store.list_subscribed()?;
    let mut delivered = 0;
    for chat_id in chats {
        match deliver(chat_id).await {
            Ok(()) => delivered += 1,
            Err(err) => log::error!(
                "Broadcast - Failed to deliver to chat {}: {}",
                chat_id,
                err.to_string()
            ),
        }
    }

    Ok(delivered)
}

/* Resolves a local time to an instant.
 * A repeated local time resolves to its first occurrence.
 * A local time skipped by a clock change is moved forward by the length of the skip.
 */
fn resolve_local(local: NaiveDateTime, time_zone: Tz) -> Option<DateTime<Utc>> {
    match time_zone.from_local_datetime(&local) {
        LocalResult::Single(time) | LocalResult::Ambiguous(time, _) => {
            Some(time.with_timezone(&Utc))
        }
        LocalResult::None => {
            let before = time_zone
                .from_local_datetime(&(local - Duration::hours(3)))
                .earliest()?;
            let offset = Duration::seconds(before.offset().fix().local_minus_utc() as i64);
            Some(Utc.from_utc_datetime(&(local - offset)))
        }
    }
}

// Next time strictly after now, at the given local time in the given time zone.
pub fn next_run(now: DateTime<Utc>, at: NaiveTime, time_zone: Tz) -> DateTime<Utc> {
    let mut date = now.with_timezone(&time_zone).date_naive();
    for _ in 0..3 {
        if let Some(candidate) = resolve_local(date.and_time(at), time_zone) {
            if candidate > now {
                return candidate;
            }
        }
        date = match date.succ_opt() {
            Some(next) => next,
            None => break,
        };
    }

    now + Duration::days(1)
}

/* Runs the daily broadcast forever.
 * Sleeps until the next run, sends every report, then schedules the following one.
 */
pub async fn run_broadcaster(
    bot: Bot,
    store: Arc<dyn SessionStore>,
    api: Arc<RatesApi>,
    at: NaiveTime,
    time_zone: Tz,
) {
    loop {
        let now = Utc::now();
        let next = next_run(now, at, time_zone);
        log::info!("Broadcast - Next broadcast scheduled at {}", next);

        let wait = (next - now).to_std().unwrap_or_default();
        tokio::time::sleep(wait).await;

        log::info!("Broadcast - Sending currencies to all registered chats");
        let result = broadcast(store.as_ref(), |chat_id| {
            let bot = bot.clone();
            let store = store.clone();
            let api = api.clone();
            async move { send_report(&bot, store.as_ref(), &api, chat_id).await }
        })
        .await;

        match result {
            Ok(delivered) => log::info!("Broadcast - Delivered to {} chats", delivered),
            Err(err) => log::error!(
                "Broadcast - Failed to list subscribed chats: {}",
                err.to_string()
            ),
        }
    }
}
