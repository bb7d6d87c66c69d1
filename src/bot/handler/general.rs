use crate::bot::{
    currency::all_codes_sorted,
    store::{CrudError, SessionStore},
};

use super::{
    constants::{COMMAND_ADD, COMMAND_CANCEL, COMMAND_ISO, COMMAND_START, COMMAND_STOP},
    sorted_commands,
    utils::{Action, CommandRequest, CommandResult, Reply},
};

/* Start command.
 * Subscribes the chat to daily notifications.
 */
pub fn action_start(request: &CommandRequest, store: &dyn SessionStore) -> CommandResult {
    let chat_id = request.chat_id;
    match store.subscribe(chat_id) {
        Ok(()) => {
            log::info!("Subscribe - Chat {} subscribed", chat_id);
            Ok(Action::Send(Reply::new(format!(
                "👋 You were subscribed to daily notifications! Send {COMMAND_STOP} if you don't want that."
            ))))
        }
        Err(CrudError::AlreadySubscribed) => {
            log::info!("Subscribe - Chat {} is already subscribed", chat_id);
            Ok(Action::Send(Reply::new("You are already subscribed. 😊")))
        }
        Err(err) => Err(err.into()),
    }
}

/* Stop command.
 * Unsubscribes the chat from daily notifications. Its settings are kept.
 */
pub fn action_stop(request: &CommandRequest, store: &dyn SessionStore) -> CommandResult {
    let chat_id = request.chat_id;
    match store.unsubscribe(chat_id) {
        Ok(()) => {
            log::info!("Unsubscribe - Chat {} unsubscribed", chat_id);
            Ok(Action::Send(Reply::new(format!(
                "👋 You were unsubscribed from daily notifications. Send {COMMAND_START} to subscribe again."
            ))))
        }
        Err(CrudError::NotSubscribed) => {
            log::info!("Unsubscribe - Chat {} is not subscribed", chat_id);
            Ok(Action::Send(Reply::new(format!(
                "You are not subscribed. Send {COMMAND_START} to subscribe."
            ))))
        }
        Err(err) => Err(err.into()),
    }
}

/* Get command.
 * The report itself is composed outside the processor, as it needs the rates API.
 */
pub fn action_get(request: &CommandRequest, _store: &dyn SessionStore) -> CommandResult {
    log::info!("Get - Chat {} requested rates", request.chat_id);
    Ok(Action::SendReport)
}

// Displays all commands, sorted.
pub fn help_message() -> String {
    let commands = sorted_commands()
        .iter()
        .map(|command| format!("{} - {}", command.usage, command.description))
        .collect::<Vec<String>>()
        .join("\n");

    format!("Hello! Welcome to FixrBot. 💱 I help you keep track of currency values from around the world.\nHere are my features:\n\n{commands}\n")
}

/* Help command.
 * Also the fallback for anything the bot does not recognise.
 */
pub fn action_help(_request: &CommandRequest, _store: &dyn SessionStore) -> CommandResult {
    Ok(Action::Send(Reply::new(help_message())))
}

// Displays all supported currencies, sorted by code.
pub fn iso_message() -> String {
    all_codes_sorted()
        .iter()
        .map(|(code, name)| format!("{code}, {name}\n"))
        .collect()
}

/* ISO command.
 * Lists the codes that can be passed to /setbase and /add.
 */
pub fn action_iso(_request: &CommandRequest, _store: &dyn SessionStore) -> CommandResult {
    Ok(Action::Send(Reply::new(iso_message())))
}

/* Cancel command.
 * Reaches here only when no /add is in progress, thus nothing to cancel.
 */
pub fn action_cancel(request: &CommandRequest, _store: &dyn SessionStore) -> CommandResult {
    log::info!("Cancel - Chat {} had nothing to cancel", request.chat_id);
    Ok(Action::Send(Reply::new(
        "I'm not doing anything... 👀\nThere's nothing to cancel!",
    )))
}

/* Done command.
 * Reaches here only when no /add is in progress.
 */
pub fn action_done(request: &CommandRequest, _store: &dyn SessionStore) -> CommandResult {
    log::info!("Done - Chat {} had no rates in progress", request.chat_id);
    Ok(Action::Send(Reply::new(format!(
        "There's nothing to finish! Send {COMMAND_ADD} to start picking currencies, or check {COMMAND_ISO} for their codes. {COMMAND_CANCEL} is only needed in the middle of an {COMMAND_ADD}."
    ))))
}
