use std::collections::BTreeSet;

use teloxide::types::ChatId;

use crate::bot::{
    currency::{is_valid, normalize},
    store::{CrudError, SessionStore},
};

use super::{
    constants::{COMMAND_ADD, COMMAND_DELETE, COMMAND_ISO},
    utils::{Action, CommandRequest, CommandResult, Reply},
};

/* Utilities */

// Displays a set of codes, in order.
pub fn display_rates(rates: &BTreeSet<String>) -> String {
    rates.iter().cloned().collect::<Vec<String>>().join(", ")
}

/* Saves the rates of a chat, collapsing duplicates.
 * Both ways of adding rates end here, so they always persist the same selection.
 */
pub fn save_rates<I>(
    store: &dyn SessionStore,
    chat_id: ChatId,
    codes: I,
) -> Result<BTreeSet<String>, CrudError>
where
    I: IntoIterator<Item = String>,
{
    let rates: BTreeSet<String> = codes.into_iter().collect();
    store.replace_rate_selection(chat_id, &rates)?;
    Ok(rates)
}

/* Add command.
 * Without arguments, starts collecting rates one message at a time.
 * With arguments, saves the valid codes among them right away.
 */
pub fn action_add(request: &CommandRequest, store: &dyn SessionStore) -> CommandResult {
    if request.args.is_empty() {
        return Ok(Action::StartDialogue);
    }

    let chat_id = request.chat_id;
    let (valid, invalid): (Vec<String>, Vec<String>) = request
        .args
        .iter()
        .map(|arg| normalize(arg))
        .partition(|code| is_valid(code));

    if valid.is_empty() {
        log::info!(
            "Add Rates - Chat {} sent no valid codes: {}",
            chat_id,
            invalid.join(", ")
        );
        return Ok(Action::Send(Reply::new(format!(
            "🚫 None of those are codes I know. See {COMMAND_ISO} for the valid ones."
        ))));
    }

    let rates = save_rates(store, chat_id, valid)?;
    log::info!(
        "Add Rates - Chat {} saved rates {}",
        chat_id,
        display_rates(&rates)
    );

    let mut message = format!("✅ Added the following rates: {}", display_rates(&rates));
    if !invalid.is_empty() {
        message.push_str(&format!("\nSkipped codes I don't know: {}", invalid.join(", ")));
    }
    Ok(Action::Send(Reply::new(message)))
}

/* Delete command.
 * Removes a single rate. Deleting a rate that is not there changes nothing.
 */
pub fn action_delete(request: &CommandRequest, store: &dyn SessionStore) -> CommandResult {
    let chat_id = request.chat_id;
    let rate = match request.first_arg() {
        Some(arg) => normalize(arg),
        None => {
            return Ok(Action::Send(Reply::new(format!(
                "Tell me which currency to remove, like this: {COMMAND_DELETE} EUR"
            ))));
        }
    };

    let was_selected = store.get_rate_selection(chat_id)?.contains(&rate);
    store.remove_rate(chat_id, &rate)?;
    log::info!("Delete Rate - Chat {} removed rate {}", chat_id, rate);

    if was_selected {
        Ok(Action::Send(Reply::new(format!("🗑 Removed currency {rate}."))))
    } else {
        Ok(Action::Send(Reply::new(format!(
            "{rate} isn't one of your rates, so nothing changed. Send {COMMAND_ADD} to pick some."
        ))))
    }
}

/* Clear command.
 * Removes all rates. With none selected, every currency is reported.
 */
pub fn action_clear(request: &CommandRequest, store: &dyn SessionStore) -> CommandResult {
    store.clear_rates(request.chat_id)?;
    log::info!("Clear Rates - Chat {} cleared all rates", request.chat_id);
    Ok(Action::Send(Reply::new(
        "🧹 Cleared all rates. Showing everything now.",
    )))
}
