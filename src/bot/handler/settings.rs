use crate::bot::{
    currency::{display_name, normalize},
    store::{CrudError, SessionStore},
};

use super::{
    constants::{COMMAND_ISO, COMMAND_SET_BASE},
    utils::{Action, CommandRequest, CommandResult, Reply},
};

/* Set base command.
 * Sets the currency every rate of the chat is calculated against.
 * Validated here first, the store validates again.
 */
pub fn action_set_base(request: &CommandRequest, store: &dyn SessionStore) -> CommandResult {
    let chat_id = request.chat_id;
    let base = match request.first_arg() {
        Some(arg) => normalize(arg),
        None => {
            return Ok(Action::Send(Reply::new(format!(
                "Tell me which currency to use, like this: {COMMAND_SET_BASE} EUR\nSee {COMMAND_ISO} for all the codes I know."
            ))));
        }
    };

    let name = match display_name(&base) {
        Some(name) => name,
        None => {
            log::info!("Set Base - Chat {} sent unknown base {}", chat_id, base);
            return Ok(Action::Send(Reply::new(format!(
                "🚫 Base \"{base}\" is not recognized. See {COMMAND_ISO} for all the codes I know."
            ))));
        }
    };

    match store.set_base_currency(chat_id, &base) {
        Ok(()) => {
            log::info!("Set Base - Chat {} set base to {}", chat_id, base);
            Ok(Action::Send(Reply::new(format!(
                "💵 Base altered to {name} ({base})!"
            ))))
        }
        Err(CrudError::InvalidBase(base)) => Ok(Action::Send(Reply::new(format!(
            "🚫 Base \"{base}\" is not recognized. See {COMMAND_ISO} for all the codes I know."
        )))),
        Err(err) => Err(err.into()),
    }
}
