use crate::bot::store::SessionStore;

use self::constants::{
    COMMAND_ADD, COMMAND_CANCEL, COMMAND_CLEAR, COMMAND_DELETE, COMMAND_DONE, COMMAND_GET,
    COMMAND_HELP, COMMAND_ISO, COMMAND_SET_BASE, COMMAND_START, COMMAND_STOP,
};

// Exported functions
pub use self::command::{parse_command, Command};
pub use self::general::action_help;
pub use self::rates::{display_rates, save_rates};
pub use self::utils::keyboard_markup;

// Exported structs and types
pub use self::constants::UNKNOWN_ERROR_MESSAGE;
pub use self::utils::{Action, CommandRequest, CommandResult, Keyboard, Reply};

// Submodules
mod command;
pub mod constants;
mod general;
mod rates;
mod settings;
mod utils;

pub type CommandHandler = fn(&CommandRequest, &dyn SessionStore) -> CommandResult;

pub struct CommandEntry {
    pub token: &'static str,
    pub usage: &'static str,
    pub description: &'static str,
    pub handler: CommandHandler,
}

/* Command table.
 * Every command the bot understands outside of an /add in progress.
 */
pub static COMMANDS: [CommandEntry; 11] = [
    CommandEntry {
        token: COMMAND_START,
        usage: "/start",
        description: "Subscribes to daily notifications",
        handler: general::action_start,
    },
    CommandEntry {
        token: COMMAND_STOP,
        usage: "/stop",
        description: "Unsubscribes from daily notifications",
        handler: general::action_stop,
    },
    CommandEntry {
        token: COMMAND_GET,
        usage: "/get",
        description: "Sends your rates right now",
        handler: general::action_get,
    },
    CommandEntry {
        token: COMMAND_SET_BASE,
        usage: "/setbase [code]",
        description: "Sets the base currency for calculations",
        handler: settings::action_set_base,
    },
    CommandEntry {
        token: COMMAND_ADD,
        usage: "/add [codes]",
        description: "Picks the currencies for notifications and requests, inline or one message at a time",
        handler: rates::action_add,
    },
    CommandEntry {
        token: COMMAND_DELETE,
        usage: "/del [code]",
        description: "Removes given rate from notifications and requests",
        handler: rates::action_delete,
    },
    CommandEntry {
        token: COMMAND_CLEAR,
        usage: "/clear",
        description: "Clears all your rates",
        handler: rates::action_clear,
    },
    CommandEntry {
        token: COMMAND_ISO,
        usage: "/iso",
        description: "Lists the ISO codes of currencies to pass to /setbase or /add",
        handler: general::action_iso,
    },
    CommandEntry {
        token: COMMAND_HELP,
        usage: "/help",
        description: "See this message",
        handler: general::action_help,
    },
    CommandEntry {
        token: COMMAND_DONE,
        usage: "/done",
        description: "Saves the currencies picked during /add",
        handler: general::action_done,
    },
    CommandEntry {
        token: COMMAND_CANCEL,
        usage: "/cancel",
        description: "Cancels /add without changing anything",
        handler: general::action_cancel,
    },
];

// Looks up the handler of a command token.
pub fn find_command(token: &str) -> Option<&'static CommandEntry> {
    COMMANDS.iter().find(|command| command.token == token)
}

// All commands, sorted by token.
pub fn sorted_commands() -> Vec<&'static CommandEntry> {
    let mut commands: Vec<&'static CommandEntry> = COMMANDS.iter().collect();
    commands.sort_by(|a, b| a.token.cmp(b.token));
    commands
}
