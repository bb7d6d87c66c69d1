/* Commands and messages shared between handlers. */

pub const COMMAND_START: &str = "/start";
pub const COMMAND_STOP: &str = "/stop";
pub const COMMAND_GET: &str = "/get";
pub const COMMAND_SET_BASE: &str = "/setbase";
pub const COMMAND_ADD: &str = "/add";
pub const COMMAND_DELETE: &str = "/del";
pub const COMMAND_CLEAR: &str = "/clear";
pub const COMMAND_ISO: &str = "/iso";
pub const COMMAND_HELP: &str = "/help";
pub const COMMAND_DONE: &str = "/done";
pub const COMMAND_CANCEL: &str = "/cancel";

pub const UNKNOWN_ERROR_MESSAGE: &str =
    "❓ Hmm, something went wrong on my end! Sorry, please try again later.";
