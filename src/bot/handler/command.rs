use teloxide::utils::command::BotCommands;

use super::constants::{
    COMMAND_ADD, COMMAND_CANCEL, COMMAND_CLEAR, COMMAND_DELETE, COMMAND_DONE, COMMAND_GET,
    COMMAND_HELP, COMMAND_ISO, COMMAND_SET_BASE, COMMAND_START, COMMAND_STOP,
};

/* Commands as sent by a chat.
 * Arguments are kept as raw text and split by the handlers themselves.
 * Extra words after a command without arguments are ignored.
 */
#[derive(BotCommands, Clone, Debug, PartialEq)]
#[command(rename_rule = "lowercase")]
pub enum Command {
    Start,
    Stop,
    Get,
    Setbase(String),
    Add(String),
    Del(String),
    Clear,
    Iso,
    Help,
    Done,
    Cancel,
}

impl Command {
    // Token of the command table entry handling this command.
    pub fn token(&self) -> &'static str {
        match self {
            Command::Start => COMMAND_START,
            Command::Stop => COMMAND_STOP,
            Command::Get => COMMAND_GET,
            Command::Setbase(_) => COMMAND_SET_BASE,
            Command::Add(_) => COMMAND_ADD,
            Command::Del(_) => COMMAND_DELETE,
            Command::Clear => COMMAND_CLEAR,
            Command::Iso => COMMAND_ISO,
            Command::Help => COMMAND_HELP,
            Command::Done => COMMAND_DONE,
            Command::Cancel => COMMAND_CANCEL,
        }
    }

    pub fn args(&self) -> &str {
        match self {
            Command::Setbase(args) | Command::Add(args) | Command::Del(args) => args.trim(),
            _ => "",
        }
    }
}

/* Parses a message into a command.
 * A mention of this bot after the command, as sent in group chats, is accepted.
 * Anything else, including commands meant for another bot, is not a command.
 */
pub fn parse_command(text: &str, bot_name: &str) -> Option<Command> {
    match Command::parse(text.trim(), bot_name) {
        Ok(command) => Some(command),
        Err(err) => {
            log::debug!("Command - \"{}\" is not a command: {}", text, err);
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{parse_command, Command};

    const BOT_NAME: &str = "FixrBot";

    #[test]
    fn test_parse_command() {
        assert_eq!(parse_command("/start", BOT_NAME), Some(Command::Start));
        assert_eq!(parse_command("/start now", BOT_NAME), Some(Command::Start));
        assert_eq!(
            parse_command("  /add EUR  GBP ", BOT_NAME),
            Some(Command::Add("EUR  GBP".to_string()))
        );
        assert_eq!(
            parse_command("/add", BOT_NAME),
            Some(Command::Add(String::new()))
        );
        assert_eq!(parse_command("/Start", BOT_NAME), None);
        assert_eq!(parse_command("hello /start", BOT_NAME), None);
        assert_eq!(parse_command("EUR", BOT_NAME), None);
        assert_eq!(parse_command("", BOT_NAME), None);
        assert_eq!(parse_command("/", BOT_NAME), None);
    }

    #[test]
    fn test_parse_command_with_mention() {
        assert_eq!(
            parse_command("/setbase@FixrBot EUR", BOT_NAME),
            Some(Command::Setbase("EUR".to_string()))
        );
        assert_eq!(parse_command("/done@FixrBot", BOT_NAME), Some(Command::Done));
        assert_eq!(parse_command("/cancel@fixrbot", BOT_NAME), Some(Command::Cancel));
        assert_eq!(parse_command("/done@OtherBot", BOT_NAME), None);
    }

    #[test]
    fn test_command_args() {
        let command = parse_command("/del   chf ", BOT_NAME).unwrap();
        assert_eq!(command.token(), "/del");
        assert_eq!(command.args(), "chf");
        assert_eq!(Command::Iso.args(), "");
    }
}
