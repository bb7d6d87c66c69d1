use teloxide::types::{ChatId, KeyboardButton, KeyboardMarkup, KeyboardRemove, ReplyMarkup};

use super::constants::{COMMAND_CANCEL, COMMAND_DONE};
use crate::bot::processor::ProcessError;

/* Common utilites for handlers. */

pub type CommandResult = Result<Action, ProcessError>;

// Keyboard to show alongside a reply.
#[derive(Clone, Debug, PartialEq)]
pub enum Keyboard {
    // Buttons for finishing or bailing out of an /add.
    DialogueControls,
    Remove,
}

#[derive(Clone, Debug, PartialEq)]
pub struct Reply {
    pub text: String,
    pub keyboard: Option<Keyboard>,
}

impl Reply {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            keyboard: None,
        }
    }

    pub fn with_keyboard(text: impl Into<String>, keyboard: Keyboard) -> Self {
        Self {
            text: text.into(),
            keyboard: Some(keyboard),
        }
    }
}

// What the processor should do after a command handler ran.
#[derive(Clone, Debug, PartialEq)]
pub enum Action {
    Send(Reply),
    SendReport,
    StartDialogue,
}

// A parsed command, addressed to a handler.
#[derive(Clone, Debug)]
pub struct CommandRequest<'a> {
    pub chat_id: ChatId,
    pub args: Vec<&'a str>,
}

impl<'a> CommandRequest<'a> {
    pub fn new(chat_id: ChatId, args: &'a str) -> Self {
        Self {
            chat_id,
            args: args.split_whitespace().collect(),
        }
    }

    pub fn first_arg(&self) -> Option<&'a str> {
        self.args.first().copied()
    }
}

// Make a reply keyboard of text buttons, sized to fit the buttons.
pub fn make_keyboard(options: Vec<&str>, columns: usize) -> KeyboardMarkup {
    let keyboard: Vec<Vec<KeyboardButton>> = options
        .chunks(columns.max(1))
        .map(|chunk| {
            chunk
                .iter()
                .map(|option| KeyboardButton::new(option.to_string()))
                .collect()
        })
        .collect();

    KeyboardMarkup::new(keyboard).resize_keyboard(true)
}

// Converts a keyboard directive into Telegram markup.
pub fn keyboard_markup(keyboard: &Keyboard) -> ReplyMarkup {
    match keyboard {
        Keyboard::DialogueControls => {
            ReplyMarkup::Keyboard(make_keyboard(vec![COMMAND_DONE, COMMAND_CANCEL], 2))
        }
        Keyboard::Remove => ReplyMarkup::KeyboardRemove(KeyboardRemove::new()),
    }
}

#[cfg(test)]
mod tests {
    use teloxide::types::{ChatId, ReplyMarkup};

    use super::{keyboard_markup, make_keyboard, CommandRequest, Keyboard};

    #[test]
    fn test_command_request_args() {
        let request = CommandRequest::new(ChatId(1), "  EUR   GBP ");
        assert_eq!(request.args, vec!["EUR", "GBP"]);
        assert_eq!(request.first_arg(), Some("EUR"));

        let request = CommandRequest::new(ChatId(1), "");
        assert!(request.args.is_empty());
        assert_eq!(request.first_arg(), None);
    }

    #[test]
    fn test_make_keyboard() {
        let keyboard = make_keyboard(vec!["a", "b", "c"], 2);
        assert_eq!(keyboard.keyboard.len(), 2);
        assert_eq!(keyboard.keyboard[0].len(), 2);
        assert_eq!(keyboard.keyboard[1].len(), 1);
        assert_eq!(keyboard.resize_keyboard, Some(true));

        let keyboard = make_keyboard(vec!["a", "b"], 0);
        assert_eq!(keyboard.keyboard.len(), 2);
    }

    #[test]
    fn test_keyboard_markup() {
        match keyboard_markup(&Keyboard::DialogueControls) {
            ReplyMarkup::Keyboard(markup) => {
                assert_eq!(markup.keyboard[0][0].text, "/done");
                assert_eq!(markup.keyboard[0][1].text, "/cancel");
                assert_eq!(markup.resize_keyboard, Some(true));
            }
            _ => panic!("Expected a reply keyboard"),
        }
        assert!(matches!(
            keyboard_markup(&Keyboard::Remove),
            ReplyMarkup::KeyboardRemove(_)
        ));
    }
}
