use std::sync::Arc;

use teloxide::{
    dispatching::dialogue::{Dialogue, InMemStorage},
    types::ChatId,
};

use super::{
    currency::{all_codes_sorted, is_valid, normalize},
    handler::{
        constants::{COMMAND_CANCEL, COMMAND_DONE, COMMAND_ISO},
        display_rates, parse_command, save_rates, Command, Keyboard, Reply,
    },
    processor::ProcessError,
    store::SessionStore,
};

/* Rate Dialogue
 * The multi-turn /add conversation, where a chat sends one currency code per message
 * until it commits with /done or bails out with /cancel.
 * State is kept per chat, in a storage injected into the engine.
 * Messages of the same chat must be handled one at a time.
 */

pub type DialogueStorage = InMemStorage<DialogueState>;
type RateDialogue = Dialogue<DialogueState, DialogueStorage>;

#[derive(Clone, Debug, Default, PartialEq)]
pub enum DialogueState {
    #[default]
    Idle,
    Collecting {
        pending: Vec<String>,
    },
}

// Outcome of a single message while collecting.
#[derive(Clone, Debug, PartialEq)]
pub enum Step {
    Commit(Vec<String>),
    Cancel,
    Append(Vec<String>),
    Reject,
}

/* Transition table of a collecting chat.
 * Pure, so all the rules of the conversation live in one place.
 */
pub fn transition(pending: &[String], input: &str, bot_name: &str) -> Step {
    match parse_command(input, bot_name) {
        Some(Command::Done) => return Step::Commit(pending.to_vec()),
        Some(Command::Cancel) => return Step::Cancel,
        _ => {}
    }

    let code = normalize(input);
    if is_valid(&code) {
        let mut pending = pending.to_vec();
        pending.push(code);
        Step::Append(pending)
    } else {
        Step::Reject
    }
}

const PROMPT_MESSAGE: &str = "Okay, let's add some currencies! 💱 Send me their ISO codes, one per message, and /done to save them. Not sure about a code? /cancel and look it up with /iso first.";

pub struct DialogueEngine {
    storage: Arc<DialogueStorage>,
    bot_name: String,
}

impl DialogueEngine {
    pub fn new(storage: Arc<DialogueStorage>, bot_name: impl Into<String>) -> Self {
        Self {
            storage,
            bot_name: bot_name.into(),
        }
    }

    fn dialogue(&self, chat_id: ChatId) -> RateDialogue {
        Dialogue::new(self.storage.clone(), chat_id)
    }

    pub async fn state(&self, chat_id: ChatId) -> Result<DialogueState, ProcessError> {
        Ok(self.dialogue(chat_id).get().await?.unwrap_or_default())
    }

    pub async fn is_collecting(&self, chat_id: ChatId) -> Result<bool, ProcessError> {
        Ok(matches!(
            self.state(chat_id).await?,
            DialogueState::Collecting { .. }
        ))
    }

    // Begins collecting rates for a chat, with nothing picked yet.
    pub async fn start(&self, chat_id: ChatId) -> Result<Reply, ProcessError> {
        self.dialogue(chat_id)
            .update(DialogueState::Collecting { pending: vec![] })
            .await?;
        log::info!("Add Rates - Chat {} started picking rates", chat_id);

        Ok(Reply::with_keyboard(
            PROMPT_MESSAGE,
            Keyboard::DialogueControls,
        ))
    }

    /* Handles a message of a chat that is collecting rates.
     * On commit, the chat goes back to idle before anything is written,
     * so a failing store never leaves the chat stuck in the dialogue.
     */
    pub async fn handle(
        &self,
        chat_id: ChatId,
        text: &str,
        store: &dyn SessionStore,
    ) -> Result<Reply, ProcessError> {
        let dialogue = self.dialogue(chat_id);
        let pending = match dialogue.get().await? {
            Some(DialogueState::Collecting { pending }) => pending,
            _ => {
                log::error!(
                    "Add Rates - Chat {} sent a message to a dialogue that is not active",
                    chat_id
                );
                return Err(ProcessError::NoActiveDialogue);
            }
        };

        match transition(&pending, text, &self.bot_name) {
            Step::Commit(pending) => {
                dialogue.exit().await?;
                if pending.is_empty() {
                    log::info!("Add Rates - Chat {} finished without rates", chat_id);
                    return Ok(Reply::with_keyboard(
                        "You didn't pick any currencies, so I kept your rates as they were.",
                        Keyboard::Remove,
                    ));
                }

                match save_rates(store, chat_id, pending) {
                    Ok(rates) => {
                        log::info!(
                            "Add Rates - Chat {} saved rates {}",
                            chat_id,
                            display_rates(&rates)
                        );
                        Ok(Reply::with_keyboard(
                            format!("✅ Done adding rates: {}", display_rates(&rates)),
                            Keyboard::Remove,
                        ))
                    }
                    Err(err) => {
                        log::error!(
                            "Add Rates - Chat {} failed to save rates: {}",
                            chat_id,
                            err.to_string()
                        );
                        Err(err.into())
                    }
                }
            }
            Step::Cancel => {
                dialogue.exit().await?;
                log::info!("Add Rates - Chat {} cancelled picking rates", chat_id);
                Ok(Reply::with_keyboard(
                    "Bailing out. Didn't add any rates.",
                    Keyboard::Remove,
                ))
            }
            Step::Append(pending) => {
                let message = format!(
                    "Rates added so far: {}\nWhen you're done adding currencies, send me {COMMAND_DONE} to save them.",
                    pending.join(", ")
                );
                dialogue
                    .update(DialogueState::Collecting { pending })
                    .await?;
                Ok(Reply::with_keyboard(message, Keyboard::DialogueControls))
            }
            Step::Reject => {
                log::info!(
                    "Add Rates - Chat {} sent an invalid code: {}",
                    chat_id,
                    text
                );
                Ok(Reply::with_keyboard(reject_message(), Keyboard::DialogueControls))
            }
        }
    }
}

// Rejection for anything that is not a code, listing the codes that are.
fn reject_message() -> String {
    let codes = all_codes_sorted()
        .iter()
        .map(|(code, _)| *code)
        .collect::<Vec<&str>>()
        .join(", ");

    format!("🚫 Invalid ISO code. I'll only finish this up when you send me {COMMAND_DONE}, or {COMMAND_CANCEL} to bail out.\n\nValid codes: {codes}\nSee {COMMAND_ISO} for their names once we're done.")
}
