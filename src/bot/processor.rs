use std::sync::Arc;

use teloxide::{dispatching::dialogue::InMemStorageError, types::ChatId};

use super::{
    dialogue::{DialogueEngine, DialogueStorage},
    handler::{action_help, find_command, parse_command, Action, CommandRequest, Reply},
    store::{CrudError, SessionStore},
};

/* Processor is the overall logic center of the bot.
 * It takes a single message of a chat and decides what to read, what to write, and what to reply.
 * A chat in the middle of an /add is handed to the dialogue engine,
 * otherwise the message is matched against the command table.
 * It never sends anything itself.
 */

#[derive(thiserror::Error, Debug)]
pub enum ProcessError {
    #[error("{0}")]
    CrudError(CrudError),
    #[error("Dialogue storage error: {0}")]
    DialogueError(InMemStorageError),
    #[error("No dialogue in progress")]
    NoActiveDialogue,
}

// Implement the From trait to convert from CrudError to ProcessError
impl From<CrudError> for ProcessError {
    fn from(crud_error: CrudError) -> ProcessError {
        ProcessError::CrudError(crud_error)
    }
}

impl From<InMemStorageError> for ProcessError {
    fn from(storage_error: InMemStorageError) -> ProcessError {
        ProcessError::DialogueError(storage_error)
    }
}

// What to send back for a message.
#[derive(Clone, Debug, PartialEq)]
pub enum Response {
    Send(Reply),
    // The chat asked for its rates report.
    SendReport,
}

pub struct Processor {
    store: Arc<dyn SessionStore>,
    dialogue: DialogueEngine,
    bot_name: String,
}

impl Processor {
    pub fn new(
        store: Arc<dyn SessionStore>,
        dialogue_storage: Arc<DialogueStorage>,
        bot_name: &str,
    ) -> Self {
        Self {
            store,
            dialogue: DialogueEngine::new(dialogue_storage, bot_name),
            bot_name: bot_name.to_string(),
        }
    }

    pub fn store(&self) -> Arc<dyn SessionStore> {
        self.store.clone()
    }

    /* Handles one message of a chat.
     * Domain errors are already turned into replies here, only store and
     * dialogue storage failures are returned as errors.
     */
    pub async fn dispatch(&self, chat_id: ChatId, text: &str) -> Result<Response, ProcessError> {
        if self.dialogue.is_collecting(chat_id).await? {
            let reply = self
                .dialogue
                .handle(chat_id, text, self.store.as_ref())
                .await?;
            return Ok(Response::Send(reply));
        }

        let command = parse_command(text, &self.bot_name);
        let entry = command.as_ref().and_then(|command| find_command(command.token()));
        let action = match (&command, entry) {
            (Some(command), Some(entry)) => {
                let request = CommandRequest::new(chat_id, command.args());
                (entry.handler)(&request, self.store.as_ref())?
            }
            _ => {
                log::info!("Help - Chat {} sent something that is not a command", chat_id);
                action_help(&CommandRequest::new(chat_id, ""), self.store.as_ref())?
            }
        };

        match action {
            Action::Send(reply) => Ok(Response::Send(reply)),
            Action::SendReport => Ok(Response::SendReport),
            Action::StartDialogue => Ok(Response::Send(self.dialogue.start(chat_id).await?)),
        }
    }
}

#[cfg(test)]
mod tests {
    use std::{collections::BTreeSet, sync::Arc};

    use teloxide::types::ChatId;

    use super::{ProcessError, Processor, Response};
    use crate::bot::{
        dialogue::DialogueStorage,
        handler::{Keyboard, Reply},
        store::{CrudError, InMemStore, SessionStore},
    };

    fn rates(codes: &[&str]) -> BTreeSet<String> {
        codes.iter().map(|code| code.to_string()).collect()
    }

    fn new_processor() -> (Processor, Arc<InMemStore>) {
        let store = Arc::new(InMemStore::new());
        let processor = Processor::new(store.clone(), DialogueStorage::new(), "FixrBot");
        (processor, store)
    }

    async fn send(processor: &Processor, chat_id: i64, text: &str) -> Reply {
        match processor.dispatch(ChatId(chat_id), text).await.unwrap() {
            Response::Send(reply) => reply,
            Response::SendReport => panic!("Expected a reply to {}", text),
        }
    }

    async fn help(processor: &Processor) -> String {
        send(processor, 1, "/help").await.text
    }

    // Store whose every write fails, as if Redis went away.
    struct ReadOnlyStore {
        inner: InMemStore,
    }

    impl SessionStore for ReadOnlyStore {
        fn is_subscribed(&self, chat_id: ChatId) -> Result<bool, CrudError> {
            self.inner.is_subscribed(chat_id)
        }
        fn subscribe(&self, _chat_id: ChatId) -> Result<(), CrudError> {
            Err(CrudError::StoreUnavailable("connection refused".to_string()))
        }
        fn unsubscribe(&self, _chat_id: ChatId) -> Result<(), CrudError> {
            Err(CrudError::StoreUnavailable("connection refused".to_string()))
        }
        fn list_subscribed(&self) -> Result<Vec<ChatId>, CrudError> {
            self.inner.list_subscribed()
        }
        fn get_base_currency(&self, chat_id: ChatId) -> Result<String, CrudError> {
            self.inner.get_base_currency(chat_id)
        }
        fn set_base_currency(&self, _chat_id: ChatId, _base: &str) -> Result<(), CrudError> {
            Err(CrudError::StoreUnavailable("connection refused".to_string()))
        }
        fn get_rate_selection(&self, chat_id: ChatId) -> Result<BTreeSet<String>, CrudError> {
            self.inner.get_rate_selection(chat_id)
        }
        fn replace_rate_selection(
            &self,
            _chat_id: ChatId,
            _rates: &BTreeSet<String>,
        ) -> Result<(), CrudError> {
            Err(CrudError::StoreUnavailable("connection refused".to_string()))
        }
        fn remove_rate(&self, _chat_id: ChatId, _rate: &str) -> Result<(), CrudError> {
            Err(CrudError::StoreUnavailable("connection refused".to_string()))
        }
        fn clear_rates(&self, _chat_id: ChatId) -> Result<(), CrudError> {
            Err(CrudError::StoreUnavailable("connection refused".to_string()))
        }
    }

    #[tokio::test]
    async fn test_subscribe_and_collect_rates() {
        let (processor, store) = new_processor();
        let chat_id = ChatId(42);

        let reply = send(&processor, 42, "/start").await;
        assert!(reply.text.contains("subscribed to daily notifications"));
        assert!(store.is_subscribed(chat_id).unwrap());
        assert_eq!(store.get_base_currency(chat_id).unwrap(), "USD");

        let reply = send(&processor, 42, "/add").await;
        assert!(reply.text.contains("let's add some currencies"));
        assert_eq!(reply.keyboard, Some(Keyboard::DialogueControls));

        let reply = send(&processor, 42, "EUR").await;
        assert!(reply.text.contains("EUR"));

        let reply = send(&processor, 42, "XXX").await;
        assert!(reply.text.contains("Invalid ISO code"));
        assert!(store.get_rate_selection(chat_id).unwrap().is_empty());

        let reply = send(&processor, 42, "/done").await;
        assert_eq!(reply.keyboard, Some(Keyboard::Remove));
        assert_eq!(store.get_rate_selection(chat_id).unwrap(), rates(&["EUR"]));
    }

    #[tokio::test]
    async fn test_stop_never_subscribed() {
        let (processor, store) = new_processor();

        let reply = send(&processor, 7, "/stop").await;
        assert!(reply.text.contains("not subscribed"));
        assert!(!store.is_subscribed(ChatId(7)).unwrap());
        assert!(store.list_subscribed().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_cancel_without_dialogue() {
        let (processor, _store) = new_processor();

        let nothing = send(&processor, 9, "/cancel").await;
        assert!(nothing.text.contains("nothing to cancel"));

        send(&processor, 10, "/add").await;
        let cancelled = send(&processor, 10, "/cancel").await;
        assert!(cancelled.text.contains("Bailing out"));
        assert_ne!(nothing.text, cancelled.text);
    }

    #[tokio::test]
    async fn test_done_without_dialogue() {
        let (processor, store) = new_processor();
        store
            .replace_rate_selection(ChatId(11), &rates(&["JPY"]))
            .unwrap();

        let reply = send(&processor, 11, "/done").await;
        assert!(reply.text.contains("nothing to finish"));
        assert_eq!(store.get_rate_selection(ChatId(11)).unwrap(), rates(&["JPY"]));
    }

    #[tokio::test]
    async fn test_dialogue_and_inline_paths_match() {
        let (processor, store) = new_processor();
        let codes = ["GBP", "EUR", "GBP", "chf"];

        send(&processor, 20, "/add").await;
        for code in codes {
            send(&processor, 20, code).await;
        }
        send(&processor, 20, "/done").await;

        send(&processor, 21, &format!("/add {}", codes.join(" "))).await;

        assert_eq!(
            store.get_rate_selection(ChatId(20)).unwrap(),
            rates(&["CHF", "EUR", "GBP"])
        );
        assert_eq!(
            store.get_rate_selection(ChatId(20)).unwrap(),
            store.get_rate_selection(ChatId(21)).unwrap()
        );
    }

    #[tokio::test]
    async fn test_inline_add_does_not_start_dialogue() {
        let (processor, store) = new_processor();

        send(&processor, 22, "/add EUR").await;
        let reply = send(&processor, 22, "/help").await;
        assert_eq!(reply.text, help(&processor).await);
        assert_eq!(store.get_rate_selection(ChatId(22)).unwrap(), rates(&["EUR"]));
    }

    #[tokio::test]
    async fn test_cancel_keeps_existing_rates() {
        let (processor, store) = new_processor();
        store
            .replace_rate_selection(ChatId(23), &rates(&["JPY", "SEK"]))
            .unwrap();

        send(&processor, 23, "/add").await;
        send(&processor, 23, "/cancel").await;
        assert_eq!(
            store.get_rate_selection(ChatId(23)).unwrap(),
            rates(&["JPY", "SEK"])
        );
    }

    #[tokio::test]
    async fn test_commands_consumed_while_collecting() {
        let (processor, store) = new_processor();

        send(&processor, 24, "/add").await;
        let reply = send(&processor, 24, "/start").await;
        assert!(reply.text.contains("Invalid ISO code"));
        assert!(!store.is_subscribed(ChatId(24)).unwrap());
    }

    #[tokio::test]
    async fn test_terminators_with_mention() {
        let (processor, store) = new_processor();

        send(&processor, 25, "/add").await;
        send(&processor, 25, "EUR").await;
        let other = send(&processor, 25, "/done@OtherBot").await;
        assert!(other.text.contains("Invalid ISO code"));
        let done = send(&processor, 25, "/done@FixrBot").await;
        assert_eq!(done.keyboard, Some(Keyboard::Remove));
        assert_eq!(store.get_rate_selection(ChatId(25)).unwrap(), rates(&["EUR"]));

        send(&processor, 26, "/add").await;
        send(&processor, 26, "GBP").await;
        let cancelled = send(&processor, 26, "/cancel@FixrBot").await;
        assert!(cancelled.text.contains("Bailing out"));
        assert!(store.get_rate_selection(ChatId(26)).unwrap().is_empty());

        let idle = send(&processor, 26, "/cancel@FixrBot").await;
        assert!(idle.text.contains("nothing to cancel"));
    }

    #[tokio::test]
    async fn test_iso_rejected_while_collecting() {
        let (processor, _store) = new_processor();

        let prompt = send(&processor, 27, "/add").await;
        assert!(prompt.text.contains("/cancel and look it up with /iso"));
        let reply = send(&processor, 27, "/iso").await;
        assert!(reply.text.contains("Invalid ISO code"));
    }

    #[tokio::test]
    async fn test_interleaved_chats() {
        let (processor, store) = new_processor();

        send(&processor, 30, "/add").await;
        send(&processor, 31, "/add").await;
        send(&processor, 30, "EUR").await;
        let idle = send(&processor, 32, "EUR").await;
        assert_eq!(idle.text, help(&processor).await);
        send(&processor, 31, "JPY").await;
        send(&processor, 31, "/cancel").await;
        send(&processor, 30, "GBP").await;
        send(&processor, 30, "/done").await;

        assert_eq!(
            store.get_rate_selection(ChatId(30)).unwrap(),
            rates(&["EUR", "GBP"])
        );
        assert!(store.get_rate_selection(ChatId(31)).unwrap().is_empty());
        assert!(store.get_rate_selection(ChatId(32)).unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_unknown_command_shows_help() {
        let (processor, _store) = new_processor();

        assert_eq!(send(&processor, 40, "/unknown").await.text, help(&processor).await);
        assert_eq!(send(&processor, 40, "/START").await.text, help(&processor).await);
        assert_eq!(send(&processor, 40, "hello there").await.text, help(&processor).await);
    }

    #[tokio::test]
    async fn test_get_requests_report() {
        let (processor, _store) = new_processor();

        let response = processor.dispatch(ChatId(41), "/get").await.unwrap();
        assert_eq!(response, Response::SendReport);
    }

    #[tokio::test]
    async fn test_setbase_and_delete() {
        let (processor, store) = new_processor();

        send(&processor, 43, "/setbase eur").await;
        assert_eq!(store.get_base_currency(ChatId(43)).unwrap(), "EUR");

        send(&processor, 43, "/add EUR GBP").await;
        send(&processor, 43, "/del GBP").await;
        send(&processor, 43, "/del GBP").await;
        assert_eq!(store.get_rate_selection(ChatId(43)).unwrap(), rates(&["EUR"]));

        send(&processor, 43, "/clear").await;
        assert!(store.get_rate_selection(ChatId(43)).unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_store_failure_on_commit() {
        let store = Arc::new(ReadOnlyStore {
            inner: InMemStore::new(),
        });
        let processor = Processor::new(store, DialogueStorage::new(), "FixrBot");
        let chat_id = ChatId(50);

        processor.dispatch(chat_id, "/add").await.unwrap();
        processor.dispatch(chat_id, "EUR").await.unwrap();
        let result = processor.dispatch(chat_id, "/done").await;
        assert!(matches!(
            result,
            Err(ProcessError::CrudError(CrudError::StoreUnavailable(_)))
        ));

        // Back to idle regardless, so the next message is a command again.
        let response = processor.dispatch(chat_id, "/get").await.unwrap();
        assert_eq!(response, Response::SendReport);
    }

    #[tokio::test]
    async fn test_store_failure_on_command() {
        let store = Arc::new(ReadOnlyStore {
            inner: InMemStore::new(),
        });
        let processor = Processor::new(store, DialogueStorage::new(), "FixrBot");

        assert!(processor.dispatch(ChatId(51), "/start").await.is_err());
        assert!(processor.dispatch(ChatId(51), "/help").await.is_ok());
    }
}
