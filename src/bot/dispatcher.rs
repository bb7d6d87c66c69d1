use std::sync::Arc;

use teloxide::{payloads::SendMessageSetters, prelude::*, types::ChatId, RequestError};

use super::{
    api::RatesApi,
    handler::{keyboard_markup, Reply, UNKNOWN_ERROR_MESSAGE},
    processor::{ProcessError, Processor, Response},
    report::{compose_report, ReportError},
    store::SessionStore,
};

/* Dispatcher is the front-facing agent of the bot.
 * It receives messages from Telegram, hands them to the Processor, and sends back the replies.
 * All sending of messages is done here.
 * Errors from the Processor are logged, and the chat is told something went wrong.
 * Messages of one chat are handled one at a time, different chats run in parallel.
 */

/* Types */
pub type HandlerResult = Result<(), BotError>;

#[derive(thiserror::Error, Debug)]
pub enum BotError {
    #[error("Process error: {0}")]
    ProcessError(ProcessError),
    #[error("Report error: {0}")]
    ReportError(ReportError),
    #[error("Request error: {0}")]
    RequestError(RequestError),
}

impl From<ProcessError> for BotError {
    fn from(process_error: ProcessError) -> BotError {
        BotError::ProcessError(process_error)
    }
}

impl From<ReportError> for BotError {
    fn from(report_error: ReportError) -> BotError {
        BotError::ReportError(report_error)
    }
}

impl From<RequestError> for BotError {
    fn from(request_error: RequestError) -> BotError {
        BotError::RequestError(request_error)
    }
}

// Sends a reply, with its keyboard if any.
async fn send_reply(bot: &Bot, chat_id: ChatId, reply: Reply) -> HandlerResult {
    let request = bot.send_message(chat_id, reply.text);
    match reply.keyboard {
        Some(keyboard) => request.reply_markup(keyboard_markup(&keyboard)).await?,
        None => request.await?,
    };
    Ok(())
}

// Composes and sends the rates report of a chat.
pub async fn send_report(
    bot: &Bot,
    store: &dyn SessionStore,
    api: &RatesApi,
    chat_id: ChatId,
) -> HandlerResult {
    let report = compose_report(store, api, chat_id).await?;
    bot.send_message(chat_id, report).await?;
    Ok(())
}

/* Handles a single message.
 * Service messages and messages without text are ignored.
 */
pub async fn handle_message(
    bot: Bot,
    msg: Message,
    processor: Arc<Processor>,
    api: Arc<RatesApi>,
) -> HandlerResult {
    let is_service_msg = msg.from().is_none();
    let text = match msg.text() {
        Some(text) if !is_service_msg => text,
        _ => return Ok(()),
    };

    let chat_id = msg.chat.id;
    log::info!("Message - Chat {} sent \"{}\"", chat_id, text);

    match processor.dispatch(chat_id, text).await {
        Ok(Response::Send(reply)) => send_reply(&bot, chat_id, reply).await?,
        Ok(Response::SendReport) => {
            let store = processor.store();
            if let Err(err) = send_report(&bot, store.as_ref(), &api, chat_id).await {
                log::error!(
                    "Get - Chat {} failed to receive its rates: {}",
                    chat_id,
                    err.to_string()
                );
                bot.send_message(chat_id, UNKNOWN_ERROR_MESSAGE).await?;
            }
        }
        Err(err) => {
            log::error!(
                "Message - Chat {} failed to process \"{}\": {}",
                chat_id,
                text,
                err.to_string()
            );
            bot.send_message(chat_id, UNKNOWN_ERROR_MESSAGE).await?;
        }
    }

    Ok(())
}

/* Main Dispatch function */
pub async fn run_dispatcher(bot: Bot, processor: Arc<Processor>, api: Arc<RatesApi>) {
    let handler = Update::filter_message().endpoint(handle_message);

    Dispatcher::builder(bot, handler)
        .dependencies(dptree::deps![processor, api])
        .enable_ctrlc_handler()
        .build()
        .dispatch()
        .await;
}
