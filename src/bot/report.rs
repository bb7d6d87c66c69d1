use std::collections::BTreeSet;

use teloxide::types::ChatId;

use super::{
    api::{ApiError, Rates, RatesApi},
    currency::{all_codes_sorted, display_name},
    store::{CrudError, SessionStore},
};

/* Report composes the rates message of a chat.
 * Shared by the /get command and the daily broadcast.
 */

#[derive(thiserror::Error, Debug)]
pub enum ReportError {
    #[error("{0}")]
    CrudError(CrudError),
    #[error("{0}")]
    ApiError(ApiError),
}

impl From<CrudError> for ReportError {
    fn from(crud_error: CrudError) -> ReportError {
        ReportError::CrudError(crud_error)
    }
}

impl From<ApiError> for ReportError {
    fn from(api_error: ApiError) -> ReportError {
        ReportError::ApiError(api_error)
    }
}

fn currency_label(code: &str) -> String {
    match display_name(code) {
        Some(name) => format!("{name} ({code})"),
        None => code.to_string(),
    }
}

/* Formats the rates of a chat.
 * Lines follow the order of the codes. An empty selection reports every known currency but the base.
 * Codes without a rate today are left out.
 */
pub fn format_report(base: &str, selection: &BTreeSet<String>, rates: &Rates) -> String {
    let codes: Vec<String> = if selection.is_empty() {
        all_codes_sorted()
            .iter()
            .filter(|(code, _)| *code != base)
            .map(|(code, _)| code.to_string())
            .collect()
    } else {
        selection.iter().cloned().collect()
    };

    let lines: Vec<String> = codes
        .iter()
        .filter_map(|code| {
            rates
                .values
                .get(code)
                .map(|value| format!("{} is {:.3}", currency_label(code), value))
        })
        .collect();

    let header = format!("Your base currency is {}", currency_label(base));
    if lines.is_empty() {
        return format!("{header}\nI couldn't find any of your rates today. 😔");
    }

    let date = match &rates.date {
        Some(date) => format!(" ({date})"),
        None => "".to_string(),
    };
    format!("{header}\nThese are today's rates{date}:\n{}", lines.join("\n"))
}

// Composes the report of a chat from its current base and selection.
pub async fn compose_report(
    store: &dyn SessionStore,
    api: &RatesApi,
    chat_id: ChatId,
) -> Result<String, ReportError> {
    let base = store.get_base_currency(chat_id)?;
    let selection = store.get_rate_selection(chat_id)?;
    let rates = api.fetch_rates(&base).await?;

    Ok(format_report(&base, &selection, &rates))
}
