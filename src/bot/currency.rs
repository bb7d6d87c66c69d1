/* Currency vocabulary.
 * Fixed mapping of ISO codes to display names, for every currency the bot reports.
 * Pure lookups only, no state.
 */

// Base currency assigned to every chat on subscription.
pub const DEFAULT_BASE: &str = "USD";

const CURRENCIES: [(&str, &str); 32] = [
    ("EUR", "Euro"),
    ("AUD", "Australian Dollar"),
    ("BGN", "Bulgarian Lev"),
    ("BRL", "Brazilian Real"),
    ("CAD", "Canadian Dollar"),
    ("CHF", "Swiss Franc"),
    ("CNY", "Yuan Renminbi"),
    ("CZK", "Czech Koruna"),
    ("DKK", "Danish Krone"),
    ("GBP", "Pound Sterling"),
    ("HKD", "Hong Kong Dollar"),
    ("HRK", "Croatian Kuna"),
    ("HUF", "Forint"),
    ("IDR", "Rupiah"),
    ("ILS", "New Israeli Sheqel"),
    ("INR", "Indian Rupee"),
    ("JPY", "Yen"),
    ("KRW", "Won"),
    ("MXN", "Mexican Peso"),
    ("MYR", "Malaysian Ringgit"),
    ("NOK", "Norwegian Krone"),
    ("NZD", "New Zealand Dollar"),
    ("PHP", "Philippine Peso"),
    ("PLN", "Zloty"),
    ("RON", "New Romanian Leu"),
    ("RUB", "Russian Ruble"),
    ("SEK", "Swedish Krona"),
    ("SGD", "Singapore Dollar"),
    ("THB", "Baht"),
    ("TRY", "Turkish Lira"),
    ("USD", "US Dollar"),
    ("ZAR", "Rand"),
];

// Checks if a code is a supported currency.
pub fn is_valid(code: &str) -> bool {
    display_name(code).is_some()
}

// Gets the display name of a currency code.
pub fn display_name(code: &str) -> Option<&'static str> {
    CURRENCIES
        .iter()
        .find(|(iso, _)| *iso == code)
        .map(|(_, name)| *name)
}

/* Gets all currencies, sorted by code.
 * Output built from this must be byte-stable, so the order never depends on the table layout.
 */
pub fn all_codes_sorted() -> Vec<(&'static str, &'static str)> {
    let mut currencies = CURRENCIES.to_vec();
    currencies.sort_by(|a, b| a.0.cmp(b.0));
    currencies
}

// Normalizes user input into the form codes are stored in.
pub fn normalize(input: &str) -> String {
    input.trim().to_ascii_uppercase()
}

#[cfg(test)]
mod tests {
    use super::{all_codes_sorted, display_name, is_valid, normalize, DEFAULT_BASE};

    #[test]
    fn test_is_valid() {
        assert!(is_valid("EUR"));
        assert!(is_valid(DEFAULT_BASE));
        assert!(!is_valid("XXX"));
        assert!(!is_valid("eur"));
        assert!(!is_valid(""));
    }

    #[test]
    fn test_display_name() {
        assert_eq!(display_name("GBP"), Some("Pound Sterling"));
        assert_eq!(display_name("ABC"), None);
    }

    #[test]
    fn test_all_codes_sorted() {
        let currencies = all_codes_sorted();
        assert_eq!(currencies.len(), 32);
        assert_eq!(currencies.first(), Some(&("AUD", "Australian Dollar")));
        assert_eq!(currencies.last(), Some(&("ZAR", "Rand")));
        assert!(currencies.windows(2).all(|pair| pair[0].0 < pair[1].0));
    }

    #[test]
    fn test_all_codes_sorted_stable() {
        assert_eq!(all_codes_sorted(), all_codes_sorted());
    }

    #[test]
    fn test_normalize() {
        assert_eq!(normalize(" eur "), "EUR");
        assert_eq!(normalize("Gbp"), "GBP");
        assert_eq!(normalize("USD"), "USD");
    }
}
