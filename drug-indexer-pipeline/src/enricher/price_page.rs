//! Extraction of price and reimbursement rate from the price lookup page.
//!
//! The page carries a `span.infosCnam` whose text ends with the
//! reimbursement percentage and holds the price at a fixed word offset.

use scraper::{Html, Selector};
use thiserror::Error;

/// CSS selector of the element holding the pricing text.
pub const PRICE_SELECTOR: &str = "span.infosCnam";

/// Word offset of the price once the text is split on spaces.
const PRICE_TOKEN_INDEX: usize = 4;

/// Price and reimbursement rate of a drug.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PriceInfo {
    /// Price including the dispensing fee.
    pub price_with_honorary: f64,
    /// Reimbursement rate in percent.
    pub repayment_rate: i32,
}

/// Errors raised when the pricing text does not have the expected shape.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PriceParseError {
    #[error("invalid CSS selector '{0}'")]
    Selector(String),

    #[error("expected at least {expected} words, found {found}", expected = PRICE_TOKEN_INDEX + 1)]
    TooFewTokens { found: usize },

    #[error("invalid price '{0}'")]
    InvalidPrice(String),

    #[error("invalid repayment rate '{0}'")]
    InvalidRate(String),
}

/// Text content of the first `span.infosCnam` in the page, if any.
pub fn extract_price_text(html: &str) -> Result<Option<String>, PriceParseError> {
    let selector = Selector::parse(PRICE_SELECTOR)
        .map_err(|_| PriceParseError::Selector(PRICE_SELECTOR.to_string()))?;
    let document = Html::parse_document(html);

    Ok(document
        .select(&selector)
        .next()
        .map(|el| el.text().collect::<String>()))
}

/// Parse the pricing text of a `span.infosCnam`.
///
/// Non-breaking spaces become spaces, trailing spaces and `%` signs are
/// removed, and the text is split on single spaces. The word at offset 4 is
/// the price (comma as decimal separator), the last word the rate.
pub fn parse_price_text(text: &str) -> Result<PriceInfo, PriceParseError> {
    let normalized = text.replace('\u{a0}', " ");
    let trimmed = normalized.trim_end_matches(|c| c == ' ' || c == '%');
    let tokens: Vec<&str> = trimmed.split(' ').collect();

    if tokens.len() <= PRICE_TOKEN_INDEX {
        return Err(PriceParseError::TooFewTokens {
            found: tokens.len(),
        });
    }

    let price_token = tokens[PRICE_TOKEN_INDEX];
    let price_with_honorary = price_token
        .trim()
        .replace(',', ".")
        .parse::<f64>()
        .map_err(|_| PriceParseError::InvalidPrice(price_token.to_string()))?;

    let rate_token = tokens[tokens.len() - 1];
    let repayment_rate = rate_token
        .trim()
        .parse::<i32>()
        .map_err(|_| PriceParseError::InvalidRate(rate_token.to_string()))?;

    Ok(PriceInfo {
        price_with_honorary,
        repayment_rate,
    })
}

/// Extract pricing from a whole price page.
///
/// Returns `Ok(None)` when the page has no `span.infosCnam`.
pub fn parse_price_page(html: &str) -> Result<Option<PriceInfo>, PriceParseError> {
    match extract_price_text(html)? {
        Some(text) => parse_price_text(&text).map(Some),
        None => Ok(None),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const PRICE_TEXT: &str = "Prix de vente TTC 12,50\u{a0}€ Taux de remboursement : 65\u{a0}%";

    #[test]
    fn test_parse_price_text() {
        let info = parse_price_text(PRICE_TEXT).unwrap();
        assert_eq!(info.price_with_honorary, 12.50);
        assert_eq!(info.repayment_rate, 65);
    }

    #[test]
    fn test_parse_price_text_rate_glued_to_percent() {
        let info = parse_price_text("Prix de vente TTC 3,02 € Taux de remboursement : 100%").unwrap();
        assert_eq!(info.price_with_honorary, 3.02);
        assert_eq!(info.repayment_rate, 100);
    }

    #[test]
    fn test_consecutive_spaces_count_as_words() {
        // The empty word between the double space takes offset 1.
        let info = parse_price_text("Prix  de vente 7,10 € 30 %").unwrap();
        assert_eq!(info.price_with_honorary, 7.10);
        assert_eq!(info.repayment_rate, 30);
    }

    #[test]
    fn test_too_few_tokens() {
        assert_eq!(
            parse_price_text("Non remboursable"),
            Err(PriceParseError::TooFewTokens { found: 2 })
        );
    }

    #[test]
    fn test_invalid_price() {
        assert_eq!(
            parse_price_text("Prix de vente TTC inconnu € 65 %"),
            Err(PriceParseError::InvalidPrice("inconnu".to_string()))
        );
    }

    #[test]
    fn test_invalid_rate() {
        assert_eq!(
            parse_price_text("Prix de vente TTC 12,50 € Non remboursé"),
            Err(PriceParseError::InvalidRate("remboursé".to_string()))
        );
    }

    #[test]
    fn test_parse_price_page() {
        let html = format!(
            "<html><body><div class=\"fiche\"><span class=\"infosCnam\">{}</span></div></body></html>",
            PRICE_TEXT
        );

        let info = parse_price_page(&html).unwrap().unwrap();
        assert_eq!(info.price_with_honorary, 12.50);
        assert_eq!(info.repayment_rate, 65);
    }

    #[test]
    fn test_parse_price_page_nested_markup() {
        let html = "<span class=\"infosCnam other\">Prix de vente TTC <b>4,20</b> € Taux : 15 %</span>";

        let info = parse_price_page(html).unwrap().unwrap();
        assert_eq!(info.price_with_honorary, 4.20);
        assert_eq!(info.repayment_rate, 15);
    }

    #[test]
    fn test_parse_price_page_without_span() {
        let html = "<html><body><span class=\"infosGenerales\">Pas de prix</span></body></html>";
        assert_eq!(parse_price_page(html), Ok(None));
    }
}
