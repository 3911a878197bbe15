//! Parsing of the textual add command: `<quote> - <author>`.

use crate::error::QuoteError;

/// Separator between quote text and author. The last occurrence wins, so quotes may contain it.
pub const ADD_SEPARATOR: &str = " - ";

/// Splits `text` into trimmed `(content, author)`.
pub fn parse_add_command(text: &str) -> Result<(String, String), QuoteError> {
    let (content, author) = text.rsplit_once(ADD_SEPARATOR).ok_or_else(|| {
        QuoteError::Validation("use the format: <quote> - <author>".to_string())
    })?;

    let content = content.trim();
    let author = author.trim();
    if content.is_empty() || author.is_empty() {
        return Err(QuoteError::Validation(
            "both quote and author must be provided".to_string(),
        ));
    }

    Ok((content.to_string(), author.to_string()))
}
