//! JSON manifest for built decks.

use crate::error::Result;
use crate::pipeline::Deck;

/// JSON output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum JsonFormat {
    /// Pretty-printed JSON with indentation
    #[default]
    Pretty,
    /// Compact JSON without extra whitespace
    Compact,
}

/// Serialize a deck manifest: metadata, sections, page references and
/// outcomes. Fragment content is not included.
pub fn to_json(deck: &Deck, format: JsonFormat) -> Result<String> {
    let json = match format {
        JsonFormat::Pretty => serde_json::to_string_pretty(deck)?,
        JsonFormat::Compact => serde_json::to_string(deck)?,
    };
    Ok(json)
}
