//! Search string parser.

use super::ast::Query;

const TYPE_PREFIX: &str = "type:";

/// Parser for search strings.
///
/// Tokens are whitespace-separated. Parsing happens in two passes:
/// 1. every `type:<value>` token is consumed; the last one wins
/// 2. every remaining `<name>:<value>` token (both sides non-empty, split at
///    the last colon) becomes a qualifier; a repeated name overwrites the
///    earlier value
///
/// The free text is the lowercased input with those tokens cut out, trimmed
/// at both ends. Whitespace inside it is kept as typed.
pub struct Parser;

impl Parser {
    /// Parses a search string. Never fails: any text is a valid query.
    ///
    /// # Example
    ///
    /// ```
    /// use treequill::query::Parser;
    ///
    /// let query = Parser::parse("type:Employee Department:Sales  alice ");
    /// assert_eq!(query.type_filter.as_deref(), Some("employee"));
    /// assert_eq!(query.qualifiers.get("department").map(String::as_str), Some("sales"));
    /// assert_eq!(query.text.as_deref(), Some("alice"));
    ///
    /// assert!(Parser::parse("   ").is_empty());
    /// ```
    pub fn parse(input: &str) -> Query {
        let lowered = input.trim().to_lowercase();
        let mut query = Query::default();
        if lowered.is_empty() {
            return query;
        }

        // Byte ranges of consumed tokens
        let mut consumed = Vec::new();
        let mut residual = Vec::new();
        for (start, token) in tokens(&lowered) {
            match token.strip_prefix(TYPE_PREFIX) {
                Some(value) if !value.is_empty() => {
                    query.type_filter = Some(value.to_string());
                    consumed.push(start..start + token.len());
                }
                _ => residual.push((start, token)),
            }
        }

        for (start, token) in residual {
            if let Some((name, value)) = split_qualifier(token) {
                query.qualifiers.insert(name.to_string(), value.to_string());
                consumed.push(start..start + token.len());
            }
        }

        consumed.sort_by_key(|range| range.start);
        let mut text = String::with_capacity(lowered.len());
        let mut cursor = 0;
        for range in consumed {
            text.push_str(&lowered[cursor..range.start]);
            cursor = range.end;
        }
        text.push_str(&lowered[cursor..]);

        let text = text.trim();
        if !text.is_empty() {
            query.text = Some(text.to_string());
        }
        query
    }
}

/// Whitespace-separated tokens with their byte offsets.
fn tokens(input: &str) -> Vec<(usize, &str)> {
    let mut out = Vec::new();
    let mut start = None;
    for (i, c) in input.char_indices() {
        if c.is_whitespace() {
            if let Some(s) = start.take() {
                out.push((s, &input[s..i]));
            }
        } else if start.is_none() {
            start = Some(i);
        }
    }
    if let Some(s) = start {
        out.push((s, &input[s..]));
    }
    out
}

/// Splits `name:value` at the last colon when both sides are non-empty.
fn split_qualifier(token: &str) -> Option<(&str, &str)> {
    let colon = token.rfind(':')?;
    let (name, value) = (&token[..colon], &token[colon + 1..]);
    if name.is_empty() || value.is_empty() {
        None
    } else {
        Some((name, value))
    }
}
