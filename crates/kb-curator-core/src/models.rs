//! Core data models for the knowledge-base curator.
//!
//! These types are typed projections of the records held by the external
//! document store. Field names on the wire follow the admin API exactly
//! (`texts`, `keywords`, `keyword`, `confidence`, `override`, `query_text`).

use serde::{Deserialize, Serialize};

/// A trigger word with the confidence the bot needs before answering with it.
///
/// `confidence` is conceptually in `[0.0, 1.0]` but is never clamped; whatever
/// the operator or the scraper wrote round-trips unchanged.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Keyword {
    #[serde(rename = "keyword")]
    pub text: String,
    pub confidence: f64,
}

impl Keyword {
    pub fn new(text: impl Into<String>, confidence: f64) -> Self {
        Self {
            text: text.into(),
            confidence,
        }
    }

    /// The placeholder keyword appended by [`AnswerSet::append_keyword`].
    pub fn blank() -> Self {
        Self::new("", 1.0)
    }

    /// Returns true if the keyword text contains a character from the
    /// ECMAScript `\s` class (see [`is_js_whitespace`]).
    pub fn has_whitespace(&self) -> bool {
        self.text.chars().any(is_js_whitespace)
    }
}

/// The ECMAScript `\s` class: ASCII whitespace, NBSP, BOM, and the Unicode
/// space separators and line terminators.
///
/// Differs from [`char::is_whitespace`]: U+FEFF matches, U+0085 does not.
pub fn is_js_whitespace(c: char) -> bool {
    matches!(
        c,
        '\t' | '\n'
            | '\u{0b}'
            | '\u{0c}'
            | '\r'
            | ' '
            | '\u{a0}'
            | '\u{1680}'
            | '\u{2000}'..='\u{200a}'
            | '\u{2028}'
            | '\u{2029}'
            | '\u{202f}'
            | '\u{205f}'
            | '\u{3000}'
            | '\u{feff}'
    )
}

/// Answer texts and the keywords that trigger them.
///
/// `texts` is ordered and may contain duplicates or empty strings.
/// `keywords` keeps insertion order so editors can address entries by index.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AnswerSet {
    #[serde(default)]
    pub texts: Vec<String>,
    #[serde(default)]
    pub keywords: Vec<Keyword>,
}

impl AnswerSet {
    pub fn new(texts: Vec<String>, keywords: Vec<Keyword>) -> Self {
        Self { texts, keywords }
    }
}

/// A scraped document together with its optional manual override.
#[derive(Debug, Clone, PartialEq)]
pub struct Document {
    /// Store-assigned identifier. Never changes.
    pub id: String,
    /// Page the automatic content was scraped from.
    pub url: String,
    pub title: Option<String>,
    /// Production content owned by the scraping pipeline. Read-only here.
    pub automatic: AnswerSet,
    /// Manual content. When present it replaces `automatic` entirely.
    pub manual: Option<AnswerSet>,
}

impl Document {
    /// The content the bot answers with.
    ///
    /// Overrides are all-or-nothing: no field is ever merged between the
    /// manual and the automatic answer sets.
    pub fn effective(&self) -> &AnswerSet {
        self.manual.as_ref().unwrap_or(&self.automatic)
    }

    pub fn has_override(&self) -> bool {
        self.manual.is_some()
    }
}

/// One hit from a search by source URL.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DocumentSummary {
    pub id: String,
    #[serde(default)]
    pub title: Option<String>,
}

/// A document flagged by the store as needing manual review.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConflictRef {
    pub id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
}

/// A user question the bot could not answer.
///
/// The text itself is the key used to resolve the entry.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct UnknownQuery {
    #[serde(rename = "query_text")]
    pub text: String,
}

impl UnknownQuery {
    pub fn new(text: impl Into<String>) -> Self {
        Self { text: text.into() }
    }
}
