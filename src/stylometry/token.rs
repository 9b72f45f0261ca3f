use std::{collections::HashSet, fmt::Debug, sync::Arc};

use lazy_static::lazy_static;
use regex::Regex;

use crate::error::{Result, StylometryError};

/// Splits raw text into an ordered sequence of normalized tokens.
///
/// Any closure `Fn(&str) -> Vec<String>` is a tokenizer as well, so a stemmer or
/// a tokenizer for another language can be plugged in without a wrapper type.
pub trait Tokenizer: Send + Sync {
    fn tokenize(&self, text: &str) -> Vec<String>;
}

impl<F> Tokenizer for F
where
    F: Fn(&str) -> Vec<String> + Send + Sync,
{
    #[inline]
    fn tokenize(&self, text: &str) -> Vec<String> {
        self(text)
    }
}

lazy_static! {
    /// maximal runs of word characters
    static ref WORD_REGEX: Regex = Regex::new(r"\w+").unwrap();

    static ref DIGIT_REGEX: Regex = Regex::new(r"\d").unwrap();

    /// English personal pronouns, singular and plural, including archaic forms
    static ref PRONOUNS: HashSet<&'static str> = [
        "he", "her", "hers", "herself", "him", "himself", "his", "i", "me", "mine", "my",
        "myself", "our", "ours", "ourselves", "she", "thee", "their", "them", "themselves",
        "they", "thou", "thy", "thyself", "us", "we", "ye", "you", "your", "yours", "yourself",
    ]
    .into_iter()
    .collect();
}

/// Default English tokenizer
///
/// lower-cases the text, strips apostrophes and backticks, extracts word runs
/// and drops pronouns and anything containing a digit.
#[derive(Debug, Clone, Copy, Default)]
pub struct PronounFreeTokenizer;

impl Tokenizer for PronounFreeTokenizer {
    fn tokenize(&self, text: &str) -> Vec<String> {
        let lowered: String = text
            .to_lowercase()
            .chars()
            .filter(|c| *c != '\'' && *c != '`')
            .collect();
        WORD_REGEX
            .find_iter(&lowered)
            .map(|m| m.as_str())
            .filter(|tok| !PRONOUNS.contains(*tok) && !DIGIT_REGEX.is_match(tok))
            .map(str::to_string)
            .collect()
    }
}

/// Every match of a regular expression becomes one token, text is used as is
#[derive(Debug, Clone)]
pub struct PatternTokenizer {
    regex: Regex,
}

impl PatternTokenizer {
    pub fn new(pattern: &str) -> Result<Self> {
        let regex = Regex::new(pattern)
            .map_err(|e| StylometryError::InvalidTokenizer(format!("`{}`: {}", pattern, e)))?;
        Ok(Self { regex })
    }
}

impl Tokenizer for PatternTokenizer {
    fn tokenize(&self, text: &str) -> Vec<String> {
        self.regex
            .find_iter(text)
            .map(|m| m.as_str().to_string())
            .collect()
    }
}

/// Splits on whitespace, nothing else
#[derive(Debug, Clone, Copy, Default)]
pub struct WhitespaceTokenizer;

impl Tokenizer for WhitespaceTokenizer {
    fn tokenize(&self, text: &str) -> Vec<String> {
        text.split_whitespace().map(str::to_string).collect()
    }
}

/// Tokenizer choice held by a `CorpusConfig`
///
/// Resolved once into a `Tokenizer` trait object on the first tokenization of a
/// corpus; call sites never branch on the variant.
#[derive(Clone, Default)]
pub enum TokenizerKind {
    /// `PronounFreeTokenizer`
    #[default]
    PronounFree,
    /// `WhitespaceTokenizer`
    Whitespace,
    /// regular expression, compiled lazily by `PatternTokenizer`
    Pattern(String),
    /// user supplied
    Custom(Arc<dyn Tokenizer>),
}

impl TokenizerKind {
    /// wrap any tokenizer (closures included)
    pub fn custom<T>(tokenizer: T) -> Self
    where
        T: Tokenizer + 'static,
    {
        TokenizerKind::Custom(Arc::new(tokenizer))
    }

    pub fn resolve(&self) -> Result<Arc<dyn Tokenizer>> {
        let tokenizer: Arc<dyn Tokenizer> = match self {
            TokenizerKind::PronounFree => Arc::new(PronounFreeTokenizer),
            TokenizerKind::Whitespace => Arc::new(WhitespaceTokenizer),
            TokenizerKind::Pattern(pattern) => Arc::new(PatternTokenizer::new(pattern)?),
            TokenizerKind::Custom(tokenizer) => Arc::clone(tokenizer),
        };
        Ok(tokenizer)
    }
}

impl Debug for TokenizerKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TokenizerKind::PronounFree => write!(f, "PronounFree"),
            TokenizerKind::Whitespace => write!(f, "Whitespace"),
            TokenizerKind::Pattern(pattern) => f.debug_tuple("Pattern").field(pattern).finish(),
            TokenizerKind::Custom(_) => write!(f, "Custom(..)"),
        }
    }
}
