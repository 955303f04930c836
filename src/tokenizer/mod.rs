//! The tokenization pipeline: a linear composition of lazy stages, each an
//! iterator over the previous one with a bounded lookahead of at most four
//! tokens.
//!
//! ```rust
//! use icetok::{tokenize, Options, TokKind};
//!
//! let tokens: Vec<_> = tokenize("Hann kom kl. 15:30 í dag.", &Options::default()).collect();
//! assert_eq!(tokens.first().unwrap().kind, TokKind::SentBegin);
//! ```

pub(crate) mod dates;
pub(crate) mod particles;
pub(crate) mod phrases;
pub(crate) mod refine;
pub(crate) mod rough;

use std::collections::VecDeque;

use crate::segmenter::Sentences;
use crate::token::Tok;

/// Tokenizer options. All fields default to `false` except
/// `replace_composite_glyphs`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Options {
    /// Accept English-locale numerics and rewrite the normalized surface to
    /// the Icelandic convention (`1,234.56` → `1.234,56`).
    pub convert_numbers: bool,
    /// Normalize `N° U` to `N °U` in measurement surfaces.
    pub convert_measurements: bool,
    /// Fold combining acute/diaeresis marks into precomposed letters.
    pub replace_composite_glyphs: bool,
    /// Expand named HTML entities (`&aacute;` → `á`). Numeric entities are
    /// left untouched.
    pub replace_html_escapes: bool,
    /// Treat every newline as a hard sentence boundary.
    pub one_sent_per_line: bool,
    /// Join original surfaces instead of normalized ones in shallow output.
    pub original: bool,
    /// Merge `N prósent` into a PERCENT token.
    pub coalesce_percent: bool,
    /// Use normalized punctuation forms in emitted surfaces.
    pub normalize: bool,
}

impl Default for Options {
    fn default() -> Self {
        Options {
            convert_numbers: false,
            convert_measurements: false,
            replace_composite_glyphs: true,
            replace_html_escapes: false,
            one_sent_per_line: false,
            original: false,
            coalesce_percent: false,
            normalize: false,
        }
    }
}

/// A pull buffer giving each stage its bounded lookahead.
pub(crate) struct Lookahead<I: Iterator<Item = Tok>> {
    inner: I,
    buf: VecDeque<Tok>,
}

impl<I: Iterator<Item = Tok>> Lookahead<I> {
    pub(crate) fn new(inner: I) -> Self {
        Lookahead { inner, buf: VecDeque::new() }
    }

    /// Peek `n` tokens ahead without consuming (0 is the next token).
    pub(crate) fn peek(&mut self, n: usize) -> Option<&Tok> {
        while self.buf.len() <= n {
            let tok = self.inner.next()?;
            self.buf.push_back(tok);
        }
        self.buf.get(n)
    }

    pub(crate) fn next_tok(&mut self) -> Option<Tok> {
        if let Some(tok) = self.buf.pop_front() {
            return Some(tok);
        }
        self.inner.next()
    }

    /// Consume and return the next `n` tokens.
    pub(crate) fn take(&mut self, n: usize) -> Vec<Tok> {
        (0..n).filter_map(|_| self.next_tok()).collect()
    }
}

/// Deep-tokenize `text`: the full pipeline, sentence markers included.
///
/// The result is lazy; output order is deterministic and a pure function of
/// the input and the option set.
pub fn tokenize(text: &str, opts: &Options) -> impl Iterator<Item = Tok> {
    let opts = *opts;
    let stream = rough::RoughTokens::new(text, opts);
    let stream = particles::ParseParticles::new(stream, opts);
    let stream = refine::Refine::new(stream, opts);
    let stream = phrases::CoalescePhrases::first(stream, opts);
    let stream = dates::ParseDates::new(stream, opts);
    let stream = phrases::CoalescePhrases::second(stream, opts);
    Sentences::new(stream)
}

/// Tokenize a pre-materialized sequence of text chunks, concatenated
/// logically.
pub fn tokenize_chunks<I>(chunks: I, opts: &Options) -> impl Iterator<Item = Tok>
where
    I: IntoIterator,
    I::Item: AsRef<str>,
{
    let mut text = String::new();
    for chunk in chunks {
        text.push_str(chunk.as_ref());
    }
    let owned: Vec<Tok> = tokenize(&text, opts).collect();
    owned.into_iter()
}
