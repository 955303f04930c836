//! The sentence segmenter: a two-state machine (OUTSIDE/INSIDE) framing the
//! token stream with S_BEGIN/S_END markers.
//!
//! A terminal `.`, `?`, `!` or `…` closes the sentence unless the next
//! token's surface starts with a lowercase letter or digit, or is
//! continuation punctuation (a closing quote or bracket). An abbreviation
//! keeps its period attached, so end-of-sentence is decided from the
//! following context: a capitalized follower closes the sentence unless the
//! abbreviation is a name finisher ("hr. Jón"). Blank lines close any open
//! sentence unconditionally. The bias, where undecidable, is toward
//! under-splitting.

use std::collections::VecDeque;
use std::sync::LazyLock;

use fancy_regex::Regex;
use itertools::Itertools;

use crate::abbrev::AbbrevDict;
use crate::token::{Tok, TokKind, TokVal};
use crate::tokenizer::{tokenize, Lookahead, Options};

static PARAGRAPH_BREAK: LazyLock<Regex> = LazyLock::new(|| Regex::new(r#"\n[ \t]*\n\s*"#).unwrap());

/// Punctuation that may trail a sentence terminal without opening a new
/// sentence.
fn is_continuation_punct(tok: &Tok) -> bool {
    tok.kind == TokKind::Punctuation
        && matches!(
            tok.punct_symbol().unwrap_or(&tok.txt),
            ")" | "]" | "}" | "“" | "”" | "’" | "»" | "›" | "," | ";" | ":"
        )
}

pub struct Sentences<I: Iterator<Item = Tok>> {
    la: Lookahead<I>,
    out: VecDeque<Tok>,
    inside: bool,
    finished: bool,
    /// A sentence terminal deferred its decision to trailing continuation
    /// punctuation (`."` or `.)`).
    deferred: bool,
}

impl<I: Iterator<Item = Tok>> Sentences<I> {
    pub(crate) fn new(inner: I) -> Self {
        Sentences { la: Lookahead::new(inner), out: VecDeque::new(), inside: false, finished: false, deferred: false }
    }

    fn close(&mut self) {
        if self.inside {
            self.inside = false;
            self.out.push_back(Tok::sentinel(TokKind::SentEnd));
        }
    }

    fn step(&mut self, tok: Tok) {
        match tok.kind {
            TokKind::SplitSent => {
                self.close();
                // a whitespace-only input leaves its text on the hint
                if !tok.original.is_empty() {
                    self.out.push_back(tok);
                }
            }
            TokKind::ParaBegin | TokKind::ParaEnd => {
                self.close();
                self.out.push_back(tok);
            }
            _ => {
                if !self.inside {
                    self.inside = true;
                    self.out.push_back(Tok::sentinel(TokKind::SentBegin));
                }
                let ends = self.ends_sentence(&tok);
                self.out.push_back(tok);
                if ends {
                    self.close();
                }
            }
        }
    }

    fn ends_sentence(&mut self, tok: &Tok) -> bool {
        // continuation punctuation absorbed a preceding terminal; it closes
        // the sentence itself unless yet more of it follows
        if self.deferred && is_continuation_punct(tok) {
            let Some(next) = self.la.peek(0) else { return false };
            if next.is_sentinel() {
                return false;
            }
            if is_continuation_punct(next) {
                return false;
            }
            self.deferred = false;
            return !next.starts_lower_or_digit();
        }
        self.deferred = false;

        let terminal_punct = tok.kind == TokKind::Punctuation
            && matches!(tok.punct_symbol().unwrap_or(&tok.txt), "." | "?" | "!" | "…");
        let final_abbrev =
            tok.kind == TokKind::Word && tok.txt.ends_with('.') && matches!(tok.val, Some(TokVal::Word(_)));
        let final_ordinal = tok.kind == TokKind::Ordinal;
        if !(terminal_punct || final_abbrev || final_ordinal) {
            return false;
        }

        let Some(next) = self.la.peek(0) else {
            // end of input closes the sentence on its own
            return false;
        };
        if next.is_sentinel() {
            return false;
        }

        if terminal_punct {
            if is_continuation_punct(next) {
                self.deferred = true;
                return false;
            }
            !next.starts_lower_or_digit()
        } else {
            // the period stays attached to an abbreviation or ordinal, so a
            // capitalized follower is the only end-of-sentence signal
            next.starts_upper() && !(final_abbrev && AbbrevDict::global().is_finisher(&tok.txt))
        }
    }
}

impl<I: Iterator<Item = Tok>> Iterator for Sentences<I> {
    type Item = Tok;

    fn next(&mut self) -> Option<Tok> {
        loop {
            if let Some(tok) = self.out.pop_front() {
                return Some(tok);
            }
            match self.la.next_tok() {
                Some(tok) => self.step(tok),
                None => {
                    if self.finished {
                        return None;
                    }
                    self.finished = true;
                    self.close();
                    self.out.push_back(Tok::sentinel(TokKind::EndSentinel));
                }
            }
        }
    }
}

/// Split `text` into sentences, one string each, tokens joined by single
/// spaces.
pub fn split_into_sentences(text: &str, opts: &Options) -> Vec<String> {
    let mut sentences = Vec::new();
    let mut current: Vec<String> = Vec::new();
    for tok in tokenize(text, opts) {
        match tok.kind {
            TokKind::SentBegin => current.clear(),
            TokKind::SentEnd => {
                if !current.is_empty() {
                    sentences.push(current.drain(..).join(" "));
                }
            }
            kind if kind.is_sentinel() => {}
            _ => {
                let surface = if opts.original { tok.original.trim().to_owned() } else { tok.txt };
                current.push(surface);
            }
        }
    }
    sentences
}

/// Convert blank-line paragraph separators into `[[ … ]]` paragraph
/// markers.
pub fn mark_paragraphs(text: &str) -> String {
    PARAGRAPH_BREAK
        .split(text)
        .map(Result::unwrap)
        .map(str::trim)
        .filter(|p| !p.is_empty())
        .map(|p| format!("[[ {p} ]]"))
        .join(" ")
}
