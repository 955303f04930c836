//! The abbreviation/punctuation refiner: attaches dictionary expansions to
//! known abbreviations (correcting recognized misspellings), gives every
//! punctuation token its whitespace class and canonical symbol, and collapses
//! composite-word continuations (`fjölskyldu- og húsdýragarðurinn`).

use super::{Lookahead, Options};
use crate::abbrev::AbbrevDict;
use crate::token::{whitespace_class, Join, Tok, TokKind, TokVal};

pub(crate) struct Refine<I: Iterator<Item = Tok>> {
    la: Lookahead<I>,
    opts: Options,
    dquote_open: bool,
    squote_open: bool,
}

impl<I: Iterator<Item = Tok>> Refine<I> {
    pub(crate) fn new(inner: I, opts: Options) -> Self {
        Refine { la: Lookahead::new(inner), opts, dquote_open: false, squote_open: false }
    }

    /// `X- og Y`, `X og -Y`, and the iterated `A-, B- og C-…` pattern.
    fn try_composite(&mut self, tok: Tok) -> Tok {
        fn is_conjunction(t: &Tok) -> bool {
            t.kind == TokKind::Word && matches!(t.txt.as_str(), "og" | "eða")
        }
        fn ends_dashed(t: &Tok) -> bool {
            t.kind == TokKind::Word && t.txt.chars().count() > 1 && t.txt.ends_with('-')
        }

        let mut tok = tok;
        if ends_dashed(&tok) {
            loop {
                // another list item, with the pattern still going afterwards
                let comma = self.la.peek(0).is_some_and(|t| t.kind == TokKind::Punctuation && t.txt == ",");
                let dashed = self.la.peek(1).is_some_and(ends_dashed);
                let goes_on = self.la.peek(2).is_some_and(|t| is_conjunction(t) || t.txt == ",");
                if comma && dashed && goes_on {
                    let mut parts = vec![tok];
                    parts.extend(self.la.take(2));
                    tok = Tok::merge(TokKind::Word, parts, Join::AsOriginal, None);
                    continue;
                }
                let conj = self.la.peek(0).is_some_and(is_conjunction);
                let word = self.la.peek(1).is_some_and(|t| t.kind == TokKind::Word);
                if conj && word {
                    let mut parts = vec![tok];
                    parts.extend(self.la.take(2));
                    tok = Tok::merge(TokKind::Word, parts, Join::AsOriginal, None);
                }
                return tok;
            }
        }

        let conj = self.la.peek(0).is_some_and(is_conjunction);
        let dashed = self.la.peek(1).is_some_and(|t| {
            t.kind == TokKind::Word
                && t.txt.starts_with('-')
                && t.txt.chars().nth(1).is_some_and(char::is_alphabetic)
        });
        if conj && dashed {
            let mut parts = vec![tok];
            parts.extend(self.la.take(2));
            return Tok::merge(TokKind::Word, parts, Join::AsOriginal, None);
        }
        tok
    }

    fn refine_word(&mut self, tok: Tok) -> Tok {
        let dict = AbbrevDict::global();
        let mut tok = self.try_composite(tok);

        // greedily extend across an adjacent period when the dictionary
        // knows the longer form
        while self.la.peek(0).is_some_and(|t| t.kind == TokKind::Punctuation && t.txt == ".") && {
            let extended = format!("{}.", tok.txt);
            dict.contains(&extended) || dict.correction(&extended).is_some()
        } {
            let mut parts = vec![tok];
            parts.extend(self.la.take(1));
            tok = Tok::merge(TokKind::Word, parts, Join::Tight, None);
        }

        if let Some(canonical) = dict.correction(&tok.txt).map(str::to_owned) {
            tok.set_txt(&canonical);
        }
        if let Some((_, meanings)) = dict.lookup_folded(&tok.txt) {
            tok.val = Some(TokVal::Word(meanings.to_vec()));
        }
        tok
    }

    fn refine_punct(&mut self, mut tok: Tok) -> Tok {
        let symbol = match tok.txt.as_str() {
            "\"" => {
                self.dquote_open = !self.dquote_open;
                if self.dquote_open {
                    "„".to_owned()
                } else {
                    "“".to_owned()
                }
            }
            "'" | "´" => {
                self.squote_open = !self.squote_open;
                if self.squote_open {
                    "‚".to_owned()
                } else {
                    "’".to_owned()
                }
            }
            s if s.chars().count() >= 2 && s.chars().all(|c| c == '.') => "…".to_owned(),
            s if s.chars().count() >= 2 && s.chars().all(|c| matches!(c, '-' | '–' | '—')) => "—".to_owned(),
            s => s.to_owned(),
        };
        if self.opts.normalize && tok.txt != symbol {
            tok.set_txt(&symbol);
        }
        let space = whitespace_class(&symbol);
        tok.val = Some(TokVal::Punct { space, symbol });
        tok
    }
}

impl<I: Iterator<Item = Tok>> Iterator for Refine<I> {
    type Item = Tok;

    fn next(&mut self) -> Option<Tok> {
        let tok = self.la.next_tok()?;
        Some(match tok.kind {
            TokKind::Word => self.refine_word(tok),
            TokKind::Punctuation => self.refine_punct(tok),
            _ => tok,
        })
    }
}
