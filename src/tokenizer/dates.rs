//! The date/time recognizer: combines ordinals, month names, years, clock
//! times and `kl.`/`klukkan` phrases into DATEABS, DATEREL, TIMESTAMPABS,
//! TIMESTAMPREL and TIME tokens. Longest match wins; nothing merges unless
//! the resulting date passes Gregorian validation.

use super::{Lookahead, Options};
use crate::token::{Join, Tok, TokKind, TokVal};

/// Month names and their common abbreviations, matched case-insensitively
/// (`Ágúst` after an ordinal is the month, not a person).
const MONTHS: &[(&str, u32)] = &[
    ("janúar", 1),
    ("febrúar", 2),
    ("mars", 3),
    ("apríl", 4),
    ("maí", 5),
    ("júní", 6),
    ("júlí", 7),
    ("ágúst", 8),
    ("september", 9),
    ("október", 10),
    ("nóvember", 11),
    ("desember", 12),
    ("jan.", 1),
    ("feb.", 2),
    ("mar.", 3),
    ("apr.", 4),
    ("jún.", 6),
    ("júl.", 7),
    ("ág.", 8),
    ("ágú.", 8),
    ("sep.", 9),
    ("sept.", 9),
    ("okt.", 10),
    ("nóv.", 11),
    ("des.", 12),
];

/// Spelled-out clock hours: `klukkan tvö`, `klukkan hálf tvö`.
const CLOCK_WORDS: &[(&str, u32)] = &[
    ("eitt", 1),
    ("tvö", 2),
    ("þrjú", 3),
    ("fjögur", 4),
    ("fimm", 5),
    ("sex", 6),
    ("sjö", 7),
    ("átta", 8),
    ("níu", 9),
    ("tíu", 10),
    ("ellefu", 11),
    ("tólf", 12),
];

pub(crate) fn month_of(surface: &str) -> Option<u32> {
    let folded = surface.to_lowercase();
    MONTHS.iter().find(|&&(name, _)| name == folded).map(|&(_, m)| m)
}

fn clock_word(surface: &str) -> Option<u32> {
    CLOCK_WORDS.iter().find(|&&(w, _)| w == surface).map(|&(_, h)| h)
}

/// Gregorian validity; year 0 stands for a year-less (relative) date and
/// admits February 29th.
pub(crate) fn is_valid_date(y: i32, m: u32, d: u32) -> bool {
    if !(1..=12).contains(&m) {
        return false;
    }
    let leap = y == 0 || (y % 4 == 0 && (y % 100 != 0 || y % 400 == 0));
    let max = match m {
        1 | 3 | 5 | 7 | 8 | 10 | 12 => 31,
        4 | 6 | 9 | 11 => 30,
        _ => {
            if leap {
                29
            } else {
                28
            }
        }
    };
    (1..=max).contains(&d)
}

fn is_clock_intro(tok: &Tok) -> bool {
    tok.kind == TokKind::Word && matches!(tok.txt.as_str(), "kl." | "klukkan" | "Kl." | "Klukkan")
}

pub(crate) struct ParseDates<I: Iterator<Item = Tok>> {
    la: Lookahead<I>,
    #[allow(dead_code)]
    opts: Options,
}

impl<I: Iterator<Item = Tok>> ParseDates<I> {
    pub(crate) fn new(inner: I, opts: Options) -> Self {
        ParseDates { la: Lookahead::new(inner), opts }
    }

    fn year_ahead(&mut self, n: usize) -> Option<i32> {
        match self.la.peek(n)?.val {
            Some(TokVal::Year(y)) => Some(y),
            _ => None,
        }
    }

    /// ORDINAL + month `[+ YEAR]` → DATEREL or DATEABS.
    fn date_from_ordinal(&mut self, tok: Tok) -> Tok {
        let day = match tok.val {
            Some(TokVal::Ordinal(d)) if (1..=31).contains(&d) => d as u32,
            _ => return tok,
        };
        let month = match self.la.peek(0) {
            Some(t) if t.kind == TokKind::Word => match month_of(&t.txt) {
                Some(m) => m,
                None => return tok,
            },
            _ => return tok,
        };
        if let Some(y) = self.year_ahead(1) {
            if is_valid_date(y, month, day) {
                let mut parts = vec![tok];
                parts.extend(self.la.take(2));
                let val = TokVal::Date(y, month, day);
                return Tok::merge(TokKind::DateAbs, parts, Join::Spaced, Some(val));
            }
        }
        if is_valid_date(0, month, day) {
            let mut parts = vec![tok];
            parts.extend(self.la.take(1));
            let val = TokVal::Date(0, month, day);
            return Tok::merge(TokKind::DateRel, parts, Join::Spaced, Some(val));
        }
        tok
    }

    /// Attach what can follow a date: a year completing a relative date, or
    /// a clock time making a timestamp.
    fn extend_date(&mut self, tok: Tok) -> Tok {
        let mut tok = tok;
        loop {
            if tok.kind == TokKind::DateRel {
                if let (Some(TokVal::Date(0, m, d)), Some(y)) = (tok.val.clone(), self.year_ahead(0)) {
                    if d != 0 && is_valid_date(y, m, d) {
                        let mut parts = vec![tok];
                        parts.extend(self.la.take(1));
                        tok = Tok::merge(TokKind::DateAbs, parts, Join::Spaced, Some(TokVal::Date(y, m, d)));
                        continue;
                    }
                }
            }
            if matches!(tok.kind, TokKind::DateAbs | TokKind::DateRel) {
                let (time_at, skip) = if self.la.peek(0).is_some_and(|t| t.kind == TokKind::Time) {
                    (0, 1)
                } else if self.la.peek(0).is_some_and(is_clock_intro)
                    && self.la.peek(1).is_some_and(|t| t.kind == TokKind::Time)
                {
                    (1, 2)
                } else {
                    return tok;
                };
                let (h, mi, s) = match self.la.peek(time_at).unwrap().val {
                    Some(TokVal::Time(h, mi, s)) => (h, mi, s),
                    _ => return tok,
                };
                let (y, m, d) = match tok.val {
                    Some(TokVal::Date(y, m, d)) => (y, m, d),
                    _ => return tok,
                };
                let kind = if tok.kind == TokKind::DateAbs { TokKind::TimestampAbs } else { TokKind::TimestampRel };
                let mut parts = vec![tok];
                parts.extend(self.la.take(skip));
                let val = TokVal::Timestamp(y, m, d, h, mi, s);
                tok = Tok::merge(kind, parts, Join::Spaced, Some(val));
                continue;
            }
            return tok;
        }
    }

    /// `kl. 15:30`, `klukkan hálf tvö`, `klukkan tvö`.
    fn time_from_clock_intro(&mut self, tok: Tok) -> Tok {
        if self.la.peek(0).is_some_and(|t| t.kind == TokKind::Time) {
            let val = self.la.peek(0).unwrap().val.clone();
            let mut parts = vec![tok];
            parts.extend(self.la.take(1));
            return Tok::merge(TokKind::Time, parts, Join::Spaced, val);
        }
        let half = self.la.peek(0).is_some_and(|t| t.kind == TokKind::Word && t.txt == "hálf");
        let hour_at = if half { 1 } else { 0 };
        if let Some(h) = self.la.peek(hour_at).and_then(|t| {
            (t.kind == TokKind::Word).then(|| clock_word(&t.txt)).flatten()
        }) {
            let val = if half {
                // "hálf tvö" is half past one
                TokVal::Time(h - 1, 30, 0)
            } else {
                TokVal::Time(h, 0, 0)
            };
            let mut parts = vec![tok];
            parts.extend(self.la.take(hour_at + 1));
            return Tok::merge(TokKind::Time, parts, Join::Spaced, Some(val));
        }
        tok
    }
}

impl<I: Iterator<Item = Tok>> Iterator for ParseDates<I> {
    type Item = Tok;

    fn next(&mut self) -> Option<Tok> {
        let tok = self.la.next_tok()?;
        if tok.is_sentinel() {
            return Some(tok);
        }
        let tok = match tok.kind {
            TokKind::Ordinal => {
                let tok = self.date_from_ordinal(tok);
                self.extend_date(tok)
            }
            TokKind::Word if month_of(&tok.txt).is_some() => {
                // month name + year → year-and-month date
                if let Some(y) = self.year_ahead(0) {
                    let m = month_of(&tok.txt).unwrap();
                    let mut parts = vec![tok];
                    parts.extend(self.la.take(1));
                    let val = TokVal::Date(y, m, 0);
                    let merged = Tok::merge(TokKind::DateRel, parts, Join::Spaced, Some(val));
                    self.extend_date(merged)
                } else {
                    tok
                }
            }
            TokKind::Word if is_clock_intro(&tok) => self.time_from_clock_intro(tok),
            TokKind::DateAbs | TokKind::DateRel => self.extend_date(tok),
            _ => tok,
        };
        Some(tok)
    }
}
