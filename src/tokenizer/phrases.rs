//! The phrase coalescers: fixed adjacency merges running twice, once before
//! and once after date/time recognition. The first pass builds measurements,
//! symbol-currency amounts and percentages; the second pass handles
//! currencies written as words and written multipliers.

use super::{Lookahead, Options};
use crate::token::{Join, Tok, TokKind, TokVal};

/// Unit surface → SI base unit, multiplier, offset. Conversion is affine:
/// `si = value * mult + offset` (the offset only matters for temperatures).
/// Ordered by surface length so longest-prefix matching works.
const UNITS: &[(&str, &str, f64, f64)] = &[
    ("klst", "s", 3600.0, 0.0),
    ("GWst", "J", 3.6e12, 0.0),
    ("MWst", "J", 3.6e9, 0.0),
    ("kWst", "J", 3.6e6, 0.0),
    ("Wst", "J", 3600.0, 0.0),
    ("mín", "s", 60.0, 0.0),
    ("min", "s", 60.0, 0.0),
    ("sek", "s", 1.0, 0.0),
    ("ltr", "m³", 1.0e-3, 0.0),
    ("GHz", "Hz", 1.0e9, 0.0),
    ("MHz", "Hz", 1.0e6, 0.0),
    ("kHz", "Hz", 1.0e3, 0.0),
    ("hPa", "Pa", 100.0, 0.0),
    ("kPa", "Pa", 1.0e3, 0.0),
    ("°C", "K", 1.0, 273.15),
    ("°F", "K", 5.0 / 9.0, 255.372_222_222_222_2),
    ("mg", "kg", 1.0e-6, 0.0),
    ("kg", "kg", 1.0, 0.0),
    ("gr", "kg", 1.0e-3, 0.0),
    ("mm", "m", 1.0e-3, 0.0),
    ("cm", "m", 1.0e-2, 0.0),
    ("km", "m", 1.0e3, 0.0),
    ("km²", "m²", 1.0e6, 0.0),
    ("m²", "m²", 1.0, 0.0),
    ("fm", "m²", 1.0, 0.0),
    ("m³", "m³", 1.0, 0.0),
    ("ml", "m³", 1.0e-6, 0.0),
    ("dl", "m³", 1.0e-4, 0.0),
    ("MW", "W", 1.0e6, 0.0),
    ("GW", "W", 1.0e9, 0.0),
    ("kW", "W", 1.0e3, 0.0),
    ("MJ", "J", 1.0e6, 0.0),
    ("kJ", "J", 1.0e3, 0.0),
    ("Hz", "Hz", 1.0, 0.0),
    ("Pa", "Pa", 1.0, 0.0),
    ("g", "kg", 1.0e-3, 0.0),
    ("t", "kg", 1.0e3, 0.0),
    ("m", "m", 1.0, 0.0),
    ("l", "m³", 1.0e-3, 0.0),
    ("s", "s", 1.0, 0.0),
    ("h", "s", 3600.0, 0.0),
    ("W", "W", 1.0, 0.0),
    ("J", "J", 1.0, 0.0),
    ("K", "K", 1.0, 0.0),
];

const CURRENCY_SYMBOLS: &[(&str, &str)] = &[("€", "EUR"), ("$", "USD"), ("£", "GBP")];

const CURRENCY_WORDS: &[(&str, &str)] = &[
    ("kr.", "ISK"),
    ("kr", "ISK"),
    ("ISK", "ISK"),
    ("króna", "ISK"),
    ("krónur", "ISK"),
    ("krónum", "ISK"),
    ("krónu", "ISK"),
    ("USD", "USD"),
    ("dollari", "USD"),
    ("dollarar", "USD"),
    ("dollara", "USD"),
    ("dollurum", "USD"),
    ("dali", "USD"),
    ("EUR", "EUR"),
    ("evra", "EUR"),
    ("evrur", "EUR"),
    ("evrum", "EUR"),
    ("GBP", "GBP"),
    ("pund", "GBP"),
    ("pundum", "GBP"),
];

const MULTIPLIERS: &[(&str, f64)] = &[
    ("þús.", 1.0e3),
    ("þúsund", 1.0e3),
    ("millj.", 1.0e6),
    ("milljón", 1.0e6),
    ("milljónir", 1.0e6),
    ("mrð.", 1.0e9),
    ("milljarður", 1.0e9),
    ("milljarðar", 1.0e9),
];

const PERCENT_WORDS: &[&str] =
    &["prósent", "prósenta", "prósentum", "prósentustig", "prósentustigum", "hundraðshluti", "hundraðshlutar"];

/// Surface → (si unit, multiplier, offset), tolerating one trailing period
/// ("klst." is both an abbreviation and a unit).
pub(crate) fn unit_lookup(surface: &str) -> Option<(&'static str, f64, f64)> {
    let stem = surface.strip_suffix('.').unwrap_or(surface);
    UNITS.iter().find(|&&(u, ..)| u == stem).map(|&(_, si, mult, offset)| (si, mult, offset))
}

pub(crate) fn unit_exists(surface: &str) -> bool {
    unit_lookup(surface).is_some()
}

fn currency_symbol(surface: &str) -> Option<&'static str> {
    CURRENCY_SYMBOLS.iter().find(|&&(s, _)| s == surface).map(|&(_, iso)| iso)
}

fn currency_word(surface: &str) -> Option<&'static str> {
    CURRENCY_WORDS.iter().find(|&&(s, _)| s == surface).map(|&(_, iso)| iso)
}

fn multiplier(surface: &str) -> Option<f64> {
    MULTIPLIERS.iter().find(|&&(s, _)| s == surface).map(|&(_, m)| m)
}

fn number_value(tok: &Tok) -> Option<f64> {
    match tok.val {
        Some(TokVal::Number(v)) => Some(v),
        _ => None,
    }
}

enum Pass {
    First,
    Second,
}

pub(crate) struct CoalescePhrases<I: Iterator<Item = Tok>> {
    la: Lookahead<I>,
    opts: Options,
    pass: Pass,
}

impl<I: Iterator<Item = Tok>> CoalescePhrases<I> {
    pub(crate) fn first(inner: I, opts: Options) -> Self {
        CoalescePhrases { la: Lookahead::new(inner), opts, pass: Pass::First }
    }

    pub(crate) fn second(inner: I, opts: Options) -> Self {
        CoalescePhrases { la: Lookahead::new(inner), opts, pass: Pass::Second }
    }

    fn peek_is(&mut self, n: usize, kind: TokKind) -> bool {
        self.la.peek(n).is_some_and(|t| t.kind == kind)
    }

    fn measurement(&mut self, num: Tok, unit_toks: usize, surface: &str) -> Tok {
        let value = number_value(&num).unwrap_or(0.0);
        let (si, mult, offset) = unit_lookup(surface).unwrap();
        let val = TokVal::Measurement { unit: si, value: value * mult + offset };
        let num_txt = num.txt.clone();
        let mut parts = vec![num];
        parts.extend(self.la.take(unit_toks));
        let mut tok = Tok::merge(TokKind::Measurement, parts, Join::AsOriginal, Some(val));
        if self.opts.convert_measurements && surface.starts_with('°') {
            tok.set_txt(&format!("{num_txt} {surface}"));
        }
        tok
    }

    fn first_pass(&mut self, tok: Tok) -> Tok {
        if tok.kind == TokKind::Number {
            let value = number_value(&tok).unwrap_or(0.0);

            // percent sign split off by the rough tokenizer ("45 %")
            if self.la.peek(0).is_some_and(|t| t.kind == TokKind::Punctuation && matches!(t.txt.as_str(), "%" | "‰")) {
                let mut parts = vec![tok];
                parts.extend(self.la.take(1));
                return Tok::merge(TokKind::Percent, parts, Join::Tight, Some(TokVal::Percent(value)));
            }

            // degree sign and scale letter split apart: "200° C"
            if self.la.peek(0).is_some_and(|t| t.kind == TokKind::Punctuation && t.txt == "°")
                && self.la.peek(1).is_some_and(|t| t.kind == TokKind::Word && matches!(t.txt.as_str(), "C" | "F"))
            {
                let surface = format!("°{}", self.la.peek(1).unwrap().txt);
                return self.measurement(tok, 2, &surface);
            }

            // unit word, attached or not: "64 kWst", "5 l", "200 °C"
            if self.peek_is(0, TokKind::Word) {
                let next = self.la.peek(0).unwrap().txt.clone();
                if unit_exists(&next) {
                    return self.measurement(tok, 1, &next);
                }
                if self.opts.coalesce_percent && PERCENT_WORDS.contains(&next.as_str()) {
                    let mut parts = vec![tok];
                    parts.extend(self.la.take(1));
                    return Tok::merge(TokKind::Percent, parts, Join::AsOriginal, Some(TokVal::Percent(value)));
                }
            }

            // number followed by a currency symbol: "30.000 €"
            if let Some(iso) = self.la.peek(0).and_then(|t| {
                (t.kind == TokKind::Punctuation).then(|| currency_symbol(&t.txt)).flatten()
            }) {
                let mut parts = vec![tok];
                parts.extend(self.la.take(1));
                let val = TokVal::Amount { value, iso };
                return Tok::merge(TokKind::Amount, parts, Join::AsOriginal, Some(val));
            }

            return tok;
        }

        // currency symbol followed by a number: "€ 30.000"
        if tok.kind == TokKind::Punctuation {
            if let Some(iso) = currency_symbol(&tok.txt) {
                if let Some(value) = self.la.peek(0).and_then(number_value) {
                    let mut parts = vec![tok];
                    parts.extend(self.la.take(1));
                    let val = TokVal::Amount { value, iso };
                    return Tok::merge(TokKind::Amount, parts, Join::Tight, Some(val));
                }
            }
        }

        tok
    }

    fn second_pass(&mut self, tok: Tok) -> Tok {
        if tok.kind == TokKind::Number {
            let value = number_value(&tok).unwrap_or(0.0);

            // written multiplier, optionally followed by a currency: "30 þús. kr."
            if let Some(mult) = self.la.peek(0).and_then(|t| {
                (t.kind == TokKind::Word).then(|| multiplier(&t.txt)).flatten()
            }) {
                if let Some(iso) = self.la.peek(1).and_then(|t| {
                    (t.kind == TokKind::Word).then(|| currency_word(&t.txt)).flatten()
                }) {
                    let mut parts = vec![tok];
                    parts.extend(self.la.take(2));
                    let val = TokVal::Amount { value: value * mult, iso };
                    return Tok::merge(TokKind::Amount, parts, Join::AsOriginal, Some(val));
                }
                return tok;
            }

            // currency written as a word: "500 krónur"
            if let Some(iso) = self.la.peek(0).and_then(|t| {
                (t.kind == TokKind::Word).then(|| currency_word(&t.txt)).flatten()
            }) {
                let mut parts = vec![tok];
                parts.extend(self.la.take(1));
                let val = TokVal::Amount { value, iso };
                return Tok::merge(TokKind::Amount, parts, Join::AsOriginal, Some(val));
            }

            return tok;
        }

        // currency abbreviation before the number: "kr. 500"
        if tok.kind == TokKind::Word {
            if let Some(iso) = currency_word(&tok.txt) {
                if let Some(value) = self.la.peek(0).and_then(number_value) {
                    let mut parts = vec![tok];
                    parts.extend(self.la.take(1));
                    let val = TokVal::Amount { value, iso };
                    return Tok::merge(TokKind::Amount, parts, Join::AsOriginal, Some(val));
                }
            }
        }

        // a multiplier scaling an already-built amount: "€30 millj."
        if tok.kind == TokKind::Amount {
            if let Some(mult) = self.la.peek(0).and_then(|t| {
                (t.kind == TokKind::Word).then(|| multiplier(&t.txt)).flatten()
            }) {
                if let Some(TokVal::Amount { value, iso }) = tok.val.clone() {
                    let mut parts = vec![tok];
                    parts.extend(self.la.take(1));
                    let val = TokVal::Amount { value: value * mult, iso };
                    return Tok::merge(TokKind::Amount, parts, Join::AsOriginal, Some(val));
                }
            }
        }

        tok
    }
}

impl<I: Iterator<Item = Tok>> Iterator for CoalescePhrases<I> {
    type Item = Tok;

    fn next(&mut self) -> Option<Tok> {
        let tok = self.la.next_tok()?;
        if tok.is_sentinel() {
            return Some(tok);
        }
        Some(match self.pass {
            Pass::First => self.first_pass(tok),
            Pass::Second => self.second_pass(tok),
        })
    }
}
