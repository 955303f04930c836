//! The token type flowing through every pipeline stage, together with the
//! merge/split plumbing that keeps the `txt` → `original` offset map intact,
//! and the detokenization helpers built on punctuation whitespace classes.

use serde::Serialize;

use crate::abbrev::Meaning;

/// Token kind. The discriminants are wire codes kept stable for the CSV
/// output format; sentinels live above 10000.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TokKind {
    Punctuation,
    Time,
    /// Reserved.
    Date,
    Year,
    Number,
    Word,
    Telno,
    Percent,
    Url,
    Ordinal,
    /// Reserved.
    Timestamp,
    /// Reserved.
    Currency,
    Amount,
    /// Reserved.
    Person,
    Email,
    /// Reserved.
    Entity,
    Unknown,
    DateAbs,
    DateRel,
    TimestampAbs,
    TimestampRel,
    Measurement,
    NumWLetter,
    Domain,
    Hashtag,
    Molecule,
    Ssn,
    Username,
    SerialNumber,
    /// Reserved.
    Company,
    /// Hard sentence split hint (blank line, or any newline in
    /// one-sentence-per-line mode). Consumed by the segmenter.
    SplitSent,
    ParaBegin,
    ParaEnd,
    SentBegin,
    SentEnd,
    /// End-of-stream sentinel, emitted exactly once.
    EndSentinel,
}

impl TokKind {
    pub const fn code(self) -> u16 {
        match self {
            TokKind::Punctuation => 1,
            TokKind::Time => 2,
            TokKind::Date => 3,
            TokKind::Year => 4,
            TokKind::Number => 5,
            TokKind::Word => 6,
            TokKind::Telno => 7,
            TokKind::Percent => 8,
            TokKind::Url => 9,
            TokKind::Ordinal => 10,
            TokKind::Timestamp => 11,
            TokKind::Currency => 12,
            TokKind::Amount => 13,
            TokKind::Person => 14,
            TokKind::Email => 15,
            TokKind::Entity => 16,
            TokKind::Unknown => 17,
            TokKind::DateAbs => 18,
            TokKind::DateRel => 19,
            TokKind::TimestampAbs => 20,
            TokKind::TimestampRel => 21,
            TokKind::Measurement => 22,
            TokKind::NumWLetter => 23,
            TokKind::Domain => 24,
            TokKind::Hashtag => 25,
            TokKind::Molecule => 26,
            TokKind::Ssn => 27,
            TokKind::Username => 28,
            TokKind::SerialNumber => 29,
            TokKind::Company => 30,
            TokKind::SplitSent => 10000,
            TokKind::ParaBegin => 10001,
            TokKind::ParaEnd => 10002,
            TokKind::SentBegin => 11001,
            TokKind::SentEnd => 11002,
            TokKind::EndSentinel => 12001,
        }
    }

    pub const fn name(self) -> &'static str {
        match self {
            TokKind::Punctuation => "PUNCTUATION",
            TokKind::Time => "TIME",
            TokKind::Date => "DATE",
            TokKind::Year => "YEAR",
            TokKind::Number => "NUMBER",
            TokKind::Word => "WORD",
            TokKind::Telno => "TELNO",
            TokKind::Percent => "PERCENT",
            TokKind::Url => "URL",
            TokKind::Ordinal => "ORDINAL",
            TokKind::Timestamp => "TIMESTAMP",
            TokKind::Currency => "CURRENCY",
            TokKind::Amount => "AMOUNT",
            TokKind::Person => "PERSON",
            TokKind::Email => "EMAIL",
            TokKind::Entity => "ENTITY",
            TokKind::Unknown => "UNKNOWN",
            TokKind::DateAbs => "DATEABS",
            TokKind::DateRel => "DATEREL",
            TokKind::TimestampAbs => "TIMESTAMPABS",
            TokKind::TimestampRel => "TIMESTAMPREL",
            TokKind::Measurement => "MEASUREMENT",
            TokKind::NumWLetter => "NUMWLETTER",
            TokKind::Domain => "DOMAIN",
            TokKind::Hashtag => "HASHTAG",
            TokKind::Molecule => "MOLECULE",
            TokKind::Ssn => "SSN",
            TokKind::Username => "USERNAME",
            TokKind::SerialNumber => "SERIALNUMBER",
            TokKind::Company => "COMPANY",
            TokKind::SplitSent => "S_SPLIT",
            TokKind::ParaBegin => "P_BEGIN",
            TokKind::ParaEnd => "P_END",
            TokKind::SentBegin => "S_BEGIN",
            TokKind::SentEnd => "S_END",
            TokKind::EndSentinel => "X_END",
        }
    }

    #[inline]
    pub const fn is_sentinel(self) -> bool {
        self.code() >= 10000
    }
}

/// Normal spacing discipline of a punctuation symbol, used by
/// [`detokenize`] to reconstruct a readable surface.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum WsClass {
    /// Whitespace to the left only: opening brackets and quotes.
    Left = 1,
    /// Whitespace on both sides: dashes.
    Center = 2,
    /// Whitespace to the right only: terminals, commas, closing marks.
    Right = 3,
    /// No whitespace on either side: slash, apostrophe.
    None = 4,
}

/// Kind-specific payload. The shape is determined by the token kind.
#[derive(Debug, Clone, PartialEq)]
pub enum TokVal {
    /// Hour, minute, second.
    Time(u32, u32, u32),
    /// Year (0 when unknown), month (1-12, 0 when unknown), day (0 when unknown).
    Date(i32, u32, u32),
    /// Date triple followed by a time triple.
    Timestamp(i32, u32, u32, u32, u32, u32),
    Number(f64),
    Percent(f64),
    Ordinal(i64),
    /// Negative for BCE. A year range keeps the first year.
    Year(i32),
    /// Normalized "NNN-NNNN" plus country code without the leading `+`.
    Telno { number: String, cc: String },
    /// Value in the ISO currency, after applying any written multiplier.
    Amount { value: f64, iso: &'static str },
    /// SI base unit and the value converted into it.
    Measurement { unit: &'static str, value: f64 },
    NumLetter { value: i64, letter: char },
    /// Whitespace class and canonical symbol of a punctuation token.
    Punct { space: WsClass, symbol: String },
    /// Abbreviation expansions attached to a WORD.
    Word(Vec<Meaning>),
    Ssn(String),
    /// Handle without the leading `@`.
    Username(String),
}

/// How the normalized surfaces of merged tokens are joined.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Join {
    /// Single space between every part ("3. janúar").
    Spaced,
    /// No separator ("€30.000").
    Tight,
    /// Space only where the original text had one ("64kWst", "64 kWst").
    AsOriginal,
}

/// A classified slice of input text.
///
/// `original` holds the source slice verbatim, including any whitespace that
/// separated the token from its predecessor; `txt` is the normalized surface.
/// `offsets[i]` is the char index into `original` of `txt` char `i`.
#[derive(Debug, Clone, PartialEq)]
pub struct Tok {
    pub kind: TokKind,
    pub txt: String,
    pub original: String,
    pub offsets: Vec<u32>,
    pub val: Option<TokVal>,
}

impl Tok {
    /// A token whose `original` is the surface preceded by `ws`.
    pub fn from_surface(kind: TokKind, surface: &str, ws: &str) -> Tok {
        let lead = ws.chars().count() as u32;
        let offsets = (0..surface.chars().count() as u32).map(|i| lead + i).collect();
        Tok { kind, txt: surface.to_owned(), original: format!("{ws}{surface}"), offsets, val: None }
    }

    /// A marker token carrying no text at all.
    pub fn sentinel(kind: TokKind) -> Tok {
        Tok { kind, txt: String::new(), original: String::new(), offsets: Vec::new(), val: None }
    }

    /// A marker that still owns a slice of the source (paragraph brackets,
    /// trailing whitespace of an all-blank input).
    pub fn sentinel_with_original(kind: TokKind, original: String) -> Tok {
        Tok { kind, txt: String::new(), original, offsets: Vec::new(), val: None }
    }

    pub fn with_val(mut self, val: TokVal) -> Tok {
        self.val = Some(val);
        self
    }

    pub fn with_kind(mut self, kind: TokKind) -> Tok {
        self.kind = kind;
        self
    }

    #[inline]
    pub fn is_sentinel(&self) -> bool {
        self.kind.is_sentinel()
    }

    /// True when the normalized surface begins with an uppercase letter.
    pub fn starts_upper(&self) -> bool {
        self.txt.chars().next().is_some_and(char::is_uppercase)
    }

    /// True when the normalized surface begins with a lowercase letter or digit.
    pub fn starts_lower_or_digit(&self) -> bool {
        self.txt.chars().next().is_some_and(|c| c.is_lowercase() || c.is_ascii_digit())
    }

    /// The punctuation symbol in canonical form, when this is punctuation.
    pub fn punct_symbol(&self) -> Option<&str> {
        match &self.val {
            Some(TokVal::Punct { symbol, .. }) => Some(symbol),
            _ => (self.kind == TokKind::Punctuation).then_some(self.txt.as_str()),
        }
    }

    /// Rewrite the normalized surface in place, realigning the offset map.
    ///
    /// Chars shared with the old surface keep their offsets; inserted chars
    /// inherit the offset at the alignment point, so the map stays
    /// monotonically non-decreasing and in range.
    pub fn set_txt(&mut self, new: &str) {
        if self.txt == new {
            return;
        }
        let old: Vec<char> = self.txt.chars().collect();
        let mut offsets = Vec::with_capacity(new.chars().count());
        let mut j = 0usize;
        for ch in new.chars() {
            if j < old.len() && old[j] == ch {
                offsets.push(self.offsets[j]);
                j += 1;
            } else if j + 1 < old.len() && old[j + 1] == ch {
                // one old char dropped
                offsets.push(self.offsets[j + 1]);
                j += 2;
            } else {
                let at = j.min(old.len().saturating_sub(1));
                offsets.push(self.offsets.get(at).copied().unwrap_or(0));
            }
        }
        self.txt = new.to_owned();
        self.offsets = offsets;
    }

    /// Split after `n` chars of `txt`. The second token's `original` starts
    /// at the source char of `txt` char `n`.
    pub fn split_at(self, n: usize) -> (Tok, Tok) {
        debug_assert!(n > 0 && n < self.offsets.len());
        let boundary = self.offsets[n] as usize;
        let txt: Vec<char> = self.txt.chars().collect();
        let orig: Vec<char> = self.original.chars().collect();
        let head = Tok {
            kind: self.kind,
            txt: txt[..n].iter().collect(),
            original: orig[..boundary].iter().collect(),
            offsets: self.offsets[..n].to_vec(),
            val: None,
        };
        let tail = Tok {
            kind: self.kind,
            txt: txt[n..].iter().collect(),
            original: orig[boundary..].iter().collect(),
            offsets: self.offsets[n..].iter().map(|&o| o - boundary as u32).collect(),
            val: None,
        };
        (head, tail)
    }

    /// Merge consecutive tokens into one. `original` slices concatenate
    /// verbatim; `txt` surfaces join per the `join` policy.
    pub fn merge(kind: TokKind, parts: Vec<Tok>, join: Join, val: Option<TokVal>) -> Tok {
        debug_assert!(!parts.is_empty());
        let mut txt = String::new();
        let mut original = String::new();
        let mut offsets: Vec<u32> = Vec::new();
        let mut base = 0u32;
        for (i, part) in parts.into_iter().enumerate() {
            if i > 0 && !part.txt.is_empty() {
                let spaced = match join {
                    Join::Spaced => true,
                    Join::Tight => false,
                    Join::AsOriginal => part.original.chars().next().is_some_and(char::is_whitespace),
                };
                if spaced && !txt.is_empty() {
                    txt.push(' ');
                    offsets.push(base);
                }
            }
            txt.push_str(&part.txt);
            offsets.extend(part.offsets.iter().map(|&o| o + base));
            base += part.original.chars().count() as u32;
            original.push_str(&part.original);
        }
        Tok { kind, txt, original, offsets, val }
    }
}

/// Whitespace class of a canonical punctuation symbol.
pub(crate) fn whitespace_class(symbol: &str) -> WsClass {
    match symbol {
        "(" | "[" | "{" | "„" | "‚" | "«" | "#" | "€" | "$" | "£" | "<" => WsClass::Left,
        "—" | "–" => WsClass::Center,
        "-" | "/" | "'" | "´" | "~" | "^" | "*" => WsClass::None,
        _ => WsClass::Right,
    }
}

/// Reconstruct a text string from a token sequence, placing exactly one
/// space between tokens except where punctuation whitespace classes say
/// otherwise. With `normalize`, punctuation surfaces are replaced by their
/// canonical forms first.
pub fn detokenize(tokens: &[Tok], normalize: bool) -> String {
    let mut out = String::new();
    let mut suppress_before = true;
    for tok in tokens.iter().filter(|t| !t.is_sentinel()) {
        let surface = match (&tok.val, normalize) {
            (Some(TokVal::Punct { symbol, .. }), true) => symbol.clone(),
            _ => tok.txt.clone(),
        };
        if surface.is_empty() {
            continue;
        }
        let class = match &tok.val {
            Some(TokVal::Punct { space, .. }) => Some(*space),
            _ if tok.kind == TokKind::Punctuation => Some(whitespace_class(&surface)),
            _ => None,
        };
        let (before, after) = match class {
            Some(WsClass::Left) => (true, false),
            Some(WsClass::Center) => (true, true),
            Some(WsClass::Right) => (false, true),
            Some(WsClass::None) => (false, false),
            None => (true, true),
        };
        if before && !suppress_before && !out.is_empty() {
            out.push(' ');
        }
        out.push_str(&surface);
        suppress_before = !after;
    }
    out
}

/// Normalize the spacing of a degraded text: tokenize it and glue it back
/// together. Idempotent over its own output.
pub fn correct_spaces(text: &str) -> String {
    let tokens: Vec<Tok> = crate::tokenizer::tokenize(text, &crate::tokenizer::Options::default()).collect();
    detokenize(&tokens, false)
}
