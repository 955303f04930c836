//! The rough tokenizer: splits the preprocessed character stream on
//! whitespace and on always-splitting punctuation, preserving for every raw
//! token its original slice (leading whitespace included) and the char
//! offsets into it.
//!
//! Whitespace after a token belongs to the next token, except at end of
//! input where it is folded into the last one, so that concatenating
//! `original` over the stream reproduces the preprocessed input.

use std::borrow::Cow;
use std::collections::VecDeque;
use std::sync::LazyLock;

use fancy_regex::Regex;

use super::Options;
use crate::token::{Tok, TokKind};

/// RFC3986-like URIs are kept whole; interior punctuation must not split
/// them.
pub(crate) static URL: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"^[A-Za-z][A-Za-z0-9+.-]*://\S+$"#).unwrap());

/// Named HTML entities only. Numeric entities (`&#xE1;`) are not expanded.
static NAMED_ENTITY: LazyLock<Regex> = LazyLock::new(|| Regex::new(r#"&[A-Za-z][A-Za-z0-9]*;"#).unwrap());

/// Fold vowel + combining acute (U+0301) or diaeresis (U+0308) into the
/// precomposed Icelandic letters. Other combining marks pass through.
pub(crate) fn fold_composite_glyphs(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut iter = text.chars().peekable();
    while let Some(c) = iter.next() {
        let folded = match iter.peek() {
            Some('\u{0301}') => match c {
                'a' => Some('á'),
                'e' => Some('é'),
                'i' => Some('í'),
                'o' => Some('ó'),
                'u' => Some('ú'),
                'y' => Some('ý'),
                'A' => Some('Á'),
                'E' => Some('É'),
                'I' => Some('Í'),
                'O' => Some('Ó'),
                'U' => Some('Ú'),
                'Y' => Some('Ý'),
                _ => None,
            },
            Some('\u{0308}') => match c {
                'o' => Some('ö'),
                'O' => Some('Ö'),
                _ => None,
            },
            _ => None,
        };
        match folded {
            Some(f) => {
                iter.next();
                out.push(f);
            }
            None => out.push(c),
        }
    }
    out
}

/// Expand named HTML entities via the html5 table, then fold the ligature
/// code points the table produces into their letter pairs.
pub(crate) fn replace_html_escapes(text: &str) -> String {
    let replaced = NAMED_ENTITY.replace_all(text, |caps: &fancy_regex::Captures| {
        htmlize::unescape(caps.get(0).unwrap().as_str()).into_owned()
    });
    replaced.replace('\u{FB01}', "fi").replace('\u{FB02}', "fl")
}

/// Remove invisible characters and turn nonbreaking spaces into plain ones.
/// Always applied: downstream patterns assume clean spacing.
pub(crate) fn clean_spaces(text: &str) -> String {
    text.chars()
        .filter_map(|c| match c {
            '\u{00AD}' | '\u{200B}' | '\u{200C}' | '\u{200D}' | '\u{2060}' | '\u{FEFF}' => None,
            '\u{00A0}' | '\u{2007}' | '\u{202F}' => Some(' '),
            _ => Some(c),
        })
        .collect()
}

pub(crate) fn preprocess(text: &str, opts: &Options) -> String {
    let mut text = Cow::Borrowed(text);
    if opts.replace_composite_glyphs {
        text = Cow::Owned(fold_composite_glyphs(&text));
    }
    if opts.replace_html_escapes {
        text = Cow::Owned(replace_html_escapes(&text));
    }
    clean_spaces(&text)
}

pub(crate) struct RoughTokens {
    chars: Vec<char>,
    pos: usize,
    opts: Options,
    queue: VecDeque<Tok>,
}

impl RoughTokens {
    pub(crate) fn new(text: &str, opts: Options) -> Self {
        RoughTokens { chars: preprocess(text, &opts).chars().collect(), pos: 0, opts, queue: VecDeque::new() }
    }

    /// Scan one whitespace gap plus the following chunk into the queue.
    /// Returns false at end of input.
    fn refill(&mut self) -> bool {
        let len = self.chars.len();
        if self.pos >= len {
            return false;
        }

        let ws_start = self.pos;
        let mut newlines = 0usize;
        while self.pos < len && self.chars[self.pos].is_whitespace() {
            if self.chars[self.pos] == '\n' {
                newlines += 1;
            }
            self.pos += 1;
        }
        let ws: String = self.chars[ws_start..self.pos].iter().collect();

        if self.pos >= len {
            // input was (or ended in) pure whitespace with no chunk to carry it
            if !ws.is_empty() {
                self.queue.push_back(Tok::sentinel_with_original(TokKind::SplitSent, ws));
            }
            return !self.queue.is_empty();
        }

        if (self.opts.one_sent_per_line && newlines >= 1) || newlines >= 2 {
            self.queue.push_back(Tok::sentinel(TokKind::SplitSent));
        }

        let start = self.pos;
        while self.pos < len && !self.chars[self.pos].is_whitespace() {
            self.pos += 1;
        }
        let chunk: String = self.chars[start..self.pos].iter().collect();

        match chunk.as_str() {
            "[[" => self.queue.push_back(Tok::sentinel_with_original(TokKind::ParaBegin, format!("{ws}[["))),
            "]]" => self.queue.push_back(Tok::sentinel_with_original(TokKind::ParaEnd, format!("{ws}]]"))),
            _ => {
                for (i, (piece, kind)) in split_chunk(&chunk).into_iter().enumerate() {
                    let lead = if i == 0 { ws.as_str() } else { "" };
                    self.queue.push_back(Tok::from_surface(kind, &piece, lead));
                }
            }
        }

        // whitespace that runs to end of input belongs to the last token
        let tail_start = self.pos;
        while self.pos < len && self.chars[self.pos].is_whitespace() {
            self.pos += 1;
        }
        if self.pos >= len {
            if tail_start < self.pos {
                let tail: String = self.chars[tail_start..self.pos].iter().collect();
                if let Some(last) = self.queue.back_mut() {
                    last.original.push_str(&tail);
                }
            }
        } else {
            self.pos = tail_start;
        }
        true
    }
}

impl Iterator for RoughTokens {
    type Item = Tok;

    fn next(&mut self) -> Option<Tok> {
        loop {
            if let Some(tok) = self.queue.pop_front() {
                return Some(tok);
            }
            if !self.refill() {
                return None;
            }
        }
    }
}

#[inline]
fn is_dash(c: char) -> bool {
    matches!(c, '-' | '\u{2010}' | '\u{2011}' | '\u{2012}' | '\u{2013}' | '\u{2014}' | '\u{2015}')
}

/// Split one whitespace-free chunk into raw pieces.
///
/// Always-splitting symbols become their own piece; commas, colons and
/// slashes stay inside digit runs (decimals, clock times, fractions, dates);
/// the ASCII apostrophe stays between letters; a single dash stays attached
/// to an adjacent alphanumeric, while a dash run of two or more is one
/// piece. Dots are left in place for the particle parser to judge.
fn split_chunk(chunk: &str) -> Vec<(String, TokKind)> {
    if URL.is_match(chunk).unwrap_or(false) {
        return vec![(chunk.to_owned(), TokKind::Unknown)];
    }

    let cs: Vec<char> = chunk.chars().collect();
    let mut pieces: Vec<(String, TokKind)> = Vec::new();
    let mut cur = String::new();
    let mut i = 0usize;

    macro_rules! flush {
        () => {
            if !cur.is_empty() {
                pieces.push((std::mem::take(&mut cur), TokKind::Unknown));
            }
        };
    }

    while i < cs.len() {
        let c = cs[i];
        let prev_digit = i > 0 && cs[i - 1].is_ascii_digit();
        let next_digit = i + 1 < cs.len() && cs[i + 1].is_ascii_digit();
        let prev_letter = i > 0 && cs[i - 1].is_alphabetic();
        let next_letter = i + 1 < cs.len() && cs[i + 1].is_alphabetic();

        match c {
            '(' | ')' | '[' | ']' | '{' | '}' | ';' | '!' | '?' | '…' | '"' | '„' | '“' | '”' | '«' | '»'
            | '‘' | '’' | '‚' | '‹' | '›' | '<' | '>' | '€' | '$' | '£' => {
                flush!();
                pieces.push((c.to_string(), TokKind::Punctuation));
            }
            ',' | ':' | '/' if prev_digit && next_digit => cur.push(c),
            ',' | ':' | '/' => {
                flush!();
                pieces.push((c.to_string(), TokKind::Punctuation));
            }
            '\'' | '´' if prev_letter && next_letter => cur.push(c),
            '\'' | '´' => {
                flush!();
                pieces.push((c.to_string(), TokKind::Punctuation));
            }
            '#' if i > 0 => {
                flush!();
                pieces.push((c.to_string(), TokKind::Punctuation));
            }
            d if is_dash(d) => {
                if i + 1 < cs.len() && cs[i + 1] == d {
                    let mut j = i;
                    while j < cs.len() && cs[j] == d {
                        j += 1;
                    }
                    flush!();
                    pieces.push((cs[i..j].iter().collect(), TokKind::Punctuation));
                    i = j;
                    continue;
                }
                let prev_alnum = i > 0 && cs[i - 1].is_alphanumeric();
                let next_alnum = i + 1 < cs.len() && cs[i + 1].is_alphanumeric();
                if prev_alnum || next_alnum {
                    cur.push(d);
                } else {
                    flush!();
                    pieces.push((d.to_string(), TokKind::Punctuation));
                }
            }
            _ => cur.push(c),
        }
        i += 1;
    }
    flush!();
    pieces
}

#[cfg(test)]
mod tests {
    use super::*;

    fn surfaces(text: &str) -> Vec<String> {
        RoughTokens::new(text, Options::default()).map(|t| t.txt).collect()
    }

    fn originals(text: &str) -> String {
        RoughTokens::new(text, Options::default()).map(|t| t.original).collect()
    }

    #[test]
    fn splits_on_whitespace() {
        assert_eq!(surfaces("Hann  kom \t heim"), ["Hann", "kom", "heim"]);
    }

    #[test]
    fn originals_reproduce_input() {
        for text in [" Hann  kom \t heim ", "a(b)c", "„Nei,“ sagði hún. ", "\n\nHér.\n"] {
            assert_eq!(originals(text), text);
        }
    }

    #[test]
    fn splits_brackets_and_commas() {
        assert_eq!(surfaces("(svona, sko)"), ["(", "svona", ",", "sko", ")"]);
    }

    #[test]
    fn keeps_decimal_comma() {
        assert_eq!(surfaces("12,5 og 1.234,56"), ["12,5", "og", "1.234,56"]);
    }

    #[test]
    fn keeps_clock_colon() {
        assert_eq!(surfaces("kl 15:30: svona"), ["kl", "15:30", ":", "svona"]);
    }

    #[test]
    fn keeps_numeric_slash() {
        assert_eq!(surfaces("3/4 og/eða 01/02/2024"), ["3/4", "og", "/", "eða", "01/02/2024"]);
    }

    #[test]
    fn url_is_kept_whole() {
        assert_eq!(surfaces("sjá https://mbl.is/frett?id=1 hér"), ["sjá", "https://mbl.is/frett?id=1", "hér"]);
    }

    #[test]
    fn dash_run_is_one_token() {
        assert_eq!(surfaces("fyrst -- svo"), ["fyrst", "--", "svo"]);
    }

    #[test]
    fn trailing_dash_stays_on_word() {
        assert_eq!(surfaces("fjölskyldu- og húsdýragarðurinn"), ["fjölskyldu-", "og", "húsdýragarðurinn"]);
    }

    #[test]
    fn currency_symbol_peels_off() {
        assert_eq!(surfaces("€30.000"), ["€", "30.000"]);
    }

    #[test]
    fn dots_stay_attached() {
        assert_eq!(surfaces("o.s.frv. 3.janúar H2SO4."), ["o.s.frv.", "3.janúar", "H2SO4."]);
    }

    #[test]
    fn blank_line_emits_split_hint() {
        let kinds: Vec<_> = RoughTokens::new("a\n\nb", Options::default()).map(|t| t.kind).collect();
        assert_eq!(kinds, [TokKind::Unknown, TokKind::SplitSent, TokKind::Unknown]);
    }

    #[test]
    fn single_newline_is_soft() {
        let kinds: Vec<_> = RoughTokens::new("a\nb", Options::default()).map(|t| t.kind).collect();
        assert_eq!(kinds, [TokKind::Unknown, TokKind::Unknown]);
    }

    #[test]
    fn one_sent_per_line_hardens_newlines() {
        let opts = Options { one_sent_per_line: true, ..Options::default() };
        let kinds: Vec<_> = RoughTokens::new("a\nb", opts).map(|t| t.kind).collect();
        assert_eq!(kinds, [TokKind::Unknown, TokKind::SplitSent, TokKind::Unknown]);
    }

    #[test]
    fn paragraph_markers() {
        let kinds: Vec<_> = RoughTokens::new("[[ Hér ]]", Options::default()).map(|t| t.kind).collect();
        assert_eq!(kinds, [TokKind::ParaBegin, TokKind::Unknown, TokKind::ParaEnd]);
        assert_eq!(originals("[[ Hér ]]"), "[[ Hér ]]");
    }

    #[test]
    fn composite_glyphs_fold() {
        assert_eq!(fold_composite_glyphs("Jo\u{0301}n o\u{0308}l"), "Jón öl");
        // an unrelated combining mark passes through
        assert_eq!(fold_composite_glyphs("n\u{0303}"), "n\u{0303}");
    }

    #[test]
    fn html_escapes() {
        assert_eq!(replace_html_escapes("&aacute;st &filig;skur"), "ást fiskur");
        // numeric entities are not expanded
        assert_eq!(replace_html_escapes("&#225;"), "&#225;");
    }

    #[test]
    fn nbsp_and_soft_hyphen() {
        assert_eq!(clean_spaces("or\u{00AD}ð\u{00A0}tvö"), "orð tvö");
    }

    #[test]
    fn whitespace_only_input_is_carried_by_a_sentinel() {
        let toks: Vec<_> = RoughTokens::new("  \n ", Options::default()).collect();
        assert_eq!(toks.len(), 1);
        assert_eq!(toks[0].kind, TokKind::SplitSent);
        assert_eq!(toks[0].original, "  \n ");
    }
}
