//! The digit/particle parser: classifies each rough token in isolation
//! against an ordered pattern cascade; the first match wins. Tokens that
//! carry trailing punctuation are split, with the offset map partitioned
//! alongside.

use std::collections::VecDeque;
use std::sync::LazyLock;

use either::Either;
use fancy_regex::Regex;

use super::dates::is_valid_date;
use super::phrases::unit_exists;
use super::rough::URL;
use super::Options;
use crate::abbrev::AbbrevDict;
use crate::token::{Tok, TokKind, TokVal};

pub(crate) static TIME: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"^([01]?\d|2[0-3]):([0-5]\d)(?::([0-5]\d))?$"#).unwrap());

static DATE_ISO: LazyLock<Regex> = LazyLock::new(|| Regex::new(r#"^(\d{4})-(\d{1,2})-(\d{1,2})$"#).unwrap());
static DATE_DMY_SLASH: LazyLock<Regex> = LazyLock::new(|| Regex::new(r#"^(\d{1,2})/(\d{1,2})/(\d{4})$"#).unwrap());
static DATE_YMD_SLASH: LazyLock<Regex> = LazyLock::new(|| Regex::new(r#"^(\d{4})/(\d{1,2})/(\d{1,2})$"#).unwrap());
static DATE_DMY_DOT: LazyLock<Regex> = LazyLock::new(|| Regex::new(r#"^(\d{1,2})\.(\d{1,2})\.(\d{4})$"#).unwrap());
static DATEREL_SLASH: LazyLock<Regex> = LazyLock::new(|| Regex::new(r#"^(\d{1,2})/(\d{1,2})$"#).unwrap());
static DATEREL_DOT: LazyLock<Regex> = LazyLock::new(|| Regex::new(r#"^(\d{1,2})\.(\d{1,2})\.$"#).unwrap());

static SSN: LazyLock<Regex> = LazyLock::new(|| Regex::new(r#"^(\d{2})(\d{2})\d{2}-\d{4}$"#).unwrap());
static TELNO_DASH: LazyLock<Regex> = LazyLock::new(|| Regex::new(r#"^\d{3}-\d{4}$"#).unwrap());
static TELNO_PLAIN: LazyLock<Regex> = LazyLock::new(|| Regex::new(r#"^\d{7}$"#).unwrap());
static YEAR_RANGE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r#"^(\d{4})[-–](\d{4})$"#).unwrap());
static SERIAL: LazyLock<Regex> = LazyLock::new(|| Regex::new(r#"^\d+(?:-\d+)+$"#).unwrap());

static ORDINAL: LazyLock<Regex> = LazyLock::new(|| Regex::new(r#"^(\d+)\.$"#).unwrap());
static ROMAN_ORDINAL: LazyLock<Regex> = LazyLock::new(|| Regex::new(r#"^([IVXLCDM]+)\.$"#).unwrap());
static ORDINAL_PREFIX: LazyLock<Regex> = LazyLock::new(|| Regex::new(r#"^(\d+\.)(\p{L}.*)$"#).unwrap());

/// Icelandic convention: `.` groups thousands, `,` marks decimals.
pub(crate) static NUM_IS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"^-?(?:\d{1,3}(?:\.\d{3})+|\d+)(?:,\d+)?$"#).unwrap());
/// English convention, accepted behind `convert_numbers`.
pub(crate) static NUM_EN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"^-?(?:\d{1,3}(?:,\d{3})+|\d+)(?:\.\d+)?$"#).unwrap());

static NUM_LETTER: LazyLock<Regex> = LazyLock::new(|| Regex::new(r#"^(\d+)(\p{L})$"#).unwrap());
static NUM_SUFFIX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"^(-?(?:\d{1,3}(?:\.\d{3})+|\d+)(?:,\d+)?)(°?\p{L}[\p{L}²³]*\.?)$"#).unwrap());
static NUM_DEGREE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r#"^(\d+(?:,\d+)?)°$"#).unwrap());
static FRACTION_SLASH: LazyLock<Regex> = LazyLock::new(|| Regex::new(r#"^(\d{1,2})/(\d{1,2})$"#).unwrap());

static DOMAIN: LazyLock<Regex> = LazyLock::new(|| Regex::new(r#"^(?:[A-Za-z0-9-]+\.)+([A-Za-z]{2,})$"#).unwrap());
static EMAIL: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"^[\w.+-]+@(?:[\w-]+\.)+[A-Za-z]{2,}$"#).unwrap());
static HASHTAG: LazyLock<Regex> = LazyLock::new(|| Regex::new(r#"^#[\p{L}\p{N}_]+$"#).unwrap());
static USERNAME: LazyLock<Regex> = LazyLock::new(|| Regex::new(r#"^@[A-Za-z0-9_.]+$"#).unwrap());
static MOLECULE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r#"^(?:[A-Z][a-z]?\d*)+$"#).unwrap());

const TLDS: &[&str] = &[
    "is", "com", "net", "org", "edu", "gov", "int", "mil", "io", "co", "eu", "de", "dk", "no", "se", "fi",
    "uk", "fo", "gl", "us", "ca", "app", "dev", "info", "biz",
];

const ELEMENTS: &[&str] = &[
    "H", "He", "Li", "Be", "B", "C", "N", "O", "F", "Ne", "Na", "Mg", "Al", "Si", "P", "S", "Cl", "Ar", "K",
    "Ca", "Sc", "Ti", "V", "Cr", "Mn", "Fe", "Co", "Ni", "Cu", "Zn", "Ga", "Ge", "As", "Se", "Br", "Kr",
    "Rb", "Sr", "Y", "Zr", "Nb", "Mo", "Tc", "Ru", "Rh", "Pd", "Ag", "Cd", "In", "Sn", "Sb", "Te", "I",
    "Xe", "Cs", "Ba", "La", "Ce", "Pr", "Nd", "Pm", "Sm", "Eu", "Gd", "Tb", "Dy", "Ho", "Er", "Tm", "Yb",
    "Lu", "Hf", "Ta", "W", "Re", "Os", "Ir", "Pt", "Au", "Hg", "Tl", "Pb", "Bi", "Po", "At", "Rn", "Fr",
    "Ra", "Ac", "Th", "Pa", "U", "Np", "Pu", "Am", "Cm", "Bk", "Cf", "Es", "Fm", "Md", "No", "Lr",
];

const FRACTIONS: &[(char, f64)] = &[
    ('¼', 0.25),
    ('½', 0.5),
    ('¾', 0.75),
    ('⅓', 1.0 / 3.0),
    ('⅔', 2.0 / 3.0),
    ('⅕', 0.2),
    ('⅖', 0.4),
    ('⅗', 0.6),
    ('⅘', 0.8),
    ('⅙', 1.0 / 6.0),
    ('⅚', 5.0 / 6.0),
    ('⅛', 0.125),
    ('⅜', 0.375),
    ('⅝', 0.625),
    ('⅞', 0.875),
];

/// Years plausibly written as bare integers: settlement of Iceland onward.
const YEAR_RANGE_MIN: i32 = 872;
const YEAR_RANGE_MAX: i32 = 2100;

pub(crate) struct ParseParticles<I> {
    inner: I,
    queue: VecDeque<Tok>,
    opts: Options,
    prev_year: bool,
    prev_arid: bool,
}

impl<I: Iterator<Item = Tok>> ParseParticles<I> {
    pub(crate) fn new(inner: I, opts: Options) -> Self {
        ParseParticles { inner, queue: VecDeque::new(), opts, prev_year: false, prev_arid: false }
    }
}

impl<I: Iterator<Item = Tok>> Iterator for ParseParticles<I> {
    type Item = Tok;

    fn next(&mut self) -> Option<Tok> {
        let tok = loop {
            if let Some(tok) = self.queue.pop_front() {
                break tok;
            }
            let raw = self.inner.next()?;
            if raw.is_sentinel() {
                self.prev_year = false;
                self.prev_arid = false;
                return Some(raw);
            }
            if raw.kind == TokKind::Punctuation {
                break raw;
            }
            match classify(raw, &self.opts, self.prev_year, self.prev_arid) {
                Either::Left(tok) => break tok,
                Either::Right(parts) => self.queue.extend(parts),
            }
        };
        self.prev_year = tok.kind == TokKind::Year;
        self.prev_arid = tok.kind == TokKind::Word && tok.txt.to_lowercase() == "árið";
        Some(tok)
    }
}

fn classify(tok: Tok, opts: &Options, prev_year: bool, prev_arid: bool) -> Either<Tok, Vec<Tok>> {
    let mut out = Vec::new();
    classify_into(tok, opts, prev_year, prev_arid, &mut out);
    if out.len() == 1 {
        Either::Left(out.pop().unwrap())
    } else {
        Either::Right(out)
    }
}

fn classify_into(tok: Tok, opts: &Options, prev_year: bool, prev_arid: bool, out: &mut Vec<Tok>) {
    let surface = tok.txt.clone();
    let chars = surface.chars().count();
    let dict = AbbrevDict::global();

    macro_rules! caps {
        ($re:expr) => {
            $re.captures(&surface).ok().flatten()
        };
    }
    macro_rules! int {
        ($caps:expr, $i:expr) => {
            $caps.get($i).unwrap().as_str().parse().unwrap()
        };
    }

    // a minus attached to a year after another year is a range, not a sign
    if prev_year && surface.starts_with('-') && chars >= 4 {
        if let Ok(y) = surface[1..].parse::<i32>() {
            if (YEAR_RANGE_MIN..=YEAR_RANGE_MAX).contains(&y) {
                let (dash, digits) = tok.split_at(1);
                out.push(dash.with_kind(TokKind::Punctuation));
                out.push(digits.with_kind(TokKind::Year).with_val(TokVal::Year(y)));
                return;
            }
        }
    }

    if let Some(c) = caps!(TIME) {
        let (h, m) = (int!(c, 1), int!(c, 2));
        let s = c.get(3).map_or(0, |g| g.as_str().parse().unwrap());
        out.push(tok.with_kind(TokKind::Time).with_val(TokVal::Time(h, m, s)));
        return;
    }

    for (re, yi, mi, di) in
        [(&DATE_ISO, 1, 2, 3), (&DATE_DMY_SLASH, 3, 2, 1), (&DATE_YMD_SLASH, 1, 2, 3), (&DATE_DMY_DOT, 3, 2, 1)]
    {
        if let Some(c) = caps!(re) {
            let (y, m, d): (i32, u32, u32) = (int!(c, yi), int!(c, mi), int!(c, di));
            if is_valid_date(y, m, d) {
                out.push(tok.with_kind(TokKind::DateAbs).with_val(TokVal::Date(y, m, d)));
                return;
            }
            break;
        }
    }

    for re in [&DATEREL_SLASH, &DATEREL_DOT] {
        if let Some(c) = caps!(re) {
            let (d, m): (u32, u32) = (int!(c, 1), int!(c, 2));
            if is_valid_date(0, m, d) {
                out.push(tok.with_kind(TokKind::DateRel).with_val(TokVal::Date(0, m, d)));
                return;
            }
        }
    }

    if let Some(c) = caps!(SSN) {
        let (d, m): (u32, u32) = (int!(c, 1), int!(c, 2));
        if ((1..=31).contains(&d) || (41..=71).contains(&d)) && (1..=12).contains(&m) {
            let val = TokVal::Ssn(surface.clone());
            out.push(tok.with_kind(TokKind::Ssn).with_val(val));
            return;
        }
    }

    if TELNO_DASH.is_match(&surface).unwrap_or(false) {
        let val = TokVal::Telno { number: surface.clone(), cc: "354".into() };
        out.push(tok.with_kind(TokKind::Telno).with_val(val));
        return;
    }
    if TELNO_PLAIN.is_match(&surface).unwrap_or(false) {
        let number = format!("{}-{}", &surface[..3], &surface[3..]);
        let val = TokVal::Telno { number, cc: "354".into() };
        out.push(tok.with_kind(TokKind::Telno).with_val(val));
        return;
    }

    if let Some(c) = caps!(YEAR_RANGE) {
        let (y1, y2): (i32, i32) = (int!(c, 1), int!(c, 2));
        if (YEAR_RANGE_MIN..=YEAR_RANGE_MAX).contains(&y1) && y2 > y1 && y2 <= YEAR_RANGE_MAX {
            let mut tok = tok.with_kind(TokKind::Year).with_val(TokVal::Year(y1));
            if opts.normalize {
                tok.set_txt(&surface.replace('-', "–"));
            }
            out.push(tok);
            return;
        }
    }

    // short ranges like "5-6" read as plain text, not serial numbers
    if SERIAL.is_match(&surface).unwrap_or(false)
        && (surface.matches('-').count() >= 2 || surface.split('-').any(|group| group.len() >= 3))
    {
        out.push(tok.with_kind(TokKind::SerialNumber));
        return;
    }

    if let Some(c) = caps!(ORDINAL) {
        let n: i64 = int!(c, 1);
        out.push(tok.with_kind(TokKind::Ordinal).with_val(TokVal::Ordinal(n)));
        return;
    }

    // an ordinal glued to the following word: "3.janúar"
    if let Some(c) = caps!(ORDINAL_PREFIX) {
        let head_len = c.get(1).unwrap().as_str().chars().count();
        let (head, tail) = tok.split_at(head_len);
        let n: i64 = c.get(1).unwrap().as_str().trim_end_matches('.').parse().unwrap();
        out.push(head.with_kind(TokKind::Ordinal).with_val(TokVal::Ordinal(n)));
        classify_into(tail, opts, false, false, out);
        return;
    }

    if let Some(c) = caps!(ROMAN_ORDINAL) {
        let numeral = c.get(1).unwrap().as_str();
        // a single capital is far more likely an initial than a numeral
        if numeral.len() >= 2 {
            if let Some(n) = roman_value(numeral) {
                out.push(tok.with_kind(TokKind::Ordinal).with_val(TokVal::Ordinal(n)));
                return;
            }
        }
    }

    // percent and per-mille literals
    if let Some(stem) = surface.strip_suffix(['%', '‰']) {
        if let Some(value) = parse_number(stem, opts) {
            let mut tok = tok;
            if opts.convert_numbers && english_locale(stem) {
                tok.set_txt(&swapped_separators(&surface));
            }
            out.push(tok.with_kind(TokKind::Percent).with_val(TokVal::Percent(value)));
            return;
        }
    }

    // a number glued to a measurement unit: "64kWst", "5l"
    if let Some(c) = caps!(NUM_SUFFIX) {
        let num = c.get(1).unwrap().as_str();
        let suffix = c.get(2).unwrap().as_str();
        if unit_exists(suffix) {
            let head_len = num.chars().count();
            let (head, tail) = tok.split_at(head_len);
            classify_into(head, opts, false, false, out);
            out.push(tail.with_kind(TokKind::Word));
            return;
        }
    }
    if let Some(c) = caps!(NUM_DEGREE) {
        let head_len = c.get(1).unwrap().as_str().chars().count();
        let (head, tail) = tok.split_at(head_len);
        classify_into(head, opts, false, false, out);
        out.push(tail.with_kind(TokKind::Punctuation));
        return;
    }

    if let Some(c) = caps!(NUM_LETTER) {
        let n: i64 = int!(c, 1);
        let letter = c.get(2).unwrap().as_str().chars().next().unwrap();
        out.push(tok.with_kind(TokKind::NumWLetter).with_val(TokVal::NumLetter { value: n, letter }));
        return;
    }

    // bare integers in the plausible-year range
    if chars == 4 && surface.chars().all(|c| c.is_ascii_digit()) {
        let y: i32 = surface.parse().unwrap();
        if (YEAR_RANGE_MIN..=YEAR_RANGE_MAX).contains(&y) {
            out.push(tok.with_kind(TokKind::Year).with_val(TokVal::Year(y)));
            return;
        }
    }
    if chars == 3 && prev_arid && surface.chars().all(|c| c.is_ascii_digit()) {
        let y: i32 = surface.parse().unwrap();
        out.push(tok.with_kind(TokKind::Year).with_val(TokVal::Year(y)));
        return;
    }

    if let Some(value) = parse_number(&surface, opts) {
        let mut tok = tok;
        if opts.convert_numbers && english_locale(&surface) {
            tok.set_txt(&swapped_separators(&surface));
        }
        out.push(tok.with_kind(TokKind::Number).with_val(TokVal::Number(value)));
        return;
    }

    if chars == 1 {
        if let Some(&(_, value)) = FRACTIONS.iter().find(|&&(f, _)| surface.starts_with(f)) {
            out.push(tok.with_kind(TokKind::Number).with_val(TokVal::Number(value)));
            return;
        }
    }

    if let Some(c) = caps!(FRACTION_SLASH) {
        let (n, d): (f64, f64) = (int!(c, 1), int!(c, 2));
        if d != 0.0 {
            out.push(tok.with_kind(TokKind::Number).with_val(TokVal::Number(n / d)));
            return;
        }
    }

    if URL.is_match(&surface).unwrap_or(false) {
        out.push(tok.with_kind(TokKind::Url));
        return;
    }

    if let Some(c) = caps!(DOMAIN) {
        let tld = c.get(1).unwrap().as_str().to_lowercase();
        if TLDS.contains(&tld.as_str()) {
            out.push(tok.with_kind(TokKind::Domain));
            return;
        }
    }

    if EMAIL.is_match(&surface).unwrap_or(false) {
        out.push(tok.with_kind(TokKind::Email));
        return;
    }

    if HASHTAG.is_match(&surface).unwrap_or(false) {
        out.push(tok.with_kind(TokKind::Hashtag));
        return;
    }

    if USERNAME.is_match(&surface).unwrap_or(false) {
        let handle = surface[1..].to_owned();
        out.push(tok.with_kind(TokKind::Username).with_val(TokVal::Username(handle)));
        return;
    }

    if MOLECULE.is_match(&surface).unwrap_or(false) && is_molecule(&surface) {
        out.push(tok.with_kind(TokKind::Molecule));
        return;
    }

    // known abbreviations keep their periods; the refiner attaches meanings
    if dict.contains(&surface) || dict.correction(&surface).is_some() {
        out.push(tok.with_kind(TokKind::Word));
        return;
    }

    // a single capital with a period is almost always a person's initial;
    // keeping the period attached biases the segmenter to under-split
    if chars == 2 && surface.ends_with('.') && surface.chars().next().is_some_and(char::is_uppercase) {
        out.push(tok.with_kind(TokKind::Word));
        return;
    }

    // peel trailing periods (three or more form an ellipsis)
    if surface.ends_with('.') && chars > 1 {
        let dots = surface.chars().rev().take_while(|&c| c == '.').count();
        if dots < chars {
            let keep = if dots >= 3 { chars - 3 } else { chars - 1 };
            let (head, tail) = tok.split_at(keep);
            classify_into(head, opts, prev_year, prev_arid, out);
            out.push(tail.with_kind(TokKind::Punctuation));
            return;
        }
        // nothing but dots
        out.push(tok.with_kind(TokKind::Punctuation));
        return;
    }

    if surface.chars().any(char::is_alphanumeric) {
        out.push(tok.with_kind(TokKind::Word));
    } else if chars == 1 {
        out.push(tok.with_kind(TokKind::Punctuation));
    } else {
        out.push(tok.with_kind(TokKind::Unknown));
    }
}

/// Parse a numeric literal per the active locale, falling back to the other
/// convention so that the pipeline stays total. An ambiguous single-group
/// string takes the interpretation of the selected locale.
pub(crate) fn parse_number(s: &str, opts: &Options) -> Option<f64> {
    let is = || {
        if NUM_IS.is_match(s).unwrap_or(false) {
            s.replace('.', "").replace(',', ".").parse().ok()
        } else {
            None
        }
    };
    let en = || {
        if NUM_EN.is_match(s).unwrap_or(false) {
            s.replace(',', "").parse().ok()
        } else {
            None
        }
    };
    if opts.convert_numbers {
        en().or_else(is)
    } else {
        is().or_else(en)
    }
}

/// True when the literal reads as an English-locale numeric that would look
/// different in the Icelandic convention.
fn english_locale(s: &str) -> bool {
    NUM_EN.is_match(s).unwrap_or(false) && s.contains(['.', ','])
}

fn swapped_separators(s: &str) -> String {
    s.chars()
        .map(|c| match c {
            '.' => ',',
            ',' => '.',
            c => c,
        })
        .collect()
}

fn roman_value(s: &str) -> Option<i64> {
    let digit = |c| match c {
        'I' => 1,
        'V' => 5,
        'X' => 10,
        'L' => 50,
        'C' => 100,
        'D' => 500,
        'M' => 1000,
        _ => 0,
    };
    let mut total = 0i64;
    let values: Vec<i64> = s.chars().map(digit).collect();
    for (i, &v) in values.iter().enumerate() {
        if values.get(i + 1).is_some_and(|&next| next > v) {
            total -= v;
        } else {
            total += v;
        }
    }
    (1..=3000).contains(&total).then_some(total)
}

fn is_molecule(s: &str) -> bool {
    let cs: Vec<char> = s.chars().collect();
    let mut i = 0;
    let mut has_digit = false;
    while i < cs.len() {
        if !cs[i].is_ascii_uppercase() {
            return false;
        }
        let mut sym = cs[i].to_string();
        i += 1;
        if i < cs.len() && cs[i].is_ascii_lowercase() {
            sym.push(cs[i]);
            i += 1;
        }
        if !ELEMENTS.contains(&sym.as_str()) {
            return false;
        }
        while i < cs.len() && cs[i].is_ascii_digit() {
            has_digit = true;
            i += 1;
        }
    }
    has_digit
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tokenizer::rough::RoughTokens;

    fn parse(text: &str) -> Vec<Tok> {
        parse_with(text, Options::default())
    }

    fn parse_with(text: &str, opts: Options) -> Vec<Tok> {
        ParseParticles::new(RoughTokens::new(text, opts), opts).collect()
    }

    fn kinds(text: &str) -> Vec<TokKind> {
        parse(text).into_iter().map(|t| t.kind).collect()
    }

    #[test]
    fn clock_times() {
        let toks = parse("15:30 9:05:59");
        assert_eq!(toks[0].val, Some(TokVal::Time(15, 30, 0)));
        assert_eq!(toks[1].val, Some(TokVal::Time(9, 5, 59)));
    }

    #[test]
    fn invalid_time_passes_through() {
        assert_eq!(kinds("25:61"), [TokKind::Word]);
    }

    #[test]
    fn absolute_dates() {
        let toks = parse("2024-03-14 14/3/2024 14.3.2024");
        for tok in &toks {
            assert_eq!(tok.kind, TokKind::DateAbs);
            assert_eq!(tok.val, Some(TokVal::Date(2024, 3, 14)));
        }
    }

    #[test]
    fn invalid_date_is_not_coalesced() {
        let toks = parse("31/02/2024");
        assert_ne!(toks[0].kind, TokKind::DateAbs);
    }

    #[test]
    fn relative_dates() {
        let toks = parse("14/3 14.3.");
        assert_eq!(toks[0].val, Some(TokVal::Date(0, 3, 14)));
        assert_eq!(toks[1].val, Some(TokVal::Date(0, 3, 14)));
    }

    #[test]
    fn ordinals() {
        let toks = parse("3. XVII.");
        assert_eq!(toks[0].val, Some(TokVal::Ordinal(3)));
        assert_eq!(toks[1].val, Some(TokVal::Ordinal(17)));
    }

    #[test]
    fn glued_ordinal_splits() {
        let toks = parse("3.janúar");
        assert_eq!(toks[0].val, Some(TokVal::Ordinal(3)));
        assert_eq!(toks[1].txt, "janúar");
        assert_eq!(toks[1].kind, TokKind::Word);
    }

    #[test]
    fn icelandic_numbers() {
        let toks = parse("1.234,56 12,5 -17");
        assert_eq!(toks[0].val, Some(TokVal::Number(1234.56)));
        assert_eq!(toks[1].val, Some(TokVal::Number(12.5)));
        assert_eq!(toks[2].val, Some(TokVal::Number(-17.0)));
    }

    #[test]
    fn english_numbers_convert() {
        let opts = Options { convert_numbers: true, ..Options::default() };
        let toks = parse_with("1,234.56", opts);
        assert_eq!(toks[0].txt, "1.234,56");
        assert_eq!(toks[0].val, Some(TokVal::Number(1234.56)));
        assert_eq!(toks[0].original, "1,234.56");
    }

    #[test]
    fn years_and_ranges() {
        let toks = parse("1914 1914-1918");
        assert_eq!(toks[0].val, Some(TokVal::Year(1914)));
        assert_eq!(toks[1].kind, TokKind::Year);
        assert_eq!(toks[1].val, Some(TokVal::Year(1914)));
        assert_eq!(toks[1].txt, "1914-1918");
    }

    #[test]
    fn year_range_normalizes_to_en_dash() {
        let opts = Options { normalize: true, ..Options::default() };
        let toks = parse_with("1914-1918", opts);
        assert_eq!(toks[0].txt, "1914–1918");
    }

    #[test]
    fn year_then_minus_year_is_a_range_not_a_negative() {
        let toks = parse("1914 -1918");
        let kinds: Vec<_> = toks.iter().map(|t| t.kind).collect();
        assert_eq!(kinds, [TokKind::Year, TokKind::Punctuation, TokKind::Year]);
        assert_eq!(toks[2].val, Some(TokVal::Year(1918)));
    }

    #[test]
    fn minus_number_without_year_context() {
        let toks = parse("hiti -1918");
        assert_eq!(toks[1].val, Some(TokVal::Number(-1918.0)));
    }

    #[test]
    fn percent_literals() {
        let toks = parse("72% 5‰");
        assert_eq!(toks[0].val, Some(TokVal::Percent(72.0)));
        assert_eq!(toks[1].val, Some(TokVal::Percent(5.0)));
    }

    #[test]
    fn telephone_numbers() {
        let toks = parse("581-2345 5812345");
        for tok in &toks {
            assert_eq!(tok.kind, TokKind::Telno);
            assert_eq!(
                tok.val,
                Some(TokVal::Telno { number: "581-2345".into(), cc: "354".into() })
            );
        }
    }

    #[test]
    fn social_security_numbers() {
        assert_eq!(kinds("120174-3399"), [TokKind::Ssn]);
        // day out of range: a serial number instead
        assert_eq!(kinds("320174-3399"), [TokKind::SerialNumber]);
    }

    #[test]
    fn number_with_letter() {
        let toks = parse("10b");
        assert_eq!(toks[0].val, Some(TokVal::NumLetter { value: 10, letter: 'b' }));
    }

    #[test]
    fn glued_unit_splits() {
        let toks = parse("64kWst");
        assert_eq!(toks[0].val, Some(TokVal::Number(64.0)));
        assert_eq!(toks[1].txt, "kWst");
        assert_eq!(toks[1].kind, TokKind::Word);
    }

    #[test]
    fn web_particles() {
        assert_eq!(
            kinds("https://mbl.is/frett mbl.is jon@mbl.is #veður @jon"),
            [TokKind::Url, TokKind::Domain, TokKind::Email, TokKind::Hashtag, TokKind::Username]
        );
    }

    #[test]
    fn molecules() {
        assert_eq!(kinds("H2SO4 CO2"), [TokKind::Molecule, TokKind::Molecule]);
        // no digit, or no such element: plain words
        assert_eq!(kinds("CO Xy3"), [TokKind::Word, TokKind::Word]);
    }

    #[test]
    fn vulgar_fractions() {
        let toks = parse("½ ⅞");
        assert_eq!(toks[0].val, Some(TokVal::Number(0.5)));
        assert_eq!(toks[1].val, Some(TokVal::Number(0.875)));
    }

    #[test]
    fn slash_fraction_only_when_not_a_date() {
        // a valid day/month reading wins over the fraction reading
        assert_eq!(kinds("3/4"), [TokKind::DateRel]);
        let toks = parse("31/2");
        assert_eq!(toks[0].val, Some(TokVal::Number(15.5)));
    }

    #[test]
    fn trailing_dot_splits_off() {
        let toks = parse("rafbíl.");
        assert_eq!(toks[0].txt, "rafbíl");
        assert_eq!(toks[0].kind, TokKind::Word);
        assert_eq!(toks[1].txt, ".");
        assert_eq!(toks[1].kind, TokKind::Punctuation);
    }

    #[test]
    fn abbreviation_keeps_its_dots() {
        let toks = parse("o.s.frv. sl.");
        assert_eq!(toks[0].txt, "o.s.frv.");
        assert_eq!(toks[1].txt, "sl.");
    }

    #[test]
    fn ellipsis_is_one_token() {
        let toks = parse("Nei...");
        assert_eq!(toks[0].txt, "Nei");
        assert_eq!(toks[1].txt, "...");
        assert_eq!(toks[1].kind, TokKind::Punctuation);
    }

    #[test]
    fn kludgy_ordinals_pass_through_as_words() {
        assert_eq!(kinds("1sti 3ja"), [TokKind::Word, TokKind::Word]);
    }

    #[test]
    fn year_context_for_three_digits() {
        let toks = parse("árið 874");
        assert_eq!(toks[1].val, Some(TokVal::Year(874)));
        let toks = parse("blaðsíða 874");
        assert_eq!(toks[1].val, Some(TokVal::Number(874.0)));
    }
}
