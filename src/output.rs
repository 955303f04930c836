//! CSV and JSON token writers for the command line.
//!
//! CSV: one `kind,txt,value,original,offsets` row per token, tuple values
//! joined with `|`, offsets joined with `-`, and a `0,"","","",""` row
//! between sentences. Expansion lists join meanings with `;` and their six
//! fields with `:`.
//!
//! JSON: one object per line, `{"k":…,"t":…,"v":…,"o":…,"s":…}`; sentence
//! markers emit `{"k":"BEGIN SENT"}` and `{"k":"END SENT"}`.

use std::io::{self, Write};

use itertools::Itertools;
use serde_json::json;

use crate::token::{Tok, TokKind, TokVal};

fn csv_quote(s: &str) -> String {
    format!("\"{}\"", s.replace('"', "\"\""))
}

fn csv_value(val: &TokVal) -> String {
    match val {
        TokVal::Time(h, m, s) => format!("{h}|{m}|{s}"),
        TokVal::Date(y, m, d) => format!("{y}|{m}|{d}"),
        TokVal::Timestamp(y, mo, d, h, mi, s) => format!("{y}|{mo}|{d}|{h}|{mi}|{s}"),
        TokVal::Number(v) | TokVal::Percent(v) => format!("{v}"),
        TokVal::Ordinal(n) => format!("{n}"),
        TokVal::Year(y) => format!("{y}"),
        TokVal::Telno { number, cc } => format!("{number}|{cc}"),
        TokVal::Amount { value, iso } => format!("{value}|{iso}"),
        TokVal::Measurement { unit, value } => format!("{unit}|{value}"),
        TokVal::NumLetter { value, letter } => format!("{value}|{letter}"),
        TokVal::Punct { space, symbol } => format!("{}|{symbol}", *space as u8),
        TokVal::Word(meanings) => meanings
            .iter()
            .map(|m| {
                format!("{}:{}:{}:{}:{}:{}", m.wordform, m.variant, m.pos, m.category, m.stem, m.inflection)
            })
            .join(";"),
        TokVal::Ssn(s) | TokVal::Username(s) => s.clone(),
    }
}

pub fn write_csv<W: Write>(out: &mut W, tokens: impl Iterator<Item = Tok>) -> io::Result<()> {
    for tok in tokens {
        if tok.is_sentinel() {
            if tok.kind == TokKind::SentEnd {
                writeln!(out, "0,\"\",\"\",\"\",\"\"")?;
            }
            continue;
        }
        let value = tok.val.as_ref().map(csv_value).unwrap_or_default();
        writeln!(
            out,
            "{},{},{},{},{}",
            tok.kind.code(),
            csv_quote(&tok.txt),
            csv_quote(&value),
            csv_quote(&tok.original),
            tok.offsets.iter().join("-"),
        )?;
    }
    Ok(())
}

fn json_value(val: &TokVal) -> serde_json::Value {
    match val {
        TokVal::Time(h, m, s) => json!([h, m, s]),
        TokVal::Date(y, m, d) => json!([y, m, d]),
        TokVal::Timestamp(y, mo, d, h, mi, s) => json!([y, mo, d, h, mi, s]),
        TokVal::Number(v) | TokVal::Percent(v) => json!(v),
        TokVal::Ordinal(n) => json!(n),
        TokVal::Year(y) => json!(y),
        TokVal::Telno { number, cc } => json!([number, cc]),
        TokVal::Amount { value, iso } => json!([value, iso]),
        TokVal::Measurement { unit, value } => json!([unit, value]),
        TokVal::NumLetter { value, letter } => json!([value, letter.to_string()]),
        TokVal::Punct { space, symbol } => json!([*space as u8, symbol]),
        TokVal::Word(meanings) => json!(meanings),
        TokVal::Ssn(s) | TokVal::Username(s) => json!(s),
    }
}

pub fn write_json<W: Write>(out: &mut W, tokens: impl Iterator<Item = Tok>) -> io::Result<()> {
    for tok in tokens {
        match tok.kind {
            TokKind::SentBegin => writeln!(out, "{}", json!({ "k": "BEGIN SENT" }))?,
            TokKind::SentEnd => writeln!(out, "{}", json!({ "k": "END SENT" }))?,
            kind if kind.is_sentinel() => {}
            kind => {
                let mut obj = json!({
                    "k": kind.name(),
                    "t": tok.txt,
                    "o": tok.original,
                    "s": tok.offsets,
                });
                if let Some(val) = &tok.val {
                    obj["v"] = json_value(val);
                }
                writeln!(out, "{obj}")?;
            }
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tokenizer::{tokenize, Options};

    fn csv(text: &str) -> Vec<String> {
        let mut buf = Vec::new();
        write_csv(&mut buf, tokenize(text, &Options::default())).unwrap();
        String::from_utf8(buf).unwrap().lines().map(str::to_owned).collect()
    }

    fn json_lines(text: &str) -> Vec<serde_json::Value> {
        let mut buf = Vec::new();
        write_json(&mut buf, tokenize(text, &Options::default())).unwrap();
        String::from_utf8(buf).unwrap().lines().map(|l| serde_json::from_str(l).unwrap()).collect()
    }

    #[test]
    fn csv_rows() {
        let rows = csv("Kom hún?");
        assert_eq!(rows[0], "6,\"Kom\",\"\",\"Kom\",0-1-2");
        assert_eq!(rows[1], "6,\"hún\",\"\",\" hún\",1-2-3");
        assert_eq!(rows[2], "1,\"?\",\"3|?\",\"?\",0");
        assert_eq!(rows[3], "0,\"\",\"\",\"\",\"\"");
    }

    #[test]
    fn csv_escapes_quotes() {
        let rows = csv("\"a\"");
        assert!(rows[0].starts_with("1,\"\"\"\""));
    }

    #[test]
    fn json_markers_and_fields() {
        let lines = json_lines("Kom hún?");
        assert_eq!(lines[0]["k"], "BEGIN SENT");
        assert_eq!(lines[1]["k"], "WORD");
        assert_eq!(lines[1]["t"], "Kom");
        assert_eq!(lines[1]["s"], serde_json::json!([0, 1, 2]));
        assert_eq!(lines.last().unwrap()["k"], "END SENT");
    }

    #[test]
    fn json_value_shapes() {
        let lines = json_lines("kl. 15:30");
        let time = &lines[1];
        assert_eq!(time["k"], "TIME");
        assert_eq!(time["v"], serde_json::json!([15, 30, 0]));
    }
}
