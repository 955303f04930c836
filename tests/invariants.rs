//! Stream-level invariants that must hold for arbitrary input.

use icetok::{correct_spaces, detokenize, tokenize, Options, Tok, TokKind};

const SAMPLE: &str = include_str!("sample.txt");

fn deep(text: &str) -> Vec<Tok> {
    tokenize(text, &Options::default()).collect()
}

#[test]
fn originals_concatenate_to_the_input() {
    for text in [
        SAMPLE,
        "Hann kom.  Hún fór.",
        " leading and trailing \t whitespace ",
        "ein lína\n\n\nmargar auðar línur\n\n",
        "€ 30.000 og 64kWst, o.s.frv. Já.",
        "(svigar [og] „gæsalappir“)!",
    ] {
        let joined: String = deep(text).iter().map(|t| t.original.as_str()).collect();
        assert_eq!(joined, text, "original slices must reproduce the input");
    }
}

#[test]
fn offset_maps_are_well_formed() {
    for tok in deep(SAMPLE) {
        assert_eq!(
            tok.offsets.len(),
            tok.txt.chars().count(),
            "one offset per txt char: {tok:?}"
        );
        let original_len = tok.original.chars().count() as u32;
        let mut prev = 0u32;
        for &o in &tok.offsets {
            assert!(o < original_len, "offset within original: {tok:?}");
            assert!(o >= prev, "offsets non-decreasing: {tok:?}");
            prev = o;
        }
    }
}

#[test]
fn sentence_markers_are_balanced() {
    let mut open = false;
    let mut para_open = false;
    for tok in deep(SAMPLE) {
        match tok.kind {
            TokKind::SentBegin => {
                assert!(!open, "S_BEGIN while a sentence is open");
                open = true;
            }
            TokKind::SentEnd => {
                assert!(open, "S_END without a matching S_BEGIN");
                open = false;
            }
            TokKind::ParaBegin => {
                assert!(!para_open);
                para_open = true;
            }
            TokKind::ParaEnd => {
                assert!(para_open);
                para_open = false;
            }
            _ => {}
        }
    }
    assert!(!open, "every sentence must be closed");
}

#[test]
fn sentinels_carry_no_surface() {
    for tok in deep(SAMPLE) {
        if matches!(tok.kind, TokKind::SentBegin | TokKind::SentEnd | TokKind::EndSentinel) {
            assert!(tok.txt.is_empty());
            assert!(tok.original.is_empty());
            assert!(tok.val.is_none());
        }
    }
}

#[test]
fn round_trip_matches_correct_spaces() {
    for text in ["Þetta  er   setning .", "Hann kom ( án tafar ) !", "Verðið er 30.000 kr ."] {
        let tokens = deep(text);
        assert_eq!(detokenize(&tokens, false), correct_spaces(text));
    }
}

#[test]
fn correct_spaces_fixes_degraded_spacing() {
    assert_eq!(correct_spaces("Þetta  er  setning ."), "Þetta er setning.");
    assert_eq!(correct_spaces("Hann spurði : „ hvers vegna ? “"), "Hann spurði: „hvers vegna?“");
    assert_eq!(correct_spaces("sjá ( bls. 7 ) hér"), "sjá (bls. 7) hér");
}

#[test]
fn correct_spaces_is_idempotent() {
    let mut inputs: Vec<String> = SAMPLE.lines().map(str::to_owned).collect();
    inputs.push("Þetta  er  setning .".into());
    inputs.push("„ gæsalappir “ , sagði hann .".into());
    for text in inputs {
        let once = correct_spaces(&text);
        assert_eq!(correct_spaces(&once), once, "correct_spaces must be idempotent on {text:?}");
    }
}

#[test]
fn tokenization_is_deterministic() {
    let first = deep(SAMPLE);
    let second = deep(SAMPLE);
    assert_eq!(first, second);
}

#[test]
fn the_pipeline_is_total() {
    // garbage in, tokens out; nothing panics and nothing is lost
    for text in [
        "",
        "   ",
        "\n\n\n",
        "???!!!...",
        "31/02 25:99 osfrv.",
        "@@@ ### $$$",
        "a\u{0301}\u{0308}b\u{200B}c",
    ] {
        let _ = deep(text);
    }
}
