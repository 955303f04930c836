//! End-to-end behavior over full pipeline runs.

use icetok::{tokenize, Options, Tok, TokKind, TokVal};

fn deep(text: &str) -> Vec<Tok> {
    tokenize(text, &Options::default()).collect()
}

fn deep_with(text: &str, opts: Options) -> Vec<Tok> {
    tokenize(text, &opts).collect()
}

fn content(tokens: &[Tok]) -> Vec<&Tok> {
    tokens.iter().filter(|t| !t.is_sentinel()).collect()
}

#[test]
fn electric_car_purchase() {
    let toks = deep("3.janúar sl. keypti   ég 64kWst rafbíl. Hann kostaði € 30.000.");

    let kinds: Vec<TokKind> = toks.iter().map(|t| t.kind).collect();
    assert_eq!(
        kinds,
        [
            TokKind::SentBegin,
            TokKind::DateRel,
            TokKind::Word,
            TokKind::Word,
            TokKind::Word,
            TokKind::Measurement,
            TokKind::Word,
            TokKind::Punctuation,
            TokKind::SentEnd,
            TokKind::SentBegin,
            TokKind::Word,
            TokKind::Word,
            TokKind::Amount,
            TokKind::Punctuation,
            TokKind::SentEnd,
            TokKind::EndSentinel,
        ]
    );

    assert_eq!(toks[1].txt, "3. janúar");
    assert_eq!(toks[1].val, Some(TokVal::Date(0, 1, 3)));

    assert_eq!(toks[2].txt, "sl.");
    match &toks[2].val {
        Some(TokVal::Word(meanings)) => assert_eq!(meanings[0].wordform, "síðastliðinn"),
        other => panic!("expected meanings on sl., got {other:?}"),
    }

    assert_eq!(toks[5].txt, "64kWst");
    assert_eq!(toks[5].val, Some(TokVal::Measurement { unit: "J", value: 230_400_000.0 }));

    assert_eq!(toks[12].txt, "€30.000");
    assert_eq!(toks[12].val, Some(TokVal::Amount { value: 30000.0, iso: "EUR" }));

    match &toks[7].val {
        Some(TokVal::Punct { space, symbol }) => {
            assert_eq!(*space as u8, 3);
            assert_eq!(symbol, ".");
        }
        other => panic!("expected punctuation value, got {other:?}"),
    }
}

#[test]
fn year_range_normalizes_to_en_dash() {
    let opts = Options { normalize: true, ..Options::default() };
    let toks = deep_with("1914-1918", opts);
    let content = content(&toks);
    assert_eq!(content.len(), 1);
    assert_eq!(content[0].kind, TokKind::Year);
    assert_eq!(content[0].txt, "1914–1918");
}

#[test]
fn spaced_year_range_is_two_years() {
    let toks = deep("1914 -1918");
    let years: Vec<&Tok> = toks.iter().filter(|t| t.kind == TokKind::Year).collect();
    assert_eq!(years.len(), 2);
    assert_eq!(years[0].val, Some(TokVal::Year(1914)));
    assert_eq!(years[1].val, Some(TokVal::Year(1918)));
    assert!(!toks.iter().any(|t| matches!(t.val, Some(TokVal::Number(n)) if n < 0.0)));
}

#[test]
fn composite_word_is_one_token() {
    let toks = deep("fjölskyldu- og húsdýragarðurinn");
    let content = content(&toks);
    assert_eq!(content.len(), 1);
    assert_eq!(content[0].kind, TokKind::Word);
    assert_eq!(content[0].txt, "fjölskyldu- og húsdýragarðurinn");
}

#[test]
fn sentence_final_abbreviation_keeps_its_period() {
    let toks = deep("Þar voru hundar, kettir o.s.frv. Næsta setning kom strax.");
    let osfrv = toks.iter().find(|t| t.txt == "o.s.frv.").expect("abbreviation token");
    assert_eq!(osfrv.kind, TokKind::Word);
    assert!(matches!(osfrv.val, Some(TokVal::Word(_))));

    // no separate period token, and the sentence closes right after
    let at = toks.iter().position(|t| t.txt == "o.s.frv.").unwrap();
    assert_eq!(toks[at + 1].kind, TokKind::SentEnd);
}

#[test]
fn degree_measurement_normalizes() {
    let opts = Options { convert_measurements: true, ..Options::default() };
    let toks = deep_with("200° C", opts);
    let content = content(&toks);
    assert_eq!(content.len(), 1);
    assert_eq!(content[0].txt, "200 °C");
    match content[0].val {
        Some(TokVal::Measurement { unit, value }) => {
            assert_eq!(unit, "K");
            assert!((value - 473.15).abs() < 1e-9);
        }
        ref other => panic!("expected a measurement, got {other:?}"),
    }
}

#[test]
fn english_locale_amount_converts() {
    let opts = Options { convert_numbers: true, ..Options::default() };
    let toks = deep_with("$1,234.56", opts);
    let content = content(&toks);
    assert_eq!(content.len(), 1);
    assert_eq!(content[0].kind, TokKind::Amount);
    assert_eq!(content[0].txt, "$1.234,56");
    assert_eq!(content[0].val, Some(TokVal::Amount { value: 1234.56, iso: "USD" }));
}

#[test]
fn empty_line_forces_sentence_end() {
    let toks = deep("fyrri hluti án punkts\n\nseinni hluti");
    let kinds: Vec<TokKind> = toks.iter().filter(|t| t.is_sentinel()).map(|t| t.kind).collect();
    assert_eq!(
        kinds,
        [TokKind::SentBegin, TokKind::SentEnd, TokKind::SentBegin, TokKind::SentEnd, TokKind::EndSentinel]
    );
}

#[test]
fn telephone_and_ssn_in_context() {
    let toks = deep("Síminn er 581-2345 og kennitalan er 120174-3399.");
    assert!(toks.iter().any(|t| t.kind == TokKind::Telno));
    assert!(toks.iter().any(|t| t.kind == TokKind::Ssn));
}

#[test]
fn web_addresses_survive_the_pipeline() {
    let toks = deep("Sjá https://vedur.is/spa og skrifaðu á sala@daemi.is eða @vedurstofan.");
    assert!(toks.iter().any(|t| t.kind == TokKind::Url));
    assert!(toks.iter().any(|t| t.kind == TokKind::Email));
    assert!(toks.iter().any(|t| t.kind == TokKind::Username));
}

#[test]
fn shallow_output_with_original_surfaces() {
    let opts = Options { original: true, ..Options::default() };
    let sentences = icetok::split_into_sentences("Hann  keypti   64kWst rafbíl.", &opts);
    assert_eq!(sentences, ["Hann keypti 64kWst rafbíl ."]);
}
