//! A tokenizer and sentence segmenter for Icelandic text.
//!
//! Input text runs through a cascade of lazy stages: rough
//! whitespace/punctuation splitting, particle classification (numbers,
//! dates, ordinals, web addresses, …), abbreviation and punctuation
//! refinement, phrase coalescing (measurements, amounts, percentages),
//! date/time recognition, and sentence segmentation. Every token keeps its
//! original source slice and a char-offset map from the normalized surface
//! back into it, so the input text can always be reconstructed from the
//! stream.
//!
//! ```rust
//! use icetok::{split_into_sentences, Options};
//!
//! let sentences = split_into_sentences("Ég kom kl. 15:30. Hún var farin.", &Options::default());
//! assert_eq!(sentences, ["Ég kom kl. 15:30 .", "Hún var farin ."]);
//! ```

pub mod abbrev;
pub mod cli;
pub mod output;
pub mod segmenter;
pub mod token;
pub mod tokenizer;

pub use abbrev::{AbbrevDict, AbbrevError, Meaning};
pub use segmenter::{mark_paragraphs, split_into_sentences, Sentences};
pub use token::{correct_spaces, detokenize, Tok, TokKind, TokVal, WsClass};
pub use tokenizer::{tokenize, tokenize_chunks, Options};

/// Can be used in benchmarks.
#[doc(hidden)]
pub fn init() {
    use std::ops::Deref;

    let _ = tokenizer::rough::URL.deref();
    let _ = tokenizer::particles::TIME.deref();
    let _ = tokenizer::particles::NUM_IS.deref();
    let _ = tokenizer::particles::NUM_EN.deref();
    let _ = abbrev::AbbrevDict::global();

    // one tiny run compiles the remaining pattern tables
    let _ = tokenize("Allt í lagi.", &Options::default()).count();
}
