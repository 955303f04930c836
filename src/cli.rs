//! Command-line argument surface of the `tokenize` binary.

use std::path::PathBuf;

use clap::Parser;

use crate::tokenizer::Options;

#[derive(Debug, Parser)]
#[command(
    name = "tokenize",
    about = "Tokenize Icelandic text into sentences, CSV or JSON token streams.",
    version = env!("CARGO_PKG_VERSION")
)]
pub struct Args {
    /// Input file. Reads stdin when omitted or "-".
    pub infile: Option<PathBuf>,

    /// Output file. Writes stdout when omitted or "-".
    pub outfile: Option<PathBuf>,

    /// Write one CSV row per token.
    #[arg(long, conflicts_with = "json")]
    pub csv: bool,

    /// Write one JSON object per token, one per line.
    #[arg(long)]
    pub json: bool,

    /// Use normalized punctuation in emitted surfaces.
    #[arg(short = 'n', long)]
    pub normalize: bool,

    /// Treat every newline as a sentence boundary.
    #[arg(short = 's', long = "one-sent-per-line")]
    pub one_sent_per_line: bool,

    /// Emit original token surfaces in text output.
    #[arg(short = 'o', long)]
    pub original: bool,

    /// Normalize measurement surfaces ("200° C" becomes "200 °C").
    #[arg(short = 'm', long = "convert-measurements")]
    pub convert_measurements: bool,

    /// Merge "N prósent" into a percentage token.
    #[arg(short = 'p', long = "coalesce-percent")]
    pub coalesce_percent: bool,

    /// Keep combining accent glyphs instead of folding them.
    #[arg(short = 'g', long = "keep-composite-glyphs")]
    pub keep_composite_glyphs: bool,

    /// Expand named HTML escapes ("&aacute;" becomes "á").
    #[arg(short = 'e', long = "replace-html-escapes")]
    pub replace_html_escapes: bool,

    /// Accept English-locale numbers and rewrite them to Icelandic form.
    #[arg(short = 'c', long = "convert-numbers")]
    pub convert_numbers: bool,
}

impl Args {
    pub fn options(&self) -> Options {
        Options {
            convert_numbers: self.convert_numbers,
            convert_measurements: self.convert_measurements,
            replace_composite_glyphs: !self.keep_composite_glyphs,
            replace_html_escapes: self.replace_html_escapes,
            one_sent_per_line: self.one_sent_per_line,
            original: self.original,
            coalesce_percent: self.coalesce_percent,
            normalize: self.normalize,
        }
    }
}
