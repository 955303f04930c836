use std::io::{self, Read, Write};
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use clap::Parser;

use icetok::cli::Args;
use icetok::output::{write_csv, write_json};
use icetok::{split_into_sentences, tokenize};

#[derive(Copy, Clone)]
enum ExitStatus {
    Success,
    Failure,
}

impl From<ExitStatus> for ExitCode {
    fn from(status: ExitStatus) -> Self {
        match status {
            ExitStatus::Success => Self::from(0),
            ExitStatus::Failure => Self::from(1),
        }
    }
}

fn is_stdio(path: Option<&PathBuf>) -> bool {
    path.is_none_or(|p| p.as_path() == Path::new("-"))
}

fn read_input(path: Option<&PathBuf>) -> Result<String, ExitStatus> {
    if is_stdio(path) {
        let mut text = String::new();
        io::stdin().read_to_string(&mut text).map_err(|err| {
            eprintln!("Failed to read stdin: {err}");
            ExitStatus::Failure
        })?;
        return Ok(text);
    }
    let path = path.unwrap();
    std::fs::read_to_string(path).map_err(|err| {
        eprintln!("Failed to read file {}: {err}", path.display());
        ExitStatus::Failure
    })
}

fn open_output(path: Option<&PathBuf>) -> Result<Box<dyn Write>, ExitStatus> {
    if is_stdio(path) {
        return Ok(Box::new(io::stdout().lock()));
    }
    let path = path.unwrap();
    let file = std::fs::File::create(path).map_err(|err| {
        eprintln!("Failed to open file {}: {err}", path.display());
        ExitStatus::Failure
    })?;
    Ok(Box::new(io::BufWriter::new(file)))
}

fn run() -> Result<ExitStatus, ExitStatus> {
    let args = Args::parse();
    let opts = args.options();

    let text = read_input(args.infile.as_ref())?;
    let mut out = open_output(args.outfile.as_ref())?;

    let written = if args.csv {
        write_csv(&mut out, tokenize(&text, &opts))
    } else if args.json {
        write_json(&mut out, tokenize(&text, &opts))
    } else {
        split_into_sentences(&text, &opts)
            .into_iter()
            .try_for_each(|sentence| writeln!(out, "{sentence}"))
    };
    written.and_then(|()| out.flush()).map_err(|err| {
        eprintln!("Failed to write output: {err}");
        ExitStatus::Failure
    })?;

    Ok(ExitStatus::Success)
}

fn main() -> ExitCode {
    run().unwrap_or_else(Into::into).into()
}
