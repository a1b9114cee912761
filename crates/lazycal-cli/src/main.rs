use anyhow::{Context, Result};
use lazycal_config::Config;
use lazycal_engine::{DecodeError, Decoder, Token};
use std::{
    env,
    fs::File,
    io::{self, BufRead, BufReader, Write},
    path::PathBuf,
    process,
};

/// `kind` must be a top-level block kind such as `VCALENDAR` or `VCARD`.
const USAGE: &str = "[path|-] [kind]";

/// Writes a record and, indented below it, every block nested inside it.
fn print_outline(out: &mut impl Write, token: &Token) -> io::Result<()> {
    let mut pending = vec![(0usize, token)];
    while let Some((depth, tok)) = pending.pop() {
        writeln!(out, "{:indent$}{tok}", "", indent = depth * 2)?;
        for child in tok.children.iter().rev().filter(|c| c.is_block()) {
            pending.push((depth + 1, child));
        }
    }
    Ok(())
}

/// Context attached to a decode failure while listing `kind` records.
fn decode_context(kind: &str, source: &str, err: &DecodeError) -> String {
    match err {
        DecodeError::UnbalancedEnd { .. } => {
            format!("Failed to decode {source}: is {kind} nested inside another block?")
        }
        _ => format!("Failed to decode {source}"),
    }
}

fn open_input(path: Option<&PathBuf>) -> Result<Box<dyn BufRead>> {
    match path {
        Some(path) if path.as_os_str() != "-" => {
            let file = File::open(path)
                .with_context(|| format!("Failed to open '{}'", path.display()))?;
            Ok(Box::new(BufReader::new(file)))
        }
        _ => Ok(Box::new(io::stdin().lock())),
    }
}

fn main() -> Result<()> {
    env_logger::Builder::from_default_env()
        .filter_level(log::LevelFilter::Info)
        .init();

    let program = env::args().next().unwrap_or_else(|| "lazycal".to_string());
    let args: Vec<String> = env::args().skip(1).collect();

    if args.len() > 2 {
        eprintln!("Usage: {program} {USAGE}");
        process::exit(1);
    }

    let config = match Config::load() {
        Ok(Some(config)) => config,
        Ok(None) => Config::default(),
        Err(e) => {
            eprintln!("Error: Failed to load config file: {e}");
            eprintln!("Usage: {program} {USAGE}");
            process::exit(1);
        }
    };

    let input_path = args.first().map(PathBuf::from).or(config.input_path);
    let kind = args.get(1).cloned().unwrap_or(config.default_kind);

    let source = input_path
        .as_ref()
        .map_or_else(|| "<stdin>".to_string(), |p| p.display().to_string());
    log::info!("Decoding {kind} records from {source}");

    let mut decoder = Decoder::from_buf_read(open_input(input_path.as_ref())?);
    let stdout = io::stdout();
    let mut out = stdout.lock();
    let mut count = 0usize;

    for record in decoder.records(&kind) {
        let record = record.map_err(|e| {
            let context = decode_context(&kind, &source, &e);
            anyhow::Error::new(e).context(context)
        })?;
        print_outline(&mut out, &record)?;
        count += 1;
    }

    log::info!("Decoded {count} {kind} record(s)");
    Ok(())
}
