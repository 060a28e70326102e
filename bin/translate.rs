use hackvm::{error::ParseError, source::SourceUnit, translator::Translator};

use std::ffi::OsStr;
use std::path::{Path, PathBuf};

use clap::{App, Arg, ArgMatches};
use slog::{o, Drain, Logger};
use slog_term::{FullFormat, TermDecorator};

#[derive(Debug)]
enum Error {
    Parse(String, ParseError),
    IO(std::io::Error),
}

impl From<std::io::Error> for Error {
    fn from(e: std::io::Error) -> Error {
        Error::IO(e)
    }
}

fn parse_arguments() -> ArgMatches<'static> {
    App::new("hackvm-translate")
        .version(env!("CARGO_PKG_VERSION"))
        .author("Mitja Karhusaari <mitja@karhusaari.me>")
        .about("Utility for translating Hack VM programs into Hack assembly")
        .arg(
            Arg::with_name("source")
                .help("A .vm file, or a directory containing .vm files")
                .value_name("SOURCE")
                .required(true)
                .index(1),
        )
        .arg(
            Arg::with_name("output")
                .help("Path of the .asm file to write")
                .short("o")
                .long("output")
                .value_name("OUTPUT")
                .takes_value(true),
        )
        .arg(
            Arg::with_name("verbose")
                .help("Log every translated command to stderr")
                .short("v")
                .long("verbose"),
        )
        .get_matches()
}

fn main() {
    let args = parse_arguments();

    let source = Path::new(args.value_of("source").unwrap());
    let output = args.value_of("output").map(PathBuf::from);
    let verbose = args.is_present("verbose");

    match run(source, output, verbose) {
        Ok(()) => (),
        Err(Error::IO(io)) => {
            eprintln!("IO error: {}", io);
            std::process::exit(1);
        }
        Err(Error::Parse(unit, err)) => {
            eprintln!("Parse error in {}: {}", unit, err);
            std::process::exit(1);
        }
    }
}

fn run(source: &Path, output: Option<PathBuf>, verbose: bool) -> Result<(), Error> {
    let inputs = discover(source)?;
    let output = output.unwrap_or_else(|| default_output(source));

    let mut units = Vec::with_capacity(inputs.len());

    for path in inputs {
        let name = unit_name(&path);
        let text = std::fs::read_to_string(&path)?;

        let unit = SourceUnit::parse(name, &text)
            .map_err(|err| Error::Parse(path.display().to_string(), err))?;

        units.push(unit);
    }

    let mut translator = match verbose {
        true => Translator::with_logger(terminal_logger()),
        false => Translator::new(),
    };

    let translation = translator.translate(&units);

    std::fs::write(&output, format!("{}\n", translation))?;

    Ok(())
}

/// Collects the source units to translate.
///
/// A directory contributes every `.vm` file directly inside it, sorted by
/// file name so the output program is the same on every run.
fn discover(source: &Path) -> Result<Vec<PathBuf>, Error> {
    if !source.is_dir() {
        return Ok(vec![source.to_path_buf()]);
    }

    let mut paths: Vec<PathBuf> = std::fs::read_dir(source)?
        .collect::<Result<Vec<_>, _>>()?
        .into_iter()
        .map(|entry| entry.path())
        .filter(|path| path.extension() == Some(OsStr::new("vm")))
        .collect();

    paths.sort();

    Ok(paths)
}

fn unit_name(path: &Path) -> String {
    path.file_stem()
        .and_then(OsStr::to_str)
        .unwrap_or("Main")
        .to_string()
}

fn default_output(source: &Path) -> PathBuf {
    if source.is_dir() {
        let name = unit_name(source);
        return source.join(format!("{}.asm", name));
    }

    source.with_extension("asm")
}

fn terminal_logger() -> Logger {
    let decorator = TermDecorator::new().stderr().build();
    let drain = FullFormat::new(decorator).build().fuse();
    let drain = slog_async::Async::new(drain).build().fuse();

    Logger::root(drain, o!())
}
