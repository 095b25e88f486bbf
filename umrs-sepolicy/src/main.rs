//! `pp2cil`: the thin CLI wrapper around [`umrs_sepolicy::walker::translate_package`]
//! (§6). Argument parsing, source-buffering, and output-file cleanup live
//! here; everything past "I have a `DecodedPackage`" lives in the library.

use std::fs::File;
use std::io::{self, Read, Seek, SeekFrom, Write};
use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;

use umrs_sepolicy::decoder::{PolicyDecoder, PolicySource, StaticCapabilityTable, UnimplementedDecoder};
use umrs_sepolicy::emit::Emitter;
use umrs_sepolicy::walker::translate_package;

const INITIAL_SLURP_CAPACITY: usize = 128 * 1024;

#[derive(Parser)]
#[command(name = "pp2cil")]
#[command(about = "Translates a decoded SELinux policy package into the target prefix-form policy language")]
struct Cli {
    /// Input policy package path, or `-`/absent for standard input.
    input: Option<String>,
    /// Output path, or `-`/absent for standard output.
    output: Option<String>,
}

fn main() -> ExitCode {
    // Rust's runtime already installs SIG_IGN for SIGPIPE before `main`
    // runs, so a closed downstream pipe surfaces as an `io::Error` from the
    // emitter's write rather than killing the process — §6's requirement
    // holds without this binary doing anything further.
    env_logger::Builder::from_default_env()
        .format_timestamp(None)
        .init();

    let cli = Cli::parse();
    match run(&cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            log::error!("{err}");
            ExitCode::FAILURE
        }
    }
}

fn run(cli: &Cli) -> Result<(), umrs_sepolicy::TranslateError> {
    let source = open_source(cli.input.as_deref())?;
    let package = UnimplementedDecoder::decode(source)?;

    let output_path = cli.output.as_deref().filter(|p| *p != "-").map(PathBuf::from);
    let result = translate_to(&package, output_path.as_deref());

    if result.is_err() {
        if let Some(path) = &output_path {
            let _ = std::fs::remove_file(path);
        }
    }

    result
}

/// Resolves the input argument to a [`PolicySource`]: a seekable file
/// handle when a real path is given, otherwise the standard input stream
/// slurped into a growable buffer (§6: 128 KiB, doubling on fill).
fn open_source(input: Option<&str>) -> Result<PolicySource, umrs_sepolicy::TranslateError> {
    match input {
        None | Some("-") => Ok(PolicySource::Buffer(slurp(io::stdin().lock())?)),
        Some(path) => {
            let mut file = File::open(path)?;
            if file.seek(SeekFrom::Current(0)).is_ok() {
                Ok(PolicySource::File(file))
            } else {
                Ok(PolicySource::Buffer(slurp(file)?))
            }
        }
    }
}

fn slurp(mut source: impl Read) -> io::Result<Vec<u8>> {
    let mut buf = Vec::with_capacity(INITIAL_SLURP_CAPACITY);
    let mut chunk_size = INITIAL_SLURP_CAPACITY;
    let mut chunk = vec![0u8; chunk_size];

    loop {
        let n = source.read(&mut chunk)?;
        if n == 0 {
            break;
        }
        buf.extend_from_slice(&chunk[..n]);
        if n == chunk_size {
            chunk_size *= 2;
            chunk.resize(chunk_size, 0);
        }
    }

    Ok(buf)
}

fn translate_to(
    package: &umrs_sepolicy::decoder::DecodedPackage,
    output_path: Option<&std::path::Path>,
) -> Result<(), umrs_sepolicy::TranslateError> {
    let capabilities = StaticCapabilityTable;

    match output_path {
        Some(path) => {
            let file = File::create(path)?;
            let mut emitter = Emitter::new(io::BufWriter::new(file));
            translate_package(&mut emitter, package, &capabilities)?;
            emitter.into_inner().flush()?;
        }
        None => {
            let stdout = io::stdout();
            let mut emitter = Emitter::new(io::BufWriter::new(stdout.lock()));
            translate_package(&mut emitter, package, &capabilities)?;
            emitter.into_inner().flush()?;
        }
    }

    Ok(())
}
