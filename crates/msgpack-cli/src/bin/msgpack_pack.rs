//! `msgpack-pack`: encode JSON (stdin) to MessagePack (stdout).

use std::io::{self, Read, Write};
use std::process::ExitCode;

use clap::Parser;
use msgpack_cli::{init_tracing, pack, CliError, CodecArgs};

#[derive(Debug, Parser)]
#[command(name = "msgpack-pack", version, about = "Encode JSON from stdin as MessagePack")]
struct Cli {
    #[command(flatten)]
    codec: CodecArgs,
}

fn run(cli: &Cli) -> Result<(), CliError> {
    let mut json = String::new();
    io::stdin().read_to_string(&mut json)?;
    let bytes = pack(json.trim(), cli.codec.options())?;
    let mut stdout = io::stdout().lock();
    stdout.write_all(&bytes)?;
    stdout.flush()?;
    Ok(())
}

fn main() -> ExitCode {
    init_tracing();
    let cli = Cli::parse();
    match run(&cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("msgpack-pack: {err}");
            ExitCode::FAILURE
        }
    }
}
