//! `msgpack-unpack`: decode MessagePack (stdin) to JSON (stdout).

use std::io::{self, Read, Write};
use std::process::ExitCode;

use clap::Parser;
use msgpack_cli::{init_tracing, unpack, CliError, CodecArgs};

#[derive(Debug, Parser)]
#[command(name = "msgpack-unpack", version, about = "Decode MessagePack from stdin as JSON")]
struct Cli {
    #[command(flatten)]
    codec: CodecArgs,

    /// Indent the JSON output.
    #[arg(long)]
    pretty: bool,
}

fn run(cli: &Cli) -> Result<(), CliError> {
    let mut bytes = Vec::new();
    io::stdin().read_to_end(&mut bytes)?;
    let json = unpack(&bytes, cli.codec.options(), cli.pretty)?;
    let mut stdout = io::stdout().lock();
    writeln!(stdout, "{json}")?;
    Ok(())
}

fn main() -> ExitCode {
    init_tracing();
    let cli = Cli::parse();
    match run(&cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("msgpack-unpack: {err}");
            ExitCode::FAILURE
        }
    }
}
