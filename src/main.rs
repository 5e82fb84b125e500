use clap::error::ErrorKind;
use clap::{CommandFactory, Parser};
use std::path::PathBuf;
use std::process::ExitCode;

use texel_convert::{Progress, logging};

#[derive(Parser, Debug)]
#[command(name = "texel-convert", version, about)]
struct Cli {
    /// PGN file (optionally .zst) or glob pattern of PGN files
    #[arg(value_name = "INPUTPGN")]
    input: String,
    /// Output file, appended to and created when missing
    #[arg(value_name = "OUTPUTTXT")]
    output: PathBuf,
}

fn main() -> ExitCode {
    let args = match Cli::try_parse() {
        Ok(args) => args,
        Err(err) if matches!(err.kind(), ErrorKind::DisplayHelp | ErrorKind::DisplayVersion) => {
            err.exit()
        }
        Err(_) => {
            println!("{}", Cli::command().render_usage());
            return ExitCode::FAILURE;
        }
    };

    logging::init();

    let progress = Progress::new();
    match texel_convert::run(&args.input, &args.output, &progress) {
        Ok(tally) => {
            print!("{tally}");
            ExitCode::SUCCESS
        }
        Err(err) => {
            println!("{err}");
            ExitCode::FAILURE
        }
    }
}
