use std::process::ExitCode;

use clap::Parser;

use saftpt_cli::{Args, FATAL_EXIT_CODE, run};

fn main() -> ExitCode {
    let args = Args::parse();
    saftpt_observability::init(args.log_format);

    let mut stdout = std::io::stdout().lock();
    match run(&args, &mut stdout) {
        Ok(outcome) => ExitCode::from(outcome.exit_code()),
        Err(err) => {
            tracing::warn!(error = %format!("{err:#}"), "validation aborted");
            eprintln!("error: {err:#}");
            ExitCode::from(FATAL_EXIT_CODE)
        }
    }
}
