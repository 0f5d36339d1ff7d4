use cohql_cli::argparse::parse_args;
use cohql_cli::{runner, utils};
use std::process::ExitCode;

fn main() -> ExitCode {
    let cli = parse_args();
    utils::init_logger(cli.verbose);

    match runner::run(&cli) {
        Ok(0) => ExitCode::SUCCESS,
        Ok(failures) => {
            log::debug!("{} queries failed to translate", failures);
            ExitCode::FAILURE
        }
        Err(e) => {
            eprintln!("Error: {:#}", e);
            ExitCode::FAILURE
        }
    }
}
