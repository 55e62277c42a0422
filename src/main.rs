use log::{error, info};
use simplelog::{ColorChoice, Config, TermLogger, TerminalMode};
use sliding_puzzle::app::PuzzleApp;
use sliding_puzzle::cli::Opt;
use std::io;
use std::process;
use structopt::StructOpt;
use structopt_flags::LogLevel;

fn main() {
    let opt: Opt = Opt::from_args();

    if let Some(shell) = opt.completions {
        Opt::clap().gen_completions_to("sliding-puzzle", shell, &mut io::stdout());
        return;
    }

    TermLogger::init(
        opt.verbose.get_level_filter(),
        Config::default(),
        TerminalMode::Mixed,
        ColorChoice::Auto,
    )
    .expect("Failed to initialize logger");

    let config = match opt.to_app_config() {
        Ok(config) => config,
        Err(e) => {
            error!("{}", e);
            process::exit(2);
        }
    };

    info!(
        "Dealing a {}x{} {} puzzle",
        config.puzzle.grid_size, config.puzzle.grid_size, config.mode
    );

    if let Err(e) = PuzzleApp::new(config).run() {
        error!("{}", e);
        process::exit(1);
    }
}
