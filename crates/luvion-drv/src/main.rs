use clap::Parser;
use luvion_drv::{run, Cli};

fn main() {
    let cli = Cli::parse();
    if let Err(e) = run(&cli) {
        eprintln!("error: {:#}", e);
        std::process::exit(1);
    }
}
