#![warn(clippy::pedantic)]
#![allow(clippy::missing_errors_doc)]

mod cli;
mod config;
mod logging;
mod output;

fn main() {
    if let Err(e) = cli::run() {
        eprintln!("error: {e:#}");
        std::process::exit(1);
    }
}
