//! Entry point for the command-line interface.
#![forbid(unsafe_code)]

fn main() {
    if let Err(err) = earthwalker_cli::run() {
        eprintln!("earthwalker: {err}");
        std::process::exit(1);
    }
}
