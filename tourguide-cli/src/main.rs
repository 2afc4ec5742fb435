//! Entry point for the `tourguide` command-line interface.
#![forbid(unsafe_code)]

fn main() {
    if let Err(err) = tourguide_cli::run() {
        eprintln!("tourguide: {err}");
        std::process::exit(1);
    }
}
