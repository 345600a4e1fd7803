//! Entry point for the `stayplan` command-line interface.
#![forbid(unsafe_code)]

fn main() {
    env_logger::init();
    if let Err(err) = stayplan_cli::run() {
        eprintln!("stayplan: {err}");
        std::process::exit(1);
    }
}
