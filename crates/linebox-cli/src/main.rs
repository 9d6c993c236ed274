#![forbid(unsafe_code)]

fn main() {
    linebox_cli::logging::init();
    if let Err(error) = linebox_cli::run_from_env() {
        tracing::debug!(?error, "linebox failed");
        eprintln!("{error}");
        std::process::exit(error.exit_code());
    }
}
