//! easygit installer binary
//!
//! Thin wrapper around the library's install runner; the package manager's
//! postinstall hook runs it without arguments.

use std::process::ExitCode;

use easygit::install::cli::Cli;
use easygit::install::runners;

#[tokio::main]
async fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .format(|buf, record| {
            use std::io::Write;
            writeln!(buf, "[easygit-install {}] {}", record.level(), record.args())
        })
        .init();

    runners::run_install(&Cli::parse_args()).await
}
