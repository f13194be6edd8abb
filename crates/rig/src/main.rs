//! Just `main()`. Keep as small as possible.

pub mod cli_args;
pub mod commands;
/// All the user-configurable settings.
pub mod config {
    pub mod main;
}
pub mod renderer;
pub mod run;
pub mod shared_state;

use color_eyre::eyre::Result;

#[expect(
    clippy::print_stderr,
    reason = "It's our central place for communicating with the user on CLI. STDOUT is for renders."
)]
#[tokio::main(flavor = "multi_thread")]
async fn main() -> Result<()> {
    color_eyre::install()?;
    let state_arc = shared_state::SharedState::init();
    let result = run::run(&std::sync::Arc::clone(&state_arc)).await;

    let logpath = state_arc.config.read().await.log_path.clone();
    let is_logging = *state_arc.is_logging.read().await;
    tracing::debug!("Rig is exiting");

    match result {
        Ok(()) => {
            if is_logging {
                eprintln!("Logs saved to {}", logpath.display());
            }
        }
        Err(error) => {
            tracing::error!("{error:?}");
            eprintln!("Error: {error:?}");
            if is_logging {
                eprintln!("See {} for more details", logpath.display());
            }
            #[expect(clippy::exit, reason = "We want a failing exit code")]
            std::process::exit(1);
        }
    }

    Ok(())
}
