//! Main entrypoint for running the rig

use std::sync::Arc;

use clap::Parser as _;
use color_eyre::eyre::{ContextCompat as _, Result};
use rand::SeedableRng as _;
use tracing_subscriber::{layer::SubscriberExt as _, util::SubscriberInitExt as _, Layer as _};

use crate::cli_args::{CliArgs, Preset};
use crate::renderer::Renderer;
use crate::shared_state::SharedState;

/// Commands to control the various tasks
#[non_exhaustive]
#[derive(Clone, Debug)]
pub(crate) enum Protocol {
    /// The entire application is exiting.
    End,
}

/// Main entrypoint
pub(crate) async fn run(state: &Arc<SharedState>) -> Result<()> {
    let cli_args = setup(state).await?;
    let config = state.config.read().await.clone();

    let mut rig_config = config.rig.clone();
    if cli_args.preset == Preset::Playground {
        rig_config.physics = gushing_rig::physics::PhysicsConfig::playground();
    }

    let rng = match cli_args.seed {
        Some(seed) => rand::rngs::StdRng::seed_from_u64(seed),
        None => rand::rngs::StdRng::from_entropy(),
    };

    let system_motion = gushing_rig::motion::SystemMotionPreference::from_env();
    let (snapshots_tx, snapshots_rx) = tokio::sync::mpsc::channel(64);
    let (controller, controller_handle) =
        gushing_rig::controller::Controller::new(&rig_config, rng, snapshots_tx)?
            .with_on_erupt(|| tracing::trace!("Gush!"))
            .with_system_motion(&system_motion)
            .spawn();

    let renderer_handle = Renderer::start(snapshots_rx);

    let auto_erupt_ms = cli_args.auto_erupt.unwrap_or(config.auto_erupt_ms);
    let auto_erupt_handle = (auto_erupt_ms > 0).then(|| {
        start_auto_erupt(
            std::time::Duration::from_millis(auto_erupt_ms),
            controller.clone(),
            state.protocol_tx.subscribe(),
        )
    });

    let listen_result = crate::commands::listen(
        &controller,
        &system_motion,
        state.protocol_tx.subscribe(),
    )
    .await;
    broadcast_protocol_end(&state.protocol_tx);

    if let Err(error) = controller.end().await {
        tracing::debug!("Controller already ended: {error:?}");
    }
    controller_handle.await?;
    renderer_handle.await??;
    if let Some(handle) = auto_erupt_handle {
        handle.await??;
    }
    listen_result?;

    tracing::trace!("Leaving the rig's main `run()` function");
    Ok(())
}

/// Keep poking the rig, like somebody who can't leave it alone.
fn start_auto_erupt(
    period: std::time::Duration,
    controller: gushing_rig::controller::ControllerHandle,
    mut protocol_rx: tokio::sync::broadcast::Receiver<Protocol>,
) -> tokio::task::JoinHandle<Result<()>> {
    tokio::spawn(async move {
        tracing::debug!("Auto-erupting every {period:?}");
        let mut interval = tokio::time::interval(period);
        interval.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);

        #[expect(
            clippy::integer_division_remainder_used,
            reason = "This is caused by the `tokio::select!`"
        )]
        loop {
            tokio::select! {
                _ = interval.tick() => {
                    let result = controller
                        .trigger(gushing_rig::input::TriggerSource::Click)
                        .await;
                    if let Err(error) = result {
                        tracing::debug!("Stopping auto-erupt: {error:?}");
                        break;
                    }
                },
                Ok(message) = protocol_rx.recv() => {
                    if matches!(message, Protocol::End) {
                        break;
                    }
                }
            }
        }

        tracing::debug!("Leaving auto-erupt loop");
        Ok(())
    })
}

/// Signal all task loops to exit.
///
/// We keep it in its own function because we need to handle the error separately. There's a
/// chance that nobody is listening, which is fine.
pub(crate) fn broadcast_protocol_end(protocol_tx: &tokio::sync::broadcast::Sender<Protocol>) {
    tracing::debug!("Broadcasting the protocol `End` message to all listeners");
    let result = protocol_tx.send(Protocol::End);
    if let Err(error) = result {
        tracing::debug!("No listeners for `End`: {error:?}");
    }
}

/// Prepare the application to start.
async fn setup(state: &Arc<SharedState>) -> Result<CliArgs> {
    let cli_args = CliArgs::parse();

    let mut main_config_file = state.main_config_file.write().await;
    (*main_config_file).clone_from(&cli_args.main_config);
    drop(main_config_file);

    let directory_result =
        crate::config::main::Config::setup_directory(cli_args.config_dir.clone(), state).await;
    if let Err(directory_error) = directory_result {
        color_eyre::eyre::bail!("Error setting up config directory: {directory_error:?}");
    }

    let config_result = crate::config::main::Config::load_config_into_shared_state(state).await;
    if let Err(config_error) = config_result {
        let path = crate::config::main::Config::main_config_path(state).await;
        color_eyre::eyre::bail!(
            "Bad config file: {config_error:?}\n\nConfig path: {}",
            path.display()
        );
    }

    setup_logging(cli_args.clone(), state).await?;

    tracing::info!("Starting the rig");
    tracing::debug!("Loaded config: {:?}", state.config.read().await);

    Ok(cli_args)
}

/// Setup logging
async fn setup_logging(cli_args: CliArgs, state: &Arc<SharedState>) -> Result<()> {
    let are_log_filters_manually_set = std::env::var("GUSHER_LOG").is_ok();
    let mut path = state.config.read().await.log_path.clone();

    if let Some(cli_override_path) = cli_args.log_path {
        path = cli_override_path;
    }

    let mut level = state.config.read().await.log_level.clone();
    if let Some(cli_override_level) = cli_args.log_level {
        level = cli_override_level;
    }
    let level_as_string = format!("{level:?}").to_lowercase();

    let is_loggable =
        !matches!(level, crate::config::main::LogLevel::Off) || are_log_filters_manually_set;

    if !is_loggable {
        return Ok(());
    }

    let directory = path.parent().context("Couldn't get log path's parent")?;
    std::fs::create_dir_all(directory)?;
    let file = std::fs::File::create(path.clone())?;

    let filters = match std::env::var("GUSHER_LOG") {
        Ok(user_filters) => tracing_subscriber::EnvFilter::builder()
            .with_default_directive("error".parse()?)
            .parse_lossy(user_filters),
        Err(_) => tracing_subscriber::EnvFilter::builder()
            .with_default_directive("off".parse()?)
            .parse_lossy("")
            .add_directive(format!("gushing_rig={level_as_string}").parse()?)
            .add_directive(format!("rig={level_as_string}").parse()?),
    };

    let logfile_layer = tracing_subscriber::fmt::layer()
        .with_writer(file)
        .with_ansi(false)
        .with_filter(filters);

    tracing_subscriber::registry().with(logfile_layer).init();

    let mut config = state.config.write().await;
    config.log_path = path;
    drop(config);

    let mut is_logging = state.is_logging.write().await;
    *is_logging = true;
    drop(is_logging);

    Ok(())
}
