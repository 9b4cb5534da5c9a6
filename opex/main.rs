use anyhow::Result;
use clap::Parser;
use opex_config::{APP_NAME, APP_VERSION, Config, Persistable};
use std::thread::sleep;
use std::time::Duration;
use tokio::runtime::Builder;
use tracing::{error, info};

use crate::core::{App, ExecutionFlow};

pub mod cli;
pub mod core;

fn main() -> Result<()> {
    let args = cli::Args::parse();

    let _logging_guard = opex_common::logging::initialize(APP_NAME, None)?;
    info!("{} v{} started", APP_NAME, APP_VERSION);

    if let Err(error) = run_application(&args) {
        error!("{} v{} terminated with an error: {}", APP_NAME, APP_VERSION, error);
        Err(error)
    } else {
        info!("{} v{} stopped", APP_NAME, APP_VERSION);
        Ok(())
    }
}

fn run_application(args: &cli::Args) -> Result<()> {
    let rt = Builder::new_multi_thread().enable_all().build()?;

    let config_path = args.config.clone().unwrap_or_else(Config::default_path);
    let config = args.apply(rt.block_on(Config::load_or_create_from(&config_path))?);
    info!(
        "Reading usage data from {} every {} seconds",
        config.data_url,
        config.refresh_interval().as_secs()
    );

    let mut app = App::new(rt.handle().clone(), args.clone(), config, config_path)?;

    if args.once {
        let state = rt.block_on(app.run_once());
        println!("{}", crate::core::to_json(state)?);
        return Ok(());
    }

    app.start()?;
    let result = application_loop(&mut app);
    if result.is_err() {
        app.cancel();
    } else {
        app.stop();
    }

    result
}

fn application_loop(app: &mut App) -> Result<()> {
    const TICK_DURATION: Duration = Duration::from_millis(250);

    loop {
        if app.process_events()? == ExecutionFlow::Stop {
            break;
        }

        sleep(TICK_DURATION);
    }

    Ok(())
}
