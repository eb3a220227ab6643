mod demo_config;

use std::time::Duration;

use tickwatch::stopwatch::Stopwatch;

use crate::demo_config::DemoConfig;

fn main() {
    env_logger::builder()
        .filter_level(log::LevelFilter::Info)
        .parse_default_env()
        .init();

    let config = match std::env::args().nth(1) {
        Some(path) => DemoConfig::load(&path)
            .inspect_err(|e| log::error!("loading config from {path}, msg = {e}")),
        None => Ok(DemoConfig::default()),
    };
    let Ok(config) = config else {
        std::process::exit(1);
    };

    let Ok(rt) = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
        .inspect_err(|e| log::error!("Could not create tokio multi thread runtime, msg = {e}"))
    else {
        std::process::exit(1);
    };

    if rt.block_on(run(config)).is_err() {
        std::process::exit(1);
    }
}

async fn run(config: DemoConfig) -> Result<(), tickwatch::tick_scheduler::SchedulerError> {
    let stopwatch = Stopwatch::with_tokio(&config.stopwatch)
        .inspect_err(|e| log::error!("creating stopwatch, msg = {e}"))?
        .with_listener(|stopwatch| log::info!("{}", stopwatch.format(true)));

    if let Some(countdown_from) = config.countdown_from {
        stopwatch.set_elapsed(
            countdown_from.hours,
            countdown_from.minutes,
            countdown_from.seconds,
        );
    }

    log::info!("running stopwatch for {} ms: {stopwatch:?}", config.run_for_millis);

    stopwatch.start();
    tokio::time::sleep(Duration::from_millis(config.run_for_millis)).await;
    let elapsed = stopwatch.stop();

    log::info!("final elapsed time: {elapsed:#}");

    Ok(())
}
