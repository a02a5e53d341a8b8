//! Stick Catch entry point
//!
//! Headless driver: `stick-catch [walker|snowball] [config.json]`. Builds a
//! scenario from the default or supplied configuration, runs it to
//! completion and reports the outcome.

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    use stick_catch::journal::{Journal, LogSink};
    use stick_catch::sim::{Mode, Scenario};
    use stick_catch::SimConfig;

    env_logger::init();
    log::info!("Stick Catch starting...");

    let mut args = std::env::args().skip(1);

    let mode = match args.next() {
        Some(arg) => match Mode::from_str(&arg) {
            Some(mode) => mode,
            None => {
                log::error!("Unknown mode '{arg}', expected 'walker' or 'snowball'");
                std::process::exit(2);
            }
        },
        None => Mode::default(),
    };

    let config = match args.next() {
        Some(path) => match SimConfig::load(&path) {
            Ok(config) => config,
            Err(e) => {
                log::error!("Failed to load {path}: {e}");
                std::process::exit(1);
            }
        },
        None => SimConfig::default(),
    };

    let max_ticks = config.max_ticks;
    let mut scenario = Scenario::with_journal(config, mode, Journal::new(LogSink));
    let outcome = scenario.run(max_ticks);

    let base = scenario.body().base_position();
    println!(
        "{}: {} after {} ticks (body base at {:.1}, {:.1})",
        mode.as_str(),
        outcome.as_str(),
        scenario.ticks(),
        base.x,
        base.y
    );
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // No headless driver on the web; the library is used directly
}
