//! keytone - play the synthesizer from the computer keyboard
//!
//! Run with: cargo run --bin keytone
//! Logs go to `keytone.log` in the system temp dir (level from RUST_LOG).

mod app;
mod ui;

use std::{fs::File, io::stdout};

use color_eyre::eyre::WrapErr;
use crossterm::{
    event::{KeyboardEnhancementFlags, PopKeyboardEnhancementFlags, PushKeyboardEnhancementFlags},
    execute,
    terminal::supports_keyboard_enhancement,
};

use app::App;
use keytone::{EngineConfig, Synthesizer};

fn main() -> color_eyre::Result<()> {
    color_eyre::install()?;
    init_logging()?;

    let mut synth = Synthesizer::new(EngineConfig::default());
    synth.start()?;

    // query support before ratatui takes the terminal; the query toggles raw mode
    let key_release = enable_key_release();
    log::info!("key release events: {key_release}");
    let mut terminal = ratatui::init();

    let result = App::new(synth, key_release).run(&mut terminal);

    ratatui::restore();
    if key_release {
        let _ = execute!(stdout(), PopKeyboardEnhancementFlags);
    }
    result
}

fn init_logging() -> color_eyre::Result<()> {
    let path = std::env::temp_dir().join("keytone.log");
    let file = File::create(&path)
        .wrap_err_with(|| format!("failed to create log file {}", path.display()))?;

    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .format_timestamp_millis()
        .target(env_logger::Target::Pipe(Box::new(file)))
        .init();

    log::info!("keytone starting");
    Ok(())
}

/// Ask the terminal for key release events. Without them notes fall back
/// to a fixed gate time.
fn enable_key_release() -> bool {
    if !matches!(supports_keyboard_enhancement(), Ok(true)) {
        return false;
    }
    execute!(
        stdout(),
        PushKeyboardEnhancementFlags(KeyboardEnhancementFlags::REPORT_EVENT_TYPES)
    )
    .is_ok()
}
