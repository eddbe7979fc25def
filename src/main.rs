//! Application entry point

use std::io;

mod config;
mod live_watcher;
mod metrics;
mod prodrome;
mod quick_actions;
mod store;
mod theme;
mod ui;
mod week;

/// Restore terminal to normal mode.
fn cleanup_terminal() {
    use std::io::Write;
    let mut stdout = std::io::stdout();
    let _ = crossterm::execute!(
        stdout,
        crossterm::event::DisableMouseCapture,
        crossterm::terminal::LeaveAlternateScreen,
        crossterm::cursor::Show
    );
    let _ = crossterm::terminal::disable_raw_mode();
    let _ = stdout.flush();
}

/// Install panic hook to restore terminal before printing error.
fn setup_panic_hook() {
    let original_hook = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |panic_info| {
        cleanup_terminal();
        eprintln!("Application panicked!");
        if let Some(location) = panic_info.location() {
            eprintln!("Location: {}", location);
        }
        log::error!("Panic: {}", panic_info);
        original_hook(panic_info);
    }));
}

/// Send log output to a file; stderr would draw over the alternate screen.
fn init_logging(config: &config::Config) {
    let file = config
        .log_path
        .parent()
        .map(std::fs::create_dir_all)
        .transpose()
        .and_then(|_| {
            std::fs::OpenOptions::new()
                .create(true)
                .append(true)
                .open(&config.log_path)
        });
    match file {
        Ok(file) => {
            let _ = env_logger::Builder::new()
                .parse_filters(&config.log_filter)
                .target(env_logger::Target::Pipe(Box::new(file)))
                .try_init();
        }
        Err(e) => eprintln!(
            "Logging disabled, cannot open {}: {}",
            config.log_path.display(),
            e
        ),
    }
}

/// Drain all pending input events until silence.
fn drain_input_events_until_silence(silence_duration: std::time::Duration) {
    use crossterm::event::{poll, read};

    for _ in 0..3 {
        let mut events_drained = 0;
        while poll(silence_duration).unwrap_or(false) {
            let _ = read();
            events_drained += 1;
        }
        if events_drained == 0 {
            break;
        }
    }
}

/// Flush OS-level terminal input buffer.
#[cfg(unix)]
fn flush_stdin_buffer() {
    use std::os::unix::io::AsRawFd;
    unsafe {
        libc::tcflush(std::io::stdin().as_raw_fd(), libc::TCIFLUSH);
    }
}

#[cfg(not(unix))]
fn flush_stdin_buffer() {}

fn main() -> io::Result<()> {
    let config = config::Config::from_env();
    init_logging(&config);
    log::info!("Starting with data source {:?}", config.source);

    setup_panic_hook();

    crossterm::execute!(
        std::io::stdout(),
        crossterm::terminal::EnterAlternateScreen,
        crossterm::event::EnableMouseCapture
    )?;
    crossterm::terminal::enable_raw_mode()?;

    let backend = ratatui::backend::CrosstermBackend::new(std::io::stdout());
    let mut terminal = ratatui::Terminal::new(backend)?;

    let mut app = ui::App::new(config);
    let result = app.run(&mut terminal);

    // Terminal cleanup sequence
    cleanup_terminal();
    drain_input_events_until_silence(std::time::Duration::from_millis(100));
    flush_stdin_buffer();

    if app.logged_out() {
        println!("Logged out.");
    }
    result
}
