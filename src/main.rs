use clap::Parser;
use color_eyre::Result;
use offerdash::error_display::user_message_from_source;
use offerdash::{report, source, App, AppConfig, AppEvent, Args, ConfigManager, OpenOptions, Sheet};
use ratatui::DefaultTerminal;
use std::path::Path;
use std::sync::mpsc::channel;
use std::time::Duration;

fn render(terminal: &mut DefaultTerminal, app: &mut App) -> Result<()> {
    terminal.draw(|frame| frame.render_widget(app, frame.area()))?;
    Ok(())
}

fn run(mut terminal: DefaultTerminal, path: &Path, args: &Args, config: AppConfig) -> Result<()> {
    let poll_interval = Duration::from_millis(config.display.event_poll_interval_ms);
    let opts = OpenOptions::from_args_and_config(args, &config);
    let (tx, rx) = channel::<AppEvent>();
    let mut app = App::new(config);
    if args.debug {
        app.enable_debug();
    }
    render(&mut terminal, &mut app)?;
    tx.send(AppEvent::Open(path.to_path_buf(), opts))?;

    loop {
        if crossterm::event::poll(poll_interval)? {
            match crossterm::event::read()? {
                crossterm::event::Event::Key(key) => tx.send(AppEvent::Key(key))?,
                crossterm::event::Event::Resize(cols, rows) => {
                    tx.send(AppEvent::Resize(cols, rows))?
                }
                _ => {}
            }
        }

        let updated = match rx.recv_timeout(Duration::from_millis(0)) {
            Ok(event) => {
                match event {
                    AppEvent::Exit => break,
                    event => {
                        if let Some(event) = app.event(&event) {
                            tx.send(event)?;
                        }
                    }
                }
                true
            }
            Err(std::sync::mpsc::RecvTimeoutError::Timeout) => false,
            Err(std::sync::mpsc::RecvTimeoutError::Disconnected) => break,
        };

        if updated {
            render(&mut terminal, &mut app)?;
        }
    }
    Ok(())
}

/// Non-interactive dashboard for `--print`. Load failures are reported, not propagated.
fn print_report(path: &Path, args: &Args, config: &AppConfig) -> Result<()> {
    let opts = OpenOptions::from_args_and_config(args, config);
    let raw = match source::load(path, &opts) {
        Ok(raw) => raw,
        Err(e) => {
            eprintln!("Error: {}", user_message_from_source(&e));
            std::process::exit(1);
        }
    };
    let sheet = Sheet::new(raw, config.fields.field_map());
    let state = report::state_from_args(
        &sheet,
        &args.filters,
        args.search.as_deref(),
        args.brief.as_deref(),
    )?;
    print!("{}", report::render(&sheet, &state));
    Ok(())
}

fn handle_early_exit_flags(args: &Args) -> Result<Option<()>> {
    if args.generate_config {
        match ConfigManager::new(offerdash::APP_NAME) {
            Ok(manager) => match manager.write_default_config(args.force) {
                Ok(path) => {
                    println!("Configuration written to {}", path.display());
                    return Ok(Some(()));
                }
                Err(e) => {
                    eprintln!("Error writing config: {}", e);
                    std::process::exit(1);
                }
            },
            Err(e) => {
                eprintln!("Error initializing config manager: {}", e);
                std::process::exit(1);
            }
        }
    }

    Ok(None)
}

fn main() -> Result<()> {
    let args = Args::parse();

    if let Some(()) = handle_early_exit_flags(&args)? {
        return Ok(());
    }

    color_eyre::install()?;
    let config = match AppConfig::load(offerdash::APP_NAME) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Warning: {}. Using default configuration.", e);
            AppConfig::default()
        }
    };

    let Some(path) = args.path.clone() else {
        eprintln!("Error: a path to an offers sheet is required");
        std::process::exit(2);
    };

    if args.print {
        return print_report(&path, &args, &config);
    }

    let terminal = ratatui::init();
    let result = run(terminal, &path, &args, config);
    ratatui::restore();
    if let Err(e) = result {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
    Ok(())
}
