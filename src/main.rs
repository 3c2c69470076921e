//! Cine-Rate - terminal movie discovery
//!
//! Browse TMDB listings, search by title or genre, rate movies and keep a
//! wishlist. Ratings and the wishlist live in a local JSON file.
//!
//! # Usage
//!
//! ```bash
//! # Launch interactive TUI
//! cinerate
//!
//! # CLI mode (for automation)
//! cinerate search "horror"
//! cinerate rate 157336 9
//! cinerate wishlist --json
//! ```

use std::io::{stdout, Stdout};
use std::time::{Duration, Instant};

use anyhow::Result;
use clap::Parser;
use crossterm::{
    event::{
        self, DisableMouseCapture, EnableMouseCapture, Event, KeyEventKind, MouseButton,
        MouseEventKind,
    },
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, layout::Rect, Terminal};
use tokio::sync::mpsc::{self, UnboundedSender};

use cinerate::action::Action;
use cinerate::api::TmdbClient;
use cinerate::app::App;
use cinerate::cli::{Cli, Command, ExitCode, Output};
use cinerate::commands::{self, Context};
use cinerate::config::Config;
use cinerate::effects::{self, Completion, Effect};
use cinerate::{logging, ui};

/// Terminal type alias for convenience
type Tui = Terminal<CrosstermBackend<Stdout>>;

#[tokio::main]
async fn main() -> std::process::ExitCode {
    let cli = Cli::parse();

    let config = match &cli.config {
        Some(path) => Config::load_from(path),
        None => Config::load(),
    };
    let config = match config {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Error: {}", e);
            return ExitCode::InvalidArgs.into();
        }
    };

    if cli.is_cli_mode() {
        // CLI mode: execute command and exit
        if let Err(e) = logging::init_stderr(cli.verbose, cli.quiet) {
            eprintln!("Warning: logging disabled: {}", e);
        }
        run_cli(cli, config).await.into()
    } else {
        // TUI mode: launch interactive interface
        if let Err(e) = logging::init_file(cli.verbose, &config.log_dir()) {
            eprintln!("Warning: logging disabled: {}", e);
        }
        match run_tui(config, cli.ephemeral).await {
            Ok(()) => ExitCode::Success.into(),
            Err(e) => {
                eprintln!("Error: {:#}", e);
                ExitCode::Error.into()
            }
        }
    }
}

/// Run CLI command and return exit code
async fn run_cli(cli: Cli, config: Config) -> ExitCode {
    let output = Output::new(&cli);

    let command = match cli.command {
        // Works before any API key exists
        Some(Command::SetKey(cmd)) => {
            let path = cli.config.or_else(Config::path);
            return commands::set_key_cmd(cmd, config, path.as_deref(), &output);
        }
        Some(command) => command,
        // Handled by the is_cli_mode check
        None => return ExitCode::Success,
    };

    let mut ctx = match Context::from_config(&config, cli.ephemeral) {
        Ok(ctx) => ctx,
        Err(e) => return output.error(e.to_string(), ExitCode::InvalidArgs),
    };

    match command {
        Command::Popular(cmd) => commands::popular_cmd(cmd, &ctx, &output).await,

        Command::Trending(cmd) => commands::trending_cmd(cmd, &ctx, &output).await,

        Command::TopRated(cmd) => commands::top_rated_cmd(cmd, &ctx, &output).await,

        Command::Search(cmd) => commands::search_cmd(cmd, &ctx, &output).await,

        Command::Genres => commands::genres_cmd(&ctx, &output).await,

        Command::Info(cmd) => commands::info_cmd(cmd, &ctx, &output).await,

        Command::Similar(cmd) => commands::similar_cmd(cmd, &ctx, &output).await,

        Command::Recommendations(cmd) => commands::recommendations_cmd(cmd, &ctx, &output).await,

        Command::Rate(cmd) => commands::rate_cmd(cmd, &mut ctx, &output),

        Command::Wishlist(cmd) => commands::wishlist_cmd(cmd, &mut ctx, &output).await,

        // Returned above
        Command::SetKey(_) => ExitCode::Success,
    }
}

// =============================================================================
// TUI Mode
// =============================================================================

/// Initialize the terminal for TUI mode
fn init_terminal() -> Result<Tui> {
    enable_raw_mode()?;
    let mut stdout = stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    let terminal = Terminal::new(backend)?;
    Ok(terminal)
}

/// Restore terminal to normal state
fn restore_terminal(terminal: &mut Tui) -> Result<()> {
    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )?;
    terminal.show_cursor()?;
    Ok(())
}

/// Run interactive TUI
async fn run_tui(config: Config, ephemeral: bool) -> Result<()> {
    let Context { client, prefs } = Context::from_config(&config, ephemeral)?;
    let mut app = App::new(prefs).with_image_base(config.image_base_url());

    tracing::info!(base_url = client.base_url(), "starting TUI");

    let mut terminal = init_terminal()?;

    let result = run_event_loop(&mut terminal, &mut app, &client).await;

    // Always restore terminal, even on error
    restore_terminal(&mut terminal)?;

    result
}

/// Run each effect on its own task; completions come back over `tx`
fn spawn_effects(client: &TmdbClient, tx: &UnboundedSender<Completion>, effects: Vec<Effect>) {
    for effect in effects {
        let client = client.clone();
        let tx = tx.clone();
        tokio::spawn(async move {
            let completion = effects::execute(&client, effect).await;
            // Receiver is gone once the app has quit
            let _ = tx.send(completion);
        });
    }
}

/// Main event loop - handles input, applies finished requests, renders UI
async fn run_event_loop(terminal: &mut Tui, app: &mut App, client: &TmdbClient) -> Result<()> {
    const TICK_RATE: Duration = Duration::from_millis(100);

    let (tx, mut rx) = mpsc::unbounded_channel();
    spawn_effects(client, &tx, app.handle_action(Action::Start, Instant::now()));

    while app.running {
        let size = terminal.size()?;
        app.set_grid_columns(ui::grid_columns(size.width));

        let now = Instant::now();
        terminal.draw(|frame| ui::draw(frame, app, now))?;

        if event::poll(TICK_RATE)? {
            let effects = match event::read()? {
                // Only handle key press events (ignore releases on Windows)
                Event::Key(key) if key.kind == KeyEventKind::Press => {
                    app.handle_key(key, Instant::now())
                }
                Event::Mouse(mouse) if mouse.kind == MouseEventKind::Down(MouseButton::Left) => {
                    let area = Rect::new(0, 0, size.width, size.height);
                    let click = ui::click_target(area, app, mouse.column, mouse.row);
                    app.handle_click(click, Instant::now())
                }
                _ => Vec::new(),
            };
            spawn_effects(client, &tx, effects);
        }

        while let Ok(completion) = rx.try_recv() {
            app.apply(completion, Instant::now());
        }

        let effects = app.tick(Instant::now());
        spawn_effects(client, &tx, effects);
    }

    Ok(())
}
