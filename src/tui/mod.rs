//! Full-screen dual-panel interface.

pub mod app;
mod ui;

use std::io::{self, Write};
use std::sync::Arc;
use std::time::Instant;

use anyhow::Result;
use crossterm::{
    cursor::Show,
    event::{self, DisableBracketedPaste, EnableBracketedPaste, Event, KeyEventKind},
    execute, queue,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use ratatui::{Terminal, backend::CrosstermBackend};

use crate::clipboard::{Clipboard, TerminalClipboard};
use crate::engine::Rewriter;
use crate::spinner;

pub use app::App;

/// Holds the terminal in raw mode on the alternate screen. Dropping it puts
/// the terminal back, whether the UI returned, failed, or panicked.
struct TerminalGuard;

impl TerminalGuard {
    fn enter() -> io::Result<Self> {
        enable_raw_mode()?;
        // From here on, Drop undoes whatever part of setup succeeded.
        let guard = TerminalGuard;
        execute!(io::stdout(), EnterAlternateScreen, EnableBracketedPaste)?;
        Ok(guard)
    }
}

impl Drop for TerminalGuard {
    fn drop(&mut self) {
        if let Err(e) = disable_raw_mode() {
            tracing::warn!(error = %e, "failed to leave raw mode");
        }
        if let Err(e) = restore(&mut io::stdout()) {
            tracing::warn!(error = %e, "failed to restore terminal");
        }
    }
}

/// Leave the alternate screen, stop bracketed paste, and show the cursor.
fn restore<W: Write>(out: &mut W) -> io::Result<()> {
    queue!(out, DisableBracketedPaste, LeaveAlternateScreen, Show)?;
    out.flush()
}

/// Take over the terminal, run the UI until the user quits, then restore it.
pub async fn run(rewriter: Arc<dyn Rewriter>) -> Result<()> {
    let _guard = TerminalGuard::enter()?;
    let mut terminal = Terminal::new(CrosstermBackend::new(io::stdout()))?;

    let mut app = App::new(rewriter, TerminalClipboard::stdout());
    run_app(&mut terminal, &mut app).await
}

async fn run_app<C: Clipboard>(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    app: &mut App<C>,
) -> Result<()> {
    loop {
        terminal.draw(|f| {
            let view = ui::output_view(f.area());
            app.set_output_view(view.width, view.height);
            ui::draw(f, app);
        })?;

        if event::poll(spinner::INTERVAL)? {
            match event::read()? {
                Event::Key(key) if key.kind == KeyEventKind::Press => {
                    app.handle_key(key, Instant::now());
                }
                Event::Paste(text) => app.handle_paste(&text),
                _ => {}
            }
        }

        if app.should_quit {
            if app.session.is_loading() {
                tracing::info!("quitting with a rewrite still in flight");
            }
            return Ok(());
        }

        app.tick(Instant::now());
        // Let the spawned rewrite task make progress on this worker too.
        tokio::task::yield_now().await;
    }
}
