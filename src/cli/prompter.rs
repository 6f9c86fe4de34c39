//! Console Prompter
//!
//! Owns the terminal: raw mode, the alternate screen and mouse capture. Each
//! pass of the loop delivers queued incoming messages, redraws the whole
//! buffer and waits briefly for one terminal event.

use std::io;
use std::panic;

use crossterm::{
    cursor,
    event::{self, DisableMouseCapture, EnableMouseCapture},
    execute, terminal,
};
use ratatui::{backend::CrosstermBackend, widgets::Paragraph, Terminal};
use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender};
use tokio::time::Duration;
use tracing::{debug, error, info};

use super::config::ConsoleConfig;
use super::input::{map_event, CaretMove, InputAction};
use super::render::{render_lines, Palette, ScreenLayout, TerminalSurface};
use crate::console::cursor::RenderSurface;
use crate::console::session::{ConsoleSession, IncomingMessage};
use crate::error::Result;

const POLL_INTERVAL: Duration = Duration::from_millis(100);

/// Sends panic reports to the log instead of the screen while alive
///
/// Command panics are caught by the registry, but the default hook would
/// still print over the alternate screen. Dropping the guard restores the
/// default hook.
#[derive(Debug)]
pub struct QuietPanics(());

impl QuietPanics {
    pub fn install() -> Self {
        panic::set_hook(Box::new(|info| {
            error!(%info, "panic while the console owns the terminal");
        }));
        QuietPanics(())
    }
}

impl Drop for QuietPanics {
    fn drop(&mut self) {
        let _ = panic::take_hook();
    }
}

/// A terminal surface with the caret on the session cursor
fn caret_surface(session: &ConsoleSession) -> TerminalSurface {
    let mut surface = TerminalSurface::default();
    surface.place_caret(session.cursor());
    surface
}

/// What was on screen at the last draw, for mouse hit testing
#[derive(Debug, Clone, Default)]
struct Viewport {
    layout: ScreenLayout,
    scroll: usize,
    x: u16,
    y: u16,
}

/// Interactive terminal front end for one console session
pub struct ConsolePrompter {
    config: ConsoleConfig,
    session: ConsoleSession,
    surface: TerminalSurface,
    palette: Palette,
    viewport: Viewport,
    terminal: Terminal<CrosstermBackend<io::Stdout>>,
    inbox_tx: UnboundedSender<IncomingMessage>,
    inbox_rx: UnboundedReceiver<IncomingMessage>,
    should_exit: bool,
}

impl ConsolePrompter {
    /// Take over the terminal
    pub fn new(config: ConsoleConfig) -> Result<Self> {
        let session = ConsoleSession::new(config.identity());
        Self::with_session(config, session)
    }

    /// Take over the terminal for an existing session
    pub fn with_session(config: ConsoleConfig, session: ConsoleSession) -> Result<Self> {
        let backend = CrosstermBackend::new(io::stdout());
        let mut terminal = Terminal::new(backend)?;

        terminal::enable_raw_mode()?;
        execute!(
            terminal.backend_mut(),
            terminal::EnterAlternateScreen,
            EnableMouseCapture,
            cursor::Show
        )?;

        let (inbox_tx, inbox_rx) = mpsc::unbounded_channel();
        let surface = caret_surface(&session);

        Ok(Self {
            palette: Palette::from_config(&config),
            config,
            session,
            surface,
            viewport: Viewport::default(),
            terminal,
            inbox_tx,
            inbox_rx,
            should_exit: false,
        })
    }

    /// Sender for messages to show above the prompt
    pub fn inbox(&self) -> UnboundedSender<IncomingMessage> {
        self.inbox_tx.clone()
    }

    pub fn config(&self) -> &ConsoleConfig {
        &self.config
    }

    pub fn session(&self) -> &ConsoleSession {
        &self.session
    }

    /// Run until the user quits
    pub async fn run(&mut self) -> Result<()> {
        let _quiet = QuietPanics::install();
        info!(prompt = %self.session.identity().prompt(), "console started");
        while !self.should_exit {
            self.drain_inbox();
            self.render_frame()?;
            self.handle_input().await?;
        }
        self.cleanup()?;
        info!("console closed");
        Ok(())
    }

    fn drain_inbox(&mut self) {
        while let Ok(incoming) = self.inbox_rx.try_recv() {
            self.session.receive_message(&incoming, &mut self.surface);
        }
    }

    async fn handle_input(&mut self) -> Result<()> {
        if !event::poll(POLL_INTERVAL)? {
            tokio::task::yield_now().await;
            return Ok(());
        }
        let action = map_event(event::read()?);
        self.apply(action);
        Ok(())
    }

    fn apply(&mut self, action: InputAction) {
        match action {
            InputAction::Key(key) => {
                if let Some(submission) = self.session.handle_key(key, &mut self.surface) {
                    debug!(line = %submission.line, "line submitted");
                }
            }
            InputAction::Caret(movement) => self.move_caret(movement),
            InputAction::Press { column, row } => {
                if let Some(index) = self.hit_test(column, row) {
                    self.session.move_cursor(index, &mut self.surface);
                    self.surface.begin_selection(index);
                }
            }
            InputAction::Drag { column, row } => {
                if let Some(index) = self.hit_test(column, row) {
                    self.surface.extend_selection(index);
                }
            }
            InputAction::Quit => self.should_exit = true,
            InputAction::Resize | InputAction::Ignore => {}
        }
    }

    fn move_caret(&mut self, movement: CaretMove) {
        let cursor = self.session.cursor();
        let target = match movement {
            CaretMove::Left => cursor.saturating_sub(1),
            CaretMove::Right => cursor + 1,
            CaretMove::Home => 0,
            CaretMove::End => self.session.buffer().len(),
        };
        self.session.move_cursor(target, &mut self.surface);
    }

    /// Buffer index under a screen position
    fn hit_test(&self, column: u16, row: u16) -> Option<usize> {
        let row = row.checked_sub(self.viewport.y)? as usize + self.viewport.scroll;
        let column = column.checked_sub(self.viewport.x)? as usize;
        Some(
            self.viewport
                .layout
                .index_at(self.session.buffer(), row, column),
        )
    }

    fn render_frame(&mut self) -> Result<()> {
        let buffer = self.session.buffer();
        let surface = &self.surface;
        let palette = &self.palette;
        let viewport = &mut self.viewport;

        self.terminal.draw(|f| {
            let area = f.size();
            let layout = ScreenLayout::new(buffer, area.width as usize);
            let scroll = layout.scroll_for(area.height as usize);

            let lines = render_lines(buffer, &layout, surface, palette, scroll, area.height as usize);
            f.render_widget(Paragraph::new(lines), area);

            let (row, col) = layout.position_of(surface.caret());
            if row >= scroll {
                f.set_cursor(area.x + col as u16, area.y + (row - scroll) as u16);
            }

            *viewport = Viewport {
                layout,
                scroll,
                x: area.x,
                y: area.y,
            };
        })?;
        Ok(())
    }

    fn cleanup(&mut self) -> Result<()> {
        terminal::disable_raw_mode()?;
        execute!(
            self.terminal.backend_mut(),
            DisableMouseCapture,
            terminal::LeaveAlternateScreen,
            cursor::Show
        )?;
        Ok(())
    }
}

impl Drop for ConsolePrompter {
    fn drop(&mut self) {
        let _ = self.cleanup();
    }
}
