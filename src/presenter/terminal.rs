//! Terminal presenter using ratatui
//!
//! The dialog runs on its own thread: it owns the terminal, draws the
//! dialog, turns key presses into [`UiEvent`]s and applies commands sent by
//! the [`TerminalView`] handle.

use super::{DialogView, Presenter, UiEvent};
use crate::modal::{ModalError, ModalResult, Outcome};
use crate::options::{DialogConfig, IconKind, Theme};
use anyhow::Context;
use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use crossterm::execute;
use crossterm::terminal::{
    disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen,
};
use ratatui::backend::CrosstermBackend;
use ratatui::layout::{Alignment, Constraint, Direction, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Clear, Paragraph, Wrap};
use ratatui::{Frame, Terminal};
use std::collections::HashMap;
use std::io::{self, IsTerminal, Stdout};
use std::sync::mpsc as std_mpsc;
use std::thread;
use std::time::Duration;
use tokio::sync::mpsc;
use tracing::{debug, warn};

type Backend = CrosstermBackend<Stdout>;

const POLL_INTERVAL: Duration = Duration::from_millis(50);
const DIALOG_WIDTH: u16 = 64;

/// Renders dialogs on the controlling terminal
#[derive(Debug, Clone, Copy, Default)]
pub struct TerminalPresenter;

impl TerminalPresenter {
    pub fn new() -> Self {
        Self
    }
}

impl Presenter for TerminalPresenter {
    fn render(
        &self,
        config: &DialogConfig,
        events: mpsc::UnboundedSender<UiEvent>,
    ) -> ModalResult<Box<dyn DialogView>> {
        if !io::stdout().is_terminal() {
            return Err(ModalError::NoSurface("stdout is not a terminal".to_string()));
        }

        // Raw mode and the alternate screen belong to the dialog thread from here on
        let terminal = init_terminal().context("Failed to initialize the terminal")?;
        let (commands_tx, commands_rx) = std_mpsc::channel();
        let screen = Screen::new(config.clone());

        let thread = thread::Builder::new()
            .name("modalgate-terminal".to_string())
            .spawn(move || run_screen(terminal, screen, commands_rx, events))
            .context("Failed to start the terminal thread")?;

        Ok(Box::new(TerminalView {
            commands: commands_tx,
            thread: Some(thread),
        }))
    }
}

fn init_terminal() -> anyhow::Result<Terminal<Backend>> {
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let terminal = Terminal::new(CrosstermBackend::new(stdout))?;
    Ok(terminal)
}

fn restore_terminal(terminal: &mut Terminal<Backend>) -> anyhow::Result<()> {
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;
    Ok(())
}

enum ViewCommand {
    Enable(Outcome, bool),
    Label(Outcome, String),
    Detach,
}

/// Handle to the dialog thread
pub struct TerminalView {
    commands: std_mpsc::Sender<ViewCommand>,
    thread: Option<thread::JoinHandle<()>>,
}

impl DialogView for TerminalView {
    fn set_enabled(&mut self, control: Outcome, enabled: bool) {
        let _ = self.commands.send(ViewCommand::Enable(control, enabled));
    }

    fn set_label(&mut self, control: Outcome, label: &str) {
        let _ = self.commands.send(ViewCommand::Label(control, label.to_string()));
    }

    fn detach(&mut self) {
        let Some(thread) = self.thread.take() else {
            return;
        };
        let _ = self.commands.send(ViewCommand::Detach);
        // The thread restores the terminal before exiting; wait so callers
        // never print onto the alternate screen.
        if thread.join().is_err() {
            warn!("Terminal dialog thread panicked");
        }
    }
}

impl Drop for TerminalView {
    fn drop(&mut self) {
        self.detach();
    }
}

fn run_screen(
    mut terminal: Terminal<Backend>,
    mut screen: Screen,
    commands: std_mpsc::Receiver<ViewCommand>,
    events: mpsc::UnboundedSender<UiEvent>,
) {
    if let Err(e) = screen_loop(&mut terminal, &mut screen, &commands, &events) {
        warn!("Terminal dialog stopped: {}", e);
    }
    if let Err(e) = restore_terminal(&mut terminal) {
        warn!("Failed to restore terminal: {}", e);
    }
}

fn screen_loop(
    terminal: &mut Terminal<Backend>,
    screen: &mut Screen,
    commands: &std_mpsc::Receiver<ViewCommand>,
    events: &mpsc::UnboundedSender<UiEvent>,
) -> anyhow::Result<()> {
    loop {
        // Apply everything the controller sent since the last frame
        loop {
            match commands.try_recv() {
                Ok(ViewCommand::Enable(control, enabled)) => {
                    screen.enabled.insert(control, enabled);
                }
                Ok(ViewCommand::Label(control, label)) => {
                    screen.labels.insert(control, label);
                }
                Ok(ViewCommand::Detach) | Err(std_mpsc::TryRecvError::Disconnected) => {
                    debug!("Terminal dialog detached");
                    return Ok(());
                }
                Err(std_mpsc::TryRecvError::Empty) => break,
            }
        }

        terminal.draw(|frame| screen.draw(frame))?;

        // Wait briefly for input so commands are picked up promptly
        if event::poll(POLL_INTERVAL)? {
            if let Event::Key(key) = event::read()? {
                if key.kind == KeyEventKind::Press {
                    if let Some(ui_event) = screen.handle_key(key) {
                        let _ = events.send(ui_event);
                    }
                }
            }
        }
    }
}

/// Colors for one theme
struct Palette {
    background: Color,
    text: Color,
    muted: Color,
    focus: Color,
}

impl Palette {
    fn for_theme(theme: Theme) -> Self {
        match theme {
            Theme::Dark => Self {
                background: Color::Rgb(0x20, 0x1F, 0x26),
                text: Color::Rgb(0xDF, 0xDB, 0xDD),
                muted: Color::Rgb(0x60, 0x5F, 0x6B),
                focus: Color::Rgb(0x6B, 0x50, 0xFF),
            },
            Theme::Light => Self {
                background: Color::Rgb(0xF7, 0xF7, 0xF8),
                text: Color::Rgb(0x20, 0x1F, 0x26),
                muted: Color::Rgb(0x85, 0x83, 0x92),
                focus: Color::Rgb(0x4A, 0x2F, 0xE0),
            },
        }
    }
}

fn icon_glyph(icon: IconKind) -> (&'static str, Color) {
    match icon {
        IconKind::Warning => ("⚠", Color::Yellow),
        IconKind::Danger => ("⛔", Color::Red),
        IconKind::Info => ("ℹ", Color::Blue),
        IconKind::Success => ("✔", Color::Green),
        IconKind::Question => ("?", Color::Cyan),
    }
}

/// What the dialog thread draws
struct Screen {
    config: DialogConfig,
    controls: Vec<Outcome>,
    focus: usize,
    checked: bool,
    enabled: HashMap<Outcome, bool>,
    labels: HashMap<Outcome, String>,
}

impl Screen {
    fn new(config: DialogConfig) -> Self {
        let controls: Vec<Outcome> = config.buttons.iter().collect();
        let focus = controls
            .iter()
            .position(|control| *control == Outcome::Cancel)
            .unwrap_or(0);
        let labels = controls
            .iter()
            .map(|control| (*control, config.label(*control).to_string()))
            .collect();
        let enabled = controls.iter().map(|control| (*control, true)).collect();

        Self {
            config,
            controls,
            focus,
            checked: false,
            enabled,
            labels,
        }
    }

    fn is_enabled(&self, control: Outcome) -> bool {
        self.enabled.get(&control).copied().unwrap_or(false)
    }

    fn move_focus(&mut self, forward: bool) {
        if self.controls.is_empty() {
            return;
        }
        let len = self.controls.len();
        self.focus = if forward {
            (self.focus + 1) % len
        } else {
            (self.focus + len - 1) % len
        };
    }

    fn handle_key(&mut self, key: KeyEvent) -> Option<UiEvent> {
        match (key.code, key.modifiers) {
            (KeyCode::Left | KeyCode::BackTab, _) => {
                self.move_focus(false);
                None
            }
            (KeyCode::Right | KeyCode::Tab, _) => {
                self.move_focus(true);
                None
            }
            (KeyCode::Char(' '), _) if self.config.require_confirmation => {
                self.checked = !self.checked;
                Some(UiEvent::ConfirmationToggled(self.checked))
            }
            (KeyCode::Enter, _) => {
                let control = *self.controls.get(self.focus)?;
                self.is_enabled(control).then_some(UiEvent::Clicked(control))
            }
            (KeyCode::Esc, _) | (KeyCode::Char('c'), KeyModifiers::CONTROL) => self
                .is_enabled(Outcome::Cancel)
                .then_some(UiEvent::Clicked(Outcome::Cancel)),
            _ => None,
        }
    }

    fn draw(&self, frame: &mut Frame) {
        let palette = Palette::for_theme(self.config.theme);
        let (glyph, icon_color) = icon_glyph(self.config.icon);

        let text_width = usize::from(DIALOG_WIDTH.saturating_sub(4)).max(1);
        let message_lines = (self.config.message.chars().count() / text_width + 1) as u16;
        let checkbox_lines = if self.config.require_confirmation { 2 } else { 0 };
        let area = centered_rect(
            frame.size(),
            DIALOG_WIDTH,
            message_lines + checkbox_lines + 6,
        );

        let block = Block::default()
            .borders(Borders::ALL)
            .title(format!(" {} {} ", glyph, self.config.title))
            .style(Style::default().bg(palette.background).fg(palette.text))
            .border_style(Style::default().fg(icon_color));
        let inner = block.inner(area);

        frame.render_widget(Clear, area);
        frame.render_widget(block, area);

        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Min(message_lines),
                Constraint::Length(checkbox_lines),
                Constraint::Length(1),
                Constraint::Length(1),
            ])
            .split(inner);

        let message = Paragraph::new(self.config.message.as_str())
            .wrap(Wrap { trim: true })
            .alignment(Alignment::Left);
        frame.render_widget(message, chunks[0]);

        if self.config.require_confirmation {
            let mark = if self.checked { "[x]" } else { "[ ]" };
            let checkbox = Paragraph::new(format!("{} {}", mark, self.config.confirmation_text))
                .wrap(Wrap { trim: true });
            frame.render_widget(checkbox, chunks[1]);
        }

        let mut buttons = Vec::new();
        for (index, control) in self.controls.iter().enumerate() {
            let label = self
                .labels
                .get(control)
                .map(String::as_str)
                .unwrap_or_else(|| self.config.label(*control));
            let mut style = Style::default().fg(palette.text);
            if !self.is_enabled(*control) {
                style = style.fg(palette.muted).add_modifier(Modifier::DIM);
            } else if index == self.focus {
                style = style
                    .bg(palette.focus)
                    .fg(Color::White)
                    .add_modifier(Modifier::BOLD);
            }
            buttons.push(Span::styled(format!(" {} ", label), style));
            buttons.push(Span::raw("  "));
        }
        frame.render_widget(
            Paragraph::new(Line::from(buttons)).alignment(Alignment::Center),
            chunks[2],
        );

        let hint = if self.config.require_confirmation {
            "←/→ select • Space tick • Enter choose • Esc cancel"
        } else {
            "←/→ select • Enter choose • Esc cancel"
        };
        frame.render_widget(
            Paragraph::new(hint)
                .style(Style::default().fg(palette.muted))
                .alignment(Alignment::Center),
            chunks[3],
        );
    }
}

fn centered_rect(area: Rect, width: u16, height: u16) -> Rect {
    let width = width.min(area.width);
    let height = height.min(area.height);
    Rect {
        x: area.x + (area.width - width) / 2,
        y: area.y + (area.height - height) / 2,
        width,
        height,
    }
}
