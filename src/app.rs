// Previewer state and main event loop.
// One tab per placed widget; keys drive the same refresh and toggle signals the shell sends.

use std::io;

use chrono::{Local, NaiveDate};
use crossterm::event::{self, Event, KeyCode, KeyEventKind};
use ratatui::prelude::*;

use crate::ui;
use crate::widget::{RenderedWidget, WidgetHost};

/// Main application state.
pub struct App {
    pub host: WidgetHost,
    /// Instance ids in tab order.
    pub tabs: Vec<i32>,
    /// Index into `tabs`.
    pub active_tab: usize,
    /// Date the current renders were built for.
    pub today: NaiveDate,
    pub system_dark: bool,
    /// Last action, shown in the status bar.
    pub status: String,
    pub show_help: bool,
    /// Whether the app should exit.
    pub should_quit: bool,
}

impl App {
    /// Wrap a host whose widgets are already placed, rendering them for `today`.
    pub fn new(mut host: WidgetHost, today: NaiveDate, system_dark: bool) -> Self {
        let count = host.refresh_all(today);
        let tabs = host.instances().map(|(id, _)| id).collect();
        Self {
            host,
            tabs,
            active_tab: 0,
            today,
            system_dark,
            status: format!("{} widgets", count),
            show_help: false,
            should_quit: false,
        }
    }

    pub fn selected_id(&self) -> Option<i32> {
        self.tabs.get(self.active_tab).copied()
    }

    /// Render of the selected widget.
    pub fn selected(&self) -> Option<&RenderedWidget> {
        self.selected_id().and_then(|id| self.host.rendered(id))
    }

    pub fn next_tab(&mut self) {
        if !self.tabs.is_empty() {
            self.active_tab = (self.active_tab + 1) % self.tabs.len();
        }
    }

    pub fn prev_tab(&mut self) {
        if !self.tabs.is_empty() {
            self.active_tab = (self.active_tab + self.tabs.len() - 1) % self.tabs.len();
        }
    }

    /// Re-render everything when the date rolls over.
    pub fn tick(&mut self, today: NaiveDate) {
        if today != self.today {
            self.today = today;
            let count = self.host.refresh_all(today);
            self.status = format!("New day, refreshed {} widgets", count);
        }
    }

    /// Apply one key press.
    pub fn handle_key(&mut self, code: KeyCode) {
        if self.show_help {
            if matches!(code, KeyCode::Esc | KeyCode::Char('?') | KeyCode::Char('q')) {
                self.show_help = false;
            }
            return;
        }

        match code {
            KeyCode::Char('q') | KeyCode::Esc => self.should_quit = true,
            KeyCode::Char('?') => self.show_help = true,
            KeyCode::Tab | KeyCode::Right | KeyCode::Char('l') => self.next_tab(),
            KeyCode::BackTab | KeyCode::Left | KeyCode::Char('h') => self.prev_tab(),
            KeyCode::Char('r') => {
                let count = self.host.refresh_all(self.today);
                self.status = format!("Refreshed {} widgets", count);
            }
            KeyCode::Char('t') => {
                self.status = match self.host.toggle_day(self.selected_id(), self.today) {
                    Ok(count) => format!("Toggled day, refreshed {}", count),
                    Err(e) => {
                        tracing::warn!(error = %e, "day toggle failed");
                        format!("Toggle failed: {}", e)
                    }
                };
            }
            KeyCode::Char('d') => {
                self.system_dark = !self.system_dark;
                self.host.on_configuration_changed(self.system_dark, self.today);
                self.status = if self.system_dark {
                    "System dark mode on".to_string()
                } else {
                    "System dark mode off".to_string()
                };
            }
            _ => {}
        }
    }

    /// Main event loop.
    pub fn run(&mut self, terminal: &mut Terminal<impl Backend>) -> io::Result<()> {
        while !self.should_quit {
            self.tick(Local::now().date_naive());
            terminal.draw(|frame| ui::draw(frame, self))?;
            self.handle_events()?;
        }
        Ok(())
    }

    /// Handle keyboard and other events.
    #[allow(clippy::collapsible_if)]
    fn handle_events(&mut self) -> io::Result<()> {
        if event::poll(std::time::Duration::from_millis(250))? {
            if let Event::Key(key) = event::read()? {
                if key.kind == KeyEventKind::Press {
                    self.handle_key(key.code);
                }
            }
        }
        Ok(())
    }
}
