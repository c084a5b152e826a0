// UI module for rendering the widget previewer.
// Lays out the tab bar, the selected widget, the status bar, and the help overlay.

mod tabs;
mod widget;

use ratatui::{prelude::*, widgets::*};

use crate::app::App;

pub use widget::argb;

/// Preview area a widget is drawn into, roughly a home-screen cell block.
const PREVIEW_WIDTH: u16 = 64;
const PREVIEW_HEIGHT: u16 = 20;

/// Main draw function that renders the entire UI.
pub fn draw(frame: &mut Frame, app: &App) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Tab bar
            Constraint::Min(1),    // Widget preview
            Constraint::Length(1), // Status bar
        ])
        .split(frame.area());

    tabs::draw_tabs(frame, app, chunks[0]);
    draw_content(frame, app, chunks[1]);
    draw_status_bar(frame, app, chunks[2]);

    if app.show_help {
        draw_help_overlay(frame);
    }
}

/// Draw the selected widget, centered.
fn draw_content(frame: &mut Frame, app: &App, area: Rect) {
    let Some(rendered) = app.selected() else {
        widget::render_empty(frame, area, "No widgets placed");
        return;
    };

    let width = PREVIEW_WIDTH.min(area.width);
    let height = PREVIEW_HEIGHT.min(area.height);
    let preview = Rect::new(
        area.x + (area.width - width) / 2,
        area.y + (area.height - height) / 2,
        width,
        height,
    );
    widget::render_widget(frame, rendered, preview);
}

/// Draw the status bar with keybinding hints and the last action.
fn draw_status_bar(frame: &mut Frame, app: &App, area: Rect) {
    let mut hints = vec![
        Span::raw(" Tab "),
        Span::styled("Switch", Style::default().fg(Color::DarkGray)),
        Span::raw("  t "),
        Span::styled("Day", Style::default().fg(Color::DarkGray)),
        Span::raw("  r "),
        Span::styled("Refresh", Style::default().fg(Color::DarkGray)),
        Span::raw("  d "),
        Span::styled("Dark", Style::default().fg(Color::DarkGray)),
        Span::raw("  ? "),
        Span::styled("Help", Style::default().fg(Color::DarkGray)),
        Span::raw("  q "),
        Span::styled("Quit", Style::default().fg(Color::DarkGray)),
    ];

    if !app.status.is_empty() {
        hints.push(Span::styled(
            format!("  {}", app.status),
            Style::default().fg(Color::Cyan),
        ));
    }

    frame.render_widget(Paragraph::new(Line::from(hints)), area);
}

/// Draw the help overlay.
fn draw_help_overlay(frame: &mut Frame) {
    let area = frame.area();

    let popup_width = 50.min(area.width);
    let popup_height = 13.min(area.height);
    let popup_x = (area.width.saturating_sub(popup_width)) / 2;
    let popup_y = (area.height.saturating_sub(popup_height)) / 2;
    let popup_area = Rect::new(popup_x, popup_y, popup_width, popup_height);

    frame.render_widget(Clear, popup_area);

    let key = |k: &'static str, what: &'static str| {
        Line::from(vec![
            Span::styled(k, Style::default().fg(Color::Cyan)),
            Span::raw(what),
        ])
    };

    let help_text = vec![
        Line::from(vec![Span::styled(
            "Keyboard Shortcuts",
            Style::default().add_modifier(Modifier::BOLD),
        )]),
        Line::from(""),
        key("  Tab/→ or l    ", "Next widget"),
        key("  S-Tab/← or h  ", "Previous widget"),
        key("  t             ", "Toggle today/tomorrow"),
        key("  r             ", "Refresh all widgets"),
        key("  d             ", "Flip system dark mode"),
        key("  ?             ", "Show/hide this help"),
        key("  q             ", "Quit"),
        Line::from(""),
        Line::from(vec![
            Span::styled("Press ", Style::default().fg(Color::DarkGray)),
            Span::styled("Esc", Style::default().fg(Color::Yellow)),
            Span::styled(" to close", Style::default().fg(Color::DarkGray)),
        ]),
    ];

    let help_paragraph = Paragraph::new(help_text).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::Cyan))
            .title(" Help ")
            .title_style(
                Style::default()
                    .fg(Color::Cyan)
                    .add_modifier(Modifier::BOLD),
            ),
    );

    frame.render_widget(help_paragraph, popup_area);
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    use chrono::NaiveDate;
    use crossterm::event::KeyCode;
    use ratatui::backend::TestBackend;

    use crate::store::{KeyLayout, MemoryStore};
    use crate::widget::{WidgetHost, WidgetKind};

    const WEEK: &str = r#"{
        "weekNum": "3",
        "weekDayList": [{"weekDay": "1", "weekDate": "3.4", "today": true}],
        "eventList": [
            {"weekDay": "1", "eventName": "Math", "sessionList": ["07:00", "08:40"], "sessionStart": 1, "sessionLast": 2, "address": "A101"},
            {"weekDay": "1", "eventName": "English", "sessionList": ["09:00", "10:40"], "address": "B2"}
        ]
    }"#;

    fn app(with_schedule: bool, kinds: &[WidgetKind]) -> App {
        let keys = KeyLayout::default();
        let mut entries = vec![
            (keys.account(), "u1".to_string()),
            (keys.last_term("u1"), "t".to_string()),
            (keys.last_week("u1"), "3".to_string()),
        ];
        if with_schedule {
            entries.push((keys.schedule("u1", "t", "3"), WEEK.to_string()));
        }

        let mut host = WidgetHost::new(
            Arc::new(MemoryStore::with_entries(entries)),
            Arc::new(MemoryStore::new()),
            keys,
            false,
        );
        for kind in kinds {
            host.add(*kind);
        }
        App::new(host, NaiveDate::from_ymd_opt(2024, 3, 4).unwrap(), false)
    }

    fn render(app: &App) -> String {
        let mut terminal = Terminal::new(TestBackend::new(80, 26)).unwrap();
        terminal.draw(|frame| draw(frame, app)).unwrap();
        terminal
            .backend()
            .buffer()
            .content()
            .iter()
            .map(|cell| cell.symbol())
            .collect()
    }

    #[test]
    fn test_draw_course_list() {
        let screen = render(&app(true, &[WidgetKind::TodayList]));
        assert!(screen.contains("wingtable"));
        assert!(screen.contains("Today List #1"));
        assert!(screen.contains("Math"));
        assert!(screen.contains("English"));
        assert!(screen.contains("A101"));
    }

    #[test]
    fn test_draw_grid() {
        let screen = render(&app(true, &[WidgetKind::Grid4x4]));
        assert!(screen.contains("07:00"));
        assert!(screen.contains("14:00"));
        assert!(screen.contains("Math"));
        assert!(screen.contains("@B2"));
    }

    #[test]
    fn test_draw_switches_tabs() {
        let mut app = app(true, &[WidgetKind::TodayList, WidgetKind::Compact4x2]);
        app.handle_key(KeyCode::Tab);
        let screen = render(&app);
        assert!(screen.contains("4x2"));
        assert!(screen.contains("07:00"));
        assert!(screen.contains("08:40"));
    }

    #[test]
    fn test_draw_without_widgets() {
        let screen = render(&app(false, &[]));
        assert!(screen.contains("No widgets placed"));
    }

    #[test]
    fn test_draw_help_overlay() {
        let mut app = app(false, &[WidgetKind::TodayCourse]);
        app.handle_key(KeyCode::Char('?'));
        let screen = render(&app);
        assert!(screen.contains("Keyboard Shortcuts"));
    }

    #[test]
    fn test_argb_drops_alpha() {
        assert_eq!(argb(0xFF3F51B5), Color::Rgb(0x3F, 0x51, 0xB5));
    }
}
