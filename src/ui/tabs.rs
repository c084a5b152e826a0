// Tab bar rendering.
// One tab per placed widget, marking instances whose day toggle is flipped.

use ratatui::{prelude::*, widgets::*};

use crate::app::App;

/// Draw the tab bar at the top of the screen.
pub fn draw_tabs(frame: &mut Frame, app: &App, area: Rect) {
    let tab_titles: Vec<Line> = app
        .tabs
        .iter()
        .enumerate()
        .map(|(index, id)| {
            let rendered = app.host.rendered(*id);
            let title = match rendered {
                Some(widget) if widget.day_offset > 0 => {
                    format!("{} #{} (+{})", widget.kind.title(), id, widget.day_offset)
                }
                Some(widget) => format!("{} #{}", widget.kind.title(), id),
                None => format!("#{}", id),
            };

            let style = if index == app.active_tab {
                Style::default()
                    .fg(Color::Yellow)
                    .add_modifier(Modifier::BOLD)
            } else {
                Style::default().fg(Color::White)
            };

            Line::from(Span::styled(title, style))
        })
        .collect();

    let tabs_widget = Tabs::new(tab_titles)
        .block(
            Block::default()
                .borders(Borders::BOTTOM)
                .border_style(Style::default().fg(Color::DarkGray))
                .title(" wingtable ")
                .title_style(
                    Style::default()
                        .fg(Color::Cyan)
                        .add_modifier(Modifier::BOLD),
                ),
        )
        .select(app.active_tab)
        .highlight_style(Style::default().fg(Color::Yellow))
        .divider(Span::raw(" │ "));

    frame.render_widget(tabs_widget, area);
}
