// Widget view rendering.
// Draws each widget family's view model inside a themed frame.

use ratatui::{prelude::*, widgets::*};

use crate::schedule::{CourseItem, Header};
use crate::widget::views::{
    CompactView, GRID_SLOTS, GridView, NO_CLASSES_TODAY, SYNC_PLACEHOLDER, TodayAndNextView,
    TodayCourseView, TodayListView, ToggleArrow,
};
use crate::widget::{RenderedWidget, WidgetColors, WidgetView};

/// Fill colours of the grid's colour slots.
const GRID_PALETTE: [Color; 8] = [
    Color::Rgb(0x42, 0xA5, 0xF5),
    Color::Rgb(0x66, 0xBB, 0x6A),
    Color::Rgb(0xFF, 0xA7, 0x26),
    Color::Rgb(0xAB, 0x47, 0xBC),
    Color::Rgb(0xEF, 0x53, 0x50),
    Color::Rgb(0x26, 0xA6, 0x9A),
    Color::Rgb(0x8D, 0x6E, 0x63),
    Color::Rgb(0x78, 0x90, 0x9C),
];

/// Convert an `0xAARRGGBB` colour to a terminal colour. Alpha is ignored.
pub fn argb(color: u32) -> Color {
    Color::Rgb((color >> 16) as u8, (color >> 8) as u8, color as u8)
}

struct Palette {
    primary: Style,
    secondary: Style,
    accent: Style,
}

impl Palette {
    fn new(colors: &WidgetColors) -> Self {
        Self {
            primary: Style::default().fg(argb(colors.primary)),
            secondary: Style::default().fg(argb(colors.secondary)),
            accent: Style::default()
                .fg(argb(colors.accent))
                .add_modifier(Modifier::BOLD),
        }
    }
}

/// Render one widget instance.
pub fn render_widget(frame: &mut Frame, widget: &RenderedWidget, area: Rect) {
    let palette = Palette::new(&widget.colors);
    let background = if widget.colors.dark {
        Color::Rgb(0x12, 0x12, 0x12)
    } else {
        Color::Rgb(0xFA, 0xFA, 0xFA)
    };

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(palette.secondary)
        .title(format!(" {} ", widget.kind.title()))
        .style(Style::default().bg(background));
    let inner = block.inner(area);
    frame.render_widget(block, area);

    match &widget.view {
        WidgetView::TodayCourse(view) => render_today_course(frame, view, &palette, inner),
        WidgetView::TodayAndNext(view) => render_today_and_next(frame, view, &palette, inner),
        WidgetView::TodayList(view) => render_today_list(frame, view, &palette, inner),
        WidgetView::Compact(view) => render_compact(frame, view, &palette, inner),
        WidgetView::Grid(view) => render_grid(frame, view, &palette, inner),
    }
}

/// Render an empty state message.
pub fn render_empty(frame: &mut Frame, area: Rect, message: &str) {
    let text = Paragraph::new(message)
        .alignment(Alignment::Center)
        .style(Style::default().fg(Color::DarkGray));
    frame.render_widget(text, area);
}

fn header_spans<'a>(header: &'a Header, palette: &Palette) -> Vec<Span<'a>> {
    vec![
        Span::styled(header.schedule_name.as_str(), palette.accent),
        Span::raw("  "),
        Span::styled(header.date_text.as_str(), palette.primary),
        Span::raw(" "),
        Span::styled(header.week_text.as_str(), palette.primary),
    ]
}

fn split_header(area: Rect) -> (Rect, Rect) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(1), Constraint::Min(1)])
        .split(area);
    (chunks[0], chunks[1])
}

fn course_list(frame: &mut Frame, courses: &[CourseItem], palette: &Palette, area: Rect) {
    if courses.is_empty() {
        render_empty(frame, area, NO_CLASSES_TODAY);
        return;
    }

    let items: Vec<ListItem> = courses
        .iter()
        .map(|course| {
            ListItem::new(vec![
                Line::from(vec![
                    Span::styled("▍", Style::default().fg(argb(course.indicator_color))),
                    Span::styled(
                        course.name.as_str(),
                        palette.primary.add_modifier(Modifier::BOLD),
                    ),
                ]),
                Line::from(vec![
                    Span::raw("  "),
                    Span::styled(
                        format!("{} | {} | {}", course.time, course.location, course.teacher),
                        palette.secondary,
                    ),
                ]),
            ])
        })
        .collect();

    frame.render_widget(List::new(items), area);
}

fn render_today_course(frame: &mut Frame, view: &TodayCourseView, palette: &Palette, area: Rect) {
    let (header_area, body) = split_header(area);

    let arrow = match view.arrow {
        ToggleArrow::Forward => "▶",
        ToggleArrow::Back => "◀",
    };
    let mut spans = header_spans(&view.header, palette);
    spans.push(Span::styled(view.week_count_part.as_str(), palette.secondary));
    spans.push(Span::styled(arrow, palette.accent));
    frame.render_widget(Paragraph::new(Line::from(spans)), header_area);

    course_list(frame, &view.courses, palette, body);
}

fn render_today_and_next(
    frame: &mut Frame,
    view: &TodayAndNextView,
    palette: &Palette,
    area: Rect,
) {
    let (header_area, body) = split_header(area);

    let mut spans = header_spans(&view.header, palette);
    spans.push(Span::raw(" | "));
    spans.push(Span::styled(view.week_count.as_str(), palette.secondary));
    frame.render_widget(Paragraph::new(Line::from(spans)), header_area);

    let columns = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
        .split(body);

    for (column, (title, courses)) in columns
        .iter()
        .zip([("今天", &view.today), ("明天", &view.next_day)])
    {
        let block = Block::default()
            .borders(Borders::TOP)
            .border_style(palette.secondary)
            .title(Span::styled(title, palette.accent));
        let inner = block.inner(*column);
        frame.render_widget(block, *column);
        course_list(frame, courses, palette, inner);
    }
}

fn render_today_list(frame: &mut Frame, view: &TodayListView, palette: &Palette, area: Rect) {
    let (header_area, body) = split_header(area);
    let spans = header_spans(&view.header, palette);
    frame.render_widget(Paragraph::new(Line::from(spans)), header_area);
    course_list(frame, &view.courses, palette, body);
}

fn render_compact(frame: &mut Frame, view: &CompactView, palette: &Palette, area: Rect) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1),
            Constraint::Min(1),
            Constraint::Length(1),
        ])
        .split(area);

    let header = Line::from(vec![
        Span::styled(view.header_left.as_str(), palette.primary),
        Span::raw("  "),
        Span::styled(view.week.as_str(), palette.accent),
    ]);
    frame.render_widget(Paragraph::new(header), chunks[0]);

    if let Some(empty) = &view.empty_text {
        render_empty(frame, chunks[1], empty);
    } else {
        let items: Vec<ListItem> = view
            .rows
            .iter()
            .map(|row| {
                ListItem::new(vec![
                    Line::from(vec![
                        Span::styled(format!("{:>5} ", row.time_start), palette.secondary),
                        Span::styled(
                            row.title.as_str(),
                            palette.primary.add_modifier(Modifier::BOLD),
                        ),
                    ]),
                    Line::from(vec![
                        Span::styled(format!("{:>5} ", row.time_end), palette.secondary),
                        Span::styled(row.detail.as_str(), palette.secondary),
                    ]),
                ])
            })
            .collect();
        frame.render_widget(List::new(items), chunks[1]);
    }

    let footer_style = if view.footer == SYNC_PLACEHOLDER {
        Style::default().fg(Color::Yellow)
    } else {
        palette.secondary
    };
    frame.render_widget(
        Paragraph::new(view.footer.as_str()).style(footer_style),
        chunks[2],
    );
}

fn render_grid(frame: &mut Frame, view: &GridView, palette: &Palette, area: Rect) {
    if view.cells.is_empty() {
        render_empty(frame, area, &view.week);
        return;
    }

    let (header_area, body) = split_header(area);
    frame.render_widget(
        Paragraph::new(Span::styled(view.week.as_str(), palette.accent)),
        header_area,
    );

    let header = Row::new(
        std::iter::once(Cell::from(""))
            .chain(view.day_names.iter().map(|name| Cell::from(name.as_str()))),
    )
    .style(palette.secondary);

    let rows: Vec<Row> = view
        .cells
        .iter()
        .zip(GRID_SLOTS)
        .map(|(cells, slot)| {
            let slot_cell = Cell::from(Span::styled(slot, palette.secondary));
            let course_cells = cells.iter().map(|cell| match cell {
                Some(cell) => Cell::from(Text::from(cell.text.as_str())).style(
                    Style::default()
                        .fg(Color::Black)
                        .bg(GRID_PALETTE[cell.color_slot % GRID_PALETTE.len()]),
                ),
                None => Cell::from(""),
            });
            Row::new(std::iter::once(slot_cell).chain(course_cells)).height(2)
        })
        .collect();

    let widths = [
        Constraint::Length(6),
        Constraint::Fill(1),
        Constraint::Fill(1),
        Constraint::Fill(1),
        Constraint::Fill(1),
    ];
    let table = Table::new(rows, widths).header(header).column_spacing(1);
    frame.render_widget(table, body);
}
