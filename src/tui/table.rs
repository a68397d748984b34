use crate::app::AppState;
use crate::document::{Document, RowId, SELECTED_MARKER};
use ratatui::layout::Rect;
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Paragraph};
use ratatui::Frame;
use unicode_width::UnicodeWidthStr;

const HEADINGS: [&str; 5] = ["ID", "Config", "Start", "End", "Workers"];
const ID_WIDTH: usize = 6;
const TIME_WIDTH: usize = 20;
const WORKERS_WIDTH: usize = 8;
const GUTTER_WIDTH: usize = 3;
const MIN_CONFIG_WIDTH: usize = 8;

pub fn render(f: &mut Frame, area: Rect, state: &AppState) {
    let narrow = area.width < crate::app::NARROW_WIDTH_THRESHOLD;
    let widths = column_widths(area.width as usize, narrow);

    if state.row_count() == 0 {
        let para = Paragraph::new("No test runs found")
            .style(Style::default().fg(Color::DarkGray))
            .block(Block::default().borders(Borders::NONE));
        f.render_widget(para, area);
        return;
    }

    let mut lines: Vec<Line> = Vec::new();
    lines.push(Line::styled(
        format!(
            "{}{}",
            " ".repeat(GUTTER_WIDTH),
            format_cells(&HEADINGS.map(str::to_string), &widths)
        ),
        Style::default()
            .fg(Color::DarkGray)
            .add_modifier(Modifier::BOLD),
    ));

    // Scroll so the focused row stays visible below the heading
    let visible_height = (area.height as usize).saturating_sub(1);
    let scroll_offset = if state.cursor >= visible_height {
        state.cursor - visible_height + 1
    } else {
        0
    };

    let doc = state.view.document();
    for row in doc.rows().into_iter().skip(scroll_offset).take(visible_height) {
        let is_focused = row.0 == state.cursor;
        let is_selected = doc.has_marker(row, SELECTED_MARKER);
        lines.push(render_row(
            &doc.row_texts(row),
            row,
            &widths,
            is_focused,
            is_selected,
        ));
    }

    let table = Paragraph::new(lines).block(Block::default().borders(Borders::NONE));
    f.render_widget(table, area);
}

fn render_row(
    texts: &[String],
    row: RowId,
    widths: &[usize; 5],
    is_focused: bool,
    is_selected: bool,
) -> Line<'static> {
    let idx_label = if row.0 < crate::app::QUICK_SELECT_MAX {
        format!("{}", row.0 + 1)
    } else {
        " ".to_string()
    };
    let pointer = if is_focused { "›" } else { " " };

    let mut style = Style::default();
    if is_selected {
        style = style
            .fg(Color::Black)
            .bg(Color::Cyan)
            .add_modifier(Modifier::BOLD);
    }
    if is_focused {
        style = style.add_modifier(Modifier::REVERSED);
    }

    Line::from(vec![
        Span::styled(
            format!("{idx_label}{pointer} "),
            Style::default().fg(Color::DarkGray),
        ),
        Span::styled(format_cells(texts, widths), style),
    ])
}

/// Widths for the five columns. Config takes whatever is left; narrow
/// terminals drop the two timestamp columns.
pub fn column_widths(total: usize, narrow: bool) -> [usize; 5] {
    let time = if narrow { 0 } else { TIME_WIDTH };
    let fixed = GUTTER_WIDTH + ID_WIDTH + 2 * time + WORKERS_WIDTH;
    let config = total.saturating_sub(fixed).max(MIN_CONFIG_WIDTH);
    [ID_WIDTH, config, time, time, WORKERS_WIDTH]
}

/// Lays cells out left-aligned in fixed columns. Zero-width columns are skipped.
pub fn format_cells(texts: &[String], widths: &[usize; 5]) -> String {
    let mut out = String::new();
    for (text, &width) in texts.iter().zip(widths.iter()) {
        if width == 0 {
            continue;
        }
        let cell = truncate(text, width.saturating_sub(1));
        let pad = width.saturating_sub(UnicodeWidthStr::width(cell.as_str()));
        out.push_str(&cell);
        out.push_str(&" ".repeat(pad));
    }
    out.trim_end().to_string()
}

fn truncate(s: &str, max_width: usize) -> String {
    if UnicodeWidthStr::width(s) <= max_width {
        s.to_string()
    } else {
        let mut result = String::new();
        let mut width = 0;
        for c in s.chars() {
            let cw = unicode_width::UnicodeWidthChar::width(c).unwrap_or(0);
            if width + cw + 1 > max_width {
                result.push('…');
                break;
            }
            result.push(c);
            width += cw;
        }
        result
    }
}
