//! UI rendering module.
//!
//! All ratatui drawing lives here: the year grid, the drill-down modals
//! (week, day, hour, minute), the header with the preference editors and the
//! status footer. The same geometry helpers drive both rendering and mouse
//! hit-testing so clicks always land on the cell that was drawn.

use chrono::{Datelike, NaiveDateTime};
use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph},
    Frame,
};

use crate::app::{App, InputMode, LogLevel, View, PHANTOM_PRE_YEARS};
use crate::calendar::{self, BucketClass};
use crate::particles::ParticleWidget;
use crate::theme::{colors, styles};

const QUOTE: &str = "\"Teach us to number our days, that we may gain a heart of wisdom\"";

/// Width of the year-label gutter in the year grid.
const YEAR_LABEL_WIDTH: u16 = 5;
/// Each week cell is two characters wide.
const WEEK_CELL_WIDTH: u16 = 2;

/// Render the entire UI
pub fn render(frame: &mut Frame, app: &App) {
    let area = frame.area();

    let bg_block = Block::default().style(Style::default().bg(colors::BG_DARK));
    frame.render_widget(bg_block, area);
    frame.render_widget(ParticleWidget::new(&app.particle_system), area);

    let chunks = main_chunks(area);
    render_header(frame, app, chunks[0]);
    render_year_view(frame, app, chunks[1]);
    render_footer(frame, app, chunks[2]);

    if app.depth() > 0 {
        render_drill_down_modal(frame, app, area);
    }

    if app.show_help {
        render_help_overlay(frame, area);
    }
}

/// Vertical split shared by rendering and hit-testing.
fn main_chunks(area: Rect) -> [Rect; 3] {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(6),
            Constraint::Min(10),
            Constraint::Length(4),
        ])
        .split(area);
    [chunks[0], chunks[1], chunks[2]]
}

// === Header ===

fn render_header(frame: &mut Frame, app: &App, area: Rect) {
    let block = Block::default()
        .title(" Life Calendar ")
        .title_style(styles::title_accent())
        .borders(Borders::ALL)
        .border_style(styles::border())
        .style(Style::default().bg(colors::BG_MEDIUM));
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let deathday = app
        .birth_date
        .map(|birth| {
            calendar::death_date(birth, app.life_expectancy())
                .format("%Y-%m-%d")
                .to_string()
        })
        .unwrap_or_else(|| "---".to_string());

    let birth_span = pref_field_span(app, InputMode::EditingBirthDate, &app.prefs.birth_date);
    let expectancy_span = pref_field_span(
        app,
        InputMode::EditingExpectancy,
        &app.life_expectancy().to_string(),
    );

    let lines = vec![
        Line::from(Span::styled(QUOTE, styles::text_dim().add_modifier(Modifier::ITALIC))),
        Line::from(vec![
            Span::styled("Birthday ", styles::text_dim()),
            birth_span,
            Span::raw("   "),
            Span::styled("Expectancy ", styles::text_dim()),
            expectancy_span,
            Span::raw("   "),
            Span::styled("Deathday ", styles::text_dim()),
            Span::styled(deathday, styles::field_value()),
        ]),
        Line::from(Span::styled(
            match app.input_mode {
                InputMode::Normal => "b birthday · e expectancy · c center · p particles · ? help · q quit",
                _ => "Enter save · Esc cancel",
            },
            styles::text_hint(),
        )),
    ];
    frame.render_widget(Paragraph::new(lines), inner);
}

fn pref_field_span<'a>(app: &'a App, mode: InputMode, value: &str) -> Span<'a> {
    if app.input_mode == mode {
        Span::styled(format!("{}█", app.edit_buffer), styles::field_editing())
    } else {
        Span::styled(format!("[{value}]"), styles::field_value())
    }
}

// === Year view ===

fn year_grid_inner(content: Rect) -> Rect {
    Block::default().borders(Borders::ALL).inner(content)
}

fn render_year_view(frame: &mut Frame, app: &App, area: Rect) {
    let block = Block::default()
        .title(" Your Life in Weeks ")
        .title_style(styles::title())
        .borders(Borders::ALL)
        .border_style(if app.depth() == 0 {
            styles::border_focused()
        } else {
            styles::border_dim()
        });
    let inner = block.inner(area);
    frame.render_widget(block, area);

    if app.birth_date.is_none() {
        let msg = vec![
            Line::from(""),
            Line::from("Please enter a valid birth date to see your life map."),
            Line::from(""),
            Line::from(Span::styled("press b to edit it", styles::text_hint())),
        ];
        frame.render_widget(Paragraph::new(msg).alignment(Alignment::Center), inner);
        return;
    }

    let buf = frame.buffer_mut();
    let life = app.life_expectancy() as usize;
    let total = app.total_weeks();
    let year_frame = app.year_frame();
    let cursor_active = app.depth() == 0;
    let current_week = app.current_week_index();

    for screen_row in 0..inner.height {
        let vr = app.year_scroll + screen_row as usize;
        let y = inner.y + screen_row;

        if vr < PHANTOM_PRE_YEARS {
            let label = -((PHANTOM_PRE_YEARS - vr) as i64);
            render_phantom_row(buf, inner, y, label);
        } else if vr == PHANTOM_PRE_YEARS {
            render_divider(buf, inner, y, colors::BIRTH_LINE);
        } else if vr < PHANTOM_PRE_YEARS + 1 + life {
            let year = vr - PHANTOM_PRE_YEARS - 1;
            render_life_row(
                buf,
                inner,
                y,
                year,
                app,
                total,
                year_frame.cursor,
                cursor_active,
                current_week,
            );
        } else if vr == PHANTOM_PRE_YEARS + 1 + life {
            render_divider(buf, inner, y, colors::DEATH_LINE);
        } else if vr < app.year_virtual_rows() {
            let label = (life + (vr - PHANTOM_PRE_YEARS - 2 - life)) as i64;
            render_phantom_row(buf, inner, y, label);
        }
    }
}

fn render_phantom_row(buf: &mut ratatui::buffer::Buffer, inner: Rect, y: u16, label: i64) {
    buf.set_string(
        inner.x,
        y,
        format!("{label:>4} "),
        styles::text_hint(),
    );
    let style = Style::default().fg(colors::CELL_PHANTOM);
    for col in 0..calendar::WEEKS_PER_YEAR as u16 {
        let x = inner.x + YEAR_LABEL_WIDTH + col * WEEK_CELL_WIDTH;
        if x + WEEK_CELL_WIDTH <= inner.x + inner.width {
            buf.set_string(x, y, "░░", style);
        }
    }
}

fn render_divider(buf: &mut ratatui::buffer::Buffer, inner: Rect, y: u16, color: Color) {
    let width = (YEAR_LABEL_WIDTH + calendar::WEEKS_PER_YEAR as u16 * WEEK_CELL_WIDTH)
        .min(inner.width) as usize;
    buf.set_string(
        inner.x,
        y,
        "─".repeat(width),
        Style::default().fg(color),
    );
}

#[allow(clippy::too_many_arguments)]
fn render_life_row(
    buf: &mut ratatui::buffer::Buffer,
    inner: Rect,
    y: u16,
    year: usize,
    app: &App,
    total_weeks: i64,
    cursor: usize,
    cursor_active: bool,
    current_week: Option<i64>,
) {
    buf.set_string(inner.x, y, format!("{year:>4} "), styles::text_dim());

    for col in 0..calendar::WEEKS_PER_YEAR as usize {
        let idx = year * calendar::WEEKS_PER_YEAR as usize + col;
        if idx as i64 >= total_weeks {
            break;
        }
        let x = inner.x + YEAR_LABEL_WIDTH + col as u16 * WEEK_CELL_WIDTH;
        if x + WEEK_CELL_WIDTH > inner.x + inner.width {
            break;
        }

        let is_current = current_week == Some(idx as i64);
        let color = if is_current {
            colors::CELL_CURRENT
        } else if current_week.map_or(false, |cw| (idx as i64) < cw) {
            colors::CELL_PAST
        } else {
            colors::CELL_FUTURE
        };

        // The current week pulses; the cursor shimmers over the cell color.
        let symbol = if is_current && app.frame_count / 10 % 2 == 0 {
            "▓▓"
        } else {
            "██"
        };
        let mut style = Style::default().fg(color);
        if cursor_active && idx == cursor {
            style = style.bg(colors::FG_PRIMARY);
            buf.set_string(x, y, "▒▒", style);
            continue;
        }
        buf.set_string(x, y, symbol, style);
    }
}

// === Drill-down modals ===

/// Geometry of a drill-down grid: columns, cell size and gap.
struct GridGeometry {
    cols: u16,
    count: u16,
    cell_w: u16,
    cell_h: u16,
    gap: u16,
}

fn grid_geometry(view: &View) -> GridGeometry {
    match view {
        View::Year => GridGeometry {
            cols: calendar::WEEKS_PER_YEAR as u16,
            count: 0,
            cell_w: WEEK_CELL_WIDTH,
            cell_h: 1,
            gap: 0,
        },
        View::Week { .. } => GridGeometry {
            cols: 7,
            count: 7,
            cell_w: 7,
            cell_h: 3,
            gap: 1,
        },
        View::Day { .. } => GridGeometry {
            cols: 8,
            count: 24,
            cell_w: 5,
            cell_h: 2,
            gap: 1,
        },
        View::Hour { .. } | View::Minute { .. } => GridGeometry {
            cols: 10,
            count: 60,
            cell_w: 4,
            cell_h: 1,
            gap: 1,
        },
    }
}

/// Centered modal rectangle sized for the view's grid.
fn modal_area(view: &View, area: Rect) -> Rect {
    let geo = grid_geometry(view);
    let rows = geo.count.div_ceil(geo.cols);
    // Border (2) + title row + blank row + grid + hint row.
    let width = (geo.cols * (geo.cell_w + geo.gap) - geo.gap + 4).min(area.width);
    let height = (rows * (geo.cell_h + if geo.cell_h > 1 { 1 } else { 0 }) + 5).min(area.height);
    Rect {
        x: area.x + (area.width.saturating_sub(width)) / 2,
        y: area.y + (area.height.saturating_sub(height)) / 2,
        width,
        height,
    }
}

fn modal_title(view: &View) -> String {
    match view {
        View::Year => String::new(),
        View::Week { start } => format!(" Week of {} ", start.format("%B %-d, %Y")),
        View::Day { start } => format!(" {} — Hours ", start.format("%A, %B %-d, %Y")),
        View::Hour { start } => format!(" {} — Minutes ", start.format("%H:%M on %B %-d")),
        View::Minute { start } => format!(" {} — Seconds ", start.format("%H:%M")),
    }
}

fn cell_label(view: &View, start: NaiveDateTime, idx: usize) -> String {
    match view {
        View::Year => String::new(),
        View::Week { .. } => format!("{} {}", start.format("%a"), start.day()),
        View::Day { .. } => format!("{:02}", idx),
        View::Hour { .. } | View::Minute { .. } => format!("{:02}", idx),
    }
}

fn render_drill_down_modal(frame: &mut Frame, app: &App, area: Rect) {
    let view = app.frame.view;
    let modal = modal_area(&view, area);

    frame.render_widget(Clear, modal);
    let block = Block::default()
        .title(modal_title(&view))
        .title_style(styles::title_accent())
        .borders(Borders::ALL)
        .border_style(styles::border_focused())
        .style(Style::default().bg(colors::BG_MEDIUM));
    let inner = block.inner(modal);
    frame.render_widget(block, modal);

    // Hint row pinned to the bottom of the modal.
    let hint = match view {
        View::Minute { .. } => "Esc back",
        _ => "Enter drill down · Esc back",
    };
    if inner.height > 0 {
        frame.render_widget(
            Paragraph::new(Line::from(Span::styled(hint, styles::text_hint())))
                .alignment(Alignment::Center),
            Rect {
                x: inner.x,
                y: inner.y + inner.height - 1,
                width: inner.width,
                height: 1,
            },
        );
    }

    let geo = grid_geometry(&view);
    let origin_x = inner.x;
    let origin_y = inner.y + 1;
    let buf = frame.buffer_mut();

    for idx in 0..geo.count as usize {
        let col = idx as u16 % geo.cols;
        let row = idx as u16 / geo.cols;
        let x = origin_x + col * (geo.cell_w + geo.gap);
        let row_stride = geo.cell_h + if geo.cell_h > 1 { 1 } else { 0 };
        let y = origin_y + row * row_stride;
        if x + geo.cell_w > inner.x + inner.width || y + geo.cell_h > inner.y + inner.height {
            continue;
        }

        let Some(start) = app.cell_start(&view, idx) else {
            continue;
        };
        let (class, progress) = app.classify_cell(&view, idx);
        let is_cursor = idx == app.frame.cursor;
        render_bucket_cell(
            buf,
            Rect {
                x,
                y,
                width: geo.cell_w,
                height: geo.cell_h,
            },
            &cell_label(&view, start, idx),
            &view,
            class,
            progress,
            is_cursor,
            app.frame_count,
        );
    }
}

/// Paint one bucket cell: background by classification, a fractional fill
/// for the current bucket, and the label on top.
#[allow(clippy::too_many_arguments)]
fn render_bucket_cell(
    buf: &mut ratatui::buffer::Buffer,
    rect: Rect,
    label: &str,
    view: &View,
    class: BucketClass,
    progress: Option<f64>,
    is_cursor: bool,
    frame_count: u64,
) {
    let is_second_cell = matches!(view, View::Minute { .. });

    let base_bg = match class {
        BucketClass::Past => colors::CELL_PAST,
        BucketClass::Future => colors::CELL_FUTURE,
        BucketClass::Current => {
            if is_second_cell {
                // The current second pulses instead of filling.
                if frame_count / 8 % 2 == 0 {
                    colors::CELL_CURRENT
                } else {
                    colors::CELL_FUTURE
                }
            } else {
                colors::CELL_FUTURE
            }
        }
    };

    for dy in 0..rect.height {
        for dx in 0..rect.width {
            let pos = (rect.x + dx, rect.y + dy);
            let mut bg = base_bg;

            // Rising fill for the current bucket: bottom rows first, then a
            // partial sweep across the row in progress.
            if class == BucketClass::Current && !is_second_cell {
                if let Some(p) = progress {
                    let total_cells = (rect.width * rect.height) as f64;
                    let filled = (p * total_cells).floor() as u16;
                    // Count cells from the bottom-left, row by row.
                    let cell_rank = (rect.height - 1 - dy) * rect.width + dx;
                    if cell_rank < filled {
                        bg = colors::CELL_CURRENT;
                    }
                }
            }

            buf[pos].set_char(' ');
            buf[pos].set_style(Style::default().bg(bg));
        }
    }

    // Label centered on the top row of the cell. No background of its own,
    // so the fill sweep stays visible under the text.
    let label_fg = match class {
        BucketClass::Past => colors::BG_DARK,
        _ => colors::FG_PRIMARY,
    };
    let mut style = Style::default().fg(label_fg);
    if is_cursor {
        style = style
            .fg(colors::CELL_CURRENT)
            .add_modifier(Modifier::BOLD | Modifier::UNDERLINED);
    }
    let label: String = label.chars().take(rect.width as usize).collect();
    let x = rect.x + (rect.width.saturating_sub(label.len() as u16)) / 2;
    buf.set_string(x, rect.y, &label, style);
}

// === Footer ===

fn render_footer(frame: &mut Frame, app: &App, area: Rect) {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(styles::border_dim())
        .style(Style::default().bg(colors::BG_MEDIUM));
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let summary = app.selected_summary().unwrap_or_default();
    let clock = app.clock_label();
    let pad = usize::from(inner.width)
        .saturating_sub(summary.chars().count() + clock.len() + 3);
    let top = Line::from(vec![
        Span::styled("▸ ", styles::text_dim()),
        Span::styled(summary, styles::text()),
        Span::raw(" ".repeat(pad)),
        Span::styled(clock, styles::field_value()),
    ]);

    // Recent log entries only; old messages fade out of the footer.
    let bottom = match app
        .logs
        .last()
        .filter(|entry| entry.timestamp.elapsed() < std::time::Duration::from_secs(8))
    {
        Some(entry) => {
            let style = match entry.level {
                LogLevel::Info => styles::text_dim(),
                LogLevel::Warning => styles::warning(),
                LogLevel::Error => styles::error(),
            };
            Line::from(Span::styled(entry.message.clone(), style))
        }
        None => Line::from(""),
    };

    frame.render_widget(Paragraph::new(vec![top, bottom]), inner);
}

// === Help overlay ===

fn render_help_overlay(frame: &mut Frame, area: Rect) {
    let width = 46.min(area.width);
    let height = 14.min(area.height);
    let modal = Rect {
        x: area.x + (area.width.saturating_sub(width)) / 2,
        y: area.y + (area.height.saturating_sub(height)) / 2,
        width,
        height,
    };

    frame.render_widget(Clear, modal);
    let block = Block::default()
        .title(" Help ")
        .title_style(styles::title_accent())
        .borders(Borders::ALL)
        .border_style(styles::border_focused())
        .style(Style::default().bg(colors::BG_MEDIUM));
    let inner = block.inner(modal);
    frame.render_widget(block, modal);

    let bindings = [
        ("←↓↑→ / hjkl", "move selection"),
        ("Enter / click", "open week, day, hour, minute"),
        ("Esc / Bksp", "back one level"),
        ("b", "edit birth date"),
        ("e", "edit life expectancy"),
        ("c", "center on current week"),
        ("PgUp / PgDn", "scroll the grid"),
        ("p", "toggle particles"),
        ("?", "toggle this help"),
        ("q / Ctrl-C", "quit"),
    ];
    let lines: Vec<Line> = bindings
        .iter()
        .map(|(keys, what)| {
            Line::from(vec![
                Span::styled(format!("  {keys:<14}"), styles::field_value()),
                Span::styled(*what, styles::text()),
            ])
        })
        .collect();
    frame.render_widget(Paragraph::new(lines), inner);
}

// === Mouse hit-testing ===

/// Map a click at `(x, y)` to a cell index of the active view, using the
/// same geometry the renderer used for the current frame.
pub fn hit_test(app: &App, area: Rect, x: u16, y: u16) -> Option<usize> {
    let chunks = main_chunks(area);

    if app.depth() == 0 {
        return year_hit_test(app, chunks[1], x, y);
    }

    let view = app.frame.view;
    let modal = modal_area(&view, area);
    let inner = Block::default().borders(Borders::ALL).inner(modal);
    let geo = grid_geometry(&view);
    let origin_y = inner.y + 1;

    if x < inner.x || y < origin_y {
        return None;
    }
    let rx = x - inner.x;
    let ry = y - origin_y;

    let col = rx / (geo.cell_w + geo.gap);
    if col >= geo.cols || rx % (geo.cell_w + geo.gap) >= geo.cell_w {
        return None;
    }
    let row_stride = geo.cell_h + if geo.cell_h > 1 { 1 } else { 0 };
    let row = ry / row_stride;
    if ry % row_stride >= geo.cell_h {
        return None;
    }

    let idx = (row * geo.cols + col) as usize;
    (idx < geo.count as usize).then_some(idx)
}

fn year_hit_test(app: &App, content: Rect, x: u16, y: u16) -> Option<usize> {
    app.birth_date?;
    let inner = year_grid_inner(content);
    if x < inner.x + YEAR_LABEL_WIDTH || y < inner.y {
        return None;
    }
    if x >= inner.x + inner.width || y >= inner.y + inner.height {
        return None;
    }

    let vr = app.year_scroll + usize::from(y - inner.y);
    let life = app.life_expectancy() as usize;
    if vr <= PHANTOM_PRE_YEARS || vr > PHANTOM_PRE_YEARS + life {
        return None; // phantom rows and dividers are not clickable
    }
    let year = vr - PHANTOM_PRE_YEARS - 1;

    let col = usize::from((x - inner.x - YEAR_LABEL_WIDTH) / WEEK_CELL_WIDTH);
    if col >= calendar::WEEKS_PER_YEAR as usize {
        return None;
    }

    let idx = year * calendar::WEEKS_PER_YEAR as usize + col;
    ((idx as i64) < app.total_weeks()).then_some(idx)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::MemStore;
    use chrono::NaiveDate;

    fn test_app() -> App {
        let now = NaiveDate::from_ymd_opt(2023, 8, 15)
            .unwrap()
            .and_hms_opt(12, 0, 0)
            .unwrap();
        let mut app = App::new(Box::new(MemStore::default()), now);
        app.tick(120, 40);
        app
    }

    #[test]
    fn year_hit_maps_back_to_week_index() {
        let mut app = test_app();
        app.year_scroll = 0;
        let area = Rect::new(0, 0, 120, 40);
        let chunks = main_chunks(area);
        let inner = year_grid_inner(chunks[1]);

        // First life row sits below 16 phantom rows and the birth divider.
        let first_life_y = inner.y + (PHANTOM_PRE_YEARS as u16) + 1;
        let x = inner.x + YEAR_LABEL_WIDTH; // column 0

        assert_eq!(hit_test(&app, area, x, first_life_y), Some(0));
        assert_eq!(
            hit_test(&app, area, x + 2 * WEEK_CELL_WIDTH, first_life_y),
            Some(2)
        );
        assert_eq!(
            hit_test(&app, area, x, first_life_y + 1),
            Some(calendar::WEEKS_PER_YEAR as usize)
        );
    }

    #[test]
    fn phantom_rows_and_gutter_are_not_clickable() {
        let mut app = test_app();
        app.year_scroll = 0;
        let area = Rect::new(0, 0, 120, 40);
        let chunks = main_chunks(area);
        let inner = year_grid_inner(chunks[1]);

        // Phantom row at the very top.
        assert_eq!(
            hit_test(&app, area, inner.x + YEAR_LABEL_WIDTH, inner.y),
            None
        );
        // Birth divider row.
        let divider_y = inner.y + PHANTOM_PRE_YEARS as u16;
        assert_eq!(
            hit_test(&app, area, inner.x + YEAR_LABEL_WIDTH, divider_y),
            None
        );
        // Year label gutter.
        let first_life_y = divider_y + 1;
        assert_eq!(hit_test(&app, area, inner.x, first_life_y), None);
    }

    #[test]
    fn year_hit_honors_scroll_offset() {
        let mut app = test_app();
        app.year_scroll = PHANTOM_PRE_YEARS + 1; // life year 0 is the top row
        let area = Rect::new(0, 0, 120, 40);
        let chunks = main_chunks(area);
        let inner = year_grid_inner(chunks[1]);

        assert_eq!(
            hit_test(&app, area, inner.x + YEAR_LABEL_WIDTH, inner.y),
            Some(0)
        );
    }

    #[test]
    fn modal_hit_maps_to_sub_bucket_cells() {
        let mut app = test_app();
        let week = app.current_week_index().unwrap() as usize;
        app.activate_cell(week); // now in the week view
        let area = Rect::new(0, 0, 120, 40);

        let view = app.frame.view;
        let modal = modal_area(&view, area);
        let inner = Block::default().borders(Borders::ALL).inner(modal);
        let geo = grid_geometry(&view);

        // Top-left of the first cell.
        assert_eq!(hit_test(&app, area, inner.x, inner.y + 1), Some(0));
        // Second column.
        assert_eq!(
            hit_test(&app, area, inner.x + geo.cell_w + geo.gap, inner.y + 1),
            Some(1)
        );
        // Gap between cells misses.
        assert_eq!(hit_test(&app, area, inner.x + geo.cell_w, inner.y + 1), None);
    }

    #[test]
    fn invalid_birth_date_disables_year_hits() {
        let now = NaiveDate::from_ymd_opt(2023, 8, 15)
            .unwrap()
            .and_hms_opt(12, 0, 0)
            .unwrap();
        let mut app = App::new(Box::new(MemStore::default()), now);
        app.prefs.set_birth_date("garbage");
        app.birth_date = None;
        app.tick(120, 40);

        let area = Rect::new(0, 0, 120, 40);
        let chunks = main_chunks(area);
        let inner = year_grid_inner(chunks[1]);
        let first_life_y = inner.y + PHANTOM_PRE_YEARS as u16 + 1;
        assert_eq!(
            hit_test(&app, area, inner.x + YEAR_LABEL_WIDTH, first_life_y),
            None
        );
    }
}
