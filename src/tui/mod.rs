//! Ratatui-based terminal UI.
//!
//! The TUI shows totals, the sales table and the per-product bar chart for the
//! active filter. Fetches run on worker threads; results come back over a
//! channel and go through [`Session::complete`], which drops stale ones.

use std::io;
use std::sync::Arc;
use std::sync::mpsc::{self, Receiver, Sender};
use std::time::{Duration, Instant};

use crossterm::{
    event::{self, Event, KeyCode, KeyEventKind},
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use ratatui::{
    Terminal,
    backend::CrosstermBackend,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span, Text},
    widgets::{Block, Borders, Clear, Paragraph, Row, Table},
};

use crate::app::pipeline::{DashboardRun, load_and_render};
use crate::app::session::{Completion, PendingLoad, Session};
use crate::config::Settings;
use crate::data::SalesSource;
use crate::error::{AppError, LoadError};
use crate::report::format::truncate;
use crate::report::{CURRENCY_PREFIX, describe_filter, format_totals};

mod bar_chart;

use bar_chart::{BarPlottersChart, ChartSlot};

type LoadResult = (u64, Result<DashboardRun, LoadError>);

/// Start the TUI against `source`.
pub fn run(source: Arc<dyn SalesSource>, settings: &Settings, compose_filters: bool) -> Result<(), AppError> {
    let _guard = TerminalGuard::new()?;

    let backend = CrosstermBackend::new(io::stdout());
    let mut terminal = Terminal::new(backend)
        .map_err(|e| AppError::new(4, format!("Failed to initialize terminal: {e}")))?;

    let mut app = App::new(source, settings, compose_filters);
    app.reload();
    app.event_loop(&mut terminal)
}

/// Ensures the terminal is restored (raw mode, alternate screen) on exit.
struct TerminalGuard;

impl TerminalGuard {
    fn new() -> Result<Self, AppError> {
        enable_raw_mode().map_err(|e| AppError::new(4, format!("Failed to enable raw mode: {e}")))?;
        if let Err(e) = execute!(io::stdout(), EnterAlternateScreen) {
            let _ = disable_raw_mode();
            return Err(AppError::new(4, format!("Failed to enter alternate screen: {e}")));
        }
        Ok(Self)
    }
}

impl Drop for TerminalGuard {
    fn drop(&mut self) {
        let _ = disable_raw_mode();
        let _ = execute!(io::stdout(), LeaveAlternateScreen);
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum DateField {
    Start,
    End,
}

struct App {
    session: Session,
    source: Arc<dyn SalesSource>,
    tx: Sender<LoadResult>,
    rx: Receiver<LoadResult>,
    chart: ChartSlot,
    table_offset: usize,
    editing: Option<DateField>,
    start_input: String,
    end_input: String,
}

impl App {
    fn new(source: Arc<dyn SalesSource>, settings: &Settings, compose_filters: bool) -> Self {
        let (tx, rx) = mpsc::channel();
        Self {
            session: Session::new(settings.banner_ttl, compose_filters),
            source,
            tx,
            rx,
            chart: ChartSlot::default(),
            table_offset: 0,
            editing: None,
            start_input: String::new(),
            end_input: String::new(),
        }
    }

    fn event_loop<B: ratatui::backend::Backend>(&mut self, terminal: &mut Terminal<B>) -> Result<(), AppError> {
        let mut needs_redraw = true;
        loop {
            if self.drain_results() {
                needs_redraw = true;
            }
            if self.session.tick(Instant::now()) {
                needs_redraw = true;
            }

            if needs_redraw {
                terminal
                    .draw(|f| self.draw(f))
                    .map_err(|e| AppError::new(4, format!("Terminal draw error: {e}")))?;
                needs_redraw = false;
            }

            if !event::poll(Duration::from_millis(100))
                .map_err(|e| AppError::new(4, format!("Event poll error: {e}")))?
            {
                continue;
            }

            match event::read().map_err(|e| AppError::new(4, format!("Event read error: {e}")))? {
                Event::Key(key) => {
                    if key.kind != KeyEventKind::Press {
                        continue;
                    }
                    if self.handle_key(key.code) {
                        break;
                    }
                    needs_redraw = true;
                }
                Event::Resize(_, _) => {
                    needs_redraw = true;
                }
                _ => {}
            }
        }
        Ok(())
    }

    /// Apply every finished load. Returns true when anything arrived.
    fn drain_results(&mut self) -> bool {
        let mut changed = false;
        while let Ok((seq, result)) = self.rx.try_recv() {
            changed = true;
            if self.session.complete(seq, result, Instant::now()) == Completion::Applied {
                if let Some(run) = self.session.run() {
                    self.chart.install(&run.views.chart);
                }
                self.table_offset = 0;
            }
        }
        changed
    }

    fn spawn(&self, pending: PendingLoad) {
        let source = Arc::clone(&self.source);
        let tx = self.tx.clone();
        std::thread::spawn(move || {
            let result = load_and_render(source.as_ref(), &pending.selection);
            // The receiver is gone only when the UI has exited.
            let _ = tx.send((pending.seq, result));
        });
    }

    fn reload(&mut self) {
        self.start_input.clear();
        self.end_input.clear();
        let pending = self.session.full_load();
        self.spawn(pending);
    }

    fn handle_key(&mut self, code: KeyCode) -> bool {
        if let Some(field) = self.editing {
            self.handle_date_edit(field, code);
            return false;
        }

        match code {
            KeyCode::Char('q') => return true,
            KeyCode::Char('f') => {
                if let Some(range) = self.session.selection().range {
                    self.start_input = range.start().to_string();
                    self.end_input = range.end().to_string();
                }
                self.editing = Some(DateField::Start);
                self.session
                    .set_status("Start date (YYYY-MM-DD). Enter for end date, Esc to cancel.");
            }
            KeyCode::Char('p') => {
                let pending = self.session.cycle_product(true);
                self.spawn(pending);
            }
            KeyCode::Char('P') => {
                let pending = self.session.cycle_product(false);
                self.spawn(pending);
            }
            KeyCode::Char('r') => self.reload(),
            KeyCode::Up => self.table_offset = self.table_offset.saturating_sub(1),
            KeyCode::Down => {
                let rows = self.session.run().map_or(0, |r| r.views.table.len());
                if self.table_offset + 1 < rows {
                    self.table_offset += 1;
                }
            }
            _ => {}
        }
        false
    }

    fn handle_date_edit(&mut self, field: DateField, code: KeyCode) {
        let input = match field {
            DateField::Start => &mut self.start_input,
            DateField::End => &mut self.end_input,
        };

        match code {
            KeyCode::Esc => {
                self.editing = None;
                self.session.set_status("Date filter canceled.");
            }
            KeyCode::Backspace => {
                input.pop();
            }
            KeyCode::Char(c) if c.is_ascii_digit() || c == '-' => {
                if input.len() < 10 {
                    input.push(c);
                }
            }
            KeyCode::Tab | KeyCode::Enter if field == DateField::Start => {
                self.editing = Some(DateField::End);
                self.session
                    .set_status("End date (YYYY-MM-DD). Enter to apply, Esc to cancel.");
            }
            KeyCode::Tab => self.editing = Some(DateField::Start),
            KeyCode::Enter => {
                self.editing = None;
                if let Some(pending) = self
                    .session
                    .submit_date_range(&self.start_input, &self.end_input, Instant::now())
                {
                    self.spawn(pending);
                }
            }
            _ => {}
        }
    }

    fn draw(&mut self, frame: &mut ratatui::Frame<'_>) {
        let size = frame.area();
        let banner_height = if self.session.banner().is_some() { 3 } else { 0 };
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(4),
                Constraint::Min(0),
                Constraint::Length(banner_height),
                Constraint::Length(3),
            ])
            .split(size);

        self.draw_header(frame, chunks[0]);
        self.draw_body(frame, chunks[1]);
        self.draw_banner(frame, chunks[2]);
        self.draw_footer(frame, chunks[3]);
    }

    fn draw_header(&self, frame: &mut ratatui::Frame<'_>, area: Rect) {
        let mut lines: Vec<Line> = Vec::new();

        let totals = self
            .session
            .run()
            .map(|r| format_totals(&r.views.totals).trim_end().to_string())
            .unwrap_or_else(|| "Sales: - | Revenue: -".to_string());
        let mut first = vec![
            Span::styled("dash", Style::default().fg(Color::Cyan)),
            Span::raw(" | "),
            Span::styled(totals, Style::default().add_modifier(Modifier::BOLD)),
        ];
        if self.session.is_loading() {
            first.push(Span::styled("  loading…", Style::default().fg(Color::Yellow)));
        }
        lines.push(Line::from(first));

        let selection = self.session.selection();
        let filter_line = match self.editing {
            Some(field) => {
                let marker = |f: DateField| if f == field { "▌" } else { "" };
                format!(
                    "from: {}{} | to: {}{}",
                    self.start_input,
                    marker(DateField::Start),
                    self.end_input,
                    marker(DateField::End),
                )
            }
            None => describe_filter(selection.range.as_ref(), &selection.product),
        };
        lines.push(Line::from(Span::styled(filter_line, Style::default().fg(Color::Gray))));

        let p = Paragraph::new(Text::from(lines)).block(Block::default().borders(Borders::ALL));
        frame.render_widget(p, area);
    }

    fn draw_body(&self, frame: &mut ratatui::Frame<'_>, area: Rect) {
        let chunks = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Percentage(55), Constraint::Percentage(45)])
            .split(area);

        self.draw_table(frame, chunks[0]);
        self.draw_chart(frame, chunks[1]);
    }

    fn draw_table(&self, frame: &mut ratatui::Frame<'_>, area: Rect) {
        let Some(run) = self.session.run() else {
            let msg = Paragraph::new("Waiting for data...")
                .style(Style::default().fg(Color::Yellow))
                .block(Block::default().title("Sales").borders(Borders::ALL));
            frame.render_widget(msg, area);
            return;
        };

        let rows_total = run.views.table.len();
        let title = if rows_total == 0 {
            "Sales (none)".to_string()
        } else {
            format!("Sales {}/{}", self.table_offset + 1, rows_total)
        };

        // Borders and the header row take three lines.
        let visible = area.height.saturating_sub(3) as usize;
        let rows = run
            .views
            .table
            .iter()
            .skip(self.table_offset)
            .take(visible)
            .map(|row| {
                Row::new(vec![
                    row.display_date.clone(),
                    truncate(&row.product, 28),
                    row.quantity.to_string(),
                    row.display_value.clone(),
                ])
            });

        let header = Row::new(vec!["Date", "Product", "Qty", "Value"])
            .style(Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD));
        let widths = [
            Constraint::Length(10),
            Constraint::Min(12),
            Constraint::Length(5),
            Constraint::Length(14),
        ];
        let table = Table::new(rows, widths)
            .header(header)
            .block(Block::default().title(title).borders(Borders::ALL));
        frame.render_widget(table, area);
    }

    fn draw_chart(&self, frame: &mut ratatui::Frame<'_>, area: Rect) {
        let block = Block::default().title("Revenue by product").borders(Borders::ALL);
        let inner = block.inner(area);
        frame.render_widget(block, area);
        frame.render_widget(Clear, inner);

        let Some(chart) = self.chart.current() else {
            let msg = Paragraph::new("Waiting for data...").style(Style::default().fg(Color::Yellow));
            frame.render_widget(msg, inner);
            return;
        };

        let legend_height = (chart.bars().len() as u16).min(inner.height / 2);
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Min(0), Constraint::Length(legend_height)])
            .split(inner);

        let y_label = format!("revenue ({CURRENCY_PREFIX})");
        let widget = BarPlottersChart {
            chart,
            y_label: &y_label,
            fmt_y: fmt_axis_money,
        };
        frame.render_widget(widget, chunks[0]);

        let legend: Vec<Line> = chart
            .bars()
            .iter()
            .map(|bar| {
                let (r, g, b) = bar.color;
                Line::from(vec![
                    Span::styled("■ ", Style::default().fg(Color::Rgb(r, g, b))),
                    Span::raw(truncate(&bar.label, 24)),
                    Span::styled(format!("  {:.2}", bar.value), Style::default().fg(Color::Gray)),
                ])
            })
            .collect();
        frame.render_widget(Paragraph::new(Text::from(legend)), chunks[1]);
    }

    fn draw_banner(&self, frame: &mut ratatui::Frame<'_>, area: Rect) {
        let Some(banner) = self.session.banner() else {
            return;
        };
        let p = Paragraph::new(banner.message())
            .style(Style::default().fg(Color::White).bg(Color::Red).add_modifier(Modifier::BOLD))
            .block(Block::default().borders(Borders::ALL).title("Error"));
        frame.render_widget(p, area);
    }

    fn draw_footer(&self, frame: &mut ratatui::Frame<'_>, area: Rect) {
        let help = "f dates  p/P product  r reload  ↑/↓ scroll  q quit";
        let line = Line::from(vec![
            Span::styled(help, Style::default().fg(Color::Gray)),
            Span::raw(" | "),
            Span::styled(self.session.status(), Style::default().fg(Color::Yellow)),
        ]);
        let p = Paragraph::new(line).block(Block::default().borders(Borders::ALL));
        frame.render_widget(p, area);
    }
}

fn fmt_axis_money(v: f64) -> String {
    if v.abs() >= 1_000_000.0 {
        format!("{:.1}M", v / 1_000_000.0)
    } else if v.abs() >= 1_000.0 {
        format!("{:.0}k", v / 1_000.0)
    } else {
        format!("{v:.0}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn axis_labels_are_compact() {
        assert_eq!(fmt_axis_money(950.0), "950");
        assert_eq!(fmt_axis_money(12_400.0), "12k");
        assert_eq!(fmt_axis_money(2_340_000.0), "2.3M");
    }
}
