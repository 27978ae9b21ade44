//! Plotters-powered per-product bar chart for Ratatui.
//!
//! The chart lives in a [`ChartSlot`] owned by the TUI. Installing a new series
//! releases the previous [`ChartHandle`] first, so repeated filtering never
//! accumulates chart state.
//!
//! Plotters output is drawn into the Ratatui buffer with `plotters-ratatui-backend`.

use plotters::prelude::*;
// Ratatui's `Color` below shadows the prelude's trait, which `filled()` needs.
use plotters::style::Color as _;
use plotters_ratatui_backend::widget_fn;
use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Color, Style},
    widgets::Widget,
};
use rust_decimal::prelude::ToPrimitive;

use crate::domain::ChartSeries;

/// Bar fill colors, cycled when there are more products than entries.
pub const PALETTE: [(u8, u8, u8); 8] = [
    (255, 99, 132),
    (54, 162, 235),
    (255, 206, 86),
    (75, 192, 192),
    (153, 102, 255),
    (255, 159, 64),
    (99, 255, 132),
    (132, 99, 255),
];

#[derive(Debug, Clone, PartialEq)]
pub struct Bar {
    pub label: String,
    pub value: f64,
    pub color: (u8, u8, u8),
}

/// A built chart: bars, bounds and a generation number for bookkeeping.
#[derive(Debug, Clone, PartialEq)]
pub struct ChartHandle {
    generation: u64,
    bars: Vec<Bar>,
    y_bounds: [f64; 2],
}

impl ChartHandle {
    fn build(generation: u64, series: &ChartSeries) -> Self {
        let bars: Vec<Bar> = series
            .iter()
            .enumerate()
            .map(|(i, (label, total))| Bar {
                label: label.to_string(),
                value: total.to_f64().unwrap_or(0.0),
                color: PALETTE[i % PALETTE.len()],
            })
            .collect();

        let (mut y_min, mut y_max) = (0.0_f64, 0.0_f64);
        for bar in &bars {
            y_min = y_min.min(bar.value);
            y_max = y_max.max(bar.value);
        }
        if y_max <= y_min {
            y_max = y_min + 1.0;
        }
        let pad = (y_max - y_min) * 0.05;
        let y_bounds = [if y_min < 0.0 { y_min - pad } else { 0.0 }, y_max + pad];

        Self {
            generation,
            bars,
            y_bounds,
        }
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn bars(&self) -> &[Bar] {
        &self.bars
    }

    pub fn y_bounds(&self) -> [f64; 2] {
        self.y_bounds
    }
}

/// Owner of the chart currently on screen.
#[derive(Debug, Default)]
pub struct ChartSlot {
    current: Option<ChartHandle>,
    generation: u64,
}

impl ChartSlot {
    /// Release the current chart, then build and keep one for `series`.
    pub fn install(&mut self, series: &ChartSeries) -> &ChartHandle {
        if let Some(old) = self.current.take() {
            tracing::debug!(generation = old.generation, "releasing chart");
            drop(old);
        }
        self.generation += 1;
        self.current.insert(ChartHandle::build(self.generation, series))
    }

    pub fn current(&self) -> Option<&ChartHandle> {
        self.current.as_ref()
    }
}

/// Render-only widget over a [`ChartHandle`].
pub struct BarPlottersChart<'a> {
    pub chart: &'a ChartHandle,
    pub y_label: &'a str,
    pub fmt_y: fn(f64) -> String,
}

impl<'a> Widget for BarPlottersChart<'a> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        // Plotters may fail to lay out a chart in a tiny area; show a hint instead.
        if area.width < 20 || area.height < 8 {
            buf.set_string(
                area.x,
                area.y,
                "Chart area too small (resize terminal).",
                Style::default().fg(Color::Yellow),
            );
            return;
        }

        let bars = self.chart.bars();
        if bars.is_empty() {
            buf.set_string(area.x, area.y, "No sales to chart.", Style::default().fg(Color::Yellow));
            return;
        }

        let [y0, y1] = self.chart.y_bounds();
        if !(y0.is_finite() && y1.is_finite()) || y1 <= y0 {
            return;
        }
        let x1 = bars.len() as f64;

        let widget = widget_fn(move |root| {
            let mut chart = ChartBuilder::on(&root)
                .margin(1)
                .set_label_area_size(LabelAreaPosition::Left, 8)
                .set_label_area_size(LabelAreaPosition::Bottom, 1)
                .build_cartesian_2d(0.0..x1, y0..y1)?;

            // Product names go in the legend under the chart; the x axis only
            // carries bar positions, so no x labels here.
            chart
                .configure_mesh()
                .disable_x_mesh()
                .disable_y_mesh()
                .x_labels(0)
                .y_labels(5)
                .y_desc(self.y_label)
                .y_label_formatter(&|v| (self.fmt_y)(*v))
                .label_style(("sans-serif", 10).into_font().color(&WHITE))
                .axis_style(&WHITE)
                .draw()?;

            chart.draw_series(bars.iter().enumerate().map(|(i, bar)| {
                let (r, g, b) = bar.color;
                let left = i as f64 + 0.15;
                let right = i as f64 + 0.85;
                Rectangle::new([(left, 0.0), (right, bar.value)], RGBColor(r, g, b).filled())
            }))?;

            Ok(())
        });

        widget.render(area, buf);
    }
}
