use crate::domain::errors::{DashboardError, RenderingResult};
use crate::domain::logging::{LogComponent, get_logger};
use crate::infrastructure::rendering::geometry::{
    CandleGeometry, MAX_TIME_TICKS, PRICE_GRIDLINES, PlotArea, PriceScale, bucket_at,
    candle_geometry, time_tick_indices,
};
use crate::presentation::view_model::{ChartLayout, ChartModel, ChartViewport, format_index_value};
use std::ops::Range;
use wasm_bindgen::{JsCast, JsValue};
use web_sys::{CanvasRenderingContext2d, HtmlCanvasElement};

fn js_error(context: &str, err: JsValue) -> DashboardError {
    DashboardError::Rendering(format!("{}: {:?}", context, err))
}

/// Canvas 2D candlestick renderer
pub struct CanvasChartRenderer {
    context: CanvasRenderingContext2d,
    width: u32,
    height: u32,
}

impl CanvasChartRenderer {
    pub fn new(canvas: &HtmlCanvasElement, width: u32, height: u32) -> RenderingResult<Self> {
        canvas.set_width(width);
        canvas.set_height(height);

        let context = canvas
            .get_context("2d")
            .map_err(|e| js_error("Failed to get 2D context", e))?
            .ok_or_else(|| DashboardError::Rendering("2D context unavailable".to_string()))?
            .dyn_into::<CanvasRenderingContext2d>()
            .map_err(|_| DashboardError::Rendering("Failed to cast to 2D context".to_string()))?;

        Ok(Self { context, width, height })
    }

    pub fn plot_area(&self) -> PlotArea {
        PlotArea::for_canvas(self.width as f64, self.height as f64)
    }

    /// Bucket under a canvas x-coordinate for the current zoom.
    pub fn bucket_at(&self, x: f64, chart: &ChartModel, viewport: ChartViewport) -> Option<usize> {
        bucket_at(x, &self.plot_area(), viewport.visible_range(chart.trace.len()))
    }

    /// Draw the whole chart. `selection` is the pixel span of an in-progress
    /// zoom drag.
    pub fn render(
        &self,
        chart: &ChartModel,
        viewport: ChartViewport,
        selection: Option<(f64, f64)>,
    ) -> RenderingResult<()> {
        let ctx = &self.context;
        let area = self.plot_area();
        let layout = chart.layout;

        // Transparent background: clear only, the card behind shows through
        ctx.clear_rect(0.0, 0.0, self.width as f64, self.height as f64);
        ctx.set_font("12px sans-serif");

        let range = viewport.visible_range(chart.trace.len());
        match candle_geometry(&chart.trace, range.clone(), &area) {
            Some((scale, candles)) => {
                self.draw_price_grid(layout, &area, &scale)?;
                self.draw_time_axis(chart, &area, range)?;
                for candle in &candles {
                    self.draw_candle(layout, candle);
                }
                get_logger().debug(
                    LogComponent::Infrastructure("CanvasChart"),
                    &format!("Rendered {} candles", candles.len()),
                );
            }
            None => self.draw_empty_grid(layout, &area),
        }

        if let Some((from, to)) = selection {
            self.draw_selection(&area, from, to);
        }

        ctx.set_fill_style_str(layout.font_color);
        ctx.set_font("16px sans-serif");
        ctx.fill_text(layout.title, area.left, area.top - 20.0)
            .map_err(|e| js_error("Failed to draw title", e))?;
        ctx.set_font("12px sans-serif");
        ctx.fill_text(layout.x_axis.title, area.left + area.width / 2.0, area.bottom() + 44.0)
            .map_err(|e| js_error("Failed to draw x-axis title", e))?;
        ctx.fill_text(layout.y_axis.title, 8.0, area.top - 6.0)
            .map_err(|e| js_error("Failed to draw y-axis title", e))?;

        Ok(())
    }

    fn draw_price_grid(&self, layout: &ChartLayout, area: &PlotArea, scale: &PriceScale) -> RenderingResult<()> {
        let ctx = &self.context;
        ctx.set_line_width(1.0);
        for price in scale.gridlines(PRICE_GRIDLINES) {
            let y = scale.y_for(price, area);
            ctx.set_stroke_style_str(layout.y_axis.grid_color);
            ctx.begin_path();
            ctx.move_to(area.left, y);
            ctx.line_to(area.right(), y);
            ctx.stroke();

            ctx.set_fill_style_str(layout.font_color);
            ctx.fill_text(&format_index_value((price * 100.0).round() / 100.0), 8.0, y + 4.0)
                .map_err(|e| js_error("Failed to draw price label", e))?;
        }
        Ok(())
    }

    fn draw_time_axis(&self, chart: &ChartModel, area: &PlotArea, range: Range<usize>) -> RenderingResult<()> {
        let ctx = &self.context;
        let slot = area.slot_width(range.len());
        for index in time_tick_indices(range.clone(), MAX_TIME_TICKS) {
            let x = area.left + slot * ((index - range.start) as f64 + 0.5);
            ctx.set_stroke_style_str(chart.layout.x_axis.grid_color);
            ctx.begin_path();
            ctx.move_to(x, area.top);
            ctx.line_to(x, area.bottom());
            ctx.stroke();

            if let Some(label) = chart.trace.x.get(index) {
                let text = label.to_string();
                let text_width = ctx
                    .measure_text(&text)
                    .map(|metrics| metrics.width())
                    .map_err(|e| js_error("Failed to measure label", e))?;
                ctx.set_fill_style_str(chart.layout.font_color);
                ctx.fill_text(&text, x - text_width / 2.0, area.bottom() + 18.0)
                    .map_err(|e| js_error("Failed to draw time label", e))?;
            }
        }
        Ok(())
    }

    fn draw_empty_grid(&self, layout: &ChartLayout, area: &PlotArea) {
        let ctx = &self.context;
        ctx.set_stroke_style_str(layout.y_axis.grid_color);
        ctx.set_line_width(1.0);
        for step in 0..PRICE_GRIDLINES {
            let y = area.top + area.height * step as f64 / (PRICE_GRIDLINES - 1) as f64;
            ctx.begin_path();
            ctx.move_to(area.left, y);
            ctx.line_to(area.right(), y);
            ctx.stroke();
        }
    }

    fn draw_candle(&self, layout: &ChartLayout, candle: &CandleGeometry) {
        let ctx = &self.context;
        let color = if candle.increasing { layout.increasing_color } else { layout.decreasing_color };

        // Wick
        ctx.set_stroke_style_str(color);
        ctx.set_line_width(1.0);
        ctx.begin_path();
        ctx.move_to(candle.x_center, candle.high_y);
        ctx.line_to(candle.x_center, candle.low_y);
        ctx.stroke();

        // Body
        ctx.set_fill_style_str(color);
        ctx.fill_rect(
            candle.x_center - candle.body_width / 2.0,
            candle.body_top(),
            candle.body_width,
            candle.body_height(),
        );
    }

    fn draw_selection(&self, area: &PlotArea, from: f64, to: f64) {
        let ctx = &self.context;
        let left = from.min(to).clamp(area.left, area.right());
        let right = from.max(to).clamp(area.left, area.right());
        ctx.set_fill_style_str("rgba(136, 136, 136, 0.2)");
        ctx.fill_rect(left, area.top, right - left, area.height);
    }
}
