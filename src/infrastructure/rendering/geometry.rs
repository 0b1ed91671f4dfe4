//! Canvas-independent layout math for the candlestick plot.

use crate::presentation::view_model::CandlestickTrace;
use std::ops::Range;

pub const MARGIN_LEFT: f64 = 72.0;
pub const MARGIN_RIGHT: f64 = 24.0;
pub const MARGIN_TOP: f64 = 48.0;
pub const MARGIN_BOTTOM: f64 = 56.0;
/// Share of a bucket's slot taken by the candle body
pub const BODY_WIDTH_RATIO: f64 = 0.6;
pub const PRICE_GRIDLINES: usize = 5;
pub const MAX_TIME_TICKS: usize = 6;

/// Plot rectangle inside the canvas, in canvas pixels.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PlotArea {
    pub left: f64,
    pub top: f64,
    pub width: f64,
    pub height: f64,
}

impl PlotArea {
    pub fn for_canvas(width: f64, height: f64) -> Self {
        Self {
            left: MARGIN_LEFT,
            top: MARGIN_TOP,
            width: (width - MARGIN_LEFT - MARGIN_RIGHT).max(1.0),
            height: (height - MARGIN_TOP - MARGIN_BOTTOM).max(1.0),
        }
    }

    pub fn right(&self) -> f64 {
        self.left + self.width
    }

    pub fn bottom(&self) -> f64 {
        self.top + self.height
    }

    pub fn slot_width(&self, visible: usize) -> f64 {
        self.width / visible.max(1) as f64
    }
}

/// Vertical price axis, padded so extremes don't touch the plot edges.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PriceScale {
    pub min: f64,
    pub max: f64,
}

impl PriceScale {
    pub fn from_extremes(low: f64, high: f64) -> Self {
        let span = high - low;
        let pad = if span > 0.0 { span * 0.05 } else { (low.abs() * 0.01).max(1.0) };
        Self { min: low - pad, max: high + pad }
    }

    pub fn y_for(&self, price: f64, area: &PlotArea) -> f64 {
        area.top + (self.max - price) / (self.max - self.min) * area.height
    }

    /// `count` evenly spaced prices from min to max
    pub fn gridlines(&self, count: usize) -> Vec<f64> {
        if count < 2 {
            return vec![self.min];
        }
        let step = (self.max - self.min) / (count - 1) as f64;
        (0..count).map(|i| self.min + step * i as f64).collect()
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CandleGeometry {
    pub index: usize,
    pub x_center: f64,
    pub body_width: f64,
    pub high_y: f64,
    pub low_y: f64,
    pub open_y: f64,
    pub close_y: f64,
    pub increasing: bool,
}

impl CandleGeometry {
    pub fn body_top(&self) -> f64 {
        self.open_y.min(self.close_y)
    }

    /// At least one pixel so flat candles stay visible
    pub fn body_height(&self) -> f64 {
        (self.open_y - self.close_y).abs().max(1.0)
    }
}

fn clamp_range(range: Range<usize>, len: usize) -> Range<usize> {
    let end = range.end.min(len);
    range.start.min(end)..end
}

fn trace_extremes(trace: &CandlestickTrace, range: Range<usize>) -> Option<(f64, f64)> {
    let (low, high) = range
        .flat_map(|i| [trace.low[i], trace.high[i]])
        .filter(|v| v.is_finite())
        .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), v| (lo.min(v), hi.max(v)));
    (low <= high).then_some((low, high))
}

/// Lay out the buckets of `range`, one slot each, left to right. Buckets
/// with a non-finite price are skipped but keep their slot.
pub fn candle_geometry(
    trace: &CandlestickTrace,
    range: Range<usize>,
    area: &PlotArea,
) -> Option<(PriceScale, Vec<CandleGeometry>)> {
    let range = clamp_range(range, trace.len());
    if range.is_empty() {
        return None;
    }
    let (low, high) = trace_extremes(trace, range.clone())?;
    let scale = PriceScale::from_extremes(low, high);
    let slot = area.slot_width(range.len());

    let candles = range
        .clone()
        .enumerate()
        .filter_map(|(slot_index, index)| {
            let (open, high, low, close) =
                (trace.open[index], trace.high[index], trace.low[index], trace.close[index]);
            if ![open, high, low, close].iter().all(|v| v.is_finite()) {
                return None;
            }
            Some(CandleGeometry {
                index,
                x_center: area.left + slot * (slot_index as f64 + 0.5),
                body_width: slot * BODY_WIDTH_RATIO,
                high_y: scale.y_for(high, area),
                low_y: scale.y_for(low, area),
                open_y: scale.y_for(open, area),
                close_y: scale.y_for(close, area),
                increasing: close >= open,
            })
        })
        .collect();

    Some((scale, candles))
}

/// Bucket under canvas x-coordinate `x`, if inside the plot.
pub fn bucket_at(x: f64, area: &PlotArea, range: Range<usize>) -> Option<usize> {
    if range.is_empty() || x < area.left || x > area.right() {
        return None;
    }
    let slot = area.slot_width(range.len());
    let offset = ((x - area.left) / slot).floor() as usize;
    Some(range.start + offset.min(range.len() - 1))
}

/// Buckets that get an x-axis label, at most `max_ticks` of them.
pub fn time_tick_indices(range: Range<usize>, max_ticks: usize) -> Vec<usize> {
    if range.is_empty() || max_ticks == 0 {
        return Vec::new();
    }
    let step = range.len().div_ceil(max_ticks).max(1);
    range.step_by(step).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::market_data::TimeLabel;

    fn trace(rows: &[(f64, f64, f64, f64)]) -> CandlestickTrace {
        let mut trace = CandlestickTrace::default();
        for (i, &(open, high, low, close)) in rows.iter().enumerate() {
            trace.x.push(TimeLabel::Number(i as f64));
            trace.open.push(open);
            trace.high.push(high);
            trace.low.push(low);
            trace.close.push(close);
        }
        trace
    }

    #[test]
    fn single_candle_is_centered_and_ordered() {
        let area = PlotArea::for_canvas(800.0, 500.0);
        let trace = trace(&[(4490.0, 4510.0, 4480.0, 4500.0)]);
        let (scale, candles) = candle_geometry(&trace, 0..1, &area).unwrap();

        assert_eq!(candles.len(), 1);
        let candle = candles[0];
        assert_eq!(candle.x_center, area.left + area.width / 2.0);
        assert!(candle.high_y < candle.close_y && candle.close_y < candle.open_y);
        assert!(candle.open_y < candle.low_y);
        assert!(candle.increasing);
        assert!(scale.min < 4480.0 && scale.max > 4510.0);
    }

    #[test]
    fn flat_series_still_gets_a_scale() {
        let area = PlotArea::for_canvas(400.0, 300.0);
        let trace = trace(&[(10.0, 10.0, 10.0, 10.0)]);
        let (scale, candles) = candle_geometry(&trace, 0..1, &area).unwrap();
        assert!(scale.max > scale.min);
        assert_eq!(candles[0].body_height(), 1.0);
    }

    #[test]
    fn non_finite_buckets_are_skipped() {
        let area = PlotArea::for_canvas(400.0, 300.0);
        let trace = trace(&[(1.0, 2.0, 0.5, 1.5), (f64::NAN, 2.0, 0.5, 1.5), (1.5, 3.0, 1.0, 2.5)]);
        let (_, candles) = candle_geometry(&trace, 0..3, &area).unwrap();
        let indices: Vec<usize> = candles.iter().map(|c| c.index).collect();
        assert_eq!(indices, [0, 2]);
    }

    #[test]
    fn empty_range_has_no_geometry() {
        let area = PlotArea::for_canvas(400.0, 300.0);
        assert!(candle_geometry(&CandlestickTrace::default(), 0..0, &area).is_none());
        assert!(candle_geometry(&trace(&[(1.0, 2.0, 0.5, 1.5)]), 3..5, &area).is_none());
    }

    #[test]
    fn bucket_lookup_matches_slots() {
        let area = PlotArea::for_canvas(200.0, 200.0);
        let range = 10..14;
        let slot = area.slot_width(4);
        assert_eq!(bucket_at(area.left + 0.1, &area, range.clone()), Some(10));
        assert_eq!(bucket_at(area.left + slot * 2.5, &area, range.clone()), Some(12));
        assert_eq!(bucket_at(area.right(), &area, range.clone()), Some(13));
        assert_eq!(bucket_at(area.left - 1.0, &area, range.clone()), None);
        assert_eq!(bucket_at(area.left + 1.0, &area, 0..0), None);
    }

    #[test]
    fn time_ticks_are_spread() {
        assert_eq!(time_tick_indices(0..3, 6), [0, 1, 2]);
        assert_eq!(time_tick_indices(0..12, 6), [0, 2, 4, 6, 8, 10]);
        assert_eq!(time_tick_indices(5..18, 6), [5, 8, 11, 14, 17]);
        assert!(time_tick_indices(0..0, 6).is_empty());
    }
}
