use leptos::html::Canvas;
use leptos::*;
use std::rc::Rc;

use crate::{
    application::DataRefresher,
    config::DashboardConfig,
    domain::{
        logging::{LogComponent, get_logger},
        market_data::{StockDataSource, StockPayload},
    },
    infrastructure::{StockApiClient, rendering::CanvasChartRenderer},
    presentation::view_model::{
        self, AlertBannerModel, ChartModel, ChartViewport, DragMode, IndexCardModel, IndexIcon, Tone,
    },
    view_state::{ViewState, ViewStateStore},
};

/// Drags shorter than this are clicks, not zooms
const MIN_ZOOM_DRAG_PX: f64 = 5.0;

impl ViewStateStore for RwSignal<ViewState> {
    fn replace_data(&self, payload: StockPayload) {
        self.update(|state| state.replace_data(payload));
    }
}

const DASHBOARD_STYLES: &str = r#"
.stock-dashboard {
    min-height: 100vh;
    background: #000;
    color: #fff;
    padding: 32px;
    font-family: -apple-system, BlinkMacSystemFont, 'Segoe UI', sans-serif;
}

.dashboard-title {
    font-size: 30px;
    font-weight: 700;
    text-align: center;
    margin-bottom: 32px;
}

.alert {
    background: #7f1d1d;
    border: 1px solid #b91c1c;
    color: #fff;
    padding: 16px;
    border-radius: 8px;
    margin-bottom: 32px;
}

.alert .icon {
    width: 16px;
    height: 16px;
    display: inline;
    margin-right: 8px;
    vertical-align: -2px;
}

.alert-title {
    font-weight: 700;
}

.card-grid {
    display: grid;
    grid-template-columns: 1fr;
    gap: 32px;
    margin-bottom: 32px;
}

@media (min-width: 768px) {
    .card-grid {
        grid-template-columns: repeat(3, 1fr);
    }
}

.card {
    background: #1f2937;
    border: 1px solid #374151;
    border-radius: 8px;
    padding: 16px;
}

.chart-card {
    background: #111827;
    border-color: #1f2937;
}

.card-header {
    display: flex;
    align-items: center;
    justify-content: space-between;
    padding-bottom: 8px;
}

.card-title {
    font-size: 14px;
    font-weight: 500;
    color: #d1d5db;
}

.card-header .icon {
    width: 16px;
    height: 16px;
}

.card-value {
    font-size: 24px;
    font-weight: 700;
}

.card-change {
    font-size: 12px;
}

.positive {
    color: #4ade80;
}

.negative {
    color: #f87171;
}

.chart-canvas {
    display: block;
    margin: 0 auto;
    cursor: crosshair;
}
"#;

/// Fresh view state fed from `source` every `interval_ms`. The loop belongs
/// to the current reactive owner and stops when that owner is disposed.
pub fn use_stock_refresh<S>(source: S, interval_ms: u32) -> RwSignal<ViewState>
where
    S: StockDataSource + 'static,
{
    let view_state = create_rw_signal(ViewState::default());
    let refresher = DataRefresher::new(source, view_state).start(interval_ms);
    on_cleanup(move || refresher.stop());
    view_state
}

/// 📊 The dashboard: alert banner, three index cards and the S&P 500 chart.
///
/// Mounting starts the refresh loop; unmounting stops it.
#[component]
pub fn Dashboard(#[prop(optional)] config: DashboardConfig) -> impl IntoView {
    let view_state =
        use_stock_refresh(StockApiClient::from_config(&config), config.refresh_interval_ms);

    let model = create_memo(move |_| view_state.with(view_model::render));
    let chart = Signal::derive(move || model.with(|m| m.chart.clone()));

    view! {
        <style>{DASHBOARD_STYLES}</style>
        <div class="stock-dashboard">
            <h1 class="dashboard-title">{view_model::DASHBOARD_TITLE}</h1>
            {move || model.with(|m| m.alert.clone()).map(|alert| view! { <AlertBanner alert=alert/> })}
            <div class="card-grid">
                {move || {
                    model
                        .with(|m| m.cards.clone())
                        .into_iter()
                        .map(|card| view! { <IndexCard card=card/> })
                        .collect_view()
                }}
            </div>
            <div class="card chart-card">
                <CandlestickChart chart=chart width=config.chart_width height=config.chart_height/>
            </div>
        </div>
    }
}

#[component]
fn AlertBanner(alert: AlertBannerModel) -> impl IntoView {
    view! {
        <div class="alert" role="alert">
            <svg class="icon" viewBox="0 0 24 24" fill="none" stroke="currentColor" stroke-width="2" stroke-linecap="round" stroke-linejoin="round">
                <circle cx="12" cy="12" r="10"/>
                <line x1="12" y1="8" x2="12" y2="12"/>
                <line x1="12" y1="16" x2="12.01" y2="16"/>
            </svg>
            <span class="alert-title">{alert.title}</span>
            <p>{alert.message}</p>
        </div>
    }
}

#[component]
fn IndexCard(card: IndexCardModel) -> impl IntoView {
    let caption = card.change_caption();
    let change_class = format!("card-change {}", card.tone.css_class());

    view! {
        <div class="card index-card">
            <div class="card-header">
                <h3 class="card-title">{card.title}</h3>
                <TrendIcon icon=card.icon tone=card.tone/>
            </div>
            <div>
                <div class="card-value">{card.value_text}</div>
                <p class=change_class>{caption}</p>
            </div>
        </div>
    }
}

#[component]
fn TrendIcon(icon: IndexIcon, tone: Tone) -> impl IntoView {
    view! {
        <svg class=format!("icon {}", tone.css_class()) viewBox="0 0 24 24" fill="none" stroke="currentColor" stroke-width="2" stroke-linecap="round" stroke-linejoin="round">
            {icon.polylines().iter().map(|points| view! { <polyline points=*points/> }).collect_view()}
        </svg>
    }
}

/// 🎨 Canvas candlestick plot with drag-to-zoom and double-click reset
#[component]
fn CandlestickChart(chart: Signal<ChartModel>, width: u32, height: u32) -> impl IntoView {
    let canvas_ref = create_node_ref::<Canvas>();
    let viewport = create_rw_signal(ChartViewport::Full);
    // (drag start x, current x) in canvas pixels
    let drag = create_rw_signal(None::<(f64, f64)>);
    let renderer = store_value(None::<Rc<CanvasChartRenderer>>);

    let ensure_renderer = move || -> Option<Rc<CanvasChartRenderer>> {
        if let Some(existing) = renderer.get_value() {
            return Some(existing);
        }
        let canvas = canvas_ref.get_untracked()?;
        match CanvasChartRenderer::new(&canvas, width, height) {
            Ok(created) => {
                let created = Rc::new(created);
                renderer.set_value(Some(Rc::clone(&created)));
                Some(created)
            }
            Err(e) => {
                get_logger().error(
                    LogComponent::Presentation("CandlestickChart"),
                    &format!("❌ Canvas unavailable: {}", e),
                );
                None
            }
        }
    };

    create_effect(move |_| {
        // Track the canvas so the first draw happens once it is mounted
        if canvas_ref.get().is_none() {
            return;
        }
        let viewport = viewport.get();
        let selection = drag.get();
        let Some(renderer) = ensure_renderer() else {
            return;
        };
        chart.with(|chart| {
            if let Err(e) = renderer.render(chart, viewport, selection) {
                get_logger().error(
                    LogComponent::Presentation("CandlestickChart"),
                    &format!("❌ Render error: {}", e),
                );
            }
        });
    });

    let on_mouse_down = move |ev: ev::MouseEvent| match chart.with_untracked(|c| c.layout.drag_mode) {
        DragMode::Zoom => {
            let x = ev.offset_x() as f64;
            drag.set(Some((x, x)));
        }
    };

    let on_mouse_move = move |ev: ev::MouseEvent| {
        if drag.get_untracked().is_some() {
            let x = ev.offset_x() as f64;
            drag.update(|span| {
                if let Some((_, to)) = span {
                    *to = x;
                }
            });
        }
    };

    let on_mouse_up = move |ev: ev::MouseEvent| {
        let Some((from, _)) = drag.get_untracked() else {
            return;
        };
        drag.set(None);
        let to = ev.offset_x() as f64;
        if (to - from).abs() < MIN_ZOOM_DRAG_PX {
            return;
        }
        let Some(renderer) = renderer.get_value() else {
            return;
        };
        let area = renderer.plot_area();
        let clamp = |x: f64| x.clamp(area.left, area.right());
        chart.with_untracked(|chart| {
            let current = viewport.get_untracked();
            let buckets = (
                renderer.bucket_at(clamp(from), chart, current),
                renderer.bucket_at(clamp(to), chart, current),
            );
            if let (Some(a), Some(b)) = buckets {
                viewport.set(ChartViewport::zoom_to(a, b, chart.trace.len()));
            }
        });
    };

    view! {
        <canvas
            class="chart-canvas"
            node_ref=canvas_ref
            width=width
            height=height
            on:mousedown=on_mouse_down
            on:mousemove=on_mouse_move
            on:mouseup=on_mouse_up
            on:mouseleave=move |_| drag.set(None)
            on:dblclick=move |_| viewport.set(ChartViewport::Full)
        />
    }
}
