//! The 2D curve view: the same three series drawn onto `#chartCanvas`
//! with the plain canvas context. Training and test samples are dots, the
//! prediction is a polyline. The host drives the canvas size through
//! viewport signals.

use shared::{AxisRange, CurvePoint, SeriesSlot, Viewport};
use wasm_bindgen::JsCast;
use web_sys::{CanvasRenderingContext2d, HtmlCanvasElement};

use crate::log_warn;
use crate::relay::SeriesTarget;

pub const CANVAS_ID: &str = "chartCanvas";

/// Pixels kept free around the plot frame.
const FRAME_MARGIN: f64 = 24.0;
const POINT_RADIUS: f64 = 2.0;

const FRAME_COLOR: &str = "#4a5568";
/// Training, test, prediction.
const SERIES_COLORS: [&str; 3] = ["#2b6cb0", "#c05621", "#2f855a"];

/// Maps data coordinates onto canvas pixels.
#[derive(Debug, Clone, Copy)]
pub struct PlotFrame {
    pub width: f64,
    pub height: f64,
    pub x: AxisRange,
    pub y: AxisRange,
}

impl PlotFrame {
    pub fn project(&self, point: CurvePoint) -> (f64, f64) {
        let span_x = (self.width - 2.0 * FRAME_MARGIN).max(0.0);
        let span_y = (self.height - 2.0 * FRAME_MARGIN).max(0.0);
        (
            FRAME_MARGIN + self.x.position(point.0) * span_x,
            FRAME_MARGIN + (1.0 - self.y.position(point.1)) * span_y,
        )
    }
}

pub struct CurveChart {
    canvas: HtmlCanvasElement,
    series: [Vec<CurvePoint>; 3],
    x_range: AxisRange,
    y_range: AxisRange,
}

impl CurveChart {
    pub fn new(canvas: HtmlCanvasElement) -> Self {
        Self {
            canvas,
            series: Default::default(),
            x_range: AxisRange {
                lower: 0.0,
                upper: 1.0,
            },
            y_range: AxisRange {
                lower: -1.0,
                upper: 1.0,
            },
        }
    }

    /// Adopts the host-reported dimensions exactly and repaints.
    pub fn resize(&mut self, viewport: Viewport) {
        self.canvas.set_width(viewport.width);
        self.canvas.set_height(viewport.height);
        self.paint();
    }

    pub fn set_x_range(&mut self, range: AxisRange) {
        self.x_range = range;
        self.paint();
    }

    pub fn set_y_range(&mut self, range: AxisRange) {
        self.y_range = range;
        self.paint();
    }

    fn frame(&self) -> PlotFrame {
        PlotFrame {
            width: f64::from(self.canvas.width()),
            height: f64::from(self.canvas.height()),
            x: self.x_range,
            y: self.y_range,
        }
    }

    fn context(&self) -> Option<CanvasRenderingContext2d> {
        self.canvas
            .get_context("2d")
            .ok()
            .flatten()
            .and_then(|context| context.dyn_into().ok())
    }

    fn paint(&self) {
        let Some(context) = self.context() else {
            log_warn!("canvas has no 2d context, skipping paint");
            return;
        };
        let frame = self.frame();
        context.clear_rect(0.0, 0.0, frame.width, frame.height);

        context.set_stroke_style_str(FRAME_COLOR);
        context.set_line_width(1.0);
        context.stroke_rect(
            FRAME_MARGIN,
            FRAME_MARGIN,
            (frame.width - 2.0 * FRAME_MARGIN).max(0.0),
            (frame.height - 2.0 * FRAME_MARGIN).max(0.0),
        );

        for slot in [SeriesSlot::Training, SeriesSlot::Testing] {
            context.set_fill_style_str(SERIES_COLORS[slot.index()]);
            for point in &self.series[slot.index()] {
                let (px, py) = frame.project(*point);
                context.begin_path();
                let _ = context.arc(px, py, POINT_RADIUS, 0.0, std::f64::consts::TAU);
                context.fill();
            }
        }

        let prediction = &self.series[SeriesSlot::Prediction.index()];
        if prediction.len() > 1 {
            context.set_stroke_style_str(SERIES_COLORS[SeriesSlot::Prediction.index()]);
            context.begin_path();
            let (px, py) = frame.project(prediction[0]);
            context.move_to(px, py);
            for point in &prediction[1..] {
                let (px, py) = frame.project(*point);
                context.line_to(px, py);
            }
            context.stroke();
        }
    }
}

impl SeriesTarget for CurveChart {
    type Point = CurvePoint;

    fn replace_series(&mut self, slot: SeriesSlot, points: Vec<CurvePoint>) {
        self.series[slot.index()] = points;
    }

    fn redraw(&mut self) {
        self.paint();
    }
}


#[cfg(all(test, target_arch = "wasm32"))]
mod wasm_tests {
    use super::*;
    use wasm_bindgen_test::*;

    wasm_bindgen_test_configure!(run_in_browser);

    fn test_canvas() -> HtmlCanvasElement {
        let document = web_sys::window().unwrap().document().unwrap();
        document
            .create_element("canvas")
            .unwrap()
            .dyn_into()
            .unwrap()
    }

    #[wasm_bindgen_test]
    fn resize_adopts_host_dimensions_exactly() {
        let canvas = test_canvas();
        let mut chart = CurveChart::new(canvas.clone());
        chart.resize(Viewport {
            width: 800,
            height: 600,
        });
        assert_eq!(canvas.width(), 800);
        assert_eq!(canvas.height(), 600);
    }
}
