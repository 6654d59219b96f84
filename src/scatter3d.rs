//! The 3D scatter view: training set, test set and model prediction over
//! the input plane, rendered with plotly into `#chartContainer`.

use plotly::common::{Marker, Mode, Title};
use plotly::configuration::Configuration;
use plotly::layout::{Axis, Camera, Eye, LayoutScene, Margin};
use plotly::{Layout, Plot, Scatter3D};
use shared::{SamplePoint, SeriesSlot};
use wasm_bindgen_futures::spawn_local;

use crate::input::{Orientation, Rotatable};
use crate::plotly_bindings;
use crate::relay::SeriesTarget;

pub const CONTAINER_ID: &str = "chartContainer";

/// Camera distance from the plot centre, in scene units.
const EYE_DISTANCE: f64 = 1.8;

const PLOT_MARGIN: usize = 95;

fn marker_size(slot: SeriesSlot) -> usize {
    match slot {
        SeriesSlot::Training | SeriesSlot::Testing => 2,
        SeriesSlot::Prediction => 3,
    }
}

/// The scatter widget's state: fixed visual options plus the parts the
/// host and the user mutate, the series data and the camera orientation.
pub struct ScatterChart {
    orientation: Orientation,
    series: [Vec<SamplePoint>; 3],
}

impl ScatterChart {
    pub fn new() -> Self {
        Self {
            // the view the host expects on first paint
            orientation: Orientation {
                alpha: 10.0,
                beta: 30.0,
            },
            series: Default::default(),
        }
    }

    /// Camera eye position for the current orientation: beta turns the
    /// eye around the vertical axis, alpha lifts it.
    pub fn camera_eye(&self) -> (f64, f64, f64) {
        let alpha = self.orientation.alpha.to_radians();
        let beta = self.orientation.beta.to_radians();
        (
            EYE_DISTANCE * alpha.cos() * beta.sin(),
            EYE_DISTANCE * alpha.cos() * beta.cos(),
            EYE_DISTANCE * alpha.sin(),
        )
    }

    /// Builds the full plotly figure. Interaction is disabled in plotly
    /// itself; rotation comes from our own input handling.
    pub fn to_plot(&self) -> Plot {
        let mut plot = Plot::new();
        plot.set_configuration(Configuration::new().static_plot(true));

        for slot in SeriesSlot::ALL {
            let points = &self.series[slot.index()];
            let x = points.iter().map(|point| point.0).collect::<Vec<_>>();
            let y = points.iter().map(|point| point.1).collect::<Vec<_>>();
            let z = points.iter().map(|point| point.2).collect::<Vec<_>>();
            let trace = Scatter3D::new(x, y, z)
                .name(slot.label())
                .mode(Mode::Markers)
                .marker(Marker::new().size(marker_size(slot)))
                .show_legend(false);
            plot.add_trace(trace);
        }

        let (eye_x, eye_y, eye_z) = self.camera_eye();
        let scene = LayoutScene::new()
            .x_axis(Axis::new().range(vec![0.0, 1.0]))
            .y_axis(Axis::new().range(vec![-1.0, 1.0]))
            .z_axis(Axis::new().range(vec![0.0, 1.0]))
            .camera(Camera::new().eye(Eye::new().x(eye_x).y(eye_y).z(eye_z)));
        let margin = Margin::new()
            .left(PLOT_MARGIN)
            .right(PLOT_MARGIN)
            .top(PLOT_MARGIN)
            .bottom(PLOT_MARGIN);
        let layout = Layout::new()
            .title(Title::with_text("Network output"))
            .margin(margin)
            .auto_size(true)
            .show_legend(false)
            .scene(scene);
        plot.set_layout(layout);
        plot
    }
}

impl Default for ScatterChart {
    fn default() -> Self {
        Self::new()
    }
}

impl SeriesTarget for ScatterChart {
    type Point = SamplePoint;

    fn replace_series(&mut self, slot: SeriesSlot, points: Vec<SamplePoint>) {
        self.series[slot.index()] = points;
    }

    fn redraw(&mut self) {
        let plot = self.to_plot();
        spawn_local(async move {
            plotly_bindings::react(CONTAINER_ID, &plot).await;
        });
    }
}

impl Rotatable for ScatterChart {
    fn orientation(&self) -> Orientation {
        self.orientation
    }

    fn set_orientation(&mut self, orientation: Orientation) {
        self.orientation = orientation.clamped();
    }

    fn redraw(&mut self) {
        SeriesTarget::redraw(self);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::input::ANGLE_LIMIT;

    #[test]
    fn initial_orientation_matches_first_paint() {
        let chart = ScatterChart::new();
        let orientation = Rotatable::orientation(&chart);
        assert_eq!(orientation.alpha, 10.0);
        assert_eq!(orientation.beta, 30.0);
    }

    #[test]
    fn camera_eye_tracks_the_orientation() {
        let mut chart = ScatterChart::new();

        chart.set_orientation(Orientation { alpha: 0.0, beta: 0.0 });
        let (x, y, z) = chart.camera_eye();
        assert!(x.abs() < 1e-9);
        assert!((y - EYE_DISTANCE).abs() < 1e-9);
        assert!(z.abs() < 1e-9);

        chart.set_orientation(Orientation { alpha: 90.0, beta: 0.0 });
        let (x, _, z) = chart.camera_eye();
        assert!(x.abs() < 1e-9);
        assert!((z - EYE_DISTANCE).abs() < 1e-9);
    }

    #[test]
    fn stored_angles_never_exceed_the_limit() {
        let mut chart = ScatterChart::new();
        chart.set_orientation(Orientation {
            alpha: 250.0,
            beta: -250.0,
        });
        let orientation = Rotatable::orientation(&chart);
        assert_eq!(orientation.alpha, ANGLE_LIMIT);
        assert_eq!(orientation.beta, -ANGLE_LIMIT);
    }

    #[test]
    fn figure_carries_the_fixed_options() {
        let json = ScatterChart::new().to_plot().to_json();
        assert!(json.contains("Network output"));
        assert!(json.contains("markers"));
    }

    #[test]
    fn replace_series_is_wholesale() {
        let mut chart = ScatterChart::new();
        chart.replace_series(SeriesSlot::Prediction, vec![SamplePoint(0.1, 0.2, 0.3)]);
        chart.replace_series(SeriesSlot::Prediction, vec![SamplePoint(0.9, 0.8, 0.7)]);
        assert_eq!(
            chart.series[SeriesSlot::Prediction.index()],
            vec![SamplePoint(0.9, 0.8, 0.7)]
        );
        assert!(chart.series[SeriesSlot::Training.index()].is_empty());
    }
}
