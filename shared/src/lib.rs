//! Payload types exchanged between the host application and the chart page.
//!
//! The host owns the wire format; these types only mirror it. Points travel
//! as plain JSON arrays, which is why the point types are tuple structs.

use derive_more::Display;
use serde::{Deserialize, Serialize};

/// One sample in the scatter view. The host packs each point as
/// `[x, output, z]`: the two network inputs sit at positions 0 and 2,
/// the network output at position 1.
#[derive(Clone, Copy, Default, Serialize, Deserialize, Debug, PartialEq)]
pub struct SamplePoint(pub f64, pub f64, pub f64);

/// One sample in the curve view, packed as `[x, y]`.
#[derive(Clone, Copy, Default, Serialize, Deserialize, Debug, PartialEq)]
pub struct CurvePoint(pub f64, pub f64);

/// Raw pointer coordinates forwarded by the host, packed as `[x, y]`.
#[derive(Clone, Copy, Default, Serialize, Deserialize, Debug, PartialEq)]
pub struct PointerPos(pub f64, pub f64);

/// Web view dimensions reported by the host on resize.
#[derive(Clone, Copy, Default, Serialize, Deserialize, Debug, PartialEq, Eq)]
pub struct Viewport {
    pub width: u32,
    pub height: u32,
}

/// An axis range announced by the host when the dataset changes. Extra
/// fields the host sends alongside (such as the output label count) are
/// ignored on deserialization.
#[derive(Clone, Copy, Serialize, Deserialize, Debug, PartialEq)]
pub struct AxisRange {
    pub lower: f64,
    pub upper: f64,
}

impl AxisRange {
    /// Fraction of the range covered up to `value`, 0.0 at `lower` and
    /// 1.0 at `upper`. A degenerate range maps everything to the middle.
    pub fn position(&self, value: f64) -> f64 {
        let span = self.upper - self.lower;
        if span == 0.0 {
            0.5
        } else {
            (value - self.lower) / span
        }
    }
}

/// The three independently replaceable datasets every chart renders.
/// Indices are stable: the host and both views agree on 0/1/2.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Display)]
pub enum SeriesSlot {
    #[display("training")]
    Training,
    #[display("testing")]
    Testing,
    #[display("prediction")]
    Prediction,
}

impl SeriesSlot {
    pub const ALL: [Self; 3] = [Self::Training, Self::Testing, Self::Prediction];

    pub const fn index(self) -> usize {
        match self {
            Self::Training => 0,
            Self::Testing => 1,
            Self::Prediction => 2,
        }
    }

    /// Series name shown by the charting widget.
    pub const fn label(self) -> &'static str {
        match self {
            Self::Training => "Training Data",
            Self::Testing => "Test Data",
            Self::Prediction => "Prediction",
        }
    }
}
