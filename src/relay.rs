//! Forwards host-pushed dataset updates into chart redraws.
//!
//! Each named signal maps to exactly one action: replace one series
//! wholesale, then redraw. No buffering, no diffing, no back-pressure;
//! handlers run in the order the runtime delivers the signals.

use std::cell::RefCell;
use std::rc::Rc;

use serde::de::DeserializeOwned;
use shared::SeriesSlot;

use crate::bridge::{event, Bridge};
use crate::log_info;

/// A chart holding independently replaceable series.
pub trait SeriesTarget {
    type Point;

    /// Wholesale replacement; nothing is merged or accumulated.
    fn replace_series(&mut self, slot: SeriesSlot, points: Vec<Self::Point>);

    fn redraw(&mut self);
}

pub fn event_for(slot: SeriesSlot) -> &'static str {
    match slot {
        SeriesSlot::Training => event::TRAINING_DATA_UPDATED,
        SeriesSlot::Testing => event::TESTING_DATA_UPDATED,
        SeriesSlot::Prediction => event::PREDICTION_UPDATED,
    }
}

pub struct UpdateRelay<T> {
    target: Rc<RefCell<T>>,
}

impl<T> Clone for UpdateRelay<T> {
    fn clone(&self) -> Self {
        Self {
            target: Rc::clone(&self.target),
        }
    }
}

impl<T: SeriesTarget> UpdateRelay<T> {
    pub fn new(target: Rc<RefCell<T>>) -> Self {
        Self { target }
    }

    /// One handler invocation: replace the slot's series and redraw.
    pub fn apply(&self, slot: SeriesSlot, points: Vec<T::Point>) {
        log_info!("replacing {slot} series, {} points", points.len());
        let mut target = self.target.borrow_mut();
        target.replace_series(slot, points);
        target.redraw();
    }
}

impl<T> UpdateRelay<T>
where
    T: SeriesTarget + 'static,
    T::Point: DeserializeOwned + 'static,
{
    /// Subscribes one handler per series signal.
    pub fn wire(self, bridge: &Bridge) {
        for slot in SeriesSlot::ALL {
            let relay = self.clone();
            bridge.subscribe(event_for(slot), move |points: Vec<T::Point>| {
                relay.apply(slot, points);
            });
        }
    }
}
