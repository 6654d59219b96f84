//! Camera rotation input for the scatter view.
//!
//! The embedded web view does not deliver native pointer events reliably,
//! so the host can forward raw coordinates as signals instead. Both
//! sources drive the same drag gesture; which one is used is decided once
//! at setup.

use std::cell::RefCell;
use std::rc::Rc;

use shared::PointerPos;
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use web_sys::{EventTarget, MouseEvent};

use crate::bridge::{event, Bridge};

/// Rotation angles in degrees.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Orientation {
    /// Tilt around the horizontal axis.
    pub alpha: f64,
    /// Turn around the vertical axis.
    pub beta: f64,
}

/// Angles past this flip the plot over, so drags stop here.
pub const ANGLE_LIMIT: f64 = 100.0;

/// Screen pixels per degree of rotation; lower is more sensitive.
pub const DRAG_SENSITIVITY: f64 = 5.0;

impl Orientation {
    pub fn clamped(self) -> Self {
        Self {
            alpha: self.alpha.clamp(-ANGLE_LIMIT, ANGLE_LIMIT),
            beta: self.beta.clamp(-ANGLE_LIMIT, ANGLE_LIMIT),
        }
    }
}

/// One drag gesture, anchored at the pointer-down position and the
/// orientation the chart had at that moment.
#[derive(Debug, Clone, Copy)]
pub struct DragRotate {
    origin_x: f64,
    origin_y: f64,
    start: Orientation,
}

impl DragRotate {
    pub fn begin(x: f64, y: f64, start: Orientation) -> Self {
        Self {
            origin_x: x,
            origin_y: y,
            start,
        }
    }

    /// Orientation for the current pointer position: dragging left/right
    /// turns the plot, dragging up/down tilts it.
    pub fn orientation_at(&self, x: f64, y: f64) -> Orientation {
        Orientation {
            alpha: self.start.alpha + (y - self.origin_y) / DRAG_SENSITIVITY,
            beta: self.start.beta + (self.origin_x - x) / DRAG_SENSITIVITY,
        }
        .clamped()
    }
}

/// Anything whose camera the controller can turn.
pub trait Rotatable {
    fn orientation(&self) -> Orientation;
    fn set_orientation(&mut self, orientation: Orientation);
    fn redraw(&mut self);
}

/// Which pointer source feeds the rotate controller.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputMode {
    /// Raw coordinates forwarded by the host, replayed into the gesture.
    Forwarded,
    /// Regular DOM pointer events on the chart container.
    Native,
}

/// Drag state shared by whichever input source feeds it. Moves with no
/// active gesture are ignored, so stray events after pointer-up never
/// change the orientation.
pub struct RotateController<T> {
    chart: Rc<RefCell<T>>,
    gesture: Rc<RefCell<Option<DragRotate>>>,
}

impl<T> Clone for RotateController<T> {
    fn clone(&self) -> Self {
        Self {
            chart: Rc::clone(&self.chart),
            gesture: Rc::clone(&self.gesture),
        }
    }
}

impl<T: Rotatable> RotateController<T> {
    pub fn new(chart: Rc<RefCell<T>>) -> Self {
        Self {
            chart,
            gesture: Rc::new(RefCell::new(None)),
        }
    }

    pub fn pointer_down(&self, x: f64, y: f64) {
        let start = self.chart.borrow().orientation();
        *self.gesture.borrow_mut() = Some(DragRotate::begin(x, y, start));
    }

    /// Re-orients the chart silently; the redraw waits for pointer-up.
    pub fn pointer_move(&self, x: f64, y: f64) {
        let orientation = match *self.gesture.borrow() {
            Some(gesture) => gesture.orientation_at(x, y),
            None => return,
        };
        self.chart.borrow_mut().set_orientation(orientation);
    }

    pub fn pointer_up(&self, x: f64, y: f64) {
        let Some(gesture) = self.gesture.borrow_mut().take() else {
            return;
        };
        let orientation = gesture.orientation_at(x, y);
        let mut chart = self.chart.borrow_mut();
        chart.set_orientation(orientation);
        chart.redraw();
    }
}

/// Host-forwarded pointer coordinates replayed into the controller. The
/// three subscriptions live for the page; gesture scoping happens inside
/// the controller.
pub struct ForwardedInput;

impl ForwardedInput {
    pub fn bind<T: Rotatable + 'static>(bridge: &Bridge, controller: RotateController<T>) {
        let down = controller.clone();
        bridge.subscribe(event::MOUSE_DOWN, move |pos: PointerPos| {
            down.pointer_down(pos.0, pos.1);
        });
        let moved = controller.clone();
        bridge.subscribe(event::MOUSE_MOVE, move |pos: PointerPos| {
            moved.pointer_move(pos.0, pos.1);
        });
        bridge.subscribe(event::MOUSE_UP, move |pos: PointerPos| {
            controller.pointer_up(pos.0, pos.1);
        });
    }
}

type GestureListeners = (Closure<dyn FnMut(MouseEvent)>, Closure<dyn FnMut(MouseEvent)>);

/// DOM pointer events, with the move/up listeners scoped to a single
/// gesture: attached on mousedown, detached again on mouseup so nothing
/// leaks across gestures.
pub struct NativeInput;

impl NativeInput {
    pub fn bind<T: Rotatable + 'static>(
        target: &EventTarget,
        controller: RotateController<T>,
    ) -> Result<(), JsValue> {
        let document = web_sys::window()
            .and_then(|window| window.document())
            .ok_or_else(|| JsValue::from_str("no document to attach gesture listeners to"))?;
        let active: Rc<RefCell<Option<GestureListeners>>> = Rc::new(RefCell::new(None));

        let down = Closure::<dyn FnMut(MouseEvent)>::new({
            let active = Rc::clone(&active);
            let document = document.clone();
            move |event: MouseEvent| {
                controller.pointer_down(f64::from(event.page_x()), f64::from(event.page_y()));

                let on_move = Closure::<dyn FnMut(MouseEvent)>::new({
                    let controller = controller.clone();
                    move |event: MouseEvent| {
                        controller.pointer_move(f64::from(event.page_x()), f64::from(event.page_y()));
                    }
                });
                let on_up = Closure::<dyn FnMut(MouseEvent)>::new({
                    let controller = controller.clone();
                    let active = Rc::clone(&active);
                    let document = document.clone();
                    move |event: MouseEvent| {
                        controller.pointer_up(f64::from(event.page_x()), f64::from(event.page_y()));
                        if let Some((on_move, on_up)) = active.borrow_mut().take() {
                            let _ = document.remove_event_listener_with_callback(
                                "mousemove",
                                on_move.as_ref().unchecked_ref(),
                            );
                            let _ = document.remove_event_listener_with_callback(
                                "mouseup",
                                on_up.as_ref().unchecked_ref(),
                            );
                            // this closure is still on the stack; drop both
                            // on the next tick
                            wasm_bindgen_futures::spawn_local(async move {
                                drop((on_move, on_up));
                            });
                        }
                    }
                });
                let _ = document
                    .add_event_listener_with_callback("mousemove", on_move.as_ref().unchecked_ref());
                let _ = document
                    .add_event_listener_with_callback("mouseup", on_up.as_ref().unchecked_ref());

                // a second mousedown mid-gesture replaces the old listeners
                if let Some((stale_move, stale_up)) =
                    active.borrow_mut().replace((on_move, on_up))
                {
                    let _ = document.remove_event_listener_with_callback(
                        "mousemove",
                        stale_move.as_ref().unchecked_ref(),
                    );
                    let _ = document.remove_event_listener_with_callback(
                        "mouseup",
                        stale_up.as_ref().unchecked_ref(),
                    );
                }
            }
        });
        target.add_event_listener_with_callback("mousedown", down.as_ref().unchecked_ref())?;
        down.forget();
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Default)]
    struct FakeChart {
        orientation: Orientation,
        redraws: usize,
    }

    impl Rotatable for FakeChart {
        fn orientation(&self) -> Orientation {
            self.orientation
        }

        fn set_orientation(&mut self, orientation: Orientation) {
            self.orientation = orientation;
        }

        fn redraw(&mut self) {
            self.redraws += 1;
        }
    }

    fn controller() -> (RotateController<FakeChart>, Rc<RefCell<FakeChart>>) {
        let chart = Rc::new(RefCell::new(FakeChart::default()));
        (RotateController::new(Rc::clone(&chart)), chart)
    }

    #[test]
    fn drag_applies_sensitivity_scaled_deltas() {
        let gesture = DragRotate::begin(100.0, 100.0, Orientation { alpha: 10.0, beta: 30.0 });
        // 50px left and 25px down
        let orientation = gesture.orientation_at(50.0, 125.0);
        assert_eq!(orientation.beta, 40.0);
        assert_eq!(orientation.alpha, 15.0);
    }

    #[test]
    fn drag_clamps_to_angle_limit() {
        let gesture = DragRotate::begin(0.0, 0.0, Orientation { alpha: 90.0, beta: -90.0 });
        let orientation = gesture.orientation_at(1000.0, 1000.0);
        // the boundary value is stored, never the raw angle
        assert_eq!(orientation.alpha, ANGLE_LIMIT);
        assert_eq!(orientation.beta, -ANGLE_LIMIT);
    }

    #[test]
    fn moves_between_down_and_up_reorient_without_redraw() {
        let (controller, chart) = controller();
        controller.pointer_down(0.0, 0.0);
        controller.pointer_move(-50.0, 0.0);
        assert_eq!(chart.borrow().orientation.beta, 10.0);
        assert_eq!(chart.borrow().redraws, 0);

        controller.pointer_up(-50.0, 0.0);
        assert_eq!(chart.borrow().redraws, 1);
    }

    #[test]
    fn moves_after_up_leave_orientation_alone() {
        let (controller, chart) = controller();
        controller.pointer_down(0.0, 0.0);
        controller.pointer_move(-25.0, 0.0);
        controller.pointer_up(-25.0, 0.0);
        let settled = chart.borrow().orientation;

        controller.pointer_move(-500.0, 300.0);
        assert_eq!(chart.borrow().orientation, settled);
        assert_eq!(chart.borrow().redraws, 1);
    }

    #[test]
    fn moves_without_a_gesture_are_ignored() {
        let (controller, chart) = controller();
        controller.pointer_move(40.0, 40.0);
        controller.pointer_up(40.0, 40.0);
        assert_eq!(chart.borrow().orientation, Orientation::default());
        assert_eq!(chart.borrow().redraws, 0);
    }
}
