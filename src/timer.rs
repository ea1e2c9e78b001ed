//! Cancellable timer handles over the browser scheduler.
//!
//! Every delayed step in the round lifecycle is owned by one of these
//! handles; dropping (or cancelling) a handle tears the callback down, so an
//! effect cleanup cancels a whole round's chain before the next round arms.
//! Cancelling twice is a no-op.

use wasm_bindgen::JsCast;
use wasm_bindgen::closure::Closure;

pub struct Timeout {
    id: Option<i32>,
    _cb: Closure<dyn FnMut()>,
}

impl Timeout {
    pub fn new(ms: u32, f: impl FnMut() + 'static) -> Self {
        let window = web_sys::window().expect("no global `window` exists");
        let cb = Closure::wrap(Box::new(f) as Box<dyn FnMut()>);
        let id = window
            .set_timeout_with_callback_and_timeout_and_arguments_0(
                cb.as_ref().unchecked_ref(),
                ms as i32,
            )
            .expect("failed to schedule timeout");
        Self {
            id: Some(id),
            _cb: cb,
        }
    }

    pub fn cancel(&mut self) {
        if let Some(id) = self.id.take() {
            if let Some(window) = web_sys::window() {
                window.clear_timeout_with_handle(id);
            }
        }
    }
}

impl Drop for Timeout {
    fn drop(&mut self) {
        self.cancel();
    }
}

pub struct Interval {
    id: Option<i32>,
    _cb: Closure<dyn FnMut()>,
}

impl Interval {
    pub fn new(ms: u32, f: impl FnMut() + 'static) -> Self {
        let window = web_sys::window().expect("no global `window` exists");
        let cb = Closure::wrap(Box::new(f) as Box<dyn FnMut()>);
        let id = window
            .set_interval_with_callback_and_timeout_and_arguments_0(
                cb.as_ref().unchecked_ref(),
                ms as i32,
            )
            .expect("failed to schedule interval");
        Self {
            id: Some(id),
            _cb: cb,
        }
    }

    pub fn cancel(&mut self) {
        if let Some(id) = self.id.take() {
            if let Some(window) = web_sys::window() {
                window.clear_interval_with_handle(id);
            }
        }
    }
}

impl Drop for Interval {
    fn drop(&mut self) {
        self.cancel();
    }
}
