//! Lock-free input shared between the input path and the stepping thread
//!
//! Pointer events are partitioned by screen half: pressing the left half
//! steers left, the right half steers right, and every press or drag also
//! requests a shot. The stepping thread samples everything once per tick.

use std::sync::atomic::{AtomicBool, AtomicU32, Ordering};

use crate::sim::TickInput;

#[derive(Debug, Default)]
pub struct InputState {
    move_left: AtomicBool,
    move_right: AtomicBool,
    fire_requested: AtomicBool,
    /// Field width as `f32` bits, for the half-screen split
    field_width: AtomicU32,
}

impl InputState {
    pub fn new() -> Self {
        Self::default()
    }

    pub(crate) fn set_field_width(&self, width: f32) {
        self.field_width.store(width.to_bits(), Ordering::Relaxed);
    }

    fn field_width(&self) -> f32 {
        f32::from_bits(self.field_width.load(Ordering::Relaxed))
    }

    pub fn set_direction(&self, left: bool, right: bool) {
        self.move_left.store(left, Ordering::Relaxed);
        self.move_right.store(right, Ordering::Relaxed);
    }

    pub fn request_fire(&self) {
        self.fire_requested.store(true, Ordering::Relaxed);
    }

    pub fn pointer_down(&self, x: f32) {
        let left = x < self.field_width() / 2.0;
        self.set_direction(left, !left);
        self.request_fire();
    }

    pub fn pointer_move(&self, x: f32) {
        self.pointer_down(x);
    }

    pub fn pointer_up(&self) {
        self.set_direction(false, false);
    }

    /// Forget held directions and any pending shot
    pub fn clear(&self) {
        self.set_direction(false, false);
        self.fire_requested.store(false, Ordering::Relaxed);
    }

    /// Sample for one tick; a pending fire request is consumed
    pub fn take_tick_input(&self) -> TickInput {
        TickInput {
            move_left: self.move_left.load(Ordering::Relaxed),
            move_right: self.move_right.load(Ordering::Relaxed),
            fire: self.fire_requested.swap(false, Ordering::Relaxed),
        }
    }
}
