// Scripted stand-in for the window: each shown frame runs the next step
// against the UI tree, and an exhausted script closes the window.

#![allow(dead_code)]

use std::collections::VecDeque;

use minifb::Key;
use pixelstack::error::Error;
use pixelstack::node::{Node, NodeId, PointerEvent};
use pixelstack::types::{FrameBuffer, rgb};
use pixelstack::window::{Screen, Shown};

pub type Step = Box<dyn FnMut(&mut Node) -> Shown>;

#[derive(Default)]
pub struct ScriptedScreen {
    steps: VecDeque<Step>,
    pub frames_shown: usize,
    pub last_frame_hw: (usize, usize),
}

impl ScriptedScreen {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn then(mut self, step: impl FnMut(&mut Node) -> Shown + 'static) -> Self {
        self.steps.push_back(Box::new(step));
        self
    }

    /// A frame where nothing happens.
    pub fn idle(self) -> Self {
        self.then(|_| Shown::default())
    }

    pub fn key(self, key: Key) -> Self {
        self.then(move |_| Shown { request_break: false, keypress: Some(key) })
    }
}

impl Screen for ScriptedScreen {
    fn show(&mut self, frame: &FrameBuffer, ui: &mut Node) -> Result<Shown, Error> {
        self.frames_shown += 1;
        self.last_frame_hw = frame.hw();
        Ok(match self.steps.pop_front() {
            Some(mut step) => step(ui),
            None => Shown { request_break: true, keypress: None },
        })
    }
}

/// Absolute frame position of normalized point (fx, fy) inside node `id`.
pub fn point_in(ui: &Node, id: NodeId, fx: f32, fy: f32) -> (i32, i32) {
    let rect = ui.locate(id).expect("node is in the tree");
    let x = rect.x + (fx * rect.w.saturating_sub(1) as f32).round() as i32;
    let y = rect.y + (fy * rect.h.saturating_sub(1) as f32).round() as i32;
    (x, y)
}

pub fn click(ui: &mut Node, (x, y): (i32, i32)) {
    ui.dispatch(PointerEvent::moved(x, y));
    ui.dispatch(PointerEvent::down(x, y));
    ui.dispatch(PointerEvent::up(x, y));
}

/// Horizontal red-green gradient, so crops are easy to tell apart.
pub fn gradient(h: usize, w: usize) -> FrameBuffer {
    let mut fb = FrameBuffer::filled(h, w, 0);
    for y in 0..h {
        for x in 0..w {
            fb.pixels[y * w + x] = rgb((x * 255 / w.max(1)) as u8, (y * 255 / h.max(1)) as u8, 80);
        }
    }
    fb
}
