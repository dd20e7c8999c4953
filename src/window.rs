// Window + input pump.
// The controllers never talk to minifb directly: they hand a finished frame
// and the UI tree to a `Screen`, which shows the frame, feeds pointer events
// into the tree and reports keys. `DisplayWindow` is the real one; tests
// script their own.

use std::collections::VecDeque;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use minifb::{Key, KeyRepeat, MouseButton, MouseMode, Window, WindowOptions};

use crate::error::Error;
use crate::node::{Node, PointerEvent};
use crate::types::FrameBuffer;

/// What happened while a frame was on screen.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Shown {
    /// The user asked to close the window (close button, Q or Esc).
    pub request_break: bool,
    /// At most one key per frame; extra keys wait for the next frame.
    pub keypress: Option<Key>,
}

pub trait Screen {
    /// Present `frame`, route pending pointer input into `ui` and report keys.
    fn show(&mut self, frame: &FrameBuffer, ui: &mut Node) -> Result<Shown, Error>;
}

/// Shared "stop now" flag, checked once per loop iteration.
#[derive(Clone, Debug, Default)]
pub struct CancelToken(Arc<AtomicBool>);

impl CancelToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.0.store(true, Ordering::SeqCst);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }

    pub fn reset(&self) {
        self.0.store(false, Ordering::SeqCst);
    }
}

/// Key -> action table, looked up by the controllers after each frame.
#[derive(Clone, Debug)]
pub struct KeyBindings<A> {
    bindings: Vec<(Key, A)>,
}

impl<A> Default for KeyBindings<A> {
    fn default() -> Self {
        Self { bindings: Vec::new() }
    }
}

impl<A: Copy> KeyBindings<A> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Later bindings for the same key replace earlier ones.
    pub fn bind(mut self, key: Key, action: A) -> Self {
        self.bindings.retain(|(k, _)| *k != key);
        self.bindings.push((key, action));
        self
    }

    pub fn bind_all(self, keys: &[Key], action: A) -> Self {
        keys.iter().fold(self, |b, &k| b.bind(k, action))
    }

    pub fn action(&self, key: Key) -> Option<A> {
        self.bindings.iter().find(|(k, _)| *k == key).map(|(_, a)| *a)
    }
}

/// minifb window, opened lazily at the size of the first frame.
pub struct DisplayWindow {
    title: String,
    target_fps: usize,
    window: Option<Window>,
    cancel: CancelToken,
    pending_keys: VecDeque<Key>,
    last_mouse: Option<(i32, i32)>,
    mouse_down: bool,
}

impl DisplayWindow {
    pub fn new(title: impl Into<String>, cancel: CancelToken) -> Self {
        Self {
            title: title.into(),
            target_fps: 60,
            window: None,
            cancel,
            pending_keys: VecDeque::new(),
            last_mouse: None,
            mouse_down: false,
        }
    }

    pub fn with_target_fps(mut self, fps: usize) -> Self {
        self.target_fps = fps.max(1);
        self
    }

    pub fn is_open(&self) -> bool {
        self.window.as_ref().is_some_and(Window::is_open)
    }

    /// Drop the OS window. Safe to call more than once.
    pub fn close(&mut self) {
        if self.window.take().is_some() {
            log::info!("closed window '{}'", self.title);
        }
    }

    fn ensure_open(&mut self, width: usize, height: usize) -> Result<&mut Window, Error> {
        if self.window.is_none() {
            let opts = WindowOptions { resize: true, ..WindowOptions::default() };
            let mut window =
                Window::new(&self.title, width, height, opts).map_err(|e| Error::WindowInit(e.to_string()))?;
            window.set_target_fps(self.target_fps);
            log::info!("opened window '{}' at {width}x{height}", self.title);
            self.window = Some(window);
        }
        self.window.as_mut().ok_or_else(|| Error::WindowInit("window unavailable".into()))
    }

    /// Turn the mouse state since the last frame into move/down/up events,
    /// in frame pixel coordinates.
    fn poll_pointer(window: &Window, frame: &FrameBuffer, last: Option<(i32, i32)>, was_down: bool) -> (Vec<PointerEvent>, Option<(i32, i32)>, bool) {
        let mut events = Vec::new();
        let (win_w, win_h) = window.get_size();
        let pos = window.get_mouse_pos(MouseMode::Pass).map(|(mx, my)| {
            // The buffer is stretched to the window; undo that
            let sx = frame.width as f32 / win_w.max(1) as f32;
            let sy = frame.height as f32 / win_h.max(1) as f32;
            ((mx * sx).floor() as i32, (my * sy).floor() as i32)
        });
        let down = window.get_mouse_down(MouseButton::Left);

        let Some((x, y)) = pos.or(last) else { return (events, None, down) };
        if pos.is_some() && pos != last {
            events.push(PointerEvent::moved(x, y));
        }
        match (was_down, down) {
            (false, true) => events.push(PointerEvent::down(x, y)),
            (true, false) => events.push(PointerEvent::up(x, y)),
            _ => {}
        }
        (events, Some((x, y)), down)
    }
}

impl Screen for DisplayWindow {
    fn show(&mut self, frame: &FrameBuffer, ui: &mut Node) -> Result<Shown, Error> {
        let (last, was_down) = (self.last_mouse, self.mouse_down);
        let window = self.ensure_open(frame.width, frame.height)?;
        window
            .update_with_buffer(&frame.pixels, frame.width, frame.height)
            .map_err(|e| Error::WindowUpdate(e.to_string()))?;
        if !window.is_open() {
            return Ok(Shown { request_break: true, keypress: None });
        }

        let (events, pos, down) = Self::poll_pointer(window, frame, last, was_down);
        let keys = window.get_keys_pressed(KeyRepeat::Yes);
        self.last_mouse = pos;
        self.mouse_down = down;
        for ev in events {
            ui.dispatch(ev);
        }

        let mut request_break = false;
        for key in keys {
            match key {
                Key::Escape => {
                    log::warn!("escape pressed, cancelling");
                    self.cancel.cancel();
                    request_break = true;
                }
                Key::Q => request_break = true,
                other => self.pending_keys.push_back(other),
            }
        }
        Ok(Shown { request_break, keypress: self.pending_keys.pop_front() })
    }
}

impl Drop for DisplayWindow {
    fn drop(&mut self) {
        self.close();
    }
}
