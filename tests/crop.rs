mod common;

use common::{ScriptedScreen, gradient, point_in};
use minifb::Key;
use pixelstack::config::CropConfig;
use pixelstack::crop_ui::{CropController, CropResult, run_crop_ui};
use pixelstack::node::PointerEvent;
use pixelstack::window::{CancelToken, Shown};

fn small_cfg() -> CropConfig {
    CropConfig { render_height: 300, ..CropConfig::default() }
}

#[test]
fn enter_keeps_initial_crop() {
    let image = gradient(80, 100);
    let cancel = CancelToken::new();
    let mut screen = ScriptedScreen::new().key(Key::Enter);
    let crop = run_crop_ui(&image, &small_cfg(), &mut screen, &cancel).unwrap();
    assert_eq!(crop, CropResult { x: 25..75, y: 20..60 });
    assert_eq!(screen.frames_shown, 1);
    assert_eq!(screen.last_frame_hw.0, 300);
    assert_eq!(crop.apply(&image).hw(), (40, 50));
}

#[test]
fn closing_window_keeps_crop() {
    let image = gradient(80, 100);
    let mut screen = ScriptedScreen::new().idle().idle();
    let crop = run_crop_ui(&image, &small_cfg(), &mut screen, &CancelToken::new()).unwrap();
    assert_eq!(crop, CropResult { x: 25..75, y: 20..60 });
    assert_eq!(screen.frames_shown, 3);
}

#[test]
fn cancel_mid_drag_returns_full_image() {
    let image = gradient(80, 100);
    let ctl = CropController::new(image, small_cfg());
    let crop_box = ctl.handles().crop_box.id();
    let cancel = CancelToken::new();
    let token = cancel.clone();

    let mut screen = ScriptedScreen::new()
        .then(move |ui| {
            let (x, y) = point_in(ui, crop_box, 0.25, 0.25);
            ui.dispatch(PointerEvent::down(x, y));
            Shown::default()
        })
        .then(move |ui| {
            let (x, y) = point_in(ui, crop_box, 0.6, 0.6);
            ui.dispatch(PointerEvent::moved(x, y));
            token.cancel();
            Shown::default()
        })
        .key(Key::Enter);
    let crop = ctl.run(&mut screen, &cancel).unwrap();
    assert_eq!(crop, CropResult::full(100, 80));
    assert_eq!(screen.frames_shown, 2);
}

#[test]
fn dragging_corner_moves_crop() {
    let ctl = CropController::new(gradient(80, 100), small_cfg());
    let crop_box = ctl.handles().crop_box.id();

    let mut screen = ScriptedScreen::new()
        .then(move |ui| {
            let (x, y) = point_in(ui, crop_box, 0.25, 0.25);
            ui.dispatch(PointerEvent::moved(x, y));
            ui.dispatch(PointerEvent::down(x, y));
            let (x, y) = point_in(ui, crop_box, 0.1, 0.1);
            ui.dispatch(PointerEvent::moved(x, y));
            ui.dispatch(PointerEvent::up(x, y));
            Shown::default()
        })
        .idle()
        .key(Key::Enter);
    let crop = ctl.run(&mut screen, &CancelToken::new()).unwrap();
    assert!(crop.x.start.abs_diff(10) <= 1, "x start {}", crop.x.start);
    assert!(crop.y.start.abs_diff(8) <= 1, "y start {}", crop.y.start);
    assert_eq!((crop.x.end, crop.y.end), (75, 60));
}

#[test]
fn done_button_finishes() {
    let ctl = CropController::new(gradient(80, 100), small_cfg());
    let done = ctl.handles().done.id();
    let mut screen = ScriptedScreen::new()
        .then(move |ui| {
            let p = point_in(ui, done, 0.5, 0.5);
            common::click(ui, p);
            Shown::default()
        })
        .idle()
        .idle();
    let crop = ctl.run(&mut screen, &CancelToken::new()).unwrap();
    assert_eq!(crop, CropResult { x: 25..75, y: 20..60 });
    assert_eq!(screen.frames_shown, 1);
}

#[test]
fn nudge_keys_shift_crop() {
    let image = gradient(80, 100);
    let mut screen = ScriptedScreen::new().key(Key::Right).key(Key::Right).key(Key::S).key(Key::Enter);
    let crop = run_crop_ui(&image, &small_cfg(), &mut screen, &CancelToken::new()).unwrap();
    assert_eq!(crop, CropResult { x: 27..77, y: 21..61 });
}
