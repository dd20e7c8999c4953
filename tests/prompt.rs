mod common;

use std::cell::RefCell;
use std::rc::Rc;

use common::{ScriptedScreen, click, gradient, point_in};
use minifb::Key;
use pixelstack::config::PromptConfig;
use pixelstack::error::Error;
use pixelstack::geometry::XYNorm;
use pixelstack::node::PointerEvent;
use pixelstack::prompt_ui::{Prediction, PromptAction, PromptUi, PromptUiControl, Prompts, Tool, run_prompt_ui};
use pixelstack::types::MaskPredictions;
use pixelstack::window::{CancelToken, Shown};

fn control() -> PromptUiControl {
    let cfg = PromptConfig { render_height: 300, ..PromptConfig::default() };
    let ui = PromptUi::new(&gradient(60, 90), (16, 16), &cfg).unwrap();
    let mut control = PromptUiControl::new(ui);
    control.render();
    control
}

fn close_to(p: XYNorm, x: f32, y: f32) -> bool {
    (p.x - x).abs() < 0.02 && (p.y - y).abs() < 0.02
}

/// Masks are a filled square in the middle, whatever the prompts.
fn square_predictor(calls: Rc<RefCell<Vec<Prompts>>>) -> impl FnMut(&Prompts) -> Result<Prediction, Error> {
    move |prompts: &Prompts| {
        calls.borrow_mut().push(prompts.clone());
        let side = 8;
        let mut scores = vec![-1.0; 4 * side * side];
        for m in 0..4 {
            for y in 2..6 {
                for x in 2..6 {
                    scores[m * side * side + y * side + x] = 1.0;
                }
            }
        }
        Ok(Prediction { masks: MaskPredictions::new(4, side, side, scores)?, iou: vec![0.9, 0.8, 0.7, 0.6] })
    }
}

#[test]
fn hover_click_becomes_foreground_point() {
    let mut control = control();
    let image = control.ui().image().id();
    control.read_prompts().unwrap();

    let p = point_in(control.ui().root(), image, 0.3, 0.4);
    click(control.ui_mut().root_mut(), p);

    let first = control.read_prompts().unwrap();
    assert!(first.need_reencode);
    assert_eq!(control.ui().selected_tool(), Tool::FgPoint);
    assert_eq!(first.prompts.fg_points.len(), 1);
    assert!(close_to(first.prompts.fg_points[0], 0.3, 0.4));

    // The promoted point now lives in the foreground overlay itself
    let second = control.read_prompts().unwrap();
    assert!(second.need_reencode);
    assert_eq!(second.prompts.fg_points.len(), 1);
    assert!(close_to(second.prompts.fg_points[0], 0.3, 0.4));

    let third = control.read_prompts().unwrap();
    assert!(!third.need_reencode);
    assert_eq!(third.prompts.fg_points.len(), 1);
}

#[test]
fn clicking_only_fg_point_reverts_to_hover() {
    let mut control = control();
    let image = control.ui().image().id();
    control.ui_mut().select_tool(Tool::FgPoint).unwrap();
    control.read_prompts().unwrap();

    let p = point_in(control.ui().root(), image, 0.5, 0.5);
    click(control.ui_mut().root_mut(), p);
    let added = control.read_prompts().unwrap();
    assert_eq!(added.prompts.fg_points.len(), 1);
    assert_eq!(control.ui().selected_tool(), Tool::FgPoint);

    // Clicking the same spot removes the point
    click(control.ui_mut().root_mut(), p);
    let removed = control.read_prompts().unwrap();
    assert!(removed.need_reencode);
    assert!(removed.prompts.is_empty());
    assert_eq!(control.ui().selected_tool(), Tool::Hover);
}

#[test]
fn hover_is_ignored_by_other_tools() {
    let mut control = control();
    let image = control.ui().image().id();
    control.ui_mut().select_tool(Tool::Box).unwrap();
    control.read_prompts().unwrap();

    let (x, y) = point_in(control.ui().root(), image, 0.5, 0.5);
    control.ui_mut().root_mut().dispatch(PointerEvent::moved(x, y));
    let read = control.read_prompts().unwrap();
    assert!(!read.need_reencode);
    assert!(read.prompts.fg_points.is_empty());
}

#[test]
fn pointer_over_tool_bar_needs_no_reencode() {
    let mut control = control();
    let image = control.ui().image().id();
    let hover = control.ui().tools().hover.id();
    control.read_prompts().unwrap();

    let (x, y) = point_in(control.ui().root(), hover, 0.5, 0.5);
    for dx in 0..4 {
        control.ui_mut().root_mut().dispatch(PointerEvent::moved(x + dx, y));
        assert!(!control.read_prompts().unwrap().need_reencode);
    }

    // Entering and then leaving the image are both changes
    let (ix, iy) = point_in(control.ui().root(), image, 0.5, 0.5);
    control.ui_mut().root_mut().dispatch(PointerEvent::moved(ix, iy));
    assert!(control.read_prompts().unwrap().need_reencode);
    control.ui_mut().root_mut().dispatch(PointerEvent::moved(x, y));
    let read = control.read_prompts().unwrap();
    assert!(read.need_reencode);
    assert!(read.prompts.fg_points.is_empty());
}

#[test]
fn box_drag_adds_box() {
    let mut control = control();
    let image = control.ui().image().id();
    control.ui_mut().select_tool(Tool::Box).unwrap();
    control.read_prompts().unwrap();

    let (x1, y1) = point_in(control.ui().root(), image, 0.2, 0.2);
    let (x2, y2) = point_in(control.ui().root(), image, 0.6, 0.7);
    let root = control.ui_mut().root_mut();
    root.dispatch(PointerEvent::down(x1, y1));
    root.dispatch(PointerEvent::moved(x2, y2));
    root.dispatch(PointerEvent::up(x2, y2));

    let read = control.read_prompts().unwrap();
    assert!(read.need_reencode);
    assert_eq!(read.prompts.boxes.len(), 1);
    assert!(close_to(read.prompts.boxes[0].xy1, 0.2, 0.2));
    assert!(close_to(read.prompts.boxes[0].xy2, 0.6, 0.7));
}

#[test]
fn need_reencode_is_one_shot() {
    let mut control = control();
    assert!(control.read_prompts().unwrap().need_reencode);
    assert!(!control.read_prompts().unwrap().need_reencode);

    control.apply(PromptAction::NextTool).unwrap();
    assert!(control.read_prompts().unwrap().need_reencode);
    assert!(!control.read_prompts().unwrap().need_reencode);
}

#[test]
fn tool_keys_wrap_around() {
    let mut control = control();
    assert_eq!(control.ui().selected_tool(), Tool::Hover);
    control.apply(PromptAction::PreviousTool).unwrap();
    assert_eq!(control.ui().selected_tool(), Tool::BgPoint);
    control.apply(PromptAction::NextTool).unwrap();
    assert_eq!(control.ui().selected_tool(), Tool::Hover);

    control.apply(PromptAction::NextMask).unwrap();
    control.apply(PromptAction::NextMask).unwrap();
    control.apply(PromptAction::NextMask).unwrap();
    assert_eq!(control.ui().selected_mask(), 0);
    assert!(!control.apply(PromptAction::Confirm).unwrap());
}

#[test]
fn clear_button_wipes_prompts() {
    let mut control = control();
    let prompts = Prompts { fg_points: vec![XYNorm::new(0.1, 0.1)], bg_points: vec![XYNorm::new(0.9, 0.9)], ..Prompts::default() };
    control.load_initial_prompts(&prompts).unwrap();
    assert_eq!(control.read_prompts().unwrap().prompts.len(), 2);

    let clear = control.ui().tools().clear.id();
    let p = point_in(control.ui().root(), clear, 0.5, 0.5);
    click(control.ui_mut().root_mut(), p);
    let read = control.read_prompts().unwrap();
    assert!(read.need_reencode);
    assert!(read.prompts.is_empty());
}

#[test]
fn session_returns_prompts_and_full_size_mask() {
    let calls = Rc::new(RefCell::new(Vec::new()));
    let cfg = PromptConfig { render_height: 300, ..PromptConfig::default() };
    let image = gradient(60, 90);

    // The image handle is only known once the UI exists, so aim at the first
    // expanding image in the tree: the main display
    let mut screen = ScriptedScreen::new()
        .then(|ui| {
            let image = main_image_id(ui);
            let p = point_in(ui, image, 0.3, 0.4);
            click(ui, p);
            Shown::default()
        })
        .key(Key::Space)
        .key(Key::Enter);
    let session = run_prompt_ui(&image, &cfg, &mut screen, &CancelToken::new(), square_predictor(calls.clone())).unwrap();

    assert_eq!(session.prompts.fg_points.len(), 1);
    assert!(close_to(session.prompts.fg_points[0], 0.3, 0.4));
    assert_eq!(session.mask_index, 1);
    let mask = session.mask.unwrap();
    assert_eq!(mask.dimensions(), (90, 60));
    assert_eq!(mask.get_pixel(45, 30)[0], 255);
    assert_eq!(mask.get_pixel(2, 2)[0], 0);
    // Initial prediction, then once per re-encode
    assert!(calls.borrow().len() >= 2);
    assert!(calls.borrow()[0].is_empty());
}

#[test]
fn tiles_follow_predicted_mask_count() {
    let calls = Rc::new(RefCell::new(Vec::new()));
    let cfg = PromptConfig { render_height: 300, num_masks: 5, ..PromptConfig::default() };
    let mut screen = ScriptedScreen::new().key(Key::Down).key(Key::Down).key(Key::Down).key(Key::Enter);
    let session =
        run_prompt_ui(&gradient(60, 90), &cfg, &mut screen, &CancelToken::new(), square_predictor(calls)).unwrap();
    // Four tiles: 1 -> 2 -> 3 -> 0
    assert_eq!(session.mask_index, 0);
    assert_eq!(session.mask.unwrap().dimensions(), (90, 60));
}

#[test]
fn cancelled_session_returns_nothing() {
    let calls = Rc::new(RefCell::new(Vec::new()));
    let cancel = CancelToken::new();
    let token = cancel.clone();
    let mut screen = ScriptedScreen::new().then(move |_| {
        token.cancel();
        Shown::default()
    });
    let session =
        run_prompt_ui(&gradient(60, 90), &PromptConfig::default(), &mut screen, &cancel, square_predictor(calls)).unwrap();
    assert!(session.mask.is_none());
    assert!(session.prompts.is_empty());
}

/// Id of the "MainDisplayImage" node.
fn main_image_id(ui: &pixelstack::node::Node) -> pixelstack::node::NodeId {
    fn walk(node: &pixelstack::node::Node) -> Option<pixelstack::node::NodeId> {
        use pixelstack::node::NodeKind;
        if node.debug_name() == "MainDisplayImage" {
            return Some(node.id());
        }
        match node.kind() {
            NodeKind::Stack(s) => s.children().iter().find_map(walk),
            NodeKind::OverlayStack(o) => walk(o.base()),
            _ => None,
        }
    }
    walk(ui).expect("main image is in the tree")
}
