use pixelstack::arrange::{CANDIDATES, DEFAULT_TARGET_RATIO, Side, StackOrder, candidate_ratios, find_best_display_arrangement};

#[test]
fn arrangement_is_deterministic() {
    let first = find_best_display_arrangement((400, 800), (200, 200), DEFAULT_TARGET_RATIO, 4);
    for _ in 0..10 {
        assert_eq!(find_best_display_arrangement((400, 800), (200, 200), DEFAULT_TARGET_RATIO, 4), first);
    }
    assert_eq!(first, (Side::Right, StackOrder::Vertical));
}

#[test]
fn chosen_arrangement_has_smallest_delta() {
    for (image_hw, tile_hw) in [((300, 1200), (64, 64)), ((1200, 300), (64, 64)), ((500, 500), (256, 128))] {
        let ratios = candidate_ratios(image_hw, tile_hw, 4);
        let best = find_best_display_arrangement(image_hw, tile_hw, DEFAULT_TARGET_RATIO, 4);
        let best_idx = CANDIDATES.iter().position(|c| *c == best).unwrap();
        let best_delta = (DEFAULT_TARGET_RATIO - ratios[best_idx]).abs();
        for (i, r) in ratios.iter().enumerate() {
            let delta = (DEFAULT_TARGET_RATIO - r).abs();
            assert!(delta >= best_delta);
            if i < best_idx {
                // Earlier candidates must be strictly worse
                assert!(delta > best_delta);
            }
        }
    }
}

#[test]
fn very_wide_image_stacks_tiles_on_top() {
    let (side, _) = find_best_display_arrangement((100, 1000), (100, 100), DEFAULT_TARGET_RATIO, 4);
    assert_eq!(side, Side::Top);
}
