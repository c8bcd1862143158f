//! Write limiting through the controller, on a recording mock panel

#![allow(
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::panic,
    clippy::indexing_slicing,
    clippy::arithmetic_side_effects,
    clippy::cast_possible_truncation
)]

use eink_display::{
    ControllerConfig, DisplayController, DisplayError, Layout, MonochromeImage, Orientation,
    Region, RegionKey, WriteOutcome,
};
use eink_emulator::NullView;
use embedded_graphics::pixelcolor::BinaryColor;
use embedded_graphics::prelude::*;
use embedded_graphics::primitives::{PrimitiveStyle, Rectangle};
use platform::mocks::MockPanel;
use proptest::prelude::*;

const MODEL: &str = "epd2in13_V2";

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

fn display() -> DisplayController<MockPanel, NullView> {
    init_tracing();
    DisplayController::physical(MODEL, MockPanel::new(), ControllerConfig::default()).unwrap()
}

fn writes(display: &DisplayController<MockPanel, NullView>) -> usize {
    display.sink().driver().unwrap().write_count()
}

fn image_with_box(display: &DisplayController<MockPanel, NullView>, x: i32) -> MonochromeImage {
    let mut image = display.new_image(Layout::Horizontal).unwrap();
    Rectangle::new(Point::new(x, 10), Size::new(20, 20))
        .into_styled(PrimitiveStyle::with_fill(BinaryColor::On))
        .draw(&mut image)
        .unwrap();
    image
}

#[test]
fn test_four_submissions_write_three_times() {
    let mut display = display();
    let image = image_with_box(&display, 5);

    let outcomes: Vec<_> = (0..5)
        .map(|_| display.display_full(&image, Orientation::Normal).unwrap())
        .collect();

    assert_eq!(
        outcomes,
        vec![
            WriteOutcome::Written,
            WriteOutcome::Written,
            WriteOutcome::Written,
            WriteOutcome::Skipped,
            WriteOutcome::Skipped,
        ]
    );
    assert_eq!(writes(&display), 3);
}

#[test]
fn test_change_resets_repeat_budget() {
    let mut display = display();
    let b = image_with_box(&display, 5);
    let c = image_with_box(&display, 50);

    for _ in 0..4 {
        display.display_full(&b, Orientation::Normal).unwrap();
    }
    for _ in 0..4 {
        display.display_full(&c, Orientation::Normal).unwrap();
    }
    assert_eq!(writes(&display), 6);
}

#[test]
fn test_orientation_change_is_a_change() {
    let mut display = display();
    let image = image_with_box(&display, 5);
    for _ in 0..3 {
        display.display_full(&image, Orientation::Normal).unwrap();
    }
    assert_eq!(
        display.display_full(&image, Orientation::UpsideDown).unwrap(),
        WriteOutcome::Written
    );
}

#[test]
fn test_repeat_ten_matches_repeat_three() {
    let mut ten = display();
    let mut three = display();
    let image = image_with_box(&ten, 5);

    let a = ten.display_image(&image, Orientation::Normal, 10).unwrap();
    let b = three.display_image(&image, Orientation::Normal, 3).unwrap();

    assert_eq!(a.written, b.written);
    assert_eq!(
        ten.sink().driver().unwrap().calls(),
        three.sink().driver().unwrap().calls()
    );
    assert_eq!(b.skipped, 0);
    assert_eq!(a.skipped, 7);

    // one more submission is suppressed on both
    assert_eq!(
        ten.display_full(&image, Orientation::Normal).unwrap(),
        WriteOutcome::Skipped
    );
    assert_eq!(
        three.display_full(&image, Orientation::Normal).unwrap(),
        WriteOutcome::Skipped
    );
}

#[test]
fn test_partial_and_full_are_limited_separately() {
    let mut display = display();
    let full = display.new_image(Layout::Vertical).unwrap();
    let patch = MonochromeImage::new(16, 16).unwrap();
    let region = RegionKey::Rect(Region::new(0, 0, 16, 16));

    for _ in 0..3 {
        display.display_full(&full, Orientation::Normal).unwrap();
    }
    assert_eq!(
        display.display_partial(region, &patch).unwrap(),
        WriteOutcome::Written
    );
    assert_eq!(
        display.display_full(&full, Orientation::Normal).unwrap(),
        WriteOutcome::Skipped
    );
}

#[test]
fn test_partially_outside_region_writes_nothing() {
    let mut display = display();
    let patch = MonochromeImage::new(32, 32).unwrap();

    for region in [
        Region::new(100, 0, 32, 32),
        Region::new(0, 230, 32, 32),
        Region::new(u32::MAX - 8, 0, 32, 32),
    ] {
        let result = display.display_partial(RegionKey::Rect(region), &patch);
        assert!(
            matches!(result, Err(DisplayError::RegionOutOfBounds { region: r, .. }) if r == region),
            "{region:?}: {result:?}"
        );
    }
    assert_eq!(writes(&display), 0);
    assert_eq!(display.limiter().tracker().regions().count(), 0);
}

fn region_strategy() -> impl Strategy<Value = Region> {
    (0u32..100, 0u32..220, 1u32..=22, 1u32..=30).prop_map(|(x, y, w, h)| Region::new(x, y, w, h))
}

fn patch_strategy(region: Region) -> impl Strategy<Value = MonochromeImage> {
    let pixels = (region.width * region.height) as usize;
    proptest::collection::vec(any::<bool>(), pixels).prop_map(move |ink| {
        let mut image = MonochromeImage::new(region.width, region.height).unwrap();
        for (i, on) in ink.into_iter().enumerate() {
            if on {
                let i = i as u32;
                image.set_pixel(i % region.width, i / region.width, BinaryColor::On);
            }
        }
        image
    })
}

proptest! {
    /// The first submission to any region is always written.
    #[test]
    fn first_submission_always_writes(
        (region, patch) in region_strategy().prop_flat_map(|r| (Just(r), patch_strategy(r))),
    ) {
        let mut display = display();
        let outcome = display.display_partial(RegionKey::Rect(region), &patch).unwrap();
        prop_assert_eq!(outcome, WriteOutcome::Written);
        prop_assert_eq!(writes(&display), 1);
    }

    /// n identical submissions write min(n, 3) times.
    #[test]
    fn identical_submissions_capped_at_three(
        (region, patch) in region_strategy().prop_flat_map(|r| (Just(r), patch_strategy(r))),
        n in 1usize..8,
    ) {
        let mut display = display();
        for _ in 0..n {
            display.display_partial(RegionKey::Rect(region), &patch).unwrap();
        }
        prop_assert_eq!(writes(&display), n.min(3));
    }

    /// A different frame in between restores the full budget.
    #[test]
    fn alternating_frames_always_write(rounds in 1usize..6) {
        let mut display = display();
        let white = MonochromeImage::new(16, 8).unwrap();
        let black = MonochromeImage::filled(16, 8, BinaryColor::On).unwrap();
        let region = RegionKey::Rect(Region::new(8, 8, 16, 8));
        for _ in 0..rounds {
            prop_assert_eq!(display.display_partial(region, &white).unwrap(), WriteOutcome::Written);
            prop_assert_eq!(display.display_partial(region, &black).unwrap(), WriteOutcome::Written);
        }
    }
}
