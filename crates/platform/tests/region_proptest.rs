//! Property tests for region bounds.

#![allow(clippy::unwrap_used, clippy::arithmetic_side_effects)]

use platform::{Region, RegionKey};
use proptest::prelude::*;

fn region() -> impl Strategy<Value = Region> {
    (0u32..300, 0u32..300, 0u32..300, 0u32..300).prop_map(|(x, y, w, h)| Region::new(x, y, w, h))
}

proptest! {
    /// A region fits the panel exactly when its far corner is on the panel.
    #[test]
    fn fits_within_matches_far_corner(r in region(), w in 1u32..300, h in 1u32..300) {
        let expected = r.x + r.width <= w && r.y + r.height <= h;
        prop_assert_eq!(r.fits_within(w, h), expected);
    }

    /// Every pixel a fitting region contains lies on the panel.
    #[test]
    fn contained_pixels_lie_on_panel(r in region(), px in 0u32..600, py in 0u32..600) {
        if r.fits_within(300, 300) && r.contains(px, py) {
            prop_assert!(px < 300 && py < 300);
        }
        if r.contains(px, py) {
            prop_assert!(px - r.x < r.width && py - r.y < r.height);
        }
    }

    /// Region edges never overflow, even at the top of the range.
    #[test]
    fn edges_saturate_to_none(x in (u32::MAX - 10)..=u32::MAX, w in 11u32..100) {
        let r = Region::new(x, 0, w, 1);
        prop_assert_eq!(r.right(), None);
        prop_assert!(!r.fits_within(u32::MAX, 1));
    }

    /// The full frame resolves to the whole panel, which always fits.
    #[test]
    fn full_frame_resolves_to_panel(w in 1u32..2000, h in 1u32..2000) {
        let r = RegionKey::FullFrame.resolve(w, h);
        prop_assert_eq!(r, Region::new(0, 0, w, h));
        prop_assert!(r.fits_within(w, h));
        prop_assert_eq!(r.area(), u64::from(w) * u64::from(h));
    }
}
