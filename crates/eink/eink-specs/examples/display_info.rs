//! Display Information Example
//!
//! Lists every known panel with its driver-name string and derived sizes.
//!
//! Run with: cargo run --example display_info

use eink_specs::displays;
use eink_specs::DisplaySpec;

fn print_display_info(spec: &DisplaySpec) {
    println!("\n{}", "=".repeat(60));
    println!("{} ({})", spec.name, spec.model);
    println!("{}", "=".repeat(60));

    println!("  Native resolution: {}×{} pixels", spec.width, spec.height);
    let (w, h) = spec.landscape_size();
    println!("  Horizontal image:  {w}×{h} pixels");
    println!("  Diagonal: {:.2}\"", spec.diagonal_inches());
    println!("  Controller: {:?}", spec.controller);
    println!("  Panel Type: {:?}", spec.panel_type);
    println!("  Frame size: {} bytes", spec.frame_bytes());
    println!(
        "  Refresh: full {}ms, partial {}ms",
        spec.full_refresh_ms, spec.partial_refresh_ms
    );
}

fn main() {
    for spec in displays::ALL {
        print_display_info(spec);
    }
}
