//! Clock Example
//!
//! Draws the current UTC time on a 2.13" panel once a second for a few
//! seconds, repeating each frame so the previous digits lose their ghost.
//! Runs in emulation and saves the final canvas as PNG.
//!
//! Run with: cargo run -p eink-display --example clock [-- out.png]
//! Logs: RUST_LOG=eink_display=debug,eink_emulator=trace

use std::time::{Duration, SystemTime, UNIX_EPOCH};

use eink_display::{ControllerConfig, DisplayController, Layout, Orientation};
use eink_emulator::{CanvasView, Pacing, Presentation};
use embedded_graphics::mono_font::{
    ascii::{FONT_6X10, FONT_10X20},
    MonoTextStyle,
};
use embedded_graphics::pixelcolor::BinaryColor;
use embedded_graphics::prelude::*;
use embedded_graphics::primitives::{PrimitiveStyle, Rectangle};
use embedded_graphics::text::Text;
use platform::{HardwarePresence, HostBoard, SpiProbe};
use tracing_subscriber::EnvFilter;

const MODEL: &str = "epd2in13_V2";
const TICKS: u32 = 3;

fn hh_mm_ss(now: Duration) -> String {
    let secs = now.as_secs() % 86_400;
    format!("{:02}:{:02}:{:02}", secs / 3600, secs % 3600 / 60, secs % 60)
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let probe = SpiProbe::new();
    println!("Host board: {}", HostBoard::detect().name());
    if probe.panel_present() {
        println!("A panel is attached, but this demo has no vendor driver; emulating.");
    }

    let mut config = ControllerConfig::default();
    config.emulator.pacing = Pacing::Fixed { millis: 100 };

    let spec = eink_specs::displays::by_model(MODEL).ok_or("unknown model")?;
    let canvas = CanvasView::new(spec.width, spec.height, Presentation::LANDSCAPE_2X);
    let mut display = DisplayController::emulated(MODEL, canvas, config)?;

    let big = MonoTextStyle::new(&FONT_10X20, BinaryColor::On);
    let small = MonoTextStyle::new(&FONT_6X10, BinaryColor::On);

    for tick in 0..TICKS {
        let now = SystemTime::now().duration_since(UNIX_EPOCH)?;
        let mut image = display.new_image(Layout::Horizontal)?;

        Rectangle::new(Point::new(2, 2), Size::new(246, 118))
            .into_styled(PrimitiveStyle::with_stroke(BinaryColor::On, 2))
            .draw(&mut image)?;
        Text::new(&hh_mm_ss(now), Point::new(85, 66), big).draw(&mut image)?;
        Text::new(spec.name, Point::new(10, 110), small).draw(&mut image)?;

        let summary = display.display_image(&image, Orientation::Normal, 3)?;
        println!(
            "tick {tick}: {} written, {} skipped",
            summary.written, summary.skipped
        );
        std::thread::sleep(Duration::from_secs(1));
    }

    let path = std::env::args().nth(1).unwrap_or_else(|| "clock.png".to_owned());
    if let Some(canvas) = display.sink().view() {
        canvas.save_png(&path)?;
        println!("Saved {path}");
    }
    Ok(())
}
