//! Serde Serialization Example
//!
//! Prints a panel spec as JSON, e.g. for a host-side config file.
//!
//! Run with: cargo run --example serde_example --features serde [-- epd4in2]

#[cfg(feature = "serde")]
fn main() -> Result<(), Box<dyn std::error::Error>> {
    let model = std::env::args().nth(1).unwrap_or_else(|| "epd2in13_V2".to_owned());
    let spec = eink_specs::displays::by_model(&model).ok_or("unknown model")?;

    println!("{}", serde_json::to_string_pretty(spec)?);

    // `DisplaySpec` borrows 'static strings, so reading specs back needs a
    // separate owned config type.
    Ok(())
}

#[cfg(not(feature = "serde"))]
fn main() {
    println!("This example requires the 'serde' feature.");
    println!("Run with: cargo run --example serde_example --features serde");
}
