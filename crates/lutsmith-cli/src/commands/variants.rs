//! Registry listing command

use anyhow::Result;
use lutsmith_core::{ColorSpace, EXPORT_VARIANTS, LutSize, PreviewGamma};

pub fn run() -> Result<()> {
    println!("Export variants:");
    for variant in &EXPORT_VARIANTS {
        println!(
            "  {:<14} {:<14} {:<10} {}",
            variant.id,
            variant.name,
            variant.color_space.id(),
            variant.description
        );
    }

    println!("\nLUT sizes:");
    for size in LutSize::ALL {
        println!("  {:<4} {:<10} {:>7} nodes", size.value(), size.label(), size.node_count());
    }

    println!("\nInput color spaces:");
    for space in ColorSpace::ALL {
        println!("  {:<10} {}", space.id(), space.label());
    }

    println!("\nPreview gammas:");
    for gamma in PreviewGamma::ALL {
        println!("  {gamma}");
    }
    Ok(())
}
