//! Pages command implementation - print the selectable page catalog

use anyhow::Result;
use mapsheet_core::{Orientation, PageSize};

pub fn execute() -> Result<()> {
    println!("{:<6} {:>12} {:>12}", "NAME", "LANDSCAPE", "PORTRAIT");
    for size in PageSize::ALL {
        let (lw, lh) = size.oriented_mm(Orientation::Landscape);
        let (pw, ph) = size.oriented_mm(Orientation::Portrait);
        println!(
            "{:<6} {:>5.0}x{:<6.0} {:>5.0}x{:<6.0}",
            size.as_str(),
            lw,
            lh,
            pw,
            ph
        );
    }
    println!();
    println!("Dimensions in mm. Select with --page, flip with --orientation portrait.");
    Ok(())
}
