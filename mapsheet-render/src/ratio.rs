/*!
Process-wide device pixel ratio override.

Host map views rasterize at the platform's native pixel ratio; print export
needs the offscreen surface rasterized at `dpi / 96` instead. The rendering
stack reads the ratio from one process-wide slot, so the pipeline installs
an override for the duration of a single export and puts the previous value
back when the guard drops. Restoration runs on every exit path, including
encoder errors. A stale override would corrupt subsequent on-screen
rendering.

Overlapping overrides restore in drop order, not acquisition order, and can
leave the slot at the wrong value until the last guard drops. Callers are
expected to run one export at a time; the pipeline does not serialize calls
itself.
*/

use mapsheet_core::Dpi;
use parking_lot::Mutex;

static PIXEL_RATIO: Mutex<f64> = Mutex::new(1.0);

/// The pixel ratio currently in effect for offscreen rendering.
pub fn current_pixel_ratio() -> f64 {
    *PIXEL_RATIO.lock()
}

/// RAII guard over the process-wide pixel ratio.
///
/// Created at the top of an export, dropped at the bottom. Holds no lock
/// between construction and drop.
#[derive(Debug)]
pub struct PixelRatioOverride {
    previous: f64,
}

impl PixelRatioOverride {
    /// Installs `dpi / 96` as the active pixel ratio.
    pub fn apply(dpi: Dpi) -> Self {
        Self::set(dpi.pixel_ratio())
    }

    /// Installs an explicit ratio.
    pub fn set(ratio: f64) -> Self {
        let mut slot = PIXEL_RATIO.lock();
        let previous = *slot;
        *slot = ratio;
        log::debug!("Pixel ratio override {} -> {}", previous, ratio);
        Self { previous }
    }

    /// The ratio that will be restored when this guard drops.
    pub fn saved(&self) -> f64 {
        self.previous
    }
}

impl Drop for PixelRatioOverride {
    fn drop(&mut self) {
        *PIXEL_RATIO.lock() = self.previous;
        log::debug!("Pixel ratio restored to {}", self.previous);
    }
}

/// Serializes tests that touch the shared ratio slot. The test harness runs
/// tests on parallel threads; without this, one test would observe another's
/// override.
#[cfg(test)]
pub(crate) static TEST_RATIO_LOCK: Mutex<()> = Mutex::new(());
