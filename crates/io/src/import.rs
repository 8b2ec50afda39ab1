//! Simulated bulk import.
//!
//! There is no spreadsheet parser behind this: the file reference is only
//! validated, progress is reported over a fixed number of timed steps, and
//! the result is a synthetic replacement map of integer strings for the
//! cells the caller says are editable. The one contract callers rely on is
//! that the replacement arrives as a single complete map.

use std::path::Path;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use smol::Timer;

use entrygrid_config::ImportSettings;
use entrygrid_core::CellPos;
use entrygrid_engine::RawValues;

use crate::error::ImportError;
use crate::IMPORT_EXTENSIONS;

/// Upper bound (exclusive) of the synthetic values.
const MAX_SYNTHETIC_VALUE: u32 = 1000;

/// Check that a file reference is something the import accepts.
pub fn validate_source(source: &Path) -> Result<(), ImportError> {
    let ext = source
        .extension()
        .and_then(|e| e.to_str())
        .map(str::to_ascii_lowercase)
        .unwrap_or_default();
    if !IMPORT_EXTENSIONS.contains(&ext.as_str()) {
        return Err(ImportError::UnsupportedFormat(ext));
    }
    if !source.exists() {
        return Err(ImportError::NotFound(source.to_path_buf()));
    }
    Ok(())
}

/// Run the import. Reports `k / steps` after each step and checks
/// `is_superseded` before and after every wait; a superseded run stops early
/// and yields `Ok(None)`.
pub async fn simulate_import(
    source: &Path,
    cells: &[CellPos],
    settings: &ImportSettings,
    is_superseded: impl Fn() -> bool,
    mut on_progress: impl FnMut(f32),
) -> Result<Option<RawValues>, ImportError> {
    validate_source(source)?;

    let steps = settings.steps.max(1);
    for step in 1..=steps {
        if is_superseded() {
            log::debug!("import of {} superseded before step {}", source.display(), step);
            return Ok(None);
        }
        Timer::after(settings.step_delay()).await;
        on_progress(step as f32 / steps as f32);
    }
    if is_superseded() {
        log::debug!("import of {} superseded after the last step", source.display());
        return Ok(None);
    }

    let values = synthesize(cells, settings.seed);
    log::info!("import of {} produced {} value(s)", source.display(), values.len());
    Ok(Some(values))
}

/// Synthetic replacement map: one integer string per cell.
pub fn synthesize(cells: &[CellPos], seed: Option<u64>) -> RawValues {
    let mut rng = match seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };
    cells
        .iter()
        .map(|pos| (*pos, rng.gen_range(0..MAX_SYNTHETIC_VALUE).to_string()))
        .collect()
}
