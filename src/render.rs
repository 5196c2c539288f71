use crate::{
    canvas::{blend, Canvas, Rgb},
    error::GelSimError,
    gel::{self, Band, GelOptions},
};
use serde::Serialize;
use sha1::{Digest, Sha1};
use std::path::{Path, PathBuf};

const PAGE_BACKGROUND: Rgb = [249, 250, 251];
const GEL_BODY: Rgb = [17, 19, 21];
const WELL_COLOR: Rgb = [45, 50, 56];
const SAMPLE_BAND: Rgb = [245, 158, 11];
const LADDER_BAND: Rgb = [229, 231, 235];

/// A rendered gel: the pixel canvas plus the band metadata that produced it.
#[derive(Clone, Debug)]
pub struct GelImage {
    pub canvas: Canvas,
    pub bands: Vec<Band>,
}

/// Reference to a written artifact, returned to the caller together with the
/// band metadata.
#[derive(Clone, Debug, Serialize)]
pub struct RenderedGel {
    pub file_name: String,
    pub path: PathBuf,
    pub bands: Vec<Band>,
}

/// Renders the fragment-length distribution onto a fresh canvas.
///
/// Pure function of its inputs: identical lengths and options (including the
/// jitter seed) produce an identical canvas.
pub fn render(fragment_lengths: &[usize], options: &GelOptions) -> GelImage {
    let layout = gel::layout(fragment_lengths, options);
    let mut canvas = Canvas::new(layout.width, layout.height, PAGE_BACKGROUND);

    canvas.fill_rect(
        gel::GEL_MARGIN,
        gel::GEL_MARGIN,
        layout.width.saturating_sub(2 * gel::GEL_MARGIN),
        layout.height.saturating_sub(2 * gel::GEL_MARGIN),
        GEL_BODY,
    );
    for lane in 0..layout.lane_count {
        let (x, y, width, height) = gel::well_rect(layout.width, layout.lane_count, lane);
        canvas.fill_rect(x, y, width, height, WELL_COLOR);
    }
    for band in &layout.bands {
        let base = if band.is_ladder { LADDER_BAND } else { SAMPLE_BAND };
        let color = blend(GEL_BODY, base, band.intensity);
        let center_x = gel::lane_center_x(layout.width, layout.lane_count, band.lane);
        canvas.draw_band(center_x, band.row, band.width, band.height, color);
    }

    GelImage {
        canvas,
        bands: layout.bands,
    }
}

/// Artifact name derived from a content hash of the render inputs plus a
/// caller-supplied token, so concurrent requests never collide on a fixed or
/// enzyme-derived name.
pub fn artifact_name(fragment_lengths: &[usize], options: &GelOptions, token: &str) -> String {
    let mut hasher = Sha1::new();
    for &len in fragment_lengths {
        hasher.update((len as u64).to_le_bytes());
    }
    hasher.update([0xff]);
    hasher.update(options.width.to_le_bytes());
    hasher.update(options.height.to_le_bytes());
    match options.seed {
        Some(seed) => {
            hasher.update([1]);
            hasher.update(seed.to_le_bytes());
        }
        None => hasher.update([0]),
    }
    if let Some(ladder) = &options.ladder {
        for &size in ladder {
            hasher.update((size as u64).to_le_bytes());
        }
    }
    hasher.update([0xff]);
    hasher.update(token.as_bytes());
    let digest = hasher.finalize();
    let hex: String = digest.iter().map(|b| format!("{b:02x}")).collect();
    format!("gel_{hex}.png")
}

/// Renders and writes the PNG artifact under `dir`.
///
/// A failed write is fatal to this request only; nothing is left half-drawn
/// in memory and other renders are unaffected.
pub fn render_to_file(
    fragment_lengths: &[usize],
    options: &GelOptions,
    dir: &Path,
    token: &str,
) -> Result<RenderedGel, GelSimError> {
    let image = render(fragment_lengths, options);
    let file_name = artifact_name(fragment_lengths, options, token);
    let path = dir.join(&file_name);
    image.canvas.write_png(&path)?;
    log::info!(
        "Wrote gel image {} ({} band(s), {} fragment(s))",
        path.display(),
        image.bands.len(),
        fragment_lengths.len()
    );
    Ok(RenderedGel {
        file_name,
        path,
        bands: image.bands,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn test_render_is_deterministic_without_jitter() {
        let options = GelOptions::default();
        let lengths = [800, 400, 120];
        let a = render(&lengths, &options);
        let b = render(&lengths, &options);
        assert_eq!(a.canvas, b.canvas);
        assert_eq!(a.bands, b.bands);
    }

    #[test]
    fn test_written_artifacts_are_byte_identical() {
        let dir = tempfile::tempdir().unwrap();
        let options = GelOptions {
            seed: Some(7),
            ..GelOptions::default()
        };
        let lengths = [1000, 250, 50];
        let a = render_to_file(&lengths, &options, dir.path(), "req-a").unwrap();
        let b = render_to_file(&lengths, &options, dir.path(), "req-b").unwrap();
        assert_ne!(a.file_name, b.file_name);
        assert_eq!(
            fs::read(&a.path).unwrap(),
            fs::read(&b.path).unwrap()
        );
    }

    #[test]
    fn test_band_pixels_land_on_canvas() {
        let options = GelOptions::default();
        let image = render(&[600, 90], &options);
        for band in &image.bands {
            let x = gel::lane_center_x(options.width, 1, band.lane);
            let pixel = image.canvas.get(x, band.row).unwrap();
            assert_ne!(pixel, GEL_BODY);
            assert_ne!(pixel, PAGE_BACKGROUND);
        }
    }

    #[test]
    fn test_artifact_name_depends_on_inputs_and_token() {
        let options = GelOptions::default();
        let base = artifact_name(&[100, 50], &options, "t");
        assert_ne!(base, artifact_name(&[100, 51], &options, "t"));
        assert_ne!(base, artifact_name(&[100, 50], &options, "u"));
        let seeded = GelOptions {
            seed: Some(1),
            ..GelOptions::default()
        };
        assert_ne!(base, artifact_name(&[100, 50], &seeded, "t"));
        assert_eq!(base, artifact_name(&[100, 50], &options, "t"));
    }

    #[test]
    fn test_render_io_error_is_per_request() {
        let missing = Path::new("/nonexistent-dir");
        let err = render_to_file(&[100], &GelOptions::default(), missing, "t").unwrap_err();
        assert!(matches!(err, GelSimError::RenderIo { .. }));

        // An earlier failure must not affect a later render.
        let dir = tempfile::tempdir().unwrap();
        let ok = render_to_file(&[100], &GelOptions::default(), dir.path(), "t").unwrap();
        assert!(ok.path.exists());
    }
}
