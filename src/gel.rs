use rand::{rngs::StdRng, Rng, SeedableRng};
use serde::Serialize;

/// Standard marker sizes, in bp, for the optional ladder lane.
pub const DNA_LADDER: [usize; 5] = [1000, 500, 200, 100, 50];

/// Page border around the gel body, in pixels.
pub const GEL_MARGIN: u32 = 24;
const WELL_HEIGHT: u32 = 10;
const WELL_TOP_PAD: u32 = 8;
/// Rows between the wells and the first reachable band position.
const LANE_TOP_PAD: u32 = 18;
const LANE_BOTTOM_PAD: u32 = 14;
const BAND_BASE_HEIGHT: u32 = 4;

const MOBILITY_EPSILON: f64 = 1e-9;

/// Rendering options. `seed: None` disables jitter entirely, which makes the
/// output a pure function of the fragment lengths.
#[derive(Clone, Debug)]
pub struct GelOptions {
    pub width: u32,
    pub height: u32,
    /// Jitter seed for width/intensity variance; `None` = no jitter.
    pub seed: Option<u64>,
    /// Marker sizes for a second, ladder lane; `None` = sample lane only.
    pub ladder: Option<Vec<usize>>,
    /// Bands whose rows differ by no more than this merge into one band.
    pub comigration_tolerance: u32,
}

impl Default for GelOptions {
    fn default() -> Self {
        Self {
            width: 360,
            height: 520,
            seed: None,
            ladder: None,
            comigration_tolerance: 3,
        }
    }
}

/// One rendered band: a fragment, or a co-migrating group of fragments.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Band {
    pub lane: usize,
    /// Vertical pixel row of the band center.
    pub row: u32,
    pub width: u32,
    pub height: u32,
    /// 0.0..=1.0, brighter for co-migrating groups.
    pub intensity: f32,
    /// Lengths of the member fragments, ascending.
    pub lengths: Vec<usize>,
    pub is_ladder: bool,
}

impl Band {
    pub fn fragment_count(&self) -> usize {
        self.lengths.len()
    }
}

/// Band geometry for one render call, before any pixels are drawn.
#[derive(Clone, Debug)]
pub struct GelLayout {
    pub width: u32,
    pub height: u32,
    pub lane_count: usize,
    pub bands: Vec<Band>,
}

/// Horizontal center of a lane, lanes spread evenly across the gel body.
pub fn lane_center_x(canvas_width: u32, lane_count: usize, lane: usize) -> u32 {
    let body_width = canvas_width.saturating_sub(2 * GEL_MARGIN);
    let gap = body_width / (lane_count as u32 + 1);
    GEL_MARGIN + gap * (lane as u32 + 1)
}

/// Top of the usable band range (below the wells).
pub fn lane_top(_canvas_height: u32) -> u32 {
    GEL_MARGIN + WELL_TOP_PAD + WELL_HEIGHT + LANE_TOP_PAD
}

/// Bottom of the usable band range (the migration front).
pub fn lane_bottom(canvas_height: u32) -> u32 {
    canvas_height.saturating_sub(GEL_MARGIN + LANE_BOTTOM_PAD)
}

pub fn well_rect(canvas_width: u32, lane_count: usize, lane: usize) -> (u32, u32, u32, u32) {
    let x = lane_center_x(canvas_width, lane_count, lane);
    let width = 40;
    (x.saturating_sub(width / 2), GEL_MARGIN + WELL_TOP_PAD, width, WELL_HEIGHT)
}

/// Vertical pixel row for a fragment of `len` bp.
///
/// Logarithmic mobility: `p = (ln(max) - ln(len)) / (ln(max) - ln(min) + eps)`
/// clamped to [0, 1], mapped linearly onto `top..bottom`. Shorter fragments
/// migrate farther down; when all fragments share one length, `p` is 0 and
/// the single band sits at the top of the range.
pub fn row_for_length(len: usize, min_len: usize, max_len: usize, top: u32, bottom: u32) -> u32 {
    let min = min_len.max(1) as f64;
    let max = (max_len.max(min_len).max(1) as f64).max(min);
    let len = (len.max(1) as f64).clamp(min, max);
    let p = ((max.ln() - len.ln()) / (max.ln() - min.ln() + MOBILITY_EPSILON)).clamp(0.0, 1.0);
    top + (p * bottom.saturating_sub(top) as f64).round() as u32
}

/// Computes band geometry for the sample lane and the optional ladder lane.
///
/// The migration range spans sample and ladder lengths together, so ladder
/// bands spread over the same scale the fragments migrate on.
pub fn layout(fragment_lengths: &[usize], options: &GelOptions) -> GelLayout {
    let lane_count = 1 + options.ladder.is_some() as usize;
    let mut all_lengths: Vec<usize> = fragment_lengths.iter().copied().filter(|&l| l > 0).collect();
    if let Some(ladder) = &options.ladder {
        all_lengths.extend(ladder.iter().copied().filter(|&l| l > 0));
    }
    let min_len = all_lengths.iter().copied().min().unwrap_or(1);
    let max_len = all_lengths.iter().copied().max().unwrap_or(1);

    let top = lane_top(options.height);
    let bottom = lane_bottom(options.height);
    let lane_width = (options.width.saturating_sub(2 * GEL_MARGIN)) / (lane_count as u32 + 1);

    let mut bands = lane_bands(
        fragment_lengths,
        0,
        false,
        min_len,
        max_len,
        top,
        bottom,
        lane_width,
        options.comigration_tolerance,
    );
    if let Some(ladder) = &options.ladder {
        bands.extend(lane_bands(
            ladder,
            1,
            true,
            min_len,
            max_len,
            top,
            bottom,
            lane_width,
            options.comigration_tolerance,
        ));
    }
    if let Some(seed) = options.seed {
        apply_jitter(&mut bands, seed);
    }

    GelLayout {
        width: options.width,
        height: options.height,
        lane_count,
        bands,
    }
}

#[allow(clippy::too_many_arguments)]
fn lane_bands(
    lengths: &[usize],
    lane: usize,
    is_ladder: bool,
    min_len: usize,
    max_len: usize,
    top: u32,
    bottom: u32,
    lane_width: u32,
    tolerance: u32,
) -> Vec<Band> {
    let mut rows: Vec<(u32, usize)> = lengths
        .iter()
        .copied()
        .filter(|&len| len > 0)
        .map(|len| (row_for_length(len, min_len, max_len, top, bottom), len))
        .collect();
    rows.sort_unstable();

    let base_width = if is_ladder {
        lane_width / 2
    } else {
        lane_width * 3 / 5
    };
    let base_width = base_width.max(12);

    let mut bands = Vec::new();
    let mut i = 0;
    while i < rows.len() {
        let group_row = rows[i].0;
        let mut j = i;
        let mut row_sum: u64 = 0;
        let mut member_lengths = Vec::new();
        while j < rows.len() && rows[j].0 - group_row <= tolerance {
            row_sum += u64::from(rows[j].0);
            member_lengths.push(rows[j].1);
            j += 1;
        }
        member_lengths.sort_unstable();
        let count = (j - i) as u32;
        let intensity = if is_ladder {
            0.8
        } else {
            (0.55 + 0.15 * (count - 1) as f32).min(1.0)
        };
        bands.push(Band {
            lane,
            row: (row_sum / u64::from(count)) as u32,
            width: base_width,
            height: BAND_BASE_HEIGHT + 2 * (count - 1),
            intensity,
            lengths: member_lengths,
            is_ladder,
        });
        i = j;
    }
    bands
}

/// Seeded width/intensity variance on sample bands, to mimic the uneven look
/// of a real gel. Band order is fixed, so a fixed seed reproduces the exact
/// same jitter.
fn apply_jitter(bands: &mut [Band], seed: u64) {
    let mut rng = StdRng::seed_from_u64(seed);
    for band in bands.iter_mut().filter(|b| !b.is_ladder) {
        let dw: i32 = rng.random_range(-3..=3);
        band.width = band.width.saturating_add_signed(dw).max(8);
        band.intensity = (band.intensity * rng.random_range(0.85..=1.0)).clamp(0.2, 1.0);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_shorter_fragments_migrate_farther() {
        let row_long = row_for_length(1000, 50, 1000, 100, 400);
        let row_mid = row_for_length(200, 50, 1000, 100, 400);
        let row_short = row_for_length(50, 50, 1000, 100, 400);
        assert_eq!(row_long, 100);
        assert_eq!(row_short, 400);
        assert!(row_long < row_mid && row_mid < row_short);
    }

    #[test]
    fn test_uniform_lengths_sit_at_top_of_range() {
        assert_eq!(row_for_length(300, 300, 300, 100, 400), 100);
    }

    #[test]
    fn test_comigrating_fragments_merge() {
        let options = GelOptions::default();
        let layout = layout(&[500, 501, 100], &options);
        assert_eq!(layout.lane_count, 1);
        assert_eq!(layout.bands.len(), 2);
        let merged = &layout.bands[0];
        assert_eq!(merged.lengths, vec![500, 501]);
        assert_eq!(merged.fragment_count(), 2);
        let single = &layout.bands[1];
        assert_eq!(single.lengths, vec![100]);
        assert!(merged.height > single.height);
        assert!(merged.intensity > single.intensity);
    }

    #[test]
    fn test_distinct_fragments_stay_separate() {
        let options = GelOptions::default();
        let layout = layout(&[1000, 200, 50], &options);
        assert_eq!(layout.bands.len(), 3);
        for pair in layout.bands.windows(2) {
            assert!(pair[1].row - pair[0].row > options.comigration_tolerance);
        }
    }

    #[test]
    fn test_ladder_lane() {
        let options = GelOptions {
            ladder: Some(DNA_LADDER.to_vec()),
            ..GelOptions::default()
        };
        let layout = layout(&[300], &options);
        assert_eq!(layout.lane_count, 2);
        assert_eq!(layout.bands.iter().filter(|b| b.is_ladder).count(), 5);
        assert_eq!(layout.bands.iter().filter(|b| !b.is_ladder).count(), 1);
        for band in layout.bands.iter().filter(|b| b.is_ladder) {
            assert_eq!(band.lane, 1);
        }
    }

    #[test]
    fn test_layout_without_jitter_is_deterministic() {
        let options = GelOptions::default();
        let a = layout(&[800, 400, 120], &options);
        let b = layout(&[800, 400, 120], &options);
        assert_eq!(a.bands, b.bands);
    }

    #[test]
    fn test_jitter_is_seed_deterministic() {
        let options = GelOptions {
            seed: Some(42),
            ..GelOptions::default()
        };
        let a = layout(&[800, 400, 120], &options);
        let b = layout(&[800, 400, 120], &options);
        assert_eq!(a.bands, b.bands);

        let plain = layout(&[800, 400, 120], &GelOptions::default());
        // Jitter must not move bands, only reshape them.
        for (jittered, base) in a.bands.iter().zip(plain.bands.iter()) {
            assert_eq!(jittered.row, base.row);
            assert_eq!(jittered.lengths, base.lengths);
        }
    }

    #[test]
    fn test_lane_geometry_fits_canvas() {
        let options = GelOptions::default();
        let layout = layout(&[1000, 50], &options);
        for band in &layout.bands {
            assert!(band.row >= lane_top(options.height));
            assert!(band.row <= lane_bottom(options.height));
            let x = lane_center_x(options.width, layout.lane_count, band.lane);
            assert!(x > GEL_MARGIN && x < options.width - GEL_MARGIN);
        }
    }
}
