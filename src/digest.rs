use crate::{
    dna_sequence::DnaSequence, enzymes::Enzymes, error::GelSimError,
    restriction_enzyme::RestrictionEnzyme,
};
use itertools::Itertools;
use serde::Serialize;
use std::collections::BTreeMap;
use std::iter::once;

/// One cut position, tagged with every enzyme that cuts there. Offsets are
/// unique: identical offsets from different enzymes collapse into one site.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct CutSite {
    pub offset: usize,
    pub enzymes: Vec<String>,
}

/// A contiguous slice of the digested sequence, `start..end`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub struct Fragment {
    pub start: usize,
    pub end: usize,
}

impl Fragment {
    #[inline(always)]
    pub fn len(&self) -> usize {
        self.end - self.start
    }

    pub fn is_empty(&self) -> bool {
        self.start >= self.end
    }

    pub fn substring(&self, seq: &DnaSequence) -> String {
        seq.get_range_safe(self.start, self.end)
            .map(|s| String::from_utf8_lossy(s).to_string())
            .unwrap_or_default()
    }
}

/// Result of digesting one sequence with one or more enzymes.
///
/// Fragments are in ascending start order, gapless and non-overlapping, and
/// their lengths sum to the sequence length.
#[derive(Clone, Debug, Serialize)]
pub struct Digestion {
    pub cut_sites: Vec<CutSite>,
    pub fragments: Vec<Fragment>,
}

impl Digestion {
    pub fn fragment_lengths(&self) -> Vec<usize> {
        self.fragments.iter().map(Fragment::len).collect()
    }
}

/// Digests `seq` with the named enzymes.
///
/// All names are resolved before any scanning, so an unknown enzyme leaves
/// no partial result. Cut offsets follow the cut-after-site policy of
/// [`RestrictionEnzyme::cut_offsets`]; offsets at the sequence ends are
/// dropped since cutting there would yield a zero-length fragment.
pub fn digest(
    seq: &DnaSequence,
    enzyme_names: &[String],
    enzymes: &Enzymes,
) -> Result<Digestion, GelSimError> {
    let mut selected: Vec<&RestrictionEnzyme> = Vec::with_capacity(enzyme_names.len());
    for name in enzyme_names {
        selected.push(enzymes.lookup(name)?);
    }

    let per_enzyme = selected
        .iter()
        .unique_by(|re| re.name.clone())
        .map(|re| (re.name.clone(), re.cut_offsets(seq)))
        .collect::<Vec<_>>();
    let cut_sites = merge_cut_offsets(&per_enzyme, seq.len());
    let fragments = fragments_from_cut_sites(&cut_sites, seq.len());

    log::debug!(
        "Digested {} bp with {} enzyme(s): {} cut site(s), {} fragment(s)",
        seq.len(),
        per_enzyme.len(),
        cut_sites.len(),
        fragments.len()
    );
    Ok(Digestion {
        cut_sites,
        fragments,
    })
}

/// Union of the per-enzyme offset sets: sorted ascending, deduplicated, with
/// every contributing enzyme name kept on the surviving site. Offsets of 0 or
/// `seq_len` are discarded.
fn merge_cut_offsets(per_enzyme: &[(String, Vec<usize>)], seq_len: usize) -> Vec<CutSite> {
    let mut by_offset: BTreeMap<usize, Vec<String>> = BTreeMap::new();
    for (name, offsets) in per_enzyme {
        for &offset in offsets {
            if offset == 0 || offset >= seq_len {
                continue;
            }
            let names = by_offset.entry(offset).or_default();
            if !names.iter().any(|n| n == name) {
                names.push(name.clone());
            }
        }
    }
    by_offset
        .into_iter()
        .map(|(offset, mut names)| {
            names.sort();
            CutSite {
                offset,
                enzymes: names,
            }
        })
        .collect()
}

fn fragments_from_cut_sites(cut_sites: &[CutSite], seq_len: usize) -> Vec<Fragment> {
    once(0)
        .chain(cut_sites.iter().map(|site| site.offset))
        .chain(once(seq_len))
        .tuple_windows()
        .map(|(start, end)| Fragment { start, end })
        .collect()
}
