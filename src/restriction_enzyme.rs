use serde::{Deserialize, Serialize};

use crate::dna_sequence::DnaSequence;

/// A restriction enzyme: a unique name paired with the exact recognition
/// sequence it cuts at. Records are read-only once the registry is built.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct RestrictionEnzyme {
    pub name: String,
    pub sequence: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
}

impl RestrictionEnzyme {
    /// Cut offsets for every occurrence of the recognition sequence,
    /// overlapping occurrences included.
    ///
    /// Cut-after-site policy: the cut falls immediately after the matched
    /// recognition sequence, so an occurrence starting at `i` cuts at
    /// `i + recognition_len`. Offsets are returned in ascending order.
    pub fn cut_offsets(&self, seq: &DnaSequence) -> Vec<usize> {
        let recognition = self.sequence.as_bytes();
        let recognition_len = recognition.len();
        let forward = seq.forward();
        if recognition_len == 0 || forward.len() < recognition_len {
            return vec![];
        }
        (0..=forward.len() - recognition_len)
            .filter(|&start| &forward[start..start + recognition_len] == recognition)
            .map(|start| start + recognition_len)
            .collect()
    }
}
