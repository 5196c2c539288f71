use crate::error::GelSimError;
use serde::{Deserialize, Serialize};

/// A validated DNA sequence over the A/T/G/C alphabet, stored uppercase.
///
/// Construction is the only validation point; everything downstream may
/// assume the alphabet invariant and a length of at least one base.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct DnaSequence {
    forward: Vec<u8>,
}

impl DnaSequence {
    /// Normalizes case and checks every symbol against the four bases.
    ///
    /// ASCII whitespace is ignored, as pasted sequences often carry spaces
    /// and line breaks. The reported position of an offending symbol refers
    /// to the raw input.
    pub fn from_sequence(raw: &str) -> Result<Self, GelSimError> {
        let mut forward = Vec::with_capacity(raw.len());
        for (position, symbol) in raw.chars().enumerate() {
            if symbol.is_ascii_whitespace() {
                continue;
            }
            match symbol.to_ascii_uppercase() {
                base @ ('A' | 'T' | 'G' | 'C') => forward.push(base as u8),
                _ => return Err(GelSimError::InvalidSequence { position, symbol }),
            }
        }
        if forward.is_empty() {
            return Err(GelSimError::EmptySequence);
        }
        Ok(Self { forward })
    }

    #[inline(always)]
    pub fn forward(&self) -> &[u8] {
        &self.forward
    }

    #[inline(always)]
    pub fn len(&self) -> usize {
        self.forward.len()
    }

    pub fn is_empty(&self) -> bool {
        self.forward.is_empty()
    }

    pub fn get_forward_string(&self) -> String {
        String::from_utf8_lossy(&self.forward).to_string()
    }

    /// Substring for a fragment range; `None` if the range is out of bounds.
    pub fn get_range_safe(&self, start: usize, end: usize) -> Option<&[u8]> {
        if start >= end {
            return None;
        }
        self.forward.get(start..end)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_sequence_is_uppercased() {
        let dna = DnaSequence::from_sequence("atgc").unwrap();
        assert_eq!(dna.get_forward_string(), "ATGC");
        assert_eq!(dna.len(), 4);
    }

    #[test]
    fn test_whitespace_is_ignored() {
        let dna = DnaSequence::from_sequence("AT GC\nAT").unwrap();
        assert_eq!(dna.get_forward_string(), "ATGCAT");
    }

    #[test]
    fn test_invalid_symbol_reports_first_offender() {
        let err = DnaSequence::from_sequence("ATGCN").unwrap_err();
        match err {
            GelSimError::InvalidSequence { position, symbol } => {
                assert_eq!(position, 4);
                assert_eq!(symbol, 'N');
            }
            other => panic!("Unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_empty_input_is_rejected() {
        assert!(matches!(
            DnaSequence::from_sequence(""),
            Err(GelSimError::EmptySequence)
        ));
        assert!(matches!(
            DnaSequence::from_sequence("  \n"),
            Err(GelSimError::EmptySequence)
        ));
    }

    #[test]
    fn test_get_range_safe() {
        let dna = DnaSequence::from_sequence("ATGCAT").unwrap();
        assert_eq!(dna.get_range_safe(0, 4), Some("ATGC".as_bytes()));
        assert_eq!(dna.get_range_safe(4, 6), Some("AT".as_bytes()));
        assert_eq!(dna.get_range_safe(4, 4), None);
        assert_eq!(dna.get_range_safe(4, 7), None);
    }
}
