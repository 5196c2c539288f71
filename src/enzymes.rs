use crate::{error::GelSimError, restriction_enzyme::RestrictionEnzyme};
use anyhow::{anyhow, Result};
use std::fs;

const BUILTIN_ENZYMES_JSON: &str = include_str!("../assets/enzymes.json");

/// Name of the enzyme returned by [`Enzymes::default_enzyme`] when present.
pub const DEFAULT_ENZYME_NAME: &str = "EcoRI";

/// Immutable registry of restriction enzymes, loaded once at startup and
/// passed by reference into the digestion pipeline. Enumeration order is the
/// order of the source table.
#[derive(Clone, Debug)]
pub struct Enzymes {
    restriction_enzymes: Vec<RestrictionEnzyme>,
}

impl Enzymes {
    pub fn new(json_text: &str) -> Result<Self> {
        let mut restriction_enzymes: Vec<RestrictionEnzyme> = serde_json::from_str(json_text)?;
        if restriction_enzymes.is_empty() {
            return Err(anyhow!("Enzyme table is empty"));
        }
        for re in &mut restriction_enzymes {
            re.sequence = re.sequence.to_ascii_uppercase();
            if re.sequence.is_empty()
                || !re
                    .sequence
                    .bytes()
                    .all(|b| matches!(b, b'A' | b'T' | b'G' | b'C'))
            {
                return Err(anyhow!(
                    "Bad recognition sequence '{}' for enzyme {}",
                    re.sequence,
                    re.name
                ));
            }
        }
        for (idx, re) in restriction_enzymes.iter().enumerate() {
            if restriction_enzymes[..idx].iter().any(|o| o.name == re.name) {
                return Err(anyhow!("Duplicate enzyme name {}", re.name));
            }
        }
        Ok(Self {
            restriction_enzymes,
        })
    }

    pub fn from_path(path: &str) -> Result<Self> {
        let text = fs::read_to_string(path)?;
        Self::new(&text)
    }

    pub fn all(&self) -> &[RestrictionEnzyme] {
        &self.restriction_enzymes
    }

    pub fn lookup(&self, name: &str) -> Result<&RestrictionEnzyme, GelSimError> {
        self.restriction_enzymes
            .iter()
            .find(|re| re.name == name)
            .ok_or_else(|| GelSimError::UnknownEnzyme(name.to_string()))
    }

    /// The well-known default selection (EcoRI, `GAATTC`); falls back to the
    /// first table entry for custom tables that lack it.
    pub fn default_enzyme(&self) -> &RestrictionEnzyme {
        self.restriction_enzymes
            .iter()
            .find(|re| re.name == DEFAULT_ENZYME_NAME)
            .unwrap_or(&self.restriction_enzymes[0])
    }
}

impl Default for Enzymes {
    fn default() -> Self {
        Enzymes::new(BUILTIN_ENZYMES_JSON).expect("Built-in enzyme table is invalid")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builtin_table() {
        let enzymes = Enzymes::default();
        assert!(enzymes.all().iter().any(|e| e.name == "EcoRI"));
        assert!(enzymes.all().iter().any(|e| e.name == "HindIII"));
        assert_eq!(enzymes.default_enzyme().name, "EcoRI");
        assert_eq!(enzymes.default_enzyme().sequence, "GAATTC");
    }

    #[test]
    fn test_lookup_unknown_enzyme() {
        let enzymes = Enzymes::default();
        assert!(matches!(
            enzymes.lookup("NoSuchEnzyme"),
            Err(GelSimError::UnknownEnzyme(name)) if name == "NoSuchEnzyme"
        ));
    }

    #[test]
    fn test_custom_table_normalizes_case() {
        let enzymes = Enzymes::new(r#"[{ "name": "TestI", "sequence": "ggcc" }]"#).unwrap();
        assert_eq!(enzymes.lookup("TestI").unwrap().sequence, "GGCC");
        assert_eq!(enzymes.default_enzyme().name, "TestI");
    }

    #[test]
    fn test_bad_tables_are_rejected() {
        assert!(Enzymes::new("[]").is_err());
        assert!(Enzymes::new(r#"[{ "name": "BadI", "sequence": "GNCC" }]"#).is_err());
        assert!(Enzymes::new(
            r#"[{ "name": "DupI", "sequence": "GGCC" }, { "name": "DupI", "sequence": "AATT" }]"#
        )
        .is_err());
    }
}
