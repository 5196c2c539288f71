//! Restriction digest and gel electrophoresis simulator.
//!
//! Pipeline: validate a DNA sequence ([`dna_sequence`]), cut it with one or
//! more restriction enzymes ([`digest`], consulting the [`enzymes`] registry),
//! and render the fragment-length distribution as a synthetic gel PNG
//! ([`render`]). Every stage is a pure function of its inputs plus an
//! explicit jitter seed, so concurrent requests need no locking.

pub mod canvas;
pub mod digest;
pub mod dna_sequence;
pub mod enzymes;
pub mod error;
pub mod gel;
pub mod render;
pub mod restriction_enzyme;
