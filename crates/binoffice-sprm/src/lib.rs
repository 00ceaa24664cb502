//! Property modifier helpers for the Word 97-2003 binary format.
//!
//! Word expresses formatting as deltas from defaults. Each delta is a `Prl`: a packed 16-bit
//! `Sprm` naming the operation followed by an operand whose size is encoded in the sprm
//! itself. Sequences of Prls (`grpprl`) appear in paragraph/character property pages, in the
//! style sheet, and in the piece table's override groups.
//!
//! This crate provides:
//! - [`Sprm`]: bit-field accessors (scope, operand size) and a diagnostic name table
//! - [`Prl`] / [`parse_grpprl`]: bounded decoding of grpprl byte runs
//! - [`sprm_for_isprm`]: the fixed table used by inline piece overrides (`Prm0`)
//! - [`ToggleOperand`]: the "same as / opposite of style" rules for boolean character sprms

mod names;
mod prl;
mod prm0;
mod sprm;

pub use names::ids;
pub use prl::{parse_grpprl, parse_grpprl_padded, GrpprlError, Prl, ToggleOperand};
pub use prm0::sprm_for_isprm;
pub use sprm::{OperandSize, Sprm, SprmScope};
