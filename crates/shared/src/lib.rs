//! Types shared by the HMPI calculator front ends: metals and indices, the
//! per-field input validator, and the scoring service wire format.

pub mod domain;
pub mod error;
pub mod protocol;
pub mod validation;
