//! Output verification
//!
//! Re-reads the files written by an export and compares their checksums
//! with the ones recorded at write time.

pub mod checksum;
pub mod report;
pub mod verify;

pub use report::{VerificationFailure, VerificationReport};
pub use verify::Verifier;
