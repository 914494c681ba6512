//! Minimal, GT-only, representation of VCF headers and records.

mod error;
pub use error::VcfError;

mod header;
pub use header::{VcfHeader, FIXED_COLUMNS};

mod record;
pub use record::{VcfRecord, GenotypeCall};
