use thiserror::Error;

#[derive(Error, Debug, PartialEq, Eq)]
pub enum VcfError {
    #[error("Expected at least {expected} tab-separated fields, found {found}")]
    MissingFields{expected: usize, found: usize},

    #[error("Invalid position '{0}'")]
    InvalidPosition(String),

    #[error("Invalid genotype call '{0}'")]
    InvalidGenotype(String),

    #[error("Unsupported FORMAT field '{0}'. Only 'GT' is supported")]
    UnsupportedFormat(String),

    #[error("Allele index {allele} is out of range for a site carrying {num_alleles} alleles")]
    AlleleOutOfRange{allele: usize, num_alleles: usize},

    #[error("Invalid header line '{0}'. Expected a line starting with '#CHROM'")]
    InvalidHeader(String),
}
