use thiserror::Error;

#[derive(Error, Debug, PartialEq, Eq)]
pub enum MakeRefError {
    #[error("Site {site} lies at position {position}, beyond the end of the {length} bp baseline sequence")]
    SiteOutOfBounds{site: usize, position: usize, length: usize},

    #[error("Allele '{allele}' of site {site} is not a single ASCII nucleotide")]
    NonAsciiAllele{site: usize, allele: String},

    #[error("The reference individual {0} carries no genotype call at position {1}")]
    MissingReferenceCall(String, u64),
}
