use thiserror::Error;

use crate::vcf::VcfError;

#[derive(Error, Debug)]
pub enum VcfReaderError {
    #[error("Invalid or missing file extension. Accepted format are ['.vcf', '.vcf.gz']")]
    InvalidFileExt,

    #[error("Failed to open VCF file")]
    Open(#[source] std::io::Error),

    #[error("Failed to read the contents of the VCF")]
    FillBuffer(#[source] std::io::Error),

    #[error("Missing '#CHROM' header line within VCF file")]
    MissingHeader,

    #[error("Failed to parse VCF line {line}")]
    ParseLine{line: usize, #[source] err: VcfError},
}
