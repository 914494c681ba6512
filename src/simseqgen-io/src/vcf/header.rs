use std::fmt::{self, Display, Formatter};

use super::VcfError;

/// Mandatory columns of a VCF body, FORMAT included.
pub const FIXED_COLUMNS: [&str; 9] = ["#CHROM", "POS", "ID", "REF", "ALT", "QUAL", "FILTER", "INFO", "FORMAT"];

/// Meta-information lines (`##key=value`) + sample column names of a VCF file.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct VcfHeader {
    meta   : Vec<String>,
    samples: Vec<String>,
}

impl VcfHeader {
    pub fn new(samples: Vec<String>) -> Self {
        Self { meta: Vec::new(), samples }
    }

    /// Append a meta-information line. A missing leading `##` is added.
    pub fn push_meta(&mut self, line: impl AsRef<str>) {
        let line = line.as_ref().trim_end();
        match line.starts_with("##") {
            true  => self.meta.push(line.to_string()),
            false => self.meta.push(format!("##{line}")),
        }
    }

    pub fn meta(&self) -> &[String] {
        &self.meta
    }

    pub fn samples(&self) -> &[String] {
        &self.samples
    }

    /// Column index of a sample, relative to the first sample column.
    pub fn sample_index(&self, sample: &str) -> Option<usize> {
        self.samples.iter().position(|s| s == sample)
    }

    /// Parse the `#CHROM` line, and set the sample names accordingly.
    pub(crate) fn parse_column_line(&mut self, line: &str) -> Result<(), VcfError> {
        let fields: Vec<&str> = line.trim_end().split('\t').collect();
        if fields.first() != Some(&FIXED_COLUMNS[0]) {
            return Err(VcfError::InvalidHeader(line.to_string()))
        }
        self.samples = fields.iter().skip(FIXED_COLUMNS.len()).map(ToString::to_string).collect();
        Ok(())
    }
}

impl Display for VcfHeader {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        for line in &self.meta {
            writeln!(f, "{line}")?;
        }
        write!(f, "{}", FIXED_COLUMNS.join("\t"))?;
        for sample in &self.samples {
            write!(f, "\t{sample}")?;
        }
        Ok(())
    }
}
