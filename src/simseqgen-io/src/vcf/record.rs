use std::{fmt::{self, Display, Formatter}, str::FromStr};

use itertools::Itertools;

use super::VcfError;

const MISSING: &str = ".";
const GENOTYPE_FORMAT: &str = "GT";

/// A `GT` genotype call, e.g. `0|1`, `1`, `./.`
///
/// `None` alleles stand for missing calls (`.`)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GenotypeCall {
    pub alleles: Vec<Option<usize>>,
    pub phased : bool,
}

impl GenotypeCall {
    /// Phased call of the given allele indices.
    pub fn phased(alleles: impl IntoIterator<Item = usize>) -> Self {
        Self { alleles: alleles.into_iter().map(Some).collect(), phased: true }
    }

    pub fn first(&self) -> Option<usize> {
        self.alleles.first().copied().flatten()
    }

    /// Exchange allele codes `a` and `b`. Missing calls are left untouched.
    fn swap(&mut self, a: usize, b: usize) {
        for allele in self.alleles.iter_mut().flatten() {
            if *allele == a {
                *allele = b;
            } else if *allele == b {
                *allele = a;
            }
        }
    }
}

impl FromStr for GenotypeCall {
    type Err = VcfError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        // Ignore any trailing FORMAT subfield.
        let gt = s.split(':').next().unwrap_or_default();
        if gt.is_empty() {
            return Err(VcfError::InvalidGenotype(s.to_string()))
        }
        let alleles = gt.split(['|', '/'])
            .map(|allele| match allele {
                MISSING => Ok(None),
                _       => allele.parse::<usize>().map(Some).map_err(|_| VcfError::InvalidGenotype(s.to_string()))
            })
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self { alleles, phased: !gt.contains('/') })
    }
}

impl Display for GenotypeCall {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        let sep = if self.phased {"|"} else {"/"};
        let alleles = self.alleles.iter()
            .map(|allele| allele.map_or_else(|| MISSING.to_string(), |a| a.to_string()))
            .join(sep);
        write!(f, "{alleles}")
    }
}

/// A single, GT-only, VCF data line.
///
/// `alternate` is empty for monomorphic sites (`ALT` = `.`).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VcfRecord {
    pub chrom    : String,
    pub pos      : u64,
    pub id       : String,
    pub reference: String,
    pub alternate: Vec<String>,
    pub qual     : String,
    pub filter   : String,
    pub info     : String,
    pub calls    : Vec<GenotypeCall>,
}

impl VcfRecord {
    /// Number of alleles at this site, REF included.
    pub fn num_alleles(&self) -> usize {
        1 + self.alternate.len()
    }

    /// Allelic state of allele index `k` (0 = REF).
    pub fn allele(&self, k: usize) -> Option<&str> {
        match k {
            0 => Some(self.reference.as_str()),
            _ => self.alternate.get(k - 1).map(String::as_str),
        }
    }

    /// First allele call of the sample found at column `sample`.
    pub fn first_call(&self, sample: usize) -> Option<usize> {
        self.calls.get(sample).and_then(GenotypeCall::first)
    }

    /// Make allele `k` the reference allele: allele codes `0` and `k` are exchanged within every genotype
    /// call, and the REF symbol is exchanged with the k-th allele. For bi-allelic sites, this amounts to
    /// `g -> 1 - g` and REF <-> ALT.
    ///
    /// # Errors
    /// `AlleleOutOfRange` if `k` does not refer to an existing alternate allele.
    pub fn swap_reference(&mut self, k: usize) -> Result<(), VcfError> {
        if k == 0 {
            return Ok(())
        }
        let num_alleles = self.num_alleles();
        let alternate = self.alternate.get_mut(k - 1)
            .ok_or(VcfError::AlleleOutOfRange{allele: k, num_alleles})?;
        std::mem::swap(&mut self.reference, alternate);
        for call in &mut self.calls {
            call.swap(0, k);
        }
        Ok(())
    }
}

impl FromStr for VcfRecord {
    type Err = VcfError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let fields: Vec<&str> = s.trim_end_matches(['\n', '\r']).split('\t').collect();
        if fields.len() < 8 {
            return Err(VcfError::MissingFields{expected: 8, found: fields.len()})
        }

        let calls = match fields.get(8) {
            None => Vec::new(),
            Some(format) if format.split(':').next() == Some(GENOTYPE_FORMAT) => {
                fields[9..].iter().map(|call| call.parse()).collect::<Result<_, _>>()?
            },
            Some(format) => return Err(VcfError::UnsupportedFormat((*format).to_string())),
        };

        let alternate = match fields[4] {
            MISSING => Vec::new(),
            alt     => alt.split(',').map(ToString::to_string).collect(),
        };

        Ok(Self {
            chrom    : fields[0].to_string(),
            pos      : fields[1].parse().map_err(|_| VcfError::InvalidPosition(fields[1].to_string()))?,
            id       : fields[2].to_string(),
            reference: fields[3].to_string(),
            alternate,
            qual     : fields[5].to_string(),
            filter   : fields[6].to_string(),
            info     : fields[7].to_string(),
            calls,
        })
    }
}

impl Display for VcfRecord {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        let alternate = match self.alternate.is_empty() {
            true  => MISSING.to_string(),
            false => self.alternate.join(","),
        };
        write!(f, "{}\t{}\t{}\t{}\t{alternate}\t{}\t{}\t{}\t{GENOTYPE_FORMAT}",
            self.chrom, self.pos, self.id, self.reference, self.qual, self.filter, self.info
        )?;
        for call in &self.calls {
            write!(f, "\t{call}")?;
        }
        Ok(())
    }
}
