use std::{io::{BufRead, BufReader, Read}, path::Path, fs::File};

use gzp::{deflate::Bgzf, par::decompress::ParDecompressBuilder};
use anyhow::Result;
use log::trace;

use located_error::{loc, LocatedError, LocatedOption};

use crate::vcf::{VcfHeader, VcfRecord};

mod error;
pub use error::VcfReaderError;

/// Line-based reader of `.vcf` or BGZF compressed `.vcf.gz` files.
///
/// # Fields:
/// - `source`: Boxed BufReader for the given `.vcf(.gz)` file.
/// - `header`: meta-information lines and sample names, parsed upon construction.
/// - `buf`   : line buffer.
/// - `line`  : 1-based line number of the last line read.
pub struct VcfReader<'a> {
    source: Box<dyn BufRead + 'a>,
    header: VcfHeader,
    buf   : String,
    line  : usize,
}

impl<'a> VcfReader<'a> {
    /// Instantiate a new `VcfReader`, and parse the VCF header.
    /// # Arguments:
    /// - `path`: path leading to the `.vcf(.gz)` file.
    /// - `threads`: number of decompression threads (This is only relevant in the case of BGZF compressed `.vcf.gz` files)
    pub fn new(path: &Path, threads: usize) -> Result<VcfReader<'a>> {
        let loc_msg = || format!("While attempting to open VCF file {}", path.display());
        let source = Self::get_reader(path, threads).with_loc(loc_msg)?;
        Self::from_reader(source).with_loc(loc_msg)
    }

    /// Instantiate a new `VcfReader` from any uncompressed source.
    pub fn from_reader(source: Box<dyn BufRead + 'a>) -> Result<VcfReader<'a>> {
        let mut reader = Self { source, header: VcfHeader::default(), buf: String::new(), line: 0 };
        reader.parse_header().loc("While parsing VCF header")?;
        Ok(reader)
    }

    pub fn header(&self) -> &VcfHeader {
        &self.header
    }

    /// Read the next record. Returns `None` once EOF is reached.
    pub fn next_record(&mut self) -> Result<Option<VcfRecord>> {
        if !self.next_line()? {
            return Ok(None)
        }
        let line = self.line;
        let record: VcfRecord = self.buf.parse()
            .map_err(|err| VcfReaderError::ParseLine{line, err})
            .loc("While parsing VCF record")?;
        Ok(Some(record))
    }

    /// Fill `self.buf` with the next non-empty line. Returns `false` on EOF.
    fn next_line(&mut self) -> Result<bool> {
        loop {
            self.buf.clear();
            let bytes = self.source.read_line(&mut self.buf)
                .map_err(VcfReaderError::FillBuffer)
                .loc("While attempting to find next EOL")?;
            if bytes == 0 {
                return Ok(false)
            }
            self.line += 1;
            if !self.buf.trim().is_empty() {
                return Ok(true)
            }
        }
    }

    /// Consume all meta-information lines until the `#CHROM` line is found.
    fn parse_header(&mut self) -> Result<()> {
        while self.next_line()? {
            if self.buf.starts_with("##") {
                self.header.push_meta(&self.buf);
                continue
            }
            let line = self.line;
            self.header.parse_column_line(&self.buf)
                .map_err(|err| VcfReaderError::ParseLine{line, err})
                .loc("While parsing VCF sample columns")?;
            trace!("Found {} samples within VCF header", self.header.samples().len());
            return Ok(())
        }
        loc!(VcfReaderError::MissingHeader)
    }

    /// Check the file extension of the provided file, and return an appropriate BufReader
    /// - `.vcf` -> Return a default BufReader
    /// - `.gz`  -> Return a parallel BGZF decompressor/reader
    fn get_reader(path: &Path, threads: usize) -> Result<Box<dyn BufRead>> {
        use VcfReaderError::{InvalidFileExt, Open};
        let path_ext = path.extension().with_loc(|| InvalidFileExt)?;
        let vcf      = File::open(path).map_err(Open).loc("While opening VCF")?;
        let source: Box<dyn Read> = match path_ext.to_str() {
            Some("vcf") => Box::new(vcf),
            Some("gz")  => ParDecompressBuilder::<Bgzf>::new().maybe_num_threads(threads).maybe_par_from_reader(vcf),
            _           => return loc!(InvalidFileExt)
        };
        Ok(Box::new(BufReader::new(source)))
    }
}
