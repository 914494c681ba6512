use thiserror::Error;

#[derive(Error, Debug)]
pub enum BgzfWriterError {
    #[error("BGZF compression failure")]
    Compression(#[source] gzp::GzpError),
}
