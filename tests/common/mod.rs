#![allow(dead_code)]

mod fixture;
pub use fixture::Fixture;

mod runner;
pub use runner::{MakeRefRunner, MakeRefRunnerBuilder, read_bgzf_lines, read_fasta};
