pub mod aligner;
pub mod ml;
pub mod normalizer;
pub mod scoring;
pub mod service;
