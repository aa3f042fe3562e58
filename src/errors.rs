use thiserror;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(thiserror::Error, Debug)]
pub enum Error {
    #[error("Minimum overlap of {min_overlap} is invalid for an adapter of length {len}")]
    MinOverlap { min_overlap: usize, len: usize },

    #[error("Error reading or writing \"{file}\": {source}")]
    FileIo {
        file: String,
        source: Box<dyn std::error::Error>,
    },

    #[error("Record \"{name}\" in \"{file}\" has no quality scores")]
    MissingQuality { name: String, file: String },

    #[error("Unpaired read in {0}")]
    UnpairedRead(String),

    #[error("Error parsing sample sheet \"{file}\": {source}")]
    ParseSamples {
        file: String,
        source: Box<dyn std::error::Error>,
    },

    #[error("Barcode \"{barcode}\" is not unique in the sample sheet")]
    DuplicateBarcode { barcode: String },

    #[error("Sample \"{sample}\" is not unique in the sample sheet")]
    DuplicateSample { sample: String },

    #[error("Error parsing adapter definitions:\n\"{adapters}\"\n{source}")]
    ParseAdapters {
        adapters: String,
        source: Box<dyn std::error::Error>,
    },
}

pub fn utf8(b: &[u8]) -> String {
    String::from_utf8_lossy(b).into_owned()
}
