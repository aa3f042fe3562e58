use lazy_static::lazy_static;
use regex::Regex;
use rustc_hash::{FxHashMap, FxHashSet};
use serde::Deserialize;

use std::path::Path;

use crate::adapter::*;
use crate::errors::*;
use crate::trim::Trimmer;

lazy_static! {
    static ref WHITESPACE: Regex = Regex::new(r"\s+").unwrap();
}

/// One row of a sample sheet. Barcode columns may be empty, which disables
/// matching on that side; the trim offset columns are optional.
#[derive(Clone, Debug, Deserialize)]
pub struct SampleRow {
    pub sample: String,
    #[serde(default)]
    pub start_barcode: String,
    #[serde(default)]
    pub end_barcode: String,
    #[serde(default)]
    pub trim_after_start: Option<usize>,
    #[serde(default)]
    pub trim_before_end: Option<usize>,
}

/// Matching policy applied to every barcode in a sheet.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct BarcodeOpts {
    pub max_errors: usize,
    pub min_overlap: Option<usize>,
}

/// A resolved sample: sanitized key, barcode texts, and the two matchers
/// ready to locate them (start barcode scanned forward reporting the match
/// end, end barcode scanned rightmost reporting the match start).
#[derive(Clone, Debug)]
pub struct Sample {
    key: String,
    start_barcode: Vec<u8>,
    end_barcode: Vec<u8>,
    start: Option<Adapter>,
    end: Option<Adapter>,
    trim_after_start: usize,
    trim_before_end: usize,
}

impl Sample {
    fn from_row(row: SampleRow, opts: BarcodeOpts) -> Result<Self> {
        let key = WHITESPACE.replace_all(&row.sample, "_").into_owned();

        let start = if row.start_barcode.is_empty() {
            None
        } else {
            Some(Adapter::new(
                &row.start_barcode,
                AdapterOpts {
                    max_errors: opts.max_errors,
                    min_overlap: opts.min_overlap,
                    report_end: true,
                    rightmost: false,
                },
            )?)
        };

        let end = if row.end_barcode.is_empty() {
            None
        } else {
            Some(Adapter::new(
                &row.end_barcode,
                AdapterOpts {
                    max_errors: opts.max_errors,
                    min_overlap: opts.min_overlap,
                    report_end: false,
                    rightmost: true,
                },
            )?)
        };

        Ok(Self {
            key,
            start_barcode: row.start_barcode.into_bytes(),
            end_barcode: row.end_barcode.into_bytes(),
            start,
            end,
            trim_after_start: row.trim_after_start.unwrap_or(0),
            trim_before_end: row.trim_before_end.unwrap_or(0),
        })
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    pub fn start_barcode(&self) -> &[u8] {
        &self.start_barcode
    }

    pub fn end_barcode(&self) -> &[u8] {
        &self.end_barcode
    }

    pub fn start(&self) -> Option<&Adapter> {
        self.start.as_ref()
    }

    pub fn end(&self) -> Option<&Adapter> {
        self.end.as_ref()
    }

    pub fn trim_after_start(&self) -> usize {
        self.trim_after_start
    }

    pub fn trim_before_end(&self) -> usize {
        self.trim_before_end
    }

    pub fn trimmer(&self) -> Trimmer {
        Trimmer::new(self.start.clone(), self.end.clone())
            .with_offsets(self.trim_after_start, self.trim_before_end)
    }
}

/// A barcode table resolved into per-sample matcher configurations.
///
/// Sample keys (whitespace runs replaced by `_`) and start barcodes must
/// both be unique; a sheet violating either is rejected outright.
#[derive(Clone, Debug)]
pub struct SampleSheet {
    samples: Vec<Sample>,
    by_key: FxHashMap<String, usize>,
}

impl SampleSheet {
    /// Reads a sheet from a delimited file; `.tsv` and `.txt` files are
    /// tab-separated, anything else comma-separated.
    pub fn from_path(path: impl AsRef<Path>, opts: BarcodeOpts) -> Result<Self> {
        let file = path.as_ref().display().to_string();
        let delimiter = if file.ends_with(".tsv") || file.ends_with(".txt") {
            b'\t'
        } else {
            b','
        };

        let reader = std::fs::File::open(path.as_ref()).map_err(|e| Error::FileIo {
            file: file.clone(),
            source: Box::new(e),
        })?;

        Self::from_reader(reader, delimiter, &file, opts)
    }

    pub fn from_reader(
        reader: impl std::io::Read,
        delimiter: u8,
        origin: &str,
        opts: BarcodeOpts,
    ) -> Result<Self> {
        let mut rdr = csv::ReaderBuilder::new()
            .delimiter(delimiter)
            .trim(csv::Trim::All)
            .from_reader(reader);

        let mut samples: Vec<Sample> = Vec::new();
        let mut by_key = FxHashMap::default();
        let mut barcodes = FxHashSet::default();

        for row in rdr.deserialize() {
            let row: SampleRow = row.map_err(|e| Error::ParseSamples {
                file: origin.to_owned(),
                source: Box::new(e),
            })?;

            let sample = Sample::from_row(row, opts)?;

            if !barcodes.insert(sample.start_barcode.clone()) {
                return Err(Error::DuplicateBarcode {
                    barcode: utf8(&sample.start_barcode),
                });
            }
            if by_key.contains_key(&sample.key) {
                return Err(Error::DuplicateSample {
                    sample: sample.key.clone(),
                });
            }

            by_key.insert(sample.key.clone(), samples.len());
            samples.push(sample);
        }

        Ok(Self { samples, by_key })
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<Sample> {
        self.samples.iter()
    }

    pub fn get(&self, key: &str) -> Option<&Sample> {
        self.by_key.get(key).map(|&i| &self.samples[i])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sheet(tsv: &str, opts: BarcodeOpts) -> Result<SampleSheet> {
        SampleSheet::from_reader(tsv.as_bytes(), b'\t', "test sheet", opts)
    }

    const SHEET: &str = "\
sample\tstart_barcode\tend_barcode\ttrim_after_start\ttrim_before_end
sample one\tCTGGCA\tGGGCCC\t2\t0
sample two\tTTTCCC\t\t\t
";

    #[test]
    fn resolves_rows_into_samples() {
        let sheet = sheet(SHEET, BarcodeOpts::default()).unwrap();
        assert_eq!(sheet.len(), 2);

        let one = sheet.get("sample_one").unwrap();
        assert_eq!(one.start_barcode(), b"CTGGCA");
        assert_eq!(one.end_barcode(), b"GGGCCC");
        assert_eq!(one.trim_after_start(), 2);

        // start barcode is scanned forward and reports the match end
        assert_eq!(one.start().unwrap().locate(b"TT_CTGGCA_XYZ"), Some(9));
        // end barcode is scanned rightmost and reports the match start
        assert_eq!(one.end().unwrap().locate(b"TT_GGGCCC_XYZ"), Some(-10));

        // empty barcode column: that side is not matched at all
        let two = sheet.get("sample_two").unwrap();
        assert!(two.end().is_none());
        assert_eq!(two.trim_after_start(), 0);
    }

    #[test]
    fn sample_keys_are_sanitized() {
        let sheet = sheet(SHEET, BarcodeOpts::default()).unwrap();
        assert!(sheet.get("sample one").is_none());
        assert_eq!(sheet.get("sample_one").unwrap().key(), "sample_one");
    }

    #[test]
    fn barcode_policy_applies_to_every_sample() {
        let sheet = sheet(
            SHEET,
            BarcodeOpts {
                max_errors: 1,
                min_overlap: Some(4),
            },
        )
        .unwrap();

        let one = sheet.get("sample_one").unwrap();
        assert_eq!(one.start().unwrap().max_errors(), 1);
        assert_eq!(one.start().unwrap().locate(b"TT_CTGGGA_XYZ"), Some(9));
    }

    #[test]
    fn duplicate_barcodes_are_rejected() {
        let tsv = "\
sample\tstart_barcode\tend_barcode
a\tCTGGCA\t
b\tCTGGCA\t
";
        assert!(matches!(
            sheet(tsv, BarcodeOpts::default()),
            Err(Error::DuplicateBarcode { barcode }) if barcode == "CTGGCA"
        ));
    }

    #[test]
    fn duplicate_keys_are_rejected_after_sanitization() {
        let tsv = "\
sample\tstart_barcode\tend_barcode
a b\tCTGGCA\t
a  b\tTTTCCC\t
";
        assert!(matches!(
            sheet(tsv, BarcodeOpts::default()),
            Err(Error::DuplicateSample { sample }) if sample == "a_b"
        ));
    }

    #[test]
    fn bad_barcode_policy_fails_at_construction() {
        let res = sheet(
            SHEET,
            BarcodeOpts {
                max_errors: 0,
                min_overlap: Some(10),
            },
        );
        assert!(matches!(res, Err(Error::MinOverlap { .. })));
    }
}
