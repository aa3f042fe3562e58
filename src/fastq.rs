use needletail::errors::ParseError;
use needletail::parser::SequenceRecord;
use needletail::{parse_fastx_file, FastxReader};

use flate2::{write::GzEncoder, Compression};

use std::io::{self, BufWriter, Write};

use crate::errors::*;
use crate::output::AtomicWriter;
use crate::read::*;

/// Lazy iterator over single-end FASTQ records, one [`Fragment`] each.
pub struct Fastq1Fragments {
    reader: Box<dyn FastxReader>,
    file: String,
    revcomp: bool,
}

impl Iterator for Fastq1Fragments {
    type Item = Result<Fragment>;

    fn next(&mut self) -> Option<Self::Item> {
        let record = self.reader.next()?;

        let mut read = match convert(record, &self.file) {
            Ok(read) => read,
            Err(e) => return Some(Err(e)),
        };
        if self.revcomp {
            read.revcomp();
        }

        Some(Ok(Fragment::new1(read)))
    }
}

/// Lazy iterator over mated FASTQ files, one paired [`Fragment`] per step.
pub struct Fastq2Fragments {
    reader1: Box<dyn FastxReader>,
    reader2: Box<dyn FastxReader>,
    file1: String,
    file2: String,
}

impl Iterator for Fastq2Fragments {
    type Item = Result<Fragment>;

    fn next(&mut self) -> Option<Self::Item> {
        let record1 = self.reader1.next();
        let record2 = self.reader2.next();

        let (record1, record2) = match (record1, record2) {
            (None, None) => return None,
            (Some(r1), Some(r2)) => (r1, r2),
            (Some(_), None) => return Some(Err(Error::UnpairedRead(self.file1.clone()))),
            (None, Some(_)) => return Some(Err(Error::UnpairedRead(self.file2.clone()))),
        };

        let read1 = match convert(record1, &self.file1) {
            Ok(read) => read,
            Err(e) => return Some(Err(e)),
        };
        let read2 = match convert(record2, &self.file2) {
            Ok(read) => read,
            Err(e) => return Some(Err(e)),
        };

        Some(Ok(Fragment::new2(read1, read2)))
    }
}

fn convert(
    record: std::result::Result<SequenceRecord<'_>, ParseError>,
    file: &str,
) -> Result<Read> {
    let record = record.map_err(|e| Error::FileIo {
        file: file.to_owned(),
        source: Box::new(e),
    })?;

    let qual = record.qual().ok_or_else(|| Error::MissingQuality {
        name: utf8(record.id()),
        file: file.to_owned(),
    })?;

    Ok(Read::new(record.id(), record.seq().as_ref(), qual))
}

/// Opens a single-end FASTQ (optionally gzipped) for fragment iteration.
/// With `revcomp` set, every read is flipped to the opposite strand as it
/// is produced. Call again on the same path for a fresh pass.
pub fn iter_fastq1(file: impl AsRef<str>, revcomp: bool) -> Result<Fastq1Fragments> {
    let file = file.as_ref().to_owned();
    let reader = parse_fastx_file(&file).map_err(|e| Error::FileIo {
        file: file.clone(),
        source: Box::new(e),
    })?;

    Ok(Fastq1Fragments {
        reader,
        file,
        revcomp,
    })
}

/// Opens a pair of mated FASTQ files for fragment iteration. The files
/// must contain the same number of records.
pub fn iter_fastq2(file1: impl AsRef<str>, file2: impl AsRef<str>) -> Result<Fastq2Fragments> {
    let file1 = file1.as_ref().to_owned();
    let file2 = file2.as_ref().to_owned();

    let open = |file: &str| {
        parse_fastx_file(file).map_err(|e| Error::FileIo {
            file: file.to_owned(),
            source: Box::new(e),
        })
    };

    Ok(Fastq2Fragments {
        reader1: open(&file1)?,
        reader2: open(&file2)?,
        file1,
        file2,
    })
}

pub fn write_fastq_record(
    writer: &mut dyn Write,
    record: (&[u8], &[u8], &[u8]),
) -> io::Result<()> {
    writer.write_all(b"@")?;
    writer.write_all(record.0)?;
    writer.write_all(b"\n")?;
    writer.write_all(record.1)?;
    writer.write_all(b"\n+\n")?;
    writer.write_all(record.2)?;
    writer.write_all(b"\n")
}

enum Sink {
    Plain(BufWriter<AtomicWriter>),
    Gz(BufWriter<GzEncoder<AtomicWriter>>),
}

/// FASTQ output on top of [`AtomicWriter`]: records become visible at the
/// final path only once [`finish`](FastqWriter::finish) succeeds. Paths
/// ending in `.gz` are compressed.
pub struct FastqWriter {
    sink: Sink,
    file: String,
}

impl FastqWriter {
    pub fn create(file: impl AsRef<str>) -> Result<Self> {
        let file = file.as_ref().to_owned();
        let atomic = AtomicWriter::create(&file)?;

        let sink = if file.ends_with(".gz") {
            Sink::Gz(BufWriter::new(GzEncoder::new(
                atomic,
                Compression::default(),
            )))
        } else {
            Sink::Plain(BufWriter::new(atomic))
        };

        Ok(Self { sink, file })
    }

    pub fn write(&mut self, read: &Read) -> Result<()> {
        let res = match &mut self.sink {
            Sink::Plain(w) => write_fastq_record(w, read.to_fastq()),
            Sink::Gz(w) => write_fastq_record(w, read.to_fastq()),
        };

        res.map_err(|e| Error::FileIo {
            file: self.file.clone(),
            source: Box::new(e),
        })
    }

    pub fn finish(self) -> Result<()> {
        let file = self.file;
        let io_err = |e: io::Error| Error::FileIo {
            file: file.clone(),
            source: Box::new(e),
        };

        let atomic = match self.sink {
            Sink::Plain(w) => w.into_inner().map_err(|e| io_err(e.into_error()))?,
            Sink::Gz(w) => {
                let gz = w.into_inner().map_err(|e| io_err(e.into_error()))?;
                gz.finish().map_err(io_err)?
            }
        };

        atomic.finish()
    }
}
