use lazy_static::lazy_static;

use std::fmt;

lazy_static! {
    pub static ref COMPLEMENT: [u8; 256] = {
        let mut comp = [0; 256];

        for (v, a) in comp.iter_mut().enumerate() {
            *a = v as u8;
        }

        // IUPAC DNA alphabet
        for (&a, &b) in b"AGCTYRWSKMDVHBN".iter().zip(b"TCGARYWSMKHBDVN".iter()) {
            comp[a as usize] = b; // upper case
            comp[a as usize + 32] = b + 32; // lower case
        }

        comp
    };
}

/// Reverse complement of a sequence. Bytes outside the IUPAC alphabet are
/// passed through unchanged.
pub fn revcomp(seq: &[u8]) -> Vec<u8> {
    seq.iter().rev().map(|&b| COMPLEMENT[b as usize]).collect()
}

/// One sequencing read: name, sequence, and per-base quality scores.
///
/// The sequence and quality strings always have the same length; every
/// mutation here keeps them in lockstep.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Read {
    name: Vec<u8>,
    seq: Vec<u8>,
    qual: Vec<u8>,
}

impl Read {
    pub fn new(name: impl Into<Vec<u8>>, seq: impl Into<Vec<u8>>, qual: impl Into<Vec<u8>>) -> Self {
        let name = name.into();
        let seq = seq.into();
        let qual = qual.into();
        assert_eq!(
            seq.len(),
            qual.len(),
            "Sequence and quality lengths differ"
        );

        Self { name, seq, qual }
    }

    pub fn name(&self) -> &[u8] {
        &self.name
    }

    pub fn seq(&self) -> &[u8] {
        &self.seq
    }

    pub fn qual(&self) -> &[u8] {
        &self.qual
    }

    pub fn len(&self) -> usize {
        self.seq.len()
    }

    pub fn is_empty(&self) -> bool {
        self.seq.is_empty()
    }

    pub fn to_fastq(&self) -> (&[u8], &[u8], &[u8]) {
        (&self.name, &self.seq, &self.qual)
    }

    /// Reverse-complements the sequence and reverses the quality string in
    /// place, flipping the read to the opposite strand.
    pub fn revcomp(&mut self) {
        self.seq = revcomp(&self.seq);
        self.qual.reverse();
    }

    /// Resolves a signed position to an index into the read. Non-negative
    /// positions count from the start and clamp at the read length;
    /// negative positions count from the end and clamp at zero.
    fn resolve(&self, pos: isize) -> usize {
        if pos < 0 {
            self.len().saturating_sub(pos.unsigned_abs())
        } else {
            (pos as usize).min(self.len())
        }
    }

    /// Removes everything before the resolved position (sequence and
    /// qualities both).
    pub fn clip_before(&mut self, pos: isize) {
        let at = self.resolve(pos);
        self.seq.drain(..at);
        self.qual.drain(..at);
    }

    /// Truncates the read at the resolved position.
    pub fn clip_from(&mut self, pos: isize) {
        let at = self.resolve(pos);
        self.seq.truncate(at);
        self.qual.truncate(at);
    }
}

impl fmt::Display for Read {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        writeln!(f, "@{}", String::from_utf8_lossy(&self.name))?;
        writeln!(f, "{}", String::from_utf8_lossy(&self.seq))?;
        writeln!(f, "+")?;
        write!(f, "{}", String::from_utf8_lossy(&self.qual))
    }
}

/// A single-end read or a mated pair, processed as one unit.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Fragment {
    read1: Read,
    read2: Option<Read>,
}

impl Fragment {
    pub fn new1(read1: Read) -> Self {
        Self { read1, read2: None }
    }

    pub fn new2(read1: Read, read2: Read) -> Self {
        Self {
            read1,
            read2: Some(read2),
        }
    }

    pub fn is_paired(&self) -> bool {
        self.read2.is_some()
    }

    pub fn read1(&self) -> &Read {
        &self.read1
    }

    pub fn read1_mut(&mut self) -> &mut Read {
        &mut self.read1
    }

    pub fn read2(&self) -> Option<&Read> {
        self.read2.as_ref()
    }

    pub fn read2_mut(&mut self) -> Option<&mut Read> {
        self.read2.as_mut()
    }

    pub fn reads(&self) -> impl Iterator<Item = &Read> {
        std::iter::once(&self.read1).chain(self.read2.as_ref())
    }

    pub fn reads_mut(&mut self) -> impl Iterator<Item = &mut Read> {
        std::iter::once(&mut self.read1).chain(self.read2.as_mut())
    }
}
