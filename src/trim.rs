use crate::adapter::Adapter;
use crate::read::Read;

/// Which of the two adapters were located during a [`Trimmer::trim`] call.
/// Policy on misses (keep, discard, route elsewhere) is the caller's.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct TrimOutcome {
    pub start_found: bool,
    pub end_found: bool,
}

/// Cuts adapter regions off a read using located positions.
///
/// The start matcher is expected to scan forward and report the match end;
/// the end matcher is expected to scan rightmost and report the match
/// start in end-relative coordinates. Both adapters are located on the
/// untouched read; because the end position is end-relative it stays valid
/// after the front of the read has been clipped away.
#[derive(Clone, Debug)]
pub struct Trimmer {
    start: Option<Adapter>,
    end: Option<Adapter>,
    trim_after_start: usize,
    trim_before_end: usize,
}

impl Trimmer {
    pub fn new(start: Option<Adapter>, end: Option<Adapter>) -> Self {
        Self {
            start,
            end,
            trim_after_start: 0,
            trim_before_end: 0,
        }
    }

    /// Extra bases to drop after the start adapter and before the end
    /// adapter (spacers, UMIs). Only applied when the respective adapter
    /// was actually located.
    pub fn with_offsets(mut self, trim_after_start: usize, trim_before_end: usize) -> Self {
        self.trim_after_start = trim_after_start;
        self.trim_before_end = trim_before_end;
        self
    }

    pub fn trim(&self, read: &mut Read) -> TrimOutcome {
        let start_pos = self.start.as_ref().and_then(|a| a.locate(read.seq()));
        let end_pos = self.end.as_ref().and_then(|a| a.locate(read.seq()));

        if let Some(pos) = start_pos {
            read.clip_before(pos);
            if self.trim_after_start > 0 {
                read.clip_before(self.trim_after_start as isize);
            }
        }

        if let Some(pos) = end_pos {
            read.clip_from(pos);
            if self.trim_before_end > 0 {
                read.clip_from(-(self.trim_before_end as isize));
            }
        }

        TrimOutcome {
            start_found: start_pos.is_some(),
            end_found: end_pos.is_some(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapter::AdapterOpts;

    fn start_adapter(pattern: &str) -> Adapter {
        Adapter::new(pattern, AdapterOpts::default()).unwrap()
    }

    fn end_adapter(pattern: &str) -> Adapter {
        Adapter::new(
            pattern,
            AdapterOpts {
                report_end: false,
                rightmost: true,
                ..Default::default()
            },
        )
        .unwrap()
    }

    fn read(seq: &[u8]) -> Read {
        Read::new(&b"r1"[..], seq, vec![b'I'; seq.len()])
    }

    #[test]
    fn trims_both_adapters() {
        let trimmer = Trimmer::new(
            Some(start_adapter("CTGGCA")),
            Some(end_adapter("GGGCCC")),
        );

        let mut r = read(b"TT_CTGGCA_PAYLOAD_GGGCCC_AA");
        let outcome = trimmer.trim(&mut r);

        assert_eq!(
            outcome,
            TrimOutcome {
                start_found: true,
                end_found: true
            }
        );
        assert_eq!(r.seq(), b"_PAYLOAD_");
        assert_eq!(r.len(), r.qual().len());
    }

    #[test]
    fn offsets_remove_spacer_bases() {
        let trimmer = Trimmer::new(
            Some(start_adapter("CTGGCA")),
            Some(end_adapter("GGGCCC")),
        )
        .with_offsets(1, 1);

        let mut r = read(b"TT_CTGGCA_PAYLOAD_GGGCCC_AA");
        trimmer.trim(&mut r);

        assert_eq!(r.seq(), b"PAYLOAD");
    }

    #[test]
    fn missing_adapters_leave_the_read_alone() {
        let trimmer = Trimmer::new(
            Some(start_adapter("CTGGCA")),
            Some(end_adapter("GGGCCC")),
        );

        let mut r = read(b"TT_PAYLOAD_AA");
        let outcome = trimmer.trim(&mut r);

        assert_eq!(outcome, TrimOutcome::default());
        assert_eq!(r.seq(), b"TT_PAYLOAD_AA");
    }

    #[test]
    fn start_only_trimmer_keeps_the_tail() {
        let trimmer = Trimmer::new(Some(start_adapter("CTGGCA")), None);

        let mut r = read(b"TT_CTGGCA_PAYLOAD");
        let outcome = trimmer.trim(&mut r);

        assert!(outcome.start_found);
        assert!(!outcome.end_found);
        assert_eq!(r.seq(), b"_PAYLOAD");
    }

    #[test]
    fn end_position_survives_the_front_clip() {
        // boundary partial of the end adapter at the back of the read
        let end = Adapter::new(
            "GGGCCC",
            AdapterOpts {
                report_end: false,
                rightmost: true,
                min_overlap: Some(3),
                ..Default::default()
            },
        )
        .unwrap();
        let trimmer = Trimmer::new(Some(start_adapter("CTGGCA")), Some(end));

        let mut r = read(b"TT_CTGGCA_PAYLOAD_GGG");
        let outcome = trimmer.trim(&mut r);

        assert!(outcome.start_found);
        assert!(outcome.end_found);
        assert_eq!(r.seq(), b"_PAYLOAD_");
    }
}
