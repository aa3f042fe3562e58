use memchr::memmem;

use crate::errors::*;

/// Options for constructing an [`Adapter`].
///
/// The defaults give an exact matcher that scans left to right and reports
/// the end of the matched region.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct AdapterOpts {
    /// Maximum number of tolerated substitutions per candidate.
    pub max_errors: usize,
    /// Smallest legal overlap for a boundary partial match. Defaults to the
    /// pattern length, which disables partial matches entirely.
    pub min_overlap: Option<usize>,
    /// Report the end of the matched region instead of its start.
    pub report_end: bool,
    /// Search for the rightmost occurrence instead of the leftmost. Also
    /// switches the legal boundary partial from the front of the query to
    /// the back, and switches reporting to end-relative coordinates.
    pub rightmost: bool,
}

impl Default for AdapterOpts {
    fn default() -> Self {
        Self {
            max_errors: 0,
            min_overlap: None,
            report_end: true,
            rightmost: false,
        }
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
enum Strategy {
    /// Empty pattern: every query trivially matches at position zero.
    Null,
    Exact,
    Hamming,
}

/// A reusable matcher that locates one adapter pattern in query sequences.
///
/// Construction fixes the pattern and all matching policies; a single
/// instance is immutable afterwards and can be shared freely across
/// threads. Use [`locate`](Adapter::locate) once per read.
#[derive(Clone, Debug)]
pub struct Adapter {
    /// Stored in search orientation: reversed when `rightmost` is set, so
    /// one forward scan serves both directions.
    pattern: Vec<u8>,
    max_errors: usize,
    min_overlap: usize,
    report_end: bool,
    rightmost: bool,
    strategy: Strategy,
}

impl Adapter {
    /// Builds a matcher for `pattern` with the policies in `opts`.
    ///
    /// An empty pattern yields the degenerate always-match strategy and
    /// ignores every other option. For non-empty patterns, `min_overlap`
    /// must be between 1 and the pattern length.
    pub fn new(pattern: impl AsRef<[u8]>, opts: AdapterOpts) -> Result<Self> {
        let pattern = pattern.as_ref();
        let len = pattern.len();

        if len == 0 {
            return Ok(Self {
                pattern: Vec::new(),
                max_errors: opts.max_errors,
                min_overlap: 0,
                report_end: opts.report_end,
                rightmost: opts.rightmost,
                strategy: Strategy::Null,
            });
        }

        let min_overlap = opts.min_overlap.unwrap_or(len);
        if min_overlap == 0 || min_overlap > len {
            return Err(Error::MinOverlap { min_overlap, len });
        }

        let strategy = if opts.max_errors == 0 {
            Strategy::Exact
        } else {
            Strategy::Hamming
        };

        let pattern = if opts.rightmost {
            pattern.iter().rev().copied().collect()
        } else {
            pattern.to_vec()
        };

        Ok(Self {
            pattern,
            max_errors: opts.max_errors,
            min_overlap,
            report_end: opts.report_end,
            rightmost: opts.rightmost,
            strategy,
        })
    }

    /// Exact leftmost matcher with all options at their defaults.
    pub fn exact(pattern: impl AsRef<[u8]>) -> Result<Self> {
        Self::new(pattern, AdapterOpts::default())
    }

    pub fn len(&self) -> usize {
        self.pattern.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pattern.is_empty()
    }

    pub fn max_errors(&self) -> usize {
        self.max_errors
    }

    pub fn min_overlap(&self) -> usize {
        self.min_overlap
    }

    /// Locates the adapter in `seq` and reports one boundary of the match.
    ///
    /// The best candidate is chosen in two stages. Every full-length window
    /// within the error budget is considered first; among those, the fewest
    /// errors win, with positional ties broken towards the left (or the
    /// right, for a rightmost matcher). A full match always beats a partial
    /// one, even at the maximum tolerated error count. Only when no full
    /// window qualifies is a single boundary partial attempted: a leftmost
    /// matcher accepts the query starting with a suffix of the pattern, a
    /// rightmost matcher accepts it ending with a prefix, in both cases
    /// taking the longest overlap within the error budget that is at least
    /// `min_overlap` long. A window of full pattern length that touches the
    /// query boundary is still a full match.
    ///
    /// The reported boundary is the match end (or start, with `report_end`
    /// off). Leftmost matchers report it as a non-negative offset from the
    /// start of the query; rightmost matchers report `boundary - N`, a
    /// non-positive offset from the end, so the caller can slice from the
    /// right without adjusting for trims applied to the left.
    ///
    /// Returns `None` when nothing qualifies; that is the normal "adapter
    /// absent" outcome, not an error.
    pub fn locate(&self, seq: &[u8]) -> Option<isize> {
        let max_errors = match self.strategy {
            Strategy::Null => return Some(0),
            Strategy::Exact => 0,
            Strategy::Hamming => self.max_errors,
        };

        let candidate = if self.rightmost {
            let rev: Vec<u8> = seq.iter().rev().copied().collect();
            find_forward(&self.pattern, &rev, max_errors, self.min_overlap)
                .map(|c| c.reflect(seq.len()))?
        } else {
            find_forward(&self.pattern, seq, max_errors, self.min_overlap)?
        };

        let boundary = if self.report_end {
            candidate.end
        } else {
            candidate.start
        };

        Some(if self.rightmost {
            boundary as isize - seq.len() as isize
        } else {
            boundary as isize
        })
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
enum MatchKind {
    Full,
    FrontPartial,
    BackPartial,
}

#[derive(Copy, Clone, Debug)]
struct Candidate {
    kind: MatchKind,
    start: usize,
    end: usize,
    errors: usize,
}

impl Candidate {
    /// Maps a candidate found in the reversed query back into original
    /// coordinates. Leftmost in reversed space is rightmost in the
    /// original, and a front partial becomes a back partial.
    fn reflect(self, n: usize) -> Self {
        use MatchKind::*;
        Self {
            kind: match self.kind {
                Full => Full,
                FrontPartial => BackPartial,
                BackPartial => FrontPartial,
            },
            start: n - self.end,
            end: n - self.start,
            errors: self.errors,
        }
    }
}

/// One search direction: leftmost full window within budget, then the
/// longest in-budget overlap of a pattern suffix at the start of the query.
fn find_forward(
    pattern: &[u8],
    seq: &[u8],
    max_errors: usize,
    min_overlap: usize,
) -> Option<Candidate> {
    let n = seq.len();
    let l = pattern.len();

    if n >= l {
        if max_errors == 0 {
            if let Some(start) = memmem::find(seq, pattern) {
                return Some(Candidate {
                    kind: MatchKind::Full,
                    start,
                    end: start + l,
                    errors: 0,
                });
            }
        } else {
            let mut best: Option<Candidate> = None;

            for start in 0..=n - l {
                let Some(errors) = hamming(&seq[start..start + l], pattern, max_errors) else {
                    continue;
                };

                // strict improvement keeps the leftmost window on ties
                if best.map_or(true, |b| errors < b.errors) {
                    best = Some(Candidate {
                        kind: MatchKind::Full,
                        start,
                        end: start + l,
                        errors,
                    });

                    if errors == 0 {
                        break;
                    }
                }
            }

            if best.is_some() {
                return best;
            }
        }
    }

    // No full window: the adapter may be cut off by the query boundary, in
    // which case the query begins with a suffix of the pattern. Longest
    // overlap wins.
    let longest = (l - 1).min(n);
    for k in (min_overlap..=longest).rev() {
        if let Some(errors) = hamming(&seq[..k], &pattern[l - k..], max_errors) {
            return Some(Candidate {
                kind: MatchKind::FrontPartial,
                start: 0,
                end: k,
                errors,
            });
        }
    }

    None
}

/// Bounded Hamming distance over equal-length slices, eight bytes at a
/// time. Returns the distance only if it does not exceed `threshold`.
fn hamming(a: &[u8], b: &[u8], threshold: usize) -> Option<usize> {
    if a.len() != b.len() {
        return None;
    }

    let a_ptr = a.as_ptr();
    let b_ptr = b.as_ptr();
    let n = a.len();
    let mut res = 0;
    let mut i = 0;

    unsafe {
        while i < (n / 8) * 8 {
            let a_word = std::ptr::read_unaligned(a_ptr.add(i) as *const u64);
            let b_word = std::ptr::read_unaligned(b_ptr.add(i) as *const u64);

            let xor = a_word ^ b_word;
            let or1 = xor | (xor >> 1);
            let or2 = or1 | (or1 >> 2);
            let or3 = or2 | (or2 >> 4);
            let mask = or3 & 0x0101010101010101u64;
            res += mask.count_ones() as usize;

            i += 8;
        }

        while i < n {
            res += (*a_ptr.add(i) != *b_ptr.add(i)) as usize;
            i += 1;
        }
    }

    if res <= threshold {
        Some(res)
    } else {
        None
    }
}
