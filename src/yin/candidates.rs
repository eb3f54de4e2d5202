/// The maximum number of period candidates gathered per window.
pub const MAX_CANDIDATE_COUNT: usize = 5;

/// Candidate strengths closer than this are ranked as equal, which keeps the
/// shorter period first. Integer lags at multiples of the true period have
/// almost identical strengths, and this keeps small sampling misalignments from
/// promoting a subharmonic over the fundamental.
pub const STRENGTH_TIE_TOLERANCE: f32 = 0.05;

/// Neighbors on each side that a candidate must not be above.
const LOCAL_MINIMUM_RADIUS: usize = 2;

/// A lag at which the difference function has a local minimum below the threshold.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct PeriodCandidate {
    /// The lag, in samples.
    pub period: usize,
    /// One minus the value of the difference function at `period`, between 0 and 1.
    pub strength: f32,
}

impl PeriodCandidate {
    pub(crate) fn new() -> Self {
        PeriodCandidate {
            period: 0,
            strength: 0.0,
        }
    }
}

/// A fixed capacity set of period candidates, ranked by descending strength.
#[derive(Debug, Clone)]
pub struct CandidateSet {
    candidates: [PeriodCandidate; MAX_CANDIDATE_COUNT],
    count: usize,
}

impl CandidateSet {
    pub fn new() -> Self {
        CandidateSet {
            candidates: [PeriodCandidate::new(); MAX_CANDIDATE_COUNT],
            count: 0,
        }
    }

    /// The valid candidates, in rank order.
    pub fn as_slice(&self) -> &[PeriodCandidate] {
        &self.candidates[..self.count]
    }

    pub fn len(&self) -> usize {
        self.count
    }

    pub fn is_empty(&self) -> bool {
        self.count == 0
    }

    pub fn clear(&mut self) {
        self.count = 0;
    }

    /// Appends a candidate unless the set is full. Returns false if it was not added.
    pub fn push(&mut self, candidate: PeriodCandidate) -> bool {
        if self.count == MAX_CANDIDATE_COUNT {
            return false;
        }
        self.candidates[self.count] = candidate;
        self.count += 1;
        true
    }

    /// Scans `curve` for lags in `min_period..max_period` with values below `threshold`
    /// that are local minima among their in-range neighbors, stopping after
    /// [MAX_CANDIDATE_COUNT] candidates, then ranks them.
    pub fn select(&mut self, curve: &[f32], min_period: usize, max_period: usize, threshold: f32) {
        self.clear();
        let max_period = max_period.min(curve.len());

        for tau in min_period..max_period {
            if self.count == MAX_CANDIDATE_COUNT {
                break;
            }
            let value = curve[tau];
            if value >= threshold {
                continue;
            }

            // Neighbors outside the search range are ignored.
            let first = tau.saturating_sub(LOCAL_MINIMUM_RADIUS).max(min_period);
            let last = (tau + LOCAL_MINIMUM_RADIUS).min(max_period - 1);
            let is_local_minimum = curve[first..=last].iter().all(|neighbor| *neighbor >= value);

            if is_local_minimum {
                self.push(PeriodCandidate {
                    period: tau,
                    strength: 1.0 - value,
                });
            }
        }

        self.rank();
    }

    /// Orders the candidates by descending strength with a small selection sort.
    /// Afterwards no candidate is stronger than one ranked before it by more than
    /// [STRENGTH_TIE_TOLERANCE]. The relative order of tied candidates is unspecified,
    /// but candidates that are never displaced keep scan order.
    pub fn rank(&mut self) {
        let candidates = &mut self.candidates[..self.count];
        for i in 0..candidates.len() {
            for j in (i + 1)..candidates.len() {
                if candidates[j].strength > candidates[i].strength + STRENGTH_TIE_TOLERANCE {
                    candidates.swap(i, j);
                }
            }
        }
    }
}

impl Default for CandidateSet {
    fn default() -> Self {
        CandidateSet::new()
    }
}
