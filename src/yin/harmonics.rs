use micromath::F32Ext;

use crate::yin::PeriodCandidate;

/// Frequency ratios within this distance of an even integer count as harmonic.
pub const HARMONIC_TOLERANCE: f32 = 0.02;
/// Confidence a candidate must exceed to be accepted as the fundamental.
pub const FUNDAMENTAL_CONFIDENCE_THRESHOLD: f32 = 0.7;
/// Fraction of a related candidate's strength added to the confidence.
const HARMONIC_SUPPORT_WEIGHT: f32 = 0.2;
/// The harmonic numbers tested. Odd harmonics are left out on purpose,
/// a fifth above an octave must not be folded into the fundamental.
const EVEN_HARMONICS: [f32; 4] = [2.0, 4.0, 6.0, 8.0];

/// Checks if two candidate periods are related by an even harmonic, with the
/// weaker of the two being the harmonic. Swapping the strengths of the two
/// periods therefore never leaves the result true.
pub fn is_harmonic(
    sample_rate: f32,
    period1: usize,
    period2: usize,
    strength1: f32,
    strength2: f32,
) -> bool {
    let freq1 = sample_rate / period1 as f32;
    let freq2 = sample_rate / period2 as f32;

    // period1 is a harmonic of the stronger period2.
    let ratio = freq1 / freq2;
    for h in EVEN_HARMONICS.iter() {
        if F32Ext::abs(ratio - h) < HARMONIC_TOLERANCE && strength1 < strength2 {
            return true;
        }
    }

    // period2 is a harmonic of the stronger period1.
    let inverse_ratio = freq2 / freq1;
    for h in EVEN_HARMONICS.iter() {
        if F32Ext::abs(inverse_ratio - h) < HARMONIC_TOLERANCE && strength2 < strength1 {
            return true;
        }
    }

    false
}

/// Picks the fundamental period among ranked candidates. Each candidate's confidence
/// is its strength plus a bonus for every other candidate it is harmonically related to.
/// The first candidate in rank order with a confidence above
/// [FUNDAMENTAL_CONFIDENCE_THRESHOLD] is returned, falling back to the top ranked one.
/// Returns 0 if there are no candidates.
pub fn resolve_fundamental(sample_rate: f32, candidates: &[PeriodCandidate]) -> usize {
    let strongest = match candidates.first() {
        Some(candidate) => candidate.period,
        None => return 0,
    };

    for (i, candidate) in candidates.iter().enumerate() {
        let mut confidence = candidate.strength;
        for (j, other) in candidates.iter().enumerate() {
            if i != j
                && is_harmonic(
                    sample_rate,
                    candidate.period,
                    other.period,
                    candidate.strength,
                    other.strength,
                )
            {
                confidence += other.strength * HARMONIC_SUPPORT_WEIGHT;
            }
        }

        if confidence > FUNDAMENTAL_CONFIDENCE_THRESHOLD {
            return candidate.period;
        }
    }

    strongest
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE_RATE: f32 = 8000.0;

    fn candidate(period: usize, strength: f32) -> PeriodCandidate {
        PeriodCandidate { period, strength }
    }

    #[test]
    fn test_even_harmonics() {
        // 160 Hz is the second harmonic of 80 Hz
        assert!(is_harmonic(SAMPLE_RATE, 50, 100, 0.8, 0.9));
        assert!(is_harmonic(SAMPLE_RATE, 100, 50, 0.9, 0.8));
        // A harmonic stronger than its fundamental is not flagged
        assert!(!is_harmonic(SAMPLE_RATE, 50, 100, 0.9, 0.8));
        // Fourth harmonic
        assert!(is_harmonic(SAMPLE_RATE, 25, 100, 0.8, 0.9));
        // Third harmonic is odd
        assert!(!is_harmonic(SAMPLE_RATE, 30, 90, 0.8, 0.9));
        // 2.03 is outside the tolerance
        assert!(!is_harmonic(SAMPLE_RATE, 36, 73, 0.8, 0.9));
    }

    #[test]
    fn test_weaker_period_is_the_harmonic() {
        let strengths = [0.75_f32, 0.8, 0.9, 0.99];
        for p1 in 10..120 {
            for p2 in 10..120 {
                for s1 in strengths.iter() {
                    for s2 in strengths.iter() {
                        let harmonic = is_harmonic(SAMPLE_RATE, p1, p2, *s1, *s2);
                        // Listing the pair in the other order gives the same answer.
                        assert_eq!(harmonic, is_harmonic(SAMPLE_RATE, p2, p1, *s2, *s1));
                        // Handing the larger strength to the other period does not.
                        let swapped = is_harmonic(SAMPLE_RATE, p1, p2, *s2, *s1);
                        assert!(!(harmonic && swapped), "{} {} {} {}", p1, p2, s1, s2);
                    }
                }
            }
        }
    }

    #[test]
    fn test_no_candidates() {
        assert_eq!(resolve_fundamental(SAMPLE_RATE, &[]), 0);
    }

    #[test]
    fn test_strong_first_candidate_wins() {
        let candidates = [candidate(36, 0.99), candidate(73, 0.98)];
        assert_eq!(resolve_fundamental(SAMPLE_RATE, &candidates), 36);
    }

    #[test]
    fn test_harmonic_support() {
        // 60 has no relatives and stays below the confidence threshold. 100 and 50
        // are an octave apart, which lifts 100 above it.
        let candidates = [candidate(60, 0.6), candidate(100, 0.59), candidate(50, 0.58)];
        assert_eq!(resolve_fundamental(SAMPLE_RATE, &candidates), 100);
    }

    #[test]
    fn test_fallback_to_strongest() {
        let candidates = [candidate(60, 0.6), candidate(70, 0.55), candidate(45, 0.5)];
        assert_eq!(resolve_fundamental(SAMPLE_RATE, &candidates), 60);
    }
}
