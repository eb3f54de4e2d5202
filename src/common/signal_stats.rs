/// Level statistics of a window of unsigned ADC samples.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SignalStats {
    /// The mean squared deviation from `dc_offset`, i.e the population variance.
    pub power: f32,
    /// The mean sample value.
    pub dc_offset: f32,
}

/// Computes the DC offset (mean) and power (variance) of a window.
/// An empty window has zero power and zero DC offset.
pub fn signal_stats(samples: &[u16]) -> SignalStats {
    if samples.is_empty() {
        return SignalStats {
            power: 0.0,
            dc_offset: 0.0,
        };
    }

    let len = samples.len() as f32;
    let mut sum: f32 = 0.0;
    for sample in samples.iter() {
        sum += *sample as f32;
    }
    let dc_offset = sum / len;

    let mut power: f32 = 0.0;
    for sample in samples.iter() {
        let deviation = *sample as f32 - dc_offset;
        power += deviation * deviation;
    }

    SignalStats {
        power: power / len,
        dc_offset,
    }
}
