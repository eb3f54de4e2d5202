use microfft::Complex32;

/// Returns true if [complex_fft_in_place] supports buffers of length `size`.
pub fn is_supported_fft_size(size: usize) -> bool {
    size.is_power_of_two() && (16..=4096).contains(&size)
}

macro_rules! cfft_for_size {
    ($buffer:ident, $($size:literal => $cfft:ident),+ $(,)?) => {
        match $buffer.len() {
            $(
                $size => {
                    let _ = microfft::complex::$cfft((&mut *$buffer).try_into().unwrap());
                }
            )+
            fft_size => panic!("Unsupported fft size {}", fft_size),
        }
    };
}

/// Performs an in-place complex FFT. Panics if the buffer length is not
/// a [supported size](is_supported_fft_size).
pub fn complex_fft_in_place(buffer: &mut [Complex32]) {
    cfft_for_size!(
        buffer,
        16 => cfft_16,
        32 => cfft_32,
        64 => cfft_64,
        128 => cfft_128,
        256 => cfft_256,
        512 => cfft_512,
        1024 => cfft_1024,
        2048 => cfft_2048,
        4096 => cfft_4096,
    );
}
