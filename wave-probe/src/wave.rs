use rand::Rng;

use std::f64::consts::PI;

pub const FREQ_RANGE: (f64, f64) = (1.0, 50.0); // Hz
pub const AMP_RANGE: (f64, f64) = (5000.0, 30000.0); // int amplitude

// Sine wave with random frequency, amplitude and phase, truncated to
// i32 samples.
pub fn generate_random_sine_wave(num_samples: usize, sample_rate: u32) -> Vec<i32> {
    let mut rng = rand::thread_rng();
    let frequency = rng.gen_range(FREQ_RANGE.0..FREQ_RANGE.1);
    let amplitude = rng.gen_range(AMP_RANGE.0..AMP_RANGE.1);
    let phase = rng.gen_range(0.0..2.0 * PI);

    (0..num_samples)
        .map(|n| {
            let t = n as f64 / sample_rate as f64;
            (amplitude * (2.0 * PI * frequency * t + phase).sin()) as i32
        })
        .collect()
}

// The wire format is bare native-endian i32s, no header or length
// prefix. The peer is expected to know the sample count.
pub fn pack_samples(samples: &[i32]) -> Vec<u8> {
    let mut buf = Vec::with_capacity(samples.len() * 4);
    for sample in samples {
        buf.extend_from_slice(&sample.to_ne_bytes());
    }
    buf
}

pub fn unpack_samples(buf: &[u8]) -> Vec<i32> {
    buf.chunks_exact(4)
        .map(|bytes| i32::from_ne_bytes([bytes[0], bytes[1], bytes[2], bytes[3]]))
        .collect()
}
