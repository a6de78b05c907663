//! Locally generated opaque project identifiers.
//!
//! Microcontroller targets have no OS entropy source, so guids come from a
//! small deterministic generator seeded by the platform (boot counter,
//! hardware RNG, ADC noise). Guids are opaque; nothing in the hub relies on
//! their layout beyond uniqueness per source.

use alloc::string::String;
use alloc::format;

/// Deterministic guid generator (xorshift64*).
pub struct GuidSource {
    state: u64,
}

impl GuidSource {
    pub const fn new(seed: u64) -> Self {
        // xorshift state must never be zero.
        let mixed = seed ^ 0x853c_49e6_748f_ea9b;
        Self {
            state: if mixed == 0 { 0x853c_49e6_748f_ea9b } else { mixed },
        }
    }

    fn next_u64(&mut self) -> u64 {
        let mut x = self.state;
        x ^= x >> 12;
        x ^= x << 25;
        x ^= x >> 27;
        self.state = x;
        x.wrapping_mul(0x2545_f491_4f6c_dd1d)
    }

    /// Produce the next guid, formatted as 8-4-4-4-12 lowercase hex groups.
    pub fn next_guid(&mut self) -> String {
        let digits = format!("{:016x}{:016x}", self.next_u64(), self.next_u64());
        format!(
            "{}-{}-{}-{}-{}",
            &digits[0..8],
            &digits[8..12],
            &digits[12..16],
            &digits[16..20],
            &digits[20..32]
        )
    }
}
