/// Out-of-range index handling for neighbourhood operators.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Border {
    /// `aaaa|abcd|dddd`
    Replicate,
    /// `dcb|abcd|cba` (mirror without repeating the edge sample)
    Reflect101,
}

impl Border {
    /// Map a possibly out-of-range index onto `0..len`.
    #[inline]
    pub fn index(self, idx: isize, len: usize) -> usize {
        if len <= 1 {
            return 0;
        }
        let n = len as isize;
        match self {
            Border::Replicate => idx.clamp(0, n - 1) as usize,
            Border::Reflect101 => {
                let mut i = idx;
                // Loops only when the kernel is wider than the image.
                loop {
                    if i < 0 {
                        i = -i;
                    } else if i >= n {
                        i = 2 * (n - 1) - i;
                    } else {
                        return i as usize;
                    }
                }
            }
        }
    }
}

/// Round half to even and clamp into the 8-bit range.
#[inline]
pub fn saturate_u8(v: f32) -> u8 {
    if v.is_nan() {
        return 0;
    }
    v.round_ties_even().clamp(0.0, 255.0) as u8
}
