//! Rabin-Karp substring scan.
//!
//! Rolling-hash search: a window hash is updated in O(1) as the window
//! slides, and only hash collisions pay for a byte-wise verification.

/// Radix of the rolling hash (byte alphabet size).
const RADIX: u64 = 256;

/// Prime modulus keeping the hash values small.
const MODULUS: u64 = 101;

/// Check whether `needle` occurs anywhere in `text`.
pub(crate) fn contains(text: &[u8], needle: &[u8]) -> bool {
    let m = needle.len();
    if m == 0 {
        return true;
    }
    let n = text.len();
    if n < m {
        return false;
    }

    // high = RADIX^(m-1) mod MODULUS, the weight of the outgoing byte
    let mut high: u64 = 1;
    for _ in 0..m - 1 {
        high = (high * RADIX) % MODULUS;
    }

    let mut needle_hash: u64 = 0;
    let mut window_hash: u64 = 0;
    for i in 0..m {
        needle_hash = (RADIX * needle_hash + needle[i] as u64) % MODULUS;
        window_hash = (RADIX * window_hash + text[i] as u64) % MODULUS;
    }

    for i in 0..=n - m {
        if needle_hash == window_hash && &text[i..i + m] == needle {
            return true;
        }
        if i < n - m {
            let outgoing = (text[i] as u64 * high) % MODULUS;
            window_hash =
                (RADIX * (window_hash + MODULUS - outgoing) + text[i + m] as u64) % MODULUS;
        }
    }
    false
}
