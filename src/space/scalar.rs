//! Scalar distance kernels over encoded vector payloads.
//!
//! Payloads are little-endian element sequences exactly as they sit in a
//! record. The typed variants over `&[f32]` accumulate in the same order, so
//! both produce bit-identical results for the same inputs.

#[inline]
fn f32_at(bytes: &[u8], i: usize) -> f32 {
    let o = i * 4;
    f32::from_le_bytes([bytes[o], bytes[o + 1], bytes[o + 2], bytes[o + 3]])
}

/// Compute the squared Euclidean distance between two f32 payloads.
///
/// Returns sum((a[i] - b[i])^2)
#[inline]
pub fn l2_squared_f32(a: &[u8], b: &[u8]) -> f32 {
    debug_assert_eq!(a.len(), b.len(), "payload sizes must match");

    let mut sum = 0.0f32;
    for i in 0..a.len() / 4 {
        let diff = f32_at(a, i) - f32_at(b, i);
        sum += diff * diff;
    }
    sum
}

/// Compute the dot product of two f32 payloads.
///
/// Returns sum(a[i] * b[i])
#[inline]
pub fn dot_product_f32(a: &[u8], b: &[u8]) -> f32 {
    debug_assert_eq!(a.len(), b.len(), "payload sizes must match");

    let mut sum = 0.0f32;
    for i in 0..a.len() / 4 {
        sum += f32_at(a, i) * f32_at(b, i);
    }
    sum
}

/// Compute the inner-product distance of two f32 payloads.
///
/// Returns 1.0 - dot(a, b). On unit-normalized inputs this is the cosine
/// distance.
#[inline]
pub fn inner_product_distance_f32(a: &[u8], b: &[u8]) -> f32 {
    1.0 - dot_product_f32(a, b)
}

/// Compute the squared Euclidean distance between two u8 payloads.
///
/// Accumulates in integers and converts once at the end.
#[inline]
pub fn l2_squared_u8(a: &[u8], b: &[u8]) -> f32 {
    debug_assert_eq!(a.len(), b.len(), "payload sizes must match");

    let sum: u64 = a
        .iter()
        .zip(b.iter())
        .map(|(&x, &y)| {
            let diff = x.abs_diff(y) as u64;
            diff * diff
        })
        .sum();
    sum as f32
}

/// Compute the squared Euclidean distance between two f32 slices.
///
/// Same accumulation order as [`l2_squared_f32`].
#[inline]
pub fn l2_squared(a: &[f32], b: &[f32]) -> f32 {
    assert_eq!(a.len(), b.len(), "Vector dimensions must match");

    let mut sum = 0.0f32;
    for (x, y) in a.iter().zip(b.iter()) {
        let diff = x - y;
        sum += diff * diff;
    }
    sum
}

/// Compute the dot product of two f32 slices.
#[inline]
pub fn dot_product(a: &[f32], b: &[f32]) -> f32 {
    assert_eq!(a.len(), b.len(), "Vector dimensions must match");

    let mut sum = 0.0f32;
    for (x, y) in a.iter().zip(b.iter()) {
        sum += x * y;
    }
    sum
}
