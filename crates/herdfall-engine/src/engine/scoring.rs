/// Region size from which the Fibonacci bonus applies.
pub const BONUS_MIN_REGION: usize = 11;

/// Fibonacci number with `F(1) = F(2) = 1`; `F(0)` is 0.
///
/// Saturates at `u64::MAX`.
#[must_use]
pub fn fib(n: usize) -> u64 {
    let (mut a, mut b) = (0_u64, 1_u64);
    for _ in 0..n {
        (a, b) = (b, a.saturating_add(b));
    }
    a
}

/// Extra points for a region of `size` cells.
///
/// | size | bonus |
/// |------|-------|
/// | ≤ 10 | 0     |
/// | 11   | 2     |
/// | 12   | 3     |
/// | 14   | 8     |
#[must_use]
pub fn size_bonus(size: usize) -> u64 {
    if size < BONUS_MIN_REGION {
        return 0;
    }
    fib(size - 8)
}

/// Applies one cleared region to the running score and returns the new score.
///
/// The base (`size`) and the size bonus are added first. Then the whole
/// running total is doubled once per egg and halved (rounding down) once per
/// turd, in that order.
///
/// # Example
///
/// ```
/// use herdfall_engine::scoring::apply_region;
///
/// // 90 points so far, a 10-cell region with one egg and one turd.
/// assert_eq!(apply_region(90, 10, 1, 1), 100);
/// assert_eq!(apply_region(90, 10, 2, 0), 400);
/// assert_eq!(apply_region(90, 10, 0, 2), 25);
/// ```
#[must_use]
pub fn apply_region(score: u64, size: usize, eggs: usize, turds: usize) -> u64 {
    let base = u64::try_from(size).unwrap_or(u64::MAX);
    let mut score = score.saturating_add(base).saturating_add(size_bonus(size));
    for _ in 0..eggs {
        score = score.saturating_mul(2);
    }
    u32::try_from(turds)
        .ok()
        .and_then(|turds| score.checked_shr(turds))
        .unwrap_or(0)
}
