/// Asserts that a numerical value is in the provided interval `[a,b]` and panics
/// with a helpful message if not
///
/// ### Example
/// ```
/// # use tabular_cartpole::assert_interval;
/// let value = 0.5;
/// assert_interval!(value, 0.0, 1.0);
/// ```
/// A value of `2.0` would panic with the message "Invalid value for \`value\`. Must be in the interval \[0, 1\]."
#[macro_export]
macro_rules! assert_interval {
    ($var:expr, $a:expr, $b:expr) => {
        assert!(
            $var >= $a && $var <= $b,
            "Invalid value for `{}`. Must be in the interval [{}, {}].",
            stringify!($var),
            $a,
            $b,
        );
    };
}

/// Index of the largest value, preferring the lowest index on ties
///
/// `NaN` values never win. Returns `None` for an empty iterator.
pub fn argmax(values: impl IntoIterator<Item = f32>) -> Option<usize> {
    values
        .into_iter()
        .enumerate()
        .fold(None, |best: Option<(usize, f32)>, (i, x)| match best {
            Some((_, b)) if x > b || b.is_nan() => Some((i, x)),
            None => Some((i, x)),
            _ => best,
        })
        .map(|(i, _)| i)
}
