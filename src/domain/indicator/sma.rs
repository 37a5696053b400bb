//! Simple moving average.
//!
//! Warmup: first (window - 1) positions are `None`.

/// Rolling mean of `values` over `window`. Returns one entry per input
/// value; `None` until a full window is available or when `window` is 0.
pub fn sma(values: &[f64], window: usize) -> Vec<Option<f64>> {
    if window == 0 {
        return vec![None; values.len()];
    }

    let mut out = Vec::with_capacity(values.len());
    let mut running = 0.0;

    for (i, &v) in values.iter().enumerate() {
        running += v;
        if i >= window {
            running -= values[i - window];
        }
        if i + 1 >= window {
            out.push(Some(running / window as f64));
        } else {
            out.push(None);
        }
    }
    out
}
