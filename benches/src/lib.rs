//! Synthetic inputs for the klines benchmarks.

use klines_lib::{RawCandle, RawField};

/// Grid step of the synthetic series (15 minutes).
pub const STEP_MS: i64 = 15 * 60 * 1000;

/// First open time of the synthetic series (2024-01-01T00:00:00Z).
pub const ORIGIN_MS: i64 = 1_704_067_200_000;

/// Builds `n` Binance-shaped candles on a 15-minute grid.
///
/// Every `gap_every`-th grid point is skipped, so the series has roughly
/// `n / gap_every` missing candles. Pass `0` for a complete series.
pub fn synthetic_candles(n: usize, gap_every: usize) -> Vec<RawCandle> {
    (0..n)
        .filter(|k| gap_every == 0 || k % gap_every != gap_every - 1)
        .map(|k| {
            let k = k as i64;
            let open_time = ORIGIN_MS + k * STEP_MS;
            let price = 40_000.0 + (k % 500) as f64 * 1.25;
            RawCandle::new(vec![
                RawField::Integer(open_time),
                format!("{price:.2}").into(),
                format!("{:.2}", price + 12.5).into(),
                format!("{:.2}", price - 8.75).into(),
                format!("{:.2}", price + 3.0).into(),
                format!("{:.8}", 10.0 + (k % 37) as f64 * 0.125).into(),
                RawField::Integer(open_time + STEP_MS - 1),
                "400000.0".into(),
                RawField::Integer(250 + k % 100),
                "5.0".into(),
                "200000.0".into(),
                "0".into(),
            ])
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_synthetic_candles() {
        assert_eq!(synthetic_candles(100, 0).len(), 100);
        assert_eq!(synthetic_candles(100, 10).len(), 90);

        let table = klines_lib::normalize(&synthetic_candles(50, 5)).unwrap();
        assert_eq!(table.len(), 40);
        assert_eq!(table.first_time(), Some(ORIGIN_MS));
    }
}
