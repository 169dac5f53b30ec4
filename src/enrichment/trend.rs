use crate::types::trend_window::TrendWindow;

/// Trailing mean over `window` values ending at each position.
///
/// Positions before the window is full average the available prefix. A window
/// holding any missing value yields `None`.
pub fn trailing_mean(values: &[Option<f64>], window: TrendWindow) -> Vec<Option<f64>> {
    let width = window.days();
    (0..values.len())
        .map(|end| {
            let start = (end + 1).saturating_sub(width);
            let slice = &values[start..=end];
            let sum = slice.iter().copied().sum::<Option<f64>>()?;
            Some(sum / slice.len() as f64)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn window(days: usize) -> TrendWindow {
        TrendWindow::new(days).unwrap()
    }

    #[test]
    fn test_first_day_is_own_value() {
        let trend = trailing_mean(&[Some(12.0), Some(14.0)], window(7));
        assert_eq!(trend[0], Some(12.0));
        assert_eq!(trend[1], Some(13.0));
    }

    #[test]
    fn test_full_window_mean() {
        let values: Vec<Option<f64>> = (1..=10).map(|v| Some(v as f64)).collect();
        let trend = trailing_mean(&values, window(7));
        // days 4..=10
        assert_eq!(trend[9], Some(7.0));
        // days 1..=7
        assert_eq!(trend[6], Some(4.0));
    }

    #[test]
    fn test_missing_value_poisons_its_windows() {
        let values = [Some(1.0), None, Some(3.0), Some(5.0), Some(7.0)];
        let trend = trailing_mean(&values, window(2));
        assert_eq!(trend, [Some(1.0), None, None, Some(4.0), Some(6.0)]);
    }

    #[test]
    fn test_window_of_one_is_identity() {
        let values = [Some(2.5), None, Some(-1.0)];
        assert_eq!(trailing_mean(&values, window(1)), values);
    }

    #[test]
    fn test_empty_series() {
        assert!(trailing_mean(&[], TrendWindow::default()).is_empty());
    }
}
