//! Estimated 1RM trend using linear regression (linfa)

use chrono::{DateTime, Utc};
use linfa::prelude::*;
use linfa_linear::LinearRegression;
use ndarray::{Array1, Array2};

use super::ProgressPoint;

/// Minimum data points required for training
const MIN_DATA_POINTS: usize = 3;

/// Linear fit of estimated 1RM over days since the first session
pub struct OneRepMaxTrend {
    slope: f64,
    intercept: f64,
    r2_score: f64,
    data_points: usize,
    first_date: DateTime<Utc>,
}

impl OneRepMaxTrend {
    /// Fit a trend to progress points (any order)
    pub fn train(points: &[ProgressPoint]) -> Option<Self> {
        if points.len() < MIN_DATA_POINTS {
            return None;
        }

        let first_date = points.iter().map(|p| p.date).min()?;

        // X = days since first session, Y = estimated 1RM
        let x_data: Vec<f64> = points
            .iter()
            .map(|p| (p.date - first_date).num_seconds() as f64 / 86_400.0)
            .collect();
        let y_data: Vec<f64> = points.iter().map(|p| p.estimated_one_rep_max).collect();

        let n_samples = x_data.len();
        let records = Array2::from_shape_vec((n_samples, 1), x_data).ok()?;
        let targets = Array1::from_vec(y_data);
        let dataset = Dataset::new(records, targets);

        let model = LinearRegression::default().fit(&dataset).ok()?;

        let slope = model.params()[0];
        let intercept = model.intercept();

        let predictions = model.predict(&dataset);
        let r2_score = predictions.r2(&dataset).unwrap_or(0.0);

        Some(Self {
            slope,
            intercept,
            r2_score,
            data_points: n_samples,
            first_date,
        })
    }

    /// Projected 1RM `days_ahead` days from now
    pub fn predict(&self, days_ahead: i32) -> f64 {
        let days_from_start = (Utc::now() - self.first_date).num_seconds() as f64 / 86_400.0;
        self.slope * (days_from_start + days_ahead as f64) + self.intercept
    }

    pub fn current_level(&self) -> f64 {
        self.predict(0)
    }

    /// Change in estimated 1RM per day
    pub fn daily_progress(&self) -> f64 {
        self.slope
    }

    pub fn r2_score(&self) -> f64 {
        self.r2_score
    }

    pub fn data_points(&self) -> usize {
        self.data_points
    }

    pub fn format(&self) -> String {
        let trend = if self.slope >= 0.0 {
            format!("+{:.2}", self.slope)
        } else {
            format!("{:.2}", self.slope)
        };

        [
            "--- 1RM trend ---".to_string(),
            format!("Trend: {} per day", trend),
            format!("Now: {:.1}", self.current_level()),
            format!("In 4 weeks: {:.1}", self.predict(28)),
            format!("Fit (R2): {:.2} over {} sessions", self.r2_score, self.data_points),
        ]
        .join("\n")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::progress::estimated_one_rep_max;
    use crate::workout::Set;

    fn point(weight: f64, days_ago: i64) -> ProgressPoint {
        ProgressPoint {
            date: Utc::now() - chrono::Duration::days(days_ago),
            sets: vec![Set::new(weight, 5, None).unwrap()],
            estimated_one_rep_max: estimated_one_rep_max(weight, 5),
        }
    }

    #[test]
    fn test_trend_insufficient_data() {
        let points = vec![point(200.0, 7), point(205.0, 0)];
        assert!(OneRepMaxTrend::train(&points).is_none());
    }

    #[test]
    fn test_trend_upward() {
        let points = vec![point(200.0, 14), point(210.0, 7), point(220.0, 0)];
        let trend = OneRepMaxTrend::train(&points).unwrap();

        // 10 lb per week at 5 reps -> 11.25 1RM per week
        let daily = trend.daily_progress();
        assert!(daily > 1.4 && daily < 1.8, "Daily progress: {}", daily);
        assert!(trend.r2_score() > 0.9, "R2 score: {}", trend.r2_score());
        assert_eq!(trend.data_points(), 3);
    }

    #[test]
    fn test_predict_future() {
        let points = vec![point(200.0, 14), point(210.0, 7), point(220.0, 0)];
        let trend = OneRepMaxTrend::train(&points).unwrap();

        let current = trend.current_level();
        let expected = estimated_one_rep_max(220.0, 5);
        assert!((current - expected).abs() < 2.0, "Current level: {}", current);
        assert!(trend.predict(28) > current);
    }

    #[test]
    fn test_negative_trend() {
        let points = vec![point(220.0, 14), point(210.0, 7), point(200.0, 0)];
        let trend = OneRepMaxTrend::train(&points).unwrap();
        assert!(trend.daily_progress() < 0.0);
        assert!(trend.predict(7) < trend.current_level());
    }

    #[test]
    fn test_format() {
        let points = vec![point(200.0, 14), point(210.0, 7), point(220.0, 0)];
        let formatted = OneRepMaxTrend::train(&points).unwrap().format();
        assert!(formatted.contains("1RM trend"), "Format: {}", formatted);
        assert!(formatted.contains("Trend: +"), "Format: {}", formatted);
    }
}
