use approx::assert_relative_eq;
use chrono::{DateTime, Duration, FixedOffset};
use forex_forecast::data::TimeSeriesData;
use forex_forecast::models::arima::{ArimaModel, ArimaOrder};
use forex_forecast::models::{ForecastModel, ForecastResult, TrainedForecastModel};
use forex_forecast::optimization::NelderMeadConfig;
use forex_forecast::ForecastError;
use rstest::rstest;

fn create_test_data(n: usize) -> TimeSeriesData {
    let start = DateTime::parse_from_rfc3339("2023-01-01T00:00:00Z").unwrap();
    let dates: Vec<DateTime<FixedOffset>> =
        (0..n).map(|i| start + Duration::days(i as i64)).collect();

    // Bounded, non-repeating wiggle around 1386.85
    let values = (0..n)
        .map(|i| 1386.85 + ((i * 37 % 17) as f64 - 8.0) * 0.1 + (i as f64 * 0.7).sin() * 0.3)
        .collect();

    TimeSeriesData::new(dates, values).unwrap()
}

#[test]
fn test_arima_model() {
    let data = create_test_data(60);
    let model = ArimaModel::new(5, 1, 0);

    let trained_model = model.train(&data).unwrap();
    let forecast = trained_model.forecast(7).unwrap();

    assert_eq!(forecast.horizons(), 7);
    assert_eq!(trained_model.ar_coefficients().len(), 5);
    assert!(trained_model.ma_coefficients().is_empty());
    assert_eq!(trained_model.constant(), 0.0);
    assert_eq!(trained_model.nobs(), 60);

    for value in forecast.values() {
        assert!((value - 1386.85).abs() < 10.0, "forecast {} drifted", value);
    }
}

#[rstest]
#[case(ArimaOrder::new(1, 0, 0))]
#[case(ArimaOrder::new(2, 1, 0))]
#[case(ArimaOrder::new(0, 1, 1))]
#[case(ArimaOrder::new(1, 1, 1))]
#[case(ArimaOrder::new(5, 1, 0))]
fn test_alternate_orders(#[case] order: ArimaOrder) {
    let data = create_test_data(80);
    let model = ArimaModel::with_order(order);

    let trained = model.train(&data).unwrap();
    let forecast = trained.forecast(3).unwrap();

    assert_eq!(trained.order(), order);
    assert_eq!(forecast.values().len(), 3);
    assert!(forecast.values().iter().all(|v| v.is_finite()));
    assert!(trained.sigma2() >= 0.0);
}

#[rstest]
#[case(ArimaOrder::new(5, 1, 0), 7)]
#[case(ArimaOrder::new(1, 0, 0), 3)]
#[case(ArimaOrder::new(1, 1, 1), 4)]
fn test_min_observations(#[case] order: ArimaOrder, #[case] expected: usize) {
    let model = ArimaModel::with_order(order);
    assert_eq!(model.min_observations(), expected);

    let short = create_test_data(expected - 1);
    assert!(matches!(
        model.train(&short),
        Err(ForecastError::InsufficientData { .. })
    ));
    assert!(model.train(&create_test_data(expected + 20)).is_ok());
}

#[test]
fn test_random_walk_with_drift_constant() {
    // Differenced series is constant 2.0; with a constant term the fit is exact
    let start = DateTime::parse_from_rfc3339("2023-01-01T00:00:00Z").unwrap();
    let dates = (0..30).map(|i| start + Duration::days(i)).collect();
    let values = (0..30).map(|i| 100.0 + 2.0 * i as f64).collect();
    let data = TimeSeriesData::new(dates, values).unwrap();

    let trained = ArimaModel::new(0, 1, 0)
        .with_constant(true)
        .train(&data)
        .unwrap();
    assert_relative_eq!(trained.constant(), 2.0, epsilon = 1e-6);

    let forecast = trained.forecast(3).unwrap();
    assert_relative_eq!(forecast.values()[0], 160.0, epsilon = 1e-6);
    assert_relative_eq!(forecast.values()[2], 164.0, epsilon = 1e-6);
}

#[test]
fn test_forecast_result_validation() {
    let forecast = ForecastResult::new(vec![105.0, 106.0, 107.0], 3).unwrap();
    assert_eq!(forecast.horizons(), 3);
    assert_eq!(forecast.values(), &[105.0, 106.0, 107.0]);

    assert!(matches!(
        ForecastResult::new(vec![1.0, 2.0], 3),
        Err(ForecastError::ValidationError(_))
    ));
    assert!(matches!(
        ForecastResult::new(vec![1.0, f64::INFINITY], 2),
        Err(ForecastError::ModelError(_))
    ));
}

#[test]
fn test_model_names() {
    let model = ArimaModel::new(5, 1, 0);
    assert_eq!(model.name(), "ARIMA(5,1,0)");

    let trained = model.train(&create_test_data(30)).unwrap();
    assert_eq!(trained.name(), "ARIMA(5,1,0)");
}

#[test]
fn test_short_series_fits_with_padded_presample() {
    // 8 observations leave only 2 conditional rows for 5 AR coefficients
    let data = create_test_data(8);
    let trained = ArimaModel::new(5, 1, 0).train(&data).unwrap();
    let forecast = trained.forecast(7).unwrap();

    assert_eq!(trained.ar_coefficients().len(), 5);
    assert!(forecast.values().iter().all(|v| v.is_finite()));
}

#[test]
fn test_fit_statistics() {
    let data = create_test_data(60);
    let trained = ArimaModel::new(2, 1, 0).train(&data).unwrap();

    // Residuals live on the differenced scale; the first p are conditioned away
    let residuals = trained.residuals();
    assert_eq!(residuals.len(), 59);
    assert_eq!(&residuals[..2], &[0.0, 0.0]);

    let n_eff = 57.0_f64;
    let k = 3.0;
    let sigma2 = residuals[2..].iter().map(|e| e * e).sum::<f64>() / n_eff;
    assert_relative_eq!(trained.sigma2(), sigma2, epsilon = 1e-12);

    let log_likelihood = trained.log_likelihood();
    assert!(log_likelihood.is_finite());
    assert_relative_eq!(trained.aic(), -2.0 * log_likelihood + 2.0 * k, epsilon = 1e-9);
    assert_relative_eq!(
        trained.bic(),
        -2.0 * log_likelihood + k * n_eff.ln(),
        epsilon = 1e-9
    );
}

#[test]
fn test_optimizer_budget_exhausted() {
    let config = NelderMeadConfig {
        max_iter: 1,
        ..NelderMeadConfig::default()
    };
    let model = ArimaModel::new(1, 1, 1).with_optimizer(config);

    assert!(matches!(
        model.train(&create_test_data(80)),
        Err(ForecastError::ConvergenceError { iterations: 1 })
    ));
}
