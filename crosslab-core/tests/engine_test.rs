//! End-to-end engine scenarios over hand-built series.

use chrono::{Duration, NaiveDate};
use crosslab_core::domain::{Position, PositionStatus, PriceBar, PriceSeries, SignalAction};
use crosslab_core::engine::{
    run_backtest, run_batch, BacktestEngine, BacktestError, EngineConfig,
};
use crosslab_core::signals::Relation;

fn base_date() -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 1, 1).unwrap()
}

fn series_from_closes(symbol: &str, closes: &[f64]) -> PriceSeries {
    let bars = closes
        .iter()
        .enumerate()
        .map(|(i, &c)| PriceBar::from_close(base_date() + Duration::days(i as i64), c))
        .collect();
    PriceSeries::new(symbol, bars).unwrap()
}

/// 30 declining closes, then a jump that lifts the 15-bar average over the
/// 30-bar average on bar 31 (index 30), and a steady climb after.
fn single_cross_series() -> PriceSeries {
    let mut closes: Vec<f64> = (0..30).map(|i| 100.0 - i as f64).collect();
    closes.extend([300.0, 301.0, 302.0, 303.0, 304.0]);
    series_from_closes("CROSS", &closes)
}

#[test]
fn flat_prices_emit_nothing() {
    let series = series_from_closes("FLAT", &[5.0; 40]);
    let result = run_backtest(EngineConfig::default(), &series).unwrap();

    assert!(result.signal_log.is_empty());
    assert_eq!(result.final_position, Position::Flat);

    let last = result.trace.last().unwrap();
    assert_eq!(last.short_ma, Some(5.0));
    assert_eq!(last.long_ma, Some(5.0));
    assert!(result.trace.iter().all(|s| s.relation == Relation::Undefined));
}

#[test]
fn single_cross_emits_one_buy_on_bar_31() {
    let series = single_cross_series();
    assert_eq!(series.len(), 35);
    let result = run_backtest(EngineConfig::default(), &series).unwrap();

    assert_eq!(result.signal_log.len(), 1);
    let buy = result.signal_log.events()[0];
    assert_eq!(buy.action, SignalAction::Buy);
    assert_eq!(buy.date, base_date() + Duration::days(30));
    assert_eq!(buy.price, 300.0);

    assert_eq!(result.trace[29].relation, Relation::Below);
    assert_eq!(result.trace[30].relation, Relation::Above);
    assert_eq!(result.trace[30].signal, Some(SignalAction::Buy));

    assert_eq!(
        result.final_position,
        Position::Long {
            entry_date: buy.date,
            entry_price: 300.0
        }
    );
    assert!(result.trades.is_empty());
    assert_eq!(result.summary.unrealized_pnl, 4.0);
}

#[test]
fn fewer_bars_than_long_period() {
    let series = series_from_closes("SHORT", &[1.0, 2.0, 3.0, 4.0, 5.0]);
    let result = run_backtest(EngineConfig::default(), &series).unwrap();

    assert_eq!(result.trace.len(), 5);
    assert!(result.long_ma().all(|v| v.is_none()));
    assert!(result.short_ma().all(|v| v.is_none()));
    assert!(result.signal_log.is_empty());
    assert_eq!(result.final_position.status(), PositionStatus::Flat);
}

#[test]
fn empty_series_is_not_an_error() {
    let series = PriceSeries::empty("NONE").unwrap();
    let result = run_backtest(EngineConfig::default(), &series).unwrap();

    assert!(result.signal_log.is_empty());
    assert!(result.trace.is_empty());
    assert_eq!(result.final_position, Position::Flat);
    assert_eq!(result.summary.bars, 0);
    assert_eq!(result.summary.final_close, None);
}

#[test]
fn round_trip_then_reentry() {
    // Cross up at index 4, down at index 7, up again at index 11.
    let closes = [
        10.0, 9.0, 8.0, 7.0, 12.0, 14.0, 15.0, 6.0, 5.0, 4.0, 4.0, 9.0, 10.0,
    ];
    let series = series_from_closes("RT", &closes);
    let result = run_backtest(EngineConfig::new(2, 3), &series).unwrap();

    let actions: Vec<_> = result.signal_log.iter().map(|e| e.action).collect();
    assert_eq!(
        actions,
        vec![SignalAction::Buy, SignalAction::Sell, SignalAction::Buy]
    );
    assert_eq!(result.trades.len(), 1);
    assert_eq!(result.trades[0].pnl(), -6.0);
    assert_eq!(result.summary.closed_trades, 1);
    assert_eq!(result.summary.winners, 0);
    assert!(result.final_position.is_long());
}

#[test]
fn signals_alternate_and_are_chronological() {
    let series = crosslab_core::data::synthetic::random_walk("RW", 600, 11).unwrap();
    let result = run_backtest(EngineConfig::new(5, 20), &series).unwrap();

    let events = result.signal_log.events();
    assert!(!events.is_empty());
    for pair in events.windows(2) {
        assert!(pair[0].date < pair[1].date);
        assert_ne!(pair[0].action, pair[1].action);
    }
    assert_eq!(events[0].action, SignalAction::Buy);
}

#[test]
fn runs_are_deterministic() {
    let series = crosslab_core::data::synthetic::random_walk("DET", 400, 3).unwrap();
    let engine = BacktestEngine::new(EngineConfig::new(10, 30)).unwrap();
    let a = engine.run(&series).unwrap();
    let b = engine.run(&series).unwrap();
    assert_eq!(a.signal_log, b.signal_log);
    assert_eq!(a.final_position, b.final_position);
    assert_eq!(a, b);
}

#[test]
fn batch_matches_sequential() {
    let series: Vec<PriceSeries> = (0..8)
        .map(|seed| {
            crosslab_core::data::synthetic::random_walk(&format!("S{seed}"), 300, seed).unwrap()
        })
        .collect();
    let engine = BacktestEngine::new(EngineConfig::new(5, 15)).unwrap();

    let parallel = run_batch(&engine, &series);
    for (s, r) in series.iter().zip(parallel) {
        assert_eq!(r.unwrap(), engine.run(s).unwrap());
    }
}

#[test]
fn invalid_periods_are_rejected_before_running() {
    let series = series_from_closes("X", &[1.0, 2.0]);
    let err = run_backtest(EngineConfig::new(30, 15), &series).unwrap_err();
    assert!(matches!(err, BacktestError::Config(_)));
    assert!(BacktestEngine::new(EngineConfig::new(0, 15)).is_err());
}

#[test]
fn out_of_order_step_is_an_integrity_error() {
    let engine = BacktestEngine::new(EngineConfig::new(2, 3)).unwrap();
    let mut state = engine.start().unwrap();
    let day = |d| NaiveDate::from_ymd_opt(2024, 1, d).unwrap();

    engine.step(&mut state, &PriceBar::from_close(day(3), 1.0)).unwrap();
    let err = engine
        .step(&mut state, &PriceBar::from_close(day(2), 1.0))
        .unwrap_err();
    assert!(matches!(err, BacktestError::DataIntegrity(_)));
}
