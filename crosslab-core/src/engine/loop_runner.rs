//! Bar loop — replays a series through the indicators and the decision rule.
//!
//! Per bar:
//! 1. Feed the close into both moving averages
//! 2. Classify the short/long relation and detect a cross
//! 3. Apply the guarded transition (enter on cross up while flat, exit on
//!    cross down while long), filling at this bar's close
//! 4. Record the bar snapshot

use log::{debug, info};

use crate::config::ConfigError;
use crate::domain::{DataIntegrityError, PriceBar, PriceSeries, SignalEvent};
use crate::engine::config::EngineConfig;
use crate::engine::decision::{decide, Decision};
use crate::engine::error::BacktestError;
use crate::engine::result::BacktestResult;
use crate::engine::state::{BarSnapshot, EngineState};
use crate::engine::tracker::InvalidTransition;
use crate::indicators::Indicator;

/// Immutable engine: holds only configuration, so one instance can serve any
/// number of concurrent runs.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BacktestEngine {
    config: EngineConfig,
}

impl BacktestEngine {
    pub fn new(config: EngineConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self { config })
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Fresh per-run state.
    pub fn start(&self) -> Result<EngineState, ConfigError> {
        EngineState::new(&self.config)
    }

    /// Process one bar. Bars must arrive in strictly increasing date order.
    pub fn step(&self, state: &mut EngineState, bar: &PriceBar) -> Result<(), BacktestError> {
        let bar_index = state.bar_index;

        if let Some(previous) = state.last_date {
            if bar.date == previous {
                return Err(DataIntegrityError::DuplicateDate {
                    index: bar_index,
                    date: bar.date,
                }
                .into());
            }
            if bar.date < previous {
                return Err(DataIntegrityError::OutOfOrder {
                    index: bar_index,
                    previous,
                    date: bar.date,
                }
                .into());
            }
        }

        let short_ma = state.short.update(bar.close);
        let long_ma = state.long.update(bar.close);
        let relation = state.detector.observe(short_ma, long_ma);
        let cross = state.detector.cross();

        let transition_err = |source: InvalidTransition| BacktestError::Transition {
            bar_index,
            date: bar.date,
            source,
        };

        let signal = match decide(cross, state.tracker.position().status()) {
            Decision::EnterLong => {
                state
                    .tracker
                    .enter_long(bar.date, bar.close)
                    .map_err(transition_err)?;
                Some(SignalEvent::buy(bar.date, bar.close))
            }
            Decision::ExitLong => {
                let trade = state
                    .tracker
                    .exit_long(bar.date, bar.close)
                    .map_err(transition_err)?;
                state.realized_pnl += trade.pnl();
                state.trades.push(trade);
                Some(SignalEvent::sell(bar.date, bar.close))
            }
            Decision::Hold => {
                if let Some(cross) = cross {
                    debug!(
                        "{}: cross {cross:?} ignored, position already {:?}",
                        bar.date,
                        state.tracker.position().status()
                    );
                }
                None
            }
        };

        if let Some(event) = signal {
            debug!("{event}");
            state.log.append(event);
        }

        let position = state.tracker.position();
        state.trace.push(BarSnapshot {
            bar: *bar,
            short_ma,
            long_ma,
            relation,
            position: position.status(),
            equity: state.realized_pnl + position.unrealized_pnl(bar.close),
            signal: signal.map(|e| e.action),
        });

        state.tracker.mark_bar();
        state.bar_index += 1;
        state.last_date = Some(bar.date);
        Ok(())
    }

    /// Run a full backtest over `series`. Either the whole run succeeds or no
    /// result is produced.
    pub fn run(&self, series: &PriceSeries) -> Result<BacktestResult, BacktestError> {
        let mut state = self.start()?;
        info!(
            "backtest {}: {} bars, {}/{}",
            series.symbol(),
            series.len(),
            state.short.name(),
            state.long.name()
        );

        for bar in series.bars() {
            self.step(&mut state, bar)?;
        }

        let result = BacktestResult::from_state(series.symbol(), self.config, state);
        info!(
            "backtest {} done: {} signals, {} closed trades, final position {:?}",
            result.symbol,
            result.signal_log.len(),
            result.trades.len(),
            result.final_position.status()
        );
        Ok(result)
    }

    /// Validate raw bars into a series, then run. Integrity errors surface
    /// before any bar is simulated.
    pub fn run_bars(
        &self,
        symbol: &str,
        bars: Vec<PriceBar>,
    ) -> Result<BacktestResult, BacktestError> {
        let series = PriceSeries::new(symbol, bars)?;
        self.run(&series)
    }

}

/// Convenience wrapper: build an engine from `config` and run `series`.
pub fn run_backtest(
    config: EngineConfig,
    series: &PriceSeries,
) -> Result<BacktestResult, BacktestError> {
    BacktestEngine::new(config)?.run(series)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{Position, PositionStatus, SignalAction};
    use crate::signals::Relation;
    use chrono::NaiveDate;

    fn bars_from_closes(closes: &[f64]) -> Vec<PriceBar> {
        let base = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
        closes
            .iter()
            .enumerate()
            .map(|(i, &c)| PriceBar::from_close(base + chrono::Duration::days(i as i64), c))
            .collect()
    }

    fn engine(short: usize, long: usize) -> BacktestEngine {
        BacktestEngine::new(EngineConfig::new(short, long)).unwrap()
    }

    #[test]
    fn rejects_invalid_config() {
        assert!(BacktestEngine::new(EngineConfig::new(3, 2)).is_err());
    }

    #[test]
    fn buy_then_sell_on_small_periods() {
        // 2/3 averages: falling, then rising, then falling.
        let closes = [10.0, 9.0, 8.0, 7.0, 12.0, 14.0, 15.0, 6.0, 5.0, 4.0];
        let result = engine(2, 3).run_bars("TEST", bars_from_closes(&closes)).unwrap();

        let actions: Vec<_> = result.signal_log.iter().map(|e| e.action).collect();
        assert_eq!(actions, vec![SignalAction::Buy, SignalAction::Sell]);
        assert_eq!(result.final_position, Position::Flat);
        assert_eq!(result.trades.len(), 1);
        assert_eq!(result.summary.closed_trades, 1);

        let buy = result.signal_log.events()[0];
        assert_eq!(buy.price, 12.0);
        let sell = result.signal_log.events()[1];
        assert_eq!(sell.price, 6.0);
        assert_eq!(result.trades[0].pnl(), -6.0);
        assert_eq!(result.trades[0].bars_held, 3);
    }

    #[test]
    fn trace_has_one_snapshot_per_bar() {
        let closes = [10.0, 9.0, 8.0, 7.0, 12.0];
        let result = engine(2, 3).run_bars("TEST", bars_from_closes(&closes)).unwrap();
        assert_eq!(result.trace.len(), 5);
        assert_eq!(result.trace[0].short_ma, None);
        assert_eq!(result.trace[1].short_ma, Some(9.5));
        assert_eq!(result.trace[1].long_ma, None);
        assert_eq!(result.trace[2].long_ma, Some(9.0));
        assert_eq!(result.trace[2].relation, Relation::Below);
        assert_eq!(result.trace[4].relation, Relation::Above);
        assert_eq!(result.trace[4].signal, Some(SignalAction::Buy));
        assert_eq!(result.trace[4].position, PositionStatus::Long);
    }

    #[test]
    fn equity_marks_open_unit_to_market() {
        let closes = [10.0, 9.0, 8.0, 7.0, 12.0, 14.0];
        let result = engine(2, 3).run_bars("TEST", bars_from_closes(&closes)).unwrap();
        let equity: Vec<f64> = result.equity_curve().collect();
        assert_eq!(equity, vec![0.0, 0.0, 0.0, 0.0, 0.0, 2.0]);
        assert_eq!(result.summary.unrealized_pnl, 2.0);
        assert_eq!(result.summary.total_pnl(), 2.0);
    }

    #[test]
    fn step_rejects_backwards_date() {
        let engine = engine(2, 3);
        let mut state = engine.start().unwrap();
        let bars = bars_from_closes(&[1.0, 2.0]);
        engine.step(&mut state, &bars[1]).unwrap();
        let err = engine.step(&mut state, &bars[0]).unwrap_err();
        assert!(matches!(
            err,
            BacktestError::DataIntegrity(DataIntegrityError::OutOfOrder { index: 1, .. })
        ));
    }

    #[test]
    fn step_rejects_repeated_date() {
        let engine = engine(2, 3);
        let mut state = engine.start().unwrap();
        let bars = bars_from_closes(&[1.0]);
        engine.step(&mut state, &bars[0]).unwrap();
        assert!(matches!(
            engine.step(&mut state, &bars[0]),
            Err(BacktestError::DataIntegrity(DataIntegrityError::DuplicateDate { .. }))
        ));
    }

    #[test]
    fn run_bars_fails_before_simulating() {
        let mut bars = bars_from_closes(&[1.0, 2.0, 3.0]);
        bars.swap(0, 2);
        let err = engine(2, 3).run_bars("TEST", bars).unwrap_err();
        assert!(matches!(err, BacktestError::DataIntegrity(_)));
    }

    #[test]
    fn run_backtest_wrapper_validates_config() {
        let series = PriceSeries::empty("TEST").unwrap();
        assert!(matches!(
            run_backtest(EngineConfig::new(0, 3), &series),
            Err(BacktestError::Config(ConfigError::ZeroPeriod))
        ));
    }
}
