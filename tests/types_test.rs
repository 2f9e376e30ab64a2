//! Unit tests for types module

use quadstoch::types::*;
use serde_json;

#[test]
fn test_timeframe_from_str() {
    assert_eq!(Timeframe::from_str("15m"), Some(Timeframe::FifteenMinutes));
    assert_eq!(Timeframe::from_str("1h"), Some(Timeframe::OneHour));
    assert_eq!(Timeframe::from_str("4h"), Some(Timeframe::FourHours));
    assert_eq!(Timeframe::from_str("1d"), None);
}

#[test]
fn test_timeframe_seconds() {
    assert_eq!(Timeframe::FifteenMinutes.seconds(), 900);
    assert_eq!(Timeframe::OneHour.seconds(), 3600);
    assert_eq!(Timeframe::FourHours.seconds(), 14400);
}

#[test]
fn test_timeframe_display_bars() {
    assert_eq!(Timeframe::FifteenMinutes.display_bars(), 96);
    assert_eq!(Timeframe::OneHour.display_bars(), 144);
    assert_eq!(Timeframe::FourHours.display_bars(), 180);
}

#[test]
fn test_timeframe_serialization() {
    let json = serde_json::to_string(&Timeframe::FourHours).unwrap();
    assert_eq!(json, "\"4h\"");

    let parsed: Timeframe = serde_json::from_str("\"15m\"").unwrap();
    assert_eq!(parsed, Timeframe::FifteenMinutes);
    assert_eq!(format!("{}", Timeframe::OneHour), "1h");
}

#[test]
fn test_bar_validity() {
    assert!(Bar::new(0, 1.0, 2.0, 0.5, 1.5, 10.0).is_valid());
    assert!(!Bar::new(0, 1.0, 2.0, 0.5, 0.0, 10.0).is_valid());
    assert!(!Bar::new(0, 1.0, f64::INFINITY, 0.5, 1.5, 10.0).is_valid());
    assert!(!Bar::new(0, 1.0, 2.0, 0.5, 1.5, -1.0).is_valid());
}

#[test]
fn test_bar_deserialize_without_volume() {
    let bar: Bar =
        serde_json::from_str(r#"{"time":1700000000000,"open":1,"high":2,"low":0.5,"close":1.5}"#)
            .unwrap();
    assert_eq!(bar.volume, 0.0);
    assert_eq!(bar.datetime().unwrap().timestamp(), 1_700_000_000);
}

#[test]
fn test_signal_type_serialization() {
    assert_eq!(serde_json::to_string(&SignalType::Long).unwrap(), "\"LONG\"");
    assert_eq!(serde_json::to_string(&SignalType::None).unwrap(), "\"NONE\"");
    assert_eq!(SignalType::default(), SignalType::None);
    assert_eq!(SignalType::from(DivergenceDirection::Bearish), SignalType::Short);
}

#[test]
fn test_strategy_labels() {
    assert_eq!(Strategy::ReversalDivergence.label(), "reversal-divergence");
    assert_eq!(Strategy::TrendContinuation.label(), "trend-continuation");
    assert_eq!(
        serde_json::to_string(&Strategy::TrendContinuation).unwrap(),
        "\"trend-continuation\""
    );
}

#[test]
fn test_no_signal_shape() {
    let signal = Signal::none(101.5);
    assert!(!signal.is_active());
    assert_eq!(signal.strategy_label(), "");
    assert!(signal.reward_risk().is_none());

    let json = serde_json::to_value(&signal).unwrap();
    assert_eq!(json["type"], "NONE");
    assert_eq!(json["entry"], 101.5);
    assert!(json.get("stopLoss").is_none());
    assert!(json.get("strategy").is_none());
}

#[test]
fn test_signal_reward_risk() {
    let signal = Signal {
        signal_type: SignalType::Short,
        strategy: Some(Strategy::ReversalDivergence),
        reason: "test".to_string(),
        entry: 100.0,
        stop_loss: Some(102.0),
        take_profit: Some(94.0),
        annotation: None,
    };
    assert_eq!(signal.reward_risk(), Some(3.0));
}

#[test]
fn test_divergence_line() {
    let older = Pivot {
        index: 3,
        time: 3000,
        value: 50.0,
        kind: PivotKind::Low,
    };
    let newer = Pivot {
        index: 20,
        time: 20000,
        value: 48.0,
        kind: PivotKind::Low,
    };
    let event = DivergenceEvent {
        direction: DivergenceDirection::Bullish,
        class: DivergenceClass::Regular,
        price_leg: (older, newer),
        oscillator_leg: (12.0, 18.0),
    };

    let line = event.line();
    assert_eq!(line.from, ChartPoint { time: 3000, price: 50.0 });
    assert_eq!(line.to, ChartPoint { time: 20000, price: 48.0 });
    assert_eq!(PivotKind::Low.opposite(), PivotKind::High);
}
