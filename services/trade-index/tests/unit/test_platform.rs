//! Unit tests for the trading platform
//!
//! Tests cover:
//! - Catalog construction from defaults, explicit lists and config
//! - Record validation order and error messages
//! - Routing isolation between instruments
//! - Query bound validation

use crate::generators::records_for;
use crate::utils::test_timestamp;
use rstest::*;
use services_common::{PlatformConfig, STOCKS};
use trade_index::{PlatformError, TradeIndexError, TradingPlatform, TransactionRecord};

fn record(name: &str, price: f64, quantity: i64) -> TransactionRecord {
    TransactionRecord::new(name, price, quantity, test_timestamp(0))
}

#[fixture]
fn platform() -> TradingPlatform {
    let mut platform = TradingPlatform::new();
    for (price, quantity) in [(10.0, 1), (5.0, 4), (30.0, 1), (2.0, 5)] {
        platform
            .log_transaction(record("HSBA", price, quantity))
            .expect("valid record");
    }
    platform
}

#[cfg(test)]
mod catalog_tests {
    use super::*;

    #[test]
    fn test_default_catalog() {
        let platform = TradingPlatform::new();
        let mut expected: Vec<&str> = STOCKS.to_vec();
        expected.sort_unstable();
        assert_eq!(platform.instruments(), expected);
        for name in STOCKS {
            let index = platform.index(name).expect("index for catalog name");
            assert_eq!(index.stock_name(), name);
        }
    }

    #[test]
    fn test_catalog_from_config() {
        let config = PlatformConfig {
            instruments: vec!["Abrdn".to_string(), "Schroders".to_string()],
            ..PlatformConfig::default()
        };
        let platform = TradingPlatform::from_config(&config);

        assert_eq!(platform.instruments(), vec!["Abrdn", "Schroders"]);
        assert!(platform.index("Barclays").is_none());
    }

    #[test]
    fn test_unlisted_instrument_rejected_everywhere() {
        let platform = TradingPlatform::with_instruments(["3i"]);
        let expected = PlatformError::InvalidStockName("Barclays".to_string());

        assert_eq!(platform.sorted_transactions("Barclays").unwrap_err(), expected);
        assert_eq!(platform.min_transactions("Barclays").unwrap_err(), expected);
        assert_eq!(platform.max_transactions("Barclays").unwrap_err(), expected);
        assert_eq!(platform.floor_transactions("Barclays", 1.0).unwrap_err(), expected);
        assert_eq!(platform.ceiling_transactions("Barclays", 1.0).unwrap_err(), expected);
        assert_eq!(
            platform.range_transactions("Barclays", 1.0, 2.0).unwrap_err(),
            expected
        );
    }
}

#[cfg(test)]
mod validation_tests {
    use super::*;

    #[rstest]
    #[case(record("Vodafone", 1.0, 1), PlatformError::InvalidStockName("Vodafone".to_string()))]
    #[case(record("barclays", 1.0, 1), PlatformError::InvalidStockName("barclays".to_string()))]
    #[case(record("Barclays", 1.0, 0), PlatformError::InvalidQuantity(0))]
    #[case(record("Barclays", 1.0, -3), PlatformError::InvalidQuantity(-3))]
    #[case(record("Barclays", 0.0, 1), PlatformError::InvalidPrice(0.0))]
    #[case(record("Barclays", -2.5, 1), PlatformError::InvalidPrice(-2.5))]
    #[case(record("Barclays", f64::INFINITY, 1), PlatformError::InvalidPrice(f64::INFINITY))]
    fn test_invalid_records(#[case] input: TransactionRecord, #[case] expected: PlatformError) {
        let mut platform = TradingPlatform::new();
        assert_eq!(platform.log_transaction(input).unwrap_err(), expected);
        assert_eq!(platform.total_trades(), 0);
    }

    #[test]
    fn test_nan_price_rejected() {
        let mut platform = TradingPlatform::new();
        let err = platform.log_transaction(record("Barclays", f64::NAN, 1)).unwrap_err();
        assert!(matches!(err, PlatformError::InvalidPrice(p) if p.is_nan()));
    }

    #[test]
    fn test_error_messages() {
        assert_eq!(
            PlatformError::InvalidStockName("X".to_string()).to_string(),
            "Invalid Stock Name: X"
        );
        assert_eq!(PlatformError::InvalidQuantity(0).to_string(), "Invalid Stock Quantity: 0");
        assert_eq!(PlatformError::InvalidPrice(-1.0).to_string(), "Invalid Stock Price: -1");
        assert_eq!(
            PlatformError::InvalidThreshold(-1.5).to_string(),
            "Invalid Transaction Value: -1.5"
        );
        assert_eq!(
            PlatformError::InvalidRange { from: 5.0, to: 1.0 }.to_string(),
            "Invalid Range Bounds: fromValue: 5 toValue: 1"
        );
    }

    #[rstest]
    #[case(-1.0)]
    #[case(-0.0001)]
    #[case(f64::NAN)]
    fn test_bad_thresholds(platform: TradingPlatform, #[case] threshold: f64) {
        assert!(matches!(
            platform.floor_transactions("HSBA", threshold),
            Err(PlatformError::InvalidThreshold(_))
        ));
        assert!(matches!(
            platform.ceiling_transactions("HSBA", threshold),
            Err(PlatformError::InvalidThreshold(_))
        ));
    }

    #[rstest]
    #[case(5.0, 1.0)]
    #[case(-1.0, 1.0)]
    #[case(-5.0, -1.0)]
    #[case(f64::NAN, 1.0)]
    fn test_bad_ranges(platform: TradingPlatform, #[case] from: f64, #[case] to: f64) {
        assert!(matches!(
            platform.range_transactions("HSBA", from, to),
            Err(PlatformError::InvalidRange { .. })
        ));
    }

    #[test]
    fn test_index_error_is_transparent() {
        let err = PlatformError::from(TradeIndexError::InvalidRangeBounds {
            low: 2.0,
            high: 1.0,
        });
        assert_eq!(err.to_string(), "Invalid Range Bounds: low 2 high 1");
    }
}

#[cfg(test)]
mod query_tests {
    use super::*;

    #[rstest]
    fn test_sorted(platform: TradingPlatform) {
        let values: Vec<f64> = platform
            .sorted_transactions("HSBA")
            .unwrap()
            .iter()
            .map(|t| t.value())
            .collect();
        assert_eq!(values, vec![10.0, 10.0, 20.0, 30.0]);
    }

    #[rstest]
    fn test_min_max(platform: TradingPlatform) {
        let min = platform.min_transactions("HSBA").unwrap();
        assert_eq!(min.len(), 2);
        assert_eq!(min[0].price(), 10.0);
        assert_eq!(min[1].price(), 2.0);

        let max = platform.max_transactions("HSBA").unwrap();
        assert_eq!(max.len(), 1);
        assert_eq!(max[0].value(), 30.0);
    }

    #[rstest]
    fn test_floor_ceiling(platform: TradingPlatform) {
        assert_eq!(platform.floor_transactions("HSBA", 25.0).unwrap()[0].value(), 20.0);
        assert_eq!(platform.ceiling_transactions("HSBA", 25.0).unwrap()[0].value(), 30.0);
        assert!(platform.floor_transactions("HSBA", 0.0).unwrap().is_empty());
        assert!(platform.ceiling_transactions("HSBA", 31.0).unwrap().is_empty());
    }

    #[rstest]
    fn test_range(platform: TradingPlatform) {
        let trades = platform.range_transactions("HSBA", 10.0, 20.0).unwrap();
        assert_eq!(trades.len(), 3);
        assert!(platform.range_transactions("HSBA", 40.0, 40.0).unwrap().is_empty());
    }

    #[rstest]
    fn test_other_instruments_untouched(platform: TradingPlatform) {
        assert_eq!(platform.total_trades(), 4);
        for name in STOCKS.iter().filter(|n| **n != "HSBA") {
            assert!(platform.sorted_transactions(name).unwrap().is_empty());
            assert!(platform.min_transactions(name).unwrap().is_empty());
        }
    }

    #[test]
    fn test_routing_across_instruments() {
        let names = ["Barclays", "3i", "Abrdn"];
        let mut platform = TradingPlatform::new();
        for r in records_for(&names, 5) {
            platform.log_transaction(r).unwrap();
        }

        assert_eq!(platform.total_trades(), 15);
        for name in names {
            let index = platform.index(name).unwrap();
            assert_eq!(index.len(), 5);
            assert!(index.all_trades().iter().all(|t| t.stock_name() == name));
            assert!(index.check_invariants().is_ok());
        }
    }
}
