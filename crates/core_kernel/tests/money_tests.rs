//! Comprehensive unit tests for the Money module
//!
//! Tests cover money creation, canonical rounding, arithmetic, pivot
//! conversion through the exchange rate table, parsing, display and the
//! persisted representation.

use std::sync::Arc;

use core_kernel::{Currency, ExchangeRateTable, Money, MoneyContext, MoneyError, Rate, RoundingMode};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

/// Rates as of August 15, 2010, with USD as the system currency
fn ctx() -> MoneyContext {
    let table = ExchangeRateTable::with_rates(
        Currency::USD,
        vec![
            Rate::new(dec!(1.04279), Currency::CAD).unwrap(),
            Rate::new(dec!(0.64218), Currency::GBP).unwrap(),
            Rate::new(dec!(85.8221), Currency::JPY).unwrap(),
        ],
    )
    .unwrap();
    MoneyContext::new(Arc::new(table))
}

fn money(s: &str) -> Money {
    s.parse().unwrap()
}

mod creation {
    use super::*;

    #[test]
    fn test_new_creates_money_with_correct_amount() {
        let m = Money::new(dec!(100.50), Currency::USD);
        assert_eq!(m.amount(), dec!(100.50));
        assert_eq!(m.currency(), Currency::USD);
    }

    #[test]
    fn test_new_rounds_to_currency_decimal_places() {
        let m = Money::new(dec!(100.123456789), Currency::USD);
        assert_eq!(m.amount(), dec!(100.12));
        assert_eq!(m.scale(), 2);
    }

    #[test]
    fn test_jpy_always_has_scale_zero() {
        let m = Money::new(dec!(100.60), Currency::JPY);
        assert_eq!(m.amount(), dec!(101));
        assert_eq!(m.scale(), 0);
    }

    #[test]
    fn test_three_digit_currency() {
        let m = Money::new(dec!(1.23456), Currency::KWD);
        assert_eq!(m.amount(), dec!(1.235));
        assert_eq!(m.scale(), 3);
    }

    #[test]
    fn test_from_minor_converts_cents_correctly() {
        let m = Money::from_minor(10050, Currency::USD);
        assert_eq!(m.amount(), dec!(100.50));
    }

    #[test]
    fn test_from_minor_handles_jpy_no_decimals() {
        let m = Money::from_minor(10000, Currency::JPY);
        assert_eq!(m.amount(), dec!(10000));
    }

    #[test]
    fn test_zero_creates_zero_amount_at_currency_scale() {
        let m = Money::zero(Currency::EUR);
        assert!(m.is_zero());
        assert_eq!(m.scale(), 2);
        assert_eq!(m.currency(), Currency::EUR);
    }

    #[test]
    fn test_with_rounding_honours_mode() {
        assert_eq!(
            Money::with_rounding(dec!(2.345), Currency::USD, RoundingMode::HalfUp).amount(),
            dec!(2.35)
        );
        assert_eq!(
            Money::with_rounding(dec!(2.345), Currency::USD, RoundingMode::HalfEven).amount(),
            dec!(2.34)
        );
        assert_eq!(
            Money::with_rounding(dec!(2.349), Currency::USD, RoundingMode::Down).amount(),
            dec!(2.34)
        );
        assert_eq!(
            Money::with_rounding(dec!(2.341), Currency::USD, RoundingMode::Ceiling).amount(),
            dec!(2.35)
        );
    }
}

mod parsing {
    use super::*;

    #[test]
    fn test_parse_with_symbol_and_code() {
        let m = money("$10.95 USD");
        assert_eq!(m.amount(), dec!(10.95));
        assert_eq!(m.currency(), Currency::USD);
    }

    #[test]
    fn test_parse_without_symbol() {
        let m = money("11.33 GBP");
        assert_eq!(m.amount(), dec!(11.33));
        assert_eq!(m.currency(), Currency::GBP);
    }

    #[test]
    fn test_parse_rounds_to_currency() {
        assert_eq!(money("$29.9555556 CAD").amount(), dec!(29.96));
        assert_eq!(money("31 JPY").scale(), 0);
    }

    #[test]
    fn test_parse_lowercase_code() {
        assert_eq!(money("13.79 cad").currency(), Currency::CAD);
    }

    #[test]
    fn test_parse_amount_with_currency() {
        let m = Money::parse_amount("$29.95", Currency::USD).unwrap();
        assert_eq!(m.amount(), dec!(29.95));
        let m = Money::parse_amount("13.79", Currency::CAD).unwrap();
        assert_eq!(m.amount(), dec!(13.79));
    }

    #[test]
    fn test_parse_negative_amount() {
        assert_eq!(money("-5.00 USD").amount(), dec!(-5.00));
    }

    #[test]
    fn test_parse_errors() {
        assert!(matches!("10.00".parse::<Money>(), Err(MoneyError::Parse(_))));
        assert!(matches!("ten USD".parse::<Money>(), Err(MoneyError::Parse(_))));
        assert!(matches!("10.00 XXX".parse::<Money>(), Err(MoneyError::Parse(_))));
        assert!(matches!("10.00 USD extra".parse::<Money>(), Err(MoneyError::Parse(_))));
        assert!(matches!(
            Money::parse_amount("", Currency::USD),
            Err(MoneyError::Parse(_))
        ));
    }
}

mod persisted {
    use super::*;

    #[test]
    fn test_from_long_value_and_scale() {
        let m = Money::from_persisted(2939, 2, "CAD").unwrap();
        assert_eq!(m.amount(), dec!(29.39));
        assert_eq!(m.currency(), Currency::CAD);
    }

    #[test]
    fn test_long_value() {
        assert_eq!(money("$29.93 CAD").long_value().unwrap(), 2993);
        assert_eq!(money("$29.9555556 CAD").long_value().unwrap(), 2996);
        assert_eq!(money("193 JPY").long_value().unwrap(), 193);
    }

    #[test]
    fn test_scale() {
        assert_eq!(money("$29.96 CAD").scale(), 2);
        assert_eq!(money("$29.9777778 CAD").scale(), 2);
        assert_eq!(money("31 JPY").scale(), 0);
    }

    #[test]
    fn test_from_persisted_keeps_non_canonical_scale() {
        let m = Money::from_persisted(1234567, 5, "USD").unwrap();
        assert_eq!(m.amount(), dec!(12.34567));
        assert_eq!(m.scale(), 5);
    }

    #[test]
    fn test_round_trip() {
        let original = money("$1234.56 USD");
        let persisted = original.to_persisted().unwrap();
        assert_eq!(persisted.long_value, 123456);
        assert_eq!(persisted.scale, 2);
        assert_eq!(persisted.currency_code, "USD");

        let restored = Money::try_from(persisted).unwrap();
        assert_eq!(restored, original);
    }

    #[test]
    fn test_from_persisted_errors() {
        assert!(matches!(
            Money::from_persisted(100, 2, "ZZZ"),
            Err(MoneyError::UnknownCurrency(_))
        ));
        assert!(matches!(
            Money::from_persisted(100, 40, "USD"),
            Err(MoneyError::InvalidAmount(_))
        ));
    }
}

mod conversion {
    use super::*;

    #[test]
    fn test_convert_cad_to_usd() {
        let usd = money("1.00 USD");
        let cad = money("1.00 CAD");

        let converted = usd.convert(&cad, &ctx()).unwrap();
        assert_eq!(converted, money("0.96 USD"));
        assert_eq!(converted.scale(), Currency::USD.decimal_places());
    }

    #[test]
    fn test_convert_usd_to_cad() {
        let usd = money("1.00 USD");
        let cad = money("1.00 CAD");

        let converted = cad.convert(&usd, &ctx()).unwrap();
        assert_eq!(converted, money("1.04 CAD"));
    }

    #[test]
    fn test_convert_gbp_to_jpy_pivots_through_system_currency() {
        let gbp = money("1.00 GBP");
        let jpy = money("100.00 JPY");

        let converted = jpy.convert(&gbp, &ctx()).unwrap();
        assert_eq!(converted, money("134 JPY"));
        assert_eq!(converted.scale(), 0);
    }

    #[test]
    fn test_convert_jpy_to_gbp() {
        let gbp = money("1.00 GBP");
        let jpy = money("100.00 JPY");

        let converted = gbp.convert(&jpy, &ctx()).unwrap();
        assert_eq!(converted, money("0.75 GBP"));
        assert_eq!(converted.scale(), 2);
    }

    #[test]
    fn test_convert_from_system_currency_keeps_cents() {
        let cad = money("0.00 CAD");
        let converted = cad.convert(&money("1.50 USD"), &ctx()).unwrap();
        assert_eq!(converted, money("1.56 CAD"));
    }

    #[test]
    fn test_same_currency_is_returned_unchanged() {
        let recorded = Money::from_persisted(12345, 4, "USD").unwrap();
        let converted = money("0.00 USD").convert(&recorded, &ctx()).unwrap();
        assert_eq!(converted, recorded);
        assert_eq!(converted.scale(), 4);
    }

    #[test]
    fn test_same_currency_needs_no_rates() {
        let empty = MoneyContext::default();
        let converted = money("1.00 EUR").convert(&money("2.00 EUR"), &empty).unwrap();
        assert_eq!(converted, money("2.00 EUR"));
    }

    #[test]
    fn test_missing_rate_never_falls_back() {
        let result = money("1.00 USD").convert(&money("1.00 EUR"), &ctx());
        assert_eq!(result, Err(MoneyError::MissingRate("EUR".to_string())));

        let result = money("1.00 EUR").convert(&money("1.00 USD"), &ctx());
        assert_eq!(result, Err(MoneyError::MissingRate("EUR".to_string())));
    }

    #[test]
    fn test_missing_system_currency() {
        let table = ExchangeRateTable::new();
        table.add_rate(Rate::new(dec!(1.04279), Currency::CAD).unwrap()).unwrap();
        table.add_rate(Rate::new(dec!(0.64218), Currency::GBP).unwrap()).unwrap();
        let ctx = MoneyContext::new(Arc::new(table));

        let result = money("1.00 CAD").convert(&money("1.00 GBP"), &ctx);
        assert!(matches!(result, Err(MoneyError::MissingRate(_))));
    }

    #[test]
    fn test_rate_updates_are_visible_through_context() {
        let ctx = ctx();
        ctx.rates().add_rate(Rate::new(dec!(0.75), Currency::EUR).unwrap()).unwrap();

        let converted = money("0.00 EUR").convert(&money("2.00 USD"), &ctx).unwrap();
        assert_eq!(converted, money("1.50 EUR"));
    }
}

mod arithmetic {
    use super::*;

    #[test]
    fn test_checked_add_same_currency() {
        let a = Money::new(dec!(100.00), Currency::USD);
        let b = Money::new(dec!(50.00), Currency::USD);
        assert_eq!(a.checked_add(&b).unwrap().amount(), dec!(150.00));
    }

    #[test]
    fn test_checked_add_currency_mismatch() {
        let a = Money::new(dec!(100.00), Currency::USD);
        let b = Money::new(dec!(50.00), Currency::EUR);
        assert!(matches!(a.checked_add(&b), Err(MoneyError::CurrencyMismatch(_, _))));
    }

    #[test]
    fn test_checked_sub_can_go_negative() {
        let a = Money::new(dec!(30.00), Currency::USD);
        let b = Money::new(dec!(100.00), Currency::USD);
        assert_eq!(a.checked_sub(&b).unwrap().amount(), dec!(-70.00));
    }

    #[test]
    fn test_add_converts_into_own_currency() {
        let total = money("10.00 USD").add(&money("1.00 CAD"), &ctx()).unwrap();
        assert_eq!(total, money("10.96 USD"));
    }

    #[test]
    fn test_subtract_converts_into_own_currency() {
        let remaining = money("10.00 CAD").subtract(&money("1.00 USD"), &ctx()).unwrap();
        assert_eq!(remaining, money("8.96 CAD"));
    }

    #[test]
    fn test_operands_are_not_mutated() {
        let a = money("10.00 USD");
        let b = money("1.00 CAD");
        let _ = a.add(&b, &ctx()).unwrap();
        assert_eq!(a, money("10.00 USD"));
        assert_eq!(b, money("1.00 CAD"));
    }

    #[test]
    fn test_multiply_by_scalar_rounds() {
        let m = money("10.00 USD");
        assert_eq!(m.multiply(dec!(1.5), &ctx()).unwrap(), money("15.00 USD"));
        assert_eq!(m.multiply(dec!(0.3333), &ctx()).unwrap(), money("3.33 USD"));
    }

    #[test]
    fn test_divide_by_scalar_rounds() {
        let m = money("10.00 USD");
        assert_eq!(m.divide(dec!(3), &ctx()).unwrap(), money("3.33 USD"));
        assert_eq!(money("100 JPY").divide(dec!(8), &ctx()).unwrap(), money("12 JPY"));
    }

    #[test]
    fn test_divide_by_zero_error() {
        let m = money("10.00 USD");
        assert_eq!(m.divide(Decimal::ZERO, &ctx()), Err(MoneyError::DivisionByZero));
        assert_eq!(
            m.divide_money(&money("0.00 CAD"), &ctx()),
            Err(MoneyError::DivisionByZero)
        );
    }

    #[test]
    fn test_multiply_money_treats_operand_as_scalar() {
        // 2.00 CAD converts to 1.92 USD, which is then used as a plain factor
        let product = money("10.00 USD").multiply_money(&money("2.00 CAD"), &ctx()).unwrap();
        assert_eq!(product, money("19.20 USD"));
    }

    #[test]
    fn test_divide_money_treats_operand_as_scalar() {
        let quotient = money("10.00 USD").divide_money(&money("4.00 USD"), &ctx()).unwrap();
        assert_eq!(quotient, money("2.50 USD"));
    }

    #[test]
    fn test_overflow_is_reported() {
        let big = Money::new(Decimal::MAX, Currency::JPY);
        assert_eq!(big.multiply(dec!(2), &ctx()), Err(MoneyError::Overflow));
    }

    #[test]
    fn test_abs_and_negate_keep_currency_and_scale() {
        let m = money("-12.50 GBP");
        assert_eq!(m.abs(), money("12.50 GBP"));
        assert_eq!(m.negate(), money("12.50 GBP"));
        assert_eq!(m.negate().negate(), m);
    }

    #[test]
    fn test_sum_folds_mixed_currencies() {
        let items = vec![money("1.00 USD"), money("1.00 CAD"), money("2.50 USD")];
        let total = Money::sum(&items, Currency::USD, &ctx()).unwrap();
        assert_eq!(total, money("4.46 USD"));
    }

    #[test]
    fn test_sum_of_nothing_is_zero() {
        let total = Money::sum(std::iter::empty(), Currency::JPY, &ctx()).unwrap();
        assert_eq!(total, Money::zero(Currency::JPY));
    }
}

mod predicates {
    use super::*;

    #[test]
    fn test_is_positive_and_negative() {
        assert!(money("0.01 USD").is_positive());
        assert!(!money("0.00 USD").is_positive());
        assert!(money("-0.01 USD").is_negative());
        assert!(!money("0.00 USD").is_negative());
    }
}

mod display {
    use super::*;

    #[test]
    fn test_display_with_symbol() {
        assert_eq!(money("$56.23 USD").to_string(), "$56.23 USD");
        assert_eq!(money("17.00 GBP").to_string(), "£17.00 GBP");
        assert_eq!(money("81 JPY").to_string(), "¥81 JPY");
    }

    #[test]
    fn test_display_drops_letters_from_symbol() {
        assert_eq!(money("5.00 CAD").to_string(), "$5.00 CAD");
        assert_eq!(money("5.00 CHF").to_string(), "5.00 CHF");
    }

    #[test]
    fn test_display_parses_back() {
        let m = money("1234.56 EUR");
        assert_eq!(money(&m.to_string()), m);
    }
}

mod currency {
    use super::*;

    #[test]
    fn test_all_currencies_have_codes_and_symbols() {
        for currency in Currency::ALL {
            assert_eq!(currency.code().len(), 3);
            assert!(!currency.symbol().is_empty());
            assert_eq!(currency.code().parse::<Currency>().unwrap(), currency);
        }
    }

    #[test]
    fn test_currency_decimal_places() {
        assert_eq!(Currency::USD.decimal_places(), 2);
        assert_eq!(Currency::JPY.decimal_places(), 0);
        assert_eq!(Currency::KRW.decimal_places(), 0);
        assert_eq!(Currency::BHD.decimal_places(), 3);
    }

    #[test]
    fn test_unknown_currency() {
        assert_eq!(
            "XYZ".parse::<Currency>(),
            Err(MoneyError::UnknownCurrency("XYZ".to_string()))
        );
    }
}

mod serialization {
    use super::*;

    #[test]
    fn test_money_json_roundtrip_keeps_scale() {
        let m = Money::from_persisted(12345, 4, "USD").unwrap();
        let json = serde_json::to_string(&m).unwrap();
        let deserialized: Money = serde_json::from_str(&json).unwrap();
        assert_eq!(m, deserialized);
        assert_eq!(deserialized.scale(), 4);
    }

    #[test]
    fn test_money_json_uses_persisted_columns() {
        let m = Money::new(dec!(29.39), Currency::CAD);
        assert_eq!(
            serde_json::to_value(m).unwrap(),
            serde_json::json!({"long_value": 2939, "scale": 2, "currency_code": "CAD"})
        );
    }

    #[test]
    fn test_money_json_rejects_bare_amount() {
        let result = serde_json::from_str::<Money>(r#"{"amount":"1.23456","currency":"JPY"}"#);
        assert!(result.is_err());

        let unknown = serde_json::from_str::<Money>(r#"{"long_value":1,"scale":0,"currency_code":"XYZ"}"#);
        assert!(unknown.is_err());
    }

    #[test]
    fn test_currency_json_roundtrip() {
        let json = serde_json::to_string(&Currency::USD).unwrap();
        assert_eq!(json, "\"USD\"");
        let deserialized: Currency = serde_json::from_str(&json).unwrap();
        assert_eq!(deserialized, Currency::USD);
    }
}

mod equality {
    use super::*;

    #[test]
    fn test_money_inequality_different_currencies() {
        assert_ne!(money("100.00 USD"), money("100.00 CAD"));
    }

    #[test]
    fn test_equal_quantity_at_different_scale_is_not_equal() {
        let canonical = money("12.30 USD");
        let recorded = Money::from_persisted(123, 1, "USD").unwrap();
        assert_ne!(canonical, recorded);
    }

    #[test]
    fn test_money_hash_equality() {
        use std::collections::HashSet;

        let mut set = HashSet::new();
        set.insert(money("100.00 USD"));
        assert!(set.contains(&money("100.00 USD")));
        assert!(!set.contains(&Money::from_persisted(1000, 1, "USD").unwrap()));
    }
}
