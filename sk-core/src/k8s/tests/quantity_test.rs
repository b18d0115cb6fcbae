use k8s_openapi::apimachinery::pkg::api::resource::Quantity;

use super::*;

#[rstest]
#[case::plain("1000", 1000)]
#[case::kibi("1Ki", 1024)]
#[case::gibi("2Gi", 2 * 1024 * 1024 * 1024)]
#[case::fractional_mebi("1.5Mi", 1572864)]
#[case::decimal_si("3k", 3000)]
#[case::exponent("12e2", 1200)]
#[case::rounds_up("100m", 1)]
#[case::zero("0", 0)]
#[case::leading_dot(".5k", 500)]
#[case::whitespace(" 64Mi ", 64 * 1024 * 1024)]
#[case::smallest_exponent("1e-2147483648", 1)]
#[case::tiny_with_fraction("0.5e-40", 1)]
fn test_parse_quantity_value(#[case] raw: &str, #[case] expected: i64) {
    assert_eq!(parse_quantity_value(&Quantity(raw.into())).unwrap(), expected);
}

#[rstest]
#[case::millis("250m", 250)]
#[case::cores("2", 2000)]
#[case::fractional_cores("0.5", 500)]
#[case::nanos_round_up("1n", 1)]
#[case::micros("1500u", 2)]
#[case::negative("-1", -1000)]
fn test_parse_quantity_milli_value(#[case] raw: &str, #[case] expected: i64) {
    assert_eq!(parse_quantity_milli_value(&Quantity(raw.into())).unwrap(), expected);
}

#[rstest]
#[case::empty("")]
#[case::units_only("Gi")]
#[case::bad_suffix("10Xi")]
#[case::two_dots("1.2.3")]
fn test_parse_quantity_malformed(#[case] raw: &str) {
    let err = parse_quantity_value(&Quantity(raw.into())).unwrap_err();
    assert!(matches!(err.downcast_ref::<QuantityError>(), Some(QuantityError::Malformed(_))));
}

#[rstest]
#[case::too_many_exbibytes("16Ei")]
#[case::huge_exponent("1e40")]
#[case::largest_exponent("1e2147483647")]
fn test_parse_quantity_overflow(#[case] raw: &str) {
    let err = parse_quantity_value(&Quantity(raw.into())).unwrap_err();
    assert!(matches!(err.downcast_ref::<QuantityError>(), Some(QuantityError::Overflow(_))));

    let err = parse_quantity_milli_value(&Quantity(raw.into())).unwrap_err();
    assert!(matches!(err.downcast_ref::<QuantityError>(), Some(QuantityError::Overflow(_))));
}
