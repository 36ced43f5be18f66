//! Two-place decimal arithmetic shared by the model and the codecs.

use std::str::FromStr;

use rust_decimal::{Decimal, RoundingStrategy};

use crate::core::FlooringError;

pub const SCALE: u32 = 2;

/// Rounds half-up (ties away from zero) and pins the scale to exactly two
/// places, so `871.5` becomes `871.50`.
pub fn round2(value: Decimal) -> Decimal {
    let mut rounded = value.round_dp_with_strategy(SCALE, RoundingStrategy::MidpointAwayFromZero);
    rounded.rescale(SCALE);
    rounded
}

pub fn parse_decimal(raw: &str) -> Result<Decimal, FlooringError> {
    let value = Decimal::from_str(raw.trim()).map_err(|e| {
        FlooringError::MalformedData(format!("cannot parse '{}' as a number: {}", raw, e))
    })?;
    Ok(round2(value))
}

pub fn format2(value: Decimal) -> String {
    round2(value).to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_round_half_up() {
        assert_eq!(round2(dec!(476.2125)).to_string(), "476.21");
        assert_eq!(round2(dec!(0.005)).to_string(), "0.01");
        assert_eq!(round2(dec!(2.675)).to_string(), "2.68");
        assert_eq!(round2(dec!(-1.005)).to_string(), "-1.01");
    }

    #[test]
    fn test_round_pads_scale() {
        assert_eq!(round2(dec!(871.5)).to_string(), "871.50");
        assert_eq!(round2(dec!(100)).to_string(), "100.00");
    }

    #[test]
    fn test_parse_decimal() {
        assert_eq!(parse_decimal("249").unwrap().to_string(), "249.00");
        assert_eq!(parse_decimal(" 4.155 ").unwrap().to_string(), "4.16");
        assert!(matches!(
            parse_decimal("abc"),
            Err(FlooringError::MalformedData(_))
        ));
    }
}
