use alloy_primitives::U256;

use crate::error::EvmError;

/// Decimal places of the native currency (1 ETH = 10^18 wei).
pub const ETH_DECIMALS: usize = 18;

/// 10^18 wei, one whole ether unit.
fn wei_per_ether() -> U256 {
    U256::from(1_000_000_000_000_000_000u64)
}

/// Parses a decimal ether amount into wei.
///
/// Accepts plain decimal strings ("2.5", "0.001", ".5") with at most 18
/// fractional digits. Signs, exponents, and non-numeric input are rejected.
/// Zero parses successfully; callers that need positivity check it
/// themselves.
pub fn parse_ether(amount: &str) -> Result<U256, EvmError> {
    let amount = amount.trim();
    if amount.is_empty() {
        return Err(EvmError::InvalidAmount("empty amount".into()));
    }

    let (int_part, frac_part) = match amount.split_once('.') {
        Some((int, frac)) => (int, frac),
        None => (amount, ""),
    };

    if int_part.is_empty() && frac_part.is_empty() {
        return Err(EvmError::InvalidAmount("no digits".into()));
    }
    if !int_part.chars().all(|c| c.is_ascii_digit())
        || !frac_part.chars().all(|c| c.is_ascii_digit())
    {
        return Err(EvmError::InvalidAmount(format!(
            "not a decimal number: {amount}"
        )));
    }
    if frac_part.len() > ETH_DECIMALS {
        return Err(EvmError::InvalidAmount(format!(
            "more than {ETH_DECIMALS} fractional digits: {amount}"
        )));
    }

    let whole = if int_part.is_empty() {
        U256::ZERO
    } else {
        U256::from_str_radix(int_part, 10)
            .map_err(|_| EvmError::InvalidAmount(format!("integer part out of range: {amount}")))?
    };

    // Right-pad the fractional digits to a full 18 places so "5" means 0.5
    // ether, not 5 wei.
    let frac = if frac_part.is_empty() {
        U256::ZERO
    } else {
        let padded = format!("{frac_part:0<width$}", width = ETH_DECIMALS);
        U256::from_str_radix(&padded, 10)
            .map_err(|_| EvmError::InvalidAmount(format!("bad fractional part: {amount}")))?
    };

    whole
        .checked_mul(wei_per_ether())
        .and_then(|wei| wei.checked_add(frac))
        .ok_or_else(|| EvmError::InvalidAmount(format!("amount exceeds uint256: {amount}")))
}

/// Formats a wei value as a decimal ether string.
///
/// The exact inverse of [`parse_ether`] on its canonical output: trailing
/// fractional zeros are trimmed and the integer part always has at least
/// one digit, so `parse_ether(&format_ether(w)) == w` for every `w`.
pub fn format_ether(wei: U256) -> String {
    let base = wei_per_ether();
    let whole = wei / base;
    let frac = wei % base;

    if frac.is_zero() {
        return whole.to_string();
    }

    let digits = format!("{:0>width$}", frac.to_string(), width = ETH_DECIMALS);
    let trimmed = digits.trim_end_matches('0');
    format!("{whole}.{trimmed}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_whole_ether() {
        assert_eq!(parse_ether("1").unwrap(), wei_per_ether());
        assert_eq!(parse_ether("42").unwrap(), U256::from(42u64) * wei_per_ether());
    }

    #[test]
    fn parse_fractional_ether() {
        assert_eq!(
            parse_ether("2.5").unwrap(),
            U256::from(2_500_000_000_000_000_000u64)
        );
        assert_eq!(parse_ether("0.000000000000000001").unwrap(), U256::from(1u64));
    }

    #[test]
    fn parse_leading_dot() {
        assert_eq!(
            parse_ether(".5").unwrap(),
            U256::from(500_000_000_000_000_000u64)
        );
    }

    #[test]
    fn parse_zero() {
        assert_eq!(parse_ether("0").unwrap(), U256::ZERO);
        assert_eq!(parse_ether("0.0").unwrap(), U256::ZERO);
    }

    #[test]
    fn parse_surrounding_whitespace() {
        assert_eq!(parse_ether(" 1.5 ").unwrap(), parse_ether("1.5").unwrap());
    }

    #[test]
    fn reject_non_numeric() {
        for bad in ["abc", "", ".", "1.2.3", "1e5", "0x10", "1,5", "NaN"] {
            assert!(parse_ether(bad).is_err(), "should reject {bad:?}");
        }
    }

    #[test]
    fn reject_signed_input() {
        assert!(parse_ether("-1").is_err());
        assert!(parse_ether("+1").is_err());
        assert!(parse_ether("-0.5").is_err());
    }

    #[test]
    fn reject_too_many_fractional_digits() {
        // 19 digits: below the wei resolution.
        assert!(parse_ether("0.0000000000000000001").is_err());
    }

    #[test]
    fn format_whole_values() {
        assert_eq!(format_ether(U256::ZERO), "0");
        assert_eq!(format_ether(wei_per_ether()), "1");
    }

    #[test]
    fn format_two_and_a_half_ether() {
        let wei = U256::from(2_500_000_000_000_000_000u64);
        assert_eq!(format_ether(wei), "2.5");
    }

    #[test]
    fn format_one_wei() {
        assert_eq!(format_ether(U256::from(1u64)), "0.000000000000000001");
    }

    #[test]
    fn round_trip_is_exact() {
        for amount in [
            "1",
            "2.5",
            "0.1",
            "0.000000000000000001",
            "123456789.987654321",
            "999999999999.999999999999999999",
        ] {
            let wei = parse_ether(amount).unwrap();
            assert_eq!(format_ether(wei), *amount, "round trip for {amount}");
        }
    }

    #[test]
    fn round_trip_from_wei_side() {
        for wei in [
            U256::from(1u64),
            U256::from(10u64),
            U256::from(1_000_000_000u64),
            U256::from(2_500_000_000_000_000_000u64),
            U256::from(u64::MAX),
        ] {
            assert_eq!(parse_ether(&format_ether(wei)).unwrap(), wei);
        }
    }
}
