//! Token amount conversions
//!
//! On-chain quantities are integers in base units (human amount scaled by
//! 10^decimals). Scaling is exact checked integer arithmetic: a whole-token
//! amount either converts without loss or the conversion is an error.

use crate::errors::PublishError;

/// Highest decimal precision the flow accepts. SPL mints allow more, but
/// above 9 the u64 scale factor starts eating into the representable
/// supply range and the exactness guarantee gets murky.
pub const MAX_DECIMALS: u8 = 9;

/// Convert a whole-token amount to base units (amount * 10^decimals).
pub fn to_base_units(amount: u64, decimals: u8) -> Result<u64, PublishError> {
    if decimals > MAX_DECIMALS {
        return Err(PublishError::InvalidAmount {
            amount,
            decimals,
            reason: format!("decimals above supported maximum of {}", MAX_DECIMALS),
        });
    }

    let scale = 10u64.pow(decimals as u32);

    amount
        .checked_mul(scale)
        .ok_or_else(|| PublishError::InvalidAmount {
            amount,
            decimals,
            reason: "amount overflows u64 in base units".to_string(),
        })
}

/// Render base units as a human-readable token amount, for logs only.
pub fn format_units(base_units: u64, decimals: u8) -> String {
    if decimals == 0 {
        return base_units.to_string();
    }

    let scale = 10u64.pow(decimals.min(MAX_DECIMALS) as u32);
    let whole = base_units / scale;
    let frac = base_units % scale;

    if frac == 0 {
        whole.to_string()
    } else {
        let frac_str = format!("{:0width$}", frac, width = decimals as usize);
        format!("{}.{}", whole, frac_str.trim_end_matches('0'))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_exact_scaling() {
        assert_eq!(to_base_units(100, 2).unwrap(), 10_000);
        assert_eq!(to_base_units(50, 2).unwrap(), 5_000);
        assert_eq!(to_base_units(1, 9).unwrap(), 1_000_000_000);
        assert_eq!(to_base_units(0, 9).unwrap(), 0);
        assert_eq!(to_base_units(7, 0).unwrap(), 7);
    }

    #[test]
    fn test_scaling_is_exact_for_all_supported_decimals() {
        // base units / scale must reproduce the human amount with no loss
        for decimals in 0..=MAX_DECIMALS {
            let scale = 10u64.pow(decimals as u32);
            for amount in [0u64, 1, 99, 12_345] {
                let base = to_base_units(amount, decimals).unwrap();
                assert_eq!(base, amount * scale);
                assert_eq!(base / scale, amount);
                assert_eq!(base % scale, 0);
            }
        }
    }

    #[test]
    fn test_rejects_unsupported_decimals() {
        let err = to_base_units(100, MAX_DECIMALS + 1).unwrap_err();
        assert!(matches!(err, PublishError::InvalidAmount { decimals: 10, .. }));
    }

    #[test]
    fn test_rejects_overflow() {
        assert!(to_base_units(u64::MAX, 1).is_err());
        assert!(to_base_units(u64::MAX / 10 + 1, 1).is_err());
        // Right at the edge still works
        assert!(to_base_units(u64::MAX / 10, 1).is_ok());
    }

    #[test]
    fn test_format_units() {
        assert_eq!(format_units(10_000, 2), "100");
        assert_eq!(format_units(10_050, 2), "100.5");
        assert_eq!(format_units(10_055, 2), "100.55");
        assert_eq!(format_units(5, 2), "0.05");
        assert_eq!(format_units(42, 0), "42");
    }
}
