//! Base-unit arithmetic.
//!
//! Balances and drops are carried as `u64` base units. Human-facing amounts
//! are whole units scaled by `10^decimals`; the native currency uses 9
//! decimals (lamports).

use crate::TypesError;

/// Decimals of the native currency.
pub const SOL_DECIMALS: u8 = 9;

/// Base units in one whole unit of the native currency.
pub const LAMPORTS_PER_SOL: u64 = 1_000_000_000;

/// Convert whole token units to base units: `amount * 10^decimals`.
pub fn to_base_units(amount: u64, decimals: u8) -> Result<u64, TypesError> {
    10u64
        .checked_pow(u32::from(decimals))
        .and_then(|scale| amount.checked_mul(scale))
        .ok_or(TypesError::AmountOverflow { amount, decimals })
}

/// Convert a fractional native-currency amount to lamports.
///
/// Rejects negative, NaN and infinite inputs. Fractions below one lamport
/// are rounded to the nearest lamport.
pub fn lamports_from_sol(sol: f64) -> Result<u64, TypesError> {
    if !sol.is_finite() || sol < 0.0 {
        return Err(TypesError::InvalidAmount(sol.to_string()));
    }
    let lamports = (sol * LAMPORTS_PER_SOL as f64).round();
    // u64::MAX as f64 rounds up to 2^64, which does not fit.
    if lamports >= u64::MAX as f64 {
        return Err(TypesError::InvalidAmount(sol.to_string()));
    }
    Ok(lamports as u64)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn nine_decimals() {
        assert_eq!(to_base_units(5, 9).unwrap(), 5_000_000_000);
        assert_eq!(to_base_units(2, 9).unwrap(), 2_000_000_000);
    }

    #[test]
    fn zero_decimals_is_identity() {
        assert_eq!(to_base_units(42, 0).unwrap(), 42);
    }

    #[test]
    fn overflow_is_reported() {
        assert_eq!(
            to_base_units(u64::MAX, 1),
            Err(TypesError::AmountOverflow {
                amount: u64::MAX,
                decimals: 1
            })
        );
        // 10^20 does not fit in u64 at all.
        assert!(to_base_units(1, 20).is_err());
        assert!(to_base_units(0, 255).is_err());
    }

    #[test]
    fn sol_conversion() {
        assert_eq!(lamports_from_sol(1.0).unwrap(), LAMPORTS_PER_SOL);
        assert_eq!(lamports_from_sol(0.5).unwrap(), 500_000_000);
        assert_eq!(lamports_from_sol(0.0).unwrap(), 0);
    }

    #[test]
    fn sol_conversion_rejects_bad_input() {
        assert!(lamports_from_sol(-1.0).is_err());
        assert!(lamports_from_sol(f64::NAN).is_err());
        assert!(lamports_from_sol(f64::INFINITY).is_err());
    }

    #[test]
    fn sol_conversion_rejects_two_pow_64_lamports() {
        let sol = 2f64.powi(64) / LAMPORTS_PER_SOL as f64;
        assert!(lamports_from_sol(sol).is_err());
        assert!(lamports_from_sol(f64::MAX).is_err());
    }
}
