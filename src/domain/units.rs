use crate::error::{Result, SwapperError};
use alloy_primitives::U256;
use rust_decimal::Decimal;

/// Decimal precision of the native currency.
pub const NATIVE_DECIMALS: u8 = 18;

/// Returns `10^exp`, failing if it does not fit in 256 bits.
pub fn pow10(exp: u8) -> Result<U256> {
    U256::from(10u64)
        .checked_pow(U256::from(exp))
        .ok_or(SwapperError::Overflow)
}

/// Computes how many base units of a token with `decimals` are released for `paid`
/// native base units at `rate` whole tokens per whole native unit.
///
/// The product is formed in full before the single floor division, so tokens with
/// fewer decimals than the native currency lose nothing beyond the final rounding.
pub fn exchange_amount(rate: U256, decimals: u8, paid: U256) -> Result<U256> {
    let scaled = rate
        .checked_mul(pow10(decimals)?)
        .and_then(|value| value.checked_mul(paid))
        .ok_or(SwapperError::Overflow)?;
    Ok(scaled / pow10(NATIVE_DECIMALS)?)
}

/// Converts a human-readable amount (e.g. `1.5`) into base units.
pub fn parse_units(amount: Decimal, decimals: u8) -> Result<U256> {
    if amount.is_sign_negative() && !amount.is_zero() {
        return Err(SwapperError::ValidationError(
            "Amount must not be negative".to_string(),
        ));
    }

    let amount = amount.normalize();
    let scale = amount.scale();
    if scale > u32::from(decimals) {
        return Err(SwapperError::ValidationError(format!(
            "Amount {amount} has more than {decimals} decimal places"
        )));
    }

    let mantissa = U256::from(amount.mantissa().unsigned_abs());
    // scale <= decimals <= u8::MAX here
    let shift = pow10(decimals - scale as u8)?;
    mantissa.checked_mul(shift).ok_or(SwapperError::Overflow)
}

/// Renders base units as a decimal string with trailing zeros trimmed.
pub fn format_units(value: U256, decimals: u8) -> String {
    let digits = value.to_string();
    let decimals = usize::from(decimals);
    if decimals == 0 {
        return digits;
    }

    let padded = format!("{digits:0>width$}", width = decimals + 1);
    let (whole, fraction) = padded.split_at(padded.len() - decimals);
    let fraction = fraction.trim_end_matches('0');
    if fraction.is_empty() {
        whole.to_string()
    } else {
        format!("{whole}.{fraction}")
    }
}
