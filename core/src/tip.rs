/// Tip intents and contract-call argument preparation.
use serde::Serialize;

use crate::clarity::ClarityValue;
use crate::display::parse_stx_amount;
use crate::error::{Result, TipError};

/// What the user asked to send: captured when the confirmation dialog opens,
/// discarded once the submission resolves.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TipIntent {
    pub recipient: String,
    /// Decimal STX amount exactly as entered.
    pub amount: String,
}

impl TipIntent {
    pub fn new(recipient: impl Into<String>, amount: impl Into<String>) -> Self {
        Self {
            recipient: recipient.into(),
            amount: amount.into(),
        }
    }
}

/// Arguments for the contract's `tip` function plus the parsed amount.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PreparedTip {
    /// `(recipient, amount, token-type)` in the contract's parameter order.
    pub args: [ClarityValue; 3],
    pub micro_stx: u64,
}

impl PreparedTip {
    /// Hex-encoded arguments, in order, as wallet providers accept them.
    pub fn args_hex(&self) -> Vec<String> {
        self.args.iter().map(ClarityValue::to_hex).collect()
    }
}

/// Convert a recipient and decimal STX amount into `tip` arguments.
///
/// The amount must parse as a positive decimal; it is never coerced to zero.
pub fn prepare_tip_args(recipient: &str, amount: &str, token_type: &str) -> Result<PreparedTip> {
    let micro_stx = parse_stx_amount(amount)
        .map_err(|e| TipError::InvalidAmount(format!("Invalid amount '{}': {e}", amount.trim())))?;
    if micro_stx == 0 {
        return Err(TipError::InvalidAmount(
            "Tip amount must be greater than zero.".into(),
        ));
    }

    let args = [
        ClarityValue::string_ascii(recipient)?,
        ClarityValue::uint(micro_stx),
        ClarityValue::string_ascii(token_type)?,
    ];

    Ok(PreparedTip { args, micro_stx })
}

#[cfg(test)]
mod tests {
    use super::*;

    const RECIPIENT: &str = "ST123456789012345678901234567890123456";

    #[test]
    fn prepares_args_in_contract_order() {
        let prepared = prepare_tip_args(RECIPIENT, "10.5", "STX").unwrap();
        assert_eq!(prepared.micro_stx, 10_500_000);
        assert_eq!(
            prepared.args,
            [
                ClarityValue::StringAscii(RECIPIENT.into()),
                ClarityValue::Uint(10_500_000),
                ClarityValue::StringAscii("STX".into()),
            ]
        );
    }

    #[test]
    fn args_hex_keeps_order() {
        let prepared = prepare_tip_args(RECIPIENT, "1", "STX").unwrap();
        let hex = prepared.args_hex();
        assert_eq!(hex.len(), 3);
        assert!(hex[0].starts_with("0x0d"));
        assert!(hex[1].starts_with("0x01"));
        assert_eq!(hex[2], "0x0d00000003535458");
    }

    #[test]
    fn rejects_non_numeric_amount() {
        let err = prepare_tip_args(RECIPIENT, "ten", "STX").unwrap_err();
        assert!(matches!(err, TipError::InvalidAmount(_)));
    }

    #[test]
    fn rejects_negative_amount() {
        assert!(matches!(
            prepare_tip_args(RECIPIENT, "-1", "STX"),
            Err(TipError::InvalidAmount(_))
        ));
    }

    #[test]
    fn rejects_zero_amount() {
        let err = prepare_tip_args(RECIPIENT, "0.0000001", "STX").unwrap_err();
        assert!(err.to_string().contains("greater than zero"));
    }

    #[test]
    fn micro_units_follow_decimal_string() {
        for (amount, micro) in [("0.5", 500_000u64), ("2", 2_000_000), ("0.000001", 1)] {
            assert_eq!(prepare_tip_args(RECIPIENT, amount, "STX").unwrap().micro_stx, micro);
        }
    }
}
