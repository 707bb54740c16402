/// Output formatting: STX denomination conversion and display helpers.
///
/// STX uses 6 decimal places (micro-STX). 1 STX = 1_000_000 micro-STX.
use crate::backend::VerifiedUser;
use crate::flow::TipForm;
use crate::recipient::shorten_address;
use crate::submitter::TransactionOutcome;

pub const MICRO_PER_STX: u64 = 1_000_000;

/// Convert micro-STX to a human-readable STX string.
/// Examples: 10_500_000 -> "10.500000", 0 -> "0.000000"
#[must_use]
pub fn micro_to_stx(micro: u64) -> String {
    let whole = micro / MICRO_PER_STX;
    let frac = micro % MICRO_PER_STX;
    format!("{whole}.{frac:06}")
}

/// Format an amount for display.
#[must_use]
pub fn format_stx(micro: u64) -> String {
    format!("{} STX", micro_to_stx(micro))
}

/// Parse a human-readable STX amount string into micro-STX.
/// Accepts: "10.5" -> 10_500_000, "1" -> 1_000_000, ".25" -> 250_000.
/// Digits past the sixth decimal round like `round(amount * 1e6)` in f64.
#[must_use = "parsing result should be checked"]
pub fn parse_stx_amount(input: &str) -> Result<u64, String> {
    let input = input.trim();

    if input.is_empty() {
        return Err("Amount cannot be empty".to_string());
    }

    if input.starts_with('-') {
        return Err("Amount must be positive".to_string());
    }

    let input = input.strip_prefix('+').unwrap_or(input);

    let parts: Vec<&str> = input.split('.').collect();
    if parts.len() > 2 {
        return Err("Invalid amount format. Use STX units like '10.5' or '0.001'.".to_string());
    }

    let whole_str = parts[0];
    let frac_str = parts.get(1).copied().unwrap_or("");
    if whole_str.is_empty() && frac_str.is_empty() {
        return Err(format!("Invalid amount '{input}'"));
    }
    if !whole_str.chars().all(|c| c.is_ascii_digit()) {
        return Err(format!("Invalid whole part: '{whole_str}'"));
    }
    if !frac_str.chars().all(|c| c.is_ascii_digit()) {
        return Err(format!("Invalid fractional part: '{frac_str}'"));
    }

    // The digits are validated above; the conversion itself goes through f64
    // so the result is round(amount * 1e6) exactly as a float would give it.
    let value: f64 = input
        .parse()
        .map_err(|_| format!("Invalid amount '{input}'"))?;
    let micro = (value * MICRO_PER_STX as f64).round();
    if !micro.is_finite() || micro >= u64::MAX as f64 {
        return Err("Amount too large".to_string());
    }
    Ok(micro as u64)
}

/// Format the flow's form state for display.
#[must_use]
pub fn format_form(form: &TipForm) -> String {
    let mut lines = Vec::new();
    let recipient = if form.recipient.is_empty() {
        "-".to_string()
    } else {
        form.recipient.clone()
    };
    lines.push(format!("  Recipient: {recipient}"));
    let amount = if form.amount.is_empty() {
        "-".to_string()
    } else {
        match parse_stx_amount(&form.amount) {
            Ok(micro) => format_stx(micro),
            Err(_) => format!("{} (invalid)", form.amount),
        }
    };
    lines.push(format!("  Amount:    {amount}"));
    if form.searching {
        lines.push("  Registry:  searching...".to_string());
    } else if let Some(lookup) = &form.lookup {
        lines.push(format!("  Registry:  {}", format_lookup_status(lookup)));
    }
    if let Some(err) = &form.validation_error {
        lines.push(format!("  Notice:    {err}"));
    }
    lines.join("\n")
}

/// Format the form state as JSON.
#[must_use]
pub fn format_form_json(form: &TipForm) -> String {
    let mut value = serde_json::to_value(form).unwrap_or_default();
    if let Some(obj) = value.as_object_mut() {
        if let Ok(micro) = parse_stx_amount(&form.amount) {
            obj.insert("amount_micro_stx".into(), micro.into());
        }
    }
    value.to_string()
}

/// One-line registry status: verified email, or why the address is unverified.
#[must_use]
pub fn format_lookup_status(lookup: &crate::backend::RegistryLookupResult) -> String {
    match (&lookup.email, &lookup.error) {
        (Some(email), _) if lookup.found => format!("verified user ({email})"),
        (_, Some(err)) => format!("unverified ({err})"),
        _ => "unverified".to_string(),
    }
}

/// Format a submission outcome for display.
#[must_use]
pub fn format_outcome(outcome: &TransactionOutcome, micro: Option<u64>, recipient: &str) -> String {
    match outcome {
        TransactionOutcome::Success { transaction_id } => {
            let mut lines = vec![
                "Tip sent!".to_string(),
                format!("  Transaction: {transaction_id}"),
            ];
            if let Some(m) = micro {
                lines.push(format!(
                    "  Amount:      {} -> {}",
                    format_stx(m),
                    shorten_address(recipient)
                ));
            }
            lines.join("\n")
        }
        TransactionOutcome::Cancelled => "Transaction cancelled.".to_string(),
        TransactionOutcome::Failed { reason } => format!("Tip failed: {reason}"),
    }
}

/// Format an outcome as JSON.
#[must_use]
pub fn format_outcome_json(outcome: &TransactionOutcome, micro: Option<u64>, recipient: &str) -> String {
    let mut value = serde_json::to_value(outcome).unwrap_or_default();
    if let Some(obj) = value.as_object_mut() {
        obj.insert("recipient".into(), recipient.into());
        if let Some(m) = micro {
            obj.insert("amount_micro_stx".into(), m.into());
            obj.insert("amount_stx".into(), micro_to_stx(m).into());
        }
    }
    value.to_string()
}

/// Format the verified-user directory.
#[must_use]
pub fn format_verified_users(users: &[VerifiedUser]) -> String {
    if users.is_empty() {
        return "No verified users found.".to_string();
    }
    users
        .iter()
        .map(|u| format!("  {}  {}", u.wallet, u.email))
        .collect::<Vec<_>>()
        .join("\n")
}

/// Format address as JSON.
#[must_use]
pub fn format_address_json(address: Option<&str>) -> String {
    serde_json::json!({
        "address": address,
        "connected": address.is_some(),
    })
    .to_string()
}
