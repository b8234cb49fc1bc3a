//! Account address parsing for the outer layers (HTTP, CLI, config).
//!
//! An address is `0x` followed by 40 hex digits. Input is accepted in any
//! case and normalised to lowercase so that one account maps to one key.

use crate::error::{Result, TodoError};
use crate::ledger::Account;

const ADDRESS_HEX_LEN: usize = 40;

/// Parse and normalise an account address.
pub fn parse_address(input: &str) -> Result<Account> {
    let trimmed = input.trim();
    let digits = trimmed
        .strip_prefix("0x")
        .or_else(|| trimmed.strip_prefix("0X"))
        .ok_or_else(|| invalid(input))?;

    if digits.len() != ADDRESS_HEX_LEN || hex::decode(digits).is_err() {
        return Err(invalid(input));
    }
    Ok(Account::new(format!("0x{}", digits.to_ascii_lowercase())))
}

fn invalid(input: &str) -> TodoError {
    TodoError::invalid_input(format!("Invalid account address: {}", input))
}

/// Shorten an address for display: `0x1234...abcd`
pub fn short_address(account: &Account) -> String {
    let s = account.as_str();
    if s.len() <= 10 || !s.is_ascii() {
        return s.to_string();
    }
    format!("{}...{}", &s[..6], &s[s.len() - 4..])
}
