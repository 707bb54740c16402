use std::fmt;
use std::ops::RangeInclusive;

use crate::config::Network;
use crate::error::{Result, TipError};

/// Crockford-style c32 alphabet used by Stacks addresses.
const C32_ALPHABET: &str = "0123456789ABCDEFGHJKMNPQRSTVWXYZ";

/// Accepted total address length, prefix included.
pub const ADDRESS_LENGTH: RangeInclusive<usize> = 38..=41;

/// True iff `input` is a well-formed address for `network`: a known version
/// prefix followed by a c32 body, within the address length window.
/// Pure and synchronous; `false` means "not submittable", not an error.
#[must_use]
pub fn is_valid_address(input: &str, network: Network) -> bool {
    if !ADDRESS_LENGTH.contains(&input.len()) {
        return false;
    }
    let Some(body) = network
        .address_prefixes()
        .iter()
        .find_map(|prefix| input.strip_prefix(prefix))
    else {
        return false;
    };
    body.chars().all(|c| C32_ALPHABET.contains(c))
}

/// Abbreviate an address for status lines: `ST1234...WXYZ`.
#[must_use]
pub fn shorten_address(address: &str) -> String {
    if address.len() <= 10 || !address.is_ascii() {
        return address.to_string();
    }
    format!("{}...{}", &address[..6], &address[address.len() - 4..])
}

/// A recipient address that passed format validation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Recipient(String);

impl Recipient {
    /// Parse user input as an address on `network`. Surrounding whitespace is
    /// ignored; anything else must match exactly.
    pub fn parse(input: &str, network: Network) -> Result<Self> {
        let input = input.trim();
        if input.is_empty() {
            return Err(TipError::InvalidRecipient("Recipient cannot be empty.".into()));
        }
        if !is_valid_address(input, network) {
            return Err(TipError::InvalidRecipient(format!(
                "Invalid recipient '{input}'. Expected a {network} Stacks address ({}...).",
                network.address_prefixes()[0]
            )));
        }
        Ok(Self(input.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Recipient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const EXAMPLE: &str = "ST123456789012345678901234567890123456";
    const CONTRACT: &str = "STNHKEPYEPJ8ET55ZZ0M5A34J0R3N5FM2CMMMAZ6";

    #[test]
    fn accepts_example_address() {
        assert!(is_valid_address(EXAMPLE, Network::Testnet));
        assert!(is_valid_address(CONTRACT, Network::Testnet));
    }

    #[test]
    fn rejects_missing_prefix() {
        assert!(!is_valid_address("invalidaddr", Network::Testnet));
        assert!(!is_valid_address("XX123456789012345678901234567890123456", Network::Testnet));
    }

    #[test]
    fn rejects_every_truncation() {
        for len in 0..*ADDRESS_LENGTH.start() {
            assert!(
                !is_valid_address(&CONTRACT[..len.min(CONTRACT.len())], Network::Testnet),
                "length {len} should be rejected"
            );
        }
    }

    #[test]
    fn rejects_overlong() {
        let long = format!("{CONTRACT}AB");
        assert!(!is_valid_address(&long, Network::Testnet));
    }

    #[test]
    fn rejects_non_c32_characters() {
        // 'I', 'L', 'O', 'U' and lowercase are outside the alphabet
        assert!(!is_valid_address("STNHKEPYEPJ8ET55ZZ0M5A34J0R3N5FM2CMMMAZI", Network::Testnet));
        assert!(!is_valid_address("stnhkepyepj8et55zz0m5a34j0r3n5fm2cmmmaz6", Network::Testnet));
    }

    #[test]
    fn prefix_depends_on_network() {
        let mainnet = "SP2J6ZY48GV1EZ5V2V5RB9MP66SW86PYKKNRV9EJ7";
        assert!(is_valid_address(mainnet, Network::Mainnet));
        assert!(!is_valid_address(mainnet, Network::Testnet));
        assert!(!is_valid_address(CONTRACT, Network::Mainnet));
    }

    #[test]
    fn parse_trims_whitespace() {
        let r = Recipient::parse(&format!("  {EXAMPLE} "), Network::Testnet).unwrap();
        assert_eq!(r.as_str(), EXAMPLE);
    }

    #[test]
    fn parse_rejects_empty() {
        assert!(Recipient::parse("", Network::Testnet).is_err());
        assert!(Recipient::parse("   ", Network::Testnet).is_err());
    }

    #[test]
    fn parse_rejects_username() {
        let err = Recipient::parse("cryptoCreator", Network::Testnet).unwrap_err();
        assert!(matches!(err, TipError::InvalidRecipient(_)));
    }

    #[test]
    fn shorten() {
        assert_eq!(shorten_address(CONTRACT), "STNHKE...MAZ6");
        assert_eq!(shorten_address("ST12"), "ST12");
    }
}
