//! # Taxpayer Identifier Checksums
//!
//! Pure integer arithmetic for the two Brazilian taxpayer identifier
//! formats: the 11-digit individual number and the 14-digit organization
//! number. Each carries two trailing check digits.
//!
//! ## Classification
//!
//! ```text
//! raw ──strip non-digits──▶ digits
//!        len 11 ──▶ individual checksum ──▶ INDIVIDUAL
//!        len 14 ──▶ organization checksum ──▶ ORGANIZATION
//!        other  ──▶ InvalidFormat
//! ```
//!
//! A string made of one repeated digit is rejected before any checksum math
//! runs; several of those happen to satisfy the weighted sums.

use crate::error::IdentifierError;
use crate::identity::IdentifierKind;

/// Digit count of an individual identifier.
pub const INDIVIDUAL_LEN: usize = 11;

/// Digit count of an organization identifier.
pub const ORGANIZATION_LEN: usize = 14;

/// Organization weights restart at this value once they fall below 2.
const ORGANIZATION_WEIGHT_RESET: u32 = 9;

/// Strip every character that is not an ASCII digit.
pub fn normalize(raw: &str) -> String {
    raw.chars().filter(char::is_ascii_digit).collect()
}

/// Classify a raw identifier, validating its check digits.
///
/// Formatting characters (dots, dashes, slashes, spaces) are ignored.
///
/// # Errors
///
/// - [`IdentifierError::InvalidFormat`] if the value does not contain
///   exactly 11 or 14 digits.
/// - [`IdentifierError::InvalidChecksum`] if the digits are all the same or
///   either check digit does not match.
pub fn classify(raw: &str) -> Result<IdentifierKind, IdentifierError> {
    let digits = normalize(raw);
    let kind = match digits.len() {
        INDIVIDUAL_LEN => IdentifierKind::Individual,
        ORGANIZATION_LEN => IdentifierKind::Organization,
        n => {
            return Err(IdentifierError::InvalidFormat {
                raw: raw.to_string(),
                digits: n,
            })
        }
    };

    let values = digit_values(&digits);
    let passes = !is_repetition(&values)
        && match kind {
            IdentifierKind::Individual => individual_checksum_holds(&values),
            IdentifierKind::Organization => organization_checksum_holds(&values),
        };

    if passes {
        Ok(kind)
    } else {
        Err(IdentifierError::InvalidChecksum { kind, digits })
    }
}

/// Whether `raw` is a valid individual identifier, masked or not.
pub fn is_individual(raw: &str) -> bool {
    matches!(classify(raw), Ok(IdentifierKind::Individual))
}

/// Whether `raw` is a valid organization identifier, masked or not.
pub fn is_organization(raw: &str) -> bool {
    matches!(classify(raw), Ok(IdentifierKind::Organization))
}

/// Compute the two check digits for a 9-digit individual base.
pub fn individual_check_digits(base: &[u8; 9]) -> [u8; 2] {
    let mut digits = [0u8; INDIVIDUAL_LEN];
    digits[..9].copy_from_slice(base);
    digits[9] = individual_check_digit(&digits[..9]);
    digits[10] = individual_check_digit(&digits[..10]);
    [digits[9], digits[10]]
}

/// Compute the two check digits for a 12-digit organization base.
pub fn organization_check_digits(base: &[u8; 12]) -> [u8; 2] {
    let mut digits = [0u8; ORGANIZATION_LEN];
    digits[..12].copy_from_slice(base);
    digits[12] = organization_check_digit(&digits[..12]);
    digits[13] = organization_check_digit(&digits[..13]);
    [digits[12], digits[13]]
}

/// Check digit for the position right after `prefix`.
///
/// The digit at index `num` is weighted by `prefix.len() + 1 - num`, so the
/// weights descend to 2 at the last prefix digit.
fn individual_check_digit(prefix: &[u8]) -> u8 {
    let top = prefix.len() as u32 + 1;
    let sum: u32 = prefix
        .iter()
        .enumerate()
        .map(|(num, d)| u32::from(*d) * (top - num as u32))
        .sum();
    ((sum * 10) % 11 % 10) as u8
}

/// Check digit for the position right after `prefix`.
///
/// Weights start at `prefix.len() - 7` (5 for the first check digit, 6 for
/// the second), descend to 2, then wrap to 9.
fn organization_check_digit(prefix: &[u8]) -> u8 {
    let mut weight = prefix.len() as u32 - 7;
    let mut sum = 0u32;
    for d in prefix {
        sum += u32::from(*d) * weight;
        weight -= 1;
        if weight < 2 {
            weight = ORGANIZATION_WEIGHT_RESET;
        }
    }
    match sum % 11 {
        r if r < 2 => 0,
        r => (11 - r) as u8,
    }
}

fn individual_checksum_holds(digits: &[u8]) -> bool {
    (9..INDIVIDUAL_LEN).all(|i| individual_check_digit(&digits[..i]) == digits[i])
}

fn organization_checksum_holds(digits: &[u8]) -> bool {
    (12..ORGANIZATION_LEN).all(|i| organization_check_digit(&digits[..i]) == digits[i])
}

fn digit_values(digits: &str) -> Vec<u8> {
    digits.bytes().map(|b| b - b'0').collect()
}

fn is_repetition(digits: &[u8]) -> bool {
    digits.windows(2).all(|w| w[0] == w[1])
}
