//! Base58 location codec
//!
//! Source locations are embedded in public URLs as a single base58 path
//! segment, which keeps them URL-safe without any escaping.

use crate::error::{Error, Result};

/// Encode a location into a base58 token
pub fn encode(location: &str) -> String {
    bs58::encode(location.as_bytes()).into_string()
}

/// Decode a base58 token back into a location
pub fn decode(token: &str) -> Result<String> {
    let bytes = bs58::decode(token)
        .into_vec()
        .map_err(|e| Error::Decode(e.to_string()))?;

    String::from_utf8(bytes).map_err(|e| Error::Decode(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decode_known_token() {
        // "hello" in the bitcoin alphabet
        assert_eq!(decode("Cn8eVZg").unwrap(), "hello");
        assert_eq!(encode("hello"), "Cn8eVZg");
    }

    #[test]
    fn test_encode_is_url_safe() {
        let token = encode("https://example.com/path?q=1&r=/x y");
        assert!(token.chars().all(|c| c.is_ascii_alphanumeric()));
        assert_eq!(decode(&token).unwrap(), "https://example.com/path?q=1&r=/x y");
    }

    #[test]
    fn test_decode_rejects_invalid_alphabet() {
        // '0', 'O', 'I' and 'l' are not part of the alphabet
        assert!(matches!(decode("0OIl"), Err(Error::Decode(_))));
    }

    #[test]
    fn test_decode_rejects_non_utf8() {
        let token = bs58::encode([0xff, 0xfe]).into_string();
        assert!(matches!(decode(&token), Err(Error::Decode(_))));
    }
}
