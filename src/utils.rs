const MASK_PREFIX_LEN: usize = 6;
const MASK_SUFFIX_LEN: usize = 4;

/// Shortens a wallet address to `0x742d...f44e`. Addresses too short to
/// mask are returned as they are.
pub fn mask_wallet_address(address: &str) -> String {
    let chars: Vec<char> = address.chars().collect();
    if chars.len() < MASK_PREFIX_LEN + MASK_SUFFIX_LEN {
        return address.to_string();
    }

    let prefix: String = chars[..MASK_PREFIX_LEN].iter().collect();
    let suffix: String = chars[chars.len() - MASK_SUFFIX_LEN..].iter().collect();

    format!("{prefix}...{suffix}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mask_wallet_address() {
        assert_eq!(
            mask_wallet_address("0x742d35Cc6634C0532925a3b844Bc454e4438f44e"),
            "0x742d...f44e"
        );
    }

    #[test]
    fn test_short_address_is_unchanged() {
        assert_eq!(mask_wallet_address("0x742d35"), "0x742d35");
        assert_eq!(mask_wallet_address(""), "");
    }

    #[test]
    fn test_ten_characters_is_masked() {
        assert_eq!(mask_wallet_address("0123456789"), "012345...6789");
    }

    #[test]
    fn test_multibyte_address_does_not_panic() {
        assert_eq!(mask_wallet_address("ááááááábbbbbb"), "áááááá...bbbb");
    }
}
