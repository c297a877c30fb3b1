//! Mnemonic phrase rendering for matched keys.

use bip39::Mnemonic;

use crate::config::Network;

#[derive(Debug, thiserror::Error)]
#[error("cannot encode secret as mnemonic: {0}")]
pub struct MnemonicError(#[from] bip39::Error);

/// Renders a raw spend secret as a recovery phrase, using the wordlist
/// selected by the address network.
pub fn secret_to_mnemonic(raw_spend: &[u8; 32], network: Network) -> Result<String, MnemonicError> {
    let mnemonic = Mnemonic::from_entropy_in(network.mnemonic_language(), raw_spend)?;
    Ok(mnemonic.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_phrase_length() {
        let phrase = secret_to_mnemonic(&[0xabu8; 32], Network::Monero).unwrap();
        assert_eq!(phrase.split_whitespace().count(), 24);
    }

    #[test]
    fn test_phrase_is_deterministic() {
        let a = secret_to_mnemonic(&[0x5au8; 32], Network::Aeon).unwrap();
        let b = secret_to_mnemonic(&[0x5au8; 32], Network::Aeon).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_zero_entropy_vector() {
        let phrase = secret_to_mnemonic(&[0u8; 32], Network::Monero).unwrap();
        assert!(phrase.starts_with("abandon abandon"));
        assert!(phrase.ends_with("art"));
    }
}
