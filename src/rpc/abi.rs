//! Minimal ABI plumbing for the handful of read calls the validator issues.
//! Selectors are derived from the signature at call time; return decoding
//! covers the three shapes we read: string, uint8, address.

use alloy_primitives::{hex, keccak256, Address};

use crate::rpc::RpcError;

const WORD: usize = 32;

pub fn selector(signature: &str) -> [u8; 4] {
    let digest = keccak256(signature.as_bytes());
    [digest[0], digest[1], digest[2], digest[3]]
}

/// Call data for a zero-argument function.
pub fn encode_call(signature: &str) -> Vec<u8> {
    selector(signature).to_vec()
}

/// Call data for a single-address-argument function: selector plus one
/// left-padded 32-byte word.
pub fn encode_call_address(signature: &str, argument: Address) -> Vec<u8> {
    let mut data = Vec::with_capacity(4 + WORD);
    data.extend_from_slice(&selector(signature));
    data.extend_from_slice(&[0u8; 12]);
    data.extend_from_slice(argument.as_slice());
    data
}

fn word_at(data: &[u8], offset: usize) -> Result<&[u8], RpcError> {
    data.get(offset..offset + WORD)
        .ok_or_else(|| RpcError::Decode(format!("return data truncated at offset {offset}")))
}

fn word_to_usize(word: &[u8]) -> Result<usize, RpcError> {
    if word[..WORD - 8].iter().any(|byte| *byte != 0) {
        return Err(RpcError::Decode("oversized length word".to_string()));
    }
    let mut bytes = [0u8; 8];
    bytes.copy_from_slice(&word[WORD - 8..]);
    Ok(u64::from_be_bytes(bytes) as usize)
}

/// Dynamic `string` return: offset word, length word, then utf-8 bytes.
pub fn decode_string(data: &[u8]) -> Result<String, RpcError> {
    let offset = word_to_usize(word_at(data, 0)?)?;
    let length = word_to_usize(word_at(data, offset)?)?;
    let start = offset + WORD;
    let bytes = data
        .get(start..start + length)
        .ok_or_else(|| RpcError::Decode("string data out of bounds".to_string()))?;
    String::from_utf8(bytes.to_vec())
        .map_err(|err| RpcError::Decode(format!("string return is not utf-8: {err}")))
}

/// `uint8` return: one word, value in the final byte.
pub fn decode_u8(data: &[u8]) -> Result<u8, RpcError> {
    let word = word_at(data, 0)?;
    if word[..WORD - 1].iter().any(|byte| *byte != 0) {
        return Err(RpcError::Decode("uint8 return exceeds one byte".to_string()));
    }
    Ok(word[WORD - 1])
}

/// `address` return: one word, value in the final 20 bytes.
pub fn decode_address(data: &[u8]) -> Result<Address, RpcError> {
    let word = word_at(data, 0)?;
    Ok(Address::from_slice(&word[WORD - 20..]))
}

pub fn encode_hex(data: &[u8]) -> String {
    format!("0x{}", hex::encode(data))
}

pub fn decode_hex(raw: &str) -> Result<Vec<u8>, RpcError> {
    hex::decode(raw.trim_start_matches("0x"))
        .map_err(|err| RpcError::Decode(format!("invalid hex in response: {err}")))
}

#[cfg(test)]
mod tests {
    use alloy_primitives::address;

    use super::*;

    #[test]
    fn erc20_selectors_match_known_values() {
        assert_eq!(selector("name()"), [0x06, 0xfd, 0xde, 0x03]);
        assert_eq!(selector("symbol()"), [0x95, 0xd8, 0x9b, 0x41]);
        assert_eq!(selector("decimals()"), [0x31, 0x3c, 0xe5, 0x67]);
    }

    #[test]
    fn address_argument_is_left_padded_into_one_word() {
        let argument = address!("0x94Ad6Ac84f6C6FbA8b8CCbD71d9f4f101def52a8");
        let data = encode_call_address("getVault(address)", argument);
        assert_eq!(data.len(), 36);
        assert_eq!(&data[..4], &selector("getVault(address)"));
        assert!(data[4..16].iter().all(|byte| *byte == 0));
        assert_eq!(&data[16..], argument.as_slice());
    }

    #[test]
    fn decodes_string_return() {
        let mut data = vec![0u8; 96];
        data[31] = 0x20; // offset
        data[63] = 4; // length
        data[64..68].copy_from_slice(b"HONY");
        assert_eq!(decode_string(&data).expect("string should decode"), "HONY");
    }

    #[test]
    fn decodes_u8_and_rejects_wide_values() {
        let mut data = vec![0u8; 32];
        data[31] = 18;
        assert_eq!(decode_u8(&data).expect("u8 should decode"), 18);

        data[30] = 1;
        assert!(decode_u8(&data).is_err());
    }

    #[test]
    fn decodes_address_return() {
        let expected = address!("0x94Ad6Ac84f6C6FbA8b8CCbD71d9f4f101def52a8");
        let mut data = vec![0u8; 32];
        data[12..].copy_from_slice(expected.as_slice());
        assert_eq!(decode_address(&data).expect("address should decode"), expected);
    }

    #[test]
    fn hex_round_trip() {
        let bytes = vec![0x06, 0xfd, 0xde, 0x03];
        let encoded = encode_hex(&bytes);
        assert_eq!(encoded, "0x06fdde03");
        assert_eq!(decode_hex(&encoded).expect("hex should decode"), bytes);
    }

    #[test]
    fn truncated_return_data_is_a_decode_error() {
        assert!(decode_string(&[0u8; 16]).is_err());
        assert!(decode_u8(&[]).is_err());
        assert!(decode_address(&[0u8; 8]).is_err());
    }
}
