use alloy::primitives::Address;
use crate::constants::is_valid_ethereum_address;
use crate::error::AppError;

/// Parse a world/wallet address and return its lowercase `0x…` form
pub fn normalize_world_address(raw: &str) -> Result<String, AppError> {
    let trimmed = raw.trim();
    if !is_valid_ethereum_address(trimmed) {
        return Err(AppError::validation("INVALID_ADDRESS", "Address must be a 0x-prefixed 20-byte hex string"));
    }

    let address: Address = trimmed
        .parse()
        .map_err(|_| AppError::validation("INVALID_ADDRESS", "Address is not valid hex"))?;

    Ok(format!("0x{}", hex::encode(address.as_slice())))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_lowercases() {
        let normalized = normalize_world_address(" 0x1108F177596f7A2a913ABf6C208FACEf152C3d8c ").unwrap();
        assert_eq!(normalized, "0x1108f177596f7a2a913abf6c208facef152c3d8c");
    }

    #[test]
    fn test_normalize_rejects_bad_input() {
        for bad in ["", "0x1234", "1108F177596f7A2a913ABf6C208FACEf152C3d8c", "0xZZ08F177596f7A2a913ABf6C208FACEf152C3d8c"] {
            let err = normalize_world_address(bad).unwrap_err();
            assert_eq!(err.code(), "INVALID_ADDRESS");
        }
    }
}
