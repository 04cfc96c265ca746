//! CashAddr codec: decoding, checksum verification and re-encoding of
//! BCH payment addresses, including the token-aware address types.
//!
//! <https://github.com/bitcoincashorg/bitcoincash.org/blob/master/spec/cashaddr.md>

mod error;

pub use error::Error;

pub type Result<T> = std::result::Result<T, Error>;

const CHARSET: &[u8; 32] = b"qpzry9x8gf2tvdw0s3jn54khce6mua7l";

/// Hash sizes in bytes, indexed by the size bits of the version byte.
const HASH_SIZES: [usize; 8] = [20, 24, 28, 32, 40, 48, 56, 64];

const CHECKSUM_LEN: usize = 8;

/// Address type encoded in the version byte. Types 2 and 3 signal that
/// the holder accepts outputs carrying tokens.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum AddressType {
    P2pkh,
    P2sh,
    P2pkhWithTokens,
    P2shWithTokens,
}

impl AddressType {
    fn from_type_bits(bits: u8) -> Result<Self> {
        match bits {
            0 => Ok(Self::P2pkh),
            1 => Ok(Self::P2sh),
            2 => Ok(Self::P2pkhWithTokens),
            3 => Ok(Self::P2shWithTokens),
            _ => Err(Error::UnsupportedType(bits)),
        }
    }

    const fn type_bits(self) -> u8 {
        match self {
            Self::P2pkh => 0,
            Self::P2sh => 1,
            Self::P2pkhWithTokens => 2,
            Self::P2shWithTokens => 3,
        }
    }

    /// The token-aware counterpart of this type.
    #[must_use]
    pub const fn with_tokens(self) -> Self {
        match self {
            Self::P2pkh | Self::P2pkhWithTokens => Self::P2pkhWithTokens,
            Self::P2sh | Self::P2shWithTokens => Self::P2shWithTokens,
        }
    }

    #[must_use]
    pub const fn token_aware(self) -> bool {
        matches!(self, Self::P2pkhWithTokens | Self::P2shWithTokens)
    }
}

/// Decoded address: human-readable prefix, type and payload hash.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Payload {
    pub prefix: String,
    pub kind: AddressType,
    pub hash: Vec<u8>,
}

/// 40-bit BCH checksum over the expanded prefix and payload.
fn polymod<I: IntoIterator<Item = u8>>(values: I) -> u64 {
    let mut c: u64 = 1;
    for d in values {
        let c0 = (c >> 35) as u8;
        c = ((c & 0x0007_ffff_ffff) << 5) ^ u64::from(d);
        if c0 & 0x01 != 0 {
            c ^= 0x98_f2bc_8e61;
        }
        if c0 & 0x02 != 0 {
            c ^= 0x79_b76d_99e2;
        }
        if c0 & 0x04 != 0 {
            c ^= 0xf3_3e5f_b3c4;
        }
        if c0 & 0x08 != 0 {
            c ^= 0xae_2eab_e2a8;
        }
        if c0 & 0x10 != 0 {
            c ^= 0x1e_4f43_e470;
        }
    }
    c ^ 1
}

/// Lower five bits of each prefix character, followed by a zero
/// separator.
fn expand_prefix(prefix: &str) -> Vec<u8> {
    prefix
        .bytes()
        .map(|b| b & 0x1f)
        .chain(std::iter::once(0))
        .collect()
}

fn charset_value(c: char) -> Result<u8> {
    CHARSET
        .iter()
        .position(|&b| b as char == c)
        .map(|p| p as u8)
        .ok_or(Error::InvalidCharacter(c))
}

/// Regroup the bit stream from `from`-bit groups into `to`-bit groups.
fn convert_bits(data: &[u8], from: u32, to: u32, pad: bool) -> Result<Vec<u8>> {
    let mut acc: u32 = 0;
    let mut bits: u32 = 0;
    let mut out = Vec::with_capacity(data.len() * from as usize / to as usize + 1);
    let max = (1u32 << to) - 1;
    for &value in data {
        acc = (acc << from) | u32::from(value);
        bits += from;
        while bits >= to {
            bits -= to;
            out.push(((acc >> bits) & max) as u8);
        }
    }
    if pad {
        if bits > 0 {
            out.push(((acc << (to - bits)) & max) as u8);
        }
    } else if bits >= from || (acc << (to - bits)) & max != 0 {
        return Err(Error::InvalidPadding);
    }
    Ok(out)
}

/// Decodes a cash address. Input may carry its own prefix
/// (`bitcoincash:q...`); prefixless input is resolved against
/// `default_prefix`. Upper case is accepted but mixed case is not.
pub fn decode(address: &str, default_prefix: &str) -> Result<Payload> {
    if address.is_empty() {
        return Err(Error::Empty);
    }
    let has_upper = address.chars().any(|c| c.is_ascii_uppercase());
    let has_lower = address.chars().any(|c| c.is_ascii_lowercase());
    if has_upper && has_lower {
        return Err(Error::MixedCase);
    }
    let address = address.to_lowercase();

    let mut parts = address.split(':');
    let (prefix, payload) = match (parts.next(), parts.next(), parts.next()) {
        (Some(payload), None, _) => (default_prefix.to_lowercase(), payload),
        (Some(prefix), Some(payload), None) => (String::from(prefix), payload),
        _ => return Err(Error::InvalidFormat),
    };
    if prefix.is_empty() || payload.len() <= CHECKSUM_LEN {
        return Err(Error::InvalidFormat);
    }

    let values = payload
        .chars()
        .map(charset_value)
        .collect::<Result<Vec<u8>>>()?;
    let checked = expand_prefix(&prefix)
        .into_iter()
        .chain(values.iter().copied());
    if polymod(checked) != 0 {
        return Err(Error::ChecksumFailed);
    }

    let data = convert_bits(&values[..values.len() - CHECKSUM_LEN], 5, 8, false)?;
    let (version, hash) = data.split_first().ok_or(Error::InvalidFormat)?;
    if version & 0x80 != 0 {
        return Err(Error::InvalidVersion(*version));
    }
    let kind = AddressType::from_type_bits((version >> 3) & 0x0f)?;
    let expected = HASH_SIZES[usize::from(version & 0x07)];
    if hash.len() != expected {
        return Err(Error::InvalidLength(hash.len()));
    }
    Ok(Payload {
        prefix,
        kind,
        hash: hash.to_vec(),
    })
}

/// Encodes a hash as a prefixed cash address.
pub fn encode(prefix: &str, kind: AddressType, hash: &[u8]) -> Result<String> {
    let size_bits = HASH_SIZES
        .iter()
        .position(|&s| s == hash.len())
        .ok_or(Error::UnsupportedHashSize(hash.len()))? as u8;
    let version = (kind.type_bits() << 3) | size_bits;

    let mut data = Vec::with_capacity(hash.len() + 1);
    data.push(version);
    data.extend_from_slice(hash);
    let mut payload = convert_bits(&data, 8, 5, true)?;

    let template = expand_prefix(prefix)
        .into_iter()
        .chain(payload.iter().copied())
        .chain(std::iter::repeat(0).take(CHECKSUM_LEN));
    let checksum = polymod(template);
    for i in 0..CHECKSUM_LEN {
        payload.push(((checksum >> (5 * (CHECKSUM_LEN - 1 - i) as u64)) & 0x1f) as u8);
    }

    let mut out = String::with_capacity(prefix.len() + 1 + payload.len());
    out.push_str(prefix);
    out.push(':');
    for value in payload {
        out.push(CHARSET[usize::from(value)] as char);
    }
    Ok(out)
}

/// Re-encodes an address with token support enabled, keeping the same
/// locking payload. Returns the full prefixed address.
pub fn to_token_address(address: &str, default_prefix: &str) -> Result<String> {
    let payload = decode(address, default_prefix)?;
    encode(&payload.prefix, payload.kind.with_tokens(), &payload.hash)
}

#[cfg(test)]
mod tests {
    use {super::*, hex_literal::hex};

    // Test vectors from the cashaddr specification.
    const P2PKH: &str = "bitcoincash:qr6m7j9njldwwzlg9v7v53unlr4jkmx6eylep8ekg2";
    const P2PKH_HASH: [u8; 20] = hex!("F5BF48B397DAE70BE82B3CCA4793F8EB2B6CDAC9");
    const LEGACY_P2PKH: &str = "bitcoincash:qpm2qsznhks23z7629mms6s4cwef74vcwvy22gdx6a";
    const LEGACY_P2SH: &str = "bitcoincash:ppm2qsznhks23z7629mms6s4cwef74vcwvn0h829pq";

    #[test]
    fn decode_spec_vector() {
        let payload = decode(P2PKH, "bitcoincash").unwrap();
        assert_eq!("bitcoincash", payload.prefix);
        assert_eq!(AddressType::P2pkh, payload.kind);
        assert_eq!(P2PKH_HASH.to_vec(), payload.hash);
    }

    #[test]
    fn decode_p2sh_vector() {
        let payload = decode(LEGACY_P2SH, "bitcoincash").unwrap();
        assert_eq!(AddressType::P2sh, payload.kind);
        let p2pkh = decode(LEGACY_P2PKH, "bitcoincash").unwrap();
        assert_eq!(p2pkh.hash, payload.hash);
    }

    #[test]
    fn encode_roundtrip() {
        let encoded = encode("bitcoincash", AddressType::P2pkh, &P2PKH_HASH).unwrap();
        assert_eq!(P2PKH, encoded);
    }

    #[test]
    fn prefixless_uses_default_prefix() {
        let bare = P2PKH.split(':').nth(1).unwrap();
        let payload = decode(bare, "bitcoincash").unwrap();
        assert_eq!(P2PKH_HASH.to_vec(), payload.hash);
        // the same payload is not valid under another prefix
        assert_eq!(Err(Error::ChecksumFailed), decode(bare, "bchtest"));
    }

    #[test]
    fn upper_case_accepted_mixed_case_rejected() {
        let upper = P2PKH.to_uppercase();
        assert!(decode(&upper, "bitcoincash").is_ok());
        let mixed = P2PKH.replacen("qr6m", "QR6M", 1);
        assert_eq!(Err(Error::MixedCase), decode(&mixed, "bitcoincash"));
    }

    #[test]
    fn corrupted_payload_fails_checksum() {
        let mut corrupt = String::from(P2PKH);
        corrupt.truncate(P2PKH.len() - 1);
        corrupt.push(if P2PKH.ends_with('2') { 'x' } else { '2' });
        assert_eq!(Err(Error::ChecksumFailed), decode(&corrupt, "bitcoincash"));
    }

    #[test]
    fn token_address_roundtrip() {
        let token = to_token_address(P2PKH, "bitcoincash").unwrap();
        assert!(token.starts_with("bitcoincash:z"));
        let payload = decode(&token, "bitcoincash").unwrap();
        assert_eq!(AddressType::P2pkhWithTokens, payload.kind);
        assert!(payload.kind.token_aware());
        assert_eq!(P2PKH_HASH.to_vec(), payload.hash);
    }

    #[test]
    fn token_address_is_idempotent() {
        let once = to_token_address(P2PKH, "bitcoincash").unwrap();
        let twice = to_token_address(&once, "bitcoincash").unwrap();
        assert_eq!(once, twice);
    }

    #[test]
    fn invalid_input() {
        assert_eq!(Err(Error::Empty), decode("", "bitcoincash"));
        assert_eq!(
            Err(Error::InvalidCharacter('b')),
            decode("bitcoincash:qqb000000000", "bitcoincash")
        );
        assert!(matches!(
            decode("a:b:c", "bitcoincash"),
            Err(Error::InvalidFormat)
        ));
        assert_eq!(
            Err(Error::UnsupportedHashSize(21)),
            encode("bitcoincash", AddressType::P2pkh, &[0u8; 21])
        );
    }
}
