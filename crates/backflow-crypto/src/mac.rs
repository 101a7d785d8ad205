use digest::Digest;
use digest::core_api::BlockSizeUser;
use hmac::{Mac, SimpleHmac};

use crate::{HashType, Result};

fn mac<D: Digest + BlockSizeUser>(key: &[u8], data: &[u8]) -> Result<Vec<u8>> {
    let mut mac = <SimpleHmac<D> as Mac>::new_from_slice(key)?;
    Mac::update(&mut mac, data);
    Ok(mac.finalize().into_bytes().to_vec())
}

/// HMAC of `data` under `key` using the named digest.
pub fn hmac_once(algorithm: &str, key: impl AsRef<[u8]>, data: impl AsRef<[u8]>) -> Result<Vec<u8>> {
    let (key, data) = (key.as_ref(), data.as_ref());
    match HashType::from_name(algorithm)? {
        HashType::Md5 => mac::<md5::Md5>(key, data),
        HashType::Sha1 => mac::<sha1::Sha1>(key, data),
        HashType::Sha256 => mac::<sha2::Sha256>(key, data),
        HashType::Sha512 => mac::<sha2::Sha512>(key, data),
    }
}
