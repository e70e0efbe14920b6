use sha2::{Digest, Sha256};

use super::url::locator_file_name;

/// Number of digest bytes kept for the file name prefix (rendered as hex)
const HASH_BYTES: usize = 8;

/// Content-addressed name parts derived from a remote locator
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AssetName {
    /// Short digest of the full locator, query string included
    pub hash: String,
    /// Last path segment of the locator, without query string
    pub base: String,
}

impl AssetName {
    /// `{hash}-{base}`, the file name before any extension is appended
    pub fn stem(&self) -> String {
        format!("{}-{}", self.hash, self.base)
    }

    /// Final file name for an already resolved base name
    pub fn file_name(&self, resolved_base: &str) -> String {
        format!("{}-{}", self.hash, resolved_base)
    }
}

/// Hashes the whole locator string into a short lowercase hex digest
pub fn locator_hash(locator: &str) -> String {
    let digest = Sha256::digest(locator.as_bytes());

    digest[..HASH_BYTES]
        .iter()
        .map(|byte| format!("{byte:02x}"))
        .collect()
}

/// Derives the hash and base name used to build a local file name
pub fn derive_base_name(locator: &str) -> AssetName {
    AssetName {
        hash: locator_hash(locator),
        base: locator_file_name(locator),
    }
}
