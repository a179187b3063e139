/// 获取当前 UTC 时间戳（毫秒）
pub fn now_millis() -> i64 {
    chrono::Utc::now().timestamp_millis()
}

/// Generate a Snowflake-style i64 for use as resource ID.
///
/// Layout (53 bits, fits in JavaScript's Number.MAX_SAFE_INTEGER):
///   - 41 bits: milliseconds since 2024-01-01 UTC (~69 years)
///   - 12 bits: random (4096 values per ms, collision-free at catalog scale)
pub fn snowflake_id() -> i64 {
    use rand::Rng;
    // Custom epoch: 2024-01-01 00:00:00 UTC
    const EPOCH_MS: i64 = 1_704_067_200_000;
    let now = now_millis();
    let ts = (now - EPOCH_MS) & 0x1FF_FFFF_FFFF; // 41 bits
    let rand_bits: i64 = rand::thread_rng().gen_range(0..0x1000); // 12 bits
    (ts << 12) | rand_bits
}

/// Compute the canonical signature hash for a variant.
///
/// The signature is the set of option-value ids the variant is composed of.
/// Ids are sorted before hashing, so client submission order never changes
/// the result. Stored in `variant.signature_hash` and backed by a unique
/// index on `(product_id, signature_hash)`.
pub fn signature_hash(option_value_ids: &[i64]) -> String {
    use sha2::{Digest, Sha256};
    let mut ids = option_value_ids.to_vec();
    ids.sort_unstable();
    let joined = ids
        .iter()
        .map(|id| id.to_string())
        .collect::<Vec<_>>()
        .join(":");
    let mut hasher = Sha256::new();
    hasher.update(joined.as_bytes());
    hex::encode(hasher.finalize())
}

/// Derive a URL-safe slug from a display name.
///
/// Lowercases ASCII, maps whitespace runs to a single dash, drops everything
/// that is not alphanumeric or a dash. Uniqueness is enforced at the storage
/// layer, not here.
pub fn slugify(name: &str) -> String {
    let mut slug = String::with_capacity(name.len());
    let mut last_dash = true; // suppress leading dash
    for ch in name.chars() {
        if ch.is_ascii_alphanumeric() {
            slug.push(ch.to_ascii_lowercase());
            last_dash = false;
        } else if (ch.is_whitespace() || ch == '-' || ch == '_') && !last_dash {
            slug.push('-');
            last_dash = true;
        }
    }
    while slug.ends_with('-') {
        slug.pop();
    }
    slug
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_signature_hash_order_independent() {
        let a = signature_hash(&[3, 1, 2]);
        let b = signature_hash(&[1, 2, 3]);
        let c = signature_hash(&[2, 3, 1]);
        assert_eq!(a, b);
        assert_eq!(b, c);
    }

    #[test]
    fn test_signature_hash_distinguishes_sets() {
        assert_ne!(signature_hash(&[1, 2]), signature_hash(&[1, 3]));
        // Concatenation must not collide: [1, 23] vs [12, 3]
        assert_ne!(signature_hash(&[1, 23]), signature_hash(&[12, 3]));
    }

    #[test]
    fn test_snowflake_id_is_positive_and_unique_enough() {
        let a = snowflake_id();
        let b = snowflake_id();
        assert!(a > 0);
        assert!(b > 0);
        // 53-bit bound (JS safe integer)
        assert!(a < (1i64 << 53));
    }

    #[test]
    fn test_slugify() {
        assert_eq!(slugify("Red T-Shirt"), "red-t-shirt");
        assert_eq!(slugify("  Áo Thun   XL "), "o-thun-xl");
        assert_eq!(slugify("a__b"), "a-b");
    }
}
