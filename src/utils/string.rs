//! String utilities
//!
//! Contains helper functions for printing sensitive values.

/// Mask all but the first `visible` characters of a secret
///
/// Masking happens per character, so multi-byte input never splits a
/// UTF-8 boundary. Values no longer than `visible` are masked entirely.
///
/// # Example
/// ```
/// use ebs_env_variables::utils::mask_secret;
///
/// assert_eq!(mask_secret("AKIAIOSFODNN7", 4), "AKIA*********");
/// assert_eq!(mask_secret("abc", 4), "***");
/// ```
pub fn mask_secret(s: &str, visible: usize) -> String {
    let total = s.chars().count();
    if total <= visible {
        return "*".repeat(total);
    }
    s.chars()
        .enumerate()
        .map(|(i, c)| if i < visible { c } else { '*' })
        .collect()
}
