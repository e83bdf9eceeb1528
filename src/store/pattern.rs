//! Pattern Matching Module
//!
//! Glob-style key matching for local backends, using the same `*` and `?`
//! wildcards Redis applies to `KEYS`, so a pattern behaves identically
//! whether it is evaluated locally or by the remote server.

// == Glob Matcher ==
/// Matches a key against a glob pattern over the whole key.
///
/// `*` matches any run of characters (including none), `?` matches exactly
/// one character, and everything else matches literally.
///
/// # Arguments
/// * `pattern` - Glob pattern (`*`, `?` wildcards)
/// * `key` - The key to test
pub fn matches(pattern: &str, key: &str) -> bool {
    let pat: Vec<char> = pattern.chars().collect();
    let text: Vec<char> = key.chars().collect();

    let mut p = 0;
    let mut t = 0;
    // Position of the last `*` and the text index it was tried at, for
    // backtracking when a literal run after the star fails to match.
    let mut star: Option<(usize, usize)> = None;

    while t < text.len() {
        if p < pat.len() && (pat[p] == '?' || pat[p] == text[t]) {
            p += 1;
            t += 1;
        } else if p < pat.len() && pat[p] == '*' {
            star = Some((p, t));
            p += 1;
        } else if let Some((star_p, star_t)) = star {
            // Let the star consume one more character and retry.
            p = star_p + 1;
            t = star_t + 1;
            star = Some((star_p, star_t + 1));
        } else {
            return false;
        }
    }

    // Trailing stars match the empty run.
    while p < pat.len() && pat[p] == '*' {
        p += 1;
    }

    p == pat.len()
}
