/// Characters rejected by at least one common filesystem.
const FORBIDDEN: &[char] = &['\\', '/', '*', '?', ':', '"', '<', '>', '|'];

/// Strip forbidden characters from a display name so it can be used as a
/// path segment. Spaces, dashes and all other characters (including Unicode)
/// pass through untouched, which also makes this idempotent.
///
/// A name made up entirely of forbidden characters sanitizes to the empty
/// string; callers must substitute a placeholder in that case.
pub fn sanitize(name: &str) -> String {
    name.chars().filter(|c| !FORBIDDEN.contains(c)).collect()
}
