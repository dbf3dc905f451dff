//! Avatar label derived from a participant's email address.

const FRAGMENT_DELIMITERS: [char; 3] = ['.', '-', '_'];

/// Two-letter avatar label for `email`.
///
/// Uses the local part (before `@`), split on `.`, `-` and `_`. Two or more
/// fragments give the first letter of each of the first two fragments; a
/// single fragment gives its first two characters. Collisions are fine, this
/// is only a display hint.
pub fn initials(email: &str) -> String {
    let local = email.split('@').next().unwrap_or_default();
    let fragments: Vec<&str> = local
        .split(&FRAGMENT_DELIMITERS[..])
        .filter(|fragment| !fragment.is_empty())
        .collect();

    let label: String = match fragments.as_slice() {
        [] => local.chars().take(2).collect(),
        [only] => only.chars().take(2).collect(),
        [first, second, ..] => first.chars().take(1).chain(second.chars().take(1)).collect(),
    };
    label.to_uppercase()
}
