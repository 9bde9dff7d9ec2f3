/// Canonicalize a title into the key used for fuzzy comparison.
///
/// Lower-cases, turns hyphens into spaces, drops apostrophes and question
/// marks, then folds every run of non-alphanumeric characters into a single
/// space and trims. The result is never shown to the user.
pub fn normalize_title(title: &str) -> String {
    let title = title
        .to_lowercase()
        .replace('-', " ")
        .replace('\'', "")
        .replace('?', "");

    let mut folded = String::with_capacity(title.len());
    let mut in_gap = false;
    for ch in title.chars() {
        if ch.is_alphanumeric() {
            folded.push(ch);
            in_gap = false;
        } else if !in_gap {
            folded.push(' ');
            in_gap = true;
        }
    }

    folded.split_whitespace().collect::<Vec<_>>().join(" ")
}
