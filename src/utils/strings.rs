use std::path::Path;

/// Cleans up a raw file or folder name into a display title
///
/// `-` and `_` become spaces, the first letter of every word is capitalised and trademark
/// symbols are dropped, e.g. `dark_souls-remastered™` becomes `Dark Souls Remastered`.
pub fn clean_game_title(title: impl AsRef<str>) -> String {
    let spaced = title.as_ref().replace(['™', '®'], "").replace(['-', '_'], " ");
    capitalise_words(&spaced).trim().to_owned()
}

/// Upper-cases every alphanumeric character which starts a word
fn capitalise_words(input: &str) -> String {
    let mut output = String::with_capacity(input.len());
    let mut in_word = false;

    for c in input.chars() {
        let is_word_char = c.is_alphanumeric();
        if is_word_char && !in_word {
            output.extend(c.to_uppercase());
        } else {
            output.push(c);
        }
        in_word = is_word_char;
    }

    output
}

/// Lower-cased copy of the input with everything but ASCII letters and digits removed
pub fn alphanumeric_lowercase(input: impl AsRef<str>) -> String {
    input
        .as_ref()
        .chars()
        .filter(char::is_ascii_alphanumeric)
        .map(|c| c.to_ascii_lowercase())
        .collect()
}

/// Makes a name safe to use as a file stem, replacing every non-alphanumeric character with `_`
pub fn sanitise_file_stem(name: impl AsRef<str>) -> String {
    name.as_ref()
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() { c } else { '_' })
        .collect()
}

/// Lower-cased path string using `/` as the only separator, so path fragments can be matched
/// the same way whichever platform the path came from
pub fn normalise_path(path: &Path) -> String {
    path.to_string_lossy().to_lowercase().replace('\\', "/")
}
