//! Headline casing for model type names
//!
//! `blog_post`, `blog-post`, `BlogPost` and `app::models::BlogPost` all
//! become "Blog Post".

/// Convert a type name into a human-readable, headline-cased label
///
/// A run of capitals stays one word: `HTTPRequestLog` reads
/// "Http Request Log", not "H T T P Request Log".
pub fn headline(type_name: &str) -> String {
    let base = type_name
        .rsplit(|c: char| c == ':' || c == '\\' || c == '/')
        .next()
        .unwrap_or(type_name);

    split_words(base)
        .iter()
        .map(|word| title_case(word))
        .collect::<Vec<_>>()
        .join(" ")
}

fn split_words(input: &str) -> Vec<String> {
    let chars: Vec<char> = input.chars().collect();
    let mut words = Vec::new();
    let mut current = String::new();

    for (i, &c) in chars.iter().enumerate() {
        if c == '_' || c == '-' || c.is_whitespace() {
            if !current.is_empty() {
                words.push(std::mem::take(&mut current));
            }
            continue;
        }

        if c.is_uppercase() && !current.is_empty() {
            let prev = chars[i - 1];
            let next_is_lower = chars.get(i + 1).is_some_and(|n| n.is_lowercase());
            // camelCase boundary, or the last capital of an acronym ("HTTPRequest")
            if prev.is_lowercase() || prev.is_ascii_digit() || (prev.is_uppercase() && next_is_lower)
            {
                words.push(std::mem::take(&mut current));
            }
        }

        current.push(c);
    }

    if !current.is_empty() {
        words.push(current);
    }

    words
}

fn title_case(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first
            .to_uppercase()
            .chain(chars.flat_map(char::to_lowercase))
            .collect(),
        None => String::new(),
    }
}
