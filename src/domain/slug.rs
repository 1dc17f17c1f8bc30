/// Derive a URL slug from a title: lowercase ASCII alphanumerics, runs of
/// everything else collapsed to single dashes.
pub fn slugify(title: &str) -> String {
    let mut slug = String::with_capacity(title.len());
    let mut pending_dash = false;
    for c in title.chars() {
        if c.is_ascii_alphanumeric() {
            if pending_dash && !slug.is_empty() {
                slug.push('-');
            }
            pending_dash = false;
            slug.extend(c.to_lowercase());
        } else {
            pending_dash = true;
        }
    }
    slug
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lowercases_and_dashes() {
        assert_eq!(slugify("Summer Menu 2025"), "summer-menu-2025");
    }

    #[test]
    fn punctuation_collapses_to_single_dash() {
        assert_eq!(slugify("Pho -- the real deal!"), "pho-the-real-deal");
    }

    #[test]
    fn leading_and_trailing_noise_is_trimmed() {
        assert_eq!(slugify("  ...Hello, World...  "), "hello-world");
    }

    #[test]
    fn non_ascii_titles_can_produce_empty_slugs() {
        assert_eq!(slugify("Phở bò"), "ph-b");
        assert_eq!(slugify("---"), "");
    }
}
