//! URL-safe slugs derived from event titles.

/// Derives the slug for `title`.
///
/// The title is lower-cased and trimmed, every maximal run of characters
/// outside `[a-z0-9]` becomes a single `-`, and leading or trailing hyphens
/// are dropped. Titles made only of such characters yield an empty slug.
#[must_use]
pub fn generate_slug(title: &str) -> String {
    let lowered = title.to_lowercase();
    let mut slug = String::with_capacity(lowered.len());
    let mut pending_hyphen = false;

    for c in lowered.trim().chars() {
        if c.is_ascii_lowercase() || c.is_ascii_digit() {
            if pending_hyphen && !slug.is_empty() {
                slug.push('-');
            }
            pending_hyphen = false;
            slug.push(c);
        } else {
            pending_hyphen = true;
        }
    }

    slug
}

/// Returns `true` if `slug` could have come out of [`generate_slug`].
#[must_use]
pub fn is_valid_slug(slug: &str) -> bool {
    !slug.is_empty()
        && !slug.starts_with('-')
        && !slug.ends_with('-')
        && !slug.contains("--")
        && slug
            .chars()
            .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '-')
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn basic_title() {
        assert_eq!(generate_slug("React Summit 2026"), "react-summit-2026");
    }

    #[test]
    fn collapses_runs_and_strips_edges() {
        assert_eq!(generate_slug("  --Rust & WebAssembly!!  Meetup--  "), "rust-webassembly-meetup");
        assert_eq!(generate_slug("a...b"), "a-b");
    }

    #[test]
    fn non_ascii_letters_become_separators() {
        assert_eq!(generate_slug("Café Ünïcode Day"), "caf-n-code-day");
    }

    #[test]
    fn all_punctuation_gives_empty_slug() {
        assert_eq!(generate_slug("!!! ???"), "");
        assert!(!is_valid_slug(""));
    }

    #[test]
    fn deterministic_for_same_title() {
        let titles = [
            "JSConf Asia",
            "  Hack // Night ",
            "Next.js Conf 2026: The Future",
            "ÅÄÖ",
            "x",
        ];
        for title in titles {
            assert_eq!(generate_slug(title), generate_slug(title));
        }
    }

    #[test]
    fn output_shape_holds_for_assorted_titles() {
        let titles = [
            "Cloud Native Days",
            "__init__ talk",
            "DevFest -- 2026 -- Berlin",
            "AI/ML Summit (Hybrid)",
            "9am Coffee & Code",
            "  trailing punctuation...",
        ];
        for title in titles {
            let slug = generate_slug(title);
            assert!(is_valid_slug(&slug), "{title:?} produced {slug:?}");
        }
    }
}
