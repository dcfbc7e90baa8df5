//! Identifier derivation for generated arrays.

/// Turns an arbitrary relative path into a C identifier fragment.
///
/// Every character outside `[0-9A-Za-z_]` becomes `_`, and a leading digit
/// gets one `_` in front. Distinct inputs may map to the same output
/// (`a-b.js` and `a_b.js`); callers that need unique names must check.
#[must_use]
pub fn sanitize_symbol(name: &str) -> String {
    let mut cleaned: String = name
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() || c == '_' { c } else { '_' })
        .collect();
    if cleaned.starts_with(|c: char| c.is_ascii_digit()) {
        cleaned.insert(0, '_');
    }
    cleaned
}

/// Flattens a bundled-client file name (`rfb.js` -> `rfbjs`).
///
/// `.` and `-` are dropped; anything else that would not be a valid identifier
/// character goes through [`sanitize_symbol`].
#[must_use]
pub fn client_symbol(file_name: &str) -> String {
    let flat: String = file_name.chars().filter(|c| !matches!(c, '.' | '-')).collect();
    sanitize_symbol(&flat)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn is_identifier(s: &str) -> bool {
        let mut chars = s.chars();
        chars
            .next()
            .is_some_and(|c| c.is_ascii_alphabetic() || c == '_')
            && chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
    }

    #[test]
    fn replaces_separators_and_dots() {
        assert_eq!(sanitize_symbol("assets/app.js"), "assets_app_js");
        assert_eq!(sanitize_symbol("index.html"), "index_html");
        assert_eq!(sanitize_symbol("fonts/Inter-Bold.woff2"), "fonts_Inter_Bold_woff2");
    }

    #[test]
    fn prefixes_leading_digit() {
        assert_eq!(sanitize_symbol("404.html"), "_404_html");
        assert_eq!(sanitize_symbol("_404"), "_404");
    }

    #[test]
    fn handles_non_ascii_and_empty() {
        assert_eq!(sanitize_symbol("é.png"), "__png");
        assert_eq!(sanitize_symbol(""), "");
    }

    #[test]
    fn output_is_an_identifier() {
        for input in [
            "index.html",
            "assets/index-4f2a9c.js",
            "9lives/x y.css",
            "..//weird path!.svg",
            "über/straße.txt",
        ] {
            let out = sanitize_symbol(input);
            assert!(is_identifier(&out), "{input:?} -> {out:?}");
        }
    }

    #[test]
    fn idempotent() {
        for input in ["assets/app.js", "1.css", "a-b_c", "x"] {
            let once = sanitize_symbol(input);
            assert_eq!(sanitize_symbol(&once), once);
        }
    }

    #[test]
    fn collisions_are_possible() {
        assert_eq!(sanitize_symbol("a-b.js"), sanitize_symbol("a_b.js"));
    }

    #[test]
    fn client_names_drop_dots_and_dashes() {
        assert_eq!(client_symbol("rfb.js"), "rfbjs");
        assert_eq!(client_symbol("vnc-lite.html"), "vnclitehtml");
        assert_eq!(client_symbol("base64.js"), "base64js");
        assert_eq!(client_symbol("3d.png"), "_3dpng");
        assert_eq!(client_symbol("a b.css"), "a_bcss");
    }
}
