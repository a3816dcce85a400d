//! Flat output filename derivation.

use url::Url;

/// Fallback name for URLs whose path has no usable final segment.
pub const FALLBACK_NAME: &str = "resource";

/// Derive the flat output filename for an asset URL: the final segment of
/// the URL's path component, or [`FALLBACK_NAME`] when there is none. Query
/// strings and fragments are ignored. Trailing slashes are stripped before
/// the segment is taken, so `/dir/` derives `dir`; only a bare root path
/// falls back.
///
/// Directory structure is deliberately not recreated, so two distinct URLs
/// sharing a basename land on the same output file and the later write wins.
pub fn derive_filename(url: &str) -> String {
    let basename = Url::parse(url)
        .ok()
        .and_then(|u| {
            u.path()
                .trim_end_matches('/')
                .rsplit('/')
                .next()
                .map(|s| s.to_string())
        })
        .unwrap_or_default();

    if basename.is_empty() {
        FALLBACK_NAME.to_string()
    } else {
        basename
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn takes_the_final_path_segment() {
        assert_eq!(derive_filename("https://a.test/css/app.css"), "app.css");
        assert_eq!(derive_filename("https://a.test/deep/x/y/z.js"), "z.js");
    }

    #[test]
    fn ignores_query_and_fragment() {
        assert_eq!(derive_filename("https://a.test/app.css?v=2"), "app.css");
        assert_eq!(derive_filename("https://a.test/app.js#main"), "app.js");
    }

    #[test]
    fn trailing_slash_paths_derive_their_directory_name() {
        assert_eq!(derive_filename("https://a.test/dir/"), "dir");
        assert_eq!(derive_filename("https://a.test/a/b/"), "b");
        assert_eq!(derive_filename("https://a.test/assets//"), "assets");
    }

    #[test]
    fn falls_back_only_on_a_bare_root_path() {
        assert_eq!(derive_filename("https://a.test"), FALLBACK_NAME);
        assert_eq!(derive_filename("https://a.test/"), FALLBACK_NAME);
        assert_eq!(derive_filename("not a url"), FALLBACK_NAME);
    }

    #[test]
    fn colliding_basenames_derive_the_same_name() {
        assert_eq!(
            derive_filename("https://a.test/x/app.css"),
            derive_filename("https://a.test/y/app.css")
        );
    }
}
