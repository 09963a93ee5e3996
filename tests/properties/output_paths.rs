//! Property tests for source matching and output path mapping.

use std::path::{Path, PathBuf};

use proptest::prelude::*;

use stylepipe::source::{destination_for, SourceGlob};

fn segment() -> impl Strategy<Value = String> {
    proptest::string::string_regex("[a-z0-9_-]{1,8}").unwrap()
}

fn relative_dir() -> impl Strategy<Value = Vec<String>> {
    proptest::collection::vec(segment(), 0..=3)
}

proptest! {
    #![proptest_config(ProptestConfig {
        cases: 128,
        .. ProptestConfig::default()
    })]

    /// PROPERTY: Outputs mirror the source's directory below the destination
    /// and only the extension changes.
    #[test]
    fn property_destination_mirrors_relative_path(
        dirs in relative_dir(),
        stem in segment(),
        ext in prop_oneof![Just("css"), Just("min.css")],
    ) {
        let mut relative = PathBuf::new();
        for dir in &dirs {
            relative.push(dir);
        }
        relative.push(format!("{stem}.scss"));

        let dest = Path::new("/site/static/css");
        let output = destination_for(dest, &relative, ext);

        let below = output.strip_prefix(dest).unwrap();
        prop_assert_eq!(below.parent(), relative.parent());
        prop_assert_eq!(below.file_name().unwrap().to_string_lossy(), format!("{stem}.{ext}"));
    }

    /// PROPERTY: Any `.scss` file below the glob root matches, and its
    /// relative path is exactly the part below the root.
    #[test]
    fn property_glob_matches_nested_scss(
        dirs in relative_dir(),
        stem in segment(),
    ) {
        let glob = SourceGlob::new("./src/sass/**/*.scss").unwrap().anchored(Path::new("/project"));

        let mut relative = PathBuf::new();
        for dir in &dirs {
            relative.push(dir);
        }
        relative.push(format!("{stem}.scss"));
        let path = Path::new("/project/src/sass").join(&relative);

        prop_assert!(glob.matches(&path));
        prop_assert_eq!(glob.relative_path(&path), Some(relative));
    }

    /// PROPERTY: Files with another extension never match.
    #[test]
    fn property_glob_rejects_other_extensions(
        dirs in relative_dir(),
        stem in segment(),
        ext in prop_oneof![Just("css"), Just("sass"), Just("scss.bak"), Just("txt")],
    ) {
        let glob = SourceGlob::new("./src/sass/**/*.scss").unwrap().anchored(Path::new("/project"));

        let mut path = PathBuf::from("/project/src/sass");
        for dir in &dirs {
            path.push(dir);
        }
        path.push(format!("{stem}.{ext}"));

        prop_assert!(!glob.matches(&path));
    }
}
