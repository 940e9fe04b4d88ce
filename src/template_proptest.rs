//! Property-based tests for accessor identifier derivation.
//!
//! These tests generate query file stems and check that the derived Swift
//! identifiers stay well-formed.

#[cfg(test)]
mod proptest_tests {
    use crate::template::{accessor_declaration, accessor_identifier, render_accessor_listing};
    use proptest::prelude::*;

    proptest! {
        /// Property: identifiers never contain the `-` separator
        #[test]
        fn accessor_identifier_has_no_dashes(stem in "[a-zA-Z0-9-]*") {
            prop_assert!(!accessor_identifier(&stem).contains('-'));
        }

        /// Property: single-segment stems are simply lower-cased
        #[test]
        fn accessor_identifier_single_segment_is_lowercased(stem in "[a-zA-Z0-9_]+") {
            prop_assert_eq!(accessor_identifier(&stem), stem.to_lowercase());
        }

        /// Property: the identifier keeps every non-separator character
        #[test]
        fn accessor_identifier_preserves_letters(stem in "[a-z]{1,8}(-[a-z]{1,8}){0,4}") {
            let identifier = accessor_identifier(&stem);
            prop_assert_eq!(identifier.to_lowercase(), stem.replace('-', ""));
        }

        /// Property: each segment after the first starts with an upper-case letter
        #[test]
        fn accessor_identifier_is_camel_case(segments in prop::collection::vec("[a-z]{1,6}", 1..5)) {
            let identifier = accessor_identifier(&segments.join("-"));
            let upper = identifier.chars().filter(|c| c.is_ascii_uppercase()).count();
            prop_assert_eq!(upper, segments.len() - 1);
            prop_assert!(identifier.starts_with(segments[0].as_str()));
        }

        /// Property: the declaration names the file by its original stem
        #[test]
        fn accessor_declaration_references_stem(stem in "[a-z]{1,8}(-[a-z]{1,8}){0,3}") {
            let declaration = accessor_declaration(&stem);
            let expected = format!("url(named: \"{}\")", stem);
            prop_assert!(declaration.contains(&expected));
        }

        /// Property: one declaration per `.scm` file, none for anything else
        #[test]
        fn accessor_listing_counts_query_files(
            queries in prop::collection::btree_set("[a-z]{1,8}", 0..6),
            others in prop::collection::btree_set("[a-z]{1,8}\\.(md|txt|js)", 0..4),
        ) {
            let filenames: Vec<String> = queries
                .iter()
                .map(|q| format!("{}.scm", q))
                .chain(others.iter().cloned())
                .collect();

            let rendered = render_accessor_listing("{{SOURCE}}", &filenames).unwrap();
            prop_assert_eq!(rendered.matches(": URL {").count(), queries.len());
        }
    }
}
