//! Accent- and case-insensitive ordering for form option labels.
//!
//! Labels are compared through a folded key: NFKD decomposition, combining marks
//! dropped, lower-cased. Characters without a decomposition pass through as-is, so
//! folding never fails.

use std::fmt::Display;

use unicode_normalization::{UnicodeNormalization, char::is_combining_mark};

/// Build the collation key used to order a display label.
pub fn fold_key(label: &str) -> String {
    label
        .nfkd()
        .filter(|ch| !is_combining_mark(*ch))
        .flat_map(char::to_lowercase)
        .collect()
}

/// Return the options ordered by their folded keys.
///
/// Non-string values are keyed by their `Display` text. The sort is stable, so
/// labels that fold to the same key keep their input order.
pub fn sort_options<T: Display>(options: impl IntoIterator<Item = T>) -> Vec<T> {
    let mut keyed: Vec<(String, T)> = options
        .into_iter()
        .map(|option| (fold_key(&option.to_string()), option))
        .collect();
    keyed.sort_by(|(a, _), (b, _)| a.cmp(b));
    keyed.into_iter().map(|(_, option)| option).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fold_key_strips_accents_and_case() {
        assert_eq!(fold_key("Às vezes"), "as vezes");
        assert_eq!(fold_key("Sedentário"), "sedentario");
        assert_eq!(fold_key("TRANSPORTE Público"), "transporte publico");
    }

    #[test]
    fn accented_labels_sort_by_base_letter() {
        let sorted = sort_options(["Raramente", "Às vezes", "Sempre"]);
        assert_eq!(sorted, vec!["Às vezes", "Raramente", "Sempre"]);
    }

    #[test]
    fn plain_ascii_matches_lexicographic_sort() {
        let input = vec!["4+", "2", "1", "3"];
        let mut expected = input.clone();
        expected.sort();
        assert_eq!(sort_options(input), expected);
    }

    #[test]
    fn equal_keys_keep_input_order() {
        let sorted = sort_options(["Nao", "não", "NÃO", "alto"]);
        assert_eq!(sorted, vec!["alto", "Nao", "não", "NÃO"]);
    }

    #[test]
    fn non_string_values_use_display_text() {
        assert_eq!(sort_options([10, 2, 1]), vec![1, 10, 2]);
    }

    #[test]
    fn undecomposable_characters_pass_through() {
        assert_eq!(fold_key("ø→Ł"), "ø→ł");
        assert_eq!(sort_options(["ø", "a"]), vec!["a", "ø"]);
    }
}
