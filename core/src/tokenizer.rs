use lazy_static::lazy_static;
use rust_stemmers::{Algorithm, Stemmer};
use unicode_normalization::UnicodeNormalization;

lazy_static! {
    static ref STEMMER: Stemmer = Stemmer::create(Algorithm::English);
}

// Snowball output converges within a few passes; the bound is only a backstop.
const MAX_STEM_PASSES: usize = 8;

/// Tokenize text into stemmed terms using NFKC normalization, lowercasing and
/// removal of ASCII punctuation.
///
/// Punctuation is deleted rather than treated as a separator, so `don't`
/// becomes `dont` and `e-mail` becomes `email`. Words without any alphabetic
/// character are dropped. Each word is stemmed until the stem stops changing
/// (`agreed` -> `agre` -> `agr`), so re-tokenizing already-normalized terms
/// yields the same terms. Index build and query parsing both go through this
/// function; there is no other normalization path.
pub fn tokenize(text: &str) -> Vec<String> {
    let normalized = text.nfkc().collect::<String>().to_lowercase();
    let stripped: String = normalized.chars().filter(|c| !c.is_ascii_punctuation()).collect();
    stripped
        .split_whitespace()
        .filter(|word| word.chars().any(char::is_alphabetic))
        .map(stem)
        .collect()
}

fn stem(word: &str) -> String {
    let mut current = word.to_string();
    for _ in 0..MAX_STEM_PASSES {
        let next = STEMMER.stem(&current);
        if next == current.as_str() {
            break;
        }
        current = next.into_owned();
    }
    current
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn basic_tokenize() {
        let t = tokenize("Running, runner's run!");
        assert!(t.iter().any(|w| w == "run"));
    }

    #[test]
    fn punctuation_is_removed_not_split() {
        assert_eq!(tokenize("don't"), vec!["dont".to_string()]);
        assert_eq!(tokenize("(fox)"), vec!["fox".to_string()]);
    }

    #[test]
    fn no_alphabetic_content_is_empty() {
        assert!(tokenize("").is_empty());
        assert!(tokenize("   \n\t").is_empty());
        assert!(tokenize("!!! ... 123 -- 42").is_empty());
    }

    #[test]
    fn stems_to_a_fixed_point() {
        assert_eq!(tokenize("agreed"), vec!["agr".to_string()]);
        assert_eq!(tokenize("agr"), vec!["agr".to_string()]);
    }

    #[test]
    fn keeps_order_and_duplicates() {
        assert_eq!(tokenize("dog cat dog"), vec!["dog", "cat", "dog"]);
    }
}
