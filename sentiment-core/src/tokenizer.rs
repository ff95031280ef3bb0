//! # Tokenizador de Sentenças
//!
//! Normalização usada tanto no treinamento quanto na inferência, para que as
//! contagens do léxico e as emissões vejam exatamente os mesmos tokens:
//!
//! 1. Pontuação `( ) , ! . ? ; :` recebe espaços ao redor (vira token próprio).
//! 2. Tudo em minúsculas.
//! 3. Divisão por espaços em branco.
//!
//! ## Exemplo de Uso
//!
//! ```rust
//! use sentiment_core::tokenizer::tokenize;
//!
//! let tokens = tokenize("Great phone, BAD battery!");
//! assert_eq!(tokens, vec!["great", "phone", ",", "bad", "battery", "!"]);
//! ```

use std::sync::OnceLock;

use regex::Regex;
use unicode_segmentation::UnicodeSegmentation;

fn punctuation() -> &'static Regex {
    static PUNCTUATION: OnceLock<Regex> = OnceLock::new();
    PUNCTUATION.get_or_init(|| Regex::new(r"([(),!.?;:])").expect("regex de pontuação válida"))
}

/// Normaliza e tokeniza uma sentença.
pub fn tokenize(sentence: &str) -> Vec<String> {
    let padded = punctuation().replace_all(sentence, " $1 ");
    padded
        .to_lowercase()
        .split_whitespace()
        .map(str::to_string)
        .collect()
}

/// Divide o texto livre de uma review em sentenças.
///
/// Usa as fronteiras de sentença do Unicode (UAX #29). Pedaços vazios são
/// descartados e cada sentença é aparada.
pub fn split_sentences(text: &str) -> Vec<String> {
    text.unicode_sentences()
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_punctuation_becomes_tokens() {
        let tokens = tokenize("It works (mostly).");
        assert_eq!(tokens, vec!["it", "works", "(", "mostly", ")", "."]);
    }

    #[test]
    fn test_lowercase_and_whitespace() {
        let tokens = tokenize("  This   is GREAT\tstuff ");
        assert_eq!(tokens, vec!["this", "is", "great", "stuff"]);
    }

    #[test]
    fn test_empty_sentence() {
        assert!(tokenize("").is_empty());
        assert!(tokenize("   ").is_empty());
    }

    #[test]
    fn test_split_sentences() {
        let sentences = split_sentences("I love it. The case is cheap! Would I buy again?");
        assert_eq!(sentences.len(), 3);
        assert_eq!(sentences[0], "I love it.");
        assert_eq!(sentences[2], "Would I buy again?");
    }
}
