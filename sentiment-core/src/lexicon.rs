//! # Léxico de Polaridade
//!
//! Mapeia palavras subjetivas para um score de polaridade. O formato de
//! entrada é o do léxico de subjetividade MPQA: um registro por linha com
//! campos `chave=valor` separados por espaço.
//!
//! ```text
//! type=strongsubj len=1 word1=great pos1=adj stemmed1=n priorpolarity=positive
//! type=weaksubj len=1 word1=cheap pos1=adj stemmed1=n priorpolarity=negative
//! ```
//!
//! | `type`       | `polarity` | Score  |
//! |--------------|------------|--------|
//! | strongsubj   | positive   | `1.0`  |
//! | weaksubj     | positive   | `0.5`  |
//! | weaksubj     | negative   | `-0.5` |
//! | strongsubj   | negative   | `-1.0` |

use std::collections::HashMap;
use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{read_to_string, Result};

/// Polaridade de uma palavra do léxico: força (forte/fraca) × direção.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Polarity {
    StrongPositive,
    WeakPositive,
    WeakNegative,
    StrongNegative,
}

impl Polarity {
    /// Score numérico em {1.0, 0.5, -0.5, -1.0}.
    pub fn score(&self) -> f64 {
        match self {
            Polarity::StrongPositive => 1.0,
            Polarity::WeakPositive => 0.5,
            Polarity::WeakNegative => -0.5,
            Polarity::StrongNegative => -1.0,
        }
    }

    /// Multiplicador aplicado ao canal POS da emissão (o canal NEG recebe o inverso).
    ///
    /// Palavras fortemente positivas amplificam POS e atenuam NEG; as negativas
    /// fazem o contrário.
    pub fn multiplier(&self) -> f64 {
        match self {
            Polarity::StrongPositive => 2.0,
            Polarity::WeakPositive => 1.5,
            Polarity::WeakNegative => 2.0 / 3.0,
            Polarity::StrongNegative => 0.5,
        }
    }

    fn from_fields(subj_type: &str, polarity: &str) -> Option<Self> {
        match (subj_type, polarity) {
            ("strongsubj", "positive") => Some(Polarity::StrongPositive),
            ("weaksubj", "positive") => Some(Polarity::WeakPositive),
            ("weaksubj", "negative") => Some(Polarity::WeakNegative),
            ("strongsubj", "negative") => Some(Polarity::StrongNegative),
            _ => None,
        }
    }
}

/// Tabela palavra → polaridade. Imutável depois de construída.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LexiconTable {
    entries: HashMap<String, Polarity>,
}

impl LexiconTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insere (ou sobrescreve) uma palavra. A chave é normalizada para minúsculas.
    pub fn insert(&mut self, word: &str, polarity: Polarity) {
        self.entries.insert(word.to_lowercase(), polarity);
    }

    pub fn get(&self, word: &str) -> Option<Polarity> {
        self.entries.get(word).copied()
    }

    pub fn contains(&self, word: &str) -> bool {
        self.entries.contains_key(word)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Itera sobre as palavras do léxico (ordem arbitrária).
    pub fn words(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    /// Filtra os tokens que são features (palavras do léxico), preservando
    /// ordem e repetições.
    pub fn features<'a>(&self, tokens: &'a [String]) -> Vec<&'a str> {
        tokens
            .iter()
            .map(String::as_str)
            .filter(|t| self.contains(t))
            .collect()
    }
}

impl FromIterator<(String, Polarity)> for LexiconTable {
    fn from_iter<I: IntoIterator<Item = (String, Polarity)>>(iter: I) -> Self {
        let mut table = LexiconTable::new();
        for (word, polarity) in iter {
            table.insert(&word, polarity);
        }
        table
    }
}

/// Parseia o texto de um léxico no formato `word1= type= polarity=`.
///
/// Linhas sem algum dos três campos, ou com tipo/polaridade fora do esperado
/// (`neutral`, `both`), são ignoradas. Palavras repetidas: vale a última.
pub fn parse_lexicon(source: &str) -> LexiconTable {
    let mut table = LexiconTable::new();
    let mut skipped = 0usize;

    for line in source.lines() {
        if line.trim().is_empty() {
            continue;
        }

        let mut word = None;
        let mut subj_type = None;
        let mut polarity = None;
        for field in line.split_whitespace() {
            match field.split_once('=') {
                Some(("word1", v)) => word = Some(v),
                Some(("type", v)) => subj_type = Some(v),
                Some(("polarity", v)) | Some(("priorpolarity", v)) => polarity = Some(v),
                _ => {}
            }
        }

        match (word, subj_type.zip(polarity).and_then(|(t, p)| Polarity::from_fields(t, p))) {
            (Some(w), Some(p)) if !w.is_empty() => table.insert(w, p),
            _ => {
                skipped += 1;
                debug!("linha de léxico ignorada: {line}");
            }
        }
    }

    debug!("léxico carregado: {} palavras, {} linhas ignoradas", table.len(), skipped);
    table
}

/// Lê e parseia um arquivo de léxico.
pub fn parse_lexicon_file(path: impl AsRef<Path>) -> Result<LexiconTable> {
    let source = read_to_string(path.as_ref())?;
    Ok(parse_lexicon(&source))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_mpqa_lines() {
        let source = "\
type=strongsubj len=1 word1=great pos1=adj stemmed1=n priorpolarity=positive
type=weaksubj len=1 word1=nice pos1=adj stemmed1=n priorpolarity=positive
type=weaksubj len=1 word1=cheap pos1=adj stemmed1=n priorpolarity=negative
type=strongsubj len=1 word1=awful pos1=adj stemmed1=n priorpolarity=negative
";
        let lexicon = parse_lexicon(source);
        assert_eq!(lexicon.len(), 4);
        assert_eq!(lexicon.get("great"), Some(Polarity::StrongPositive));
        assert_eq!(lexicon.get("nice").map(|p| p.score()), Some(0.5));
        assert_eq!(lexicon.get("cheap").map(|p| p.score()), Some(-0.5));
        assert_eq!(lexicon.get("awful").map(|p| p.score()), Some(-1.0));
    }

    #[test]
    fn test_skips_neutral_and_malformed() {
        let source = "\
type=weaksubj len=1 word1=feel pos1=verb stemmed1=y priorpolarity=neutral
type=strongsubj len=1 word1=mixed priorpolarity=both
word1=orphan polarity=positive
garbage line

type=strongsubj word1=Superb polarity=positive
";
        let lexicon = parse_lexicon(source);
        assert_eq!(lexicon.len(), 1);
        assert!(lexicon.contains("superb"));
        assert!(!lexicon.contains("feel"));
    }

    #[test]
    fn test_last_duplicate_wins() {
        let source = "\
type=weaksubj word1=cheap polarity=positive
type=weaksubj word1=cheap polarity=negative
";
        let lexicon = parse_lexicon(source);
        assert_eq!(lexicon.get("cheap"), Some(Polarity::WeakNegative));
    }

    #[test]
    fn test_multiplier_is_inverse_symmetric() {
        assert_eq!(Polarity::StrongPositive.multiplier(), 2.0);
        assert_eq!(Polarity::StrongNegative.multiplier(), 0.5);
        let weak = Polarity::WeakPositive.multiplier() * Polarity::WeakNegative.multiplier();
        assert!((weak - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_features_keep_order_and_repeats() {
        let lexicon: LexiconTable = vec![
            ("good".to_string(), Polarity::WeakPositive),
            ("bad".to_string(), Polarity::StrongNegative),
        ]
        .into_iter()
        .collect();
        let tokens: Vec<String> = ["good", "not", "bad", "good"].iter().map(|s| s.to_string()).collect();
        assert_eq!(lexicon.features(&tokens), vec!["good", "bad", "good"]);
    }

    #[test]
    fn test_missing_file_is_io_error() {
        let err = parse_lexicon_file("/nonexistent/lexicon.tff").unwrap_err();
        assert!(matches!(err, crate::error::SentimentError::Io { .. }));
    }
}
