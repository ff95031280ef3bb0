//! # Modelo de Emissão
//!
//! Para cada sentença, produz um vetor não-normalizado de verossimilhanças
//! `[POS, NEU, NEG]`: o quão provável é observar as features da sentença
//! dado cada estado.
//!
//! ## Algoritmo
//!
//! 1. Tokeniza a sentença (pontuação separada, minúsculas).
//! 2. Features = tokens presentes no léxico. Sem features → `[0, 1, 0]`.
//! 3. Para cada feature `w`, com multiplicador de polaridade `m(w)` e
//!    multiplicador do documento `d`:
//!
//! ```text
//! POS *= P_pos(w) · m(w) · d
//! NEU *= P_neu(w)
//! NEG *= P_neg(w) · (1 / m(w)) · (1 / d)
//! ```
//!
//! 4. Desconto de comprimento no canal neutro:
//!    `NEU *= NEUTRAL_INIT / (NEUTRAL_INIT + num_features)`. Quanto mais
//!    palavras opinativas, menos provável a leitura neutra.
//!
//! O vetor não é normalizado: o Viterbi só usa as magnitudes relativas.

use serde::{Deserialize, Serialize};

use crate::config::TaggerConfig;
use crate::lexicon::{LexiconTable, Polarity};
use crate::smoothing::FeatureTables;
use crate::state::State;
use crate::tokenizer::tokenize;

/// Constante padrão do desconto de comprimento do canal neutro.
pub const NEUTRAL_INIT: f64 = 3.0;

/// Verossimilhanças por estado de uma sentença, indexadas por [`State::index`].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct EmissionVector(pub [f64; State::COUNT]);

impl EmissionVector {
    /// Vetor fixo para sentenças sem nenhuma palavra do léxico.
    pub const NEUTRAL: EmissionVector = EmissionVector([0.0, 1.0, 0.0]);

    pub fn get(&self, state: State) -> f64 {
        self.0[state.index()]
    }

    /// Estado de maior verossimilhança (empate → menor índice).
    pub fn best(&self) -> State {
        let mut best = 0;
        for i in 1..State::COUNT {
            if self.0[best] < self.0[i] {
                best = i;
            }
        }
        State::from_index(best).unwrap_or(State::Pos)
    }
}

/// Multiplicador do prior do documento aplicado ao canal POS (NEG recebe o inverso).
///
/// O sentimento do documento puxa as emissões das sentenças na mesma direção:
/// POS → 1.5, NEU → 1.0, NEG → 2/3.
pub fn document_multiplier(doc_label: State) -> f64 {
    match doc_label {
        State::Pos => 1.5,
        State::Neu => 1.0,
        State::Neg => 2.0 / 3.0,
    }
}

/// Resultado da emissão de uma sentença, com as features que a explicam.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SentenceEmission {
    /// Features na ordem em que aparecem (com repetições) e suas polaridades.
    pub features: Vec<(String, Polarity)>,
    pub vector: EmissionVector,
}

/// Calcula vetores de emissão a partir das tabelas suavizadas e do léxico.
///
/// Apenas empresta as tabelas treinadas: é barato criar um por review.
#[derive(Debug, Clone, Copy)]
pub struct EmissionModel<'a> {
    tables: &'a FeatureTables,
    lexicon: &'a LexiconTable,
    neutral_init: f64,
    polarity_weighting: bool,
    document_prior: bool,
}

impl<'a> EmissionModel<'a> {
    pub fn new(tables: &'a FeatureTables, lexicon: &'a LexiconTable) -> Self {
        Self::with_config(tables, lexicon, &TaggerConfig::default())
    }

    pub fn with_config(tables: &'a FeatureTables, lexicon: &'a LexiconTable, config: &TaggerConfig) -> Self {
        Self {
            tables,
            lexicon,
            neutral_init: config.neutral_init,
            polarity_weighting: config.polarity_weighting,
            document_prior: config.document_prior,
        }
    }

    fn polarity_multiplier(&self, polarity: Polarity) -> f64 {
        if self.polarity_weighting {
            polarity.multiplier()
        } else {
            1.0
        }
    }

    /// Multiplicador do documento efetivo (1.0 se o prior estiver desligado).
    pub fn doc_multiplier(&self, doc_label: State) -> f64 {
        if self.document_prior {
            document_multiplier(doc_label)
        } else {
            1.0
        }
    }

    /// Emissão de uma sentença crua de uma review com rótulo `doc_label`.
    pub fn emit(&self, sentence: &str, doc_label: State) -> SentenceEmission {
        let tokens = tokenize(sentence);
        self.emit_tokens(&tokens, self.doc_multiplier(doc_label))
    }

    /// Emissão de uma sentença já tokenizada, com multiplicador de documento explícito.
    pub fn emit_tokens(&self, tokens: &[String], doc_multiplier: f64) -> SentenceEmission {
        let features: Vec<(String, Polarity)> = self
            .lexicon
            .features(tokens)
            .into_iter()
            .filter_map(|w| self.lexicon.get(w).map(|p| (w.to_string(), p)))
            .collect();

        if features.is_empty() {
            return SentenceEmission {
                features,
                vector: EmissionVector::NEUTRAL,
            };
        }

        let mut probs = [1.0f64; State::COUNT];
        for (word, polarity) in &features {
            let m = self.polarity_multiplier(*polarity);
            probs[State::Pos.index()] *= self.tables.prob(State::Pos, word) * m * doc_multiplier;
            probs[State::Neu.index()] *= self.tables.prob(State::Neu, word);
            probs[State::Neg.index()] *= self.tables.prob(State::Neg, word) * (1.0 / m) * (1.0 / doc_multiplier);
        }
        probs[State::Neu.index()] *= self.neutral_init / (self.neutral_init + features.len() as f64);

        SentenceEmission {
            features,
            vector: EmissionVector(probs),
        }
    }

    /// Vetores de emissão de todas as sentenças de uma review, em ordem.
    pub fn emit_review<S: AsRef<str>>(&self, sentences: &[S], doc_label: State) -> Vec<EmissionVector> {
        sentences
            .iter()
            .map(|s| self.emit(s.as_ref(), doc_label).vector)
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;
    use crate::smoothing::FeatureProbabilityTable;

    fn table(pairs: &[(&str, f64)]) -> FeatureProbabilityTable {
        FeatureProbabilityTable::from_probs(pairs.iter().map(|(w, p)| (w.to_string(), *p)).collect::<HashMap<_, _>>())
    }

    fn fixture() -> (FeatureTables, LexiconTable) {
        let lexicon: LexiconTable = vec![
            ("great".to_string(), Polarity::StrongPositive),
            ("bad".to_string(), Polarity::StrongNegative),
        ]
        .into_iter()
        .collect();
        // Tabelas idênticas: qualquer diferença vem dos multiplicadores
        let tables = FeatureTables::new(
            table(&[("great", 0.5), ("bad", 0.5)]),
            table(&[("great", 0.5), ("bad", 0.5)]),
            table(&[("great", 0.5), ("bad", 0.5)]),
        );
        (tables, lexicon)
    }

    #[test]
    fn test_no_features_is_neutral() {
        let (tables, lexicon) = fixture();
        let model = EmissionModel::new(&tables, &lexicon);
        let emission = model.emit("the box arrived on tuesday .", State::Pos);
        assert!(emission.features.is_empty());
        assert_eq!(emission.vector, EmissionVector::NEUTRAL);
    }

    #[test]
    fn test_positive_word_in_positive_review() {
        let (tables, lexicon) = fixture();
        let model = EmissionModel::new(&tables, &lexicon);
        let v = model.emit("this is great", State::Pos).vector;
        assert!(v.get(State::Pos) > v.get(State::Neg));

        // POS = 0.5 · 2.0 · 1.5 ; NEG = 0.5 · 0.5 · (2/3) ; NEU = 0.5 · 3/4
        assert!((v.get(State::Pos) - 1.5).abs() < 1e-12);
        assert!((v.get(State::Neg) - 0.5 * 0.5 / 1.5).abs() < 1e-12);
        assert!((v.get(State::Neu) - 0.375).abs() < 1e-12);
    }

    #[test]
    fn test_document_prior_biases_toward_agreement() {
        let (tables, lexicon) = fixture();
        let model = EmissionModel::new(&tables, &lexicon);
        let in_pos = model.emit("great but bad", State::Pos).vector;
        let in_neg = model.emit("great but bad", State::Neg).vector;
        let in_neu = model.emit("great but bad", State::Neu).vector;
        assert!(in_pos.get(State::Pos) > in_neg.get(State::Pos));
        assert!(in_neg.get(State::Neg) > in_pos.get(State::Neg));
        // Polaridades opostas se cancelam; com documento neutro POS == NEG
        assert!((in_neu.get(State::Pos) - in_neu.get(State::Neg)).abs() < 1e-12);
    }

    #[test]
    fn test_neutral_length_discount() {
        let (tables, lexicon) = fixture();
        let model = EmissionModel::new(&tables, &lexicon);
        let tokens: Vec<String> = ["great", "great", "bad"].iter().map(|s| s.to_string()).collect();
        let emission = model.emit_tokens(&tokens, 1.0);
        assert_eq!(emission.features.len(), 3);
        let expected = 0.5f64.powi(3) * 3.0 / 6.0;
        assert!((emission.vector.get(State::Neu) - expected).abs() < 1e-12);
    }

    #[test]
    fn test_config_switches_disable_multipliers() {
        let (tables, lexicon) = fixture();
        let config = TaggerConfig {
            polarity_weighting: false,
            document_prior: false,
            ..TaggerConfig::default()
        };
        let model = EmissionModel::with_config(&tables, &lexicon, &config);
        let v = model.emit("great", State::Pos).vector;
        assert!((v.get(State::Pos) - v.get(State::Neg)).abs() < 1e-12);
    }

    #[test]
    fn test_emit_review_keeps_sentence_order() {
        let (tables, lexicon) = fixture();
        let model = EmissionModel::new(&tables, &lexicon);
        let vectors = model.emit_review(&["great .", "no opinion here .", "bad ."], State::Neu);
        assert_eq!(vectors.len(), 3);
        assert!(vectors[0].get(State::Pos) > vectors[0].get(State::Neg));
        assert_eq!(vectors[1], EmissionVector::NEUTRAL);
        assert!(vectors[2].get(State::Neg) > vectors[2].get(State::Pos));
        assert_eq!(vectors[0], model.emit("great .", State::Neu).vector);
    }

    #[test]
    fn test_best_tie_breaks_to_lowest_index() {
        assert_eq!(EmissionVector([0.2, 0.2, 0.1]).best(), State::Pos);
        assert_eq!(EmissionVector([0.1, 0.3, 0.3]).best(), State::Neu);
        assert_eq!(EmissionVector::NEUTRAL.best(), State::Neu);
    }
}
