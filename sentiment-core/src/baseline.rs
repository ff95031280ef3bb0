//! # Rotulador Baseline: Soma de Polaridades com Limiar
//!
//! Classificador de referência, sem aprendizado e sem contexto: cada sentença
//! é rotulada isoladamente pela soma dos scores do léxico.
//!
//! ## Algoritmo
//!
//! 1. Todo caractere que não é letra ASCII vira espaço; o texto vai para minúsculas.
//! 2. Soma os scores das `n` palavras encontradas no léxico.
//! 3. Decide com um limiar **por feature** `t`:
//!
//! ```text
//! n = 0            → NEU
//! score ≥  n · t   → POS
//! score ≤ -n · t   → NEG
//! caso contrário   → NEU
//! ```
//!
//! Como o limiar escala com `n`, a regra equivale a comparar a **média** das
//! polaridades com `t`: uma sentença com uma palavra forte e uma fraca de
//! sinais opostos (média 0.25) fica neutra.

use serde::{Deserialize, Serialize};

use crate::corpus::Review;
use crate::lexicon::LexiconTable;
use crate::state::State;

/// Resultado do baseline para uma sentença.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BaselineDecision {
    pub state: State,
    /// Soma dos scores das features.
    pub score: f64,
    /// Número de features (com repetições).
    pub num_features: usize,
}

/// Rotulador por limiar sobre a soma das polaridades.
#[derive(Debug, Clone, Copy)]
pub struct BaselineTagger<'a> {
    lexicon: &'a LexiconTable,
    threshold: f64,
}

impl<'a> BaselineTagger<'a> {
    pub fn new(lexicon: &'a LexiconTable, threshold: f64) -> Self {
        Self { lexicon, threshold }
    }

    /// Classifica uma sentença crua.
    pub fn decide(&self, sentence: &str) -> BaselineDecision {
        let cleaned: String = sentence
            .chars()
            .map(|c| if c.is_ascii_alphabetic() { c.to_ascii_lowercase() } else { ' ' })
            .collect();

        let mut score = 0.0;
        let mut num_features = 0usize;
        for word in cleaned.split_whitespace() {
            if let Some(polarity) = self.lexicon.get(word) {
                score += polarity.score();
                num_features += 1;
            }
        }

        let n = num_features as f64;
        let state = if num_features == 0 {
            State::Neu
        } else if score >= n * self.threshold {
            State::Pos
        } else if score <= -n * self.threshold {
            State::Neg
        } else {
            State::Neu
        };

        BaselineDecision {
            state,
            score,
            num_features,
        }
    }

    pub fn tag_sentence(&self, sentence: &str) -> State {
        self.decide(sentence).state
    }

    /// Rotula todas as sentenças de uma review. O rótulo do documento é ignorado.
    pub fn tag_review(&self, review: &Review) -> Vec<State> {
        review
            .sentences
            .iter()
            .map(|s| self.tag_sentence(&s.text))
            .collect()
    }
}
