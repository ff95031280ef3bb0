//! # Estimador de Transições
//!
//! Conta, no corpus de treinamento:
//! - o estado da **primeira** sentença de cada review (probabilidade inicial);
//! - cada par de estados **consecutivos** dentro da mesma review (transição).
//!
//! As contagens recomeçam a cada review: transições nunca cruzam fronteiras
//! de documento.
//!
//! $$ P(s_t = j \mid s_{t-1} = i) = \frac{count(i \to j)}{\sum_k count(i \to k)} \qquad
//!    P(s_0 = i) = \frac{count_{start}(i)}{N_{reviews}} $$
//!
//! ## Esparsidade
//!
//! Pares nunca observados **não têm entrada** (não são preenchidos com zero).
//! As consultas devolvem `0.0` na ausência, o que torna o caminho
//! correspondente um ramo morto no Viterbi. A matriz de transição não é
//! suavizada.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::corpus::Review;
use crate::state::State;

/// Matriz de transição esparsa: `origem → destino → probabilidade`.
///
/// Toda linha presente soma 1.0. Estados que nunca foram origem de uma
/// transição não têm linha.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TransitionMatrix {
    rows: BTreeMap<State, BTreeMap<State, f64>>,
}

impl TransitionMatrix {
    /// $P(to \mid from)$; `0.0` para linha ou entrada ausente.
    pub fn prob(&self, from: State, to: State) -> f64 {
        self.rows
            .get(&from)
            .and_then(|row| row.get(&to))
            .copied()
            .unwrap_or(0.0)
    }

    /// Linha observada de um estado de origem, se existir.
    pub fn row(&self, from: State) -> Option<&BTreeMap<State, f64>> {
        self.rows.get(&from)
    }

    /// Constrói a matriz diretamente a partir de linhas já normalizadas.
    pub fn from_rows(rows: BTreeMap<State, BTreeMap<State, f64>>) -> Self {
        Self { rows }
    }

    pub fn rows(&self) -> impl Iterator<Item = (State, &BTreeMap<State, f64>)> {
        self.rows.iter().map(|(s, row)| (*s, row))
    }
}

/// Distribuição inicial: probabilidade de uma review começar em cada estado.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct InitialDistribution {
    probs: BTreeMap<State, f64>,
}

impl InitialDistribution {
    /// $P(s_0 = state)$; `0.0` para estados que nunca abriram uma review.
    pub fn prob(&self, state: State) -> f64 {
        self.probs.get(&state).copied().unwrap_or(0.0)
    }

    pub fn from_probs(probs: BTreeMap<State, f64>) -> Self {
        Self { probs }
    }

    pub fn iter(&self) -> impl Iterator<Item = (State, f64)> + '_ {
        self.probs.iter().map(|(s, p)| (*s, *p))
    }
}

/// Contagens brutas acumuladas durante a passada de treinamento.
///
/// As contagens são somas, então corpora fatiados podem ser contados
/// separadamente e combinados com [`TransitionCounts::merge`].
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TransitionCounts {
    transitions: BTreeMap<State, BTreeMap<State, u64>>,
    starts: BTreeMap<State, u64>,
    reviews: u64,
}

impl TransitionCounts {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registra a sequência de estados de ouro de uma review.
    /// Sequências vazias não contam como review.
    pub fn observe(&mut self, states: &[State]) {
        let Some(first) = states.first() else {
            return;
        };
        self.reviews += 1;
        *self.starts.entry(*first).or_insert(0) += 1;

        for pair in states.windows(2) {
            *self
                .transitions
                .entry(pair[0])
                .or_default()
                .entry(pair[1])
                .or_insert(0) += 1;
        }
    }

    pub fn merge(&mut self, other: TransitionCounts) {
        for (from, row) in other.transitions {
            let target = self.transitions.entry(from).or_default();
            for (to, count) in row {
                *target.entry(to).or_insert(0) += count;
            }
        }
        for (state, count) in other.starts {
            *self.starts.entry(state).or_insert(0) += count;
        }
        self.reviews += other.reviews;
    }

    /// Contagem bruta de `from → to`.
    pub fn transition_count(&self, from: State, to: State) -> u64 {
        self.transitions
            .get(&from)
            .and_then(|row| row.get(&to))
            .copied()
            .unwrap_or(0)
    }

    pub fn start_count(&self, state: State) -> u64 {
        self.starts.get(&state).copied().unwrap_or(0)
    }

    pub fn reviews(&self) -> u64 {
        self.reviews
    }

    /// Normaliza as contagens: cada linha pelo total de saídas da origem e
    /// cada início pelo número de reviews.
    pub fn normalize(&self) -> (TransitionMatrix, InitialDistribution) {
        let rows = self
            .transitions
            .iter()
            .filter_map(|(from, row)| {
                let total: u64 = row.values().sum();
                if total == 0 {
                    return None;
                }
                let probs = row
                    .iter()
                    .map(|(to, count)| (*to, *count as f64 / total as f64))
                    .collect();
                Some((*from, probs))
            })
            .collect();

        let probs = if self.reviews == 0 {
            BTreeMap::new()
        } else {
            self.starts
                .iter()
                .map(|(state, count)| (*state, *count as f64 / self.reviews as f64))
                .collect()
        };

        (TransitionMatrix { rows }, InitialDistribution { probs })
    }
}

/// Estima matriz de transição e distribuição inicial a partir das reviews rotuladas.
pub fn estimate_transitions(reviews: &[Review]) -> (TransitionMatrix, InitialDistribution) {
    let mut counts = TransitionCounts::new();
    for review in reviews {
        counts.observe(&review.gold_states());
    }
    counts.normalize()
}
