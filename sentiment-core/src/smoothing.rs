//! # Suavização Good-Turing (variante de Katz)
//!
//! Converte contagens brutas de features (palavras do léxico) por estado em
//! tabelas de probabilidade $P(w \mid s)$, realocando massa de palavras
//! frequentes para palavras raras ou nunca vistas naquele estado.
//!
//! ## Algoritmo
//!
//! ```text
//! N[r]  = número de palavras com contagem bruta r      (r = 0..k+1)
//! c*[0] = N[1]
//! c*[r] = [ (r+1)·N[r+1]/N[r] − r·(k+1)·N[r+1]/N[r] ] / [ 1 − (k+1)·N[r+1]/N[r] ]   (r = 1..k)
//! contagens > k ficam como estão
//! P(w)  = c*(w) / Σ c*
//! ```
//!
//! Todo divisor é verificado: se `N[r]` ou o denominador de Katz for zero, ou
//! se o resultado não for finito e não-negativo, o bucket recai na contagem
//! bruta `r`.
//!
//! Consequência do estimador: o maior bucket `r ≤ k` com `N[r+1] = 0` recebe
//! `c*[r] = 0`, então as palavras mais frequentes de um estado podem ficar com
//! probabilidade zero nesse mesmo estado. É o comportamento da fórmula, não
//! um erro de implementação.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::lexicon::LexiconTable;
use crate::state::State;

/// Tabela de probabilidades $P(w \mid s)$ de um estado.
///
/// Os valores somam 1.0 sobre todo o vocabulário (incluindo a massa
/// realocada para palavras de contagem zero) e são todos não-negativos.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FeatureProbabilityTable {
    probs: HashMap<String, f64>,
}

impl FeatureProbabilityTable {
    /// Constrói a tabela a partir de probabilidades já normalizadas.
    pub fn from_probs(probs: HashMap<String, f64>) -> Self {
        Self { probs }
    }

    /// $P(w \mid s)$; `0.0` para palavras fora do vocabulário.
    pub fn prob(&self, word: &str) -> f64 {
        self.probs.get(word).copied().unwrap_or(0.0)
    }

    pub fn len(&self) -> usize {
        self.probs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.probs.is_empty()
    }

    pub fn total(&self) -> f64 {
        self.probs.values().sum()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, f64)> {
        self.probs.iter().map(|(w, p)| (w.as_str(), *p))
    }
}

/// Suavizador Good-Turing com corte `k`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GoodTuring {
    pub k: usize,
}

impl Default for GoodTuring {
    fn default() -> Self {
        Self { k: 5 }
    }
}

impl GoodTuring {
    pub fn new(k: usize) -> Self {
        Self { k }
    }

    /// Histograma de frequências de frequências `N[r]`, `r = 0..=k+1`.
    pub fn frequency_of_frequencies(&self, counts: &HashMap<String, u64>) -> Vec<u64> {
        let mut n = vec![0u64; self.k + 2];
        for &count in counts.values() {
            if let Some(bucket) = n.get_mut(count as usize) {
                *bucket += 1;
            }
        }
        n
    }

    /// Contagens ajustadas `c*[r]` para `r = 0..=k`.
    ///
    /// `None` marca um bucket sem estimativa válida: as palavras dele ficam com
    /// a contagem bruta.
    pub fn adjusted_counts(&self, n: &[u64]) -> Vec<Option<f64>> {
        let k = self.k as f64;
        let mut c_star = Vec::with_capacity(self.k + 1);
        c_star.push(Some(n.get(1).copied().unwrap_or(0) as f64));

        for r in 1..=self.k {
            let n_r = n.get(r).copied().unwrap_or(0);
            if n_r == 0 {
                c_star.push(None);
                continue;
            }
            let ratio = n.get(r + 1).copied().unwrap_or(0) as f64 / n_r as f64;
            let rf = r as f64;
            let numerator = (rf + 1.0) * ratio - rf * (k + 1.0) * ratio;
            let denominator = 1.0 - (k + 1.0) * ratio;
            if denominator.abs() < 1e-12 {
                c_star.push(None);
                continue;
            }
            let value = numerator / denominator;
            if value.is_finite() && value >= 0.0 {
                c_star.push(Some(value));
            } else {
                debug!("bucket r={r} sem estimativa válida ({value}); usando contagem bruta");
                c_star.push(None);
            }
        }
        c_star
    }

    /// Suaviza as contagens brutas de um estado e normaliza em probabilidades.
    pub fn smooth(&self, counts: &HashMap<String, u64>) -> FeatureProbabilityTable {
        let n = self.frequency_of_frequencies(counts);
        let c_star = self.adjusted_counts(&n);
        debug!("N[r] = {n:?}; c*[r] = {c_star:?}");

        let smoothed: HashMap<String, f64> = counts
            .iter()
            .map(|(word, &count)| {
                let raw = count as f64;
                let value = c_star
                    .get(count as usize)
                    .copied()
                    .flatten()
                    .unwrap_or(raw);
                (word.clone(), value)
            })
            .collect();

        let total: f64 = smoothed.values().sum();
        let probs = if total > 0.0 && total.is_finite() {
            smoothed.into_iter().map(|(w, v)| (w, v / total)).collect()
        } else {
            // Sem massa alguma: distribuição uniforme sobre o vocabulário
            let uniform = 1.0 / smoothed.len().max(1) as f64;
            smoothed.into_keys().map(|w| (w, uniform)).collect()
        };

        FeatureProbabilityTable { probs }
    }
}

/// Contagens brutas de features por estado: em quantas sentenças de
/// treinamento daquele estado cada palavra do léxico aparece.
///
/// Todas as palavras do léxico começam com contagem zero, para que as nunca
/// vistas recebam a massa de `c*[0]`.
#[derive(Debug, Clone, Default)]
pub struct FeatureCounts {
    counts: [HashMap<String, u64>; State::COUNT],
}

impl FeatureCounts {
    pub fn new(lexicon: &LexiconTable) -> Self {
        let zeros: HashMap<String, u64> = lexicon.words().map(|w| (w.to_string(), 0)).collect();
        Self {
            counts: [zeros.clone(), zeros.clone(), zeros],
        }
    }

    /// Registra uma sentença tokenizada de treinamento.
    /// Uma palavra repetida na mesma sentença conta uma vez.
    pub fn observe(&mut self, state: State, tokens: &[String]) {
        let table = &mut self.counts[state.index()];
        let mut seen: Vec<&str> = Vec::new();
        for token in tokens {
            if seen.contains(&token.as_str()) {
                continue;
            }
            if let Some(count) = table.get_mut(token.as_str()) {
                *count += 1;
                seen.push(token);
            }
        }
    }

    pub fn count(&self, state: State, word: &str) -> u64 {
        self.counts[state.index()].get(word).copied().unwrap_or(0)
    }

    pub fn for_state(&self, state: State) -> &HashMap<String, u64> {
        &self.counts[state.index()]
    }

    /// Suaviza cada estado de forma independente, com suas próprias contagens.
    pub fn smooth(&self, smoother: &GoodTuring) -> FeatureTables {
        FeatureTables {
            tables: State::all().map(|s| smoother.smooth(self.for_state(s))),
        }
    }
}

/// As três tabelas $P(w \mid s)$, indexadas por [`State`].
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FeatureTables {
    tables: [FeatureProbabilityTable; State::COUNT],
}

impl FeatureTables {
    pub fn new(pos: FeatureProbabilityTable, neu: FeatureProbabilityTable, neg: FeatureProbabilityTable) -> Self {
        Self {
            tables: [pos, neu, neg],
        }
    }

    pub fn get(&self, state: State) -> &FeatureProbabilityTable {
        &self.tables[state.index()]
    }

    /// Atalho para `get(state).prob(word)`.
    pub fn prob(&self, state: State, word: &str) -> f64 {
        self.get(state).prob(word)
    }
}
