//! # Algoritmo de Viterbi: Decodificação da Sequência de Sentimentos
//!
//! Programação dinâmica sobre os 3 estados fixos: encontra a sequência de
//! rótulos mais provável para as sentenças de uma review em `O(T × S²)`.
//!
//! ## Algoritmo
//!
//! ```text
//! Inicialização: δ[s][0] = π(s) · e_0(s)
//!
//! Recursão:      δ[s][t] = max_{s'} δ[s'][t-1] · A(s', s) · e_t(s)
//!                ψ[s][t] = argmax_{s'} (mesmo produto)
//!
//! Terminação:    s* = argmax_s δ[s][T-1], depois backtracking por ψ
//! ```
//!
//! ## Desempate
//!
//! A comparação é estrita (`<`), então em caso de empate vence o primeiro
//! maximizador encontrado, ou seja, o de menor índice na ordem POS, NEU, NEG.
//! Se todos os caminhos têm probabilidade zero (transições nunca vistas,
//! emissões nulas), o resultado é o estado de menor índice: comportamento
//! definido, não erro.
//!
//! As probabilidades ficam em espaço linear (não log) para que transições
//! ausentes sejam zeros exatos e o desempate acima seja reproduzido.

use serde::{Deserialize, Serialize};

use crate::emission::EmissionVector;
use crate::state::State;
use crate::transition::{InitialDistribution, TransitionMatrix};

/// Estado do Viterbi em uma sentença (para visualização passo a passo)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ViterbiStep {
    /// Índice da sentença na review
    pub sentence_index: usize,
    /// δ de cada estado neste passo
    pub scores: Vec<StateScore>,
    /// O estado com maior δ neste passo
    pub best_state: State,
    pub best_score: f64,
}

/// Score de um estado individual no Viterbi
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StateScore {
    pub state: State,
    /// δ acumulado até este passo terminando neste estado
    pub score: f64,
    /// Estado anterior que gerou o δ ótimo (`None` na primeira sentença)
    pub best_prev: Option<State>,
    /// Emissão deste estado nesta sentença
    pub emission: f64,
    /// Probabilidade de transição usada (inicial, na primeira sentença)
    pub transition: f64,
}

/// Resultado completo do Viterbi
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ViterbiResult {
    /// Sequência de estados mais provável, uma por sentença
    pub best_sequence: Vec<State>,
    /// Probabilidade (não-normalizada) da melhor sequência
    pub best_score: f64,
    pub steps: Vec<ViterbiStep>,
}

/// Executa o Viterbi sobre os vetores de emissão de uma review.
///
/// Uma review vazia produz uma sequência vazia.
pub fn viterbi_decode(
    initial: &InitialDistribution,
    transitions: &TransitionMatrix,
    emissions: &[EmissionVector],
) -> ViterbiResult {
    if emissions.is_empty() {
        return ViterbiResult {
            best_sequence: vec![],
            best_score: 0.0,
            steps: vec![],
        };
    }

    let n_sentences = emissions.len();
    let states = State::all();
    let n_states = states.len();

    // delta[s] = melhor probabilidade de um caminho terminando em s na sentença atual
    let mut delta = [0.0f64; State::COUNT];
    // backptr[t][s] = índice do estado anterior que maximiza delta[s] em t
    let mut backptr: Vec<[usize; State::COUNT]> = vec![[0; State::COUNT]; n_sentences];
    let mut steps: Vec<ViterbiStep> = Vec::with_capacity(n_sentences);

    // === Inicialização (sentença 0) ===
    let mut first_scores = Vec::with_capacity(n_states);
    for (s, state) in states.iter().enumerate() {
        let start = initial.prob(*state);
        let emission = emissions[0].0[s];
        delta[s] = start * emission;
        first_scores.push(StateScore {
            state: *state,
            score: delta[s],
            best_prev: None,
            emission,
            transition: start,
        });
    }
    steps.push(make_step(0, first_scores, &delta));

    // === Recursão (sentenças 1..T-1) ===
    for t in 1..n_sentences {
        let mut next = [0.0f64; State::COUNT];
        let mut step_scores = Vec::with_capacity(n_states);

        for (s, state) in states.iter().enumerate() {
            let emission = emissions[t].0[s];
            let mut best_value = 0.0f64;
            let mut best_prev = 0usize;
            let mut best_transition = transitions.prob(states[0], *state);

            for (prev, prev_state) in states.iter().enumerate() {
                let transition = transitions.prob(*prev_state, *state);
                let value = delta[prev] * transition * emission;
                if best_value < value {
                    best_value = value;
                    best_prev = prev;
                    best_transition = transition;
                }
            }

            next[s] = best_value;
            backptr[t][s] = best_prev;
            step_scores.push(StateScore {
                state: *state,
                score: best_value,
                best_prev: Some(states[best_prev]),
                emission,
                transition: best_transition,
            });
        }

        delta = next;
        steps.push(make_step(t, step_scores, &delta));
    }

    // === Backtracking ===
    let (mut current, best_score) = best_in_slice(&delta);
    let mut best_sequence = vec![states[0]; n_sentences];
    best_sequence[n_sentences - 1] = states[current];

    for t in (1..n_sentences).rev() {
        current = backptr[t][current];
        best_sequence[t - 1] = states[current];
    }

    ViterbiResult {
        best_sequence,
        best_score,
        steps,
    }
}

/// Atalho que retorna apenas a sequência de estados.
pub fn decode(
    initial: &InitialDistribution,
    transitions: &TransitionMatrix,
    emissions: &[EmissionVector],
) -> Vec<State> {
    viterbi_decode(initial, transitions, emissions).best_sequence
}

fn make_step(sentence_index: usize, scores: Vec<StateScore>, delta: &[f64]) -> ViterbiStep {
    let (best, best_score) = best_in_slice(delta);
    ViterbiStep {
        sentence_index,
        scores,
        best_state: State::all()[best],
        best_score,
    }
}

/// Retorna (índice, valor) do primeiro máximo em um slice de valores não-negativos
fn best_in_slice(scores: &[f64]) -> (usize, f64) {
    let mut best = (0usize, 0.0f64);
    for (i, &v) in scores.iter().enumerate() {
        if best.1 < v {
            best = (i, v);
        }
    }
    best
}

/// Converte os δ de um passo em uma distribuição (para confiança).
/// Passos com δ todo zero viram uniformes.
pub fn scores_to_probs(scores: &[f64]) -> Vec<f64> {
    if scores.is_empty() {
        return vec![];
    }
    let sum: f64 = scores.iter().sum();
    if sum <= 0.0 || !sum.is_finite() {
        return vec![1.0 / scores.len() as f64; scores.len()];
    }
    scores.iter().map(|s| s / sum).collect()
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeMap;

    use super::*;

    fn initial(pairs: &[(State, f64)]) -> InitialDistribution {
        InitialDistribution::from_probs(pairs.iter().copied().collect())
    }

    fn matrix(entries: &[(State, State, f64)]) -> TransitionMatrix {
        let mut rows: BTreeMap<State, BTreeMap<State, f64>> = BTreeMap::new();
        for (from, to, p) in entries {
            rows.entry(*from).or_default().insert(*to, *p);
        }
        TransitionMatrix::from_rows(rows)
    }

    fn uniform_matrix() -> TransitionMatrix {
        let mut entries = vec![];
        for from in State::all() {
            for to in State::all() {
                entries.push((from, to, 1.0 / 3.0));
            }
        }
        matrix(&entries)
    }

    #[test]
    fn test_single_sentence_positive() {
        let init = initial(&[(State::Pos, 0.2), (State::Neu, 0.5), (State::Neg, 0.3)]);
        let result = viterbi_decode(&init, &TransitionMatrix::default(), &[EmissionVector([0.8, 0.1, 0.1])]);
        assert_eq!(result.best_sequence, vec![State::Pos]);
        assert!((result.best_score - 0.16).abs() < 1e-12);
    }

    #[test]
    fn test_empty_review() {
        let result = viterbi_decode(&InitialDistribution::default(), &TransitionMatrix::default(), &[]);
        assert!(result.best_sequence.is_empty());
        assert!(result.steps.is_empty());
    }

    #[test]
    fn test_length_matches_sentences() {
        let init = initial(&[(State::Pos, 0.4), (State::Neu, 0.4), (State::Neg, 0.2)]);
        let emissions = vec![EmissionVector([0.3, 0.3, 0.4]); 7];
        let result = viterbi_decode(&init, &uniform_matrix(), &emissions);
        assert_eq!(result.best_sequence.len(), 7);
        assert_eq!(result.steps.len(), 7);
    }

    #[test]
    fn test_neutral_sentences_follow_neutral_self_loop() {
        let init = initial(&[(State::Pos, 0.3), (State::Neu, 0.4), (State::Neg, 0.3)]);
        let trans = matrix(&[
            (State::Pos, State::Pos, 0.2),
            (State::Pos, State::Neu, 0.6),
            (State::Pos, State::Neg, 0.2),
            (State::Neu, State::Neu, 0.8),
            (State::Neu, State::Pos, 0.1),
            (State::Neu, State::Neg, 0.1),
        ]);
        let emissions = vec![EmissionVector::NEUTRAL; 3];
        assert_eq!(decode(&init, &trans, &emissions), vec![State::Neu; 3]);
    }

    #[test]
    fn test_transitions_shape_the_path() {
        // A segunda sentença sozinha preferiria NEG, mas POS → NEG nunca foi visto
        let init = initial(&[(State::Pos, 1.0)]);
        let trans = matrix(&[(State::Pos, State::Pos, 0.5), (State::Pos, State::Neu, 0.5)]);
        let emissions = vec![EmissionVector([0.9, 0.05, 0.05]), EmissionVector([0.1, 0.2, 0.7])];
        assert_eq!(decode(&init, &trans, &emissions), vec![State::Pos, State::Neu]);
    }

    #[test]
    fn test_all_zero_paths_resolve_to_lowest_index() {
        let emissions = vec![EmissionVector([0.0, 0.0, 0.0]); 3];
        let result = viterbi_decode(&InitialDistribution::default(), &TransitionMatrix::default(), &emissions);
        assert_eq!(result.best_sequence, vec![State::Pos; 3]);
        assert_eq!(result.best_score, 0.0);
    }

    #[test]
    fn test_ties_prefer_first_state() {
        let init = initial(&[(State::Pos, 0.5), (State::Neg, 0.5)]);
        let emissions = vec![EmissionVector([0.4, 0.0, 0.4]), EmissionVector([0.5, 0.0, 0.5])];
        let result = viterbi_decode(&init, &uniform_matrix(), &emissions);
        assert_eq!(result.best_sequence, vec![State::Pos, State::Pos]);
        // Na segunda sentença, NEG empata entre vir de POS ou de NEG: vence POS
        assert_eq!(result.steps[1].scores[2].best_prev, Some(State::Pos));
    }

    #[test]
    fn test_scores_to_probs() {
        let probs = scores_to_probs(&[0.2, 0.6, 0.2]);
        assert!((probs.iter().sum::<f64>() - 1.0).abs() < 1e-9);
        assert!((probs[1] - 0.6).abs() < 1e-9);
        assert_eq!(scores_to_probs(&[0.0, 0.0]), vec![0.5, 0.5]);
    }
}
