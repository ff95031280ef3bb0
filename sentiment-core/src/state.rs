//! # Estados de Sentimento
//!
//! Define os três estados ocultos do HMM de sentimento. A ordem declarada
//! (POS, NEU, NEG) é a ordem de indexação usada em todas as tabelas e também a
//! prioridade de desempate no Viterbi: em caso de empate, vence o menor índice.
//!
//! | Estado | Índice | Score de saída | Rótulo no corpus |
//! |--------|--------|----------------|------------------|
//! | POS    | 0      | `1`            | `pos`            |
//! | NEU    | 1      | `0`            | `neu`            |
//! | NEG    | 2      | `-1`           | `neg`            |

use serde::{Deserialize, Serialize};

/// Estado oculto de uma sentença: o sentimento que ela expressa.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum State {
    /// **Positivo**: a sentença elogia o produto. Ex: "the battery is great".
    Pos,
    /// **Neutro**: descrição factual, sem opinião. Ex: "i bought it in may".
    Neu,
    /// **Negativo**: a sentença critica o produto. Ex: "the screen broke after a week".
    Neg,
}

impl State {
    /// Número total de estados
    pub const COUNT: usize = 3;

    /// Todos os estados na ordem fixa de indexação (e de desempate).
    pub fn all() -> [State; 3] {
        [State::Pos, State::Neu, State::Neg]
    }

    /// Índice numérico do estado nas tabelas do Viterbi e nos vetores de emissão.
    pub fn index(&self) -> usize {
        match self {
            State::Pos => 0,
            State::Neu => 1,
            State::Neg => 2,
        }
    }

    /// Inverso de [`State::index`].
    pub fn from_index(index: usize) -> Option<Self> {
        match index {
            0 => Some(State::Pos),
            1 => Some(State::Neu),
            2 => Some(State::Neg),
            _ => None,
        }
    }

    /// Rótulo de três caracteres usado no corpus ("pos", "neu", "neg").
    pub fn label(&self) -> &'static str {
        match self {
            State::Pos => "pos",
            State::Neu => "neu",
            State::Neg => "neg",
        }
    }

    /// Parseia um rótulo do corpus. Aceita somente os três rótulos exatos.
    pub fn from_label(s: &str) -> Option<Self> {
        match s {
            "pos" => Some(State::Pos),
            "neu" => Some(State::Neu),
            "neg" => Some(State::Neg),
            _ => None,
        }
    }

    /// Score numérico do contrato de saída: POS → 1, NEU → 0, NEG → -1.
    pub fn score(&self) -> i8 {
        match self {
            State::Pos => 1,
            State::Neu => 0,
            State::Neg => -1,
        }
    }
}

impl std::fmt::Display for State {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            State::Pos => "POS",
            State::Neu => "NEU",
            State::Neg => "NEG",
        };
        write!(f, "{name}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fixed_order() {
        let all = State::all();
        for (i, state) in all.iter().enumerate() {
            assert_eq!(state.index(), i);
            assert_eq!(State::from_index(i), Some(*state));
        }
        assert_eq!(State::from_index(3), None);
    }

    #[test]
    fn test_labels_and_scores() {
        assert_eq!(State::from_label("pos"), Some(State::Pos));
        assert_eq!(State::from_label("neu"), Some(State::Neu));
        assert_eq!(State::from_label("neg"), Some(State::Neg));
        assert_eq!(State::from_label("POS"), None);

        assert_eq!(State::Pos.score(), 1);
        assert_eq!(State::Neu.score(), 0);
        assert_eq!(State::Neg.score(), -1);
        assert_eq!(State::Neg.to_string(), "NEG");
    }
}
