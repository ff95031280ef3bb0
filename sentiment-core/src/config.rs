//! # Configuração do Rotulador
//!
//! Constantes ajustáveis do modelo. Os valores padrão são os de referência;
//! qualquer desvio é uma escolha deliberada de quem configura.

use serde::{Deserialize, Serialize};

use crate::emission::NEUTRAL_INIT;

/// Parâmetros do treinamento e da inferência.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct TaggerConfig {
    /// Corte `k` do Good-Turing: contagens acima de `k` não são suavizadas.
    pub good_turing_k: usize,
    /// Constante do desconto de comprimento no canal neutro:
    /// `NEU *= neutral_init / (neutral_init + num_features)`.
    pub neutral_init: f64,
    /// Pondera os canais POS/NEG pela polaridade de cada palavra do léxico.
    /// Desligado, o multiplicador de polaridade é sempre 1.0.
    pub polarity_weighting: bool,
    /// Usa o rótulo do cabeçalho da review como prior multiplicativo.
    pub document_prior: bool,
    /// Limiar por feature do rotulador baseline.
    pub baseline_threshold: f64,
}

impl Default for TaggerConfig {
    fn default() -> Self {
        Self {
            good_turing_k: 5,
            neutral_init: NEUTRAL_INIT,
            polarity_weighting: true,
            document_prior: true,
            baseline_threshold: 0.52,
        }
    }
}
