//! # Hidden Markov Model (HMM) de Sentimento
//!
//! Modelo de três estados onde:
//! - **Estados Ocultos**: sentimento de cada sentença (POS, NEU, NEG)
//! - **Observações**: as palavras do léxico de polaridade presentes na sentença
//!
//! O modelo aprende, em uma única passada pelo corpus rotulado:
//! 1. Probabilidade de Transição: P(estado_atual | estado_anterior), dentro da mesma review
//! 2. Probabilidade Inicial: P(estado da primeira sentença)
//! 3. Tabelas de features: P(palavra | estado), suavizadas com Good-Turing
//!
//! Depois de treinado o modelo é imutável; cada review decodificada só
//! empresta as tabelas.

use serde::{Deserialize, Serialize};
use tracing::info;

use crate::config::TaggerConfig;
use crate::corpus::Review;
use crate::emission::{EmissionModel, EmissionVector};
use crate::error::{Result, SentimentError};
use crate::lexicon::LexiconTable;
use crate::smoothing::{FeatureCounts, FeatureTables, GoodTuring};
use crate::state::State;
use crate::tokenizer::tokenize;
use crate::transition::{InitialDistribution, TransitionCounts, TransitionMatrix};
use crate::viterbi::{viterbi_decode, ViterbiResult};

/// Modelo HMM treinado para rotular sentenças de reviews.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SentimentHmm {
    config: TaggerConfig,
    lexicon: LexiconTable,
    transitions: TransitionMatrix,
    initial: InitialDistribution,
    features: FeatureTables,
}

impl SentimentHmm {
    /// Treina o HMM com o corpus e o léxico fornecidos (aprendizado supervisionado).
    ///
    /// # Processo de Treinamento
    /// 1. **Contagem**: para cada review, registra o estado inicial e as
    ///    transições entre sentenças consecutivas; para cada sentença, conta
    ///    em quais estados cada palavra do léxico aparece.
    /// 2. **Normalização**: linhas de transição pelo total de saídas da origem,
    ///    inícios pelo número de reviews.
    /// 3. **Suavização**: Good-Turing independente para POS, NEU e NEG.
    ///
    /// # Erros
    /// [`SentimentError::EmptyCorpus`] sem nenhuma sentença rotulada e
    /// [`SentimentError::EmptyLexicon`] com léxico vazio.
    pub fn train(corpus: &[Review], lexicon: LexiconTable, config: TaggerConfig) -> Result<Self> {
        if lexicon.is_empty() {
            return Err(SentimentError::EmptyLexicon);
        }

        let mut transition_counts = TransitionCounts::new();
        let mut feature_counts = FeatureCounts::new(&lexicon);
        let mut n_sentences = 0usize;

        for review in corpus {
            transition_counts.observe(&review.gold_states());
            for sentence in &review.sentences {
                feature_counts.observe(sentence.state, &tokenize(&sentence.text));
                n_sentences += 1;
            }
        }

        if n_sentences == 0 {
            return Err(SentimentError::EmptyCorpus);
        }

        let (transitions, initial) = transition_counts.normalize();
        let features = feature_counts.smooth(&GoodTuring::new(config.good_turing_k));

        info!(
            "HMM treinado: {} reviews, {} sentenças, {} palavras no léxico",
            transition_counts.reviews(),
            n_sentences,
            lexicon.len()
        );

        Ok(Self {
            config,
            lexicon,
            transitions,
            initial,
            features,
        })
    }

    pub fn config(&self) -> &TaggerConfig {
        &self.config
    }

    pub fn lexicon(&self) -> &LexiconTable {
        &self.lexicon
    }

    pub fn transitions(&self) -> &TransitionMatrix {
        &self.transitions
    }

    pub fn initial(&self) -> &InitialDistribution {
        &self.initial
    }

    pub fn features(&self) -> &FeatureTables {
        &self.features
    }

    /// Modelo de emissão que empresta as tabelas deste HMM.
    pub fn emission_model(&self) -> EmissionModel<'_> {
        EmissionModel::with_config(&self.features, &self.lexicon, &self.config)
    }

    /// Vetores de emissão de uma review.
    pub fn emissions(&self, review: &Review) -> Vec<EmissionVector> {
        let sentences: Vec<&str> = review.sentences.iter().map(|s| s.text.as_str()).collect();
        self.emission_model().emit_review(&sentences, review.doc_label)
    }

    /// Decodifica uma review com o algoritmo de Viterbi, retornando também a
    /// tabela de scores de cada passo.
    pub fn decode_review(&self, review: &Review) -> ViterbiResult {
        viterbi_decode(&self.initial, &self.transitions, &self.emissions(review))
    }

    /// Rotula as sentenças de uma review: um estado por sentença, na ordem da review.
    pub fn tag(&self, review: &Review) -> Vec<State> {
        self.decode_review(review).best_sequence
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::corpus::{demo_corpus, demo_lexicon, parse_corpus};
    use crate::lexicon::parse_lexicon;

    fn demo_model() -> SentimentHmm {
        SentimentHmm::train(&demo_corpus(), demo_lexicon(), TaggerConfig::default()).unwrap()
    }

    #[test]
    fn test_trained_tables_are_distributions() {
        let model = demo_model();
        for (_, row) in model.transitions().rows() {
            let sum: f64 = row.values().sum();
            assert!((sum - 1.0).abs() < 1e-6);
        }
        let sum: f64 = model.initial().iter().map(|(_, p)| p).sum();
        assert!((sum - 1.0).abs() < 1e-6);
        for state in State::all() {
            let table = model.features().get(state);
            assert_eq!(table.len(), model.lexicon().len());
            assert!((table.total() - 1.0).abs() < 1e-6);
            assert!(table.iter().all(|(_, p)| p >= 0.0));
        }
    }

    #[test]
    fn test_tag_length_matches_review() {
        let model = demo_model();
        for review in demo_corpus() {
            assert_eq!(model.tag(&review).len(), review.len());
        }
    }

    #[test]
    fn test_clear_sentences_on_demo_model() {
        let model = demo_model();
        let review = Review::unlabeled(
            State::Pos,
            &["the sound is wonderful and i love it .", "it ships in a box ."],
        );
        let emissions = model.emissions(&review);
        assert!(emissions[0].get(State::Pos) > emissions[0].get(State::Neg));
        assert_eq!(emissions[1], EmissionVector::NEUTRAL);
        assert_eq!(model.tag(&review).len(), 2);
    }

    #[test]
    fn test_top_bucket_without_successor_gets_zero_mass() {
        // No corpus demo, "excellent" é a única palavra POS com contagem 3 e
        // N[4] = 0: o estimador de Katz dá c*[3] = 0.
        let model = demo_model();
        assert_eq!(model.features().prob(State::Pos, "excellent"), 0.0);
        assert!(model.features().prob(State::Pos, "love") > 0.0);
    }

    #[test]
    fn test_unseen_transitions_stay_unreachable() {
        // Só há transições POS → POS no treino: a matriz não é suavizada, então
        // qualquer outro caminho depois da primeira sentença tem probabilidade zero.
        let corpus = parse_corpus("a_pos_1\npos great .\npos great .\n");
        let lexicon = parse_lexicon("type=strongsubj word1=great polarity=positive\ntype=strongsubj word1=awful polarity=negative\n");
        let model = SentimentHmm::train(&corpus, lexicon, TaggerConfig::default()).unwrap();
        assert_eq!(model.transitions().prob(State::Pos, State::Neg), 0.0);
        assert!(model.transitions().row(State::Neg).is_none());

        let review = Review::unlabeled(State::Neg, &["great .", "awful ."]);
        assert_eq!(model.tag(&review), vec![State::Pos, State::Pos]);
    }

    #[test]
    fn test_empty_inputs_are_errors() {
        let err = SentimentHmm::train(&[], demo_lexicon(), TaggerConfig::default()).unwrap_err();
        assert!(matches!(err, SentimentError::EmptyCorpus));
        let err = SentimentHmm::train(&demo_corpus(), LexiconTable::new(), TaggerConfig::default()).unwrap_err();
        assert!(matches!(err, SentimentError::EmptyLexicon));
    }

    #[test]
    fn test_json_round_trip() {
        let model = demo_model();
        let json = model.to_json().unwrap();
        let restored = SentimentHmm::from_json(&json).unwrap();
        let review = &demo_corpus()[1];
        assert_eq!(model.tag(review), restored.tag(review));
        let before = model.transitions().prob(State::Pos, State::Pos);
        let after = restored.transitions().prob(State::Pos, State::Pos);
        assert!((before - after).abs() < 1e-12);
    }
}
