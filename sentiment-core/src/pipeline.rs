//! # Pipeline de Sentimento: Orquestrador com Eventos Observáveis
//!
//! O pipeline coordena os módulos (tokenizador, emissões, Viterbi ou baseline)
//! e emite eventos em cada passo via um canal Rust (`mpsc`), permitindo que
//! o servidor WebSocket transmita o progresso em tempo real para o cliente.
//!
//! Também concentra as operações em lote: rotulação paralela de várias
//! reviews, avaliação contra o gabarito e formatação da saída.

use std::sync::mpsc;
use std::time::Instant;

use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::baseline::BaselineTagger;
use crate::config::TaggerConfig;
use crate::corpus::{demo_corpus, demo_lexicon, Review};
use crate::error::Result;
use crate::hmm::SentimentHmm;
use crate::lexicon::Polarity;
use crate::state::State;
use crate::tokenizer::split_sentences;
use crate::viterbi::{scores_to_probs, ViterbiStep};

/// Qual rotulador decide as sentenças.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DecoderMode {
    /// **HMM + Viterbi**: emissões com priors de polaridade e documento,
    /// sequência decodificada com as transições aprendidas.
    #[default]
    Hmm,
    /// **Baseline**: soma de polaridades com limiar, sentença a sentença.
    Baseline,
}

/// Eventos emitidos pelo pipeline durante o processamento.
///
/// Cada variante carrega os dados necessários para renderizar uma etapa da
/// visualização.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", content = "data")]
pub enum PipelineEvent {
    /// **Passo 1**: review recebida e dividida em sentenças.
    ReviewParsed {
        sentences: Vec<String>,
        total: usize,
        doc_label: State,
    },
    /// **Passo 2**: vetor de emissão de uma sentença, com as features que o explicam.
    EmissionComputed {
        sentence_index: usize,
        sentence: String,
        features: Vec<(String, Polarity)>,
        /// `[POS, NEU, NEG]`, não normalizado.
        emission: [f64; State::COUNT],
    },
    /// **Passo 3**: um passo do Viterbi (δ e back-pointer de cada estado).
    ViterbiStep { step: ViterbiStep, sentence: String },
    /// **Passo Final**: rótulo definitivo de uma sentença.
    LabelAssigned {
        sentence_index: usize,
        sentence: String,
        label: State,
        /// Score de saída: 1, 0 ou -1.
        score: i8,
        confidence: f64,
        source: String, // "viterbi" ou "baseline"
    },
    /// **Conclusão**: rótulos de todas as sentenças e tempo gasto.
    Done {
        labels: Vec<State>,
        scores: Vec<i8>,
        total_sentences: usize,
        processing_ms: u64,
    },
    /// **Falha**: ocorreu um erro irrecuperável.
    Error { message: String },
}

/// Métricas de acerto por sentença.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EvaluationReport {
    pub correct: usize,
    pub total: usize,
    pub accuracy: f64,
}

impl EvaluationReport {
    /// Compara rótulos previstos (um vetor por review) com o gabarito das reviews.
    ///
    /// Os rótulos são pareados sentença a sentença dentro de cada review.
    pub fn compare(predicted: &[Vec<State>], reviews: &[Review]) -> Self {
        let (labels, gold): (Vec<State>, Vec<State>) = predicted
            .iter()
            .zip(reviews)
            .flat_map(|(labels, review)| labels.iter().copied().zip(review.gold_states()))
            .unzip();
        let correct = labels.iter().zip(&gold).filter(|(p, g)| p == g).count();
        Self {
            correct,
            total: gold.len(),
            accuracy: accuracy(&labels, &gold),
        }
    }
}

/// Fração de sentenças cujo rótulo previsto coincide com o de ouro.
/// Entradas vazias têm acurácia 0.0.
pub fn accuracy(predicted: &[State], gold: &[State]) -> f64 {
    if gold.is_empty() {
        return 0.0;
    }
    let correct = predicted.iter().zip(gold).filter(|(p, g)| p == g).count();
    correct as f64 / gold.len() as f64
}

/// Uma linha por sentença: `"<score>"` ou `"<contador>,<score>"`.
///
/// O contador começa em 0 e corre através de todas as reviews.
pub fn format_output(labels: &[Vec<State>], with_counter: bool) -> Vec<String> {
    labels
        .iter()
        .flatten()
        .enumerate()
        .map(|(i, state)| {
            if with_counter {
                format!("{},{}", i, state.score())
            } else {
                state.score().to_string()
            }
        })
        .collect()
}

/// Monta uma review sem gabarito a partir de texto livre.
pub fn review_from_text(text: &str, doc_label: State) -> Review {
    Review::unlabeled(doc_label, &split_sentences(text))
}

/// O pipeline de sentimento principal.
///
/// # Modos de Uso
/// - **Sync**: `analyze` para scripts e chamadas diretas.
/// - **Streaming**: `analyze_streaming` para UIs reativas (via WebSocket).
/// - **Lote**: `tag_reviews` decodifica várias reviews em paralelo.
pub struct SentimentPipeline {
    pub model: SentimentHmm,
}

impl SentimentPipeline {
    pub fn new(model: SentimentHmm) -> Self {
        Self { model }
    }

    /// Pipeline treinado com o corpus e o léxico de demonstração embutidos.
    pub fn demo() -> Result<Self> {
        let model = SentimentHmm::train(&demo_corpus(), demo_lexicon(), TaggerConfig::default())?;
        Ok(Self::new(model))
    }

    fn baseline(&self) -> BaselineTagger<'_> {
        BaselineTagger::new(self.model.lexicon(), self.model.config().baseline_threshold)
    }

    /// Rótulos de uma review, sem eventos.
    pub fn tag_review(&self, review: &Review, mode: DecoderMode) -> Vec<State> {
        match mode {
            DecoderMode::Hmm => self.model.tag(review),
            DecoderMode::Baseline => self.baseline().tag_review(review),
        }
    }

    /// Decodifica várias reviews em paralelo. As tabelas treinadas são só
    /// lidas; a ordem da saída é a da entrada.
    pub fn tag_reviews(&self, reviews: &[Review], mode: DecoderMode) -> Vec<Vec<State>> {
        reviews
            .par_iter()
            .map(|review| self.tag_review(review, mode))
            .collect()
    }

    /// Processa a review de forma síncrona e retorna os rótulos finais.
    pub fn analyze(&self, review: &Review, mode: DecoderMode) -> Vec<State> {
        let (tx, rx) = mpsc::channel();
        self.analyze_streaming(review, mode, tx);
        let mut labels = vec![];

        // Consome todos os eventos até o fim
        while let Ok(event) = rx.recv() {
            if let PipelineEvent::Done { labels: done, .. } = event {
                labels = done;
            }
        }
        labels
    }

    /// Executa o pipeline enviando eventos de progresso pelo canal `tx`.
    ///
    /// # Fluxo de Eventos
    /// 1. `ReviewParsed`: sentenças recebidas.
    /// 2. `EmissionComputed` (loop, só HMM): emissão de cada sentença.
    /// 3. `ViterbiStep` (loop, só HMM): passos da decodificação.
    /// 4. `LabelAssigned` (loop): decisão final de cada sentença.
    /// 5. `Done`: resultado consolidado.
    pub fn analyze_streaming(&self, review: &Review, mode: DecoderMode, tx: mpsc::Sender<PipelineEvent>) {
        let start = Instant::now();

        let sentences: Vec<String> = review.sentences.iter().map(|s| s.text.clone()).collect();
        let _ = tx.send(PipelineEvent::ReviewParsed {
            sentences: sentences.clone(),
            total: sentences.len(),
            doc_label: review.doc_label,
        });

        let (labels, confidences, source) = match mode {
            DecoderMode::Hmm => self.stream_hmm(review, &sentences, &tx),
            DecoderMode::Baseline => {
                let labels = self.baseline().tag_review(review);
                let confidences = vec![1.0; labels.len()];
                (labels, confidences, "baseline")
            }
        };

        for (i, label) in labels.iter().enumerate() {
            let _ = tx.send(PipelineEvent::LabelAssigned {
                sentence_index: i,
                sentence: sentences[i].clone(),
                label: *label,
                score: label.score(),
                confidence: confidences[i],
                source: source.to_string(),
            });
        }

        debug!("review com {} sentenças rotulada ({:?})", labels.len(), mode);

        let _ = tx.send(PipelineEvent::Done {
            scores: labels.iter().map(State::score).collect(),
            total_sentences: labels.len(),
            labels,
            processing_ms: start.elapsed().as_millis() as u64,
        });
    }

    fn stream_hmm(
        &self,
        review: &Review,
        sentences: &[String],
        tx: &mpsc::Sender<PipelineEvent>,
    ) -> (Vec<State>, Vec<f64>, &'static str) {
        let emission_model = self.model.emission_model();
        let mut emissions = Vec::with_capacity(sentences.len());

        for (i, sentence) in sentences.iter().enumerate() {
            let emission = emission_model.emit(sentence, review.doc_label);
            let _ = tx.send(PipelineEvent::EmissionComputed {
                sentence_index: i,
                sentence: sentence.clone(),
                features: emission.features,
                emission: emission.vector.0,
            });
            emissions.push(emission.vector);
        }

        let result = crate::viterbi::viterbi_decode(self.model.initial(), self.model.transitions(), &emissions);

        for (i, step) in result.steps.iter().enumerate() {
            let _ = tx.send(PipelineEvent::ViterbiStep {
                step: step.clone(),
                sentence: sentences[i].clone(),
            });
        }

        // Confiança: δ do passo normalizado, no estado escolhido
        let confidences = result
            .steps
            .iter()
            .zip(&result.best_sequence)
            .map(|(step, state)| {
                let scores: Vec<f64> = step.scores.iter().map(|s| s.score).collect();
                scores_to_probs(&scores)
                    .get(state.index())
                    .copied()
                    .unwrap_or(0.0)
            })
            .collect();

        (result.best_sequence, confidences, "viterbi")
    }
}
