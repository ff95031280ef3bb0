//! # sentiment-core: Rotulação de Sentimento por Sentença
//!
//! Este crate rotula cada sentença de uma review de produto como positiva,
//! neutra ou negativa, usando um Hidden Markov Model de três estados. As
//! observações são as palavras de um léxico de polaridade; o rótulo do
//! documento entra apenas como prior nas emissões.
//!
//! ## Arquitetura do Sistema
//!
//! O treinamento é uma única passada pelo corpus rotulado; a inferência só lê
//! as tabelas resultantes:
//!
//! 1.  **Entrada**: corpus de reviews rotuladas por sentença ([`corpus`]) e léxico MPQA ([`lexicon`]).
//! 2.  **Tokenização** ([`tokenizer`]): pontuação separada, minúsculas.
//! 3.  **Transições** ([`transition`]): P(s_t | s_{t-1}) e P(s_0), esparsas, sem suavização.
//! 4.  **Features** ([`smoothing`]): P(palavra | estado) com suavização Good-Turing (Katz).
//! 5.  **Emissões** ([`emission`]): verossimilhança de cada sentença com multiplicadores de polaridade e documento.
//! 6.  **Decodificação** ([`viterbi`]): melhor sequência de estados por review.
//! 7.  **Saída**: um score `1 | 0 | -1` por sentença ([`pipeline::format_output`]).
//!
//! ## Exemplo de Uso
//!
//! ```rust
//! use sentiment_core::{DecoderMode, Review, SentimentPipeline, State};
//!
//! // 1. Treina com o corpus e o léxico de demonstração embutidos
//! let pipeline = SentimentPipeline::demo().unwrap();
//!
//! // 2. Uma review sem gabarito, com rótulo de documento positivo
//! let review = Review::unlabeled(State::Pos, &["The sound is excellent .", "It came in a box ."]);
//!
//! // 3. Decodifica com HMM + Viterbi
//! let labels = pipeline.analyze(&review, DecoderMode::Hmm);
//! assert_eq!(labels.len(), 2);
//!
//! for (sentence, label) in review.sentences.iter().zip(&labels) {
//!     println!("{} -> {}", sentence.text, label.score());
//! }
//! ```
//!
//! ## Módulos Principais
//!
//! - [`hmm`]: treinamento e montagem do modelo.
//! - [`pipeline`]: orquestrador com eventos, lote paralelo e avaliação.
//! - [`baseline`]: rotulador de referência por limiar.

pub mod baseline;
pub mod config;
pub mod corpus;
pub mod emission;
pub mod error;
pub mod hmm;
pub mod lexicon;
pub mod pipeline;
pub mod smoothing;
pub mod state;
pub mod tokenizer;
pub mod transition;
pub mod viterbi;

pub use config::TaggerConfig;
pub use corpus::Review;
pub use error::{Result, SentimentError};
pub use hmm::SentimentHmm;
pub use lexicon::{LexiconTable, Polarity};
pub use pipeline::{DecoderMode, PipelineEvent, SentimentPipeline};
pub use state::State;
