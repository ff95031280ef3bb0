//! Erros do crate.
//!
//! A matemática do modelo (transições, suavização, emissões, Viterbi) nunca
//! falha: casos degenerados viram probabilidade zero ou o vetor neutro. Só a
//! leitura de arquivos e as pré-condições do treinamento podem falhar.

use std::path::PathBuf;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum SentimentError {
    #[error("falha ao ler {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("corpus de treinamento sem nenhuma sentença rotulada")]
    EmptyCorpus,

    #[error("léxico de polaridade vazio")]
    EmptyLexicon,

    #[error("erro de serialização: {0}")]
    Serialization(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, SentimentError>;

/// Lê um arquivo texto inteiro, anexando o caminho ao erro.
pub(crate) fn read_to_string(path: &std::path::Path) -> Result<String> {
    std::fs::read_to_string(path).map_err(|source| SentimentError::Io {
        path: path.to_path_buf(),
        source,
    })
}
