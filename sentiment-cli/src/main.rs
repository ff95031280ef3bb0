//! Rotulador de sentimento em lote
//!
//! Treina o HMM a partir de um corpus rotulado e de um léxico MPQA (ou carrega
//! um modelo salvo) e imprime um score `1 | 0 | -1` por sentença da entrada.

use std::fs;
use std::path::PathBuf;
use std::time::Instant;

use clap::Parser;
use sentiment_core::{
    corpus::{demo_corpus, demo_lexicon, parse_corpus_file},
    lexicon::parse_lexicon_file,
    pipeline::{format_output, EvaluationReport},
    DecoderMode, SentimentHmm, SentimentPipeline, TaggerConfig,
};
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(about = "Rotula o sentimento de cada sentença de reviews de produtos.")]
struct Args {
    /// Corpus de treinamento (cabeçalho por review, uma sentença rotulada por linha)
    #[arg(long)]
    corpus: Option<PathBuf>,

    /// Léxico de subjetividade no formato MPQA
    #[arg(long)]
    lexicon: Option<PathBuf>,

    /// Modelo JSON salvo com --dump-model; substitui o treinamento e seus parâmetros
    #[arg(
        long,
        conflicts_with_all = [
            "corpus",
            "lexicon",
            "k",
            "neutral_init",
            "no_polarity_weighting",
            "no_document_prior",
        ]
    )]
    model: Option<PathBuf>,

    /// Reviews a rotular, no formato do corpus (padrão: o próprio corpus de treinamento)
    #[arg(long)]
    input: Option<PathBuf>,

    /// Corte k do Good-Turing
    #[arg(long, default_value = "5")]
    k: usize,

    /// Constante do desconto de comprimento do canal neutro
    #[arg(long, default_value = "3.0")]
    neutral_init: f64,

    /// Desliga os multiplicadores de polaridade das emissões
    #[arg(long)]
    no_polarity_weighting: bool,

    /// Desliga o prior do rótulo do documento
    #[arg(long)]
    no_document_prior: bool,

    /// Usa o rotulador baseline em vez do HMM
    #[arg(long)]
    baseline: bool,

    /// Salva o modelo treinado em JSON
    #[arg(long)]
    dump_model: Option<PathBuf>,

    /// Prefixa cada linha com o contador de sentenças
    #[arg(long)]
    with_counter: bool,
}

impl Args {
    fn config(&self) -> TaggerConfig {
        TaggerConfig {
            good_turing_k: self.k,
            neutral_init: self.neutral_init,
            polarity_weighting: !self.no_polarity_weighting,
            document_prior: !self.no_document_prior,
            ..TaggerConfig::default()
        }
    }
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();

    let training = match &args.corpus {
        Some(path) => {
            info!("Carregando corpus {:?} ...", path);
            parse_corpus_file(path)?
        }
        None => demo_corpus(),
    };

    let model = match &args.model {
        Some(path) => {
            info!("Carregando modelo {:?} ...", path);
            SentimentHmm::from_json(&fs::read_to_string(path)?)?
        }
        None => {
            let lexicon = match &args.lexicon {
                Some(path) => {
                    info!("Carregando léxico {:?} ...", path);
                    parse_lexicon_file(path)?
                }
                None => demo_lexicon(),
            };
            SentimentHmm::train(&training, lexicon, args.config())?
        }
    };

    if let Some(path) = &args.dump_model {
        fs::write(path, model.to_json()?)?;
        info!("Modelo salvo em {:?}", path);
    }

    let reviews = match &args.input {
        Some(path) => parse_corpus_file(path)?,
        None => training,
    };

    let mode = if args.baseline {
        DecoderMode::Baseline
    } else {
        DecoderMode::Hmm
    };

    let pipeline = SentimentPipeline::new(model);
    let start = Instant::now();
    let labels = pipeline.tag_reviews(&reviews, mode);
    let duration = start.elapsed();

    for line in format_output(&labels, args.with_counter) {
        println!("{}", line);
    }

    let report = EvaluationReport::compare(&labels, &reviews);
    info!(
        "{} reviews, {} sentenças em {:.3} s ({:?})",
        reviews.len(),
        report.total,
        duration.as_secs_f64(),
        mode
    );
    info!(
        "Acurácia contra o gabarito da entrada: {}/{} = {:.4}",
        report.correct, report.total, report.accuracy
    );

    Ok(())
}
