//! # Corpus de Reviews Rotuladas por Sentença
//!
//! Formato do arquivo de treinamento (o mesmo usado na inferência com gabarito):
//!
//! ```text
//! electronics_pos_1
//! pos this camera takes great pictures .
//! neu i bought it last month .
//!
//! books_neg_2
//! neg the plot is boring and predictable .
//! ```
//!
//! - **Cabeçalho** (`dominio_rotulo_id`): abre uma review e fornece o rótulo do
//!   documento, usado apenas como prior multiplicativo nas emissões.
//! - **Sentença**: prefixo de 3 caracteres (`pos`, `neu`, `neg`), um espaço e o texto.
//! - **Linha em branco**: encerra a review.
//! - Qualquer outra linha é ignorada.
//!
//! Este módulo também embute um pequeno corpus e léxico de demonstração,
//! usados pelo servidor web e pela CLI quando nenhum arquivo é informado.

use std::path::Path;
use std::sync::OnceLock;

use regex::Regex;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{read_to_string, Result};
use crate::lexicon::{parse_lexicon, LexiconTable};
use crate::state::State;

/// Uma sentença com seu rótulo de ouro.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LabeledSentence {
    pub text: String,
    pub state: State,
}

/// Uma review: sequência ordenada de sentenças + rótulo do documento.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Review {
    /// Cabeçalho como aparece no corpus (ex: "electronics_neg_7"), se havia um.
    pub header: Option<String>,
    /// Sentimento do documento, extraído do cabeçalho. Nunca é usado como gabarito
    /// durante a decodificação, apenas como prior.
    pub doc_label: State,
    pub sentences: Vec<LabeledSentence>,
}

impl Review {
    pub fn new(header: Option<String>, doc_label: State) -> Self {
        Self {
            header,
            doc_label,
            sentences: Vec::new(),
        }
    }

    /// Review sem gabarito a partir de sentenças soltas (os rótulos ficam NEU).
    pub fn unlabeled<S: AsRef<str>>(doc_label: State, sentences: &[S]) -> Self {
        Self {
            header: None,
            doc_label,
            sentences: sentences
                .iter()
                .map(|s| LabeledSentence {
                    text: s.as_ref().to_string(),
                    state: State::Neu,
                })
                .collect(),
        }
    }

    pub fn len(&self) -> usize {
        self.sentences.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sentences.is_empty()
    }

    /// Rótulos de ouro na ordem das sentenças.
    pub fn gold_states(&self) -> Vec<State> {
        self.sentences.iter().map(|s| s.state).collect()
    }
}

fn header_pattern() -> &'static Regex {
    static HEADER: OnceLock<Regex> = OnceLock::new();
    HEADER.get_or_init(|| Regex::new(r"^[a-z]*_([a-z]*)_[0-9]*$").expect("regex de cabeçalho válida"))
}

/// Extrai o rótulo do documento de um cabeçalho. `None` se a linha não é cabeçalho.
///
/// Rótulos desconhecidos no cabeçalho viram NEU.
pub fn parse_header(line: &str) -> Option<State> {
    let caps = header_pattern().captures(line)?;
    let label = caps.get(1).map(|m| m.as_str()).unwrap_or("");
    Some(State::from_label(label).unwrap_or(State::Neu))
}

/// Parseia uma linha de sentença (`pos texto...`). `None` se não for sentença.
pub fn parse_sentence_line(line: &str) -> Option<LabeledSentence> {
    let label = line.get(..3)?;
    let state = State::from_label(label)?;
    let rest = &line[3..];
    let text = match rest.strip_prefix(' ') {
        Some(text) => text,
        None if rest.is_empty() => "",
        None => return None,
    };
    Some(LabeledSentence {
        text: text.to_string(),
        state,
    })
}

/// Parseia o corpus completo. Reviews sem sentenças são descartadas.
pub fn parse_corpus(source: &str) -> Vec<Review> {
    let mut reviews = Vec::new();
    let mut current: Option<Review> = None;

    for raw in source.lines() {
        let line = raw.trim_end_matches('\r');

        if line.trim().is_empty() {
            close_review(&mut reviews, current.take());
        } else if let Some(doc_label) = parse_header(line) {
            close_review(&mut reviews, current.take());
            current = Some(Review::new(Some(line.to_string()), doc_label));
        } else if let Some(sentence) = parse_sentence_line(line) {
            current
                .get_or_insert_with(|| Review::new(None, State::Neu))
                .sentences
                .push(sentence);
        } else {
            debug!("linha de corpus ignorada: {line}");
        }
    }
    close_review(&mut reviews, current);

    debug!(
        "corpus carregado: {} reviews, {} sentenças",
        reviews.len(),
        reviews.iter().map(Review::len).sum::<usize>()
    );
    reviews
}

fn close_review(reviews: &mut Vec<Review>, review: Option<Review>) {
    if let Some(review) = review {
        if !review.is_empty() {
            reviews.push(review);
        }
    }
}

/// Lê e parseia um arquivo de corpus.
pub fn parse_corpus_file(path: impl AsRef<Path>) -> Result<Vec<Review>> {
    let source = read_to_string(path.as_ref())?;
    Ok(parse_corpus(&source))
}

/// Corpus de demonstração, no formato de treinamento.
pub const DEMO_CORPUS: &str = "\
electronics_pos_1
pos this camera takes great pictures even in low light .
neu i bought it for a trip to the mountains .
pos the battery life is excellent and the menus are easy to use .
pos i love it !

electronics_neg_2
neu i ordered this router in march .
neg the signal is weak and the connection drops every hour .
neg support was useless and rude .
neu i returned it after two weeks .

books_pos_3
pos a wonderful story with beautiful writing .
pos the characters feel real and the ending is perfect .
neu the book has about four hundred pages .

books_neg_4
neg the plot is boring and predictable .
neg i was disappointed by the awful dialogue .
neu it is the second book in the series .
neg not worth the money .

kitchen_neu_5
neu the blender arrives with two jars and a lid .
pos it is quiet and powerful .
neg the lid is cheap and cracked after a month .
neu it fits under the cabinet .

music_pos_6
neu the album was released in the spring .
pos the songs are catchy and the production is excellent .
pos a great record , highly recommended .

dvd_neg_7
neg terrible acting and a poor script .
neg the picture quality is bad .
neu the disc includes a short interview .
neg i hated every minute .

electronics_pos_8
pos excellent keyboard with a nice feel .
neu the cable is two meters long .
pos the keys are quiet and comfortable .
";

/// Léxico de demonstração, no formato MPQA.
pub const DEMO_LEXICON: &str = "\
type=strongsubj len=1 word1=great pos1=adj stemmed1=n priorpolarity=positive
type=strongsubj len=1 word1=excellent pos1=adj stemmed1=n priorpolarity=positive
type=strongsubj len=1 word1=love pos1=verb stemmed1=y priorpolarity=positive
type=strongsubj len=1 word1=wonderful pos1=adj stemmed1=n priorpolarity=positive
type=strongsubj len=1 word1=beautiful pos1=adj stemmed1=n priorpolarity=positive
type=strongsubj len=1 word1=perfect pos1=adj stemmed1=n priorpolarity=positive
type=weaksubj len=1 word1=easy pos1=adj stemmed1=n priorpolarity=positive
type=weaksubj len=1 word1=real pos1=adj stemmed1=n priorpolarity=positive
type=weaksubj len=1 word1=quiet pos1=adj stemmed1=n priorpolarity=positive
type=weaksubj len=1 word1=powerful pos1=adj stemmed1=n priorpolarity=positive
type=weaksubj len=1 word1=catchy pos1=adj stemmed1=n priorpolarity=positive
type=weaksubj len=1 word1=nice pos1=adj stemmed1=n priorpolarity=positive
type=weaksubj len=1 word1=comfortable pos1=adj stemmed1=n priorpolarity=positive
type=strongsubj len=1 word1=recommended pos1=adj stemmed1=n priorpolarity=positive
type=weaksubj len=1 word1=worth pos1=adj stemmed1=n priorpolarity=positive
type=weaksubj len=1 word1=weak pos1=adj stemmed1=n priorpolarity=negative
type=strongsubj len=1 word1=useless pos1=adj stemmed1=n priorpolarity=negative
type=strongsubj len=1 word1=rude pos1=adj stemmed1=n priorpolarity=negative
type=strongsubj len=1 word1=boring pos1=adj stemmed1=n priorpolarity=negative
type=weaksubj len=1 word1=predictable pos1=adj stemmed1=n priorpolarity=negative
type=strongsubj len=1 word1=disappointed pos1=adj stemmed1=n priorpolarity=negative
type=strongsubj len=1 word1=awful pos1=adj stemmed1=n priorpolarity=negative
type=weaksubj len=1 word1=cheap pos1=adj stemmed1=n priorpolarity=negative
type=weaksubj len=1 word1=cracked pos1=adj stemmed1=n priorpolarity=negative
type=strongsubj len=1 word1=terrible pos1=adj stemmed1=n priorpolarity=negative
type=weaksubj len=1 word1=poor pos1=adj stemmed1=n priorpolarity=negative
type=strongsubj len=1 word1=bad pos1=adj stemmed1=n priorpolarity=negative
type=strongsubj len=1 word1=hated pos1=verb stemmed1=n priorpolarity=negative
type=weaksubj len=1 word1=drops pos1=verb stemmed1=n priorpolarity=negative
";

/// Corpus de demonstração já parseado.
pub fn demo_corpus() -> Vec<Review> {
    parse_corpus(DEMO_CORPUS)
}

/// Léxico de demonstração já parseado.
pub fn demo_lexicon() -> LexiconTable {
    parse_lexicon(DEMO_LEXICON)
}

/// Textos de demonstração para a interface web: (rótulo do documento, texto livre).
pub fn demo_texts() -> Vec<(&'static str, &'static str)> {
    vec![
        (
            "pos",
            "I bought these headphones for the gym. The sound is excellent and they are very comfortable. The case is a bit cheap. Still, I love them!",
        ),
        (
            "neg",
            "The vacuum arrived on time. The suction is weak and the filter cracked after a week. Customer support was useless. I would not buy it again.",
        ),
        (
            "neu",
            "The novel follows three sisters in a small town. The first half is boring. The last chapters are beautiful and the ending is perfect.",
        ),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_header() {
        assert_eq!(parse_header("electronics_neg_7"), Some(State::Neg));
        assert_eq!(parse_header("books_pos_12"), Some(State::Pos));
        assert_eq!(parse_header("dvd_neu_3"), Some(State::Neu));
        assert_eq!(parse_header("dvd_mixed_3"), Some(State::Neu));
        assert_eq!(parse_header("pos the phone is great"), None);
        assert_eq!(parse_header("Electronics_neg_7"), None);
    }

    #[test]
    fn test_parse_sentence_line() {
        let s = parse_sentence_line("neg the screen broke .").unwrap();
        assert_eq!(s.state, State::Neg);
        assert_eq!(s.text, "the screen broke .");
        assert!(parse_sentence_line("positive thinking").is_none());
        assert!(parse_sentence_line("xyz hello").is_none());
        assert_eq!(parse_sentence_line("neu").unwrap().text, "");
    }

    #[test]
    fn test_parse_corpus_reviews() {
        let source = "\
electronics_pos_1
pos great phone .
pos love it .
neu bought in may .

# stray comment line
books_neg_2
neu a long book .
neg boring .
";
        let reviews = parse_corpus(source);
        assert_eq!(reviews.len(), 2);
        assert_eq!(reviews[0].doc_label, State::Pos);
        assert_eq!(reviews[0].header.as_deref(), Some("electronics_pos_1"));
        assert_eq!(reviews[0].gold_states(), vec![State::Pos, State::Pos, State::Neu]);
        assert_eq!(reviews[1].doc_label, State::Neg);
        assert_eq!(reviews[1].gold_states(), vec![State::Neu, State::Neg]);
    }

    #[test]
    fn test_header_closes_previous_review_and_empty_reviews_dropped() {
        let source = "a_pos_1\npos fine .\nb_neg_2\nc_neu_3\n\n\nneg orphan sentence .\n";
        let reviews = parse_corpus(source);
        assert_eq!(reviews.len(), 2);
        assert_eq!(reviews[0].len(), 1);
        // Sentença sem cabeçalho abre uma review com rótulo de documento neutro
        assert_eq!(reviews[1].header, None);
        assert_eq!(reviews[1].doc_label, State::Neu);
    }

    #[test]
    fn test_demo_data_is_consistent() {
        let corpus = demo_corpus();
        assert_eq!(corpus.len(), 8);
        let lexicon = demo_lexicon();
        assert!(lexicon.len() > 20);
        assert!(lexicon.contains("excellent"));
    }
}
