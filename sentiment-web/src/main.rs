//! Servidor web Axum com WebSocket para rotulação de sentimento em tempo real

use axum::{
    extract::{
        ws::{Message, WebSocket, WebSocketUpgrade},
        State,
    },
    http::StatusCode,
    response::{IntoResponse, Json},
    routing::{get, post},
    Router,
};
use sentiment_core::{
    corpus::{demo_texts, Review},
    pipeline::{review_from_text, DecoderMode, PipelineEvent, SentimentPipeline},
    State as SentimentState,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

/// Estado compartilhado da aplicação
struct AppState {
    pipeline: SentimentPipeline,
}

/// Corpo aceito tanto pelo POST /analyze quanto pelas mensagens do WebSocket.
///
/// `text` é texto livre (dividido em sentenças no servidor); `sentences` já
/// vem dividido e tem prioridade.
#[derive(Deserialize)]
struct AnalyzeRequest {
    #[serde(default)]
    text: String,
    #[serde(default)]
    sentences: Option<Vec<String>>,
    /// "pos", "neu" ou "neg"; ausente → "neu"
    #[serde(default)]
    doc_label: Option<String>,
    #[serde(default)]
    mode: Option<DecoderMode>,
}

impl AnalyzeRequest {
    fn into_review(self) -> Result<(Review, DecoderMode), String> {
        let doc_label = match self.doc_label.as_deref() {
            None => SentimentState::Neu,
            Some(label) => SentimentState::from_label(label)
                .ok_or_else(|| format!("Rótulo de documento inválido: {}", label))?,
        };
        let review = match self.sentences {
            Some(sentences) => {
                let sentences: Vec<&str> = sentences
                    .iter()
                    .map(|s| s.trim())
                    .filter(|s| !s.is_empty())
                    .collect();
                Review::unlabeled(doc_label, &sentences)
            }
            None => review_from_text(&self.text, doc_label),
        };
        if review.is_empty() {
            return Err("Texto vazio".into());
        }
        Ok((review, self.mode.unwrap_or_default()))
    }
}

#[derive(Serialize)]
struct AnalyzeResponse {
    sentences: Vec<String>,
    labels: Vec<SentimentState>,
    scores: Vec<i8>,
    total_sentences: usize,
    processing_ms: u64,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let pipeline = SentimentPipeline::demo()?;
    let state = Arc::new(AppState { pipeline });

    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let app = Router::new()
        .route("/analyze", post(analyze_handler))
        .route("/ws", get(ws_handler))
        .route("/demo-texts", get(demo_texts_handler))
        .layer(cors)
        .with_state(state);

    let listener = tokio::net::TcpListener::bind("0.0.0.0:3000").await?;
    info!("Servidor de sentimento iniciado em http://localhost:3000");
    axum::serve(listener, app).await?;
    Ok(())
}

/// Rotulação via HTTP POST (sem streaming)
async fn analyze_handler(
    State(state): State<Arc<AppState>>,
    Json(req): Json<AnalyzeRequest>,
) -> impl IntoResponse {
    let (review, mode) = match req.into_review() {
        Ok(parsed) => parsed,
        Err(message) => {
            return (
                StatusCode::BAD_REQUEST,
                Json(serde_json::json!({"error": message})),
            )
                .into_response();
        }
    };

    let pipeline = Arc::clone(&state);
    let started = std::time::Instant::now();
    let result = tokio::task::spawn_blocking(move || {
        let labels = pipeline.pipeline.analyze(&review, mode);
        (review, labels)
    })
    .await;

    let (review, labels) = match result {
        Ok(done) => done,
        Err(err) => {
            warn!("Falha no pipeline: {}", err);
            return (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(serde_json::json!({"error": "Falha no pipeline"})),
            )
                .into_response();
        }
    };

    Json(AnalyzeResponse {
        sentences: review.sentences.into_iter().map(|s| s.text).collect(),
        scores: labels.iter().map(SentimentState::score).collect(),
        total_sentences: labels.len(),
        labels,
        processing_ms: started.elapsed().as_millis() as u64,
    })
    .into_response()
}

/// Retorna textos de demonstração
async fn demo_texts_handler() -> impl IntoResponse {
    let texts: Vec<serde_json::Value> = demo_texts()
        .iter()
        .map(|(doc_label, text)| {
            serde_json::json!({
                "doc_label": doc_label,
                "text": text
            })
        })
        .collect();
    Json(texts)
}

/// Upgrade HTTP → WebSocket
async fn ws_handler(
    ws: WebSocketUpgrade,
    State(state): State<Arc<AppState>>,
) -> impl IntoResponse {
    ws.on_upgrade(move |socket| handle_websocket(socket, state))
}

/// Recebe uma review, executa o pipeline e envia os eventos passo a passo
async fn handle_websocket(mut socket: WebSocket, state: Arc<AppState>) {
    info!("WebSocket conectado");

    while let Some(Ok(msg)) = socket.recv().await {
        match msg {
            Message::Text(text) => {
                // JSON {text, sentences, doc_label, mode}; senão o texto puro vira a review
                let request = serde_json::from_str::<AnalyzeRequest>(&text).unwrap_or_else(|_| AnalyzeRequest {
                    text: text.clone(),
                    sentences: None,
                    doc_label: None,
                    mode: None,
                });

                let (review, mode) = match request.into_review() {
                    Ok(parsed) => parsed,
                    Err(message) => {
                        let error = PipelineEvent::Error { message };
                        if let Ok(json) = serde_json::to_string(&error) {
                            if socket.send(Message::Text(json)).await.is_err() {
                                return;
                            }
                        }
                        continue;
                    }
                };

                info!("Analisando via WebSocket [{:?}]: {} sentenças", mode, review.len());

                // O pipeline é síncrono: roda fora do runtime e devolve os eventos pelo canal
                let (tx, rx) = std::sync::mpsc::channel::<PipelineEvent>();
                let pipeline = Arc::clone(&state);
                let handle = tokio::task::spawn_blocking(move || {
                    pipeline.pipeline.analyze_streaming(&review, mode, tx);
                });

                if let Err(err) = handle.await {
                    warn!("Falha no pipeline: {}", err);
                    continue;
                }

                let events: Vec<PipelineEvent> = rx.try_iter().collect();
                for event in &events {
                    if let Ok(json) = serde_json::to_string(event) {
                        if socket.send(Message::Text(json)).await.is_err() {
                            return; // cliente desconectou
                        }
                        // Pequena pausa para animação visual (passo a passo)
                        tokio::time::sleep(tokio::time::Duration::from_millis(35)).await;
                    }
                }
            }
            Message::Close(_) => {
                info!("WebSocket desconectado");
                return;
            }
            Message::Ping(payload) => {
                let _ = socket.send(Message::Pong(payload)).await;
            }
            _ => {}
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request(json: &str) -> AnalyzeRequest {
        serde_json::from_str(json).unwrap()
    }

    #[test]
    fn test_free_text_request() {
        let (review, mode) = request(r#"{"text": "Great sound. Weak battery.", "doc_label": "pos"}"#)
            .into_review()
            .unwrap();
        assert_eq!(review.len(), 2);
        assert_eq!(review.doc_label, SentimentState::Pos);
        assert_eq!(mode, DecoderMode::Hmm);
    }

    #[test]
    fn test_sentences_take_priority() {
        let (review, mode) = request(r#"{"text": "ignored", "sentences": ["a .", " ", "b ."], "mode": "baseline"}"#)
            .into_review()
            .unwrap();
        assert_eq!(review.len(), 2);
        assert_eq!(review.doc_label, SentimentState::Neu);
        assert_eq!(mode, DecoderMode::Baseline);
    }

    #[test]
    fn test_invalid_requests() {
        assert!(request(r#"{"text": "   "}"#).into_review().is_err());
        assert!(request(r#"{"text": "ok .", "doc_label": "mixed"}"#).into_review().is_err());
    }
}
