//! In-process sentence embeddings with Candle.
//!
//! Runs a BERT-family sentence-transformer (by default
//! `sentence-transformers/paraphrase-MiniLM-L6-v2`) on the CPU, so the semantic
//! path needs no embedding server. Model files are fetched from the HuggingFace
//! Hub on first use and cached under `HF_HOME`.
//!
//! Requires the `embeddings-candle` feature.

use std::sync::Arc;

use async_trait::async_trait;
use candle_core::{DType, Device, Tensor};
use candle_nn::VarBuilder;
use candle_transformers::models::bert::{BertModel, Config, DTYPE};
use hf_hub::api::sync::ApiBuilder;
use hf_hub::{Repo, RepoType};
use tokenizers::Tokenizer;

use crate::embedding::text_embedder::TextEmbedder;
use crate::error::{Result, TriageError};
use crate::vector::Vector;

struct LocalModel {
    model: BertModel,
    tokenizer: Tokenizer,
    device: Device,
}

/// Sentence embedder running a BERT model in-process.
///
/// Inference runs on the blocking thread pool, so a per-call timeout around
/// [`embed`](TextEmbedder::embed) still returns on time.
///
/// # Examples
///
/// ```no_run
/// use ticket_triage::embedding::local_text_embedder::LocalTextEmbedder;
/// use ticket_triage::embedding::text_embedder::TextEmbedder;
///
/// # async fn example() -> ticket_triage::error::Result<()> {
/// let embedder = LocalTextEmbedder::new("sentence-transformers/paraphrase-MiniLM-L6-v2")?;
/// let vector = embedder.embed("Mera internet bahut slow hai").await?;
/// assert_eq!(vector.dimension(), embedder.dimension());
/// # Ok(())
/// # }
/// ```
#[derive(Clone)]
pub struct LocalTextEmbedder {
    inner: Arc<LocalModel>,
    dimension: usize,
    model_name: String,
}

impl std::fmt::Debug for LocalTextEmbedder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LocalTextEmbedder")
            .field("model_name", &self.model_name)
            .field("dimension", &self.dimension)
            .finish()
    }
}

fn model_error(context: &str, e: impl std::fmt::Display) -> TriageError {
    TriageError::embedding(format!("{context}: {e}"))
}

impl LocalTextEmbedder {
    /// Load a model from the HuggingFace Hub, downloading it if it is not cached.
    pub fn new(model_name: &str) -> Result<Self> {
        log::info!("loading local embedding model {model_name}");
        let device = Device::Cpu;

        let cache_dir = std::env::var("HF_HOME")
            .or_else(|_| std::env::var("HOME").map(|home| format!("{home}/.cache/huggingface")))
            .unwrap_or_else(|_| "/tmp/huggingface".to_string());

        let api = ApiBuilder::new()
            .with_cache_dir(cache_dir.into())
            .build()
            .map_err(|e| model_error("HF API initialization failed", e))?;
        let repo = api.repo(Repo::new(model_name.to_string(), RepoType::Model));

        let config_path = repo
            .get("config.json")
            .map_err(|e| model_error("config download failed", e))?;
        let tokenizer_path = repo
            .get("tokenizer.json")
            .map_err(|e| model_error("tokenizer download failed", e))?;
        let weights_path = repo
            .get("model.safetensors")
            .map_err(|e| model_error("weights download failed", e))?;

        let config: Config = serde_json::from_str(&std::fs::read_to_string(config_path)?)?;
        let tokenizer = Tokenizer::from_file(tokenizer_path)
            .map_err(|e| model_error("tokenizer load failed", e))?;

        let vb = unsafe {
            VarBuilder::from_mmaped_safetensors(&[weights_path], DTYPE, &device)
                .map_err(|e| model_error("weights load failed", e))?
        };
        let model =
            BertModel::load(vb, &config).map_err(|e| model_error("model load failed", e))?;

        log::info!(
            "local embedding model {model_name} loaded ({} dimensions)",
            config.hidden_size
        );

        Ok(Self {
            inner: Arc::new(LocalModel {
                model,
                tokenizer,
                device,
            }),
            dimension: config.hidden_size,
            model_name: model_name.to_string(),
        })
    }

    /// Output dimension of the model.
    pub fn dimension(&self) -> usize {
        self.dimension
    }

    async fn run(&self, texts: Vec<String>) -> Result<Vec<Vector>> {
        let inner = self.inner.clone();
        tokio::task::spawn_blocking(move || inner.embed_texts(&texts))
            .await
            .map_err(|e| model_error("embedding task failed", e))?
    }
}

impl LocalModel {
    fn embed_texts(&self, texts: &[String]) -> Result<Vec<Vector>> {
        if texts.is_empty() {
            return Ok(Vec::new());
        }
        self.forward(texts)
            .map_err(|e| model_error("inference failed", e))
    }

    /// Batch forward pass with mean pooling over non-padding tokens, then L2
    /// normalisation.
    fn forward(&self, texts: &[String]) -> std::result::Result<Vec<Vector>, candle_core::Error> {
        let encodings = self
            .tokenizer
            .encode_batch(texts.to_vec(), true)
            .map_err(candle_core::Error::msg)?;

        let max_len = encodings
            .iter()
            .map(|e| e.get_ids().len())
            .max()
            .unwrap_or(0);

        let mut input_ids = Vec::with_capacity(texts.len() * max_len);
        let mut attention = Vec::with_capacity(texts.len() * max_len);
        let mut type_ids = Vec::with_capacity(texts.len() * max_len);
        for encoding in &encodings {
            let pad = max_len - encoding.get_ids().len();
            input_ids.extend_from_slice(encoding.get_ids());
            input_ids.extend(std::iter::repeat_n(0, pad));
            attention.extend_from_slice(encoding.get_attention_mask());
            attention.extend(std::iter::repeat_n(0, pad));
            type_ids.extend_from_slice(encoding.get_type_ids());
            type_ids.extend(std::iter::repeat_n(0, pad));
        }

        let shape = (texts.len(), max_len);
        let input_ids = Tensor::from_vec(input_ids, shape, &self.device)?;
        let attention_mask = Tensor::from_vec(attention, shape, &self.device)?;
        let token_type_ids = Tensor::from_vec(type_ids, shape, &self.device)?;

        let output = self
            .model
            .forward(&input_ids, &token_type_ids, Some(&attention_mask))?;

        // (batch, seq, hidden) -> (batch, hidden)
        let mask = attention_mask.to_dtype(DType::F32)?.unsqueeze(2)?;
        let summed = output.broadcast_mul(&mask)?.sum(1)?;
        let counts = mask.sum(1)?.clamp(1e-9, f64::MAX)?;
        let pooled = summed.broadcast_div(&counts)?;

        let norm = pooled
            .sqr()?
            .sum_keepdim(1)?
            .sqrt()?
            .clamp(1e-12, f64::MAX)?;
        let normalized = pooled.broadcast_div(&norm)?;

        Ok(normalized
            .to_vec2::<f32>()?
            .into_iter()
            .map(Vector::new)
            .collect())
    }
}

#[async_trait]
impl TextEmbedder for LocalTextEmbedder {
    async fn embed(&self, text: &str) -> Result<Vector> {
        self.run(vec![text.to_string()])
            .await?
            .into_iter()
            .next()
            .ok_or_else(|| TriageError::embedding("model returned no vector"))
    }

    async fn embed_batch(&self, texts: &[&str]) -> Result<Vec<Vector>> {
        let vectors = self
            .run(texts.iter().map(|t| t.to_string()).collect())
            .await?;
        if vectors.len() != texts.len() {
            return Err(TriageError::embedding(format!(
                "model returned {} vectors for {} texts",
                vectors.len(),
                texts.len()
            )));
        }
        Ok(vectors)
    }

    fn name(&self) -> &str {
        &self.model_name
    }
}
