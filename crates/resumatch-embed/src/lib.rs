//! Sentence embeddings for resume and query text.
//!
//! `SentenceEmbedder` wraps the all-MiniLM-L6-v2 BERT checkpoint via
//! candle: tokenize, forward pass, masked mean pooling, L2 normalization.
//! The model loads once per process and is read-only afterwards, so calls
//! are safe from any number of threads. `HashEmbedder` is the
//! deterministic stand-in for tests and offline runs, selected with
//! `APP_USE_FAKE_EMBEDDINGS=1`.

use anyhow::Result;
use std::path::{Path, PathBuf};

use candle_core::{Device, Tensor};
use candle_nn::VarBuilder;
use candle_transformers::models::bert::{BertModel, Config as BertConfig, DTYPE};
use tokenizers::Tokenizer;
use tracing::{debug, info, warn};

use resumatch_core::error::Error;
use resumatch_core::traits::Embedder;

mod device;
mod pool;
mod tokenize;

pub use device::select_device;
pub use pool::masked_mean_l2;
pub use tokenize::tokenize_on_device;

/// Embedding dimensionality of the MiniLM checkpoint.
pub const EMBEDDING_DIM: usize = 384;
/// Token limit per text; longer inputs are truncated.
pub const MAX_TOKENS: usize = 256;

pub struct SentenceEmbedder {
    model: BertModel,
    tokenizer: Tokenizer,
    device: Device,
    id: String,
}

impl SentenceEmbedder {
    /// Load the model from the resolved model directory. A missing
    /// directory or unreadable weights fail with
    /// [`Error::ModelUnavailable`]; this is the fatal startup path and is
    /// not retried.
    pub fn load() -> Result<Self> {
        let model_dir = resolve_model_dir()?;
        Self::load_from(&model_dir)
    }

    pub fn load_from(model_dir: &Path) -> Result<Self> {
        let device = select_device();
        info!(dir = %model_dir.display(), "loading sentence embedding model");

        let tokenizer_path = model_dir.join("tokenizer.json");
        let tokenizer = Tokenizer::from_file(&tokenizer_path).map_err(|e| {
            Error::ModelUnavailable(format!("tokenizer {}: {e}", tokenizer_path.display()))
        })?;

        let config_path = model_dir.join("config.json");
        let config_raw = std::fs::read_to_string(&config_path).map_err(|e| {
            Error::ModelUnavailable(format!("config {}: {e}", config_path.display()))
        })?;
        let config: BertConfig = serde_json::from_str(&config_raw)
            .map_err(|e| Error::ModelUnavailable(format!("config parse: {e}")))?;

        let vb = load_weights(model_dir, &device)?;
        let model = BertModel::load(vb, &config)
            .map_err(|e| Error::ModelUnavailable(format!("model weights: {e}")))?;

        info!("sentence embedding model ready");
        Ok(Self { model, tokenizer, device, id: format!("minilm-l6:d{EMBEDDING_DIM}") })
    }

    fn embed_one(&self, text: &str) -> Result<Vec<f32>> {
        let encoded = tokenize_on_device(&self.tokenizer, text, MAX_TOKENS, &self.device);
        let (input_ids, attention_mask) = match encoded {
            Ok(t) => t,
            Err(e) => {
                // Untokenizable input degrades to the empty-string
                // sentinel so indexing and search stay total.
                warn!(error = %e, "tokenization failed; embedding empty sentinel");
                tokenize_on_device(&self.tokenizer, "", MAX_TOKENS, &self.device)?
            }
        };
        let token_type_ids = input_ids.zeros_like()?;
        let hidden = self.model.forward(&input_ids, &token_type_ids, Some(&attention_mask))?;
        let pooled = masked_mean_l2(&hidden, &attention_mask)?;
        let vector = pooled.squeeze(0)?.to_device(&Device::Cpu)?.to_vec1::<f32>()?;
        debug_assert_eq!(vector.len(), EMBEDDING_DIM);
        Ok(vector)
    }
}

impl Embedder for SentenceEmbedder {
    fn id(&self) -> &str {
        &self.id
    }

    fn dim(&self) -> usize {
        EMBEDDING_DIM
    }

    fn max_len(&self) -> usize {
        MAX_TOKENS
    }

    fn embed_batch(&self, texts: &[String]) -> Result<Vec<Vec<f32>>> {
        texts.iter().map(|t| self.embed_one(t)).collect()
    }
}

/// Deterministic bag-of-words embedder: each whitespace token hashes to a
/// bucket, the bucket accumulates a hash-derived weight, and the vector is
/// L2-normalized. No model files needed; identical text gives identical
/// vectors.
pub struct HashEmbedder {
    dim: usize,
    id: String,
}

impl HashEmbedder {
    pub fn new(dim: usize) -> Self {
        Self { dim, id: format!("hash:d{dim}") }
    }

    fn embed_one(&self, text: &str) -> Vec<f32> {
        use std::hash::{Hash, Hasher};
        use twox_hash::XxHash64;

        let mut v = vec![0f32; self.dim];
        for (i, token) in text.to_lowercase().split_whitespace().enumerate() {
            let mut hasher = XxHash64::with_seed(0);
            token.hash(&mut hasher);
            let h = hasher.finish();
            let idx = (h as usize) % self.dim;
            let weight = ((h >> 32) as u32) as f32 / u32::MAX as f32;
            v[idx] += weight + (i % 3) as f32 * 0.01;
        }
        // Empty text hashes to the zero vector; the floor keeps it finite.
        let norm = v.iter().map(|x| x * x).sum::<f32>().sqrt().max(1e-6);
        for x in &mut v {
            *x /= norm;
        }
        v
    }
}

impl Default for HashEmbedder {
    fn default() -> Self {
        Self::new(EMBEDDING_DIM)
    }
}

impl Embedder for HashEmbedder {
    fn id(&self) -> &str {
        &self.id
    }

    fn dim(&self) -> usize {
        self.dim
    }

    fn max_len(&self) -> usize {
        usize::MAX
    }

    fn embed_batch(&self, texts: &[String]) -> Result<Vec<Vec<f32>>> {
        Ok(texts.iter().map(|t| self.embed_one(t)).collect())
    }
}

/// The embedder the binaries use: the hash embedder when
/// `APP_USE_FAKE_EMBEDDINGS` is set, otherwise the MiniLM model.
pub fn get_default_embedder() -> Result<Box<dyn Embedder>> {
    let use_fake = std::env::var("APP_USE_FAKE_EMBEDDINGS")
        .ok()
        .map(|v| v == "1" || v.eq_ignore_ascii_case("true"))
        .unwrap_or(false);
    if use_fake {
        debug!("using deterministic hash embeddings");
        return Ok(Box::new(HashEmbedder::default()));
    }
    Ok(Box::new(SentenceEmbedder::load()?))
}

fn load_weights(model_dir: &Path, device: &Device) -> Result<VarBuilder<'static>> {
    let safetensors = model_dir.join("model.safetensors");
    if safetensors.exists() {
        // Safety: weight files are never mutated while mapped.
        let vb = unsafe { VarBuilder::from_mmaped_safetensors(&[safetensors], DTYPE, device)? };
        return Ok(vb);
    }
    let pickled = model_dir.join("pytorch_model.bin");
    if pickled.exists() {
        let tensors = candle_core::pickle::read_all(&pickled)?;
        let map: std::collections::HashMap<String, Tensor> = tensors.into_iter().collect();
        return Ok(VarBuilder::from_tensors(map, DTYPE, device));
    }
    Err(Error::ModelUnavailable(format!(
        "no model.safetensors or pytorch_model.bin under {}",
        model_dir.display()
    ))
    .into())
}

fn resolve_model_dir() -> Result<PathBuf> {
    for var in ["APP_MODEL_DIR", "MODEL_DIR"] {
        if let Ok(dir) = std::env::var(var) {
            let p = PathBuf::from(&dir);
            if p.exists() {
                debug!(var, dir = %p.display(), "model directory from environment");
                return Ok(p);
            }
        }
    }
    for candidate in ["models/all-MiniLM-L6-v2", "../models/all-MiniLM-L6-v2"] {
        let p = Path::new(candidate);
        if p.exists() {
            debug!(dir = %p.display(), "model directory from default location");
            return Ok(p.to_path_buf());
        }
    }
    Err(Error::ModelUnavailable(
        "could not locate the all-MiniLM-L6-v2 model directory; set APP_MODEL_DIR".to_string(),
    )
    .into())
}
