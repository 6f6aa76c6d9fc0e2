//! Embedding generation providers.

use crate::error::MemoryError;
use crate::Result;
use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Trait for embedding providers.
#[async_trait]
pub trait EmbeddingProvider: Send + Sync {
    /// Get the embedding dimension.
    fn dimension(&self) -> usize;

    /// Model identifier, recorded in the metadata of stored documents.
    fn model_name(&self) -> &str;

    /// Generate embeddings for texts.
    async fn embed(&self, texts: &[String]) -> Result<Vec<Vec<f32>>>;

    /// Generate embedding for a single text.
    async fn embed_one(&self, text: &str) -> Result<Vec<f32>> {
        let embeddings = self.embed(&[text.to_string()]).await?;
        embeddings
            .into_iter()
            .next()
            .ok_or_else(|| MemoryError::Embedding("No embedding returned".to_string()))
    }
}

/// Offline embeddings built from hashed word and character-trigram features.
///
/// Vectors are deterministic and unit length. They capture lexical overlap
/// rather than meaning, which is enough to rank documents that share the
/// query's wording.
#[derive(Debug, Clone)]
pub struct HashEmbeddings {
    dimension: usize,
}

/// Words too common to help discriminate between documents.
///
/// They are down-weighted rather than dropped so a query made only of them
/// still matches text that contains them.
const STOP_WORDS: &[&str] = &[
    "the", "is", "at", "which", "on", "a", "an", "as", "are", "was", "were", "for", "to", "of",
    "in", "and", "or", "but", "with", "by", "from", "this", "that", "be", "have", "has", "had",
    "it", "its", "their", "they", "them",
];

const STOP_WORD_WEIGHT: f32 = 0.2;
const WORD_TRIGRAM_WEIGHT: f32 = 0.5;
const TEXT_TRIGRAM_WEIGHT: f32 = 0.1;

const WORD_SEED: u64 = 0xcbf2_9ce4_8422_2325;
const WORD_TRIGRAM_SEED: u64 = 0x8422_2325;
const TEXT_TRIGRAM_SEED: u64 = 0x9e37_79b9_7f4a_7c15;

impl HashEmbeddings {
    /// Create a provider producing vectors of `dimension` components.
    pub fn new(dimension: usize) -> Self {
        Self { dimension }
    }

    fn bucket(&self, feature: &str, seed: u64) -> usize {
        let hash = feature
            .bytes()
            .fold(seed, |acc, b| acc.wrapping_mul(0x100_0000_01b3).wrapping_add(b as u64));
        (hash % self.dimension as u64) as usize
    }

    fn add_trigrams(&self, vector: &mut [f32], chars: &[char], seed: u64, weight: f32) {
        for window in chars.windows(3) {
            let trigram: String = window.iter().collect();
            vector[self.bucket(&trigram, seed)] += weight;
        }
    }

    fn embed_text(&self, text: &str) -> Vec<f32> {
        let mut vector = vec![0.0f32; self.dimension];
        if self.dimension == 0 {
            return vector;
        }

        let lower = text.to_lowercase();
        let mut freq: HashMap<&str, u32> = HashMap::new();
        for word in lower.split(|c: char| !c.is_alphanumeric()).filter(|w| !w.is_empty()) {
            *freq.entry(word).or_insert(0) += 1;
        }

        for (word, count) in &freq {
            let mut weight = (*count as f32).sqrt();
            if STOP_WORDS.contains(word) {
                weight *= STOP_WORD_WEIGHT;
            }
            vector[self.bucket(word, WORD_SEED)] += weight;

            let chars: Vec<char> = word.chars().collect();
            self.add_trigrams(&mut vector, &chars, WORD_TRIGRAM_SEED, weight * WORD_TRIGRAM_WEIGHT);
        }

        // Trigrams over the whitespace-normalized text keep punctuation,
        // symbols and word boundaries as features.
        let normalized: Vec<char> = lower
            .split_whitespace()
            .collect::<Vec<_>>()
            .join(" ")
            .chars()
            .collect();
        if normalized.len() < 3 {
            if !normalized.is_empty() {
                let whole: String = normalized.iter().collect();
                vector[self.bucket(&whole, TEXT_TRIGRAM_SEED)] += TEXT_TRIGRAM_WEIGHT;
            }
        } else {
            self.add_trigrams(&mut vector, &normalized, TEXT_TRIGRAM_SEED, TEXT_TRIGRAM_WEIGHT);
        }

        let norm: f32 = vector.iter().map(|x| x * x).sum::<f32>().sqrt();
        if norm > 0.0 {
            for v in &mut vector {
                *v /= norm;
            }
        }

        vector
    }
}

#[async_trait]
impl EmbeddingProvider for HashEmbeddings {
    fn dimension(&self) -> usize {
        self.dimension
    }

    fn model_name(&self) -> &str {
        "hash-ngram-v1"
    }

    async fn embed(&self, texts: &[String]) -> Result<Vec<Vec<f32>>> {
        Ok(texts.iter().map(|t| self.embed_text(t)).collect())
    }
}

/// OpenAI embeddings provider.
pub struct OpenAIEmbeddings {
    client: Client,
    api_key: String,
    model: String,
    base_url: String,
}

impl OpenAIEmbeddings {
    /// Create a new OpenAI embeddings provider.
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            client: Client::new(),
            api_key: api_key.into(),
            model: "text-embedding-3-small".to_string(),
            base_url: "https://api.openai.com".to_string(),
        }
    }

    /// Set the model.
    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    /// Set a custom base URL.
    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into();
        self
    }
}

#[async_trait]
impl EmbeddingProvider for OpenAIEmbeddings {
    fn dimension(&self) -> usize {
        match self.model.as_str() {
            "text-embedding-3-large" => 3072,
            _ => 1536,
        }
    }

    fn model_name(&self) -> &str {
        &self.model
    }

    async fn embed(&self, texts: &[String]) -> Result<Vec<Vec<f32>>> {
        #[derive(Serialize)]
        struct Request<'a> {
            model: &'a str,
            input: &'a [String],
        }

        #[derive(Deserialize)]
        struct Response {
            data: Vec<EmbeddingData>,
        }

        #[derive(Deserialize)]
        struct EmbeddingData {
            embedding: Vec<f32>,
        }

        let response = self
            .client
            .post(format!("{}/v1/embeddings", self.base_url))
            .bearer_auth(&self.api_key)
            .json(&Request {
                model: &self.model,
                input: texts,
            })
            .send()
            .await?;

        if !response.status().is_success() {
            let text = response.text().await.unwrap_or_default();
            return Err(MemoryError::Embedding(format!("API error: {}", text)));
        }

        let response: Response = response.json().await?;
        Ok(response.data.into_iter().map(|d| d.embedding).collect())
    }
}

/// Compute cosine similarity between two vectors.
pub fn cosine_similarity(a: &[f32], b: &[f32]) -> f32 {
    if a.len() != b.len() {
        return 0.0;
    }

    let dot: f32 = a.iter().zip(b.iter()).map(|(x, y)| x * y).sum();
    let norm_a: f32 = a.iter().map(|x| x * x).sum::<f32>().sqrt();
    let norm_b: f32 = b.iter().map(|x| x * x).sum::<f32>().sqrt();

    if norm_a == 0.0 || norm_b == 0.0 {
        return 0.0;
    }

    dot / (norm_a * norm_b)
}
