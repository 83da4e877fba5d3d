//! Feature-hashed embedder for integration descriptions.
//!
//! Requirement text is reduced to content terms (filler words and bare
//! numbers dropped) plus adjacent term pairs, so "call external service"
//! and "external service call" stay close while "every 5 minutes" does not
//! match every scheduled requirement. Terms naming a transport, a protocol
//! or a flow construct carry extra weight. Features are hashed with blake3
//! into signed buckets and the vector is L2-normalized.

use std::collections::BTreeMap;

use forge_core::constants::STOPWORDS;
use forge_core::errors::ForgeResult;
use forge_core::traits::EmbeddingProvider;

/// Terms that decide which component a description maps to.
const INTEGRATION_TERMS: &[&str] = &[
    "http", "https", "rest", "soap", "grpc", "ftp", "sftp", "smtp", "email", "jms", "amqp",
    "kafka", "queue", "topic", "webhook", "database", "sql", "file", "directory", "csv", "json",
    "xml", "poll", "schedule", "cron", "transform", "map", "convert", "route", "split",
    "aggregate", "filter", "branch", "log", "archive",
];

const INTEGRATION_TERM_WEIGHT: f32 = 1.5;
const PAIR_WEIGHT: f32 = 0.5;

pub struct HashedTermEmbedder {
    dimensions: usize,
}

impl HashedTermEmbedder {
    pub fn new(dimensions: usize) -> Self {
        Self {
            dimensions: dimensions.max(1),
        }
    }

    fn content_terms(text: &str) -> Vec<String> {
        text.to_lowercase()
            .split(|c: char| !c.is_alphanumeric())
            .filter(|t| t.len() >= 2)
            .filter(|t| !t.chars().all(|c| c.is_ascii_digit()))
            .filter(|t| !STOPWORDS.contains(t))
            .map(str::to_string)
            .collect()
    }

    fn term_weight(term: &str) -> f32 {
        if INTEGRATION_TERMS.contains(&term) {
            INTEGRATION_TERM_WEIGHT
        } else {
            1.0
        }
    }

    /// Weighted features: terms and order-insensitive adjacent pairs.
    fn features(text: &str) -> BTreeMap<String, f32> {
        let terms = Self::content_terms(text);
        let mut counts: BTreeMap<String, (u32, f32)> = BTreeMap::new();
        for term in &terms {
            let slot = counts
                .entry(term.clone())
                .or_insert((0, Self::term_weight(term)));
            slot.0 += 1;
        }
        for pair in terms.windows(2) {
            if pair[0] == pair[1] {
                continue;
            }
            let (a, b) = if pair[0] < pair[1] {
                (&pair[0], &pair[1])
            } else {
                (&pair[1], &pair[0])
            };
            let slot = counts.entry(format!("{a}+{b}")).or_insert((0, PAIR_WEIGHT));
            slot.0 += 1;
        }

        // Sublinear term frequency.
        counts
            .into_iter()
            .map(|(feature, (count, weight))| (feature, weight * (1.0 + (count as f32).ln())))
            .collect()
    }

    /// Bucket and sign of a feature.
    fn slot(&self, feature: &str) -> (usize, f32) {
        let hash = blake3::hash(feature.as_bytes());
        let bytes = hash.as_bytes();
        let mut word = [0u8; 8];
        word.copy_from_slice(&bytes[..8]);
        let bucket = (u64::from_le_bytes(word) % self.dimensions as u64) as usize;
        let sign = if bytes[8] & 1 == 0 { 1.0 } else { -1.0 };
        (bucket, sign)
    }

    fn vector(&self, text: &str) -> Vec<f32> {
        let mut vec = vec![0.0f32; self.dimensions];
        for (feature, weight) in Self::features(text) {
            let (bucket, sign) = self.slot(&feature);
            vec[bucket] += sign * weight;
        }

        let norm: f32 = vec.iter().map(|x| x * x).sum::<f32>().sqrt();
        if norm > f32::EPSILON {
            for v in &mut vec {
                *v /= norm;
            }
        }
        vec
    }
}

impl EmbeddingProvider for HashedTermEmbedder {
    fn embed(&self, text: &str) -> ForgeResult<Vec<f32>> {
        Ok(self.vector(text))
    }

    fn dimensions(&self) -> usize {
        self.dimensions
    }

    fn name(&self) -> &str {
        "hashed-term"
    }
}

/// Cosine similarity of two vectors. Zero when either is all zeros or the
/// lengths differ.
pub fn cosine_similarity(a: &[f32], b: &[f32]) -> f64 {
    if a.len() != b.len() || a.is_empty() {
        return 0.0;
    }
    let dot: f64 = a.iter().zip(b).map(|(x, y)| (*x as f64) * (*y as f64)).sum();
    let na: f64 = a.iter().map(|x| (*x as f64).powi(2)).sum::<f64>().sqrt();
    let nb: f64 = b.iter().map(|x| (*x as f64).powi(2)).sum::<f64>().sqrt();
    if na <= f64::EPSILON || nb <= f64::EPSILON {
        return 0.0;
    }
    dot / (na * nb)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn similarity(p: &HashedTermEmbedder, a: &str, b: &str) -> f64 {
        cosine_similarity(&p.embed(a).unwrap(), &p.embed(b).unwrap())
    }

    #[test]
    fn filler_only_text_returns_zero_vector() {
        let p = HashedTermEmbedder::new(128);
        for text in ["", "then every 5", "and the"] {
            let v = p.embed(text).unwrap();
            assert_eq!(v.len(), 128);
            assert!(v.iter().all(|&x| x == 0.0), "{text:?}");
        }
    }

    #[test]
    fn output_is_normalized() {
        let p = HashedTermEmbedder::new(256);
        let v = p.embed("poll directory every five minutes").unwrap();
        let norm: f32 = v.iter().map(|x| x * x).sum::<f32>().sqrt();
        assert!((norm - 1.0).abs() < 1e-5, "expected unit norm, got {norm}");
    }

    #[test]
    fn deterministic() {
        let p = HashedTermEmbedder::new(256);
        assert_eq!(
            p.embed("call external service").unwrap(),
            p.embed("call external service").unwrap()
        );
    }

    #[test]
    fn filler_words_do_not_change_the_vector() {
        let p = HashedTermEmbedder::new(256);
        assert_eq!(
            p.embed("poll directory then call service").unwrap(),
            p.embed("poll the directory and then every call to service").unwrap()
        );
    }

    #[test]
    fn word_order_within_pairs_is_ignored() {
        let p = HashedTermEmbedder::new(256);
        assert!((similarity(&p, "external service", "service external") - 1.0).abs() < 1e-6);
    }

    #[test]
    fn shared_transport_outweighs_shared_generic_word() {
        let p = HashedTermEmbedder::new(1024);
        let transport = similarity(&p, "upload report ftp", "fetch invoice ftp");
        let generic = similarity(&p, "upload report ftp", "fetch report http");
        assert!(transport > generic, "{transport} <= {generic}");
    }

    #[test]
    fn similar_texts_score_higher() {
        let p = HashedTermEmbedder::new(256);
        let a = "call external http service";
        assert!(
            similarity(&p, a, "call external soap service")
                > similarity(&p, a, "poll ftp directory")
        );
    }
}
