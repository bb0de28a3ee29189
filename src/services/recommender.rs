use std::collections::HashSet;
use std::sync::Arc;

use crate::{
    error::AppResult,
    models::{Assessment, ScoredAssessment},
    services::{
        catalog::Catalog,
        embedding::{cosine, Embedder},
        query::normalize_query,
    },
};

/// Semantic search over the assessment catalog
pub struct Recommender {
    entries: Vec<Assessment>,
    embeddings: Vec<Vec<f32>>,
    embedder: Arc<dyn Embedder>,
}

impl Recommender {
    /// Embeds every catalog entry up front
    pub fn new(catalog: Catalog, embedder: Arc<dyn Embedder>) -> AppResult<Self> {
        let entries = catalog.into_entries();
        let texts: Vec<String> = entries.iter().map(Assessment::embedding_text).collect();
        let embeddings = if texts.is_empty() {
            Vec::new()
        } else {
            embedder.embed(&texts)?
        };

        tracing::info!(
            entries = entries.len(),
            embedder = embedder.name(),
            dimension = embedder.dimension(),
            "Catalog embedded"
        );

        Ok(Self {
            entries,
            embeddings,
            embedder,
        })
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Top `top_k` entries for `query`, best first.
    ///
    /// With `balance`, knowledge (`K`) and personality (`P`) assessments are split evenly when
    /// the catalog has both kinds; the remainder is filled by score.
    pub fn recommend(
        &self,
        query: &str,
        top_k: usize,
        balance: bool,
    ) -> AppResult<Vec<ScoredAssessment>> {
        let query = normalize_query(query);
        if query.is_empty() || self.entries.is_empty() {
            return Ok(Vec::new());
        }

        let query_vector = self.embedder.embed_one(&query)?;
        let ranked = self.rank(&query_vector);

        let selected = if balance {
            balanced_selection(&self.entries, &ranked, top_k)
        } else {
            ranked.iter().take(top_k).copied().collect()
        };

        tracing::debug!(
            query = %query,
            top_k,
            balance,
            returned = selected.len(),
            "Recommendations computed"
        );

        Ok(selected
            .into_iter()
            .map(|(idx, score)| ScoredAssessment {
                assessment: self.entries[idx].clone(),
                score,
            })
            .collect())
    }

    /// Entry indices with their scores, highest first; ties keep catalog order
    fn rank(&self, query_vector: &[f32]) -> Vec<(usize, f32)> {
        let mut ranked: Vec<(usize, f32)> = self
            .embeddings
            .iter()
            .enumerate()
            .map(|(idx, embedding)| (idx, cosine(query_vector, embedding)))
            .collect();
        ranked.sort_by(|a, b| b.1.total_cmp(&a.1));
        ranked
    }
}

fn balanced_selection(
    entries: &[Assessment],
    ranked: &[(usize, f32)],
    top_k: usize,
) -> Vec<(usize, f32)> {
    let desired = top_k.min(entries.len());
    let knowledge: Vec<(usize, f32)> = ranked
        .iter()
        .copied()
        .filter(|(idx, _)| entries[*idx].is_knowledge())
        .collect();
    let personality: Vec<(usize, f32)> = ranked
        .iter()
        .copied()
        .filter(|(idx, _)| entries[*idx].is_personality())
        .collect();

    let mut selected: Vec<(usize, f32)> = Vec::with_capacity(desired);
    let mut names: HashSet<&str> = HashSet::new();
    if !knowledge.is_empty() && !personality.is_empty() {
        let half = desired / 2;
        for candidate in knowledge.into_iter().take(half) {
            push(entries, candidate, &mut selected, &mut names);
        }
        let rest = desired - half;
        let mut taken = 0;
        for candidate in personality {
            if taken == rest {
                break;
            }
            if push(entries, candidate, &mut selected, &mut names) {
                taken += 1;
            }
        }
    } else {
        for candidate in ranked.iter().copied() {
            if selected.len() == desired {
                break;
            }
            push(entries, candidate, &mut selected, &mut names);
        }
    }

    for candidate in ranked.iter().copied() {
        if selected.len() >= desired {
            break;
        }
        push(entries, candidate, &mut selected, &mut names);
    }

    selected
}

/// Adds `candidate` unless an entry with the same name was already chosen
fn push<'a>(
    entries: &'a [Assessment],
    candidate: (usize, f32),
    selected: &mut Vec<(usize, f32)>,
    names: &mut HashSet<&'a str>,
) -> bool {
    let added = names.insert(entries[candidate.0].name.as_str());
    if added {
        selected.push(candidate);
    }
    added
}
