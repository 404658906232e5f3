//! Pseudonymization of person and organization names in rendered text.
//!
//! Entity detection is delegated to an [`EntityDetector`]; this module only
//! merges adjacent entities and substitutes stable pseudonyms.

mod http;

pub use http::HttpEntityDetector;

use crate::error::Result;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use tracing::debug;

/// A named entity span reported by a detector.
///
/// Offsets are character positions in the analysed text, `end` exclusive.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Entity {
    /// Per-token tag such as `B-PER`, `I-ORG` or `B-LOC`.
    ///
    /// Grouped responses (`entity_group` with bare `PER`/`ORG`) do not parse.
    #[serde(rename = "entity")]
    pub label: String,
    /// Surface form.
    pub word: String,
    pub start: usize,
    pub end: usize,
}

impl Entity {
    pub fn new(label: &str, word: &str, start: usize, end: usize) -> Self {
        Self {
            label: label.to_string(),
            word: word.to_string(),
            start,
            end,
        }
    }
}

/// Trait for named-entity recognition services.
#[async_trait]
pub trait EntityDetector: Send + Sync {
    /// Detect entities in `text`, ordered by position.
    async fn detect_entities(&self, text: &str) -> Result<Vec<Entity>>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
enum Category {
    Person,
    Organization,
}

impl Category {
    fn of(label: &str) -> Option<Self> {
        if label.starts_with("B-PER") || label.starts_with("I-PER") {
            Some(Self::Person)
        } else if label.starts_with("B-ORG") || label.starts_with("I-ORG") {
            Some(Self::Organization)
        } else {
            None
        }
    }

    fn pseudonym(self, n: usize) -> String {
        match self {
            Self::Person => format!("Max{}", n),
            Self::Organization => format!("Firma{}", n),
        }
    }
}

/// Merge entities that touch or overlap into single spans.
///
/// Two consecutive entities merge when the earlier one ends at most one
/// character before the later one starts. The merged entity keeps the first
/// label and joins the surface forms with a space.
pub fn combine_entities(entities: &[Entity]) -> Vec<Entity> {
    let Some(first) = entities.first() else {
        return Vec::new();
    };

    let mut combined = Vec::new();
    let mut current = first.clone();

    for pair in entities.windows(2) {
        let (prev, next) = (&pair[0], &pair[1]);

        if prev.end + 1 >= next.start {
            current.word.push(' ');
            current.word.push_str(&next.word);
            current.end = next.end;
        } else {
            combined.push(std::mem::replace(&mut current, next.clone()));
        }
    }

    combined.push(current);
    combined
}

/// Replace person and organization spans with numbered pseudonyms.
///
/// Each distinct surface form gets `Max<N>` (persons) or `Firma<N>`
/// (organizations), numbered per category in first-seen order. Other labels
/// are left in place.
pub fn anonymize_text(entities: &[Entity], text: &str) -> String {
    let mut pseudonyms: HashMap<Category, HashMap<String, String>> = HashMap::new();
    let mut replacements = Vec::new();

    for entity in entities {
        let Some(category) = Category::of(&entity.label) else {
            continue;
        };
        let names = pseudonyms.entry(category).or_default();
        let next = names.len() + 1;
        let replacement = names
            .entry(entity.word.clone())
            .or_insert_with(|| category.pseudonym(next))
            .clone();
        replacements.push((entity.start, entity.end, replacement));
    }

    replacements.sort_by_key(|(start, _, _)| *start);

    // character offset -> byte offset
    let boundaries: Vec<usize> = text
        .char_indices()
        .map(|(i, _)| i)
        .chain(std::iter::once(text.len()))
        .collect();
    let byte_at = |chars: usize| boundaries.get(chars).copied().unwrap_or(text.len());

    let mut anonymized = String::with_capacity(text.len());
    let mut last = 0;

    for (start, end, replacement) in replacements {
        let (start, end) = (byte_at(start), byte_at(end));
        if start > last {
            anonymized.push_str(&text[last..start]);
        }
        anonymized.push_str(&replacement);
        last = end;
    }
    anonymized.push_str(&text[last.min(text.len())..]);

    anonymized
}

/// Detect, merge and substitute entities in one pass.
pub async fn anonymize(detector: &dyn EntityDetector, text: &str) -> Result<String> {
    let entities = detector.detect_entities(text).await?;
    let combined = combine_entities(&entities);
    debug!(detected = entities.len(), merged = combined.len(), "entities found");
    Ok(anonymize_text(&combined, text))
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;

    /// Detector returning a fixed entity list.
    pub(crate) struct StaticDetector(pub Vec<Entity>);

    #[async_trait]
    impl EntityDetector for StaticDetector {
        async fn detect_entities(&self, _text: &str) -> Result<Vec<Entity>> {
            Ok(self.0.clone())
        }
    }

    fn merkel_entities() -> Vec<Entity> {
        vec![
            Entity::new("B-PER", "Angela", 0, 6),
            Entity::new("I-PER", "Merkel", 7, 13),
            Entity::new("B-ORG", "Siemens", 22, 29),
            Entity::new("B-LOC", "Berlin", 33, 39),
            Entity::new("B-PER", "Angela", 41, 47),
            Entity::new("I-PER", "Merkel", 48, 54),
        ]
    }

    const MERKEL_TEXT: &str = "Angela Merkel visited Siemens in Berlin. Angela Merkel left.";

    #[test]
    fn test_combine_adjacent_entities() {
        let combined = combine_entities(&merkel_entities());

        assert_eq!(combined.len(), 4);
        assert_eq!(combined[0], Entity::new("B-PER", "Angela Merkel", 0, 13));
        assert_eq!(combined[1].word, "Siemens");
        assert_eq!(combined[3], Entity::new("B-PER", "Angela Merkel", 41, 54));
    }

    #[test]
    fn test_combine_requires_gap_of_at_most_one() {
        let touching = [Entity::new("B-ORG", "Acme", 0, 4), Entity::new("I-ORG", "Corp", 5, 9)];
        let apart = [Entity::new("B-ORG", "Acme", 0, 4), Entity::new("I-ORG", "Corp", 6, 10)];

        assert_eq!(combine_entities(&touching).len(), 1);
        assert_eq!(combine_entities(&apart).len(), 2);
        assert!(combine_entities(&[]).is_empty());
    }

    #[test]
    fn test_anonymize_reuses_pseudonyms() {
        let text = anonymize_text(&combine_entities(&merkel_entities()), MERKEL_TEXT);

        assert_eq!(text, "Max1 visited Firma1 in Berlin. Max1 left.");
    }

    #[test]
    fn test_pseudonyms_numbered_per_category() {
        let text = "Ola and Kari met at Equinor, then Ola went to Telenor.";
        let entities = vec![
            Entity::new("B-PER", "Ola", 0, 3),
            Entity::new("B-PER", "Kari", 8, 12),
            Entity::new("B-ORG", "Equinor", 20, 27),
            Entity::new("B-PER", "Ola", 34, 37),
            Entity::new("B-ORG", "Telenor", 46, 53),
        ];

        assert_eq!(
            anonymize_text(&entities, text),
            "Max1 and Max2 met at Firma1, then Max1 went to Firma2."
        );
    }

    #[test]
    fn test_offsets_are_characters() {
        let text = "Hei Søren og Åse.";
        let entities = vec![Entity::new("B-PER", "Søren", 4, 9), Entity::new("B-PER", "Åse", 13, 16)];

        assert_eq!(anonymize_text(&entities, text), "Hei Max1 og Max2.");
    }

    #[test]
    fn test_replacements_applied_by_start() {
        let text = "Nora works at Aker.";
        let entities = vec![Entity::new("B-ORG", "Aker", 14, 18), Entity::new("B-PER", "Nora", 0, 4)];

        assert_eq!(anonymize_text(&entities, text), "Max1 works at Firma1.");
    }

    #[test]
    fn test_entity_json_shape() {
        let json = r#"[{"entity": "B-PER", "score": 0.99, "index": 1, "word": "Ada", "start": 0, "end": 3}]"#;
        let entities: Vec<Entity> = serde_json::from_str(json).unwrap();
        assert_eq!(entities, vec![Entity::new("B-PER", "Ada", 0, 3)]);
    }

    #[test]
    fn test_grouped_entities_are_rejected() {
        let json = r#"[{"entity_group": "PER", "score": 0.99, "word": "Angela Merkel", "start": 0, "end": 13}]"#;

        assert!(serde_json::from_str::<Vec<Entity>>(json).is_err());
    }

    #[test]
    fn test_anonymize_with_detector() {
        let detector = StaticDetector(merkel_entities());

        let text = tokio_test::block_on(anonymize(&detector, MERKEL_TEXT)).unwrap();

        assert_eq!(text, "Max1 visited Firma1 in Berlin. Max1 left.");
    }
}
