//! Technique records as they appear in the corpus
use serde::{Deserialize, Deserializer, Serialize};

/// A single security technique with its remediation material.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Technique {
    #[serde(deserialize_with = "deserialize_id")]
    pub id: String,
    pub name: String,
    pub category: String,
    pub description: String,
    #[serde(default)]
    pub symptoms: Vec<String>,
    #[serde(default)]
    pub solutions: Vec<String>,
    #[serde(default)]
    pub tools: Vec<String>,
    #[serde(default)]
    pub references: Vec<String>,
    #[serde(default)]
    pub problems: Vec<String>,
    #[serde(default)]
    pub attack_signs: Vec<String>,
    #[serde(default)]
    pub priority: String,
}

impl Technique {
    /// Minimal record, mostly useful when assembling a corpus in code.
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        category: impl Into<String>,
        description: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            category: category.into(),
            description: description.into(),
            symptoms: Vec::new(),
            solutions: Vec::new(),
            tools: Vec::new(),
            references: Vec::new(),
            problems: Vec::new(),
            attack_signs: Vec::new(),
            priority: String::new(),
        }
    }

    pub fn with_solutions<I, S>(mut self, solutions: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.solutions = solutions.into_iter().map(Into::into).collect();
        self
    }
}

/// Corpus files written by hand use integer ids, generated ones use strings.
#[derive(Deserialize)]
#[serde(untagged)]
enum RawId {
    Text(String),
    Int(i64),
}

fn deserialize_id<'de, D>(deserializer: D) -> std::result::Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match RawId::deserialize(deserializer)? {
        RawId::Text(s) => s,
        RawId::Int(n) => n.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn integer_and_string_ids_normalize_to_strings() {
        let a: Technique = serde_json::from_str(
            r#"{"id": 7, "name": "XSS", "category": "Web", "description": "script"}"#,
        )
        .unwrap();
        let b: Technique = serde_json::from_str(
            r#"{"id": "7", "name": "XSS", "category": "Web", "description": "script"}"#,
        )
        .unwrap();
        assert_eq!(a.id, "7");
        assert_eq!(a, b);
        assert!(a.solutions.is_empty());
        assert_eq!(a.priority, "");
    }

    #[test]
    fn missing_required_field_is_rejected() {
        let r: std::result::Result<Technique, _> =
            serde_json::from_str(r#"{"id": "1", "name": "XSS", "category": "Web"}"#);
        assert!(r.is_err());
    }

    #[test]
    fn list_order_is_preserved() {
        let t: Technique = serde_json::from_str(
            r#"{"id": "1", "name": "n", "category": "c", "description": "d",
                "solutions": ["third", "first", "second"]}"#,
        )
        .unwrap();
        assert_eq!(t.solutions, vec!["third", "first", "second"]);
    }
}
