use crate::search::SearchResult;
use crate::technique::Technique;
use colored::*;
use serde_json::{json, Value};
use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

/// Output format types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
    Markdown,
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OutputFormat::Text => write!(f, "text"),
            OutputFormat::Json => write!(f, "json"),
            OutputFormat::Markdown => write!(f, "markdown"),
        }
    }
}

impl FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "text" => Ok(OutputFormat::Text),
            "json" => Ok(OutputFormat::Json),
            "markdown" | "md" => Ok(OutputFormat::Markdown),
            other => Err(format!("unknown output format '{other}'")),
        }
    }
}

/// Escape text for chat markup (MarkdownV2 rules).
pub fn escape_markdown(text: &str) -> String {
    const SPECIAL: &str = "_*[]()~`>#+-=|{}.!";
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        if c == '\\' || SPECIAL.contains(c) {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped
}

/// Renders engine answers for people (text, markdown) or programs (json).
pub struct OutputFormatter {
    format: OutputFormat,
}

impl OutputFormatter {
    pub fn new(format: OutputFormat) -> Self {
        Self { format }
    }

    /// Ranked search results for `query`.
    pub fn format_results(&self, results: &[SearchResult], query: &str) -> String {
        match self.format {
            OutputFormat::Text => {
                if results.is_empty() {
                    return format!(
                        "{} {}\n{}",
                        "No results found for:".yellow(),
                        query,
                        "Try different keywords or list the categories".dimmed()
                    );
                }
                let mut output = format!("{}\n", "Search Results:".green().bold());
                for r in results {
                    output.push_str(&format!(
                        "  {} {} (Match: {}%)\n",
                        format!("[{}]", r.technique.id).dimmed(),
                        r.technique.name.cyan(),
                        r.score
                    ));
                }
                output
            }
            OutputFormat::Json => {
                let matches: Vec<Value> = results
                    .iter()
                    .map(|r| json!({ "technique": &*r.technique, "score": r.score }))
                    .collect();
                let result = json!({
                    "query": query,
                    "total_matches": results.len(),
                    "matches": matches,
                });
                serde_json::to_string_pretty(&result).unwrap_or_default()
            }
            OutputFormat::Markdown => {
                if results.is_empty() {
                    return format!("*No results found for:* `{}`\n", escape_markdown(query));
                }
                let mut output = String::from("*Search Results:*\n\n");
                for r in results {
                    output.push_str(&format!(
                        "• `{}` \\(Match: {}%\\)\n",
                        escape_markdown(&r.technique.name),
                        r.score
                    ));
                }
                output
            }
        }
    }

    /// Detail view of one technique.
    pub fn format_technique(&self, technique: &Technique) -> String {
        match self.format {
            OutputFormat::Text => {
                let mut output = format!("{}\n\n", technique.name.green().bold());
                output.push_str(&format!("{}\n{}\n\n", "Description:".bold(), technique.description));
                output.push_str(&format!("{} {}\n", "Category:".bold(), technique.category.cyan()));
                if !technique.priority.is_empty() {
                    output.push_str(&format!("{} {}\n", "Priority:".bold(), technique.priority));
                }
                for (title, items) in [
                    ("Symptoms", &technique.symptoms),
                    ("Attack signs", &technique.attack_signs),
                    ("Solutions", &technique.solutions),
                    ("Tools", &technique.tools),
                    ("References", &technique.references),
                ] {
                    if items.is_empty() {
                        continue;
                    }
                    output.push_str(&format!("\n{}\n", format!("{title}:").bold()));
                    for (i, item) in items.iter().enumerate() {
                        output.push_str(&format!("  {}. {}\n", i + 1, item));
                    }
                }
                output
            }
            OutputFormat::Json => serde_json::to_string_pretty(technique).unwrap_or_default(),
            OutputFormat::Markdown => {
                let mut output = format!("*{}*\n\n", escape_markdown(&technique.name));
                output.push_str(&format!(
                    "*Description:*\n{}\n\n",
                    escape_markdown(&technique.description)
                ));
                output.push_str(&format!(
                    "*Category:* `{}`\n\n*Solutions:*\n",
                    escape_markdown(&technique.category)
                ));
                for (i, solution) in technique.solutions.iter().enumerate() {
                    output.push_str(&format!("{}\\. {}\n", i + 1, escape_markdown(solution)));
                }
                output
            }
        }
    }

    pub fn format_categories(&self, categories: &[String]) -> String {
        match self.format {
            OutputFormat::Text => {
                let mut output = format!("{}\n", "Categories:".green().bold());
                for category in categories {
                    output.push_str(&format!("  • {}\n", category.cyan()));
                }
                output
            }
            OutputFormat::Json => serde_json::to_string_pretty(categories).unwrap_or_default(),
            OutputFormat::Markdown => {
                let mut output = String::from("*Categories:*\n\n");
                for category in categories {
                    output.push_str(&format!("• `{}`\n", escape_markdown(category)));
                }
                output
            }
        }
    }

    /// Techniques filed under one category.
    pub fn format_category_listing(&self, category: &str, techniques: &[Arc<Technique>]) -> String {
        match self.format {
            OutputFormat::Text => {
                if techniques.is_empty() {
                    return format!("{} {}", "No techniques in category:".yellow(), category);
                }
                let mut output =
                    format!("{} {}:\n", "Techniques in".green().bold(), category.green().bold());
                for t in techniques {
                    output.push_str(&format!("  {} {}\n", format!("[{}]", t.id).dimmed(), t.name));
                }
                output
            }
            OutputFormat::Json => {
                let techniques: Vec<&Technique> = techniques.iter().map(|t| &**t).collect();
                serde_json::to_string_pretty(&json!({
                    "category": category,
                    "techniques": techniques,
                }))
                .unwrap_or_default()
            }
            OutputFormat::Markdown => {
                let mut output = format!("*Techniques in {}:*\n\n", escape_markdown(category));
                for t in techniques {
                    output.push_str(&format!("• `{}`\n", escape_markdown(&t.name)));
                }
                output
            }
        }
    }
}
