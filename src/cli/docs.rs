//! Documentation extraction from a free-form doc text
//!
//! ```text
//! Greet someone.
//!
//! name: who to greet
//!
//! capitalize: uppercase the first letter
//!
//! Greetings are printed to stdout.
//! ```
//!
//! Paragraphs before the first `name: ...` paragraph naming a declared
//! parameter describe the command (the first one is the summary). Paragraphs
//! after it are footnotes.

use std::collections::HashSet;
use std::sync::OnceLock;

use regex::Regex;
use tracing::trace;

use crate::domain::{SchemaSource, Signature};

fn paragraph_break() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"\n[ \t]*\n").expect("valid regex"))
}

fn param_paragraph() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"(?s)^(\w+):\s+(.+)$").expect("valid regex"))
}

/// Parsed documentation of one command.
///
/// `description`, `params` and `footnotes` are split on paragraph shape
/// alone. `apply` splits again against the parameters the signature
/// declares, so a `Word: text` paragraph naming no parameter stays prose.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Docs {
    pub description: Vec<String>,
    /// `(parameter name, description)` in order of appearance
    pub params: Vec<(String, String)>,
    pub footnotes: Vec<String>,
    paragraphs: Vec<Paragraph>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Paragraph {
    Text(String),
    Param {
        name: String,
        text: String,
        raw: String,
    },
}

impl Docs {
    pub fn parse(text: &str) -> Self {
        let text = text.replace("\r\n", "\n");
        let mut docs = Docs::default();

        for raw in paragraph_break().split(&text) {
            let paragraph = normalize(raw);
            if paragraph.is_empty() {
                continue;
            }
            if let Some(caps) = param_paragraph().captures(&paragraph) {
                trace!(param = &caps[1], "parameter-shaped paragraph");
                docs.params.push((caps[1].to_string(), caps[2].to_string()));
                docs.paragraphs.push(Paragraph::Param {
                    name: caps[1].to_string(),
                    text: caps[2].to_string(),
                    raw: paragraph.clone(),
                });
            } else {
                if docs.params.is_empty() {
                    docs.description.push(paragraph.clone());
                } else {
                    docs.footnotes.push(paragraph.clone());
                }
                docs.paragraphs.push(Paragraph::Text(paragraph));
            }
        }
        docs
    }

    pub fn summary(&self) -> &str {
        self.description.first().map(String::as_str).unwrap_or("")
    }

    pub fn param(&self, name: &str) -> Option<&str> {
        self.params
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, d)| d.as_str())
    }

    /// Inject into `sig`. Paragraphs before the first declared parameter
    /// describe the command, later ones become footnotes.
    pub fn apply(&self, sig: Signature) -> Signature {
        let declared: HashSet<String> = sig.parameters().iter().map(|p| p.name.clone()).collect();
        let mut sig = sig;
        let mut in_params = false;
        let mut has_summary = false;

        for paragraph in &self.paragraphs {
            let text = match paragraph {
                Paragraph::Param { name, text, .. } if declared.contains(name) => {
                    in_params = true;
                    sig = sig.describe(name, text.clone());
                    continue;
                }
                Paragraph::Param { name, raw, .. } => {
                    trace!(param = %name, "not a declared parameter, kept as prose");
                    raw
                }
                Paragraph::Text(text) => text,
            };
            sig = if in_params {
                sig.footnote(text.clone())
            } else if !has_summary {
                has_summary = true;
                sig.summary(text.clone())
            } else {
                sig.paragraph(text.clone())
            };
        }
        sig
    }
}

/// `Signature::docs`: attach parsed documentation.
pub trait SignatureDocsExt {
    fn docs(self, docs: &Docs) -> Self;
}

impl SignatureDocsExt for Signature {
    fn docs(self, docs: &Docs) -> Self {
        docs.apply(self)
    }
}

/// Join wrapped lines into one line of single-spaced words.
fn normalize(paragraph: &str) -> String {
    paragraph.split_whitespace().collect::<Vec<_>>().join(" ")
}
