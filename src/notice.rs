//! Comments the bot leaves on tickets it flags.

use crate::adf::{Document, Inline, Mark, Node};

const FALLBACK_BOT_NAME: &str = "JIRA";

/// Builder for a bot comment. The "Please:" checklist always ends with the
/// suppress-label opt-out.
#[derive(Debug, Clone, Default)]
pub struct Notice {
    mentions: Vec<String>,
    explanation: Vec<Vec<Inline>>,
    findings: Vec<Vec<Inline>>,
    checklist: Vec<Vec<Inline>>,
    suppress_label: String,
}

impl Notice {
    pub fn new(suppress_label: impl Into<String>) -> Self {
        Self {
            suppress_label: suppress_label.into(),
            ..Self::default()
        }
    }

    /// Mention an account. Blank ids and repeats are dropped.
    pub fn mention(mut self, account_id: Option<&str>) -> Self {
        if let Some(id) = account_id.map(str::trim).filter(|id| !id.is_empty()) {
            if !self.mentions.iter().any(|m| m == id) {
                self.mentions.push(id.to_string());
            }
        }
        self
    }

    pub fn paragraph(mut self, content: Vec<Inline>) -> Self {
        self.explanation.push(content);
        self
    }

    pub fn finding(mut self, content: Vec<Inline>) -> Self {
        self.findings.push(content);
        self
    }

    pub fn todo(mut self, content: Vec<Inline>) -> Self {
        self.checklist.push(content);
        self
    }

    pub fn render(&self, bot_name: &str) -> Document {
        let bot_name = match bot_name.trim() {
            "" => FALLBACK_BOT_NAME,
            name => name,
        };

        let mut content = vec![Node::paragraph(vec![Inline::styled(
            format!("{bot_name} (bot):"),
            &[Mark::Strong, Mark::Underline],
        )])];

        content.extend(
            self.mentions
                .iter()
                .map(|id| Node::paragraph(vec![Inline::mention(id.as_str())])),
        );

        content.extend(self.explanation.iter().cloned().map(Node::paragraph));

        if !self.findings.is_empty() {
            content.push(Node::bullets(self.findings.clone()));
        }

        content.push(Node::empty_paragraph());
        content.push(Node::paragraph(vec![Inline::text("Please:")]));

        let mut checklist = self.checklist.clone();
        checklist.push(vec![
            Inline::text(
                "Or, if you want to suppress this type of scanning on this ticket, add this label: ",
            ),
            Inline::code(self.suppress_label.as_str()),
        ]);
        content.push(Node::bullets(checklist));

        Document::new(content)
    }
}
