//! Atlassian Document Format, the rich-text tree Jira comments are made of.
//!
//! Only the handful of node types the bot writes are modelled.

use serde::Serialize;

#[derive(Serialize, Debug, Clone, PartialEq)]
pub struct Document {
    pub version: u32,
    #[serde(rename = "type")]
    kind: &'static str,
    pub content: Vec<Node>,
}

impl Document {
    pub fn new(content: Vec<Node>) -> Self {
        Self {
            version: 1,
            kind: "doc",
            content,
        }
    }

    /// Plain text of the document, for logs and tests.
    pub fn plain_text(&self) -> String {
        let mut lines = Vec::new();
        for node in &self.content {
            node.collect_text(&mut lines);
        }
        lines.join("\n")
    }
}

#[derive(Serialize, Debug, Clone, PartialEq)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum Node {
    Paragraph { content: Vec<Inline> },
    BulletList { content: Vec<Node> },
    ListItem { content: Vec<Node> },
}

impl Node {
    pub fn paragraph(content: Vec<Inline>) -> Self {
        Node::Paragraph { content }
    }

    pub fn empty_paragraph() -> Self {
        Node::Paragraph {
            content: Vec::new(),
        }
    }

    /// A bullet list with one paragraph per item.
    pub fn bullets(items: Vec<Vec<Inline>>) -> Self {
        Node::BulletList {
            content: items
                .into_iter()
                .map(|inlines| Node::ListItem {
                    content: vec![Node::paragraph(inlines)],
                })
                .collect(),
        }
    }

    fn collect_text(&self, lines: &mut Vec<String>) {
        match self {
            Node::Paragraph { content } => {
                lines.push(content.iter().map(Inline::plain_text).collect());
            }
            Node::BulletList { content } | Node::ListItem { content } => {
                for node in content {
                    node.collect_text(lines);
                }
            }
        }
    }
}

#[derive(Serialize, Debug, Clone, PartialEq)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum Inline {
    Text {
        text: String,
        #[serde(skip_serializing_if = "Vec::is_empty")]
        marks: Vec<Mark>,
    },
    Mention {
        attrs: MentionAttrs,
    },
    InlineCard {
        attrs: CardAttrs,
    },
}

#[derive(Serialize, Debug, Clone, PartialEq)]
pub struct MentionAttrs {
    pub id: String,
}

#[derive(Serialize, Debug, Clone, PartialEq)]
pub struct CardAttrs {
    pub url: String,
}

#[derive(Serialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum Mark {
    Strong,
    Underline,
    Em,
    Code,
}

impl Inline {
    pub fn text(text: impl Into<String>) -> Self {
        Inline::Text {
            text: text.into(),
            marks: Vec::new(),
        }
    }

    pub fn styled(text: impl Into<String>, marks: &[Mark]) -> Self {
        Inline::Text {
            text: text.into(),
            marks: marks.to_vec(),
        }
    }

    pub fn code(text: impl Into<String>) -> Self {
        Self::styled(text, &[Mark::Code])
    }

    pub fn mention(account_id: impl Into<String>) -> Self {
        Inline::Mention {
            attrs: MentionAttrs {
                id: account_id.into(),
            },
        }
    }

    pub fn card(url: impl Into<String>) -> Self {
        Inline::InlineCard {
            attrs: CardAttrs { url: url.into() },
        }
    }

    fn plain_text(&self) -> String {
        match self {
            Inline::Text { text, .. } => text.clone(),
            Inline::Mention { attrs } => format!("@{}", attrs.id),
            Inline::InlineCard { attrs } => attrs.url.clone(),
        }
    }
}
