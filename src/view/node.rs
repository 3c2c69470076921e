//! Typed view nodes
//!
//! Renderers build trees of these instead of markup strings. Text is plain
//! data; nothing downstream interprets it.

use crate::action::Action;

/// Visual emphasis for text and badges
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Tone {
    #[default]
    Normal,
    Dim,
    Accent,
    Gold,
    Success,
    Error,
}

/// One segment of the 10-point rating control
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Star {
    pub value: u8,
    pub filled: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Node {
    Text { text: String, tone: Tone },
    Heading { level: u8, text: String },
    Image { src: String, alt: String },
    Badge { label: String, tone: Tone },
    Button { label: String, action: Action, active: bool },
    Stars { movie_id: u64, stars: Vec<Star> },
    Row(Vec<Node>),
    Column(Vec<Node>),
}

impl Node {
    pub fn text(text: impl Into<String>) -> Self {
        Node::Text {
            text: text.into(),
            tone: Tone::Normal,
        }
    }

    pub fn styled(text: impl Into<String>, tone: Tone) -> Self {
        Node::Text {
            text: text.into(),
            tone,
        }
    }

    pub fn heading(level: u8, text: impl Into<String>) -> Self {
        Node::Heading {
            level,
            text: text.into(),
        }
    }

    pub fn badge(label: impl Into<String>, tone: Tone) -> Self {
        Node::Badge {
            label: label.into(),
            tone,
        }
    }

    pub fn button(label: impl Into<String>, action: Action) -> Self {
        Node::Button {
            label: label.into(),
            action,
            active: false,
        }
    }

    pub fn toggle(label: impl Into<String>, action: Action, active: bool) -> Self {
        Node::Button {
            label: label.into(),
            action,
            active,
        }
    }

    pub fn image(src: impl Into<String>, alt: impl Into<String>) -> Self {
        Node::Image {
            src: src.into(),
            alt: alt.into(),
        }
    }

    /// Ten stars, `1..=filled` lit
    pub fn stars(movie_id: u64, filled: u8) -> Self {
        Node::Stars {
            movie_id,
            stars: (1..=10)
                .map(|value| Star {
                    value,
                    filled: value <= filled,
                })
                .collect(),
        }
    }

    pub fn children(&self) -> &[Node] {
        match self {
            Node::Row(children) | Node::Column(children) => children,
            _ => &[],
        }
    }

    /// Depth-first walk over this node and its descendants
    pub fn walk(&self) -> Vec<&Node> {
        let mut out = vec![self];
        for child in self.children() {
            out.extend(child.walk());
        }
        out
    }

    /// All visible text, space-separated, in document order
    pub fn text_content(&self) -> String {
        self.walk()
            .into_iter()
            .filter_map(|node| match node {
                Node::Text { text, .. } | Node::Heading { text, .. } => Some(text.clone()),
                Node::Badge { label, .. } | Node::Button { label, .. } => Some(label.clone()),
                Node::Image { alt, .. } => Some(alt.clone()),
                Node::Stars { stars, .. } => Some(
                    stars
                        .iter()
                        .map(|s| if s.filled { '★' } else { '☆' })
                        .collect(),
                ),
                Node::Row(_) | Node::Column(_) => None,
            })
            .collect::<Vec<_>>()
            .join(" ")
    }

    /// Buttons in document order
    pub fn buttons(&self) -> Vec<(&str, &Action, bool)> {
        self.walk()
            .into_iter()
            .filter_map(|node| match node {
                Node::Button {
                    label,
                    action,
                    active,
                } => Some((label.as_str(), action, *active)),
                _ => None,
            })
            .collect()
    }

    /// The button bound to `action`, if present
    pub fn find_button(&self, action: &Action) -> Option<(&str, bool)> {
        self.buttons()
            .into_iter()
            .find(|(_, a, _)| *a == action)
            .map(|(label, _, active)| (label, active))
    }

    /// Stars of the first rating control in the tree
    pub fn rating_stars(&self) -> Option<&[Star]> {
        self.walk().into_iter().find_map(|node| match node {
            Node::Stars { stars, .. } => Some(stars.as_slice()),
            _ => None,
        })
    }
}
