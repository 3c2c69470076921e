//! Node trees to styled terminal lines
//!
//! Columns stack, rows flow inline. Images have no terminal form and are
//! skipped.

use ratatui::text::{Line, Span};

use crate::ui::Theme;
use crate::view::{Node, Star};

/// Lines for a node tree
pub fn node_lines(node: &Node) -> Vec<Line<'static>> {
    match node {
        Node::Column(children) => children.iter().flat_map(node_lines).collect(),
        Node::Image { .. } => Vec::new(),
        Node::Heading { level, text } => {
            let text = if *level == 1 {
                text.to_uppercase()
            } else {
                text.clone()
            };
            vec![Line::from(Span::styled(text, Theme::heading()))]
        }
        other => {
            let spans = inline_spans(other);
            if spans.is_empty() {
                Vec::new()
            } else {
                vec![Line::from(spans)]
            }
        }
    }
}

/// Spans for a node laid out on one line
pub fn inline_spans(node: &Node) -> Vec<Span<'static>> {
    match node {
        Node::Text { text, tone } => vec![Span::styled(text.clone(), Theme::tone(*tone))],
        Node::Heading { text, .. } => vec![Span::styled(text.clone(), Theme::heading())],
        Node::Image { .. } => Vec::new(),
        Node::Badge { label, tone } => {
            vec![Span::styled(format!("[{}]", label), Theme::tone(*tone))]
        }
        Node::Button { label, active, .. } => {
            let style = if *active {
                Theme::button_active()
            } else {
                Theme::button()
            };
            vec![Span::styled(format!(" {} ", label), style)]
        }
        Node::Stars { stars, .. } => vec![Span::styled(star_string(stars), Theme::gold())],
        Node::Row(children) | Node::Column(children) => {
            let mut spans = Vec::new();
            for child in children {
                let child_spans = inline_spans(child);
                if child_spans.is_empty() {
                    continue;
                }
                if !spans.is_empty() {
                    spans.push(Span::raw(" "));
                }
                spans.extend(child_spans);
            }
            spans
        }
    }
}

fn star_string(stars: &[Star]) -> String {
    stars
        .iter()
        .map(|s| if s.filled { '★' } else { '☆' })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::action::Action;
    use crate::view::Tone;

    fn plain(lines: &[Line]) -> Vec<String> {
        lines
            .iter()
            .map(|l| l.spans.iter().map(|s| s.content.as_ref()).collect())
            .collect()
    }

    #[test]
    fn test_column_stacks_row_flows() {
        let node = Node::Column(vec![
            Node::image("http://x/p.jpg", "poster"),
            Node::heading(2, "Title"),
            Node::Row(vec![
                Node::badge("TMDB: 7.0", Tone::Normal),
                Node::button("Go", Action::Quit),
            ]),
            Node::stars(1, 2),
        ]);
        assert_eq!(
            plain(&node_lines(&node)),
            vec!["Title", "[TMDB: 7.0]  Go ", "★★☆☆☆☆☆☆☆☆"]
        );
    }

    #[test]
    fn test_hero_heading_uppercased() {
        let lines = node_lines(&Node::heading(1, "Dune"));
        assert_eq!(plain(&lines), vec!["DUNE"]);
    }
}
