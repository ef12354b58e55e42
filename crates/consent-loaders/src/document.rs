//! Page document model

use parking_lot::RwLock;
use serde::Serialize;
use url::Url;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ScriptTag {
    pub id: Option<String>,
    pub src: Option<Url>,
    /// Inline script body
    pub body: Option<String>,
    pub is_async: bool,
}

impl ScriptTag {
    pub fn external(src: Url) -> Self {
        Self {
            id: None,
            src: Some(src),
            body: None,
            is_async: true,
        }
    }

    pub fn inline(body: impl Into<String>) -> Self {
        Self {
            id: None,
            src: None,
            body: Some(body.into()),
            is_async: false,
        }
    }

    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(id.into());
        self
    }

    pub fn to_html(&self) -> String {
        let mut html = String::from("<script");

        if let Some(id) = &self.id {
            html.push_str(&format!(" id=\"{}\"", escape_attr(id)));
        }
        html.push_str(" type=\"text/javascript\"");
        if self.is_async {
            html.push_str(" async");
        }
        if let Some(src) = &self.src {
            html.push_str(&format!(" src=\"{}\"", escape_attr(src.as_str())));
        }
        html.push('>');

        if let Some(body) = &self.body {
            // keep the body from closing the tag early
            html.push_str(&body.replace("</", "<\\/"));
        }

        html.push_str("</script>");
        html
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PreloadLink {
    pub href: Url,
}

impl PreloadLink {
    pub fn to_html(&self) -> String {
        format!(
            "<link rel=\"preload\" href=\"{}\" as=\"script\">",
            escape_attr(self.href.as_str())
        )
    }
}

fn escape_attr(value: &str) -> String {
    value
        .replace('&', "&amp;")
        .replace('"', "&quot;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
}

/// The `<head>` that loaders inject into
pub trait Document: Send + Sync {
    fn insert_script(&self, script: ScriptTag);

    fn insert_preload(&self, link: PreloadLink);

    fn has_script(&self, id: &str) -> bool;
}

#[derive(Debug, Clone)]
enum HeadNode {
    Script(ScriptTag),
    Preload(PreloadLink),
}

impl HeadNode {
    fn to_html(&self) -> String {
        match self {
            HeadNode::Script(script) => script.to_html(),
            HeadNode::Preload(link) => link.to_html(),
        }
    }
}

/// In-memory head, rendered to markup for the page bridge
#[derive(Debug, Default)]
pub struct PageDocument {
    nodes: RwLock<Vec<HeadNode>>,
}

impl PageDocument {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn scripts(&self) -> Vec<ScriptTag> {
        self.nodes
            .read()
            .iter()
            .filter_map(|node| match node {
                HeadNode::Script(script) => Some(script.clone()),
                HeadNode::Preload(_) => None,
            })
            .collect()
    }

    pub fn preloads(&self) -> Vec<PreloadLink> {
        self.nodes
            .read()
            .iter()
            .filter_map(|node| match node {
                HeadNode::Preload(link) => Some(link.clone()),
                HeadNode::Script(_) => None,
            })
            .collect()
    }

    /// Injected nodes as markup, one per line, in insertion order
    pub fn render_head(&self) -> String {
        self.nodes
            .read()
            .iter()
            .map(HeadNode::to_html)
            .collect::<Vec<_>>()
            .join("\n")
    }

    pub fn clear(&self) {
        self.nodes.write().clear();
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.read().is_empty()
    }
}

impl Document for PageDocument {
    fn insert_script(&self, script: ScriptTag) {
        tracing::debug!(
            id = script.id.as_deref().unwrap_or(""),
            src = script.src.as_ref().map(|u| u.as_str()).unwrap_or(""),
            "Injecting script"
        );
        self.nodes.write().push(HeadNode::Script(script));
    }

    fn insert_preload(&self, link: PreloadLink) {
        self.nodes.write().push(HeadNode::Preload(link));
    }

    fn has_script(&self, id: &str) -> bool {
        self.nodes.read().iter().any(|node| {
            matches!(node, HeadNode::Script(script) if script.id.as_deref() == Some(id))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_external_script_html() {
        let script = ScriptTag::external(Url::parse("https://cdn.example.com/a.js?x=1&y=2").unwrap())
            .with_id("sdk");

        assert_eq!(
            script.to_html(),
            "<script id=\"sdk\" type=\"text/javascript\" async src=\"https://cdn.example.com/a.js?x=1&amp;y=2\"></script>"
        );
    }

    #[test]
    fn test_inline_body_cannot_close_tag() {
        let script = ScriptTag::inline("var s = '</script><b>';");
        assert_eq!(
            script.to_html(),
            "<script type=\"text/javascript\">var s = '<\\/script><b>';</script>"
        );
    }

    #[test]
    fn test_page_document() {
        let doc = PageDocument::new();
        assert!(doc.is_empty());

        doc.insert_preload(PreloadLink {
            href: Url::parse("https://cdn.example.com/a.js").unwrap(),
        });
        doc.insert_script(ScriptTag::inline("init()").with_id("boot"));

        assert!(doc.has_script("boot"));
        assert!(!doc.has_script("other"));
        assert_eq!(doc.scripts().len(), 1);
        assert_eq!(doc.preloads().len(), 1);
        assert_eq!(doc.render_head().lines().count(), 2);
        assert!(doc.render_head().starts_with("<link rel=\"preload\""));

        doc.clear();
        assert!(doc.is_empty());
    }
}
