use std::borrow::Cow;

use crate::tree::{NodeId, Tree};

pub const XML_HEADER: &str = "<?xml version=\"1.0\" encoding=\"UTF-8\"?>";

/// Serializer converts an element tree back to markup source
///
/// Output is a header line followed by a pre-order, indented rendering:
/// - elements with children get nested closing tags
/// - elements with text are written inline
/// - elements with neither are self-closing
///
/// Attribute order is preserved. Whitespace is normalized, not preserved.
pub struct Serializer {
    indent_level: usize,
    indent_string: String,
}

impl Serializer {
    pub fn new() -> Self {
        Self {
            indent_level: 0,
            indent_string: "  ".to_string(), // 2 spaces
        }
    }

    pub fn with_indent(indent: &str) -> Self {
        Self {
            indent_level: 0,
            indent_string: indent.to_string(),
        }
    }

    /// Serialize a tree to markup source
    pub fn serialize(&mut self, tree: &Tree) -> String {
        let mut output = String::new();
        output.push_str(XML_HEADER);
        output.push('\n');

        if let Some(root) = tree.root() {
            self.indent_level = 0;
            self.serialize_element(tree, root, &mut output);
        }

        output
    }

    fn serialize_element(&mut self, tree: &Tree, id: NodeId, output: &mut String) {
        let node = tree.node(id);

        self.write_indent(output);
        output.push('<');
        output.push_str(node.tag());

        for attr in node.attributes() {
            output.push(' ');
            output.push_str(&attr.name);
            output.push_str("=\"");
            output.push_str(&escape(&attr.value));
            output.push('"');
        }

        if node.has_children() {
            output.push_str(">\n");
            self.indent_level += 1;
            for child in node.children() {
                self.serialize_element(tree, *child, output);
            }
            self.indent_level -= 1;
            self.write_indent(output);
            output.push_str("</");
            output.push_str(node.tag());
            output.push_str(">\n");
        } else if let Some(text) = node.text_content().filter(|_| node.has_text_content()) {
            output.push('>');
            output.push_str(&escape(text));
            output.push_str("</");
            output.push_str(node.tag());
            output.push_str(">\n");
        } else {
            output.push_str("/>\n");
        }
    }

    fn write_indent(&self, output: &mut String) {
        for _ in 0..self.indent_level {
            output.push_str(&self.indent_string);
        }
    }
}

impl Default for Serializer {
    fn default() -> Self {
        Self::new()
    }
}

/// Escape the reserved characters `& < > " '`
pub fn escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&apos;"),
            _ => out.push(c),
        }
    }
    out
}

/// Reverse of [`escape`]. Only the five entities it emits are decoded;
/// any other `&` is kept literally.
pub fn unescape(text: &str) -> Cow<'_, str> {
    if !text.contains('&') {
        return Cow::Borrowed(text);
    }

    let mut out = String::with_capacity(text.len());
    let mut rest = text;
    while let Some(amp) = rest.find('&') {
        out.push_str(&rest[..amp]);
        rest = &rest[amp..];
        let decoded = ENTITIES
            .iter()
            .find(|(entity, _)| rest.starts_with(entity));
        match decoded {
            Some((entity, c)) => {
                out.push(*c);
                rest = &rest[entity.len()..];
            }
            None => {
                out.push('&');
                rest = &rest[1..];
            }
        }
    }
    out.push_str(rest);
    Cow::Owned(out)
}

const ENTITIES: [(&str, char); 5] = [
    ("&amp;", '&'),
    ("&lt;", '<'),
    ("&gt;", '>'),
    ("&quot;", '"'),
    ("&apos;", '\''),
];

/// Convenience function to serialize a tree with the default indent
pub fn serialize(tree: &Tree) -> String {
    Serializer::new().serialize(tree)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Tree {
        let mut tree = Tree::with_root("root", "r").unwrap();
        let root = tree.root().unwrap();
        let item = tree.create_node("item", "i1").unwrap();
        tree.node_mut(item).set_attribute("lang", "en");
        tree.node_mut(item)
            .set_text_content(Some("Fish & \"chips\"".to_string()))
            .unwrap();
        let empty = tree.create_node("empty", "e1").unwrap();
        tree.add_child(root, item).unwrap();
        tree.add_child(root, empty).unwrap();
        tree
    }

    #[test]
    fn test_serialize_layout() {
        let expected = concat!(
            "<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n",
            "<root id=\"r\">\n",
            "  <item id=\"i1\" lang=\"en\">Fish &amp; &quot;chips&quot;</item>\n",
            "  <empty id=\"e1\"/>\n",
            "</root>\n",
        );
        assert_eq!(serialize(&sample()), expected);
    }

    #[test]
    fn test_serialize_empty_tree() {
        assert_eq!(serialize(&Tree::new()), format!("{}\n", XML_HEADER));
    }

    #[test]
    fn test_custom_indent() {
        let out = Serializer::with_indent("\t").serialize(&sample());
        assert!(out.contains("\n\t<empty id=\"e1\"/>\n"));
    }

    #[test]
    fn test_blank_text_is_self_closing() {
        let mut tree = Tree::with_root("root", "r").unwrap();
        let root = tree.root().unwrap();
        tree.node_mut(root).set_text_content(Some("   ".into())).unwrap();
        assert!(serialize(&tree).ends_with("<root id=\"r\"/>\n"));
    }

    #[test]
    fn test_escape() {
        assert_eq!(escape("<a href='x'>"), "&lt;a href=&apos;x&apos;&gt;");
        assert_eq!(escape("plain"), "plain");
    }

    #[test]
    fn test_unescape() {
        assert_eq!(unescape("&lt;a href=&apos;x&apos;&gt;"), "<a href='x'>");
        assert_eq!(unescape("don&amp;apos;t"), "don&apos;t");
        assert_eq!(unescape("AT&T &copy; &"), "AT&T &copy; &");
        assert!(matches!(unescape("plain"), Cow::Borrowed("plain")));
    }
}
