//! Box-drawing outline of an element tree
//!
//! ```text
//! bookstore [id="root"]
//! ├── book [id="b1", category="cooking"]
//! │   └── title [id="t1"]
//! │       └── "Everyday Italian"
//! └── empty [id="e1"]
//! ```

use crate::tree::{NodeId, Tree};

/// Render the tree as an outline. An empty tree renders as an empty string.
pub fn outline(tree: &Tree) -> String {
    let mut out = String::new();
    if let Some(root) = tree.root() {
        write_node(tree, root, "", true, true, &mut out);
    }
    out
}

fn write_node(
    tree: &Tree,
    id: NodeId,
    prefix: &str,
    is_last: bool,
    is_root: bool,
    out: &mut String,
) {
    let node = tree.node(id);

    out.push_str(prefix);
    if !is_root {
        out.push_str(if is_last { "└── " } else { "├── " });
    }
    out.push_str(node.tag());
    out.push_str(" [");
    let attrs: Vec<String> = node
        .attributes()
        .iter()
        .map(|a| format!("{}=\"{}\"", a.name, a.value))
        .collect();
    out.push_str(&attrs.join(", "));
    out.push_str("]\n");

    let child_prefix = if is_root {
        String::new()
    } else {
        format!("{}{}", prefix, if is_last { "    " } else { "│   " })
    };

    if node.has_text_content() {
        if let Some(text) = node.text_content() {
            out.push_str(&child_prefix);
            out.push_str("└── \"");
            out.push_str(text);
            out.push_str("\"\n");
        }
    }

    let children = node.children();
    for (i, child) in children.iter().enumerate() {
        write_node(tree, *child, &child_prefix, i + 1 == children.len(), false, out);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parse;

    #[test]
    fn test_outline() {
        let tree = parse(
            r#"<bookstore id="root">
                 <book id="b1" category="cooking">
                   <title id="t1">Everyday Italian</title>
                 </book>
                 <empty id="e1"/>
               </bookstore>"#,
        )
        .unwrap();

        let expected = concat!(
            "bookstore [id=\"root\"]\n",
            "├── book [id=\"b1\", category=\"cooking\"]\n",
            "│   └── title [id=\"t1\"]\n",
            "│       └── \"Everyday Italian\"\n",
            "└── empty [id=\"e1\"]\n",
        );
        assert_eq!(outline(&tree), expected);
    }

    #[test]
    fn test_outline_root_text() {
        let tree = parse("<note id=\"n\">hello</note>").unwrap();
        assert_eq!(outline(&tree), "note [id=\"n\"]\n└── \"hello\"\n");
    }

    #[test]
    fn test_outline_empty() {
        assert_eq!(outline(&Tree::new()), "");
    }
}
