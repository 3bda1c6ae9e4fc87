//! Parse → serialize → parse must preserve tags, attributes, text and nesting

use quill_parser::{parse, serialize, NodeId, ParseError, Serializer, Tree};

/// Structural fingerprint: (depth, tag, attributes, text) in pre-order
fn shape(tree: &Tree) -> Vec<(usize, String, Vec<(String, String)>, Option<String>)> {
    fn walk(
        tree: &Tree,
        id: NodeId,
        depth: usize,
        out: &mut Vec<(usize, String, Vec<(String, String)>, Option<String>)>,
    ) {
        let node = tree.node(id);
        out.push((
            depth,
            node.tag().to_string(),
            node.attributes()
                .iter()
                .map(|a| (a.name.clone(), a.value.clone()))
                .collect(),
            node.text_content().map(str::to_string),
        ));
        for child in node.children() {
            walk(tree, *child, depth + 1, out);
        }
    }

    let mut out = Vec::new();
    if let Some(root) = tree.root() {
        walk(tree, root, 0, &mut out);
    }
    out
}

#[test]
fn test_roundtrip_preserves_structure() {
    let source = r#"<?xml version="1.0" encoding="UTF-8"?>
<library id="lib" name="City Library">
    <shelf id="s1" floor="2">
        <book id="b1" isbn="978-0">The Rust Programming Language</book>
        <book id="b2">Programming Rust</book>
        <book id="b3"/>
    </shelf>
    <shelf id="s2"></shelf>
    <desk id="d1">   front   desk   </desk>
</library>
"#;

    let first = parse(source).unwrap();
    let output = serialize(&first);
    let second = parse(&output).unwrap();

    assert_eq!(shape(&first), shape(&second));
    // Serialization is a fixed point after one pass
    assert_eq!(serialize(&second), output);
}

#[test]
fn test_roundtrip_with_tabs() {
    let first = parse(r#"<a id="a"><b id="b"><c id="c">x</c></b></a>"#).unwrap();
    let output = Serializer::with_indent("\t").serialize(&first);
    assert!(output.contains("\n\t\t<c id=\"c\">x</c>\n"));
    assert_eq!(shape(&parse(&output).unwrap()), shape(&first));
}

#[test]
fn test_inner_whitespace_of_text_is_kept() {
    let tree = parse(r#"<desk id="d1">   front   desk   </desk>"#).unwrap();
    let root = tree.root().unwrap();
    assert_eq!(tree.node(root).text_content(), Some("front   desk"));
}

#[test]
fn test_single_quoted_attributes() {
    let tree = parse("<a id='x' title='say \"hi\"'/>").unwrap();
    let root = tree.node(tree.root().unwrap());
    assert_eq!(root.id(), "x");
    assert_eq!(root.attribute("title"), Some("say \"hi\""));

    let output = serialize(&tree);
    assert!(output.contains("title=\"say &quot;hi&quot;\""));
    let reparsed = parse(&output).unwrap();
    assert_eq!(
        reparsed.node(reparsed.root().unwrap()).attribute("title"),
        Some("say \"hi\"")
    );
}

#[test]
fn test_reserved_characters_survive_reload() {
    let mut tree = Tree::with_root("note", "n&1").unwrap();
    let root = tree.root().unwrap();
    tree.node_mut(root).set_attribute("expr", "a < b && c > 'd'");
    let child = tree.create_node("body", "b").unwrap();
    tree.node_mut(child)
        .set_text_content(Some("don't \"quote\" <me> & &amp;".to_string()))
        .unwrap();
    tree.add_child(root, child).unwrap();

    let output = serialize(&tree);
    let reparsed = parse(&output).unwrap();
    assert_eq!(shape(&reparsed), shape(&tree));
    assert_eq!(reparsed.node(reparsed.root().unwrap()).id(), "n&1");
    assert_eq!(serialize(&reparsed), output);
}

#[test]
fn test_repeated_saves_do_not_compound_escapes() {
    let mut source = "<a id=\"a\">don't</a>".to_string();
    for _ in 0..3 {
        source = serialize(&parse(&source).unwrap());
    }
    assert!(source.contains("<a id=\"a\">don&apos;t</a>"));
    let tree = parse(&source).unwrap();
    assert_eq!(tree.node(tree.root().unwrap()).text_content(), Some("don't"));
}

#[test]
fn test_tree_survives_json() {
    let tree = parse(r#"<list id="l" kind="todo"><item id="i1">milk</item><item id="i2"/></list>"#)
        .unwrap();
    let json = serde_json::to_string(&tree).unwrap();
    let restored: Tree = serde_json::from_str(&json).unwrap();
    assert_eq!(shape(&restored), shape(&tree));
    assert_eq!(serialize(&restored), serialize(&tree));
}

#[test]
fn test_error_kinds() {
    assert!(matches!(
        parse("<a id=\"a\"><b/></a>"),
        Err(ParseError::MissingId { .. })
    ));
    assert!(matches!(
        parse("<a id=\"a\"><b id=\"a\"/></a>"),
        Err(ParseError::DuplicateId { .. })
    ));
    assert!(matches!(parse("<a id=\"a\">"), Err(ParseError::Malformed { .. })));
    assert!(matches!(parse("<a id=\"a\""), Err(ParseError::Malformed { .. })));
    assert!(matches!(parse("plain text"), Err(ParseError::Malformed { .. })));
}

#[test]
fn test_error_position_points_at_element() {
    let source = "<a id=\"a\">\n  <b x=\"1\"/>\n</a>";
    let err = parse(source).unwrap_err();
    assert_eq!(err.pos(), source.find("<b").unwrap());
}
