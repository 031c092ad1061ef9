// Copyright 2025-2026 The parse5ever Project Developers. See the
// COPYRIGHT file at the top-level directory of this distribution.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! Tree construction tests. Expected trees are written in the html5lib
//! tree-construction format, so cases from the conformance corpus can be
//! transplanted literally.

mod common;

use parse5ever::dom::{same_node, Handle, NodeData};
use parse5ever::{parse, Namespace, ParseOpts, QuirksMode};

fn assert_tree(input: &str, expected: &str) {
    let dom = parse(input, ParseOpts::default());
    assert_eq!(common::tree_dump(&dom), expected, "input: {input:?}");
}

#[test]
fn simple_paragraph() {
    assert_tree(
        "<p>Hello",
        r#"| <html>
|   <head>
|   <body>
|     <p>
|       "Hello"
"#,
    );
}

#[test]
fn doctype_and_implicitly_closed_paragraphs() {
    assert_tree(
        "<!DOCTYPE html><p>1<p>2",
        r#"| <!DOCTYPE html>
| <html>
|   <head>
|   <body>
|     <p>
|       "1"
|     <p>
|       "2"
"#,
    );
}

#[test]
fn doctype_with_identifiers() {
    assert_tree(
        r#"<!DOCTYPE html PUBLIC "-//W3C//DTD HTML 4.01//EN" "http://www.w3.org/TR/html4/strict.dtd"><p>x"#,
        r#"| <!DOCTYPE html "-//W3C//DTD HTML 4.01//EN" "http://www.w3.org/TR/html4/strict.dtd">
| <html>
|   <head>
|   <body>
|     <p>
|       "x"
"#,
    );
}

#[test]
fn adoption_agency_clones_formatting_element() {
    assert_tree(
        "<b>bold<i>both</b>italic</i>",
        r#"| <html>
|   <head>
|   <body>
|     <b>
|       "bold"
|       <i>
|         "both"
|     <i>
|       "italic"
"#,
    );
}

#[test]
fn adoption_agency_textbook_case() {
    assert_tree(
        "<p>1<b>2<i>3</b>4</i>5",
        r#"| <html>
|   <head>
|   <body>
|     <p>
|       "1"
|       <b>
|         "2"
|         <i>
|           "3"
|       <i>
|         "4"
|       "5"
"#,
    );
}

#[test]
fn adoption_agency_with_furthest_block() {
    assert_tree(
        "<a>1<p>2</a>3</p>",
        r#"| <html>
|   <head>
|   <body>
|     <a>
|       "1"
|     <p>
|       <a>
|         "2"
|       "3"
"#,
    );
}

#[test]
fn table_with_implicit_sections_and_cells() {
    assert_tree(
        "<table><tr><td>x<td>y",
        r#"| <html>
|   <head>
|   <body>
|     <table>
|       <tbody>
|         <tr>
|           <td>
|             "x"
|           <td>
|             "y"
"#,
    );
}

#[test]
fn svg_with_html_integration_point() {
    assert_tree(
        "<svg><g><foreignObject><p>x</p></foreignObject></g></svg>",
        r#"| <html>
|   <head>
|   <body>
|     <svg svg>
|       <svg g>
|         <svg foreignObject>
|           <p>
|             "x"
"#,
    );
}

#[test]
fn script_content_is_not_markup() {
    assert_tree(
        "<script>if (a<b) {}</script>",
        r#"| <html>
|   <head>
|     <script>
|       "if (a<b) {}"
|   <body>
"#,
    );
}

#[test]
fn foster_parenting_moves_block_before_table() {
    assert_tree(
        "<table><div>foo</div></table>",
        r#"| <html>
|   <head>
|   <body>
|     <div>
|       "foo"
|     <table>
"#,
    );
}

#[test]
fn table_whitespace_stays_in_table() {
    assert_tree(
        "<table> </table>",
        r#"| <html>
|   <head>
|   <body>
|     <table>
|       " "
"#,
    );
}

#[test]
fn table_text_is_foster_parented() {
    assert_tree(
        "<table>x</table>",
        r#"| <html>
|   <head>
|   <body>
|     "x"
|     <table>
"#,
    );
}

#[test]
fn quirks_mode_table_stays_inside_p() {
    let dom = parse("<p><table></table></p>", ParseOpts::default());
    assert_eq!(dom.quirks_mode, QuirksMode::Quirks);
    assert_eq!(
        common::tree_dump(&dom),
        r#"| <html>
|   <head>
|   <body>
|     <p>
|       <table>
"#,
    );
}

#[test]
fn standards_mode_table_closes_p() {
    let dom = parse("<!DOCTYPE html><p><table></table></p>", ParseOpts::default());
    assert_eq!(dom.quirks_mode, QuirksMode::NoQuirks);
    assert_eq!(
        common::tree_dump(&dom),
        r#"| <!DOCTYPE html>
| <html>
|   <head>
|   <body>
|     <p>
|     <table>
"#,
    );
}

#[test]
fn template_contents_are_isolated() {
    assert_tree(
        "<template><td>x</td></template>",
        r#"| <html>
|   <head>
|     <template>
|       content
|         <td>
|           "x"
|   <body>
"#,
    );
}

#[test]
fn headings_close_each_other() {
    assert_tree(
        "<h1>a<h2>b",
        r#"| <html>
|   <head>
|   <body>
|     <h1>
|       "a"
|     <h2>
|       "b"
"#,
    );
}

#[test]
fn list_items_close_each_other() {
    assert_tree(
        "<ul><li>one<li>two</ul>",
        r#"| <html>
|   <head>
|   <body>
|     <ul>
|       <li>
|         "one"
|       <li>
|         "two"
"#,
    );
}

#[test]
fn noscript_without_scripting_parses_children() {
    assert_tree(
        "<head><noscript><p>x</p></noscript></head>",
        r#"| <html>
|   <head>
|     <noscript>
|   <body>
|     <p>
|       "x"
"#,
    );
}

#[test]
fn noscript_with_scripting_is_raw_text() {
    let mut opts = ParseOpts::default();
    opts.tree_builder.scripting_enabled = true;
    let dom = parse("<body><noscript><p>x</p></noscript>", opts);
    assert_eq!(
        common::tree_dump(&dom),
        r#"| <html>
|   <head>
|   <body>
|     <noscript>
|       "<p>x</p>"
"#,
    );
}

#[test]
fn frameset_document() {
    assert_tree(
        "<frameset><frame></frameset>",
        r#"| <html>
|   <head>
|   <frameset>
|     <frame>
"#,
    );
}

#[test]
fn frameset_replaces_body() {
    assert_tree(
        "<p><frameset>",
        r#"| <html>
|   <head>
|   <frameset>
"#,
    );
}

#[test]
fn select_with_options() {
    assert_tree(
        "<select><option>a<option>b</select>",
        r#"| <html>
|   <head>
|   <body>
|     <select>
|       <option>
|         "a"
|       <option>
|         "b"
"#,
    );
}

#[test]
fn cell_start_tag_escapes_select_in_table() {
    assert_tree(
        "<table><tr><td><select><td>x",
        r#"| <html>
|   <head>
|   <body>
|     <table>
|       <tbody>
|         <tr>
|           <td>
|             <select>
|           <td>
|             "x"
"#,
    );
}

#[test]
fn cdata_in_foreign_content_is_text() {
    assert_tree(
        "<svg><![CDATA[x<y]]></svg>",
        r#"| <html>
|   <head>
|   <body>
|     <svg svg>
|       "x<y"
"#,
    );
}

#[test]
fn cdata_in_html_content_is_a_comment() {
    assert_tree(
        "<p><![CDATA[x]]></p>",
        r#"| <html>
|   <head>
|   <body>
|     <p>
|       <!-- [CDATA[x]] -->
"#,
    );
}

#[test]
fn mathml_text_integration_point_allows_html() {
    assert_tree(
        "<math><mtext><b>x</b></mtext></math>",
        r#"| <html>
|   <head>
|   <body>
|     <math math>
|       <math mtext>
|         <b>
|           "x"
"#,
    );
}

#[test]
fn annotation_xml_with_html_encoding_is_integration_point() {
    assert_tree(
        r#"<math><annotation-xml encoding="text/html"><div>x</div></annotation-xml></math>"#,
        r#"| <html>
|   <head>
|   <body>
|     <math math>
|       <math annotation-xml>
|         encoding="text/html"
|         <div>
|           "x"
"#,
    );
}

#[test]
fn breakout_tag_leaves_foreign_content() {
    assert_tree(
        "<svg><p>x",
        r#"| <html>
|   <head>
|   <body>
|     <svg svg>
|     <p>
|       "x"
"#,
    );
}

#[test]
fn svg_attributes_are_case_adjusted() {
    assert_tree(
        r#"<svg viewbox="0 0 1 1"></svg>"#,
        r#"| <html>
|   <head>
|   <body>
|     <svg svg>
|       viewBox="0 0 1 1"
"#,
    );
}

#[test]
fn xlink_attributes_get_namespaced() {
    assert_tree(
        r#"<svg><a xlink:href="u"></a></svg>"#,
        r#"| <html>
|   <head>
|   <body>
|     <svg svg>
|       <svg a>
|         xlink href="u"
"#,
    );
}

#[test]
fn mathml_definitionurl_is_adjusted() {
    assert_tree(
        r#"<math definitionurl="u"></math>"#,
        r#"| <html>
|   <head>
|   <body>
|     <math math>
|       definitionURL="u"
"#,
    );
}

#[test]
fn comments_attach_where_they_appear() {
    assert_tree(
        "<!--before--><p>x<!--after-->",
        r#"| <!-- before -->
| <html>
|   <head>
|   <body>
|     <p>
|       "x"
|       <!-- after -->
"#,
    );
}

#[test]
fn comment_after_body_attaches_to_html() {
    assert_tree(
        "<html><body></body><!--c--></html>",
        r#"| <html>
|   <head>
|   <body>
|   <!-- c -->
"#,
    );
}

#[test]
fn character_references_resolve_in_text() {
    assert_tree(
        "<p>I &notin; S",
        "| <html>\n|   <head>\n|   <body>\n|     <p>\n|       \"I \u{2209} S\"\n",
    );
}

#[test]
fn legacy_reference_in_attribute_is_left_alone() {
    assert_tree(
        r#"<a href="?a&amp=b">x</a>"#,
        r#"| <html>
|   <head>
|   <body>
|     <a>
|       href="?a&amp=b"
|       "x"
"#,
    );
}

#[test]
fn pre_skips_leading_newline() {
    assert_tree(
        "<pre>\nx</pre>",
        r#"| <html>
|   <head>
|   <body>
|     <pre>
|       "x"
"#,
    );
}

#[test]
fn textarea_skips_leading_newline() {
    assert_tree(
        "<textarea>\na</textarea>",
        r#"| <html>
|   <head>
|   <body>
|     <textarea>
|       "a"
"#,
    );
}

#[test]
fn plaintext_swallows_the_rest() {
    assert_tree(
        "<plaintext>a</plaintext>",
        r#"| <html>
|   <head>
|   <body>
|     <plaintext>
|       "a</plaintext>"
"#,
    );
}

#[test]
fn xmp_is_raw_text() {
    assert_tree(
        "<xmp><p>x</xmp>",
        r#"| <html>
|   <head>
|   <body>
|     <xmp>
|       "<p>x"
"#,
    );
}

#[test]
fn duplicate_attributes_first_wins() {
    assert_tree(
        "<p a=1 a=2>x",
        r#"| <html>
|   <head>
|   <body>
|     <p>
|       a="1"
|       "x"
"#,
    );
}

#[test]
fn parse_is_deterministic() {
    let input = "<table><b>1<i>2</b>3</i><td>x</table>&notin;";
    let first = common::tree_dump(&parse(input, ParseOpts::default()));
    let second = common::tree_dump(&parse(input, ParseOpts::default()));
    assert_eq!(first, second);
}

#[test]
fn errors_are_collected_when_asked() {
    let mut opts = ParseOpts::default();
    opts.tree_builder.collect_errors = true;
    let dom = parse("<p a=1 a=2>&#xD800;", opts);
    assert!(dom.errors.iter().any(|e| e == "duplicate-attribute"));
    assert!(dom
        .errors
        .iter()
        .any(|e| e == "surrogate-character-reference"));

    let dom = parse("<p a=1 a=2>&#xD800;", ParseOpts::default());
    assert!(dom.errors.is_empty());
}

fn for_each_node(handle: &Handle, f: &mut impl FnMut(&Handle)) {
    f(handle);
    for child in handle.children.borrow().iter() {
        for_each_node(child, f);
    }
    if let NodeData::Element {
        template_contents, ..
    } = &handle.data
    {
        if let Some(contents) = template_contents.borrow().as_ref() {
            for_each_node(contents, f);
        }
    }
}

#[test]
fn no_adjacent_text_nodes() {
    let input = "<table><b>1<i>2</b>3</i><td>x</table>tail<!--c-->more";
    let dom = parse(input, ParseOpts::default());
    for_each_node(&dom.document, &mut |node| {
        for pair in node.children.borrow().windows(2) {
            assert!(
                !(matches!(pair[0].data, NodeData::Text { .. })
                    && matches!(pair[1].data, NodeData::Text { .. })),
                "adjacent text nodes after parsing {input:?}"
            );
        }
    });
}

#[test]
fn parent_links_agree_with_child_lists() {
    let dom = parse(
        "<table><b>1<i>2</b>3</i><td>x</table><template><td>y</template>",
        ParseOpts::default(),
    );
    for_each_node(&dom.document, &mut |node| {
        for child in node.children.borrow().iter() {
            let parent = child.parent_node().expect("child without parent link");
            assert!(same_node(&parent, node));
        }
    });
}

#[test]
fn template_elements_have_no_direct_children() {
    let dom = parse(
        "<template><td>x</td></template><template>y</template>",
        ParseOpts::default(),
    );
    for_each_node(&dom.document, &mut |node| {
        if node.is_element(Namespace::Html, "template") {
            assert!(node.children.borrow().is_empty());
        }
    });
}

#[test]
fn foreign_descendants_keep_their_namespace() {
    let dom = parse(
        "<svg><g><circle></circle><text>t</text></g></svg>",
        ParseOpts::default(),
    );
    let mut svg_elements = 0;
    for_each_node(&dom.document, &mut |node| {
        if let Some(name) = node.elem_name() {
            if !matches!(&*name.local, "html" | "head" | "body") {
                assert_eq!(name.ns, Namespace::Svg);
            }
            if name.ns == Namespace::Svg {
                svg_elements += 1;
            }
        }
    });
    assert_eq!(svg_elements, 4);
}
