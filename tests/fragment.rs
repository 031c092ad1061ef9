// Copyright 2025-2026 The parse5ever Project Developers. See the
// COPYRIGHT file at the top-level directory of this distribution.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! Fragment parsing tests: the context element selects the initial
//! tokenizer state and insertion mode.

mod common;

use parse5ever::{parse_fragment, Namespace, ParseOpts};

fn assert_fragment(input: &str, context: &str, ns: Namespace, expected: &str) {
    let dom = parse_fragment(input, context, ns, ParseOpts::default());
    assert_eq!(
        common::tree_dump(&dom),
        expected,
        "input: {input:?} in context {context:?}"
    );
}

#[test]
fn list_items_in_ul_context() {
    assert_fragment(
        "<li>one<li>two",
        "ul",
        Namespace::Html,
        r#"| <li>
|   "one"
| <li>
|   "two"
"#,
    );
}

#[test]
fn none_namespace_means_html() {
    assert_fragment(
        "<li>one",
        "ul",
        Namespace::None,
        r#"| <li>
|   "one"
"#,
    );
}

#[test]
fn rows_in_table_context() {
    assert_fragment(
        "<tr><td>x",
        "table",
        Namespace::Html,
        r#"| <tbody>
|   <tr>
|     <td>
|       "x"
"#,
    );
}

#[test]
fn cells_in_tr_context() {
    assert_fragment(
        "<td>x<td>y",
        "tr",
        Namespace::Html,
        r#"| <td>
|   "x"
| <td>
|   "y"
"#,
    );
}

#[test]
fn textarea_context_is_rcdata() {
    assert_fragment(
        "a<b>c",
        "textarea",
        Namespace::Html,
        "| \"a<b>c\"\n",
    );
}

#[test]
fn title_context_resolves_references() {
    assert_fragment("&amp;", "title", Namespace::Html, "| \"&\"\n");
}

#[test]
fn script_context_is_script_data() {
    assert_fragment(
        "x<!--y",
        "script",
        Namespace::Html,
        "| \"x<!--y\"\n",
    );
}

#[test]
fn body_context_builds_normal_content() {
    assert_fragment(
        "<p>x<p>y",
        "body",
        Namespace::Html,
        r#"| <p>
|   "x"
| <p>
|   "y"
"#,
    );
}

#[test]
fn svg_context_parses_foreign_content() {
    assert_fragment(
        r#"<circle r="1"/><p>x"#,
        "svg",
        Namespace::Svg,
        r#"| <svg circle>
|   r="1"
| <p>
|   "x"
"#,
    );
}

#[test]
fn template_context_allows_table_parts() {
    assert_fragment(
        "<td>x",
        "template",
        Namespace::Html,
        r#"| <td>
|   "x"
"#,
    );
}

#[test]
fn end_tag_matching_context_is_ignored() {
    assert_fragment(
        "one</ul>two",
        "ul",
        Namespace::Html,
        "| \"onetwo\"\n",
    );
}

#[test]
fn frameset_ok_is_off_in_fragments() {
    // In a fragment, <frameset> can never replace the (nonexistent) body.
    assert_fragment(
        "x<frameset>",
        "body",
        Namespace::Html,
        "| \"x\"\n",
    );
}
