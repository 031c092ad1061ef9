// Copyright 2025-2026 The parse5ever Project Developers. See the
// COPYRIGHT file at the top-level directory of this distribution.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! Shared test helpers: serialize a parsed tree into the html5lib
//! tree-construction format, so expected trees can be written (or copied
//! from the conformance corpus) literally.

use parse5ever::dom::{Handle, NodeData};
use parse5ever::{Dom, Namespace};

pub fn tree_dump(dom: &Dom) -> String {
    let mut buf = String::new();
    for child in dom.document.children.borrow().iter() {
        serialize(&mut buf, 1, child.clone());
    }
    buf
}

fn serialize(buf: &mut String, indent: usize, handle: Handle) {
    buf.push('|');
    buf.push_str(&" ".repeat(indent));

    match &handle.data {
        NodeData::Document | NodeData::DocumentFragment => panic!("should not reach Document"),

        NodeData::Doctype {
            name,
            public_id,
            system_id,
        } => {
            buf.push_str("<!DOCTYPE ");
            buf.push_str(name);
            if !public_id.is_empty() || !system_id.is_empty() {
                buf.push_str(&format!(" \"{public_id}\" \"{system_id}\""));
            }
            buf.push_str(">\n");
        },

        NodeData::Text { contents } => {
            buf.push('"');
            buf.push_str(&contents.borrow());
            buf.push_str("\"\n");
        },

        NodeData::Comment { contents } => {
            buf.push_str("<!-- ");
            buf.push_str(contents);
            buf.push_str(" -->\n");
        },

        NodeData::Element {
            name,
            attrs,
            template_contents,
            ..
        } => {
            buf.push('<');
            match name.ns {
                Namespace::Svg => buf.push_str("svg "),
                Namespace::MathMl => buf.push_str("math "),
                _ => (),
            }
            buf.push_str(&name.local);
            buf.push_str(">\n");

            let mut attrs = attrs.borrow().clone();
            attrs.sort_by(|x, y| {
                let a: &str = &x.name.local;
                let b: &str = &y.name.local;
                a.cmp(b)
            });
            for attr in attrs {
                buf.push('|');
                buf.push_str(&" ".repeat(indent + 2));
                if let Some(ref prefix) = attr.name.prefix {
                    buf.push_str(prefix);
                    buf.push(' ');
                }
                buf.push_str(&attr.name.local);
                buf.push_str(&format!("=\"{}\"\n", attr.value));
            }

            if let Some(contents) = template_contents.borrow().as_ref() {
                buf.push('|');
                buf.push_str(&" ".repeat(indent + 2));
                buf.push_str("content\n");
                for child in contents.children.borrow().iter() {
                    serialize(buf, indent + 4, child.clone());
                }
            }

            for child in handle.children.borrow().iter() {
                serialize(buf, indent + 2, child.clone());
            }
        },
    }
}
