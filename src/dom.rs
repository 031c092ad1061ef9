// Copyright 2025-2026 The parse5ever Project Developers. See the
// COPYRIGHT file at the top-level directory of this distribution.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! A simple reference-counted DOM.
//!
//! This is sufficient as a static parse tree, but don't build a web browser
//! using it. :)
//!
//! Parents own their children through `Rc` handles; the parent link is a weak
//! back-pointer, so a node belongs to at most one parent at a time and
//! dropping the root drops the tree. The insertion helpers below keep two
//! invariants the parser relies on: parent back-pointers always agree with
//! the children lists, and no two adjacent children of one parent are text
//! nodes.

use std::cell::{Cell, RefCell};
use std::rc::{Rc, Weak};

use tendril::StrTendril;

use crate::interface::{Attribute, Namespace, QualName};

/// Reference to a DOM node.
pub type Handle = Rc<Node>;

/// Weak reference to a DOM node, used for parent pointers.
pub type WeakHandle = Weak<Node>;

/// The different kinds of nodes in the DOM.
pub enum NodeData {
    /// The `Document` itself - the root node of an HTML document.
    Document,

    /// A `DocumentFragment`, the root of a fragment parse and the owner of
    /// a `<template>` element's contents.
    DocumentFragment,

    /// A `DOCTYPE` with name, public id, and system id.
    Doctype {
        name: StrTendril,
        public_id: StrTendril,
        system_id: StrTendril,
    },

    /// A text node.
    Text { contents: RefCell<StrTendril> },

    /// A comment.
    Comment { contents: StrTendril },

    /// An element with attributes.
    Element {
        name: QualName,
        attrs: RefCell<Vec<Attribute>>,

        /// For HTML `<template>` elements, the [template contents].
        ///
        /// The fragment holds the element's children in its place; the
        /// element's own child list stays empty.
        ///
        /// [template contents]: https://html.spec.whatwg.org/multipage/#template-contents
        template_contents: RefCell<Option<Handle>>,

        /// Whether the node is a [MathML annotation-xml element whose start
        /// tag named an HTML-ish encoding][ip], which makes it an HTML
        /// integration point.
        ///
        /// [ip]: https://html.spec.whatwg.org/multipage/#html-integration-point
        mathml_annotation_xml_integration_point: bool,
    },
}

/// A DOM node.
pub struct Node {
    /// Represents this node's data.
    pub data: NodeData,
    /// Parent node.
    pub parent: Cell<Option<WeakHandle>>,
    /// Child nodes of this node.
    pub children: RefCell<Vec<Handle>>,
}

impl Node {
    /// Create a new node from its contents.
    pub fn new(data: NodeData) -> Handle {
        Rc::new(Node {
            data,
            parent: Cell::new(None),
            children: RefCell::new(Vec::new()),
        })
    }

    /// The element name, if this is an element.
    pub fn elem_name(&self) -> Option<&QualName> {
        match self.data {
            NodeData::Element { ref name, .. } => Some(name),
            _ => None,
        }
    }

    /// Is this an element with the given namespace and local name?
    pub fn is_element(&self, ns: Namespace, local: &str) -> bool {
        self.elem_name().is_some_and(|name| name.is(ns, local))
    }

    /// The node's parent, if it is attached to a tree.
    pub fn parent_node(&self) -> Option<Handle> {
        let weak = self.parent.take()?;
        let parent = weak.upgrade().expect("dangling weak pointer");
        self.parent.set(Some(weak));
        Some(parent)
    }
}

/// A child to be inserted: either a whole node, or a run of text that may
/// coalesce with a neighboring text node.
pub enum NodeOrText {
    AppendNode(Handle),
    AppendText(StrTendril),
}

/// Are the two handles the same node?
pub fn same_node(x: &Handle, y: &Handle) -> bool {
    Rc::ptr_eq(x, y)
}

/// Create an element. An HTML `<template>` gets a fragment for its template
/// contents, and a MathML `annotation-xml` records whether its `encoding`
/// attribute makes it an HTML integration point.
pub fn create_element(name: QualName, attrs: Vec<Attribute>) -> Handle {
    let template_contents = if name.is(Namespace::Html, "template") {
        Some(Node::new(NodeData::DocumentFragment))
    } else {
        None
    };

    let mathml_annotation_xml_integration_point = name.is(Namespace::MathMl, "annotation-xml")
        && attrs.iter().any(|attr| {
            attr.name.is(Namespace::None, "encoding")
                && (attr.value.eq_ignore_ascii_case("text/html")
                    || attr.value.eq_ignore_ascii_case("application/xhtml+xml"))
        });

    Node::new(NodeData::Element {
        name,
        attrs: RefCell::new(attrs),
        template_contents: RefCell::new(template_contents),
        mathml_annotation_xml_integration_point,
    })
}

/// The template contents fragment of an HTML `<template>` element.
pub fn template_contents(target: &Handle) -> Handle {
    match target.data {
        NodeData::Element {
            ref template_contents,
            ..
        } => template_contents
            .borrow()
            .as_ref()
            .expect("not a template element")
            .clone(),
        _ => panic!("not a template element"),
    }
}

fn new_parent_link(child: &Handle, new_parent: &Handle) {
    let previous_parent = child.parent.replace(Some(Rc::downgrade(new_parent)));
    // Invariant: child is not in a tree.
    assert!(previous_parent.and_then(|p| p.upgrade()).is_none());
}

fn get_parent_and_index(target: &Handle) -> Option<(Handle, usize)> {
    let parent = target.as_ref().parent_node()?;
    let index = parent
        .children
        .borrow()
        .iter()
        .position(|child| same_node(child, target))
        .expect("child missing from parent's list of children");
    Some((parent, index))
}

fn append_to_existing_text(prev: &Handle, text: &str) -> bool {
    match prev.data {
        NodeData::Text { ref contents } => {
            contents.borrow_mut().push_slice(text);
            true
        },
        _ => false,
    }
}

/// Append a child at the end of the parent's child list, merging text with
/// an existing final text child.
pub fn append(parent: &Handle, child: NodeOrText) {
    match child {
        NodeOrText::AppendNode(node) => {
            new_parent_link(&node, parent);
            parent.children.borrow_mut().push(node);
        },
        NodeOrText::AppendText(text) => {
            if let Some(last) = parent.children.borrow().last() {
                if append_to_existing_text(last, &text) {
                    return;
                }
            }
            let node = Node::new(NodeData::Text {
                contents: RefCell::new(text),
            });
            new_parent_link(&node, parent);
            parent.children.borrow_mut().push(node);
        },
    }
}

/// Insert a child immediately before `sibling` in its parent, merging text
/// with the preceding text node if there is one.
pub fn append_before_sibling(sibling: &Handle, child: NodeOrText) {
    let (parent, index) =
        get_parent_and_index(sibling).expect("append_before_sibling called on node without parent");

    let node = match child {
        NodeOrText::AppendText(text) => {
            if index > 0 {
                if let Some(prev) = parent.children.borrow().get(index - 1) {
                    if append_to_existing_text(prev, &text) {
                        return;
                    }
                }
            }
            Node::new(NodeData::Text {
                contents: RefCell::new(text),
            })
        },
        NodeOrText::AppendNode(node) => node,
    };

    new_parent_link(&node, &parent);
    parent.children.borrow_mut().insert(index, node);
}

/// The foster-parenting insertion primitive: if `element` has a parent,
/// insert before `element`; otherwise append to `prev_element`.
pub fn append_based_on_parent_node(element: &Handle, prev_element: &Handle, child: NodeOrText) {
    if element.parent_node().is_some() {
        append_before_sibling(element, child);
    } else {
        append(prev_element, child);
    }
}

/// Detach a node from its parent, if it has one.
pub fn remove_from_parent(target: &Handle) {
    if let Some((parent, index)) = get_parent_and_index(target) {
        parent.children.borrow_mut().remove(index);
        target.parent.set(None);
    }
}

/// Move all of `node`'s children to the end of `new_parent`'s child list.
pub fn reparent_children(node: &Handle, new_parent: &Handle) {
    let mut children = node.children.borrow_mut();
    let mut new_children = new_parent.children.borrow_mut();
    for child in children.iter() {
        let previous_parent = child.parent.replace(Some(Rc::downgrade(new_parent)));
        assert!(previous_parent
            .expect("child has no parent")
            .upgrade()
            .map_or(false, |p| same_node(&p, node)));
    }
    new_children.extend(children.drain(..));
}

/// Add each attribute the element does not already have. First occurrence
/// wins, matching the parser's duplicate-attribute rule.
pub fn add_attrs_if_missing(target: &Handle, attrs: Vec<Attribute>) {
    let NodeData::Element {
        attrs: ref existing,
        ..
    } = target.data
    else {
        panic!("not an element");
    };

    let mut existing = existing.borrow_mut();
    let known: Vec<QualName> = existing.iter().map(|attr| attr.name.clone()).collect();
    existing.extend(
        attrs
            .into_iter()
            .filter(|attr| !known.contains(&attr.name)),
    );
}

#[cfg(test)]
mod test {
    use tendril::SliceExt;

    use super::*;
    use crate::interface::{LocalName, Namespace, QualName};

    fn elem(local: &str) -> Handle {
        create_element(
            QualName::new(Namespace::Html, LocalName::from(local)),
            vec![],
        )
    }

    #[test]
    fn append_coalesces_text() {
        let parent = elem("p");
        append(&parent, NodeOrText::AppendText("a".to_tendril()));
        append(&parent, NodeOrText::AppendText("b".to_tendril()));
        let children = parent.children.borrow();
        assert_eq!(children.len(), 1);
        match children[0].data {
            NodeData::Text { ref contents } => assert_eq!(&**contents.borrow(), "ab"),
            _ => panic!("expected a text node"),
        }
    }

    #[test]
    fn remove_clears_parent_link() {
        let parent = elem("div");
        let child = elem("span");
        append(&parent, NodeOrText::AppendNode(child.clone()));
        assert!(same_node(&child.parent_node().unwrap(), &parent));

        remove_from_parent(&child);
        assert!(child.parent_node().is_none());
        assert!(parent.children.borrow().is_empty());
    }

    #[test]
    fn template_elements_get_contents() {
        let template = elem("template");
        let contents = template_contents(&template);
        assert!(matches!(contents.data, NodeData::DocumentFragment));
        assert!(template.children.borrow().is_empty());
    }
}
