// Copyright 2025-2026 The parse5ever Project Developers. See the
// COPYRIGHT file at the top-level directory of this distribution.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! Names, namespaces and attributes shared by the tokenizer, the tree
//! builder and the DOM.

use tendril::StrTendril;

/// An interned element or attribute local name.
pub type LocalName = string_cache::DefaultAtom;

/// An interned attribute-name prefix (`xlink`, `xml` or `xmlns`).
pub type Prefix = string_cache::DefaultAtom;

/// The namespaces an HTML parse can produce.
///
/// Elements are created in `Html`, `Svg` or `MathMl`. The remaining variants
/// occur only on attributes after the "adjust foreign attributes" step.
#[derive(Copy, Clone, PartialEq, Eq, Hash, Debug)]
pub enum Namespace {
    /// No namespace. Every attribute starts here.
    None,
    Html,
    Svg,
    MathMl,
    XLink,
    Xml,
    XmlNs,
}

impl Namespace {
    /// The canonical namespace URL.
    pub fn url(self) -> &'static str {
        match self {
            Namespace::None => "",
            Namespace::Html => "http://www.w3.org/1999/xhtml",
            Namespace::Svg => "http://www.w3.org/2000/svg",
            Namespace::MathMl => "http://www.w3.org/1998/Math/MathML",
            Namespace::XLink => "http://www.w3.org/1999/xlink",
            Namespace::Xml => "http://www.w3.org/XML/1998/namespace",
            Namespace::XmlNs => "http://www.w3.org/2000/xmlns/",
        }
    }
}

/// A name with a namespace, and an optional prefix for adjusted foreign
/// attributes.
#[derive(Clone, PartialEq, Eq, Hash, Debug)]
pub struct QualName {
    pub prefix: Option<Prefix>,
    pub ns: Namespace,
    pub local: LocalName,
}

impl QualName {
    pub fn new(ns: Namespace, local: LocalName) -> QualName {
        QualName {
            prefix: None,
            ns,
            local,
        }
    }

    pub fn with_prefix(prefix: Prefix, ns: Namespace, local: LocalName) -> QualName {
        QualName {
            prefix: Some(prefix),
            ns,
            local,
        }
    }

    /// Does this name have the given namespace and local name?
    pub fn is(&self, ns: Namespace, local: &str) -> bool {
        self.ns == ns && &*self.local == local
    }
}

/// A tag attribute.
///
/// The namespace on the name is almost always `Namespace::None`; the tree
/// builder fills in prefix and namespace for `xlink:*`, `xml:*` and `xmlns*`
/// attributes on foreign elements.
#[derive(Clone, PartialEq, Eq, Debug)]
pub struct Attribute {
    pub name: QualName,
    pub value: StrTendril,
}

/// A document's quirks mode, as determined by its DOCTYPE.
#[derive(PartialEq, Eq, Copy, Clone, Hash, Debug)]
pub enum QuirksMode {
    /// Full quirks mode.
    Quirks,
    /// Limited quirks mode.
    LimitedQuirks,
    /// No quirks (the default).
    NoQuirks,
}
