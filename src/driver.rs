// Copyright 2025-2026 The parse5ever Project Developers. See the
// COPYRIGHT file at the top-level directory of this distribution.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! High-level interface to the parser: feed a source string through the
//! tokenizer and tree builder, get a tree back.

use std::borrow::Cow;

use tendril::StrTendril;

use crate::dom::{self, Handle, Node, NodeData};
use crate::interface::{LocalName, Namespace, QualName, QuirksMode};
use crate::tokenizer::{Tokenizer, TokenizerOpts};
use crate::tree_builder::{TreeBuilder, TreeBuilderOpts};
use crate::util::buffer_queue::BufferQueue;

/// Options for the parser entry points, with an impl for `Default`.
#[derive(Clone, Default)]
pub struct ParseOpts {
    /// Tokenizer options.
    pub tokenizer: TokenizerOpts,

    /// Tree builder options.
    pub tree_builder: TreeBuilderOpts,
}

/// The result of a parse: the tree, plus the document-level facts that do
/// not live on any node.
pub struct Dom {
    /// The Document node for [`parse`], or the DocumentFragment node for
    /// [`parse_fragment`].
    pub document: Handle,

    /// The quirks mode selected by the document's DOCTYPE.
    pub quirks_mode: QuirksMode,

    /// Parse error codes, in source order. Empty unless
    /// `opts.tree_builder.collect_errors` was set.
    pub errors: Vec<Cow<'static, str>>,
}

/// Parse a complete document from a string of code points.
///
/// Parsing cannot fail; malformed input yields parse errors and a
/// well-formed tree.
pub fn parse(source: &str, opts: ParseOpts) -> Dom {
    let tb = TreeBuilder::new(opts.tree_builder);
    let mut tok = Tokenizer::new(tb, opts.tokenizer);

    let mut input = BufferQueue::new();
    input.push_back(StrTendril::from_slice(source));
    tok.feed(&mut input);
    tok.end();

    let (document, quirks_mode, errors) = tok.sink.finish();
    Dom {
        document,
        quirks_mode,
        errors,
    }
}

/// Parse a fragment of HTML as if inside the given context element, per the
/// HTML fragment parsing algorithm.
///
/// The returned `document` is a DocumentFragment holding the parsed
/// children. A `Namespace::None` context is taken to mean an HTML context
/// element; `Namespace::Svg` and `Namespace::MathMl` contexts parse foreign
/// content from the first character.
pub fn parse_fragment(
    source: &str,
    context_name: &str,
    context_ns: Namespace,
    opts: ParseOpts,
) -> Dom {
    let context_ns = match context_ns {
        Namespace::None => Namespace::Html,
        ns => ns,
    };
    let context_elem = dom::create_element(
        QualName::new(context_ns, LocalName::from(context_name)),
        vec![],
    );

    let tb = TreeBuilder::new_for_fragment(opts.tree_builder, context_elem);

    let mut tok_opts = opts.tokenizer;
    tok_opts.initial_state = Some(tb.tokenizer_state_for_context_elem());
    tok_opts.last_start_tag_name = Some(context_name.into());
    let mut tok = Tokenizer::new(tb, tok_opts);

    let mut input = BufferQueue::new();
    input.push_back(StrTendril::from_slice(source));
    tok.feed(&mut input);
    tok.end();

    let (document, quirks_mode, errors) = tok.sink.finish();

    // The parsed children live under the root html element created by the
    // fragment algorithm; detach them into a fresh fragment.
    let fragment = Node::new(NodeData::DocumentFragment);
    let root = document.children.borrow().first().cloned();
    if let Some(root) = root {
        dom::reparent_children(&root, &fragment);
    }

    Dom {
        document: fragment,
        quirks_mode,
        errors,
    }
}
