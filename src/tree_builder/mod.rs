// Copyright 2025-2026 The parse5ever Project Developers. See the
// COPYRIGHT file at the top-level directory of this distribution.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! The HTML5 tree builder.
//!
//! This stage consumes the token stream and builds the DOM tree directly: it
//! maintains the insertion mode, the stack of open elements, the list of
//! active formatting elements, and the template insertion modes, and
//! implements the tree-construction algorithms (adoption agency, foster
//! parenting, foreign content) over the nodes in [`crate::dom`].

use std::borrow::Cow::{self, Borrowed};
use std::collections::VecDeque;
use std::fmt;
use std::mem;

use log::debug;

use self::data::*;
use self::types::*;

use crate::dom::{
    self, create_element, same_node, template_contents, Handle, Node, NodeData,
    NodeOrText::{AppendNode, AppendText},
};
use crate::interface::{Attribute, LocalName, Namespace, Prefix, QualName, QuirksMode};
use crate::tendril::StrTendril;
use crate::tokenizer::states as tok_state;
use crate::tokenizer::states::RawKind;
use crate::tokenizer::{self, EndTag, StartTag, Tag, TokenSink, TokenSinkResult};

mod data;
mod rules;
pub(crate) mod types;

/// Tree builder options, with an impl for Default.
#[derive(Copy, Clone)]
pub struct TreeBuilderOpts {
    /// Is scripting enabled?
    ///
    /// This affects how `<noscript>` elements are parsed: with scripting
    /// enabled their contents are a single text node, otherwise a normal
    /// tree of nodes.
    pub scripting_enabled: bool,

    /// Collect parse error codes into the output? Default: false.
    pub collect_errors: bool,
}

impl Default for TreeBuilderOpts {
    fn default() -> TreeBuilderOpts {
        TreeBuilderOpts {
            scripting_enabled: false,
            collect_errors: false,
        }
    }
}

/// The HTML tree builder.
pub struct TreeBuilder {
    /// Options controlling the behavior of the tree builder.
    opts: TreeBuilderOpts,

    /// The document node.
    doc_handle: Handle,

    /// Insertion mode.
    mode: InsertionMode,

    /// Original insertion mode, used by Text and InTableText modes.
    orig_mode: Option<InsertionMode>,

    /// Stack of template insertion modes.
    template_modes: Vec<InsertionMode>,

    /// Pending table character tokens.
    pending_table_text: Vec<(SplitStatus, StrTendril)>,

    /// Quirks mode as set by the parser.
    quirks_mode: QuirksMode,

    /// Stack of open elements, most recently added at end.
    open_elems: Vec<Handle>,

    /// List of active formatting elements.
    active_formatting: Vec<FormatEntry>,

    //§ the-element-pointers
    /// Head element pointer.
    head_elem: Option<Handle>,

    /// Form element pointer.
    form_elem: Option<Handle>,
    //§ END
    /// Frameset-ok flag.
    frameset_ok: bool,

    /// Ignore a following U+000A LINE FEED?
    ignore_lf: bool,

    /// Is foster parenting enabled?
    foster_parenting: bool,

    /// The context element for the fragment parsing algorithm.
    context_elem: Option<Handle>,

    /// Parse errors collected when `opts.collect_errors` is set.
    errors: Vec<Cow<'static, str>>,
}

impl TreeBuilder {
    /// Create a new tree builder which builds into a fresh document.
    ///
    /// The tree builder is also a `TokenSink`.
    pub fn new(opts: TreeBuilderOpts) -> TreeBuilder {
        TreeBuilder {
            opts,
            doc_handle: Node::new(NodeData::Document),
            mode: InsertionMode::Initial,
            orig_mode: None,
            template_modes: vec![],
            pending_table_text: vec![],
            quirks_mode: QuirksMode::NoQuirks,
            open_elems: vec![],
            active_formatting: vec![],
            head_elem: None,
            form_elem: None,
            frameset_ok: true,
            ignore_lf: false,
            foster_parenting: false,
            context_elem: None,
            errors: vec![],
        }
    }

    /// Create a new tree builder for parsing a fragment in the given
    /// context element.
    ///
    /// The tree builder is also a `TokenSink`.
    pub fn new_for_fragment(opts: TreeBuilderOpts, context_elem: Handle) -> TreeBuilder {
        let mut tb = TreeBuilder::new(opts);

        // https://html.spec.whatwg.org/multipage/#parsing-html-fragments
        if context_elem.is_element(Namespace::Html, "template") {
            tb.template_modes.push(InsertionMode::InTemplate);
        }
        tb.context_elem = Some(context_elem);

        // Let root be a new html element with no attributes. Append it to
        // the Document node, and set up the stack of open elements so that
        // it contains just root.
        tb.create_root(vec![]);

        // Reset the parser's insertion mode appropriately.
        tb.mode = tb.reset_insertion_mode();

        // Set the parser's frameset-ok flag to "not ok".
        tb.frameset_ok = false;

        tb
    }

    // https://html.spec.whatwg.org/multipage/#concept-frag-parse-context
    // Set the state of the HTML parser's tokenization stage as follows:
    pub fn tokenizer_state_for_context_elem(&self) -> tok_state::State {
        let elem = self
            .context_elem
            .as_ref()
            .expect("no context element");
        let name = match elem.elem_name() {
            Some(name) if name.ns == Namespace::Html => name,
            _ => return tok_state::Data,
        };

        match &*name.local {
            "title" | "textarea" => tok_state::RawData(tok_state::Rcdata),

            "style" | "xmp" | "iframe" | "noembed" | "noframes" => {
                tok_state::RawData(tok_state::Rawtext)
            },

            "script" => tok_state::RawData(tok_state::ScriptData),

            "noscript" => {
                if self.opts.scripting_enabled {
                    tok_state::RawData(tok_state::Rawtext)
                } else {
                    tok_state::Data
                }
            },

            "plaintext" => tok_state::Plaintext,

            _ => tok_state::Data,
        }
    }

    /// Consume the tree builder, returning the document node, the quirks
    /// mode and the collected parse errors.
    pub(crate) fn finish(self) -> (Handle, QuirksMode, Vec<Cow<'static, str>>) {
        (self.doc_handle, self.quirks_mode, self.errors)
    }

    fn parse_error(&mut self, code: Cow<'static, str>) {
        debug!("parse error: {code}");
        if self.opts.collect_errors {
            self.errors.push(code);
        }
    }

    fn process_to_completion(&mut self, mut token: Token) -> TokenSinkResult {
        // Queue of additional tokens yet to be processed.
        // This stays empty in the common case where we don't split whitespace.
        let mut more_tokens = VecDeque::new();

        loop {
            let should_have_acknowledged_self_closing_flag = matches!(
                token,
                Token::Tag(Tag {
                    self_closing: true,
                    kind: StartTag,
                    ..
                })
            );
            let result = if self.is_foreign(&token) {
                self.step_foreign(token)
            } else {
                let mode = self.mode;
                self.step(mode, token)
            };
            match result {
                ProcessResult::Done => {
                    if should_have_acknowledged_self_closing_flag {
                        self.parse_error(Borrowed(
                            "non-void-html-element-start-tag-with-trailing-solidus",
                        ));
                    }
                    let Some(new_token) = more_tokens.pop_front() else {
                        return TokenSinkResult::Continue;
                    };
                    token = new_token;
                },
                ProcessResult::DoneAckSelfClosing => {
                    let Some(new_token) = more_tokens.pop_front() else {
                        return TokenSinkResult::Continue;
                    };
                    token = new_token;
                },
                ProcessResult::Reprocess(m, t) => {
                    self.mode = m;
                    token = t;
                },
                ProcessResult::SplitWhitespace(mut buf) => {
                    let p = buf.pop_front_char_run(|c| c.is_ascii_whitespace());
                    let Some((first, is_ws)) = p else {
                        return TokenSinkResult::Continue;
                    };
                    let status = if is_ws {
                        SplitStatus::Whitespace
                    } else {
                        SplitStatus::NotWhitespace
                    };
                    token = Token::Characters(status, first);

                    if buf.len32() > 0 {
                        more_tokens.push_back(Token::Characters(SplitStatus::NotSplit, buf));
                    }
                },
                ProcessResult::ToPlaintext => {
                    debug_assert!(more_tokens.is_empty());
                    return TokenSinkResult::Plaintext;
                },
                ProcessResult::ToRawData(k) => {
                    debug_assert!(more_tokens.is_empty());
                    return TokenSinkResult::RawData(k);
                },
            }
        }
    }

    /// Are we parsing a HTML fragment?
    pub fn is_fragment(&self) -> bool {
        self.context_elem.is_some()
    }

    /// <https://html.spec.whatwg.org/multipage/#appropriate-place-for-inserting-a-node>
    fn appropriate_place_for_insertion(&self, override_target: Option<Handle>) -> InsertionPoint {
        fn foster_target(name: &QualName) -> bool {
            name.ns == Namespace::Html
                && matches!(&*name.local, "table" | "tbody" | "tfoot" | "thead" | "tr")
        }

        let target = override_target.unwrap_or_else(|| self.current_node());
        if !(self.foster_parenting && self.elem_in(&target, foster_target)) {
            if target.is_element(Namespace::Html, "template") {
                // No foster parenting (inside template).
                return InsertionPoint::LastChild(template_contents(&target));
            }
            // No foster parenting (the common case).
            return InsertionPoint::LastChild(target);
        }

        // Foster parenting
        let mut iter = self.open_elems.iter().rev().peekable();
        while let Some(elem) = iter.next() {
            if elem.is_element(Namespace::Html, "template") {
                return InsertionPoint::LastChild(template_contents(elem));
            } else if elem.is_element(Namespace::Html, "table") {
                return InsertionPoint::TableFosterParenting {
                    element: elem.clone(),
                    prev_element: (*iter.peek().unwrap()).clone(),
                };
            }
        }
        InsertionPoint::LastChild(self.html_elem())
    }

    fn insert_at(&self, insertion_point: InsertionPoint, child: dom::NodeOrText) {
        match insertion_point {
            InsertionPoint::LastChild(parent) => dom::append(&parent, child),
            InsertionPoint::TableFosterParenting {
                element,
                prev_element,
            } => dom::append_based_on_parent_node(&element, &prev_element, child),
        }
    }
}

impl TokenSink for TreeBuilder {
    fn process_token(&mut self, token: tokenizer::Token) -> TokenSinkResult {
        let ignore_lf = mem::take(&mut self.ignore_lf);

        // Handle `ParseError` and `DoctypeToken`; convert everything else to
        // the local `Token` type.
        let token = match token {
            tokenizer::ParseError(e) => {
                self.parse_error(e);
                return TokenSinkResult::Continue;
            },

            tokenizer::DoctypeToken(dt) => {
                if self.mode == InsertionMode::Initial {
                    let (err, quirk) = data::doctype_error_and_quirks(&dt);
                    if err {
                        self.parse_error(Borrowed("unknown-doctype"));
                    }
                    self.append_doctype_to_doc(dt);
                    self.set_quirks_mode(quirk);

                    self.mode = InsertionMode::BeforeHtml;
                } else {
                    // A Document has at most one doctype node; later
                    // DOCTYPEs are dropped.
                    self.parse_error(Borrowed("unexpected-doctype"));
                }
                return TokenSinkResult::Continue;
            },

            tokenizer::TagToken(x) => Token::Tag(x),
            tokenizer::CommentToken(x) => Token::Comment(x),
            tokenizer::NullCharacterToken => Token::NullCharacter,
            tokenizer::EOFToken => Token::Eof,

            tokenizer::CharacterTokens(mut x) => {
                if ignore_lf && x.starts_with("\n") {
                    x.pop_front(1);
                }
                if x.is_empty() {
                    return TokenSinkResult::Continue;
                }
                Token::Characters(SplitStatus::NotSplit, x)
            },
        };

        self.process_to_completion(token)
    }

    fn end(&mut self) {
        self.open_elems.clear();
    }

    fn adjusted_current_node_present_and_not_in_html_namespace(&self) -> bool {
        !self.open_elems.is_empty()
            && self
                .adjusted_current_node()
                .elem_name()
                .is_some_and(|name| name.ns != Namespace::Html)
    }
}

#[doc(hidden)]
impl TreeBuilder {
    fn unexpected<T: fmt::Debug>(&mut self, thing: &T) -> ProcessResult {
        debug!(
            "unexpected token {:?} in insertion mode {:?}",
            thing, self.mode
        );
        self.parse_error(Borrowed("unexpected-token"));
        ProcessResult::Done
    }

    fn assert_named(&self, node: &Handle, name: &str) {
        debug_assert!(node.is_element(Namespace::Html, name));
    }

    /// Iterate over the active formatting elements (with index in the list)
    /// from the end to the last marker, or the beginning if there are no
    /// markers.
    fn active_formatting_end_to_marker(&self) -> impl Iterator<Item = (usize, &Handle, &Tag)> {
        self.active_formatting
            .iter()
            .enumerate()
            .rev()
            .map_while(|(i, entry)| match entry {
                FormatEntry::Marker => None,
                FormatEntry::Element(h, t) => Some((i, h, t)),
            })
    }

    fn position_in_active_formatting(&self, element: &Handle) -> Option<usize> {
        self.active_formatting.iter().position(|n| match n {
            FormatEntry::Marker => false,
            FormatEntry::Element(ref handle, _) => same_node(handle, element),
        })
    }

    fn set_quirks_mode(&mut self, mode: QuirksMode) {
        self.quirks_mode = mode;
    }

    fn stop_parsing(&mut self) -> ProcessResult {
        ProcessResult::Done
    }

    fn append_doctype_to_doc(&mut self, doctype: tokenizer::Doctype) {
        let tokenizer::Doctype {
            name,
            public_id,
            system_id,
            force_quirks: _,
        } = doctype;
        let node = Node::new(NodeData::Doctype {
            name: name.unwrap_or_default(),
            public_id: public_id.unwrap_or_default(),
            system_id: system_id.unwrap_or_default(),
        });
        dom::append(&self.doc_handle, AppendNode(node));
    }

    //§ parsing-elements-that-contain-only-text
    // Switch to `Text` insertion mode, save the old mode, and
    // switch the tokenizer to a raw-data state.
    // The latter only takes effect after the current / next
    // `process_token` of a start tag returns!
    fn to_raw_text_mode(&mut self, k: RawKind) -> ProcessResult {
        self.orig_mode = Some(self.mode);
        self.mode = InsertionMode::Text;
        ProcessResult::ToRawData(k)
    }

    // The generic raw text / RCDATA parsing algorithm.
    fn parse_raw_data(&mut self, tag: Tag, k: RawKind) -> ProcessResult {
        self.insert_element_for(tag);
        self.to_raw_text_mode(k)
    }
    //§ END

    fn current_node(&self) -> Handle {
        self.open_elems
            .last()
            .expect("no current element")
            .clone()
    }

    fn adjusted_current_node(&self) -> Handle {
        if self.open_elems.len() == 1 {
            if let Some(ctx) = self.context_elem.as_ref() {
                return ctx.clone();
            }
        }
        self.current_node()
    }

    fn current_node_in<TagSet>(&self, set: TagSet) -> bool
    where
        TagSet: Fn(&QualName) -> bool,
    {
        self.elem_in(&self.current_node(), set)
    }

    // Insert at the "appropriate place for inserting a node".
    fn insert_appropriately(&mut self, child: dom::NodeOrText, override_target: Option<Handle>) {
        let insertion_point = self.appropriate_place_for_insertion(override_target);
        self.insert_at(insertion_point, child);
    }

    /// <https://html.spec.whatwg.org/multipage/#adoption-agency-algorithm>
    fn adoption_agency(&mut self, subject: LocalName) {
        // 1.
        if self.current_node_named(&subject)
            && self
                .position_in_active_formatting(&self.current_node())
                .is_none()
        {
            self.pop();
            return;
        }

        // 2. 3. 4.
        for _ in 0..8 {
            // 5.
            // We clone the Handle and Tag so they don't borrow self.
            let maybe_fmt_entry = self
                .active_formatting_end_to_marker()
                .find(|&(_, _, tag)| tag.name == subject)
                .map(|(i, h, t)| (i, h.clone(), t.clone()));

            let Some((fmt_elem_index, fmt_elem, fmt_elem_tag)) = maybe_fmt_entry else {
                return self.process_end_tag_in_body(Tag {
                    kind: EndTag,
                    name: subject,
                    self_closing: false,
                    attrs: vec![],
                });
            };

            let Some(fmt_elem_stack_index) = self
                .open_elems
                .iter()
                .rposition(|n| same_node(n, &fmt_elem))
            else {
                self.parse_error(Borrowed("adoption-agency-formatting-element-not-open"));
                self.active_formatting.remove(fmt_elem_index);
                return;
            };

            // 7.
            if !self.in_scope(default_scope, |n| same_node(n, &fmt_elem)) {
                self.parse_error(Borrowed("adoption-agency-formatting-element-not-in-scope"));
                return;
            }

            // 8.
            if !same_node(&self.current_node(), &fmt_elem) {
                self.parse_error(Borrowed("adoption-agency-formatting-element-not-current"));
            }

            // 9.
            let maybe_furthest_block = self
                .open_elems
                .iter()
                .enumerate()
                .skip(fmt_elem_stack_index)
                .find(|&(_, open_element)| self.elem_in(open_element, special_tag))
                .map(|(i, h)| (i, h.clone()));

            let Some((furthest_block_index, furthest_block)) = maybe_furthest_block else {
                // 10.
                self.open_elems.truncate(fmt_elem_stack_index);
                self.active_formatting.remove(fmt_elem_index);
                return;
            };

            // 11.
            let common_ancestor = self.open_elems[fmt_elem_stack_index - 1].clone();

            // 12.
            let mut bookmark = Bookmark::Replace(fmt_elem.clone());

            // 13.
            let mut node;
            let mut node_index = furthest_block_index;
            let mut last_node = furthest_block.clone();

            // 13.1.
            let mut inner_counter = 0;
            loop {
                // 13.2.
                inner_counter += 1;

                // 13.3.
                node_index -= 1;
                node = self.open_elems[node_index].clone();

                // 13.4.
                if same_node(&node, &fmt_elem) {
                    break;
                }

                // 13.5.
                if inner_counter > 3 {
                    if let Some(position) = self.position_in_active_formatting(&node) {
                        self.active_formatting.remove(position);
                    }
                    self.open_elems.remove(node_index);
                    continue;
                }

                let Some(node_formatting_index) = self.position_in_active_formatting(&node)
                else {
                    // 13.6.
                    self.open_elems.remove(node_index);
                    continue;
                };

                // 13.7.
                let tag = match self.active_formatting[node_formatting_index] {
                    FormatEntry::Element(ref h, ref t) => {
                        debug_assert!(same_node(h, &node));
                        t.clone()
                    },
                    FormatEntry::Marker => panic!("found marker during adoption agency"),
                };
                let new_element = create_element(
                    QualName::new(Namespace::Html, tag.name.clone()),
                    tag.attrs.clone(),
                );
                self.open_elems[node_index] = new_element.clone();
                self.active_formatting[node_formatting_index] =
                    FormatEntry::Element(new_element.clone(), tag);
                node = new_element;

                // 13.8.
                if same_node(&last_node, &furthest_block) {
                    bookmark = Bookmark::InsertAfter(node.clone());
                }

                // 13.9.
                dom::remove_from_parent(&last_node);
                dom::append(&node, AppendNode(last_node.clone()));

                // 13.10.
                last_node = node.clone();

                // 13.11.
            }

            // 14.
            dom::remove_from_parent(&last_node);
            self.insert_appropriately(AppendNode(last_node.clone()), Some(common_ancestor));

            // 15.
            let new_element = create_element(
                QualName::new(Namespace::Html, fmt_elem_tag.name.clone()),
                fmt_elem_tag.attrs.clone(),
            );
            let new_entry = FormatEntry::Element(new_element.clone(), fmt_elem_tag);

            // 16.
            dom::reparent_children(&furthest_block, &new_element);

            // 17.
            dom::append(&furthest_block, AppendNode(new_element.clone()));

            // 18.
            match bookmark {
                Bookmark::Replace(to_replace) => {
                    let index = self
                        .position_in_active_formatting(&to_replace)
                        .expect("bookmark not found in active formatting elements");
                    self.active_formatting[index] = new_entry;
                },
                Bookmark::InsertAfter(previous) => {
                    let index = self
                        .position_in_active_formatting(&previous)
                        .expect("bookmark not found in active formatting elements")
                        + 1;
                    self.active_formatting.insert(index, new_entry);
                    let old_index = self
                        .position_in_active_formatting(&fmt_elem)
                        .expect("formatting element not found in active formatting elements");
                    self.active_formatting.remove(old_index);
                },
            }

            // 19.
            self.remove_from_stack(&fmt_elem);
            let new_furthest_block_index = self
                .open_elems
                .iter()
                .position(|n| same_node(n, &furthest_block))
                .expect("furthest block missing from open element stack");
            self.open_elems
                .insert(new_furthest_block_index + 1, new_element);

            // 20.
        }
    }

    fn push(&mut self, elem: &Handle) {
        self.open_elems.push(elem.clone());
    }

    fn pop(&mut self) -> Handle {
        self.open_elems.pop().expect("no current element")
    }

    fn remove_from_stack(&mut self, elem: &Handle) {
        let position = self.open_elems.iter().rposition(|x| same_node(elem, x));
        if let Some(position) = position {
            self.open_elems.remove(position);
        }
    }

    fn is_marker_or_open(&self, entry: &FormatEntry) -> bool {
        match *entry {
            FormatEntry::Marker => true,
            FormatEntry::Element(ref node, _) => {
                self.open_elems.iter().rev().any(|n| same_node(n, node))
            },
        }
    }

    /// <https://html.spec.whatwg.org/#reconstruct-the-active-formatting-elements>
    fn reconstruct_active_formatting_elements(&mut self) {
        // Step 1. If there are no entries in the list of active formatting
        // elements, there is nothing to reconstruct.
        let Some(last) = self.active_formatting.last() else {
            return;
        };

        // Step 2. If the last entry is a marker or an open element, there is
        // nothing to reconstruct.
        if self.is_marker_or_open(last) {
            return;
        }

        // Step 3-7. Rewind to the latest entry that is a marker or open (or
        // the start of the list), then advance one.
        let mut entry_index = self.active_formatting.len() - 1;
        loop {
            if entry_index == 0 {
                break;
            }
            entry_index -= 1;
            if self.is_marker_or_open(&self.active_formatting[entry_index]) {
                entry_index += 1;
                break;
            }
        }

        // Step 8-10. Create: insert an HTML element for each remaining
        // entry's token and replace the entry with one for the new element.
        loop {
            let tag = match self.active_formatting[entry_index] {
                FormatEntry::Element(_, ref t) => t.clone(),
                FormatEntry::Marker => {
                    panic!("found marker during formatting element reconstruction")
                },
            };

            let new_element = self.insert_element(
                PushFlag::Push,
                Namespace::Html,
                tag.name.clone(),
                tag.attrs.clone(),
            );

            self.active_formatting[entry_index] = FormatEntry::Element(new_element, tag);

            if entry_index == self.active_formatting.len() - 1 {
                break;
            }
            entry_index += 1;
        }
    }

    /// Get the first element on the stack, which will be the <html> element.
    fn html_elem(&self) -> Handle {
        self.open_elems[0].clone()
    }

    /// Get the second element on the stack, if it's a HTML body element.
    fn body_elem(&self) -> Option<Handle> {
        if self.open_elems.len() <= 1 {
            return None;
        }

        let node = &self.open_elems[1];
        if node.is_element(Namespace::Html, "body") {
            Some(node.clone())
        } else {
            None
        }
    }

    /// Signal an error depending on the state of the stack of open elements
    /// at the end of the body.
    fn check_body_end(&mut self) {
        fn body_end_ok(name: &QualName) -> bool {
            name.ns == Namespace::Html
                && matches!(
                    &*name.local,
                    "dd" | "dt"
                        | "li"
                        | "optgroup"
                        | "option"
                        | "p"
                        | "rb"
                        | "rp"
                        | "rt"
                        | "rtc"
                        | "tbody"
                        | "td"
                        | "tfoot"
                        | "th"
                        | "thead"
                        | "tr"
                        | "body"
                        | "html"
                )
        }

        for elem in self.open_elems.clone() {
            if !self.elem_in(&elem, body_end_ok) {
                self.parse_error(Borrowed("unexpected-open-element-at-end-of-body"));
                // The spec suggests reporting just the first one.
                return;
            }
        }
    }

    fn in_scope<TagSet, Pred>(&self, scope: TagSet, pred: Pred) -> bool
    where
        TagSet: Fn(&QualName) -> bool,
        Pred: Fn(&Handle) -> bool,
    {
        for node in self.open_elems.iter().rev() {
            if pred(node) {
                return true;
            }
            if node.elem_name().is_some_and(&scope) {
                return false;
            }
        }

        // supposed to be impossible, because <html> is always in scope
        false
    }

    fn elem_in<TagSet>(&self, elem: &Handle, set: TagSet) -> bool
    where
        TagSet: Fn(&QualName) -> bool,
    {
        elem.elem_name().is_some_and(set)
    }

    fn in_html_elem_named(&self, name: &str) -> bool {
        self.open_elems
            .iter()
            .any(|elem| elem.is_element(Namespace::Html, name))
    }

    fn current_node_named(&self, name: &str) -> bool {
        self.current_node().is_element(Namespace::Html, name)
    }

    fn in_scope_named<TagSet>(&self, scope: TagSet, name: &str) -> bool
    where
        TagSet: Fn(&QualName) -> bool,
    {
        self.in_scope(scope, |elem| elem.is_element(Namespace::Html, name))
    }

    /// <https://html.spec.whatwg.org/#generate-implied-end-tags>
    fn generate_implied_end_tags<TagSet>(&mut self, set: TagSet)
    where
        TagSet: Fn(&QualName) -> bool,
    {
        loop {
            {
                let Some(elem) = self.open_elems.last() else {
                    return;
                };
                if !elem.elem_name().is_some_and(&set) {
                    return;
                }
            }
            self.pop();
        }
    }

    fn generate_implied_end_except(&mut self, except: LocalName) {
        self.generate_implied_end_tags(|name| {
            if name.is(Namespace::Html, &except) {
                false
            } else {
                cursory_implied_end(name)
            }
        });
    }
    //§ END

    // Pop elements until the current element is in the set.
    fn pop_until_current<TagSet>(&mut self, tag_set: TagSet)
    where
        TagSet: Fn(&QualName) -> bool,
    {
        while !self.current_node_in(&tag_set) {
            self.open_elems.pop();
        }
    }

    // Pop elements until an element from the set has been popped. Returns
    // the number of elements popped.
    fn pop_until<P>(&mut self, pred: P) -> usize
    where
        P: Fn(&QualName) -> bool,
    {
        let mut n = 0;
        loop {
            n += 1;
            match self.open_elems.pop() {
                None => break,
                Some(elem) => {
                    if elem.elem_name().is_some_and(&pred) {
                        break;
                    }
                },
            }
        }
        n
    }

    fn pop_until_named(&mut self, name: &str) -> usize {
        self.pop_until(|p| p.is(Namespace::Html, name))
    }

    /// Pop elements until one with the specified name has been popped.
    /// Signal an error if it was not the first one.
    fn expect_to_close(&mut self, name: &str) {
        if self.pop_until_named(name) != 1 {
            self.parse_error(Borrowed("unexpected-open-element-while-closing"));
        }
    }

    fn close_p_element(&mut self) {
        self.generate_implied_end_tags(|name| {
            !name.is(Namespace::Html, "p") && cursory_implied_end(name)
        });
        self.expect_to_close("p");
    }

    fn close_p_element_in_button_scope(&mut self) {
        if self.in_scope_named(button_scope, "p") {
            self.close_p_element();
        }
    }

    // Check <input> tags for type=hidden
    fn is_type_hidden(&self, tag: &Tag) -> bool {
        match tag
            .attrs
            .iter()
            .find(|&at| at.name.is(Namespace::None, "type"))
        {
            None => false,
            Some(at) => at.value.eq_ignore_ascii_case("hidden"),
        }
    }

    fn foster_parent_in_body(&mut self, token: Token) -> ProcessResult {
        self.foster_parenting = true;
        let res = self.step(InsertionMode::InBody, token);
        // The "in body" rules for these tokens never ask for a reprocess.
        self.foster_parenting = false;
        res
    }

    fn process_chars_in_table(&mut self, token: Token) -> ProcessResult {
        fn table_outer(name: &QualName) -> bool {
            name.ns == Namespace::Html
                && matches!(&*name.local, "table" | "tbody" | "tfoot" | "thead" | "tr")
        }

        if self.current_node_in(table_outer) {
            debug_assert!(self.pending_table_text.is_empty());
            self.orig_mode = Some(self.mode);
            ProcessResult::Reprocess(InsertionMode::InTableText, token)
        } else {
            self.parse_error(Borrowed("unexpected-characters-in-table"));
            self.foster_parent_in_body(token)
        }
    }

    // https://html.spec.whatwg.org/multipage/#reset-the-insertion-mode-appropriately
    fn reset_insertion_mode(&self) -> InsertionMode {
        for (i, mut node) in self.open_elems.iter().enumerate().rev() {
            let last = i == 0usize;
            if let (true, Some(ctx)) = (last, self.context_elem.as_ref()) {
                node = ctx;
            }
            let name = match node.elem_name() {
                Some(name) if name.ns == Namespace::Html => name,
                _ => continue,
            };
            match &*name.local {
                "select" => {
                    for ancestor in self.open_elems[0..i].iter().rev() {
                        if ancestor.is_element(Namespace::Html, "template") {
                            return InsertionMode::InSelect;
                        } else if ancestor.is_element(Namespace::Html, "table") {
                            return InsertionMode::InSelectInTable;
                        }
                    }
                    return InsertionMode::InSelect;
                },
                "td" | "th" => {
                    if !last {
                        return InsertionMode::InCell;
                    }
                },
                "tr" => return InsertionMode::InRow,
                "tbody" | "thead" | "tfoot" => return InsertionMode::InTableBody,
                "caption" => return InsertionMode::InCaption,
                "colgroup" => return InsertionMode::InColumnGroup,
                "table" => return InsertionMode::InTable,
                "template" => return *self.template_modes.last().unwrap(),
                "head" => {
                    if !last {
                        return InsertionMode::InHead;
                    }
                },
                "body" => return InsertionMode::InBody,
                "frameset" => return InsertionMode::InFrameset,
                "html" => match self.head_elem {
                    None => return InsertionMode::BeforeHead,
                    Some(_) => return InsertionMode::AfterHead,
                },

                _ => (),
            }
        }
        InsertionMode::InBody
    }

    fn close_the_cell(&mut self) {
        self.generate_implied_end_tags(cursory_implied_end);
        if self.pop_until(td_th) != 1 {
            self.parse_error(Borrowed("unexpected-cell-end-tag"));
        }
        self.clear_active_formatting_to_marker();
    }

    fn append_text(&mut self, text: StrTendril) -> ProcessResult {
        self.insert_appropriately(AppendText(text), None);
        ProcessResult::Done
    }

    fn append_comment(&mut self, text: StrTendril) -> ProcessResult {
        let comment = Node::new(NodeData::Comment { contents: text });
        self.insert_appropriately(AppendNode(comment), None);
        ProcessResult::Done
    }

    fn append_comment_to_doc(&mut self, text: StrTendril) -> ProcessResult {
        let comment = Node::new(NodeData::Comment { contents: text });
        dom::append(&self.doc_handle, AppendNode(comment));
        ProcessResult::Done
    }

    fn append_comment_to_html(&mut self, text: StrTendril) -> ProcessResult {
        let target = self.html_elem();
        let comment = Node::new(NodeData::Comment { contents: text });
        dom::append(&target, AppendNode(comment));
        ProcessResult::Done
    }

    //§ creating-and-inserting-nodes
    fn create_root(&mut self, attrs: Vec<Attribute>) {
        let elem = create_element(
            QualName::new(Namespace::Html, LocalName::from("html")),
            attrs,
        );
        self.push(&elem);
        dom::append(&self.doc_handle, AppendNode(elem));
    }

    // https://html.spec.whatwg.org/multipage/#create-an-element-for-the-token
    fn insert_element(
        &mut self,
        push: PushFlag,
        ns: Namespace,
        name: LocalName,
        attrs: Vec<Attribute>,
    ) -> Handle {
        let qname = QualName::new(ns, name);
        let elem = create_element(qname, attrs);

        let insertion_point = self.appropriate_place_for_insertion(None);
        self.insert_at(insertion_point, AppendNode(elem.clone()));

        match push {
            PushFlag::Push => self.push(&elem),
            PushFlag::NoPush => (),
        }
        elem
    }

    fn insert_element_for(&mut self, tag: Tag) -> Handle {
        self.insert_element(PushFlag::Push, Namespace::Html, tag.name, tag.attrs)
    }

    fn insert_and_pop_element_for(&mut self, tag: Tag) -> Handle {
        self.insert_element(PushFlag::NoPush, Namespace::Html, tag.name, tag.attrs)
    }

    fn insert_phantom(&mut self, name: &str) -> Handle {
        self.insert_element(PushFlag::Push, Namespace::Html, LocalName::from(name), vec![])
    }
    //§ END

    fn create_formatting_element_for(&mut self, tag: Tag) -> Handle {
        // The Noah's Ark clause: at most three entries with the same name
        // and attribute set (set-wise, not order-sensitive) between the end
        // of the list and the last marker.
        let mut first_match = None;
        let mut matches = 0usize;
        for (i, _, old_tag) in self.active_formatting_end_to_marker() {
            if tag.equiv_modulo_attr_order(old_tag) {
                first_match = Some(i);
                matches += 1;
            }
        }

        if matches >= 3 {
            self.active_formatting
                .remove(first_match.expect("matches with no index"));
        }

        let elem = self.insert_element(
            PushFlag::Push,
            Namespace::Html,
            tag.name.clone(),
            tag.attrs.clone(),
        );
        self.active_formatting
            .push(FormatEntry::Element(elem.clone(), tag));
        elem
    }

    fn clear_active_formatting_to_marker(&mut self) {
        loop {
            match self.active_formatting.pop() {
                None | Some(FormatEntry::Marker) => break,
                _ => (),
            }
        }
    }

    fn process_end_tag_in_body(&mut self, tag: Tag) {
        // Look back for a matching open element.
        let mut match_idx = None;
        for (i, elem) in self.open_elems.iter().enumerate().rev() {
            if elem.is_element(Namespace::Html, &tag.name) {
                match_idx = Some(i);
                break;
            }

            if self.elem_in(elem, special_tag) {
                self.parse_error(Borrowed("unexpected-end-tag"));
                return;
            }
        }

        let Some(match_idx) = match_idx else {
            // I believe this is impossible, because the root
            // <html> element is in special_tag.
            self.unexpected(&tag);
            return;
        };

        self.generate_implied_end_except(tag.name.clone());

        if match_idx != self.open_elems.len() - 1 {
            // mis-nested tags
            self.unexpected(&tag);
        }
        self.open_elems.truncate(match_idx);
    }

    fn handle_misnested_a_tags(&mut self, tag: &Tag) {
        let Some(node) = self
            .active_formatting_end_to_marker()
            .find(|&(_, n, _)| n.is_element(Namespace::Html, "a"))
            .map(|(_, n, _)| n.clone())
        else {
            return;
        };

        self.unexpected(tag);
        self.adoption_agency(LocalName::from("a"));
        if let Some(index) = self.position_in_active_formatting(&node) {
            self.active_formatting.remove(index);
        }
        self.remove_from_stack(&node);
    }

    //§ tree-construction
    fn is_foreign(&self, token: &Token) -> bool {
        if let Token::Eof = *token {
            return false;
        }

        if self.open_elems.is_empty() {
            return false;
        }

        let current = self.adjusted_current_node();
        let Some(name) = current.elem_name() else {
            return false;
        };
        if name.ns == Namespace::Html {
            return false;
        }

        if mathml_text_integration_point(name) {
            match *token {
                Token::Characters(..) | Token::NullCharacter => return false,
                Token::Tag(Tag {
                    kind: StartTag,
                    ref name,
                    ..
                }) if !matches!(&**name, "mglyph" | "malignmark") => {
                    return false;
                },
                _ => (),
            }
        }

        if svg_html_integration_point(name) {
            match *token {
                Token::Characters(..) | Token::NullCharacter => return false,
                Token::Tag(Tag { kind: StartTag, .. }) => return false,
                _ => (),
            }
        }

        if name.is(Namespace::MathMl, "annotation-xml") {
            match *token {
                Token::Tag(Tag {
                    kind: StartTag,
                    ref name,
                    ..
                }) if &**name == "svg" => return false,
                Token::Characters(..)
                | Token::NullCharacter
                | Token::Tag(Tag { kind: StartTag, .. }) => {
                    return !matches!(
                        current.data,
                        NodeData::Element {
                            mathml_annotation_xml_integration_point: true,
                            ..
                        }
                    );
                },
                _ => {},
            };
        }

        true
    }
    //§ END

    fn enter_foreign(&mut self, mut tag: Tag, ns: Namespace) -> ProcessResult {
        match ns {
            Namespace::MathMl => self.adjust_mathml_attributes(&mut tag),
            Namespace::Svg => self.adjust_svg_attributes(&mut tag),
            _ => (),
        }
        self.adjust_foreign_attributes(&mut tag);

        if tag.self_closing {
            self.insert_element(PushFlag::NoPush, ns, tag.name, tag.attrs);
            ProcessResult::DoneAckSelfClosing
        } else {
            self.insert_element(PushFlag::Push, ns, tag.name, tag.attrs);
            ProcessResult::Done
        }
    }

    fn adjust_svg_tag_name(&self, tag: &mut Tag) {
        if let Some(&adjusted) = SVG_TAG_ADJUSTMENTS.get(&*tag.name) {
            tag.name = LocalName::from(adjusted);
        }
    }

    fn adjust_svg_attributes(&self, tag: &mut Tag) {
        for attr in &mut tag.attrs {
            if let Some(&adjusted) = SVG_ATTR_ADJUSTMENTS.get(&*attr.name.local) {
                attr.name.local = LocalName::from(adjusted);
            }
        }
    }

    fn adjust_mathml_attributes(&self, tag: &mut Tag) {
        for attr in &mut tag.attrs {
            if let Some(&adjusted) = MATHML_ATTR_ADJUSTMENTS.get(&*attr.name.local) {
                attr.name.local = LocalName::from(adjusted);
            }
        }
    }

    fn adjust_foreign_attributes(&self, tag: &mut Tag) {
        for attr in &mut tag.attrs {
            if let Some(&(prefix, ns, local)) = FOREIGN_ATTR_ADJUSTMENTS.get(&*attr.name.local) {
                attr.name = QualName {
                    prefix: prefix.map(Prefix::from),
                    ns,
                    local: LocalName::from(local),
                };
            }
        }
    }

    fn foreign_start_tag(&mut self, mut tag: Tag) -> ProcessResult {
        let current_ns = self
            .adjusted_current_node()
            .elem_name()
            .expect("adjusted current node is not an element")
            .ns;
        match current_ns {
            Namespace::MathMl => self.adjust_mathml_attributes(&mut tag),
            Namespace::Svg => {
                self.adjust_svg_tag_name(&mut tag);
                self.adjust_svg_attributes(&mut tag);
            },
            _ => (),
        }
        self.adjust_foreign_attributes(&mut tag);
        if tag.self_closing {
            self.insert_element(PushFlag::NoPush, current_ns, tag.name, tag.attrs);
            ProcessResult::DoneAckSelfClosing
        } else {
            self.insert_element(PushFlag::Push, current_ns, tag.name, tag.attrs);
            ProcessResult::Done
        }
    }

    fn unexpected_start_tag_in_foreign_content(&mut self, tag: Tag) -> ProcessResult {
        self.unexpected(&tag);
        while !self.current_node_in(|name| {
            name.ns == Namespace::Html
                || mathml_text_integration_point(name)
                || svg_html_integration_point(name)
        }) {
            self.pop();
        }
        self.step(self.mode, Token::Tag(tag))
    }
}

pub(crate) enum PushFlag {
    Push,
    NoPush,
}

enum Bookmark {
    Replace(Handle),
    InsertAfter(Handle),
}
