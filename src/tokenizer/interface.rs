// Copyright 2025-2026 The parse5ever Project Developers. See the
// COPYRIGHT file at the top-level directory of this distribution.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! The token types emitted by the tokenizer and the sink trait that
//! receives them.

use std::borrow::Cow;

use tendril::StrTendril;

use crate::interface::{Attribute, LocalName};
use crate::tokenizer::states;

pub use self::TagKind::{EndTag, StartTag};
pub use self::Token::{CharacterTokens, CommentToken, DoctypeToken, TagToken};
pub use self::Token::{EOFToken, NullCharacterToken, ParseError};

/// A `DOCTYPE` token.
///
/// A missing name or identifier is distinct from an empty one, hence the
/// `Option`s.
#[derive(PartialEq, Eq, Clone, Debug, Default)]
pub struct Doctype {
    pub name: Option<StrTendril>,
    pub public_id: Option<StrTendril>,
    pub system_id: Option<StrTendril>,
    pub force_quirks: bool,
}

#[derive(PartialEq, Eq, Hash, Copy, Clone, Debug)]
pub enum TagKind {
    StartTag,
    EndTag,
}

/// A tag token.
#[derive(PartialEq, Eq, Clone, Debug)]
pub struct Tag {
    pub kind: TagKind,
    pub name: LocalName,
    pub self_closing: bool,
    pub attrs: Vec<Attribute>,
}

impl Tag {
    /// Are the tags equivalent when we don't care about attribute order?
    /// Also ignores the self-closing flag.
    pub fn equiv_modulo_attr_order(&self, other: &Tag) -> bool {
        if (self.kind != other.kind) || (self.name != other.name) {
            return false;
        }

        self.attrs.len() == other.attrs.len()
            && self
                .attrs
                .iter()
                .all(|attr| other.attrs.contains(attr))
    }
}

#[derive(PartialEq, Eq, Debug)]
pub enum Token {
    DoctypeToken(Doctype),
    TagToken(Tag),
    CommentToken(StrTendril),
    CharacterTokens(StrTendril),
    NullCharacterToken,
    EOFToken,
    /// A parse error, identified by its code from the WHATWG error list.
    ParseError(Cow<'static, str>),
}

/// What the sink wants the tokenizer to do after processing a token.
///
/// The tree construction stage switches the tokenizer into the raw-data
/// states for rawtext/rcdata/script/plaintext content; it cannot call back
/// into the tokenizer, so the switch rides on the return value.
#[derive(Debug, PartialEq)]
#[must_use]
pub enum TokenSinkResult {
    Continue,
    Plaintext,
    RawData(states::RawKind),
}

/// Types which can receive tokens from the tokenizer.
pub trait TokenSink {
    /// Process a token.
    fn process_token(&mut self, token: Token) -> TokenSinkResult;

    /// Signal to the sink that tokenization has reached the end.
    fn end(&mut self) {}

    /// Used in the markup declaration open state to decide whether `[CDATA[`
    /// opens a real CDATA section. By default this returns false and CDATA
    /// sections degrade to bogus comments.
    /// <https://html.spec.whatwg.org/multipage/#markup-declaration-open-state>
    fn adjusted_current_node_present_and_not_in_html_namespace(&self) -> bool {
        false
    }
}
