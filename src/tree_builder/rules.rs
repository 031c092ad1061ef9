// Copyright 2025-2026 The parse5ever Project Developers. See the
// COPYRIGHT file at the top-level directory of this distribution.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

// The tree builder rules, as a single, enormous nested match expression.
//
// Where several token patterns share one mode's "anything else" rule, the
// specific arms rebind the token and fall through to the shared tail below
// the match.

use std::borrow::Cow::Borrowed;

use tendril::{SliceExt, StrTendril};

use super::data::*;
use super::types::*;
use super::TreeBuilder;

use crate::dom;
use crate::interface::{LocalName, Namespace, QualName, QuirksMode};
use crate::tokenizer::states::{Rawtext, Rcdata, ScriptData};
use crate::tokenizer::{EndTag, StartTag, Tag};

fn any_not_whitespace(x: &StrTendril) -> bool {
    x.chars().any(|c| !c.is_ascii_whitespace())
}

impl TreeBuilder {
    pub(crate) fn step(&mut self, mode: InsertionMode, token: Token) -> ProcessResult {
        log::debug!("processing {token:?} in insertion mode {mode:?}");

        match mode {
            //§ the-initial-insertion-mode
            InsertionMode::Initial => match token {
                Token::Characters(SplitStatus::NotSplit, text) => {
                    ProcessResult::SplitWhitespace(text)
                },
                Token::Characters(SplitStatus::Whitespace, _) => ProcessResult::Done,
                Token::Comment(text) => self.append_comment_to_doc(text),
                token => {
                    self.unexpected(&token);
                    self.set_quirks_mode(QuirksMode::Quirks);
                    ProcessResult::Reprocess(InsertionMode::BeforeHtml, token)
                },
            },

            //§ the-before-html-insertion-mode
            InsertionMode::BeforeHtml => {
                let token = match token {
                    Token::Characters(SplitStatus::NotSplit, text) => {
                        return ProcessResult::SplitWhitespace(text);
                    },
                    Token::Characters(SplitStatus::Whitespace, _) => return ProcessResult::Done,
                    Token::Comment(text) => return self.append_comment_to_doc(text),

                    Token::Tag(tag) => {
                        let name = tag.name.clone();
                        match (tag.kind, &*name) {
                            (StartTag, "html") => {
                                self.create_root(tag.attrs);
                                self.mode = InsertionMode::BeforeHead;
                                return ProcessResult::Done;
                            },

                            // Act as "anything else".
                            (EndTag, "head" | "body" | "html" | "br") => Token::Tag(tag),

                            (EndTag, _) => return self.unexpected(&tag),

                            _ => Token::Tag(tag),
                        }
                    },

                    token => token,
                };

                self.create_root(vec![]);
                ProcessResult::Reprocess(InsertionMode::BeforeHead, token)
            },

            //§ the-before-head-insertion-mode
            InsertionMode::BeforeHead => {
                let token = match token {
                    Token::Characters(SplitStatus::NotSplit, text) => {
                        return ProcessResult::SplitWhitespace(text);
                    },
                    Token::Characters(SplitStatus::Whitespace, _) => return ProcessResult::Done,
                    Token::Comment(text) => return self.append_comment(text),

                    Token::Tag(tag) => {
                        let name = tag.name.clone();
                        match (tag.kind, &*name) {
                            (StartTag, "html") => {
                                return self.step(InsertionMode::InBody, Token::Tag(tag));
                            },

                            (StartTag, "head") => {
                                self.head_elem = Some(self.insert_element_for(tag));
                                self.mode = InsertionMode::InHead;
                                return ProcessResult::Done;
                            },

                            // Act as "anything else".
                            (EndTag, "head" | "body" | "html" | "br") => Token::Tag(tag),

                            (EndTag, _) => return self.unexpected(&tag),

                            _ => Token::Tag(tag),
                        }
                    },

                    token => token,
                };

                self.head_elem = Some(self.insert_phantom("head"));
                ProcessResult::Reprocess(InsertionMode::InHead, token)
            },

            //§ parsing-main-inhead
            InsertionMode::InHead => {
                let token = match token {
                    Token::Characters(SplitStatus::NotSplit, text) => {
                        return ProcessResult::SplitWhitespace(text);
                    },
                    Token::Characters(SplitStatus::Whitespace, text) => {
                        return self.append_text(text);
                    },
                    Token::Comment(text) => return self.append_comment(text),

                    Token::Tag(tag) => {
                        let name = tag.name.clone();
                        match (tag.kind, &*name) {
                            (StartTag, "html") => {
                                return self.step(InsertionMode::InBody, Token::Tag(tag));
                            },

                            (StartTag, "base" | "basefont" | "bgsound" | "link" | "meta") => {
                                // FIXME: handle <meta charset=...> and
                                // <meta http-equiv="Content-Type">
                                self.insert_and_pop_element_for(tag);
                                return ProcessResult::DoneAckSelfClosing;
                            },

                            (StartTag, "title") => return self.parse_raw_data(tag, Rcdata),

                            (StartTag, "noframes" | "style" | "noscript") => {
                                if (!self.opts.scripting_enabled) && (&*name == "noscript") {
                                    self.insert_element_for(tag);
                                    self.mode = InsertionMode::InHeadNoscript;
                                    return ProcessResult::Done;
                                }
                                return self.parse_raw_data(tag, Rawtext);
                            },

                            (StartTag, "script") => {
                                return self.parse_raw_data(tag, ScriptData);
                            },

                            (EndTag, "head") => {
                                self.pop();
                                self.mode = InsertionMode::AfterHead;
                                return ProcessResult::Done;
                            },

                            // Act as "anything else".
                            (EndTag, "body" | "html" | "br") => Token::Tag(tag),

                            (StartTag, "template") => {
                                self.active_formatting.push(FormatEntry::Marker);
                                self.frameset_ok = false;
                                self.mode = InsertionMode::InTemplate;
                                self.template_modes.push(InsertionMode::InTemplate);
                                self.insert_element_for(tag);
                                return ProcessResult::Done;
                            },

                            (EndTag, "template") => {
                                if !self.in_html_elem_named("template") {
                                    return self.unexpected(&tag);
                                }
                                self.generate_implied_end_tags(thorough_implied_end);
                                self.expect_to_close("template");
                                self.clear_active_formatting_to_marker();
                                self.template_modes.pop();
                                self.mode = self.reset_insertion_mode();
                                return ProcessResult::Done;
                            },

                            (StartTag, "head") => return self.unexpected(&tag),
                            (EndTag, _) => return self.unexpected(&tag),

                            _ => Token::Tag(tag),
                        }
                    },

                    token => token,
                };

                self.pop();
                ProcessResult::Reprocess(InsertionMode::AfterHead, token)
            },

            //§ parsing-main-inheadnoscript
            InsertionMode::InHeadNoscript => {
                let token = match token {
                    Token::Characters(SplitStatus::NotSplit, text) => {
                        return ProcessResult::SplitWhitespace(text);
                    },
                    Token::Characters(SplitStatus::Whitespace, _) => {
                        return self.step(InsertionMode::InHead, token);
                    },
                    Token::Comment(_) => return self.step(InsertionMode::InHead, token),

                    Token::Tag(tag) => {
                        let name = tag.name.clone();
                        match (tag.kind, &*name) {
                            (StartTag, "html") => {
                                return self.step(InsertionMode::InBody, Token::Tag(tag));
                            },

                            (EndTag, "noscript") => {
                                self.pop();
                                self.mode = InsertionMode::InHead;
                                return ProcessResult::Done;
                            },

                            (
                                StartTag,
                                "basefont" | "bgsound" | "link" | "meta" | "noframes" | "style",
                            ) => return self.step(InsertionMode::InHead, Token::Tag(tag)),

                            // Act as "anything else".
                            (EndTag, "br") => Token::Tag(tag),

                            (StartTag, "head" | "noscript") => return self.unexpected(&tag),
                            (EndTag, _) => return self.unexpected(&tag),

                            _ => Token::Tag(tag),
                        }
                    },

                    token => token,
                };

                self.unexpected(&token);
                self.pop();
                ProcessResult::Reprocess(InsertionMode::InHead, token)
            },

            //§ the-after-head-insertion-mode
            InsertionMode::AfterHead => {
                let token = match token {
                    Token::Characters(SplitStatus::NotSplit, text) => {
                        return ProcessResult::SplitWhitespace(text);
                    },
                    Token::Characters(SplitStatus::Whitespace, text) => {
                        return self.append_text(text);
                    },
                    Token::Comment(text) => return self.append_comment(text),

                    Token::Tag(tag) => {
                        let name = tag.name.clone();
                        match (tag.kind, &*name) {
                            (StartTag, "html") => {
                                return self.step(InsertionMode::InBody, Token::Tag(tag));
                            },

                            (StartTag, "body") => {
                                self.insert_element_for(tag);
                                self.frameset_ok = false;
                                self.mode = InsertionMode::InBody;
                                return ProcessResult::Done;
                            },

                            (StartTag, "frameset") => {
                                self.insert_element_for(tag);
                                self.mode = InsertionMode::InFrameset;
                                return ProcessResult::Done;
                            },

                            (
                                StartTag,
                                "base" | "basefont" | "bgsound" | "link" | "meta" | "noframes"
                                | "script" | "style" | "template" | "title",
                            ) => {
                                self.unexpected(&tag);
                                let head = self
                                    .head_elem
                                    .as_ref()
                                    .expect("no head element")
                                    .clone();
                                self.push(&head);
                                let result = self.step(InsertionMode::InHead, Token::Tag(tag));
                                self.remove_from_stack(&head);
                                return result;
                            },

                            (EndTag, "template") => {
                                return self.step(InsertionMode::InHead, Token::Tag(tag));
                            },

                            // Act as "anything else".
                            (EndTag, "body" | "html" | "br") => Token::Tag(tag),

                            (StartTag, "head") => return self.unexpected(&tag),
                            (EndTag, _) => return self.unexpected(&tag),

                            _ => Token::Tag(tag),
                        }
                    },

                    token => token,
                };

                self.insert_phantom("body");
                ProcessResult::Reprocess(InsertionMode::InBody, token)
            },

            //§ parsing-main-inbody
            InsertionMode::InBody => match token {
                Token::NullCharacter => self.unexpected(&token),

                Token::Characters(_, text) => {
                    self.reconstruct_active_formatting_elements();
                    if any_not_whitespace(&text) {
                        self.frameset_ok = false;
                    }
                    self.append_text(text)
                },

                Token::Comment(text) => self.append_comment(text),

                Token::Eof => {
                    if !self.template_modes.is_empty() {
                        self.step(InsertionMode::InTemplate, token)
                    } else {
                        self.check_body_end();
                        self.stop_parsing()
                    }
                },

                Token::Tag(tag) => {
                    let name = tag.name.clone();
                    match (tag.kind, &*name) {
                        (StartTag, "html") => {
                            self.unexpected(&tag);
                            if !self.in_html_elem_named("template") {
                                let top = self.html_elem();
                                dom::add_attrs_if_missing(&top, tag.attrs);
                            }
                            ProcessResult::Done
                        },

                        (
                            StartTag,
                            "base" | "basefont" | "bgsound" | "link" | "meta" | "noframes"
                            | "script" | "style" | "template" | "title",
                        )
                        | (EndTag, "template") => self.step(InsertionMode::InHead, Token::Tag(tag)),

                        (StartTag, "body") => {
                            self.unexpected(&tag);
                            match self.body_elem() {
                                Some(ref node)
                                    if self.open_elems.len() != 1
                                        && !self.in_html_elem_named("template") =>
                                {
                                    self.frameset_ok = false;
                                    dom::add_attrs_if_missing(node, tag.attrs);
                                },
                                _ => {},
                            }
                            ProcessResult::Done
                        },

                        (StartTag, "frameset") => {
                            self.unexpected(&tag);
                            if !self.frameset_ok {
                                return ProcessResult::Done;
                            }

                            let Some(body) = self.body_elem() else {
                                return ProcessResult::Done;
                            };
                            dom::remove_from_parent(&body);

                            self.open_elems.truncate(1);
                            self.insert_element_for(tag);
                            self.mode = InsertionMode::InFrameset;
                            ProcessResult::Done
                        },

                        (EndTag, "body") => {
                            if self.in_scope_named(default_scope, "body") {
                                self.check_body_end();
                                self.mode = InsertionMode::AfterBody;
                            } else {
                                self.parse_error(Borrowed("unexpected-end-tag"));
                            }
                            ProcessResult::Done
                        },

                        (EndTag, "html") => {
                            if self.in_scope_named(default_scope, "body") {
                                self.check_body_end();
                                ProcessResult::Reprocess(InsertionMode::AfterBody, Token::Tag(tag))
                            } else {
                                self.parse_error(Borrowed("unexpected-end-tag"));
                                ProcessResult::Done
                            }
                        },

                        (
                            StartTag,
                            "address" | "article" | "aside" | "blockquote" | "center" | "details"
                            | "dialog" | "dir" | "div" | "dl" | "fieldset" | "figcaption"
                            | "figure" | "footer" | "header" | "hgroup" | "main" | "menu" | "nav"
                            | "ol" | "p" | "search" | "section" | "summary" | "ul",
                        ) => {
                            self.close_p_element_in_button_scope();
                            self.insert_element_for(tag);
                            ProcessResult::Done
                        },

                        (StartTag, "h1" | "h2" | "h3" | "h4" | "h5" | "h6") => {
                            self.close_p_element_in_button_scope();
                            if self.current_node_in(heading_tag) {
                                self.parse_error(Borrowed("nested-heading-tags"));
                                self.pop();
                            }
                            self.insert_element_for(tag);
                            ProcessResult::Done
                        },

                        (StartTag, "pre" | "listing") => {
                            self.close_p_element_in_button_scope();
                            self.insert_element_for(tag);
                            self.ignore_lf = true;
                            self.frameset_ok = false;
                            ProcessResult::Done
                        },

                        (StartTag, "form") => {
                            if self.form_elem.is_some() && !self.in_html_elem_named("template") {
                                self.parse_error(Borrowed("nested-forms"));
                            } else {
                                self.close_p_element_in_button_scope();
                                let elem = self.insert_element_for(tag);
                                if !self.in_html_elem_named("template") {
                                    self.form_elem = Some(elem);
                                }
                            }
                            ProcessResult::Done
                        },

                        (StartTag, "li" | "dd" | "dt") => {
                            fn close_list(name: &QualName) -> bool {
                                name.is(Namespace::Html, "li")
                            }
                            fn close_defn(name: &QualName) -> bool {
                                name.is(Namespace::Html, "dd") || name.is(Namespace::Html, "dt")
                            }
                            fn extra_special(name: &QualName) -> bool {
                                special_tag(name)
                                    && !(name.ns == Namespace::Html
                                        && matches!(&*name.local, "address" | "div" | "p"))
                            }

                            let list = &*name == "li";

                            self.frameset_ok = false;

                            let mut to_close = None;
                            for node in self.open_elems.iter().rev() {
                                let Some(node_name) = node.elem_name() else {
                                    continue;
                                };
                                let can_close = if list {
                                    close_list(node_name)
                                } else {
                                    close_defn(node_name)
                                };
                                if can_close {
                                    to_close = Some(node_name.local.clone());
                                    break;
                                }
                                if extra_special(node_name) {
                                    break;
                                }
                            }

                            if let Some(name) = to_close {
                                self.generate_implied_end_except(name.clone());
                                self.expect_to_close(&name);
                            }

                            self.close_p_element_in_button_scope();
                            self.insert_element_for(tag);
                            ProcessResult::Done
                        },

                        (StartTag, "plaintext") => {
                            self.close_p_element_in_button_scope();
                            self.insert_element_for(tag);
                            ProcessResult::ToPlaintext
                        },

                        (StartTag, "button") => {
                            if self.in_scope_named(default_scope, "button") {
                                self.parse_error(Borrowed("nested-buttons"));
                                self.generate_implied_end_tags(cursory_implied_end);
                                self.pop_until_named("button");
                            }
                            self.reconstruct_active_formatting_elements();
                            self.insert_element_for(tag);
                            self.frameset_ok = false;
                            ProcessResult::Done
                        },

                        (
                            EndTag,
                            "address" | "article" | "aside" | "blockquote" | "button" | "center"
                            | "details" | "dialog" | "dir" | "div" | "dl" | "fieldset"
                            | "figcaption" | "figure" | "footer" | "header" | "hgroup" | "listing"
                            | "main" | "menu" | "nav" | "ol" | "pre" | "search" | "section"
                            | "summary" | "ul",
                        ) => {
                            if !self.in_scope_named(default_scope, &name) {
                                self.unexpected(&tag);
                            } else {
                                self.generate_implied_end_tags(cursory_implied_end);
                                self.expect_to_close(&name);
                            }
                            ProcessResult::Done
                        },

                        (EndTag, "form") => {
                            if !self.in_html_elem_named("template") {
                                let Some(node) = self.form_elem.take() else {
                                    self.parse_error(Borrowed("unexpected-end-tag"));
                                    return ProcessResult::Done;
                                };
                                if !self.in_scope(default_scope, |n| dom::same_node(&node, n)) {
                                    self.parse_error(Borrowed("unexpected-end-tag"));
                                    return ProcessResult::Done;
                                }
                                self.generate_implied_end_tags(cursory_implied_end);
                                let current = self.current_node();
                                self.remove_from_stack(&node);
                                if !dom::same_node(&current, &node) {
                                    self.parse_error(Borrowed("end-tag-too-early"));
                                }
                            } else {
                                if !self.in_scope_named(default_scope, "form") {
                                    self.parse_error(Borrowed("unexpected-end-tag"));
                                    return ProcessResult::Done;
                                }
                                self.generate_implied_end_tags(cursory_implied_end);
                                if !self.current_node_named("form") {
                                    self.parse_error(Borrowed("end-tag-too-early"));
                                }
                                self.pop_until_named("form");
                            }
                            ProcessResult::Done
                        },

                        (EndTag, "p") => {
                            if !self.in_scope_named(button_scope, "p") {
                                self.parse_error(Borrowed("unexpected-end-tag"));
                                self.insert_phantom("p");
                            }
                            self.close_p_element();
                            ProcessResult::Done
                        },

                        (EndTag, "li" | "dd" | "dt") => {
                            let in_scope = if &*name == "li" {
                                self.in_scope_named(list_item_scope, &name)
                            } else {
                                self.in_scope_named(default_scope, &name)
                            };
                            if in_scope {
                                self.generate_implied_end_except(name.clone());
                                self.expect_to_close(&name);
                            } else {
                                self.parse_error(Borrowed("unexpected-end-tag"));
                            }
                            ProcessResult::Done
                        },

                        (EndTag, "h1" | "h2" | "h3" | "h4" | "h5" | "h6") => {
                            if self.in_scope(default_scope, |n| self.elem_in(n, heading_tag)) {
                                self.generate_implied_end_tags(cursory_implied_end);
                                if !self.current_node_named(&name) {
                                    self.parse_error(Borrowed("unexpected-end-tag"));
                                }
                                self.pop_until(heading_tag);
                            } else {
                                self.parse_error(Borrowed("unexpected-end-tag"));
                            }
                            ProcessResult::Done
                        },

                        (StartTag, "a") => {
                            self.handle_misnested_a_tags(&tag);
                            self.reconstruct_active_formatting_elements();
                            self.create_formatting_element_for(tag);
                            ProcessResult::Done
                        },

                        (
                            StartTag,
                            "b" | "big" | "code" | "em" | "font" | "i" | "s" | "small" | "strike"
                            | "strong" | "tt" | "u",
                        ) => {
                            self.reconstruct_active_formatting_elements();
                            self.create_formatting_element_for(tag);
                            ProcessResult::Done
                        },

                        (StartTag, "nobr") => {
                            self.reconstruct_active_formatting_elements();
                            if self.in_scope_named(default_scope, "nobr") {
                                self.parse_error(Borrowed("unexpected-start-tag"));
                                self.adoption_agency(LocalName::from("nobr"));
                                self.reconstruct_active_formatting_elements();
                            }
                            self.create_formatting_element_for(tag);
                            ProcessResult::Done
                        },

                        (
                            EndTag,
                            "a" | "b" | "big" | "code" | "em" | "font" | "i" | "nobr" | "s"
                            | "small" | "strike" | "strong" | "tt" | "u",
                        ) => {
                            self.adoption_agency(name);
                            ProcessResult::Done
                        },

                        (StartTag, "applet" | "marquee" | "object") => {
                            self.reconstruct_active_formatting_elements();
                            self.insert_element_for(tag);
                            self.active_formatting.push(FormatEntry::Marker);
                            self.frameset_ok = false;
                            ProcessResult::Done
                        },

                        (EndTag, "applet" | "marquee" | "object") => {
                            if !self.in_scope_named(default_scope, &name) {
                                self.unexpected(&tag);
                            } else {
                                self.generate_implied_end_tags(cursory_implied_end);
                                self.expect_to_close(&name);
                                self.clear_active_formatting_to_marker();
                            }
                            ProcessResult::Done
                        },

                        (StartTag, "table") => {
                            if self.quirks_mode != QuirksMode::Quirks {
                                self.close_p_element_in_button_scope();
                            }
                            self.insert_element_for(tag);
                            self.frameset_ok = false;
                            self.mode = InsertionMode::InTable;
                            ProcessResult::Done
                        },

                        (EndTag, "br") => {
                            self.unexpected(&tag);
                            self.step(
                                InsertionMode::InBody,
                                Token::Tag(Tag {
                                    kind: StartTag,
                                    attrs: vec![],
                                    ..tag
                                }),
                            )
                        },

                        (StartTag, "area" | "br" | "embed" | "img" | "keygen" | "wbr" | "input") => {
                            let keep_frameset_ok =
                                &*name == "input" && self.is_type_hidden(&tag);
                            self.reconstruct_active_formatting_elements();
                            self.insert_and_pop_element_for(tag);
                            if !keep_frameset_ok {
                                self.frameset_ok = false;
                            }
                            ProcessResult::DoneAckSelfClosing
                        },

                        (StartTag, "param" | "source" | "track") => {
                            self.insert_and_pop_element_for(tag);
                            ProcessResult::DoneAckSelfClosing
                        },

                        (StartTag, "hr") => {
                            self.close_p_element_in_button_scope();
                            self.insert_and_pop_element_for(tag);
                            self.frameset_ok = false;
                            ProcessResult::DoneAckSelfClosing
                        },

                        (StartTag, "image") => {
                            self.unexpected(&tag);
                            self.step(
                                InsertionMode::InBody,
                                Token::Tag(Tag {
                                    name: LocalName::from("img"),
                                    ..tag
                                }),
                            )
                        },

                        (StartTag, "textarea") => {
                            self.ignore_lf = true;
                            self.frameset_ok = false;
                            self.parse_raw_data(tag, Rcdata)
                        },

                        (StartTag, "xmp") => {
                            self.close_p_element_in_button_scope();
                            self.reconstruct_active_formatting_elements();
                            self.frameset_ok = false;
                            self.parse_raw_data(tag, Rawtext)
                        },

                        (StartTag, "iframe") => {
                            self.frameset_ok = false;
                            self.parse_raw_data(tag, Rawtext)
                        },

                        (StartTag, "noembed") => self.parse_raw_data(tag, Rawtext),

                        // <noscript> handled in wildcard case below

                        (StartTag, "select") => {
                            self.reconstruct_active_formatting_elements();
                            self.insert_element_for(tag);
                            self.frameset_ok = false;
                            // NB: mode == InBody but possibly self.mode != mode, if
                            // we're processing "as in the rules for InBody".
                            self.mode = match self.mode {
                                InsertionMode::InTable
                                | InsertionMode::InCaption
                                | InsertionMode::InTableBody
                                | InsertionMode::InRow
                                | InsertionMode::InCell => InsertionMode::InSelectInTable,
                                _ => InsertionMode::InSelect,
                            };
                            ProcessResult::Done
                        },

                        (StartTag, "optgroup" | "option") => {
                            if self.current_node_named("option") {
                                self.pop();
                            }
                            self.reconstruct_active_formatting_elements();
                            self.insert_element_for(tag);
                            ProcessResult::Done
                        },

                        (StartTag, "rb" | "rtc") => {
                            if self.in_scope_named(default_scope, "ruby") {
                                self.generate_implied_end_tags(cursory_implied_end);
                            }
                            if !self.current_node_named("ruby") {
                                self.unexpected(&tag);
                            }
                            self.insert_element_for(tag);
                            ProcessResult::Done
                        },

                        (StartTag, "rp" | "rt") => {
                            if self.in_scope_named(default_scope, "ruby") {
                                self.generate_implied_end_except(LocalName::from("rtc"));
                            }
                            if !self.current_node_named("rtc") && !self.current_node_named("ruby")
                            {
                                self.unexpected(&tag);
                            }
                            self.insert_element_for(tag);
                            ProcessResult::Done
                        },

                        (StartTag, "math") => self.enter_foreign(tag, Namespace::MathMl),

                        (StartTag, "svg") => self.enter_foreign(tag, Namespace::Svg),

                        (
                            StartTag,
                            "caption" | "col" | "colgroup" | "frame" | "head" | "tbody" | "td"
                            | "tfoot" | "th" | "thead" | "tr",
                        ) => {
                            self.unexpected(&tag);
                            ProcessResult::Done
                        },

                        (StartTag, _) => {
                            if self.opts.scripting_enabled && &*name == "noscript" {
                                self.parse_raw_data(tag, Rawtext)
                            } else {
                                self.reconstruct_active_formatting_elements();
                                self.insert_element_for(tag);
                                ProcessResult::Done
                            }
                        },

                        (EndTag, _) => {
                            self.process_end_tag_in_body(tag);
                            ProcessResult::Done
                        },
                    }
                },
            },

            //§ parsing-main-incdata
            InsertionMode::Text => match token {
                Token::Characters(_, text) => self.append_text(text),

                Token::Eof => {
                    self.unexpected(&token);
                    self.pop();
                    ProcessResult::Reprocess(self.orig_mode.take().unwrap(), token)
                },

                Token::Tag(tag) => {
                    debug_assert!(tag.kind == EndTag);
                    self.pop();
                    self.mode = self.orig_mode.take().unwrap();
                    ProcessResult::Done
                },

                // The spec doesn't say what to do here.
                // Other tokens are impossible?
                _ => panic!("impossible case in Text mode"),
            },

            //§ parsing-main-intable
            InsertionMode::InTable => match token {
                Token::NullCharacter | Token::Characters(..) => self.process_chars_in_table(token),

                Token::Comment(text) => self.append_comment(text),

                Token::Eof => self.step(InsertionMode::InBody, token),

                Token::Tag(tag) => {
                    let name = tag.name.clone();
                    match (tag.kind, &*name) {
                        (StartTag, "caption") => {
                            self.pop_until_current(table_scope);
                            self.active_formatting.push(FormatEntry::Marker);
                            self.insert_element_for(tag);
                            self.mode = InsertionMode::InCaption;
                            ProcessResult::Done
                        },

                        (StartTag, "colgroup") => {
                            self.pop_until_current(table_scope);
                            self.insert_element_for(tag);
                            self.mode = InsertionMode::InColumnGroup;
                            ProcessResult::Done
                        },

                        (StartTag, "col") => {
                            self.pop_until_current(table_scope);
                            self.insert_phantom("colgroup");
                            ProcessResult::Reprocess(InsertionMode::InColumnGroup, Token::Tag(tag))
                        },

                        (StartTag, "tbody" | "tfoot" | "thead") => {
                            self.pop_until_current(table_scope);
                            self.insert_element_for(tag);
                            self.mode = InsertionMode::InTableBody;
                            ProcessResult::Done
                        },

                        (StartTag, "td" | "th" | "tr") => {
                            self.pop_until_current(table_scope);
                            self.insert_phantom("tbody");
                            ProcessResult::Reprocess(InsertionMode::InTableBody, Token::Tag(tag))
                        },

                        (StartTag, "table") => {
                            self.unexpected(&tag);
                            if self.in_scope_named(table_scope, "table") {
                                self.pop_until_named("table");
                                ProcessResult::Reprocess(
                                    self.reset_insertion_mode(),
                                    Token::Tag(tag),
                                )
                            } else {
                                ProcessResult::Done
                            }
                        },

                        (EndTag, "table") => {
                            if self.in_scope_named(table_scope, "table") {
                                self.pop_until_named("table");
                                self.mode = self.reset_insertion_mode();
                            } else {
                                self.unexpected(&tag);
                            }
                            ProcessResult::Done
                        },

                        (
                            EndTag,
                            "body" | "caption" | "col" | "colgroup" | "html" | "tbody" | "td"
                            | "tfoot" | "th" | "thead" | "tr",
                        ) => self.unexpected(&tag),

                        (StartTag, "style" | "script" | "template") | (EndTag, "template") => {
                            self.step(InsertionMode::InHead, Token::Tag(tag))
                        },

                        (StartTag, "input") => {
                            self.unexpected(&tag);
                            if self.is_type_hidden(&tag) {
                                self.insert_and_pop_element_for(tag);
                                ProcessResult::DoneAckSelfClosing
                            } else {
                                self.foster_parent_in_body(Token::Tag(tag))
                            }
                        },

                        (StartTag, "form") => {
                            self.unexpected(&tag);
                            if !self.in_html_elem_named("template") && self.form_elem.is_none() {
                                self.form_elem = Some(self.insert_and_pop_element_for(tag));
                            }
                            ProcessResult::Done
                        },

                        _ => {
                            self.unexpected(&tag);
                            self.foster_parent_in_body(Token::Tag(tag))
                        },
                    }
                },
            },

            //§ parsing-main-intabletext
            InsertionMode::InTableText => match token {
                Token::NullCharacter => self.unexpected(&token),

                Token::Characters(split, text) => {
                    self.pending_table_text.push((split, text));
                    ProcessResult::Done
                },

                token => {
                    let pending = std::mem::take(&mut self.pending_table_text);
                    let contains_nonspace = pending.iter().any(|&(split, ref text)| match split {
                        SplitStatus::Whitespace => false,
                        SplitStatus::NotWhitespace => true,
                        SplitStatus::NotSplit => any_not_whitespace(text),
                    });

                    if contains_nonspace {
                        self.parse_error(Borrowed("foster-parenting-character-in-table"));
                        for (split, text) in pending {
                            let result =
                                self.foster_parent_in_body(Token::Characters(split, text));
                            debug_assert!(matches!(result, ProcessResult::Done));
                        }
                    } else {
                        for (_, text) in pending {
                            self.append_text(text);
                        }
                    }

                    ProcessResult::Reprocess(self.orig_mode.take().unwrap(), token)
                },
            },

            //§ parsing-main-incaption
            InsertionMode::InCaption => match token {
                Token::Tag(tag) => {
                    let name = tag.name.clone();
                    match (tag.kind, &*name) {
                        (
                            StartTag,
                            "caption" | "col" | "colgroup" | "tbody" | "td" | "tfoot" | "th"
                            | "thead" | "tr",
                        )
                        | (EndTag, "table" | "caption") => {
                            if self.in_scope_named(table_scope, "caption") {
                                self.generate_implied_end_tags(cursory_implied_end);
                                self.expect_to_close("caption");
                                self.clear_active_formatting_to_marker();
                                match (tag.kind, &*name) {
                                    (EndTag, "caption") => {
                                        self.mode = InsertionMode::InTable;
                                        ProcessResult::Done
                                    },
                                    _ => ProcessResult::Reprocess(
                                        InsertionMode::InTable,
                                        Token::Tag(tag),
                                    ),
                                }
                            } else {
                                self.unexpected(&tag)
                            }
                        },

                        (
                            EndTag,
                            "body" | "col" | "colgroup" | "html" | "tbody" | "td" | "tfoot"
                            | "th" | "thead" | "tr",
                        ) => self.unexpected(&tag),

                        _ => self.step(InsertionMode::InBody, Token::Tag(tag)),
                    }
                },

                token => self.step(InsertionMode::InBody, token),
            },

            //§ parsing-main-incolgroup
            InsertionMode::InColumnGroup => {
                let token = match token {
                    Token::Characters(SplitStatus::NotSplit, text) => {
                        return ProcessResult::SplitWhitespace(text);
                    },
                    Token::Characters(SplitStatus::Whitespace, text) => {
                        return self.append_text(text);
                    },
                    Token::Comment(text) => return self.append_comment(text),

                    Token::Eof => return self.step(InsertionMode::InBody, token),

                    Token::Tag(tag) => {
                        let name = tag.name.clone();
                        match (tag.kind, &*name) {
                            (StartTag, "html") => {
                                return self.step(InsertionMode::InBody, Token::Tag(tag));
                            },

                            (StartTag, "col") => {
                                self.insert_and_pop_element_for(tag);
                                return ProcessResult::DoneAckSelfClosing;
                            },

                            (EndTag, "colgroup") => {
                                if self.current_node_named("colgroup") {
                                    self.pop();
                                    self.mode = InsertionMode::InTable;
                                } else {
                                    self.unexpected(&tag);
                                }
                                return ProcessResult::Done;
                            },

                            (EndTag, "col") => return self.unexpected(&tag),

                            (StartTag, "template") | (EndTag, "template") => {
                                return self.step(InsertionMode::InHead, Token::Tag(tag));
                            },

                            _ => Token::Tag(tag),
                        }
                    },

                    token => token,
                };

                if self.current_node_named("colgroup") {
                    self.pop();
                    ProcessResult::Reprocess(InsertionMode::InTable, token)
                } else {
                    self.unexpected(&token)
                }
            },

            //§ parsing-main-intbody
            InsertionMode::InTableBody => match token {
                Token::Tag(tag) => {
                    let name = tag.name.clone();
                    match (tag.kind, &*name) {
                        (StartTag, "tr") => {
                            self.pop_until_current(table_body_context);
                            self.insert_element_for(tag);
                            self.mode = InsertionMode::InRow;
                            ProcessResult::Done
                        },

                        (StartTag, "th" | "td") => {
                            self.unexpected(&tag);
                            self.pop_until_current(table_body_context);
                            self.insert_phantom("tr");
                            ProcessResult::Reprocess(InsertionMode::InRow, Token::Tag(tag))
                        },

                        (EndTag, "tbody" | "tfoot" | "thead") => {
                            if self.in_scope_named(table_scope, &name) {
                                self.pop_until_current(table_body_context);
                                self.pop();
                                self.mode = InsertionMode::InTable;
                            } else {
                                self.unexpected(&tag);
                            }
                            ProcessResult::Done
                        },

                        (StartTag, "caption" | "col" | "colgroup" | "tbody" | "tfoot" | "thead")
                        | (EndTag, "table") => {
                            fn table_outer(name: &QualName) -> bool {
                                name.ns == Namespace::Html
                                    && matches!(&*name.local, "table" | "tbody" | "tfoot")
                            }

                            if self.in_scope(table_scope, |e| self.elem_in(e, table_outer)) {
                                self.pop_until_current(table_body_context);
                                self.pop();
                                ProcessResult::Reprocess(InsertionMode::InTable, Token::Tag(tag))
                            } else {
                                self.unexpected(&tag)
                            }
                        },

                        (
                            EndTag,
                            "body" | "caption" | "col" | "colgroup" | "html" | "td" | "th" | "tr",
                        ) => self.unexpected(&tag),

                        _ => self.step(InsertionMode::InTable, Token::Tag(tag)),
                    }
                },

                token => self.step(InsertionMode::InTable, token),
            },

            //§ parsing-main-intr
            InsertionMode::InRow => match token {
                Token::Tag(tag) => {
                    let name = tag.name.clone();
                    match (tag.kind, &*name) {
                        (StartTag, "th" | "td") => {
                            self.pop_until_current(table_row_context);
                            self.insert_element_for(tag);
                            self.mode = InsertionMode::InCell;
                            self.active_formatting.push(FormatEntry::Marker);
                            ProcessResult::Done
                        },

                        (EndTag, "tr") => {
                            if self.in_scope_named(table_scope, "tr") {
                                self.pop_until_current(table_row_context);
                                let node = self.pop();
                                self.assert_named(&node, "tr");
                                self.mode = InsertionMode::InTableBody;
                            } else {
                                self.unexpected(&tag);
                            }
                            ProcessResult::Done
                        },

                        (StartTag, "caption" | "col" | "colgroup" | "tbody" | "tfoot" | "thead" | "tr")
                        | (EndTag, "table") => {
                            if self.in_scope_named(table_scope, "tr") {
                                self.pop_until_current(table_row_context);
                                let node = self.pop();
                                self.assert_named(&node, "tr");
                                ProcessResult::Reprocess(
                                    InsertionMode::InTableBody,
                                    Token::Tag(tag),
                                )
                            } else {
                                self.unexpected(&tag)
                            }
                        },

                        (EndTag, "tbody" | "tfoot" | "thead") => {
                            if self.in_scope_named(table_scope, &name) {
                                if self.in_scope_named(table_scope, "tr") {
                                    self.pop_until_current(table_row_context);
                                    let node = self.pop();
                                    self.assert_named(&node, "tr");
                                    ProcessResult::Reprocess(
                                        InsertionMode::InTableBody,
                                        Token::Tag(tag),
                                    )
                                } else {
                                    ProcessResult::Done
                                }
                            } else {
                                self.unexpected(&tag)
                            }
                        },

                        (EndTag, "body" | "caption" | "col" | "colgroup" | "html" | "td" | "th") => {
                            self.unexpected(&tag)
                        },

                        _ => self.step(InsertionMode::InTable, Token::Tag(tag)),
                    }
                },

                token => self.step(InsertionMode::InTable, token),
            },

            //§ parsing-main-intd
            InsertionMode::InCell => match token {
                Token::Tag(tag) => {
                    let name = tag.name.clone();
                    match (tag.kind, &*name) {
                        (EndTag, "td" | "th") => {
                            if self.in_scope_named(table_scope, &name) {
                                self.generate_implied_end_tags(cursory_implied_end);
                                self.expect_to_close(&name);
                                self.clear_active_formatting_to_marker();
                                self.mode = InsertionMode::InRow;
                            } else {
                                self.unexpected(&tag);
                            }
                            ProcessResult::Done
                        },

                        (
                            StartTag,
                            "caption" | "col" | "colgroup" | "tbody" | "td" | "tfoot" | "th"
                            | "thead" | "tr",
                        ) => {
                            if self.in_scope(table_scope, |n| self.elem_in(n, td_th)) {
                                self.close_the_cell();
                                ProcessResult::Reprocess(InsertionMode::InRow, Token::Tag(tag))
                            } else {
                                self.unexpected(&tag)
                            }
                        },

                        (EndTag, "body" | "caption" | "col" | "colgroup" | "html") => {
                            self.unexpected(&tag)
                        },

                        (EndTag, "table" | "tbody" | "tfoot" | "thead" | "tr") => {
                            if self.in_scope_named(table_scope, &name) {
                                self.close_the_cell();
                                ProcessResult::Reprocess(InsertionMode::InRow, Token::Tag(tag))
                            } else {
                                self.unexpected(&tag)
                            }
                        },

                        _ => self.step(InsertionMode::InBody, Token::Tag(tag)),
                    }
                },

                token => self.step(InsertionMode::InBody, token),
            },

            //§ parsing-main-inselect
            InsertionMode::InSelect => match token {
                Token::NullCharacter => self.unexpected(&token),
                Token::Characters(_, text) => self.append_text(text),
                Token::Comment(text) => self.append_comment(text),

                Token::Eof => self.step(InsertionMode::InBody, token),

                Token::Tag(tag) => {
                    let name = tag.name.clone();
                    match (tag.kind, &*name) {
                        (StartTag, "html") => self.step(InsertionMode::InBody, Token::Tag(tag)),

                        (StartTag, "option") => {
                            if self.current_node_named("option") {
                                self.pop();
                            }
                            self.insert_element_for(tag);
                            ProcessResult::Done
                        },

                        (StartTag, "optgroup") => {
                            if self.current_node_named("option") {
                                self.pop();
                            }
                            if self.current_node_named("optgroup") {
                                self.pop();
                            }
                            self.insert_element_for(tag);
                            ProcessResult::Done
                        },

                        (StartTag, "hr") => {
                            if self.current_node_named("option") {
                                self.pop();
                            }
                            if self.current_node_named("optgroup") {
                                self.pop();
                            }
                            self.insert_element_for(tag);
                            self.pop();
                            ProcessResult::DoneAckSelfClosing
                        },

                        (EndTag, "optgroup") => {
                            if self.open_elems.len() >= 2
                                && self.current_node_named("option")
                                && self.open_elems[self.open_elems.len() - 2]
                                    .is_element(Namespace::Html, "optgroup")
                            {
                                self.pop();
                            }
                            if self.current_node_named("optgroup") {
                                self.pop();
                            } else {
                                self.unexpected(&tag);
                            }
                            ProcessResult::Done
                        },

                        (EndTag, "option") => {
                            if self.current_node_named("option") {
                                self.pop();
                            } else {
                                self.unexpected(&tag);
                            }
                            ProcessResult::Done
                        },

                        (StartTag, "select") | (EndTag, "select") => {
                            let in_scope = self.in_scope_named(select_scope, "select");

                            if !in_scope || tag.kind == StartTag {
                                self.unexpected(&tag);
                            }

                            if in_scope {
                                self.pop_until_named("select");
                                self.mode = self.reset_insertion_mode();
                            }
                            ProcessResult::Done
                        },

                        (StartTag, "input" | "keygen" | "textarea") => {
                            self.unexpected(&tag);
                            if self.in_scope_named(select_scope, "select") {
                                self.pop_until_named("select");
                                ProcessResult::Reprocess(
                                    self.reset_insertion_mode(),
                                    Token::Tag(tag),
                                )
                            } else {
                                ProcessResult::Done
                            }
                        },

                        (StartTag, "script" | "template") | (EndTag, "template") => {
                            self.step(InsertionMode::InHead, Token::Tag(tag))
                        },

                        _ => self.unexpected(&tag),
                    }
                },
            },

            //§ parsing-main-inselectintable
            InsertionMode::InSelectInTable => match token {
                Token::Tag(tag) => {
                    let name = tag.name.clone();
                    match (tag.kind, &*name) {
                        (
                            StartTag,
                            "caption" | "table" | "tbody" | "tfoot" | "thead" | "tr" | "td" | "th",
                        ) => {
                            self.unexpected(&tag);
                            self.pop_until_named("select");
                            ProcessResult::Reprocess(self.reset_insertion_mode(), Token::Tag(tag))
                        },

                        (
                            EndTag,
                            "caption" | "table" | "tbody" | "tfoot" | "thead" | "tr" | "td" | "th",
                        ) => {
                            self.unexpected(&tag);
                            if self.in_scope_named(table_scope, &name) {
                                self.pop_until_named("select");
                                ProcessResult::Reprocess(
                                    self.reset_insertion_mode(),
                                    Token::Tag(tag),
                                )
                            } else {
                                ProcessResult::Done
                            }
                        },

                        _ => self.step(InsertionMode::InSelect, Token::Tag(tag)),
                    }
                },

                token => self.step(InsertionMode::InSelect, token),
            },

            //§ parsing-main-intemplate
            InsertionMode::InTemplate => match token {
                Token::Characters(_, _) => self.step(InsertionMode::InBody, token),
                Token::Comment(_) => self.step(InsertionMode::InBody, token),
                Token::NullCharacter => self.step(InsertionMode::InBody, token),

                Token::Eof => {
                    if !self.in_html_elem_named("template") {
                        self.stop_parsing()
                    } else {
                        self.unexpected(&token);
                        self.pop_until_named("template");
                        self.clear_active_formatting_to_marker();
                        self.template_modes.pop();
                        ProcessResult::Reprocess(self.reset_insertion_mode(), token)
                    }
                },

                Token::Tag(tag) => {
                    let name = tag.name.clone();
                    match (tag.kind, &*name) {
                        (
                            StartTag,
                            "base" | "basefont" | "bgsound" | "link" | "meta" | "noframes"
                            | "script" | "style" | "template" | "title",
                        )
                        | (EndTag, "template") => self.step(InsertionMode::InHead, Token::Tag(tag)),

                        (StartTag, "caption" | "colgroup" | "tbody" | "tfoot" | "thead") => {
                            self.template_modes.pop();
                            self.template_modes.push(InsertionMode::InTable);
                            ProcessResult::Reprocess(InsertionMode::InTable, Token::Tag(tag))
                        },

                        (StartTag, "col") => {
                            self.template_modes.pop();
                            self.template_modes.push(InsertionMode::InColumnGroup);
                            ProcessResult::Reprocess(InsertionMode::InColumnGroup, Token::Tag(tag))
                        },

                        (StartTag, "tr") => {
                            self.template_modes.pop();
                            self.template_modes.push(InsertionMode::InTableBody);
                            ProcessResult::Reprocess(InsertionMode::InTableBody, Token::Tag(tag))
                        },

                        (StartTag, "td" | "th") => {
                            self.template_modes.pop();
                            self.template_modes.push(InsertionMode::InRow);
                            ProcessResult::Reprocess(InsertionMode::InRow, Token::Tag(tag))
                        },

                        (StartTag, _) => {
                            self.template_modes.pop();
                            self.template_modes.push(InsertionMode::InBody);
                            ProcessResult::Reprocess(InsertionMode::InBody, Token::Tag(tag))
                        },

                        (EndTag, _) => self.unexpected(&tag),
                    }
                },
            },

            //§ parsing-main-afterbody
            InsertionMode::AfterBody => {
                let token = match token {
                    Token::Characters(SplitStatus::NotSplit, text) => {
                        return ProcessResult::SplitWhitespace(text);
                    },
                    Token::Characters(SplitStatus::Whitespace, _) => {
                        return self.step(InsertionMode::InBody, token);
                    },
                    Token::Comment(text) => return self.append_comment_to_html(text),

                    Token::Eof => return self.stop_parsing(),

                    Token::Tag(tag) => {
                        let name = tag.name.clone();
                        match (tag.kind, &*name) {
                            (StartTag, "html") => {
                                return self.step(InsertionMode::InBody, Token::Tag(tag));
                            },

                            (EndTag, "html") => {
                                if self.is_fragment() {
                                    self.unexpected(&tag);
                                } else {
                                    self.mode = InsertionMode::AfterAfterBody;
                                }
                                return ProcessResult::Done;
                            },

                            _ => Token::Tag(tag),
                        }
                    },

                    token => token,
                };

                self.unexpected(&token);
                ProcessResult::Reprocess(InsertionMode::InBody, token)
            },

            //§ parsing-main-inframeset
            InsertionMode::InFrameset => match token {
                Token::Characters(SplitStatus::NotSplit, text) => {
                    ProcessResult::SplitWhitespace(text)
                },
                Token::Characters(SplitStatus::Whitespace, text) => self.append_text(text),
                Token::Comment(text) => self.append_comment(text),

                Token::Eof => {
                    if self.open_elems.len() != 1 {
                        self.unexpected(&token);
                    }
                    self.stop_parsing()
                },

                Token::Tag(tag) => {
                    let name = tag.name.clone();
                    match (tag.kind, &*name) {
                        (StartTag, "html") => self.step(InsertionMode::InBody, Token::Tag(tag)),

                        (StartTag, "frameset") => {
                            self.insert_element_for(tag);
                            ProcessResult::Done
                        },

                        (EndTag, "frameset") => {
                            if self.open_elems.len() == 1 {
                                self.unexpected(&tag);
                            } else {
                                self.pop();
                                if !self.is_fragment() && !self.current_node_named("frameset") {
                                    self.mode = InsertionMode::AfterFrameset;
                                }
                            }
                            ProcessResult::Done
                        },

                        (StartTag, "frame") => {
                            self.insert_and_pop_element_for(tag);
                            ProcessResult::DoneAckSelfClosing
                        },

                        (StartTag, "noframes") => self.step(InsertionMode::InHead, Token::Tag(tag)),

                        _ => self.unexpected(&tag),
                    }
                },

                token => self.unexpected(&token),
            },

            //§ parsing-main-afterframeset
            InsertionMode::AfterFrameset => match token {
                Token::Characters(SplitStatus::NotSplit, text) => {
                    ProcessResult::SplitWhitespace(text)
                },
                Token::Characters(SplitStatus::Whitespace, text) => self.append_text(text),
                Token::Comment(text) => self.append_comment(text),

                Token::Eof => self.stop_parsing(),

                Token::Tag(tag) => {
                    let name = tag.name.clone();
                    match (tag.kind, &*name) {
                        (StartTag, "html") => self.step(InsertionMode::InBody, Token::Tag(tag)),

                        (EndTag, "html") => {
                            self.mode = InsertionMode::AfterAfterFrameset;
                            ProcessResult::Done
                        },

                        (StartTag, "noframes") => self.step(InsertionMode::InHead, Token::Tag(tag)),

                        _ => self.unexpected(&tag),
                    }
                },

                token => self.unexpected(&token),
            },

            //§ the-after-after-body-insertion-mode
            InsertionMode::AfterAfterBody => {
                let token = match token {
                    Token::Characters(SplitStatus::NotSplit, text) => {
                        return ProcessResult::SplitWhitespace(text);
                    },
                    Token::Characters(SplitStatus::Whitespace, _) => {
                        return self.step(InsertionMode::InBody, token);
                    },
                    Token::Comment(text) => return self.append_comment_to_doc(text),

                    Token::Eof => return self.stop_parsing(),

                    Token::Tag(tag) => {
                        let name = tag.name.clone();
                        match (tag.kind, &*name) {
                            (StartTag, "html") => {
                                return self.step(InsertionMode::InBody, Token::Tag(tag));
                            },
                            _ => Token::Tag(tag),
                        }
                    },

                    token => token,
                };

                self.unexpected(&token);
                ProcessResult::Reprocess(InsertionMode::InBody, token)
            },

            //§ the-after-after-frameset-insertion-mode
            InsertionMode::AfterAfterFrameset => match token {
                Token::Characters(SplitStatus::NotSplit, text) => {
                    ProcessResult::SplitWhitespace(text)
                },
                Token::Characters(SplitStatus::Whitespace, _) => {
                    self.step(InsertionMode::InBody, token)
                },
                Token::Comment(text) => self.append_comment_to_doc(text),

                Token::Eof => self.stop_parsing(),

                Token::Tag(tag) => {
                    let name = tag.name.clone();
                    match (tag.kind, &*name) {
                        (StartTag, "html") => self.step(InsertionMode::InBody, Token::Tag(tag)),
                        (StartTag, "noframes") => self.step(InsertionMode::InHead, Token::Tag(tag)),
                        _ => self.unexpected(&tag),
                    }
                },

                token => self.unexpected(&token),
            },
            //§ END
        }
    }

    //§ parsing-main-inforeign
    pub(crate) fn step_foreign(&mut self, token: Token) -> ProcessResult {
        log::debug!("processing {token:?} in foreign content");

        match token {
            Token::NullCharacter => {
                self.unexpected(&token);
                self.append_text("\u{fffd}".to_tendril())
            },

            Token::Characters(_, text) => {
                if any_not_whitespace(&text) {
                    self.frameset_ok = false;
                }
                self.append_text(text)
            },

            Token::Comment(text) => self.append_comment(text),

            Token::Tag(tag) => {
                let name = tag.name.clone();
                match (tag.kind, &*name) {
                    (
                        StartTag,
                        "b" | "big" | "blockquote" | "body" | "br" | "center" | "code" | "dd"
                        | "div" | "dl" | "dt" | "em" | "embed" | "h1" | "h2" | "h3" | "h4" | "h5"
                        | "h6" | "head" | "hr" | "i" | "img" | "li" | "listing" | "menu" | "meta"
                        | "nobr" | "ol" | "p" | "pre" | "ruby" | "s" | "small" | "span" | "strong"
                        | "strike" | "sub" | "sup" | "table" | "tt" | "u" | "ul" | "var",
                    )
                    | (EndTag, "br" | "p") => self.unexpected_start_tag_in_foreign_content(tag),

                    (StartTag, "font") => {
                        let unexpected = tag.attrs.iter().any(|attr| {
                            matches!(&*attr.name.local, "color" | "face" | "size")
                                && attr.name.ns == Namespace::None
                        });
                        if unexpected {
                            self.unexpected_start_tag_in_foreign_content(tag)
                        } else {
                            self.foreign_start_tag(tag)
                        }
                    },

                    (StartTag, _) => self.foreign_start_tag(tag),

                    (EndTag, _) => {
                        let mut first = true;
                        let mut stack_idx = self.open_elems.len() - 1;
                        loop {
                            if stack_idx == 0 {
                                return ProcessResult::Done;
                            }

                            let (html, eq) = {
                                let node_name = self.open_elems[stack_idx]
                                    .elem_name()
                                    .expect("non-element in open element stack");
                                (
                                    node_name.ns == Namespace::Html,
                                    node_name.local.eq_ignore_ascii_case(&name),
                                )
                            };
                            if !first && html {
                                let mode = self.mode;
                                return self.step(mode, Token::Tag(tag));
                            }

                            if eq {
                                self.open_elems.truncate(stack_idx);
                                return ProcessResult::Done;
                            }

                            if first {
                                self.unexpected(&tag);
                                first = false;
                            }
                            stack_idx -= 1;
                        }
                    },
                }
            },

            // EOF is never dispatched to foreign content.
            Token::Eof => panic!("impossible case in foreign content"),
        }
    }
}
