// Copyright 2025-2026 The parse5ever Project Developers. See the
// COPYRIGHT file at the top-level directory of this distribution.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! Tokenizer tests, driven through the `TokenSink` trait with a recording
//! sink. Adjacent character tokens are coalesced before comparison, the way
//! the html5lib tokenizer tests compare them.

use parse5ever::tendril::StrTendril;
use parse5ever::tokenizer::states;
use parse5ever::tokenizer::{
    Token, TokenSink, TokenSinkResult, Tokenizer, TokenizerOpts,
};
use parse5ever::BufferQueue;

#[derive(PartialEq, Eq, Debug)]
enum TestToken {
    Doctype {
        name: Option<String>,
        public_id: Option<String>,
        system_id: Option<String>,
        force_quirks: bool,
    },
    StartTag(String, Vec<(String, String)>, bool),
    EndTag(String),
    Comment(String),
    Characters(String),
}

#[derive(Default)]
struct Accumulator {
    tokens: Vec<TestToken>,
    errors: Vec<String>,
    in_foreign_content: bool,
}

impl Accumulator {
    fn push_characters(&mut self, text: &str) {
        if let Some(TestToken::Characters(last)) = self.tokens.last_mut() {
            last.push_str(text);
        } else {
            self.tokens.push(TestToken::Characters(text.into()));
        }
    }
}

impl TokenSink for Accumulator {
    fn process_token(&mut self, token: Token) -> TokenSinkResult {
        match token {
            Token::DoctypeToken(dt) => self.tokens.push(TestToken::Doctype {
                name: dt.name.map(|t| t.to_string()),
                public_id: dt.public_id.map(|t| t.to_string()),
                system_id: dt.system_id.map(|t| t.to_string()),
                force_quirks: dt.force_quirks,
            }),
            Token::TagToken(tag) => match tag.kind {
                parse5ever::tokenizer::StartTag => self.tokens.push(TestToken::StartTag(
                    tag.name.to_string(),
                    tag.attrs
                        .iter()
                        .map(|a| (a.name.local.to_string(), a.value.to_string()))
                        .collect(),
                    tag.self_closing,
                )),
                parse5ever::tokenizer::EndTag => {
                    self.tokens.push(TestToken::EndTag(tag.name.to_string()))
                },
            },
            Token::CommentToken(text) => self.tokens.push(TestToken::Comment(text.to_string())),
            Token::CharacterTokens(text) => self.push_characters(&text),
            Token::NullCharacterToken => self.push_characters("\0"),
            Token::EOFToken => (),
            Token::ParseError(code) => self.errors.push(code.to_string()),
        }
        TokenSinkResult::Continue
    }

    fn adjusted_current_node_present_and_not_in_html_namespace(&self) -> bool {
        self.in_foreign_content
    }
}

fn tokenize_with(input: &str, opts: TokenizerOpts, in_foreign_content: bool) -> Accumulator {
    let sink = Accumulator {
        in_foreign_content,
        ..Default::default()
    };
    let mut tok = Tokenizer::new(sink, opts);
    let mut buffer = BufferQueue::new();
    buffer.push_back(StrTendril::from_slice(input));
    tok.feed(&mut buffer);
    tok.end();
    tok.sink
}

fn tokenize(input: &str) -> Accumulator {
    tokenize_with(input, TokenizerOpts::default(), false)
}

fn start_tag(name: &str, attrs: &[(&str, &str)], self_closing: bool) -> TestToken {
    TestToken::StartTag(
        name.into(),
        attrs
            .iter()
            .map(|&(n, v)| (n.into(), v.into()))
            .collect(),
        self_closing,
    )
}

#[test]
fn text_and_tags() {
    let out = tokenize(r#"a<p class="x">b</p>c"#);
    assert_eq!(
        out.tokens,
        vec![
            TestToken::Characters("a".into()),
            start_tag("p", &[("class", "x")], false),
            TestToken::Characters("b".into()),
            TestToken::EndTag("p".into()),
            TestToken::Characters("c".into()),
        ]
    );
    assert!(out.errors.is_empty());
}

#[test]
fn names_are_lowercased_values_are_not() {
    let out = tokenize("<DIV ID=Abc>");
    assert_eq!(out.tokens, vec![start_tag("div", &[("id", "Abc")], false)]);
}

#[test]
fn self_closing_flag() {
    let out = tokenize("<br/>");
    assert_eq!(out.tokens, vec![start_tag("br", &[], true)]);
}

#[test]
fn unquoted_and_single_quoted_attributes() {
    let out = tokenize("<a x=1 y='2'>");
    assert_eq!(
        out.tokens,
        vec![start_tag("a", &[("x", "1"), ("y", "2")], false)]
    );
}

#[test]
fn duplicate_attribute_is_dropped() {
    let out = tokenize("<p a=1 a=2>");
    assert_eq!(out.tokens, vec![start_tag("p", &[("a", "1")], false)]);
    assert_eq!(out.errors, vec!["duplicate-attribute"]);
}

#[test]
fn named_character_references() {
    assert_eq!(
        tokenize("&amp;").tokens,
        vec![TestToken::Characters("&".into())]
    );
    assert_eq!(
        tokenize("&notin;").tokens,
        vec![TestToken::Characters("\u{2209}".into())]
    );
    // Two-code-point replacement.
    assert_eq!(
        tokenize("&acE;").tokens,
        vec![TestToken::Characters("\u{223e}\u{333}".into())]
    );
}

#[test]
fn legacy_reference_without_semicolon() {
    let out = tokenize("&amp");
    assert_eq!(out.tokens, vec![TestToken::Characters("&".into())]);
    assert_eq!(out.errors, vec!["missing-semicolon-after-character-reference"]);
}

#[test]
fn longest_match_backtracks() {
    // &not is a match, &noti extends toward &notin; but &notit; fails, so
    // the extra characters are unconsumed.
    let out = tokenize("&notit;");
    assert_eq!(out.tokens, vec![TestToken::Characters("\u{ac}it;".into())]);
    assert_eq!(out.errors, vec!["missing-semicolon-after-character-reference"]);
}

#[test]
fn unknown_reference_with_semicolon() {
    let out = tokenize("&bogus;");
    assert_eq!(out.tokens, vec![TestToken::Characters("&bogus;".into())]);
    assert_eq!(out.errors, vec!["unknown-named-character-reference"]);
}

#[test]
fn bare_ampersand_and_empty_reference() {
    assert_eq!(
        tokenize("a & b").tokens,
        vec![TestToken::Characters("a & b".into())]
    );
    let out = tokenize("&;");
    assert_eq!(out.tokens, vec![TestToken::Characters("&;".into())]);
    assert!(out.errors.is_empty());
}

#[test]
fn legacy_reference_in_attribute_value() {
    // For historical reasons, a legacy match followed by `=` or an
    // alphanumeric is not a character reference inside attribute values.
    let out = tokenize(r#"<a href="?a&amp=b&ampx">"#);
    assert_eq!(
        out.tokens,
        vec![start_tag("a", &[("href", "?a&amp=b&ampx")], false)]
    );
    assert!(out.errors.is_empty());

    // With a semicolon it always resolves.
    let out = tokenize(r#"<a href="?a&amp;=b">"#);
    assert_eq!(
        out.tokens,
        vec![start_tag("a", &[("href", "?a&=b")], false)]
    );
}

#[test]
fn numeric_character_references() {
    assert_eq!(
        tokenize("&#65;&#x41;&#X42;").tokens,
        vec![TestToken::Characters("AAB".into())]
    );

    // C1 controls are remapped.
    let out = tokenize("&#x80;");
    assert_eq!(out.tokens, vec![TestToken::Characters("\u{20ac}".into())]);
    assert_eq!(out.errors, vec!["control-character-reference"]);

    let out = tokenize("&#xD800;");
    assert_eq!(out.tokens, vec![TestToken::Characters("\u{fffd}".into())]);
    assert_eq!(out.errors, vec!["surrogate-character-reference"]);

    let out = tokenize("&#0;");
    assert_eq!(out.tokens, vec![TestToken::Characters("\u{fffd}".into())]);
    assert_eq!(out.errors, vec!["null-character-reference"]);

    let out = tokenize("&#x110000;");
    assert_eq!(out.tokens, vec![TestToken::Characters("\u{fffd}".into())]);
    assert_eq!(
        out.errors,
        vec!["character-reference-outside-unicode-range"]
    );

    // Grossly oversized literals must not wrap around.
    let out = tokenize("&#123456789123456789;");
    assert_eq!(out.tokens, vec![TestToken::Characters("\u{fffd}".into())]);
    assert_eq!(
        out.errors,
        vec!["character-reference-outside-unicode-range"]
    );
}

#[test]
fn numeric_reference_without_digits() {
    let out = tokenize("&#;");
    assert_eq!(out.tokens, vec![TestToken::Characters("&#;".into())]);
    assert_eq!(
        out.errors,
        vec!["absence-of-digits-in-numeric-character-reference"]
    );

    let out = tokenize("&#x");
    assert_eq!(out.tokens, vec![TestToken::Characters("&#x".into())]);
    assert_eq!(
        out.errors,
        vec!["absence-of-digits-in-numeric-character-reference"]
    );
}

#[test]
fn comments() {
    assert_eq!(
        tokenize("<!--a<b-->").tokens,
        vec![TestToken::Comment("a<b".into())]
    );

    let out = tokenize("<!-->");
    assert_eq!(out.tokens, vec![TestToken::Comment("".into())]);
    assert_eq!(out.errors, vec!["abrupt-closing-of-empty-comment"]);

    let out = tokenize("<!--x--!>");
    assert_eq!(out.tokens, vec![TestToken::Comment("x".into())]);
    assert_eq!(out.errors, vec!["incorrectly-closed-comment"]);

    let out = tokenize("<!--a<!--b-->");
    assert_eq!(out.tokens, vec![TestToken::Comment("a<!--b".into())]);
    assert_eq!(out.errors, vec!["nested-comment"]);
}

#[test]
fn bogus_comment_from_bad_markup_declaration() {
    let out = tokenize("<!x>");
    assert_eq!(out.tokens, vec![TestToken::Comment("x".into())]);
    assert_eq!(out.errors, vec!["incorrectly-opened-comment"]);

    let out = tokenize("<?pi?>");
    assert_eq!(out.tokens, vec![TestToken::Comment("?pi?".into())]);
    assert_eq!(
        out.errors,
        vec!["unexpected-question-mark-instead-of-tag-name"]
    );
}

#[test]
fn doctype_with_identifiers() {
    let out = tokenize(r#"<!DOCTYPE html PUBLIC "p" 's'>"#);
    assert_eq!(
        out.tokens,
        vec![TestToken::Doctype {
            name: Some("html".into()),
            public_id: Some("p".into()),
            system_id: Some("s".into()),
            force_quirks: false,
        }]
    );
    assert!(out.errors.is_empty());
}

#[test]
fn doctype_names_are_lowercased() {
    let out = tokenize("<!doctype HTML>");
    assert_eq!(
        out.tokens,
        vec![TestToken::Doctype {
            name: Some("html".into()),
            public_id: None,
            system_id: None,
            force_quirks: false,
        }]
    );
}

#[test]
fn bogus_doctype_forces_quirks() {
    let out = tokenize("<!DOCTYPE html bogus>");
    assert_eq!(
        out.tokens,
        vec![TestToken::Doctype {
            name: Some("html".into()),
            public_id: None,
            system_id: None,
            force_quirks: true,
        }]
    );
    assert_eq!(
        out.errors,
        vec!["invalid-character-sequence-after-doctype-name"]
    );
}

#[test]
fn eof_in_doctype() {
    let out = tokenize("<!DOCTYPE");
    assert_eq!(
        out.tokens,
        vec![TestToken::Doctype {
            name: None,
            public_id: None,
            system_id: None,
            force_quirks: true,
        }]
    );
    assert_eq!(out.errors, vec!["eof-in-doctype"]);
}

#[test]
fn carriage_returns_are_normalized() {
    assert_eq!(
        tokenize("a\r\nb\rc").tokens,
        vec![TestToken::Characters("a\nb\nc".into())]
    );
}

#[test]
fn leading_bom_is_dropped() {
    assert_eq!(
        tokenize("\u{feff}x").tokens,
        vec![TestToken::Characters("x".into())]
    );
}

#[test]
fn null_in_data_passes_through() {
    let out = tokenize("a\0b");
    assert_eq!(out.tokens, vec![TestToken::Characters("a\0b".into())]);
    assert_eq!(out.errors, vec!["unexpected-null-character"]);
}

#[test]
fn eof_inside_tag() {
    let out = tokenize("<p");
    assert_eq!(out.tokens, vec![]);
    assert_eq!(out.errors, vec!["eof-in-tag"]);
}

#[test]
fn lone_less_than_signs() {
    let out = tokenize("<");
    assert_eq!(out.tokens, vec![TestToken::Characters("<".into())]);
    assert_eq!(out.errors, vec!["eof-before-tag-name"]);

    let out = tokenize("a<1b");
    assert_eq!(out.tokens, vec![TestToken::Characters("a<1b".into())]);
    assert_eq!(out.errors, vec!["invalid-first-character-of-tag-name"]);
}

#[test]
fn missing_end_tag_name() {
    let out = tokenize("</>x");
    assert_eq!(out.tokens, vec![TestToken::Characters("x".into())]);
    assert_eq!(out.errors, vec!["missing-end-tag-name"]);
}

#[test]
fn rawtext_state_matches_only_appropriate_end_tag() {
    let opts = TokenizerOpts {
        initial_state: Some(states::RawData(states::Rawtext)),
        last_start_tag_name: Some("xmp".into()),
        ..Default::default()
    };
    let out = tokenize_with("a</xm></xmp>b", opts, false);
    assert_eq!(
        out.tokens,
        vec![
            TestToken::Characters("a</xm>".into()),
            TestToken::EndTag("xmp".into()),
            TestToken::Characters("b".into()),
        ]
    );
}

#[test]
fn rcdata_resolves_character_references() {
    let opts = TokenizerOpts {
        initial_state: Some(states::RawData(states::Rcdata)),
        last_start_tag_name: Some("title".into()),
        ..Default::default()
    };
    let out = tokenize_with("a&amp;<b</title>", opts, false);
    assert_eq!(
        out.tokens,
        vec![
            TestToken::Characters("a&<b".into()),
            TestToken::EndTag("title".into()),
        ]
    );
}

#[test]
fn script_data_less_than_is_text() {
    let opts = TokenizerOpts {
        initial_state: Some(states::RawData(states::ScriptData)),
        last_start_tag_name: Some("script".into()),
        ..Default::default()
    };
    let out = tokenize_with("if (a<b) {}</script>", opts, false);
    assert_eq!(
        out.tokens,
        vec![
            TestToken::Characters("if (a<b) {}".into()),
            TestToken::EndTag("script".into()),
        ]
    );
}

#[test]
fn script_data_escaped_comment_hides_end_tag() {
    let opts = TokenizerOpts {
        initial_state: Some(states::RawData(states::ScriptData)),
        last_start_tag_name: Some("script".into()),
        ..Default::default()
    };
    let out = tokenize_with("<!--<script>x</script>--></script>", opts, false);
    assert_eq!(
        out.tokens,
        vec![
            TestToken::Characters("<!--<script>x</script>-->".into()),
            TestToken::EndTag("script".into()),
        ]
    );
}

#[test]
fn plaintext_never_ends() {
    let opts = TokenizerOpts {
        initial_state: Some(states::Plaintext),
        ..Default::default()
    };
    let out = tokenize_with("a</plaintext>b", opts, false);
    assert_eq!(
        out.tokens,
        vec![TestToken::Characters("a</plaintext>b".into())]
    );
}

#[test]
fn cdata_is_bogus_comment_outside_foreign_content() {
    let out = tokenize("<![CDATA[x]]>");
    assert_eq!(out.tokens, vec![TestToken::Comment("[CDATA[x]]".into())]);
    assert_eq!(out.errors, vec!["cdata-in-html-content"]);
}

#[test]
fn cdata_is_text_in_foreign_content() {
    let out = tokenize_with("<![CDATA[x]]y]]>z", TokenizerOpts::default(), true);
    assert_eq!(out.tokens, vec![TestToken::Characters("x]]yz".into())]);
    assert!(out.errors.is_empty());
}

#[test]
fn end_tag_with_attributes_is_an_error() {
    let out = tokenize("</p class=x>");
    assert_eq!(out.tokens, vec![TestToken::EndTag("p".into())]);
    assert_eq!(out.errors, vec!["end-tag-with-attributes"]);
}
