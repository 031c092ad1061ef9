// Copyright 2025-2026 The parse5ever Project Developers. See the
// COPYRIGHT file at the top-level directory of this distribution.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! Static data for tree construction: the DOCTYPE quirks tables, the element
//! category predicates ("special", the scope variants, implied end tags) and
//! the foreign-content name adjustment tables.

use phf::phf_map;
use tendril::StrTendril;

use crate::interface::{Namespace, QualName, QuirksMode};
use crate::tokenizer::Doctype;

//§ the-initial-insertion-mode

// These should all be lowercase, for ASCII-case-insensitive matching.
static QUIRKY_PUBLIC_PREFIXES: &[&str] = &[
    "+//silmaril//dtd html pro v0r11 19970101//",
    "-//advasoft ltd//dtd html 3.0 aswedit + extensions//",
    "-//as//dtd html 3.0 aswedit + extensions//",
    "-//ietf//dtd html 2.0 level 1//",
    "-//ietf//dtd html 2.0 level 2//",
    "-//ietf//dtd html 2.0 strict level 1//",
    "-//ietf//dtd html 2.0 strict level 2//",
    "-//ietf//dtd html 2.0 strict//",
    "-//ietf//dtd html 2.0//",
    "-//ietf//dtd html 2.1e//",
    "-//ietf//dtd html 3.0//",
    "-//ietf//dtd html 3.2 final//",
    "-//ietf//dtd html 3.2//",
    "-//ietf//dtd html 3//",
    "-//ietf//dtd html level 0//",
    "-//ietf//dtd html level 1//",
    "-//ietf//dtd html level 2//",
    "-//ietf//dtd html level 3//",
    "-//ietf//dtd html strict level 0//",
    "-//ietf//dtd html strict level 1//",
    "-//ietf//dtd html strict level 2//",
    "-//ietf//dtd html strict level 3//",
    "-//ietf//dtd html strict//",
    "-//ietf//dtd html//",
    "-//metrius//dtd metrius presentational//",
    "-//microsoft//dtd internet explorer 2.0 html strict//",
    "-//microsoft//dtd internet explorer 2.0 html//",
    "-//microsoft//dtd internet explorer 2.0 tables//",
    "-//microsoft//dtd internet explorer 3.0 html strict//",
    "-//microsoft//dtd internet explorer 3.0 html//",
    "-//microsoft//dtd internet explorer 3.0 tables//",
    "-//netscape comm. corp.//dtd html//",
    "-//netscape comm. corp.//dtd strict html//",
    "-//o'reilly and associates//dtd html 2.0//",
    "-//o'reilly and associates//dtd html extended 1.0//",
    "-//o'reilly and associates//dtd html extended relaxed 1.0//",
    "-//sq//dtd html 2.0 hotmetal + extensions//",
    "-//softquad software//dtd hotmetal pro 6.0::19990601::extensions to html 4.0//",
    "-//softquad//dtd hotmetal pro 4.0::19971010::extensions to html 4.0//",
    "-//spyglass//dtd html 2.0 extended//",
    "-//sun microsystems corp.//dtd hotjava html//",
    "-//sun microsystems corp.//dtd hotjava strict html//",
    "-//w3c//dtd html 3 1995-03-24//",
    "-//w3c//dtd html 3.2 draft//",
    "-//w3c//dtd html 3.2 final//",
    "-//w3c//dtd html 3.2//",
    "-//w3c//dtd html 3.2s draft//",
    "-//w3c//dtd html 4.0 frameset//",
    "-//w3c//dtd html 4.0 transitional//",
    "-//w3c//dtd html experimental 19960712//",
    "-//w3c//dtd html experimental 970421//",
    "-//w3c//dtd w3 html//",
    "-//w3o//dtd w3 html 3.0//",
    "-//webtechs//dtd mozilla html 2.0//",
    "-//webtechs//dtd mozilla html//",
];

static QUIRKY_PUBLIC_MATCHES: &[&str] = &[
    "-//w3o//dtd w3 html strict 3.0//en//",
    "-/w3c/dtd html 4.0 transitional/en",
    "html",
];

static QUIRKY_SYSTEM_MATCHES: &[&str] =
    &["http://www.ibm.com/data/dtd/v11/ibmxhtml1-transitional.dtd"];

static LIMITED_QUIRKY_PUBLIC_PREFIXES: &[&str] = &[
    "-//w3c//dtd xhtml 1.0 frameset//",
    "-//w3c//dtd xhtml 1.0 transitional//",
];

static HTML4_PUBLIC_PREFIXES: &[&str] = &[
    "-//w3c//dtd html 4.01 frameset//",
    "-//w3c//dtd html 4.01 transitional//",
];

fn opt_string_eq(value: &Option<StrTendril>, expected: &str) -> bool {
    value
        .as_ref()
        .map_or(expected.is_empty(), |value| &**value == expected)
}

fn is_doctype_ok(doctype: &Doctype) -> bool {
    let public = &doctype.public_id;
    let system = &doctype.system_id;
    let has_system_id = system.is_some();

    if !opt_string_eq(&doctype.name, "html") {
        false
    } else if public.is_none() {
        !has_system_id || opt_string_eq(system, "about:legacy-compat")
    } else if opt_string_eq(public, "-//W3C//DTD HTML 4.0//EN") {
        !has_system_id || opt_string_eq(system, "http://www.w3.org/TR/REC-html40/strict.dtd")
    } else if opt_string_eq(public, "-//W3C//DTD HTML 4.01//EN") {
        !has_system_id || opt_string_eq(system, "http://www.w3.org/TR/html4/strict.dtd")
    } else if opt_string_eq(public, "-//W3C//DTD XHTML 1.0 Strict//EN") {
        opt_string_eq(system, "http://www.w3.org/TR/xhtml1/DTD/xhtml1-strict.dtd")
    } else if opt_string_eq(public, "-//W3C//DTD XHTML 1.1//EN") {
        opt_string_eq(system, "http://www.w3.org/TR/xhtml11/DTD/xhtml11.dtd")
    } else {
        false
    }
}

fn contains_ignore_ascii_case(haystack: &[&str], needle: &str) -> bool {
    haystack.iter().any(|x| x.eq_ignore_ascii_case(needle))
}

fn contains_prefix_ignore_ascii_case(haystack: &[&str], needle: &str) -> bool {
    // Quirks-mode matches are case-insensitive. Compare bytes so that a
    // multi-byte character at the boundary cannot split a code point.
    haystack.iter().any(|x| {
        needle.len() >= x.len() && needle.as_bytes()[..x.len()].eq_ignore_ascii_case(x.as_bytes())
    })
}

/// Is this DOCTYPE an error, and what quirks mode does it select?
pub(crate) fn doctype_error_and_quirks(doctype: &Doctype) -> (bool, QuirksMode) {
    let err = !is_doctype_ok(doctype);

    let public = doctype.public_id.as_deref();
    let system = doctype.system_id.as_deref();

    let quirk = match (public, system) {
        _ if doctype.force_quirks => QuirksMode::Quirks,
        _ if !opt_string_eq(&doctype.name, "html") => QuirksMode::Quirks,

        (Some(p), _) if contains_ignore_ascii_case(QUIRKY_PUBLIC_MATCHES, p) => QuirksMode::Quirks,
        (_, Some(s)) if contains_ignore_ascii_case(QUIRKY_SYSTEM_MATCHES, s) => QuirksMode::Quirks,

        (Some(p), _) if contains_prefix_ignore_ascii_case(QUIRKY_PUBLIC_PREFIXES, p) => {
            QuirksMode::Quirks
        },
        (Some(p), _) if contains_prefix_ignore_ascii_case(LIMITED_QUIRKY_PUBLIC_PREFIXES, p) => {
            QuirksMode::LimitedQuirks
        },

        (Some(p), s) if contains_prefix_ignore_ascii_case(HTML4_PUBLIC_PREFIXES, p) => match s {
            None => QuirksMode::Quirks,
            Some(_) => QuirksMode::LimitedQuirks,
        },

        _ => QuirksMode::NoQuirks,
    };

    (err, quirk)
}

//§ tree-construction

/// The "special" element category, which bounds generic end-tag matching
/// and selects the furthest block in the adoption agency algorithm.
pub(crate) fn special_tag(name: &QualName) -> bool {
    match name.ns {
        Namespace::Html => matches!(
            &*name.local,
            "address"
                | "applet"
                | "area"
                | "article"
                | "aside"
                | "base"
                | "basefont"
                | "bgsound"
                | "blockquote"
                | "body"
                | "br"
                | "button"
                | "caption"
                | "center"
                | "col"
                | "colgroup"
                | "dd"
                | "details"
                | "dir"
                | "div"
                | "dl"
                | "dt"
                | "embed"
                | "fieldset"
                | "figcaption"
                | "figure"
                | "footer"
                | "form"
                | "frame"
                | "frameset"
                | "h1"
                | "h2"
                | "h3"
                | "h4"
                | "h5"
                | "h6"
                | "head"
                | "header"
                | "hgroup"
                | "hr"
                | "html"
                | "iframe"
                | "img"
                | "input"
                | "keygen"
                | "li"
                | "link"
                | "listing"
                | "main"
                | "marquee"
                | "menu"
                | "meta"
                | "nav"
                | "noembed"
                | "noframes"
                | "noscript"
                | "object"
                | "ol"
                | "p"
                | "param"
                | "plaintext"
                | "pre"
                | "script"
                | "search"
                | "section"
                | "select"
                | "source"
                | "style"
                | "summary"
                | "table"
                | "tbody"
                | "td"
                | "template"
                | "textarea"
                | "tfoot"
                | "th"
                | "thead"
                | "title"
                | "tr"
                | "track"
                | "ul"
                | "wbr"
                | "xmp"
        ),
        Namespace::MathMl => matches!(
            &*name.local,
            "mi" | "mo" | "mn" | "ms" | "mtext" | "annotation-xml"
        ),
        Namespace::Svg => matches!(&*name.local, "foreignObject" | "desc" | "title"),
        _ => false,
    }
}

/// MathML text integration points.
pub(crate) fn mathml_text_integration_point(name: &QualName) -> bool {
    name.ns == Namespace::MathMl && matches!(&*name.local, "mi" | "mo" | "mn" | "ms" | "mtext")
}

/// SVG HTML integration points. (The MathML `annotation-xml` integration
/// point depends on the element's `encoding` attribute, not just its name.)
pub(crate) fn svg_html_integration_point(name: &QualName) -> bool {
    name.ns == Namespace::Svg && matches!(&*name.local, "foreignObject" | "desc" | "title")
}

//§ has-an-element-in-scope

pub(crate) fn default_scope(name: &QualName) -> bool {
    match name.ns {
        Namespace::Html => matches!(
            &*name.local,
            "applet"
                | "caption"
                | "html"
                | "table"
                | "td"
                | "th"
                | "marquee"
                | "object"
                | "template"
        ),
        _ => mathml_text_integration_point(name)
            || svg_html_integration_point(name)
            || name.is(Namespace::MathMl, "annotation-xml"),
    }
}

pub(crate) fn list_item_scope(name: &QualName) -> bool {
    default_scope(name) || name.is(Namespace::Html, "ol") || name.is(Namespace::Html, "ul")
}

pub(crate) fn button_scope(name: &QualName) -> bool {
    default_scope(name) || name.is(Namespace::Html, "button")
}

pub(crate) fn table_scope(name: &QualName) -> bool {
    name.ns == Namespace::Html && matches!(&*name.local, "html" | "table" | "template")
}

/// Select scope is inverted: everything except optgroup and option
/// terminates it.
pub(crate) fn select_scope(name: &QualName) -> bool {
    !(name.ns == Namespace::Html && matches!(&*name.local, "optgroup" | "option"))
}

//§ closing-elements-that-have-implied-end-tags

pub(crate) fn cursory_implied_end(name: &QualName) -> bool {
    name.ns == Namespace::Html
        && matches!(
            &*name.local,
            "dd" | "dt" | "li" | "optgroup" | "option" | "p" | "rb" | "rp" | "rt" | "rtc"
        )
}

pub(crate) fn thorough_implied_end(name: &QualName) -> bool {
    cursory_implied_end(name)
        || name.ns == Namespace::Html
            && matches!(
                &*name.local,
                "caption" | "colgroup" | "tbody" | "td" | "tfoot" | "th" | "thead" | "tr"
            )
}

//§ END

pub(crate) fn heading_tag(name: &QualName) -> bool {
    name.ns == Namespace::Html
        && matches!(&*name.local, "h1" | "h2" | "h3" | "h4" | "h5" | "h6")
}

pub(crate) fn td_th(name: &QualName) -> bool {
    name.ns == Namespace::Html && matches!(&*name.local, "td" | "th")
}

/// "Clear the stack back to a table body context".
pub(crate) fn table_body_context(name: &QualName) -> bool {
    name.ns == Namespace::Html
        && matches!(&*name.local, "html" | "tbody" | "tfoot" | "thead" | "template")
}

/// "Clear the stack back to a table row context".
pub(crate) fn table_row_context(name: &QualName) -> bool {
    name.ns == Namespace::Html && matches!(&*name.local, "html" | "tr" | "template")
}

//§ parsing-main-inforeign

/// SVG tag names whose lowercased form must be adjusted back to camel case.
pub(crate) static SVG_TAG_ADJUSTMENTS: phf::Map<&'static str, &'static str> = phf_map! {
    "altglyph" => "altGlyph",
    "altglyphdef" => "altGlyphDef",
    "altglyphitem" => "altGlyphItem",
    "animatecolor" => "animateColor",
    "animatemotion" => "animateMotion",
    "animatetransform" => "animateTransform",
    "clippath" => "clipPath",
    "feblend" => "feBlend",
    "fecolormatrix" => "feColorMatrix",
    "fecomponenttransfer" => "feComponentTransfer",
    "fecomposite" => "feComposite",
    "feconvolvematrix" => "feConvolveMatrix",
    "fediffuselighting" => "feDiffuseLighting",
    "fedisplacementmap" => "feDisplacementMap",
    "fedistantlight" => "feDistantLight",
    "fedropshadow" => "feDropShadow",
    "feflood" => "feFlood",
    "fefunca" => "feFuncA",
    "fefuncb" => "feFuncB",
    "fefuncg" => "feFuncG",
    "fefuncr" => "feFuncR",
    "fegaussianblur" => "feGaussianBlur",
    "feimage" => "feImage",
    "femerge" => "feMerge",
    "femergenode" => "feMergeNode",
    "femorphology" => "feMorphology",
    "feoffset" => "feOffset",
    "fepointlight" => "fePointLight",
    "fespecularlighting" => "feSpecularLighting",
    "fespotlight" => "feSpotLight",
    "fetile" => "feTile",
    "feturbulence" => "feTurbulence",
    "foreignobject" => "foreignObject",
    "glyphref" => "glyphRef",
    "lineargradient" => "linearGradient",
    "radialgradient" => "radialGradient",
    "textpath" => "textPath",
};

/// SVG attribute names whose lowercased form must be adjusted back to camel
/// case.
pub(crate) static SVG_ATTR_ADJUSTMENTS: phf::Map<&'static str, &'static str> = phf_map! {
    "attributename" => "attributeName",
    "attributetype" => "attributeType",
    "basefrequency" => "baseFrequency",
    "baseprofile" => "baseProfile",
    "calcmode" => "calcMode",
    "clippathunits" => "clipPathUnits",
    "diffuseconstant" => "diffuseConstant",
    "edgemode" => "edgeMode",
    "filterunits" => "filterUnits",
    "glyphref" => "glyphRef",
    "gradienttransform" => "gradientTransform",
    "gradientunits" => "gradientUnits",
    "kernelmatrix" => "kernelMatrix",
    "kernelunitlength" => "kernelUnitLength",
    "keypoints" => "keyPoints",
    "keysplines" => "keySplines",
    "keytimes" => "keyTimes",
    "lengthadjust" => "lengthAdjust",
    "limitingconeangle" => "limitingConeAngle",
    "markerheight" => "markerHeight",
    "markerunits" => "markerUnits",
    "markerwidth" => "markerWidth",
    "maskcontentunits" => "maskContentUnits",
    "maskunits" => "maskUnits",
    "numoctaves" => "numOctaves",
    "pathlength" => "pathLength",
    "patterncontentunits" => "patternContentUnits",
    "patterntransform" => "patternTransform",
    "patternunits" => "patternUnits",
    "pointsatx" => "pointsAtX",
    "pointsaty" => "pointsAtY",
    "pointsatz" => "pointsAtZ",
    "preservealpha" => "preserveAlpha",
    "preserveaspectratio" => "preserveAspectRatio",
    "primitiveunits" => "primitiveUnits",
    "refx" => "refX",
    "refy" => "refY",
    "repeatcount" => "repeatCount",
    "repeatdur" => "repeatDur",
    "requiredextensions" => "requiredExtensions",
    "requiredfeatures" => "requiredFeatures",
    "specularconstant" => "specularConstant",
    "specularexponent" => "specularExponent",
    "spreadmethod" => "spreadMethod",
    "startoffset" => "startOffset",
    "stddeviation" => "stdDeviation",
    "stitchtiles" => "stitchTiles",
    "surfacescale" => "surfaceScale",
    "systemlanguage" => "systemLanguage",
    "tablevalues" => "tableValues",
    "targetx" => "targetX",
    "targety" => "targetY",
    "textlength" => "textLength",
    "viewbox" => "viewBox",
    "viewtarget" => "viewTarget",
    "xchannelselector" => "xChannelSelector",
    "ychannelselector" => "yChannelSelector",
    "zoomandpan" => "zoomAndPan",
};

/// MathML attribute adjustments.
pub(crate) static MATHML_ATTR_ADJUSTMENTS: phf::Map<&'static str, &'static str> = phf_map! {
    "definitionurl" => "definitionURL",
};

/// The "adjust foreign attributes" table: attribute names that pick up a
/// prefix and a namespace on foreign elements.
pub(crate) static FOREIGN_ATTR_ADJUSTMENTS: phf::Map<
    &'static str,
    (Option<&'static str>, Namespace, &'static str),
> = phf_map! {
    "xlink:actuate" => (Some("xlink"), Namespace::XLink, "actuate"),
    "xlink:arcrole" => (Some("xlink"), Namespace::XLink, "arcrole"),
    "xlink:href" => (Some("xlink"), Namespace::XLink, "href"),
    "xlink:role" => (Some("xlink"), Namespace::XLink, "role"),
    "xlink:show" => (Some("xlink"), Namespace::XLink, "show"),
    "xlink:title" => (Some("xlink"), Namespace::XLink, "title"),
    "xlink:type" => (Some("xlink"), Namespace::XLink, "type"),
    "xml:lang" => (Some("xml"), Namespace::Xml, "lang"),
    "xml:space" => (Some("xml"), Namespace::Xml, "space"),
    "xmlns" => (None, Namespace::XmlNs, "xmlns"),
    "xmlns:xlink" => (Some("xmlns"), Namespace::XmlNs, "xlink"),
};

#[cfg(test)]
mod test {
    use tendril::SliceExt;

    use super::*;

    fn doctype(name: &str, public_id: Option<&str>, system_id: Option<&str>) -> Doctype {
        Doctype {
            name: Some(name.to_tendril()),
            public_id: public_id.map(|p| p.to_tendril()),
            system_id: system_id.map(|s| s.to_tendril()),
            force_quirks: false,
        }
    }

    #[test]
    fn modern_doctype_is_ok() {
        let (err, quirks) = doctype_error_and_quirks(&doctype("html", None, None));
        assert!(!err);
        assert_eq!(quirks, QuirksMode::NoQuirks);
    }

    #[test]
    fn html32_is_quirky() {
        let (err, quirks) = doctype_error_and_quirks(&doctype(
            "html",
            Some("-//W3C//DTD HTML 3.2 Final//EN"),
            None,
        ));
        assert!(err);
        assert_eq!(quirks, QuirksMode::Quirks);
    }

    #[test]
    fn html401_transitional_with_system_is_limited_quirky() {
        let (err, quirks) = doctype_error_and_quirks(&doctype(
            "html",
            Some("-//W3C//DTD HTML 4.01 Transitional//EN"),
            Some("http://www.w3.org/TR/html4/loose.dtd"),
        ));
        assert!(err);
        assert_eq!(quirks, QuirksMode::LimitedQuirks);
    }

    #[test]
    fn force_quirks_wins() {
        let mut dt = doctype("html", None, None);
        dt.force_quirks = true;
        assert_eq!(doctype_error_and_quirks(&dt).1, QuirksMode::Quirks);
    }
}
