// Copyright 2025-2026 The parse5ever Project Developers. See the
// COPYRIGHT file at the top-level directory of this distribution.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! A bitmask over characters with Unicode scalar value below 64.
//!
//! The tokenizer's hot states only care about a handful of significant ASCII
//! characters; everything else can be skipped over in bulk. A `SmallCharSet`
//! holds those significant characters, and `nonmember_prefix_len` measures
//! how far a buffer can be consumed without looking at any of them.

/// A set of characters, all of which have scalar value below 64.
#[derive(Copy, Clone, PartialEq, Eq, Debug)]
pub struct SmallCharSet {
    pub bits: u64,
}

impl SmallCharSet {
    fn contains(self, byte: u8) -> bool {
        debug_assert!(byte < 64);
        self.bits & (1 << byte) != 0
    }

    /// Count the number of bytes of characters at the beginning of `buf`
    /// which are not in the set.
    ///
    /// Set members are ASCII, so the returned count always lies on a
    /// character boundary.
    pub fn nonmember_prefix_len(self, buf: &str) -> u32 {
        let mut count = 0;
        for byte in buf.bytes() {
            if byte < 64 && self.contains(byte) {
                break;
            }
            count += 1;
        }
        count
    }
}

/// Build a `SmallCharSet`, e.g. `small_char_set!('a' 'b' 'c')`.
#[macro_export]
macro_rules! small_char_set ( ($($e:expr)+) => (
    $crate::SmallCharSet {
        bits: $( (1 << ($e as usize)) )|+
    }
));

#[cfg(test)]
mod test {
    #[test]
    fn nonmember_prefix() {
        for &c in ['&', '\0'].iter() {
            for x in 0..48u32 {
                for y in 0..48u32 {
                    let mut s = "x".repeat(x as usize);
                    s.push(c);
                    s.push_str(&"x".repeat(y as usize));
                    let set = small_char_set!('&' '\0');

                    assert_eq!(x, set.nonmember_prefix_len(&s));
                }
            }
        }
    }

    #[test]
    fn multibyte_characters_are_skipped_whole() {
        let set = small_char_set!('\0');
        let s = "xx\u{a66e}\x00xx";
        let n = set.nonmember_prefix_len(s) as usize;
        assert!(s.is_char_boundary(n));
        assert_eq!(&s[..n], "xx\u{a66e}");
    }
}
