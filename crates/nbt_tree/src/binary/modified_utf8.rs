//! Utilities for working with Java's "Modified UTF-8" character encoding.
//!
//! For more information, refer to [Wikipedia].
//!
//! [Wikipedia]: https://en.wikipedia.org/wiki/UTF-8#Modified_UTF-8

use std::io;
use std::io::Write;

pub(crate) fn write_modified_utf8<W: Write>(mut writer: W, text: &str) -> io::Result<()> {
    let mut buf = [0; 4];

    for c in text.chars() {
        match c {
            '\0' => writer.write_all(&[0xc0, 0x80])?,
            c if c.len_utf8() < 4 => writer.write_all(c.encode_utf8(&mut buf).as_bytes())?,
            c => {
                let mut units = [0; 2];
                for surrogate in c.encode_utf16(&mut units) {
                    writer.write_all(&encode_surrogate(*surrogate))?;
                }
            }
        }
    }

    Ok(())
}

fn encode_surrogate(surrogate: u16) -> [u8; 3] {
    debug_assert!((0xd800..=0xdfff).contains(&surrogate));

    const TAG_CONT_U8: u8 = 0b1000_0000_u8;
    [
        0b1110_0000 | ((surrogate & 0b1111_0000_0000_0000) >> 12) as u8,
        TAG_CONT_U8 | ((surrogate & 0b0000_1111_1100_0000) >> 6) as u8,
        TAG_CONT_U8 | (surrogate & 0b0000_0000_0011_1111) as u8,
    ]
}

pub(crate) fn encoded_len(text: &str) -> usize {
    // Fast path for ASCII.
    if text.bytes().all(|b| (1..=127).contains(&b)) {
        return text.len();
    }

    text.chars()
        .map(|c| match c {
            '\0' => 2,
            c if c.len_utf8() == 4 => 6,
            c => c.len_utf8(),
        })
        .sum()
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn equivalence() {
        fn check(s: &str) {
            let mut ours = vec![];

            let theirs = cesu8::to_java_cesu8(s);
            write_modified_utf8(&mut ours, s).unwrap();

            assert_eq!(theirs, ours);
            assert_eq!(theirs.len(), encoded_len(s));
        }

        check("Mary had a little lamb\0");
        check("🤡💩👻💀☠👽👾🤖🎃😺😸😹😻😼😽🙀😿😾");
        check("ÅÆÇÈØõ÷£¥ý");
        check("");
    }

    #[test]
    fn nul_is_two_bytes() {
        let mut out = vec![];
        write_modified_utf8(&mut out, "a\0b").unwrap();

        assert_eq!(out, [b'a', 0xc0, 0x80, b'b']);
        assert_eq!(encoded_len("a\0b"), 4);
    }
}
