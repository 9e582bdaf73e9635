//! ASCII folding for slug input.
//!
//! ## Summary
//! Maps accented Latin letters, ligatures and fullwidth/circled forms to a
//! plain ASCII approximation. Characters outside the table are left alone;
//! the tokenizer turns whatever remains non-ASCII into hyphens.

use std::borrow::Cow;
use std::collections::HashMap;
use std::sync::LazyLock;

/// Fold targets and the characters that fold to them.
///
/// A character belongs to the first entry that lists it, so the German
/// diaeresis digraphs win over the plain vowel entries further down.
const FOLD_TABLE: &[(&str, &str)] = &[
    ("ae", "äæǽ"),
    ("oe", "öœ"),
    ("ue", "ü"),
    ("Ae", "Ä"),
    ("Ue", "Ü"),
    ("Oe", "Ö"),
    ("A", "ÀÁÂÃÄÅǺĀĂĄǍẠẢẤẦẨẪẬẮẰẲẴẶ"),
    ("a", "àáâãåǻāăąǎªạảấầẩẫậắằẳẵặ"),
    ("C", "ÇĆĈĊČ"),
    ("c", "çćĉċč"),
    ("D", "ÐĎĐ"),
    ("d", "ðďđ"),
    ("E", "ÈÉÊËĒĔĖĘĚẸẺẼẾỀỂỄỆ"),
    ("e", "èéêëēĕėęěẹẻẽếềểễệ"),
    ("G", "ĜĞĠĢ"),
    ("g", "ĝğġģ"),
    ("H", "ĤĦ"),
    ("h", "ĥħ"),
    ("I", "ÌÍÎÏĨĪĬǏĮİỈỊ"),
    ("i", "ìíîïĩīĭǐįıỉị"),
    ("J", "Ĵ"),
    ("j", "ĵ"),
    ("K", "Ķ"),
    ("k", "ķĸ"),
    ("L", "ĹĻĽĿŁ"),
    ("l", "ĺļľŀł"),
    ("N", "ÑŃŅŇ"),
    ("n", "ñńņňŉ"),
    ("O", "ÒÓÔÕÖŌŎǑŐƠØǾỌỎỐỒỔỖỘỚỜỞỠỢ"),
    ("o", "òóôõōŏǒőơøǿºọỏốồổỗộớờởỡợ"),
    ("R", "ŔŖŘ"),
    ("r", "ŕŗř"),
    ("S", "ŚŜŞŠȘ"),
    ("s", "śŝşšſș"),
    ("T", "ŢŤŦȚ"),
    ("t", "ţťŧț"),
    ("U", "ÙÚÛÜŨŪŬŮŰŲƯǓǕǗǙǛỤỦỨỪỬỮỰ"),
    ("u", "ùúûũūŭůűųưǔǖǘǚǜụủứừửữự"),
    ("Y", "ÝŸŶỲỴỶỸ"),
    ("y", "ýÿŷỳỵỷỹ"),
    ("W", "ŴẀẂẄ"),
    ("w", "ŵẁẃẅ"),
    ("Z", "ŹŻŽ"),
    ("z", "źżž"),
    ("AE", "ÆǼ"),
    ("ss", "ß"),
    ("SS", "ẞ"),
    ("IJ", "Ĳ"),
    ("ij", "ĳ"),
    ("OE", "Œ"),
    ("TH", "Þ"),
    ("th", "þ"),
    ("NG", "Ŋ"),
    ("ng", "ŋ"),
    ("DZ", "Ǆ"),
    ("Dz", "ǅ"),
    ("dz", "ǆ"),
    ("LJ", "Ǉ"),
    ("Lj", "ǈ"),
    ("lj", "ǉ"),
    ("NJ", "Ǌ"),
    ("Nj", "ǋ"),
    ("nj", "ǌ"),
    ("f", "ƒ"),
    ("ff", "ﬀ"),
    ("fi", "ﬁ"),
    ("fl", "ﬂ"),
    ("ffi", "ﬃ"),
    ("ffl", "ﬄ"),
    ("st", "ﬅﬆ"),
    ("0", "⓪"),
    ("1", "¹"),
    ("2", "²"),
    ("3", "³"),
];

const DIGITS: &str = "0123456789";
const UPPER: &str = "ABCDEFGHIJKLMNOPQRSTUVWXYZ";
const LOWER: &str = "abcdefghijklmnopqrstuvwxyz";

/// Contiguous code point blocks that fold onto a run of ASCII characters.
const FOLD_RANGES: &[(u32, &str)] = &[
    // Fullwidth digits and letters
    (0xFF10, DIGITS),
    (0xFF21, UPPER),
    (0xFF41, LOWER),
    // Circled digits one through nine, circled letters
    (0x2460, "123456789"),
    (0x24B6, UPPER),
    (0x24D0, LOWER),
];

static FOLD_MAP: LazyLock<HashMap<char, &'static str>> = LazyLock::new(build_fold_map);

fn build_fold_map() -> HashMap<char, &'static str> {
    let mut map = HashMap::new();

    for &(target, sources) in FOLD_TABLE {
        for source in sources.chars() {
            map.entry(source).or_insert(target);
        }
    }

    for &(start, targets) in FOLD_RANGES {
        for (offset, (index, _)) in (0_u32..).zip(targets.char_indices()) {
            if let Some(source) = char::from_u32(start + offset) {
                map.entry(source).or_insert(&targets[index..=index]);
            }
        }
    }

    map
}

/// ## Summary
/// Returns the ASCII replacement for a single character, if the fold table
/// covers it.
#[must_use]
pub fn fold_char(c: char) -> Option<&'static str> {
    FOLD_MAP.get(&c).copied()
}

/// Every character the fold table covers, with its replacement. Unordered.
pub fn folded_chars() -> impl Iterator<Item = (char, &'static str)> {
    FOLD_MAP.iter().map(|(&c, &ascii)| (c, ascii))
}

/// ## Summary
/// Replaces every fold-table character in `input` with its ASCII form.
///
/// Folding is a single pass; replacements are never folded again. Input
/// without any foldable character is returned borrowed.
///
/// Examples:
/// - "Crème Brûlée" -> "Creme Brulee"
/// - "Straße" -> "Strasse"
/// - "Ĳsselmeer" -> "IJsselmeer"
#[must_use]
pub fn transliterate(input: &str) -> Cow<'_, str> {
    if !input.chars().any(|c| fold_char(c).is_some()) {
        return Cow::Borrowed(input);
    }

    let mut folded = String::with_capacity(input.len());
    for c in input.chars() {
        match fold_char(c) {
            Some(ascii) => folded.push_str(ascii),
            None => folded.push(c),
        }
    }
    Cow::Owned(folded)
}
