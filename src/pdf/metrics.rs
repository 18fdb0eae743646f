//! Glyph advance widths for the standard Helvetica Type1 font, in 1/1000 em.
//!
//! Only printable ASCII is tabulated; anything else is measured as an average
//! glyph. Bold and oblique faces are measured with the regular table, which
//! is close enough for alignment.

const FIRST: u32 = 32;
const FALLBACK: u16 = 556;

#[rustfmt::skip]
const HELVETICA: [u16; 95] = [
    278, 278, 355, 556, 556, 889, 667, 191, 333, 333, 389, 584, 278, 333, 278, 278, // ' '..'/'
    556, 556, 556, 556, 556, 556, 556, 556, 556, 556,                               // '0'..'9'
    278, 278, 584, 584, 584, 556, 1015,                                             // ':'..'@'
    667, 667, 722, 722, 667, 611, 778, 722, 278, 500, 667, 556, 833,                // 'A'..'M'
    722, 778, 667, 778, 722, 667, 611, 722, 667, 944, 667, 667, 611,                // 'N'..'Z'
    278, 278, 278, 469, 556, 333,                                                   // '['..'`'
    556, 556, 500, 556, 556, 278, 556, 556, 222, 222, 500, 222, 833,                // 'a'..'m'
    556, 556, 556, 556, 333, 500, 278, 556, 500, 722, 500, 500, 500,                // 'n'..'z'
    334, 260, 334, 584,                                                             // '{'..'~'
];

fn glyph_width(c: char) -> u16 {
    (c as u32)
        .checked_sub(FIRST)
        .and_then(|i| HELVETICA.get(i as usize))
        .copied()
        .unwrap_or(FALLBACK)
}

/// Rendered width of `text` in points at `size`.
pub fn text_width(text: &str, size: f32) -> f32 {
    let units: u32 = text.chars().map(|c| u32::from(glyph_width(c))).sum();
    units as f32 * size / 1000.0
}

/// Break `text` into lines no wider than `max_width`.
///
/// Lines break at whitespace; a single word wider than the column is split
/// between characters. Nothing is dropped, and joining the lines with single
/// spaces gives back the text with its whitespace collapsed. Always returns
/// at least one (possibly empty) line.
pub fn wrap(text: &str, size: f32, max_width: f32) -> Vec<String> {
    let fits = |line: &str| text_width(line, size) <= max_width;
    let mut lines = Vec::new();
    let mut current = String::new();

    for word in text.split_whitespace() {
        if !current.is_empty() && fits(&format!("{current} {word}")) {
            current.push(' ');
            current.push_str(word);
            continue;
        }
        if !current.is_empty() {
            lines.push(std::mem::take(&mut current));
        }
        if fits(word) {
            current.push_str(word);
            continue;
        }
        for c in word.chars() {
            current.push(c);
            if current.chars().count() > 1 && !fits(&current) {
                current.pop();
                lines.push(std::mem::replace(&mut current, c.to_string()));
            }
        }
    }
    if !current.is_empty() || lines.is_empty() {
        lines.push(current);
    }
    lines
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn digits_are_fixed_width() {
        assert_eq!(text_width("0", 10.0), 5.56);
        assert_eq!(text_width("1234", 10.0), text_width("9999", 10.0));
    }

    #[test]
    fn table_covers_printable_ascii() {
        assert_eq!(glyph_width(' '), 278);
        assert_eq!(glyph_width('A'), 667);
        assert_eq!(glyph_width('a'), 556);
        assert_eq!(glyph_width('~'), 584);
        assert_eq!(glyph_width('\u{e9}'), FALLBACK);
    }

    #[test]
    fn wrap_keeps_every_word_within_width() {
        let address = "Flat 4B, Lakeview Residency, 221 Old Airport Road, Near Metro Pillar 57, \
                       Indiranagar 2nd Stage, Springfield 560001";
        let lines = wrap(address, 10.0, 150.0);
        assert!(lines.len() > 1);
        for line in &lines {
            assert!(text_width(line, 10.0) <= 150.0, "{line:?} too wide");
        }
        let collapsed: Vec<&str> = address.split_whitespace().collect();
        assert_eq!(lines.join(" "), collapsed.join(" "));
        assert!(lines.last().unwrap().ends_with("560001"));
    }

    #[test]
    fn wrap_splits_overlong_words() {
        let word = "X".repeat(40);
        let lines = wrap(&word, 10.0, 50.0);
        assert!(lines.len() > 1);
        assert_eq!(lines.concat(), word);
        assert!(lines.iter().all(|l| text_width(l, 10.0) <= 50.0));
    }

    #[test]
    fn wrap_short_and_empty_text() {
        assert_eq!(wrap("short", 10.0, 100.0), vec!["short".to_string()]);
        assert_eq!(wrap("", 10.0, 100.0), vec![String::new()]);
    }
}
