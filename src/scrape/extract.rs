use std::sync::OnceLock;

use regex::Regex;

/// Phrases that mean an empty line. Checked before any numeric scan because
/// "0 parties" embeds a digit the regex would also match.
const ZERO_PHRASES: [&str; 3] = ["no one", "no parties", "0 parties"];

fn digit_run() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"\d+").expect("digit regex"))
}

/// Outcome of parsing one line-status text.
/// `ambiguous` is set when the text carried neither a zero phrase nor a
/// number; `parties` is 0 in that case and the caller decides how loudly to
/// complain.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Extraction {
    pub parties: u32,
    pub ambiguous: bool,
}

impl Extraction {
    fn count(parties: u32) -> Self {
        Extraction { parties, ambiguous: false }
    }
}

/// Parse a party count out of visible line-status text.
/// Pure: no I/O, same input always yields the same output.
pub fn parse_line_count(text: &str) -> Extraction {
    let text = text.to_lowercase();
    let text = text.trim();

    if ZERO_PHRASES.iter().any(|phrase| text.contains(phrase)) {
        return Extraction::count(0);
    }

    // First maximal run of decimal digits wins.
    if let Some(m) = digit_run().find(text) {
        // \d+ on trimmed text; only fails on a run too long for u32
        if let Ok(n) = m.as_str().parse::<u32>() {
            return Extraction::count(n);
        }
    }

    Extraction { parties: 0, ambiguous: true }
}
