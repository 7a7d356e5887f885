use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::models::{Claim, ClaimLocation};
use crate::scoring::text;

/// Words that mark a block of prose as a bug report. Matched as word
/// prefixes of the normalized text (`fail` covers `fails`, `failure`).
pub const DEFAULT_INDICATORS: &[&str] = &[
    "bug", "issue", "problem", "error", "incorrect", "wrong", "missing",
    "should", "improper", "invalid", "fail", "doesnt", "never", "typo",
    "leak", "redundant", "instead",
];

static ORDINAL: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)^(?:\d{1,3}[.)]|\(\d{1,3}\)|(?:\*\*)?(?:bug|issue)\s*#?\d{1,3}\b)")
        .expect("ordinal marker regex")
});
static BULLET: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[-*+\u{2022}]\s").expect("bullet marker regex")
});
static HEADING: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^#{1,6}\s+(.*)$").expect("heading regex")
});
static BUG_COMMENT: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)^#\s*bug:").expect("bug comment regex")
});
static HEADING_ITEM: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)^(?:\*\*)?(?:\d{1,3}[.):]|(?:bug|issue)\s*#?\d{1,3}\b)").expect("heading item regex")
});
static SOURCE_FILE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)([A-Za-z0-9_\-./\\]*[A-Za-z0-9_]\.(?:py|rs|js|jsx|ts|tsx|go|java|rb|c|cc|cpp|h|hpp|cs|kt|swift|php))\b(?::(\d{1,6}))?")
        .expect("source file regex")
});
static LINE_REF: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)(?:\blines?\s*[:#]?\s*|\bL)(\d{1,6})\b").expect("line reference regex")
});

/// Tunables of the report parser.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParserConfig {
    pub indicators: Vec<String>,
}

impl Default for ParserConfig {
    fn default() -> Self {
        Self {
            indicators: DEFAULT_INDICATORS.iter().map(|s| s.to_string()).collect(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Opener {
    /// Numbered item, bullet, or a quoted `# BUG:` comment at this indent.
    Item(usize),
    /// Heading that names one bug; owns everything up to the next heading.
    ItemHeading,
    /// Heading that titles a section; owns prose but not list items.
    SectionHeading,
}

enum LineKind<'a> {
    Blank,
    Marker(usize),
    Heading { item: bool, title: &'a str },
    Text(usize),
}

#[derive(Debug)]
struct Block {
    lines: Vec<String>,
    start_line: usize,
    opener: Option<Opener>,
}

impl Block {
    fn new(start_line: usize, opener: Option<Opener>) -> Self {
        Self { lines: Vec::new(), start_line, opener }
    }

    fn is_heading_only(&self) -> bool {
        matches!(self.opener, Some(Opener::ItemHeading | Opener::SectionHeading))
            && self.lines.iter().filter(|l| !l.trim().is_empty()).count() <= 1
    }

    /// Numbered items, bullets, and headings naming one bug are claims
    /// by their shape alone.
    fn is_item(&self) -> bool {
        matches!(self.opener, Some(Opener::Item(_) | Opener::ItemHeading))
    }

    fn text(&self) -> String {
        self.lines.join("\n").trim().to_string()
    }
}

/// Splits an agent's free-text answer into ordered bug claims.
#[derive(Debug, Clone)]
pub struct ReportParser {
    indicators: Vec<String>,
}

impl Default for ReportParser {
    fn default() -> Self {
        Self::new(ParserConfig::default())
    }
}

impl ReportParser {
    pub fn new(config: ParserConfig) -> Self {
        let indicators = config.indicators.iter()
            .map(|i| text::normalize(i))
            .filter(|i| !i.is_empty())
            .collect();
        Self { indicators }
    }

    /// Cut `response` into claims, in order of appearance.
    ///
    /// An empty response yields no claims. List items always become claims;
    /// plain paragraphs only when they read like a bug report. When no
    /// boundaries can be found, or nothing qualifies, the whole response is
    /// one claim.
    pub fn parse(&self, response: &str) -> Vec<Claim> {
        if response.trim().is_empty() {
            return Vec::new();
        }

        let blocks = split_blocks(response);
        let kept: Vec<&Block> = if blocks.len() > 1 {
            blocks.iter()
                .filter(|b| !b.is_heading_only())
                .filter(|b| b.is_item() || self.reads_like_report(&b.text()))
                .collect()
        } else {
            Vec::new()
        };

        if kept.is_empty() {
            debug!(blocks = blocks.len(), "No claim boundaries detected, using whole response as one claim");
            let start_line = response.lines().position(|l| !l.trim().is_empty()).unwrap_or(0) + 1;
            return vec![make_claim(0, response.trim().to_string(), start_line)];
        }

        debug!(blocks = blocks.len(), claims = kept.len(), "Split response into claims");
        kept.into_iter()
            .enumerate()
            .map(|(index, block)| make_claim(index, block.text(), block.start_line))
            .collect()
    }

    fn reads_like_report(&self, block_text: &str) -> bool {
        if extract_location(block_text).is_some() {
            return true;
        }
        let normalized = text::normalize(block_text);
        normalized.split(' ').any(|word| self.indicators.iter().any(|i| word.starts_with(i.as_str())))
    }
}

fn make_claim(index: usize, text: String, start_line: usize) -> Claim {
    let location = extract_location(&text);
    Claim { index, text, start_line, location }
}

fn classify(line: &str) -> LineKind<'_> {
    if line.trim().is_empty() {
        return LineKind::Blank;
    }
    let indent = indentation(line);
    let body = line.trim_start();

    if BUG_COMMENT.is_match(body) {
        return LineKind::Marker(indent);
    }
    if let Some(caps) = HEADING.captures(body) {
        let title = caps.get(1).map_or("", |m| m.as_str()).trim();
        let item = HEADING_ITEM.is_match(title) || SOURCE_FILE.is_match(title);
        return LineKind::Heading { item, title };
    }
    if ORDINAL.is_match(body) || BULLET.is_match(body) {
        return LineKind::Marker(indent);
    }
    LineKind::Text(indent)
}

fn indentation(line: &str) -> usize {
    line.chars()
        .take_while(|c| c.is_whitespace())
        .map(|c| if c == '\t' { 4 } else { 1 })
        .sum()
}

fn is_fence(line: &str) -> bool {
    let body = line.trim_start();
    body.starts_with("```") || body.starts_with("~~~")
}

/// Group the response's lines into blocks, one per candidate claim.
fn split_blocks(response: &str) -> Vec<Block> {
    let mut blocks: Vec<Block> = Vec::new();
    let mut current: Option<Block> = None;
    let mut pending_blank = false;
    let mut in_fence = false;

    for (i, line) in response.lines().enumerate() {
        let line_no = i + 1;

        // Code blocks are opaque: they belong to whatever block they sit in.
        if in_fence || is_fence(line) {
            if is_fence(line) {
                in_fence = !in_fence;
            }
            let block = current.get_or_insert_with(|| Block::new(line_no, None));
            block.lines.push(line.to_string());
            pending_blank = false;
            continue;
        }

        let kind = classify(line);
        let opener = current.as_ref().and_then(|b| b.opener);

        let continues = match (&kind, opener) {
            (LineKind::Blank, _) => {
                if current.is_some() {
                    pending_blank = true;
                }
                continue;
            }
            (LineKind::Heading { .. }, _) => false,
            (_, Some(Opener::ItemHeading)) => true,
            (LineKind::Marker(_), Some(Opener::SectionHeading)) => false,
            (LineKind::Text(_), Some(Opener::SectionHeading)) => true,
            (LineKind::Marker(indent), Some(Opener::Item(open))) => *indent > open,
            (LineKind::Marker(_), None) => false,
            (LineKind::Text(indent), Some(Opener::Item(open))) => !pending_blank || *indent > open,
            (LineKind::Text(_), None) => current.is_some() && !pending_blank,
        };
        pending_blank = false;

        if continues {
            if let Some(block) = current.as_mut() {
                block.lines.push(line.to_string());
            }
            continue;
        }

        if let Some(done) = current.take() {
            blocks.push(done);
        }
        let new_opener = match kind {
            LineKind::Marker(indent) => Some(Opener::Item(indent)),
            LineKind::Heading { item: true, .. } => Some(Opener::ItemHeading),
            LineKind::Heading { item: false, title } => {
                debug!(title = %title, "Section heading");
                Some(Opener::SectionHeading)
            }
            LineKind::Text(_) | LineKind::Blank => None,
        };
        let mut block = Block::new(line_no, new_opener);
        block.lines.push(line.to_string());
        current = Some(block);
    }

    if let Some(done) = current.take() {
        blocks.push(done);
    }
    blocks
}

/// File and line a piece of text points at, if it names either.
pub fn extract_location(text: &str) -> Option<ClaimLocation> {
    let mut location = ClaimLocation::default();

    if let Some(caps) = SOURCE_FILE.captures(text) {
        location.file = caps.get(1).map(|m| m.as_str().replace('\\', "/"));
        location.line = caps.get(2).and_then(|m| m.as_str().parse().ok());
    }
    if location.line.is_none() {
        location.line = LINE_REF.captures(text)
            .and_then(|caps| caps.get(1))
            .and_then(|m| m.as_str().parse().ok());
    }

    if location.is_empty() {
        None
    } else {
        Some(location)
    }
}
