use std::collections::{BTreeSet, HashSet};

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::models::{Claim, KnownBug, MatchRecord, MatchType};
use super::text::{self, DEFAULT_STOP_WORDS};

pub const DEFAULT_KEYWORD_THRESHOLD: f64 = 0.6;
pub const DEFAULT_MIN_TOKEN_LENGTH: usize = 3;

// Absorbs float rounding so a ratio sitting exactly on the threshold
// always counts as a match.
const THRESHOLD_EPSILON: f64 = 1e-9;

/// Tunable constants of the two matching tiers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatcherConfig {
    /// Minimum share of a description's content words the claim must contain.
    pub keyword_threshold: f64,
    /// Shorter tokens are never content words.
    pub min_token_length: usize,
    pub stop_words: Vec<String>,
}

impl Default for MatcherConfig {
    fn default() -> Self {
        Self {
            keyword_threshold: DEFAULT_KEYWORD_THRESHOLD,
            min_token_length: DEFAULT_MIN_TOKEN_LENGTH,
            stop_words: DEFAULT_STOP_WORDS.iter().map(|s| s.to_string()).collect(),
        }
    }
}

/// Text prepared once for repeated comparisons.
#[derive(Debug, Clone)]
struct Prepared {
    /// Normalized text padded with a space on both sides, so substring
    /// checks only succeed on whole-word boundaries.
    padded: String,
    tokens: HashSet<String>,
    content: BTreeSet<String>,
}

/// Decides which known bugs a claim reports.
///
/// Per (claim, bug) pair the exact tier runs first: the claim contains the
/// normalized description on word boundaries, restates it verbatim, or is a
/// word-aligned fragment of it carrying at least `keyword_threshold` of its
/// content words. Failing that, the keyword tier matches when the claim
/// contains at least `keyword_threshold` of the description's distinct
/// content words. A pure function of its inputs.
#[derive(Debug, Clone)]
pub struct BugMatcher {
    config: MatcherConfig,
    stop_words: HashSet<String>,
}

impl Default for BugMatcher {
    fn default() -> Self {
        Self::new(MatcherConfig::default())
    }
}

impl BugMatcher {
    pub fn new(config: MatcherConfig) -> Self {
        let stop_words = config.stop_words.iter().map(|w| text::normalize(w)).collect();
        Self { config, stop_words }
    }

    pub fn config(&self) -> &MatcherConfig {
        &self.config
    }

    pub fn content_words(&self, text: &str) -> BTreeSet<String> {
        text::content_words(text, self.config.min_token_length, &self.stop_words)
    }

    fn prepare(&self, text: &str) -> Prepared {
        Prepared {
            padded: format!(" {} ", text::normalize(text)),
            tokens: text::tokens(text),
            content: self.content_words(text),
        }
    }

    /// Match one claim text against one known bug.
    pub fn match_pair(&self, claim_text: &str, bug: &KnownBug) -> MatchType {
        self.decide(&self.prepare(claim_text), &self.prepare(&bug.description))
    }

    fn decide(&self, claim: &Prepared, bug: &Prepared) -> MatchType {
        // A verbatim restatement matches even a description made only of stop words.
        if claim.padded == bug.padded && !bug.padded.trim().is_empty() {
            return MatchType::Exact;
        }

        // A side with no content words shares nothing meaningful with the other.
        let bug_contained = !bug.content.is_empty() && claim.padded.contains(&bug.padded);
        // A fragment of the description must still carry enough of its content words.
        let claim_contained = !claim.content.is_empty()
            && bug.padded.contains(&claim.padded)
            && self.covers(claim, bug);
        if bug_contained || claim_contained {
            return MatchType::Exact;
        }

        if self.covers(claim, bug) {
            MatchType::Keyword
        } else {
            MatchType::None
        }
    }

    /// Whether the claim holds at least `keyword_threshold` of the
    /// description's distinct content words.
    fn covers(&self, claim: &Prepared, bug: &Prepared) -> bool {
        if bug.content.is_empty() {
            return false;
        }
        let hits = bug.content.iter().filter(|w| claim.tokens.contains(*w)).count();
        let ratio = hits as f64 / bug.content.len() as f64;
        hits > 0 && ratio + THRESHOLD_EPSILON >= self.config.keyword_threshold
    }

    /// Match every claim, in order, against every known bug.
    ///
    /// Emits one record per (claim, bug) match, one unmatched record per claim
    /// that matched nothing, then one `missed_bug` record per known bug no
    /// claim matched, in catalog order.
    pub fn match_claims(&self, claims: &[Claim], bugs: &[KnownBug]) -> Vec<MatchRecord> {
        let prepared_bugs: Vec<Prepared> = bugs.iter().map(|b| self.prepare(&b.description)).collect();
        let mut hit = vec![false; bugs.len()];
        let mut records = Vec::new();

        for claim in claims {
            let prepared = self.prepare(&claim.text);
            let mut matched_any = false;

            for (bug_index, (bug, prepared_bug)) in bugs.iter().zip(&prepared_bugs).enumerate() {
                let match_type = self.decide(&prepared, prepared_bug);
                if match_type == MatchType::None {
                    continue;
                }
                matched_any = true;
                hit[bug_index] = true;
                let location = claim.location.as_ref();
                records.push(MatchRecord {
                    bug_index: Some(bug_index),
                    claim_index: Some(claim.index),
                    claim_text: claim.text.clone(),
                    match_type,
                    matched: true,
                    file_match: location.map_or(false, |l| l.file_agrees(bug)),
                    line_match: location.map_or(false, |l| l.line_agrees(bug)),
                });
                debug!(
                    claim = claim.index,
                    bug = %bug.location(),
                    match_type = %match_type,
                    "Claim matched known bug"
                );
            }

            if !matched_any {
                debug!(claim = claim.index, "Claim matched no known bug");
                records.push(MatchRecord::unmatched_claim(claim.index, claim.text.clone()));
            }
        }

        records.extend(
            hit.iter()
                .enumerate()
                .filter(|(_, found)| !**found)
                .map(|(bug_index, _)| MatchRecord::missed_bug(bug_index)),
        );
        records
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::ClaimLocation;

    fn bug(description: &str) -> KnownBug {
        KnownBug::new("src/cache.py", 44, description)
    }

    fn claim(index: usize, text: &str) -> Claim {
        Claim { index, text: text.to_string(), start_line: index + 1, location: None }
    }

    #[test]
    fn test_verbatim_description_is_exact() {
        let matcher = BugMatcher::default();
        let b = bug("Should remove expired entry but doesn't");
        assert_eq!(matcher.match_pair("Should remove expired entry but doesn't", &b), MatchType::Exact);
        assert_eq!(matcher.match_pair("  SHOULD remove\texpired   entry BUT doesn't ", &b), MatchType::Exact);
    }

    #[test]
    fn test_description_inside_longer_claim_is_exact() {
        let matcher = BugMatcher::default();
        let b = bug("Should remove expired entry but doesn't");
        let text = "src/cache.py:44 - Should remove expired entry but doesn't \u{2014} fix by checking timestamps.";
        assert_eq!(matcher.match_pair(text, &b), MatchType::Exact);
    }

    #[test]
    fn test_claim_inside_description_is_exact() {
        let matcher = BugMatcher::default();
        let b = bug("Using OrderedDict for LRU but not maintaining order properly");
        // four of six content words: using, ordereddict, lru, maintaining, order, properly
        assert_eq!(matcher.match_pair("OrderedDict for LRU but not maintaining order", &b), MatchType::Exact);
    }

    #[test]
    fn test_short_fragment_of_description_is_not_exact() {
        let matcher = BugMatcher::default();
        let b = bug("Should remove expired entry but doesn't");
        assert_eq!(matcher.match_pair("entry", &b), MatchType::None);
        let b = bug("Using OrderedDict for LRU but not maintaining order properly");
        assert_eq!(matcher.match_pair("not maintaining order properly", &b), MatchType::None);
    }

    #[test]
    fn test_verbatim_stop_word_description_is_exact() {
        let matcher = BugMatcher::default();
        assert_eq!(matcher.match_pair("No-op", &KnownBug::new("a.py", 1, "No-op")), MatchType::Exact);
        assert_eq!(matcher.match_pair("it is", &bug("It is")), MatchType::Exact);
        assert_eq!(matcher.match_pair("no", &bug("No-op")), MatchType::None);
    }

    #[test]
    fn test_exact_requires_word_boundaries() {
        let matcher = BugMatcher::default();
        let b = bug("Should remove expired entry but doesn't");
        // "ould remove" is a raw substring but not a word-aligned one
        assert_eq!(matcher.match_pair("ould remove", &b), MatchType::None);
    }

    #[test]
    fn test_stop_word_only_claim_never_matches() {
        let matcher = BugMatcher::default();
        let b = bug("Should remove expired entry but doesn't");
        assert_eq!(matcher.match_pair("but doesn't", &b), MatchType::None);
    }

    #[test]
    fn test_paraphrase_matches_keyword_tier() {
        let matcher = BugMatcher::default();
        let b = bug("Should move entry to end of OrderedDict to maintain LRU order");
        // content words: move, entry, end, ordereddict, maintain, lru, order
        let text = "get() never calls move_to_end, so the LRU order of the OrderedDict is not maintained; the entry should move";
        assert_eq!(matcher.match_pair(text, &b), MatchType::Keyword);
    }

    #[test]
    fn test_keyword_threshold_is_inclusive() {
        let matcher = BugMatcher::new(MatcherConfig { keyword_threshold: 0.6, ..Default::default() });
        // five content words: alpha, bravo, charlie, delta, echo
        let b = bug("alpha bravo charlie delta echo");
        assert_eq!(matcher.match_pair("echo charlie alpha", &b), MatchType::Keyword);
        assert_eq!(matcher.match_pair("echo alpha", &b), MatchType::None);
    }

    #[test]
    fn test_disjoint_claim_never_matches() {
        let matcher = BugMatcher::default();
        let b = bug("Should remove expired entry but doesn't");
        assert_eq!(matcher.match_pair("nothing wrong here", &b), MatchType::None);
    }

    #[test]
    fn test_exact_wins_over_keyword() {
        let matcher = BugMatcher::new(MatcherConfig { keyword_threshold: 0.1, ..Default::default() });
        let b = bug("Doesn't validate that the input is a list");
        assert_eq!(matcher.match_pair("It doesn't validate that the input is a list.", &b), MatchType::Exact);
    }

    #[test]
    fn test_match_claims_records_every_matching_bug() {
        let matcher = BugMatcher::default();
        let bugs = vec![
            KnownBug::new("src/utils.py", 111, "This will fail for non-serializable objects"),
            KnownBug::new("src/data_processor.py", 133, "This will fail for non-serializable objects"),
            KnownBug::new("src/cache.py", 44, "Should remove expired entry but doesn't"),
        ];
        let claims = vec![claim(0, "json.dumps will fail for non-serializable objects")];
        let records = matcher.match_claims(&claims, &bugs);

        let matched: Vec<_> = records.iter().filter(|r| r.matched).collect();
        assert_eq!(matched.len(), 2);
        assert_eq!(matched[0].bug_index, Some(0));
        assert_eq!(matched[1].bug_index, Some(1));
        // the cache bug was never reported
        assert_eq!(records.last().unwrap(), &MatchRecord::missed_bug(2));
    }

    #[test]
    fn test_match_claims_emits_unmatched_record() {
        let matcher = BugMatcher::default();
        let bugs = vec![bug("Should remove expired entry but doesn't")];
        let records = matcher.match_claims(&[claim(0, "nothing wrong here")], &bugs);
        assert_eq!(records.len(), 2);
        assert!(records[0].is_unmatched_claim());
        assert_eq!(records[0].match_type, MatchType::None);
        assert_eq!(records[1], MatchRecord::missed_bug(0));
    }

    #[test]
    fn test_match_claims_carries_location_agreement() {
        let matcher = BugMatcher::default();
        let bugs = vec![bug("Should remove expired entry but doesn't")];
        let mut c = claim(0, "cache.py line 44: should remove expired entry but doesn't");
        c.location = Some(ClaimLocation { file: Some("cache.py".into()), line: Some(44) });
        let records = matcher.match_claims(&[c], &bugs);
        assert!(records[0].file_match);
        assert!(records[0].line_match);
    }

    #[test]
    fn test_custom_stop_words_are_normalized() {
        let matcher = BugMatcher::new(MatcherConfig {
            stop_words: vec!["Entry".to_string()],
            ..Default::default()
        });
        let words = matcher.content_words("expired entry");
        assert!(words.contains("expired"));
        assert!(!words.contains("entry"));
    }
}
