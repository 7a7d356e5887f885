pub mod text;
pub mod matcher;
pub mod aggregator;

pub use aggregator::ScoreAggregator;
pub use matcher::{BugMatcher, MatcherConfig};

use tracing::{info, warn};

use crate::catalog::BugCatalog;
use crate::models::{AgentOutcome, FrameworkMetrics};
use crate::report::ReportParser;

/// Parser and matcher bundled: scores one agent outcome against a catalog.
#[derive(Debug, Clone, Default)]
pub struct Scorer {
    parser: ReportParser,
    matcher: BugMatcher,
}

impl Scorer {
    pub fn new(parser: ReportParser, matcher: BugMatcher) -> Self {
        Self { parser, matcher }
    }

    pub fn parser(&self) -> &ReportParser {
        &self.parser
    }

    pub fn matcher(&self) -> &BugMatcher {
        &self.matcher
    }

    /// Parse, match, and aggregate one outcome. Failed outcomes skip
    /// matching entirely and keep their error.
    pub fn evaluate(&self, outcome: &AgentOutcome, catalog: &BugCatalog) -> FrameworkMetrics {
        if !outcome.success {
            let error = outcome.error.as_deref().unwrap_or("agent failed without an error message");
            warn!(framework = %outcome.framework, error = %error, "Scoring failed agent as zero");
            return ScoreAggregator::failure(&outcome.framework, catalog, error);
        }

        let claims = self.parser.parse(outcome.response_text());
        let records = self.matcher.match_claims(&claims, catalog.all_bugs());
        let metrics = ScoreAggregator::aggregate(&outcome.framework, catalog, &records);

        info!(
            framework = %outcome.framework,
            claims = claims.len(),
            unique_bugs_found = metrics.unique_bugs_found,
            bugs_found = metrics.bugs_found,
            unmatched = metrics.unmatched_bugs,
            recall = metrics.recall,
            "Scored agent response"
        );
        metrics
    }
}
