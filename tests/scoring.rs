use bugbench::catalog::{BugCatalog, CatalogFormat};
use bugbench::models::{AgentOutcome, KnownBug, MatchType};
use bugbench::scoring::Scorer;

const FIXTURE: &str = include_str!("../fixtures/bug_catalog.json");

fn fixture_catalog() -> BugCatalog {
    BugCatalog::parse(FIXTURE, CatalogFormat::Json, "test_codebase").unwrap()
}

fn single_bug_catalog() -> BugCatalog {
    BugCatalog::new("test_codebase", vec![
        KnownBug::new("cache.py", 44, "Should remove expired entry but doesn't"),
    ])
}

/// Numbered answer naming each picked bug by file, line, and description.
fn enumerate_bugs(catalog: &BugCatalog, picks: &[usize]) -> String {
    let mut response = String::from("Here is my review of the codebase.\n\n");
    for (n, &i) in picks.iter().enumerate() {
        let bug = catalog.get(i).unwrap();
        response.push_str(&format!("{}. {} line {}: {}\n", n + 1, bug.file, bug.line, bug.description));
    }
    response
}

#[test]
fn test_fixture_sizes() {
    assert_eq!(fixture_catalog().count(), 35);
    let train = BugCatalog::parse(FIXTURE, CatalogFormat::Json, "train_codebase").unwrap();
    assert_eq!(train.count(), 27);
}

#[test]
fn test_exact_claim_with_location() {
    let catalog = single_bug_catalog();
    let outcome = AgentOutcome::succeeded(
        "langchain",
        "src/cache.py:44 - Should remove expired entry but doesn't - fix by checking timestamps.",
    );
    let metrics = Scorer::default().evaluate(&outcome, &catalog);

    assert_eq!(metrics.unique_bugs_found, 1);
    assert_eq!(metrics.bugs_found, 1);
    assert_eq!(metrics.recall, 1.0);
    assert_eq!(metrics.unmatched_bugs, 0);
    assert_eq!(metrics.found_bug_details.len(), 1);
    let detail = &metrics.found_bug_details[0];
    assert_eq!(detail.match_type, MatchType::Exact);
    assert_eq!(detail.known_bug, "Should remove expired entry but doesn't");
    assert!(detail.file_match);
    assert!(detail.line_match);
}

#[test]
fn test_irrelevant_claim_is_unmatched() {
    let catalog = single_bug_catalog();
    let outcome = AgentOutcome::succeeded("dspy", "nothing wrong here");
    let metrics = Scorer::default().evaluate(&outcome, &catalog);

    assert_eq!(metrics.unique_bugs_found, 0);
    assert_eq!(metrics.bugs_found, 0);
    assert_eq!(metrics.recall, 0.0);
    assert_eq!(metrics.unmatched_bugs, 1);
    assert_eq!(metrics.found_bug_details.len(), 1);
    assert!(metrics.found_bug_details[0].is_unknown());
    assert_eq!(metrics.found_bug_details[0].match_type, MatchType::None);
    assert_eq!(metrics.missed_bug_indices, vec![0]);
}

#[test]
fn test_every_list_item_is_scored() {
    let catalog = single_bug_catalog();
    let outcome = AgentOutcome::succeeded(
        "autogen",
        "1. src/cache.py:44 Should remove expired entry but doesn't\n\
         2. The helper returns a stale value from the cache\n\
         3. Logging output goes to stdout",
    );
    let metrics = Scorer::default().evaluate(&outcome, &catalog);

    assert_eq!(metrics.unique_bugs_found, 1);
    assert_eq!(metrics.bugs_found, 1);
    assert_eq!(metrics.unmatched_bugs, 2);
    let claim_indices: Vec<Option<usize>> = metrics.found_bug_details.iter().map(|d| d.claim_index).collect();
    assert_eq!(claim_indices, vec![Some(0), Some(1), Some(2)]);
}

#[test]
fn test_failed_agent_scores_zero_and_keeps_error() {
    let catalog = fixture_catalog();
    let outcome = AgentOutcome::failed("autogen", "timeout");
    let metrics = Scorer::default().evaluate(&outcome, &catalog);

    assert_eq!(metrics.bugs_found, 0);
    assert_eq!(metrics.unique_bugs_found, 0);
    assert_eq!(metrics.recall, 0.0);
    assert_eq!(metrics.total_known_bugs, 35);
    assert_eq!(metrics.error.as_deref(), Some("timeout"));
    assert!(metrics.is_failure());
}

#[test]
fn test_ten_distinct_bugs_of_thirty_five() {
    let catalog = fixture_catalog();
    let picks = [1, 6, 8, 12, 15, 17, 19, 23, 29, 33];
    let outcome = AgentOutcome::succeeded("smolagents", enumerate_bugs(&catalog, &picks));
    let metrics = Scorer::default().evaluate(&outcome, &catalog);

    assert_eq!(metrics.unique_bugs_found, 10);
    assert_eq!(metrics.bugs_found, 10);
    assert_eq!(metrics.unmatched_bugs, 0);
    assert!((metrics.recall - 10.0 / 35.0).abs() < 1e-12);
    assert_eq!(metrics.missed_bug_indices.len(), 25);
    assert_eq!(metrics.file_match_rate, 1.0);
    assert_eq!(metrics.line_match_rate, 1.0);

    let found: Vec<i64> = metrics.found_bug_details.iter().map(|d| d.bug_index).collect();
    assert_eq!(found, picks.iter().map(|&i| i as i64).collect::<Vec<_>>());
}

#[test]
fn test_repeated_claims_count_once_for_recall() {
    let catalog = fixture_catalog();
    let bug = catalog.get(1).unwrap();
    let response = format!(
        "1. {} line {}: {}\n2. Again: {}\n",
        bug.file, bug.line, bug.description, bug.description
    );
    let metrics = Scorer::default().evaluate(&AgentOutcome::succeeded("langchain", response), &catalog);

    assert_eq!(metrics.bugs_found, 2);
    assert_eq!(metrics.unique_bugs_found, 1);
    assert!((metrics.recall - 1.0 / 35.0).abs() < 1e-12);
}

#[test]
fn test_shared_description_matches_both_files() {
    let catalog = fixture_catalog();
    let outcome = AgentOutcome::succeeded("llamaindex", "This will fail for non-serializable objects");
    let metrics = Scorer::default().evaluate(&outcome, &catalog);

    assert_eq!(metrics.unique_bugs_found, 2);
    assert_eq!(metrics.bugs_found, 2);
    let indices: Vec<i64> = metrics.found_bug_details.iter().map(|d| d.bug_index).collect();
    assert_eq!(indices, vec![10, 31]);
}

#[test]
fn test_empty_response_scores_zero_without_error() {
    let catalog = fixture_catalog();
    let metrics = Scorer::default().evaluate(&AgentOutcome::succeeded("dspy", ""), &catalog);

    assert!(!metrics.is_failure());
    assert_eq!(metrics.bugs_found, 0);
    assert_eq!(metrics.unmatched_bugs, 0);
    assert!(metrics.found_bug_details.is_empty());
    assert_eq!(metrics.recall, 0.0);
}

#[test]
fn test_empty_catalog_has_zero_recall() {
    let catalog = BugCatalog::new("train_codebase", Vec::new());
    let outcome = AgentOutcome::succeeded("langchain", "1. Off by one error in main.py");
    let metrics = Scorer::default().evaluate(&outcome, &catalog);

    assert_eq!(metrics.total_known_bugs, 0);
    assert_eq!(metrics.recall, 0.0);
    assert_eq!(metrics.unmatched_bugs, 1);
}

#[test]
fn test_scoring_is_idempotent() {
    let catalog = fixture_catalog();
    let outcome = AgentOutcome::succeeded("semantic_kernel", enumerate_bugs(&catalog, &[0, 2, 3, 4, 9, 34]));
    let scorer = Scorer::default();

    let first = serde_json::to_string(&scorer.evaluate(&outcome, &catalog)).unwrap();
    let second = serde_json::to_string(&scorer.evaluate(&outcome, &catalog)).unwrap();
    assert_eq!(first, second);
}

#[test]
fn test_metric_invariants_hold() {
    let catalog = fixture_catalog();
    let responses = [
        enumerate_bugs(&catalog, &[0, 1, 2, 3, 4, 5]),
        "The cache does not handle LRU order properly and data may be lost.".to_string(),
        "- missing validation\n- wrong timezone handling\n- bug in merge of nested dicts".to_string(),
        String::new(),
    ];
    let scorer = Scorer::default();

    for response in responses {
        let metrics = scorer.evaluate(&AgentOutcome::succeeded("any", response), &catalog);
        assert!((0.0..=1.0).contains(&metrics.recall));
        assert!(metrics.unique_bugs_found <= metrics.bugs_found);
        assert!(metrics.unique_bugs_found <= metrics.total_known_bugs);
        assert_eq!(metrics.missed_bug_indices.len() + metrics.unique_bugs_found, 35);
        assert_eq!(
            metrics.found_bug_details.len(),
            metrics.bugs_found + metrics.unmatched_bugs
        );
    }
}
