use rstest::rstest;

use super::{PatternError, PatternFilter, PatternState, validate_pattern};
use crate::settings::PatternSettings;

fn filter(source: &str) -> PatternFilter {
	PatternFilter::with_source(PatternSettings::default(), Some(source.to_string()))
}

#[rstest]
#[case::prefix("gamma.*", "gamma-test", true)]
#[case::whole_name_only("gamma", "gamma-test", false)]
#[case::no_substring("test", "gamma-test", false)]
#[case::alternation_prefers_whole("a|ab", "ab", true)]
#[case::case_sensitive("Beta", "beta", false)]
#[case::class("[a-z]+-[0-9]+", "build-42", true)]
fn whole_name_matching(#[case] source: &str, #[case] candidate: &str, #[case] expected: bool) {
	assert_eq!(filter(source).matches(candidate), expected);
}

#[test]
fn test_disabled_matches_nothing() {
	let mut f = PatternFilter::new(PatternSettings::default());
	assert!(matches!(f.state(), PatternState::Disabled));
	assert!(!f.matches(""));
	assert!(!f.matches("anything"));
}

#[test]
fn test_invalid_source_is_kept_and_matches_nothing() {
	let mut f = filter("([a-z+");
	assert!(!f.matches("anything"));
	assert!(!f.matches("a"));
	assert_eq!(f.source(), Some("([a-z+"));
	assert!(matches!(f.state(), PatternState::Invalid(PatternError::Syntax(_))));
}

#[test]
fn test_set_source_invalidates_cache() {
	let mut f = filter("([a-z+");
	assert!(!f.matches("abc"));

	f.set_source(Some("[a-z]+".to_string()));
	assert!(f.matches("abc"));

	f.set_source(Some("x".to_string()));
	assert!(!f.matches("abc"));

	f.set_source(None);
	assert!(!f.matches("x"));
	assert!(f.source().is_none());
}

#[test]
fn test_validate_reports_syntax_message() {
	let err = validate_pattern(Some("([a-z+"), &PatternSettings::default()).unwrap_err();
	let PatternError::Syntax(message) = &err else {
		panic!("expected syntax error, got {err:?}");
	};
	assert!(message.contains("unclosed"), "message: {message}");
}

#[test]
fn test_validate_does_not_touch_state() {
	let mut f = filter("[a-z]+");
	assert!(f.validate(Some("(")).is_err());
	assert!(f.matches("abc"));
	assert_eq!(f.source(), Some("[a-z]+"));
}

#[rstest]
#[case::absent(None)]
#[case::empty(Some(""))]
#[case::valid(Some("job-.*"))]
fn validate_accepts(#[case] source: Option<&str>) {
	assert_eq!(validate_pattern(source, &PatternSettings::default()), Ok(()));
}

#[test]
fn test_wrapper_cannot_rebalance_source() {
	let err = validate_pattern(Some("a)|(b"), &PatternSettings::default());
	assert!(matches!(err, Err(PatternError::Syntax(_))));
	assert!(!filter("a)|(b").matches("a"));
}

#[test]
fn test_source_length_cap() {
	let settings = PatternSettings {
		max_source_len: 4,
		..PatternSettings::default()
	};
	assert_eq!(
		validate_pattern(Some("abcde"), &settings),
		Err(PatternError::SourceTooLong { len: 5, limit: 4 })
	);
	assert_eq!(validate_pattern(Some("abcd"), &settings), Ok(()));
}

#[test]
fn test_compiled_size_cap() {
	let settings = PatternSettings {
		size_limit: 256,
		..PatternSettings::default()
	};
	let err = validate_pattern(Some(r"\w{100}"), &settings).unwrap_err();
	assert!(matches!(err, PatternError::TooLarge { .. }), "got {err:?}");
}

#[test]
fn test_case_insensitive_setting() {
	let settings = PatternSettings {
		case_insensitive: true,
		..PatternSettings::default()
	};
	let mut f = PatternFilter::with_source(settings, Some("beta".to_string()));
	assert!(f.matches("Beta"));
}
