use std::cmp::Ordering;

use proptest::prelude::*;

use super::{IdentifierSet, cmp_ignore_case};

#[test]
fn test_insert_ignores_case_duplicates() {
	let mut set = IdentifierSet::new();
	assert!(set.insert("Alpha"));
	assert!(!set.insert("alpha"));
	assert!(!set.insert("ALPHA"));
	assert_eq!(set.len(), 1);
	// First spelling wins
	assert_eq!(set.get("aLpHa"), Some("Alpha"));
}

#[test]
fn test_iteration_is_case_insensitive_order() {
	let set: IdentifierSet = ["gamma", "Beta", "alpha", "Delta"].into_iter().collect();
	assert_eq!(set.to_vec(), vec!["alpha", "Beta", "Delta", "gamma"]);
}

#[test]
fn test_remove_and_contains_ignore_case() {
	let mut set: IdentifierSet = ["Build", "deploy"].into_iter().collect();
	assert!(set.contains("BUILD"));
	assert!(set.remove("build"));
	assert!(!set.contains("Build"));
	assert!(!set.remove("build"));
	assert_eq!(set.to_vec(), vec!["deploy"]);
}

#[test]
fn test_clear() {
	let mut set: IdentifierSet = ["a", "b"].into_iter().collect();
	set.clear();
	assert!(set.is_empty());
	assert_eq!(set.iter().count(), 0);
}

#[test]
fn test_clone_is_independent() {
	let mut set: IdentifierSet = ["a"].into_iter().collect();
	let copy = set.clone();
	set.insert("b");
	assert_eq!(copy.to_vec(), vec!["a"]);
	assert_eq!(set.len(), 2);
}

#[test]
fn test_serde_as_ordered_list() {
	#[derive(serde::Serialize, serde::Deserialize)]
	struct Doc {
		members: IdentifierSet,
	}

	let doc: Doc = toml::from_str(r#"members = ["zeta", "Alpha", "alpha"]"#).unwrap();
	assert_eq!(doc.members.to_vec(), vec!["Alpha", "zeta"]);

	let out = toml::to_string(&doc).unwrap();
	assert!(out.find("Alpha").unwrap() < out.find("zeta").unwrap());
	assert!(!out.contains("\"alpha\""));
}

#[derive(Debug, Clone)]
enum Op {
	Insert(String),
	Remove(String),
}

fn arb_id() -> impl Strategy<Value = String> {
	"[a-cA-C]{1,3}"
}

fn arb_op() -> impl Strategy<Value = Op> {
	prop_oneof![
		3 => arb_id().prop_map(Op::Insert),
		1 => arb_id().prop_map(Op::Remove),
	]
}

proptest! {
	/// Listing stays sorted and free of case-insensitive duplicates under any mutation sequence.
	#[test]
	fn prop_sorted_and_unique(ops in prop::collection::vec(arb_op(), 0..64)) {
		let mut set = IdentifierSet::new();
		for op in &ops {
			match op {
				Op::Insert(id) => { set.insert(id.clone()); }
				Op::Remove(id) => { set.remove(id); }
			}
		}

		let listed = set.to_vec();
		for pair in listed.windows(2) {
			prop_assert_eq!(cmp_ignore_case(&pair[0], &pair[1]), Ordering::Less);
		}
		prop_assert_eq!(listed.len(), set.len());
	}

	/// Membership agrees with a lowercase model of the same operations.
	#[test]
	fn prop_matches_lowercase_model(ops in prop::collection::vec(arb_op(), 0..64)) {
		let mut set = IdentifierSet::new();
		let mut model = std::collections::BTreeSet::new();
		for op in &ops {
			match op {
				Op::Insert(id) => {
					prop_assert_eq!(set.insert(id.clone()), model.insert(id.to_lowercase()));
				}
				Op::Remove(id) => {
					prop_assert_eq!(set.remove(id), model.remove(&id.to_lowercase()));
				}
			}
		}

		let lowered: Vec<String> = set.iter().map(str::to_lowercase).collect();
		let expected: Vec<String> = model.into_iter().collect();
		prop_assert_eq!(lowered, expected);
	}
}
