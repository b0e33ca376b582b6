use std::sync::Arc;

use vista_view::memory::MemoryCatalog;
use vista_view::{
	AllowAll, NameError, NameTaken, SaveError, ViewConfiguration, ViewError, ViewState,
};

use super::{StoreError, StoreFile, ViewStore};

fn catalog() -> Arc<MemoryCatalog> {
	Arc::new(MemoryCatalog::with_names(["alpha", "Beta", "gamma-test"]))
}

#[test]
fn test_missing_file_opens_empty() {
	let dir = tempfile::tempdir().unwrap();
	let store = ViewStore::open(dir.path().join("views.toml"), catalog()).unwrap();
	assert!(store.views().is_empty());
	assert!(!store.path().exists());
}

#[test]
fn test_configuration_survives_reopen() {
	let dir = tempfile::tempdir().unwrap();
	let path = dir.path().join("nested").join("views.toml");

	let store = ViewStore::open(&path, catalog()).unwrap();
	let view = store.create_view("main").unwrap();
	view.submit_configuration(
		&AllowAll,
		ViewConfiguration {
			name: "release".into(),
			description: Some("release jobs".into()),
			pattern_enabled: true,
			pattern_source: Some("gamma.*".into()),
			selected_members: ["alpha".to_string()].into(),
		},
	)
	.unwrap();
	assert!(path.exists());
	drop(view);
	drop(store);

	let store = ViewStore::open(&path, catalog()).unwrap();
	assert_eq!(store.view_names(), vec!["release"]);
	let view = store.get("release").unwrap();
	assert_eq!(
		view.state(),
		ViewState {
			name: "release".into(),
			description: Some("release jobs".into()),
			members: ["alpha"].into_iter().collect(),
			include_pattern: Some("gamma.*".into()),
		}
	);
	let names: Vec<_> = view.snapshot().iter().map(|i| i.name.clone()).collect();
	assert_eq!(names, vec!["alpha", "gamma-test"]);
}

#[test]
fn test_settings_are_loaded_and_applied() {
	let dir = tempfile::tempdir().unwrap();
	let path = dir.path().join("views.toml");
	std::fs::write(
		&path,
		r#"
[settings.pattern]
case_insensitive = true

[[views]]
name = "b"
include_pattern = "beta"
"#,
	)
	.unwrap();

	let store = ViewStore::open(&path, catalog()).unwrap();
	assert!(store.settings().pattern.case_insensitive);
	let names: Vec<_> = store.get("b").unwrap().snapshot().iter().map(|i| i.name.clone()).collect();
	assert_eq!(names, vec!["Beta"]);
}

#[test]
fn test_parse_error_names_the_file() {
	let dir = tempfile::tempdir().unwrap();
	let path = dir.path().join("views.toml");
	std::fs::write(&path, "views = 3").unwrap();

	let err = ViewStore::open(&path, catalog()).err().unwrap();
	assert!(matches!(err, StoreError::Parse { .. }));
	assert!(err.to_string().contains("views.toml"));
}

#[test]
fn test_create_view_validates() {
	let dir = tempfile::tempdir().unwrap();
	let store = ViewStore::open(dir.path().join("views.toml"), catalog()).unwrap();
	store.create_view("main").unwrap();

	assert!(matches!(store.create_view("main"), Err(StoreError::DuplicateView(_))));
	assert!(matches!(
		store.create_view("a;b"),
		Err(StoreError::InvalidName(NameError::UnsafeChar { ch: ';', .. }))
	));
	assert_eq!(store.view_names(), vec!["main"]);
}

#[test]
fn test_delete_view_through_view() {
	let dir = tempfile::tempdir().unwrap();
	let path = dir.path().join("views.toml");
	let store = ViewStore::open(&path, catalog()).unwrap();
	store.create_view("keep").unwrap();
	let doomed = store.create_view("doomed").unwrap();

	doomed.delete_view(&AllowAll).unwrap();
	assert_eq!(store.view_names(), vec!["keep"]);

	let on_disk: StoreFile = toml::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
	assert_eq!(on_disk.views.len(), 1);
	assert_eq!(on_disk.views[0].name, "keep");

	// Deleting twice reports the missing view.
	assert!(matches!(
		doomed.delete_view(&AllowAll),
		Err(ViewError::Save(SaveError::UnknownView(_)))
	));
}

#[test]
fn test_rename_cannot_take_another_views_name() {
	let dir = tempfile::tempdir().unwrap();
	let store = ViewStore::open(dir.path().join("views.toml"), catalog()).unwrap();
	let keep = store.create_view("keep").unwrap();
	let other = store.create_view("other").unwrap();

	assert!(matches!(
		other.rename(&AllowAll, "keep"),
		Err(ViewError::NameTaken(NameTaken(ref n))) if n == "keep"
	));
	assert!(matches!(
		other.submit_configuration(
			&AllowAll,
			ViewConfiguration {
				name: "keep".into(),
				..ViewConfiguration::default()
			},
		),
		Err(ViewError::NameTaken(_))
	));
	assert_eq!(store.view_names(), vec!["keep", "other"]);

	// Keeping the current name is not a conflict.
	keep.rename(&AllowAll, "keep").unwrap();
}

#[test]
fn test_delete_removes_the_view_itself_after_rename() {
	let dir = tempfile::tempdir().unwrap();
	let store = ViewStore::open(dir.path().join("views.toml"), catalog()).unwrap();
	let keep = store.create_view("keep").unwrap();
	let other = store.create_view("other").unwrap();
	other.rename(&AllowAll, "renamed").unwrap();

	other.delete_view(&AllowAll).unwrap();
	assert_eq!(store.view_names(), vec!["keep"]);
	assert!(store.get_by_id(keep.id()).is_some());
	assert!(store.get_by_id(other.id()).is_none());
}

#[test]
fn test_duplicate_names_in_file_are_rejected() {
	let dir = tempfile::tempdir().unwrap();
	let path = dir.path().join("views.toml");
	std::fs::write(&path, "[[views]]\nname = \"a\"\n\n[[views]]\nname = \"a\"\n").unwrap();

	let err = ViewStore::open(&path, catalog()).err().unwrap();
	assert!(matches!(err, StoreError::DuplicateView(ref n) if n == "a"));
}

#[test]
fn test_view_outliving_store_is_detached() {
	let dir = tempfile::tempdir().unwrap();
	let store = ViewStore::open(dir.path().join("views.toml"), catalog()).unwrap();
	let view = store.create_view("main").unwrap();
	drop(store);

	let err = view.rename(&AllowAll, "other").unwrap_err();
	assert!(matches!(err, ViewError::Save(SaveError::Detached)));
}

#[test]
fn test_no_temp_file_left_behind() {
	let dir = tempfile::tempdir().unwrap();
	let store = ViewStore::open(dir.path().join("views.toml"), catalog()).unwrap();
	store.create_view("main").unwrap();

	let entries: Vec<_> = std::fs::read_dir(dir.path())
		.unwrap()
		.map(|e| e.unwrap().file_name().into_string().unwrap())
		.collect();
	assert_eq!(entries, vec!["views.toml"]);
}
