use foldermeta_query::{CatalogSummary, Lifecycle, ProjectFilter, ProjectQuery};
use foldermeta_scan::fixture::TempRepo;
use foldermeta_scan::{Marker, ProjectInfo};

fn info(language: &str, team: &str, lifecycle: Lifecycle, tags: &[&str]) -> ProjectInfo {
    ProjectInfo {
        language: language.into(),
        version: "1.0.0".into(),
        owner: format!("{team}-owners").into(),
        team: team.into(),
        lifecycle,
        tags: tags.iter().map(|t| (*t).into()).collect(),
    }
}

/// Sample tree plus a frontend platform and a few more projects.
fn catalog_repo() -> TempRepo {
    let repo = TempRepo::sample().unwrap();
    repo.add_marker(
        "backend/billing",
        &Marker::project("billing", info("rust", "payments", Lifecycle::Staging, &["api"])),
    )
    .unwrap();
    repo.add_marker(
        "backend/legacy-auth",
        &Marker::project(
            "legacy-auth",
            info("java", "platform", Lifecycle::Deprecated, &["auth", "api"]),
        ),
    )
    .unwrap();
    repo.add_marker("frontend", &Marker::platform("frontend")).unwrap();
    repo.add_marker(
        "frontend/web",
        &Marker::project("web", info("typescript", "web", Lifecycle::Production, &["ui"])),
    )
    .unwrap();
    repo
}

#[test]
fn test_query_all_projects_in_pre_order() {
    let repo = catalog_repo();
    let root = foldermeta_scan::resolve(repo.path()).unwrap();

    let names: Vec<_> = ProjectQuery::all()
        .run(&root)
        .iter()
        .map(|p| p.name.as_str())
        .collect();
    assert_eq!(names, ["api-service", "billing", "legacy-auth", "web"]);
}

#[test]
fn test_query_by_tag_and_lifecycle() {
    let repo = catalog_repo();
    let root = foldermeta_scan::resolve(repo.path()).unwrap();

    let filter = ProjectFilter::builder()
        .tags(vec!["api".to_string()])
        .build()
        .unwrap();
    let names: Vec<_> = ProjectQuery::new(filter)
        .unwrap()
        .run(&root)
        .iter()
        .map(|p| p.name.as_str())
        .collect();
    assert_eq!(names, ["api-service", "billing", "legacy-auth"]);

    let filter = ProjectFilter::builder()
        .tags(vec!["api".to_string()])
        .lifecycle(Lifecycle::Production)
        .build()
        .unwrap();
    let matches = ProjectQuery::new(filter).unwrap().run(&root);
    assert_eq!(matches.len(), 1);
    assert_eq!(matches[0].name, "api-service");
}

#[test]
fn test_query_by_team_and_language() {
    let repo = catalog_repo();
    let root = foldermeta_scan::resolve(repo.path()).unwrap();

    let filter = ProjectFilter::builder().team("platform").build().unwrap();
    assert_eq!(ProjectQuery::new(filter).unwrap().run(&root).len(), 2);

    let filter = ProjectFilter::builder().language("RUST").build().unwrap();
    let matches = ProjectQuery::new(filter).unwrap().run(&root);
    assert_eq!(matches.len(), 1);
    assert_eq!(matches[0].name, "billing");
}

#[test]
fn test_query_subtree() {
    let repo = catalog_repo();
    let root = foldermeta_scan::resolve(repo.path()).unwrap();
    let frontend = root.find("frontend").unwrap();

    let matches = ProjectQuery::all().run(frontend);
    assert_eq!(matches.len(), 1);
    assert_eq!(matches[0].name, "web");
}

#[test]
fn test_catalog_summary() {
    let repo = catalog_repo();
    let root = foldermeta_scan::resolve(repo.path()).unwrap();
    let summary = CatalogSummary::from_node(&root);

    assert_eq!(summary.platforms, 2);
    assert_eq!(summary.projects, 4);
    assert_eq!(summary.in_stage(Lifecycle::Production), 2);
    assert_eq!(summary.in_stage(Lifecycle::Staging), 1);
    assert_eq!(summary.in_stage(Lifecycle::Development), 0);
    assert_eq!(summary.by_team.get("platform"), Some(&2));
    assert_eq!(summary.by_language.get("python"), Some(&1));
    assert_eq!(summary.by_tag.get("api"), Some(&3));
    assert_eq!(summary.top_tag(), Some(("api", 3)));
    assert_eq!(summary.deprecated, ["legacy-auth"]);
}

#[test]
fn test_catalog_summary_json() {
    let repo = TempRepo::sample().unwrap();
    let root = foldermeta_scan::resolve(repo.path()).unwrap();
    let summary = CatalogSummary::from_node(&root);

    let json = serde_json::to_value(&summary).unwrap();
    assert_eq!(json["projects"], 1);
    assert_eq!(json["by_lifecycle"]["production"], 1);
    assert_eq!(json["by_tag"]["microservice"], 1);

    let back: CatalogSummary = serde_json::from_value(json).unwrap();
    assert_eq!(back, summary);
}
