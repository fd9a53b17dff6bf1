use std::{collections::BTreeSet, path::Path};

use maintainers_rs::{
    parser, report, source::FileOwnershipSource, ChangedPathEntry, Component, ComponentState,
    Engine, Identity, Maintainer, PathPattern, ReviewState,
};

fn fixture() -> &'static Path {
    Path::new(concat!(env!("CARGO_MANIFEST_DIR"), "/tests/fixtures/MAINTAINERS"))
}

fn engine() -> Engine {
    Engine::from_source(&FileOwnershipSource::new(fixture())).unwrap()
}

fn damjan() -> Identity {
    Identity::new("Damjan Marion", "damarion@cisco.com")
}

fn dave() -> Identity {
    Identity::new("Dave Barach", "dave@barachs.net")
}

fn titles(titles: &[&str]) -> BTreeSet<String> {
    titles.iter().map(|&t| t.to_owned()).collect()
}

#[test]
fn test_parse_fixture() {
    let components = parser::parse_file(fixture()).unwrap();
    assert_eq!(components.len(), 9);

    assert_eq!(
        components[0],
        Component::new("Build System")
            .with_maintainer(Maintainer::new("Damjan Marion", "damarion@cisco.com"))
            .with_pattern("Makefile")
            .with_pattern("src/*.ac")
            .with_pattern("src/*.am")
            .with_pattern("src/*.mk")
            .with_pattern("src/m4/")
    );
    assert_eq!(components[5].title, "VLIB Library");
    assert_eq!(components[5].maintainers.len(), 2);
    assert_eq!(
        components[8].comments,
        BTreeSet::from(["C:\tLooking for a maintainer".to_owned()])
    );

    // Parsing is deterministic field by field.
    assert_eq!(components, parser::parse_file(fixture()).unwrap());
}

#[test]
fn test_resolve_ownership() {
    let engine = engine();
    let examples = [
        ("Makefile", Some("Build System")),
        ("src/vpp.mk", Some("Build System")),
        ("build-root/Makefile", Some("Build System Internal")),
        ("build-data/platforms/vpp.mk", Some("Build System Internal")),
        ("dpdk/Makefile", Some("DPDK Development Packaging")),
        ("dpdk/patches/17.02/fix.patch", Some("DPDK Development Packaging")),
        ("src/vlib/buffer.c", Some("VLIB Library")),
        ("src/vnet/bfd/bfd_main.c", Some("VNET Bidirectonal Forwarding Detection (BFD)")),
        ("src/plugins/sample/node.c", Some("Plugin - Legacy Sample")),
        ("src/vnet/ip/ip4.c", None),
        ("README.md", None),
    ];
    for (path, expected) in examples {
        let info = engine.resolve_ownership(path);
        assert_eq!(info.component.as_deref(), expected, "ownership of {:?}", path);
        let state = if expected.is_some() {
            ComponentState::Found
        } else {
            ComponentState::NotFound
        };
        assert_eq!(info.state(), state);
    }
}

#[test]
fn test_review_completeness() {
    let engine = engine();
    let entries = vec![
        ChangedPathEntry::modified("/COMMIT_MSG"),
        ChangedPathEntry::modified("src/vlib/buffer.c"),
        ChangedPathEntry::modified("src/vppinfra/vec.h"),
        ChangedPathEntry::added("src/vnet/bfd/bfd_new.c"),
        ChangedPathEntry::modified("src/plugins/sample/node.c"),
    ];

    let info = engine.evaluate_review(&entries, &[damjan()]);
    assert_eq!(info.state, ReviewState::MissingComponentReview);
    assert_eq!(
        info.missing_components,
        titles(&[
            "Infrastructure Library",
            "VNET Bidirectonal Forwarding Detection (BFD)"
        ])
    );

    let klement = Identity::new("Klement Sekera", "ksekera@cisco.com");
    let info = engine.evaluate_review(&entries, &[dave(), klement]);
    assert_eq!(info.state, ReviewState::AllComponentsReviewed);
    assert!(info.missing_components.is_empty());
}

#[test]
fn test_rename_drift() {
    let engine = engine();
    let entries = vec![
        ChangedPathEntry::renamed("src/vlib/old.c", "src/vppinfra/old.c"),
        ChangedPathEntry::renamed("src/vlibapi/api.c", "src/vlibmemory/api.c"),
        ChangedPathEntry::renamed("src/vlib/a.c", "src/vlib/b.c"),
    ];
    let warnings = engine.detect_rename_drift(&entries);
    let invalid = warnings
        .iter()
        .flat_map(|w| {
            w.invalid_components
                .iter()
                .map(move |m| (w.old_name.as_str(), m.component_title.as_str(), m.pattern.clone()))
        })
        .collect::<Vec<_>>();
    assert_eq!(
        invalid,
        vec![
            ("src/vlib/old.c", "VLIB Library", PathPattern::new("src/vlib/")),
            (
                "src/vlibapi/api.c",
                "VLIB API Libraries",
                PathPattern::new("src/vlibapi/")
            ),
        ]
    );

    let report = report::drift_report(&warnings);
    assert!(report.contains("Component VLIB Library[path=src/vlib/]"));
}

#[test]
fn test_reviewer_report() {
    let engine = engine();
    let entries = vec![
        ChangedPathEntry::modified("src/vlibapi/api.c"),
        ChangedPathEntry::modified("docs/index.md"),
    ];
    let report = report::reviewer_report(&engine.review_infos(&entries));
    assert!(report.starts_with("Component VLIB API Libraries\n"));
    assert!(report.contains(" Dave Barach<dave@barachs.net>\n"));
    assert!(report.ends_with("No component found for following files\n docs/index.md\n"));

    assert_eq!(
        engine.suggested_reviewers(&entries),
        BTreeSet::from([Maintainer::new("Dave Barach", "dave@barachs.net")])
    );
}
