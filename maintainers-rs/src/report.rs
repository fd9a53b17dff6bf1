use std::{
    collections::{BTreeMap, BTreeSet},
    fmt::Write,
};

use crate::{
    change::RenameDriftWarning,
    component::Maintainer,
    index::ComponentReviewInfo,
    review::{PatchsetReviewInfo, ReviewState},
};

/// Group affected files by component, listing each component's maintainers,
/// followed by the files that belong to no component.
pub fn reviewer_report(infos: &[ComponentReviewInfo]) -> String {
    let mut by_component: BTreeMap<&str, (&BTreeSet<Maintainer>, BTreeSet<&str>)> = BTreeMap::new();
    let mut unowned = BTreeSet::new();
    for info in infos {
        match &info.component {
            Some(component) => {
                by_component
                    .entry(component.as_str())
                    .or_insert_with(|| (&info.maintainers, BTreeSet::new()))
                    .1
                    .insert(info.affected_file.as_str());
            }
            None => {
                unowned.insert(info.affected_file.as_str());
            }
        }
    }

    let mut out = String::new();
    for (component, (maintainers, files)) in &by_component {
        let _ = writeln!(out, "Component {component}\n");
        let _ = writeln!(out, "Maintainers :");
        for maintainer in maintainers.iter() {
            let _ = writeln!(out, " {maintainer}");
        }
        let _ = writeln!(out, "\nAffected files :");
        for file in files {
            let _ = writeln!(out, " Path: {file}");
        }
        out.push('\n');
    }
    if !unowned.is_empty() {
        let _ = writeln!(out, "No component found for following files");
        for file in &unowned {
            let _ = writeln!(out, " {file}");
        }
    }
    out
}

/// Describe renamed files that left their components. Empty when there are no
/// warnings.
pub fn drift_report(warnings: &[RenameDriftWarning]) -> String {
    if warnings.is_empty() {
        return String::new();
    }

    let mut out = String::from(
        "Following entries are now no longer part of their components. \
         Maintainers file update is recommended.\n\n",
    );
    for warning in warnings {
        let components = warning
            .invalid_components
            .iter()
            .map(|m| format!("Component {}[path={}]", m.component_title, m.pattern))
            .collect::<Vec<_>>()
            .join(", ");
        let _ = writeln!(
            out,
            "File {} renamed to {} - invalid components {}",
            warning.old_name, warning.new_name, components
        );
    }
    out
}

pub fn review_summary(info: &PatchsetReviewInfo) -> String {
    match info.state {
        ReviewState::AllComponentsReviewed => "All components reviewed\n".to_owned(),
        ReviewState::MissingComponentReview => {
            let mut out = String::from("Missing component review:\n");
            for component in &info.missing_components {
                let _ = writeln!(out, " {component}");
            }
            out
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{change::InvalidMembership, component::PathPattern};

    fn info(file: &str, component: Option<&str>, maintainers: &[Maintainer]) -> ComponentReviewInfo {
        ComponentReviewInfo {
            affected_file: file.to_owned(),
            component: component.map(str::to_owned),
            maintainers: maintainers.iter().cloned().collect(),
        }
    }

    #[test]
    fn test_reviewer_report() {
        let dave = Maintainer::new("Dave Barach", "dave@barachs.net");
        let infos = vec![
            info("src/vlib/main.c", Some("VLIB"), &[dave.clone()]),
            info("docs/readme.md", None, &[]),
            info("src/vlib/buffer.c", Some("VLIB"), &[dave]),
        ];
        assert_eq!(
            reviewer_report(&infos),
            "\
Component VLIB

Maintainers :
 Dave Barach<dave@barachs.net>

Affected files :
 Path: src/vlib/buffer.c
 Path: src/vlib/main.c

No component found for following files
 docs/readme.md
"
        );
    }

    #[test]
    fn test_drift_report() {
        assert_eq!(drift_report(&[]), "");

        let warning = RenameDriftWarning {
            old_name: "old/path.c".to_owned(),
            new_name: "new/path.c".to_owned(),
            invalid_components: BTreeSet::from([InvalidMembership {
                component_title: "A".to_owned(),
                pattern: PathPattern::new("old/"),
            }]),
        };
        let report = drift_report(&[warning]);
        assert!(report.starts_with("Following entries are now no longer part of their components."));
        assert!(report.ends_with(
            "File old/path.c renamed to new/path.c - invalid components Component A[path=old/]\n"
        ));
    }

    #[test]
    fn test_review_summary() {
        let info = PatchsetReviewInfo {
            state: ReviewState::MissingComponentReview,
            missing_components: BTreeSet::from(["B".to_owned()]),
        };
        assert_eq!(review_summary(&info), "Missing component review:\n B\n");
    }
}
