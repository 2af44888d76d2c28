//! Autofix registrations: push-test-gated bindings of edit transforms.

use crate::ports::RepoView;
use crate::push_tests::{AnyOf, IsMaven, IsNode, PushTest};
use anyhow::Context;
use shipwright_edit::{Autofix, ImportRewriteAutofix, LicenseHeaderAutofix};
use shipwright_types::push::PushEvent;

/// The default license header applied to source files.
pub const DEFAULT_HEADER: &str = "/*\n * Copyright © 2026 Shipwright Authors\n *\n * Licensed under the Apache License, Version 2.0 (the \"License\");\n * you may not use this file except in compliance with the License.\n * You may obtain a copy of the License at\n *\n *     http://www.apache.org/licenses/LICENSE-2.0\n */";

#[derive(Debug, Clone)]
pub struct AutofixOptions {
    pub header: String,
    /// Modules whose deep imports get collapsed to the package root.
    pub import_modules: Vec<String>,
}

impl Default for AutofixOptions {
    fn default() -> Self {
        Self {
            header: DEFAULT_HEADER.to_string(),
            import_modules: vec!["@atomist/sdm".to_string(), "@atomist/automation-client".to_string()],
        }
    }
}

/// One registered autofix: the transform plus the push test that selects it
/// and the candidate file globs it scans.
pub struct AutofixRegistration {
    pub name: String,
    pub test: Box<dyn PushTest>,
    pub autofix: Box<dyn Autofix>,
    pub candidates: Vec<String>,
}

/// The autofixes this machine registers.
pub fn builtin_autofix_registrations(opts: &AutofixOptions) -> Vec<AutofixRegistration> {
    vec![
        AutofixRegistration {
            name: "license-header".to_string(),
            test: Box::new(AnyOf::new(vec![Box::new(IsNode), Box::new(IsMaven)])),
            autofix: Box::new(LicenseHeaderAutofix::new(opts.header.clone())),
            candidates: vec![
                "lib/**/*.ts".to_string(),
                "src/**/*.ts".to_string(),
                "src/**/*.java".to_string(),
                "index.ts".to_string(),
            ],
        },
        AutofixRegistration {
            name: "import-rewrite".to_string(),
            test: Box::new(IsNode),
            autofix: Box::new(ImportRewriteAutofix::new(opts.import_modules.clone())),
            candidates: vec![
                "lib/**/*.ts".to_string(),
                "src/**/*.ts".to_string(),
                "index.ts".to_string(),
            ],
        },
    ]
}

/// Filter registrations down to those whose push test matches.
pub fn select_autofixes<'a>(
    registrations: &'a [AutofixRegistration],
    push: &PushEvent,
    repo: &dyn RepoView,
) -> anyhow::Result<Vec<&'a AutofixRegistration>> {
    let mut selected = Vec::new();
    for registration in registrations {
        let matched = registration
            .test
            .matches(push, repo)
            .with_context(|| format!("push test for autofix {:?}", registration.name))?;
        if matched {
            selected.push(registration);
        }
    }
    Ok(selected)
}
