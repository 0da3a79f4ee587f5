//! Pushing refreshed files to a remote repository.
//!
//! The pipelines never publish by themselves. Commands call a [`Publisher`] with
//! the files a run produced; [`GitPublisher`] is the implementation shipped with
//! the binary and shells out to `git` for each step.

use std::env;
use std::path::Path;
use std::process::Command;

use hostmap_common::config::PublishConfig;
use hostmap_common::error::PublishError;
use tracing::{debug, info};

const CREDENTIAL_PLACEHOLDER: &str = "{credential}";

/// Files written by the run being published.
#[derive(Debug, Clone, Copy)]
pub struct Snapshot<'a> {
    pub mapping: &'a Path,
    pub listing: Option<&'a Path>,
}

pub trait Publisher {
    fn publish(&self, snapshot: &Snapshot<'_>) -> Result<(), PublishError>;
}

/// Returns `true` once in `rate` calls on average; a rate of 0 or 1 always passes.
pub fn sampled(rate: u32) -> bool {
    rate <= 1 || rand::random_range(0..rate) == 0
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct Step {
    /// Shown in logs and errors; never contains the credential.
    label: String,
    args: Vec<String>,
}

impl Step {
    fn new(label: impl Into<String>, args: &[&str]) -> Self {
        Self {
            label: label.into(),
            args: args.iter().map(|arg| arg.to_string()).collect(),
        }
    }
}

pub struct GitPublisher {
    credential: String,
    settings: PublishConfig,
}

impl GitPublisher {
    pub fn new(credential: impl Into<String>, settings: PublishConfig) -> Self {
        Self {
            credential: credential.into(),
            settings,
        }
    }

    /// Builds a publisher when publishing is enabled and the credential variable
    /// is set to a non-empty value.
    pub fn from_env(settings: &PublishConfig) -> Option<Self> {
        if !settings.enabled {
            return None;
        }
        let credential = env::var(&settings.credential_var).ok()?;
        if credential.is_empty() {
            return None;
        }
        Some(Self::new(credential, settings.clone()))
    }

    fn steps(&self, snapshot: &Snapshot<'_>) -> Vec<Step> {
        let settings = &self.settings;
        let mut steps: Vec<Step> = Vec::new();

        if let Some(name) = &settings.user_name {
            steps.push(Step::new("git config user.name", &["config", "user.name", name.as_str()]));
        }
        if let Some(email) = &settings.user_email {
            steps.push(Step::new("git config user.email", &["config", "user.email", email.as_str()]));
        }
        if let Some(remote) = &settings.remote_url {
            let url = remote.replace(CREDENTIAL_PLACEHOLDER, &self.credential);
            steps.push(Step::new(
                "git config remote.origin.url",
                &["config", "remote.origin.url", url.as_str()],
            ));
        }

        steps.push(Step::new("git stash", &["stash"]));
        steps.push(Step::new(
            format!("git checkout {}", settings.branch),
            &["checkout", settings.branch.as_str()],
        ));
        steps.push(Step::new("git stash pop", &["stash", "pop"]));

        let mut add: Vec<String> = vec!["add".to_string(), "--".to_string()];
        add.push(snapshot.mapping.display().to_string());
        if let Some(listing) = snapshot.listing {
            add.push(listing.display().to_string());
        }
        steps.push(Step {
            label: "git add".to_string(),
            args: add,
        });

        steps.push(Step::new("git commit", &["commit", "-am", settings.message.as_str()]));
        steps.push(Step::new(
            format!("git push origin {}", settings.branch),
            &["push", "origin", settings.branch.as_str()],
        ));
        steps
    }

    fn run(&self, step: &Step) -> Result<(), PublishError> {
        debug!("Running `{}`", step.label);
        let mut command = Command::new("git");
        command.args(&step.args);
        if let Some(dir) = &self.settings.workdir {
            command.current_dir(dir);
        }
        let status = command
            .status()
            .map_err(|source| PublishError::Spawn {
                step: step.label.clone(),
                source,
            })?;

        if !status.success() {
            return Err(PublishError::Status {
                step: step.label.clone(),
                status: status.to_string(),
            });
        }
        Ok(())
    }
}

impl Publisher for GitPublisher {
    fn publish(&self, snapshot: &Snapshot<'_>) -> Result<(), PublishError> {
        for step in self.steps(snapshot) {
            self.run(&step)?;
        }
        info!("Published to origin/{}", self.settings.branch);
        Ok(())
    }
}
