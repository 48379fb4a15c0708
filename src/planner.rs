use std::fs;
use std::io;

use camino::{Utf8Path, Utf8PathBuf};
use minijinja::Value;
use tracing::{debug, info};

use crate::error::ScaffoldError;
use crate::fetch::LablogFetcher;
use crate::plan::{ContentSource, LABLOG_FILE, LOGS_DIR, RunConfig, ScaffoldPlan, StageDefinition};
use crate::templates::assembly_context;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScaffoldReport {
    pub root: Utf8PathBuf,
    pub analysis_dir: Utf8PathBuf,
    pub directories: Vec<Utf8PathBuf>,
    pub lablogs: Vec<Utf8PathBuf>,
}

pub struct ScaffoldPlanner<F: LablogFetcher> {
    root: Utf8PathBuf,
    fetcher: F,
    context: Value,
}

impl<F: LablogFetcher> ScaffoldPlanner<F> {
    pub fn new(root: Utf8PathBuf, fetcher: F) -> Self {
        Self {
            root,
            fetcher,
            context: assembly_context(),
        }
    }

    pub fn run(&self, config: &RunConfig) -> Result<ScaffoldReport, ScaffoldError> {
        let plan = ScaffoldPlan::assembly(config);
        info!(
            root = %self.root,
            offline = config.offline,
            date = %config.stamp(),
            "preparing assembly service"
        );
        if !config.offline {
            debug!(urls = ?plan.remote_urls(), "remote lablogs");
        }

        let mut report = ScaffoldReport {
            root: self.root.clone(),
            analysis_dir: self.root.join("ANALYSIS").join(config.analysis_dir_name()),
            directories: Vec::new(),
            lablogs: Vec::new(),
        };

        for dir in &plan.skeleton {
            let path = self.root.join(dir);
            create_dir(&path)?;
            report.directories.push(path);
        }

        for stage in &plan.stages {
            self.run_stage(stage, config, &mut report)?;
        }

        Ok(report)
    }

    fn run_stage(
        &self,
        stage: &StageDefinition,
        config: &RunConfig,
        report: &mut ScaffoldReport,
    ) -> Result<(), ScaffoldError> {
        let current_dir = stage
            .relative_path
            .iter()
            .fold(self.root.clone(), |path, segment| path.join(segment));
        info!(stage = stage.name, dir = %current_dir, "stage");

        if stage.create {
            create_dir(&current_dir)?;
            report.directories.push(current_dir.clone());
        }

        if let Some(lablog) = &stage.lablog {
            let content = match lablog.content_source(config.offline) {
                ContentSource::Literal(template) => template.render(&self.context)?.into_bytes(),
                ContentSource::Remote(url) => self.fetcher.fetch(&url)?,
            };
            let path = current_dir.join(LABLOG_FILE);
            write_lablog(&path, &content)?;
            report.lablogs.push(path);
        }

        if stage.logs_dir {
            let logs = current_dir.join(LOGS_DIR);
            create_dir(&logs)?;
            report.directories.push(logs);
        }

        Ok(())
    }
}

fn create_dir(path: &Utf8Path) -> Result<(), ScaffoldError> {
    debug!(%path, "creating directory");
    fs::create_dir(path.as_std_path()).map_err(|err| match err.kind() {
        io::ErrorKind::AlreadyExists => ScaffoldError::PathCollision(path.to_path_buf()),
        _ => ScaffoldError::Filesystem(format!("create {path}: {err}")),
    })
}

fn write_lablog(path: &Utf8Path, content: &[u8]) -> Result<(), ScaffoldError> {
    debug!(%path, bytes = content.len(), "writing lablog");
    fs::write(path.as_std_path(), content)
        .map_err(|err| ScaffoldError::Filesystem(format!("write {path}: {err}")))
}
