use chrono::{Local, NaiveDate};

use crate::fetch::remote_lablog_url;
use crate::templates::{self, LablogTemplate};

pub const SKELETON: [&str; 6] = ["ANALYSIS", "DOC", "RAW", "REFERENCE", "RESULTS", "TMP"];
pub const LABLOG_FILE: &str = "lablog";
pub const LOGS_DIR: &str = "logs";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RunConfig {
    pub offline: bool,
    pub date: NaiveDate,
}

impl RunConfig {
    pub fn new(offline: bool, date: NaiveDate) -> Self {
        Self { offline, date }
    }

    pub fn today(offline: bool) -> Self {
        Self::new(offline, Local::now().date_naive())
    }

    pub fn stamp(&self) -> String {
        self.date.format("%Y%m%d").to_string()
    }

    pub fn analysis_dir_name(&self) -> String {
        format!("{}_ANALYSIS01_ASSEMBLY", self.stamp())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ContentSource<'a> {
    Literal(&'a LablogTemplate),
    Remote(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LablogSource {
    pub template: LablogTemplate,
    pub remote_path: &'static str,
}

impl LablogSource {
    pub fn content_source(&self, offline: bool) -> ContentSource<'_> {
        if offline {
            ContentSource::Literal(&self.template)
        } else {
            ContentSource::Remote(remote_lablog_url(self.remote_path))
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StageDefinition {
    pub name: &'static str,
    pub relative_path: Vec<String>,
    pub create: bool,
    pub lablog: Option<LablogSource>,
    pub logs_dir: bool,
}

impl StageDefinition {
    fn new(name: &'static str, relative_path: Vec<String>) -> Self {
        Self {
            name,
            relative_path,
            create: true,
            lablog: None,
            logs_dir: false,
        }
    }

    fn existing(mut self) -> Self {
        self.create = false;
        self
    }

    fn with_lablog(mut self, template: LablogTemplate, remote_path: &'static str) -> Self {
        self.lablog = Some(LablogSource {
            template,
            remote_path,
        });
        self
    }

    fn with_logs(mut self) -> Self {
        self.logs_dir = true;
        self
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScaffoldPlan {
    pub skeleton: Vec<String>,
    pub stages: Vec<StageDefinition>,
}

impl ScaffoldPlan {
    pub fn assembly(config: &RunConfig) -> Self {
        let analysis = "ANALYSIS".to_string();
        let parent = vec![analysis.clone(), config.analysis_dir_name()];
        let child = |segment: &str| {
            let mut path = parent.clone();
            path.push(segment.to_string());
            path
        };

        let stages = vec![
            StageDefinition::new("ANALYSIS", vec![analysis.clone()])
                .existing()
                .with_lablog(templates::ANALYSIS, "ASSEMBLY/lablog"),
            StageDefinition::new("00-reads", vec![analysis, "00-reads".to_string()]),
            StageDefinition::new("ANALYSIS01_ASSEMBLY", parent.clone()).with_lablog(
                templates::ASSEMBLY_ANALYSIS,
                "ASSEMBLY/ANALYSIS_ASSEMBLY/lablog",
            ),
            StageDefinition::new("01-preprocessing", child("01-preprocessing"))
                .with_lablog(
                    templates::PREPROCESSING,
                    "ASSEMBLY/ANALYSIS_ASSEMBLY/01-preprocessing/lablog",
                )
                .with_logs(),
            StageDefinition::new("02-kmerfinder", child("02-kmerfinder"))
                .with_lablog(
                    templates::KMERFINDER,
                    "ASSEMBLY/ANALYSIS_ASSEMBLY/02-kmerfinder/lablog",
                )
                .with_logs(),
            StageDefinition::new("99-stats", child("99-stats"))
                .with_lablog(templates::STATS, "ASSEMBLY/ANALYSIS_ASSEMBLY/99-stats/lablog"),
        ];

        Self {
            skeleton: SKELETON.iter().map(|dir| dir.to_string()).collect(),
            stages,
        }
    }

    pub fn remote_urls(&self) -> Vec<String> {
        self.stages
            .iter()
            .filter_map(|stage| stage.lablog.as_ref())
            .map(|lablog| remote_lablog_url(lablog.remote_path))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config() -> RunConfig {
        RunConfig::new(true, NaiveDate::from_ymd_opt(2024, 3, 5).unwrap())
    }

    #[test]
    fn dated_dir_name() {
        assert_eq!(config().stamp(), "20240305");
        assert_eq!(config().analysis_dir_name(), "20240305_ANALYSIS01_ASSEMBLY");
    }

    #[test]
    fn parents_precede_children() {
        let plan = ScaffoldPlan::assembly(&config());
        for (index, stage) in plan.stages.iter().enumerate() {
            let parent = &stage.relative_path[..stage.relative_path.len() - 1];
            if parent.is_empty() {
                assert!(plan.skeleton.contains(&stage.relative_path[0]));
                continue;
            }
            let parent_declared = plan.stages[..index]
                .iter()
                .any(|earlier| earlier.relative_path == parent);
            assert!(parent_declared, "{} declared before its parent", stage.name);
        }
    }

    #[test]
    fn logs_only_for_preprocessing_and_kmerfinder() {
        let plan = ScaffoldPlan::assembly(&config());
        let with_logs = plan
            .stages
            .iter()
            .filter(|stage| stage.logs_dir)
            .map(|stage| stage.name)
            .collect::<Vec<_>>();
        assert_eq!(with_logs, vec!["01-preprocessing", "02-kmerfinder"]);
    }

    #[test]
    fn content_source_follows_mode() {
        let plan = ScaffoldPlan::assembly(&config());
        let lablog = plan.stages[0].lablog.as_ref().unwrap();
        assert_eq!(
            lablog.content_source(true),
            ContentSource::Literal(&templates::ANALYSIS)
        );
        assert_eq!(
            lablog.content_source(false),
            ContentSource::Remote(remote_lablog_url("ASSEMBLY/lablog"))
        );
    }
}
