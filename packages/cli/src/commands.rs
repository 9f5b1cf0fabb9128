//! Subcommand implementations.

use std::borrow::Cow;
use std::collections::BTreeSet;
use std::io::BufReader;
use std::path::Path;

use chrono::{Local, NaiveDate, NaiveDateTime};
use dengue_watch_analytics::calendar::end_of_day;
use dengue_watch_analytics::dataset::CaseSource;
use dengue_watch_analytics::{
    config, deaths, hotspots, intervention, priority, summary as status, trends,
};
use dengue_watch_analytics_models::{
    AnalysisConfig, AnalysisOutcome, Hotspot, PatternAlert, StatusSummary,
};
use dengue_watch_case_models::CaseRecord;
use dengue_watch_cli_utils::{IndicatifProgress, MultiProgress};
use dengue_watch_ingest::{IngestError, ingest_file};
use dengue_watch_ingest_models::IngestReport;
use dengue_watch_neighborhood::adjacency::StaticAdjacency;
use dengue_watch_neighborhood::normalize::{NameNormalizer, neighborhood_key};
use dengue_watch_neighborhood::registry::{default_normalizer, read_known_neighborhoods};
use serde::Serialize;

type CliResult = Result<(), Box<dyn std::error::Error>>;

/// The reference instant every analyzer is anchored to.
pub struct Clock {
    now: NaiveDateTime,
}

impl Clock {
    /// Uses the end of `as_of` when given, else the local clock.
    pub fn new(as_of: Option<NaiveDate>) -> Self {
        let now = as_of.map_or_else(|| Local::now().naive_local(), end_of_day);
        Self { now }
    }

    const fn today(&self) -> NaiveDate {
        self.now.date()
    }
}

pub fn load_config(path: Option<&Path>) -> Result<AnalysisConfig, Box<dyn std::error::Error>> {
    match path {
        Some(path) => Ok(config::load_config(path)?),
        None => Ok(AnalysisConfig::default()),
    }
}

fn print_json(value: &impl Serialize) -> CliResult {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

/// A summary file, loaded up front when readable.
///
/// An unreadable file is handed to the analyzers as a path so they report
/// it as unavailable data.
struct Summary<'a> {
    path: &'a Path,
    records: Option<Cow<'a, [CaseRecord]>>,
}

impl<'a> Summary<'a> {
    fn open(path: &'a Path) -> Self {
        let records = match CaseSource::File(path).load() {
            Ok(records) => Some(records),
            Err(e) => {
                log::warn!("Could not load {}: {e}", path.display());
                None
            }
        };
        Self { path, records }
    }

    fn source(&self) -> CaseSource<'_> {
        self.records
            .as_deref()
            .map_or(CaseSource::File(self.path), CaseSource::Records)
    }

    /// Neighborhoods from `list` when given, else every neighborhood in
    /// the summary.
    fn known_neighborhoods(
        &self,
        list: Option<&Path>,
    ) -> Result<Vec<String>, Box<dyn std::error::Error>> {
        if let Some(list) = list {
            let file = std::fs::File::open(list)?;
            return Ok(read_known_neighborhoods(BufReader::new(file))?);
        }

        let mut seen = BTreeSet::new();
        Ok(self
            .records
            .iter()
            .flat_map(|records| records.iter())
            .filter(|record| seen.insert(neighborhood_key(&record.neighborhood)))
            .map(|record| record.neighborhood.clone())
            .collect())
    }

    fn patterns(
        &self,
        list: Option<&Path>,
        config: &AnalysisConfig,
        clock: &Clock,
    ) -> Result<Vec<AnalysisOutcome<PatternAlert>>, Box<dyn std::error::Error>> {
        let known = self.known_neighborhoods(list)?;
        Ok(priority::analyze_patterns(
            &self.source(),
            &known,
            config,
            clock.today(),
        ))
    }
}

pub fn ingest(
    multi: &MultiProgress,
    input: &Path,
    output: &Path,
    aliases: Option<&Path>,
    max_errors: Option<u64>,
) -> CliResult {
    let normalizer = match aliases {
        Some(path) => NameNormalizer::from_path(path)?,
        None => default_normalizer(),
    };

    let progress = IndicatifProgress::bytes_bar(multi, &format!("Reading {}", input.display()));
    let report = match ingest_file(input, output, &normalizer, &progress, max_errors) {
        Ok(report) => report,
        Err(IngestError::TooManyRejections { limit, report }) => {
            log_rejections(&report);
            print_json(&report)?;
            return Err(IngestError::TooManyRejections { limit, report }.into());
        }
        Err(e) => return Err(e.into()),
    };

    log_rejections(&report);
    print_json(&report)
}

fn log_rejections(report: &IngestReport) {
    for error in &report.errors {
        log::warn!("{error}");
    }
}

pub fn patterns(
    path: &Path,
    list: Option<&Path>,
    config: &AnalysisConfig,
    clock: &Clock,
) -> CliResult {
    print_json(&Summary::open(path).patterns(list, config, clock)?)
}

pub fn deaths(path: &Path, config: &AnalysisConfig, clock: &Clock) -> CliResult {
    let summary = Summary::open(path);
    print_json(&deaths::death_priority(
        &summary.source(),
        &config.deaths,
        clock.today(),
    ))
}

pub fn intervention(
    path: &Path,
    neighborhood: &str,
    date: NaiveDate,
    config: &AnalysisConfig,
) -> CliResult {
    print_json(&intervention::evaluate(
        neighborhood,
        date,
        &CaseSource::File(path),
        &config.intervention,
    ))
}

pub fn trends(
    path: &Path,
    neighborhood: &str,
    weeks: Option<usize>,
    config: &AnalysisConfig,
    clock: &Clock,
) -> CliResult {
    print_json(&trends::weekly_trends(
        neighborhood,
        weeks.unwrap_or(config.trends.default_weeks),
        &CaseSource::File(path),
        clock.now,
    ))
}

pub fn hotspots(
    path: &Path,
    adjacency: &Path,
    list: Option<&Path>,
    config: &AnalysisConfig,
    clock: &Clock,
) -> CliResult {
    let lookup = StaticAdjacency::from_path(adjacency)?;
    let outcomes = Summary::open(path).patterns(list, config, clock)?;
    match AnalysisOutcome::collect_available(outcomes) {
        Ok(resolved) => print_json(&hotspots::expand_hotspots(&resolved, &lookup)),
        Err(reason) => print_json(&[AnalysisOutcome::<Hotspot>::unavailable(reason)]),
    }
}

pub fn summary(
    path: &Path,
    list: Option<&Path>,
    config: &AnalysisConfig,
    clock: &Clock,
) -> CliResult {
    let summary = Summary::open(path);
    let outcomes = summary.patterns(list, config, clock)?;
    let resolved = match AnalysisOutcome::collect_available(outcomes) {
        Ok(resolved) => resolved,
        Err(reason) => {
            return print_json(&AnalysisOutcome::<StatusSummary>::unavailable(reason));
        }
    };
    let deaths = deaths::death_priority(&summary.source(), &config.deaths, clock.today());
    print_json(&status::summarize_status(clock.today(), &resolved, &deaths))
}
