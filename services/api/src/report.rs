use crate::infra::{build_store, parse_date, parse_format, read_filters};
use chrono::{Local, NaiveDate};
use clap::Args;
use recruit_desk::candidates::{
    AnalyticsReport, DashboardStats, ExportFormat, FilterCriteria, MemoryCandidateStore,
    RecruitmentService,
};
use recruit_desk::error::AppError;
use std::path::{Path, PathBuf};
use std::sync::Arc;

#[derive(Args, Debug)]
pub(crate) struct ReportArgs {
    /// Roster file (JSON array of candidate documents or an object keyed by id)
    #[arg(long)]
    pub(crate) roster: PathBuf,
    /// Saved filter criteria to apply before reporting
    #[arg(long)]
    pub(crate) filters: Option<PathBuf>,
    /// Print the analytics payload as JSON instead of a text summary
    #[arg(long)]
    pub(crate) json: bool,
}

#[derive(Args, Debug)]
pub(crate) struct ExportArgs {
    /// Roster file (JSON array of candidate documents or an object keyed by id)
    #[arg(long)]
    pub(crate) roster: PathBuf,
    /// Saved filter criteria selecting the exported candidates
    #[arg(long)]
    pub(crate) filters: Option<PathBuf>,
    /// Output format: csv or json
    #[arg(long, default_value = "csv", value_parser = parse_format)]
    pub(crate) format: ExportFormat,
    /// Directory the export file is written to
    #[arg(long, default_value = ".")]
    pub(crate) out_dir: PathBuf,
    /// Date stamped into the file name (defaults to today)
    #[arg(long, value_parser = parse_date)]
    pub(crate) today: Option<NaiveDate>,
}

fn open_roster(
    roster: &Path,
    filters: Option<&Path>,
) -> Result<(RecruitmentService<MemoryCandidateStore>, FilterCriteria), AppError> {
    let store = Arc::new(build_store(Some(roster))?);
    let service = RecruitmentService::new(store)?;
    let criteria = filters.map(read_filters).unwrap_or_default();
    Ok((service, criteria))
}

pub(crate) fn run_report(args: ReportArgs) -> Result<(), AppError> {
    let (service, criteria) = open_roster(&args.roster, args.filters.as_deref())?;

    let search = service.search(&criteria);
    let report = service.analytics(&criteria);

    if args.json {
        let payload = serde_json::json!({
            "stats": search.stats,
            "analytics": report,
        });
        match serde_json::to_string_pretty(&payload) {
            Ok(json) => println!("{json}"),
            Err(err) => println!("Report payload unavailable: {err}"),
        }
        return Ok(());
    }

    render_report(&search.stats, &report);
    Ok(())
}

fn render_report(stats: &DashboardStats, report: &AnalyticsReport) {
    println!("Candidate roster report");
    println!(
        "- {} of {} candidates match ({}%) | {} active filters",
        stats.filtered, stats.total, stats.filtered_pct, stats.active_filters
    );
    println!(
        "- Selected {} | Pending {} | Rejected {}",
        stats.selected, stats.pending, stats.rejected
    );

    println!("\nColleges (all candidates):");
    for entry in &report.college_distribution {
        println!(
            "  - {}: {} ({:.1}%)",
            entry.group, entry.count, entry.percentage
        );
    }

    println!("\nBranches (filtered):");
    for entry in &report.branch_distribution {
        println!(
            "  - {}: {} ({:.1}%)",
            entry.group, entry.count, entry.percentage
        );
    }

    println!("\nScore distribution (filtered):");
    for bucket in &report.score_distribution {
        println!(
            "  - {:>6}: GitHub {} | HackerEarth {}",
            bucket.range, bucket.github, bucket.hackerearth
        );
    }

    if report.average_scores_by_college.is_empty() {
        println!("\nAverage scores by college: no scored candidates");
    } else {
        println!("\nAverage scores by college:");
        for entry in &report.average_scores_by_college {
            println!(
                "  - {}: GitHub {} | HackerEarth {} | CGPA {:.2}",
                entry.college, entry.avg_github, entry.avg_hackerearth, entry.avg_cgpa
            );
        }
    }
}

pub(crate) fn run_export(args: ExportArgs) -> Result<(), AppError> {
    let (service, criteria) = open_roster(&args.roster, args.filters.as_deref())?;
    let today = args.today.unwrap_or_else(|| Local::now().date_naive());

    let artifact = service.export(&criteria, args.format, today)?;
    std::fs::create_dir_all(&args.out_dir)?;
    let path = args.out_dir.join(&artifact.file_name);
    std::fs::write(&path, artifact.body.as_bytes())?;

    println!(
        "Exported {} candidates as {} to {}",
        artifact.rows,
        args.format.extension().to_uppercase(),
        path.display()
    );
    Ok(())
}
