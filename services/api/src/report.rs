use chrono::{Local, NaiveDate};
use clap::Args;
use perm_tracker::config::AppConfig;
use perm_tracker::error::AppError;
use perm_tracker::workflows::perm::{
    calculate_pwd_expiration, recalculate, DeadlineReport, PermCase, RecruitmentWindow,
};
use std::fs;
use std::path::PathBuf;

#[derive(Args, Debug)]
pub(crate) struct DeadlineReportArgs {
    /// Case snapshot stored as JSON
    #[arg(long)]
    pub(crate) case: PathBuf,
    /// Evaluation date for the report (defaults to today)
    #[arg(long, value_parser = crate::infra::parse_date)]
    pub(crate) today: Option<NaiveDate>,
    /// Print the report as JSON instead of text
    #[arg(long)]
    pub(crate) json: bool,
}

#[derive(Args, Debug)]
pub(crate) struct PwdArgs {
    /// Prevailing wage determination date (YYYY-MM-DD)
    #[arg(long, value_parser = crate::infra::parse_date)]
    pub(crate) determination: NaiveDate,
}

pub(crate) fn run_deadline_report(args: DeadlineReportArgs) -> Result<(), AppError> {
    let DeadlineReportArgs { case, today, json } = args;

    let config = AppConfig::load()?;
    let today = today.unwrap_or_else(|| Local::now().date_naive());

    let raw = fs::read_to_string(&case)?;
    let mut case: PermCase = serde_json::from_str(&raw)?;
    recalculate(&mut case);

    let report = DeadlineReport::build(&case, today, &config.deadlines);
    if json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        render_deadline_report(&case, &report);
    }

    Ok(())
}

pub(crate) fn run_pwd_lookup(args: PwdArgs) -> Result<(), AppError> {
    match calculate_pwd_expiration(args.determination) {
        Some(expiration) => println!(
            "PWD determined {} expires {}",
            args.determination, expiration
        ),
        None => println!(
            "PWD determined {} has no representable expiration",
            args.determination
        ),
    }
    Ok(())
}

fn render_date(date: Option<NaiveDate>) -> String {
    date.map(|value| value.to_string())
        .unwrap_or_else(|| "not yet determined".to_string())
}

pub(crate) fn render_deadline_report(case: &PermCase, report: &DeadlineReport) {
    println!("PERM deadline report");
    println!(
        "Case {}: {} for {} (evaluated {})",
        report.case_id, case.employer_name, case.beneficiary_name, report.today
    );
    println!(
        "Status: {} / {}{}",
        report.status.status_label,
        report.status.progress_label,
        if report.status.status_overridden || report.status.progress_overridden {
            " (manual override)"
        } else {
            ""
        }
    );

    println!("\nKey dates");
    println!("- PWD expiration: {}", render_date(report.pwd_expiration));
    match &report.recruitment {
        RecruitmentWindow::NotYetDetermined => {
            println!("- Recruitment: not yet determined");
        }
        RecruitmentWindow::Determined(deadlines) => {
            println!(
                "- Recruitment: started {}, must finish by {} ({}{})",
                deadlines.first_recruitment_date,
                deadlines.closes_on,
                deadlines.status.label(),
                if deadlines.is_pwd_limited {
                    ", limited by PWD"
                } else {
                    ""
                }
            );
        }
    }
    match &report.filing_window {
        Some(window) => println!(
            "- ETA 9089 filing window: {} -> {} ({})",
            window.opens_on,
            window.closes_on,
            window.status.label()
        ),
        None => println!("- ETA 9089 filing window: not yet determined"),
    }
    println!(
        "- ETA 9089 expiration: {}",
        render_date(report.eta9089_expiration)
    );
    println!("- I-140 deadline: {}", render_date(report.i140_deadline));

    if let Some(rfi) = &report.active_rfi {
        println!(
            "- Active RFI received {}, response due {}",
            rfi.received_date,
            render_date(rfi.response_due_date)
        );
    }
    if let Some(rfe) = &report.active_rfe {
        println!(
            "- Active RFE received {}, response due {}",
            rfe.received_date, rfe.response_due_date
        );
    }

    if report.upcoming.is_empty() {
        println!("\nUpcoming deadlines: none");
    } else {
        println!("\nUpcoming deadlines");
        for deadline in &report.upcoming {
            println!(
                "- {}: {} ({} days, {})",
                deadline.label,
                deadline.due_date,
                deadline.days_remaining,
                deadline.urgency.label()
            );
        }
    }

    let signals = &report.status.derived.signals;
    if !signals.is_empty() {
        println!("\nSignals");
        for signal in signals {
            println!("- {}", signal.code());
        }
    }

    if report.is_valid() {
        println!("\nValidation: no issues");
    } else {
        println!("\nValidation issues");
        for violation in &report.violations {
            println!("- {}", violation);
        }
    }
}
