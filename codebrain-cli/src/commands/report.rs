use anyhow::{bail, Result};
use colored::Colorize;
use codebrain_core::report::{
    ImpactSection, RequirementSection, IMPACTS_HEADING, REQUIREMENTS_HEADING,
};
use codebrain_core::AnalysisReport;

use super::tasks::load_monitor;
use crate::config::CliContext;

pub async fn handle_report_command(ctx: &CliContext, task_id: &str) -> Result<()> {
    let client = ctx.client()?;
    let monitor = load_monitor(&client, task_id).await?;

    let (Some(task), Some(report)) = (monitor.task(), monitor.report()) else {
        let status = monitor
            .task()
            .map(|t| t.status.label())
            .unwrap_or("unknown");
        bail!(
            "Task {} has no analysis results yet (status: {})",
            task_id,
            status
        );
    };

    if ctx.is_json() {
        let output = serde_json::json!({
            "task_id": task.id,
            "verdict": report.verdict(),
            "has_ui_impacts": report.has_ui_impacts,
            "has_compatibility_requirements": report.has_compatibility_requirements,
            "results": task.analysis(),
        });
        println!("{}", serde_json::to_string_pretty(&output)?);
        return Ok(());
    }

    println!("{} {}", "Analysis Report:".cyan().bold(), task.description);
    println!("{}", "═".repeat(60).dimmed());
    println!();
    print_report(&report);

    Ok(())
}

pub fn print_report(report: &AnalysisReport<'_>) {
    if report.has_ui_impacts {
        println!("  {} {}", "⚠".yellow().bold(), report.verdict().yellow().bold());
    } else {
        println!("  {} {}", "✓".green().bold(), report.verdict().green());
    }
    println!();

    println!("  {}", IMPACTS_HEADING.yellow().bold());
    match &report.impacts {
        ImpactSection::Entries(entries) => {
            for entry in entries {
                println!("    {} {}", "●".cyan(), entry.path.bold());
                for impact in entry.impacts {
                    println!("        - {}", impact);
                }
            }
        }
        ImpactSection::Placeholder(text) => println!("    {}", text.dimmed()),
    }
    println!();

    println!("  {}", REQUIREMENTS_HEADING.yellow().bold());
    match &report.requirements {
        RequirementSection::Groups(groups) => {
            for group in groups {
                println!("    {}", group.title.bold());
                for item in group.items {
                    println!("        - {}", item);
                }
            }
        }
        RequirementSection::Placeholder(text) => println!("    {}", text.dimmed()),
    }
}
