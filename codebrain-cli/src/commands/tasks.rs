use anyhow::{bail, Result};
use clap::Subcommand;
use colored::{ColoredString, Colorize};
use codebrain_core::views::TASK_NOT_FOUND;
use codebrain_core::{
    CodeBrainApi, MonitorPhase, Route, StepState, Task, TaskCreator, TaskMonitor, TaskStatus,
};

use super::report::print_report;
use crate::config::CliContext;

#[derive(Subcommand)]
pub enum TasksCommand {
    #[command(about = "Submit a new task")]
    Create {
        #[arg(help = "What the task should do, in plain language")]
        description: String,

        #[arg(short, long, help = "Playbook ID to attach")]
        playbook: Option<String>,
    },

    #[command(about = "Show a task with its plan and pending prompt")]
    Show {
        #[arg(help = "Task ID")]
        id: String,
    },

    #[command(about = "Confirm the plan of a task awaiting confirmation")]
    Confirm {
        #[arg(help = "Task ID")]
        id: String,
    },

    #[command(about = "Answer the pending prompt of a task")]
    Respond {
        #[arg(help = "Task ID")]
        id: String,

        #[arg(help = "Your answer, sent as typed")]
        input: String,
    },
}

pub async fn handle_tasks_command(ctx: &CliContext, action: TasksCommand) -> Result<()> {
    let client = ctx.client()?;

    match action {
        TasksCommand::Create {
            description,
            playbook,
        } => cmd_tasks_create(ctx, &client, description, playbook).await,
        TasksCommand::Show { id } => {
            let monitor = load_monitor(&client, &id).await?;
            print_monitor(ctx, &monitor)
        }
        TasksCommand::Confirm { id } => cmd_tasks_confirm(ctx, &client, &id).await,
        TasksCommand::Respond { id, input } => cmd_tasks_respond(ctx, &client, &id, input).await,
    }
}

/// Load a task into a monitor, turning every non-ready phase into an error.
pub async fn load_monitor(api: &dyn CodeBrainApi, id: &str) -> Result<TaskMonitor> {
    let mut monitor = TaskMonitor::new(id);
    monitor.load(api).await;

    match monitor.phase() {
        MonitorPhase::Ready(_) => Ok(monitor),
        MonitorPhase::NotFound => bail!("{}: {}", TASK_NOT_FOUND, id),
        MonitorPhase::Failed(message) => bail!("{}", message),
        MonitorPhase::Loading => bail!("Failed to load task. Please try again."),
    }
}

async fn cmd_tasks_create(
    ctx: &CliContext,
    api: &dyn CodeBrainApi,
    description: String,
    playbook: Option<String>,
) -> Result<()> {
    let mut creator = TaskCreator::new();
    creator.description = description;
    creator.playbook_id = playbook;

    let Some(Route::Task(id)) = creator.submit(api).await else {
        bail!(
            "{}",
            creator
                .error()
                .unwrap_or("Failed to create task. Please try again.")
        );
    };

    if !ctx.is_json() {
        println!("{} Created task {}", "✓".green().bold(), id.bold());
        println!();
    }

    let monitor = load_monitor(api, &id).await?;
    print_monitor(ctx, &monitor)
}

async fn cmd_tasks_confirm(ctx: &CliContext, api: &dyn CodeBrainApi, id: &str) -> Result<()> {
    let mut monitor = load_monitor(api, id).await?;

    if !monitor.can_confirm() {
        let status = monitor.task().map(|t| t.status.label()).unwrap_or("unknown");
        bail!(
            "Task {} is not awaiting confirmation (status: {})",
            id,
            status
        );
    }

    if !monitor.confirm(api).await {
        bail!(
            "{}",
            monitor
                .error()
                .unwrap_or("Failed to confirm task. Please try again.")
        );
    }

    if !ctx.is_json() {
        println!("{} Plan confirmed", "✓".green().bold());
        println!();
    }
    print_monitor(ctx, &monitor)
}

async fn cmd_tasks_respond(
    ctx: &CliContext,
    api: &dyn CodeBrainApi,
    id: &str,
    input: String,
) -> Result<()> {
    let mut monitor = load_monitor(api, id).await?;

    if !monitor.can_interact() {
        bail!("Task {} has no pending prompt", id);
    }
    if input.trim().is_empty() {
        bail!("Input must not be blank");
    }

    monitor.set_input(input);
    if !monitor.send_interaction(api).await {
        bail!(
            "{}",
            monitor
                .error()
                .unwrap_or("Failed to send interaction. Please try again.")
        );
    }

    if !ctx.is_json() {
        println!("{} Response sent", "✓".green().bold());
        println!();
    }
    print_monitor(ctx, &monitor)
}

fn print_monitor(ctx: &CliContext, monitor: &TaskMonitor) -> Result<()> {
    let Some(task) = monitor.task() else {
        bail!("Failed to load task. Please try again.");
    };

    if ctx.is_json() {
        println!("{}", serde_json::to_string_pretty(task)?);
        return Ok(());
    }

    print_task(ctx, task);

    if let Some(prompt) = monitor.pending_prompt() {
        println!();
        println!("  {}", "Waiting for your input".yellow().bold());
        println!("    {}", prompt);
        println!(
            "    {}",
            format!("Answer with: codebrain tasks respond {} \"<answer>\"", task.id).dimmed()
        );
    }

    if monitor.can_confirm() {
        println!();
        println!(
            "  {} {}",
            "→".blue(),
            format!("Review the plan, then run: codebrain tasks confirm {}", task.id).bold()
        );
    }

    if let Some(report) = monitor.report() {
        println!();
        print_report(&report);
    }

    Ok(())
}

fn print_task(ctx: &CliContext, task: &Task) {
    println!("{} {}", "Task:".cyan().bold(), task.description.bold());
    println!("{}", "═".repeat(60).dimmed());
    println!("  {:<10} {}", "ID:".bold(), task.id);
    println!("  {:<10} {}", "Status:".bold(), status_colored(task.status));
    if let Some(playbook_id) = &task.playbook_id {
        println!("  {:<10} {}", "Playbook:".bold(), playbook_id);
    }
    println!("  {:<10} {}", "Created:".bold(), ctx.format_date(&task.created_at));

    if let Some(plan) = &task.plan {
        println!();
        println!(
            "  {} ({}/{})",
            "Plan".yellow().bold(),
            plan.completed_steps(),
            plan.steps.len()
        );
        for step in &plan.steps {
            let state = step.state();
            let icon = match state {
                StepState::Completed => state.icon().green(),
                StepState::Failed => state.icon().red(),
                StepState::Pending => state.icon().dimmed(),
            };
            println!("    {} {}", icon, step.description);
        }
    }
}

fn status_colored(status: TaskStatus) -> ColoredString {
    match status {
        TaskStatus::Completed => status.label().green(),
        TaskStatus::Failed => status.label().red(),
        TaskStatus::AwaitingConfirmation => status.label().yellow(),
        TaskStatus::InProgress | TaskStatus::Planning => status.label().cyan(),
        TaskStatus::Pending => status.label().normal(),
    }
}
