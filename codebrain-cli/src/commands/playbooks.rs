use anyhow::{anyhow, bail, Context, Result};
use clap::Subcommand;
use colored::Colorize;
use comfy_table::{presets::UTF8_FULL, Cell, ContentArrangement, Table};
use codebrain_core::views::EMPTY_PLAYBOOKS;
use codebrain_core::{CodeBrainApi, Playbook, PlaybookEditor, PlaybookListView};
use std::path::PathBuf;

use crate::config::CliContext;

#[derive(Subcommand)]
pub enum PlaybooksCommand {
    #[command(about = "List all playbooks")]
    List,

    #[command(about = "Show a playbook with its full content")]
    Show {
        #[arg(help = "Playbook ID")]
        id: String,
    },

    #[command(about = "Create a new playbook")]
    Create {
        #[arg(short, long, help = "Playbook name")]
        name: String,

        #[arg(short, long, conflicts_with = "file", help = "Markdown content")]
        content: Option<String>,

        #[arg(long, help = "Read the markdown content from a file")]
        file: Option<PathBuf>,
    },

    #[command(about = "Delete a playbook")]
    Delete {
        #[arg(help = "Playbook ID")]
        id: String,
    },
}

pub async fn handle_playbooks_command(
    ctx: &CliContext,
    action: Option<PlaybooksCommand>,
) -> Result<()> {
    let client = ctx.client()?;

    match action {
        Some(PlaybooksCommand::List) | None => cmd_playbooks_list(ctx, &client).await,
        Some(PlaybooksCommand::Show { id }) => cmd_playbooks_show(ctx, &client, &id).await,
        Some(PlaybooksCommand::Create {
            name,
            content,
            file,
        }) => {
            let content = match (content, file) {
                (Some(content), _) => content,
                (None, Some(path)) => std::fs::read_to_string(&path)
                    .with_context(|| format!("Failed to read {}", path.display()))?,
                (None, None) => String::new(),
            };
            cmd_playbooks_create(ctx, &client, name, content).await
        }
        Some(PlaybooksCommand::Delete { id }) => cmd_playbooks_delete(ctx, &client, &id).await,
    }
}

async fn cmd_playbooks_list(ctx: &CliContext, api: &dyn CodeBrainApi) -> Result<()> {
    let mut view = PlaybookListView::new();
    view.load(api).await;

    if let Some(message) = view.error() {
        bail!("{}", message);
    }

    if ctx.is_json() {
        println!("{}", serde_json::to_string_pretty(view.playbooks())?);
        return Ok(());
    }

    if view.is_empty_state() {
        println!("{}", EMPTY_PLAYBOOKS.yellow());
        println!();
        println!(
            "Run {} to add one.",
            "codebrain playbooks create --name <name> --file <file.md>"
                .cyan()
                .bold()
        );
        return Ok(());
    }

    println!("{}", "Playbooks".cyan().bold());
    println!("{}", "═".repeat(60).dimmed());
    println!();

    println!("{}", playbook_table(ctx, view.playbooks()));
    println!();
    println!("  Total: {} playbooks", view.playbooks().len());

    Ok(())
}

fn playbook_table(ctx: &CliContext, playbooks: &[Playbook]) -> Table {
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_header(vec![
            Cell::new("ID").fg(comfy_table::Color::Cyan),
            Cell::new("Name").fg(comfy_table::Color::Cyan),
            Cell::new("Summary").fg(comfy_table::Color::Cyan),
            Cell::new("Created").fg(comfy_table::Color::Cyan),
        ]);

    for playbook in playbooks {
        table.add_row(vec![
            Cell::new(&playbook.id),
            Cell::new(&playbook.name),
            Cell::new(truncate(playbook.summary().unwrap_or("-"), 48)),
            Cell::new(ctx.format_date(&playbook.created_at)),
        ]);
    }

    table
}

async fn cmd_playbooks_show(ctx: &CliContext, api: &dyn CodeBrainApi, id: &str) -> Result<()> {
    let mut view = PlaybookListView::new();
    let playbook = view.show(api, id).await.cloned();

    let Some(playbook) = playbook else {
        return Err(anyhow!(
            "{}",
            view.error().unwrap_or("Failed to load playbook. Please try again.")
        ));
    };

    if ctx.is_json() {
        println!("{}", serde_json::to_string_pretty(&playbook)?);
        return Ok(());
    }

    println!("{} {}", "Playbook:".cyan().bold(), playbook.name.bold());
    println!("{}", "═".repeat(60).dimmed());
    println!("  {:<10} {}", "ID:".bold(), playbook.id);
    println!(
        "  {:<10} {}",
        "Created:".bold(),
        ctx.format_date(&playbook.created_at)
    );
    println!();
    for line in playbook.content.lines() {
        println!("  {}", line);
    }

    Ok(())
}

async fn cmd_playbooks_create(
    ctx: &CliContext,
    api: &dyn CodeBrainApi,
    name: String,
    content: String,
) -> Result<()> {
    let mut editor = PlaybookEditor::new();
    editor.name = name;
    editor.content = content;

    if editor.save(api).await.is_none() {
        bail!(
            "{}",
            editor
                .error()
                .unwrap_or("Failed to save playbook. Please try again.")
        );
    }

    let Some(playbook) = editor.saved() else {
        bail!("Failed to save playbook. Please try again.");
    };

    if ctx.is_json() {
        println!("{}", serde_json::to_string_pretty(playbook)?);
        return Ok(());
    }

    println!(
        "{} Created playbook {} ({})",
        "✓".green().bold(),
        playbook.name.bold(),
        playbook.id.dimmed()
    );

    Ok(())
}

async fn cmd_playbooks_delete(ctx: &CliContext, api: &dyn CodeBrainApi, id: &str) -> Result<()> {
    let mut view = PlaybookListView::new();

    if !view.delete(api, id).await {
        bail!(
            "{}",
            view.error()
                .unwrap_or("Failed to delete playbook. Please try again.")
        );
    }

    if ctx.is_json() {
        let output = serde_json::json!({
            "deleted": id,
            "remaining": view.playbooks().len(),
        });
        println!("{}", serde_json::to_string_pretty(&output)?);
        return Ok(());
    }

    println!("{} Deleted playbook {}", "✓".green().bold(), id.bold());
    if view.is_loaded() {
        println!("  {} playbooks remaining", view.playbooks().len());
    }

    Ok(())
}

fn truncate(s: &str, max_len: usize) -> String {
    if s.chars().count() <= max_len {
        s.to_string()
    } else {
        let cut: String = s.chars().take(max_len.saturating_sub(3)).collect();
        format!("{}...", cut)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_truncate() {
        assert_eq!(truncate("short", 10), "short");
        assert_eq!(truncate("a much longer summary line", 10), "a much ...");
    }
}
