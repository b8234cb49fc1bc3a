//! Offline task commands operating directly on the stored ledger

use std::sync::Arc;

use super::{Commands, Context};
use crate::address::{parse_address, short_address};
use crate::error::Result;
use crate::ledger::clock::SystemClock;
use crate::ledger::{Task, TaskLedger};
use crate::storage::ledger as ledger_store;

/// One-line rendering: `#3 [x] Buy milk`
pub fn format_task(task: &Task) -> String {
    let mark = if task.deleted {
        "-"
    } else if task.completed {
        "x"
    } else {
        " "
    };
    format!("#{} [{}] {}", task.id, mark, task.description)
}

fn print_tasks(tasks: &[Task]) {
    if tasks.is_empty() {
        println!("(no tasks)");
        return;
    }
    for task in tasks {
        println!("{}", format_task(task));
    }
}

/// Run one offline command. Mutations are written back before returning.
pub fn execute(ctx: &Context, command: Commands) -> Result<()> {
    let path = ledger_store::ledger_path(&ctx.data_dir);
    let ledger = ledger_store::open_ledger(&path, Arc::new(SystemClock))?;

    let mutated = run(ctx, &ledger, command)?;
    if mutated {
        crate::storage::ensure_data_dir(&ctx.data_dir)?;
        ledger_store::flush(&ledger, &path)?;
        tracing::debug!(path = %path.display(), "ledger saved");
    }
    Ok(())
}

/// Apply `command` to `ledger`, returning whether anything changed.
fn run(ctx: &Context, ledger: &TaskLedger, command: Commands) -> Result<bool> {
    match command {
        Commands::Add { description } => {
            let account = ctx.require_account()?;
            let id = ledger.add_task(&account, &description)?;
            println!("Added task #{}", id);
            Ok(true)
        }
        Commands::Edit { id, description } => {
            let account = ctx.require_account()?;
            ledger.edit_task(&account, id, &description)?;
            println!("Updated task #{}", id);
            Ok(true)
        }
        Commands::Toggle { id } => {
            let account = ctx.require_account()?;
            let completed = ledger.toggle_task_status(&account, id)?;
            let state = if completed { "completed" } else { "not completed" };
            println!("Task #{} marked {}", id, state);
            Ok(true)
        }
        Commands::Delete { id } => {
            let account = ctx.require_account()?;
            ledger.soft_delete_task(&account, id)?;
            println!("Deleted task #{}", id);
            Ok(true)
        }
        Commands::Show { id } => {
            let account = ctx.require_account()?;
            let task = ledger.get_task(&account, id)?;
            println!("{}", format_task(&task));
            if let Some(created) = chrono::DateTime::from_timestamp(task.timestamp, 0) {
                println!("created: {}", created.to_rfc3339());
            }
            Ok(false)
        }
        Commands::List { all } => {
            let account = ctx.require_account()?;
            let tasks = if all {
                ledger.get_all_tasks(&account)
            } else {
                ledger.get_active_tasks(&account)
            };
            print_tasks(&tasks);
            Ok(false)
        }
        Commands::Stats => {
            let account = ctx.require_account()?;
            let total = ledger.get_task_count(&account);
            let active = ledger.get_active_task_count(&account);
            println!("account:   {}", account);
            println!("total:     {}", total);
            println!("active:    {}", active);
            println!("completed: {}", ledger.get_completed_task_count(&account));
            println!("deleted:   {}", total - active);
            Ok(false)
        }
        Commands::User { address } => {
            let account = parse_address(&address)?;
            print_tasks(&ledger.get_user_tasks(&account));
            Ok(false)
        }
        Commands::Accounts => {
            let accounts = ledger.accounts();
            if accounts.is_empty() {
                println!("(no accounts)");
            }
            for account in accounts {
                let stats = ledger.stats(&account);
                println!(
                    "{}  {} active / {} total",
                    short_address(&account),
                    stats.active,
                    stats.total
                );
            }
            Ok(false)
        }
        Commands::Serve { .. } | Commands::Init { .. } => Ok(false),
    }
}
