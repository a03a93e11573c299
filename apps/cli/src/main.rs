//! fintrack: offline-first personal finance tracking with push sync.
//!
//! Every mutation lands in the local SQLite store first and is marked
//! unsynced; `fintrack sync` pushes pending records to the service in
//! dependency order. The tool works fully offline apart from `sync`,
//! `report`, and `goal list --remote`.

mod context;
mod output;

use std::path::PathBuf;
use std::process;

use anyhow::{bail, Result};
use chrono::{NaiveDate, Utc};
use clap::{Parser, Subcommand};
use rust_decimal::Decimal;

use fintrack_core::budgets::BudgetServiceTrait;
use fintrack_core::categories::CategoryServiceTrait;
use fintrack_core::expenses::{ExpenseServiceTrait, NewExpense};
use fintrack_core::goals::{GoalServiceTrait, NewSavingsGoal};

use context::AppContext;

#[derive(Parser)]
#[command(name = "fintrack", version, about = "Offline-first personal finance tracker")]
struct Cli {
    /// SQLite database file (falls back to FINTRACK_DB, then .fintrack/)
    #[arg(global = true, long)]
    db: Option<PathBuf>,

    /// Base URL of the finance service (falls back to FINTRACK_API_URL)
    #[arg(global = true, long)]
    api_url: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Manage expense categories
    Category {
        #[command(subcommand)]
        command: CategoryCommand,
    },

    /// Record and review expenses
    Expense {
        #[command(subcommand)]
        command: ExpenseCommand,
    },

    /// Set monthly per-category spending limits
    Budget {
        #[command(subcommand)]
        command: BudgetCommand,
    },

    /// Manage savings goals and contributions
    Goal {
        #[command(subcommand)]
        command: GoalCommand,
    },

    /// Push pending local records to the service
    Sync,

    /// Server-side reports
    Report {
        #[command(subcommand)]
        command: ReportCommand,
    },
}

#[derive(Subcommand)]
enum CategoryCommand {
    /// Create a category
    Add {
        /// Category name
        name: String,
    },

    /// List categories, A to Z
    List,
}

#[derive(Subcommand)]
enum ExpenseCommand {
    /// Record an expense
    Add {
        /// What the money went to
        #[arg(long)]
        description: String,

        /// Amount spent
        #[arg(long)]
        amount: Decimal,

        /// Category name or id
        #[arg(long)]
        category: String,

        /// Date of the expense (YYYY-MM-DD, defaults to now)
        #[arg(long)]
        date: Option<NaiveDate>,
    },

    /// List expenses, newest first
    List,

    /// Delete an expense
    Delete {
        /// Expense id
        id: i64,
    },
}

#[derive(Subcommand)]
enum BudgetCommand {
    /// Set the monthly limit for a category
    Set {
        /// Category name or id
        #[arg(long)]
        category: String,

        /// Spending limit for the month
        #[arg(long)]
        limit: Decimal,

        /// Month (1-12)
        #[arg(long)]
        month: i32,

        /// Year
        #[arg(long)]
        year: i32,
    },

    /// List budgets
    List {
        /// Only this month (goes with --year)
        #[arg(long)]
        month: Option<i32>,

        /// Only this year (goes with --month)
        #[arg(long)]
        year: Option<i32>,
    },
}

#[derive(Subcommand)]
enum GoalCommand {
    /// Create a savings goal
    Add {
        /// Goal name
        #[arg(long)]
        name: String,

        /// Target amount
        #[arg(long)]
        target: Decimal,

        /// Optional deadline (YYYY-MM-DD)
        #[arg(long)]
        date: Option<NaiveDate>,
    },

    /// List goals, newest first
    List {
        /// Show the server's copy instead of the local store
        #[arg(long)]
        remote: bool,
    },

    /// Delete a goal and its contributions (server copy best effort)
    Delete {
        /// Goal id
        id: i64,
    },

    /// Add money to a goal
    Contribute {
        /// Goal id
        id: i64,

        /// Amount to add
        amount: Decimal,
    },

    /// List a goal's contributions, newest first
    Contributions {
        /// Goal id
        id: i64,
    },
}

#[derive(Subcommand)]
enum ReportCommand {
    /// Total spending per category
    CategorySpending {
        /// Narrow to a month (1-12)
        #[arg(long)]
        month: Option<i32>,

        /// Narrow to a year
        #[arg(long)]
        year: Option<i32>,
    },

    /// Spending against each budget's limit
    BudgetAdherence,

    /// Total spending per month
    MonthlySpending,

    /// Cumulative savings over time
    SavingsForecast,
}

#[tokio::main]
async fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();
    let ctx = AppContext::new(cli.db, cli.api_url)?;

    match cli.command {
        Command::Category { command } => match command {
            CategoryCommand::Add { name } => {
                let category = ctx.categories.create_category(&name).await?;
                println!("Added category '{}' (id {})", category.name, category.id);
            }
            CategoryCommand::List => {
                output::print_categories(&ctx.categories.list_categories()?);
            }
        },

        Command::Expense { command } => match command {
            ExpenseCommand::Add {
                description,
                amount,
                category,
                date,
            } => {
                let category_id = resolve_category(&ctx, &category)?;
                let occurred_at = date
                    .and_then(|day| day.and_hms_opt(0, 0, 0))
                    .map(|midnight| midnight.and_utc())
                    .unwrap_or_else(Utc::now);

                let expense = ctx
                    .expenses
                    .add_expense(NewExpense {
                        description,
                        amount,
                        category_id,
                        occurred_at,
                    })
                    .await?;
                println!(
                    "Recorded expense '{}' of {} (id {})",
                    expense.description, expense.amount, expense.id
                );
            }
            ExpenseCommand::List => {
                output::print_expenses(&ctx.expenses.list_expenses()?);
            }
            ExpenseCommand::Delete { id } => {
                ctx.expenses.delete_expense(id).await?;
                println!("Expense {} deleted.", id);
            }
        },

        Command::Budget { command } => match command {
            BudgetCommand::Set {
                category,
                limit,
                month,
                year,
            } => {
                let category_id = resolve_category(&ctx, &category)?;
                let budget = ctx
                    .budgets
                    .set_budget(fintrack_core::budgets::NewBudget {
                        category_id,
                        amount_limit: limit,
                        month,
                        year,
                    })
                    .await?;
                println!(
                    "Budget of {} set for category {} in {}/{} (id {})",
                    budget.amount_limit, budget.category_id, budget.month, budget.year, budget.id
                );
            }
            BudgetCommand::List { month, year } => {
                let budgets = match (month, year) {
                    (Some(month), Some(year)) => ctx.budgets.list_budgets_for_month(month, year)?,
                    (None, None) => ctx.budgets.list_budgets()?,
                    _ => bail!("--month and --year go together"),
                };
                output::print_budgets(&budgets);
            }
        },

        Command::Goal { command } => match command {
            GoalCommand::Add { name, target, date } => {
                let goal = ctx
                    .goals
                    .add_goal(NewSavingsGoal {
                        name,
                        target_amount: target,
                        target_date: date,
                    })
                    .await?;
                println!("Added goal '{}' (id {})", goal.name, goal.id);
            }
            GoalCommand::List { remote } => {
                if remote {
                    output::print_remote_goals(&ctx.api.list_savings_goals().await?);
                } else {
                    output::print_goals(&ctx.goals.list_goals()?);
                }
            }
            GoalCommand::Delete { id } => {
                let outcome = ctx.delete_coordinator.delete_goal(id).await?;
                output::print_delete_outcome(&outcome);
            }
            GoalCommand::Contribute { id, amount } => {
                let contribution = ctx.goals.contribute(id, amount).await?;
                let goal = ctx.goals.get_goal(id)?;
                println!(
                    "Added {} to '{}' ({} of {} saved)",
                    contribution.amount, goal.name, goal.current_amount, goal.target_amount
                );
            }
            GoalCommand::Contributions { id } => {
                output::print_contributions(&ctx.goals.list_contributions(id)?);
            }
        },

        Command::Sync => match ctx.orchestrator.run_sync_pass().await {
            Ok(outcome) => output::print_sync_outcome(&outcome),
            Err(error) if error.is_transport() => {
                println!("Sync failed: check your network connection.");
                process::exit(1);
            }
            Err(error) => return Err(error.into()),
        },

        Command::Report { command } => match command {
            ReportCommand::CategorySpending { month, year } => {
                output::print_category_spending(&ctx.api.category_spending(month, year).await?);
            }
            ReportCommand::BudgetAdherence => {
                output::print_budget_adherence(&ctx.api.budget_adherence().await?);
            }
            ReportCommand::MonthlySpending => {
                output::print_monthly_spending(&ctx.api.monthly_spending().await?);
            }
            ReportCommand::SavingsForecast => {
                output::print_savings_forecast(&ctx.api.savings_forecast().await?);
            }
        },
    }

    Ok(())
}

/// Accepts either a numeric category id or a category name.
fn resolve_category(ctx: &AppContext, reference: &str) -> Result<i64> {
    if let Ok(id) = reference.parse::<i64>() {
        return Ok(id);
    }
    match ctx.categories.find_by_name(reference)? {
        Some(category) => Ok(category.id),
        None => bail!(
            "No category named '{}'. Create it with `fintrack category add`.",
            reference
        ),
    }
}
