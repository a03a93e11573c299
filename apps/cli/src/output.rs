//! Terminal rendering for listings and outcome messages.

use fintrack_api_client::{
    BudgetAdherenceReport, CategorySpendingReport, MonthlySpendingReport, SavingsForecastReport,
};
use fintrack_core::budgets::Budget;
use fintrack_core::categories::Category;
use fintrack_core::expenses::Expense;
use fintrack_core::goals::{Contribution, SavingsGoal};
use fintrack_core::sync::{DeleteOutcome, GoalServerRecord, RemoteDeleteOutcome, SyncOutcome};

fn sync_marker(synced: bool) -> &'static str {
    if synced {
        "[synced]"
    } else {
        "[local]"
    }
}

pub fn print_categories(categories: &[Category]) {
    if categories.is_empty() {
        println!("No categories yet.");
        return;
    }
    for category in categories {
        println!(
            "{:4}  {:<24}  {}",
            category.id,
            category.name,
            sync_marker(category.synced)
        );
    }
}

pub fn print_expenses(expenses: &[Expense]) {
    if expenses.is_empty() {
        println!("No expenses recorded.");
        return;
    }
    for expense in expenses {
        println!(
            "{:4}  {}  {:>10}  {:<8}  {}",
            expense.id,
            expense.occurred_at.format("%Y-%m-%d"),
            expense.amount,
            sync_marker(expense.synced),
            expense.description
        );
    }
}

pub fn print_budgets(budgets: &[Budget]) {
    if budgets.is_empty() {
        println!("No budgets set.");
        return;
    }
    for budget in budgets {
        println!(
            "{:4}  {:>2}/{}  category {:<4}  limit {:>10}  {}",
            budget.id,
            budget.month,
            budget.year,
            budget.category_id,
            budget.amount_limit,
            sync_marker(budget.synced)
        );
    }
}

pub fn print_goals(goals: &[SavingsGoal]) {
    if goals.is_empty() {
        println!("No savings goals yet.");
        return;
    }
    for goal in goals {
        let deadline = goal
            .target_date
            .map(|date| date.to_string())
            .unwrap_or_else(|| "open-ended".to_string());
        println!(
            "{:4}  {:<24}  {:>10} of {:<10}  {:<10}  {}",
            goal.id,
            goal.name,
            goal.current_amount,
            goal.target_amount,
            deadline,
            sync_marker(goal.synced)
        );
    }
}

pub fn print_remote_goals(goals: &[GoalServerRecord]) {
    if goals.is_empty() {
        println!("No goals on the server.");
        return;
    }
    for goal in goals {
        let deadline = goal
            .target_date
            .map(|date| date.to_string())
            .unwrap_or_else(|| "open-ended".to_string());
        println!(
            "{:4}  {:<24}  {:>10} of {:<10}  {}",
            goal.id, goal.name, goal.current_amount, goal.target_amount, deadline
        );
    }
}

pub fn print_contributions(contributions: &[Contribution]) {
    if contributions.is_empty() {
        println!("No contributions yet.");
        return;
    }
    for contribution in contributions {
        println!(
            "{:4}  {}  {:>10}  {}",
            contribution.id,
            contribution.created_at.format("%Y-%m-%d"),
            contribution.amount,
            sync_marker(contribution.synced)
        );
    }
}

pub fn print_sync_outcome(outcome: &SyncOutcome) {
    match outcome {
        SyncOutcome::UpToDate => println!("Everything is up to date."),
        SyncOutcome::Completed(summary) => {
            println!("Sync complete!");
            println!("  Categories:    {}", summary.categories);
            println!("  Expenses:      {}", summary.expenses);
            println!("  Budgets:       {}", summary.budgets);
            println!("  Goals:         {}", summary.goals);
            println!("  Contributions: {}", summary.contributions);
        }
    }
}

pub fn print_delete_outcome(outcome: &DeleteOutcome) {
    match outcome.remote {
        RemoteDeleteOutcome::Failed { status } => println!(
            "Could not delete from server (code {}). Deleted locally.",
            status
        ),
        RemoteDeleteOutcome::Unreachable => {
            println!("Goal deleted locally (server unreachable).")
        }
        _ => println!("Goal deleted."),
    }
    if outcome.contributions_removed > 0 {
        println!(
            "  Removed {} contribution(s).",
            outcome.contributions_removed
        );
    }
}

pub fn print_category_spending(rows: &[CategorySpendingReport]) {
    if rows.is_empty() {
        println!("No spending recorded.");
        return;
    }
    for row in rows {
        println!("{:<24}  {:>12}", row.category_name, row.total_amount);
    }
}

pub fn print_budget_adherence(rows: &[BudgetAdherenceReport]) {
    if rows.is_empty() {
        println!("No budgets on the server.");
        return;
    }
    for row in rows {
        println!(
            "{:<24}  limit {:>10}  spent {:>10}  remaining {:>10}",
            row.category_name, row.amount_limit, row.total_spent, row.remaining_amount
        );
    }
}

pub fn print_monthly_spending(rows: &[MonthlySpendingReport]) {
    if rows.is_empty() {
        println!("No spending recorded.");
        return;
    }
    for row in rows {
        println!("{:>2}/{}  {:>12}", row.month, row.year, row.total_amount);
    }
}

pub fn print_savings_forecast(rows: &[SavingsForecastReport]) {
    if rows.is_empty() {
        println!("No contributions on the server.");
        return;
    }
    for row in rows {
        println!("{}  {:>12}", row.contribution_date, row.cumulative_amount);
    }
}
