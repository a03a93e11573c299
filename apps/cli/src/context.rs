//! Process wiring: configuration, database bootstrap, repositories,
//! services, and the sync engine.

use std::env;
use std::fs;
use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context as _, Result};
use log::debug;

use fintrack_api_client::SyncApiClient;
use fintrack_core::budgets::{BudgetRepositoryTrait, BudgetService};
use fintrack_core::categories::{CategoryRepositoryTrait, CategoryService};
use fintrack_core::events::{DomainEventSink, NoopEventSink};
use fintrack_core::expenses::{ExpenseRepositoryTrait, ExpenseService};
use fintrack_core::goals::{ContributionRepositoryTrait, GoalRepositoryTrait, GoalService};
use fintrack_core::sync::{GoalDeleteCoordinator, SyncGatewayTrait, SyncOrchestrator};
use fintrack_storage_sqlite::budgets::BudgetRepository;
use fintrack_storage_sqlite::categories::CategoryRepository;
use fintrack_storage_sqlite::db::{create_pool, init, run_migrations, spawn_writer};
use fintrack_storage_sqlite::expenses::ExpenseRepository;
use fintrack_storage_sqlite::goals::{ContributionRepository, GoalRepository};

const DEFAULT_DATA_DIR: &str = ".fintrack";
const DEFAULT_API_URL: &str = "http://localhost:8080";

pub struct AppContext {
    pub categories: CategoryService,
    pub expenses: ExpenseService,
    pub budgets: BudgetService,
    pub goals: GoalService,
    pub orchestrator: SyncOrchestrator,
    pub delete_coordinator: GoalDeleteCoordinator,
    pub api: Arc<SyncApiClient>,
}

impl AppContext {
    pub fn new(db_flag: Option<PathBuf>, api_url_flag: Option<String>) -> Result<Self> {
        let db_path = resolve_db_path(db_flag)?;
        let api_url = resolve_api_url(api_url_flag);
        debug!("Using database {} and service {}", db_path, api_url);

        run_migrations(&db_path)?;
        let pool = create_pool(&db_path)?;
        let writer = spawn_writer(pool.as_ref().clone());

        let categories_repo: Arc<dyn CategoryRepositoryTrait> =
            Arc::new(CategoryRepository::new(pool.clone(), writer.clone()));
        let expenses_repo: Arc<dyn ExpenseRepositoryTrait> =
            Arc::new(ExpenseRepository::new(pool.clone(), writer.clone()));
        let budgets_repo: Arc<dyn BudgetRepositoryTrait> =
            Arc::new(BudgetRepository::new(pool.clone(), writer.clone()));
        let goals_repo: Arc<dyn GoalRepositoryTrait> =
            Arc::new(GoalRepository::new(pool.clone(), writer.clone()));
        let contributions_repo: Arc<dyn ContributionRepositoryTrait> =
            Arc::new(ContributionRepository::new(pool, writer));

        let api = Arc::new(SyncApiClient::new(&api_url));
        let gateway: Arc<dyn SyncGatewayTrait> = api.clone();
        let events: Arc<dyn DomainEventSink> = Arc::new(NoopEventSink);

        let orchestrator = SyncOrchestrator::new(
            categories_repo.clone(),
            expenses_repo.clone(),
            budgets_repo.clone(),
            goals_repo.clone(),
            contributions_repo.clone(),
            gateway.clone(),
            events.clone(),
        );
        let delete_coordinator = GoalDeleteCoordinator::new(
            goals_repo.clone(),
            contributions_repo.clone(),
            gateway,
            events.clone(),
        );

        Ok(AppContext {
            categories: CategoryService::new(categories_repo.clone(), events.clone()),
            expenses: ExpenseService::new(expenses_repo, categories_repo.clone(), events.clone()),
            budgets: BudgetService::new(budgets_repo, categories_repo, events.clone()),
            goals: GoalService::new(goals_repo, contributions_repo, events),
            orchestrator,
            delete_coordinator,
            api,
        })
    }
}

/// `--db` beats `FINTRACK_DB` beats the default data directory. For an
/// explicit path the parent directory is created as needed.
fn resolve_db_path(flag: Option<PathBuf>) -> Result<String> {
    let explicit = flag.or_else(|| env::var("FINTRACK_DB").ok().map(PathBuf::from));
    match explicit {
        Some(path) => {
            if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
                fs::create_dir_all(parent)
                    .with_context(|| format!("could not create {}", parent.display()))?;
            }
            Ok(path.to_string_lossy().to_string())
        }
        None => Ok(init(DEFAULT_DATA_DIR)?),
    }
}

fn resolve_api_url(flag: Option<String>) -> String {
    flag.or_else(|| env::var("FINTRACK_API_URL").ok())
        .unwrap_or_else(|| DEFAULT_API_URL.to_string())
}
