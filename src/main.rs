use clap::Parser;
use gbfs_console::app::screens::{
    CacheAction, CacheScreen, FeedProvidersScreen, Lifecycle, SpatialIndexScreen, StatusBoard,
    StopPlaceMap, ValidationScreen,
};
use gbfs_console::app::views;
use gbfs_console::config::cli::{
    BulkCommand, CacheCommand, Command, LifecycleArgs, ProvidersCommand, SpatialCommand,
    StopsCommand, ValidationCommand,
};
use gbfs_console::config::OutputFormat;
use gbfs_console::core::alert::Alert;
use gbfs_console::core::poller::{Poller, Settled};
use gbfs_console::core::stop_place_table::{Paging, SortOrder};
use gbfs_console::domain::model::FeedProvider;
use gbfs_console::domain::ports::AdminApi;
use gbfs_console::utils::error::ErrorSeverity;
use gbfs_console::utils::output::{self, Table};
use gbfs_console::utils::prompt::{self, Question};
use gbfs_console::utils::{logger, validation::Validate};
use gbfs_console::{Backend, Cli, ConsoleConfig, Result};
use serde::Serialize;
use std::ops::ControlFlow;
use std::path::Path;
use std::time::Duration;

struct Console {
    config: ConsoleConfig,
    backend: Backend,
    assume_yes: bool,
}

impl Console {
    fn format(&self) -> OutputFormat {
        self.config.output.format
    }

    fn emit<T: Serialize + ?Sized>(&self, table: &Table, value: &T) -> Result<()> {
        print!("{}", output::render(self.format(), table, value)?);
        Ok(())
    }

    fn confirm(&self, question: Question<'_>) -> Result<()> {
        prompt::confirm(question, self.assume_yes)
    }
}

fn report(alert: Option<&Alert>) {
    if let Some(alert) = alert {
        eprintln!("{}", alert);
    }
}

fn interval_or(seconds: Option<u64>, default: Duration) -> Duration {
    seconds
        .map(|s| Duration::from_secs(s.max(1)))
        .unwrap_or(default)
}

async fn ctrl_c() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::warn!("Could not listen for Ctrl-C: {}", e);
        std::future::pending::<()>().await;
    }
}

fn read_provider(path: &Path) -> Result<FeedProvider> {
    let content = std::fs::read_to_string(path)?;
    Ok(serde_json::from_str(&content)?)
}

async fn run_providers(console: &Console, command: ProvidersCommand) -> Result<()> {
    let mut screen = FeedProvidersScreen::new(&console.backend.admin);

    let result = match command {
        ProvidersCommand::List => {
            screen.load().await?;
            console.emit(&views::provider_table(screen.rows()), screen.rows())
        }
        ProvidersCommand::Show { system_id } => {
            let provider = console.backend.admin.get_provider(&system_id).await?;
            console.emit(&views::provider_detail_table(&provider), &provider)
        }
        ProvidersCommand::Create { file } => screen.create(read_provider(&file)?).await,
        ProvidersCommand::Update { system_id, file } => {
            screen.update(&system_id, read_provider(&file)?).await
        }
        ProvidersCommand::Delete { system_id } => {
            console.confirm(Question {
                title: "Delete feed provider",
                message: &format!("Delete {} and stop its subscription?", system_id),
                warning: None,
                action: "Delete",
            })?;
            screen.delete(&system_id).await
        }
        ProvidersCommand::Start(args) => lifecycle(console, &mut screen, args, Lifecycle::Start).await,
        ProvidersCommand::Stop(args) => lifecycle(console, &mut screen, args, Lifecycle::Stop).await,
        ProvidersCommand::Restart(args) => {
            lifecycle(console, &mut screen, args, Lifecycle::Restart).await
        }
        ProvidersCommand::Enable { system_id } => screen.set_enabled(&system_id, true).await,
        ProvidersCommand::Disable { system_id } => screen.set_enabled(&system_id, false).await,
        ProvidersCommand::Statuses => {
            let statuses = console.backend.admin.get_subscription_statuses().await?;
            console.emit(&views::subscription_table(&statuses), &statuses)
        }
        ProvidersCommand::Watch { interval } => {
            screen.load().await?;
            let period = interval_or(interval, console.config.polling.admin_interval());
            let format = console.format();
            Poller::new(period)
                .run(&mut screen, ctrl_c(), move |screen| {
                    Box::pin(async move {
                        screen.refresh_statuses().await;
                        let table = views::provider_table(screen.rows());
                        match output::render(format, &table, screen.rows()) {
                            Ok(text) => {
                                println!();
                                print!("{}", text);
                                ControlFlow::Continue(())
                            }
                            Err(e) => {
                                tracing::error!("Rendering failed: {}", e);
                                ControlFlow::Break(())
                            }
                        }
                    })
                })
                .await;
            Ok(())
        }
        ProvidersCommand::Migrate => screen.migrate_from_file().await.map(|_| ()),
        ProvidersCommand::Bulk { action } => bulk(console, &mut screen, action).await,
    };

    report(screen.alert());
    result
}

async fn lifecycle<A: AdminApi>(
    console: &Console,
    screen: &mut FeedProvidersScreen<'_, A>,
    args: LifecycleArgs,
    action: Lifecycle,
) -> Result<()> {
    screen.lifecycle(&args.system_id, action).await?;
    if !args.wait {
        return Ok(());
    }

    report(screen.take_alert().as_ref());
    let poller = Poller::new(console.config.polling.admin_interval());
    match screen
        .wait_until_settled(&args.system_id, poller, console.config.polling.settle_timeout())
        .await
    {
        Settled::Reached(status) => {
            println!("{} is {}", args.system_id, status);
        }
        Settled::TimedOut(last) => {
            let last = last.map(|s| s.to_string()).unwrap_or_else(|| "unknown".to_string());
            println!("{} is still {}", args.system_id, last);
        }
    }
    Ok(())
}

async fn bulk<A: AdminApi>(
    console: &Console,
    screen: &mut FeedProvidersScreen<'_, A>,
    command: BulkCommand,
) -> Result<()> {
    let (action, targets) = command.split();
    screen.load().await?;
    if targets.all {
        screen.select_all();
    } else {
        screen.select(targets.system_ids.iter().cloned());
    }

    let report = screen.bulk(action).await?;
    let retry = report.retry_ids();
    if !retry.is_empty() {
        let ids: Vec<&str> = retry.iter().map(String::as_str).collect();
        tracing::info!("Retry with: providers bulk {} {}", action, ids.join(" "));
    }
    console.emit(&views::bulk_table(&report), &report)
}

async fn run_cache(console: &Console, command: CacheCommand) -> Result<()> {
    let mut screen = CacheScreen::new(&console.backend.admin);
    let action = match command {
        CacheCommand::Keys => {
            screen.load().await?;
            let groups = screen.groups();
            return console.emit(&views::cache_table(&groups), &groups);
        }
        CacheCommand::ClearVehicles => CacheAction::ClearVehicleCache,
        CacheCommand::ClearOld => CacheAction::ClearOldCache,
        CacheCommand::ClearDb => CacheAction::ClearDatabase,
    };

    console.confirm(action.confirmation().question())?;
    let result = screen.run(action).await;
    report(screen.alert());
    result
}

async fn run_spatial(console: &Console, command: SpatialCommand) -> Result<()> {
    let mut screen = SpatialIndexScreen::new(&console.backend.admin);
    let loaded = screen.load().await;
    if loaded.is_err() {
        report(screen.alert());
        return loaded;
    }

    match command {
        SpatialCommand::Orphans => {
            console.emit(&views::list_table("ORPHAN", screen.orphans()), screen.orphans())
        }
        SpatialCommand::ClearOrphans => {
            if !screen.can_clear_orphans() {
                println!("No orphans to clear");
                return Ok(());
            }
            console.confirm(gbfs_console::app::screens::spatial_index::CLEAR_ORPHANS.question())?;
            let result = screen.clear_orphans().await.map(|_| ());
            report(screen.alert());
            result
        }
    }
}

async fn run_status(console: &Console, watch: bool, interval: Option<u64>) -> Result<()> {
    let mut board = StatusBoard::new(&console.backend.status, &console.backend.validation);
    if let Err(e) = board.load().await {
        report(board.alert());
        return Err(e);
    }

    if !watch {
        let rows = board.rows();
        return console.emit(&views::board_table(&rows), &rows);
    }

    let period = interval_or(interval, console.config.polling.status_interval());
    let format = console.format();
    Poller::new(period)
        .run(&mut board, ctrl_c(), move |board| {
            Box::pin(async move {
                board.refresh().await;
                let rows = board.rows();
                match output::render(format, &views::board_table(&rows), &rows) {
                    Ok(text) => {
                        println!();
                        print!("{}", text);
                        ControlFlow::Continue(())
                    }
                    Err(e) => {
                        tracing::error!("Rendering failed: {}", e);
                        ControlFlow::Break(())
                    }
                }
            })
        })
        .await;
    Ok(())
}

async fn run_validation(console: &Console, command: ValidationCommand) -> Result<()> {
    let mut screen = ValidationScreen::new(&console.backend.validation);

    let result = match command {
        ValidationCommand::List => match screen.load().await {
            Ok(()) => {
                let rows = screen.summaries();
                console.emit(&views::report_summary_table(&rows), &rows)
            }
            Err(e) => Err(e),
        },
        ValidationCommand::Show { system_id, details } => match screen.load().await {
            Ok(()) => screen.show(&system_id).and_then(|view| match console.format() {
                OutputFormat::Json => {
                    println!("{}", serde_json::to_string_pretty(&view)?);
                    Ok(())
                }
                _ => {
                    print!("{}", view.render(details));
                    Ok(())
                }
            }),
            Err(e) => Err(e),
        },
        ValidationCommand::History { system_id } => match screen.history(&system_id).await {
            Ok(rows) => console.emit(&views::report_summary_table(&rows), &rows),
            Err(e) => Err(e),
        },
    };

    report(screen.alert());
    result
}

async fn run_map(console: &Console, system_ids: Vec<String>, out: Option<&Path>) -> Result<()> {
    let mut map = StopPlaceMap::new(&console.backend.gbfs, &console.config.map);
    let loaded = map.load(&system_ids).await;
    report(map.alert());
    loaded?;

    let composition = map.compose();
    let json = serde_json::to_string_pretty(&composition.style)?;
    match out {
        Some(path) => {
            std::fs::write(path, json)?;
            eprintln!(
                "Wrote {} stations to {} ({} skipped)",
                composition.station_count,
                path.display(),
                composition.skipped
            );
        }
        None => println!("{}", json),
    }
    Ok(())
}

async fn run_stops(console: &Console, command: StopsCommand) -> Result<()> {
    let StopsCommand::List {
        system_ids,
        sort,
        desc,
        page,
        per_page,
    } = command;
    let paging = Paging { page, per_page };
    paging.validate()?;

    let mut map = StopPlaceMap::new(&console.backend.gbfs, &console.config.map);
    let loaded = map.load(&system_ids).await;
    report(map.alert());
    loaded?;

    let order = if desc {
        SortOrder::Descending
    } else {
        SortOrder::Ascending
    };
    let page = map.page(sort, order, paging)?;
    console.emit(&views::stop_place_table(&page.rows), &page)?;
    if console.format() == OutputFormat::Table {
        let pages = page.total.div_ceil(page.per_page).max(1);
        eprintln!("Page {} of {} ({} stop places)", page.page, pages, page.total);
    }
    Ok(())
}

async fn run(cli: Cli) -> Result<()> {
    let mut config = ConsoleConfig::load(cli.config.as_deref())?;
    config.apply_overrides(cli.base_url, cli.token, cli.format);
    config.validate()?;

    let backend = Backend::from_config(&config)?;
    let console = Console {
        config,
        backend,
        assume_yes: cli.yes,
    };

    match cli.command {
        Command::Providers { command } => run_providers(&console, command).await,
        Command::Cache { command } => run_cache(&console, command).await,
        Command::Spatial { command } => run_spatial(&console, command).await,
        Command::Status { watch, interval } => run_status(&console, watch, interval).await,
        Command::Validation { command } => run_validation(&console, command).await,
        Command::Map { system_ids, out } => run_map(&console, system_ids, out.as_deref()).await,
        Command::Stops { command } => run_stops(&console, command).await,
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    logger::init_logger(cli.verbose, cli.log_json);
    tracing::debug!("Command: {:?}", cli.command);

    if let Err(e) = run(cli).await {
        tracing::debug!(
            "Command failed: {} (Category: {:?}, Severity: {:?})",
            e,
            e.category(),
            e.severity()
        );
        eprintln!("❌ {}", e.user_friendly_message());
        eprintln!("💡 {}", e.recovery_suggestion());

        let exit_code = match e.severity() {
            ErrorSeverity::Low => 0,
            ErrorSeverity::Medium => 2,
            ErrorSeverity::High => 1,
            ErrorSeverity::Critical => 3,
        };
        if exit_code > 0 {
            std::process::exit(exit_code);
        }
    }

    Ok(())
}
