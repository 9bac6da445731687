use std::{path::PathBuf, sync::Arc};

use anyhow::Result;
use clap::{Parser, Subcommand};
use client_core::{
    render::filter_icon, CatalogClient, FilterKey, GroupView, HttpCatalogClient,
    MissingCatalogClient, ProgramDetail, ProgramTab, ResourceLibrary, ResultRow, TabContent,
};
use tracing::warn;
use tracing_subscriber::EnvFilter;

mod config;

#[derive(Parser, Debug)]
struct Cli {
    #[arg(long, default_value = config::DEFAULT_CONFIG_PATH)]
    config: PathBuf,
    /// Overrides the configured catalog url.
    #[arg(long)]
    catalog_url: Option<String>,
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// List the program directory.
    Programs,
    /// Render one program's detail page.
    Program {
        slug: String,
        #[arg(long, default_value = "")]
        query: String,
        #[arg(long, value_parser = parse_tab)]
        tab: Option<ProgramTab>,
    },
    /// Render the resource library.
    Library {
        #[arg(long, default_value = "")]
        query: String,
        #[arg(long, value_parser = parse_filter)]
        filter: Option<FilterKey>,
        #[arg(long, default_value = "")]
        search: String,
    },
}

fn parse_tab(raw: &str) -> Result<ProgramTab, String> {
    ProgramTab::parse(raw).ok_or_else(|| format!("unknown tab '{raw}'"))
}

fn parse_filter(raw: &str) -> Result<FilterKey, String> {
    FilterKey::parse(raw).ok_or_else(|| format!("unknown filter '{raw}'"))
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let mut settings = config::load_settings(&cli.config)?;
    if let Some(url) = cli.catalog_url.as_deref() {
        settings.catalog_url = config::normalize_catalog_url(url);
    }

    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&settings.log_filter))
        .unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    let catalog: Arc<dyn CatalogClient> = match settings.catalog_url.as_deref() {
        Some(url) => Arc::new(HttpCatalogClient::new(url)?),
        None => {
            warn!("no catalog url configured; every load will fail");
            Arc::new(MissingCatalogClient)
        }
    };

    match cli.command {
        Command::Programs => list_programs(catalog).await,
        Command::Program { slug, query, tab } => show_program(catalog, &slug, &query, tab).await,
        Command::Library {
            query,
            filter,
            search,
        } => show_library(catalog, &query, filter, &search).await,
    }
}

async fn list_programs(catalog: Arc<dyn CatalogClient>) -> Result<()> {
    for entry in catalog.list_programs().await? {
        let marker = if entry.known_slug().is_some() { " " } else { "?" };
        println!("{marker} {:<20} {}", entry.slug, entry.name);
    }
    Ok(())
}

async fn show_program(
    catalog: Arc<dyn CatalogClient>,
    slug: &str,
    query: &str,
    tab: Option<ProgramTab>,
) -> Result<()> {
    let detail = ProgramDetail::mount(catalog, slug, query);
    if let Some(tab) = tab {
        let update = detail.select_tab(tab).await;
        println!("location: ?{}", update.query);
    }
    let loaded = detail.load().await;
    let view = detail.view().await;

    println!("{}", view.header.name);
    if let Some(description) = &view.header.description {
        println!("{description}");
    }
    let tabs: Vec<String> = ProgramTab::ALL
        .into_iter()
        .map(|tab| {
            if tab == view.active_tab {
                format!("[{}]", tab.label())
            } else {
                tab.label().to_string()
            }
        })
        .collect();
    println!("{}", tabs.join("  "));

    match view.content {
        Some(TabContent::Overview(counts)) => {
            for (group, count) in counts {
                println!("  {:<10} {count}", group.as_str());
            }
        }
        Some(TabContent::Group(_, GroupView::Empty(message))) => println!("  {message}"),
        Some(TabContent::Group(_, GroupView::Rows(rows))) => print_rows(&rows),
        None => {}
    }

    loaded?;
    Ok(())
}

async fn show_library(
    catalog: Arc<dyn CatalogClient>,
    query: &str,
    filter: Option<FilterKey>,
    search: &str,
) -> Result<()> {
    let library = ResourceLibrary::mount(catalog, query);
    let loaded = match filter {
        Some(filter) => library.select_filter(filter).await,
        None => library.refresh().await,
    };
    library.set_search(search).await;
    let view = library.view().await;

    println!(
        "{} ({})  location: ?{}",
        view.filter.label(),
        filter_icon(view.filter),
        library.query().await.query
    );
    if let Some(error) = &view.error {
        println!("  {error}");
    } else if view.rows.is_empty() {
        println!("  No resources match.");
    } else {
        print_rows(&view.rows);
    }

    loaded?;
    Ok(())
}

fn print_rows(rows: &[ResultRow]) {
    for row in rows {
        let target = row.action.url().unwrap_or("-");
        println!(
            "  {:<9} {:<40} {:<11} {target}",
            row.icon.name(),
            row.name,
            row.action.label()
        );
    }
}
