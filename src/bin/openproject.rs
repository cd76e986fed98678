//! OpenProject API CLI binary.
//!
//! A command-line interface for interacting with the OpenProject API.

use std::io::Write;
use std::process::ExitCode;

use clap::Parser;
use openproject::cli::{Cli, Command, Entity};
use openproject::{
    activities_from_href, auto_page_turn_with, Activity, Attachment, Category, CategoryQuery,
    Collection, Delete, FilterOptions, Get, List, OpenProjectClient, OpenProjectError,
    PageTurnOptions, PrettyPrint, Project, Query, Status, User, WikiPage, WorkPackage,
    WorkPackageQuery, LIST_ALL_PAGE_SIZE,
};
use serde::Serialize;
use tabled::{Table, Tabled};

/// Page size of single page listings when none is given.
const DEFAULT_CLI_PAGE_SIZE: u32 = 20;

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_max_level(cli.log_level())
        .init();

    let client = match OpenProjectClient::from_env() {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Error: {e}");
            eprintln!("Hint: Set OPENPROJECT_URL (and OPENPROJECT_API_KEY) environment variables");
            return ExitCode::FAILURE;
        }
    };

    match run(&client, cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {e}");
            ExitCode::FAILURE
        }
    }
}

async fn run(client: &OpenProjectClient, cli: Cli) -> openproject::Result<()> {
    let filters = cli.command.filter_options();
    match cli.command {
        Command::Get { entity, id } => handle_get(client, entity, id, cli.json).await,
        Command::List {
            entity,
            offset,
            page_size,
            all,
            project,
            work_package,
            ..
        } => {
            let mode = if all {
                ListMode::All {
                    page_size: page_size.unwrap_or(LIST_ALL_PAGE_SIZE),
                }
            } else {
                ListMode::Page {
                    offset: offset.unwrap_or(1),
                    page_size: page_size.unwrap_or(DEFAULT_CLI_PAGE_SIZE),
                }
            };
            let scope = ListScope {
                filters,
                project,
                work_package,
            };
            handle_list(client, entity, scope, mode, cli.json).await
        }
        Command::Delete { entity, id } => handle_delete(client, entity, id).await,
        Command::Download { id, output } => {
            let content = Attachment::download(client, id).await?;
            match output {
                Some(path) => {
                    tokio::fs::write(&path, &content).await?;
                    eprintln!("Wrote {} bytes to {}", content.len(), path.display());
                }
                None => std::io::stdout().write_all(&content)?,
            }
            Ok(())
        }
    }
}

fn parse_id(id: &str) -> openproject::Result<u64> {
    id.parse()
        .map_err(|_| OpenProjectError::InvalidArgument(format!("'{id}' is not a numeric ID")))
}

async fn handle_get(
    client: &OpenProjectClient,
    entity: Entity,
    id: String,
    json: bool,
) -> openproject::Result<()> {
    match entity {
        Entity::WorkPackage => {
            output_single(&WorkPackage::get(client, parse_id(&id)?).await?, json)
        }
        Entity::User => output_single(&User::get(client, id).await?, json),
        Entity::Project => output_single(&Project::get(client, parse_id(&id)?).await?, json),
        Entity::Status => output_single(&Status::get(client, parse_id(&id)?).await?, json),
        Entity::Query => output_single(&Query::get(client, parse_id(&id)?).await?, json),
        Entity::Attachment => output_single(&Attachment::get(client, parse_id(&id)?).await?, json),
        Entity::Activity => output_single(&Activity::get(client, parse_id(&id)?).await?, json),
        Entity::Category => output_single(&Category::get(client, parse_id(&id)?).await?, json),
        Entity::WikiPage => output_single(&WikiPage::get(client, parse_id(&id)?).await?, json),
    }
}

/// How much of a listing to fetch.
#[derive(Debug, Clone, Copy)]
enum ListMode {
    Page { offset: u32, page_size: u32 },
    All { page_size: u32 },
}

/// Filters and parents of a listing.
struct ListScope {
    filters: FilterOptions,
    project: Option<String>,
    work_package: Option<u64>,
}

async fn handle_list(
    client: &OpenProjectClient,
    entity: Entity,
    scope: ListScope,
    mode: ListMode,
    json: bool,
) -> openproject::Result<()> {
    match entity {
        Entity::WorkPackage => {
            let query = WorkPackageQuery {
                project: scope.project,
                filters: scope.filters,
            };
            let page = fetch::<WorkPackage>(client, &query, mode).await?;
            output_page(&page, mode, json, |x| WorkPackageRow::from(x))
        }
        Entity::User => {
            let page = fetch::<User>(client, &scope.filters, mode).await?;
            output_page(&page, mode, json, |x| UserRow::from(x))
        }
        Entity::Project => {
            let page = fetch::<Project>(client, &scope.filters, mode).await?;
            output_page(&page, mode, json, |x| ProjectRow::from(x))
        }
        Entity::Status => {
            let page = fetch::<Status>(client, &scope.filters, mode).await?;
            output_page(&page, mode, json, |x| StatusRow::from(x))
        }
        Entity::Query => {
            let page = fetch::<Query>(client, &scope.filters, mode).await?;
            output_page(&page, mode, json, |x| QueryRow::from(x))
        }
        Entity::Category => {
            let project = scope.project.ok_or_else(|| {
                OpenProjectError::InvalidArgument(
                    "--project required for listing categories".to_string(),
                )
            })?;
            let page = fetch::<Category>(client, &CategoryQuery::for_project(project), mode).await?;
            output_page(&page, mode, json, |x| CategoryRow::from(x))
        }
        Entity::Activity => {
            let work_package = scope.work_package.ok_or_else(|| {
                OpenProjectError::InvalidArgument(
                    "--work-package required for listing activities".to_string(),
                )
            })?;
            let href = format!("/api/v3/work_packages/{work_package}/activities");
            let page = activities_from_href(client, &href).await?;
            output_page(&page, ListMode::All { page_size: 0 }, json, |x| ActivityRow::from(x))
        }
        Entity::Attachment | Entity::WikiPage => Err(OpenProjectError::InvalidArgument(format!(
            "{entity:?} resources cannot be listed"
        ))),
    }
}

async fn fetch<T: List>(
    client: &OpenProjectClient,
    query: &T::Query,
    mode: ListMode,
) -> openproject::Result<Collection<T>> {
    match mode {
        ListMode::Page { offset, page_size } => {
            T::list_page(client, query, offset, page_size).await
        }
        ListMode::All { page_size } => {
            let client = client.clone();
            let turn = auto_page_turn_with(
                query.clone(),
                PageTurnOptions::new(page_size),
                move |query: T::Query, offset, page_size| {
                    let client = client.clone();
                    async move { T::list_page(&client, &query, offset, page_size).await }
                },
            )
            .await?;

            for failure in &turn.failures {
                eprintln!("Warning: page {} could not be fetched: {}", failure.page, failure.error);
            }
            Ok(turn.result)
        }
    }
}

async fn handle_delete(
    client: &OpenProjectClient,
    entity: Entity,
    id: u64,
) -> openproject::Result<()> {
    match entity {
        Entity::WorkPackage => WorkPackage::delete(client, id).await?,
        Entity::User => User::delete(client, id).await?,
        Entity::Query => Query::delete(client, id).await?,
        other => {
            return Err(OpenProjectError::InvalidArgument(format!(
                "{other:?} resources cannot be deleted"
            )))
        }
    }
    eprintln!("Deleted {entity:?} {id}");
    Ok(())
}

fn output_single<T: Serialize + PrettyPrint>(item: &T, json: bool) -> openproject::Result<()> {
    if json {
        println!("{}", serde_json::to_string_pretty(item)?);
    } else {
        println!("{}", item.pretty_print());
    }
    Ok(())
}

fn output_page<T, R, F>(
    page: &Collection<T>,
    mode: ListMode,
    json: bool,
    to_row: F,
) -> openproject::Result<()>
where
    T: Serialize,
    R: Tabled,
    F: Fn(&T) -> R,
{
    if json {
        println!("{}", serde_json::to_string_pretty(page.elements())?);
        return Ok(());
    }

    let rows: Vec<R> = page.iter().map(to_row).collect();
    println!("{}", Table::new(rows));

    match mode {
        ListMode::Page { offset, page_size } => {
            let total_pages = page.total.div_ceil(u64::from(page_size.max(1)));
            println!("\nPage {}/{} ({} total items)", offset, total_pages, page.total);
        }
        ListMode::All { .. } => println!("\n{} of {} items", page.len(), page.total),
    }
    Ok(())
}

// Table row types for non-JSON output

#[derive(Tabled)]
struct WorkPackageRow {
    id: u64,
    #[tabled(rename = "type")]
    kind: String,
    status: String,
    subject: String,
    assignee: String,
}

impl From<&WorkPackage> for WorkPackageRow {
    fn from(wp: &WorkPackage) -> Self {
        Self {
            id: wp.id,
            kind: wp.type_name().unwrap_or_default().to_string(),
            status: wp.status_name().unwrap_or_default().to_string(),
            subject: wp.subject.clone(),
            assignee: wp.assignee_name().unwrap_or_default().to_string(),
        }
    }
}

#[derive(Tabled)]
struct UserRow {
    id: u64,
    login: String,
    name: String,
    status: String,
}

impl From<&User> for UserRow {
    fn from(u: &User) -> Self {
        Self {
            id: u.id,
            login: u.login.clone().unwrap_or_default(),
            name: u.name.clone(),
            status: u.status.clone().unwrap_or_default(),
        }
    }
}

#[derive(Tabled)]
struct ProjectRow {
    id: u64,
    identifier: String,
    name: String,
    active: bool,
}

impl From<&Project> for ProjectRow {
    fn from(p: &Project) -> Self {
        Self {
            id: p.id,
            identifier: p.identifier.clone(),
            name: p.name.clone(),
            active: p.active,
        }
    }
}

#[derive(Tabled)]
struct StatusRow {
    id: u64,
    name: String,
    closed: bool,
    default: bool,
}

impl From<&Status> for StatusRow {
    fn from(s: &Status) -> Self {
        Self {
            id: s.id,
            name: s.name.clone(),
            closed: s.is_closed,
            default: s.is_default,
        }
    }
}

#[derive(Tabled)]
struct QueryRow {
    id: u64,
    name: String,
    public: bool,
    starred: bool,
}

impl From<&Query> for QueryRow {
    fn from(q: &Query) -> Self {
        Self {
            id: q.id,
            name: q.name.clone(),
            public: q.public,
            starred: q.starred,
        }
    }
}

#[derive(Tabled)]
struct CategoryRow {
    id: u64,
    name: String,
}

impl From<&Category> for CategoryRow {
    fn from(c: &Category) -> Self {
        Self {
            id: c.id,
            name: c.name.clone(),
        }
    }
}

#[derive(Tabled)]
struct ActivityRow {
    id: u64,
    version: u32,
    user: String,
    comment: String,
}

impl From<&Activity> for ActivityRow {
    fn from(a: &Activity) -> Self {
        Self {
            id: a.id,
            version: a.version,
            user: a.user_name().unwrap_or_default().to_string(),
            comment: a.comment_text().unwrap_or_default().to_string(),
        }
    }
}
