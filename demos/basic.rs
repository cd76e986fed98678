//! Basic example demonstrating the OpenProject API client.
//!
//! Run with:
//! ```
//! OPENPROJECT_URL=https://op.example.com OPENPROJECT_API_KEY=your-key cargo run --example basic
//! ```

use openproject::{
    auto_page_turn_with, FilterOptions, Get, List, OpenProjectClient, PageTurnOptions, Project,
    SearchOperator, User, WorkPackage, WorkPackageQuery,
};

#[tokio::main]
async fn main() -> openproject::Result<()> {
    // Initialize tracing for debugging (optional)
    tracing_subscriber::fmt::init();

    // Create client from environment variables
    println!("Creating OpenProject client...");
    let client = OpenProjectClient::from_env()?;
    println!("Connected to: {}", client.base_url());

    let me = User::get(&client, "me".to_string()).await?;
    println!("Logged in as {} (#{})", me.name, me.id);

    // List first page of projects
    println!("\n--- Listing Projects (first page) ---");
    let projects = Project::list_page(&client, &FilterOptions::new(), 1, 10).await?;
    println!("Found {} projects (total: {})", projects.len(), projects.total);

    for project in &projects {
        println!("  - {} ({})", project.name, project.identifier);
    }

    let Some(first) = projects.elements().first() else {
        return Ok(());
    };

    // Every open work package of the first project, pages fetched concurrently
    println!("\n--- Open Work Packages in {} ---", first.name);
    let open = FilterOptions::new().with("status", SearchOperator::Equal, "1");
    let query = WorkPackageQuery::from(open).in_project(first.identifier.clone());

    let fetch_client = client.clone();
    let turn = auto_page_turn_with(
        query,
        PageTurnOptions::new(25),
        move |query, offset, page_size| {
            let client = fetch_client.clone();
            async move { WorkPackage::list_page(&client, &query, offset, page_size).await }
        },
    )
    .await?;

    for failure in &turn.failures {
        println!("  page {} missing: {}", failure.page, failure.error);
    }

    let work_packages = turn.into_result();
    println!("Found {} of {} work packages", work_packages.len(), work_packages.total);

    for wp in work_packages.iter().take(10) {
        let assignee = wp.assignee_name().unwrap_or("unassigned");
        println!("  #{} {} [{}]", wp.id, wp.subject, assignee);
    }

    // Activities of the first work package
    if let Some(wp) = work_packages.elements().first() {
        println!("\n--- Activities of #{} ---", wp.id);
        let activities = wp.activities(&client).await?;
        for activity in &activities {
            let user = activity.user_name().unwrap_or("system");
            match activity.comment_text() {
                Some(comment) => println!("  {user}: {comment}"),
                None => println!("  {user}: {} change(s)", activity.details.len()),
            }
        }
    }

    Ok(())
}
