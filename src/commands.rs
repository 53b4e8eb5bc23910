use crate::filter::{filter_projects, FilterCriteria};
use crate::format::{days_until, days_until_label, format_date};
use crate::model::{Dataset, Project};
use crate::route::Route;
use crate::storage::{load_dataset, locate_dataset};
use crate::ui;
use anyhow::{bail, Result};
use chrono::{Local, NaiveDateTime};
use std::path::PathBuf;

pub fn tui(data: Option<PathBuf>, route: Option<String>) -> Result<()> {
    match load_current_dataset(data) {
        Ok((dataset, path)) => {
            let initial = route
                .as_deref()
                .map(Route::parse)
                .unwrap_or(Route::Dashboard);
            ui::run(dataset, path, initial)
        }
        Err(err) => ui::run_load_error(&format!("{err:#}")),
    }
}

pub fn list(
    data: Option<PathBuf>,
    search: Option<String>,
    osc: Option<String>,
    category: Option<String>,
) -> Result<()> {
    let (dataset, path) = load_current_dataset(data)?;
    let criteria = FilterCriteria {
        search: search.unwrap_or_default(),
        osc,
        category,
    };
    let now = Local::now().naive_local();
    let kept = filter_projects(&dataset.projects, &criteria);
    println!(
        "{} of {} projects ({})",
        kept.len(),
        dataset.projects.len(),
        path.display()
    );
    for idx in kept {
        let project = &dataset.projects[idx];
        println!(
            "  {}  {}  ({})",
            project.id,
            project.name,
            days_until_label(days_until(now, project.event_date))
        );
        println!(
            "    {} | {} | {} | {}",
            format_date(project.event_date),
            dataset.organization_name(&project.osc),
            project.category,
            project.status
        );
        println!("    {}", project.location);
    }
    Ok(())
}

pub fn show(data: Option<PathBuf>, id: String) -> Result<()> {
    let (dataset, _) = load_current_dataset(data)?;
    let project = match dataset.project_by_id(&id) {
        Some(project) => project,
        None => bail!("project {} not found", id),
    };
    print_project(&dataset, project, Local::now().naive_local());
    Ok(())
}

fn load_current_dataset(data: Option<PathBuf>) -> Result<(Dataset, PathBuf)> {
    let path = locate_dataset(data)?;
    let dataset = load_dataset(&path)?;
    Ok((dataset, path))
}

fn print_project(dataset: &Dataset, project: &Project, now: NaiveDateTime) {
    println!("{} ({})", project.name, project.id);
    println!(
        "  event: {} ({})",
        format_date(project.event_date),
        days_until_label(days_until(now, project.event_date))
    );
    println!("  location: {}", project.location);
    println!(
        "  organization: {}",
        dataset.organization_name(&project.osc)
    );
    println!("  category: {}", project.category);
    println!("  status: {}", project.status);
    println!("  schedule:");
    for (phase, date) in project.schedule.phases() {
        println!(
            "    {:<16} {}  ({})",
            phase.label(),
            format_date(date),
            days_until_label(days_until(now, date))
        );
    }
    if !project.responsibles.is_empty() {
        println!("  responsibles:");
        for (area, people) in &project.responsibles {
            println!("    {}: {}", area, people.join(", "));
        }
    }
    if let Some(seal) = dataset.seal(&project.content.seal) {
        println!("  seal: {} ({})", seal.name, seal.purpose);
    }
    if !project.content.hashtags.is_empty() {
        println!("  hashtags: {}", project.content.hashtags.join(" "));
    }
    println!("  cta: {}", project.content.cta);
}
