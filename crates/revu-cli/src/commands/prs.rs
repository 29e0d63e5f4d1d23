use anyhow::Result;
use revu_config::Config;
use revu_review::PrReviewStatus;

pub async fn handle(config: &Config) -> Result<()> {
    let engine = super::build_engine(config)?;
    let statuses = engine.review_statuses().await?;

    if statuses.is_empty() {
        println!("No open pull requests.");
        return Ok(());
    }

    let mut current_repo: Option<&str> = None;
    for status in &statuses {
        if current_repo != Some(status.pr.repository.as_str()) {
            println!("{}:", status.pr.repository);
            current_repo = Some(status.pr.repository.as_str());
        }
        print_status(status);
    }

    let pending = statuses.iter().filter(|s| !s.reviewed).count();
    println!();
    println!("{} open, {} pending review", statuses.len(), pending);
    Ok(())
}

fn print_status(status: &PrReviewStatus) {
    let mark = if status.reviewed { "✓" } else { " " };
    let branch = status.pr.source_branch.as_deref().unwrap_or("-");
    println!(
        "  [{}] #{} {} ({} by {})",
        mark, status.pr.id, status.pr.title, branch, status.pr.author
    );
}
