//! `leads` handler: a plain-text table of recent leads.

use chrono::SecondsFormat;

const MAX_CONTACT_CHARS: usize = 32;
const MAX_ISSUE_CHARS: usize = 40;

/// Print the most recent leads, newest first.
///
/// # Errors
///
/// Returns an error if the database query fails.
pub(crate) async fn run_leads_list(pool: &sqlx::PgPool, limit: i64) -> anyhow::Result<()> {
    let leads = repairfinder_db::list_recent_leads(pool, limit).await?;

    if leads.is_empty() {
        println!("no leads recorded yet");
        return Ok(());
    }

    println!(
        "{:<22}{:<38}{:<22}{:<34}ISSUE",
        "CREATED", "LEAD ID", "NAME", "CONTACT"
    );
    for lead in &leads {
        println!(
            "{:<22}{:<38}{:<22}{:<34}{}",
            lead.created_at.to_rfc3339_opts(SecondsFormat::Secs, true),
            lead.public_id,
            clip(&lead.name, 20),
            clip(&lead.contact, MAX_CONTACT_CHARS),
            clip(&lead.issue, MAX_ISSUE_CHARS),
        );
    }

    Ok(())
}

fn clip(value: &str, max: usize) -> String {
    if value.chars().count() > max {
        format!("{}...", value.chars().take(max).collect::<String>())
    } else {
        value.to_string()
    }
}
