//! Shared display helpers for CLI commands.

use console::style;

use crate::services::RunOutcome;

/// Truncate to `max` characters, appending an ellipsis when shortened.
pub fn truncate(text: &str, max: usize) -> String {
    if text.chars().count() <= max {
        text.to_string()
    } else {
        let cut: String = text.chars().take(max.saturating_sub(3)).collect();
        format!("{cut}...")
    }
}

/// Print the end-of-run summary block shared by classify and organize.
pub fn print_summary(outcome: &RunOutcome) {
    let stats = &outcome.statistics;
    println!();
    println!("{}", style("Classification summary").bold());
    println!("  Total files:  {}", stats.total_files);
    println!("  Processed:    {}", style(stats.processed).green());
    if stats.failed > 0 {
        println!("  Failed:       {}", style(stats.failed).red());
    } else {
        println!("  Failed:       {}", stats.failed);
    }
    println!("  Success rate: {:.1}%", stats.success_rate());

    if !outcome.failures.is_empty() {
        println!();
        println!("{}", style("Failures").bold());
        for failure in &outcome.failures {
            println!(
                "  {} [{}] {}",
                style(&failure.filename).yellow(),
                failure.stage.as_str(),
                truncate(&failure.reason, 90)
            );
        }
    }

    if let Some(export) = &outcome.export {
        println!();
        match &export.json {
            Ok(path) => println!("  JSON: {}", path.display()),
            Err(error) => println!("  JSON: {}", style(format!("failed ({error})")).red()),
        }
        match &export.csv {
            Ok(path) => println!("  CSV:  {}", path.display()),
            Err(error) => println!("  CSV:  {}", style(format!("failed ({error})")).red()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn truncate_leaves_short_strings_alone() {
        assert_eq!(truncate("corto", 10), "corto");
        assert_eq!(truncate("exacto", 6), "exacto");
    }

    #[test]
    fn truncate_appends_ellipsis() {
        assert_eq!(truncate("demasiado largo", 10), "demasia...");
        assert_eq!(truncate("ñoño ñoño ñoño", 8), "ñoño ...");
    }
}
