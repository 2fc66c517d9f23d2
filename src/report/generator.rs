//! Markdown report generation.
//!
//! This module generates Markdown statistics reports from the
//! aggregated driver summaries.

use crate::config::ReportConfig;
use crate::models::{
    Advantage, ComparisonReport, DriverReport, DriverStatsSummary, FormSummary, Report,
    ReportMetadata,
};
use crate::report::format::{
    format_average, format_delta, format_percentage, format_points, format_position,
};
use anyhow::Result;

/// Generate a complete Markdown report.
pub fn generate_markdown_report(report: &Report, options: &ReportConfig) -> String {
    let mut output = String::new();

    // Title
    let names: Vec<&str> = report
        .drivers
        .iter()
        .map(|d| d.stats.display_name())
        .collect();
    output.push_str(&format!("# Driver Statistics: {}\n\n", names.join(" vs ")));

    output.push_str(&generate_metadata_section(&report.metadata));

    if let Some(ref comparison) = report.comparison {
        output.push_str(&generate_comparison_section(
            comparison,
            &report.drivers,
            options,
        ));
    }

    for driver in &report.drivers {
        output.push_str(&generate_driver_section(driver, options));
    }

    output.push_str(&generate_footer());

    output
}

/// Generate the metadata section.
fn generate_metadata_section(metadata: &ReportMetadata) -> String {
    let mut section = String::new();

    section.push_str("## Metadata\n\n");
    section.push_str(&format!("- **Source:** {}\n", metadata.source));
    if let Some(ref season) = metadata.season {
        section.push_str(&format!("- **Season:** {}\n", season));
    }
    section.push_str(&format!(
        "- **Generated:** {}\n",
        metadata.generated_at.format("%Y-%m-%d %H:%M:%S UTC")
    ));
    section.push_str(&format!("- **Result Records:** {}\n", metadata.records));
    section.push_str(&format!(
        "- **Duration:** {:.1}s\n",
        metadata.duration_seconds
    ));
    section.push('\n');

    section
}

/// Generate the two-driver comparison section.
fn generate_comparison_section(
    comparison: &ComparisonReport,
    drivers: &[DriverReport],
    options: &ReportConfig,
) -> String {
    let mut section = String::new();
    let pct = |v: f64| format_percentage(v, options.percentage_decimals);

    let d1 = &comparison.comparison.driver1;
    let d2 = &comparison.comparison.driver2;
    let name = |index: usize, fallback: &str| {
        drivers
            .get(index)
            .map(|d| d.stats.display_name().to_string())
            .unwrap_or_else(|| fallback.to_string())
    };
    let name1 = name(0, &d1.driver_id);
    let name2 = name(1, &d2.driver_id);

    section.push_str("## Comparison\n\n");
    section.push_str(&format!("| | {} | {} |\n", name1, name2));
    section.push_str("|:---|:---:|:---:|\n");
    section.push_str(&format!("| Wins | {} | {} |\n", d1.wins, d2.wins));
    section.push_str(&format!("| Podiums | {} | {} |\n", d1.podiums, d2.podiums));
    section.push_str(&format!(
        "| Points | {} | {} |\n",
        format_points(d1.points),
        format_points(d2.points)
    ));
    section.push_str(&format!(
        "| Avg. Finish | {} | {} |\n",
        format_average(d1.avg_position),
        format_average(d2.avg_position)
    ));
    section.push_str(&format!(
        "| Win Rate | {} | {} |\n",
        pct(d1.win_rate),
        pct(d2.win_rate)
    ));
    section.push_str(&format!(
        "| Podium Rate | {} | {} |\n\n",
        pct(d1.podium_rate),
        pct(d2.podium_rate)
    ));

    let verdict = match comparison.comparison.advantage {
        Advantage::Driver1 => format!("{} ({})", Advantage::Driver1, name1),
        Advantage::Driver2 => format!("{} ({})", Advantage::Driver2, name2),
        Advantage::Even => Advantage::Even.to_string(),
    };
    section.push_str(&format!("**Advantage:** {}\n\n", verdict));

    let h2h = &comparison.head_to_head;
    section.push_str("### Head to Head\n\n");
    if h2h.total() == 0 {
        section.push_str("No shared races to compare.\n\n");
    } else {
        let (leader, record) = if h2h.wins >= h2h.losses {
            (&name1, *h2h)
        } else {
            (&name2, h2h.inverse())
        };
        section.push_str(&format!(
            "{} leads {} - {} over {} shared races ({} draws).\n\n",
            leader,
            record.wins,
            record.losses,
            record.total(),
            record.draws
        ));
    }

    section
}

/// Generate the section for one driver.
fn generate_driver_section(driver: &DriverReport, options: &ReportConfig) -> String {
    let mut section = String::new();
    let stats = &driver.stats;

    section.push_str(&format!("## {}\n\n", stats.display_name()));

    if stats.total_races == 0 {
        section.push_str("No results found for this driver.\n\n");
        return section;
    }

    if let Some(ref team) = stats.current_team {
        section.push_str(&format!("*Current team: {}*\n\n", team));
    }

    section.push_str(&generate_summary_table(stats, options));
    section.push_str(&generate_career_span(stats));

    if options.include_seasons {
        section.push_str(&generate_seasons_table(stats, options));
    }

    if options.include_form {
        section.push_str(&generate_form_section(&driver.form, options));
    }

    section
}

/// Generate the career totals table.
fn generate_summary_table(stats: &DriverStatsSummary, options: &ReportConfig) -> String {
    let mut table = String::new();
    let pct = |v: f64| format_percentage(v, options.percentage_decimals);

    table.push_str("### Summary\n\n");
    table.push_str("| Races | Wins | Podiums | Poles | Fastest Laps | Points | DNFs |\n");
    table.push_str("|:---:|:---:|:---:|:---:|:---:|:---:|:---:|\n");
    table.push_str(&format!(
        "| {} | {} | {} | {} | {} | {} | {} |\n\n",
        stats.total_races,
        stats.total_wins,
        stats.total_podiums,
        stats.total_poles,
        stats.total_fastest_laps,
        format_points(stats.total_points),
        stats.dnf_count
    ));

    table.push_str("| Stat | Value |\n");
    table.push_str("|:---|:---:|\n");
    table.push_str(&format!("| Win Rate | {} |\n", pct(stats.win_rate)));
    table.push_str(&format!("| Podium Rate | {} |\n", pct(stats.podium_rate)));
    table.push_str(&format!(
        "| Retirement Rate | {} |\n",
        pct(stats.retirement_rate)
    ));
    table.push_str(&format!(
        "| Points per Race | {:.2} |\n",
        stats.points_per_race
    ));
    table.push_str(&format!(
        "| Avg. Finish | {} |\n",
        format_average(stats.avg_finish_position)
    ));
    table.push_str(&format!(
        "| Avg. Grid | {} |\n",
        format_average(stats.avg_qualifying_position)
    ));
    table.push_str(&format!(
        "| Best Finish | {} |\n",
        format_position(stats.best_finish)
    ));
    table.push_str(&format!(
        "| Worst Finish | {} |\n\n",
        format_position(stats.worst_finish)
    ));

    table
}

fn generate_career_span(stats: &DriverStatsSummary) -> String {
    let span = &stats.career_span;
    if span.first_race.is_empty() && span.last_race.is_empty() {
        return String::new();
    }

    format!(
        "**Career:** {} to {} ({} years active)\n\n",
        span.first_race, span.last_race, span.years_active
    )
}

/// Generate the season-by-season table.
fn generate_seasons_table(stats: &DriverStatsSummary, options: &ReportConfig) -> String {
    if stats.season_results.is_empty() {
        return String::new();
    }

    let mut table = String::new();

    table.push_str("### Seasons\n\n");
    table.push_str(
        "| Season | Team | Races | Wins | Podiums | Poles | FL | Points | DNFs | Win Rate |\n",
    );
    table.push_str("|:---|:---|:---:|:---:|:---:|:---:|:---:|:---:|:---:|:---:|\n");

    for season in &stats.season_results {
        table.push_str(&format!(
            "| {} | {} | {} | {} | {} | {} | {} | {} | {} | {} |\n",
            season.season,
            season.team,
            season.races,
            season.wins,
            season.podiums,
            season.poles,
            season.fastest_laps,
            format_points(season.points),
            season.dnfs,
            format_percentage(season.win_rate, options.percentage_decimals)
        ));
    }
    table.push('\n');

    table
}

/// Generate the recent form section.
fn generate_form_section(form: &FormSummary, options: &ReportConfig) -> String {
    let mut section = String::new();

    section.push_str(&format!("### Form (last {} races)\n\n", form.window));
    section.push_str(&format!(
        "- **Recent Avg. Finish:** {}\n",
        format_average(form.recent_form)
    ));
    section.push_str(&format!("- **Momentum:** {}\n", format_delta(form.momentum)));
    section.push_str(&format!(
        "- **Consistency (std. dev.):** {:.2}\n",
        form.consistency
    ));
    section.push_str(&format!(
        "- **Places Gained per Race:** {}\n",
        format_delta(form.positions_gained)
    ));
    section.push_str(&format!(
        "- **Points Efficiency:** {}\n\n",
        format_percentage(form.points_efficiency, options.percentage_decimals)
    ));

    section
}

/// Generate the report footer.
fn generate_footer() -> String {
    let mut footer = String::new();

    footer.push_str("---\n\n");
    footer.push_str("*Report generated by GridStats*\n");

    footer
}

/// Generate a JSON report.
pub fn generate_json_report(report: &Report) -> Result<String> {
    serde_json::to_string_pretty(report).map_err(Into::into)
}
