use retina_match::config::{load_config, MatchDemoConfig};
use retina_match::image::io::{load_image, save_image, write_json_file};
use retina_match::{DetailedMatch, RetinaMatcher};
use std::env;
use std::path::Path;

fn main() {
    env_logger::init();
    if let Err(err) = run() {
        eprintln!("Error: {err}");
        std::process::exit(1);
    }
}

fn run() -> Result<(), String> {
    let mut args = env::args();
    let program = args.next().unwrap_or_else(|| "match_demo".to_string());
    let config_path = args
        .next()
        .ok_or_else(|| format!("Usage: {program} <config.json>"))?;
    let config: MatchDemoConfig = load_config(Path::new(&config_path)).map_err(|e| e.to_string())?;

    let first = load_image(&config.first).map_err(|e| e.to_string())?;
    let second = load_image(&config.second).map_err(|e| e.to_string())?;

    let matcher = RetinaMatcher::new(config.params.clone());
    let detailed = matcher
        .process_traced(first.as_view(), second.as_view())
        .map_err(|e| e.to_string())?;

    print_summary(&detailed);

    if let Some(dir) = &config.output.masks_dir {
        save_image(&detailed.first.mask, &dir.join("image1.png")).map_err(|e| e.to_string())?;
        save_image(&detailed.second.mask, &dir.join("image2.png")).map_err(|e| e.to_string())?;
        println!("\nMasks written to {}", dir.display());
    }
    if let Some(path) = &config.output.report_json {
        write_json_file(path, &detailed.report).map_err(|e| e.to_string())?;
        println!("JSON report written to {}", path.display());
    }
    Ok(())
}

fn print_summary(detailed: &DetailedMatch) {
    let report = &detailed.report;
    println!("Match summary");
    println!("  decision: {}", report.decision_digit());
    println!(
        "  votes: {}/{} (threshold {:.2})",
        report.votes, report.votes_required, report.threshold
    );
    println!(
        "  masks: {}x{} vs {}x{}",
        report.mask_a_size.0, report.mask_a_size.1, report.mask_b_size.0, report.mask_b_size.1
    );
    println!("  latency_ms: {:.3}", report.timing.total_ms);
    println!("\nCells");
    for cell in &report.cells {
        let at = cell
            .location
            .map(|(x, y)| format!("({x}, {y})"))
            .unwrap_or_else(|| "-".to_string());
        println!(
            "  r{}c{} score={:+.4} at={:<12} {}{}",
            cell.cell.row,
            cell.cell.col,
            cell.score,
            at,
            if cell.matched { "vote" } else { "" },
            if cell.uniform_template { " (uniform)" } else { "" }
        );
    }
}
