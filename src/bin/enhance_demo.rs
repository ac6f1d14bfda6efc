use retina_match::config::{load_config, EnhanceDemoConfig};
use retina_match::image::io::{load_image, save_image, write_json_file};
use retina_match::Enhancer;
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
    let program = args.next().unwrap_or_else(|| "enhance_demo".to_string());
    let config_path = args
        .next()
        .ok_or_else(|| format!("Usage: {program} <config.json>"))?;
    let config: EnhanceDemoConfig =
        load_config(Path::new(&config_path)).map_err(|e| e.to_string())?;

    let input = load_image(&config.input).map_err(|e| e.to_string())?;
    let enhancer = Enhancer::new(config.params.clone());
    let report = enhancer
        .enhance_traced(input.as_view())
        .map_err(|e| e.to_string())?;

    save_image(&report.mask, &config.output.mask).map_err(|e| e.to_string())?;

    if let Some(dir) = &config.output.stages_dir {
        for (i, stage) in report.stages.iter().enumerate() {
            if let Some(img) = &stage.image {
                let path = dir.join(format!("{:02}_{}.png", i + 1, stage.label));
                save_image(img, &path).map_err(|e| e.to_string())?;
            }
        }
        println!("Stage images written to {}", dir.display());
    }

    if let Some(path) = &config.output.report_json {
        write_json_file(path, &report).map_err(|e| e.to_string())?;
        println!("Report written to {}", path.display());
    }

    println!(
        "Mask {}x{} written to {} ({:.2} ms)",
        report.mask.w,
        report.mask.h,
        config.output.mask.display(),
        report.timing.total_ms
    );
    for stage in &report.timing.stages {
        println!("  {:<16} {:>8.2} ms", stage.label, stage.elapsed_ms);
    }
    Ok(())
}
