use retina_match::config::load_params;
use retina_match::image::io::{load_image, save_image};
use retina_match::{MatchParams, RetinaMatcher};
use std::env;
use std::path::PathBuf;
use std::process::ExitCode;

struct Cli {
    first: PathBuf,
    second: PathBuf,
    params: Option<PathBuf>,
    masks_dir: Option<PathBuf>,
}

fn usage(program: &str) -> String {
    format!("USAGE: {program} <image1> <image2> [--params params.json] [--masks <dir>]")
}

fn parse_cli(program: &str, mut args: impl Iterator<Item = String>) -> Result<Cli, String> {
    let mut positional = Vec::new();
    let mut params = None;
    let mut masks_dir = None;
    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--params" => {
                let value = args.next().ok_or_else(|| usage(program))?;
                params = Some(PathBuf::from(value));
            }
            "--masks" => {
                let value = args.next().ok_or_else(|| usage(program))?;
                masks_dir = Some(PathBuf::from(value));
            }
            "-h" | "--help" => return Err(usage(program)),
            _ => positional.push(PathBuf::from(arg)),
        }
    }
    if positional.len() != 2 {
        return Err(usage(program));
    }
    let second = positional.pop().ok_or_else(|| usage(program))?;
    let first = positional.pop().ok_or_else(|| usage(program))?;
    Ok(Cli {
        first,
        second,
        params,
        masks_dir,
    })
}

fn main() -> ExitCode {
    env_logger::init();
    let mut args = env::args();
    let program = args.next().unwrap_or_else(|| "retina_match".to_string());
    let cli = match parse_cli(&program, args) {
        Ok(cli) => cli,
        Err(msg) => {
            eprintln!("{msg}");
            return ExitCode::from(2);
        }
    };
    match run(&cli) {
        Ok(matched) => {
            println!("{}", if matched { "1" } else { "0" });
            ExitCode::SUCCESS
        }
        Err(err) => {
            eprintln!("Error: {err}");
            ExitCode::FAILURE
        }
    }
}

fn run(cli: &Cli) -> retina_match::Result<bool> {
    let params = match &cli.params {
        Some(path) => load_params(path)?,
        None => MatchParams::default(),
    };
    let first = load_image(&cli.first)?;
    let second = load_image(&cli.second)?;

    let matcher = RetinaMatcher::new(params);
    let detailed = matcher.process_traced(first.as_view(), second.as_view())?;

    if let Some(dir) = &cli.masks_dir {
        save_image(&detailed.first.mask, &dir.join("image1.png"))?;
        save_image(&detailed.second.mask, &dir.join("image2.png"))?;
    }
    Ok(detailed.report.matched)
}
