use std::process;
use clap::error::ErrorKind;
use clap::{CommandFactory, Parser};
use log::info;
use music_organizer::{organize, FileTagReader, FileWalker, Mover, Reporter};
use music_organizer::cli::commands::Cli;

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(e) if matches!(e.kind(), ErrorKind::DisplayHelp | ErrorKind::DisplayVersion) => e.exit(),
        Err(e) => {
            eprint!("{}", e);
            process::exit(1);
        }
    };

    let (src_dir, dest_dir) = match cli.directories() {
        Ok(dirs) => dirs,
        Err(e) => {
            eprintln!("{}", Cli::command().render_help());
            eprintln!("Error: {}", e);
            process::exit(1);
        }
    };

    info!("Recursively scanning {} to get list of files...", src_dir.display());
    let files = match FileWalker::walk(&src_dir) {
        Ok(files) => files,
        Err(e) => {
            eprintln!("Error scanning {}: {}", src_dir.display(), e);
            process::exit(1);
        }
    };
    info!("{} files found.", files.len());

    if files.is_empty() {
        println!("Nothing to do.");
        return;
    }

    info!("Reading tags...");
    let organized = organize(&files, &FileTagReader::new());
    if organized.grouping.is_empty() {
        println!("No readable files, nothing to move.");
        Reporter::new().print_summary(&organized.failures, &[]);
        return;
    }

    if cli.dry_run {
        info!("Done reading tags. Dry run, nothing will be moved.");
    } else {
        info!("Done reading tags. Moving files...");
    }
    let results = Mover::new(&dest_dir)
        .dry_run(cli.dry_run)
        .move_all(&organized.grouping);

    let reporter = Reporter::new();
    reporter.print_summary(&organized.failures, &results);

    if let Some(report_path) = &cli.report {
        match reporter.generate_move_report(&organized.failures, &results, report_path) {
            Ok(_) => println!("Report saved to: {}", report_path.display()),
            Err(e) => eprintln!("Error generating report: {}", e),
        }
    }
}
