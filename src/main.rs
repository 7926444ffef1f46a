use anyhow::{Context, Result};
use sqlite_record_builder::{
    cli::{Cli, Commands, GenerateArgs},
    logging::{self, Verbosity},
    schema::list_targets,
    table::Database,
    writer::GenerationOptions,
};
use std::time::Instant;
use tracing::error;

fn main() -> Result<()> {
    let cli = Cli::parse_args();
    logging::init(Verbosity::from_level(cli.verbosity));

    match cli.command {
        Commands::Generate(args) => generate(args)?,

        Commands::List { database, filter } => {
            let db = Database::open(&database)
                .with_context(|| format!("Failed to open database {:?}", database))?;
            let targets = list_targets(db.connection()?, filter.as_deref().unwrap_or(""))
                .context("Failed to read the schema catalog")?;

            println!("Tables and views in {:?}:\n", database);
            for target in targets {
                println!("  {:<5} {}", target.kind, target.name);
            }
        }
    }

    Ok(())
}

fn generate(args: GenerateArgs) -> Result<()> {
    let start = Instant::now();

    let base = match &args.config {
        Some(path) => GenerationOptions::from_json_file(path)?,
        None => GenerationOptions::default(),
    };
    let options = args.apply(base);
    let dest_folder = options.output.dest_folder.clone();
    let report = args.run(options)?;

    for unit in &report.failed {
        error!("Not written: {}", unit.path.display());
    }
    for target in &report.skipped {
        error!("Skipped {} '{}'", target.kind, target.name);
    }

    println!(
        "\nCreated {} units in {:?} from {:?} in {:.1}s",
        report.created.len(),
        dest_folder,
        args.database,
        start.elapsed().as_secs_f64()
    );

    if !report.is_complete() {
        anyhow::bail!(
            "{} units could not be written, {} tables or views were skipped",
            report.failed.len(),
            report.skipped.len()
        );
    }
    Ok(())
}
