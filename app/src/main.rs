//! School directory command line.
//!
//! `serve` runs the HTTP service, `migrate` creates the schema, and `list` and
//! `add` talk to a running server the way the web front ends do.

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Args, Parser, Subcommand};
use thiserror::Error;
use tracing::info;

use schooldir::client::{ClientError, SchoolClient};
use schooldir::db;
use schooldir::directory::{DirectoryView, Selection, ViewMode, ALL};
use schooldir::{init_logging, Config, ImageUpload, SchoolDirError, SchoolForm};

#[derive(Debug, Parser)]
#[command(name = "schooldir", version, about = "School directory service")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Run the HTTP server
    Serve,
    /// Create or update the database schema
    Migrate,
    /// Fetch and display the directory
    List(ListArgs),
    /// Validate and submit a new school
    Add(AddArgs),
}

#[derive(Debug, Args)]
struct ListArgs {
    /// Base URL of the server
    #[arg(long, env = "SCHOOLDIR_SERVER", default_value = "http://localhost:3000")]
    server: String,

    /// Case-insensitive match on name, city or state
    #[arg(long, default_value = "")]
    search: String,

    /// Exact city, or "all"
    #[arg(long, default_value = ALL)]
    city: String,

    /// Exact state, or "all"
    #[arg(long, default_value = ALL)]
    state: String,

    /// grid or list
    #[arg(long, default_value = "grid")]
    view: ViewMode,

    /// Print the available city and state options
    #[arg(long)]
    options: bool,
}

#[derive(Debug, Args)]
struct AddArgs {
    /// Base URL of the server
    #[arg(long, env = "SCHOOLDIR_SERVER", default_value = "http://localhost:3000")]
    server: String,

    #[arg(long, default_value = "")]
    name: String,
    #[arg(long, default_value = "")]
    email: String,
    #[arg(long, default_value = "")]
    phone: String,
    #[arg(long, default_value = "")]
    address: String,
    #[arg(long, default_value = "")]
    city: String,
    #[arg(long, default_value = "")]
    state: String,
    #[arg(long, default_value = "")]
    pincode: String,

    /// Image file to attach
    #[arg(long)]
    image: Option<PathBuf>,
}

#[derive(Debug, Error)]
enum AppError {
    #[error(transparent)]
    SchoolDir(#[from] SchoolDirError),

    #[error("{0}")]
    Rejected(String),
}

impl From<ClientError> for AppError {
    fn from(err: ClientError) -> Self {
        AppError::SchoolDir(SchoolDirError::Client(err))
    }
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    match run(cli.command).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {e}");
            ExitCode::FAILURE
        }
    }
}

async fn run(command: Command) -> Result<(), AppError> {
    match command {
        Command::Serve => {
            let config = Config::from_env().map_err(SchoolDirError::from)?;
            init_logging(config.server.log_json)?;
            schooldir::serve(config).await?;
        }
        Command::Migrate => {
            let mut config = Config::from_env().map_err(SchoolDirError::from)?;
            init_logging(config.server.log_json)?;
            config.database.run_migrations = true;
            db::init_database(&config.database)
                .await
                .map_err(SchoolDirError::from)?;
            info!("Schema is up to date");
        }
        Command::List(args) => {
            init_logging(false)?;
            list(args).await?;
        }
        Command::Add(args) => {
            init_logging(false)?;
            add(args).await?;
        }
    }
    Ok(())
}

async fn list(args: ListArgs) -> Result<(), AppError> {
    let client = SchoolClient::new(&args.server)?;

    let schools = match client.list_schools().await {
        Ok(schools) => schools,
        Err(ClientError::SetupRequired { details }) => {
            return Err(AppError::Rejected(format!(
                "Database setup required: the schools table does not exist ({details}).\n\
                 Run `schooldir migrate` against the server's database, then retry."
            )));
        }
        Err(e) => return Err(e.into()),
    };

    let mut view = DirectoryView::new(schools);
    view.set_search(args.search);
    view.select_city(Selection::parse(&args.city));
    view.select_state(Selection::parse(&args.state));
    view.set_mode(args.view);

    if args.options {
        let options = view.options();
        println!("Cities: {}", options.cities.join(", "));
        println!("States: {}", options.states.join(", "));
        println!();
    }

    print!("{}", view.render());
    Ok(())
}

async fn add(args: AddArgs) -> Result<(), AppError> {
    let form = SchoolForm {
        name: args.name,
        email: args.email,
        phone: args.phone,
        address: args.address,
        city: args.city,
        state: args.state,
        pincode: args.pincode,
    };

    let image = match &args.image {
        Some(path) => Some(ImageUpload::from_path(path).map_err(SchoolDirError::from)?),
        None => None,
    };

    if let Err(errors) = schooldir::validate(&form, image.as_ref()) {
        for error in errors.iter() {
            eprintln!("  {}: {}", error.field, error.message);
        }
        return Err(AppError::Rejected(format!(
            "{} field(s) failed validation, nothing was submitted",
            errors.len()
        )));
    }

    if let Some(image) = &image {
        println!(
            "Image preview ready ({} bytes as data URI)",
            image.preview_data_uri().len()
        );
    }

    let client = SchoolClient::new(&args.server)?;
    let id = client.submit(&form, image.as_ref()).await?;
    println!("School added successfully (id {id})");
    Ok(())
}
