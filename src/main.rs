#[cfg(test)]
#[path = "main_test.rs"]
mod main_test;

use std::path::PathBuf;

use carlot::config::{ClientConfig, ConfigError};
use carlot::error::ClientError;
use carlot::net::types::{CarFilters, LoginRequest, RegisterRequest, SortBy, SortOrder};
use carlot::routes::Screen;
use carlot::services::cars::{CreateCarRequest, PhotoUpload, UpdateCarRequest};
use carlot::services::session::BootstrapOutcome;
use carlot::state::ClientState;
use clap::{Args, Parser, Subcommand};
use serde::Serialize;
use serde::de::DeserializeOwned;

#[derive(Debug, thiserror::Error)]
enum CliError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error(transparent)]
    Client(#[from] ClientError),
    #[error("{path} is not available; redirected to {redirect}")]
    Denied { path: String, redirect: String },
    #[error("invalid JSON output: {0}")]
    Json(#[from] serde_json::Error),
}

#[derive(Parser, Debug)]
#[command(name = "carlot", about = "Car inventory client")]
struct Cli {
    #[arg(long, env = "CARLOT_API_URL")]
    api_url: Option<String>,

    #[arg(long, env = "CARLOT_STORAGE_PATH")]
    storage_path: Option<PathBuf>,

    #[arg(short, long, default_value_t = false)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    Login {
        #[arg(long)]
        email: String,
        #[arg(long, env = "CARLOT_PASSWORD", hide_env_values = true)]
        password: String,
    },
    Register {
        #[arg(long)]
        name: String,
        #[arg(long)]
        email: String,
        #[arg(long, env = "CARLOT_PASSWORD", hide_env_values = true)]
        password: String,
    },
    Logout,
    Profile,
    Cars(CarsCommand),
    Catalogs(CatalogsCommand),
}

#[derive(Args, Debug)]
struct CarsCommand {
    #[command(subcommand)]
    command: CarsSubcommand,
}

#[derive(Subcommand, Debug)]
enum CarsSubcommand {
    List(ListArgs),
    Get {
        id: String,
    },
    Create(CreateArgs),
    Update(UpdateArgs),
    Delete {
        id: String,
    },
    Search {
        query: String,
    },
    Stats,
}

#[derive(Args, Debug)]
struct ListArgs {
    #[arg(long)]
    marca: Option<String>,
    #[arg(long)]
    modelo: Option<String>,
    #[arg(long)]
    anio: Option<u32>,
    #[arg(long)]
    min_precio: Option<f64>,
    #[arg(long)]
    max_precio: Option<f64>,
    #[arg(long)]
    color: Option<String>,
    #[arg(long)]
    page: Option<u32>,
    #[arg(long)]
    limit: Option<u32>,
    #[arg(long, value_parser = parse_wire::<SortBy>, help = "precio, anio, kilometraje or fechaAlta")]
    sort_by: Option<SortBy>,
    #[arg(long, value_parser = parse_wire::<SortOrder>, help = "asc or desc")]
    sort_order: Option<SortOrder>,
}

#[derive(Args, Debug)]
struct CreateArgs {
    #[arg(long)]
    marca: String,
    #[arg(long)]
    modelo: String,
    #[arg(long)]
    anio: u32,
    #[arg(long)]
    precio: f64,
    #[arg(long)]
    kilometraje: u64,
    #[arg(long)]
    color: Option<String>,
    #[arg(long)]
    email: String,
    #[arg(long)]
    telefono: String,
    #[arg(long, help = "JPEG, PNG or WebP image, 5 MB max")]
    foto: Option<PathBuf>,
}

#[derive(Args, Debug)]
struct UpdateArgs {
    id: String,
    #[arg(long)]
    marca: Option<String>,
    #[arg(long)]
    modelo: Option<String>,
    #[arg(long)]
    anio: Option<u32>,
    #[arg(long)]
    precio: Option<f64>,
    #[arg(long)]
    kilometraje: Option<u64>,
    #[arg(long)]
    color: Option<String>,
    #[arg(long)]
    email: Option<String>,
    #[arg(long)]
    telefono: Option<String>,
    #[arg(long)]
    foto: Option<PathBuf>,
}

#[derive(Args, Debug)]
struct CatalogsCommand {
    #[command(subcommand)]
    command: CatalogsSubcommand,
}

#[derive(Subcommand, Debug)]
enum CatalogsSubcommand {
    List,
    Brands,
    Models { marca: String },
    Years,
    Init,
}

impl Command {
    /// Screen whose guard the command runs under. Logout is always allowed.
    fn screen(&self) -> Option<Screen> {
        match self {
            Self::Login { .. } => Some(Screen::Login),
            Self::Register { .. } => Some(Screen::Register),
            Self::Logout => None,
            Self::Profile => Some(Screen::Profile),
            Self::Cars(cars) => Some(match &cars.command {
                CarsSubcommand::Create(_) => Screen::CarNew,
                CarsSubcommand::Update(args) => Screen::CarEdit { id: args.id.clone() },
                _ => Screen::CarList,
            }),
            // Catalog lookups feed the car form.
            Self::Catalogs(_) => Some(Screen::CarNew),
        }
    }
}

#[tokio::main]
async fn main() -> Result<(), CliError> {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();

    let level = if cli.verbose { tracing::Level::DEBUG } else { tracing::Level::WARN };
    tracing_subscriber::fmt().with_writer(std::io::stderr).with_max_level(level).init();

    let mut config = ClientConfig::from_env()?;
    if let Some(url) = &cli.api_url {
        config = config.with_api_url(url)?;
    }
    if let Some(path) = cli.storage_path {
        config = config.with_storage_path(path);
    }

    let state = ClientState::from_config(&config)?;
    match state.session.bootstrap().await {
        BootstrapOutcome::Restored(user) => tracing::debug!(email = %user.email, "using stored session"),
        BootstrapOutcome::Kept(err) => tracing::warn!(error = %err, "could not verify stored session"),
        _ => {}
    }

    let result = run(&state, cli.command).await;
    report(&state);
    result
}

async fn run(state: &ClientState, command: Command) -> Result<(), CliError> {
    if let Some(screen) = command.screen() {
        let path = screen.path();
        if !state.router.navigate_guarded(&path, state.session.as_ref()).is_allowed() {
            let redirect = state.router.location().unwrap_or_default();
            return Err(CliError::Denied { path, redirect });
        }
    }

    match command {
        Command::Login { email, password } => {
            let user = state.session.login(&LoginRequest { email, password }).await?;
            state.notifications.success(format!("Welcome back, {}", user.name));
            print_json(&user)
        }
        Command::Register { name, email, password } => {
            let user = state.session.register(&RegisterRequest { name, email, password }).await?;
            state.notifications.success("Account created");
            print_json(&user)
        }
        Command::Logout => {
            state.session.logout();
            state.notifications.info("Signed out");
            Ok(())
        }
        Command::Profile => print_json(&state.session.refresh_profile().await?),
        Command::Cars(cars) => run_cars(state, cars.command).await,
        Command::Catalogs(catalogs) => run_catalogs(state, catalogs.command).await,
    }
}

async fn run_cars(state: &ClientState, command: CarsSubcommand) -> Result<(), CliError> {
    match command {
        CarsSubcommand::List(args) => {
            let filters = CarFilters {
                marca: args.marca,
                modelo: args.modelo,
                anio: args.anio,
                min_precio: args.min_precio,
                max_precio: args.max_precio,
                color: args.color,
                page: args.page,
                limit: args.limit,
                sort_by: args.sort_by,
                sort_order: args.sort_order,
            };
            print_json(&state.cars.list(&filters).await?.data)
        }
        CarsSubcommand::Get { id } => print_json(&state.cars.get(&id).await?.data),
        CarsSubcommand::Create(args) => {
            let car = CreateCarRequest {
                marca: args.marca,
                modelo: args.modelo,
                anio: args.anio,
                precio: args.precio,
                kilometraje: args.kilometraje,
                color: args.color,
                email: args.email,
                telefono: args.telefono,
                foto: load_photo(args.foto)?,
            };
            let created = state.cars.create(car).await?;
            state.notifications.success("Car created");
            print_json(&created.data)
        }
        CarsSubcommand::Update(args) => {
            let car = UpdateCarRequest {
                marca: args.marca,
                modelo: args.modelo,
                anio: args.anio,
                precio: args.precio,
                kilometraje: args.kilometraje,
                color: args.color,
                email: args.email,
                telefono: args.telefono,
                foto: load_photo(args.foto)?,
            };
            let updated = state.cars.update(&args.id, car).await?;
            state.notifications.success("Car updated");
            print_json(&updated.data)
        }
        CarsSubcommand::Delete { id } => {
            let deleted = state.cars.delete(&id).await?;
            state.notifications.success("Car deleted");
            print_json(&deleted.data)
        }
        CarsSubcommand::Search { query } => print_json(&state.cars.search(&query).await?.data),
        CarsSubcommand::Stats => print_json(&state.cars.stats().await?.data),
    }
}

async fn run_catalogs(state: &ClientState, command: CatalogsSubcommand) -> Result<(), CliError> {
    match command {
        CatalogsSubcommand::List => print_json(&state.catalog.list().await?.data),
        CatalogsSubcommand::Brands => print_json(&state.catalog.brands().await?.data),
        CatalogsSubcommand::Models { marca } => print_json(&state.catalog.models(&marca).await?.data),
        CatalogsSubcommand::Years => print_json(&state.catalog.years().await?.data),
        CatalogsSubcommand::Init => {
            let response = state.catalog.initialize().await?;
            state.notifications.success(response.data.message.clone());
            print_json(&response.data)
        }
    }
}

fn load_photo(path: Option<PathBuf>) -> Result<Option<PhotoUpload>, ClientError> {
    path.map(PhotoUpload::from_path).transpose()
}

/// Drain pending notifications to stderr, then say where the user ended up.
fn report(state: &ClientState) {
    for note in state.notifications.snapshot() {
        eprintln!("[{}] {}", note.kind.label(), note.message);
    }
    state.notifications.clear();
    if let Some(location) = state.router.location() {
        eprintln!("location: {location}");
    }
}

fn parse_wire<T: DeserializeOwned>(raw: &str) -> Result<T, String> {
    serde_json::from_value(serde_json::Value::String(raw.to_owned())).map_err(|_| format!("unsupported value '{raw}'"))
}

fn print_json<T: Serialize>(value: &T) -> Result<(), CliError> {
    let rendered = serde_json::to_string_pretty(value)?;
    println!("{rendered}");
    Ok(())
}
