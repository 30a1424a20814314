use anyhow::{Context, Result, bail};
use clap::{Parser, Subcommand};
use indicatif::{ProgressBar, ProgressStyle};
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::time::Instant;
use tracing_subscriber::EnvFilter;

use areacheck::api::{Geocoder, ViaCepClient, build_chain};
use areacheck::config::FileConfig;
use areacheck::domain::{Address, Coordinate, OperationalArea};
use areacheck::geometry::distance_km;
use areacheck::validate::{AddressValidator, FallbackChecks, ValidationResult, Verdict, classify};

/// Check whether addresses fall inside a geofenced operational area
///
/// Examples:
///   # Validate a free-text address against the configured area
///   areacheck validate "Rua X, 123, Tayamã Park, Campo Grande, MS"
///
///   # Check a coordinate without any network access
///   areacheck check --lat -20.445 --lon -54.570
///
///   # Prefill an address from its CEP and validate it
///   areacheck cep 79000-000 --validate
#[derive(Parser, Debug)]
#[command(name = "areacheck")]
#[command(version, about, long_about = None)]
struct Args {
    /// Path to config file (optional, auto-searches areacheck.toml if not provided)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(short = 'v', long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Geocode an address and decide whether it lies in the area
    Validate {
        /// Free-text address
        address: String,

        /// Print the result as JSON
        #[arg(long)]
        json: bool,
    },

    /// Classify a coordinate against the area (no geocoding)
    Check {
        #[arg(long, allow_hyphen_values = true)]
        lat: f64,

        #[arg(long, allow_hyphen_values = true)]
        lon: f64,

        /// Address text used by the fallback rule when the point is outside
        #[arg(long, default_value = "")]
        text: String,

        /// Print the result as JSON
        #[arg(long)]
        json: bool,
    },

    /// Great-circle distance between two "lat,lon" points, in km
    Distance {
        #[arg(long, allow_hyphen_values = true)]
        from: Coordinate,

        #[arg(long, allow_hyphen_values = true)]
        to: Coordinate,
    },

    /// Look up a CEP and print the address it resolves to
    Cep {
        cep: String,

        /// House number used when validating the looked-up address
        #[arg(long, default_value = "")]
        number: String,

        /// Also validate the resolved address against the area
        #[arg(long)]
        validate: bool,
    },

    /// Print the configured operational area
    Area,
}

fn main() -> Result<ExitCode> {
    let args = Args::parse();

    init_logging(args.verbose);

    let file_config = load_config(args.config.as_deref())?;
    let verbose = args.verbose || file_config.verbose;
    let area = file_config
        .area
        .to_area()
        .context("Invalid [area] section in config")?;

    if verbose {
        print_area_summary(&area);
    }

    match args.command {
        Command::Validate { address, json } => {
            if address.trim().is_empty() {
                bail!("Address must not be empty");
            }
            let chain = build_chain(&file_config.geocoder).context("Failed to set up geocoders")?;
            if chain.is_empty() {
                bail!("No geocoding provider is available; check the [geocoder] section");
            }
            if verbose {
                println!("  Providers: {}", chain.provider_names().join(" -> "));
                println!();
            }
            let validator = AddressValidator::new(area, chain);

            let spinner = create_spinner("Geocoding address...");
            let start = Instant::now();
            let result = validator.validate(&address);
            spinner.finish_and_clear();

            report(&validator, &address, &result, json, start)?;
            Ok(exit_code(&result))
        }

        Command::Check {
            lat,
            lon,
            text,
            json,
        } => {
            let coordinate = Coordinate::new(lat, lon).context("Invalid coordinate")?;
            let checks = FallbackChecks::evaluate(&area, &text, &coordinate);
            let verdict = classify(&area, &text, &coordinate);
            let result = ValidationResult::resolved(coordinate, verdict);

            if json {
                println!("{}", serde_json::to_string_pretty(&result)?);
            } else {
                println!("{} -> {}", coordinate, describe(verdict));
                if verdict != Verdict::Inside {
                    print_checks(&checks);
                }
            }
            Ok(exit_code(&result))
        }

        Command::Distance { from, to } => {
            println!("{:.3} km", distance_km(&from, &to));
            Ok(ExitCode::SUCCESS)
        }

        Command::Cep {
            cep,
            number,
            validate,
        } => {
            let client =
                ViaCepClient::new(&file_config.viacep).context("Failed to create HTTP client")?;

            let spinner = create_spinner("Looking up CEP...");
            let found = client.fetch(&cep);
            spinner.finish_and_clear();

            let found = found.with_context(|| format!("CEP lookup failed for {cep}"))?;
            let address = Address {
                number,
                ..found.to_address()
            };
            print_address(&address);

            if !validate {
                return Ok(ExitCode::SUCCESS);
            }
            if !address.is_locatable() {
                bail!("Need --number to validate the location of {}", address.cep);
            }

            let chain = build_chain(&file_config.geocoder).context("Failed to set up geocoders")?;
            let validator = AddressValidator::new(area, chain);
            let start = Instant::now();
            let result = validator.validate_address(&address);
            report(&validator, &address.full_address(), &result, false, start)?;
            Ok(exit_code(&result))
        }

        Command::Area => {
            if !verbose {
                print_area_summary(&area);
            }
            for (i, v) in area.boundary.vertices().iter().enumerate() {
                println!("  [{}] {:.5}, {:.5}", i, v.latitude, v.longitude);
            }
            Ok(ExitCode::SUCCESS)
        }
    }
}

fn init_logging(verbose: bool) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::new(if verbose { "areacheck=debug" } else { "warn" })
    });

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn load_config(path: Option<&Path>) -> Result<FileConfig> {
    match path {
        Some(path) => {
            if !path.exists() {
                bail!("Config file not found: {:?}", path);
            }
            FileConfig::from_path(path).context("Failed to load config file")
        }
        None => Ok(FileConfig::load().unwrap_or_default()),
    }
}

fn report<G: Geocoder>(
    validator: &AddressValidator<G>,
    address: &str,
    result: &ValidationResult,
    json: bool,
    start: Instant,
) -> Result<()> {
    if json {
        println!("{}", serde_json::to_string_pretty(result)?);
        return Ok(());
    }

    println!("Address: {}", address);
    match result.coordinates {
        Some(c) => {
            println!(
                "Resolved: {} [{:.1}s]",
                c,
                start.elapsed().as_secs_f32()
            );
            println!("Verdict: {}", describe(result.verdict));
            if result.verdict == Verdict::Outside {
                print_checks(&FallbackChecks::evaluate(validator.area(), address, &c));
            }
        }
        None => println!("Verdict: {}", describe(result.verdict)),
    }
    Ok(())
}

fn describe(verdict: Verdict) -> &'static str {
    match verdict {
        Verdict::Unresolved => "INVALID (address could not be geocoded)",
        Verdict::Inside => "VALID (inside the boundary)",
        Verdict::AcceptedByFallback => "VALID (near the boundary, accepted by name/city match)",
        Verdict::Outside => "INVALID (outside the permitted area)",
    }
}

fn print_checks(checks: &FallbackChecks) {
    let mark = |ok: bool| if ok { "yes" } else { "no" };
    println!("  Names the area:          {}", mark(checks.names_area));
    println!(
        "  Near the centre:         {} ({:.3} km)",
        mark(checks.near_center),
        checks.distance_km
    );
    println!("  Names city and state:    {}", mark(checks.names_city_and_state));
}

fn print_area_summary(area: &OperationalArea) {
    println!("Area: {}", area.name);
    println!("  City: {} - {} ({})", area.city, area.state_abbreviation, area.state_name);
    println!("  Centre: {}", area.center);
    println!("  Fallback radius: {} km", area.radius_km);
    println!("  Name tokens: {}", area.name_tokens.join(", "));
    if let Some((sw, ne)) = area.boundary.bounding_box() {
        println!("  Bounds: {} .. {}", sw, ne);
    }
    println!("  Boundary vertices: {}", area.boundary.vertices().len());
}

fn print_address(address: &Address) {
    println!("CEP: {}", address.cep);
    println!("  Street: {}", address.street);
    if let Some(ref complement) = address.complement {
        println!("  Complement: {}", complement);
    }
    println!("  Neighborhood: {}", address.neighborhood);
    println!("  City: {} - {}", address.city, address.state);
}

fn exit_code(result: &ValidationResult) -> ExitCode {
    if result.is_valid {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    }
}

fn create_spinner(message: &str) -> ProgressBar {
    let pb = ProgressBar::new_spinner();
    let style = ProgressStyle::with_template("{spinner:.green} {msg}")
        .unwrap_or_else(|_| ProgressStyle::default_spinner())
        .tick_strings(&["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏"]);
    pb.set_style(style);
    pb.set_message(message.to_string());
    pb.enable_steady_tick(std::time::Duration::from_millis(80));
    pb
}
