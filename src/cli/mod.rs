//! CLI module for the RidePool command-line interface.
//!
//! Provides subcommands for working with a RidePool backend:
//! - `login` / `register` / `logout` / `whoami` - session management
//! - `trips list|mine|show|create|update|delete|search|join` - trip operations
//! - `profile show|update` - account profile
//! - `dashboard` - activity summary with sharing stats

use anyhow::{bail, Result};
use chrono::{DateTime, NaiveDateTime, Utc};
use clap::{Parser, Subcommand};
use std::path::PathBuf;

use crate::api::ApiError;
use crate::auth::AuthState;
use crate::forms::account::{LoginForm, RegisterForm};
use crate::forms::search::SearchForm;
use crate::forms::trip::TripForm;
use crate::forms::ValidationErrors;
use crate::models::{Trip, TripRole, TripStatus, UpdateProfileData, UpdateTripData};
use crate::stats::DashboardStats;
use crate::AppContext;

/// CLI arguments structure
#[derive(Parser, Debug)]
#[command(name = "ridepool")]
#[command(author, version, about = "Command-line client for the RidePool ride-sharing API", long_about = None)]
pub struct Cli {
    /// Path to configuration file
    #[arg(short, long, default_value = "ridepool.toml")]
    pub config: PathBuf,

    /// Override log level
    #[arg(short, long)]
    pub log_level: Option<String>,

    /// API base URL to connect to
    #[arg(long, env = "RIDEPOOL_API_URL")]
    pub api_url: Option<String>,

    #[command(subcommand)]
    pub command: Commands,
}

/// Available CLI subcommands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Log in and store the session token
    Login {
        /// Account email
        email: String,
        /// Account password
        #[arg(long)]
        password: String,
    },

    /// Create an account and log in
    Register {
        /// Full name
        #[arg(long)]
        name: String,
        /// Account email
        #[arg(long)]
        email: String,
        /// Account password
        #[arg(long)]
        password: String,
        /// Phone number
        #[arg(long)]
        phone: String,
    },

    /// Discard the stored session
    Logout,

    /// Show the currently authenticated account
    Whoami,

    /// Trip management commands
    #[command(subcommand)]
    Trips(TripsCommands),

    /// Profile commands
    #[command(subcommand)]
    Profile(ProfileCommands),

    /// Show your activity summary
    Dashboard,
}

/// Trips subcommands
#[derive(Subcommand, Debug)]
pub enum TripsCommands {
    /// List all available trips
    List {
        /// Filter by status (active, completed, cancelled)
        #[arg(long)]
        status: Option<String>,
    },
    /// List trips you drive or ride on
    Mine,
    /// Show details for one trip
    Show {
        /// Trip id
        id: i64,
    },
    /// Offer a new trip
    Create {
        /// Departure location
        #[arg(long)]
        from: String,
        /// Destination
        #[arg(long)]
        to: String,
        /// Departure time (RFC 3339, or "YYYY-MM-DD HH:MM" in UTC)
        #[arg(long)]
        departure: String,
        /// Maximum passengers (1-8)
        #[arg(long, default_value = "1")]
        passengers: u32,
        /// Price per person in rupees
        #[arg(long)]
        price: f64,
        /// Optional free-text description
        #[arg(long)]
        description: Option<String>,
    },
    /// Update a trip you drive
    Update {
        /// Trip id
        id: i64,
        #[arg(long)]
        from: Option<String>,
        #[arg(long)]
        to: Option<String>,
        /// New departure time (RFC 3339, or "YYYY-MM-DD HH:MM" in UTC)
        #[arg(long)]
        departure: Option<String>,
        #[arg(long)]
        passengers: Option<u32>,
        #[arg(long)]
        price: Option<f64>,
        #[arg(long)]
        description: Option<String>,
    },
    /// Delete a trip you drive
    Delete {
        /// Trip id
        id: i64,
        /// Actually delete (without this flag, nothing happens)
        #[arg(long)]
        yes: bool,
    },
    /// Search for trips to join
    Search {
        /// Departure location
        #[arg(long)]
        from: String,
        /// Destination
        #[arg(long)]
        to: String,
        /// Departure date (YYYY-MM-DD)
        #[arg(long)]
        date: Option<String>,
        /// Price ceiling in rupees (0 or omitted means no limit)
        #[arg(long, default_value = "0")]
        max_price: f64,
    },
    /// Join a trip as a passenger
    Join {
        /// Trip id
        id: i64,
    },
}

/// Profile subcommands
#[derive(Subcommand, Debug)]
pub enum ProfileCommands {
    /// Show your profile
    Show,
    /// Update profile fields
    Update {
        #[arg(long)]
        name: Option<String>,
        #[arg(long)]
        phone: Option<String>,
        #[arg(long)]
        profile_image: Option<String>,
    },
}

/// Run a CLI command
pub async fn run_command(cli: &Cli, ctx: &AppContext) -> Result<()> {
    match &cli.command {
        Commands::Login { email, password } => cmd_login(ctx, email, password).await,
        Commands::Register {
            name,
            email,
            password,
            phone,
        } => cmd_register(ctx, name, email, password, phone).await,
        Commands::Logout => cmd_logout(ctx),
        Commands::Whoami => cmd_whoami(ctx),
        Commands::Trips(command) => run_trips_command(ctx, command).await,
        Commands::Profile(ProfileCommands::Show) => cmd_profile_show(ctx).await,
        Commands::Profile(ProfileCommands::Update {
            name,
            phone,
            profile_image,
        }) => cmd_profile_update(ctx, name, phone, profile_image).await,
        Commands::Dashboard => cmd_dashboard(ctx).await,
    }
}

async fn run_trips_command(ctx: &AppContext, command: &TripsCommands) -> Result<()> {
    match command {
        TripsCommands::List { status } => cmd_trips_list(ctx, status.as_deref()).await,
        TripsCommands::Mine => cmd_trips_mine(ctx).await,
        TripsCommands::Show { id } => cmd_trips_show(ctx, *id).await,
        TripsCommands::Create {
            from,
            to,
            departure,
            passengers,
            price,
            description,
        } => cmd_trips_create(ctx, from, to, departure, *passengers, *price, description).await,
        TripsCommands::Update {
            id,
            from,
            to,
            departure,
            passengers,
            price,
            description,
        } => {
            cmd_trips_update(ctx, *id, from, to, departure, *passengers, *price, description).await
        }
        TripsCommands::Delete { id, yes } => cmd_trips_delete(ctx, *id, *yes).await,
        TripsCommands::Search {
            from,
            to,
            date,
            max_price,
        } => cmd_trips_search(ctx, from, to, date.as_deref(), *max_price).await,
        TripsCommands::Join { id } => cmd_trips_join(ctx, *id).await,
    }
}

// ============================================================================
// Session Commands
// ============================================================================

async fn cmd_login(ctx: &AppContext, email: &str, password: &str) -> Result<()> {
    let form = LoginForm {
        email: email.to_string(),
        password: password.to_string(),
    };
    if let Err(errors) = form.validate() {
        return fail_validation(errors);
    }

    let user = ctx.auth.login(email, password).await.map_err(api_err)?;
    println!("Logged in as {} <{}>", user.name, user.email);
    Ok(())
}

async fn cmd_register(
    ctx: &AppContext,
    name: &str,
    email: &str,
    password: &str,
    phone: &str,
) -> Result<()> {
    let form = RegisterForm {
        name: name.to_string(),
        email: email.to_string(),
        password: password.to_string(),
        phone: phone.to_string(),
    };
    let payload = match form.into_payload() {
        Ok(payload) => payload,
        Err(errors) => return fail_validation(errors),
    };

    let user = ctx.auth.register(&payload).await.map_err(api_err)?;
    println!("Welcome to RidePool, {}!", user.name);
    println!("You are now logged in as {}", user.email);
    Ok(())
}

fn cmd_logout(ctx: &AppContext) -> Result<()> {
    ctx.auth.logout();
    println!("Logged out. Run 'ridepool login <email> --password <password>' to start a new session.");
    Ok(())
}

fn cmd_whoami(ctx: &AppContext) -> Result<()> {
    match ctx.auth.state() {
        AuthState::Authenticated(user) => {
            println!();
            println!("Name:     {}", user.name);
            println!("Email:    {}", user.email);
            println!("Phone:    {}", format_phone(&user.phone));
            println!("Verified: {}", if user.is_verified { "yes" } else { "no" });
            println!();
        }
        _ => println!("Not logged in."),
    }
    Ok(())
}

// ============================================================================
// Trip Commands
// ============================================================================

async fn cmd_trips_list(ctx: &AppContext, status: Option<&str>) -> Result<()> {
    let wanted = match status {
        Some(s) => Some(s.parse::<TripStatus>().map_err(|e| anyhow::anyhow!(e))?),
        None => None,
    };

    let trips = ctx.api.list_trips().await.map_err(api_err)?;
    let filtered = crate::stats::filter_by_status(&trips, wanted);

    if filtered.is_empty() {
        println!("No trips found.");
        return Ok(());
    }
    print_trip_table(&filtered);
    Ok(())
}

async fn cmd_trips_mine(ctx: &AppContext) -> Result<()> {
    let trips = ctx.api.my_trips().await.map_err(api_err)?;
    if trips.is_empty() {
        println!("You have no trips yet. Offer one with 'ridepool trips create'.");
        return Ok(());
    }
    let all: Vec<&Trip> = trips.iter().collect();
    print_trip_table(&all);
    Ok(())
}

async fn cmd_trips_show(ctx: &AppContext, id: i64) -> Result<()> {
    let trip = ctx.api.get_trip(id).await.map_err(api_err)?;
    let viewer = ctx.auth.current_user();

    println!();
    println!("=== Trip {}: {} -> {} ===", trip.id, trip.from, trip.to);
    println!();
    println!("Departure:  {}", trip.departure_time.format("%Y-%m-%d %H:%M UTC"));
    println!("Status:     {}", trip.status);
    println!(
        "Seats:      {}/{} taken, {} available",
        trip.current_passengers,
        trip.max_passengers,
        trip.available_seats()
    );
    println!("Price:      {}", format_price(trip.price_per_person));

    if let Some(description) = &trip.description {
        println!("Notes:      {}", description);
    }

    if let Some(driver) = &trip.driver {
        println!();
        println!("Driver:     {} ({})", driver.name, format_phone(&driver.phone));
    }

    if !trip.passengers.is_empty() {
        println!();
        println!("Passengers:");
        for passenger in &trip.passengers {
            println!("  - {}", passenger.name);
        }
    }

    match trip.role_for(viewer.as_ref()) {
        TripRole::Driver => println!("\nYou drive this trip."),
        TripRole::Passenger => println!("\nYou are riding on this trip."),
        TripRole::None => {
            if trip.can_join(viewer.as_ref()) {
                println!("\nJoin it with 'ridepool trips join {}'.", trip.id);
            } else if trip.is_full() {
                println!("\nThis trip is full.");
            }
        }
    }
    println!();
    Ok(())
}

#[allow(clippy::too_many_arguments)]
async fn cmd_trips_create(
    ctx: &AppContext,
    from: &str,
    to: &str,
    departure: &str,
    passengers: u32,
    price: f64,
    description: &Option<String>,
) -> Result<()> {
    let now = Utc::now();
    let form = TripForm {
        from: from.to_string(),
        to: to.to_string(),
        departure_time: parse_departure(departure),
        max_passengers: passengers,
        price_per_person: price,
        description: description.clone().unwrap_or_default(),
        ..TripForm::default()
    };

    let payload = match form.into_payload(now) {
        Ok(payload) => payload,
        Err(errors) => return fail_validation(errors),
    };

    let trip = ctx.api.create_trip(&payload).await.map_err(api_err)?;
    println!("Trip created!");
    println!(
        "  #{}: {} -> {} on {}, {} seats at {}",
        trip.id,
        trip.from,
        trip.to,
        trip.departure_time.format("%Y-%m-%d %H:%M UTC"),
        trip.max_passengers,
        format_price(trip.price_per_person)
    );
    Ok(())
}

#[allow(clippy::too_many_arguments)]
async fn cmd_trips_update(
    ctx: &AppContext,
    id: i64,
    from: &Option<String>,
    to: &Option<String>,
    departure: &Option<String>,
    passengers: Option<u32>,
    price: Option<f64>,
    description: &Option<String>,
) -> Result<()> {
    let departure_time = match departure {
        Some(raw) => match parse_departure(raw) {
            Some(parsed) => Some(parsed),
            None => bail!("Invalid departure time: {}", raw),
        },
        None => None,
    };

    let data = UpdateTripData {
        from: from.clone(),
        to: to.clone(),
        departure_time,
        max_passengers: passengers,
        price_per_person: price,
        description: description.clone(),
    };

    if serde_json::to_value(&data)? == serde_json::json!({}) {
        bail!("Nothing to update. Pass at least one field flag.");
    }

    let trip = ctx.api.update_trip(id, &data).await.map_err(api_err)?;
    println!("Trip {} updated.", trip.id);
    Ok(())
}

async fn cmd_trips_delete(ctx: &AppContext, id: i64, yes: bool) -> Result<()> {
    if !yes {
        println!("This would delete trip {}.", id);
        println!("Re-run with --yes to confirm.");
        return Ok(());
    }

    let response = ctx.api.delete_trip(id).await.map_err(api_err)?;
    println!("{}", response.message);
    Ok(())
}

async fn cmd_trips_search(
    ctx: &AppContext,
    from: &str,
    to: &str,
    date: Option<&str>,
    max_price: f64,
) -> Result<()> {
    let departure_date = match date {
        Some(raw) => Some(
            raw.parse()
                .map_err(|_| anyhow::anyhow!("Invalid date (expected YYYY-MM-DD): {}", raw))?,
        ),
        None => None,
    };

    let form = SearchForm {
        from: from.to_string(),
        to: to.to_string(),
        departure_date,
        max_price,
    };
    let criteria = match form.into_criteria(Utc::now().date_naive()) {
        Ok(criteria) => criteria,
        Err(errors) => return fail_validation(errors),
    };

    let trips = ctx.api.search_trips(&criteria).await.map_err(api_err)?;
    if trips.is_empty() {
        println!("No matching trips found.");
        return Ok(());
    }

    println!("Found {} matching trip(s):", trips.len());
    let all: Vec<&Trip> = trips.iter().collect();
    print_trip_table(&all);
    Ok(())
}

async fn cmd_trips_join(ctx: &AppContext, id: i64) -> Result<()> {
    let trip = ctx.api.get_trip(id).await.map_err(api_err)?;
    let viewer = ctx.auth.current_user();

    match trip.role_for(viewer.as_ref()) {
        TripRole::Driver => bail!("You drive this trip; a driver cannot join their own trip."),
        TripRole::Passenger => bail!("You have already joined this trip."),
        TripRole::None => {}
    }
    if trip.is_full() {
        bail!("This trip is full ({} seats taken).", trip.max_passengers);
    }

    let response = ctx.api.join_trip(id).await.map_err(api_err)?;
    println!("{}", response.message);
    println!(
        "Trip {}: {} -> {}, departing {}",
        trip.id,
        trip.from,
        trip.to,
        trip.departure_time.format("%Y-%m-%d %H:%M UTC")
    );
    Ok(())
}

// ============================================================================
// Profile & Dashboard Commands
// ============================================================================

async fn cmd_profile_show(ctx: &AppContext) -> Result<()> {
    let user = ctx.api.profile().await.map_err(api_err)?;

    println!();
    println!("Name:     {}", user.name);
    println!("Email:    {}", user.email);
    println!("Phone:    {}", format_phone(&user.phone));
    println!("Verified: {}", if user.is_verified { "yes" } else { "no" });
    if let Some(image) = &user.profile_image {
        println!("Photo:    {}", image);
    }
    println!("Member since: {}", user.created_at.format("%Y-%m-%d"));
    println!();
    Ok(())
}

async fn cmd_profile_update(
    ctx: &AppContext,
    name: &Option<String>,
    phone: &Option<String>,
    profile_image: &Option<String>,
) -> Result<()> {
    if name.is_none() && phone.is_none() && profile_image.is_none() {
        bail!("Nothing to update. Pass at least one of --name, --phone, --profile-image.");
    }

    let data = UpdateProfileData {
        name: name.clone(),
        phone: phone.clone(),
        profile_image: profile_image.clone(),
    };
    let user = ctx.api.update_profile(&data).await.map_err(api_err)?;
    println!("Profile updated for {}.", user.name);
    Ok(())
}

async fn cmd_dashboard(ctx: &AppContext) -> Result<()> {
    let user = match ctx.auth.current_user() {
        Some(user) => user,
        None => bail!("Not logged in. Run 'ridepool login <email> --password <password>' first."),
    };

    let trips = ctx.api.my_trips().await.map_err(api_err)?;
    let stats = DashboardStats::compute(&trips, Utc::now());

    println!();
    println!("=== Welcome back, {}! ===", user.name);
    println!();
    println!("Total trips:       {}", stats.total_trips);
    println!(
        "Active trips:      {} ({} departing this week)",
        stats.active_trips, stats.upcoming_week
    );
    println!("Completed trips:   {}", stats.completed_trips);
    println!("Cancelled trips:   {}", stats.cancelled_trips);
    println!("Money saved:       {}", format_price(stats.money_saved));
    println!("People helped:     {}", stats.passengers_helped);

    let recent: Vec<&Trip> = trips.iter().take(3).collect();
    if !recent.is_empty() {
        println!();
        println!("Recent trips:");
        print_trip_table(&recent);
    }
    println!();
    Ok(())
}

// ============================================================================
// Helper Functions
// ============================================================================

/// Print field-scoped validation errors and fail without touching the
/// network.
fn fail_validation(errors: ValidationErrors) -> Result<()> {
    eprintln!("Please fix the following before submitting:");
    for (field, message) in errors.iter() {
        eprintln!("  {}: {}", field, message);
    }
    bail!("Validation failed for {} field(s)", errors.len());
}

/// Attach login guidance to session-expiry failures.
fn api_err(err: ApiError) -> anyhow::Error {
    if err.is_unauthorized() {
        anyhow::anyhow!(
            "{}\nRun 'ridepool login <email> --password <password>' to start a new session.",
            err
        )
    } else {
        anyhow::Error::new(err)
    }
}

fn print_trip_table(trips: &[&Trip]) {
    println!();
    println!(
        "{:<6}  {:<18}  {:<18}  {:<17}  {:<7}  {:<10}  {:<10}",
        "ID", "FROM", "TO", "DEPARTURE", "SEATS", "PRICE", "STATUS"
    );
    println!("{}", "-".repeat(100));

    for trip in trips {
        println!(
            "{:<6}  {:<18}  {:<18}  {:<17}  {:<7}  {:<10}  {:<10}",
            trip.id,
            truncate(&trip.from, 18),
            truncate(&trip.to, 18),
            trip.departure_time.format("%Y-%m-%d %H:%M"),
            format!("{}/{}", trip.current_passengers, trip.max_passengers),
            format_price(trip.price_per_person),
            trip.status.to_string()
        );
    }
    println!();
}

/// Accept RFC 3339 or a bare "YYYY-MM-DD HH:MM" (read as UTC).
fn parse_departure(raw: &str) -> Option<DateTime<Utc>> {
    if let Ok(parsed) = DateTime::parse_from_rfc3339(raw) {
        return Some(parsed.with_timezone(&Utc));
    }
    NaiveDateTime::parse_from_str(raw, "%Y-%m-%d %H:%M")
        .ok()
        .map(|naive| naive.and_utc())
}

fn format_price(amount: f64) -> String {
    format!("₹{:.0}", amount)
}

/// Group a phone number the way the trip cards do: `+91 XXXXX XXXXX` for
/// bare 10-digit numbers, country code split out for longer ones.
fn format_phone(phone: &str) -> String {
    let digits: String = phone.chars().filter(|c| c.is_ascii_digit()).collect();

    if digits.len() == 10 {
        return format!("+91 {} {}", &digits[..5], &digits[5..]);
    }
    if digits.len() > 10 {
        let split = digits.len() - 10;
        let (country, number) = digits.split_at(split);
        return format!("+{} {} {}", country, &number[..5], &number[5..]);
    }
    phone.to_string()
}

/// Truncate a string to max length with ellipsis
fn truncate(s: &str, max_len: usize) -> String {
    if s.chars().count() <= max_len {
        s.to_string()
    } else {
        let cut: String = s.chars().take(max_len.saturating_sub(3)).collect();
        format!("{}...", cut)
    }
}
