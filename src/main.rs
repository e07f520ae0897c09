use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Result;
use chrono::{Local, Timelike};
use clap::{Parser, Subcommand};
use skycast_core::{App, AppError};
use skycast_session::{SearchEvent, ViewState};
use skycast_weather::conditions::{celsius_to_fahrenheit, daylight, round_temp};
use skycast_weather::{
    ConditionIcon, Coordinates, DayPart, FixedPosition, Forecast, MoonPhase, PositionProvider,
    UvLevel,
};

/// Current conditions, forecasts and astronomy for one selected location
#[derive(Parser, Debug)]
#[command(name = "skycast", version)]
struct Args {
    /// Configuration file (defaults to the user config directory)
    #[arg(long, short, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Show the weather for the selected location
    Show,
    /// List places matching a name
    Search { query: String },
    /// Search and select a place
    Select {
        query: String,
        /// Which candidate to select, starting at 1
        #[arg(long, short, default_value_t = 1)]
        pick: usize,
    },
    /// Select the device position
    Locate {
        #[arg(long, requires = "lon", allow_hyphen_values = true)]
        lat: Option<f64>,
        #[arg(long, requires = "lat", allow_hyphen_values = true)]
        lon: Option<f64>,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    skycast_core::init()?;

    let args = Args::parse();

    let mut app = match App::new(args.config.as_deref()) {
        Ok(app) => app,
        Err(e) => {
            tracing::error!("Failed to start: {}", e);
            eprintln!("{}", e.user_message());
            std::process::exit(1);
        }
    };

    let outcome = match args.command.unwrap_or(Command::Show) {
        Command::Show => show(&mut app).await,
        Command::Search { query } => search(&app, &query).await,
        Command::Select { query, pick } => select(&app, &query, pick).await,
        Command::Locate { lat, lon } => locate(&app, lat.zip(lon)).await,
    };

    app.shutdown();

    if let Err(e) = outcome {
        tracing::error!("{}", e);
        eprintln!("{}", e.user_message());
        std::process::exit(1);
    }
    Ok(())
}

async fn show(app: &mut App) -> Result<(), AppError> {
    app.start();
    app.finish_background().await;

    let location = app.store().selected_location();
    app.views().settled_for(&location).await;

    let views = app.views();
    println!("{} ({})", location.display_name(), location.country);
    println!();

    match views.header.state() {
        ViewState::Ready(conditions) => {
            let current = &conditions.current;
            let icon = ConditionIcon::from_condition(&current.condition.text, current.is_day == 1);
            println!(
                "{} {}°C ({}°F)  {}",
                icon.glyph(),
                round_temp(current.temp_c),
                round_temp(celsius_to_fahrenheit(current.temp_c)),
                current.condition.text
            );
            println!(
                "Feels like {}°C · Humidity {}% · Wind {} km/h {}",
                round_temp(current.feelslike_c),
                current.humidity,
                round_temp(current.wind_kph),
                current.wind_dir
            );
        }
        other => print_unavailable("Current conditions", &other),
    }
    println!();

    match views.hourly.state() {
        ViewState::Ready(forecast) => print_hourly(&forecast),
        other => print_unavailable("Hourly forecast", &other),
    }
    println!();

    match views.today.state() {
        ViewState::Ready(history) => print_day_parts(&history),
        other => print_unavailable("Today", &other),
    }
    println!();

    match views.daily.state() {
        ViewState::Ready(forecast) => print_daily(&forecast),
        other => print_unavailable("Daily forecast", &other),
    }
    println!();

    match views.astronomy.state() {
        ViewState::Ready(astronomy) => {
            let astro = &astronomy.astronomy.astro;
            println!("Astronomy");
            println!("  Sunrise {}  Sunset {}", astro.sunrise, astro.sunset);
            if let Some(length) = daylight(&astro.sunrise, &astro.sunset) {
                println!("  Daylight {}", length);
            }
            println!("  Moonrise {}  Moonset {}", astro.moonrise, astro.moonset);
            println!(
                "  {} {} ({}% illuminated)",
                MoonPhase::from_name(&astro.moon_phase).glyph(),
                astro.moon_phase,
                astro.moon_illumination
            );
        }
        other => print_unavailable("Astronomy", &other),
    }

    Ok(())
}

fn print_unavailable<T>(title: &str, state: &ViewState<T>) {
    match state {
        ViewState::Failed(error) => println!("{}: {}", title, error.message),
        _ => println!("{}: unavailable", title),
    }
}

fn print_hourly(forecast: &Forecast) {
    println!("Next 12 hours");
    for hour in forecast.next_hours(Local::now().hour(), 12) {
        let icon = ConditionIcon::from_condition(&hour.condition.text, hour.is_day == 1);
        let time = hour.time.split_whitespace().last().unwrap_or(&hour.time);
        println!(
            "  {}  {} {:>3}°C  {:>3}% rain",
            time,
            icon.glyph(),
            round_temp(hour.temp_c),
            hour.chance_of_rain
        );
    }

    if let Some(alerts) = &forecast.alerts {
        for alert in &alerts.alert {
            println!("  ⚠ {} ({})", alert.headline, alert.severity);
        }
    }
}

fn print_day_parts(history: &Forecast) {
    println!("Today");
    let Some(today) = history.today() else {
        println!("  no observations");
        return;
    };

    for part in DayPart::ALL {
        let hours = today.hours_in(part);
        if hours.is_empty() {
            continue;
        }
        let average = hours.iter().map(|h| h.temp_c).sum::<f64>() / hours.len() as f64;
        println!("  {:<10} {:>3}°C", part.label(), round_temp(average));
    }
    println!(
        "  High {}°C · Low {}°C · UV {}",
        round_temp(today.day.maxtemp_c),
        round_temp(today.day.mintemp_c),
        UvLevel::describe(today.day.uv)
    );
}

fn print_daily(forecast: &Forecast) {
    println!("{}-day forecast", forecast.days().len());
    for day in forecast.days() {
        let date = day
            .naive_date()
            .map(|d| d.format("%a %d %b").to_string())
            .unwrap_or_else(|| day.date.clone());
        let icon = ConditionIcon::from_condition(&day.day.condition.text, true);
        println!(
            "  {:<10} {} {:>3}° / {:>3}°  {:>3}% rain  {}",
            date,
            icon.glyph(),
            round_temp(day.day.maxtemp_c),
            round_temp(day.day.mintemp_c),
            day.day.daily_chance_of_rain,
            day.day.condition.text
        );
    }
}

async fn search(app: &App, query: &str) -> Result<(), AppError> {
    app.hydrate();
    let (mut control, mut events) = app.search_control();

    control.on_query_change(query);
    match events.recv().await {
        Some(SearchEvent::Results { places, .. }) if !places.is_empty() => {
            for (i, place) in places.iter().enumerate() {
                println!(
                    "{}. {}, {}, {} ({}, {})",
                    i + 1,
                    place.name,
                    place.region,
                    place.country,
                    place.lat,
                    place.lon
                );
            }
        }
        Some(SearchEvent::Cleared) => println!(
            "Type at least {} characters to search.",
            control.settings().min_query_chars
        ),
        _ => println!("No locations found."),
    }
    Ok(())
}

async fn select(app: &App, query: &str, pick: usize) -> Result<(), AppError> {
    app.hydrate();
    let (mut control, _events) = app.search_control();

    let places = control.search_now(query).await;
    let Some(place) = pick.checked_sub(1).and_then(|i| places.get(i)).cloned() else {
        println!("No location #{} for {:?}.", pick, query);
        return Ok(());
    };

    let location = control.select(place);
    println!("Selected {}", location.display_name());
    Ok(())
}

async fn locate(app: &App, position: Option<(f64, f64)>) -> Result<(), AppError> {
    app.hydrate();
    let (control, _events) = match position {
        Some((lat, lon)) => {
            let provider: Arc<dyn PositionProvider> =
                Arc::new(FixedPosition::new(Coordinates::new(lat, lon)));
            app.search_control_with(provider)
        }
        None => app.search_control(),
    };

    let location = control.locate().await?;
    println!("Selected {}", location.display_name());
    if let Some(temp) = app.store().current_temp() {
        println!("Currently {}°C", temp);
    }
    Ok(())
}
