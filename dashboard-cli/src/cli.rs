use std::io::IsTerminal;

use anyhow::{Context as _, bail};
use clap::{Parser, Subcommand};
use dashboard_core::{
    Config, Coordinates, Dashboard, LocalStore, RecentCities, Settings, WeatherService,
    display::is_valid_city_name,
    settings::{Language, TemperatureUnit, Theme, WindUnit},
};
use inquire::{Confirm, Select, Text};

use crate::render::{self, Style};

/// Top-level CLI struct.
#[derive(Debug, Parser)]
#[command(name = "weather", version, about = "Current weather and 5-day forecast in your terminal")]
pub struct Cli {
    /// Print machine-readable JSON instead of the dashboard view.
    #[arg(long, global = true)]
    pub json: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Show current conditions and the forecast for a city.
    Show {
        /// City name; the configured default city when absent.
        city: Option<String>,

        /// Skip the 5-day forecast.
        #[arg(long)]
        no_forecast: bool,
    },

    /// Show only the 5-day forecast for a city.
    Forecast {
        /// City name; the configured default city when absent.
        city: Option<String>,
    },

    /// Show weather at raw coordinates.
    Coords {
        #[arg(allow_negative_numbers = true)]
        latitude: f64,

        #[arg(allow_negative_numbers = true)]
        longitude: f64,

        /// Skip the 5-day forecast.
        #[arg(long)]
        no_forecast: bool,
    },

    /// List recently searched cities.
    Recent {
        /// Only cities containing this text (case-insensitive).
        filter: Option<String>,

        /// Forget all recent cities.
        #[arg(long, conflicts_with = "filter")]
        clear: bool,
    },

    /// View or change preferences.
    Settings {
        #[command(subcommand)]
        action: Option<SettingsAction>,
    },

    /// Inspect or create the configuration file.
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

#[derive(Debug, Subcommand)]
pub enum SettingsAction {
    /// Print current settings.
    Show,

    /// Change one setting, e.g. `weather settings set temperatureUnit fahrenheit`.
    Set { key: String, value: String },

    /// Edit all settings interactively.
    Edit,

    /// Restore default settings.
    Reset,
}

#[derive(Debug, Subcommand)]
pub enum ConfigAction {
    /// Print the config file location.
    Path,

    /// Write a config file with default values if none exists.
    Init,
}

/// Everything a command needs, loaded once at startup.
struct Context {
    config: Config,
    store: LocalStore,
    settings: Settings,
}

impl Context {
    fn load() -> anyhow::Result<Self> {
        let config = Config::load()?;
        let store = LocalStore::new(config.resolved_data_dir()?);
        let settings = Settings::load(&store);
        Ok(Self { config, store, settings })
    }

    fn service(&self) -> anyhow::Result<WeatherService> {
        WeatherService::from_config(&self.config).context("Failed to build HTTP client")
    }

    fn style(&self) -> Style<'_> {
        Style {
            settings: &self.settings,
            color: std::io::stdout().is_terminal(),
        }
    }

    fn city_or_default(&self, city: Option<String>) -> String {
        let city = city
            .map(|c| c.trim().to_string())
            .filter(|c| !c.is_empty())
            .unwrap_or_else(|| self.settings.default_city.clone());

        if !is_valid_city_name(&city) {
            eprintln!("warning: \"{city}\" doesn't look like a city name, searching anyway");
        }
        city
    }
}

impl Cli {
    pub async fn run(self) -> anyhow::Result<()> {
        match self.command {
            Command::Config { action } => run_config(&action),
            Command::Show { city, no_forecast } => {
                let ctx = Context::load()?;
                let city = ctx.city_or_default(city);
                let mut dash = Dashboard::new(ctx.service()?, ctx.store.clone());
                let ok = dash.search(&city, !no_forecast).await;
                finish_dashboard(&mut dash, ok, &ctx, self.json).await
            }
            Command::Coords { latitude, longitude, no_forecast } => {
                if !(-90.0..=90.0).contains(&latitude) || !(-180.0..=180.0).contains(&longitude) {
                    bail!("Coordinates out of range: {latitude}, {longitude}");
                }
                let ctx = Context::load()?;
                let mut dash = Dashboard::new(ctx.service()?, ctx.store.clone());
                let ok = dash
                    .show_coordinates(Coordinates { latitude, longitude }, !no_forecast)
                    .await;
                finish_dashboard(&mut dash, ok, &ctx, self.json).await
            }
            Command::Forecast { city } => {
                let ctx = Context::load()?;
                let city = ctx.city_or_default(city);
                let mut dash = Dashboard::new(ctx.service()?, ctx.store.clone());
                let ok = dash.show_forecast(&city).await;
                finish_dashboard(&mut dash, ok, &ctx, self.json).await
            }
            Command::Recent { filter, clear } => {
                let ctx = Context::load()?;
                let mut recent = RecentCities::load(&ctx.store);
                if clear {
                    recent.clear(&ctx.store)?;
                    println!("Recent cities cleared.");
                    return Ok(());
                }
                let cities = recent.matching(filter.as_deref().unwrap_or_default());
                if self.json {
                    println!("{}", serde_json::to_string_pretty(&cities)?);
                } else if cities.is_empty() {
                    println!("No recent cities.");
                } else {
                    for city in cities {
                        println!("{city}");
                    }
                }
                Ok(())
            }
            Command::Settings { action } => {
                let mut ctx = Context::load()?;
                run_settings(&mut ctx, action.unwrap_or(SettingsAction::Show), self.json)
            }
        }
    }
}

/// Retry on request while failing interactively, then print what the dashboard holds.
async fn finish_dashboard(
    dash: &mut Dashboard,
    mut ok: bool,
    ctx: &Context,
    json: bool,
) -> anyhow::Result<()> {
    let interactive = std::io::stdin().is_terminal() && std::io::stderr().is_terminal();

    while !ok && interactive {
        let message = dash.error().unwrap_or("Failed to fetch weather data");
        eprintln!("{message}");
        if !Confirm::new("Retry?").with_default(true).prompt()? {
            break;
        }
        ok = dash.retry().await.unwrap_or(false);
    }

    if !ok {
        bail!(
            "{}",
            dash.error().unwrap_or("Failed to fetch weather data. Please try again.")
        );
    }

    if json {
        let body = serde_json::json!({
            "current": dash.current(),
            "forecast": dash.forecast(),
        });
        println!("{}", serde_json::to_string_pretty(&body)?);
        return Ok(());
    }

    if let Some(record) = dash.current() {
        print!("{}", render::current(record, ctx.style()));
        if !dash.forecast().is_empty() {
            println!();
        }
    }
    print!("{}", render::forecast(dash.forecast(), ctx.style()));
    Ok(())
}

fn run_settings(ctx: &mut Context, action: SettingsAction, json: bool) -> anyhow::Result<()> {
    match action {
        SettingsAction::Show => {
            if json {
                println!("{}", serde_json::to_string_pretty(&ctx.settings)?);
            } else {
                for (key, value) in ctx.settings.entries() {
                    println!("{key:<20} {value}");
                }
            }
        }
        SettingsAction::Set { key, value } => {
            ctx.settings.set_field(&key, &value)?;
            ctx.settings.save(&ctx.store)?;
            println!("Settings saved successfully!");
        }
        SettingsAction::Edit => {
            edit_settings(&mut ctx.settings)?;
            ctx.settings.save(&ctx.store)?;
            println!("Settings saved successfully!");
        }
        SettingsAction::Reset => {
            ctx.settings.reset(&ctx.store)?;
            println!("Settings reset to default!");
        }
    }
    Ok(())
}

fn select<T: Copy + PartialEq + std::fmt::Display>(
    message: &str,
    options: &[T],
    current: T,
) -> anyhow::Result<T> {
    let cursor = options.iter().position(|o| *o == current).unwrap_or(0);
    Ok(Select::new(message, options.to_vec())
        .with_starting_cursor(cursor)
        .prompt()?)
}

fn edit_settings(settings: &mut Settings) -> anyhow::Result<()> {
    let city = Text::new("Default city:")
        .with_default(&settings.default_city)
        .prompt()?;
    settings.set_field("defaultCity", &city)?;

    settings.temperature_unit =
        select("Temperature unit:", TemperatureUnit::ALL, settings.temperature_unit)?;
    settings.wind_unit = select("Wind speed unit:", WindUnit::ALL, settings.wind_unit)?;
    settings.theme = select("Theme:", Theme::ALL, settings.theme)?;

    settings.language = select("Language:", Language::ALL, settings.language)?;

    settings.notifications = Confirm::new("Enable weather notifications?")
        .with_default(settings.notifications)
        .prompt()?;
    settings.severe_weather_alerts = Confirm::new("Severe weather alerts?")
        .with_default(settings.severe_weather_alerts)
        .prompt()?;

    Ok(())
}

fn run_config(action: &ConfigAction) -> anyhow::Result<()> {
    let path = Config::config_file_path()?;
    match action {
        ConfigAction::Path => println!("{}", path.display()),
        ConfigAction::Init => {
            if path.exists() {
                println!("Config already exists at {}", path.display());
            } else {
                let written = Config::default().save()?;
                println!("Wrote default config to {}", written.display());
            }
        }
    }
    Ok(())
}
