//! `cropwise` command line front end
//!
//! Argument definitions plus [`CliApp`], which wires the services together and
//! renders each command's outcome as text (or pretty JSON with `--json`).

use std::sync::{Arc, Mutex};
use std::time::Duration;

use anyhow::{bail, Context, Result};
use clap::{Args, Parser, Subcommand};
use serde::Serialize;
use serde_json::Value;

use cropwise_domain::{CropRuleInput, Credentials, LiveCropResult, Season};

use crate::application::services::{
    AnalyticsService, AuthService, CropRuleService, CropService, PlaceService,
};
use crate::application::{CropwiseApi, LatestRequestTracker};
use crate::ports::outbound::RawApiPort;
use crate::state::Session;

/// Upper bound on waiting for detached analytics before exit
const ANALYTICS_FLUSH_TIMEOUT: Duration = Duration::from_secs(2);

#[derive(Parser, Debug)]
#[command(name = "cropwise")]
#[command(about = "Find a place, check its season, and see which crops suit the live weather")]
#[command(version)]
pub struct Cli {
    /// Backend base URL (overrides CROPWISE_API_URL)
    #[arg(long, global = true, value_name = "URL")]
    pub api_url: Option<String>,

    /// Keep the session in memory only; nothing is read from or written to disk
    #[arg(long, global = true)]
    pub ephemeral: bool,

    /// Print results as JSON
    #[arg(long, global = true)]
    pub json: bool,

    /// Per-request timeout in milliseconds (overrides CROPWISE_REQUEST_TIMEOUT_MS)
    #[arg(long, global = true, value_name = "MS", value_parser = clap::value_parser!(u64).range(1..))]
    pub timeout_ms: Option<u64>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug, Clone, PartialEq)]
pub enum Command {
    /// Check that the backend is up
    Health,
    /// Create an account and log in with it
    Signup(CredentialArgs),
    /// Log in and store the session token
    Login(CredentialArgs),
    /// Forget the stored session token
    Logout,
    /// Show the logged-in user
    Whoami,
    /// List places the backend has looked up before
    Places,
    /// Search for a place by name
    Geocode {
        #[arg(value_name = "QUERY")]
        query: String,
        /// Make the result at this index the active place
        #[arg(long, value_name = "INDEX")]
        select: Option<usize>,
    },
    /// Show the current agricultural season for a place
    Season {
        #[arg(value_name = "PLACE")]
        place: String,
    },
    /// Score crops against live weather for a place
    Crops {
        #[arg(value_name = "PLACE")]
        place: String,
        /// Kharif, Rabi or Summer; omit to let the backend decide
        #[arg(long, short = 's', value_name = "SEASON", default_value = "")]
        season: String,
    },
    /// Send an analytics event
    Event {
        #[arg(value_name = "NAME")]
        name: String,
        /// Event metadata as a JSON value
        #[arg(long, value_name = "JSON")]
        meta: Option<String>,
    },
    /// Manage crop rules (admin only)
    Rules {
        #[command(subcommand)]
        command: RuleCommand,
    },
}

impl Command {
    /// Whether a stored token is validated before running this command
    pub fn checks_session(&self) -> bool {
        !matches!(
            self,
            Command::Signup(_) | Command::Login(_) | Command::Logout
        )
    }
}

#[derive(Args, Debug, Clone, PartialEq)]
pub struct CredentialArgs {
    #[arg(long, short = 'u')]
    pub username: String,
    #[arg(long, short = 'p', env = "CROPWISE_PASSWORD", hide_env_values = true)]
    pub password: String,
}

impl From<CredentialArgs> for Credentials {
    fn from(args: CredentialArgs) -> Self {
        Credentials::new(args.username, args.password)
    }
}

#[derive(Subcommand, Debug, Clone, PartialEq)]
pub enum RuleCommand {
    /// List all crop rules
    List,
    /// Add a crop rule
    Create(RuleArgs),
    /// Replace a crop rule
    Update {
        #[arg(value_name = "ID")]
        id: i64,
        #[command(flatten)]
        rule: RuleArgs,
    },
    /// Delete a crop rule
    Delete {
        #[arg(value_name = "ID")]
        id: i64,
    },
}

#[derive(Args, Debug, Clone, PartialEq)]
pub struct RuleArgs {
    #[arg(long)]
    pub name: String,
    /// Season the crop is sown in; repeat for several
    #[arg(long = "season", value_name = "SEASON", required = true)]
    pub seasons: Vec<Season>,
    #[arg(long, allow_negative_numbers = true)]
    pub temp_min: f64,
    #[arg(long, allow_negative_numbers = true)]
    pub temp_max: f64,
    #[arg(long)]
    pub rain_min: f64,
    #[arg(long)]
    pub rain_max: f64,
    /// Store the rule disabled
    #[arg(long)]
    pub inactive: bool,
}

impl From<RuleArgs> for CropRuleInput {
    fn from(args: RuleArgs) -> Self {
        CropRuleInput {
            name: args.name,
            seasons: args.seasons,
            temp_min: args.temp_min,
            temp_max: args.temp_max,
            rain_min: args.rain_min,
            rain_max: args.rain_max,
            active: !args.inactive,
        }
    }
}

/// Services behind the command line
pub struct CliApp {
    api: CropwiseApi,
    auth: AuthService,
    places: PlaceService,
    crops: CropService,
    analytics: AnalyticsService,
    rules: CropRuleService,
    json: bool,
    pending: Mutex<Vec<tokio::task::JoinHandle<()>>>,
}

impl CliApp {
    pub fn new(raw: Arc<dyn RawApiPort>, session: Session, json: bool) -> Self {
        let api = CropwiseApi::new(raw);
        let tracker = LatestRequestTracker::new();

        Self {
            auth: AuthService::new(api.clone(), session),
            places: PlaceService::new(api.clone(), tracker.clone()),
            crops: CropService::new(api.clone(), tracker),
            analytics: AnalyticsService::new(api.clone()),
            rules: CropRuleService::new(api.clone()),
            api,
            json,
            pending: Mutex::new(Vec::new()),
        }
    }

    /// Run one command and return what should be printed.
    pub async fn run(&self, command: Command) -> Result<String> {
        let restored = if command.checks_session() {
            self.auth.restore_session().await
        } else {
            None
        };
        if let Some(profile) = &restored {
            tracing::debug!(username = %profile.username, "Using stored session");
        }

        match command {
            Command::Health => {
                let health = self.api.health().await?;
                if !health.is_ok() {
                    bail!("Backend reports status '{}'", health.status);
                }
                self.render(&health, || {
                    format!(
                        "{} ({})",
                        health.status,
                        health.service.as_deref().unwrap_or("unknown service")
                    )
                })
            }
            Command::Signup(args) => {
                let username = args.username.clone();
                self.auth.signup(&args.into()).await?;
                Ok(format!("Signed up and logged in as {}", username))
            }
            Command::Login(args) => {
                let username = args.username.clone();
                self.auth.login(&args.into()).await?;
                Ok(format!("Logged in as {}", username))
            }
            Command::Logout => {
                self.auth.logout();
                Ok("Logged out".to_string())
            }
            Command::Whoami => {
                let Some(profile) = restored else {
                    return Ok("Not logged in".to_string());
                };
                self.render(&profile, || {
                    let role = if profile.is_admin { " (admin)" } else { "" };
                    format!("{}{}", profile.username, role)
                })
            }
            Command::Places => {
                let places = self.places.known_places().await?;
                self.render(&places, || {
                    if places.is_empty() {
                        return "No places looked up yet".to_string();
                    }
                    places
                        .iter()
                        .map(|p| format!("{}  ({:.2}, {:.2})  hits: {}", p.name, p.lat, p.lon, p.hits))
                        .collect::<Vec<_>>()
                        .join("\n")
                })
            }
            Command::Geocode { query, select } => self.geocode(&query, select).await,
            Command::Season { place } => {
                let Some(now) = self.crops.current_season(&place).await? else {
                    bail!("Season lookup was superseded");
                };
                self.render(&now, || {
                    let name = now.state.as_deref().unwrap_or(&place);
                    match now.month {
                        Some(month) => format!("{}: {} (month {})", name, now.season, month),
                        None => format!("{}: {}", name, now.season),
                    }
                })
            }
            Command::Crops { place, season } => {
                let season = Season::parse_optional(&season)?;
                let Some(result) = self.crops.live_crops(&place, season.clone()).await? else {
                    bail!("Crop lookup was superseded");
                };
                self.track(
                    "live_crops_viewed",
                    serde_json::json!({
                        "state": result.state,
                        "season": season.as_ref().map(Season::as_str),
                        "crops": result.crops.len(),
                    }),
                );
                self.render(&result, || format_crops(&result))
            }
            Command::Event { name, meta } => {
                let meta = meta
                    .map(|raw| serde_json::from_str::<Value>(&raw))
                    .transpose()
                    .context("--meta must be valid JSON")?;
                match self.analytics.record(&name, meta).await {
                    Some(ack) => Ok(match ack.id {
                        Some(id) => format!("Event recorded (id {})", id),
                        None => "Event recorded".to_string(),
                    }),
                    None => Ok("Event not recorded".to_string()),
                }
            }
            Command::Rules { command } => self.rules(command).await,
        }
    }

    async fn geocode(&self, query: &str, select: Option<usize>) -> Result<String> {
        let Some(matches) = self.places.search(query).await? else {
            bail!("Search was superseded");
        };

        if let Some(index) = select {
            let place = self.places.select(index)?;
            self.track("place_selected", serde_json::json!({ "name": place.name }));
            return self.render(&place, || {
                format!(
                    "Selected {} ({:.4}, {:.4})",
                    place.name, place.latitude, place.longitude
                )
            });
        }

        self.render(&matches, || {
            if matches.is_empty() {
                return format!("No places found for '{}'", query);
            }
            matches
                .iter()
                .enumerate()
                .map(|(i, m)| format!("[{}] {}  ({:.4}, {:.4})", i, m.name, m.latitude, m.longitude))
                .collect::<Vec<_>>()
                .join("\n")
        })
    }

    async fn rules(&self, command: RuleCommand) -> Result<String> {
        match command {
            RuleCommand::List => {
                let rules = self.rules.list().await?;
                self.render(&rules, || {
                    if rules.is_empty() {
                        return "No crop rules".to_string();
                    }
                    rules
                        .iter()
                        .map(|r| {
                            let seasons: Vec<&str> = r.seasons.iter().map(Season::as_str).collect();
                            format!(
                                "#{} {} [{}] temp {}..{} C, rain {}..{} mm{}",
                                r.id,
                                r.name,
                                seasons.join(", "),
                                r.temp_min,
                                r.temp_max,
                                r.rain_min,
                                r.rain_max,
                                if r.active { "" } else { " (inactive)" }
                            )
                        })
                        .collect::<Vec<_>>()
                        .join("\n")
                })
            }
            RuleCommand::Create(args) => {
                let rule = self.rules.create(&args.into()).await?;
                self.render(&rule, || format!("Created rule #{} {}", rule.id, rule.name))
            }
            RuleCommand::Update { id, rule } => {
                let rule = self.rules.update(id, &rule.into()).await?;
                self.render(&rule, || format!("Updated rule #{} {}", rule.id, rule.name))
            }
            RuleCommand::Delete { id } => {
                self.rules.delete(id).await?;
                Ok(format!("Deleted rule #{}", id))
            }
        }
    }

    fn render<T: Serialize>(&self, value: &T, text: impl FnOnce() -> String) -> Result<String> {
        if self.json {
            Ok(serde_json::to_string_pretty(value)?)
        } else {
            Ok(text())
        }
    }

    fn track(&self, event_name: &str, meta: Value) {
        let handle = self.analytics.track(event_name, Some(meta));
        if let Ok(mut pending) = self.pending.lock() {
            pending.push(handle);
        }
    }

    /// Give detached analytics a bounded chance to finish before exit.
    ///
    /// All pending events share one deadline, however many there are.
    pub async fn flush(&self) {
        let handles: Vec<_> = match self.pending.lock() {
            Ok(mut pending) => pending.drain(..).collect(),
            Err(_) => return,
        };
        let deadline = tokio::time::Instant::now() + ANALYTICS_FLUSH_TIMEOUT;
        for handle in handles {
            if tokio::time::timeout_at(deadline, handle).await.is_err() {
                tracing::debug!("Analytics still pending at exit, dropping");
            }
        }
    }
}

fn format_crops(result: &LiveCropResult) -> String {
    let mut lines = vec![format!(
        "{} | season: {} | avg temp: {} | rain: {}",
        result.state,
        result.season.as_ref().map(Season::as_str).unwrap_or("any"),
        result
            .metrics
            .avg_temp_c
            .map(|t| format!("{:.1} C", t))
            .unwrap_or_else(|| "n/a".to_string()),
        result
            .metrics
            .total_rain_mm
            .map(|r| format!("{:.1} mm", r))
            .unwrap_or_else(|| "n/a".to_string()),
    )];

    match result.top_crop() {
        Some(top) => lines.push(format!("Best: {} ({})", top.crop, top.tag)),
        None => lines.push("No crops matched".to_string()),
    }
    let recommended: Vec<&str> = result.recommended().map(|c| c.crop.as_str()).collect();
    for crop in &result.crops {
        let marker = if recommended.contains(&crop.crop.as_str()) { "*" } else { " " };
        lines.push(format!(
            "{} {:<12} {:>5.1}  {}",
            marker, crop.crop, crop.score, crop.tag
        ));
    }
    lines.join("\n")
}
