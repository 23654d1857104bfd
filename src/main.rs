mod alerts;
mod api;
mod catalog;
mod config;
mod mail;
mod matcher;
mod models;
mod session;
mod sources;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tracing::{info, warn, Level};

use api::{AddWatchlistRequest, ApiClient};
use config::AppConfig;
use mail::Mailer;
use matcher::MatchResult;
use models::{Event, FavoriteType, MatchedEvent};
use session::SessionStore;
use sources::types::SearchParams;
use sources::{EventSource, SeatGeekSource, TicketmasterSource};

#[derive(Parser)]
#[command(name = "ticket-scout", version)]
#[command(about = "Compare ticket prices across platforms and watch for drops")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Create an account on the backend
    Register {
        email: String,
        password: String,
        #[arg(long)]
        name: Option<String>,
    },
    /// Log in and store the bearer token locally
    Login { email: String, password: String },
    /// Clear the stored session
    Logout,
    /// Show the logged-in account
    Whoami,
    /// Search events via the backend's unified search
    Search {
        city: String,
        keyword: Option<String>,
        #[arg(long)]
        from: Option<String>,
        #[arg(long)]
        to: Option<String>,
    },
    /// Fetch both platforms and pair listings for the same event
    Compare {
        city: String,
        keyword: Option<String>,
        #[arg(long)]
        from: Option<String>,
        #[arg(long)]
        to: Option<String>,
        /// Print the full match result as JSON
        #[arg(long)]
        json: bool,
    },
    /// Manage tracked events
    Watchlist {
        #[command(subcommand)]
        command: WatchlistCommand,
    },
    /// Price history, trend and buy advice for an event
    Prices { event_id: String },
    /// Manage saved teams, artists and venues
    Favorites {
        #[command(subcommand)]
        command: FavoritesCommand,
    },
    /// List upcoming events without an account (public feed)
    Browse,
    /// Subscribe an address to the newsletter
    Subscribe { email: String },
    /// Check the watchlist and email price-drop alerts
    Alerts,
    /// Look up a venue in the reference catalog
    Venue { query: String },
    /// Backend admin surface (needs ADMIN_API_KEY)
    Admin {
        #[command(subcommand)]
        command: AdminCommand,
    },
}

#[derive(Subcommand)]
enum WatchlistCommand {
    /// List tracked events
    List {
        /// Include server-computed current prices and trends
        #[arg(long)]
        with_prices: bool,
    },
    /// Track an event, optionally with a target price
    Add {
        event_id: String,
        name: String,
        date: String,
        #[arg(long)]
        venue: Option<String>,
        #[arg(long)]
        city: Option<String>,
        #[arg(long)]
        target: Option<f64>,
    },
    /// Stop tracking an event
    Remove { id: i64 },
}

#[derive(Subcommand)]
enum FavoritesCommand {
    List,
    /// Save a team, artist or venue
    Add {
        /// team | artist | venue
        kind: String,
        name: String,
    },
    Remove { id: i64 },
    /// Upcoming events matching saved favorites
    Events,
}

#[derive(Subcommand)]
enum AdminCommand {
    /// Operational counters
    Stats,
    /// Trigger the onboarding drip campaign run
    Drip,
}

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_max_level(Level::INFO)
        .init();

    let cli = Cli::parse();
    let config = AppConfig::from_env()?;
    let session = SessionStore::load();

    // Errors surface as a single user-facing message, never a backtrace
    if let Err(err) = run(cli.command, &config, &session).await {
        eprintln!("Error: {err:#}");
        std::process::exit(1);
    }
    Ok(())
}

async fn run(command: Commands, config: &AppConfig, session: &SessionStore) -> Result<()> {
    let api = ApiClient::new(&config.api_base_url)?
        .with_token(session.token())
        .with_admin_key(config.admin_key.clone());

    match command {
        Commands::Register {
            email,
            password,
            name,
        } => {
            let auth = api.register(&email, &password, name.as_deref()).await?;
            session.login(auth.token, auth.user.email.clone())?;
            println!("Registered and logged in as {}", auth.user.email);

            if let Some(smtp) = &config.smtp {
                let display_name = auth.user.name.as_deref().unwrap_or(&auth.user.email);
                match Mailer::from_config(smtp)
                    .and_then(|mailer| mailer.send_welcome(&auth.user.email, display_name))
                {
                    Ok(()) => info!("Welcome email sent to {}", auth.user.email),
                    Err(err) => warn!("Welcome email not sent: {err:#}"),
                }
            }
        }

        Commands::Login { email, password } => {
            let auth = api.login(&email, &password).await?;
            session.login(auth.token, auth.user.email.clone())?;
            println!("Logged in as {}", auth.user.email);
        }

        Commands::Logout => {
            session.logout()?;
            println!("Logged out");
        }

        Commands::Whoami => {
            let user = api.me().await?;
            match user.name {
                Some(name) => println!("{} <{}>", name, user.email),
                None => println!("{}", user.email),
            }
        }

        Commands::Search {
            city,
            keyword,
            from,
            to,
        } => {
            let params = SearchParams {
                city,
                keyword,
                start_date: from,
                end_date: to,
            };
            let events = api.search_events(&params).await?;
            println!("Found {} events\n", events.len());
            print_events(&events);
        }

        Commands::Compare {
            city,
            keyword,
            from,
            to,
            json,
        } => {
            let params = SearchParams {
                city,
                keyword,
                start_date: from,
                end_date: to,
            };
            let result = compare(&api, config, &params).await?;
            if json {
                println!("{}", serde_json::to_string_pretty(&result)?);
            } else {
                print_match_result(&result);
            }
        }

        Commands::Watchlist { command } => match command {
            WatchlistCommand::List { with_prices } => {
                let items = if with_prices {
                    api.watchlist_with_prices().await?
                } else {
                    api.watchlist().await?
                };
                if items.is_empty() {
                    println!("Watchlist is empty");
                }
                for item in items {
                    let target = item
                        .target_price
                        .map(|t| format!(" (target ${t:.2})"))
                        .unwrap_or_default();
                    let current = item
                        .current_price
                        .map(|c| format!(" - now ${c:.2}"))
                        .unwrap_or_default();
                    let trend = item
                        .price_trend
                        .map(|t| format!(" [{t}]"))
                        .unwrap_or_default();
                    println!(
                        "{}. {} on {}{}{}{}",
                        item.id, item.event_name, item.event_date, target, current, trend
                    );
                }
            }
            WatchlistCommand::Add {
                event_id,
                name,
                date,
                venue,
                city,
                target,
            } => {
                let item = api
                    .add_to_watchlist(&AddWatchlistRequest {
                        event_id,
                        event_name: name,
                        event_date: date,
                        venue,
                        city,
                        target_price: target,
                    })
                    .await?;
                println!("Tracking {} (id {})", item.event_name, item.id);
            }
            WatchlistCommand::Remove { id } => {
                api.remove_from_watchlist(id).await?;
                println!("Removed watchlist item {id}");
            }
        },

        Commands::Prices { event_id } => {
            // Independent GETs, batched like the dashboard does
            let (history, trend, advice) = tokio::join!(
                api.price_history(&event_id),
                api.price_trend(&event_id),
                api.recommendation(&event_id),
            );
            let history = history?;
            let trend = trend?;
            let advice = advice?;

            println!("Price history ({} points):", history.len());
            for point in &history {
                println!("  {}  ${:.2}", point.recorded_at, point.min_price);
            }
            let change = trend
                .change_percent
                .map(|pct| format!(" ({pct:+.1}%)"))
                .unwrap_or_default();
            println!("Trend: {}{}", trend.direction, change);
            println!(
                "Advice: {} (confidence {:.0}%)",
                advice.action,
                advice.confidence * 100.0
            );
            if let Some(reason) = advice.reason {
                println!("  {reason}");
            }
        }

        Commands::Favorites { command } => match command {
            FavoritesCommand::List => {
                let favorites = api.favorites().await?;
                if favorites.is_empty() {
                    println!("No favorites saved");
                }
                for favorite in favorites {
                    println!(
                        "{}. {:?} - {}",
                        favorite.id, favorite.favorite_type, favorite.favorite_name
                    );
                }
            }
            FavoritesCommand::Add { kind, name } => {
                let favorite_type = parse_favorite_type(&kind)?;
                let favorite = api.add_favorite(favorite_type, &name).await?;
                println!("Saved {} (id {})", favorite.favorite_name, favorite.id);
            }
            FavoritesCommand::Remove { id } => {
                api.remove_favorite(id).await?;
                println!("Removed favorite {id}");
            }
            FavoritesCommand::Events => {
                let events = api.favorite_events().await?;
                println!("{} upcoming events match your favorites\n", events.len());
                print_events(&events);
            }
        },

        Commands::Browse => {
            let events = api.public_events().await?;
            println!("{} upcoming events\n", events.len());
            print_events(&events);
        }

        Commands::Subscribe { email } => {
            api.subscribe_newsletter(&email).await?;
            println!("Subscribed {email}");
        }

        Commands::Alerts => {
            let smtp = config
                .smtp
                .as_ref()
                .context("SMTP not configured - set SMTP_HOST/PORT/USER/PASS")?;
            let recipient = config
                .alert_recipient
                .clone()
                .or_else(|| session.email())
                .context("No alert recipient - set ALERT_EMAIL or log in")?;
            let mailer = Mailer::from_config(smtp)?;
            let sent = alerts::run_alerts(&api, &mailer, &recipient).await?;
            println!("Sent {sent} price-drop alerts");
        }

        Commands::Venue { query } => match catalog::find_venue(&query) {
            Some(venue) => println!(
                "{} - {}, {} (capacity {})",
                venue.name, venue.city, venue.state, venue.capacity
            ),
            None => {
                // Maybe the query was a city, not a venue
                let in_city = catalog::venues_in_city(&query);
                if in_city.is_empty() {
                    println!("No venue in the catalog matches \"{query}\"");
                    println!("Known cities: {}", catalog::CITIES.join(", "));
                } else {
                    println!("Venues in {query}:");
                    for venue in in_city {
                        println!("  {} (capacity {})", venue.name, venue.capacity);
                    }
                }
            }
        },

        Commands::Admin { command } => match command {
            AdminCommand::Stats => {
                let stats = api.admin_stats().await?;
                println!("Users:           {}", stats.total_users);
                println!("Watchlist items: {}", stats.total_watchlist_items);
                println!("Subscribers:     {}", stats.total_subscribers);
                if let Some(alerts_today) = stats.alerts_sent_today {
                    println!("Alerts today:    {alerts_today}");
                }
            }
            AdminCommand::Drip => {
                let run = api.trigger_drip().await?;
                println!("Drip campaign run queued {} emails", run.emails_sent);
            }
        },
    }

    Ok(())
}

/// Fetch both per-platform lists, directly when platform credentials are
/// configured and via the backend otherwise, then pair them client-side.
async fn compare(api: &ApiClient, config: &AppConfig, params: &SearchParams) -> Result<MatchResult> {
    let (tm_events, sg_events) = if config.has_direct_sources() {
        let tm_key = config.ticketmaster_api_key.as_deref().unwrap_or_default();
        let sg_id = config.seatgeek_client_id.as_deref().unwrap_or_default();
        let ticketmaster = TicketmasterSource::new(tm_key)?;
        let seatgeek = SeatGeekSource::new(sg_id)?;

        info!("Fetching {} and {} directly", ticketmaster.source_name(), seatgeek.source_name());
        let (tm, sg) = tokio::join!(ticketmaster.search(params), seatgeek.search(params));
        (tm?, sg?)
    } else {
        info!("Fetching per-platform lists via the backend");
        let compared = api.compare_events(params).await?;
        (compared.ticketmaster, compared.seatgeek)
    };

    Ok(matcher::match_events(&tm_events, &sg_events))
}

fn parse_favorite_type(kind: &str) -> Result<FavoriteType> {
    match kind.to_lowercase().as_str() {
        "team" => Ok(FavoriteType::Team),
        "artist" => Ok(FavoriteType::Artist),
        "venue" => Ok(FavoriteType::Venue),
        other => anyhow::bail!("Unknown favorite type \"{other}\" (team, artist or venue)"),
    }
}

fn print_events(events: &[Event]) {
    for (i, event) in events.iter().enumerate() {
        println!("{}. {} ({})", i + 1, event.name, event.display_price());
        println!("   {} at {}, {}", event.date, event.venue, event.city);
        if !event.url.is_empty() {
            println!("   {}", event.url);
        }
        println!();
    }
}

fn print_match_result(result: &MatchResult) {
    println!("{} matched events\n", result.matched.len());
    for (i, matched) in result.matched.iter().enumerate() {
        print_matched(i + 1, matched);
    }

    if !result.unmatched_ticketmaster.is_empty() {
        println!("Only on Ticketmaster:");
        for event in &result.unmatched_ticketmaster {
            println!("  {} on {} at {}", event.name, event.date, event.venue);
        }
        println!();
    }
    if !result.unmatched_seatgeek.is_empty() {
        println!("Only on SeatGeek:");
        for event in &result.unmatched_seatgeek {
            println!("  {} on {} at {}", event.name, event.date, event.venue);
        }
        println!();
    }
}

fn print_matched(index: usize, matched: &MatchedEvent) {
    let tm = &matched.ticketmaster;
    println!("{}. {} on {} at {}", index, tm.name, tm.date, tm.venue);
    println!("   Ticketmaster: {}", tm.display_price());
    if let Some(sg) = &matched.seatgeek {
        println!("   SeatGeek:     {}", sg.display_price());
    }
    if let (Some(source), Some(savings)) = (matched.best_source, matched.savings) {
        println!("   Best price: {source:?}, save ${savings:.2}");
    }
    println!();
}
