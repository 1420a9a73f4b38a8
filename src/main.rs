//! Command-line host for the Attune client core.
//!
//! ```text
//! attune-client status
//! attune-client guest
//! attune-client register <name> <email> <password>
//! attune-client login <email> <password>
//! attune-client checkin <focus> <energy> <mood> <calm>
//! attune-client dashboard
//! attune-client export
//! attune-client logout
//! ```
//!
//! The auth session is saved next to the local snapshot, so a sign-in
//! carries over to later commands until it is revoked or its refresh fails.

use std::error::Error;
use std::sync::Arc;

use attune_client::adapters::{
    FileIdentityStore, FileSeriesStore, HttpBackendConfig, HttpMetricsBackend,
    SupabaseAuthProvider, SupabaseConfig,
};
use attune_client::application::{
    AccountDataHandler, DashboardAggregator, DashboardFeed, IdentityReconciler,
};
use attune_client::config::AppConfig;
use attune_client::domain::foundation::LoginOutcome;
use attune_client::domain::user::TodayFeeling;
use attune_client::ports::{AuthSessionProvider, MetricsBackend};

type AnyResult<T> = Result<T, Box<dyn Error>>;

#[tokio::main]
async fn main() -> AnyResult<()> {
    let config = AppConfig::load()?;
    config.validate()?;

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&config.log_level)),
        )
        .init();

    let auth: Arc<dyn AuthSessionProvider> = Arc::new(SupabaseAuthProvider::new(
        SupabaseConfig::new(config.auth.url.clone(), config.auth.anon_key.clone())
            .with_timeout(config.auth.request_timeout())
            .with_session_file(config.storage.session_path()),
    )?);
    let backend: Arc<dyn MetricsBackend> = Arc::new(HttpMetricsBackend::new(
        HttpBackendConfig::new(config.backend.base_url.clone())
            .with_timeout(config.backend.request_timeout()),
        auth.clone(),
    )?);
    let series = Arc::new(FileSeriesStore::new(config.storage.series_path()));

    let identity = Arc::new(IdentityReconciler::new(
        auth,
        backend.clone(),
        Arc::new(FileIdentityStore::new(config.storage.identity_path())),
        series.clone(),
    ));
    let _listener = identity.start().await;

    let args: Vec<String> = std::env::args().skip(1).collect();
    let args: Vec<&str> = args.iter().map(String::as_str).collect();

    match args.as_slice() {
        [] | ["status"] => print_user(&identity),
        ["guest"] => {
            identity.login_as_guest().await?;
            print_user(&identity);
        }
        ["register", name, email, password] => {
            identity.register(name, email, password).await?;
            print_user(&identity);
        }
        ["login", email, password] => match identity.login(email, password).await? {
            LoginOutcome::Ok => print_user(&identity),
            LoginOutcome::NotFound => println!("No account for {}", email),
            LoginOutcome::WrongPassword => println!("Wrong password"),
        },
        ["checkin", focus, energy, mood, calm] => {
            let feeling = TodayFeeling::new(focus.parse()?, energy.parse()?, mood.parse()?, calm.parse()?)?;
            identity.update_today_feeling(feeling);
            println!("Recorded mood score {}", feeling.mood_score());
        }
        ["dashboard"] => {
            let aggregator = Arc::new(DashboardAggregator::new(backend, series));
            let feed = DashboardFeed::new(aggregator, identity.user().map(|u| u.id));
            feed.refresh().await;
            match feed.snapshot().data {
                Some(view) => println!("{}", serde_json::to_string_pretty(&view)?),
                None => println!("No dashboard data yet"),
            }
        }
        ["export"] => {
            let Some(user) = identity.user() else {
                println!("Not signed in");
                return Ok(());
            };
            let account = AccountDataHandler::new(backend, identity.clone());
            println!("{}", serde_json::to_string_pretty(&account.export(&user.id).await?)?);
        }
        ["logout"] => {
            identity.logout().await;
            println!("Signed out");
        }
        _ => {
            eprintln!("Unknown command: {}", args.join(" "));
            std::process::exit(2);
        }
    }

    Ok(())
}

fn print_user(identity: &IdentityReconciler) {
    match identity.user() {
        Some(user) => println!(
            "{} ({}){}",
            user.name,
            user.id,
            if user.is_guest { " [guest]" } else { "" }
        ),
        None => println!("Not signed in"),
    }
}
