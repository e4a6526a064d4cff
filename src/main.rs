use std::env;
use std::sync::Arc;

use post_manager_client::auth::{HttpIdentityProvider, IdentityProvider, Navigator, SignInForm};
use post_manager_client::post::PostForm;
use post_manager_client::{
    compute_affordances, AuthOutcome, ClientConfig, HttpPostBackend, PostBackend, SessionProvider,
};

/// Routing in the headless client is just a log line; the engine still
/// drives it exactly as a UI shell would.
struct LogNavigator;

impl Navigator for LogNavigator {
    fn push(&self, route: &str) {
        log::info!("navigating to {}", route);
    }

    fn refresh(&self) {
        log::debug!("refreshing session-dependent views");
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    env_logger::init();

    let mut args = env::args().skip(1);
    let (title, description) = match (args.next(), args.next()) {
        (Some(title), Some(description)) => (title, description),
        _ => {
            eprintln!("usage: post-manager-client <title> <description> [image-path]");
            std::process::exit(2);
        }
    };
    let image_path = args.next();

    let config = ClientConfig::from_env()?;
    let email = env::var("POST_MANAGER_EMAIL")?;
    let password = env::var("POST_MANAGER_PASSWORD")?;

    let client = config.http_client();
    let provider: Arc<dyn IdentityProvider> = Arc::new(HttpIdentityProvider::new(
        client.clone(),
        config.base_url.clone(),
    ));
    let backend: Arc<dyn PostBackend> =
        Arc::new(HttpPostBackend::new(client, config.base_url.clone()));
    let sessions = Arc::new(SessionProvider::new(provider.clone()));

    let mut sign_in = SignInForm::new(provider, sessions.clone(), Arc::new(LogNavigator));
    sign_in.set_email(email);
    sign_in.set_password(password);
    match sign_in.authenticate().await {
        Ok(AuthOutcome::SignedIn(session)) => {
            log::info!("signed in as {}", session.user.email);
        }
        Ok(AuthOutcome::SessionPending) => {
            anyhow::bail!("sign-in accepted but no session is visible yet; try again");
        }
        Err(e) => {
            anyhow::bail!(
                "{}",
                sign_in.banner().map(str::to_string).unwrap_or_else(|| e.to_string())
            );
        }
    }

    let current = sessions.current();
    let affordances = compute_affordances(current.as_ref());
    if !affordances.can_create {
        anyhow::bail!("the current session does not allow creating posts");
    }

    let mut form = PostForm::create(backend);
    form.set_title(title);
    form.set_description(description);
    if let Some(path) = image_path {
        form.select_image(&path).await?;
    }

    match form.submit().await {
        Ok(post) => {
            println!("created post {} ({})", post.id, post.title);
            Ok(())
        }
        Err(e) => {
            for (field, message) in form.errors().iter() {
                eprintln!("{}: {}", field.as_str(), message);
            }
            if let Some(banner) = form.banner() {
                eprintln!("{}", banner);
            }
            Err(e.into())
        }
    }
}
