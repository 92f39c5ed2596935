use clap::{Parser, Subcommand};
use sea_orm::Database;
use tracing::info;

use recipe_auth_types::identity::TokenSecret;
use recipe_core::tracing::init_tracing;

use recipe_service::config::RecipeConfig;
use recipe_service::router::build_router;
use recipe_service::state::AppState;
use recipe_service::usecase::user::{CreateSuperuserUseCase, CreateUserInput};

#[derive(Parser, Debug)]
#[command(author, version, about)]
struct Args {
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Run the HTTP server (default).
    Serve,
    /// Create an account with staff and superuser flags.
    CreateSuperuser {
        #[arg(long)]
        email: String,
        #[arg(long)]
        password: String,
        #[arg(long, default_value = "")]
        name: String,
    },
}

#[tokio::main]
async fn main() {
    init_tracing();

    let args = Args::parse();
    let config = RecipeConfig::from_env();

    let db = Database::connect(&config.database_url)
        .await
        .expect("failed to connect to database");

    let state = AppState {
        db,
        token_secret: TokenSecret::new(config.jwt_secret.as_str()),
        token_ttl_secs: config.token_ttl_secs,
        media_root: config.media_root.clone(),
    };

    match args.command.unwrap_or(Command::Serve) {
        Command::Serve => serve(state, config.recipe_port).await,
        Command::CreateSuperuser {
            email,
            password,
            name,
        } => {
            let usecase = CreateSuperuserUseCase {
                repo: state.user_repo(),
            };
            match usecase
                .execute(CreateUserInput {
                    email,
                    password,
                    name,
                })
                .await
            {
                Ok(user) => info!(user_id = %user.id, email = %user.email, "superuser created"),
                Err(e) => {
                    tracing::error!(error = %e, "failed to create superuser");
                    std::process::exit(1);
                }
            }
        }
    }
}

async fn serve(state: AppState, port: u16) {
    let router = build_router(state);
    let http_addr = format!("0.0.0.0:{port}");
    let listener = tokio::net::TcpListener::bind(&http_addr)
        .await
        .expect("failed to bind");

    info!("recipe service listening on {http_addr}");
    axum::serve(listener, router).await.expect("server error");
}
