//! Uruti CLI binary entry point.

use reqwest::Method;
use uruti::cli::{AuthCommands, Cli, Commands};
use uruti::client::ApiClient;

#[tokio::main]
async fn main() {
    uruti::cli::init_logging();
    let cli = Cli::parse_args();

    if let Err(e) = run(cli).await {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    let client = ApiClient::from_env()?;

    match cli.command {
        Commands::Auth(auth_args) => match auth_args.command {
            AuthCommands::Login(args) => uruti::cli::auth::handle_login(client, args).await,
            AuthCommands::Register(args) => uruti::cli::auth::handle_register(client, args).await,
            AuthCommands::Demo => uruti::cli::auth::handle_demo(client).await,
            AuthCommands::Status => uruti::cli::auth::handle_status(client).await,
            AuthCommands::Logout => uruti::cli::auth::handle_logout(client).await,
        },
        Commands::Company(args) => uruti::cli::request::handle_company(client, args.command),
        Commands::Get(args) => {
            uruti::cli::request::handle_call(client, Method::GET, &args.path, None, args.raw).await
        }
        Commands::Delete(args) => {
            uruti::cli::request::handle_call(client, Method::DELETE, &args.path, None, args.raw)
                .await
        }
        Commands::Post(args) => {
            uruti::cli::request::handle_call(
                client,
                Method::POST,
                &args.path,
                args.data.as_deref(),
                args.raw,
            )
            .await
        }
        Commands::Put(args) => {
            uruti::cli::request::handle_call(
                client,
                Method::PUT,
                &args.path,
                args.data.as_deref(),
                args.raw,
            )
            .await
        }
        Commands::Patch(args) => {
            uruti::cli::request::handle_call(
                client,
                Method::PATCH,
                &args.path,
                args.data.as_deref(),
                args.raw,
            )
            .await
        }
    }
}
