use anyhow::Result;
use clap::Parser;
use scs_key_client::commands::{self, ClientOptions};
use std::path::PathBuf;

/// scs-key - key service client
///
/// Build and send requests to a key service. Base URLs may use the http,
/// https, hkp (port 11371) or hkps schemes.
///
/// Examples:
///   scs-key resolve /pks/lookup --query 'op=index&search=alice'
///   scs-key --base-url hkps://keys.example.org request GET /pks/lookup -q op=get&search=0xAA
#[derive(Parser, Debug)]
#[command(author, version = env!("SCS_KEY_VERSION"), about)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Key service base URL (defaults to https://keys.sylabs.io)
    #[arg(long = "base-url", value_name = "URL", global = true)]
    pub base_url: Option<String>,

    /// Token sent in the Authorization header (also via SCS_KEY_AUTH_TOKEN)
    #[arg(
        long = "auth-token",
        env = "SCS_KEY_AUTH_TOKEN",
        value_name = "TOKEN",
        hide_env_values = true,
        global = true
    )]
    pub auth_token: Option<String>,

    /// User agent sent with each request
    #[arg(long = "user-agent", value_name = "UA", global = true)]
    pub user_agent: Option<String>,

    /// JSON file with base_url, auth_token and user_agent settings
    #[arg(long = "config", short = 'c', value_name = "FILE", global = true)]
    pub config: Option<PathBuf>,
}

#[derive(clap::Subcommand, Debug)]
enum Commands {
    /// Print the URL a request would be sent to
    Resolve(ResolveArgs),

    /// Send a request and print the response body
    Request(RequestArgs),
}

#[derive(clap::Args, Debug)]
pub struct ResolveArgs {
    /// Path relative to the base URL
    #[arg(value_name = "PATH")]
    pub path: String,

    /// Raw, already encoded query string
    #[arg(long, short = 'q', value_name = "QUERY", default_value = "")]
    pub query: String,
}

#[derive(clap::Args, Debug)]
pub struct RequestArgs {
    /// HTTP method, e.g. GET or POST
    #[arg(value_name = "METHOD")]
    pub method: String,

    /// Path relative to the base URL
    #[arg(value_name = "PATH")]
    pub path: String,

    /// Raw, already encoded query string
    #[arg(long, short = 'q', value_name = "QUERY", default_value = "")]
    pub query: String,

    /// File to send as the request body ('-' for stdin)
    #[arg(long, short = 'd', value_name = "FILE")]
    pub data: Option<PathBuf>,
}

impl Cli {
    fn client_options(&self) -> ClientOptions {
        ClientOptions {
            base_url: self.base_url.clone(),
            auth_token: self.auth_token.clone(),
            user_agent: self.user_agent.clone(),
            config_file: self.config.clone(),
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();
    let cli = Cli::parse();
    let client = cli.client_options().build_client()?;
    let mut stdout = std::io::stdout();

    match &cli.command {
        Commands::Resolve(args) => {
            commands::resolve(&client, &args.path, &args.query, &mut stdout)?
        }
        Commands::Request(args) => {
            commands::request(
                &client,
                &args.method,
                &args.path,
                &args.query,
                args.data.as_deref(),
                &mut stdout,
            )
            .await?
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    #[test]
    fn test_cli_resolve_parsing() {
        let cli = Cli::try_parse_from(["scs-key", "resolve", "/v1/keys", "-q", "a=1"]).unwrap();
        match cli.command {
            Commands::Resolve(args) => {
                assert_eq!(args.path, "/v1/keys");
                assert_eq!(args.query, "a=1");
            }
            _ => panic!("Expected Resolve command"),
        }
        assert_eq!(cli.base_url, None);
    }

    #[test]
    fn test_cli_request_parsing() {
        let cli = Cli::try_parse_from([
            "scs-key",
            "request",
            "POST",
            "/pks/add",
            "--data",
            "key.asc",
            "--base-url",
            "hkp://keys.example.org",
        ])
        .unwrap();
        match &cli.command {
            Commands::Request(args) => {
                assert_eq!(args.method, "POST");
                assert_eq!(args.path, "/pks/add");
                assert_eq!(args.query, "");
                assert_eq!(args.data, Some(PathBuf::from("key.asc")));
            }
            _ => panic!("Expected Request command"),
        }
        assert_eq!(
            cli.client_options().base_url.as_deref(),
            Some("hkp://keys.example.org")
        );
    }

    #[test]
    fn test_cli_global_options_before_subcommand() {
        let cli = Cli::try_parse_from([
            "scs-key",
            "--user-agent",
            "myagent/1.0",
            "--config",
            "/tmp/scs-key.json",
            "resolve",
            "/",
        ])
        .unwrap();
        assert_eq!(cli.user_agent.as_deref(), Some("myagent/1.0"));
        assert_eq!(cli.config, Some(PathBuf::from("/tmp/scs-key.json")));
    }

    #[test]
    fn test_cli_no_subcommand_fails() {
        let result = Cli::try_parse_from(["scs-key", "/v1/keys"]);
        assert!(result.is_err());
    }
}
