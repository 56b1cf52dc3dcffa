use clap::{Parser, Subcommand};
use signup::{
    client::{
        login::{LoginForm, LoginPage},
        signup::{Blocked, SignupForm, SignupPage, SubmitOutcome},
        ApiClient, FieldErrors,
    },
    config::ClientConfig,
    logging,
};

#[derive(Parser)]
#[command(name = "signup-cli")]
#[command(about = "Create an account on a signup server", long_about = None)]
struct Cli {
    /// Server base URL (defaults to API_URL, then http://localhost:3001)
    #[arg(long, global = true)]
    api_url: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Register a new account
    Register {
        #[arg(short, long)]
        email: String,

        #[arg(short, long)]
        password: String,

        /// Must match --password
        #[arg(short, long)]
        confirm_password: String,
    },

    /// Run the login form (no server call is made)
    Login {
        #[arg(short, long)]
        email: String,

        #[arg(short, long)]
        password: String,
    },
}

fn print_field_errors(errors: &FieldErrors) {
    for (field, message) in errors.iter() {
        eprintln!("  {field}: {message}");
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    logging::init("signup=error");

    let cli = Cli::parse();

    match cli.command {
        Commands::Register {
            email,
            password,
            confirm_password,
        } => {
            let config = match cli.api_url {
                Some(api_url) => ClientConfig { api_url },
                None => ClientConfig::from_env(),
            };
            let api = ApiClient::from_config(&config);
            let mut page =
                SignupPage::with_form(SignupForm::new(email, password, confirm_password));

            match page.submit(&api).await {
                SubmitOutcome::Registered(res) => {
                    println!("{}", res.message);
                    println!("  id:        {}", res.user.id);
                    println!("  email:     {}", res.user.email);
                    println!("  createdAt: {}", res.user.created_at);
                }
                SubmitOutcome::Failed(message) => anyhow::bail!(message),
                SubmitOutcome::Blocked(Blocked::Invalid(errors)) => {
                    eprintln!("Please fix the following:");
                    print_field_errors(&errors);
                    std::process::exit(2);
                }
                SubmitOutcome::Blocked(Blocked::Busy) => {
                    anyhow::bail!("a submission is already in flight")
                }
            }
        }
        Commands::Login { email, password } => {
            let mut page = LoginPage::with_form(LoginForm::new(email, password));
            eprintln!("Logging in...");
            if let Err(errors) = page.submit().await {
                eprintln!("Please fix the following:");
                print_field_errors(&errors);
                std::process::exit(2);
            }
            if let Some(message) = page.success_message() {
                println!("{message}");
            }
        }
    }

    Ok(())
}
