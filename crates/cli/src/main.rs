//! CrewLab CLI - Drive the storefront cart from a terminal.
//!
//! # Usage
//!
//! ```bash
//! # Add two units of a product
//! crewlab cart add Remera 5000 --quantity 2
//!
//! # Adjust or delete a line (positions as shown by `cart show`)
//! crewlab cart inc 1
//! crewlab cart dec 1
//! crewlab cart remove 1
//!
//! # Show the cart with express shipping to Córdoba
//! crewlab cart show --shipping express --province Córdoba
//!
//! # Submit the checkout form
//! crewlab checkout --name Ana --surname Pérez --dni 30123456 \
//!     --street "Av. Colón" --number 1234 --postal-code 5000 \
//!     --city Córdoba --province Córdoba --category femenino
//! ```
//!
//! # Commands
//!
//! - `cart` - Add, adjust, remove, clear and show cart lines
//! - `checkout` - Validate the checkout form against the current cart
//!
//! The cart is stored under `CREWLAB_DATA_DIR`; see [`CartConfig`] for the
//! other environment variables.

#![cfg_attr(not(test), forbid(unsafe_code))]

use clap::{Args, Parser, Subcommand};
use crewlab_cart::{CartConfig, CartSession, CheckoutFields, FieldKind, ShippingMethod};
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

mod commands;

#[derive(Parser)]
#[command(name = "crewlab")]
#[command(author, version, about = "CrewLab cart tools")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Manage cart lines
    Cart {
        #[command(subcommand)]
        action: CartAction,
    },
    /// Validate the checkout form and place the order
    Checkout(CheckoutArgs),
}

#[derive(Subcommand)]
enum CartAction {
    /// Add a product (merges with an existing line of the same name)
    Add {
        /// Product name
        name: String,

        /// Unit price in pesos
        price: f64,

        /// Units to add
        #[arg(short, long, default_value_t = 1)]
        quantity: u32,
    },
    /// Add one unit to a line
    Inc {
        /// Line position (1-based)
        position: usize,
    },
    /// Remove one unit from a line (never below one)
    Dec {
        /// Line position (1-based)
        position: usize,
    },
    /// Delete a line
    Remove {
        /// Line position (1-based)
        position: usize,
    },
    /// Empty the cart
    Clear,
    /// Show the cart and order summary
    Show {
        /// Shipping method (`local`, `domicilio`, `express`)
        #[arg(short, long)]
        shipping: Option<ShippingMethod>,

        /// Province used for shipping eligibility
        #[arg(short, long)]
        province: Option<String>,
    },
}

#[derive(Args)]
struct CheckoutArgs {
    /// Shipping method (`local`, `domicilio`, `express`)
    #[arg(short, long, default_value = "domicilio")]
    shipping: ShippingMethod,

    #[arg(long, default_value = "")]
    name: String,

    #[arg(long, default_value = "")]
    surname: String,

    /// National ID (7 to 10 digits)
    #[arg(long, default_value = "")]
    dni: String,

    #[arg(long, default_value = "")]
    street: String,

    /// Street number (positive)
    #[arg(long, default_value = "")]
    number: String,

    #[arg(long, default_value = "")]
    postal_code: String,

    #[arg(long, default_value = "")]
    city: String,

    #[arg(long, default_value = "")]
    province: String,

    /// Garment category
    #[arg(long, default_value = "")]
    category: String,
}

impl CheckoutArgs {
    fn fields(self) -> CheckoutFields {
        CheckoutFields::new()
            .with(FieldKind::Name, self.name)
            .with(FieldKind::Surname, self.surname)
            .with(FieldKind::NationalId, self.dni)
            .with(FieldKind::Street, self.street)
            .with(FieldKind::StreetNumber, self.number)
            .with(FieldKind::PostalCode, self.postal_code)
            .with(FieldKind::City, self.city)
            .with(FieldKind::Province, self.province)
            .with(FieldKind::Category, self.category)
    }
}

fn main() {
    // Defaults to info level for our crates if RUST_LOG is not set.
    // Logs go to stderr so stdout carries only the cart output.
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "crewlab_cart=info,crewlab_cli=info".into());

    tracing_subscriber::registry()
        .with(env_filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();

    let result: Result<(), Box<dyn std::error::Error>> = run(cli);

    if let Err(e) = result {
        tracing::error!("Command failed: {e}");
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    let config = CartConfig::from_env()?;
    let mut session = CartSession::from_config(config.file_storage(), &config);
    let screen = commands::attach_screen(&mut session);

    let output = match cli.command {
        Commands::Cart { action } => match action {
            CartAction::Add {
                name,
                price,
                quantity,
            } => commands::cart::add(&mut session, &screen, &name, price, quantity)?,
            CartAction::Inc { position } => {
                commands::cart::increment(&mut session, &screen, position)?
            }
            CartAction::Dec { position } => {
                commands::cart::decrement(&mut session, &screen, position)?
            }
            CartAction::Remove { position } => {
                commands::cart::remove(&mut session, &screen, position)?
            }
            CartAction::Clear => commands::cart::clear(&mut session, &screen),
            CartAction::Show { shipping, province } => {
                commands::cart::show(&mut session, &screen, shipping, province)
            }
        },
        Commands::Checkout(args) => {
            let shipping = args.shipping;
            commands::checkout::submit(&mut session, &screen, shipping, args.fields())?
        }
    };

    commands::print_lines(&output);
    Ok(())
}
