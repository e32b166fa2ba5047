use std::{io::Write, sync::Arc};

use clap::{Parser, Subcommand};
use harvest::{
    clock::{Clock, SystemClock},
    config::{LoggingConfig, StoreConfig},
    session::{FileStorage, Session},
    storefront::Storefront,
};

mod account;
mod basket;
mod catalog;
mod checkout;
mod orders;

#[derive(Debug, Parser)]
#[command(name = "harvest", about = "Vegetable storefront", long_about = None)]
pub(crate) struct Cli {
    #[command(flatten)]
    pub(crate) logging: LoggingConfig,

    #[command(flatten)]
    store: StoreConfig,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// List catalog products
    Catalog(catalog::CatalogArgs),

    /// Show the demo basket
    Basket,

    /// Show order history
    Orders(orders::OrdersArgs),

    /// Add products to the basket and place an order
    Checkout(checkout::CheckoutArgs),

    /// Sign in with the demo account
    Login(account::LoginArgs),

    /// Create an account and sign in
    Register(account::RegisterArgs),

    /// Sign out
    Logout,

    /// Show the signed-in user
    Whoami,
}

impl Cli {
    /// Load configuration from `.env`, the environment and CLI arguments.
    pub(crate) fn load() -> Result<Self, clap::Error> {
        _ = dotenvy::dotenv();

        Self::try_parse()
    }

    pub(crate) fn run(self, out: &mut impl Write) -> Result<(), String> {
        let clock: Arc<dyn Clock> = Arc::new(SystemClock);
        let store = open_store(&self.store, &clock)?;

        match self.command {
            Commands::Catalog(args) => catalog::run(&store, &args, out),
            Commands::Basket => basket::run(&store, out),
            Commands::Orders(args) => orders::run(&store, &args, out),
            Commands::Checkout(args) => checkout::run(store, args, out),
            Commands::Login(args) => account::login(store, &args, out),
            Commands::Register(args) => account::register(store, args, out),
            Commands::Logout => account::logout(store, out),
            Commands::Whoami => account::whoami(&store, out),
        }
    }
}

type CliStore = Storefront<FileStorage>;

fn open_store(config: &StoreConfig, clock: &Arc<dyn Clock>) -> Result<CliStore, String> {
    let catalog = config
        .load_catalog()
        .map_err(|error| format!("failed to load catalog: {error}"))?;

    let session = Session::restore(FileStorage::new(config.session_dir.clone()), Arc::clone(clock))
        .map_err(|error| format!("failed to restore session: {error}"))?;

    Storefront::new(catalog, session, clock)
        .with_delivery_lead_days(config.delivery_lead_days)
        .with_sample_data()
        .map_err(|error| format!("failed to seed sample data: {error}"))
}

fn write_line(out: &mut impl Write, line: &str) -> Result<(), String> {
    writeln!(out, "{line}").map_err(|error| format!("failed to write output: {error}"))
}
