//! WMS CLI - warehouse data entry from the command line
//!
//! Usage:
//! ```bash
//! wms init
//! wms --user admin --password admin123 items list
//! wms items add IT004 --description Monitor --quantity 7 --price 199.99
//! wms orders update ORD002 --new-number ORD002-B
//! wms lines add ORD001 --item IT003 --quantity 4
//! wms lines next ORD001
//! wms query "SELECT * FROM order_lines"
//! ```

use anyhow::Result;
use chrono::NaiveDate;
use clap::{Parser, Subcommand, ValueEnum};
use rust_decimal::Decimal;
use std::path::PathBuf;
use tracing::debug;

mod commands;
mod config;
mod db;

use commands::{items, lines, orders, query, users};
use config::AppConfig;

/// WMS - warehouse items, orders and order lines on a local SQLite store
#[derive(Parser)]
#[command(name = "wms")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Database file path (default: $WMS_DB_PATH or data/wms.db)
    #[arg(long, global = true)]
    pub db: Option<PathBuf>,

    /// Login name (default: $WMS_USER)
    #[arg(long, short, global = true)]
    pub user: Option<String>,

    /// Password (default: $WMS_PASSWORD)
    #[arg(long, short, global = true)]
    pub password: Option<String>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Initialize database with schema and demo data
    Init {
        /// Delete the existing database first
        #[arg(long)]
        force: bool,
    },

    /// Show record counts
    Status,

    /// Check credentials
    Login,

    /// Item catalog
    Items {
        #[command(subcommand)]
        action: ItemAction,
    },

    /// Order headers
    Orders {
        #[command(subcommand)]
        action: OrderAction,
    },

    /// Lines of one order
    Lines {
        #[command(subcommand)]
        action: LineAction,
    },

    /// Login accounts
    Users {
        #[command(subcommand)]
        action: UserAction,
    },

    /// Run a read-only SQL query (SELECT / WITH)
    Query {
        /// SQL text
        sql: String,
        /// Print the result as JSON
        #[arg(long)]
        json: bool,
    },
}

#[derive(Subcommand)]
pub enum ItemAction {
    /// List all items
    List,
    /// Add an item
    Add {
        /// Item code (e.g., IT004)
        code: String,
        #[arg(long)]
        description: Option<String>,
        #[arg(long)]
        quantity: Option<i64>,
        #[arg(long)]
        price: Option<Decimal>,
    },
    /// Update an item, selected by code
    Update {
        code: String,
        #[arg(long)]
        new_code: Option<String>,
        #[arg(long)]
        description: Option<String>,
        #[arg(long)]
        quantity: Option<i64>,
        #[arg(long)]
        price: Option<Decimal>,
    },
    /// Delete an item, selected by code
    Delete {
        code: String,
        /// Do not ask for confirmation
        #[arg(long, short)]
        yes: bool,
    },
}

#[derive(Subcommand)]
pub enum OrderAction {
    /// List all orders
    List,
    /// Add an order
    Add {
        /// Order number (e.g., ORD003)
        number: String,
        /// Order date (YYYY-MM-DD), default today
        #[arg(long)]
        date: Option<NaiveDate>,
        #[arg(long, value_enum, default_value = "to")]
        r#type: OrderTypeArg,
    },
    /// Update an order, selected by number
    Update {
        number: String,
        #[arg(long)]
        new_number: Option<String>,
        #[arg(long)]
        date: Option<NaiveDate>,
        #[arg(long, value_enum)]
        r#type: Option<OrderTypeArg>,
    },
    /// Delete an order without lines
    Delete {
        number: String,
        #[arg(long, short)]
        yes: bool,
    },
}

#[derive(Subcommand)]
pub enum LineAction {
    /// List lines of an order (default: first order)
    List { order: Option<String> },
    /// Add a line to an order
    Add {
        order: String,
        /// Item id, code or label
        #[arg(long)]
        item: String,
        #[arg(long)]
        quantity: i64,
    },
    /// Update a line, selected by id
    Update {
        order: String,
        line_id: i64,
        #[arg(long)]
        item: Option<String>,
        #[arg(long)]
        quantity: Option<i64>,
    },
    /// Delete a line, selected by id
    Delete {
        order: String,
        line_id: i64,
        #[arg(long, short)]
        yes: bool,
    },
    /// Lines of the order after `order`
    Next { order: String },
    /// Lines of the order before `order`
    Prev { order: String },
}

#[derive(Subcommand)]
pub enum UserAction {
    /// List all users
    List,
    /// Add a user
    Add {
        login: String,
        #[arg(long)]
        new_password: String,
        #[arg(long)]
        confirm: String,
    },
    /// Update a user, selected by login
    Update {
        login: String,
        #[arg(long)]
        new_login: Option<String>,
        /// Change the password as well
        #[arg(long, requires = "confirm")]
        new_password: Option<String>,
        #[arg(long)]
        confirm: Option<String>,
    },
    /// Delete a user
    Delete {
        login: String,
        #[arg(long, short)]
        yes: bool,
    },
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum OrderTypeArg {
    To,
    From,
}

impl OrderTypeArg {
    pub fn to_core_type(self) -> wms_core::OrderType {
        match self {
            OrderTypeArg::To => wms_core::OrderType::To,
            OrderTypeArg::From => wms_core::OrderType::From,
        }
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    let config = AppConfig::from_env().with_overrides(
        cli.db.clone(),
        cli.user.clone(),
        cli.password.clone(),
    );

    // Initialize tracing
    tracing_subscriber::fmt()
        .with_max_level(config.level())
        .with_writer(std::io::stderr)
        .init();
    debug!(db = %config.db_path.display(), "Configuration loaded");

    match cli.command {
        Commands::Init { force } => {
            db::init_database(&config.db_path, force)?;
            println!("✅ Database initialized at {:?}", config.db_path);
        }

        Commands::Status => {
            db::show_status(&config.db_path)?;
        }

        Commands::Login => {
            let session = commands::login(&config)?;
            if let Some(user) = session.current_user() {
                println!("✅ Logged in as {}", user.login);
            }
        }

        Commands::Items { action } => {
            let mut session = commands::login(&config)?;
            items::handle(&mut session, action)?;
        }

        Commands::Orders { action } => {
            let mut session = commands::login(&config)?;
            orders::handle(&mut session, action)?;
        }

        Commands::Lines { action } => {
            let mut session = commands::login(&config)?;
            lines::handle(&mut session, action)?;
        }

        Commands::Users { action } => {
            let mut session = commands::login(&config)?;
            users::handle(&mut session, action)?;
        }

        Commands::Query { sql, json } => {
            let session = commands::login(&config)?;
            query::run(&session, &sql, json)?;
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_global_flags() {
        let cli = Cli::try_parse_from([
            "wms", "items", "list", "--user", "admin", "--password", "admin123",
        ])
        .unwrap();
        assert_eq!(cli.user.as_deref(), Some("admin"));
        assert!(matches!(
            cli.command,
            Commands::Items {
                action: ItemAction::List
            }
        ));
    }

    #[test]
    fn test_parse_line_add() {
        let cli = Cli::try_parse_from([
            "wms", "lines", "add", "ORD001", "--item", "IT003 - Keyboard", "--quantity", "4",
        ])
        .unwrap();
        match cli.command {
            Commands::Lines {
                action: LineAction::Add { order, item, quantity },
            } => {
                assert_eq!(order, "ORD001");
                assert_eq!(item, "IT003 - Keyboard");
                assert_eq!(quantity, 4);
            }
            _ => panic!("expected lines add"),
        }
    }

    #[test]
    fn test_parse_order_type_and_date() {
        let cli = Cli::try_parse_from([
            "wms", "orders", "add", "ORD003", "--date", "2026-02-01", "--type", "from",
        ])
        .unwrap();
        match cli.command {
            Commands::Orders {
                action: OrderAction::Add { date, r#type, .. },
            } => {
                assert_eq!(date, NaiveDate::from_ymd_opt(2026, 2, 1));
                assert_eq!(r#type.to_core_type(), wms_core::OrderType::From);
            }
            _ => panic!("expected orders add"),
        }
    }

    #[test]
    fn test_password_change_requires_confirm() {
        let result = Cli::try_parse_from(["wms", "users", "update", "user1", "--new-password", "x"]);
        assert!(result.is_err());
    }
}
