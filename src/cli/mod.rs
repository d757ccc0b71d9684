//! CLI interface for brigadmin

pub mod commands;
mod output;

pub use output::*;

use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "brigadmin")]
#[command(version)]
#[command(about = "Administer brigadistas, locations and incident reports", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Create a brigadmin.toml configuration file in the current directory
    Init,

    /// Sign in and store the session token
    Login {
        /// Account email (prompted when omitted)
        #[arg(short, long, env = "BRIGADMIN_EMAIL")]
        email: Option<String>,

        /// Account password (prompted when omitted)
        #[arg(long, env = "BRIGADMIN_PASSWORD", hide_env_values = true)]
        password: Option<String>,
    },

    /// Forget the stored session token
    Logout,

    /// Show the identity and roles carried by the current session
    Whoami {
        /// Output format
        #[arg(short, long, default_value = "table")]
        format: OutputFormat,
    },

    /// Manage volunteer responders
    Brigadistas {
        #[command(subcommand)]
        action: BrigadistasAction,
    },

    /// Manage physical locations
    Ubicaciones {
        #[command(subcommand)]
        action: UbicacionesAction,
    },

    /// Browse incident reports
    Reportes {
        #[command(subcommand)]
        action: ReportesAction,
    },

    /// Manage user accounts
    Usuarios {
        #[command(subcommand)]
        action: UsuariosAction,
    },
}

#[derive(Subcommand)]
pub enum BrigadistasAction {
    /// List all brigadistas
    List {
        #[arg(short, long, default_value = "table")]
        format: OutputFormat,
    },

    /// Register a new brigadista
    Create {
        #[arg(short, long)]
        nombre: String,

        #[arg(short, long)]
        correo: String,

        #[arg(short, long)]
        telefono: Option<String>,

        /// Create the record as inactive
        #[arg(long)]
        inactive: bool,
    },

    /// Update fields of a brigadista
    Update {
        id: i64,

        #[arg(short, long)]
        nombre: Option<String>,

        #[arg(short, long)]
        correo: Option<String>,

        #[arg(short, long)]
        telefono: Option<String>,

        #[arg(long)]
        activo: Option<bool>,
    },

    /// Delete a brigadista
    Delete {
        id: i64,

        /// Skip confirmation prompt
        #[arg(short, long)]
        force: bool,
    },
}

/// Fields describing a location
#[derive(clap::Args, Debug, Clone)]
pub struct UbicacionArgs {
    #[arg(long)]
    pub sede: String,

    #[arg(long)]
    pub edificio: String,

    #[arg(long)]
    pub piso: String,

    #[arg(long)]
    pub lugar: String,

    #[arg(long, default_value = "")]
    pub descripcion: String,
}

#[derive(Subcommand)]
pub enum UbicacionesAction {
    /// List locations, optionally filtered
    List {
        /// Case-insensitive search across site, building, place, floor and description
        #[arg(short, long)]
        search: Option<String>,

        #[arg(short, long, default_value = "table")]
        format: OutputFormat,
    },

    /// Show a single location
    Show {
        id: i64,

        #[arg(short, long, default_value = "table")]
        format: OutputFormat,
    },

    /// Create a location
    Create {
        #[command(flatten)]
        fields: UbicacionArgs,
    },

    /// Replace the fields of a location
    Update {
        id: i64,

        #[command(flatten)]
        fields: UbicacionArgs,
    },

    /// Delete a location
    Delete {
        id: i64,

        #[arg(short, long)]
        force: bool,
    },

    /// Print QR payloads for locations (all matching ones when no ids are given)
    Qr {
        ids: Vec<i64>,

        #[arg(short, long)]
        search: Option<String>,

        #[arg(short, long, default_value = "table")]
        format: OutputFormat,
    },
}

#[derive(Subcommand)]
pub enum ReportesAction {
    /// List all reports
    List {
        #[arg(short, long, default_value = "table")]
        format: OutputFormat,
    },

    /// Show a single report
    Show {
        id: i64,

        #[arg(short, long, default_value = "table")]
        format: OutputFormat,
    },

    /// Download the audio attached to a report
    Audio {
        id: i64,

        /// Destination file (defaults to reporte_<id>.audio)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Dashboard statistics
    Stats {
        #[arg(short, long, default_value = "table")]
        format: OutputFormat,
    },
}

#[derive(Subcommand)]
pub enum UsuariosAction {
    /// List user accounts
    List {
        #[arg(short, long, default_value = "table")]
        format: OutputFormat,
    },

    /// Register a new account
    Create {
        #[arg(short, long)]
        correo: String,

        #[arg(short, long)]
        nombre: Option<String>,

        /// Password (prompted when omitted)
        #[arg(long)]
        password: Option<String>,

        /// Grant the brigadista role immediately
        #[arg(long)]
        brigadista: bool,
    },

    /// Update an account
    Update {
        id: i64,

        #[arg(short, long)]
        nombre: Option<String>,

        #[arg(short, long)]
        correo: Option<String>,

        #[arg(long)]
        password: Option<String>,
    },

    /// Grant the brigadista role
    Promote { id: i64 },

    /// Remove the brigadista role
    Demote { id: i64 },

    /// Disable (ban) an account
    Disable { id: i64 },

    /// Re-enable an account
    Enable { id: i64 },
}

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum OutputFormat {
    Table,
    Json,
    Yaml,
}
