use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;

use rust_sqlscripter::model::ServerRoleSyntax;
use rust_sqlscripter::{ConnectionConfig, ScripterOptions};

#[derive(Parser)]
#[command(name = "rust-sqlscripter")]
#[command(author, version, about = "Script SQL Server schema objects as re-runnable T-SQL")]
struct Cli {
    #[command(flatten)]
    connection: ConnectionArgs,

    #[command(flatten)]
    flags: ScriptFlags,

    /// TOML file with scripter options
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Write the script here instead of stdout
    #[arg(short, long, global = true)]
    output: Option<PathBuf>,

    /// Log catalog queries to stderr
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

/// Connection settings; unset values fall back to SQL_SERVER_* variables
#[derive(Args)]
struct ConnectionArgs {
    /// Server host (SQL_SERVER_HOST)
    #[arg(long, global = true)]
    host: Option<String>,

    /// Server port (SQL_SERVER_PORT)
    #[arg(long, global = true)]
    port: Option<u16>,

    /// SQL login (SQL_SERVER_USER)
    #[arg(short = 'U', long, global = true)]
    user: Option<String>,

    /// Password (SQL_SERVER_PASSWORD)
    #[arg(short = 'P', long, global = true)]
    password: Option<String>,

    /// Database to script
    #[arg(short, long, global = true)]
    database: Option<String>,
}

/// Switches that override the options file
#[derive(Args)]
struct ScriptFlags {
    /// Omit the guarded DROP before each object
    #[arg(long, global = true)]
    no_drop: bool,

    /// Omit the USE preamble
    #[arg(long, global = true)]
    no_use: bool,

    /// Omit section banner comments
    #[arg(long, global = true)]
    no_comments: bool,

    #[arg(long, global = true)]
    no_permissions: bool,

    #[arg(long, global = true)]
    no_indexes: bool,

    /// Omit check constraints
    #[arg(long, global = true)]
    no_constraints: bool,

    #[arg(long, global = true)]
    no_foreign_keys: bool,

    #[arg(long, global = true)]
    no_extended_properties: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Script a table with its related objects
    Table { name: String },
    /// Script a view
    View { name: String },
    /// Script a stored procedure
    Procedure { name: String },
    /// Script a scalar or table-valued function
    Function { name: String },
    /// Script a trigger
    Trigger { name: String },
    /// Script a synonym
    Synonym { name: String },
    /// Script any object, whatever its kind
    Object { name: String },
    /// Script every user table in the database
    Schema {
        /// Also script views, procedures, functions, synonyms and triggers
        #[arg(long)]
        include_modules: bool,
    },
    /// Script server logins
    Logins {
        /// Use sp_addsrvrolemember instead of ALTER SERVER ROLE
        #[arg(long)]
        legacy_roles: bool,
    },
}

impl ConnectionArgs {
    fn resolve(&self) -> ConnectionConfig {
        self.resolve_over(ConnectionConfig::from_env())
    }

    fn resolve_over(&self, env: ConnectionConfig) -> ConnectionConfig {
        ConnectionConfig {
            host: self.host.clone().unwrap_or(env.host),
            port: self.port.unwrap_or(env.port),
            user: self.user.clone().unwrap_or(env.user),
            password: self.password.clone().unwrap_or(env.password),
            database: self.database.clone().or(env.database),
            ..env
        }
    }
}

fn main() -> Result<()> {
    let _ = dotenvy::dotenv();
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let connection = cli.connection.resolve();
    let options = build_options(&cli, &connection)?;
    let mut scripter = rust_sqlscripter::connect(&connection, options)
        .with_context(|| format!("Failed to connect to {}:{}", connection.host, connection.port))?;

    let script = match &cli.command {
        Commands::Table { name } => scripter.script_table(name)?,
        Commands::View { name } => scripter.script_view(name)?,
        Commands::Procedure { name } => scripter.script_procedure(name)?,
        Commands::Function { name } => scripter.script_function(name)?,
        Commands::Trigger { name } => scripter.script_trigger(name)?,
        Commands::Synonym { name } => scripter.script_synonym(name)?,
        Commands::Object { name } => scripter.script_object(name)?,
        Commands::Schema { .. } => scripter.script_schema()?,
        Commands::Logins { .. } => scripter.script_logins()?,
    };

    write_output(cli.output.as_deref(), &script)
}

/// Options file (or defaults), then command-line overrides. The database
/// comes from `--database`, then the options file, then the connection.
fn build_options(cli: &Cli, connection: &ConnectionConfig) -> Result<ScripterOptions> {
    let base = match &cli.config {
        Some(path) => ScripterOptions::load(path)?,
        None => ScripterOptions::default(),
    };
    let flags = &cli.flags;
    let mut builder = base
        .to_builder()
        .include_drop(base.include_drop && !flags.no_drop)
        .include_use(base.include_use && !flags.no_use)
        .comment_scripts(base.comment_scripts && !flags.no_comments)
        .include_permissions(base.include_permissions && !flags.no_permissions)
        .include_indexes(base.include_indexes && !flags.no_indexes)
        .include_constraints(base.include_constraints && !flags.no_constraints)
        .include_foreign_keys(base.include_foreign_keys && !flags.no_foreign_keys)
        .include_extended_properties(base.include_extended_properties && !flags.no_extended_properties);

    let database = cli
        .connection
        .database
        .as_ref()
        .or(base.database.as_ref())
        .or(connection.database.as_ref());
    if let Some(database) = database {
        builder = builder.database(database.clone());
    }
    match cli.command {
        Commands::Schema { include_modules: true } => builder = builder.include_modules(true),
        Commands::Logins { legacy_roles: true } => {
            builder = builder.server_role_syntax(ServerRoleSyntax::SpAddSrvRoleMember)
        }
        _ => {}
    }
    Ok(builder.build())
}

fn init_tracing(verbose: bool) {
    let default = if verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn write_output(path: Option<&Path>, script: &str) -> Result<()> {
    match path {
        Some(path) => std::fs::write(path, script)
            .with_context(|| format!("Failed to write {}", path.display())),
        None => {
            print!("{}", script);
            Ok(())
        }
    }
}
