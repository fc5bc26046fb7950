use crate::commands::{Command, EntitiesOptions, GenerateOptions};
use crate::tracing::{LogLevel, TracingFormat};
use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "entigen")]
#[command(about = "Prepare JHipster-style entity definitions and keep their snapshots in sync")]
#[command(long_about = None)]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    #[arg(
        short = 'l',
        long,
        global = true,
        help = "Set logging level",
        default_value = "warn",
        value_enum
    )]
    pub level: LogLevel,

    #[arg(
        long,
        global = true,
        help = "Log output format",
        default_value = "compact",
        value_enum
    )]
    pub log_format: TracingFormat,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    #[command(about = "Run the full pipeline and write entity snapshots")]
    Generate {
        #[arg(long, short = 'p', help = "Project directory", default_value = ".")]
        path: PathBuf,
        #[arg(
            long = "blueprint",
            short = 'b',
            help = "Blueprint file to apply; may be repeated"
        )]
        blueprints: Vec<PathBuf>,
        #[arg(long, help = "Fail instead of writing when a snapshot would change")]
        check: bool,
        #[arg(long, help = "Do not add the built-in User entity")]
        skip_user_management: bool,
    },
    #[command(about = "Prepare entities without writing anything and print them")]
    Entities {
        #[arg(long, short = 'p', help = "Project directory", default_value = ".")]
        path: PathBuf,
        #[arg(long, help = "Print prepared entities as JSON")]
        json: bool,
        #[arg(long, help = "Do not add the built-in User entity")]
        skip_user_management: bool,
    },
    #[command(about = "Print the resolved priority order")]
    Priorities {
        #[arg(long, help = "Print priorities as JSON")]
        json: bool,
    },
    #[command(about = "Show version and build information")]
    Version,
}

impl From<Commands> for Command {
    fn from(cmd: Commands) -> Self {
        match cmd {
            Commands::Generate {
                path,
                blueprints,
                check,
                skip_user_management,
            } => Self::Generate(GenerateOptions {
                path,
                blueprints,
                check,
                skip_user_management,
            }),
            Commands::Entities {
                path,
                json,
                skip_user_management,
            } => Self::Entities(EntitiesOptions {
                path,
                json,
                skip_user_management,
            }),
            Commands::Priorities { json } => Self::Priorities { json },
            Commands::Version => Self::Version,
        }
    }
}

pub fn parse() -> Cli {
    Cli::parse()
}
