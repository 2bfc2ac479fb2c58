use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use casetree_config::{Config, LabelConfig};
use casetree_engine::archive::{Archive, ExecutionUpdate};
use casetree_engine::codec::JsonOutlineCodec;
use casetree_engine::export::{self, ExportFile, ExportFormat, LabelKind, LabelTables};
use casetree_engine::import;
use casetree_engine::io;
use casetree_engine::models::{ModuleCatalog, ModuleIndex, TestCaseRecord};
use clap::{Parser, Subcommand, ValueEnum};

/// Convert test cases between flat records, outline files and CSV tables
#[derive(Parser, Debug)]
#[command(name = "casetree")]
#[command(about = "Test case outline builder and converter")]
struct Args {
    /// Config file to use instead of ~/.config/casetree/config.toml
    #[arg(long, global = true, env = "CASETREE_CONFIG")]
    config: Option<PathBuf>,

    /// Log debug output
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Export case records as an outline file or CSV table
    Export {
        /// JSON array of test case records
        #[arg(long)]
        cases: PathBuf,
        /// JSON module catalog used to resolve module ids
        #[arg(long)]
        modules: Option<PathBuf>,
        #[arg(long, value_enum, default_value_t = CaseFormat::Outline)]
        format: CaseFormat,
        /// Project name for the outline root and file name
        #[arg(long)]
        name: Option<String>,
        #[arg(long)]
        out: Option<PathBuf>,
    },
    /// Read an outline file or CSV table back into merged records
    Import {
        file: PathBuf,
        /// Write records here instead of stdout
        #[arg(long)]
        out: Option<PathBuf>,
    },
    /// Freeze case records into a new archive file
    Snapshot {
        #[arg(long)]
        cases: PathBuf,
        #[arg(long)]
        modules: Option<PathBuf>,
        #[arg(long)]
        name: String,
        #[arg(long)]
        description: Option<String>,
        #[arg(long)]
        out: PathBuf,
    },
    /// Export an archive with its execution results
    Archive {
        #[arg(long)]
        archive: PathBuf,
        #[arg(long, value_enum, default_value_t = ArchiveFormat::Report)]
        format: ArchiveFormat,
        #[arg(long)]
        out: Option<PathBuf>,
    },
    /// Record an execution result for one archived case
    Record {
        #[arg(long)]
        archive: PathBuf,
        /// Archived case id, 1-based
        #[arg(long)]
        case: u64,
        /// JSON execution update: status, comment, step_results
        #[arg(long)]
        update: PathBuf,
        /// Close the archive after recording
        #[arg(long)]
        close: bool,
    },
    /// Write the CSV import template
    Template {
        #[arg(long)]
        out: Option<PathBuf>,
    },
    /// Write the config file, keeping settings already in it
    Init {
        #[arg(long)]
        output_dir: Option<PathBuf>,
        #[arg(long)]
        root_name: Option<String>,
    },
}

#[derive(ValueEnum, Clone, Copy, Debug)]
enum CaseFormat {
    Outline,
    Table,
}

impl From<CaseFormat> for ExportFormat {
    fn from(format: CaseFormat) -> Self {
        match format {
            CaseFormat::Outline => ExportFormat::Outline,
            CaseFormat::Table => ExportFormat::Table,
        }
    }
}

#[derive(ValueEnum, Clone, Copy, Debug)]
enum ArchiveFormat {
    Outline,
    Table,
    Report,
}

fn label_tables(config: &LabelConfig) -> LabelTables {
    LabelTables::default()
        .with_overrides(LabelKind::Priority, config.priority.clone())
        .with_overrides(LabelKind::Status, config.status.clone())
        .with_overrides(LabelKind::Category, config.category.clone())
        .with_overrides(LabelKind::Method, config.method.clone())
        .with_overrides(LabelKind::Execution, config.execution.clone())
}

fn load_modules(path: Option<&Path>) -> Result<ModuleIndex> {
    match path {
        Some(path) => {
            let catalog: ModuleCatalog = io::read_json(path)
                .with_context(|| format!("Failed to load modules from {}", path.display()))?;
            Ok(ModuleIndex::from(catalog))
        }
        None => Ok(ModuleIndex::new()),
    }
}

fn load_cases(path: &Path) -> Result<Vec<TestCaseRecord>> {
    io::read_json(path).with_context(|| format!("Failed to load cases from {}", path.display()))
}

/// Project name: flag, then config, then the cases file's stem
fn project_name(flag: Option<String>, config: &Config, cases: &Path) -> String {
    flag.or_else(|| config.root_name.clone())
        .or_else(|| {
            cases
                .file_stem()
                .map(|stem| stem.to_string_lossy().into_owned())
        })
        .unwrap_or_else(|| "casetree".to_string())
}

fn save(file: ExportFile, out: Option<PathBuf>, config: &Config) -> Result<()> {
    let path = out.unwrap_or_else(|| config.output_path(&file.file_name));
    io::write_bytes(&path, &file.bytes)
        .with_context(|| format!("Failed to write {}", path.display()))?;
    log::info!("Wrote {}", path.display());
    println!("{}", path.display());
    Ok(())
}

fn run(command: Command, config: &Config, config_path: &Path) -> Result<()> {
    let labels = label_tables(&config.labels);
    let codec = JsonOutlineCodec;

    match command {
        Command::Export {
            cases,
            modules,
            format,
            name,
            out,
        } => {
            let records = load_cases(&cases)?;
            let modules = load_modules(modules.as_deref())?;
            let project = project_name(name, config, &cases);
            let file = export::export(format.into(), &project, &records, &modules, &codec, &labels)?;
            save(file, out, config)
        }
        Command::Import { file, out } => {
            let bytes = io::read_bytes(&file)?;
            let file_name = file
                .file_name()
                .map(|name| name.to_string_lossy().into_owned())
                .unwrap_or_default();
            let records = import::import_file(&file_name, &bytes, &codec, &labels)?;
            match out {
                Some(out) => {
                    io::write_json(&out, &records)?;
                    log::info!("Wrote {} records to {}", records.len(), out.display());
                }
                None => println!("{}", serde_json::to_string_pretty(&records)?),
            }
            Ok(())
        }
        Command::Snapshot {
            cases,
            modules,
            name,
            description,
            out,
        } => {
            let records = load_cases(&cases)?;
            let modules = load_modules(modules.as_deref())?;
            let archive = Archive::snapshot(name, description, &records, &modules)?;
            io::write_json(&out, &archive)?;
            println!("{}", out.display());
            Ok(())
        }
        Command::Archive {
            archive,
            format,
            out,
        } => {
            let archive: Archive = io::read_json(&archive)
                .with_context(|| format!("Failed to load archive from {}", archive.display()))?;
            let file = match format {
                ArchiveFormat::Outline => archive.export_outline(&codec)?,
                ArchiveFormat::Table => archive.export_table(&labels)?,
                ArchiveFormat::Report => archive.export_report(&labels),
            };
            save(file, out, config)
        }
        Command::Record {
            archive: path,
            case,
            update,
            close,
        } => {
            let mut archive: Archive = io::read_json(&path)
                .with_context(|| format!("Failed to load archive from {}", path.display()))?;
            let update: ExecutionUpdate = io::read_json(&update)
                .with_context(|| format!("Failed to load update from {}", update.display()))?;

            let status = archive.record_execution(case, update)?.execution().status;
            log::info!("Recorded case {case} in '{}' as {}", archive.name(), status.code());
            if close {
                archive.close();
            }
            io::write_json(&path, &archive)?;
            Ok(())
        }
        Command::Template { out } => {
            let bytes = export::table::template(&labels)?;
            let file = ExportFile {
                file_name: export::file_name("casetree", "import_template", "csv"),
                bytes,
            };
            save(file, out, config)
        }
        Command::Init {
            output_dir,
            root_name,
        } => {
            let mut config = config.clone();
            if output_dir.is_some() {
                config.output_dir = output_dir;
            }
            if root_name.is_some() {
                config.root_name = root_name;
            }
            config.save_to_path(config_path)?;
            println!("{}", config_path.display());
            Ok(())
        }
    }
}

fn main() -> Result<()> {
    let args = Args::parse();

    let level = if args.verbose {
        log::LevelFilter::Debug
    } else {
        log::LevelFilter::Info
    };
    env_logger::Builder::from_default_env()
        .filter_level(level)
        .init();

    let config_path = args.config.clone().unwrap_or_else(Config::config_path);
    log::debug!("Config path: {}", config_path.display());
    let config = Config::load_or_default(&config_path)?;

    run(args.command, &config, &config_path)
}
