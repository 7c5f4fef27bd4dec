//! `roster`: command-line client for the Roster student API.
//!
//! # Usage
//!
//! ```text
//! roster --url http://localhost:8000 list --limit 20
//! roster search "hà nội"
//! roster create SV001 --family-name "Nguyễn Văn" --given-name An --math 8.5
//! roster update 1 --hometown Huế --clear-email
//! roster import students.json
//! ```

mod client;

use std::path::PathBuf;

use anyhow::{Context, Result, bail};
use clap::{Args as ClapArgs, Parser, Subcommand};
use client::{ApiClient, ApiConfig};
use roster_core::student::{NewStudent, Student, StudentId, StudentPatch};
use serde::Deserialize;
use tracing::level_filters::LevelFilter;
use tracing_subscriber::EnvFilter;

const DEFAULT_URL: &str = "http://localhost:8000";

// ─── CLI args ─────────────────────────────────────────────────────────────────

#[derive(Parser, Debug)]
#[command(name = "roster", version, about = "Command-line client for the Roster student API")]
struct Args {
  /// Path to a TOML config file (url).
  #[arg(short, long, value_name = "FILE")]
  config: Option<PathBuf>,

  /// Base URL of the roster server (default: http://localhost:8000).
  #[arg(long, env = "ROSTER_URL")]
  url: Option<String>,

  /// Print raw JSON instead of a table.
  #[arg(long, global = true)]
  json: bool,

  #[command(subcommand)]
  command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
  /// List students in creation order.
  List {
    #[arg(long, default_value_t = 0)]
    skip:  usize,
    #[arg(long, default_value_t = 100)]
    limit: usize,
  },
  /// Show one student by id.
  Get { id: StudentId },
  /// Show one student by code.
  Code { code: String },
  /// Case-insensitive search over code, names, email and hometown.
  Search { keyword: String },
  /// Create a student.
  Create(CreateArgs),
  /// Change only the given fields of a student.
  Update {
    id:     StudentId,
    #[command(flatten)]
    fields: UpdateArgs,
  },
  /// Delete a student.
  Delete { id: StudentId },
  /// Show record count and score means.
  Stats,
  /// Create every student in a JSON array file; reports per-entry failures.
  Import { file: PathBuf },
}

#[derive(ClapArgs, Debug)]
struct CreateArgs {
  code:             String,
  #[arg(long)]
  family_name:      String,
  #[arg(long)]
  given_name:       String,
  #[arg(long)]
  email:            Option<String>,
  /// YYYY-MM-DD
  #[arg(long)]
  birth_date:       Option<String>,
  #[arg(long)]
  hometown:         Option<String>,
  #[arg(long = "math")]
  math_score:       Option<f64>,
  #[arg(long = "literature")]
  literature_score: Option<f64>,
  #[arg(long = "english")]
  english_score:    Option<f64>,
}

impl From<CreateArgs> for NewStudent {
  fn from(a: CreateArgs) -> Self {
    NewStudent {
      code:             a.code,
      family_name:      a.family_name,
      given_name:       a.given_name,
      email:            a.email,
      birth_date:       a.birth_date,
      hometown:         a.hometown,
      math_score:       a.math_score,
      literature_score: a.literature_score,
      english_score:    a.english_score,
    }
  }
}

#[derive(ClapArgs, Debug)]
struct UpdateArgs {
  #[arg(long)]
  code:             Option<String>,
  #[arg(long)]
  family_name:      Option<String>,
  #[arg(long)]
  given_name:       Option<String>,
  #[arg(long, conflicts_with = "clear_email")]
  email:            Option<String>,
  #[arg(long)]
  clear_email:      bool,
  #[arg(long, conflicts_with = "clear_birth_date")]
  birth_date:       Option<String>,
  #[arg(long)]
  clear_birth_date: bool,
  #[arg(long, conflicts_with = "clear_hometown")]
  hometown:         Option<String>,
  #[arg(long)]
  clear_hometown:   bool,
  #[arg(long = "math", conflicts_with = "clear_math")]
  math_score:       Option<f64>,
  #[arg(long)]
  clear_math:       bool,
  #[arg(long = "literature", conflicts_with = "clear_literature")]
  literature_score: Option<f64>,
  #[arg(long)]
  clear_literature: bool,
  #[arg(long = "english", conflicts_with = "clear_english")]
  english_score:    Option<f64>,
  #[arg(long)]
  clear_english:    bool,
}

impl From<UpdateArgs> for StudentPatch {
  fn from(a: UpdateArgs) -> Self {
    StudentPatch {
      code:             a.code,
      family_name:      a.family_name,
      given_name:       a.given_name,
      email:            nullable(a.email, a.clear_email),
      birth_date:       nullable(a.birth_date, a.clear_birth_date),
      hometown:         nullable(a.hometown, a.clear_hometown),
      math_score:       nullable(a.math_score, a.clear_math),
      literature_score: nullable(a.literature_score, a.clear_literature),
      english_score:    nullable(a.english_score, a.clear_english),
    }
  }
}

fn nullable<T>(value: Option<T>, clear: bool) -> Option<Option<T>> {
  if clear { Some(None) } else { value.map(Some) }
}

// ─── Config file ──────────────────────────────────────────────────────────────

/// Shape of the optional TOML config file.
#[derive(Deserialize, Default)]
struct ConfigFile {
  #[serde(default)]
  url: String,
}

// ─── Entry point ──────────────────────────────────────────────────────────────

#[tokio::main]
async fn main() -> Result<()> {
  tracing_subscriber::fmt()
    .with_writer(std::io::stderr)
    .with_env_filter(
      EnvFilter::builder()
        .with_default_directive(LevelFilter::WARN.into())
        .from_env_lossy(),
    )
    .init();

  let args = Args::parse();

  let file_cfg: ConfigFile = if let Some(path) = &args.config {
    let raw = std::fs::read_to_string(path)
      .with_context(|| format!("reading config file {}", path.display()))?;
    toml::from_str(&raw).context("parsing config file")?
  } else {
    ConfigFile::default()
  };

  // CLI flags override config file, which overrides defaults.
  let api_config = ApiConfig {
    base_url: args
      .url
      .or_else(|| (!file_cfg.url.is_empty()).then(|| file_cfg.url.clone()))
      .unwrap_or_else(|| DEFAULT_URL.to_string()),
  };
  tracing::debug!(base_url = %api_config.base_url, "using server");

  let client = ApiClient::new(api_config)?;
  run(&client, args.command, args.json).await
}

async fn run(client: &ApiClient, command: Command, json: bool) -> Result<()> {
  match command {
    Command::List { skip, limit } => {
      show_many(&client.list(skip, limit).await?, json)?;
    }
    Command::Search { keyword } => {
      show_many(&client.search(&keyword).await?, json)?;
    }
    Command::Get { id } => match client.get(id).await? {
      Some(student) => print_json(&student)?,
      None => bail!("student {id} not found"),
    },
    Command::Code { code } => match client.get_by_code(&code).await? {
      Some(student) => print_json(&student)?,
      None => bail!("student with code {code} not found"),
    },
    Command::Create(fields) => {
      print_json(&client.create(&NewStudent::from(fields)).await?)?;
    }
    Command::Update { id, fields } => {
      match client.update(id, &StudentPatch::from(fields)).await? {
        Some(student) => print_json(&student)?,
        None => bail!("student {id} not found"),
      }
    }
    Command::Delete { id } => {
      if !client.delete(id).await? {
        bail!("student {id} not found");
      }
      println!("deleted student {id}");
    }
    Command::Stats => print_json(&client.statistics().await?)?,
    Command::Import { file } => {
      let raw = std::fs::read_to_string(&file)
        .with_context(|| format!("reading {}", file.display()))?;
      let inputs: Vec<NewStudent> = serde_json::from_str(&raw)
        .with_context(|| format!("parsing {} as a JSON array of students", file.display()))?;
      print_json(&client.create_many(&inputs).await?)?;
    }
  }
  Ok(())
}

// ─── Output ───────────────────────────────────────────────────────────────────

fn print_json<T: serde::Serialize>(value: &T) -> Result<()> {
  println!("{}", serde_json::to_string_pretty(value)?);
  Ok(())
}

fn show_many(students: &[Student], json: bool) -> Result<()> {
  if json {
    return print_json(&students);
  }
  print!("{}", table(students));
  Ok(())
}

fn table(students: &[Student]) -> String {
  let mut out = format!(
    "{:>5}  {:<10}  {:<30}  {:<16}  {:>7}\n",
    "ID", "CODE", "NAME", "HOMETOWN", "AVERAGE"
  );
  for s in students {
    let name = format!("{} {}", s.family_name, s.given_name);
    let average = s.average_score.map(|a| format!("{a:.2}")).unwrap_or_else(|| "-".into());
    out.push_str(&format!(
      "{:>5}  {:<10}  {:<30}  {:<16}  {:>7}\n",
      s.id,
      s.code,
      name,
      s.hometown.as_deref().unwrap_or("-"),
      average,
    ));
  }
  out
}
