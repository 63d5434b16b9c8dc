//! Dockhand CLI
//!
//! Usage:
//!   dockhand [OPTIONS] <COMMAND>
//!
//! Commands:
//!   templates      List starter templates
//!   instructions   List Dockerfile instructions and compose directives
//!   guide          Show guide entries
//!   fields         Show the placeholders a template expects
//!   render         Render a template with placeholder values
//!   build          Assemble a Dockerfile from instruction values

use std::fmt::Display;
use std::fs;
use std::io::{self, IsTerminal, Read};
use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};
use tracing::debug;
use tracing_subscriber::EnvFilter;

use dockhand::catalog::{self, ArtifactKind, Catalog, CommandDetail, Instruction, Scope};
use dockhand::{parse, render_with_check, Bindings, Form, MissingPolicy, RenderConfig, TextConfig};

#[derive(Parser)]
#[command(name = "dockhand")]
#[command(about = "Docker instruction reference and starter-template renderer")]
struct Cli {
    /// Extra catalog file (TOML), appended to the builtin catalog
    #[arg(short, long, global = true, value_name = "FILE")]
    catalog: Vec<PathBuf>,

    /// Log level: error, warn, info, debug, trace
    #[arg(long, global = true, default_value = "warn")]
    log_level: String,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// List starter templates
    Templates {
        #[arg(short, long, value_enum)]
        kind: Option<KindArg>,
    },

    /// List Dockerfile instructions and compose directives
    Instructions {
        #[arg(short, long, value_enum)]
        kind: Option<KindArg>,

        /// Only compose directives of this scope
        #[arg(short, long, value_enum)]
        scope: Option<ScopeArg>,

        /// Show an example for each entry
        #[arg(short, long)]
        examples: bool,
    },

    /// List guide entries, or show one in full
    Guide {
        /// Instruction or directive name
        name: Option<String>,

        #[arg(short, long, value_enum)]
        kind: Option<KindArg>,
    },

    /// Show the placeholders a template expects
    Fields {
        /// Template id or name
        template: String,

        #[arg(short, long, value_enum)]
        kind: Option<KindArg>,

        /// Print a bindings file skeleton instead of a list
        #[arg(long)]
        toml: bool,
    },

    /// Render a template with placeholder values
    Render {
        /// Template id or name (reads stdin if neither this nor --file is given)
        template: Option<String>,

        #[arg(short, long, value_enum)]
        kind: Option<KindArg>,

        /// Render a template file instead of a catalog template
        #[arg(short, long, conflicts_with = "template")]
        file: Option<PathBuf>,

        /// Bindings file (TOML)
        #[arg(short, long, value_name = "FILE")]
        bindings: Option<PathBuf>,

        /// Bind a placeholder, overriding the bindings file
        #[arg(short, long = "set", value_name = "LABEL=VALUE")]
        set: Vec<String>,

        /// Drop unbound placeholders instead of keeping them
        #[arg(long)]
        blank_missing: bool,

        /// Report unfilled placeholders on stderr
        #[arg(long)]
        check: bool,

        /// Fail instead of writing output that still has placeholders
        #[arg(long)]
        strict: bool,

        /// Output file (stdout if not provided)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Assemble a Dockerfile from instruction values
    Build {
        /// Instruction value; repeat for several lines of one instruction
        #[arg(short, long = "set", value_name = "INSTRUCTION=VALUE")]
        set: Vec<String>,

        /// Output file (stdout if not provided)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

#[derive(Clone, Copy, ValueEnum)]
enum KindArg {
    Dockerfile,
    Compose,
}

impl From<KindArg> for ArtifactKind {
    fn from(kind: KindArg) -> Self {
        match kind {
            KindArg::Dockerfile => ArtifactKind::Dockerfile,
            KindArg::Compose => ArtifactKind::Compose,
        }
    }
}

#[derive(Clone, Copy, ValueEnum)]
enum ScopeArg {
    TopLevel,
    Service,
}

impl From<ScopeArg> for Scope {
    fn from(scope: ScopeArg) -> Self {
        match scope {
            ScopeArg::TopLevel => Scope::TopLevel,
            ScopeArg::Service => Scope::Service,
        }
    }
}

/// Exit code when --strict finds placeholders left in the output
const EXIT_UNFILLED: i32 = 2;

fn main() {
    let cli = Cli::parse();
    setup_logging(&cli.log_level);

    let extended;
    let catalog: &Catalog = if cli.catalog.is_empty() {
        catalog::builtin()
    } else {
        extended = load_catalog(&cli.catalog);
        &extended
    };

    match cli.command {
        Command::Templates { kind } => list_templates(catalog, kind.map(Into::into)),
        Command::Instructions {
            kind,
            scope,
            examples,
        } => list_instructions(catalog, kind.map(Into::into), scope.map(Into::into), examples),
        Command::Guide { name, kind } => {
            let kind = kind.map(Into::into);
            match name {
                Some(name) => match catalog.find_command(&name, kind) {
                    Ok((_, detail)) => print_detail(detail),
                    Err(e) => fail(e),
                },
                None => list_guide(catalog, kind),
            }
        }
        Command::Fields {
            template,
            kind,
            toml,
        } => print_fields(catalog, &template, kind.map(Into::into), toml),
        Command::Render {
            template,
            kind,
            file,
            bindings,
            set,
            blank_missing,
            check,
            strict,
            output,
        } => {
            let (name, source) = read_template(catalog, template, kind.map(Into::into), file);
            let bindings = collect_bindings(bindings, &set);

            let missing = if blank_missing {
                MissingPolicy::Blank
            } else {
                MissingPolicy::Keep
            };
            let config = RenderConfig::new()
                .with_text(
                    TextConfig::new()
                        .with_missing(missing)
                        .with_trailing_newline(true),
                )
                .with_check(check || strict);

            let (out, warnings) = render_with_check(&source, &bindings, &config);
            for warning in &warnings {
                eprint!("{}", warning.format(&source, &name));
            }

            if strict && warnings.iter().any(|w| w.leaves_markers()) {
                eprintln!("Error: template '{}' still has unfilled placeholders", name);
                std::process::exit(EXIT_UNFILLED);
            }
            write_output(&out, output);
        }
        Command::Build { set, output } => {
            let instructions = catalog.section(ArtifactKind::Dockerfile).instructions();
            let mut form = Form::new(instructions);
            for assignment in &set {
                let (name, value) = Bindings::parse_assignment(assignment).unwrap_or_else(|e| fail(e));
                if let Err(e) = form.add(&name, value) {
                    fail(e);
                }
            }
            write_output(&form.render(), output);
        }
    }
}

fn setup_logging(level: &str) {
    let level = match level.parse::<tracing::Level>() {
        Ok(level) => level,
        Err(_) => {
            eprintln!("Warning: Unknown log-level '{}', defaulting to WARN", level);
            tracing::Level::WARN
        }
    };

    tracing_subscriber::fmt()
        .with_writer(io::stderr)
        .with_env_filter(EnvFilter::from_default_env().add_directive(level.into()))
        .init();
}

fn fail(error: impl Display) -> ! {
    eprintln!("Error: {}", error);
    std::process::exit(1);
}

fn load_catalog(paths: &[PathBuf]) -> Catalog {
    let mut catalog = catalog::builtin().clone();
    for path in paths {
        if let Err(e) = catalog.extend_from_file(path) {
            fail(e);
        }
    }
    catalog
}

/// Template source and a display name for diagnostics
fn read_template(
    catalog: &Catalog,
    template: Option<String>,
    kind: Option<ArtifactKind>,
    file: Option<PathBuf>,
) -> (String, String) {
    if let Some(path) = file {
        return match fs::read_to_string(&path) {
            Ok(content) => (path.display().to_string(), content),
            Err(e) => fail(format!("reading file '{}': {}", path.display(), e)),
        };
    }

    if let Some(key) = template {
        return match catalog.find_template(&key, kind) {
            Ok((_, entry)) => (entry.id.clone(), entry.content.clone()),
            Err(e) => fail(e),
        };
    }

    if io::stdin().is_terminal() {
        fail("no template given; pass a template id, --file, or pipe one on stdin");
    }
    let mut buffer = String::new();
    if let Err(e) = io::stdin().read_to_string(&mut buffer) {
        fail(format!("reading from stdin: {}", e));
    }
    ("<stdin>".to_string(), buffer)
}

/// Bindings from the file, overlaid with `--set` assignments
fn collect_bindings(file: Option<PathBuf>, assignments: &[String]) -> Bindings {
    let mut bindings = match file {
        Some(path) => Bindings::from_file(&path).unwrap_or_else(|e| {
            fail(format!("loading bindings '{}': {}", path.display(), e))
        }),
        None => Bindings::new(),
    };

    let mut overrides = Bindings::new();
    for assignment in assignments {
        if let Err(e) = overrides.assign(assignment) {
            fail(e);
        }
    }
    bindings.merge(overrides);

    debug!(bindings = bindings.len(), "collected bindings");
    bindings
}

fn write_output(out: &str, output: Option<PathBuf>) {
    match output {
        Some(path) => {
            if let Err(e) = fs::write(&path, out) {
                fail(format!("writing '{}': {}", path.display(), e));
            }
        }
        None => print!("{}", out),
    }
}

fn list_templates(catalog: &Catalog, kind: Option<ArtifactKind>) {
    for (template_kind, template) in catalog.templates() {
        if kind.is_some_and(|k| k != template_kind) {
            continue;
        }
        println!(
            "{:<18} {:<11} {} - {}",
            template.id,
            template_kind.name(),
            template.name,
            template.description
        );
    }
}

fn list_instructions(
    catalog: &Catalog,
    kind: Option<ArtifactKind>,
    scope: Option<Scope>,
    examples: bool,
) {
    // A scope only applies to compose directives
    let kinds: Vec<ArtifactKind> = match (kind, scope) {
        (Some(kind), _) => vec![kind],
        (None, Some(_)) => vec![ArtifactKind::Compose],
        (None, None) => ArtifactKind::ALL.to_vec(),
    };

    for kind in kinds {
        let section = catalog.section(kind);
        println!("{}", section.kind().name().to_uppercase());
        let entries: Vec<&Instruction> = match scope {
            Some(scope) => section.instructions_in(scope).collect(),
            None => section.instructions().iter().collect(),
        };
        for instruction in entries {
            match instruction.scope {
                Some(scope) => println!(
                    "  {:<16} [{}] {}",
                    instruction.name, scope, instruction.description
                ),
                None => println!("  {:<16} {}", instruction.name, instruction.description),
            }
            if examples {
                for line in instruction.example.lines() {
                    println!("      {}", line);
                }
            }
        }
        println!();
    }
}

fn list_guide(catalog: &Catalog, kind: Option<ArtifactKind>) {
    for section_kind in ArtifactKind::ALL {
        if kind.is_some_and(|k| k != section_kind) {
            continue;
        }
        println!("{}", section_kind.name().to_uppercase());
        for detail in catalog.section(section_kind).commands() {
            println!("  {:<16} {}", detail.name, detail.syntax);
        }
        println!();
    }
}

fn print_detail(detail: &CommandDetail) {
    println!("{}", detail.name);
    println!("{}", "=".repeat(detail.name.len()));
    println!();
    println!("    {}", detail.syntax);
    println!();
    println!("{}", detail.description);
    println!();
    println!("{}", detail.usage);

    if !detail.examples.is_empty() {
        println!();
        println!("EXAMPLES");
        for example in &detail.examples {
            println!();
            for line in example.code.lines() {
                println!("    {}", line);
            }
            println!("  {}", example.explanation);
        }
    }

    if !detail.tips.is_empty() {
        println!();
        println!("TIPS");
        for tip in &detail.tips {
            println!("  - {}", tip);
        }
    }

    if !detail.best_practices.is_empty() {
        println!();
        println!("BEST PRACTICES");
        for practice in &detail.best_practices {
            println!("  - {}", practice);
        }
    }
}

fn print_fields(catalog: &Catalog, key: &str, kind: Option<ArtifactKind>, as_toml: bool) {
    let entry = match catalog.find_template(key, kind) {
        Ok((_, entry)) => entry,
        Err(e) => fail(e),
    };
    let doc = parse(&entry.content);

    if as_toml {
        println!("[metadata]");
        println!("name = {}", toml::Value::String(entry.id.clone()));
        println!();
        println!("[values]");
        for label in doc.labels() {
            println!("{} = \"\"", toml::Value::String(label.to_string()));
        }
        return;
    }

    for label in doc.labels() {
        let count = doc.placeholders().filter(|p| p.label == label).count();
        if count > 1 {
            println!("{}  (x{})", label, count);
        } else {
            println!("{}", label);
        }
    }
}
