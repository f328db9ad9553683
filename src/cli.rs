//! CLI: infer → (rust | csharp | model)
use std::io::Read;
use std::path::PathBuf;

use anyhow::{Context, Result, bail};
use clap::{ArgAction, Args, Parser, Subcommand};
use serde_json::Value;
use tracing::{debug, info};

use json_classgen::codegen::{Codegen, Target};
use json_classgen::inference::{DEFAULT_ROOT_CLASS, Inference};
use json_classgen::model::ClassModel;
use json_classgen::{jq_exec, path_de};

// ————————————————————————————————————————————————————————————————————————————
// TYPES
// ————————————————————————————————————————————————————————————————————————————

/// infer classes from JSON documents and emit type declarations
#[derive(Parser, Debug)]
#[command(name = "json-classgen", version)]
pub struct CommandLineInterface {
    /// more logging on stderr (-v info, -vv debug, -vvv trace); RUST_LOG wins
    #[arg(short, long, global = true, action = ArgAction::Count)]
    pub verbose: u8,

    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// emit serde-annotated Rust structs
    Rust(RustOut),
    /// emit System.Text.Json-annotated C# classes
    #[command(name = "csharp")]
    CSharp(CSharpOut),
    /// print the inferred class model as JSON (debug view)
    Model(ModelOut),
}

#[derive(Args, Debug, Clone)]
struct InputSettings {
    /// One or more inputs. May be literal paths, quoted glob patterns or '-' for stdin
    #[arg(long, short, num_args = 1.., required = true)]
    input: Vec<String>,

    /// JSON Pointer to select a subnode in each document (e.g. /data/items/0/payload)
    #[arg(long)]
    json_pointer: Option<String>,

    /// jq pre-process filter for each document; every output is a document
    #[arg(long)]
    jq_expr: Option<String>,

    /// name of the top-level class
    #[arg(long, default_value = DEFAULT_ROOT_CLASS)]
    root_type: String,

    /// output file (stdout if omitted)
    #[arg(short, long)]
    out: Option<PathBuf>,
}

#[derive(clap::Parser, Debug)]
struct RustOut {
    #[command(flatten)]
    input_settings: InputSettings,
}

#[derive(clap::Parser, Debug)]
struct CSharpOut {
    #[command(flatten)]
    input_settings: InputSettings,

    /// file-scoped namespace for the generated classes
    #[arg(long)]
    namespace: Option<String>,
}

#[derive(clap::Parser, Debug)]
struct ModelOut {
    #[command(flatten)]
    input_settings: InputSettings,

    /// print one model per document (a JSON array) instead of merging all samples
    #[arg(long, default_value_t = false)]
    per_document: bool,
}

// ————————————————————————————————————————————————————————————————————————————
// IMPLEMENTATION
// ————————————————————————————————————————————————————————————————————————————

impl InputSettings {
    /// Read, select and pre-process every input; one entry per resulting document.
    fn load_documents(&self) -> Result<Vec<(String, Value)>> {
        let mut docs = Vec::new();
        for source in resolve_inputs(&self.input)? {
            let label = source.label();
            let text = source.read()?;
            if text.trim().is_empty() {
                bail!("no content in {label}");
            }
            let value = path_de::parse_document(&text)
                .with_context(|| format!("failed to parse {label}"))?;
            let selected = jq_exec::select_documents(value, self.json_pointer.as_deref(), self.jq_expr.as_deref())
                .with_context(|| format!("failed to pre-process {label}"))?;
            debug!(source = %label, documents = selected.len(), "loaded input");
            docs.extend(selected.into_iter().map(|v| (label.clone(), v)));
        }
        Ok(docs)
    }

    /// Every document is a sample of the same root class; one solved model.
    fn infer_model(&self) -> Result<ClassModel> {
        let docs = self.load_documents()?;
        let mut inf = Inference::new();
        for (label, doc) in &docs {
            observe(&mut inf, label, doc, &self.root_type);
        }
        Ok(inf.solve())
    }

    /// One solved model per document, each from a fresh session.
    fn infer_per_document(&self) -> Result<Vec<ClassModel>> {
        let docs = self.load_documents()?;
        let mut inf = Inference::new();
        let mut models = Vec::with_capacity(docs.len());
        for (label, doc) in &docs {
            inf.reset();
            observe(&mut inf, label, doc, &self.root_type);
            models.push(inf.solve());
        }
        Ok(models)
    }

    fn write_output(&self, text: &str) -> Result<()> {
        match self.out.as_ref() {
            Some(out) => {
                if let Some(parent) = out.parent() {
                    std::fs::create_dir_all(parent)
                        .with_context(|| format!("failed to create {}", parent.display()))?;
                }
                std::fs::write(out, text).with_context(|| format!("failed to write {}", out.display()))?;
                info!(path = %out.display(), "wrote output");
            }
            None => print!("{text}"),
        }
        Ok(())
    }
}

impl CommandLineInterface {
    pub fn load() -> Self {
        Self::parse()
    }

    pub fn run(&self) -> Result<()> {
        match &self.cmd {
            Command::Rust(target) => emit_code(&target.input_settings, Target::Rust),
            Command::CSharp(target) => {
                let namespace = target.namespace.clone();
                emit_code(&target.input_settings, Target::CSharp { namespace })
            }
            Command::Model(target) => {
                let settings = &target.input_settings;
                let view = if target.per_document {
                    serde_json::to_value(settings.infer_per_document()?)?
                } else {
                    serde_json::to_value(settings.infer_model()?)?
                };
                let text = serde_json::to_string_pretty(&view)?;
                target.input_settings.write_output(&format!("{text}\n"))
            }
        }
    }
}

fn emit_code(settings: &InputSettings, target: Target) -> Result<()> {
    let model = settings.infer_model()?;
    let mut cg = Codegen::new(target);
    cg.emit(&model);
    let src = cg.into_string();
    if src.is_empty() {
        bail!("no classes could be inferred (the input has no JSON object)");
    }
    settings.write_output(&src)
}

// ————————————————————————————————————————————————————————————————————————————
// INTERNAL HELPERS
// ————————————————————————————————————————————————————————————————————————————

fn observe(inf: &mut Inference, label: &str, doc: &Value, root_type: &str) {
    let before = inf.warnings().len();
    inf.observe_value(doc, root_type);
    let added = inf.warnings().len() - before;
    if added > 0 {
        info!(source = %label, warnings = added, "ambiguous shapes resolved by first sample");
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum InputSource {
    Stdin,
    File(PathBuf),
}

impl InputSource {
    fn label(&self) -> String {
        match self {
            Self::Stdin => "<stdin>".to_string(),
            Self::File(path) => path.display().to_string(),
        }
    }

    fn read(&self) -> Result<String> {
        match self {
            Self::Stdin => {
                let mut buf = String::new();
                std::io::stdin().read_to_string(&mut buf).context("failed to read stdin")?;
                Ok(buf)
            }
            Self::File(path) => std::fs::read_to_string(path)
                .with_context(|| format!("failed to read {}", path.display())),
        }
    }
}

fn resolve_inputs<I>(patterns: I) -> Result<Vec<InputSource>>
where
    I: IntoIterator,
    I::Item: AsRef<str>,
{
    fn has_glob_chars(s: &str) -> bool {
        // Minimal glob detection for the `glob` crate syntax.
        s.bytes().any(|b| matches!(b, b'*' | b'?' | b'[' | b'{'))
    }

    let mut out = Vec::<InputSource>::new();

    for raw in patterns {
        let pattern = raw.as_ref();

        if pattern == "-" {
            out.push(InputSource::Stdin);
        } else if has_glob_chars(pattern) {
            let mut matched_any = false;
            let entries = glob::glob(pattern).with_context(|| format!("bad glob pattern: {pattern}"))?;
            for entry in entries {
                out.push(InputSource::File(entry?));
                matched_any = true;
            }
            if !matched_any {
                bail!("glob pattern matched no files: {pattern}");
            }
        } else {
            out.push(InputSource::File(PathBuf::from(pattern)));
        }
    }

    Ok(out)
}
