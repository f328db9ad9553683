//! Class model → source text.
//!
//! Every target renders one self-contained declaration per class, in
//! registration order. Each field carries its original JSON key as a
//! serialization-name annotation so the generated types read the source
//! document back even though field names are normalized.
pub mod csharp;
pub mod rust;

use indexmap::IndexMap;

use crate::model::{ClassInfo, ClassModel};

/// Output language.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum Target {
    /// serde-annotated structs
    #[default]
    Rust,
    /// System.Text.Json-annotated classes, optionally in a file-scoped namespace
    CSharp { namespace: Option<String> },
}

/// Renders one class declaration for a target language.
pub trait ClassEmitter {
    /// Imports etc. placed once before all classes.
    fn prelude(&self) -> String;
    fn emit_class(&self, class: &ClassInfo, model: &ClassModel) -> String;
}

impl Target {
    fn emitter(&self) -> Box<dyn ClassEmitter + '_> {
        match self {
            Self::Rust => Box::new(rust::RustEmitter),
            Self::CSharp { namespace } => Box::new(csharp::CSharpEmitter { namespace: namespace.as_deref() }),
        }
    }
}

/// One text block per class, keyed by class name, in registration order.
/// An empty model gives an empty map.
pub fn generate(model: &ClassModel, target: &Target) -> IndexMap<String, String> {
    let emitter = target.emitter();
    model
        .classes()
        .map(|class| (class.name.clone(), emitter.emit_class(class, model)))
        .collect()
}

/// Accumulates a whole output file: prelude once, then class blocks.
pub struct Codegen {
    target: Target,
    blocks: Vec<String>,
}

impl Codegen {
    pub fn new(target: Target) -> Self {
        Self { target, blocks: Vec::new() }
    }

    pub fn emit(&mut self, model: &ClassModel) {
        self.blocks.extend(generate(model, &self.target).into_values());
    }

    /// Empty when nothing was emitted.
    pub fn into_string(self) -> String {
        if self.blocks.is_empty() {
            return String::new();
        }
        let mut out = self.target.emitter().prelude();
        for block in &self.blocks {
            out.push('\n');
            out.push_str(block);
        }
        out
    }
}

// ————————————————————————————————————————————————————————————————————————————
// INTERNAL HELPERS
// ————————————————————————————————————————————————————————————————————————————

/// Line buffer with indentation, shared by the emitters.
#[derive(Debug, Default)]
pub(crate) struct Block {
    buffer: String,
    level: usize,
    indent: &'static str,
}

impl Block {
    pub(crate) fn new(indent: &'static str) -> Self {
        Self { buffer: String::new(), level: 0, indent }
    }

    pub(crate) fn line(&mut self, s: &str) -> &mut Self {
        for _ in 0..self.level {
            self.buffer.push_str(self.indent);
        }
        self.buffer.push_str(s);
        self.buffer.push('\n');
        self
    }

    pub(crate) fn blank(&mut self) -> &mut Self {
        self.buffer.push('\n');
        self
    }

    pub(crate) fn indent(&mut self) -> &mut Self {
        self.level += 1;
        self
    }

    pub(crate) fn dedent(&mut self) -> &mut Self {
        self.level = self.level.saturating_sub(1);
        self
    }

    pub(crate) fn build(self) -> String {
        self.buffer
    }
}
