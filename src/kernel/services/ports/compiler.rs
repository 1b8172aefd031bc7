//! Compiler service contracts.

use crate::models::NodeId;

use super::runtime::{PortFuture, ServiceError};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompileRequest {
    pub request_id: u64,
    pub file_id: NodeId,
    pub file_name: String,
    pub source: String,
    pub language: String,
    pub optimize: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DiagnosticSeverity {
    Error,
    Warning,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompileDiagnostic {
    pub severity: DiagnosticSeverity,
    pub message: String,
    pub line: Option<u32>,
    pub column: Option<u32>,
}

impl CompileDiagnostic {
    pub fn error(message: impl Into<String>) -> Self {
        Self {
            severity: DiagnosticSeverity::Error,
            message: message.into(),
            line: None,
            column: None,
        }
    }

    pub fn warning(message: impl Into<String>) -> Self {
        Self {
            severity: DiagnosticSeverity::Warning,
            message: message.into(),
            line: None,
            column: None,
        }
    }

    pub fn at(mut self, line: u32, column: u32) -> Self {
        self.line = Some(line);
        self.column = Some(column);
        self
    }
}

/// Parameter/return type as declared by the compiled contract.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ClType {
    Bool,
    U8,
    U32,
    U64,
    U128,
    U256,
    U512,
    String,
    Key,
    Unit,
    Other(String),
}

impl ClType {
    pub fn parse(name: &str) -> Self {
        match name.trim() {
            "bool" | "Bool" => Self::Bool,
            "u8" | "U8" => Self::U8,
            "u32" | "U32" => Self::U32,
            "u64" | "U64" => Self::U64,
            "U128" | "u128" => Self::U128,
            "U256" => Self::U256,
            "U512" => Self::U512,
            "String" | "str" => Self::String,
            "Key" => Self::Key,
            "Unit" | "()" | "void" | "" => Self::Unit,
            other => Self::Other(other.to_string()),
        }
    }

    pub fn name(&self) -> &str {
        match self {
            Self::Bool => "Bool",
            Self::U8 => "U8",
            Self::U32 => "U32",
            Self::U64 => "U64",
            Self::U128 => "U128",
            Self::U256 => "U256",
            Self::U512 => "U512",
            Self::String => "String",
            Self::Key => "Key",
            Self::Unit => "Unit",
            Self::Other(name) => name,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EntryPointArg {
    pub name: String,
    pub cl_type: ClType,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntryPointAccess {
    Public,
    Group,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EntryPoint {
    pub name: String,
    pub args: Vec<EntryPointArg>,
    pub access: EntryPointAccess,
    pub ret: ClType,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ContractMetadata {
    pub entry_points: Vec<EntryPoint>,
    pub contract_type: String,
    pub contract_package: Option<String>,
}

impl ContractMetadata {
    /// First declaration of `arg` across all entry points.
    pub fn declared_type(&self, arg: &str) -> Option<&ClType> {
        self.entry_points
            .iter()
            .flat_map(|ep| ep.args.iter())
            .find(|a| a.name == arg)
            .map(|a| &a.cl_type)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct CompileOutput {
    pub success: bool,
    pub artifact: Option<Vec<u8>>,
    pub metadata: Option<ContractMetadata>,
    pub diagnostics: Vec<CompileDiagnostic>,
}

impl CompileOutput {
    pub fn failed(diagnostics: Vec<CompileDiagnostic>) -> Self {
        Self {
            success: false,
            artifact: None,
            metadata: None,
            diagnostics,
        }
    }

    pub fn error_count(&self) -> usize {
        self.diagnostics
            .iter()
            .filter(|d| d.severity == DiagnosticSeverity::Error)
            .count()
    }
}

pub trait CompilerPort: Send + Sync {
    fn compile(&self, request: CompileRequest) -> PortFuture<Result<CompileOutput, ServiceError>>;
}
