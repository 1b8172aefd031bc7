//! In-process contract compiler.
//!
//! Validates Casper contract sources with lightweight textual checks,
//! extracts entry points and emits a placeholder wasm module. Rust and
//! AssemblyScript sources are understood; everything else is rejected.

use once_cell::sync::Lazy;
use regex::Regex;

use crate::kernel::services::ports::{
    ClType, CompileDiagnostic, CompileOutput, CompileRequest, CompilerPort, ContractMetadata,
    DiagnosticSeverity, EntryPoint, EntryPointAccess, EntryPointArg, PortFuture, ServiceError,
};

pub const WASM_PREAMBLE: [u8; 8] = [0x00, 0x61, 0x73, 0x6d, 0x01, 0x00, 0x00, 0x00];
const CUSTOM_SECTION_ID: u8 = 0x00;
const CUSTOM_SECTION_NAME: &str = "casper";

static RUST_EXTERN_FN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"#\[no_mangle\]\s+pub\s+extern\s+"C"\s+fn\s+(\w+)\s*\(([^)]*)\)"#)
        .expect("valid extern fn pattern")
});
static RUST_CALL_FN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"fn\s+call\s*\(([^)]*)\)").expect("valid call fn pattern"));
static NAMED_ARG: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"runtime::get_named_arg\s*\(\s*"([^"]+)"\s*\)"#).expect("valid named arg pattern")
});
static ENTRY_POINT_NEW: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r#"EntryPoint::new\s*\(\s*"([^"]+)"\s*,\s*(?:vec!)?\[([^\]]*)\]\s*,\s*(?:CLType::)?(\w+)\s*,\s*EntryPointAccess::(\w+)"#,
    )
    .expect("valid entry point pattern")
});
static PARAMETER_NEW: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"Parameter::new\s*\(\s*"([^"]+)"\s*,\s*(?:CLType::)?(\w+)\s*\)"#)
        .expect("valid parameter pattern")
});
static AS_EXTERNAL_FN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"@external\s+export\s+function\s+(\w+)\s*\(([^)]*)\)(?:\s*:\s*(\w+))?")
        .expect("valid external fn pattern")
});
static TYPED_PARAM: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(\w+):\s*(\w+)").expect("valid typed param pattern"));

#[derive(Debug, Clone, Copy, Default)]
pub struct SimulatedCompiler;

impl CompilerPort for SimulatedCompiler {
    fn compile(&self, request: CompileRequest) -> PortFuture<Result<CompileOutput, ServiceError>> {
        let output = compile_source(&request);
        tracing::debug!(
            file = %request.file_name,
            language = %request.language,
            success = output.success,
            diagnostics = output.diagnostics.len(),
            "simulated compile"
        );
        Box::pin(async move { Ok(output) })
    }
}

pub fn compile_source(request: &CompileRequest) -> CompileOutput {
    match request.language.as_str() {
        "rust" => compile_rust(&request.source, contract_name(&request.file_name, &[".rs"])),
        "typescript" => compile_assemblyscript(
            &request.source,
            contract_name(&request.file_name, &[".ts", ".as"]),
        ),
        other => CompileOutput::failed(vec![CompileDiagnostic::error(format!(
            "unsupported language: {}",
            other
        ))]),
    }
}

fn contract_name(file_name: &str, extensions: &[&str]) -> String {
    extensions
        .iter()
        .find_map(|ext| file_name.strip_suffix(ext))
        .unwrap_or(file_name)
        .to_string()
}

fn compile_rust(source: &str, name: String) -> CompileOutput {
    let mut diagnostics = Vec::new();

    if !source.contains("casper_contract") && !source.contains("casper-types") {
        diagnostics.push(CompileDiagnostic::warning(
            "Missing Casper contract dependencies. Ensure Cargo.toml includes casper-contract and casper-types.",
        ));
    }

    let has_call = source.contains("#[no_mangle]") && source.contains("fn call()");
    let has_entry_points =
        source.contains("EntryPoints::new()") || source.contains("EntryPoint::new");
    if !has_call && !has_entry_points {
        diagnostics.push(CompileDiagnostic::error(
            "Contract must have either a #[no_mangle] pub extern \"C\" fn call() entry point or define EntryPoints",
        ));
    }

    if !source.contains("#![no_std]") {
        diagnostics.push(CompileDiagnostic::warning(
            "Consider adding #![no_std] for WASM compilation",
        ));
    }
    if !source.contains("#![no_main]") {
        diagnostics.push(CompileDiagnostic::warning(
            "Consider adding #![no_main] for contract entry points",
        ));
    }

    if diagnostics
        .iter()
        .any(|d| d.severity == DiagnosticSeverity::Error)
    {
        return CompileOutput::failed(diagnostics);
    }

    CompileOutput {
        success: true,
        artifact: Some(mock_wasm(&format!("Casper Contract: {}", name))),
        metadata: Some(ContractMetadata {
            entry_points: rust_entry_points(source),
            contract_type: "rust".to_string(),
            contract_package: Some(name),
        }),
        diagnostics,
    }
}

fn compile_assemblyscript(source: &str, name: String) -> CompileOutput {
    let mut diagnostics = Vec::new();
    if !source.contains("@external") {
        diagnostics.push(CompileDiagnostic::warning(
            "No @external entry points found. Contract may not be callable.",
        ));
    }

    CompileOutput {
        success: true,
        artifact: Some(mock_wasm(&format!("AssemblyScript Contract: {}", name))),
        metadata: Some(ContractMetadata {
            entry_points: assemblyscript_entry_points(source),
            contract_type: "assemblyscript".to_string(),
            contract_package: Some(name),
        }),
        diagnostics,
    }
}

fn rust_entry_points(source: &str) -> Vec<EntryPoint> {
    let mut entry_points: Vec<EntryPoint> = Vec::new();

    for caps in RUST_EXTERN_FN.captures_iter(source) {
        let name = caps[1].to_string();
        let ret = rust_return_type(source, &name);
        entry_points.push(EntryPoint {
            args: typed_params(&caps[2]),
            name,
            access: EntryPointAccess::Public,
            ret,
        });
    }

    if source.contains("fn call()") {
        let mut args = RUST_CALL_FN
            .captures(source)
            .map(|caps| typed_params(&caps[1]))
            .unwrap_or_default();
        for caps in NAMED_ARG.captures_iter(source) {
            if !args.iter().any(|a| a.name == caps[1]) {
                args.push(EntryPointArg {
                    name: caps[1].to_string(),
                    cl_type: ClType::String,
                });
            }
        }
        match entry_points.iter_mut().find(|ep| ep.name == "call") {
            Some(call) => {
                for arg in args {
                    if !call.args.iter().any(|a| a.name == arg.name) {
                        call.args.push(arg);
                    }
                }
            }
            None => entry_points.push(EntryPoint {
                name: "call".to_string(),
                args,
                access: EntryPointAccess::Public,
                ret: ClType::Unit,
            }),
        }
    }

    for caps in ENTRY_POINT_NEW.captures_iter(source) {
        if entry_points.iter().any(|ep| ep.name == caps[1]) {
            continue;
        }
        let args = PARAMETER_NEW
            .captures_iter(&caps[2])
            .map(|p| EntryPointArg {
                name: p[1].to_string(),
                cl_type: ClType::parse(&p[2]),
            })
            .collect();
        entry_points.push(EntryPoint {
            name: caps[1].to_string(),
            args,
            access: if &caps[4] == "Public" {
                EntryPointAccess::Public
            } else {
                EntryPointAccess::Group
            },
            ret: ClType::parse(&caps[3]),
        });
    }

    entry_points
}

fn rust_return_type(source: &str, name: &str) -> ClType {
    let pattern = format!(r"fn\s+{}\s*\([^)]*\)\s*->\s*(\w+)", regex::escape(name));
    Regex::new(&pattern)
        .ok()
        .and_then(|re| re.captures(source).map(|caps| ClType::parse(&caps[1])))
        .unwrap_or(ClType::Unit)
}

fn assemblyscript_entry_points(source: &str) -> Vec<EntryPoint> {
    let mut entry_points: Vec<EntryPoint> = Vec::new();
    for caps in AS_EXTERNAL_FN.captures_iter(source) {
        if entry_points.iter().any(|ep| ep.name == caps[1]) {
            continue;
        }
        entry_points.push(EntryPoint {
            name: caps[1].to_string(),
            args: typed_params(&caps[2]),
            access: EntryPointAccess::Public,
            ret: caps
                .get(3)
                .map(|m| ClType::parse(m.as_str()))
                .unwrap_or(ClType::Unit),
        });
    }
    entry_points
}

fn typed_params(params: &str) -> Vec<EntryPointArg> {
    params
        .split(',')
        .filter_map(|param| TYPED_PARAM.captures(param.trim()))
        .map(|caps| EntryPointArg {
            name: caps[1].to_string(),
            cl_type: ClType::parse(&caps[2]),
        })
        .collect()
}

/// Module preamble followed by one custom section carrying `label`.
pub fn mock_wasm(label: &str) -> Vec<u8> {
    let mut payload = Vec::with_capacity(CUSTOM_SECTION_NAME.len() + label.len() + 2);
    push_leb128(&mut payload, CUSTOM_SECTION_NAME.len() as u32);
    payload.extend_from_slice(CUSTOM_SECTION_NAME.as_bytes());
    payload.extend_from_slice(label.as_bytes());

    let mut wasm = WASM_PREAMBLE.to_vec();
    wasm.push(CUSTOM_SECTION_ID);
    push_leb128(&mut wasm, payload.len() as u32);
    wasm.extend_from_slice(&payload);
    wasm
}

fn push_leb128(out: &mut Vec<u8>, mut value: u32) {
    loop {
        let byte = (value & 0x7f) as u8;
        value >>= 7;
        if value == 0 {
            out.push(byte);
            return;
        }
        out.push(byte | 0x80);
    }
}

#[cfg(test)]
#[path = "../../../../tests/unit/kernel/services/adapters/compiler.rs"]
mod tests;
