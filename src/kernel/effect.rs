use crate::kernel::services::ports::{ChatRequest, CompileRequest, DeployRequest, ProjectSettings};

#[derive(Debug, Clone)]
pub enum Effect {
    Compile(CompileRequest),
    ConnectWallet,
    Deploy(DeployRequest),
    Chat(ChatRequest),
    SaveArchive { file_name: String, bytes: Vec<u8> },
    SaveSettings(ProjectSettings),
}
